//! # Money Module
//!
//! Provides the `Money` type used for book prices.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  The books table stores price as REAL, and form input arrives as text  │
//! │  such as "12.5". Summing or multiplying those as f64 drifts:           │
//! │    0.1 + 0.2 = 0.30000000000000004                                      │
//! │                                                                         │
//! │  OUR SOLUTION: Integer Cents in memory                                 │
//! │    "12.5" ──► 1250 cents ──► arithmetic on i64 ──► 12.5 REAL on disk   │
//! │                                                                         │
//! │  Conversion to/from f64 happens only at the storage boundary.          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use bookstock_core::money::Money;
//!
//! let price = Money::from_cents(1250);
//! assert_eq!(price.to_string(), "$12.50");
//!
//! let stock_value = price * 3;
//! assert_eq!(stock_value.cents(), 3750);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, Mul};
use ts_rs::TS;

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in cents.
///
/// Signed so that arithmetic can't silently wrap, but the store only ever
/// persists non-negative prices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Largest magnitude in cents that survives the trip through a REAL
    /// column unchanged (2^53).
    pub const MAX_CENTS: i64 = 1 << 53;

    /// Creates a Money value from cents.
    ///
    /// ## Example
    /// ```rust
    /// use bookstock_core::money::Money;
    ///
    /// let price = Money::from_cents(1099); // $10.99
    /// assert_eq!(price.cents(), 1099);
    /// ```
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Converts a decimal amount (as stored in the REAL `price` column) to
    /// cents, rounding to the nearest cent.
    ///
    /// Returns `None` for NaN, infinite input, or an amount whose cents
    /// exceed [`Money::MAX_CENTS`].
    ///
    /// ## Example
    /// ```rust
    /// use bookstock_core::money::Money;
    ///
    /// assert_eq!(Money::from_decimal(12.5).unwrap().cents(), 1250);
    /// assert_eq!(Money::from_decimal(0.1 + 0.2).unwrap().cents(), 30);
    /// assert!(Money::from_decimal(f64::NAN).is_none());
    /// assert!(Money::from_decimal(1e300).is_none());
    /// ```
    pub fn from_decimal(amount: f64) -> Option<Self> {
        if !amount.is_finite() {
            return None;
        }
        let cents = (amount * 100.0).round();
        if cents.abs() > Self::MAX_CENTS as f64 {
            return None;
        }
        Some(Money(cents as i64))
    }

    /// Returns the value as a decimal amount for the REAL column.
    #[inline]
    pub fn to_decimal(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    /// Returns the value in cents.
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns the whole-dollar portion.
    #[inline]
    pub const fn dollars(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the cents portion (always 0-99).
    #[inline]
    pub const fn cents_part(&self) -> i64 {
        (self.0 % 100).abs()
    }

    /// Zero, the default price of a new book.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    /// Checks if the value is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Checks if the value is negative.
    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Adds, returning `None` on overflow.
    #[inline]
    pub fn checked_add(self, other: Self) -> Option<Self> {
        self.0.checked_add(other.0).map(Money)
    }

    /// Multiplies by a quantity, returning `None` on overflow.
    #[inline]
    pub fn checked_mul(self, qty: i64) -> Option<Self> {
        self.0.checked_mul(qty).map(Money)
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Shows money with two decimals, e.g. `$12.50`.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(
            f,
            "{}${}.{:02}",
            sign,
            self.dollars().abs(),
            self.cents_part()
        )
    }
}

impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

/// Saturates at the i64 bounds. Use [`Money::checked_add`] to detect overflow.
impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0.saturating_add(other.0))
    }
}

/// Multiplication by a quantity. Saturates like `Add`; see
/// [`Money::checked_mul`].
impl Mul<i64> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i64) -> Self {
        Money(self.0.saturating_mul(qty))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
