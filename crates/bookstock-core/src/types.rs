//! # Domain Types
//!
//! Core domain types used throughout Bookstock.
//!
//! ## Type Overview
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────────┐   ┌─────────────────────────────────────┐     │
//! │  │     BookRecord      │   │            SaleOutcome              │     │
//! │  │  ─────────────────  │   │  ─────────────────────────────────  │     │
//! │  │  id (BookId)        │   │  SaleSucceeded { remaining }        │     │
//! │  │  name               │   │  NoStockToSell                      │     │
//! │  │  price (Money)      │   │  SaleFailed                         │     │
//! │  │  quantity           │   └─────────────────────────────────────┘     │
//! │  │  supplier_name      │                                               │
//! │  │  supplier_phone     │                                               │
//! │  └─────────────────────┘                                               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! A `BookRecord` only exists once the store has assigned its id. Values a
//! caller is still editing live in a [`FieldSet`](crate::fields::FieldSet).

use serde::{Deserialize, Serialize};
use std::fmt;
use ts_rs::TS;

use crate::money::Money;

// =============================================================================
// Book Id
// =============================================================================

/// Identifier of a persisted book, assigned by the store on insert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(transparent))]
#[serde(transparent)]
#[ts(export)]
pub struct BookId(i64);

impl BookId {
    #[inline]
    pub const fn new(id: i64) -> Self {
        BookId(id)
    }

    #[inline]
    pub const fn get(&self) -> i64 {
        self.0
    }
}

impl fmt::Display for BookId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for BookId {
    fn from(id: i64) -> Self {
        BookId(id)
    }
}

// =============================================================================
// Book Record
// =============================================================================

/// A book as persisted in the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct BookRecord {
    /// Store-assigned identifier.
    pub id: BookId,

    /// Title, never empty.
    pub name: String,

    /// Unit price, never negative.
    pub price: Money,

    /// Units in stock, never negative.
    pub quantity: i64,

    /// Supplier name, may be empty.
    pub supplier_name: String,

    /// Supplier phone number, at least 10 characters.
    pub supplier_phone: String,
}

impl BookRecord {
    /// Returns true if at least one copy can be sold.
    #[inline]
    pub fn in_stock(&self) -> bool {
        self.quantity > 0
    }

    /// Value of the copies on hand (price × quantity), or `None` if it
    /// overflows.
    pub fn stock_value(&self) -> Option<Money> {
        self.price.checked_mul(self.quantity)
    }

    /// `tel:` URI for calling the supplier.
    ///
    /// ## Example
    /// ```rust
    /// use bookstock_core::{BookId, BookRecord, Money};
    ///
    /// let book = BookRecord {
    ///     id: BookId::new(1),
    ///     name: "Dune".into(),
    ///     price: Money::from_cents(1250),
    ///     quantity: 3,
    ///     supplier_name: String::new(),
    ///     supplier_phone: " 1234567890 ".into(),
    /// };
    /// assert_eq!(book.supplier_dial_uri(), "tel:1234567890");
    /// ```
    pub fn supplier_dial_uri(&self) -> String {
        format!("tel:{}", self.supplier_phone.trim())
    }
}

// =============================================================================
// Sale Outcome
// =============================================================================

/// Result of the stock-decrement (sale) protocol.
///
/// These are normal outcomes, not errors: the caller shows a different
/// message for "nothing to sell" than for "sale could not be applied".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum SaleOutcome {
    /// One copy was sold; `remaining` is the quantity that was written.
    SaleSucceeded { remaining: i64 },

    /// The observed quantity was zero; nothing was written.
    NoStockToSell,

    /// The write touched no row (book deleted since it was observed).
    SaleFailed,
}

impl SaleOutcome {
    /// Returns true if a copy was sold.
    #[inline]
    pub fn is_success(&self) -> bool {
        matches!(self, SaleOutcome::SaleSucceeded { .. })
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
