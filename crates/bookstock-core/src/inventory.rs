//! # Stock-Decrement Rules
//!
//! The decision half of the sale protocol. The store performs the write;
//! this module only decides whether there is one and what it is.
//!
//! ## Sale Protocol
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Sale button pressed on a list row showing "Quantity: q"                │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  plan_sale(q) ← THIS MODULE                                            │
//! │       │                                                                 │
//! │       ├── q == 0 ──► SalePlan::NothingToSell ──► NoStockToSell         │
//! │       │              (no write)                                        │
//! │       │                                                                 │
//! │       └── q > 0  ──► SalePlan::Write { new_quantity: q - 1 }           │
//! │                            │                                            │
//! │                            ▼  (bookstock-db)                            │
//! │                      UPDATE books SET quantity = q - 1 WHERE _id = ?   │
//! │                            │                                            │
//! │                            ├── 0 rows ──► SaleFailed                    │
//! │                            └── 1 row  ──► SaleSucceeded                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! `q` is the quantity the caller saw, not a fresh read. Two callers selling
//! from the same observed `q` both write `q - 1`; only the zero floor is
//! guarded.

use crate::error::{ValidationError, ValidationResult};
use crate::schema::BookColumn;

/// What the store should do for a sale.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SalePlan {
    /// Observed quantity is zero: report `NoStockToSell`, write nothing.
    NothingToSell,

    /// Write this quantity to the book.
    Write { new_quantity: i64 },
}

/// Decides the sale for a caller-observed quantity.
///
/// ## Example
/// ```rust
/// use bookstock_core::inventory::{plan_sale, SalePlan};
///
/// assert_eq!(plan_sale(3).unwrap(), SalePlan::Write { new_quantity: 2 });
/// assert_eq!(plan_sale(0).unwrap(), SalePlan::NothingToSell);
/// assert!(plan_sale(-1).is_err());
/// ```
pub fn plan_sale(observed_quantity: i64) -> ValidationResult<SalePlan> {
    match observed_quantity {
        0 => Ok(SalePlan::NothingToSell),
        q if q > 0 => Ok(SalePlan::Write { new_quantity: q - 1 }),
        _ => Err(ValidationError::Negative {
            field: format!("observed {}", BookColumn::Quantity.label()),
        }),
    }
}
