//! # Field-Sets
//!
//! A [`FieldSet`] is the partial mapping from column to value that a caller
//! builds up (typically from an editor form) and then hands to `insert` or
//! `update` in one call. The store only borrows it.
//!
//! ## Lifecycle
//! ```text
//! Editor form                      bookstock-core              bookstock-db
//! ───────────                      ──────────────              ────────────
//! name  "Dune"      ─┐
//! price "12.5"       ├─► FieldSet ──► validate_new_book ──► NewBook ──► INSERT
//! phone "1234567890"─┘        │
//!                             └────► validate_changes ──► BookChanges ──► UPDATE
//! ```
//!
//! Values may arrive as text (what a form produces) or already typed; the
//! validation layer accepts both.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use ts_rs::TS;

use crate::schema::BookColumn;

// =============================================================================
// Field Value
// =============================================================================

/// A single value in a field-set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(untagged)]
pub enum FieldValue {
    Integer(i64),
    Real(f64),
    Text(String),
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        FieldValue::Integer(value)
    }
}

impl From<i32> for FieldValue {
    fn from(value: i32) -> Self {
        FieldValue::Integer(value as i64)
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        FieldValue::Real(value)
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Text(value)
    }
}

// =============================================================================
// Field Set
// =============================================================================

/// Partial mapping from column to value.
///
/// ## Example
/// ```rust
/// use bookstock_core::fields::{FieldSet, FieldValue};
/// use bookstock_core::schema::BookColumn;
///
/// let fields = FieldSet::new().with_name("Dune").with_quantity(3);
///
/// assert_eq!(fields.len(), 2);
/// assert_eq!(fields.get(BookColumn::Quantity), Some(&FieldValue::Integer(3)));
/// assert!(!fields.contains(BookColumn::Price));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldSet {
    values: BTreeMap<BookColumn, FieldValue>,
}

impl FieldSet {
    /// Creates an empty field-set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a column, replacing any previous value.
    pub fn set(mut self, column: BookColumn, value: impl Into<FieldValue>) -> Self {
        self.values.insert(column, value.into());
        self
    }

    /// Sets `product_name`.
    pub fn with_name(self, name: impl Into<FieldValue>) -> Self {
        self.set(BookColumn::Name, name)
    }

    /// Sets `price`.
    pub fn with_price(self, price: impl Into<FieldValue>) -> Self {
        self.set(BookColumn::Price, price)
    }

    /// Sets `quantity`.
    pub fn with_quantity(self, quantity: impl Into<FieldValue>) -> Self {
        self.set(BookColumn::Quantity, quantity)
    }

    /// Sets `supplier_name`.
    pub fn with_supplier_name(self, name: impl Into<FieldValue>) -> Self {
        self.set(BookColumn::SupplierName, name)
    }

    /// Sets `supplier_phone_number`.
    pub fn with_supplier_phone(self, phone: impl Into<FieldValue>) -> Self {
        self.set(BookColumn::SupplierPhone, phone)
    }

    pub fn get(&self, column: BookColumn) -> Option<&FieldValue> {
        self.values.get(&column)
    }

    pub fn contains(&self, column: BookColumn) -> bool {
        self.values.contains_key(&column)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterates over the supplied columns in table order.
    pub fn iter(&self) -> impl Iterator<Item = (BookColumn, &FieldValue)> {
        self.values.iter().map(|(column, value)| (*column, value))
    }
}
