//! # Schema Definition
//!
//! The one place where table and column names are spelled out. Every other
//! module refers to columns through [`BookColumn`], so a rename here is a
//! compile error everywhere else instead of a silently broken query.
//!
//! ## Table Layout
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  books                                                                  │
//! │  ─────────────────────────────────────────────────────────────────────  │
//! │  _id                    INTEGER  primary key, assigned by the store     │
//! │  product_name           TEXT     required                               │
//! │  price                  REAL     >= 0, default 0.00                     │
//! │  quantity               INTEGER  >= 0, default 0                        │
//! │  supplier_name          TEXT     default ''                             │
//! │  supplier_phone_number  TEXT     required, >= 10 characters             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use ts_rs::TS;

use crate::error::ValidationError;

/// Name of the database table holding books.
pub const TABLE_NAME: &str = "books";

/// A column of the `books` table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub enum BookColumn {
    /// `_id` - unique identifier, assigned on insert.
    Id,
    /// `product_name` - title of the book.
    Name,
    /// `price` - unit price.
    Price,
    /// `quantity` - units in stock.
    Quantity,
    /// `supplier_name` - optional supplier name.
    SupplierName,
    /// `supplier_phone_number` - supplier contact number.
    SupplierPhone,
}

impl BookColumn {
    /// Every column, in table order.
    pub const ALL: [BookColumn; 6] = [
        BookColumn::Id,
        BookColumn::Name,
        BookColumn::Price,
        BookColumn::Quantity,
        BookColumn::SupplierName,
        BookColumn::SupplierPhone,
    ];

    /// The SQL column name.
    pub const fn as_str(&self) -> &'static str {
        match self {
            BookColumn::Id => "_id",
            BookColumn::Name => "product_name",
            BookColumn::Price => "price",
            BookColumn::Quantity => "quantity",
            BookColumn::SupplierName => "supplier_name",
            BookColumn::SupplierPhone => "supplier_phone_number",
        }
    }

    /// Human-readable label used in validation messages.
    pub const fn label(&self) -> &'static str {
        match self {
            BookColumn::Id => "id",
            BookColumn::Name => "name",
            BookColumn::Price => "price",
            BookColumn::Quantity => "quantity",
            BookColumn::SupplierName => "supplier name",
            BookColumn::SupplierPhone => "supplier phone",
        }
    }
}

impl fmt::Display for BookColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BookColumn {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        BookColumn::ALL
            .iter()
            .copied()
            .find(|column| column.as_str() == s)
            .ok_or_else(|| ValidationError::InvalidFormat {
                field: "column".to_string(),
                reason: format!("unknown column '{}'", s),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_names() {
        assert_eq!(TABLE_NAME, "books");
        assert_eq!(BookColumn::Id.as_str(), "_id");
        assert_eq!(BookColumn::Name.as_str(), "product_name");
        assert_eq!(BookColumn::SupplierPhone.as_str(), "supplier_phone_number");
    }

    #[test]
    fn test_column_parse_round_trips_every_column() {
        for column in BookColumn::ALL {
            assert_eq!(column.as_str().parse::<BookColumn>().unwrap(), column);
        }
        assert!("isbn".parse::<BookColumn>().is_err());
    }

    #[test]
    fn test_all_is_in_table_order() {
        assert_eq!(BookColumn::ALL.first(), Some(&BookColumn::Id));
        assert_eq!(BookColumn::ALL.last(), Some(&BookColumn::SupplierPhone));
    }
}
