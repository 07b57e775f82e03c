//! # bookstock-core: Schema and Business Rules for Bookstock
//!
//! This crate holds everything about the book inventory that does not touch
//! the disk: the canonical table/column vocabulary, the field-set value a
//! caller submits, validation, and the sale decision rule.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Bookstock Architecture                           │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │               Presentation layer (out of scope)                 │   │
//! │  │    Book list ──► Editor form ──► Sale button ──► Dialogs        │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ plain method calls                     │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │             ★ bookstock-core (THIS CRATE) ★                     │   │
//! │  │                                                                 │   │
//! │  │   ┌──────────┐ ┌──────────┐ ┌────────────┐ ┌───────────────┐   │   │
//! │  │   │  schema  │ │  fields  │ │ validation │ │   inventory   │   │   │
//! │  │   │ columns  │ │ FieldSet │ │  NewBook   │ │   plan_sale   │   │   │
//! │  │   └──────────┘ └──────────┘ └────────────┘ └───────────────┘   │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • PURE FUNCTIONS                         │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                  bookstock-db (Inventory Store)                 │   │
//! │  │         SQLite, migrations, BookRepository, sell_one            │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`schema`] - Table name and column identifiers
//! - [`types`] - `BookId`, `BookRecord`, `SaleOutcome`
//! - [`fields`] - `FieldSet`, the partial field mapping used by insert/update
//! - [`validation`] - Field-set validation and defaulting
//! - [`inventory`] - Pure stock-decrement decision
//! - [`money`] - Integer-cent price type
//! - [`uri`] - `content://` addressing of books
//! - [`error`] - Validation and URI errors
//!
//! ## Example Usage
//!
//! ```rust
//! use bookstock_core::fields::FieldSet;
//! use bookstock_core::validation::validate_new_book;
//!
//! let fields = FieldSet::new()
//!     .with_name("Dune")
//!     .with_price(12.5)
//!     .with_quantity(3)
//!     .with_supplier_phone("1234567890");
//!
//! let book = validate_new_book(&fields).unwrap();
//! assert_eq!(book.price.cents(), 1250);
//! assert_eq!(book.supplier_name, "");
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod fields;
pub mod inventory;
pub mod money;
pub mod schema;
pub mod types;
pub mod uri;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{UriError, ValidationError};
pub use fields::{FieldSet, FieldValue};
pub use money::Money;
pub use schema::{BookColumn, TABLE_NAME};
pub use types::*;
pub use uri::BookUri;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Minimum length of a supplier phone number.
///
/// This is a formatting check only; the number is never dialled or verified.
pub const MIN_SUPPLIER_PHONE_LEN: usize = 10;
