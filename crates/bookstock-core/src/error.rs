//! # Error Types
//!
//! Domain-specific error types for bookstock-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  bookstock-core errors (this file)                                     │
//! │  ├── ValidationError  - Field-set rejected before any write            │
//! │  └── UriError         - Malformed content:// address                   │
//! │                                                                         │
//! │  bookstock-db errors (separate crate)                                  │
//! │  └── DbError          - Storage failures, wraps ValidationError        │
//! │                                                                         │
//! │  Not errors at all:                                                    │
//! │  • affected-row count 0   (update/delete target absent)                │
//! │  • SaleOutcome::NoStockToSell / SaleFailed                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Name the offending field in every message
//! 3. Errors are enum variants, never String

use thiserror::Error;

// =============================================================================
// Validation Error
// =============================================================================

/// Field-set validation failures.
///
/// Raised before any persistence call, so a failed validation never leaves
/// partial state behind.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too short.
    #[error("{field} must be at least {min} characters")]
    TooShort { field: String, min: usize },

    /// Numeric value is below zero.
    #[error("{field} must not be negative")]
    Negative { field: String },

    /// Value cannot be interpreted (non-numeric quantity, NaN price, ...).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Field is owned by the store and cannot be written by callers.
    #[error("{field} is assigned by the store and cannot be set")]
    Immutable { field: String },

    /// Update was called with nothing to change.
    #[error("no fields to update")]
    NoChanges,
}

impl ValidationError {
    /// Creates a Required error for the given field label.
    pub fn required(field: impl Into<String>) -> Self {
        ValidationError::Required {
            field: field.into(),
        }
    }

    /// Creates an InvalidFormat error.
    pub fn invalid(field: impl Into<String>, reason: impl Into<String>) -> Self {
        ValidationError::InvalidFormat {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

// =============================================================================
// URI Error
// =============================================================================

/// Errors parsing a `content://` book address.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UriError {
    /// The string does not start with `content://`.
    #[error("Not a content URI: {0}")]
    NotContentUri(String),

    /// The authority is not the books provider.
    #[error("Unknown authority: {0}")]
    UnknownAuthority(String),

    /// The path does not address the books table.
    #[error("Unknown path: {0}")]
    UnknownPath(String),

    /// The trailing segment is not a numeric id.
    #[error("Invalid book id: {0}")]
    InvalidId(String),
}

/// Result type alias for validation.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Unit Tests
// =============================================================================
