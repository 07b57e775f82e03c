//! # Database Error Types
//!
//! Error types for inventory store operations.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Propagation                                    │
//! │                                                                         │
//! │  FieldSet rejected ──► ValidationError ──┐                             │
//! │                                          │  (before any SQL runs)       │
//! │                                          ▼                              │
//! │  SQLite Error (sqlx::Error) ──────────► DbError (this module)          │
//! │                                          │                              │
//! │                                          ▼                              │
//! │                            Caller shows a message                      │
//! │                                                                         │
//! │  NOT errors: update/delete count 0, SaleOutcome variants               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use bookstock_core::ValidationError;
use thiserror::Error;

/// Inventory store errors.
#[derive(Debug, Error)]
pub enum DbError {
    /// The field-set was rejected; nothing was written.
    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationError),

    /// The engine did not hand back an id for a new book.
    ///
    /// ## When This Occurs
    /// - A CHECK / NOT NULL constraint rejected the row
    /// - `RETURNING` produced no row
    #[error("Insert failed: {reason}")]
    InsertFailed { reason: String },

    /// A constraint rejected an update.
    #[error("Constraint violation: {0}")]
    ConstraintViolation(String),

    /// Database connection failed.
    ///
    /// ## When This Occurs
    /// - Database file can't be created
    /// - File permissions issue
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// Migration failed.
    #[error("Migration failed: {0}")]
    MigrationFailed(String),

    /// Query execution failed.
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// A projected row was turned into a full record but lacks a column.
    #[error("Column {0} was not selected")]
    MissingColumn(&'static str),

    /// Pool exhausted (all connections in use).
    #[error("Connection pool exhausted")]
    PoolExhausted,

    /// Settings file could not be read or parsed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Internal database error.
    #[error("Internal database error: {0}")]
    Internal(String),
}

impl DbError {
    /// Creates an InsertFailed error.
    pub fn insert_failed(reason: impl Into<String>) -> Self {
        DbError::InsertFailed {
            reason: reason.into(),
        }
    }
}

/// Convert sqlx errors to DbError.
///
/// ## Error Mapping
/// ```text
/// sqlx::Error::Database (constraint) → DbError::ConstraintViolation
/// sqlx::Error::Database (other)      → DbError::QueryFailed
/// sqlx::Error::PoolTimedOut          → DbError::PoolExhausted
/// sqlx::Error::PoolClosed            → DbError::ConnectionFailed
/// Other                              → DbError::Internal
/// ```
impl From<sqlx::Error> for DbError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::Database(db_err) => {
                let msg = db_err.message();

                // SQLite reports e.g. "CHECK constraint failed: quantity >= 0"
                // or "NOT NULL constraint failed: books.product_name"
                if msg.contains("constraint failed") {
                    DbError::ConstraintViolation(msg.to_string())
                } else {
                    DbError::QueryFailed(msg.to_string())
                }
            }

            sqlx::Error::PoolTimedOut => DbError::PoolExhausted,

            sqlx::Error::PoolClosed => DbError::ConnectionFailed("Pool is closed".to_string()),

            _ => DbError::Internal(err.to_string()),
        }
    }
}

impl From<sqlx::migrate::MigrateError> for DbError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        DbError::MigrationFailed(err.to_string())
    }
}

/// Result type for database operations.
pub type DbResult<T> = Result<T, DbError>;
