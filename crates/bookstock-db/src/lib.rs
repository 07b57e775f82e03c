//! # bookstock-db: Inventory Store for Bookstock
//!
//! This crate persists books in SQLite and exposes the validated store
//! operations, using sqlx for async access.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Bookstock Data Flow                              │
//! │                                                                         │
//! │  Caller builds a FieldSet (bookstock-core)                             │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                  bookstock-db (THIS CRATE)                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐  │   │
//! │  │   │   Database    │    │  Repository   │    │  Migrations  │  │   │
//! │  │   │   (pool.rs)   │    │  (book.rs)    │    │  (embedded)  │  │   │
//! │  │   │               │    │               │    │              │  │   │
//! │  │   │ SqlitePool    │◄───│ BookRepository│    │ 001_create_  │  │   │
//! │  │   │ DbConfig      │    │ BookCursor    │    │   books.sql  │  │   │
//! │  │   └───────────────┘    └───────────────┘    └──────────────┘  │   │
//! │  │          ▲                                                      │   │
//! │  │          │ StoreSettings (config.rs): file + environment        │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     SQLite Database                             │   │
//! │  │   <platform data dir>/bookstock.db                              │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`config`] - Settings file and environment overrides
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database error types
//! - [`repository`] - Book repository and query cursor
//! - [`telemetry`] - Tracing subscriber setup for binaries
//!
//! ## Usage
//!
//! ```rust,ignore
//! use bookstock_core::FieldSet;
//! use bookstock_db::{Database, StoreSettings};
//!
//! let settings = StoreSettings::load(None)?;
//! let db = Database::new(settings.to_db_config()).await?;
//!
//! let id = db
//!     .books()
//!     .insert(&FieldSet::new().with_name("Dune").with_supplier_phone("5551234567"))
//!     .await?;
//!
//! let outcome = db.books().sell_one(id, 0).await?; // NoStockToSell
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod config;
pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;
pub mod telemetry;

// =============================================================================
// Re-exports
// =============================================================================

pub use config::StoreSettings;
pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};
pub use telemetry::init_tracing;

// Repository re-exports for convenience
pub use repository::book::BookRepository;
pub use repository::query::{
    BookCursor, BookFilter, BookQuery, BookRow, Direction, Predicate, SortKey,
};
