//! # Repository Module
//!
//! Database access for the inventory store.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Repository Pattern                                   │
//! │                                                                         │
//! │  Caller (UI, CLI, service)                                             │
//! │       │                                                                 │
//! │       │  db.books().insert(&fields)                                    │
//! │       ▼                                                                 │
//! │  BookRepository                                                        │
//! │  ├── insert(&self, fields)        → BookId                             │
//! │  ├── query(&self, BookQuery)      → BookCursor                         │
//! │  ├── update(&self, id, fields)    → rows affected                      │
//! │  ├── delete(&self, id)            → rows affected                      │
//! │  └── sell_one(&self, id, seen)    → SaleOutcome                        │
//! │       │                                                                 │
//! │       │  validation (bookstock-core), then SQL                          │
//! │       ▼                                                                 │
//! │  SQLite Database                                                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`BookRepository`](book::BookRepository) - Book CRUD and sales
//! - [`query`] - Read requests and the lazy cursor

pub mod book;
pub mod query;
