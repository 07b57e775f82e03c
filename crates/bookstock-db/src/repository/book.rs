//! # Book Repository
//!
//! Validated reads and writes against the `books` table, plus the
//! stock-decrement sale.
//!
//! ## Key Operations
//! - Insert with defaults, returning the new id
//! - Lazy, restartable queries (see [`super::query`])
//! - Partial update and hard delete by id, returning rows affected
//! - `sell_one`: take one copy out of stock
//!
//! ## Stock-Decrement Sale
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    sell_one(id, observed_quantity)                      │
//! │                                                                         │
//! │  observed_quantity comes from a record the caller read earlier          │
//! │       │                                                                 │
//! │       ├── 0 ──────────────► NoStockToSell   (nothing written)          │
//! │       │                                                                 │
//! │       └── q > 0                                                         │
//! │             │                                                           │
//! │             ▼                                                           │
//! │        update(id, { quantity: q - 1 })                                  │
//! │             │                                                           │
//! │             ├── 0 rows ──► SaleFailed                                  │
//! │             └── 1 row  ──► SaleSucceeded { remaining: q - 1 }          │
//! │                                                                         │
//! │  The stored quantity is not re-read. Two sales from the same observed   │
//! │  value both write q - 1.                                                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use sqlx::{QueryBuilder, Sqlite, SqlitePool};
use tracing::{debug, warn};

use crate::error::{DbError, DbResult};
use crate::repository::query::{BookCursor, BookFilter, BookQuery};
use bookstock_core::inventory::{plan_sale, SalePlan};
use bookstock_core::validation::{validate_changes, validate_new_book, BookChanges};
use bookstock_core::{BookColumn, BookId, BookRecord, BookUri, FieldSet, SaleOutcome, TABLE_NAME};

/// Repository for book database operations.
///
/// ## Usage
/// ```rust,ignore
/// let repo = db.books();
///
/// let id = repo
///     .insert(&FieldSet::new().with_name("Dune").with_supplier_phone("5551234567"))
///     .await?;
///
/// let book = repo.get_by_id(id).await?;
/// ```
#[derive(Debug, Clone)]
pub struct BookRepository {
    pool: SqlitePool,
}

impl BookRepository {
    /// Creates a new BookRepository.
    pub fn new(pool: SqlitePool) -> Self {
        BookRepository { pool }
    }

    /// Validates a field-set and inserts a new book.
    ///
    /// ## Defaults
    /// - price: `0.00`
    /// - quantity: `0`
    /// - supplier name: empty
    ///
    /// ## Errors
    /// - [`DbError::Validation`] if the field-set breaks a rule. Nothing is
    ///   written.
    /// - [`DbError::InsertFailed`] if SQLite rejects the row or returns no id.
    pub async fn insert(&self, fields: &FieldSet) -> DbResult<BookId> {
        let book = validate_new_book(fields)?;

        debug!(name = %book.name, quantity = book.quantity, "Inserting book");

        let sql = format!(
            "INSERT INTO {} ({}, {}, {}, {}, {}) VALUES (?1, ?2, ?3, ?4, ?5) RETURNING {}",
            TABLE_NAME,
            BookColumn::Name,
            BookColumn::Price,
            BookColumn::Quantity,
            BookColumn::SupplierName,
            BookColumn::SupplierPhone,
            BookColumn::Id,
        );

        let inserted = sqlx::query_scalar::<_, BookId>(&sql)
            .bind(book.name.as_str())
            .bind(book.price.to_decimal())
            .bind(book.quantity)
            .bind(book.supplier_name.as_str())
            .bind(book.supplier_phone.as_str())
            .fetch_optional(&self.pool)
            .await;

        match inserted {
            Ok(Some(id)) => {
                debug!(id = %id, "Book inserted");
                Ok(id)
            }
            Ok(None) => {
                warn!(name = %book.name, "Insert returned no id");
                Err(DbError::insert_failed("no id returned"))
            }
            Err(err) => match DbError::from(err) {
                DbError::ConstraintViolation(reason) => {
                    warn!(name = %book.name, reason = %reason, "Insert rejected");
                    Err(DbError::insert_failed(reason))
                }
                other => Err(other),
            },
        }
    }

    /// Prepares a read. Nothing runs until the cursor is consumed.
    pub fn query(&self, query: BookQuery) -> BookCursor {
        let cursor = BookCursor::new(self.pool.clone(), &query);
        debug!(sql = %cursor.sql(), "Prepared book query");
        cursor
    }

    /// Prepares a read of whatever a content address refers to.
    pub fn query_uri(&self, uri: &BookUri) -> BookCursor {
        self.query(BookQuery::for_uri(uri))
    }

    /// Gets a book by its ID.
    pub async fn get_by_id(&self, id: BookId) -> DbResult<Option<BookRecord>> {
        debug!(id = %id, "Getting book by ID");

        let mut books = self
            .query(BookQuery::new().filter(BookFilter::id(id)).limit(1))
            .fetch_all()
            .await?;

        Ok(books.pop())
    }

    /// Counts every book in the table.
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {}", TABLE_NAME))
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    /// Validates the supplied fields and writes only those.
    ///
    /// Returns the number of rows changed: `1`, or `0` if no book has this id.
    ///
    /// ## Errors
    /// - [`DbError::Validation`] for a rule violation, a supplied `_id`, or an
    ///   empty field-set. Nothing is written.
    pub async fn update(&self, id: BookId, fields: &FieldSet) -> DbResult<u64> {
        let changes = validate_changes(fields)?;
        self.apply_changes(id, &changes).await
    }

    async fn apply_changes(&self, id: BookId, changes: &BookChanges) -> DbResult<u64> {
        debug!(id = %id, "Updating book");

        let mut builder: QueryBuilder<Sqlite> =
            QueryBuilder::new(format!("UPDATE {} SET ", TABLE_NAME));
        let mut assignments = builder.separated(", ");

        if let Some(name) = &changes.name {
            assignments.push(format!("{} = ", BookColumn::Name));
            assignments.push_bind_unseparated(name.as_str());
        }
        if let Some(price) = changes.price {
            assignments.push(format!("{} = ", BookColumn::Price));
            assignments.push_bind_unseparated(price.to_decimal());
        }
        if let Some(quantity) = changes.quantity {
            assignments.push(format!("{} = ", BookColumn::Quantity));
            assignments.push_bind_unseparated(quantity);
        }
        if let Some(supplier_name) = &changes.supplier_name {
            assignments.push(format!("{} = ", BookColumn::SupplierName));
            assignments.push_bind_unseparated(supplier_name.as_str());
        }
        if let Some(supplier_phone) = &changes.supplier_phone {
            assignments.push(format!("{} = ", BookColumn::SupplierPhone));
            assignments.push_bind_unseparated(supplier_phone.as_str());
        }

        builder.push(format!(" WHERE {} = ", BookColumn::Id));
        builder.push_bind(id);

        let result = builder.build().execute(&self.pool).await?;
        let rows = result.rows_affected();

        debug!(id = %id, rows = rows, "Book updated");
        Ok(rows)
    }

    /// Deletes a book. Returns `1`, or `0` if it was already gone.
    pub async fn delete(&self, id: BookId) -> DbResult<u64> {
        debug!(id = %id, "Deleting book");

        let sql = format!("DELETE FROM {} WHERE {} = ?1", TABLE_NAME, BookColumn::Id);
        let result = sqlx::query(&sql).bind(id).execute(&self.pool).await?;
        let rows = result.rows_affected();

        debug!(id = %id, rows = rows, "Book deleted");
        Ok(rows)
    }

    /// Sells one copy, given the quantity the caller last saw for this book.
    ///
    /// ## Outcomes
    /// - [`SaleOutcome::NoStockToSell`]: observed quantity was zero
    /// - [`SaleOutcome::SaleFailed`]: the book no longer exists
    /// - [`SaleOutcome::SaleSucceeded`]: quantity is now `observed - 1`
    ///
    /// A negative observed quantity is a [`DbError::Validation`].
    pub async fn sell_one(&self, id: BookId, observed_quantity: i64) -> DbResult<SaleOutcome> {
        let new_quantity = match plan_sale(observed_quantity)? {
            SalePlan::NothingToSell => {
                debug!(id = %id, "No stock to sell");
                return Ok(SaleOutcome::NoStockToSell);
            }
            SalePlan::Write { new_quantity } => new_quantity,
        };

        let rows = self
            .update(id, &FieldSet::new().with_quantity(new_quantity))
            .await?;

        if rows == 0 {
            warn!(id = %id, "Sale failed: book not found");
            return Ok(SaleOutcome::SaleFailed);
        }

        debug!(id = %id, remaining = new_quantity, "Sold one copy");
        Ok(SaleOutcome::SaleSucceeded {
            remaining: new_quantity,
        })
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use crate::repository::query::Direction;
    use bookstock_core::{Money, ValidationError};
    use futures_util::StreamExt;

    async fn repo() -> BookRepository {
        Database::new(DbConfig::in_memory()).await.unwrap().books()
    }

    fn dune() -> FieldSet {
        FieldSet::new()
            .with_name("Dune")
            .with_price(12.5)
            .with_quantity(3)
            .with_supplier_name("Ace")
            .with_supplier_phone("5551234567")
    }

    fn book(name: &str, price: f64, quantity: i64) -> FieldSet {
        FieldSet::new()
            .with_name(name)
            .with_price(price)
            .with_quantity(quantity)
            .with_supplier_phone("5550001111")
    }

    // -------------------------------------------------------------------------
    // Insert
    // -------------------------------------------------------------------------

    #[tokio::test]
    async fn test_insert_requires_name() {
        let repo = repo().await;

        let fields = FieldSet::new().with_supplier_phone("5551234567").with_quantity(1);
        let err = repo.insert(&fields).await.unwrap_err();

        assert!(matches!(
            err,
            DbError::Validation(ValidationError::Required { ref field }) if field == "name"
        ));
        assert_eq!(repo.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_insert_rejects_short_phone() {
        let repo = repo().await;

        let fields = FieldSet::new().with_name("Dune").with_supplier_phone("555123");
        let err = repo.insert(&fields).await.unwrap_err();

        assert!(matches!(
            err,
            DbError::Validation(ValidationError::TooShort { min: 10, .. })
        ));
        assert_eq!(repo.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_insert_applies_defaults() {
        let repo = repo().await;

        let id = repo
            .insert(&FieldSet::new().with_name("Emma").with_supplier_phone("5551234567"))
            .await
            .unwrap();
        let stored = repo.get_by_id(id).await.unwrap().unwrap();

        assert_eq!(stored.price, Money::zero());
        assert_eq!(stored.quantity, 0);
        assert_eq!(stored.supplier_name, "");
    }

    #[tokio::test]
    async fn test_insert_then_read_back() {
        let repo = repo().await;

        let id = repo.insert(&dune()).await.unwrap();
        let books = repo.query(BookQuery::new().filter(BookFilter::id(id))).fetch_all().await.unwrap();

        assert_eq!(books.len(), 1);
        let stored = &books[0];
        assert_eq!(stored.id, id);
        assert_eq!(stored.name, "Dune");
        assert_eq!(stored.price, Money::from_cents(1250));
        assert_eq!(stored.quantity, 3);
        assert_eq!(stored.supplier_name, "Ace");
        assert_eq!(stored.supplier_phone, "5551234567");
    }

    #[tokio::test]
    async fn test_insert_rejects_out_of_range_price() {
        let repo = repo().await;

        let fields = FieldSet::new()
            .with_name("Dune")
            .with_price(1e300)
            .with_supplier_phone("1234567890");
        let err = repo.insert(&fields).await.unwrap_err();

        assert!(matches!(
            err,
            DbError::Validation(ValidationError::InvalidFormat { .. })
        ));
        assert_eq!(repo.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_insert_blank_form_fields_take_defaults() {
        let repo = repo().await;

        let fields = FieldSet::new()
            .with_name("Dune")
            .with_price("")
            .with_quantity("")
            .with_supplier_phone("1234567890");
        let id = repo.insert(&fields).await.unwrap();

        let stored = repo.get_by_id(id).await.unwrap().unwrap();
        assert_eq!(stored.price, Money::zero());
        assert_eq!(stored.quantity, 0);
    }

    #[tokio::test]
    async fn test_huge_stock_has_no_value() {
        let repo = repo().await;

        let id = repo.insert(&book("Dune", 12.5, i64::MAX / 10)).await.unwrap();
        let stored = repo.get_by_id(id).await.unwrap().unwrap();

        assert_eq!(stored.quantity, i64::MAX / 10);
        assert_eq!(stored.stock_value(), None);
    }

    #[tokio::test]
    async fn test_rejected_row_is_insert_failed() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        sqlx::query(
            "CREATE TRIGGER reject_books BEFORE INSERT ON books \
             BEGIN SELECT RAISE(ABORT, 'CHECK constraint failed: reject_books'); END",
        )
        .execute(db.pool())
        .await
        .unwrap();

        let repo = db.books();
        let err = repo.insert(&dune()).await.unwrap_err();

        assert!(matches!(
            err,
            DbError::InsertFailed { ref reason } if reason.contains("reject_books")
        ));
        assert_eq!(repo.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_ids_are_not_reused() {
        let repo = repo().await;

        let first = repo.insert(&dune()).await.unwrap();
        assert_eq!(repo.delete(first).await.unwrap(), 1);
        let second = repo.insert(&dune()).await.unwrap();

        assert!(second.get() > first.get());
    }

    // -------------------------------------------------------------------------
    // Update / Delete
    // -------------------------------------------------------------------------

    #[tokio::test]
    async fn test_update_writes_only_supplied_fields() {
        let repo = repo().await;
        let id = repo.insert(&dune()).await.unwrap();

        let rows = repo
            .update(id, &FieldSet::new().with_price("9.99"))
            .await
            .unwrap();
        assert_eq!(rows, 1);

        let stored = repo.get_by_id(id).await.unwrap().unwrap();
        assert_eq!(stored.price, Money::from_cents(999));
        assert_eq!(stored.name, "Dune");
        assert_eq!(stored.quantity, 3);
    }

    #[tokio::test]
    async fn test_update_rejects_short_phone() {
        let repo = repo().await;
        let id = repo.insert(&dune()).await.unwrap();

        let err = repo
            .update(id, &FieldSet::new().with_supplier_phone("123"))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            DbError::Validation(ValidationError::TooShort { .. })
        ));

        let stored = repo.get_by_id(id).await.unwrap().unwrap();
        assert_eq!(stored.supplier_phone, "5551234567");
    }

    #[tokio::test]
    async fn test_update_with_no_fields_is_rejected() {
        let repo = repo().await;
        let id = repo.insert(&dune()).await.unwrap();

        let err = repo.update(id, &FieldSet::new()).await.unwrap_err();
        assert!(matches!(err, DbError::Validation(ValidationError::NoChanges)));
    }

    #[tokio::test]
    async fn test_update_ignores_blank_form_fields() {
        let repo = repo().await;
        let id = repo.insert(&dune()).await.unwrap();

        let fields = FieldSet::new()
            .with_name("Dune Messiah")
            .with_price("")
            .with_quantity(" ")
            .with_supplier_name("");
        assert_eq!(repo.update(id, &fields).await.unwrap(), 1);

        let stored = repo.get_by_id(id).await.unwrap().unwrap();
        assert_eq!(stored.name, "Dune Messiah");
        assert_eq!(stored.price, Money::from_cents(1250));
        assert_eq!(stored.quantity, 3);
        assert_eq!(stored.supplier_name, "Ace");
    }

    #[tokio::test]
    async fn test_update_missing_book_affects_nothing() {
        let repo = repo().await;

        let rows = repo
            .update(BookId::new(42), &FieldSet::new().with_quantity(5))
            .await
            .unwrap();
        assert_eq!(rows, 0);
    }

    #[tokio::test]
    async fn test_delete_twice() {
        let repo = repo().await;
        let id = repo.insert(&dune()).await.unwrap();

        assert_eq!(repo.delete(id).await.unwrap(), 1);
        assert_eq!(repo.delete(id).await.unwrap(), 0);
        assert!(repo.get_by_id(id).await.unwrap().is_none());
    }

    // -------------------------------------------------------------------------
    // Sale
    // -------------------------------------------------------------------------

    #[tokio::test]
    async fn test_sell_one_decrements() {
        let repo = repo().await;
        let id = repo.insert(&book("Emma", 4.0, 5)).await.unwrap();

        let outcome = repo.sell_one(id, 5).await.unwrap();
        assert_eq!(outcome, SaleOutcome::SaleSucceeded { remaining: 4 });

        let stored = repo.get_by_id(id).await.unwrap().unwrap();
        assert_eq!(stored.quantity, 4);
    }

    #[tokio::test]
    async fn test_sell_one_with_nothing_in_stock() {
        let repo = repo().await;
        let id = repo.insert(&book("Emma", 4.0, 0)).await.unwrap();

        let outcome = repo.sell_one(id, 0).await.unwrap();
        assert_eq!(outcome, SaleOutcome::NoStockToSell);
        assert_eq!(repo.get_by_id(id).await.unwrap().unwrap().quantity, 0);
    }

    #[tokio::test]
    async fn test_sell_one_for_deleted_book() {
        let repo = repo().await;
        let id = repo.insert(&book("Emma", 4.0, 2)).await.unwrap();
        repo.delete(id).await.unwrap();

        let outcome = repo.sell_one(id, 2).await.unwrap();
        assert_eq!(outcome, SaleOutcome::SaleFailed);
    }

    #[tokio::test]
    async fn test_sell_one_rejects_negative_observation() {
        let repo = repo().await;
        let id = repo.insert(&book("Emma", 4.0, 2)).await.unwrap();

        let err = repo.sell_one(id, -1).await.unwrap_err();
        assert!(matches!(err, DbError::Validation(ValidationError::Negative { .. })));
    }

    #[tokio::test]
    async fn test_sell_one_trusts_the_observed_quantity() {
        let repo = repo().await;
        let id = repo.insert(&book("Emma", 4.0, 5)).await.unwrap();

        // Two sellers both saw 5; the second write wins with the same value.
        assert_eq!(
            repo.sell_one(id, 5).await.unwrap(),
            SaleOutcome::SaleSucceeded { remaining: 4 }
        );
        assert_eq!(
            repo.sell_one(id, 5).await.unwrap(),
            SaleOutcome::SaleSucceeded { remaining: 4 }
        );
        assert_eq!(repo.get_by_id(id).await.unwrap().unwrap().quantity, 4);
    }

    #[tokio::test]
    async fn test_dune_sells_out() {
        let repo = repo().await;
        let id = repo.insert(&dune()).await.unwrap();

        for expected in [2, 1, 0] {
            let observed = repo.get_by_id(id).await.unwrap().unwrap().quantity;
            assert_eq!(
                repo.sell_one(id, observed).await.unwrap(),
                SaleOutcome::SaleSucceeded { remaining: expected }
            );
        }

        let sold_out = repo.get_by_id(id).await.unwrap().unwrap();
        assert!(!sold_out.in_stock());
        assert_eq!(
            repo.sell_one(id, sold_out.quantity).await.unwrap(),
            SaleOutcome::NoStockToSell
        );
    }

    // -------------------------------------------------------------------------
    // Query
    // -------------------------------------------------------------------------

    #[tokio::test]
    async fn test_projection_returns_only_requested_columns() {
        let repo = repo().await;
        let id = repo.insert(&dune()).await.unwrap();

        let cursor = repo.query(BookQuery::new().project([BookColumn::Name]));
        let rows = cursor.fetch_rows().await.unwrap();

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].id, id);
        assert_eq!(rows[0].name.as_deref(), Some("Dune"));
        assert!(rows[0].price.is_none());
        assert!(rows[0].quantity.is_none());

        assert!(matches!(
            cursor.fetch_all().await,
            Err(DbError::MissingColumn(_))
        ));
    }

    #[tokio::test]
    async fn test_filter_and_ordering() {
        let repo = repo().await;
        repo.insert(&book("Dune", 12.5, 3)).await.unwrap();
        repo.insert(&book("Dune Messiah", 9.0, 0)).await.unwrap();
        repo.insert(&book("Emma", 4.0, 7)).await.unwrap();
        repo.insert(&book("Children of Dune", 11.0, 2)).await.unwrap();

        let names = |books: Vec<BookRecord>| books.into_iter().map(|b| b.name).collect::<Vec<_>>();

        let in_stock_dunes = repo
            .query(
                BookQuery::new()
                    .filter(BookFilter::all().name_contains("dune").in_stock())
                    .order_by(BookColumn::Price, Direction::Desc),
            )
            .fetch_all()
            .await
            .unwrap();
        assert_eq!(names(in_stock_dunes), vec!["Dune", "Children of Dune"]);

        let cheap = repo
            .query(BookQuery::new().filter(BookFilter::all().at_most(BookColumn::Price, 9.0)))
            .fetch_all()
            .await
            .unwrap();
        assert_eq!(names(cheap), vec!["Dune Messiah", "Emma"]);
    }

    #[tokio::test]
    async fn test_cursor_is_restartable() {
        let repo = repo().await;
        repo.insert(&book("Dune", 12.5, 3)).await.unwrap();
        let cursor = repo.query(BookQuery::new());

        assert_eq!(cursor.fetch_all().await.unwrap().len(), 1);

        repo.insert(&book("Emma", 4.0, 7)).await.unwrap();
        assert_eq!(cursor.fetch_all().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_dropping_stream_has_no_side_effects() {
        let repo = repo().await;
        repo.insert(&book("Dune", 12.5, 3)).await.unwrap();
        repo.insert(&book("Emma", 4.0, 7)).await.unwrap();

        let cursor = repo.query(BookQuery::new());
        {
            let mut records = cursor.records();
            let first = records.next().await.unwrap().unwrap();
            assert_eq!(first.name, "Dune");
        }

        assert_eq!(repo.count().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_query_by_uri() {
        let repo = repo().await;
        let id = repo.insert(&dune()).await.unwrap();
        repo.insert(&book("Emma", 4.0, 7)).await.unwrap();

        let uri: BookUri = BookUri::for_book(id).to_string().parse().unwrap();
        let books = repo.query_uri(&uri).fetch_all().await.unwrap();
        assert_eq!(books.len(), 1);
        assert_eq!(books[0].id, id);

        let all = repo.query_uri(&BookUri::Collection).fetch_all().await.unwrap();
        assert_eq!(all.len(), 2);
    }
}
