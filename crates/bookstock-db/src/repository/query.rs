//! # Book Queries
//!
//! Filter, projection and ordering for reads, plus the [`BookCursor`] that
//! runs them lazily.
//!
//! ## Cursor Model
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  repo.query(BookQuery)                                                  │
//! │       │  builds SQL once, runs nothing                                  │
//! │       ▼                                                                 │
//! │  BookCursor { sql, args, columns }                                      │
//! │       │                                                                 │
//! │       ├── rows()    ──► Stream<BookRow>     (fresh SELECT each call)    │
//! │       ├── records() ──► Stream<BookRecord>                              │
//! │       └── fetch_all()──► Vec<BookRecord>                                │
//! │                                                                         │
//! │  Dropping a stream part-way abandons the read; nothing is written.      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Column names in the generated SQL come from [`BookColumn`] constants;
//! caller-supplied values are always bound, never spliced.

use futures_util::stream::BoxStream;
use futures_util::{StreamExt, TryStreamExt};
use sqlx::query::Query;
use sqlx::sqlite::{SqliteArguments, SqliteRow};
use sqlx::{Row, Sqlite, SqlitePool};

use crate::error::{DbError, DbResult};
use bookstock_core::{BookColumn, BookId, BookRecord, BookUri, FieldValue, Money, TABLE_NAME};

// =============================================================================
// Filter
// =============================================================================

/// One condition on a column.
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    /// `column = value`
    Eq(BookColumn, FieldValue),
    /// Case-insensitive substring match on a text column.
    Like(BookColumn, String),
    /// `column >= value`
    AtLeast(BookColumn, FieldValue),
    /// `column <= value`
    AtMost(BookColumn, FieldValue),
}

/// A conjunction of predicates. Empty matches every book.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BookFilter {
    predicates: Vec<Predicate>,
}

impl BookFilter {
    /// Matches every book.
    pub fn all() -> Self {
        Self::default()
    }

    /// Matches the book with this id.
    pub fn id(id: BookId) -> Self {
        Self::all().and(Predicate::Eq(BookColumn::Id, FieldValue::Integer(id.get())))
    }

    /// Adds a predicate.
    pub fn and(mut self, predicate: Predicate) -> Self {
        self.predicates.push(predicate);
        self
    }

    pub fn eq(self, column: BookColumn, value: impl Into<FieldValue>) -> Self {
        self.and(Predicate::Eq(column, value.into()))
    }

    pub fn name_contains(self, text: impl Into<String>) -> Self {
        self.and(Predicate::Like(BookColumn::Name, text.into()))
    }

    pub fn at_least(self, column: BookColumn, value: impl Into<FieldValue>) -> Self {
        self.and(Predicate::AtLeast(column, value.into()))
    }

    pub fn at_most(self, column: BookColumn, value: impl Into<FieldValue>) -> Self {
        self.and(Predicate::AtMost(column, value.into()))
    }

    /// Books with at least one copy.
    pub fn in_stock(self) -> Self {
        self.at_least(BookColumn::Quantity, 1)
    }

    pub fn is_empty(&self) -> bool {
        self.predicates.is_empty()
    }
}

// =============================================================================
// Ordering
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Asc,
    Desc,
}

/// One `ORDER BY` key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortKey {
    pub column: BookColumn,
    pub direction: Direction,
}

// =============================================================================
// Query
// =============================================================================

/// A read request: filter, projection, ordering.
///
/// ## Example
/// ```rust,ignore
/// let cheap_in_stock = BookQuery::new()
///     .filter(BookFilter::all().in_stock().at_most(BookColumn::Price, 10.0))
///     .project([BookColumn::Name, BookColumn::Price])
///     .order_by(BookColumn::Price, Direction::Asc);
///
/// let rows = db.books().query(cheap_in_stock).fetch_rows().await?;
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BookQuery {
    pub filter: BookFilter,
    pub projection: Option<Vec<BookColumn>>,
    pub ordering: Vec<SortKey>,
    pub limit: Option<u32>,
}

impl BookQuery {
    /// Every column of every book, ordered by id.
    pub fn new() -> Self {
        Self::default()
    }

    /// The books an address refers to: the whole table or one record.
    pub fn for_uri(uri: &BookUri) -> Self {
        match uri.book_id() {
            Some(id) => Self::new().filter(BookFilter::id(id)),
            None => Self::new(),
        }
    }

    pub fn filter(mut self, filter: BookFilter) -> Self {
        self.filter = filter;
        self
    }

    /// Restricts the returned columns. `_id` is always returned.
    pub fn project(mut self, columns: impl IntoIterator<Item = BookColumn>) -> Self {
        self.projection = Some(columns.into_iter().collect());
        self
    }

    pub fn order_by(mut self, column: BookColumn, direction: Direction) -> Self {
        self.ordering.push(SortKey { column, direction });
        self
    }

    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Columns the SELECT returns, `_id` first, in table order.
    fn selected_columns(&self) -> Vec<BookColumn> {
        match &self.projection {
            None => BookColumn::ALL.to_vec(),
            Some(projection) => BookColumn::ALL
                .into_iter()
                .filter(|column| *column == BookColumn::Id || projection.contains(column))
                .collect(),
        }
    }

    /// Renders SQL and the values to bind, in placeholder order.
    fn to_sql(&self, columns: &[BookColumn]) -> (String, Vec<FieldValue>) {
        let column_list = columns
            .iter()
            .map(BookColumn::as_str)
            .collect::<Vec<_>>()
            .join(", ");

        let mut sql = format!("SELECT {} FROM {}", column_list, TABLE_NAME);
        let mut args = Vec::with_capacity(self.filter.predicates.len() + 1);

        if !self.filter.is_empty() {
            let conditions = self
                .filter
                .predicates
                .iter()
                .map(|predicate| match predicate {
                    Predicate::Eq(column, value) => {
                        args.push(value.clone());
                        format!("{} = ?", column)
                    }
                    Predicate::Like(column, text) => {
                        args.push(FieldValue::Text(like_pattern(text)));
                        format!("{} LIKE ? ESCAPE '\\'", column)
                    }
                    Predicate::AtLeast(column, value) => {
                        args.push(value.clone());
                        format!("{} >= ?", column)
                    }
                    Predicate::AtMost(column, value) => {
                        args.push(value.clone());
                        format!("{} <= ?", column)
                    }
                })
                .collect::<Vec<_>>();
            sql.push_str(" WHERE ");
            sql.push_str(&conditions.join(" AND "));
        }

        let mut order = self
            .ordering
            .iter()
            .map(|key| {
                let direction = match key.direction {
                    Direction::Asc => "ASC",
                    Direction::Desc => "DESC",
                };
                format!("{} {}", key.column, direction)
            })
            .collect::<Vec<_>>();
        // _id breaks ties so results are stable between restarts of a cursor
        if !self.ordering.iter().any(|key| key.column == BookColumn::Id) {
            order.push(format!("{} ASC", BookColumn::Id));
        }
        sql.push_str(" ORDER BY ");
        sql.push_str(&order.join(", "));

        if let Some(limit) = self.limit {
            args.push(FieldValue::Integer(limit as i64));
            sql.push_str(" LIMIT ?");
        }

        (sql, args)
    }
}

fn like_pattern(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len() + 2);
    escaped.push('%');
    for c in text.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped.push('%');
    escaped
}

// =============================================================================
// Rows
// =============================================================================

/// A possibly projected row. Columns that were not selected are `None`.
#[derive(Debug, Clone, PartialEq)]
pub struct BookRow {
    pub id: BookId,
    pub name: Option<String>,
    pub price: Option<Money>,
    pub quantity: Option<i64>,
    pub supplier_name: Option<String>,
    pub supplier_phone: Option<String>,
}

impl BookRow {
    /// Converts a row that carries every column into a record.
    pub fn into_record(self) -> DbResult<BookRecord> {
        Ok(BookRecord {
            id: self.id,
            name: self.name.ok_or(DbError::MissingColumn(BookColumn::Name.as_str()))?,
            price: self.price.ok_or(DbError::MissingColumn(BookColumn::Price.as_str()))?,
            quantity: self
                .quantity
                .ok_or(DbError::MissingColumn(BookColumn::Quantity.as_str()))?,
            supplier_name: self
                .supplier_name
                .ok_or(DbError::MissingColumn(BookColumn::SupplierName.as_str()))?,
            supplier_phone: self
                .supplier_phone
                .ok_or(DbError::MissingColumn(BookColumn::SupplierPhone.as_str()))?,
        })
    }
}

fn decode_row(row: &SqliteRow, columns: &[BookColumn]) -> DbResult<BookRow> {
    let mut book = BookRow {
        id: row.try_get(BookColumn::Id.as_str())?,
        name: None,
        price: None,
        quantity: None,
        supplier_name: None,
        supplier_phone: None,
    };

    for column in columns {
        let name = column.as_str();
        match column {
            BookColumn::Id => {}
            BookColumn::Name => book.name = Some(row.try_get(name)?),
            BookColumn::Price => {
                let amount: f64 = row.try_get(name)?;
                book.price = Some(Money::from_decimal(amount).ok_or_else(|| {
                    DbError::Internal(format!("book {} has a non-finite price", book.id))
                })?);
            }
            BookColumn::Quantity => book.quantity = Some(row.try_get(name)?),
            BookColumn::SupplierName => book.supplier_name = Some(row.try_get(name)?),
            BookColumn::SupplierPhone => book.supplier_phone = Some(row.try_get(name)?),
        }
    }

    Ok(book)
}

pub(crate) fn bind_value<'q>(
    query: Query<'q, Sqlite, SqliteArguments<'q>>,
    value: &'q FieldValue,
) -> Query<'q, Sqlite, SqliteArguments<'q>> {
    match value {
        FieldValue::Integer(v) => query.bind(*v),
        FieldValue::Real(v) => query.bind(*v),
        FieldValue::Text(v) => query.bind(v.as_str()),
    }
}

// =============================================================================
// Cursor
// =============================================================================

/// A prepared read. Each call to [`rows`](Self::rows) or
/// [`records`](Self::records) runs the SELECT afresh.
#[derive(Debug, Clone)]
pub struct BookCursor {
    pool: SqlitePool,
    sql: String,
    args: Vec<FieldValue>,
    columns: Vec<BookColumn>,
}

impl BookCursor {
    pub(crate) fn new(pool: SqlitePool, query: &BookQuery) -> Self {
        let columns = query.selected_columns();
        let (sql, args) = query.to_sql(&columns);
        BookCursor {
            pool,
            sql,
            args,
            columns,
        }
    }

    /// The SQL this cursor runs.
    pub fn sql(&self) -> &str {
        &self.sql
    }

    /// Columns present in each row.
    pub fn columns(&self) -> &[BookColumn] {
        &self.columns
    }

    /// Opens a lazy stream of (possibly projected) rows.
    pub fn rows(&self) -> BoxStream<'_, DbResult<BookRow>> {
        let query = self
            .args
            .iter()
            .fold(sqlx::query(&self.sql), |query, value| bind_value(query, value));
        let columns = &self.columns;

        query
            .fetch(&self.pool)
            .map(move |row| decode_row(&row?, columns))
            .boxed()
    }

    /// Opens a lazy stream of full records.
    ///
    /// Yields [`DbError::MissingColumn`] if the query projected columns away.
    pub fn records(&self) -> BoxStream<'_, DbResult<BookRecord>> {
        self.rows()
            .map(|row| row.and_then(BookRow::into_record))
            .boxed()
    }

    /// Collects every row.
    pub async fn fetch_rows(&self) -> DbResult<Vec<BookRow>> {
        self.rows().try_collect().await
    }

    /// Collects every record.
    pub async fn fetch_all(&self) -> DbResult<Vec<BookRecord>> {
        self.records().try_collect().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sql_for(query: &BookQuery) -> (String, Vec<FieldValue>) {
        query.to_sql(&query.selected_columns())
    }

    #[test]
    fn test_default_query_selects_everything() {
        let (sql, args) = sql_for(&BookQuery::new());
        assert_eq!(
            sql,
            "SELECT _id, product_name, price, quantity, supplier_name, supplier_phone_number \
             FROM books ORDER BY _id ASC"
        );
        assert!(args.is_empty());
    }

    #[test]
    fn test_projection_always_keeps_id() {
        let query = BookQuery::new().project([BookColumn::Quantity, BookColumn::Name]);
        assert_eq!(
            query.selected_columns(),
            vec![BookColumn::Id, BookColumn::Name, BookColumn::Quantity]
        );
    }

    #[test]
    fn test_filter_binds_values_in_order() {
        let query = BookQuery::new()
            .filter(
                BookFilter::all()
                    .name_contains("50%")
                    .in_stock()
                    .at_most(BookColumn::Price, 9.99),
            )
            .order_by(BookColumn::Price, Direction::Desc)
            .limit(10);

        let (sql, args) = sql_for(&query);
        assert!(sql.ends_with(
            "WHERE product_name LIKE ? ESCAPE '\\' AND quantity >= ? AND price <= ? \
             ORDER BY price DESC, _id ASC LIMIT ?"
        ));
        assert_eq!(
            args,
            vec![
                FieldValue::Text("%50\\%%".to_string()),
                FieldValue::Integer(1),
                FieldValue::Real(9.99),
                FieldValue::Integer(10),
            ]
        );
    }

    #[test]
    fn test_uri_query() {
        let item = BookQuery::for_uri(&BookUri::Item(BookId::new(3)));
        assert_eq!(item.filter, BookFilter::id(BookId::new(3)));
        assert!(BookQuery::for_uri(&BookUri::Collection).filter.is_empty());
    }

    #[test]
    fn test_incomplete_row_is_not_a_record() {
        let row = BookRow {
            id: BookId::new(1),
            name: Some("Dune".to_string()),
            price: None,
            quantity: Some(1),
            supplier_name: None,
            supplier_phone: None,
        };
        assert!(matches!(row.into_record(), Err(DbError::MissingColumn("price"))));
    }
}
