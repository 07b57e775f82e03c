//! # Content Addressing
//!
//! Books are addressed externally as `content://<authority>/books` (the
//! whole table) or `content://<authority>/books/{id}` (one record). A
//! presentation layer builds these to tell the store what an edit screen or
//! list row refers to.

use std::fmt;
use std::str::FromStr;

use crate::error::UriError;
use crate::schema::TABLE_NAME;
use crate::types::BookId;

/// Authority of the books provider.
pub const CONTENT_AUTHORITY: &str = "com.example.android.inventoryapp";

/// Path segment for the books table.
pub const PATH_BOOKS: &str = TABLE_NAME;

const SCHEME: &str = "content://";

/// A parsed book address.
///
/// ## Example
/// ```rust
/// use bookstock_core::uri::BookUri;
/// use bookstock_core::BookId;
///
/// let uri = BookUri::for_book(BookId::new(7));
/// assert_eq!(uri.to_string(), "content://com.example.android.inventoryapp/books/7");
///
/// let parsed: BookUri = "content://com.example.android.inventoryapp/books/7".parse().unwrap();
/// assert_eq!(parsed.book_id(), Some(BookId::new(7)));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BookUri {
    /// The whole books table.
    Collection,

    /// A single book.
    Item(BookId),
}

impl BookUri {
    pub fn for_book(id: BookId) -> Self {
        BookUri::Item(id)
    }

    /// Returns the book id for item URIs.
    pub fn book_id(&self) -> Option<BookId> {
        match self {
            BookUri::Collection => None,
            BookUri::Item(id) => Some(*id),
        }
    }
}

impl fmt::Display for BookUri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}/{}", SCHEME, CONTENT_AUTHORITY, PATH_BOOKS)?;
        if let BookUri::Item(id) = self {
            write!(f, "/{}", id)?;
        }
        Ok(())
    }
}

impl FromStr for BookUri {
    type Err = UriError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let rest = s
            .strip_prefix(SCHEME)
            .ok_or_else(|| UriError::NotContentUri(s.to_string()))?;

        let (authority, path) = rest.split_once('/').unwrap_or((rest, ""));
        if authority != CONTENT_AUTHORITY {
            return Err(UriError::UnknownAuthority(authority.to_string()));
        }

        let mut segments = path.trim_end_matches('/').split('/');
        if segments.next() != Some(PATH_BOOKS) {
            return Err(UriError::UnknownPath(path.to_string()));
        }

        match (segments.next(), segments.next()) {
            (None, _) => Ok(BookUri::Collection),
            (Some(id), None) => id
                .parse::<i64>()
                .map(|id| BookUri::Item(BookId::new(id)))
                .map_err(|_| UriError::InvalidId(id.to_string())),
            (Some(_), Some(_)) => Err(UriError::UnknownPath(path.to_string())),
        }
    }
}
