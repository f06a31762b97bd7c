//! Book record model and related types.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

/// Number of positional fields in a bootstrap row
pub const ROW_FIELDS: usize = 10;

/// One catalog entry held by the in-memory store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct BookRecord {
    /// External identifier (not required to be unique)
    #[serde(rename = "book_id")]
    pub id: String,
    pub title: String,
    /// Author names, usually separated by "/"
    pub authors: String,
    #[serde(default)]
    pub average_rating: f64,
    pub isbn: String,
    #[serde(rename = "isbn_13")]
    pub isbn13: String,
    pub language_code: String,
    pub num_pages: u32,
    #[serde(default)]
    pub ratings_count: u64,
    #[serde(default)]
    pub reviews_count: u64,
}

impl BookRecord {
    /// Map a positional bootstrap row onto a record.
    ///
    /// Numeric columns that do not parse are left at zero. The row must
    /// carry at least [`ROW_FIELDS`] columns; extra columns are ignored.
    pub fn from_row<S: AsRef<str>>(row: &[S]) -> Option<Self> {
        if row.len() < ROW_FIELDS {
            return None;
        }
        let text = |i: usize| row[i].as_ref().to_string();
        let number = |i: usize| row[i].as_ref().trim();

        Some(Self {
            id: text(0),
            title: text(1),
            authors: text(2),
            average_rating: number(3).parse().unwrap_or_default(),
            isbn: text(4),
            isbn13: text(5),
            language_code: text(6),
            num_pages: number(7).parse().unwrap_or_default(),
            ratings_count: number(8).parse().unwrap_or_default(),
            reviews_count: number(9).parse().unwrap_or_default(),
        })
    }
}

/// Create book request
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateBook {
    #[validate(length(min = 1, message = "you must supply book_id"))]
    pub book_id: String,
    #[validate(length(min = 1, message = "you must supply title"))]
    pub title: String,
    #[validate(length(min = 1, message = "you must supply authors"))]
    pub authors: String,
    pub average_rating: Option<f64>,
    #[validate(length(min = 1, message = "you must supply isbn"))]
    pub isbn: String,
    #[validate(length(min = 1, message = "you must supply isbn_13"))]
    pub isbn_13: String,
    #[validate(length(min = 1, message = "you must supply language_code"))]
    pub language_code: String,
    #[validate(required(message = "you must supply num_pages"))]
    pub num_pages: Option<u32>,
    #[serde(alias = "ratings")]
    pub ratings_count: Option<u64>,
    #[serde(alias = "reviews")]
    pub reviews_count: Option<u64>,
}

impl From<CreateBook> for BookRecord {
    fn from(book: CreateBook) -> Self {
        Self {
            id: book.book_id,
            title: book.title,
            authors: book.authors,
            average_rating: book.average_rating.unwrap_or_default(),
            isbn: book.isbn,
            isbn13: book.isbn_13,
            language_code: book.language_code,
            num_pages: book.num_pages.unwrap_or_default(),
            ratings_count: book.ratings_count.unwrap_or_default(),
            reviews_count: book.reviews_count.unwrap_or_default(),
        }
    }
}
