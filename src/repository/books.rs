//! In-memory book store.
//!
//! All records live in one `Vec` behind a `RwLock`. Listing, search and
//! lookup take the shared lock; insert and delete hold the exclusive lock
//! across their whole check-and-mutate sequence.

use std::{
    sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard},
    time::Instant,
};

use crate::{
    error::{IsbnField, StoreError, StoreResult},
    models::book::{BookRecord, ROW_FIELDS},
};

use super::source::RecordSource;

/// Drop the first `skip` books, then keep at most `limit` (0 = no limit).
pub fn paginate(books: &[BookRecord], limit: usize, skip: usize) -> Vec<BookRecord> {
    if skip >= books.len() {
        return Vec::new();
    }
    let remaining = &books[skip..];
    let take = if limit == 0 {
        remaining.len()
    } else {
        limit.min(remaining.len())
    };
    remaining[..take].to_vec()
}

/// Case-insensitive substring test; an empty fragment matches everything.
fn contains_ignore_case(haystack: &str, needle_lower: &str) -> bool {
    needle_lower.is_empty() || haystack.to_lowercase().contains(needle_lower)
}

#[derive(Clone, Default)]
pub struct BooksRepository {
    store: Arc<RwLock<Vec<BookRecord>>>,
}

impl BooksRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store directly from records (duplicates are not checked).
    pub fn with_books(books: Vec<BookRecord>) -> Self {
        Self {
            store: Arc::new(RwLock::new(books)),
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, Vec<BookRecord>> {
        self.store.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Vec<BookRecord>> {
        self.store.write().unwrap_or_else(PoisonError::into_inner)
    }

    // =========================================================================
    // BOOTSTRAP
    // =========================================================================

    /// Replace the store contents with the rows of `source`.
    ///
    /// Rows are appended in source order. A row repeating an ISBN or ISBN-13
    /// already loaded is skipped. Returns the number of records loaded.
    pub fn initialize(&self, source: &dyn RecordSource) -> StoreResult<usize> {
        let start = Instant::now();
        let rows = source.rows()?;

        let mut books: Vec<BookRecord> = Vec::with_capacity(rows.len());
        for (index, row) in rows.iter().enumerate() {
            let book = BookRecord::from_row(row.as_slice()).ok_or_else(|| {
                StoreError::SourceUnavailable(format!(
                    "row {} has {} fields, expected {}",
                    index + 1,
                    row.len(),
                    ROW_FIELDS
                ))
            })?;

            if let Some((field, value)) = find_conflict(&books, &book) {
                tracing::warn!(
                    "Skipping bootstrap row {}: {} {} already loaded",
                    index + 1,
                    field,
                    value
                );
                continue;
            }
            books.push(book);
        }

        let count = books.len();
        *self.write() = books;

        tracing::info!("Loading {} books took {:?}", count, start.elapsed());
        Ok(count)
    }

    // =========================================================================
    // READ
    // =========================================================================

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    /// Every book in store order, paginated.
    pub fn get_all(&self, limit: usize, skip: usize) -> Vec<BookRecord> {
        paginate(&self.read(), limit, skip)
    }

    pub fn search_by_author(&self, fragment: &str, limit: usize, skip: usize) -> Vec<BookRecord> {
        self.filter(fragment, limit, skip, |book| book.authors.as_str())
    }

    pub fn search_by_title(&self, fragment: &str, limit: usize, skip: usize) -> Vec<BookRecord> {
        self.filter(fragment, limit, skip, |book| book.title.as_str())
    }

    fn filter<F>(&self, fragment: &str, limit: usize, skip: usize, field: F) -> Vec<BookRecord>
    where
        F: Fn(&BookRecord) -> &str,
    {
        let fragment = fragment.to_lowercase();
        let books = self.read();
        let matching = books
            .iter()
            .filter(|&book| contains_ignore_case(field(book), &fragment))
            .skip(skip);

        if limit == 0 {
            matching.cloned().collect()
        } else {
            matching.take(limit).cloned().collect()
        }
    }

    /// Exact, case-sensitive ISBN lookup.
    pub fn get_by_isbn(&self, isbn: &str) -> StoreResult<BookRecord> {
        self.read()
            .iter()
            .find(|book| book.isbn == isbn)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(isbn.to_string()))
    }

    // =========================================================================
    // WRITE
    // =========================================================================

    /// Append a book unless its ISBN or ISBN-13 is already taken.
    pub fn insert(&self, book: BookRecord) -> StoreResult<()> {
        let mut books = self.write();

        if let Some((field, value)) = find_conflict(&books, &book) {
            return Err(StoreError::Conflict { field, value });
        }

        books.push(book);
        Ok(())
    }

    /// Remove and return the book with this ISBN, keeping the order of the rest.
    pub fn delete(&self, isbn: &str) -> StoreResult<BookRecord> {
        let mut books = self.write();

        let position = books
            .iter()
            .position(|book| book.isbn == isbn)
            .ok_or_else(|| StoreError::NotFound(isbn.to_string()))?;

        Ok(books.remove(position))
    }
}

/// First identifier of `book` already present in `books`.
///
/// ISBN is checked before ISBN-13 for each existing record.
fn find_conflict(books: &[BookRecord], book: &BookRecord) -> Option<(IsbnField, String)> {
    books.iter().find_map(|existing| {
        if existing.isbn == book.isbn {
            Some((IsbnField::Isbn, book.isbn.clone()))
        } else if existing.isbn13 == book.isbn13 {
            Some((IsbnField::Isbn13, book.isbn13.clone()))
        } else {
            None
        }
    })
}
