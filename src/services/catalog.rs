//! Catalog management service

use validator::Validate;

use crate::{
    error::{AppResult, StoreResult},
    models::book::{BookRecord, CreateBook},
    repository::{source::RecordSource, Repository},
};

#[derive(Clone)]
pub struct CatalogService {
    repository: Repository,
}

impl CatalogService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Populate the catalog from the bootstrap source, replacing its contents
    pub fn initialize(&self, source: &dyn RecordSource) -> StoreResult<usize> {
        self.repository.books.initialize(source)
    }

    /// Number of books currently held
    pub fn count(&self) -> usize {
        self.repository.books.len()
    }

    /// List books in catalog order
    pub fn list_books(&self, limit: usize, skip: usize) -> Vec<BookRecord> {
        self.repository.books.get_all(limit, skip)
    }

    /// Books whose authors contain `fragment` (case-insensitive)
    pub fn search_by_author(&self, fragment: &str, limit: usize, skip: usize) -> Vec<BookRecord> {
        self.repository.books.search_by_author(fragment, limit, skip)
    }

    /// Books whose title contains `fragment` (case-insensitive)
    pub fn search_by_title(&self, fragment: &str, limit: usize, skip: usize) -> Vec<BookRecord> {
        self.repository.books.search_by_title(fragment, limit, skip)
    }

    pub fn get_book(&self, isbn: &str) -> AppResult<BookRecord> {
        Ok(self.repository.books.get_by_isbn(isbn)?)
    }

    /// Validate and insert a new book.
    /// Fails with a conflict when its ISBN or ISBN-13 is already in the catalog.
    pub fn create_book(&self, book: CreateBook) -> AppResult<BookRecord> {
        book.validate()?;

        let record = BookRecord::from(book);
        if let Err(e) = self.repository.books.insert(record.clone()) {
            tracing::info!("Catalog create rejected: {}", e);
            return Err(e.into());
        }

        tracing::info!("Catalog create: isbn={} title={:?}", record.isbn, record.title);
        Ok(record)
    }

    /// Remove a book and return it
    pub fn delete_book(&self, isbn: &str) -> AppResult<BookRecord> {
        let removed = self.repository.books.delete(isbn)?;
        tracing::info!("Catalog delete: isbn={}", removed.isbn);
        Ok(removed)
    }
}
