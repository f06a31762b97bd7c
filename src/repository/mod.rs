//! Repository layer: the in-memory book store and its bootstrap sources

pub mod books;
pub mod source;

/// Main repository struct holding the shared store handles
#[derive(Clone, Default)]
pub struct Repository {
    pub books: books::BooksRepository,
}

impl Repository {
    /// Create a repository around an existing book store
    pub fn new(books: books::BooksRepository) -> Self {
        Self { books }
    }
}
