//! Data models for the bookdata server

pub mod book;

// Re-export commonly used types
pub use book::{BookRecord, CreateBook};
