//! Error types for the search index.

use thiserror::Error;

/// Result type for index operations.
pub type IndexResult<T> = Result<T, IndexError>;

/// Errors that can occur while reading or writing the search index.
#[derive(Debug, Error)]
pub enum IndexError {
    /// Error from the search engine.
    #[error("Index error: {0}")]
    Tantivy(#[from] tantivy::TantivyError),

    /// The index directory could not be opened.
    #[error("Index directory error: {0}")]
    Directory(#[from] tantivy::directory::error::OpenDirectoryError),

    /// I/O error while preparing the index directory.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A stored entry is missing a field or holds an unexpected value.
    #[error("Invalid index entry: {0}")]
    InvalidEntry(String),

    /// Lock poisoning error.
    #[error("lock poisoned: {0}")]
    LockPoisoned(String),
}

impl IndexError {
    /// Create an invalid entry error.
    pub fn invalid_entry(msg: impl Into<String>) -> Self {
        IndexError::InvalidEntry(msg.into())
    }
}
