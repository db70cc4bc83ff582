//! Error types for the run-store crate.

use thiserror::Error;

/// Errors raised while loading run history or enumerating candidate runs.
#[derive(Error, Debug)]
pub enum StoreError {
    /// File could not be found or opened
    #[error("Failed to open file: {path}")]
    FileNotFound { path: String },

    /// I/O error occurred while reading a file
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// A history file was not valid JSON for the expected shape
    #[error("Parse error in {file}: {source}")]
    ParseError {
        file: String,
        #[source]
        source: serde_json::Error,
    },

    /// Two stored entities share an id
    #[error("Duplicate {entity} id: {id}")]
    DuplicateId { entity: String, id: String },

    /// The backing query that enumerates candidate ids failed
    #[error("Listing candidate runs failed: {0}")]
    ListingFailed(String),
}

/// Convenience type alias for Results in this crate
pub type Result<T> = std::result::Result<T, StoreError>;
