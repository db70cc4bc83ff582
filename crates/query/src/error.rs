//! Error types for paged queries and session configuration.

use filters::FilterError;
use run_store::StoreError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum QueryError {
    /// Pages are 1-indexed
    #[error("Page must be 1 or greater, got {page}")]
    InvalidPage { page: usize },

    #[error("Page size must be greater than 0")]
    InvalidPageSize,

    /// Enumerating candidate ids failed; no page is produced
    #[error("Failed to list candidate runs")]
    Listing(#[source] StoreError),

    #[error("Failed to serialize run {id}")]
    Serialize {
        id: String,
        #[source]
        source: serde_json::Error,
    },

    #[error(transparent)]
    Filter(#[from] FilterError),
}

/// Convenience type alias for Results in this crate
pub type Result<T> = std::result::Result<T, QueryError>;
