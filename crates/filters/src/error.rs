//! Error types for filter configuration.
//!
//! Evaluation never fails: these errors only come out of setters and
//! constructors when the caller passes something no filter can represent.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FilterError {
    /// A presentation index does not name any option of the filter
    #[error("Option index {index} out of range for {filter} ({len} options)")]
    OptionOutOfRange {
        filter: String,
        index: usize,
        len: usize,
    },

    /// A label does not name any option of the filter
    #[error("Unknown option '{label}' for {filter}")]
    UnknownOption { filter: String, label: String },

    /// A range filter was built with an empty domain
    #[error("Invalid range domain: min {min} > max {max}")]
    InvalidDomain { min: i64, max: i64 },

    /// Two faction definitions share an id
    #[error("Duplicate faction id: {id}")]
    DuplicateFaction { id: String },
}

/// Convenience type alias for Results in this crate
pub type Result<T> = std::result::Result<T, FilterError>;
