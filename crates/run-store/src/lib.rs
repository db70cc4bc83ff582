//! # Run Store Crate
//!
//! Storage side of the run history: the record model, the collaborator
//! traits the query engine depends on, an in-memory store, and JSON loading.
//!
//! ## Main Components
//!
//! - **types**: `RunRecord`, `StoredRun`, `FactionDef`, scope and sort types
//! - **store**: `RecordLister` / `RecordHydrator` traits and `RunStore`
//! - **parser**: parse `factions.json` and `runs.json`
//! - **history**: load a history directory into a `RunStore`
//! - **error**: error types for loading and listing
//!
//! ## Example Usage
//!
//! ```ignore
//! use run_store::{RecordLister, RunHistory, RunQuery, RunScope};
//! use std::path::Path;
//!
//! let history = RunHistory::load_from_dir(Path::new("data/sample"))?;
//! let ids = history.store.list_candidate_ids(&RunQuery::new(RunScope::new("player-1", 0)))?;
//! ```

// Public modules
pub mod error;
pub mod history;
pub mod parser;
pub mod store;
pub mod types;

// Re-export commonly used types for convenience
pub use error::{Result, StoreError};
pub use history::RunHistory;
pub use store::{RecordHydrator, RecordLister, RunStore};
pub use types::{
    FactionDef, RunCategory, RunId, RunKind, RunQuery, RunRecord, RunScope, SortDirection,
    SortField, StoredRun,
};
