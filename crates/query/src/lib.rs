//! Query crate for the run history filter engine.
//!
//! This crate contains the two-phase paged query that re-derives page
//! boundaries after filtering, and the session object that owns a view's
//! filters between queries.

pub mod error;
pub mod paged;
pub mod session;

pub use error::{QueryError, Result};
pub use paged::{
    FilteredPaginator, NativePaginator, PageRequest, PageSlice, PagedQuery, Paginator, RunPage,
    page_count,
};
pub use session::{FilterSession, FilterState, OptionState, RangeState, SessionConfig};
