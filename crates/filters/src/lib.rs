//! Composable filters over run history records.
//!
//! This crate provides:
//! - Filter trait and the SharedFilter handle
//! - Categorical filters (outcome, run kind) with an "Any" wildcard
//! - Range filters (difficulty, ring reached) with self-correcting bounds
//! - Clan filters backed by a ClanKeyRegistry, linked in complementary pairs
//! - FilterSet for combining filters with logical AND
//!
//! ## Example Usage
//! ```ignore
//! use filters::{FilterSet, SharedFilter};
//! use filters::filters::*;
//!
//! let outcome = SharedFilter::new(OutcomeFilter::new());
//! let mut set = FilterSet::new()
//!     .with_filter(outcome.clone())
//!     .with_filter(RangeFilter::difficulty());
//! set.set_active(true);
//!
//! outcome.write().set_option(1)?; // Victory
//! let keep = set.is_eligible(&run);
//! ```

pub mod error;
pub mod filter_set;
pub mod filters;
pub mod traits;

// Re-export main types
pub use error::{FilterError, Result};
pub use filter_set::FilterSet;
pub use traits::{Filter, SharedFilter};
