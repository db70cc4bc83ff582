//! Filter implementations for run history.
//!
//! This module contains all the concrete filters that can be
//! registered in a FilterSet.

pub mod categorical;
pub mod clan;
pub mod range;

/// Label of the unconstrained option in every option list
pub const ANY_LABEL: &str = "Any";

// Re-export for convenience
pub use categorical::{CategoricalFilter, Category, Outcome, OutcomeFilter, RunKindFilter};
pub use clan::{ClanFilter, ClanKey, ClanKeyRegistry, ClanRole, LinkedClanPair};
pub use range::{DIFFICULTY_DOMAIN, RING_DOMAIN, RangeFilter, RangeMetric};
