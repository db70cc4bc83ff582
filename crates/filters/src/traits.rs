//! Core traits for run filtering.
//!
//! This module defines the `Filter` trait every predicate implements, and
//! `SharedFilter`, the handle that lets a session keep configuring a filter
//! after it has been registered in a `FilterSet`.

use parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use run_store::RunRecord;
use std::sync::Arc;

/// Core trait for filtering runs.
///
/// All filters must implement this trait to be registered in a `FilterSet`.
///
/// ## Design Note
/// - `Send + Sync` allows filters to be shared behind `SharedFilter` handles
/// - Evaluation is infallible: anything a filter cannot resolve counts as a
///   non-match
pub trait Filter: Send + Sync {
    /// Returns the name of this filter (for logging/debugging)
    fn name(&self) -> &str;

    /// Whether the run satisfies this filter's current configuration.
    fn is_eligible(&self, run: &RunRecord) -> bool;
}

/// A cloneable handle to a filter owned jointly by a `FilterSet` and the
/// code that configures it.
pub struct SharedFilter<F> {
    name: String,
    inner: Arc<RwLock<F>>,
}

impl<F: Filter> SharedFilter<F> {
    pub fn new(filter: F) -> Self {
        Self {
            name: filter.name().to_string(),
            inner: Arc::new(RwLock::new(filter)),
        }
    }
}

impl<F> SharedFilter<F> {
    pub fn read(&self) -> RwLockReadGuard<'_, F> {
        self.inner.read()
    }

    pub fn write(&self) -> RwLockWriteGuard<'_, F> {
        self.inner.write()
    }
}

impl<F> Clone for SharedFilter<F> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<F: Filter> Filter for SharedFilter<F> {
    fn name(&self) -> &str {
        &self.name
    }

    fn is_eligible(&self, run: &RunRecord) -> bool {
        self.inner.read().is_eligible(run)
    }
}
