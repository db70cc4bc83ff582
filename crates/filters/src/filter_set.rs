//! The FilterSet combines registered filters with logical AND.

use crate::traits::Filter;
use run_store::RunRecord;

/// An ordered conjunction of filters with a global enable switch.
///
/// ## Usage
/// ```ignore
/// let mut set = FilterSet::new()
///     .with_filter(OutcomeFilter::new())
///     .with_filter(RangeFilter::difficulty());
/// set.set_active(true);
///
/// let keep = set.is_eligible(&run);
/// ```
pub struct FilterSet {
    filters: Vec<Box<dyn Filter>>,
    active: bool,
}

impl FilterSet {
    /// Create a new, empty and inactive FilterSet.
    pub fn new() -> Self {
        Self {
            filters: Vec::new(),
            active: false,
        }
    }

    /// Register a filter. Registration order is evaluation order.
    pub fn add_filter(&mut self, filter: impl Filter + 'static) {
        tracing::debug!("Registering filter: {}", filter.name());
        self.filters.push(Box::new(filter));
    }

    /// Register a filter (builder pattern).
    pub fn with_filter(mut self, filter: impl Filter + 'static) -> Self {
        self.add_filter(filter);
        self
    }

    /// Remove every registered filter.
    pub fn clear(&mut self) {
        self.filters.clear();
    }

    pub fn len(&self) -> usize {
        self.filters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn set_active(&mut self, active: bool) {
        self.active = active;
    }

    pub fn filter_names(&self) -> Vec<&str> {
        self.filters.iter().map(|filter| filter.name()).collect()
    }

    /// Whether a run passes every filter.
    ///
    /// An inactive set accepts everything. Otherwise filters run in
    /// registration order and evaluation stops at the first rejection.
    pub fn is_eligible(&self, run: &RunRecord) -> bool {
        if !self.active {
            return true;
        }
        self.filters.iter().all(|filter| {
            let eligible = filter.is_eligible(run);
            if !eligible {
                tracing::trace!("Run {} rejected by {}", run.id, filter.name());
            }
            eligible
        })
    }
}

impl Default for FilterSet {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use run_store::RunKind;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct Fixed(bool);

    impl Filter for Fixed {
        fn name(&self) -> &str {
            "Fixed"
        }

        fn is_eligible(&self, _run: &RunRecord) -> bool {
            self.0
        }
    }

    struct Counting(Arc<AtomicUsize>);

    impl Filter for Counting {
        fn name(&self) -> &str {
            "Counting"
        }

        fn is_eligible(&self, _run: &RunRecord) -> bool {
            self.0.fetch_add(1, Ordering::SeqCst);
            true
        }
    }

    fn run() -> RunRecord {
        RunRecord {
            id: "run".to_string(),
            primary_faction_id: None,
            secondary_faction_id: None,
            difficulty_level: 0,
            stages_cleared: 0,
            won: false,
            run_kind: RunKind::Standard,
            challenge_ref: None,
        }
    }

    #[test]
    fn test_empty_set() {
        let mut set = FilterSet::new();
        assert!(!set.is_active());
        assert!(set.is_eligible(&run()));

        set.set_active(true);
        assert!(set.is_eligible(&run()));
    }

    #[test]
    fn test_inactive_set_accepts_everything() {
        let set = FilterSet::new().with_filter(Fixed(false));
        assert!(set.is_eligible(&run()));
    }

    #[test]
    fn test_conjunction_short_circuits() {
        let calls = Arc::new(AtomicUsize::new(0));
        let mut set = FilterSet::new()
            .with_filter(Fixed(false))
            .with_filter(Counting(calls.clone()));
        set.set_active(true);

        assert!(!set.is_eligible(&run()));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_all_filters_run_when_passing() {
        let calls = Arc::new(AtomicUsize::new(0));
        let mut set = FilterSet::new()
            .with_filter(Fixed(true))
            .with_filter(Counting(calls.clone()));
        set.set_active(true);

        assert!(set.is_eligible(&run()));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(set.filter_names(), vec!["Fixed", "Counting"]);
    }

    #[test]
    fn test_clear_empties_set() {
        let mut set = FilterSet::new().with_filter(Fixed(false));
        set.set_active(true);
        set.clear();
        assert!(set.is_empty());
        assert!(set.is_eligible(&run()));
    }
}
