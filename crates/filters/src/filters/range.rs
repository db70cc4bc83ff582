//! Filters that keep runs whose metric falls within a selected range.
//!
//! The selected bounds always satisfy
//! `domain_min <= selected_min <= selected_max <= domain_max`.
//! Each setter clamps its value to the domain, then drags the opposite bound
//! along if the two would cross.

use crate::error::{FilterError, Result};
use crate::traits::Filter;
use run_store::RunRecord;

/// Default selectable difficulty levels
pub const DIFFICULTY_DOMAIN: (i64, i64) = (0, 25);

/// Default selectable rings (1-indexed)
pub const RING_DOMAIN: (i64, i64) = (1, 9);

/// The scalar a `RangeFilter` reads from a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RangeMetric {
    /// Ascension / covenant level
    DifficultyLevel,
    /// Furthest ring reached: stages cleared + 1
    RingReached,
}

impl RangeMetric {
    pub fn value(self, run: &RunRecord) -> i64 {
        match self {
            RangeMetric::DifficultyLevel => i64::from(run.difficulty_level),
            RangeMetric::RingReached => i64::from(run.ring_reached()),
        }
    }

    pub fn filter_name(self) -> &'static str {
        match self {
            RangeMetric::DifficultyLevel => "DifficultyFilter",
            RangeMetric::RingReached => "RingFilter",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RangeFilter {
    metric: RangeMetric,
    domain_min: i64,
    domain_max: i64,
    selected_min: i64,
    selected_max: i64,
}

impl RangeFilter {
    /// Create a range filter selecting its whole domain.
    pub fn new(metric: RangeMetric, domain_min: i64, domain_max: i64) -> Result<Self> {
        if domain_min > domain_max {
            return Err(FilterError::InvalidDomain {
                min: domain_min,
                max: domain_max,
            });
        }
        Ok(Self {
            metric,
            domain_min,
            domain_max,
            selected_min: domain_min,
            selected_max: domain_max,
        })
    }

    /// Difficulty filter over the default domain.
    pub fn difficulty() -> Self {
        let (min, max) = DIFFICULTY_DOMAIN;
        Self::unchecked(RangeMetric::DifficultyLevel, min, max)
    }

    /// Ring filter over the default domain.
    pub fn ring() -> Self {
        let (min, max) = RING_DOMAIN;
        Self::unchecked(RangeMetric::RingReached, min, max)
    }

    fn unchecked(metric: RangeMetric, domain_min: i64, domain_max: i64) -> Self {
        Self {
            metric,
            domain_min,
            domain_max,
            selected_min: domain_min,
            selected_max: domain_max,
        }
    }

    pub fn metric(&self) -> RangeMetric {
        self.metric
    }

    pub fn domain(&self) -> (i64, i64) {
        (self.domain_min, self.domain_max)
    }

    pub fn selected(&self) -> (i64, i64) {
        (self.selected_min, self.selected_max)
    }

    pub fn selected_min(&self) -> i64 {
        self.selected_min
    }

    pub fn selected_max(&self) -> i64 {
        self.selected_max
    }

    pub fn set_min(&mut self, value: i64) {
        self.selected_min = value.clamp(self.domain_min, self.domain_max);
        self.selected_max = self.selected_max.max(self.selected_min);
    }

    pub fn set_max(&mut self, value: i64) {
        self.selected_max = value.clamp(self.domain_min, self.domain_max);
        self.selected_min = self.selected_min.min(self.selected_max);
    }
}

impl Filter for RangeFilter {
    fn name(&self) -> &str {
        self.metric.filter_name()
    }

    fn is_eligible(&self, run: &RunRecord) -> bool {
        let value = self.metric.value(run);
        (self.selected_min..=self.selected_max).contains(&value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use run_store::RunKind;

    fn run(difficulty_level: u32, stages_cleared: u32) -> RunRecord {
        RunRecord {
            id: "run".to_string(),
            primary_faction_id: None,
            secondary_faction_id: None,
            difficulty_level,
            stages_cleared,
            won: false,
            run_kind: RunKind::Standard,
            challenge_ref: None,
        }
    }

    #[test]
    fn test_new_selects_whole_domain() {
        let filter = RangeFilter::difficulty();
        assert_eq!(filter.domain(), (0, 25));
        assert_eq!(filter.selected(), (0, 25));
        assert!(filter.is_eligible(&run(0, 0)));
        assert!(filter.is_eligible(&run(25, 0)));
        assert!(!filter.is_eligible(&run(26, 0)));
    }

    #[test]
    fn test_invalid_domain_rejected() {
        let err = RangeFilter::new(RangeMetric::RingReached, 5, 4).unwrap_err();
        assert_eq!(err, FilterError::InvalidDomain { min: 5, max: 4 });
    }

    #[test]
    fn test_set_min_clamps_and_widens_max() {
        let mut filter = RangeFilter::difficulty();
        filter.set_max(10);
        filter.set_min(15);
        assert_eq!(filter.selected(), (15, 15));

        filter.set_min(-4);
        // Max is never narrowed back down
        assert_eq!(filter.selected(), (0, 15));

        filter.set_min(99);
        assert_eq!(filter.selected(), (25, 25));
    }

    #[test]
    fn test_set_max_clamps_and_widens_min() {
        let mut filter = RangeFilter::difficulty();
        filter.set_min(12);
        filter.set_max(3);
        assert_eq!(filter.selected(), (3, 3));

        filter.set_max(1000);
        assert_eq!(filter.selected(), (3, 25));

        filter.set_max(-1);
        assert_eq!(filter.selected(), (0, 0));
    }

    #[test]
    fn test_ring_is_one_indexed() {
        let mut filter = RangeFilter::ring();
        filter.set_min(3);
        filter.set_max(3);

        // Two stages cleared means the run died on ring 3
        assert!(filter.is_eligible(&run(0, 2)));
        assert!(!filter.is_eligible(&run(0, 3)));
        assert!(!filter.is_eligible(&run(0, 1)));
    }
}
