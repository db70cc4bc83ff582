//! # Filter Session
//!
//! A `FilterSession` owns every filter of one run-history view, the
//! `FilterSet` they are registered in, and a "changed since last check" flag.
//! It is constructed explicitly and passed to whatever issues queries.
//!
//! Registration order (and therefore evaluation order) is outcome, run kind,
//! difficulty, primary clan, secondary clan, ring.

use crate::error::Result as QueryResult;
use crate::paged::{PageRequest, PagedQuery, RunPage};
use filters::filters::{
    ClanKeyRegistry, ClanRole, DIFFICULTY_DOMAIN, LinkedClanPair, OutcomeFilter, RING_DOMAIN,
    RangeFilter, RangeMetric, RunKindFilter,
};
use filters::{FilterSet, Result, SharedFilter};
use run_store::{FactionDef, RecordHydrator, RecordLister, RunQuery};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info};

/// Tunables for a session. Read from JSON by the CLI; every field is optional.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Selectable difficulty levels, inclusive
    pub difficulty_range: (i64, i64),
    /// Selectable rings, inclusive
    pub ring_range: (i64, i64),
    /// Default number of runs per page
    pub page_size: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            difficulty_range: DIFFICULTY_DOMAIN,
            ring_range: RING_DOMAIN,
            page_size: 10,
        }
    }
}

/// Display state of a single-choice filter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OptionState {
    pub options: Vec<String>,
    pub selected: usize,
}

impl OptionState {
    fn new<'a>(options: impl IntoIterator<Item = &'a str>, selected: usize) -> Self {
        Self {
            options: options.into_iter().map(str::to_string).collect(),
            selected,
        }
    }

    pub fn selected_label(&self) -> &str {
        self.options.get(self.selected).map_or("", String::as_str)
    }
}

/// Display state of a range filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RangeState {
    pub domain: (i64, i64),
    pub selected: (i64, i64),
}

impl From<&RangeFilter> for RangeState {
    fn from(filter: &RangeFilter) -> Self {
        Self {
            domain: filter.domain(),
            selected: filter.selected(),
        }
    }
}

/// Everything a presentation layer needs to initialise its widgets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FilterState {
    pub active: bool,
    pub outcome: OptionState,
    pub run_kind: OptionState,
    pub difficulty: RangeState,
    pub clan_role: OptionState,
    pub primary_clan: OptionState,
    pub secondary_clan: OptionState,
    pub secondary_clan_label: String,
    pub ring: RangeState,
}

pub struct FilterSession {
    registry: Arc<ClanKeyRegistry>,
    outcome: SharedFilter<OutcomeFilter>,
    run_kind: SharedFilter<RunKindFilter>,
    difficulty: SharedFilter<RangeFilter>,
    clans: LinkedClanPair,
    ring: SharedFilter<RangeFilter>,
    filter_set: FilterSet,
    changed: bool,
}

impl FilterSession {
    /// Create a session with default domains. Filtering starts disabled.
    pub fn new(factions: &[FactionDef]) -> Result<Self> {
        Self::with_config(factions, &SessionConfig::default())
    }

    pub fn with_config(factions: &[FactionDef], config: &SessionConfig) -> Result<Self> {
        let registry = Arc::new(ClanKeyRegistry::from_factions(factions)?);
        let (difficulty_min, difficulty_max) = config.difficulty_range;
        let (ring_min, ring_max) = config.ring_range;

        let mut session = Self {
            outcome: SharedFilter::new(OutcomeFilter::new()),
            run_kind: SharedFilter::new(RunKindFilter::new()),
            difficulty: SharedFilter::new(RangeFilter::new(
                RangeMetric::DifficultyLevel,
                difficulty_min,
                difficulty_max,
            )?),
            clans: LinkedClanPair::new(Arc::clone(&registry)),
            ring: SharedFilter::new(RangeFilter::new(
                RangeMetric::RingReached,
                ring_min,
                ring_max,
            )?),
            registry,
            filter_set: FilterSet::new(),
            changed: false,
        };
        session.register_filters();
        info!(
            "Filter session ready: {} clans, {} filters",
            session.registry.len(),
            session.filter_set.len()
        );
        Ok(session)
    }

    /// Register every filter, replacing whatever the set already held.
    ///
    /// Filter configuration survives; only registrations are rebuilt.
    pub fn register_filters(&mut self) {
        self.filter_set.clear();
        self.filter_set.add_filter(self.outcome.clone());
        self.filter_set.add_filter(self.run_kind.clone());
        self.filter_set.add_filter(self.difficulty.clone());
        self.filter_set.add_filter(self.clans.primary().clone());
        self.filter_set.add_filter(self.clans.secondary().clone());
        self.filter_set.add_filter(self.ring.clone());
    }

    pub fn registry(&self) -> &ClanKeyRegistry {
        &self.registry
    }

    pub fn filter_set(&self) -> &FilterSet {
        &self.filter_set
    }

    fn mark_changed(&mut self) {
        self.changed = true;
    }

    /// Whether anything changed since the last call. Reading clears the flag.
    pub fn take_changed(&mut self) -> bool {
        std::mem::take(&mut self.changed)
    }

    pub fn is_active(&self) -> bool {
        self.filter_set.is_active()
    }

    pub fn set_active(&mut self, active: bool) {
        debug!("Filtering {}", if active { "enabled" } else { "disabled" });
        self.filter_set.set_active(active);
        self.mark_changed();
    }

    pub fn set_outcome_option(&mut self, index: usize) -> Result<()> {
        self.outcome.write().set_option(index)?;
        self.mark_changed();
        Ok(())
    }

    pub fn set_outcome_label(&mut self, label: &str) -> Result<()> {
        self.outcome.write().select_label(label)?;
        self.mark_changed();
        Ok(())
    }

    pub fn set_run_kind_option(&mut self, index: usize) -> Result<()> {
        self.run_kind.write().set_option(index)?;
        self.mark_changed();
        Ok(())
    }

    pub fn set_run_kind_label(&mut self, label: &str) -> Result<()> {
        self.run_kind.write().select_label(label)?;
        self.mark_changed();
        Ok(())
    }

    pub fn set_difficulty_min(&mut self, value: i64) {
        self.difficulty.write().set_min(value);
        self.mark_changed();
    }

    pub fn set_difficulty_max(&mut self, value: i64) {
        self.difficulty.write().set_max(value);
        self.mark_changed();
    }

    pub fn set_ring_min(&mut self, value: i64) {
        self.ring.write().set_min(value);
        self.mark_changed();
    }

    pub fn set_ring_max(&mut self, value: i64) {
        self.ring.write().set_max(value);
        self.mark_changed();
    }

    /// Set the first clan's role; the second clan takes the complement.
    pub fn set_clan_role(&mut self, role: ClanRole) {
        self.clans.set_role(role);
        self.mark_changed();
    }

    pub fn set_primary_clan_option(&mut self, index: usize) -> Result<()> {
        self.clans.primary().write().set_option(index)?;
        self.mark_changed();
        Ok(())
    }

    pub fn set_primary_clan_label(&mut self, label: &str) -> Result<()> {
        self.clans.primary().write().select_label(label)?;
        self.mark_changed();
        Ok(())
    }

    pub fn set_secondary_clan_option(&mut self, index: usize) -> Result<()> {
        self.clans.secondary().write().set_option(index)?;
        self.mark_changed();
        Ok(())
    }

    pub fn set_secondary_clan_label(&mut self, label: &str) -> Result<()> {
        self.clans.secondary().write().select_label(label)?;
        self.mark_changed();
        Ok(())
    }

    /// Snapshot of the current configuration for display.
    pub fn state(&self) -> FilterState {
        let clan_options = self.registry.options();
        FilterState {
            active: self.is_active(),
            outcome: OptionState::new(
                OutcomeFilter::options(),
                self.outcome.read().selected_option(),
            ),
            run_kind: OptionState::new(
                RunKindFilter::options(),
                self.run_kind.read().selected_option(),
            ),
            difficulty: RangeState::from(&*self.difficulty.read()),
            clan_role: OptionState::new(ClanRole::options(), self.clans.role().option_index()),
            primary_clan: OptionState::new(
                clan_options.iter().copied(),
                self.clans.primary().read().selected_option(),
            ),
            secondary_clan: OptionState::new(
                clan_options.iter().copied(),
                self.clans.secondary().read().selected_option(),
            ),
            secondary_clan_label: self.clans.secondary_label(),
            ring: RangeState::from(&*self.ring.read()),
        }
    }

    /// Fetch one page of runs through this session's filters.
    pub fn run_query<S>(
        &self,
        store: &S,
        query: &RunQuery,
        request: PageRequest,
    ) -> QueryResult<RunPage>
    where
        S: RecordLister + RecordHydrator + ?Sized,
    {
        PagedQuery::new(store, store, &self.filter_set).run(query, request)
    }
}
