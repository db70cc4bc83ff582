//! Single-choice filters over a fixed set of categories.
//!
//! The selection is `Option<C>`: `None` is the "Any" wildcard and never a
//! real category. Presentation indices are only a view of that: index 0 is
//! "Any", index `i` is `C::VALUES[i - 1]`.

use super::ANY_LABEL;
use crate::error::{FilterError, Result};
use crate::traits::Filter;
use run_store::{RunCategory, RunRecord};

/// A closed set of values a `CategoricalFilter` can select from.
pub trait Category: Copy + Eq + Send + Sync + 'static {
    /// Name of the filter built over this category
    const FILTER_NAME: &'static str;

    /// Every value, in presentation order
    const VALUES: &'static [Self];

    fn label(self) -> &'static str;

    /// Whether a run belongs to this category.
    fn matches(self, run: &RunRecord) -> bool;
}

/// Run outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Outcome {
    Victory,
    Defeat,
}

impl Category for Outcome {
    const FILTER_NAME: &'static str = "OutcomeFilter";
    const VALUES: &'static [Self] = &[Outcome::Victory, Outcome::Defeat];

    fn label(self) -> &'static str {
        match self {
            Outcome::Victory => "Victory",
            Outcome::Defeat => "Defeat",
        }
    }

    fn matches(self, run: &RunRecord) -> bool {
        match self {
            Outcome::Victory => run.won,
            Outcome::Defeat => !run.won,
        }
    }
}

impl Category for RunCategory {
    const FILTER_NAME: &'static str = "RunKindFilter";
    const VALUES: &'static [Self] = &RunCategory::ALL;

    fn label(self) -> &'static str {
        RunCategory::label(self)
    }

    fn matches(self, run: &RunRecord) -> bool {
        run.category() == self
    }
}

/// Keeps runs of the selected category, or every run while "Any" is selected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoricalFilter<C: Category> {
    selected: Option<C>,
}

/// Filters runs by victory or defeat.
pub type OutcomeFilter = CategoricalFilter<Outcome>;

/// Filters runs by kind (standard, challenge, daily, ...).
pub type RunKindFilter = CategoricalFilter<RunCategory>;

impl<C: Category> CategoricalFilter<C> {
    /// Create a filter with "Any" selected.
    pub fn new() -> Self {
        Self { selected: None }
    }

    pub fn selected(&self) -> Option<C> {
        self.selected
    }

    pub fn select(&mut self, value: Option<C>) {
        self.selected = value;
    }

    /// Option labels for display, "Any" first.
    pub fn options() -> Vec<&'static str> {
        std::iter::once(ANY_LABEL)
            .chain(C::VALUES.iter().map(|value| value.label()))
            .collect()
    }

    /// Presentation index of the current selection.
    pub fn selected_option(&self) -> usize {
        self.selected
            .and_then(|selected| C::VALUES.iter().position(|value| *value == selected))
            .map_or(0, |position| position + 1)
    }

    /// Select by presentation index. Out-of-range indices are rejected and
    /// leave the selection unchanged.
    pub fn set_option(&mut self, index: usize) -> Result<()> {
        self.selected = match index {
            0 => None,
            _ => Some(C::VALUES.get(index - 1).copied().ok_or_else(|| {
                FilterError::OptionOutOfRange {
                    filter: C::FILTER_NAME.to_string(),
                    index,
                    len: C::VALUES.len() + 1,
                }
            })?),
        };
        Ok(())
    }

    /// Select by label, ignoring ASCII case.
    pub fn select_label(&mut self, label: &str) -> Result<()> {
        let index = Self::options()
            .iter()
            .position(|option| option.eq_ignore_ascii_case(label))
            .ok_or_else(|| FilterError::UnknownOption {
                filter: C::FILTER_NAME.to_string(),
                label: label.to_string(),
            })?;
        self.set_option(index)
    }
}

impl<C: Category> Default for CategoricalFilter<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Category> Filter for CategoricalFilter<C> {
    fn name(&self) -> &str {
        C::FILTER_NAME
    }

    fn is_eligible(&self, run: &RunRecord) -> bool {
        self.selected.is_none_or(|category| category.matches(run))
    }
}
