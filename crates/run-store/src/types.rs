//! Core domain types for stored run history.
//!
//! A `RunRecord` is the minimal projection of a finished run that filters
//! see. `StoredRun` wraps it with the storage-only columns (owner,
//! environment, timestamps, score) that drive scoping and native sorting.

use serde::{Deserialize, Serialize};

// =============================================================================
// Type Aliases
// =============================================================================

/// Opaque, stable identifier of a stored run
pub type RunId = String;

// =============================================================================
// Run Kinds
// =============================================================================

/// The kind of run as the game stores it.
///
/// Challenge runs are stored as `Standard` runs carrying a challenge reference;
/// see [`RunRecord::category`] for the derived six-way classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RunKind {
    Standard,
    Daily,
    Matchmaker,
    Custom,
    Shared,
}

/// Run classification used for filtering and display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RunCategory {
    Standard,
    Challenge,
    Daily,
    Matchmaker,
    Custom,
    Shared,
}

impl RunCategory {
    /// Every category, in presentation order
    pub const ALL: [RunCategory; 6] = [
        RunCategory::Standard,
        RunCategory::Challenge,
        RunCategory::Daily,
        RunCategory::Matchmaker,
        RunCategory::Custom,
        RunCategory::Shared,
    ];

    pub fn label(self) -> &'static str {
        match self {
            RunCategory::Standard => "Standard",
            RunCategory::Challenge => "Challenge",
            RunCategory::Daily => "Daily",
            RunCategory::Matchmaker => "Matchmaker",
            RunCategory::Custom => "Custom",
            RunCategory::Shared => "Shared",
        }
    }
}

// =============================================================================
// Records
// =============================================================================

/// Read-only snapshot of one historical run.
///
/// Records are rebuilt from storage on every hydration and never cached
/// across queries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunRecord {
    pub id: RunId,
    #[serde(default)]
    pub primary_faction_id: Option<String>,
    #[serde(default)]
    pub secondary_faction_id: Option<String>,
    /// Ascension / covenant level the run was played at
    pub difficulty_level: u32,
    /// Number of battles won before the run ended
    pub stages_cleared: u32,
    pub won: bool,
    pub run_kind: RunKind,
    #[serde(default)]
    pub challenge_ref: Option<String>,
}

impl RunRecord {
    /// Whether this run references a challenge. Empty references count as absent.
    pub fn has_challenge(&self) -> bool {
        self.challenge_ref.as_deref().is_some_and(|c| !c.is_empty())
    }

    /// Derive the six-way category from the stored kind and challenge reference.
    pub fn category(&self) -> RunCategory {
        match self.run_kind {
            RunKind::Standard if self.has_challenge() => RunCategory::Challenge,
            RunKind::Standard => RunCategory::Standard,
            RunKind::Daily => RunCategory::Daily,
            RunKind::Matchmaker => RunCategory::Matchmaker,
            RunKind::Custom => RunCategory::Custom,
            RunKind::Shared => RunCategory::Shared,
        }
    }

    /// 1-indexed ring the run reached (stages cleared + 1)
    pub fn ring_reached(&self) -> u32 {
        self.stages_cleared.saturating_add(1)
    }
}

/// A run as it sits in storage: the record plus storage-only columns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredRun {
    /// User id that owns the run
    pub owner: String,
    #[serde(default)]
    pub environment: u32,
    /// Unix timestamp (seconds) when the run started
    pub started_at: i64,
    #[serde(default)]
    pub score: u32,
    #[serde(flatten)]
    pub record: RunRecord,
}

// =============================================================================
// Factions
// =============================================================================

/// An externally supplied faction (clan) definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FactionDef {
    pub id: String,
    pub title: String,
}

impl FactionDef {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
        }
    }

    /// Short name shown in pickers: the first word of the title.
    pub fn display_name(&self) -> &str {
        self.title.split_whitespace().next().unwrap_or(&self.title)
    }
}

// =============================================================================
// Query Shape
// =============================================================================

/// Which runs a query considers: one user (plus an optional alternate id)
/// within one environment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunScope {
    pub user_id: String,
    pub alt_user_id: Option<String>,
    pub environment: u32,
}

impl RunScope {
    pub fn new(user_id: impl Into<String>, environment: u32) -> Self {
        Self {
            user_id: user_id.into(),
            alt_user_id: None,
            environment,
        }
    }

    pub fn with_alt_user(mut self, alt_user_id: impl Into<String>) -> Self {
        self.alt_user_id = Some(alt_user_id.into());
        self
    }

    pub fn contains(&self, run: &StoredRun) -> bool {
        let owned = run.owner == self.user_id
            || self.alt_user_id.as_deref() == Some(run.owner.as_str());
        owned && run.environment == self.environment
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum SortField {
    #[default]
    StartedAt,
    Score,
    DifficultyLevel,
    StagesCleared,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum SortDirection {
    Ascending,
    #[default]
    Descending,
}

/// A scoped, natively sorted query over stored runs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunQuery {
    pub scope: RunScope,
    pub sort_field: SortField,
    pub direction: SortDirection,
}

impl RunQuery {
    pub fn new(scope: RunScope) -> Self {
        Self {
            scope,
            sort_field: SortField::default(),
            direction: SortDirection::default(),
        }
    }

    pub fn sorted_by(mut self, sort_field: SortField, direction: SortDirection) -> Self {
        self.sort_field = sort_field;
        self.direction = direction;
        self
    }
}
