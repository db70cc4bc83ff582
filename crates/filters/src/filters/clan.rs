//! Clan (faction) filters.
//!
//! Records only carry external faction string ids, so a `ClanKeyRegistry`
//! maps each known faction to a small `ClanKey` once per session. Keys start
//! at 1 and follow definition order; presentation index `i` always names key
//! `i`, with index 0 reserved for "Any".
//!
//! Two `ClanFilter`s are normally used together as a `LinkedClanPair`: the
//! second filter's role is always the complement of the first one's.

use super::ANY_LABEL;
use crate::error::{FilterError, Result};
use crate::traits::{Filter, SharedFilter};
use run_store::{FactionDef, RunRecord};
use std::collections::HashMap;
use std::num::NonZeroU32;
use std::sync::Arc;
use tracing::{debug, warn};

/// Session-stable key of a known faction. Never zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ClanKey(NonZeroU32);

impl ClanKey {
    pub fn get(self) -> u32 {
        self.0.get()
    }

    /// Index of this clan in the registry's option list
    pub fn option_index(self) -> usize {
        self.0.get() as usize
    }
}

/// Maps external faction ids to `ClanKey`s. Read-only once built.
#[derive(Debug, Clone, Default)]
pub struct ClanKeyRegistry {
    keys: HashMap<String, ClanKey>,
    /// Display names; `names[k - 1]` belongs to key `k`
    names: Vec<String>,
}

impl ClanKeyRegistry {
    /// Assign keys 1..=N to the factions in the order given.
    pub fn from_factions(factions: &[FactionDef]) -> Result<Self> {
        let mut registry = Self::default();
        for faction in factions {
            if registry.keys.contains_key(&faction.id) {
                return Err(FilterError::DuplicateFaction {
                    id: faction.id.clone(),
                });
            }
            let key = ClanKey(NonZeroU32::MIN.saturating_add(registry.names.len() as u32));
            registry.keys.insert(faction.id.clone(), key);
            registry.names.push(faction.display_name().to_string());
        }
        Ok(registry)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn lookup(&self, faction_id: &str) -> Option<ClanKey> {
        self.keys.get(faction_id).copied()
    }

    pub fn name(&self, key: ClanKey) -> Option<&str> {
        self.names.get(key.option_index() - 1).map(String::as_str)
    }

    /// Option labels for display: "Any" followed by clan names in key order.
    pub fn options(&self) -> Vec<&str> {
        std::iter::once(ANY_LABEL)
            .chain(self.names.iter().map(String::as_str))
            .collect()
    }

    /// Resolve a presentation index: 0 is "Any" (`None`).
    pub fn key_for_option(&self, index: usize) -> Result<Option<ClanKey>> {
        if index == 0 {
            return Ok(None);
        }
        match u32::try_from(index).ok().and_then(NonZeroU32::new) {
            Some(raw) if index <= self.names.len() => Ok(Some(ClanKey(raw))),
            _ => Err(FilterError::OptionOutOfRange {
                filter: "ClanFilter".to_string(),
                index,
                len: self.names.len() + 1,
            }),
        }
    }

    /// Presentation index of a label, ignoring ASCII case.
    pub fn option_index(&self, label: &str) -> Option<usize> {
        self.options()
            .iter()
            .position(|option| option.eq_ignore_ascii_case(label))
    }
}

/// Which side of a run a clan must have played on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ClanRole {
    AsPrimary,
    #[default]
    Either,
    AsSecondary,
}

impl ClanRole {
    /// Every role, in presentation order
    pub const ALL: [ClanRole; 3] = [ClanRole::AsPrimary, ClanRole::Either, ClanRole::AsSecondary];

    pub fn complement(self) -> Self {
        match self {
            ClanRole::AsPrimary => ClanRole::AsSecondary,
            ClanRole::Either => ClanRole::Either,
            ClanRole::AsSecondary => ClanRole::AsPrimary,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ClanRole::AsPrimary => "Primary",
            ClanRole::Either => "Either",
            ClanRole::AsSecondary => "Secondary",
        }
    }

    pub fn options() -> Vec<&'static str> {
        Self::ALL.iter().map(|role| role.label()).collect()
    }

    pub fn option_index(self) -> usize {
        match self {
            ClanRole::AsPrimary => 0,
            ClanRole::Either => 1,
            ClanRole::AsSecondary => 2,
        }
    }

    pub fn from_option(index: usize) -> Result<Self> {
        Self::ALL
            .get(index)
            .copied()
            .ok_or_else(|| FilterError::OptionOutOfRange {
                filter: "ClanRole".to_string(),
                index,
                len: Self::ALL.len(),
            })
    }

    pub fn from_label(label: &str) -> Result<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|role| role.label().eq_ignore_ascii_case(label))
            .ok_or_else(|| FilterError::UnknownOption {
                filter: "ClanRole".to_string(),
                label: label.to_string(),
            })
    }
}

/// Keeps runs in which the selected clan played the configured role.
#[derive(Debug, Clone)]
pub struct ClanFilter {
    name: &'static str,
    registry: Arc<ClanKeyRegistry>,
    selected: Option<ClanKey>,
    role: ClanRole,
}

impl ClanFilter {
    /// A stand-alone clan filter: "Any" clan, `Either` role.
    pub fn new(registry: Arc<ClanKeyRegistry>) -> Self {
        Self::with_role(registry, "ClanFilter", ClanRole::Either)
    }

    fn with_role(registry: Arc<ClanKeyRegistry>, name: &'static str, role: ClanRole) -> Self {
        Self {
            name,
            registry,
            selected: None,
            role,
        }
    }

    pub fn registry(&self) -> &ClanKeyRegistry {
        &self.registry
    }

    pub fn selected(&self) -> Option<ClanKey> {
        self.selected
    }

    pub fn role(&self) -> ClanRole {
        self.role
    }

    /// Role changes go through `LinkedClanPair::set_role` so the pair stays
    /// complementary.
    pub(crate) fn set_role(&mut self, role: ClanRole) {
        self.role = role;
    }

    /// Select a clan by key. Keys past the end of this filter's registry are
    /// rejected and leave the selection as is.
    pub fn select(&mut self, clan: Option<ClanKey>) -> Result<()> {
        let index = clan.map_or(0, ClanKey::option_index);
        self.selected = self.registry.key_for_option(index)?;
        Ok(())
    }

    pub fn selected_option(&self) -> usize {
        self.selected.map_or(0, ClanKey::option_index)
    }

    /// Select by presentation index; rejected indices leave the selection as is.
    pub fn set_option(&mut self, index: usize) -> Result<()> {
        self.selected = self.registry.key_for_option(index)?;
        Ok(())
    }

    /// Select by clan name (or "Any"), ignoring ASCII case.
    pub fn select_label(&mut self, label: &str) -> Result<()> {
        let index = self
            .registry
            .option_index(label)
            .ok_or_else(|| FilterError::UnknownOption {
                filter: self.name.to_string(),
                label: label.to_string(),
            })?;
        self.set_option(index)
    }

    /// Resolve one side of a run. Unknown ids are logged and never match.
    fn resolve(&self, side: &str, faction_id: Option<&str>) -> Option<ClanKey> {
        let faction_id = match faction_id {
            Some(id) if !id.is_empty() => id,
            _ => {
                debug!("{}: run has no {} clan", self.name, side);
                return None;
            }
        };
        let key = self.registry.lookup(faction_id);
        if key.is_none() {
            warn!("{}: can't find {} clan id {}", self.name, side, faction_id);
        }
        key
    }
}

impl Filter for ClanFilter {
    fn name(&self) -> &str {
        self.name
    }

    fn is_eligible(&self, run: &RunRecord) -> bool {
        let Some(clan) = self.selected else {
            return true;
        };
        let primary = || self.resolve("primary", run.primary_faction_id.as_deref());
        let secondary = || self.resolve("secondary", run.secondary_faction_id.as_deref());

        match self.role {
            ClanRole::AsPrimary => primary() == Some(clan),
            ClanRole::AsSecondary => secondary() == Some(clan),
            ClanRole::Either => primary() == Some(clan) || secondary() == Some(clan),
        }
    }
}

/// Two clan filters whose roles are kept complementary.
///
/// Both members are registered in the `FilterSet` individually; this type
/// only owns the role relationship between them.
#[derive(Clone)]
pub struct LinkedClanPair {
    primary: SharedFilter<ClanFilter>,
    secondary: SharedFilter<ClanFilter>,
}

impl LinkedClanPair {
    pub fn new(registry: Arc<ClanKeyRegistry>) -> Self {
        let role = ClanRole::AsPrimary;
        Self {
            primary: SharedFilter::new(ClanFilter::with_role(
                Arc::clone(&registry),
                "PrimaryClanFilter",
                role,
            )),
            secondary: SharedFilter::new(ClanFilter::with_role(
                registry,
                "SecondaryClanFilter",
                role.complement(),
            )),
        }
    }

    pub fn primary(&self) -> &SharedFilter<ClanFilter> {
        &self.primary
    }

    pub fn secondary(&self) -> &SharedFilter<ClanFilter> {
        &self.secondary
    }

    /// Role of the primary member
    pub fn role(&self) -> ClanRole {
        self.primary.read().role()
    }

    /// Set the primary member's role and the secondary's to its complement.
    pub fn set_role(&self, role: ClanRole) {
        let mut primary = self.primary.write();
        let mut secondary = self.secondary.write();
        primary.set_role(role);
        secondary.set_role(role.complement());
    }

    /// Label shown next to the second clan picker, e.g. "Secondary Clan:".
    pub fn secondary_label(&self) -> String {
        format!("{} Clan:", self.secondary.read().role().label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use run_store::RunKind;

    fn create_test_registry() -> Arc<ClanKeyRegistry> {
        let factions = vec![
            FactionDef::new("hellhorned", "Hellhorned Clan"),
            FactionDef::new("awoken", "Awoken"),
            FactionDef::new("stygian", "Stygian Guard"),
        ];
        Arc::new(ClanKeyRegistry::from_factions(&factions).unwrap())
    }

    fn run(primary: Option<&str>, secondary: Option<&str>) -> RunRecord {
        RunRecord {
            id: "run".to_string(),
            primary_faction_id: primary.map(str::to_string),
            secondary_faction_id: secondary.map(str::to_string),
            difficulty_level: 0,
            stages_cleared: 0,
            won: true,
            run_kind: RunKind::Standard,
            challenge_ref: None,
        }
    }

    #[test]
    fn test_registry_keys_follow_definition_order() {
        let registry = create_test_registry();
        assert_eq!(registry.lookup("hellhorned").map(ClanKey::get), Some(1));
        assert_eq!(registry.lookup("stygian").map(ClanKey::get), Some(3));
        assert_eq!(registry.lookup("umbra"), None);
        assert_eq!(registry.options(), vec!["Any", "Hellhorned", "Awoken", "Stygian"]);

        // Option index i names key i
        for index in 1..=registry.len() {
            let key = registry.key_for_option(index).unwrap().unwrap();
            assert_eq!(key.option_index(), index);
            assert_eq!(registry.name(key), Some(registry.options()[index]));
        }
        assert_eq!(registry.key_for_option(0).unwrap(), None);
        assert!(registry.key_for_option(4).is_err());
    }

    #[test]
    fn test_registry_rejects_duplicate_ids() {
        let factions = vec![
            FactionDef::new("awoken", "Awoken"),
            FactionDef::new("awoken", "Awoken"),
        ];
        let err = ClanKeyRegistry::from_factions(&factions).unwrap_err();
        assert_eq!(err, FilterError::DuplicateFaction { id: "awoken".to_string() });
    }

    #[test]
    fn test_select_rejects_foreign_keys() {
        let mut filter = ClanFilter::new(create_test_registry());
        filter.set_option(2).unwrap();

        let larger = ClanKeyRegistry::from_factions(&[
            FactionDef::new("hellhorned", "Hellhorned"),
            FactionDef::new("awoken", "Awoken"),
            FactionDef::new("stygian", "Stygian Guard"),
            FactionDef::new("umbra", "Umbra"),
        ])
        .unwrap();
        let umbra = larger.lookup("umbra").unwrap();

        let err = filter.select(Some(umbra)).unwrap_err();
        assert!(matches!(err, FilterError::OptionOutOfRange { index: 4, len: 4, .. }));
        assert_eq!(filter.selected_option(), 2);

        let stygian = filter.registry().lookup("stygian");
        filter.select(stygian).unwrap();
        assert_eq!(filter.selected_option(), 3);

        filter.select(None).unwrap();
        assert_eq!(filter.selected(), None);
    }

    #[test]
    fn test_any_clan_keeps_everything() {
        let filter = ClanFilter::new(create_test_registry());
        assert!(filter.is_eligible(&run(None, None)));
        assert!(filter.is_eligible(&run(Some("umbra"), Some("awoken"))));
    }

    #[test]
    fn test_roles() {
        let registry = create_test_registry();
        let mut filter = ClanFilter::new(registry);
        filter.select_label("awoken").unwrap();

        let awoken_first = run(Some("awoken"), Some("hellhorned"));
        let awoken_second = run(Some("hellhorned"), Some("awoken"));
        let no_awoken = run(Some("hellhorned"), Some("stygian"));

        filter.set_role(ClanRole::Either);
        assert!(filter.is_eligible(&awoken_first));
        assert!(filter.is_eligible(&awoken_second));
        assert!(!filter.is_eligible(&no_awoken));

        filter.set_role(ClanRole::AsPrimary);
        assert!(filter.is_eligible(&awoken_first));
        assert!(!filter.is_eligible(&awoken_second));

        filter.set_role(ClanRole::AsSecondary);
        assert!(!filter.is_eligible(&awoken_first));
        assert!(filter.is_eligible(&awoken_second));
    }

    #[test]
    fn test_unknown_faction_is_not_eligible() {
        let mut filter = ClanFilter::new(create_test_registry());
        filter.set_option(1).unwrap();
        filter.set_role(ClanRole::AsPrimary);

        assert!(!filter.is_eligible(&run(Some("umbra"), Some("hellhorned"))));
        assert!(!filter.is_eligible(&run(Some(""), None)));
    }

    #[test]
    fn test_linked_pair_keeps_roles_complementary() {
        let pair = LinkedClanPair::new(create_test_registry());
        assert_eq!(pair.role(), ClanRole::AsPrimary);
        assert_eq!(pair.secondary().read().role(), ClanRole::AsSecondary);
        assert_eq!(pair.secondary_label(), "Secondary Clan:");

        pair.set_role(ClanRole::Either);
        assert_eq!(pair.secondary().read().role(), ClanRole::Either);
        assert_eq!(pair.secondary_label(), "Either Clan:");

        pair.set_role(ClanRole::AsSecondary);
        assert_eq!(pair.primary().read().role(), ClanRole::AsSecondary);
        assert_eq!(pair.secondary().read().role(), ClanRole::AsPrimary);
        assert_eq!(pair.secondary_label(), "Primary Clan:");
    }

    #[test]
    fn test_linked_pair_members_filter_independently() {
        let pair = LinkedClanPair::new(create_test_registry());
        pair.primary().write().select_label("Hellhorned").unwrap();
        pair.secondary().write().select_label("Awoken").unwrap();

        let matching = run(Some("hellhorned"), Some("awoken"));
        let swapped = run(Some("awoken"), Some("hellhorned"));

        assert!(pair.primary().is_eligible(&matching));
        assert!(pair.secondary().is_eligible(&matching));
        assert!(!pair.primary().is_eligible(&swapped));
        assert!(!pair.secondary().is_eligible(&swapped));
    }

    #[test]
    fn test_role_options() {
        assert_eq!(ClanRole::options(), vec!["Primary", "Either", "Secondary"]);
        for role in ClanRole::ALL {
            assert_eq!(ClanRole::from_option(role.option_index()).unwrap(), role);
            assert_eq!(ClanRole::from_label(role.label()).unwrap(), role);
        }
        assert!(ClanRole::from_option(3).is_err());
    }
}
