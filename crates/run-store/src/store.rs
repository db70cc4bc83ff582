//! Storage collaborator interfaces and the in-memory run store.
//!
//! The query engine only ever sees storage through two seams:
//! - `RecordLister` enumerates the natively sorted candidate ids for a query
//! - `RecordHydrator` resolves one id to its current `RunRecord`
//!
//! `RunStore` implements both over a `HashMap` keyed by run id.

use crate::error::Result;
use crate::types::*;
use std::cmp::Ordering;
use std::collections::HashMap;

/// Enumerates candidate run ids for a query, already in native sort order.
pub trait RecordLister {
    fn list_candidate_ids(&self, query: &RunQuery) -> Result<Vec<RunId>>;
}

/// Resolves a run id to its record.
///
/// Returns `None` when the id no longer resolves to a live run; callers treat
/// that as "skip this id", never as an error.
pub trait RecordHydrator {
    fn hydrate(&self, id: &str) -> Option<RunRecord>;
}

/// In-memory run storage.
#[derive(Debug, Default)]
pub struct RunStore {
    runs: HashMap<RunId, StoredRun>,
    /// Insertion order, used to break sort ties deterministically
    order: Vec<RunId>,
}

impl RunStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a run, replacing any run with the same id.
    pub fn insert(&mut self, run: StoredRun) {
        let id = run.record.id.clone();
        if self.runs.insert(id.clone(), run).is_none() {
            self.order.push(id);
        }
    }

    /// Remove a run. Ids listed before the removal become stale.
    pub fn remove(&mut self, id: &str) -> Option<StoredRun> {
        let removed = self.runs.remove(id)?;
        self.order.retain(|existing| existing != id);
        Some(removed)
    }

    pub fn get(&self, id: &str) -> Option<&StoredRun> {
        self.runs.get(id)
    }

    pub fn len(&self) -> usize {
        self.runs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.runs.is_empty()
    }
}

fn compare_by(field: SortField, a: &StoredRun, b: &StoredRun) -> Ordering {
    match field {
        SortField::StartedAt => a.started_at.cmp(&b.started_at),
        SortField::Score => a.score.cmp(&b.score),
        SortField::DifficultyLevel => a.record.difficulty_level.cmp(&b.record.difficulty_level),
        SortField::StagesCleared => a.record.stages_cleared.cmp(&b.record.stages_cleared),
    }
}

impl RecordLister for RunStore {
    fn list_candidate_ids(&self, query: &RunQuery) -> Result<Vec<RunId>> {
        let mut in_scope: Vec<&StoredRun> = self
            .order
            .iter()
            .filter_map(|id| self.runs.get(id))
            .filter(|run| query.scope.contains(run))
            .collect();

        // Stable sort: equal keys keep insertion order in both directions
        in_scope.sort_by(|a, b| {
            let ordering = compare_by(query.sort_field, a, b);
            match query.direction {
                SortDirection::Ascending => ordering,
                SortDirection::Descending => ordering.reverse(),
            }
        });

        Ok(in_scope.into_iter().map(|run| run.record.id.clone()).collect())
    }
}

impl RecordHydrator for RunStore {
    fn hydrate(&self, id: &str) -> Option<RunRecord> {
        self.runs.get(id).map(|run| run.record.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stored(id: &str, owner: &str, started_at: i64, score: u32) -> StoredRun {
        StoredRun {
            owner: owner.to_string(),
            environment: 0,
            started_at,
            score,
            record: RunRecord {
                id: id.to_string(),
                primary_faction_id: None,
                secondary_faction_id: None,
                difficulty_level: 0,
                stages_cleared: 0,
                won: false,
                run_kind: RunKind::Standard,
                challenge_ref: None,
            },
        }
    }

    fn create_test_store() -> RunStore {
        let mut store = RunStore::new();
        store.insert(stored("a", "alice", 300, 10));
        store.insert(stored("b", "alice", 100, 30));
        store.insert(stored("c", "bob", 200, 20));
        store.insert(stored("d", "alice", 200, 30));
        store
    }

    #[test]
    fn test_list_applies_scope_and_sort() {
        let store = create_test_store();
        let query = RunQuery::new(RunScope::new("alice", 0))
            .sorted_by(SortField::StartedAt, SortDirection::Ascending);

        let ids = store.list_candidate_ids(&query).unwrap();
        assert_eq!(ids, vec!["b", "d", "a"]);

        let query = query.sorted_by(SortField::StartedAt, SortDirection::Descending);
        let ids = store.list_candidate_ids(&query).unwrap();
        assert_eq!(ids, vec!["a", "d", "b"]);
    }

    #[test]
    fn test_sort_ties_keep_insertion_order() {
        let store = create_test_store();
        let query = RunQuery::new(RunScope::new("alice", 0))
            .sorted_by(SortField::Score, SortDirection::Descending);

        // b and d both score 30; b was inserted first
        let ids = store.list_candidate_ids(&query).unwrap();
        assert_eq!(ids, vec!["b", "d", "a"]);
    }

    #[test]
    fn test_hydrate_missing_after_remove() {
        let mut store = create_test_store();
        assert!(store.hydrate("a").is_some());

        store.remove("a");
        assert!(store.hydrate("a").is_none());
        assert_eq!(store.len(), 3);
    }

    #[test]
    fn test_insert_replaces_without_duplicating_order() {
        let mut store = create_test_store();
        store.insert(stored("a", "alice", 50, 10));

        let query = RunQuery::new(RunScope::new("alice", 0))
            .sorted_by(SortField::StartedAt, SortDirection::Ascending);
        let ids = store.list_candidate_ids(&query).unwrap();
        assert_eq!(ids, vec!["a", "b", "d"]);
    }
}
