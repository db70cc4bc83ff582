//! Loading a complete run history (factions + runs) from disk.

use crate::error::{Result, StoreError};
use crate::parser;
use crate::store::RunStore;
use crate::types::{FactionDef, StoredRun};
use std::collections::HashSet;
use std::path::Path;

/// Everything a filtering session needs from disk.
#[derive(Debug)]
pub struct RunHistory {
    pub store: RunStore,
    /// Faction definitions in definition order
    pub factions: Vec<FactionDef>,
}

impl RunHistory {
    /// Load `factions.json` and `runs.json` from a directory.
    ///
    /// Both files are parsed in parallel, then checked for duplicate ids.
    pub fn load_from_dir(data_dir: &Path) -> Result<Self> {
        tracing::info!("Loading run history from {:?}", data_dir);

        let factions_path = data_dir.join("factions.json");
        let runs_path = data_dir.join("runs.json");

        let (factions, runs) = rayon::join(
            || parser::parse_factions(&factions_path),
            || parser::parse_runs(&runs_path),
        );
        let factions = factions?;
        let runs = runs?;

        let history = Self::from_parts(factions, runs)?;
        tracing::info!(
            "Loaded {} factions and {} runs",
            history.factions.len(),
            history.store.len()
        );
        Ok(history)
    }

    /// Build a history from already parsed parts, rejecting duplicate ids.
    pub fn from_parts(factions: Vec<FactionDef>, runs: Vec<StoredRun>) -> Result<Self> {
        validate_unique("faction", factions.iter().map(|f| f.id.as_str()))?;
        validate_unique("run", runs.iter().map(|r| r.record.id.as_str()))?;

        let mut store = RunStore::new();
        for run in runs {
            store.insert(run);
        }
        Ok(Self { store, factions })
    }
}

fn validate_unique<'a>(entity: &str, ids: impl Iterator<Item = &'a str>) -> Result<()> {
    let mut seen = HashSet::new();
    for id in ids {
        if !seen.insert(id) {
            return Err(StoreError::DuplicateId {
                entity: entity.to_string(),
                id: id.to_string(),
            });
        }
    }
    Ok(())
}
