//! Parsers for run history files.
//!
//! A history directory holds two JSON documents:
//! - `factions.json`: array of `FactionDef`, in definition order
//! - `runs.json`: array of `StoredRun`

use crate::error::{Result, StoreError};
use crate::types::{FactionDef, StoredRun};
use serde::de::DeserializeOwned;
use std::fs::File;
use std::io::{BufReader, ErrorKind};
use std::path::Path;

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let file = File::open(path).map_err(|err| match err.kind() {
        ErrorKind::NotFound => StoreError::FileNotFound {
            path: path.display().to_string(),
        },
        _ => StoreError::IoError(err),
    })?;

    serde_json::from_reader(BufReader::new(file)).map_err(|source| StoreError::ParseError {
        file: path.display().to_string(),
        source,
    })
}

/// Parse the faction definitions file. Order is preserved.
pub fn parse_factions(path: &Path) -> Result<Vec<FactionDef>> {
    read_json(path)
}

/// Parse the stored runs file.
pub fn parse_runs(path: &Path) -> Result<Vec<StoredRun>> {
    read_json(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_parse_factions_keeps_order() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"[{{"id": "b", "title": "Bravo Clan"}}, {{"id": "a", "title": "Alpha Clan"}}]"#
        )
        .unwrap();

        let factions = parse_factions(file.path()).unwrap();
        assert_eq!(factions.len(), 2);
        assert_eq!(factions[0].id, "b");
        assert_eq!(factions[1].display_name(), "Alpha");
    }

    #[test]
    fn test_missing_file_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let err = parse_runs(&dir.path().join("runs.json")).unwrap_err();
        assert!(matches!(err, StoreError::FileNotFound { .. }));
    }

    #[test]
    fn test_malformed_json_is_parse_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"[{{"id": "run-1", "won": "maybe"}}]"#).unwrap();

        let err = parse_runs(file.path()).unwrap_err();
        assert!(matches!(err, StoreError::ParseError { .. }));
    }
}
