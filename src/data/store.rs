//! File-backed persistence for the comparison list.
//!
//! The selection is stored as a JSON array of RCDTS codes. Reads never
//! fail: a missing file or content that does not parse as a string array
//! loads as an empty selection.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::comparison::ComparisonStore;

pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: PathBuf) -> Self {
        JsonFileStore { path }
    }

    /// Default state file under the platform data directory.
    pub fn default_path() -> PathBuf {
        dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("schoolscope")
            .join("comparison.json")
    }
}

impl ComparisonStore for JsonFileStore {
    fn load(&self) -> Vec<String> {
        let Ok(raw) = fs::read_to_string(&self.path) else {
            return Vec::new();
        };
        serde_json::from_str(&raw).unwrap_or_default()
    }

    fn save(&self, ids: &[String]) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("failed to create state directory: {parent:?}"))?;
        }
        let serialized = serde_json::to_string(ids)?;
        fs::write(&self.path, serialized)
            .with_context(|| format!("failed to write comparison state: {:?}", self.path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store_in(dir: &tempfile::TempDir) -> JsonFileStore {
        JsonFileStore::new(dir.path().join("comparison.json"))
    }

    #[test]
    fn test_missing_file_loads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        assert!(store.load().is_empty());
    }

    #[test]
    fn test_round_trip_preserves_order() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);

        let ids: Vec<String> = ["b", "a", "c"].iter().map(|s| s.to_string()).collect();
        store.save(&ids).unwrap();
        assert_eq!(store.load(), ids);
    }

    #[test]
    fn test_save_overwrites_completely() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);

        let five: Vec<String> = ["a", "b", "c", "d", "e"].iter().map(|s| s.to_string()).collect();
        store.save(&five).unwrap();
        let one: Vec<String> = vec!["z".to_string()];
        store.save(&one).unwrap();

        assert_eq!(store.load(), one);
    }

    #[test]
    fn test_corrupt_content_loads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);

        fs::write(dir.path().join("comparison.json"), "{not json").unwrap();
        assert!(store.load().is_empty());

        // Valid JSON of the wrong shape is also treated as absent
        fs::write(dir.path().join("comparison.json"), r#"{"a": 1}"#).unwrap();
        assert!(store.load().is_empty());

        fs::write(dir.path().join("comparison.json"), "[1, 2, 3]").unwrap();
        assert!(store.load().is_empty());
    }

    #[test]
    fn test_save_creates_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("nested").join("state").join("comparison.json"));

        store.save(&["a".to_string()]).unwrap();
        assert_eq!(store.load(), ["a".to_string()]);
    }

    #[test]
    fn test_stored_format_is_a_json_array() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);

        store.save(&["x".to_string(), "y".to_string()]).unwrap();
        let raw = fs::read_to_string(dir.path().join("comparison.json")).unwrap();
        assert_eq!(raw, r#"["x","y"]"#);
    }
}
