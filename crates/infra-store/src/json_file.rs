// JSON File Store - single-file key-value persistence

use queuesmart_core::error::{AppError, Result};
use queuesmart_core::port::StateStore;
use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;
use tracing::warn;

/// File-backed key-value store: one JSON object mapping keys to raw string
/// values.
///
/// Every operation is a synchronous read-modify-write of the whole file.
/// A missing or unparsable file degrades to the empty map (best-effort
/// store contract); only write failures surface as errors. Writes go
/// through a sibling temp file and rename so a crash mid-write leaves the
/// previous content intact.
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    /// Open a store at `path`, creating parent directories as needed.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)
                    .map_err(|e| AppError::Store(format!("create {}: {e}", parent.display())))?;
            }
        }
        Ok(Self { path })
    }

    pub fn path(&self) -> &std::path::Path {
        &self.path
    }

    fn read_cells(&self) -> BTreeMap<String, String> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return BTreeMap::new(),
            Err(err) => {
                warn!(
                    path = %self.path.display(),
                    error = %err,
                    "store unreadable, treating as empty"
                );
                return BTreeMap::new();
            }
        };

        match serde_json::from_str(&raw) {
            Ok(cells) => cells,
            Err(err) => {
                warn!(
                    path = %self.path.display(),
                    error = %err,
                    "store corrupt, treating as empty"
                );
                BTreeMap::new()
            }
        }
    }

    fn write_cells(&self, cells: &BTreeMap<String, String>) -> Result<()> {
        let raw = serde_json::to_string_pretty(cells)
            .map_err(|e| AppError::Store(format!("encode store: {e}")))?;

        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, raw).map_err(|e| AppError::Store(format!("write {}: {e}", tmp.display())))?;
        fs::rename(&tmp, &self.path)
            .map_err(|e| AppError::Store(format!("rename into {}: {e}", self.path.display())))?;
        Ok(())
    }
}

impl StateStore for JsonFileStore {
    fn load_raw(&self, key: &str) -> Result<Option<String>> {
        Ok(self.read_cells().get(key).cloned())
    }

    fn save_raw(&self, key: &str, value: &str) -> Result<()> {
        let mut cells = self.read_cells();
        cells.insert(key.to_string(), value.to_string());
        self.write_cells(&cells)
    }

    fn remove(&self, key: &str) -> Result<()> {
        let mut cells = self.read_cells();
        if cells.remove(key).is_some() {
            self.write_cells(&cells)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_save_load_remove_round_trip() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = JsonFileStore::open(dir.path().join("state.json")).expect("open");

        assert_eq!(store.load_raw("qs_services").expect("load"), None);

        store.save_raw("qs_services", "[1,2,3]").expect("save");
        assert_eq!(
            store.load_raw("qs_services").expect("load"),
            Some("[1,2,3]".to_string())
        );

        store.remove("qs_services").expect("remove");
        assert_eq!(store.load_raw("qs_services").expect("load"), None);
        // removing again is a no-op
        store.remove("qs_services").expect("remove twice");
    }

    #[test]
    fn test_values_survive_reopen() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("state.json");

        JsonFileStore::open(&path)
            .expect("open")
            .save_raw("qs_queues", "{}")
            .expect("save");

        let reopened = JsonFileStore::open(&path).expect("reopen");
        assert_eq!(
            reopened.load_raw("qs_queues").expect("load"),
            Some("{}".to_string())
        );
    }

    #[test]
    fn test_corrupt_file_degrades_to_empty() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("state.json");
        fs::write(&path, "this is not json").expect("write garbage");

        let store = JsonFileStore::open(&path).expect("open");
        assert_eq!(store.load_raw("qs_services").expect("load"), None);

        // writing replaces the corrupt content with a valid cell map
        store.save_raw("qs_services", "[]").expect("save");
        assert_eq!(
            store.load_raw("qs_services").expect("load"),
            Some("[]".to_string())
        );
    }

    #[test]
    fn test_creates_missing_parent_directories() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("nested/deeper/state.json");

        let store = JsonFileStore::open(&path).expect("open");
        store.save_raw("k", "v").expect("save");
        assert!(path.exists());
    }
}
