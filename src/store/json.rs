//! Key-value store persisted as a flat JSON object

use std::fs;
use std::path::{Path, PathBuf};

use rustc_hash::FxHashMap;
use serde_json::Value;
use tracing::{debug, warn};

use super::{KeyValueStore, MemoryStore, StoreValue};
use crate::error::TrainerError;

/// Store backed by a JSON file, written on `flush`
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    inner: MemoryStore,
    dirty: bool,
}

impl JsonFileStore {
    /// Open `path`; a missing file starts an empty store.
    ///
    /// Entries that are neither a number nor a string are dropped with a
    /// warning instead of failing the whole file.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, TrainerError> {
        let path = path.as_ref().to_path_buf();
        let raw: FxHashMap<String, Value> = match fs::read_to_string(&path) {
            Ok(content) => serde_json::from_str(&content)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => FxHashMap::default(),
            Err(e) => return Err(e.into()),
        };
        let values: FxHashMap<String, StoreValue> = raw
            .into_iter()
            .filter_map(|(key, value)| match serde_json::from_value(value) {
                Ok(value) => Some((key, value)),
                Err(e) => {
                    warn!(
                        path = %path.display(),
                        key = %key,
                        error = %e,
                        "dropping unreadable entry"
                    );
                    None
                }
            })
            .collect();
        debug!(path = %path.display(), keys = values.len(), "store opened");

        Ok(JsonFileStore {
            path,
            inner: MemoryStore::from_values(values),
            dirty: false,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl KeyValueStore for JsonFileStore {
    fn get_string(&self, key: &str, default: &str) -> String {
        self.inner.get_string(key, default)
    }

    fn set_string(&mut self, key: &str, value: &str) {
        self.inner.set_string(key, value);
        self.dirty = true;
    }

    fn get_float(&self, key: &str) -> Option<f32> {
        self.inner.get_float(key)
    }

    /// Non-finite values mean "unset" and are stored as an absent key,
    /// since JSON cannot hold them
    fn set_float(&mut self, key: &str, value: f32) {
        if value.is_finite() {
            self.inner.set_float(key, value);
        } else {
            debug!(key, value, "non-finite value stored as unset");
            self.inner.delete_key(key);
        }
        self.dirty = true;
    }

    fn has_key(&self, key: &str) -> bool {
        self.inner.has_key(key)
    }

    fn delete_key(&mut self, key: &str) {
        self.inner.delete_key(key);
        self.dirty = true;
    }

    fn flush(&mut self) -> Result<(), TrainerError> {
        if !self.dirty {
            return Ok(());
        }
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let json = serde_json::to_string_pretty(self.inner.values())?;
        fs::write(&self.path, json)?;
        self.dirty = false;
        debug!(path = %self.path.display(), "store flushed");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "fret-trainer-store-{}-{}",
            std::process::id(),
            name
        ));
        let _ = fs::remove_dir_all(&dir);
        dir.join("prefs.json")
    }

    #[test]
    fn test_missing_file_opens_empty() {
        let store = JsonFileStore::open(scratch("missing")).unwrap();
        assert!(!store.has_key("GameMode"));
    }

    #[test]
    fn test_values_survive_reopen() {
        let path = scratch("reopen");
        {
            let mut store = JsonFileStore::open(&path).unwrap();
            store.set_string("GameMode", "Hard");
            store.set_float("BestTime:Hard", 8.25);
            store.flush().unwrap();
        }

        let store = JsonFileStore::open(&path).unwrap();
        assert_eq!(store.get_string("GameMode", "Easy"), "Hard");
        assert_eq!(store.get_float("BestTime:Hard"), Some(8.25));
    }

    #[test]
    fn test_unflushed_writes_are_lost() {
        let path = scratch("unflushed");
        {
            let mut store = JsonFileStore::open(&path).unwrap();
            store.set_float("BestTime", 3.0);
        }
        let store = JsonFileStore::open(&path).unwrap();
        assert!(!store.has_key("BestTime"));
    }

    #[test]
    fn test_infinite_value_reopens_as_unset() {
        let path = scratch("infinite");
        {
            let mut store = JsonFileStore::open(&path).unwrap();
            store.set_string("GameMode", "Hard");
            store.set_float("BestTime:Hard", 4.0);
            store.set_float("BestTime:Hard", f32::INFINITY);
            assert_eq!(store.get_float("BestTime:Hard"), None);
            store.flush().unwrap();
        }

        let store = JsonFileStore::open(&path).unwrap();
        assert_eq!(store.get_string("GameMode", "Easy"), "Hard");
        assert!(!store.has_key("BestTime:Hard"));
    }

    #[test]
    fn test_foreign_entries_are_skipped() {
        let path = scratch("foreign");
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(
            &path,
            r#"{ "BestTime:Hard": 4.0, "Volume": true, "Skin": null, "GameMode": "Hard" }"#,
        )
        .unwrap();

        let store = JsonFileStore::open(&path).unwrap();
        assert_eq!(store.get_float("BestTime:Hard"), Some(4.0));
        assert_eq!(store.get_string("GameMode", "Easy"), "Hard");
        assert!(!store.has_key("Volume"));
        assert!(!store.has_key("Skin"));
    }

    #[test]
    fn test_malformed_file_is_persistence_error() {
        let path = scratch("malformed");
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "{ not json").unwrap();

        assert!(matches!(
            JsonFileStore::open(&path),
            Err(TrainerError::Persistence(_))
        ));
    }
}
