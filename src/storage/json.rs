//! JSON file-based key-value store.
//!
//! All entries live in one human-readable JSON file. Writes use the
//! write-to-temp + rename pattern so the file is never left half written.
//!
//! # Performance Characteristics
//!
//! - **Read**: O(1), the whole file is loaded once on open
//! - **Write**: O(n), every `set` re-serializes all entries
//! - **Best for**: a handful of keys, infrequent writes

use crate::domain::error::{CinematchError, Result};
use crate::storage::backend::KeyValueStore;
use crate::storage::memory::MemoryStore;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// On-disk container format.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct StoreData {
    /// Format version for future migrations.
    version: u32,

    #[serde(default)]
    entries: BTreeMap<String, String>,
}

impl Default for StoreData {
    fn default() -> Self {
        Self {
            version: 1,
            entries: BTreeMap::new(),
        }
    }
}

/// JSON file key-value store.
///
/// Entries are cached in memory and flushed to disk on every `set`.
///
/// # File Format
///
/// ```json
/// {
///   "version": 1,
///   "entries": {
///     "cinematch_favorites": "[{\"id\":603,\"title\":\"The Matrix\"}]"
///   }
/// }
/// ```
#[derive(Debug)]
pub struct JsonFileStore {
    file_path: PathBuf,
    data: StoreData,
}

impl JsonFileStore {
    /// Opens the store at `file_path`, creating parent directories as needed.
    ///
    /// A missing file yields an empty store. A file that is not valid store
    /// JSON is logged and treated as empty; it is replaced on the next write.
    ///
    /// # Errors
    ///
    /// Returns an error if the parent directory cannot be created or the file
    /// exists but cannot be read.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use cinematch::storage::JsonFileStore;
    /// use std::path::PathBuf;
    ///
    /// let store = JsonFileStore::open(PathBuf::from("/tmp/cinematch/store.json"))?;
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn open(file_path: PathBuf) -> Result<Self> {
        tracing::debug!(path = ?file_path, "opening JSON store");

        if let Some(parent) = file_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let data = if file_path.exists() {
            Self::load_from_file(&file_path)?
        } else {
            tracing::debug!("initializing new empty store");
            StoreData::default()
        };

        tracing::debug!(entries = data.entries.len(), "store opened");
        Ok(Self { file_path, data })
    }

    /// Opens the store at `file_path` as a boxed backend, degrading to an
    /// in-memory store when the file cannot be opened. Favorites then start
    /// empty and last only for the session.
    #[must_use]
    pub fn open_or_memory(file_path: PathBuf) -> Box<dyn KeyValueStore> {
        match Self::open(file_path) {
            Ok(store) => Box::new(store),
            Err(e) => {
                tracing::error!(error = %e, "store unavailable, favorites will not persist");
                Box::new(MemoryStore::default())
            }
        }
    }

    /// Path of the backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.file_path
    }

    fn load_from_file(path: &Path) -> Result<StoreData> {
        let contents = std::fs::read_to_string(path)?;
        match serde_json::from_str::<StoreData>(&contents) {
            Ok(data) => {
                tracing::debug!(version = data.version, "loaded store data");
                Ok(data)
            }
            Err(e) => {
                tracing::warn!(error = %e, path = ?path, "store file unreadable, starting empty");
                Ok(StoreData::default())
            }
        }
    }

    fn save_to_file(&self) -> Result<()> {
        let json = serde_json::to_string_pretty(&self.data)
            .map_err(|e| CinematchError::Storage(format!("failed to serialize JSON: {e}")))?;

        let tmp_path = self.file_path.with_extension("tmp");

        tracing::trace!(tmp_path = ?tmp_path, "writing to temporary file");
        std::fs::write(&tmp_path, json)?;
        std::fs::rename(&tmp_path, &self.file_path)?;

        tracing::debug!(path = ?self.file_path, "store saved");
        Ok(())
    }
}

impl KeyValueStore for JsonFileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.data.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let _span = tracing::debug_span!("json_set", key = %key, bytes = value.len()).entered();

        self.data.entries.insert(key.to_string(), value.to_string());
        self.save_to_file()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Movie;
    use crate::storage::FavoritesStore;
    use tempfile::TempDir;

    #[test]
    fn values_survive_reopen() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("store.json");

        let mut store = JsonFileStore::open(path.clone()).unwrap();
        store.set("k", "v").unwrap();
        drop(store);

        let reopened = JsonFileStore::open(path).unwrap();
        assert_eq!(reopened.get("k").unwrap().as_deref(), Some("v"));
        assert_eq!(reopened.get("missing").unwrap(), None);
    }

    #[test]
    fn unreadable_path_falls_back_to_empty_session_store() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("store.json");
        std::fs::create_dir(&path).unwrap();
        assert!(JsonFileStore::open(path.clone()).is_err());

        let mut favorites = FavoritesStore::load(JsonFileStore::open_or_memory(path));
        assert!(favorites.list().is_empty());

        assert!(favorites.toggle(&Movie::new(603, "The Matrix")));
        assert!(favorites.is_favorite(603));
    }

    #[test]
    fn corrupt_file_opens_empty_and_is_replaced() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("store.json");
        std::fs::write(&path, "not json").unwrap();

        let mut store = JsonFileStore::open(path.clone()).unwrap();
        assert_eq!(store.get("k").unwrap(), None);

        store.set("k", "v").unwrap();
        let contents = std::fs::read_to_string(&path).unwrap();
        assert!(contents.contains("\"version\": 1"));
        assert!(!path.with_extension("tmp").exists());
    }
}
