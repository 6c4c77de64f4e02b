//! JSON-file backed key/value store.

use dashmap::DashMap;
use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::storage::{KeyValueStore, StorageResult};

/// Key/value store kept in memory and mirrored to a JSON object on disk.
///
/// Every `set` rewrites the file before updating memory, so a failed write
/// leaves both copies at the previous value.
#[derive(Debug, Default)]
pub struct LocalStore {
    inner: DashMap<String, String>,
    persistence_path: Option<PathBuf>,
    // Serializes writers so the file and the map change together.
    write_lock: Mutex<()>,
}

impl LocalStore {
    /// Store that lives only as long as the process.
    pub fn in_memory() -> Self {
        Self::default()
    }

    /// Open the store at `path`, loading existing entries if the file exists.
    pub fn open(path: impl AsRef<Path>) -> StorageResult<Self> {
        let path = path.as_ref().to_path_buf();
        let store = Self {
            persistence_path: Some(path.clone()),
            ..Self::default()
        };

        if path.exists() {
            let reader = BufReader::new(File::open(&path)?);
            let entries: BTreeMap<String, String> = serde_json::from_reader(reader)?;
            for (k, v) in entries {
                store.inner.insert(k, v);
            }
            tracing::debug!(path = %path.display(), entries = store.inner.len(), "Loaded local store");
        }

        Ok(store)
    }

    /// Number of stored keys.
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    fn save_to_file(&self, entries: &BTreeMap<String, String>) -> StorageResult<()> {
        let Some(path) = &self.persistence_path else {
            return Ok(());
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let tmp = path.with_extension("tmp");
        {
            let writer = BufWriter::new(File::create(&tmp)?);
            serde_json::to_writer_pretty(writer, entries)?;
        }
        fs::rename(&tmp, path)?;
        Ok(())
    }
}

impl KeyValueStore for LocalStore {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        Ok(self.inner.get(key).map(|r| r.value().clone()))
    }

    /// The new value becomes visible only after the file write succeeds.
    fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        let _guard = self.write_lock.lock().unwrap_or_else(|e| e.into_inner());

        if self.persistence_path.is_some() {
            let mut entries: BTreeMap<_, _> = self
                .inner
                .iter()
                .map(|r| (r.key().clone(), r.value().clone()))
                .collect();
            entries.insert(key.to_string(), value.to_string());
            self.save_to_file(&entries)?;
        }

        self.inner.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_in_memory_store() {
        let store = LocalStore::in_memory();
        assert!(store.get("missing").unwrap().is_none());

        store.set("transactionCount", "3").unwrap();
        assert_eq!(store.get("transactionCount").unwrap().as_deref(), Some("3"));

        store.set("transactionCount", "4").unwrap();
        assert_eq!(store.get("transactionCount").unwrap().as_deref(), Some("4"));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_persistence() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("state.json");

        let store = LocalStore::open(&path).unwrap();
        assert!(store.is_empty());
        store.set("transactionCount", "12").unwrap();

        let reopened = LocalStore::open(&path).unwrap();
        assert_eq!(reopened.get("transactionCount").unwrap().as_deref(), Some("12"));
    }

    #[test]
    fn test_failed_write_keeps_previous_value() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        fs::write(&blocker, "").unwrap();

        // The parent "directory" is a regular file, so every write fails.
        let store = LocalStore::open(blocker.join("state.json")).unwrap();
        assert!(store.set("transactionCount", "5").is_err());
        assert!(store.get("transactionCount").unwrap().is_none());
        assert!(store.is_empty());
    }

    #[test]
    fn test_corrupt_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");
        fs::write(&path, "not json").unwrap();

        let err = LocalStore::open(&path).unwrap_err();
        assert!(err.to_string().contains("format"));
    }
}
