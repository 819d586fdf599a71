//! Durable storage for session history
//!
//! One record per session, addressed by a string key. Writes overwrite the
//! whole record; there is no atomic rename, so a crash mid-write can leave a
//! corrupt record behind (the history loader tolerates that).

use crate::errors::{ConversationError, Result};
use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

/// Key-value persistence medium, one record per session
pub trait DurableStore: Send + Sync {
    /// Read a record; `Ok(None)` when no record exists under `key`
    fn read(&self, key: &str) -> Result<Option<String>>;

    /// Replace the record under `key`
    fn write(&self, key: &str, contents: &str) -> Result<()>;
}

/// Stores each record as a file inside a directory
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    storage_dir: PathBuf,
}

impl JsonFileStore {
    /// Store rooted at `storage_dir`; the directory is created on first write
    pub fn new(storage_dir: impl Into<PathBuf>) -> Self {
        Self {
            storage_dir: storage_dir.into(),
        }
    }

    /// File path backing `key`
    pub fn path_for(&self, key: &str) -> PathBuf {
        self.storage_dir.join(key)
    }

    /// Get storage directory
    pub fn storage_dir(&self) -> &Path {
        &self.storage_dir
    }
}

impl DurableStore for JsonFileStore {
    fn read(&self, key: &str) -> Result<Option<String>> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn write(&self, key: &str, contents: &str) -> Result<()> {
        let path = self.path_for(key);

        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        fs::write(&path, contents)?;
        Ok(())
    }
}

/// Process-local store; clones share the same records
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    records: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Raw contents of a record, if present
    pub fn get(&self, key: &str) -> Option<String> {
        self.records.lock().ok()?.get(key).cloned()
    }

    /// Overwrite a record directly
    pub fn insert(&self, key: impl Into<String>, contents: impl Into<String>) {
        if let Ok(mut records) = self.records.lock() {
            records.insert(key.into(), contents.into());
        }
    }
}

impl DurableStore for MemoryStore {
    fn read(&self, key: &str) -> Result<Option<String>> {
        let records = self
            .records
            .lock()
            .map_err(|e| ConversationError::Generic(format!("Store lock poisoned: {}", e)))?;
        Ok(records.get(key).cloned())
    }

    fn write(&self, key: &str, contents: &str) -> Result<()> {
        let mut records = self
            .records
            .lock()
            .map_err(|e| ConversationError::Generic(format!("Store lock poisoned: {}", e)))?;
        records.insert(key.to_string(), contents.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn create_test_store() -> (JsonFileStore, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let store = JsonFileStore::new(temp_dir.path());
        (store, temp_dir)
    }

    #[test]
    fn test_missing_record_is_none() {
        let (store, _temp) = create_test_store();
        assert!(store.read("history_missing.json").unwrap().is_none());
    }

    #[test]
    fn test_write_then_read() {
        let (store, _temp) = create_test_store();

        store.write("history_a.json", "[]").unwrap();
        assert_eq!(store.read("history_a.json").unwrap().as_deref(), Some("[]"));
        assert!(store.path_for("history_a.json").exists());
    }

    #[test]
    fn test_write_overwrites_whole_record() {
        let (store, _temp) = create_test_store();

        store.write("history_a.json", "a much longer first record").unwrap();
        store.write("history_a.json", "short").unwrap();
        assert_eq!(store.read("history_a.json").unwrap().as_deref(), Some("short"));
    }

    #[test]
    fn test_write_creates_storage_dir() {
        let temp_dir = TempDir::new().unwrap();
        let store = JsonFileStore::new(temp_dir.path().join("nested").join("sessions"));

        store.write("history_b.json", "[]").unwrap();
        assert!(store.storage_dir().exists());
    }

    #[test]
    fn test_unreadable_record_is_error() {
        let (store, temp) = create_test_store();

        // A directory where a file is expected cannot be read as a record
        std::fs::create_dir(temp.path().join("history_dir.json")).unwrap();
        assert!(store.read("history_dir.json").is_err());
    }

    #[test]
    fn test_memory_store_clones_share_records() {
        let store = MemoryStore::new();
        let clone = store.clone();

        store.write("k", "v").unwrap();
        assert_eq!(clone.read("k").unwrap().as_deref(), Some("v"));
        assert_eq!(clone.get("k").as_deref(), Some("v"));
    }
}
