//! Persistence layer for QueryDeck.
//!
//! The workspace is stored as a single JSON document under a fixed key in a
//! keyed store. Reads happen once at startup; every mutation writes the whole
//! document again.

pub mod history;

pub use history::{HistoryEntry, HistoryTracker, MAX_HISTORY_ENTRIES};

use crate::error::{QueryDeckError, Result};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;
use tracing::{info, warn};

/// A durable string store addressed by key.
pub trait KeyValueStore: Send + Sync {
    /// Reads the value stored under `key`. `Ok(None)` when absent.
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Replaces the value stored under `key`.
    fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Removes the value stored under `key`, if any.
    fn remove(&self, key: &str) -> Result<()>;

    /// Moves an unreadable value aside so the next write starts clean.
    fn quarantine(&self, key: &str) -> Result<()> {
        self.remove(key)
    }
}

/// Keyed store backed by one JSON file per key in a directory.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Opens the store at `dir`, creating the directory if needed.
    pub fn open(dir: &Path) -> Result<Self> {
        std::fs::create_dir_all(dir).map_err(|e| {
            QueryDeckError::persistence_write(format!(
                "Failed to create store directory {}: {e}",
                dir.display()
            ))
        })?;
        info!("Workspace store opened at {}", dir.display());
        Ok(Self {
            dir: dir.to_path_buf(),
        })
    }

    /// Returns the directory holding the store.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Returns the file path used for `key`.
    pub fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.path_for(key);
        if !path.exists() {
            return Ok(None);
        }
        std::fs::read_to_string(&path).map(Some).map_err(|e| {
            QueryDeckError::persistence_read(format!("Failed to read {}: {e}", path.display()))
        })
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let path = self.path_for(key);
        let tmp_path = path.with_extension("json.tmp");

        std::fs::write(&tmp_path, value).map_err(|e| {
            QueryDeckError::persistence_write(format!(
                "Failed to write {}: {e}",
                tmp_path.display()
            ))
        })?;
        std::fs::rename(&tmp_path, &path).map_err(|e| {
            QueryDeckError::persistence_write(format!(
                "Failed to replace {}: {e}",
                path.display()
            ))
        })
    }

    fn remove(&self, key: &str) -> Result<()> {
        let path = self.path_for(key);
        if !path.exists() {
            return Ok(());
        }
        std::fs::remove_file(&path).map_err(|e| {
            QueryDeckError::persistence_write(format!("Failed to remove {}: {e}", path.display()))
        })
    }

    /// Backs up a corrupted record to `<key>.json.bak`.
    fn quarantine(&self, key: &str) -> Result<()> {
        let path = self.path_for(key);
        if !path.exists() {
            return Ok(());
        }
        let backup_path = path.with_extension("json.bak");
        std::fs::rename(&path, &backup_path).map_err(|e| {
            QueryDeckError::persistence_write(format!(
                "Failed to backup corrupted record to {}: {e}",
                backup_path.display()
            ))
        })?;
        warn!("Backed up corrupted record to {}", backup_path.display());
        Ok(())
    }
}

/// In-memory keyed store.
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: Mutex<HashMap<String, String>>,
    fail_writes: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store pre-populated with one value.
    pub fn with_value(key: &str, value: impl Into<String>) -> Self {
        let store = Self::new();
        store.lock().insert(key.to_string(), value.into());
        store
    }

    /// Makes subsequent writes fail, to exercise write-error handling.
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, String>> {
        // A poisoned map is still a valid map
        self.values.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.lock().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(QueryDeckError::persistence_write("store is read-only"));
        }
        self.lock().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.lock().remove(key);
        Ok(())
    }
}
