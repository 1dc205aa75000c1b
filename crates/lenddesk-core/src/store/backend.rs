use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::RwLock;

use chrono::{DateTime, Utc};
use tracing::debug;

use super::StoreError;

/// A string key-value store.
///
/// Values are opaque strings; the `Storage` adapter decides what they
/// contain. Implementations must be `Send + Sync` so the store can live in
/// the app state that background tasks report into.
pub trait KeyValueStore: Send + Sync {
    /// Human-readable name for logging.
    fn name(&self) -> &str;

    /// Read a value. `Ok(None)` when the key was never written.
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Write a value, replacing any previous one.
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;

    /// Remove a key. Removing a missing key is not an error.
    fn remove(&self, key: &str) -> Result<(), StoreError>;

    /// Remove every key.
    fn clear(&self) -> Result<(), StoreError>;

    /// When the key was last written, if the backend tracks it.
    fn updated_at(&self, _key: &str) -> Option<DateTime<Utc>> {
        None
    }
}

// ============================================================================
// File Store
// ============================================================================

/// One `<key>.json` file per key inside a directory.
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: PathBuf) -> Result<Self, StoreError> {
        std::fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    fn key_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }

    fn temp_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json.tmp", key))
    }
}

impl KeyValueStore for FileStore {
    fn name(&self) -> &str {
        "FileStore"
    }

    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let path = self.key_path(key);
        if !path.exists() {
            return Ok(None);
        }
        Ok(Some(std::fs::read_to_string(path)?))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        // Write-then-rename so a crash never leaves a half-written value
        let tmp = self.temp_path(key);
        std::fs::write(&tmp, value)?;
        std::fs::rename(&tmp, self.key_path(key))?;
        debug!(key, bytes = value.len(), "Stored value");
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        let path = self.key_path(key);
        if path.exists() {
            std::fs::remove_file(path)?;
        }
        Ok(())
    }

    fn clear(&self) -> Result<(), StoreError> {
        for entry in std::fs::read_dir(&self.dir)? {
            let path = entry?.path();
            if path.extension().is_some_and(|ext| ext == "json") {
                std::fs::remove_file(path)?;
            }
        }
        Ok(())
    }

    fn updated_at(&self, key: &str) -> Option<DateTime<Utc>> {
        let modified = std::fs::metadata(self.key_path(key))
            .and_then(|m| m.modified())
            .ok()?;
        Some(DateTime::<Utc>::from(modified))
    }
}

// ============================================================================
// Memory Store
// ============================================================================

struct MemoryEntry {
    value: String,
    updated_at: DateTime<Utc>,
}

/// In-memory store for tests and ephemeral runs. Lost on exit.
#[derive(Default)]
pub struct MemoryStore {
    data: RwLock<HashMap<String, MemoryEntry>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn name(&self) -> &str {
        "MemoryStore"
    }

    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let guard = self.data.read().map_err(|_| StoreError::Poisoned)?;
        Ok(guard.get(key).map(|e| e.value.clone()))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let mut guard = self.data.write().map_err(|_| StoreError::Poisoned)?;
        guard.insert(
            key.to_string(),
            MemoryEntry {
                value: value.to_string(),
                updated_at: Utc::now(),
            },
        );
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        let mut guard = self.data.write().map_err(|_| StoreError::Poisoned)?;
        guard.remove(key);
        Ok(())
    }

    fn clear(&self) -> Result<(), StoreError> {
        let mut guard = self.data.write().map_err(|_| StoreError::Poisoned)?;
        guard.clear();
        Ok(())
    }

    fn updated_at(&self, key: &str) -> Option<DateTime<Utc>> {
        let guard = self.data.read().ok()?;
        guard.get(key).map(|e| e.updated_at)
    }
}
