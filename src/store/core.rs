use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use thiserror::Error;

/// Key under which tour completion is recorded.
pub const TOUR_COMPLETED_KEY: &str = "fetuccine_tour_completed";
/// Only this value counts as "completed"; anything else is treated as absent.
pub const TOUR_COMPLETED_VALUE: &str = "true";

pub type StoreResult<T> = std::result::Result<T, StoreError>;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store unavailable: {0}")]
    Unavailable(String),
    #[error("store contents are corrupt: {0}")]
    Corrupt(#[from] serde_json::Error),
    #[error("store I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// String key-value storage with the semantics of browser local storage.
pub trait FlagStore: Send {
    fn get(&self, key: &str) -> StoreResult<Option<String>>;
    fn set(&mut self, key: &str, value: &str) -> StoreResult<()>;
    fn remove(&mut self, key: &str) -> StoreResult<()>;
}

/// In-memory store. Clones share the same map so a caller can keep a handle
/// after boxing one into a controller.
#[derive(Clone, Default)]
pub struct MemoryStore {
    inner: Arc<Mutex<MemoryInner>>,
}

#[derive(Default)]
struct MemoryInner {
    values: HashMap<String, String>,
    writes: HashMap<String, usize>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entry(key: &str, value: &str) -> Self {
        let store = Self::new();
        if let Ok(mut guard) = store.inner.lock() {
            guard.values.insert(key.to_string(), value.to_string());
        }
        store
    }

    pub fn value(&self, key: &str) -> Option<String> {
        self.inner
            .lock()
            .ok()
            .and_then(|guard| guard.values.get(key).cloned())
    }

    /// Number of successful `set` calls for `key`.
    pub fn write_count(&self, key: &str) -> usize {
        self.inner
            .lock()
            .ok()
            .and_then(|guard| guard.writes.get(key).copied())
            .unwrap_or(0)
    }

    fn lock(&self) -> StoreResult<std::sync::MutexGuard<'_, MemoryInner>> {
        self.inner
            .lock()
            .map_err(|_| StoreError::Unavailable("memory store poisoned".to_string()))
    }
}

impl FlagStore for MemoryStore {
    fn get(&self, key: &str) -> StoreResult<Option<String>> {
        Ok(self.lock()?.values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> StoreResult<()> {
        let mut guard = self.lock()?;
        guard.values.insert(key.to_string(), value.to_string());
        *guard.writes.entry(key.to_string()).or_insert(0) += 1;
        Ok(())
    }

    fn remove(&mut self, key: &str) -> StoreResult<()> {
        self.lock()?.values.remove(key);
        Ok(())
    }
}

/// Persists entries as a flat JSON object in a single file. The file is read
/// on every access so external edits (clearing the flag) are picked up.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> StoreResult<BTreeMap<String, String>> {
        match fs::read_to_string(&self.path) {
            Ok(raw) if raw.trim().is_empty() => Ok(BTreeMap::new()),
            Ok(raw) => Ok(serde_json::from_str(&raw)?),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(err) => Err(err.into()),
        }
    }

    fn save(&self, entries: &BTreeMap<String, String>) -> StoreResult<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let raw = serde_json::to_string_pretty(entries)?;
        fs::write(&self.path, raw)?;
        Ok(())
    }
}

impl FlagStore for JsonFileStore {
    fn get(&self, key: &str) -> StoreResult<Option<String>> {
        Ok(self.load()?.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> StoreResult<()> {
        let mut entries = self.load()?;
        entries.insert(key.to_string(), value.to_string());
        self.save(&entries)
    }

    fn remove(&mut self, key: &str) -> StoreResult<()> {
        let mut entries = self.load()?;
        if entries.remove(key).is_some() {
            self.save(&entries)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_store_shares_state_between_clones() {
        let store = MemoryStore::new();
        let mut boxed: Box<dyn FlagStore> = Box::new(store.clone());
        boxed.set(TOUR_COMPLETED_KEY, TOUR_COMPLETED_VALUE).unwrap();
        assert_eq!(store.value(TOUR_COMPLETED_KEY).as_deref(), Some("true"));
        assert_eq!(store.write_count(TOUR_COMPLETED_KEY), 1);
    }

    #[test]
    fn file_store_round_trips_and_removes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("storage.json");
        let mut store = JsonFileStore::new(&path);
        assert_eq!(store.get(TOUR_COMPLETED_KEY).unwrap(), None);

        store.set(TOUR_COMPLETED_KEY, TOUR_COMPLETED_VALUE).unwrap();
        let reopened = JsonFileStore::new(&path);
        assert_eq!(
            reopened.get(TOUR_COMPLETED_KEY).unwrap().as_deref(),
            Some("true")
        );

        store.remove(TOUR_COMPLETED_KEY).unwrap();
        assert_eq!(reopened.get(TOUR_COMPLETED_KEY).unwrap(), None);
    }

    #[test]
    fn corrupt_file_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("storage.json");
        fs::write(&path, "{not json").unwrap();
        let store = JsonFileStore::new(&path);
        assert!(matches!(
            store.get(TOUR_COMPLETED_KEY),
            Err(StoreError::Corrupt(_))
        ));
    }
}
