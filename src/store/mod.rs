//! Settings store: the flat key/value map every page reads its content from.
//!
//! DESIGN
//! ======
//! One `SettingsStore` is built at startup and injected through `AppState`.
//! Values are always strings; an absent key and an empty string are distinct.
//! Every write updates memory, persists the whole map, then notifies the
//! registered observers synchronously with a fresh snapshot, so each write is
//! independently observable and no observer ever sees a half-applied change.
//!
//! Each commit bumps a revision under the map lock and hands it to observers
//! with the snapshot. Notification runs after the lock is released, so two
//! concurrent writers may notify out of commit order; observers that cache
//! derived state must drop snapshots older than the one they hold.
//!
//! `exclusive` serializes read-then-write sequences (id allocation, delete)
//! against each other. Plain `set` calls do not take it.
//!
//! ERROR HANDLING
//! ==============
//! Persistence failures are logged and swallowed. The in-memory value stays
//! authoritative until the next successful write.
//!
//! TRADE-OFFS
//! ==========
//! The whole map is rewritten on every write, synchronously and while the
//! map lock is held: one small file write per keystroke, on the calling
//! tokio worker. A write that returned is already on disk.

pub mod persist;

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use tracing::{debug, warn};

/// Owned copy of the whole settings map.
pub type Snapshot = HashMap<String, String>;

// =============================================================================
// CHANGE NOTIFICATION
// =============================================================================

/// A single mutation, as delivered to observers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SettingChange {
    Set { key: String, value: String },
    Removed { key: String },
}

impl SettingChange {
    #[must_use]
    pub fn key(&self) -> &str {
        match self {
            Self::Set { key, .. } | Self::Removed { key } => key,
        }
    }
}

/// Receives every store mutation after it has been applied. `revision` is
/// the commit number of `snapshot`; it increases by one per commit.
pub trait SettingsObserver: Send + Sync {
    fn settings_changed(&self, change: &SettingChange, snapshot: &Snapshot, revision: u64);
}

// =============================================================================
// STORE
// =============================================================================

struct Versioned {
    map: Snapshot,
    revision: u64,
}

#[derive(Clone)]
pub struct SettingsStore {
    inner: Arc<StoreInner>,
}

struct StoreInner {
    values: RwLock<Versioned>,
    /// Held by `exclusive` sections only.
    writer: Mutex<()>,
    observers: RwLock<Vec<Arc<dyn SettingsObserver>>>,
    /// `None` keeps the store memory-only (tests, ephemeral runs).
    path: Option<PathBuf>,
}

impl SettingsStore {
    /// Memory-only store.
    #[must_use]
    pub fn in_memory() -> Self {
        Self::build(Snapshot::new(), None)
    }

    /// Store backed by a JSON file, loading whatever the file already holds.
    #[must_use]
    pub fn open(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref().to_path_buf();
        let values: Snapshot = persist::load_json(&path);
        debug!(path = %path.display(), keys = values.len(), "settings store opened");
        Self::build(values, Some(path))
    }

    fn build(values: Snapshot, path: Option<PathBuf>) -> Self {
        Self {
            inner: Arc::new(StoreInner {
                values: RwLock::new(Versioned { map: values, revision: 0 }),
                writer: Mutex::new(()),
                observers: RwLock::new(Vec::new()),
                path,
            }),
        }
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<String> {
        self.read_values().map.get(key).cloned()
    }

    /// Full copy of the current map.
    #[must_use]
    pub fn snapshot(&self) -> Snapshot {
        self.read_values().map.clone()
    }

    /// Current map together with its commit number, read atomically.
    #[must_use]
    pub fn versioned_snapshot(&self) -> (Snapshot, u64) {
        let values = self.read_values();
        (values.map.clone(), values.revision)
    }

    /// Commits since the store was opened.
    #[must_use]
    pub fn revision(&self) -> u64 {
        self.read_values().revision
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.read_values().map.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.read_values().map.is_empty()
    }

    /// Run `f` with no other `exclusive` section in progress. Used where a
    /// write depends on what was read just before it.
    pub fn exclusive<R>(&self, f: impl FnOnce(&Self) -> R) -> R {
        let _guard = self.inner.writer.lock().unwrap_or_else(PoisonError::into_inner);
        f(self)
    }

    /// Store or overwrite a value. `""` is stored as-is.
    pub fn set(&self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        let (snapshot, revision) = {
            let mut values = self.write_values();
            values.map.insert(key.clone(), value.clone());
            values.revision += 1;
            self.persist_locked(&values.map);
            (values.map.clone(), values.revision)
        };
        self.notify(&SettingChange::Set { key, value }, &snapshot, revision);
    }

    /// Apply several writes in order. Each one is persisted and observed on
    /// its own.
    pub fn set_many<I, K, V>(&self, pairs: I)
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        for (key, value) in pairs {
            self.set(key, value);
        }
    }

    /// Make a key absent. Returns whether it existed.
    pub fn remove(&self, key: &str) -> bool {
        let (snapshot, revision) = {
            let mut values = self.write_values();
            if values.map.remove(key).is_none() {
                return false;
            }
            values.revision += 1;
            self.persist_locked(&values.map);
            (values.map.clone(), values.revision)
        };
        self.notify(&SettingChange::Removed { key: key.to_owned() }, &snapshot, revision);
        true
    }

    /// Register an observer. It is called on every later mutation.
    pub fn subscribe(&self, observer: Arc<dyn SettingsObserver>) {
        self.inner
            .observers
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(observer);
    }

    fn notify(&self, change: &SettingChange, snapshot: &Snapshot, revision: u64) {
        // Clone the list so observers may read the store without deadlocking.
        let observers = self
            .inner
            .observers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();
        for observer in observers {
            observer.settings_changed(change, snapshot, revision);
        }
    }

    fn persist_locked(&self, values: &Snapshot) {
        let Some(path) = &self.inner.path else {
            return;
        };
        if let Err(e) = persist::write_json(path, values) {
            warn!(error = %e, path = %path.display(), "settings persist failed; keeping in-memory value");
        }
    }

    fn read_values(&self) -> RwLockReadGuard<'_, Versioned> {
        self.inner.values.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_values(&self) -> RwLockWriteGuard<'_, Versioned> {
        self.inner.values.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for SettingsStore {
    fn default() -> Self {
        Self::in_memory()
    }
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;
