//! Durable key-value slot for the saved answers.

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use denim_types::WizardDocument;
use denim_utils::{WriteOptions, restore_backup, write_atomic};
use thiserror::Error;

/// Slot holding the serialized [`WizardDocument`].
pub const STORAGE_KEY: &str = "denim_onboarding";

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage I/O failed at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
}

/// One JSON file per key under a directory.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
    options: WriteOptions,
}

impl FileStore {
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            options: WriteOptions::document(),
        }
    }

    #[must_use]
    pub fn with_options(mut self, options: WriteOptions) -> Self {
        self.options = options;
        self
    }

    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    #[must_use]
    pub fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let path = self.path_for(key);
        restore_backup(&path);
        match fs::read_to_string(&path) {
            Ok(raw) => Ok(Some(raw)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(StorageError::Io { path, source }),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        let path = self.path_for(key);
        write_atomic(&path, value.as_bytes(), self.options)
            .map_err(|source| StorageError::Io { path, source })
    }
}

#[derive(Debug, Default)]
struct MemoryState {
    values: HashMap<String, String>,
    writes: Vec<(String, String)>,
    failing: bool,
}

/// In-process store. Clones share state, so a test can keep a handle while
/// the app owns another.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    state: Arc<Mutex<MemoryState>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_value(key: &str, value: &str) -> Self {
        let store = Self::new();
        store
            .lock()
            .values
            .insert(key.to_string(), value.to_string());
        store
    }

    fn lock(&self) -> MutexGuard<'_, MemoryState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    #[must_use]
    pub fn value(&self, key: &str) -> Option<String> {
        self.lock().values.get(key).cloned()
    }

    /// Every successful `set`, in order.
    #[must_use]
    pub fn writes(&self) -> Vec<(String, String)> {
        self.lock().writes.clone()
    }

    #[must_use]
    pub fn write_count(&self) -> usize {
        self.lock().writes.len()
    }

    /// Make subsequent writes fail.
    pub fn set_failing(&self, failing: bool) {
        self.lock().failing = failing;
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.value(key))
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut state = self.lock();
        if state.failing {
            return Err(StorageError::Unavailable("write rejected".to_string()));
        }
        state.values.insert(key.to_string(), value.to_string());
        state.writes.push((key.to_string(), value.to_string()));
        Ok(())
    }
}

/// Read the saved document. Missing, unreadable or corrupt data yields the
/// default document; the failure is logged and never surfaced to the user.
pub fn load_document(store: &dyn KeyValueStore) -> WizardDocument {
    let raw = match store.get(STORAGE_KEY) {
        Ok(Some(raw)) => raw,
        Ok(None) => return WizardDocument::default(),
        Err(e) => {
            tracing::warn!("Failed to read saved answers: {e}");
            return WizardDocument::default();
        }
    };
    match WizardDocument::from_json_str(&raw) {
        Ok(doc) => doc,
        Err(e) => {
            tracing::warn!("Ignoring unparsable saved answers: {e}");
            WizardDocument::default()
        }
    }
}
