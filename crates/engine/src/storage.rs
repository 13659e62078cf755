use std::{
    collections::HashMap,
    fs, io,
    path::PathBuf,
    sync::{Arc, Mutex},
};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Unable to read snapshot: {0}")]
    ReadFailed(io::Error),

    #[error("Unable to write snapshot: {0}")]
    WriteFailed(io::Error),
}

pub type StorageResult<T> = Result<T, StorageError>;

/// Key-value snapshot store the mission manager persists into.
///
/// The browser build backs this with local storage; native builds use
/// [`FileStorage`]. A failing store must never take gameplay down with it —
/// the manager logs the failure and keeps the in-memory state authoritative.
pub trait SnapshotStorage {
    fn load(&self, key: &str) -> StorageResult<Option<String>>;
    fn store(&mut self, key: &str, payload: &str) -> StorageResult<()>;
}

/// Shared in-memory store. Clones see the same entries, which lets tests
/// reload a fresh manager from what a previous one persisted.
#[derive(Clone, Default)]
pub struct MemoryStorage {
    entries: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SnapshotStorage for MemoryStorage {
    fn load(&self, key: &str) -> StorageResult<Option<String>> {
        let entries = self
            .entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        Ok(entries.get(key).cloned())
    }

    fn store(&mut self, key: &str, payload: &str) -> StorageResult<()> {
        let mut entries = self
            .entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        entries.insert(key.to_string(), payload.to_string());
        Ok(())
    }
}

/// One JSON file per key under a directory.
pub struct FileStorage {
    directory: PathBuf,
}

impl FileStorage {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
        }
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.directory.join(format!("{key}.json"))
    }
}

impl SnapshotStorage for FileStorage {
    fn load(&self, key: &str) -> StorageResult<Option<String>> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(payload) => Ok(Some(payload)),
            Err(error) if error.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(error) => Err(StorageError::ReadFailed(error)),
        }
    }

    fn store(&mut self, key: &str, payload: &str) -> StorageResult<()> {
        fs::create_dir_all(&self.directory).map_err(StorageError::WriteFailed)?;
        fs::write(self.path_for(key), payload).map_err(StorageError::WriteFailed)
    }
}
