use crate::models::LogEntry;
use std::{
    env, fs, io,
    path::{Path, PathBuf},
    sync::{Arc, Mutex, PoisonError},
};
use thiserror::Error;
use tracing::{debug, error};

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("failed to access activity log: {0}")]
    Io(#[from] io::Error),

    #[error("failed to serialize activity log: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// A single durable slot holding the serialized collection.
pub trait LogStorage: Send + Sync {
    /// Returns `Ok(None)` when nothing has been stored yet.
    fn read(&self) -> Result<Option<Vec<u8>>, StorageError>;

    /// Replaces the slot contents.
    fn write(&self, payload: &[u8]) -> Result<(), StorageError>;
}

pub fn resolve_data_path() -> PathBuf {
    if let Ok(path) = env::var("APP_DATA_PATH") {
        return PathBuf::from(path);
    }

    PathBuf::from("data/activities.json")
}

#[derive(Debug, Clone)]
pub struct JsonFileStorage {
    path: PathBuf,
}

impl JsonFileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl LogStorage for JsonFileStorage {
    fn read(&self) -> Result<Option<Vec<u8>>, StorageError> {
        match fs::read(&self.path) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    fn write(&self, payload: &[u8]) -> Result<(), StorageError> {
        fs::write(&self.path, payload)?;
        Ok(())
    }
}

/// In-memory slot. Clones share the same slot, so a test can reopen a
/// store over what a previous store wrote.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    slot: Arc<Mutex<Option<Vec<u8>>>>,
}

impl MemoryStorage {
    pub fn with_payload(payload: impl Into<Vec<u8>>) -> Self {
        Self {
            slot: Arc::new(Mutex::new(Some(payload.into()))),
        }
    }

    pub fn payload(&self) -> Option<Vec<u8>> {
        self.slot.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }
}

impl LogStorage for MemoryStorage {
    fn read(&self) -> Result<Option<Vec<u8>>, StorageError> {
        Ok(self.payload())
    }

    fn write(&self, payload: &[u8]) -> Result<(), StorageError> {
        *self.slot.lock().unwrap_or_else(PoisonError::into_inner) = Some(payload.to_vec());
        Ok(())
    }
}

/// Reads the collection. A missing, unreadable or unparsable slot yields
/// an empty collection.
pub fn load_entries(storage: &dyn LogStorage) -> Vec<LogEntry> {
    match storage.read() {
        Ok(Some(bytes)) => match serde_json::from_slice(&bytes) {
            Ok(entries) => entries,
            Err(err) => {
                error!("failed to parse activity log: {err}");
                Vec::new()
            }
        },
        Ok(None) => {
            debug!("no activity log stored yet");
            Vec::new()
        }
        Err(err) => {
            error!("failed to read activity log: {err}");
            Vec::new()
        }
    }
}

pub fn persist_entries(storage: &dyn LogStorage, entries: &[LogEntry]) -> Result<(), StorageError> {
    let payload = serde_json::to_vec_pretty(entries)?;
    storage.write(&payload)
}
