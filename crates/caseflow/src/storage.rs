use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind as IoErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use shared_types::{AppError, StorageCode};

// ---------------------------------------------------------------------------
// Trait
// ---------------------------------------------------------------------------

/// Key-value blob substrate under the case store. One serialized block per
/// key, mirroring the browser local storage the original system ran on. A
/// database-backed implementation can replace this without touching the
/// store's contract.
pub trait BlobStore: Send + Sync {
    /// Read the blob under `key`. Absent keys are `Ok(None)`.
    fn read(&self, key: &str) -> Result<Option<String>, AppError>;

    /// Write (replace) the blob under `key`.
    fn write(&self, key: &str, value: &str) -> Result<(), AppError>;

    /// Remove the blob under `key`. Removing an absent key is not an error.
    fn remove(&self, key: &str) -> Result<(), AppError>;

    /// Bytes currently stored under `key`, 0 when absent.
    fn len(&self, key: &str) -> Result<u64, AppError>;
}

// ---------------------------------------------------------------------------
// File-backed implementation
// ---------------------------------------------------------------------------

/// Blob store keeping one JSON file per key under a data directory.
pub struct FileBlobStore {
    root: PathBuf,
}

impl FileBlobStore {
    pub fn new(root: impl AsRef<Path>) -> Result<Self, AppError> {
        let root = root.as_ref().to_path_buf();
        fs::create_dir_all(&root).map_err(|e| {
            AppError::storage(
                StorageCode::SaveFailed,
                format!("Failed to create data directory {}: {e}", root.display()),
            )
        })?;
        Ok(Self { root })
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.root.join(format!("{key}.json"))
    }
}

impl BlobStore for FileBlobStore {
    fn read(&self, key: &str) -> Result<Option<String>, AppError> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == IoErrorKind::NotFound => Ok(None),
            Err(e) => Err(AppError::storage(
                StorageCode::LoadFailed,
                format!("Failed to read {key}: {e}"),
            )),
        }
    }

    fn write(&self, key: &str, value: &str) -> Result<(), AppError> {
        fs::write(self.path_for(key), value).map_err(|e| {
            AppError::storage(
                StorageCode::SaveFailed,
                format!("Failed to write {key}: {e}"),
            )
        })
    }

    fn remove(&self, key: &str) -> Result<(), AppError> {
        match fs::remove_file(self.path_for(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == IoErrorKind::NotFound => Ok(()),
            Err(e) => Err(AppError::storage(
                StorageCode::SaveFailed,
                format!("Failed to remove {key}: {e}"),
            )),
        }
    }

    fn len(&self, key: &str) -> Result<u64, AppError> {
        match fs::metadata(self.path_for(key)) {
            Ok(meta) => Ok(meta.len()),
            Err(e) if e.kind() == IoErrorKind::NotFound => Ok(0),
            Err(e) => Err(AppError::storage(
                StorageCode::LoadFailed,
                format!("Failed to stat {key}: {e}"),
            )),
        }
    }
}

// ---------------------------------------------------------------------------
// In-memory implementation
// ---------------------------------------------------------------------------

/// In-memory blob store for tests and ephemeral runs.
#[derive(Default)]
pub struct MemoryBlobStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryBlobStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl BlobStore for MemoryBlobStore {
    fn read(&self, key: &str) -> Result<Option<String>, AppError> {
        Ok(self.entries.lock().unwrap().get(key).cloned())
    }

    fn write(&self, key: &str, value: &str) -> Result<(), AppError> {
        self.entries
            .lock()
            .unwrap()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), AppError> {
        self.entries.lock().unwrap().remove(key);
        Ok(())
    }

    fn len(&self, key: &str) -> Result<u64, AppError> {
        Ok(self
            .entries
            .lock()
            .unwrap()
            .get(key)
            .map(|v| v.len() as u64)
            .unwrap_or(0))
    }
}
