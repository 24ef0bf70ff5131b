//! Named string slots standing in for the host's key/value storage.
//!
//! The audit log and the installation identifier each live in their own
//! slot. [`MemorySlots`] keeps them in process; [`FileSlots`] keeps one file
//! per slot in a directory and writes atomically (temp file, then rename).

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised by slot backends and by (de)serializing slot contents.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Slot '{key}' I/O failed: {source}")]
    Io {
        key: String,
        #[source]
        source: io::Error,
    },

    #[error("Slot '{key}' holds unreadable data: {source}")]
    Corrupt {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Invalid slot key '{0}'")]
    InvalidKey(String),
}

/// A key/value store of string slots.
pub trait Slots {
    /// Read a slot; `Ok(None)` when it was never written.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Replace a slot's contents.
    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Delete a slot. Removing a missing slot is not an error.
    fn remove(&mut self, key: &str) -> Result<(), StorageError>;
}

/// In-process slots.
#[derive(Debug, Default, Clone)]
pub struct MemorySlots {
    values: HashMap<String, String>,
}

impl MemorySlots {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Slots for MemorySlots {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        self.values.remove(key);
        Ok(())
    }
}

/// Slots stored as `<dir>/<key>.json`.
#[derive(Debug, Clone)]
pub struct FileSlots {
    dir: PathBuf,
}

impl FileSlots {
    /// Use `dir` for slot files, creating it if needed.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let dir = dir.into();
        fs::create_dir_all(&dir).map_err(|source| StorageError::Io {
            key: dir.display().to_string(),
            source,
        })?;
        Ok(Self { dir })
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, StorageError> {
        let valid = !key.is_empty()
            && key
                .bytes()
                .all(|b| b.is_ascii_alphanumeric() || b == b'_' || b == b'-');
        if !valid {
            return Err(StorageError::InvalidKey(key.to_string()));
        }
        Ok(self.dir.join(format!("{key}.json")))
    }
}

impl Slots for FileSlots {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let path = self.path_for(key)?;
        match fs::read_to_string(&path) {
            Ok(text) => Ok(Some(text)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(StorageError::Io {
                key: key.to_string(),
                source,
            }),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        let path = self.path_for(key)?;
        let temp = path.with_extension("json.tmp");
        let io_err = |source: io::Error| StorageError::Io {
            key: key.to_string(),
            source,
        };
        fs::write(&temp, value).map_err(io_err)?;
        fs::rename(&temp, &path).map_err(io_err)
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        let path = self.path_for(key)?;
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(source) => Err(StorageError::Io {
                key: key.to_string(),
                source,
            }),
        }
    }
}
