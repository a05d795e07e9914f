use std::collections::HashMap;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

/// Error type for key-value store access
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("could not read {path}: {source}")]
    ReadError {
        path: PathBuf,
        source: io::Error,
    },
    #[error("could not write {path}: {source}")]
    WriteError {
        path: PathBuf,
        source: io::Error,
    },
    #[error("could not encode {key}: {source}")]
    EncodeError {
        key: String,
        source: serde_json::Error,
    },
    #[error("store rejected write to {0}")]
    Rejected(String),
}

/// String-valued storage keyed by name. Values are JSON documents.
pub trait KeyValueStore {
    /// `Ok(None)` when the key has never been written.
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError>;
}

/// One `<key>.json` file per key in the data directory.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        FileStore { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let path = self.path_for(key);
        match fs::read_to_string(&path) {
            Ok(text) => Ok(Some(text)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StoreError::ReadError { path, source: e }),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        let path = self.path_for(key);
        fs::create_dir_all(&self.dir)
            .and_then(|_| atomic_write(&path, value.as_bytes()))
            .map_err(|e| StoreError::WriteError { path, source: e })
    }
}

/// In-process store, used by tests and as a scratch backend.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    values: HashMap<String, String>,
    reject_writes: bool,
    /// Successful writes left before one write fails
    fail_after: Option<usize>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent `set` fail, to exercise write-failure paths.
    pub fn reject_writes(mut self) -> Self {
        self.reject_writes = true;
        self
    }

    /// Let `ok_writes` more writes through, fail the next one, then recover.
    pub fn fail_write_after(&mut self, ok_writes: usize) {
        self.fail_after = Some(ok_writes);
    }

    pub fn with(mut self, key: &str, value: &str) -> Self {
        self.values.insert(key.to_string(), value.to_string());
        self
    }

    pub fn raw(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        if self.reject_writes {
            return Err(StoreError::Rejected(key.to_string()));
        }
        match self.fail_after {
            Some(0) => {
                self.fail_after = None;
                return Err(StoreError::Rejected(key.to_string()));
            }
            Some(n) => self.fail_after = Some(n - 1),
            None => {}
        }
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Encode a value and write it under `key`.
pub(crate) fn put_json<S, T>(store: &mut S, key: &str, value: &T) -> Result<(), StoreError>
where
    S: KeyValueStore + ?Sized,
    T: serde::Serialize + ?Sized,
{
    let text = serde_json::to_string_pretty(value).map_err(|e| StoreError::EncodeError {
        key: key.to_string(),
        source: e,
    })?;
    store.set(key, &text)?;
    tracing::info!(key, bytes = text.len(), "store write");
    Ok(())
}

/// Write a file via temp-file-and-rename so readers never see a torn file.
pub fn atomic_write(path: &Path, content: &[u8]) -> io::Result<()> {
    let dir = path.parent().unwrap_or(Path::new("."));
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(content)?;
    tmp.flush()?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}
