#![forbid(unsafe_code)]

//! Persistent key-value stores.
//!
//! [`KeyValueStore`] is the durability boundary for completion data. Two
//! implementations ship with the runtime:
//!
//! - [`MemoryStore`]: in-process map, counts writes, optional simulated
//!   write failure. Used by tests and by hosts without durable storage.
//! - [`FileStore`]: one JSON object on disk, rewritten atomically on every
//!   `set` (write to a sibling temp file, then rename). A file that does
//!   not parse is moved aside on open and never blocks startup.

use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Storage failure.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("storage I/O failed: {0}")]
    Io(#[from] io::Error),
    #[error("failed to encode storage file: {0}")]
    Format(#[from] serde_json::Error),
    #[error("storage is read-only")]
    ReadOnly,
}

/// String-keyed, string-valued durable storage.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Store `value` under `key`. Must be durable when this returns `Ok`.
    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
}

/// In-memory store.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
    writes: usize,
    read_only: bool,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed an entry without counting it as a write.
    #[must_use]
    pub fn with_entry(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.entries.insert(key.into(), value.into());
        self
    }

    /// Reject every subsequent `set` with [`StorageError::ReadOnly`].
    pub fn set_read_only(&mut self, read_only: bool) {
        self.read_only = read_only;
    }

    /// Number of successful `set` calls.
    #[inline]
    pub fn writes(&self) -> usize {
        self.writes
    }

    /// Raw value, bypassing the trait.
    pub fn peek(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        if self.read_only {
            return Err(StorageError::ReadOnly);
        }
        self.entries.insert(key.to_owned(), value.to_owned());
        self.writes += 1;
        Ok(())
    }
}

/// JSON-file-backed store.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    entries: BTreeMap<String, String>,
}

impl FileStore {
    /// Open the store at `path`. A missing file is an empty store.
    ///
    /// A file that does not parse is moved aside to `<path>.corrupt` and
    /// the store starts empty. Only I/O failures other than a missing file
    /// are errors.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StorageError> {
        let path = path.as_ref().to_path_buf();
        let entries: BTreeMap<String, String> = match fs::read_to_string(&path) {
            Ok(content) if content.trim().is_empty() => BTreeMap::new(),
            Ok(content) => match serde_json::from_str(&content) {
                Ok(entries) => entries,
                Err(err) => {
                    quarantine(&path, &err);
                    BTreeMap::new()
                }
            },
            Err(err) if err.kind() == io::ErrorKind::NotFound => BTreeMap::new(),
            Err(err) => return Err(err.into()),
        };
        tracing::debug!(path = %path.display(), entries = entries.len(), "opened file store");
        Ok(Self { path, entries })
    }

    /// Where an unparseable store file is kept.
    pub fn corrupt_path(&self) -> PathBuf {
        corrupt_path(&self.path)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn flush(&self) -> Result<(), StorageError> {
        let tmp = self.path.with_extension("tmp");
        let body = serde_json::to_string_pretty(&self.entries)?;
        fs::write(&tmp, body)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

fn corrupt_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(".corrupt");
    PathBuf::from(name)
}

fn quarantine(path: &Path, err: &serde_json::Error) {
    let aside = corrupt_path(path);
    match fs::rename(path, &aside) {
        Ok(()) => tracing::warn!(
            path = %path.display(),
            moved_to = %aside.display(),
            error = %err,
            "storage file corrupt, starting empty"
        ),
        Err(rename_err) => tracing::warn!(
            path = %path.display(),
            error = %err,
            rename_error = %rename_err,
            "storage file corrupt and could not be moved aside, starting empty"
        ),
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        let previous = self.entries.insert(key.to_owned(), value.to_owned());
        if let Err(err) = self.flush() {
            // Keep memory in step with disk.
            match previous {
                Some(old) => self.entries.insert(key.to_owned(), old),
                None => self.entries.remove(key),
            };
            return Err(err);
        }
        Ok(())
    }
}
