//! String key-value preference storage.
//!
//! Backends implement the fallible [`PreferenceStore::read`] and
//! [`PreferenceStore::write`]. Callers use the provided
//! [`PreferenceStore::load`] and [`PreferenceStore::save`], which are best
//! effort: failures are logged and reported as `None`/`false`, never as
//! errors. A failed save leaves the preference session-only.

use std::collections::{BTreeMap, HashMap};
use std::ffi::OsString;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::error::StoreError;

/// Storage backend for persisted preferences.
pub trait PreferenceStore {
    /// Reads a value. `Ok(None)` means the key is absent.
    fn read(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Writes a value, replacing any previous one.
    fn write(&mut self, key: &str, value: &str) -> Result<(), StoreError>;

    /// Best-effort read. Backend errors are logged and treated as absence.
    fn load(&self, key: &str) -> Option<String> {
        match self.read(key) {
            Ok(value) => value,
            Err(e) => {
                warn!(key, error = %e, "could not load preference");
                None
            }
        }
    }

    /// Best-effort write. Returns `false` if the value was not persisted.
    fn save(&mut self, key: &str, value: &str) -> bool {
        match self.write(key, value) {
            Ok(()) => true,
            Err(e) => {
                warn!(key, error = %e, "could not save preference; keeping it for this session only");
                false
            }
        }
    }
}

impl<S: PreferenceStore + ?Sized> PreferenceStore for Box<S> {
    fn read(&self, key: &str) -> Result<Option<String>, StoreError> {
        (**self).read(key)
    }

    fn write(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        (**self).write(key, value)
    }
}

/// In-memory store, optionally limited to a byte quota.
///
/// The quota counts the bytes of every key and value, like browser local
/// storage does.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
    quota: Option<usize>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store that refuses writes growing it past `bytes`.
    pub fn with_quota(bytes: usize) -> Self {
        Self {
            entries: HashMap::new(),
            quota: Some(bytes),
        }
    }

    /// Seeds an entry, bypassing the quota.
    pub fn with_entry(mut self, key: &str, value: &str) -> Self {
        self.entries.insert(key.to_string(), value.to_string());
        self
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn used_bytes_without(&self, key: &str) -> usize {
        self.entries
            .iter()
            .filter(|(k, _)| k.as_str() != key)
            .map(|(k, v)| k.len() + v.len())
            .sum()
    }
}

impl PreferenceStore for MemoryStore {
    fn read(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.entries.get(key).cloned())
    }

    fn write(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        if let Some(quota) = self.quota {
            let needed = self.used_bytes_without(key) + key.len() + value.len();
            if needed > quota {
                return Err(StoreError::QuotaExceeded {
                    key: key.to_string(),
                    quota,
                    needed,
                });
            }
        }
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Store backed by a JSON object file.
///
/// The file is read once when the store is opened and replaced on every
/// write by renaming a freshly written sibling over it. A missing file is an empty store; so is a malformed one, after a
/// warning.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    entries: BTreeMap<String, String>,
}

impl FileStore {
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let entries = match Self::read_entries(&path) {
            Ok(entries) => entries,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "ignoring unreadable preference file");
                BTreeMap::new()
            }
        };
        debug!(path = %path.display(), entries = entries.len(), "opened preference file");
        Self { path, entries }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_entries(path: &Path) -> Result<BTreeMap<String, String>, StoreError> {
        let text = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(BTreeMap::new()),
            Err(source) => {
                return Err(StoreError::Io {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };
        if text.trim().is_empty() {
            return Ok(BTreeMap::new());
        }
        Ok(serde_json::from_str(&text)?)
    }

    /// Sibling file new contents are written to and then renamed over the
    /// store. An interrupted write leaves the store intact.
    fn staging_path(&self) -> PathBuf {
        let mut name = self.path.file_name().map(OsString::from).unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    fn flush(&self, entries: &BTreeMap<String, String>) -> Result<(), StoreError> {
        let json = serde_json::to_string_pretty(entries)?;
        let staging = self.staging_path();

        fs::write(&staging, json).map_err(|source| StoreError::Io {
            path: staging.clone(),
            source,
        })?;
        if let Err(source) = fs::rename(&staging, &self.path) {
            if let Err(e) = fs::remove_file(&staging) {
                debug!(path = %staging.display(), error = %e, "could not remove staging file");
            }
            return Err(StoreError::Io {
                path: self.path.clone(),
                source,
            });
        }
        Ok(())
    }
}

impl PreferenceStore for FileStore {
    fn read(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.entries.get(key).cloned())
    }

    fn write(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        let mut next = self.entries.clone();
        next.insert(key.to_string(), value.to_string());
        self.flush(&next)?;
        self.entries = next;
        Ok(())
    }
}
