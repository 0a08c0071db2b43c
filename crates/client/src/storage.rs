//! Persistent key-value store.
//!
//! The web front-end this client descends from kept all durable state in the
//! browser's per-origin string store. [`KeyValueStore`] reproduces that
//! contract: synchronous get/set/remove over string keys and values, no
//! transactions, last-write-wins between concurrent writers.
//!
//! [`FileStore`] is the production implementation (one JSON object per file,
//! re-read on every access so external writes are visible, the way a second
//! browser tab's writes were). [`MemoryStore`] backs tests and ephemeral runs.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use thiserror::Error;

/// Well-known storage keys shared by the stores.
pub mod keys {
    /// Bearer token of the logged-in user.
    pub const AUTH_TOKEN: &str = "authToken";
    /// JSON-serialized [`crate::auth::AuthUser`].
    pub const AUTH_USER: &str = "authUser";
    /// JSON-serialized cart item array.
    pub const CART: &str = "doceria_cart";
}

/// Errors raised by store implementations.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("storage serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Durable, process-wide string store.
///
/// `get` never fails: a missing key, an unreadable file and a corrupt file
/// all read as absent, so a damaged store degrades to "logged out, empty
/// cart" instead of wedging the client.
pub trait KeyValueStore: Send + Sync {
    /// Read a value.
    fn get(&self, key: &str) -> Option<String>;
    /// Write a value (whole-value replacement).
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
    /// Delete a value. Deleting an absent key is not an error.
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

// =============================================================================
// MemoryStore
// =============================================================================

/// In-memory store for tests and ephemeral sessions.
#[derive(Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(key);
        Ok(())
    }
}

// =============================================================================
// FileStore
// =============================================================================

/// File-backed store: a single JSON object mapping keys to string values.
///
/// Every operation re-reads the file and every write rewrites it whole, so
/// concurrent processes interleave last-write-wins - the same discipline the
/// original storage had across browser tabs. A lock serializes the
/// read-modify-write within this process.
pub struct FileStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileStore {
    /// Open (or lazily create) a store at `path`.
    ///
    /// The file itself is created on first write; a missing file reads as an
    /// empty store.
    #[must_use]
    pub fn open(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    /// Path of the backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> HashMap<String, String> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return HashMap::new(),
            Err(err) => {
                tracing::warn!(path = %self.path.display(), %err, "could not read storage file");
                return HashMap::new();
            }
        };

        match serde_json::from_str(&raw) {
            Ok(entries) => entries,
            Err(err) => {
                tracing::warn!(
                    path = %self.path.display(),
                    %err,
                    "storage file is corrupt; starting empty"
                );
                HashMap::new()
            }
        }
    }

    fn flush(&self, entries: &HashMap<String, String>) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }
        let raw = serde_json::to_string_pretty(entries)?;
        fs::write(&self.path, raw)?;
        Ok(())
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
        self.load().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
        let mut entries = self.load();
        entries.insert(key.to_owned(), value.to_owned());
        self.flush(&entries)
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
        let mut entries = self.load();
        if entries.remove(key).is_some() {
            self.flush(&entries)?;
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("doceria-storage-test-{name}-{}", std::process::id()))
    }

    #[test]
    fn test_memory_store_roundtrip() {
        let store = MemoryStore::new();
        assert_eq!(store.get("k"), None);
        store.set("k", "v").unwrap();
        assert_eq!(store.get("k"), Some("v".to_owned()));
        store.remove("k").unwrap();
        assert_eq!(store.get("k"), None);
    }

    #[test]
    fn test_memory_store_remove_absent_is_ok() {
        let store = MemoryStore::new();
        assert!(store.remove("missing").is_ok());
    }

    #[test]
    fn test_file_store_roundtrip() {
        let path = temp_path("roundtrip");
        let _ = fs::remove_file(&path);

        let store = FileStore::open(&path);
        assert_eq!(store.get(keys::CART), None);
        store.set(keys::CART, "[]").unwrap();
        assert_eq!(store.get(keys::CART), Some("[]".to_owned()));

        // A second handle over the same file sees the write.
        let other = FileStore::open(&path);
        assert_eq!(other.get(keys::CART), Some("[]".to_owned()));

        store.remove(keys::CART).unwrap();
        assert_eq!(other.get(keys::CART), None);

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_file_store_corrupt_file_reads_empty() {
        let path = temp_path("corrupt");
        fs::write(&path, "{ not json").unwrap();

        let store = FileStore::open(&path);
        assert_eq!(store.get("anything"), None);

        // Writing recovers the file.
        store.set("k", "v").unwrap();
        assert_eq!(store.get("k"), Some("v".to_owned()));

        let _ = fs::remove_file(&path);
    }
}
