//! Durable string-keyed storage.
//!
//! Every operation is best-effort: failures are logged and swallowed so a
//! broken disk never takes the session down with it.

use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use tracing::{debug, warn};

use crate::persistence::{default_data_dir, write_atomic};

/// A best-effort string key-value store.
pub trait KeyValueStore: Send + Sync + fmt::Debug {
    /// Reads a value. Missing or unreadable entries read as `None`.
    fn get(&self, key: &str) -> Option<String>;

    /// Writes a value.
    fn set(&self, key: &str, value: &str);

    /// Deletes a value.
    fn remove(&self, key: &str);
}

// ============================================================================
// File store
// ============================================================================

/// Stores each key in its own file under a directory.
#[derive(Debug, Clone)]
pub struct FileKvStore {
    dir: PathBuf,
}

impl FileKvStore {
    /// Creates a store rooted at `dir`. The directory is created lazily.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Creates a store in the platform data directory.
    pub fn default_location() -> Self {
        Self::new(default_data_dir())
    }

    /// Root directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// File backing `key`. Characters outside `[A-Za-z0-9_-]` become `_`.
    pub fn path_for(&self, key: &str) -> PathBuf {
        let name: String = key
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
            .collect();
        self.dir.join(name)
    }
}

impl KeyValueStore for FileKvStore {
    fn get(&self, key: &str) -> Option<String> {
        let path = self.path_for(key);
        match std::fs::read_to_string(&path) {
            Ok(value) => Some(value),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => None,
            Err(e) => {
                warn!(key, path = %path.display(), error = %e, "Failed to read stored value");
                None
            }
        }
    }

    fn set(&self, key: &str, value: &str) {
        let path = self.path_for(key);
        match write_atomic(&path, value.as_bytes()) {
            Ok(()) => debug!(key, path = %path.display(), "Stored value"),
            Err(e) => warn!(key, path = %path.display(), error = %e, "Failed to store value"),
        }
    }

    fn remove(&self, key: &str) {
        let path = self.path_for(key);
        match std::fs::remove_file(&path) {
            Ok(()) => debug!(key, "Removed stored value"),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => warn!(key, error = %e, "Failed to remove stored value"),
        }
    }
}

// ============================================================================
// Memory store
// ============================================================================

/// In-memory store for tests and ephemeral sessions.
#[derive(Debug, Default)]
pub struct MemoryKvStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryKvStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store pre-filled with entries.
    pub fn with_entries<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            entries: Mutex::new(
                entries
                    .into_iter()
                    .map(|(k, v)| (k.into(), v.into()))
                    .collect(),
            ),
        }
    }
}

impl KeyValueStore for MemoryKvStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }

    fn set(&self, key: &str, value: &str) {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.to_string(), value.to_string());
    }

    fn remove(&self, key: &str) {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(key);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_store_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileKvStore::new(dir.path().join("data"));

        assert_eq!(store.get("theme"), None);
        store.set("theme", "light");
        assert_eq!(store.get("theme").as_deref(), Some("light"));

        // A fresh instance sees the persisted value.
        let reopened = FileKvStore::new(dir.path().join("data"));
        assert_eq!(reopened.get("theme").as_deref(), Some("light"));

        reopened.remove("theme");
        assert_eq!(store.get("theme"), None);
        reopened.remove("theme");
    }

    #[test]
    fn test_key_sanitizing() {
        let store = FileKvStore::new("/tmp/kv");
        assert_eq!(store.path_for("../etc/passwd"), PathBuf::from("/tmp/kv/___etc_passwd"));
    }

    #[test]
    fn test_unwritable_dir_is_swallowed() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("file");
        std::fs::write(&blocker, "x").unwrap();

        // The "directory" is a regular file, so every write fails.
        let store = FileKvStore::new(&blocker);
        store.set("history", "[]");
        assert_eq!(store.get("history"), None);
    }

    #[test]
    fn test_memory_store() {
        let store = MemoryKvStore::with_entries([("theme", "dark")]);
        assert_eq!(store.get("theme").as_deref(), Some("dark"));
        store.set("theme", "light");
        assert_eq!(store.get("theme").as_deref(), Some("light"));
        store.remove("theme");
        assert!(store.get("theme").is_none());
    }
}
