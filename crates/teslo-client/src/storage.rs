//! # Durable Key/Value Storage
//!
//! The cart snapshot and each shipping-address field live under their own
//! string key. There is no atomicity across keys.
//!
//! ## Layout
//! ```text
//! ┌──────────────┬──────────────────────────────────────────────────────────┐
//! │ key          │ value                                                    │
//! ├──────────────┼──────────────────────────────────────────────────────────┤
//! │ cart         │ JSON array of line items (absent when the cart is empty) │
//! │ firstName    │ plain string                                             │
//! │ lastName     │ plain string                                             │
//! │ address      │ plain string                                             │
//! │ address2     │ plain string, "" when not given                          │
//! │ zipCode      │ plain string                                             │
//! │ city         │ plain string                                             │
//! │ country      │ plain string                                             │
//! │ phone        │ plain string                                             │
//! └──────────────┴──────────────────────────────────────────────────────────┘
//! ```

use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::StorageError;

/// Storage key names.
pub mod keys {
    pub const CART: &str = "cart";
    pub const FIRST_NAME: &str = "firstName";
    pub const LAST_NAME: &str = "lastName";
    pub const ADDRESS: &str = "address";
    pub const ADDRESS2: &str = "address2";
    pub const ZIP_CODE: &str = "zipCode";
    pub const CITY: &str = "city";
    pub const COUNTRY: &str = "country";
    pub const PHONE: &str = "phone";
}

/// String key/value storage that survives restarts (or not, for
/// [`MemoryStore`]).
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove(&mut self, key: &str) -> Result<(), StorageError>;
}

/// In-process storage, for tests and guest sessions.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        MemoryStore::default()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        self.entries.remove(key);
        Ok(())
    }
}

/// A single JSON object on disk, rewritten after every change.
///
/// ## Default Location
/// ```text
/// ~/.local/share/teslo-shop/storage.json                     (Linux)
/// ~/Library/Application Support/com.teslo.shop/storage.json  (macOS)
/// ```
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
    entries: BTreeMap<String, String>,
}

impl FileStore {
    /// Opens (or lazily creates) the storage file at `path`.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let path = path.into();

        let entries = if path.exists() {
            let contents = std::fs::read_to_string(&path)?;
            if contents.trim().is_empty() {
                BTreeMap::new()
            } else {
                serde_json::from_str(&contents)?
            }
        } else {
            debug!(?path, "Storage file not found, starting empty");
            BTreeMap::new()
        };

        Ok(FileStore { path, entries })
    }

    /// Opens the storage file in the platform data directory.
    pub fn open_default() -> Result<Self, StorageError> {
        let path = Self::default_path()
            .ok_or_else(|| StorageError::Unavailable("No data directory available".into()))?;
        Self::open(path)
    }

    pub fn default_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "teslo", "shop")
            .map(|dirs| dirs.data_dir().join("storage.json"))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn flush(&self) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(&self.entries)?;
        std::fs::write(&self.path, contents)?;
        Ok(())
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries.insert(key.to_string(), value.to_string());
        self.flush()
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        if self.entries.remove(key).is_some() {
            self.flush()?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir()
            .join(format!("teslo-client-{}-{}", name, std::process::id()))
            .join("storage.json")
    }

    #[test]
    fn test_memory_store() {
        let mut store = MemoryStore::new();
        assert_eq!(store.get(keys::CART).unwrap(), None);

        store.set(keys::CART, "[]").unwrap();
        assert_eq!(store.get(keys::CART).unwrap().as_deref(), Some("[]"));

        store.remove(keys::CART).unwrap();
        assert!(!store.contains(keys::CART));
    }

    #[test]
    fn test_file_store_survives_reopen() {
        let path = temp_path("reopen");
        let _ = std::fs::remove_file(&path);

        let mut store = FileStore::open(&path).unwrap();
        store.set(keys::FIRST_NAME, "Ana").unwrap();
        store.set(keys::CITY, "Madrid").unwrap();
        store.remove(keys::CITY).unwrap();

        let reopened = FileStore::open(&path).unwrap();
        assert_eq!(reopened.get(keys::FIRST_NAME).unwrap().as_deref(), Some("Ana"));
        assert_eq!(reopened.get(keys::CITY).unwrap(), None);

        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_file_store_rejects_corrupt_file() {
        let path = temp_path("corrupt");
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, "not json").unwrap();

        assert!(matches!(FileStore::open(&path), Err(StorageError::Corrupt(_))));

        let _ = std::fs::remove_file(&path);
    }
}
