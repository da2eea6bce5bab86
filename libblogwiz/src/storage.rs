//! Key/value persistence port
//!
//! Values are whole JSON documents; every write replaces the previous value
//! for that key. Readers never fail on bad data: a missing or corrupt value
//! yields the caller's default.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::{Result, StorageError};

/// Key the archive blob is stored under
pub const ARCHIVE_KEY: &str = "blog-wizard-data";

/// Raw string storage
pub trait KeyValueStore: Send + Sync {
    /// Read the raw value, `None` if the key was never written
    fn read(&self, key: &str) -> Result<Option<String>>;

    /// Replace the value for `key`
    fn write(&self, key: &str, value: &str) -> Result<()>;

    /// Remove `key`; removing an absent key succeeds
    fn remove(&self, key: &str) -> Result<()>;
}

/// Typed access on top of any [`KeyValueStore`]
pub trait KeyValueStoreExt {
    /// Decode the value for `key`, or return `default` if it is missing,
    /// unreadable or does not decode
    fn get<T: DeserializeOwned>(&self, key: &str, default: T) -> T;

    /// Encode and store `value` under `key`
    fn set<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<()>;
}

impl<S: KeyValueStore + ?Sized> KeyValueStoreExt for S {
    fn get<T: DeserializeOwned>(&self, key: &str, default: T) -> T {
        let raw = match self.read(key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return default,
            Err(e) => {
                tracing::warn!(key, error = %e, "failed to read stored value, using default");
                return default;
            }
        };
        match serde_json::from_str(&raw) {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!(key, error = %e, "stored value is corrupt, using default");
                default
            }
        }
    }

    fn set<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<()> {
        let raw = serde_json::to_string(value).map_err(StorageError::Encode)?;
        self.write(key, &raw)
    }
}

/// One `<key>.json` file per key inside a directory
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Use `dir`, created lazily on first write
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        let name: String = key
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == '.' {
                    c
                } else {
                    '_'
                }
            })
            .collect();
        self.dir.join(format!("{}.json", name))
    }
}

impl KeyValueStore for FileStore {
    fn read(&self, key: &str) -> Result<Option<String>> {
        let path = self.path_for(key);
        match std::fs::read_to_string(&path) {
            Ok(raw) => Ok(Some(raw)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StorageError::Io(e).into()),
        }
    }

    fn write(&self, key: &str, value: &str) -> Result<()> {
        std::fs::create_dir_all(&self.dir).map_err(StorageError::Io)?;
        let path = self.path_for(key);
        std::fs::write(&path, value).map_err(StorageError::Io)?;
        tracing::debug!(key, path = %path.display(), bytes = value.len(), "wrote value");
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        match std::fs::remove_file(self.path_for(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StorageError::Io(e).into()),
        }
    }
}

/// In-process store, for tests and throwaway sessions
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, String>> {
        // a panicked writer cannot leave a half-written String behind
        self.values.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl KeyValueStore for MemoryStore {
    fn read(&self, key: &str) -> Result<Option<String>> {
        Ok(self.lock().get(key).cloned())
    }

    fn write(&self, key: &str, value: &str) -> Result<()> {
        self.lock().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.lock().remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use tempfile::TempDir;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Sample {
        name: String,
        count: u32,
    }

    #[test]
    fn test_memory_store_set_get_remove() {
        let store = MemoryStore::new();
        let value = Sample {
            name: "a".to_string(),
            count: 2,
        };
        store.set("k", &value).unwrap();
        assert_eq!(store.get::<Option<Sample>>("k", None), Some(value));

        store.remove("k").unwrap();
        assert_eq!(store.get("k", 7u32), 7);
    }

    #[test]
    fn test_missing_key_returns_default() {
        let store = MemoryStore::new();
        assert_eq!(store.get("absent", vec![1, 2]), vec![1, 2]);
    }

    #[test]
    fn test_corrupt_value_returns_default() {
        let store = MemoryStore::new();
        store.write("k", "{not json").unwrap();
        assert_eq!(store.get("k", 5u32), 5);

        store.write("k", r#"{"name":"x"}"#).unwrap();
        let fallback = Sample {
            name: "default".to_string(),
            count: 0,
        };
        assert_eq!(store.get("k", fallback).name, "default");
    }

    #[test]
    fn test_remove_absent_key_is_ok() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileStore::new(temp_dir.path());
        assert!(store.remove("never-written").is_ok());
        assert!(MemoryStore::new().remove("never-written").is_ok());
    }

    #[test]
    fn test_file_store_round_trip() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileStore::new(temp_dir.path().join("nested"));
        store.set(ARCHIVE_KEY, &vec!["x", "y"]).unwrap();

        assert!(temp_dir
            .path()
            .join("nested")
            .join("blog-wizard-data.json")
            .exists());
        let loaded: Vec<String> = store.get(ARCHIVE_KEY, Vec::new());
        assert_eq!(loaded, vec!["x".to_string(), "y".to_string()]);
    }

    #[test]
    fn test_file_store_overwrites_whole_value() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileStore::new(temp_dir.path());
        store.write("k", "a much longer first value").unwrap();
        store.write("k", "\"short\"").unwrap();
        assert_eq!(store.read("k").unwrap().as_deref(), Some("\"short\""));
    }

    #[test]
    fn test_file_store_corrupt_file_returns_default() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileStore::new(temp_dir.path());
        std::fs::write(temp_dir.path().join("k.json"), "garbage").unwrap();
        assert_eq!(store.get("k", 9u8), 9);
    }

    #[test]
    fn test_file_store_keys_cannot_escape_dir() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileStore::new(temp_dir.path());
        store.write("../evil", "1").unwrap();
        assert!(temp_dir.path().join(".._evil.json").exists());
    }

    #[test]
    fn test_trait_object_get() {
        let store: Box<dyn KeyValueStore> = Box::new(MemoryStore::new());
        store.set("n", &3u32).unwrap();
        assert_eq!(store.get("n", 0u32), 3);
    }
}
