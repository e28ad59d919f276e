//! Durable key/value storage for the session, addressed by fixed keys.

use async_trait::async_trait;
use std::collections::{BTreeMap, HashMap};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use thiserror::Error;

pub const ACCESS_TOKEN_KEY: &str = "adminToken";
pub const REFRESH_TOKEN_KEY: &str = "adminRefreshToken";
pub const ADMIN_DATA_KEY: &str = "adminData";

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Storage format error: {0}")]
    Format(#[from] serde_json::Error),
}

#[async_trait]
pub trait KeyValueStorage: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
    /// Removing a missing key is not an error.
    async fn remove(&self, key: &str) -> Result<(), StorageError>;
}

#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().map(|e| e.is_empty()).unwrap_or(true)
    }
}

#[async_trait]
impl KeyValueStorage for MemoryStorage {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self
            .entries
            .lock()
            .map_err(|_| poisoned())?
            .get(key)
            .cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries
            .lock()
            .map_err(|_| poisoned())?
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.entries.lock().map_err(|_| poisoned())?.remove(key);
        Ok(())
    }
}

fn poisoned() -> StorageError {
    StorageError::Io(std::io::Error::new(
        ErrorKind::Other,
        "memory storage lock poisoned",
    ))
}

/// A JSON object on disk. Writes go through a temp file and a rename; the
/// file is deleted once it holds no keys.
#[derive(Debug)]
pub struct FileStorage {
    path: PathBuf,
    write_lock: tokio::sync::Mutex<()>,
}

impl FileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: tokio::sync::Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read_all(&self) -> Result<BTreeMap<String, String>, StorageError> {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) if bytes.is_empty() => Ok(BTreeMap::new()),
            Ok(bytes) => match serde_json::from_slice(&bytes) {
                Ok(entries) => Ok(entries),
                Err(e) => {
                    // Unreadable state is dropped; the next write replaces the file.
                    tracing::warn!(path = %self.path.display(), error = %e, "Discarding corrupt session file");
                    Ok(BTreeMap::new())
                }
            },
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(e) => Err(e.into()),
        }
    }

    async fn write_all(&self, entries: &BTreeMap<String, String>) -> Result<(), StorageError> {
        if entries.is_empty() {
            return match tokio::fs::remove_file(&self.path).await {
                Err(e) if e.kind() != ErrorKind::NotFound => Err(e.into()),
                _ => Ok(()),
            };
        }

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }

        let tmp = self.path.with_extension("tmp");
        tokio::fs::write(&tmp, serde_json::to_vec_pretty(entries)?).await?;
        tokio::fs::rename(&tmp, &self.path).await?;
        Ok(())
    }
}

#[async_trait]
impl KeyValueStorage for FileStorage {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.read_all().await?.remove(key))
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let _guard = self.write_lock.lock().await;
        let mut entries = self.read_all().await?;
        entries.insert(key.to_string(), value.to_string());
        self.write_all(&entries).await
    }

    async fn remove(&self, key: &str) -> Result<(), StorageError> {
        let _guard = self.write_lock.lock().await;
        let mut entries = self.read_all().await?;
        if entries.remove(key).is_none() && !entries.is_empty() {
            return Ok(());
        }
        self.write_all(&entries).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn memory_storage_round_trip() {
        let storage = MemoryStorage::new();
        storage.set(ACCESS_TOKEN_KEY, "T1").await.unwrap();
        assert_eq!(
            storage.get(ACCESS_TOKEN_KEY).await.unwrap().as_deref(),
            Some("T1")
        );

        storage.remove(ACCESS_TOKEN_KEY).await.unwrap();
        storage.remove(ACCESS_TOKEN_KEY).await.unwrap();
        assert!(storage.is_empty());
    }

    #[tokio::test]
    async fn file_storage_survives_new_instance() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("session.json");

        FileStorage::new(&path)
            .set(REFRESH_TOKEN_KEY, "R1")
            .await
            .unwrap();

        let reopened = FileStorage::new(&path);
        assert_eq!(
            reopened.get(REFRESH_TOKEN_KEY).await.unwrap().as_deref(),
            Some("R1")
        );
        assert!(reopened.get(ACCESS_TOKEN_KEY).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn file_removed_with_last_key() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::new(dir.path().join("session.json"));

        storage.set(ACCESS_TOKEN_KEY, "T1").await.unwrap();
        storage.set(ADMIN_DATA_KEY, "{}").await.unwrap();
        storage.remove(ACCESS_TOKEN_KEY).await.unwrap();
        assert!(storage.path().exists());

        storage.remove(ADMIN_DATA_KEY).await.unwrap();
        assert!(!storage.path().exists());

        // Removing from an already empty store is fine.
        storage.remove(ADMIN_DATA_KEY).await.unwrap();
    }

    #[tokio::test]
    async fn corrupt_file_reads_as_empty_and_is_replaced() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        std::fs::write(&path, b"not json").unwrap();

        let storage = FileStorage::new(&path);
        assert!(storage.get(ACCESS_TOKEN_KEY).await.unwrap().is_none());

        storage.set(ACCESS_TOKEN_KEY, "T1").await.unwrap();
        assert_eq!(
            storage.get(ACCESS_TOKEN_KEY).await.unwrap().as_deref(),
            Some("T1")
        );
    }
}
