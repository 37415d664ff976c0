//! Local filesystem store
//!
//! Every file lives directly under one root directory. Writes overwrite,
//! and there is no locking: concurrent writers to one name race and the
//! last one wins.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, info};

use crate::config::StorageConfig;
use crate::naming::NamingPolicy;
use crate::types::{AppError, AppResult};

#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
    naming: NamingPolicy,
}

impl FileStore {
    pub fn new(root: impl Into<PathBuf>, naming: NamingPolicy) -> Self {
        Self {
            root: root.into(),
            naming,
        }
    }

    pub fn from_config(config: &StorageConfig) -> Self {
        // Relative roots resolve against the working directory at startup
        let root = std::path::absolute(&config.files_dir).unwrap_or_else(|_| config.files_dir.clone());
        Self::new(root, NamingPolicy::from_config(config))
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn naming(&self) -> &NamingPolicy {
        &self.naming
    }

    /// Location of `filename` under the root. Does not touch the disk.
    pub fn path(&self, filename: &str) -> PathBuf {
        self.root.join(filename)
    }

    /// Create the root directory if needed
    pub async fn ensure_root(&self) -> AppResult<()> {
        fs::create_dir_all(&self.root)
            .await
            .map_err(|e| AppError::storage("prepare", e))?;
        info!(root = %self.root.display(), "File store ready");
        Ok(())
    }

    pub async fn exists(&self, filename: &str) -> bool {
        fs::metadata(self.path(filename))
            .await
            .map(|m| m.is_file())
            .unwrap_or(false)
    }

    /// Write `content` to `filename`, replacing any existing file
    pub async fn save(&self, filename: &str, content: &[u8]) -> AppResult<()> {
        let path = self.path(filename);
        fs::write(&path, content)
            .await
            .map_err(|e| AppError::storage("store", e))?;
        debug!(path = %path.display(), size = content.len(), "File written");
        Ok(())
    }

    pub async fn read(&self, filename: &str) -> AppResult<Vec<u8>> {
        if !self.exists(filename).await {
            return Err(AppError::NotFound(filename.to_string()));
        }
        match fs::read(self.path(filename)).await {
            Ok(content) => Ok(content),
            Err(e) if e.kind() == ErrorKind::NotFound => Err(AppError::NotFound(filename.to_string())),
            Err(e) => Err(AppError::storage("read", e)),
        }
    }

    /// Delete `filename` if present. Returns whether something was removed.
    pub async fn remove(&self, filename: &str) -> AppResult<bool> {
        if !self.exists(filename).await {
            return Ok(false);
        }
        match fs::remove_file(self.path(filename)).await {
            Ok(()) => {
                debug!(filename, "File removed");
                Ok(true)
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(AppError::storage("delete", e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn store(dir: &TempDir) -> FileStore {
        FileStore::new(dir.path(), NamingPolicy::default())
    }

    #[test]
    fn test_path_is_a_plain_join() {
        let store = FileStore::new("/srv/files", NamingPolicy::default());
        assert_eq!(store.path("a.txt"), PathBuf::from("/srv/files/a.txt"));
        assert_eq!(store.path("missing.bin"), PathBuf::from("/srv/files/missing.bin"));
    }

    #[tokio::test]
    async fn test_save_and_read_roundtrip() {
        let temp_dir = TempDir::new().unwrap();
        let store = store(&temp_dir);

        store.save("test.txt", b"hello").await.unwrap();

        assert!(store.exists("test.txt").await);
        assert_eq!(store.read("test.txt").await.unwrap(), b"hello");
    }

    #[tokio::test]
    async fn test_save_overwrites() {
        let temp_dir = TempDir::new().unwrap();
        let store = store(&temp_dir);

        store.save("test.txt", b"first").await.unwrap();
        store.save("test.txt", b"second").await.unwrap();

        assert_eq!(store.read("test.txt").await.unwrap(), b"second");
    }

    #[tokio::test]
    async fn test_remove_then_read() {
        let temp_dir = TempDir::new().unwrap();
        let store = store(&temp_dir);
        store.save("gone.txt", b"bye").await.unwrap();

        assert!(store.remove("gone.txt").await.unwrap());
        assert!(!store.exists("gone.txt").await);
        assert!(matches!(store.read("gone.txt").await, Err(AppError::NotFound(name)) if name == "gone.txt"));

        // Second removal is not an error
        assert!(!store.remove("gone.txt").await.unwrap());
    }

    #[tokio::test]
    async fn test_directories_are_not_files() {
        let temp_dir = TempDir::new().unwrap();
        let store = store(&temp_dir);
        std::fs::create_dir(temp_dir.path().join("nested")).unwrap();

        assert!(!store.exists("nested").await);
        assert!(!store.remove("nested").await.unwrap());
        assert!(matches!(store.read("nested").await, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_save_into_missing_root_fails_as_storage_error() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileStore::new(temp_dir.path().join("absent"), NamingPolicy::default());

        let err = store.save("a.txt", b"x").await.unwrap_err();
        assert!(matches!(err, AppError::Storage { operation: "store", .. }));

        store.ensure_root().await.unwrap();
        store.save("a.txt", b"x").await.unwrap();
    }
}
