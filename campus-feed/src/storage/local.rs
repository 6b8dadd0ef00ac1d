//! Local filesystem storage implementation

use super::traits::FileStorage;
use super::types::{StorageError, StorageKey, StorageResult};
use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;

/// Local filesystem storage backend
///
/// Every blob is a flat file named after its key directly under the upload
/// root, which is what the `/uploads/<key>` route serves.
///
/// ```text
/// /var/campus-feed/uploads/
/// ├── 1700000000000-Q2x9mB7kLp0aZr4T.png
/// └── 1700000000123-Hf8sN1cVb6yWq3eD.pdf
/// ```
///
/// # Examples
///
/// ```rust,no_run
/// use campus_feed::storage::LocalFileStorage;
/// use std::path::PathBuf;
///
/// let storage = LocalFileStorage::new(PathBuf::from("/var/campus-feed/uploads"))?;
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug, Clone)]
pub struct LocalFileStorage {
    /// Upload root directory
    root: PathBuf,
}

impl LocalFileStorage {
    /// Creates a storage rooted at `root`
    ///
    /// The directory is created lazily on first write.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::InvalidPath` if `root` exists and is not a directory.
    pub fn new(root: PathBuf) -> StorageResult<Self> {
        if root.exists() && !root.is_dir() {
            return Err(StorageError::InvalidPath(format!(
                "{} is not a directory",
                root.display()
            )));
        }

        Ok(Self { root })
    }

    /// Upload root directory
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, key: &StorageKey) -> StorageResult<PathBuf> {
        if !key.is_safe() {
            return Err(StorageError::InvalidPath(key.to_string()));
        }
        Ok(self.root.join(key.as_str()))
    }
}

#[async_trait]
impl FileStorage for LocalFileStorage {
    async fn put(&self, key: &StorageKey, data: &[u8]) -> StorageResult<()> {
        let path = self.path_for(key)?;
        fs::create_dir_all(&self.root).await?;

        let mut file = match fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .await
        {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                return Err(StorageError::KeyCollision(key.to_string()));
            }
            Err(e) => return Err(e.into()),
        };

        let written = async {
            file.write_all(data).await?;
            file.sync_all().await
        }
        .await;

        if let Err(e) = written {
            // Drop the partial blob so the key stays free
            if let Err(cleanup) = fs::remove_file(&path).await {
                tracing::warn!(key = %key, error = %cleanup, "failed to remove partial upload");
            }
            return Err(e.into());
        }

        Ok(())
    }

    async fn retrieve(&self, key: &StorageKey) -> StorageResult<Vec<u8>> {
        let path = self.path_for(key)?;
        match fs::read(&path).await {
            Ok(data) => Ok(data),
            Err(e) if e.kind() == ErrorKind::NotFound => Err(StorageError::NotFound(key.to_string())),
            Err(e) => Err(e.into()),
        }
    }

    async fn delete(&self, key: &StorageKey) -> StorageResult<()> {
        let path = self.path_for(key)?;
        match fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    async fn exists(&self, key: &StorageKey) -> StorageResult<bool> {
        let path = self.path_for(key)?;
        Ok(fs::try_exists(&path).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn create_test_storage() -> (LocalFileStorage, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let storage = LocalFileStorage::new(temp_dir.path().join("uploads")).unwrap();
        (storage, temp_dir)
    }

    #[tokio::test]
    async fn test_put_and_retrieve() {
        let (storage, _temp) = create_test_storage();
        let key = StorageKey::new("1700000000000-abc.txt");

        storage.put(&key, b"Hello, World!").await.unwrap();

        let data = storage.retrieve(&key).await.unwrap();
        assert_eq!(data, b"Hello, World!");
        assert!(storage.root().join("1700000000000-abc.txt").exists());
    }

    #[tokio::test]
    async fn test_put_refuses_to_overwrite() {
        let (storage, _temp) = create_test_storage();
        let key = StorageKey::new("taken");

        storage.put(&key, b"original").await.unwrap();
        let err = storage.put(&key, b"intruder").await.unwrap_err();

        assert!(matches!(err, StorageError::KeyCollision(_)));
        assert_eq!(storage.retrieve(&key).await.unwrap(), b"original");
    }

    #[tokio::test]
    async fn test_delete_is_idempotent() {
        let (storage, _temp) = create_test_storage();
        let key = StorageKey::new("to-delete.bin");

        storage.put(&key, b"Test").await.unwrap();
        assert!(storage.exists(&key).await.unwrap());

        storage.delete(&key).await.unwrap();
        assert!(!storage.exists(&key).await.unwrap());

        storage.delete(&key).await.unwrap();
    }

    #[tokio::test]
    async fn test_retrieve_nonexistent() {
        let (storage, _temp) = create_test_storage();

        let result = storage.retrieve(&StorageKey::new("missing")).await;
        assert!(matches!(result.unwrap_err(), StorageError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_rejects_traversal_keys() {
        let (storage, _temp) = create_test_storage();

        let result = storage.put(&StorageKey::new("../escape"), b"x").await;
        assert!(matches!(result.unwrap_err(), StorageError::InvalidPath(_)));
    }

    #[tokio::test]
    async fn test_invalid_root() {
        let temp = TempDir::new().unwrap();
        let file_path = temp.path().join("not-a-directory");
        std::fs::write(&file_path, b"test").unwrap();

        let result = LocalFileStorage::new(file_path);
        assert!(matches!(result.unwrap_err(), StorageError::InvalidPath(_)));
    }
}
