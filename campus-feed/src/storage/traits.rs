//! Storage backend trait

use super::types::{StorageKey, StorageResult};
use async_trait::async_trait;

/// Abstraction for blob storage backends
///
/// Blobs are addressed by caller-chosen [`StorageKey`]s and are write-once:
/// `put` must refuse to replace an existing blob and report
/// [`StorageError::KeyCollision`](super::StorageError::KeyCollision) instead, so
/// two uploads can never silently overwrite each other.
///
/// # Examples
///
/// ```rust,no_run
/// use campus_feed::storage::{FileStorage, LocalFileStorage, StorageKey};
/// use std::path::PathBuf;
///
/// # async fn example() -> anyhow::Result<()> {
/// let storage = LocalFileStorage::new(PathBuf::from("/var/campus-feed/uploads"))?;
/// let key = StorageKey::new("1700000000000-a1b2c3d4.png");
///
/// storage.put(&key, b"...").await?;
/// assert!(storage.exists(&key).await?);
/// storage.delete(&key).await?;
/// # Ok(())
/// # }
/// ```
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait FileStorage: Send + Sync {
    /// Writes a new blob under `key`
    ///
    /// # Errors
    ///
    /// Returns `StorageError::KeyCollision` if the key is taken,
    /// `StorageError::InvalidPath` for an unsafe key, and `StorageError::Io`
    /// for any write failure.
    async fn put(&self, key: &StorageKey, data: &[u8]) -> StorageResult<()>;

    /// Reads a blob
    ///
    /// # Errors
    ///
    /// Returns `StorageError::NotFound` if nothing is stored under `key`.
    async fn retrieve(&self, key: &StorageKey) -> StorageResult<Vec<u8>>;

    /// Removes a blob
    ///
    /// Idempotent: deleting a missing blob succeeds.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend fails to remove an existing blob.
    async fn delete(&self, key: &StorageKey) -> StorageResult<()>;

    /// Checks whether a blob exists
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be queried.
    async fn exists(&self, key: &StorageKey) -> StorageResult<bool>;
}
