//! Key allocation plus write, with collision retry

use super::keys::{extension_for, KeyGenerator};
use super::traits::FileStorage;
use super::types::{StorageError, StorageKey, StorageResult};
use std::sync::Arc;

/// How many fresh keys are tried before giving up
pub const MAX_KEY_ATTEMPTS: usize = 5;

/// Persists upload bytes under a newly allocated key
///
/// Relies on the backend's write-once `put`: a collision is reported by the
/// backend and answered with a new key rather than an overwrite.
#[derive(Clone)]
pub struct StorageWriter {
    storage: Arc<dyn FileStorage>,
    keys: Arc<dyn KeyGenerator>,
}

impl StorageWriter {
    /// Creates a writer over a backend and key source
    #[must_use]
    pub fn new(storage: Arc<dyn FileStorage>, keys: Arc<dyn KeyGenerator>) -> Self {
        Self { storage, keys }
    }

    /// Underlying backend
    #[must_use]
    pub fn storage(&self) -> &Arc<dyn FileStorage> {
        &self.storage
    }

    /// Writes `data` and returns the key it was stored under
    ///
    /// # Errors
    ///
    /// Returns `StorageError::KeysExhausted` if every attempt collided, or the
    /// backend's error for any other failure.
    pub async fn write(&self, filename: &str, data: &[u8]) -> StorageResult<StorageKey> {
        let extension = extension_for(filename);

        for attempt in 1..=MAX_KEY_ATTEMPTS {
            let key = self.keys.generate(&extension);
            match self.storage.put(&key, data).await {
                Ok(()) => {
                    tracing::debug!(key = %key, bytes = data.len(), "stored upload");
                    return Ok(key);
                }
                Err(StorageError::KeyCollision(_)) => {
                    tracing::warn!(key = %key, attempt, "storage key collision, retrying");
                }
                Err(e) => return Err(e),
            }
        }

        Err(StorageError::KeysExhausted {
            attempts: MAX_KEY_ATTEMPTS,
        })
    }
}

impl std::fmt::Debug for StorageWriter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StorageWriter").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::traits::MockFileStorage;
    use crate::storage::LocalFileStorage;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tempfile::TempDir;

    /// Hands out `key-0`, `key-1`, ... with the requested extension
    #[derive(Default)]
    struct SequentialKeys(AtomicUsize);

    impl KeyGenerator for SequentialKeys {
        fn generate(&self, extension: &str) -> StorageKey {
            let n = self.0.fetch_add(1, Ordering::SeqCst);
            StorageKey::new(format!("key-{n}{extension}"))
        }
    }

    #[tokio::test]
    async fn test_write_uses_filename_extension() {
        let temp = TempDir::new().unwrap();
        let storage = Arc::new(LocalFileStorage::new(temp.path().to_path_buf()).unwrap());
        let writer = StorageWriter::new(storage.clone(), Arc::new(SequentialKeys::default()));

        let key = writer.write("Avatar.PNG", b"bytes").await.unwrap();

        assert_eq!(key.as_str(), "key-0.png");
        assert_eq!(storage.retrieve(&key).await.unwrap(), b"bytes");
    }

    #[tokio::test]
    async fn test_write_retries_on_collision() {
        let temp = TempDir::new().unwrap();
        let storage = Arc::new(LocalFileStorage::new(temp.path().to_path_buf()).unwrap());
        storage.put(&StorageKey::new("key-0.txt"), b"earlier upload").await.unwrap();

        let writer = StorageWriter::new(storage.clone(), Arc::new(SequentialKeys::default()));
        let key = writer.write("new.txt", b"later upload").await.unwrap();

        assert_eq!(key.as_str(), "key-1.txt");
        assert_eq!(
            storage.retrieve(&StorageKey::new("key-0.txt")).await.unwrap(),
            b"earlier upload"
        );
    }

    #[tokio::test]
    async fn test_write_gives_up_after_max_attempts() {
        let mut storage = MockFileStorage::new();
        storage
            .expect_put()
            .times(MAX_KEY_ATTEMPTS)
            .returning(|key, _| Err(StorageError::KeyCollision(key.to_string())));

        let writer = StorageWriter::new(Arc::new(storage), Arc::new(SequentialKeys::default()));
        let err = writer.write("a.bin", b"x").await.unwrap_err();

        assert!(matches!(err, StorageError::KeysExhausted { attempts: MAX_KEY_ATTEMPTS }));
    }

    #[tokio::test]
    async fn test_write_propagates_io_errors() {
        let mut storage = MockFileStorage::new();
        storage.expect_put().times(1).returning(|_, _| {
            Err(StorageError::Io(std::io::Error::new(
                std::io::ErrorKind::PermissionDenied,
                "read-only filesystem",
            )))
        });

        let writer = StorageWriter::new(Arc::new(storage), Arc::new(SequentialKeys::default()));
        let err = writer.write("a.bin", b"x").await.unwrap_err();

        assert!(matches!(err, StorageError::Io(_)));
    }
}
