//! Blob storage for uploaded media
//!
//! - [`FileStorage`] is the backend abstraction; blobs are write-once
//! - [`LocalFileStorage`] keeps blobs as flat files under the upload root
//! - [`KeyGenerator`] names new blobs; [`TimestampKeyGenerator`] is the default
//! - [`StorageWriter`] combines the two and retries on key collisions
//!
//! # Examples
//!
//! ```rust,no_run
//! use campus_feed::storage::{LocalFileStorage, StorageWriter, TimestampKeyGenerator};
//! use std::path::PathBuf;
//! use std::sync::Arc;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let storage = Arc::new(LocalFileStorage::new(PathBuf::from("./uploads"))?);
//! let writer = StorageWriter::new(storage, Arc::new(TimestampKeyGenerator));
//!
//! let key = writer.write("avatar.png", b"...").await?;
//! println!("stored as {key}");
//! # Ok(())
//! # }
//! ```

mod keys;
mod local;
mod traits;
mod types;
mod writer;

pub use keys::{extension_for, KeyGenerator, TimestampKeyGenerator};
pub use local::LocalFileStorage;
#[cfg(test)]
pub use traits::MockFileStorage;
pub use traits::FileStorage;
pub use types::{StorageError, StorageKey, StorageResult};
pub use writer::{StorageWriter, MAX_KEY_ATTEMPTS};
