//! Storage key generation

use super::types::StorageKey;
use chrono::Utc;
use rand::{distributions::Alphanumeric, Rng};

/// Length of the random suffix in generated keys
pub const RANDOM_SUFFIX_LEN: usize = 16;

/// Longest file extension carried over from an upload's filename
pub const MAX_EXTENSION_LEN: usize = 16;

/// Source of storage keys for new uploads
///
/// Injected into the [`StorageWriter`](super::StorageWriter) so tests can use
/// deterministic keys.
pub trait KeyGenerator: Send + Sync {
    /// Produces a key ending in `extension` (empty, or a leading `.` plus
    /// lowercase alphanumerics)
    fn generate(&self, extension: &str) -> StorageKey;
}

/// `<millisecond-timestamp>-<random alphanumerics><extension>`
///
/// # Examples
///
/// ```rust
/// use campus_feed::storage::{KeyGenerator, TimestampKeyGenerator};
///
/// let key = TimestampKeyGenerator.generate(".png");
/// assert!(key.as_str().ends_with(".png"));
/// assert!(key.is_safe());
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct TimestampKeyGenerator;

impl KeyGenerator for TimestampKeyGenerator {
    fn generate(&self, extension: &str) -> StorageKey {
        let suffix: String = rand::thread_rng()
            .sample_iter(&Alphanumeric)
            .take(RANDOM_SUFFIX_LEN)
            .map(char::from)
            .collect();

        StorageKey::new(format!(
            "{}-{suffix}{extension}",
            Utc::now().timestamp_millis()
        ))
    }
}

/// Infers the storage extension from a client filename
///
/// Returns `.ext` with the extension lower-cased, or an empty string when the
/// filename has no extension or the extension is not plain alphanumeric.
///
/// # Examples
///
/// ```rust
/// use campus_feed::storage::extension_for;
///
/// assert_eq!(extension_for("Photo.JPG"), ".jpg");
/// assert_eq!(extension_for("archive.tar.gz"), ".gz");
/// assert_eq!(extension_for("README"), "");
/// ```
#[must_use]
pub fn extension_for(filename: &str) -> String {
    // Browsers on some platforms send full client paths
    let basename = filename.rsplit(['/', '\\']).next().unwrap_or(filename);

    match basename.rsplit_once('.') {
        Some((stem, ext))
            if !stem.is_empty()
                && !ext.is_empty()
                && ext.len() <= MAX_EXTENSION_LEN
                && ext.chars().all(|c| c.is_ascii_alphanumeric()) =>
        {
            format!(".{}", ext.to_ascii_lowercase())
        }
        _ => String::new(),
    }
}
