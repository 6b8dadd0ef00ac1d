//! Core types for media storage

use std::fmt;
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    /// No blob stored under the key
    #[error("File not found: {0}")]
    NotFound(String),

    /// A blob already exists under the key
    #[error("Storage key already in use: {0}")]
    KeyCollision(String),

    /// Every generated key collided
    #[error("Could not allocate a free storage key after {attempts} attempts")]
    KeysExhausted {
        /// Number of keys tried
        attempts: usize,
    },

    /// I/O error during storage operation
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Key is not a plain file name
    #[error("Invalid path: {0}")]
    InvalidPath(String),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Name of a stored blob within the upload root
///
/// Keys are flat file names; they never contain path separators.
///
/// # Examples
///
/// ```rust
/// use campus_feed::storage::StorageKey;
///
/// let key = StorageKey::new("1700000000000-a1b2c3.png");
/// assert_eq!(key.as_str(), "1700000000000-a1b2c3.png");
/// assert!(key.is_safe());
/// assert!(!StorageKey::new("../etc/passwd").is_safe());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StorageKey(String);

impl StorageKey {
    /// Wraps a key; validity is checked by the backend before use
    #[must_use]
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// Key as a string slice
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether the key is a non-empty, single path component without traversal
    #[must_use]
    pub fn is_safe(&self) -> bool {
        !self.0.is_empty()
            && !self.0.starts_with('.')
            && self
                .0
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
    }
}

impl fmt::Display for StorageKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<StorageKey> for String {
    fn from(key: StorageKey) -> Self {
        key.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_safe_keys() {
        assert!(StorageKey::new("1700000000000-abcDEF123").is_safe());
        assert!(StorageKey::new("1700000000000-abc.jpeg").is_safe());
    }

    #[test]
    fn test_unsafe_keys() {
        assert!(!StorageKey::new("").is_safe());
        assert!(!StorageKey::new(".hidden").is_safe());
        assert!(!StorageKey::new("..").is_safe());
        assert!(!StorageKey::new("a/b").is_safe());
        assert!(!StorageKey::new("a\\b").is_safe());
        assert!(!StorageKey::new("name with space").is_safe());
    }

    #[test]
    fn test_display() {
        let key = StorageKey::new("abc.png");
        assert_eq!(key.to_string(), "abc.png");
        assert_eq!(String::from(key), "abc.png");
    }
}
