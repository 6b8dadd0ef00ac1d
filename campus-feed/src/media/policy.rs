//! Upload acceptance rules checked before anything is written
//!
//! Size is always enforced. The MIME allow-list and magic-number check are
//! optional and driven by configuration.

use super::error::MediaError;
use crate::config::MediaSettings;
use crate::multipart::{FilePart, DEFAULT_FILE_MIME};

/// Limits and type rules for an upload
///
/// # Examples
///
/// ```rust
/// use campus_feed::media::UploadPolicy;
///
/// let policy = UploadPolicy::new(5 * 1024 * 1024)
///     .with_allowed_mime_types(["image/png", "image/jpeg"]);
/// assert!(policy.allows_mime("IMAGE/PNG"));
/// assert!(!policy.allows_mime("application/pdf"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadPolicy {
    max_file_bytes: u64,
    allowed_mime_types: Vec<String>,
    verify_magic: bool,
}

impl UploadPolicy {
    /// Policy with only a size limit
    #[must_use]
    pub const fn new(max_file_bytes: u64) -> Self {
        Self {
            max_file_bytes,
            allowed_mime_types: Vec::new(),
            verify_magic: false,
        }
    }

    /// Builds the policy from the `[media]` config section
    #[must_use]
    pub fn from_settings(settings: &MediaSettings) -> Self {
        Self::new(settings.max_file_bytes)
            .with_allowed_mime_types(settings.allowed_mime_types.iter().cloned())
            .with_magic_verification(settings.verify_magic)
    }

    /// Restricts uploads to these MIME types; an empty list allows everything
    #[must_use]
    pub fn with_allowed_mime_types<I, S>(mut self, types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.allowed_mime_types = types
            .into_iter()
            .map(|t| t.into().to_ascii_lowercase())
            .collect();
        self
    }

    /// Rejects files whose content signature contradicts the declared type
    #[must_use]
    pub fn with_magic_verification(mut self, enabled: bool) -> Self {
        self.verify_magic = enabled;
        self
    }

    /// Size limit in bytes
    #[must_use]
    pub const fn max_file_bytes(&self) -> u64 {
        self.max_file_bytes
    }

    /// Whether `mime` passes the allow-list
    #[must_use]
    pub fn allows_mime(&self, mime: &str) -> bool {
        self.allowed_mime_types.is_empty()
            || self
                .allowed_mime_types
                .iter()
                .any(|allowed| allowed.eq_ignore_ascii_case(mime))
    }

    /// Checks a selected file against every rule
    ///
    /// # Errors
    ///
    /// Returns `MediaError::PayloadTooLarge` when the file exceeds the limit
    /// and `MediaError::UnsupportedMediaType` when its type is rejected.
    pub fn check(&self, file: &FilePart<'_>) -> Result<(), MediaError> {
        let size = file.size();
        if size > self.max_file_bytes {
            return Err(MediaError::PayloadTooLarge {
                actual: size,
                limit: self.max_file_bytes,
            });
        }

        if !self.allows_mime(&file.content_type) {
            return Err(MediaError::UnsupportedMediaType(file.content_type.clone()));
        }

        if self.verify_magic {
            Self::check_signature(file)?;
        }

        Ok(())
    }

    /// Compares the sniffed type with the declared one
    ///
    /// Content without a recognizable signature passes, as does a declared
    /// `application/octet-stream`.
    fn check_signature(file: &FilePart<'_>) -> Result<(), MediaError> {
        if file.content_type.eq_ignore_ascii_case(DEFAULT_FILE_MIME) {
            return Ok(());
        }

        match infer::get(file.body) {
            Some(kind) if !kind.mime_type().eq_ignore_ascii_case(&file.content_type) => {
                tracing::warn!(
                    declared = %file.content_type,
                    detected = kind.mime_type(),
                    "upload content does not match declared type"
                );
                Err(MediaError::UnsupportedMediaType(format!(
                    "{} (content looks like {})",
                    file.content_type,
                    kind.mime_type()
                )))
            }
            _ => Ok(()),
        }
    }
}
