//! Error types and error handling
//!
//! Request-path errors live next to the code that raises them
//! ([`MediaError`](crate::media::MediaError),
//! [`MultipartError`](crate::multipart::MultipartError),
//! [`StorageError`](crate::storage::StorageError)). This module holds the
//! shared JSON error body and the startup error type.

use crate::storage::StorageError;
use serde::Serialize;
use thiserror::Error;

/// JSON body of every error response
///
/// ```json
/// { "error": "payload_too_large", "message": "File size 11 exceeds limit of 10 bytes" }
/// ```
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ErrorBody {
    /// Stable machine-readable kind
    pub error: &'static str,
    /// Human-readable detail
    pub message: String,
}

impl ErrorBody {
    /// Creates an error body
    #[must_use]
    pub fn new(error: &'static str, message: impl Into<String>) -> Self {
        Self {
            error,
            message: message.into(),
        }
    }
}

/// Errors raised while starting the service
#[derive(Debug, Error)]
pub enum CampusFeedError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Migration error
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Storage backend error
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}
