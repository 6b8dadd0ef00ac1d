//! Media ingestion errors and their HTTP mapping

use super::types::IngestStage;
use crate::error::ErrorBody;
use crate::multipart::MultipartError;
use crate::storage::StorageError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

/// Errors returned by [`MediaService`](super::MediaService)
#[derive(Debug, Error)]
pub enum MediaError {
    /// Not multipart/form-data, or no boundary
    #[error("Invalid content type: {0}")]
    InvalidContentType(String),

    /// Body exceeds the part-count ceiling
    #[error("Multipart body has more than {max} parts")]
    TooManyParts {
        /// Configured ceiling
        max: usize,
    },

    /// No part carries a filename
    #[error("No file found in upload")]
    NoFileFound,

    /// File is larger than `media.max_file_bytes`
    #[error("File size {actual} exceeds limit of {limit} bytes")]
    PayloadTooLarge {
        /// File size
        actual: u64,
        /// Configured limit
        limit: u64,
    },

    /// MIME type rejected by the upload policy
    #[error("Unsupported media type: {0}")]
    UnsupportedMediaType(String),

    /// Writing the blob failed; no record was created
    #[error("Failed to store upload: {0}")]
    StorageWriteFailure(#[source] StorageError),

    /// Inserting or querying media rows failed
    #[error("Failed to persist media record: {0}")]
    PersistenceFailure(#[source] sqlx::Error),

    /// No media with this id
    #[error("Media {0} not found")]
    NotFound(i64),

    /// Some media ids do not belong to the caller
    #[error("Media does not belong to the caller")]
    NotOwned,
}

impl From<MultipartError> for MediaError {
    fn from(err: MultipartError) -> Self {
        match err {
            MultipartError::InvalidContentType(msg) => Self::InvalidContentType(msg),
            MultipartError::TooManyParts { max } => Self::TooManyParts { max },
            MultipartError::NoFileFound => Self::NoFileFound,
        }
    }
}

impl MediaError {
    /// Stable machine-readable error kind
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::InvalidContentType(_) => "invalid_content_type",
            Self::TooManyParts { .. } => "too_many_parts",
            Self::NoFileFound => "no_file_found",
            Self::PayloadTooLarge { .. } => "payload_too_large",
            Self::UnsupportedMediaType(_) => "unsupported_media_type",
            Self::StorageWriteFailure(_) => "storage_write_failure",
            Self::PersistenceFailure(_) => "persistence_failure",
            Self::NotFound(_) => "not_found",
            Self::NotOwned => "not_owned",
        }
    }

    /// HTTP status for this error
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::InvalidContentType(_) | Self::TooManyParts { .. } | Self::NoFileFound => {
                StatusCode::BAD_REQUEST
            }
            Self::PayloadTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            Self::UnsupportedMediaType(_) => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            Self::StorageWriteFailure(_) | Self::PersistenceFailure(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::NotOwned => StatusCode::FORBIDDEN,
        }
    }

    /// Ingest step that this error terminates, if it comes from ingestion
    #[must_use]
    pub const fn stage(&self) -> Option<IngestStage> {
        match self {
            Self::InvalidContentType(_) => Some(IngestStage::SearchBoundary),
            Self::TooManyParts { .. } => Some(IngestStage::SplitParts),
            Self::NoFileFound => Some(IngestStage::SelectFile),
            Self::PayloadTooLarge { .. } | Self::UnsupportedMediaType(_) => {
                Some(IngestStage::ValidateSize)
            }
            Self::StorageWriteFailure(_) => Some(IngestStage::WriteStorage),
            Self::PersistenceFailure(_) => Some(IngestStage::PersistRecord),
            Self::NotFound(_) | Self::NotOwned => None,
        }
    }
}

impl IntoResponse for MediaError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = if status.is_server_error() {
            tracing::error!(error = %self, kind = self.kind(), "media request failed");
            "Internal server error".to_string()
        } else {
            self.to_string()
        };

        (status, Json(ErrorBody::new(self.kind(), message))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(MediaError::InvalidContentType(String::new()).status(), StatusCode::BAD_REQUEST);
        assert_eq!(MediaError::NoFileFound.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            MediaError::PayloadTooLarge { actual: 2, limit: 1 }.status(),
            StatusCode::PAYLOAD_TOO_LARGE
        );
        assert_eq!(
            MediaError::StorageWriteFailure(StorageError::KeysExhausted { attempts: 5 }).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            MediaError::PersistenceFailure(sqlx::Error::PoolTimedOut).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(MediaError::NotOwned.status(), StatusCode::FORBIDDEN);
    }

    #[test]
    fn test_multipart_errors_convert() {
        assert!(matches!(
            MediaError::from(MultipartError::NoFileFound),
            MediaError::NoFileFound
        ));
        assert!(matches!(
            MediaError::from(MultipartError::TooManyParts { max: 3 }),
            MediaError::TooManyParts { max: 3 }
        ));
    }

    #[test]
    fn test_stage_of_each_ingest_failure() {
        assert_eq!(
            MediaError::InvalidContentType(String::new()).stage(),
            Some(IngestStage::SearchBoundary)
        );
        assert_eq!(MediaError::NoFileFound.stage(), Some(IngestStage::SelectFile));
        assert_eq!(
            MediaError::PersistenceFailure(sqlx::Error::PoolTimedOut).stage(),
            Some(IngestStage::PersistRecord)
        );
        assert_eq!(MediaError::NotFound(1).stage(), None);
    }

    #[test]
    fn test_server_error_response_status() {
        let response =
            MediaError::PersistenceFailure(sqlx::Error::PoolTimedOut).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
