//! Media records and their API shapes

use crate::profiles::ProfileSummary;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;

/// A persisted media row
///
/// Created once per successful upload and never updated by this crate.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, FromRow)]
pub struct MediaRecord {
    /// Database-generated id
    pub id: i64,
    /// Public URL of the stored blob
    pub url: String,
    /// MIME type declared by the upload
    pub mime_type: String,
    /// Size of the stored blob
    pub size_bytes: i64,
    /// Image width in pixels, when known
    pub width: Option<i32>,
    /// Image height in pixels, when known
    pub height: Option<i32>,
    /// Key of the blob in the storage backend (unique)
    pub storage_key: String,
    /// Uploader
    pub owner_user_id: i64,
    /// Insert time
    pub created_at: DateTime<Utc>,
}

/// Values for a media row that has not been inserted yet
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewMediaRecord {
    /// Public URL of the stored blob
    pub url: String,
    /// MIME type declared by the upload
    pub mime_type: String,
    /// Size of the stored blob
    pub size_bytes: i64,
    /// Image width in pixels, when known
    pub width: Option<i32>,
    /// Image height in pixels, when known
    pub height: Option<i32>,
    /// Key of the blob in the storage backend
    pub storage_key: String,
    /// Uploader
    pub owner_user_id: i64,
}

/// Upload response body
///
/// ```json
/// { "id": 7, "url": "https://feed.example.edu/uploads/1700000000000-Q2x9.png",
///   "mimeType": "image/png", "sizeBytes": 37, "width": null, "height": null }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct MediaDto {
    /// Media id, used later to attach the upload to a post
    pub id: i64,
    /// Public URL
    pub url: String,
    /// MIME type
    pub mime_type: String,
    /// Size in bytes
    pub size_bytes: i64,
    /// Width in pixels, `null` when unknown
    pub width: Option<i32>,
    /// Height in pixels, `null` when unknown
    pub height: Option<i32>,
}

impl From<MediaRecord> for MediaDto {
    fn from(record: MediaRecord) -> Self {
        Self {
            id: record.id,
            url: record.url,
            mime_type: record.mime_type,
            size_bytes: record.size_bytes,
            width: record.width,
            height: record.height,
        }
    }
}

/// Media lookup response: the upload plus its owner's profile
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct MediaView {
    /// The media fields, flattened into the top level
    #[serde(flatten)]
    pub media: MediaDto,
    /// Uploader profile, or a placeholder when the profile service is down
    pub owner: ProfileSummary,
}

/// Steps of the ingest pipeline
///
/// A failing step ends the pipeline; nothing is retried except key
/// allocation inside the storage writer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IngestStage {
    /// Reading the boundary from `Content-Type`
    SearchBoundary,
    /// Cutting the body into raw parts
    SplitParts,
    /// Separating headers from bodies
    ParseHeaders,
    /// Choosing the file part
    SelectFile,
    /// Size and type checks
    ValidateSize,
    /// Writing the blob
    WriteStorage,
    /// Inserting the media row
    PersistRecord,
    /// Finished
    Done,
}

impl fmt::Display for IngestStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::SearchBoundary => "search_boundary",
            Self::SplitParts => "split_parts",
            Self::ParseHeaders => "parse_headers",
            Self::SelectFile => "select_file",
            Self::ValidateSize => "validate_size",
            Self::WriteStorage => "write_storage",
            Self::PersistRecord => "persist_record",
            Self::Done => "done",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record() -> MediaRecord {
        MediaRecord {
            id: 7,
            url: "http://localhost:8080/uploads/k.png".to_string(),
            mime_type: "image/png".to_string(),
            size_bytes: 37,
            width: None,
            height: None,
            storage_key: "k.png".to_string(),
            owner_user_id: 42,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_dto_serializes_camel_case_with_null_dimensions() {
        let dto = MediaDto::from(record());
        assert_eq!(
            serde_json::to_value(&dto).unwrap(),
            json!({
                "id": 7,
                "url": "http://localhost:8080/uploads/k.png",
                "mimeType": "image/png",
                "sizeBytes": 37,
                "width": null,
                "height": null,
            })
        );
    }

    #[test]
    fn test_view_flattens_media() {
        let view = MediaView {
            media: MediaDto::from(record()),
            owner: ProfileSummary::placeholder(42),
        };
        let value = serde_json::to_value(&view).unwrap();
        assert_eq!(value["id"], 7);
        assert_eq!(value["owner"]["userId"], 42);
    }

    #[test]
    fn test_stage_display() {
        assert_eq!(IngestStage::WriteStorage.to_string(), "write_storage");
        assert_eq!(IngestStage::Done.to_string(), "done");
    }
}
