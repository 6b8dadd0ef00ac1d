//! Media endpoints

use crate::auth::Authenticated;
use crate::media::{MediaDto, MediaError, MediaView};
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    http::{header::CONTENT_TYPE, HeaderMap, StatusCode},
    Json,
};
use bytes::Bytes;
use serde::{Deserialize, Serialize};

/// `POST /api/media`
///
/// Takes a raw `multipart/form-data` body and stores its first file.
///
/// # Errors
///
/// See [`MediaError`] for the status code of each failure.
pub async fn upload_media(
    State(state): State<AppState>,
    Authenticated(user): Authenticated,
    headers: HeaderMap,
    body: Bytes,
) -> Result<(StatusCode, Json<MediaDto>), MediaError> {
    let content_type = headers
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .ok_or_else(|| MediaError::InvalidContentType("missing Content-Type header".to_string()))?;

    let media = state.media().ingest(user.id, content_type, &body).await?;
    Ok((StatusCode::CREATED, Json(media)))
}

/// `GET /api/media/{id}`
///
/// # Errors
///
/// Returns 404 for an unknown id.
pub async fn get_media(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<MediaView>, MediaError> {
    let view = state.media().describe(id, state.profiles()).await?;
    Ok(Json(view))
}

/// Body of `POST /api/posts/{post_id}/media`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttachMediaRequest {
    /// Media to attach; all must belong to the caller
    pub media_ids: Vec<i64>,
}

/// Response of `POST /api/posts/{post_id}/media`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttachMediaResponse {
    /// Number of new links
    pub linked: u64,
}

/// `POST /api/posts/{post_id}/media`
///
/// # Errors
///
/// Returns 403 if any media id is not the caller's.
pub async fn attach_media(
    State(state): State<AppState>,
    Authenticated(user): Authenticated,
    Path(post_id): Path<i64>,
    Json(request): Json<AttachMediaRequest>,
) -> Result<Json<AttachMediaResponse>, MediaError> {
    let linked = state
        .media()
        .attach_to_post(user.id, post_id, &request.media_ids)
        .await?;
    Ok(Json(AttachMediaResponse { linked }))
}
