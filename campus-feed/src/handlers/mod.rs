//! HTTP routes
//!
//! | Method | Path                         | Handler                   |
//! |--------|------------------------------|---------------------------|
//! | POST   | `/api/media`                 | [`media::upload_media`]   |
//! | GET    | `/api/media/{id}`            | [`media::get_media`]      |
//! | POST   | `/api/posts/{post_id}/media` | [`media::attach_media`]   |
//! | GET    | `/uploads/{key}`             | files under `upload_root` |

pub mod media;

use crate::state::AppState;
use axum::{
    body::Body,
    extract::DefaultBodyLimit,
    http::Request,
    routing::{get, post},
    Router,
};
use tower_http::{services::ServeDir, trace::TraceLayer};
use uuid::Uuid;

/// Builds the service router
///
/// The request body ceiling comes from `media.max_body_bytes`.
pub fn router(state: AppState) -> Router {
    let settings = &state.config().media;
    let body_limit = usize::try_from(settings.max_body_bytes).unwrap_or(usize::MAX);
    let uploads = ServeDir::new(&settings.upload_root);

    Router::new()
        .route("/api/media", post(media::upload_media))
        .route("/api/media/{id}", get(media::get_media))
        .route("/api/posts/{post_id}/media", post(media::attach_media))
        .nest_service("/uploads", uploads)
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
                tracing::info_span!(
                    "http_request",
                    method = %request.method(),
                    uri = %request.uri(),
                    request_id = %Uuid::new_v4(),
                )
            }),
        )
        .with_state(state)
}
