//! Caller identity
//!
//! Authentication itself happens upstream. Either an auth layer inserts a
//! [`CurrentUser`] into the request extensions, or a trusted gateway sends
//! the user id in the header named by `server.user_id_header`.
//!
//! # Example
//!
//! ```rust,no_run
//! use campus_feed::auth::Authenticated;
//!
//! async fn whoami(Authenticated(user): Authenticated) -> String {
//!     format!("user {}", user.id)
//! }
//! ```

use crate::error::ErrorBody;
use crate::state::AppState;
use axum::{
    extract::{FromRef, FromRequestParts},
    http::{request::Parts, StatusCode},
    response::{IntoResponse, Response},
    Json,
};

/// The authenticated caller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CurrentUser {
    /// User id
    pub id: i64,
}

/// Extractor for routes that require a caller
pub struct Authenticated(pub CurrentUser);

impl<S> FromRequestParts<S> for Authenticated
where
    S: Send + Sync,
    AppState: FromRef<S>,
{
    type Rejection = AuthenticationError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        if let Some(user) = parts.extensions.get::<CurrentUser>() {
            return Ok(Self(*user));
        }

        let app_state = AppState::from_ref(state);
        let Some(header) = app_state.config().server.user_id_header.as_deref() else {
            return Err(AuthenticationError::NotAuthenticated);
        };

        let value = parts
            .headers
            .get(header)
            .ok_or(AuthenticationError::NotAuthenticated)?;

        let id = value
            .to_str()
            .ok()
            .and_then(|v| v.trim().parse::<i64>().ok())
            .ok_or(AuthenticationError::InvalidUserHeader)?;

        Ok(Self(CurrentUser { id }))
    }
}

/// Authentication errors for extractors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthenticationError {
    /// No user on the request
    NotAuthenticated,

    /// The gateway header is present but not a user id
    InvalidUserHeader,
}

impl IntoResponse for AuthenticationError {
    fn into_response(self) -> Response {
        let message = match self {
            Self::NotAuthenticated => "Authentication required",
            Self::InvalidUserHeader => "Invalid user id header",
        };
        (
            StatusCode::UNAUTHORIZED,
            Json(ErrorBody::new("unauthorized", message)),
        )
            .into_response()
    }
}
