//! campus-feed: media ingestion for a campus social feed
//!
//! Accepts `multipart/form-data` uploads, decodes them with a hand-written
//! parser, stores the file under a fresh key and records its metadata so it
//! can later be attached to a post.
//!
//! # Layout
//!
//! - [`multipart`]: boundary extraction, part splitting, header parsing, file selection
//! - [`storage`]: write-once blob storage and key allocation
//! - [`media`]: upload policy, the ingest pipeline and media persistence
//! - [`profiles`]: owner profile lookups against the profile service
//! - [`handlers`]: the axum router
//! - [`config`], [`observability`], [`state`], [`auth`], [`error`]: service plumbing
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use campus_feed::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     campus_feed::observability::init()?;
//!
//!     let config = CampusFeedConfig::load_for_service("api")?;
//!     let state = AppState::connect(config).await?;
//!
//!     let listener = tokio::net::TcpListener::bind("127.0.0.1:8080").await?;
//!     axum::serve(listener, campus_feed::handlers::router(state)).await?;
//!     Ok(())
//! }
//! ```

pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;
pub mod media;
pub mod multipart;
pub mod observability;
pub mod profiles;
pub mod state;
pub mod storage;

pub mod prelude {
    //! Convenience re-exports for common types and traits

    pub use crate::auth::{Authenticated, CurrentUser};
    pub use crate::config::CampusFeedConfig;
    pub use crate::error::{CampusFeedError, ErrorBody};
    pub use crate::media::{MediaDto, MediaError, MediaRepository, MediaService, UploadPolicy};
    pub use crate::multipart::{decode_file, DecodeLimits, FilePart, FileSelector, FirstFileSelector};
    pub use crate::profiles::{ProfileLookup, ProfileLookupResult, ProfileSummary};
    pub use crate::state::AppState;
    pub use crate::storage::{FileStorage, LocalFileStorage, StorageWriter, TimestampKeyGenerator};
}
