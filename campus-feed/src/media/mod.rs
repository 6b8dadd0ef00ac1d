//! Media ingestion
//!
//! [`MediaService::ingest`] runs the upload pipeline:
//!
//! ```text
//! search_boundary -> split_parts -> parse_headers -> select_file
//!     -> validate_size -> write_storage -> persist_record -> done
//! ```
//!
//! Any failing step ends the pipeline with a [`MediaError`] whose
//! [`stage`](MediaError::stage) names that step. Size and type checks run
//! before anything touches storage. If the row insert fails after the blob
//! was written, the blob is deleted again.

mod error;
mod policy;
mod probe;
mod repository;
mod service;
mod types;

pub use error::MediaError;
pub use policy::UploadPolicy;
pub use probe::probe_dimensions;
#[cfg(test)]
pub use repository::MockMediaRepository;
pub use repository::{MediaRepository, PgMediaRepository};
pub use service::MediaService;
pub use types::{IngestStage, MediaDto, MediaRecord, MediaView, NewMediaRecord};
