//! The ingest pipeline and the media operations built on it

use super::error::MediaError;
use super::policy::UploadPolicy;
use super::probe::probe_dimensions;
use super::repository::MediaRepository;
use super::types::{IngestStage, MediaDto, MediaRecord, MediaView, NewMediaRecord};
use crate::config::MediaSettings;
use crate::multipart::{decode_file, DecodeLimits, FileSelector, FirstFileSelector};
use crate::profiles::ProfileLookup;
use crate::storage::{FileStorage, KeyGenerator, StorageKey, StorageWriter};
use std::sync::Arc;
use tracing::instrument;

/// Turns upload bodies into stored blobs and media rows
///
/// Built once at startup and shared through [`AppState`](crate::state::AppState).
#[derive(Clone)]
pub struct MediaService {
    repository: Arc<dyn MediaRepository>,
    writer: StorageWriter,
    policy: UploadPolicy,
    selector: Arc<dyn FileSelector>,
    limits: DecodeLimits,
    public_base_url: String,
    probe_dimensions: bool,
}

impl MediaService {
    /// Creates a service with the first-file selector and default part limit
    #[must_use]
    pub fn new(
        repository: Arc<dyn MediaRepository>,
        writer: StorageWriter,
        policy: UploadPolicy,
        public_base_url: impl Into<String>,
    ) -> Self {
        Self {
            repository,
            writer,
            policy,
            selector: Arc::new(FirstFileSelector),
            limits: DecodeLimits::default(),
            public_base_url: public_base_url.into(),
            probe_dimensions: true,
        }
    }

    /// Creates a service configured from the `[media]` section
    #[must_use]
    pub fn from_settings(
        repository: Arc<dyn MediaRepository>,
        storage: Arc<dyn FileStorage>,
        keys: Arc<dyn KeyGenerator>,
        settings: &MediaSettings,
    ) -> Self {
        Self::new(
            repository,
            StorageWriter::new(storage, keys),
            UploadPolicy::from_settings(settings),
            settings.base_url.clone(),
        )
        .with_limits(DecodeLimits {
            max_parts: settings.max_parts,
        })
        .with_dimension_probe(settings.probe_dimensions)
    }

    /// Replaces the file part selection strategy
    #[must_use]
    pub fn with_selector(mut self, selector: Arc<dyn FileSelector>) -> Self {
        self.selector = selector;
        self
    }

    /// Replaces the decoder limits
    #[must_use]
    pub const fn with_limits(mut self, limits: DecodeLimits) -> Self {
        self.limits = limits;
        self
    }

    /// Turns image dimension probing on or off
    #[must_use]
    pub const fn with_dimension_probe(mut self, enabled: bool) -> Self {
        self.probe_dimensions = enabled;
        self
    }

    /// Public URL for a storage key
    #[must_use]
    pub fn public_url(&self, key: &StorageKey) -> String {
        format!(
            "{}/uploads/{}",
            self.public_base_url.trim_end_matches('/'),
            key
        )
    }

    /// Decodes an upload body, stores the file and records it
    ///
    /// # Errors
    ///
    /// Decoder and policy errors are returned before anything is written.
    /// `StorageWriteFailure` means nothing was recorded. `PersistenceFailure`
    /// means the blob was written and then removed again.
    #[instrument(skip(self, body), fields(body_len = body.len()))]
    pub async fn ingest(
        &self,
        owner_user_id: i64,
        content_type: &str,
        body: &[u8],
    ) -> Result<MediaDto, MediaError> {
        let result = self.run_pipeline(owner_user_id, content_type, body).await;

        match &result {
            Ok(dto) => tracing::info!(
                stage = %IngestStage::Done,
                media_id = dto.id,
                size_bytes = dto.size_bytes,
                "upload ingested"
            ),
            Err(e) => {
                let stage = e.stage().map(|s| s.to_string()).unwrap_or_default();
                tracing::warn!(stage, kind = e.kind(), error = %e, "upload rejected");
            }
        }

        result
    }

    async fn run_pipeline(
        &self,
        owner_user_id: i64,
        content_type: &str,
        body: &[u8],
    ) -> Result<MediaDto, MediaError> {
        let file = decode_file(content_type, body, &self.limits, self.selector.as_ref())?;
        self.policy.check(&file)?;

        // Bounded by max_file_bytes, which is far below i64::MAX
        let size_bytes = i64::try_from(file.size()).map_err(|_| MediaError::PayloadTooLarge {
            actual: file.size(),
            limit: self.policy.max_file_bytes(),
        })?;

        let key = self
            .writer
            .write(&file.filename, file.body)
            .await
            .map_err(MediaError::StorageWriteFailure)?;

        let (width, height) = self.dimensions(&file.content_type, file.body);

        let record = NewMediaRecord {
            url: self.public_url(&key),
            mime_type: file.content_type.clone(),
            size_bytes,
            width,
            height,
            storage_key: key.to_string(),
            owner_user_id,
        };

        match self.repository.insert(record).await {
            Ok(saved) => Ok(saved.into()),
            Err(e) => {
                if let Err(delete_err) = self.writer.storage().delete(&key).await {
                    tracing::error!(
                        key = %key,
                        error = %delete_err,
                        "failed to remove blob after persistence failure"
                    );
                }
                Err(MediaError::PersistenceFailure(e))
            }
        }
    }

    fn dimensions(&self, mime_type: &str, data: &[u8]) -> (Option<i32>, Option<i32>) {
        if !self.probe_dimensions {
            return (None, None);
        }

        match probe_dimensions(mime_type, data) {
            Some((w, h)) => match (i32::try_from(w), i32::try_from(h)) {
                (Ok(w), Ok(h)) => (Some(w), Some(h)),
                _ => (None, None),
            },
            None => (None, None),
        }
    }

    /// Loads one media row
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for an unknown id and `PersistenceFailure` when the
    /// query fails.
    pub async fn get(&self, id: i64) -> Result<MediaRecord, MediaError> {
        self.repository
            .find_by_id(id)
            .await
            .map_err(MediaError::PersistenceFailure)?
            .ok_or(MediaError::NotFound(id))
    }

    /// Loads one media row together with its owner's profile
    ///
    /// An unreachable profile service yields a placeholder owner.
    ///
    /// # Errors
    ///
    /// Same as [`get`](Self::get).
    pub async fn describe(
        &self,
        id: i64,
        profiles: &dyn ProfileLookup,
    ) -> Result<MediaView, MediaError> {
        let record = self.get(id).await?;
        let owner = profiles
            .lookup(record.owner_user_id)
            .await
            .or_placeholder(record.owner_user_id);

        Ok(MediaView {
            media: record.into(),
            owner,
        })
    }

    /// Links the caller's media to a post
    ///
    /// Duplicate ids are ignored. Returns the number of new links.
    ///
    /// # Errors
    ///
    /// Returns `NotOwned` if any id is unknown or belongs to someone else; in
    /// that case nothing is linked.
    #[instrument(skip(self, media_ids), fields(count = media_ids.len()))]
    pub async fn attach_to_post(
        &self,
        owner_user_id: i64,
        post_id: i64,
        media_ids: &[i64],
    ) -> Result<u64, MediaError> {
        let mut ids = media_ids.to_vec();
        ids.sort_unstable();
        ids.dedup();

        if ids.is_empty() {
            return Ok(0);
        }

        let owned = self
            .repository
            .find_owned(owner_user_id, &ids)
            .await
            .map_err(MediaError::PersistenceFailure)?;

        if owned.len() != ids.len() {
            return Err(MediaError::NotOwned);
        }

        self.repository
            .link_to_post(post_id, &ids)
            .await
            .map_err(MediaError::PersistenceFailure)
    }
}

impl std::fmt::Debug for MediaService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MediaService")
            .field("policy", &self.policy)
            .field("limits", &self.limits)
            .field("public_base_url", &self.public_base_url)
            .field("probe_dimensions", &self.probe_dimensions)
            .finish_non_exhaustive()
    }
}
