//! Application state
//!
//! Built once at startup and handed to the router; handlers reach it
//! through axum's `State` extractor.

use crate::config::CampusFeedConfig;
use crate::error::CampusFeedError;
use crate::media::{MediaService, PgMediaRepository};
use crate::profiles::{HttpProfileLookup, NoProfileLookup, ProfileLookup};
use crate::storage::{LocalFileStorage, TimestampKeyGenerator};
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;

/// Shared state for all handlers
#[derive(Clone)]
pub struct AppState {
    config: Arc<CampusFeedConfig>,
    media: Arc<MediaService>,
    profiles: Arc<dyn ProfileLookup>,
}

impl AppState {
    /// Assembles state from already-built parts
    #[must_use]
    pub fn new(
        config: CampusFeedConfig,
        media: MediaService,
        profiles: Arc<dyn ProfileLookup>,
    ) -> Self {
        Self {
            config: Arc::new(config),
            media: Arc::new(media),
            profiles,
        }
    }

    /// Connects to the database and builds every service
    ///
    /// Creates the upload root if needed and applies migrations when
    /// `database.run_migrations` is set.
    ///
    /// # Errors
    ///
    /// Returns an error if the database is unreachable, a migration fails, or
    /// the upload root cannot be created.
    pub async fn connect(config: CampusFeedConfig) -> Result<Self, CampusFeedError> {
        let pool = PgPoolOptions::new()
            .max_connections(config.database.max_connections)
            .connect(&config.database.url)
            .await?;

        if config.database.run_migrations {
            sqlx::migrate!("./migrations").run(&pool).await?;
            tracing::info!("database migrations applied");
        }

        tokio::fs::create_dir_all(&config.media.upload_root).await?;
        let storage = LocalFileStorage::new(config.media.upload_root.clone())?;
        tracing::info!(upload_root = %storage.root().display(), "upload storage ready");

        let media = MediaService::from_settings(
            Arc::new(PgMediaRepository::new(pool)),
            Arc::new(storage),
            Arc::new(TimestampKeyGenerator),
            &config.media,
        );

        let profiles: Arc<dyn ProfileLookup> = match HttpProfileLookup::from_settings(&config.profiles)
            .map_err(|e| CampusFeedError::Config(format!("profile client: {e}")))?
        {
            Some(lookup) => {
                tracing::info!(base_url = lookup.base_url(), "profile lookups enabled");
                Arc::new(lookup)
            }
            None => Arc::new(NoProfileLookup),
        };

        Ok(Self::new(config, media, profiles))
    }

    /// Service configuration
    #[must_use]
    pub fn config(&self) -> &CampusFeedConfig {
        &self.config
    }

    /// Media ingestion and lookup
    #[must_use]
    pub fn media(&self) -> &MediaService {
        &self.media
    }

    /// Profile lookups
    #[must_use]
    pub fn profiles(&self) -> &dyn ProfileLookup {
        self.profiles.as_ref()
    }

    /// State with an inert repository and no profile service
    #[cfg(test)]
    pub(crate) fn for_tests(config: CampusFeedConfig) -> Self {
        use crate::media::{MockMediaRepository, UploadPolicy};
        use crate::storage::StorageWriter;

        let storage = LocalFileStorage::new(std::env::temp_dir()).unwrap();
        let media = MediaService::new(
            Arc::new(MockMediaRepository::new()),
            StorageWriter::new(Arc::new(storage), Arc::new(TimestampKeyGenerator)),
            UploadPolicy::new(config.media.max_file_bytes),
            config.media.base_url.clone(),
        );
        Self::new(config, media, Arc::new(NoProfileLookup))
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("config", &self.config)
            .field("media", &self.media)
            .finish_non_exhaustive()
    }
}
