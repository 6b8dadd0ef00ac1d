//! Media persistence

use super::types::{MediaRecord, NewMediaRecord};
use async_trait::async_trait;
use sqlx::PgPool;

/// Storage of media rows and their links to posts
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MediaRepository: Send + Sync {
    /// Inserts a row and returns it with its generated id and timestamp
    async fn insert(&self, record: NewMediaRecord) -> Result<MediaRecord, sqlx::Error>;

    /// Loads one row by id
    async fn find_by_id(&self, id: i64) -> Result<Option<MediaRecord>, sqlx::Error>;

    /// Returns the subset of `ids` owned by `owner_user_id`
    async fn find_owned(&self, owner_user_id: i64, ids: &[i64]) -> Result<Vec<i64>, sqlx::Error>;

    /// Links media to a post; existing links are left alone
    ///
    /// Returns the number of new links.
    async fn link_to_post(&self, post_id: i64, media_ids: &[i64]) -> Result<u64, sqlx::Error>;
}

/// PostgreSQL-backed [`MediaRepository`]
#[derive(Debug, Clone)]
pub struct PgMediaRepository {
    pool: PgPool,
}

impl PgMediaRepository {
    /// Wraps a connection pool
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MediaRepository for PgMediaRepository {
    async fn insert(&self, record: NewMediaRecord) -> Result<MediaRecord, sqlx::Error> {
        sqlx::query_as::<_, MediaRecord>(
            r"
            INSERT INTO media (url, mime_type, size_bytes, width, height, storage_key, owner_user_id)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id, url, mime_type, size_bytes, width, height, storage_key, owner_user_id, created_at
            ",
        )
        .bind(&record.url)
        .bind(&record.mime_type)
        .bind(record.size_bytes)
        .bind(record.width)
        .bind(record.height)
        .bind(&record.storage_key)
        .bind(record.owner_user_id)
        .fetch_one(&self.pool)
        .await
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<MediaRecord>, sqlx::Error> {
        sqlx::query_as::<_, MediaRecord>(
            r"
            SELECT id, url, mime_type, size_bytes, width, height, storage_key, owner_user_id, created_at
            FROM media
            WHERE id = $1
            ",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
    }

    async fn find_owned(&self, owner_user_id: i64, ids: &[i64]) -> Result<Vec<i64>, sqlx::Error> {
        sqlx::query_scalar::<_, i64>(
            r"
            SELECT id
            FROM media
            WHERE owner_user_id = $1 AND id = ANY($2)
            ",
        )
        .bind(owner_user_id)
        .bind(ids)
        .fetch_all(&self.pool)
        .await
    }

    async fn link_to_post(&self, post_id: i64, media_ids: &[i64]) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            r"
            INSERT INTO post_media (post_id, media_id)
            SELECT $1, UNNEST($2::BIGINT[])
            ON CONFLICT (post_id, media_id) DO NOTHING
            ",
        )
        .bind(post_id)
        .bind(media_ids)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }
}
