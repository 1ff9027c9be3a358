//! PostgreSQL implementation of the short URL repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use std::sync::Arc;

use crate::domain::entities::{NewShortUrl, ShortUrl};
use crate::domain::repositories::{InsertOutcome, UrlRepository};
use crate::error::AppError;

/// PostgreSQL repository for short URL mappings.
pub struct PgUrlRepository {
    pool: Arc<PgPool>,
}

impl PgUrlRepository {
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct ShortUrlRow {
    short_id: String,
    long_url: String,
    created_at: DateTime<Utc>,
}

impl From<ShortUrlRow> for ShortUrl {
    fn from(row: ShortUrlRow) -> Self {
        ShortUrl::new(row.short_id, row.long_url, row.created_at)
    }
}

#[async_trait]
impl UrlRepository for PgUrlRepository {
    async fn insert_if_absent(
        &self,
        new_url: NewShortUrl,
    ) -> Result<InsertOutcome<ShortUrl>, AppError> {
        // No conflict target: a clash on either unique column is a duplicate.
        let row = sqlx::query_as::<_, ShortUrlRow>(
            r#"
            INSERT INTO short_urls (short_id, long_url)
            VALUES ($1, $2)
            ON CONFLICT DO NOTHING
            RETURNING short_id, long_url, created_at
            "#,
        )
        .bind(&new_url.short_id)
        .bind(&new_url.long_url)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(match row {
            Some(row) => InsertOutcome::Inserted(row.into()),
            None => InsertOutcome::Duplicate,
        })
    }

    async fn find_by_short_id(&self, short_id: &str) -> Result<Option<ShortUrl>, AppError> {
        let row = sqlx::query_as::<_, ShortUrlRow>(
            "SELECT short_id, long_url, created_at FROM short_urls WHERE short_id = $1",
        )
        .bind(short_id)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(row.map(ShortUrl::from))
    }

    async fn find_by_long_url(&self, long_url: &str) -> Result<Option<ShortUrl>, AppError> {
        let row = sqlx::query_as::<_, ShortUrlRow>(
            "SELECT short_id, long_url, created_at FROM short_urls WHERE long_url = $1",
        )
        .bind(long_url)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(row.map(ShortUrl::from))
    }

    async fn count(&self) -> Result<i64, AppError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM short_urls")
            .fetch_one(self.pool.as_ref())
            .await?;

        Ok(count)
    }

    async fn ping(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1")
            .execute(self.pool.as_ref())
            .await?;

        Ok(())
    }
}
