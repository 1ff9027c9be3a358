//! PostgreSQL implementation of the snippet repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::json;
use sqlx::PgPool;
use std::sync::Arc;

use crate::domain::entities::{NewSnippet, Salt, Snippet};
use crate::domain::repositories::{InsertOutcome, SnippetRepository};
use crate::error::AppError;

/// PostgreSQL repository for snippet storage.
///
/// Uniqueness is enforced by the primary key; `ON CONFLICT DO NOTHING` turns a
/// collision into an empty result instead of an error.
pub struct PgSnippetRepository {
    pool: Arc<PgPool>,
}

impl PgSnippetRepository {
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct SnippetRow {
    snippet_id: String,
    content: String,
    encrypted: bool,
    salt: Option<Vec<u8>>,
    created_at: DateTime<Utc>,
}

impl TryFrom<SnippetRow> for Snippet {
    type Error = AppError;

    fn try_from(row: SnippetRow) -> Result<Self, Self::Error> {
        let salt = match (row.encrypted, row.salt) {
            (true, Some(bytes)) => Some(Salt::from_slice(&bytes).ok_or_else(|| {
                AppError::internal(
                    "Stored salt has an invalid length",
                    json!({ "id": row.snippet_id, "length": bytes.len() }),
                )
            })?),
            (false, None) => None,
            (encrypted, salt) => {
                return Err(AppError::internal(
                    "Stored snippet violates the salt invariant",
                    json!({
                        "id": row.snippet_id,
                        "encrypted": encrypted,
                        "has_salt": salt.is_some(),
                    }),
                ));
            }
        };

        Ok(Snippet::new(row.snippet_id, row.content, salt, row.created_at))
    }
}

#[async_trait]
impl SnippetRepository for PgSnippetRepository {
    async fn insert_if_absent(
        &self,
        new_snippet: NewSnippet,
    ) -> Result<InsertOutcome<Snippet>, AppError> {
        let encrypted = new_snippet.is_encrypted();
        let salt = new_snippet.salt.map(|s| s.as_bytes().to_vec());

        let row = sqlx::query_as::<_, SnippetRow>(
            r#"
            INSERT INTO snippets (snippet_id, content, encrypted, salt)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (snippet_id) DO NOTHING
            RETURNING snippet_id, content, encrypted, salt, created_at
            "#,
        )
        .bind(&new_snippet.id)
        .bind(&new_snippet.content)
        .bind(encrypted)
        .bind(salt)
        .fetch_optional(self.pool.as_ref())
        .await?;

        match row {
            Some(row) => Ok(InsertOutcome::Inserted(row.try_into()?)),
            None => Ok(InsertOutcome::Duplicate),
        }
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Snippet>, AppError> {
        let row = sqlx::query_as::<_, SnippetRow>(
            r#"
            SELECT snippet_id, content, encrypted, salt, created_at
            FROM snippets
            WHERE snippet_id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(self.pool.as_ref())
        .await?;

        row.map(Snippet::try_from).transpose()
    }

    async fn count(&self) -> Result<i64, AppError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM snippets")
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
