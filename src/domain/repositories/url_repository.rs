//! Repository trait for short URL mappings.

use crate::domain::entities::{NewShortUrl, ShortUrl};
use crate::domain::repositories::InsertOutcome;
use crate::error::AppError;
use async_trait::async_trait;

/// Durable storage for `short_id <-> long_url` mappings.
///
/// Both `short_id` and `long_url` are unique keys.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgUrlRepository`] - PostgreSQL implementation
/// - [`crate::infrastructure::persistence::InMemoryUrlRepository`] - process-local storage
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UrlRepository: Send + Sync {
    /// Inserts the mapping unless the short id or the long URL already exists.
    ///
    /// [`InsertOutcome::Duplicate`] does not say which key collided; callers
    /// re-read by long URL to tell the two apart.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] when storage is unavailable.
    async fn insert_if_absent(
        &self,
        new_url: NewShortUrl,
    ) -> Result<InsertOutcome<ShortUrl>, AppError>;

    /// Finds a mapping by its short id.
    async fn find_by_short_id(&self, short_id: &str) -> Result<Option<ShortUrl>, AppError>;

    /// Finds a mapping by its long URL.
    ///
    /// Used to keep creation idempotent: a URL that was already shortened
    /// returns its existing short id.
    async fn find_by_long_url(&self, long_url: &str) -> Result<Option<ShortUrl>, AppError>;

    /// Counts stored mappings.
    async fn count(&self) -> Result<i64, AppError>;

    /// Checks that the storage backend is reachable.
    async fn ping(&self) -> Result<(), AppError>;
}
