//! Long URL shortening service.

use std::sync::Arc;

use serde_json::json;

use crate::domain::entities::NewShortUrl;
use crate::domain::repositories::{InsertOutcome, UrlRepository};
use crate::error::AppError;
use crate::infrastructure::cache::{CacheService, CacheStats};
use crate::utils::code_generator::{generate_id, is_valid_id};
use crate::utils::link::join_link;
use crate::utils::url_normalizer::normalize_url;

/// Length of the first short id tried for a new URL.
pub const MIN_SHORT_ID_LEN: usize = 8;

/// Short ids are always shorter than this.
pub const MAX_SHORT_ID_LEN: usize = 12;

/// Service mapping long URLs to short ids and back.
///
/// Creation is idempotent: a URL that was already shortened, including by a
/// concurrent request, returns the existing short id.
///
/// Two caches sit in front of the repository, one per direction.
pub struct ShortenerService<R: UrlRepository + ?Sized = dyn UrlRepository> {
    repository: Arc<R>,
    long_urls: Arc<dyn CacheService<String>>,
    short_ids: Arc<dyn CacheService<String>>,
}

impl<R: UrlRepository + ?Sized> ShortenerService<R> {
    /// Creates a new shortener service.
    ///
    /// - `long_urls` - cache of `short_id -> long_url`
    /// - `short_ids` - cache of `long_url -> short_id`
    pub fn new(
        repository: Arc<R>,
        long_urls: Arc<dyn CacheService<String>>,
        short_ids: Arc<dyn CacheService<String>>,
    ) -> Self {
        Self {
            repository,
            long_urls,
            short_ids,
        }
    }

    /// Returns the short id for `long_url`, creating the mapping if needed.
    ///
    /// The URL is normalized first, so equivalent spellings share one id.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] if the URL is invalid.
    ///
    /// Returns [`AppError::CreationExhausted`] if no free id was found for
    /// lengths [`MIN_SHORT_ID_LEN`] up to [`MAX_SHORT_ID_LEN`].
    pub async fn get_or_create_short_id(&self, long_url: &str) -> Result<String, AppError> {
        let long_url = normalize_url(long_url).map_err(|e| {
            AppError::bad_request("Invalid URL format", json!({ "reason": e.to_string() }))
        })?;

        if let Some(short_id) = self.short_ids.get(&long_url) {
            tracing::debug!(%short_id, "Short id cache hit");
            return Ok(short_id);
        }

        if let Some(existing) = self.repository.find_by_long_url(&long_url).await? {
            self.remember(&existing.short_id, &existing.long_url);
            return Ok(existing.short_id);
        }

        for length in MIN_SHORT_ID_LEN..MAX_SHORT_ID_LEN {
            let candidate = NewShortUrl {
                short_id: generate_id(length)?,
                long_url: long_url.clone(),
            };

            match self.repository.insert_if_absent(candidate).await? {
                InsertOutcome::Inserted(created) => {
                    tracing::info!(short_id = %created.short_id, "Short URL created");
                    self.remember(&created.short_id, &created.long_url);
                    return Ok(created.short_id);
                }
                InsertOutcome::Duplicate => {
                    // A concurrent request may have stored the same URL.
                    if let Some(existing) = self.repository.find_by_long_url(&long_url).await? {
                        self.remember(&existing.short_id, &existing.long_url);
                        return Ok(existing.short_id);
                    }

                    metrics::counter!("id_collisions_total", "kind" => "short_url").increment(1);
                    tracing::warn!(length, "Short id collision, retrying");
                }
            }
        }

        Err(AppError::creation_exhausted(
            "Could not allocate a unique short id",
            json!({ "max_length": MAX_SHORT_ID_LEN - 1 }),
        ))
    }

    /// Returns the full short URL for `long_url` under `base_url`.
    ///
    /// # Errors
    ///
    /// See [`Self::get_or_create_short_id`].
    pub async fn get_short_url(&self, long_url: &str, base_url: &str) -> Result<String, AppError> {
        let short_id = self.get_or_create_short_id(long_url).await?;
        Ok(join_link(base_url, &short_id))
    }

    /// Resolves a short id to its long URL.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the short id is unknown.
    pub async fn get_long_url(&self, short_id: &str) -> Result<String, AppError> {
        if !is_valid_id(short_id) {
            return Err(short_url_not_found(short_id));
        }

        if let Some(long_url) = self.long_urls.get(short_id) {
            tracing::debug!(%short_id, "Long URL cache hit");
            return Ok(long_url);
        }

        let url = self
            .repository
            .find_by_short_id(short_id)
            .await?
            .ok_or_else(|| short_url_not_found(short_id))?;

        self.remember(&url.short_id, &url.long_url);
        Ok(url.long_url)
    }

    /// Number of stored mappings.
    pub async fn count(&self) -> Result<i64, AppError> {
        self.repository.count().await
    }

    /// Checks that URL storage is reachable.
    pub async fn ping(&self) -> Result<(), AppError> {
        self.repository.ping().await
    }

    /// Statistics of the `short_id -> long_url` cache.
    pub fn long_url_cache_stats(&self) -> CacheStats {
        self.long_urls.stats()
    }

    /// Statistics of the `long_url -> short_id` cache.
    pub fn short_id_cache_stats(&self) -> CacheStats {
        self.short_ids.stats()
    }

    fn remember(&self, short_id: &str, long_url: &str) {
        self.long_urls.set(short_id, long_url.to_string());
        self.short_ids.set(long_url, short_id.to_string());
    }
}

fn short_url_not_found(short_id: &str) -> AppError {
    AppError::not_found("Short URL not found", json!({ "short_id": short_id }))
}
