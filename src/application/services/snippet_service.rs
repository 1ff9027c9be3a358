//! Snippet storage and retrieval service.

use std::sync::Arc;

use serde_json::json;

use crate::crypto::ContentCrypto;
use crate::domain::entities::{NewSnippet, Snippet};
use crate::domain::repositories::{InsertOutcome, SnippetRepository};
use crate::error::AppError;
use crate::infrastructure::cache::{CacheService, CacheStats};
use crate::utils::code_generator::{generate_id, is_valid_id};
use crate::utils::link::join_link;

/// Length of the first identifier tried for a new snippet.
pub const MIN_SNIPPET_ID_LEN: usize = 10;

/// Insert attempts before giving up; each attempt uses an id one letter longer.
pub const MAX_CREATE_ATTEMPTS: usize = 5;

/// Default upper bound on snippet content, in bytes.
pub const DEFAULT_MAX_SNIPPET_BYTES: usize = 64 * 1024;

/// Content returned by [`SnippetService::resolve`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedSnippet {
    pub content: String,
    /// `true` when `content` is the stored ciphertext and no passphrase was given.
    pub still_encrypted: bool,
}

/// Service for storing snippets under short unguessable ids.
///
/// Writes go generator → cipher (optional) → repository → cache. Reads go
/// cache → repository on miss → cipher (optional). The cache is advisory: a
/// miss is always resolved from the repository.
pub struct SnippetService<R: SnippetRepository + ?Sized = dyn SnippetRepository> {
    repository: Arc<R>,
    cache: Arc<dyn CacheService<Snippet>>,
    crypto: ContentCrypto,
    max_content_bytes: usize,
}

impl<R: SnippetRepository + ?Sized> SnippetService<R> {
    /// Creates a new snippet service.
    pub fn new(
        repository: Arc<R>,
        cache: Arc<dyn CacheService<Snippet>>,
        crypto: ContentCrypto,
        max_content_bytes: usize,
    ) -> Self {
        Self {
            repository,
            cache,
            crypto,
            max_content_bytes,
        }
    }

    /// Stores `content`, encrypting it when a passphrase is given, and returns
    /// the new snippet id.
    ///
    /// # Id allocation
    ///
    /// The first attempt uses a [`MIN_SNIPPET_ID_LEN`]-letter id. Each
    /// collision retries with a freshly generated id one letter longer, up to
    /// [`MAX_CREATE_ATTEMPTS`] attempts.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] if:
    /// - Content is empty, larger than the configured limit, or contains NUL
    /// - The passphrase is an empty string
    ///
    /// Returns [`AppError::CreationExhausted`] when every attempt collided.
    ///
    /// Returns [`AppError::Internal`] on storage or randomness failures.
    pub async fn store(
        &self,
        content: String,
        passphrase: Option<String>,
    ) -> Result<String, AppError> {
        self.check_content(&content)?;
        check_passphrase(passphrase.as_deref())?;

        let (content, salt) = match passphrase {
            Some(passphrase) => {
                let sealed = self.crypto.seal(content, passphrase).await?;
                (sealed.ciphertext, Some(sealed.salt))
            }
            None => (content, None),
        };

        for attempt in 0..MAX_CREATE_ATTEMPTS {
            let length = MIN_SNIPPET_ID_LEN + attempt;
            let candidate = NewSnippet {
                id: generate_id(length)?,
                content: content.clone(),
                salt,
            };

            match self.repository.insert_if_absent(candidate).await? {
                InsertOutcome::Inserted(snippet) => {
                    let id = snippet.id.clone();
                    tracing::info!(
                        snippet_id = %id,
                        encrypted = snippet.is_encrypted(),
                        "Snippet stored"
                    );
                    self.cache.set(&id, snippet);
                    return Ok(id);
                }
                InsertOutcome::Duplicate => {
                    metrics::counter!("id_collisions_total", "kind" => "snippet").increment(1);
                    tracing::warn!(attempt, length, "Snippet id collision, retrying");
                }
            }
        }

        Err(AppError::creation_exhausted(
            "Could not allocate a unique snippet id",
            json!({ "attempts": MAX_CREATE_ATTEMPTS }),
        ))
    }

    /// Stores `content` and returns its shareable link under `base_url`.
    ///
    /// The link always has exactly one `/` between base and id.
    ///
    /// # Errors
    ///
    /// See [`Self::store`].
    pub async fn store_and_link(
        &self,
        content: String,
        base_url: &str,
        passphrase: Option<String>,
    ) -> Result<String, AppError> {
        let id = self.store(content, passphrase).await?;
        Ok(join_link(base_url, &id))
    }

    /// Resolves a snippet id to its content.
    ///
    /// Without a passphrase the stored content is returned verbatim, which is
    /// the ciphertext for an encrypted snippet. With a passphrase the content
    /// is decrypted and `still_encrypted` is `false`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no snippet has this id.
    ///
    /// Returns [`AppError::Validation`] if a passphrase is given for a snippet
    /// that was never encrypted, or the passphrase is empty.
    ///
    /// Returns [`AppError::DecryptionFailed`] for a wrong passphrase.
    pub async fn resolve(
        &self,
        id: &str,
        passphrase: Option<String>,
    ) -> Result<ResolvedSnippet, AppError> {
        let snippet = self.get_snippet(id).await?;
        check_passphrase(passphrase.as_deref())?;

        let still_encrypted = snippet.is_encrypted();
        match (passphrase, snippet.salt) {
            (None, _) => Ok(ResolvedSnippet {
                content: snippet.content,
                still_encrypted,
            }),
            (Some(_), None) => Err(AppError::bad_request(
                "Snippet is not encrypted",
                json!({ "id": id }),
            )),
            (Some(passphrase), Some(salt)) => {
                let content = self
                    .crypto
                    .open(snippet.content, passphrase, salt)
                    .await
                    .inspect_err(|e| {
                        if matches!(e, AppError::DecryptionFailed { .. }) {
                            tracing::warn!(snippet_id = %id, "Snippet decryption rejected");
                        }
                    })?;

                Ok(ResolvedSnippet {
                    content,
                    still_encrypted: false,
                })
            }
        }
    }

    /// Fetches the stored record, cache first.
    ///
    /// Ids that [`generate_id`] could never have produced are reported as
    /// missing without touching the cache or storage.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no snippet has this id.
    pub async fn get_snippet(&self, id: &str) -> Result<Snippet, AppError> {
        if !is_valid_id(id) {
            return Err(snippet_not_found(id));
        }

        if let Some(snippet) = self.cache.get(id) {
            tracing::debug!(snippet_id = %id, "Snippet cache hit");
            return Ok(snippet);
        }

        tracing::debug!(snippet_id = %id, "Snippet cache miss");
        let snippet = self
            .repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| snippet_not_found(id))?;

        self.cache.set(id, snippet.clone());
        Ok(snippet)
    }

    /// Number of stored snippets.
    pub async fn count(&self) -> Result<i64, AppError> {
        self.repository.count().await
    }

    /// Checks that snippet storage is reachable.
    pub async fn ping(&self) -> Result<(), AppError> {
        self.repository.ping().await
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    fn check_content(&self, content: &str) -> Result<(), AppError> {
        if content.is_empty() {
            return Err(AppError::bad_request(
                "Snippet content must not be empty",
                json!({}),
            ));
        }

        if content.len() > self.max_content_bytes {
            return Err(AppError::bad_request(
                "Snippet content is too large",
                json!({ "max_bytes": self.max_content_bytes, "actual_bytes": content.len() }),
            ));
        }

        // Text columns cannot hold NUL.
        if let Some(position) = content.find('\0') {
            return Err(AppError::bad_request(
                "Snippet content must not contain NUL characters",
                json!({ "position": position }),
            ));
        }

        Ok(())
    }
}

fn check_passphrase(passphrase: Option<&str>) -> Result<(), AppError> {
    if passphrase.is_some_and(str::is_empty) {
        return Err(AppError::bad_request(
            "Passphrase must not be empty",
            json!({}),
        ));
    }
    Ok(())
}

fn snippet_not_found(id: &str) -> AppError {
    AppError::not_found("Snippet not found", json!({ "id": id }))
}
