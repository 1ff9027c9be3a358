//! Process-local repository implementations.
//!
//! Same contracts as the PostgreSQL repositories, backed by maps behind a
//! `parking_lot::RwLock`. Used for `STORAGE=memory` runs and in tests.

use async_trait::async_trait;
use chrono::Utc;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::domain::entities::{NewShortUrl, NewSnippet, ShortUrl, Snippet};
use crate::domain::repositories::{InsertOutcome, SnippetRepository, UrlRepository};
use crate::error::AppError;

/// In-memory snippet storage.
#[derive(Default)]
pub struct InMemorySnippetRepository {
    snippets: RwLock<HashMap<String, Snippet>>,
    lookups: AtomicU64,
}

impl InMemorySnippetRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of `find_by_id` calls served so far.
    pub fn lookups(&self) -> u64 {
        self.lookups.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl SnippetRepository for InMemorySnippetRepository {
    async fn insert_if_absent(
        &self,
        new_snippet: NewSnippet,
    ) -> Result<InsertOutcome<Snippet>, AppError> {
        let mut snippets = self.snippets.write();

        match snippets.entry(new_snippet.id) {
            Entry::Occupied(_) => Ok(InsertOutcome::Duplicate),
            Entry::Vacant(slot) => {
                let snippet = Snippet::new(
                    slot.key().clone(),
                    new_snippet.content,
                    new_snippet.salt,
                    Utc::now(),
                );
                slot.insert(snippet.clone());
                Ok(InsertOutcome::Inserted(snippet))
            }
        }
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Snippet>, AppError> {
        self.lookups.fetch_add(1, Ordering::Relaxed);
        Ok(self.snippets.read().get(id).cloned())
    }

    async fn count(&self) -> Result<i64, AppError> {
        Ok(self.snippets.read().len() as i64)
    }

    async fn ping(&self) -> Result<(), AppError> {
        Ok(())
    }
}

#[derive(Default)]
struct UrlTables {
    by_short_id: HashMap<String, ShortUrl>,
    short_id_by_long_url: HashMap<String, String>,
}

/// In-memory short URL storage with both keys unique.
#[derive(Default)]
pub struct InMemoryUrlRepository {
    tables: RwLock<UrlTables>,
}

impl InMemoryUrlRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UrlRepository for InMemoryUrlRepository {
    async fn insert_if_absent(
        &self,
        new_url: NewShortUrl,
    ) -> Result<InsertOutcome<ShortUrl>, AppError> {
        let mut tables = self.tables.write();

        if tables.by_short_id.contains_key(&new_url.short_id)
            || tables.short_id_by_long_url.contains_key(&new_url.long_url)
        {
            return Ok(InsertOutcome::Duplicate);
        }

        let url = ShortUrl::new(new_url.short_id, new_url.long_url, Utc::now());
        tables
            .short_id_by_long_url
            .insert(url.long_url.clone(), url.short_id.clone());
        tables.by_short_id.insert(url.short_id.clone(), url.clone());

        Ok(InsertOutcome::Inserted(url))
    }

    async fn find_by_short_id(&self, short_id: &str) -> Result<Option<ShortUrl>, AppError> {
        Ok(self.tables.read().by_short_id.get(short_id).cloned())
    }

    async fn find_by_long_url(&self, long_url: &str) -> Result<Option<ShortUrl>, AppError> {
        let tables = self.tables.read();
        Ok(tables
            .short_id_by_long_url
            .get(long_url)
            .and_then(|id| tables.by_short_id.get(id))
            .cloned())
    }

    async fn count(&self) -> Result<i64, AppError> {
        Ok(self.tables.read().by_short_id.len() as i64)
    }

    async fn ping(&self) -> Result<(), AppError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::{SALT_LEN, Salt};

    fn new_snippet(id: &str) -> NewSnippet {
        NewSnippet {
            id: id.to_string(),
            content: "hello".to_string(),
            salt: None,
        }
    }

    #[tokio::test]
    async fn test_snippet_insert_then_find() {
        let repo = InMemorySnippetRepository::new();

        let outcome = repo.insert_if_absent(new_snippet("abcdefghij")).await.unwrap();
        assert!(matches!(outcome, InsertOutcome::Inserted(ref s) if s.id == "abcdefghij"));

        let found = repo.find_by_id("abcdefghij").await.unwrap().unwrap();
        assert_eq!(found.content, "hello");
        assert_eq!(repo.lookups(), 1);
    }

    #[tokio::test]
    async fn test_snippet_duplicate_keeps_original() {
        let repo = InMemorySnippetRepository::new();
        repo.insert_if_absent(new_snippet("abcdefghij")).await.unwrap();

        let outcome = repo
            .insert_if_absent(NewSnippet {
                id: "abcdefghij".to_string(),
                content: "other".to_string(),
                salt: Some(Salt::new([1u8; SALT_LEN])),
            })
            .await
            .unwrap();

        assert!(outcome.is_duplicate());
        let found = repo.find_by_id("abcdefghij").await.unwrap().unwrap();
        assert_eq!(found.content, "hello");
        assert!(!found.is_encrypted());
        assert_eq!(repo.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_url_both_keys_unique() {
        let repo = InMemoryUrlRepository::new();

        let first = repo
            .insert_if_absent(NewShortUrl {
                short_id: "abcdefgh".to_string(),
                long_url: "https://example.com/".to_string(),
            })
            .await
            .unwrap();
        assert!(!first.is_duplicate());

        let same_id = repo
            .insert_if_absent(NewShortUrl {
                short_id: "abcdefgh".to_string(),
                long_url: "https://other.com/".to_string(),
            })
            .await
            .unwrap();
        assert!(same_id.is_duplicate());

        let same_url = repo
            .insert_if_absent(NewShortUrl {
                short_id: "zyxwvuts".to_string(),
                long_url: "https://example.com/".to_string(),
            })
            .await
            .unwrap();
        assert!(same_url.is_duplicate());

        let by_value = repo
            .find_by_long_url("https://example.com/")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(by_value.short_id, "abcdefgh");
        assert_eq!(repo.count().await.unwrap(), 1);
    }
}
