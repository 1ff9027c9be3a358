//! Repository trait definitions for the domain layer.
//!
//! These traits form the persistence gateway: the application layer only
//! talks to storage through them. Implementations live in
//! `crate::infrastructure::persistence`, and `mockall` generates mocks for
//! unit tests.
//!
//! # Available Repositories
//!
//! - [`SnippetRepository`] - Write-once snippet records
//! - [`UrlRepository`] - Bidirectional long URL mappings
//!
//! # Testing
//!
//! See integration tests in `tests/repository_*.rs` for usage examples.

pub mod snippet_repository;
pub mod url_repository;

pub use snippet_repository::SnippetRepository;
pub use url_repository::UrlRepository;

#[cfg(test)]
pub use snippet_repository::MockSnippetRepository;
#[cfg(test)]
pub use url_repository::MockUrlRepository;

/// Result of an insert-if-absent call.
#[derive(Debug, Clone)]
pub enum InsertOutcome<T> {
    /// The record was stored; carries the stored value.
    Inserted(T),
    /// A unique key was already taken. Nothing was written.
    Duplicate,
}

impl<T> InsertOutcome<T> {
    pub fn is_duplicate(&self) -> bool {
        matches!(self, InsertOutcome::Duplicate)
    }
}
