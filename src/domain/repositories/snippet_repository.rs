//! Repository trait for snippet storage.

use crate::domain::entities::{NewSnippet, Snippet};
use crate::domain::repositories::InsertOutcome;
use crate::error::AppError;
use async_trait::async_trait;

/// Durable, key-unique storage for snippets.
///
/// Records are write-once: there is no update or delete operation.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgSnippetRepository`] - PostgreSQL implementation
/// - [`crate::infrastructure::persistence::InMemorySnippetRepository`] - process-local storage
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SnippetRepository: Send + Sync {
    /// Inserts the snippet unless its id is already taken.
    ///
    /// Atomic per record: either the whole record is stored, or nothing is and
    /// [`InsertOutcome::Duplicate`] is returned.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] when storage is unavailable.
    async fn insert_if_absent(&self, new_snippet: NewSnippet)
    -> Result<InsertOutcome<Snippet>, AppError>;

    /// Finds a snippet by id.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on storage errors.
    async fn find_by_id(&self, id: &str) -> Result<Option<Snippet>, AppError>;

    /// Counts stored snippets.
    async fn count(&self) -> Result<i64, AppError>;

    /// Checks that the storage backend is reachable.
    async fn ping(&self) -> Result<(), AppError>;
}
