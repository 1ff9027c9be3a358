//! Repository implementations.
//!
//! # Repositories
//!
//! - [`PgSnippetRepository`] - Snippet storage in PostgreSQL
//! - [`PgUrlRepository`] - Short URL mappings in PostgreSQL
//! - [`InMemorySnippetRepository`], [`InMemoryUrlRepository`] - process-local
//!   storage for tests and database-less runs

pub mod memory;
pub mod pg_snippet_repository;
pub mod pg_url_repository;

pub use memory::{InMemorySnippetRepository, InMemoryUrlRepository};
pub use pg_snippet_repository::PgSnippetRepository;
pub use pg_url_repository::PgUrlRepository;
