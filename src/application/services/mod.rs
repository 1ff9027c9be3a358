//! Business logic services for the application layer.

pub mod shortener_service;
pub mod snippet_service;

pub use shortener_service::ShortenerService;
pub use snippet_service::{ResolvedSnippet, SnippetService};
