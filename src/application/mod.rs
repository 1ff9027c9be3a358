//! Application layer services implementing business logic.
//!
//! Services consume repository traits, caches and the crypto unit, and
//! provide a clean API for HTTP handlers and the admin CLI.
//!
//! # Available Services
//!
//! - [`services::snippet_service::SnippetService`] - Snippet storage, optional encryption
//! - [`services::shortener_service::ShortenerService`] - Long URL shortening

pub mod services;
