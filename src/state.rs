//! Shared application state injected into every handler.

use std::sync::Arc;

use crate::application::services::{ShortenerService, SnippetService};

/// Process-wide services plus the public base URL for generated links.
///
/// Cheap to clone: every field is reference counted.
#[derive(Clone)]
pub struct AppState {
    pub snippet_service: Arc<SnippetService>,
    pub shortener_service: Arc<ShortenerService>,
    pub base_url: Arc<str>,
}

impl AppState {
    pub fn new(
        snippet_service: Arc<SnippetService>,
        shortener_service: Arc<ShortenerService>,
        base_url: &str,
    ) -> Self {
        Self {
            snippet_service,
            shortener_service,
            base_url: Arc::from(base_url),
        }
    }
}
