//! API route configuration.

use crate::api::handlers::{create_snippet_handler, shorten_handler};
use crate::state::AppState;
use axum::{Router, routing::post};

/// JSON API routes.
///
/// # Endpoints
///
/// - `POST /snippets` - Store a snippet, optionally encrypted
/// - `POST /shorten`  - Shorten a long URL
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/snippets", post(create_snippet_handler))
        .route("/shorten", post(shorten_handler))
}
