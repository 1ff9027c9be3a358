//! Top-level router configuration.
//!
//! # Route Structure
//!
//! - `GET  /{short_id}`      - Short URL redirect
//! - `GET  /health`          - Health check: storage and caches
//! - `GET  /s/{id}`          - Snippet content (ciphertext when encrypted)
//! - `POST /s/{id}/unlock`   - Decrypt a snippet with its passphrase
//! - `/api/*`                - JSON API for creating snippets and short URLs
//!
//! # Middleware
//!
//! - **Tracing** - Structured request/response logging
//! - **Path normalization** - Trailing slash handling

use crate::api;
use crate::api::handlers::{
    health_handler, redirect_handler, snippet_handler, unlock_snippet_handler,
};
use crate::api::middleware::tracing;
use crate::state::AppState;
use axum::Router;
use axum::routing::{get, post};
use tower::Layer;
use tower_http::normalize_path::{NormalizePath, NormalizePathLayer};

/// Constructs the application router with all routes and middleware.
pub fn app_router(state: AppState) -> NormalizePath<Router> {
    let router = Router::new()
        .route("/{short_id}", get(redirect_handler))
        .route("/health", get(health_handler))
        .route("/s/{id}", get(snippet_handler))
        .route("/s/{id}/unlock", post(unlock_snippet_handler))
        .nest("/api", api::routes::api_routes())
        .with_state(state)
        .layer(tracing::layer());

    NormalizePathLayer::trim_trailing_slash().layer(router)
}
