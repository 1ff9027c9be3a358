#![allow(dead_code)]

use axum::Router;
use axum::routing::{get, post};
use axum_test::TestServer;
use linkvault::api;
use linkvault::api::handlers::{
    health_handler, redirect_handler, snippet_handler, unlock_snippet_handler,
};
use linkvault::application::services::snippet_service::DEFAULT_MAX_SNIPPET_BYTES;
use linkvault::application::services::{ShortenerService, SnippetService};
use linkvault::crypto::{ContentCrypto, KeyDerivation};
use linkvault::domain::entities::Snippet;
use linkvault::domain::repositories::{SnippetRepository, UrlRepository};
use linkvault::infrastructure::cache::LruCache;
use linkvault::infrastructure::persistence::{
    InMemorySnippetRepository, InMemoryUrlRepository, PgSnippetRepository, PgUrlRepository,
};
use linkvault::state::AppState;
use sqlx::PgPool;
use std::num::NonZeroU32;
use std::sync::Arc;

pub const BASE_URL: &str = "https://x.test";

/// Low iteration count keeps key derivation fast in tests.
pub fn fast_crypto() -> ContentCrypto {
    ContentCrypto::new(KeyDerivation::new(NonZeroU32::new(1_000).unwrap()))
}

pub fn create_state_with(
    snippets: Arc<dyn SnippetRepository>,
    urls: Arc<dyn UrlRepository>,
) -> AppState {
    let snippet_service = SnippetService::new(
        snippets,
        Arc::new(LruCache::<Snippet>::new("snippets", 64)),
        fast_crypto(),
        DEFAULT_MAX_SNIPPET_BYTES,
    );
    let shortener_service = ShortenerService::new(
        urls,
        Arc::new(LruCache::<String>::new("long_urls", 64)),
        Arc::new(LruCache::<String>::new("short_ids", 64)),
    );

    AppState::new(
        Arc::new(snippet_service),
        Arc::new(shortener_service),
        BASE_URL,
    )
}

/// State backed by in-memory repositories.
pub fn create_test_state() -> AppState {
    create_state_with(
        Arc::new(InMemorySnippetRepository::new()),
        Arc::new(InMemoryUrlRepository::new()),
    )
}

/// State backed by PostgreSQL.
pub fn create_pg_state(pool: PgPool) -> AppState {
    let pool = Arc::new(pool);
    create_state_with(
        Arc::new(PgSnippetRepository::new(pool.clone())),
        Arc::new(PgUrlRepository::new(pool)),
    )
}

/// Same routes as the production router, without path normalization.
pub fn test_router(state: AppState) -> Router {
    Router::new()
        .route("/{short_id}", get(redirect_handler))
        .route("/health", get(health_handler))
        .route("/s/{id}", get(snippet_handler))
        .route("/s/{id}/unlock", post(unlock_snippet_handler))
        .nest("/api", api::routes::api_routes())
        .with_state(state)
}

pub fn test_server() -> TestServer {
    TestServer::new(test_router(create_test_state())).unwrap()
}
