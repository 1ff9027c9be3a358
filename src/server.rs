//! HTTP server initialization and runtime setup.
//!
//! Handles storage connections, cache setup, and Axum server lifecycle.

use crate::application::services::{ShortenerService, SnippetService};
use crate::config::{Config, StorageKind};
use crate::crypto::{ContentCrypto, KeyDerivation};
use crate::domain::repositories::{SnippetRepository, UrlRepository};
use crate::infrastructure::cache::build_cache;
use crate::infrastructure::persistence::{
    InMemorySnippetRepository, InMemoryUrlRepository, PgSnippetRepository, PgUrlRepository,
};
use crate::routes::app_router;
use crate::state::AppState;

use anyhow::{Context, Result};
use axum::ServiceExt;
use axum::extract::Request;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use std::net::SocketAddr;
use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Duration;
use tokio_retry::Retry;
use tokio_retry::strategy::{ExponentialBackoff, jitter};

/// Connection attempts made before startup gives up.
const DB_CONNECT_ATTEMPTS: usize = 5;

/// Runs the HTTP server with the given configuration.
///
/// Initializes:
/// - Storage (PostgreSQL pool + migrations, or in-memory)
/// - Snippet and URL caches
/// - Axum HTTP server with graceful shutdown on Ctrl+C
///
/// # Errors
///
/// Returns an error if:
/// - Database connection or migration fails
/// - Server bind fails
/// - Server runtime error occurs
pub async fn run(config: Config) -> Result<()> {
    let (snippets, urls) = open_storage(&config).await?;
    let state = build_state(&config, snippets, urls)?;

    let app = app_router(state);

    let addr: SocketAddr = config
        .listen_addr
        .parse()
        .with_context(|| format!("Invalid LISTEN address '{}'", config.listen_addr))?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Listening on http://{addr}");

    axum::serve(
        listener,
        ServiceExt::<Request>::into_make_service_with_connect_info::<SocketAddr>(app),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    tracing::info!("Server stopped");
    Ok(())
}

/// Wires services and caches over the given repositories.
///
/// # Errors
///
/// Returns an error if `kdf_iterations` is zero.
pub fn build_state(
    config: &Config,
    snippets: Arc<dyn SnippetRepository>,
    urls: Arc<dyn UrlRepository>,
) -> Result<AppState> {
    let iterations =
        NonZeroU32::new(config.kdf_iterations).context("KDF_ITERATIONS must be non-zero")?;
    let crypto = ContentCrypto::new(KeyDerivation::new(iterations));

    let snippet_service = SnippetService::new(
        snippets,
        build_cache("snippets", config.snippet_cache_capacity),
        crypto,
        config.max_snippet_bytes,
    );

    let shortener_service = ShortenerService::new(
        urls,
        build_cache("long_urls", config.url_cache_capacity),
        build_cache("short_ids", config.url_cache_capacity),
    );

    Ok(AppState::new(
        Arc::new(snippet_service),
        Arc::new(shortener_service),
        &config.base_url,
    ))
}

async fn open_storage(
    config: &Config,
) -> Result<(Arc<dyn SnippetRepository>, Arc<dyn UrlRepository>)> {
    match (config.storage, config.database_url.as_deref()) {
        (StorageKind::Postgres, Some(database_url)) => {
            let pool = connect_with_retry(config, database_url).await?;
            tracing::info!("Connected to database");

            sqlx::migrate!("./migrations")
                .run(&pool)
                .await
                .context("Failed to run migrations")?;

            let pool = Arc::new(pool);
            Ok((
                Arc::new(PgSnippetRepository::new(pool.clone())),
                Arc::new(PgUrlRepository::new(pool)),
            ))
        }
        (StorageKind::Postgres, None) => {
            anyhow::bail!("DATABASE_URL is required for postgres storage")
        }
        (StorageKind::Memory, _) => {
            tracing::warn!("Using in-memory storage; records are lost on restart");
            Ok((
                Arc::new(InMemorySnippetRepository::new()),
                Arc::new(InMemoryUrlRepository::new()),
            ))
        }
    }
}

/// Connects the pool, retrying with jittered exponential backoff.
async fn connect_with_retry(config: &Config, database_url: &str) -> Result<PgPool> {
    let options = PgPoolOptions::new()
        .max_connections(config.db_max_connections)
        .acquire_timeout(Duration::from_secs(config.db_connect_timeout))
        .idle_timeout(Duration::from_secs(config.db_idle_timeout))
        .max_lifetime(Duration::from_secs(config.db_max_lifetime));

    let strategy = ExponentialBackoff::from_millis(200)
        .max_delay(Duration::from_secs(5))
        .map(jitter)
        .take(DB_CONNECT_ATTEMPTS);

    Retry::spawn(strategy, || async {
        options.clone().connect(database_url).await.inspect_err(|e| {
            tracing::warn!(error = %e, "Database connection attempt failed");
        })
    })
    .await
    .context("Failed to connect to database")
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {e}");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
