//! Handler for health check endpoint.

use axum::{Json, extract::State, http::StatusCode};

use crate::api::dto::health::{CheckStatus, HealthChecks, HealthResponse};
use crate::state::AppState;

/// Returns service health status with component checks.
///
/// # Endpoint
///
/// `GET /health`
///
/// # Response Codes
///
/// - **200 OK**: Storage reachable
/// - **503 Service Unavailable**: Storage unreachable
///
/// # Response
///
/// ```json
/// {
///   "status": "healthy",
///   "version": "0.1.0",
///   "checks": {
///     "storage": { "status": "ok", "message": "12 snippets, 40 short URLs" },
///     "snippet_cache": { "entries": 12, "capacity": 2000, "hits": 30, "misses": 10, "evictions": 0, "hit_rate": 0.75 },
///     "long_url_cache": { "entries": 40, "capacity": 3000, "hits": 90, "misses": 10, "evictions": 0, "hit_rate": 0.9 },
///     "short_id_cache": { "entries": 40, "capacity": 3000, "hits": 5, "misses": 40, "evictions": 0, "hit_rate": 0.111 }
///   }
/// }
/// ```
///
/// Caches are advisory, so their state never makes the service unhealthy.
pub async fn health_handler(
    State(state): State<AppState>,
) -> Result<Json<HealthResponse>, (StatusCode, Json<HealthResponse>)> {
    let storage = check_storage(&state).await;
    let healthy = storage.status == "ok";

    let response = HealthResponse {
        status: if healthy { "healthy" } else { "degraded" }.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        checks: HealthChecks {
            storage,
            snippet_cache: state.snippet_service.cache_stats().into(),
            long_url_cache: state.shortener_service.long_url_cache_stats().into(),
            short_id_cache: state.shortener_service.short_id_cache_stats().into(),
        },
    };

    if healthy {
        Ok(Json(response))
    } else {
        Err((StatusCode::SERVICE_UNAVAILABLE, Json(response)))
    }
}

/// Pings both repositories and reports record counts.
async fn check_storage(state: &AppState) -> CheckStatus {
    let pings = tokio::try_join!(
        state.snippet_service.ping(),
        state.shortener_service.ping()
    );
    if let Err(e) = pings {
        return CheckStatus {
            status: "error".to_string(),
            message: Some(format!("Storage error: {e}")),
        };
    }

    let counts = tokio::try_join!(
        state.snippet_service.count(),
        state.shortener_service.count()
    );
    match counts {
        Ok((snippets, urls)) => CheckStatus {
            status: "ok".to_string(),
            message: Some(format!("{snippets} snippets, {urls} short URLs")),
        },
        Err(e) => CheckStatus {
            status: "error".to_string(),
            message: Some(format!("Storage error: {e}")),
        },
    }
}
