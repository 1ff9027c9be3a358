//! DTOs for health check endpoint.

use serde::Serialize;

use crate::infrastructure::cache::CacheStats;

/// Health check response with component status.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub checks: HealthChecks,
}

/// Health status for each system component.
#[derive(Debug, Serialize)]
pub struct HealthChecks {
    pub storage: CheckStatus,
    pub snippet_cache: CacheReport,
    /// `short_id -> long_url`, used by redirects.
    pub long_url_cache: CacheReport,
    /// `long_url -> short_id`, used by shortening.
    pub short_id_cache: CacheReport,
}

/// Cache counters plus the derived hit rate.
#[derive(Debug, Serialize)]
pub struct CacheReport {
    #[serde(flatten)]
    pub stats: CacheStats,
    pub hit_rate: f64,
}

impl From<CacheStats> for CacheReport {
    fn from(stats: CacheStats) -> Self {
        Self {
            stats,
            hit_rate: stats.hit_rate(),
        }
    }
}

/// Individual component health status.
#[derive(Debug, Serialize)]
pub struct CheckStatus {
    pub status: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}
