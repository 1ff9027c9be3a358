//! Handler for URL shortening endpoint.

use axum::{Json, extract::State};
use validator::Validate;

use crate::api::dto::shorten::{ShortenRequest, ShortenResponse};
use crate::error::AppError;
use crate::state::AppState;
use crate::utils::link::join_link;

/// Creates (or reuses) the short URL for a long URL.
///
/// # Endpoint
///
/// `POST /api/shorten`
///
/// # Request Body
///
/// ```json
/// { "long_url": "https://example.com/some/long/path" }
/// ```
///
/// # Response
///
/// ```json
/// {
///   "long_url": "https://example.com/some/long/path",
///   "short_id": "aBcDeFgH",
///   "short_url": "https://x.test/aBcDeFgH"
/// }
/// ```
///
/// Shortening the same URL twice returns the same `short_id`.
///
/// # Errors
///
/// - **400** invalid URL
/// - **503** no free short id (retry later)
pub async fn shorten_handler(
    State(state): State<AppState>,
    Json(payload): Json<ShortenRequest>,
) -> Result<Json<ShortenResponse>, AppError> {
    payload.validate()?;

    let short_id = state
        .shortener_service
        .get_or_create_short_id(&payload.long_url)
        .await?;
    let short_url = join_link(&state.base_url, &short_id);

    Ok(Json(ShortenResponse {
        long_url: payload.long_url,
        short_id,
        short_url,
    }))
}
