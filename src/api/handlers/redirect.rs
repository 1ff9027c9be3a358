//! Handler for short URL redirect.

use axum::{
    extract::{Path, State},
    response::{IntoResponse, Redirect},
};

use crate::error::AppError;
use crate::state::AppState;

/// Redirects a short id to its original URL.
///
/// # Endpoint
///
/// `GET /{short_id}`
///
/// The lookup is cache-aside: the `short_id -> long_url` cache is checked
/// first and repopulated from storage on a miss.
///
/// # Errors
///
/// Returns 404 Not Found if the short id doesn't exist.
pub async fn redirect_handler(
    Path(short_id): Path<String>,
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let long_url = state.shortener_service.get_long_url(&short_id).await?;

    Ok(Redirect::temporary(&long_url))
}
