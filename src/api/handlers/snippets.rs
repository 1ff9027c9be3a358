//! Handlers for snippet endpoints.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use validator::Validate;

use crate::api::dto::snippet::{
    CreateSnippetRequest, CreateSnippetResponse, SnippetResponse, UnlockSnippetRequest,
};
use crate::error::AppError;
use crate::state::AppState;
use crate::utils::link::join_link;

/// Stores a snippet and returns its shareable link.
///
/// # Endpoint
///
/// `POST /api/snippets`
///
/// # Request Body
///
/// ```json
/// { "content": "secret note", "key": "correct-horse" }
/// ```
///
/// `key` is optional; when present and non-empty the content is encrypted.
///
/// # Response
///
/// **201 Created**
///
/// ```json
/// { "id": "QwErTyUiOp", "link": "https://x.test/s/QwErTyUiOp", "encrypted": true }
/// ```
///
/// # Errors
///
/// - **400** empty or oversized content
/// - **503** no free id within the retry budget (retry later)
pub async fn create_snippet_handler(
    State(state): State<AppState>,
    Json(payload): Json<CreateSnippetRequest>,
) -> Result<(StatusCode, Json<CreateSnippetResponse>), AppError> {
    payload.validate()?;

    let (content, key) = payload.into_parts();
    let encrypted = key.is_some();

    let id = state.snippet_service.store(content, key).await?;
    let link = join_link(&snippet_base(&state.base_url), &id);

    Ok((
        StatusCode::CREATED,
        Json(CreateSnippetResponse { id, link, encrypted }),
    ))
}

/// Returns a snippet as stored.
///
/// # Endpoint
///
/// `GET /s/{id}`
///
/// Encrypted snippets come back as ciphertext with `encrypted: true`; use
/// [`unlock_snippet_handler`] to decrypt.
///
/// # Errors
///
/// - **404** unknown id
pub async fn snippet_handler(
    Path(id): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<SnippetResponse>, AppError> {
    let resolved = state.snippet_service.resolve(&id, None).await?;

    Ok(Json(SnippetResponse {
        id,
        content: resolved.content,
        encrypted: resolved.still_encrypted,
    }))
}

/// Decrypts a snippet with the supplied passphrase.
///
/// # Endpoint
///
/// `POST /s/{id}/unlock`
///
/// # Request Body
///
/// ```json
/// { "key": "correct-horse" }
/// ```
///
/// # Errors
///
/// - **400** empty key, or the snippet was never encrypted
/// - **403** wrong key (`decryption_failed`)
/// - **404** unknown id
pub async fn unlock_snippet_handler(
    Path(id): Path<String>,
    State(state): State<AppState>,
    Json(payload): Json<UnlockSnippetRequest>,
) -> Result<Json<SnippetResponse>, AppError> {
    payload.validate()?;

    let resolved = state
        .snippet_service
        .resolve(&id, Some(payload.key))
        .await?;

    Ok(Json(SnippetResponse {
        id,
        content: resolved.content,
        encrypted: resolved.still_encrypted,
    }))
}

/// Snippets are served under `/s/`.
fn snippet_base(base_url: &str) -> String {
    join_link(base_url, "s")
}
