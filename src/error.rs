//! Application error type and its HTTP representation.
//!
//! Every expected outcome of the storage engine (missing record, wrong
//! passphrase, exhausted identifier space) is a distinct variant so handlers
//! and services match on it instead of inspecting strings.

use axum::{
    Json,
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::{Value, json};

#[derive(Serialize)]
struct ErrorBody {
    error: ErrorInfo,
}

/// Serializable error payload returned to API clients.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorInfo {
    pub code: &'static str,
    pub message: String,
    pub details: Value,
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// The request itself is malformed (bad URL, empty content, passphrase
    /// supplied for a record that was never encrypted).
    #[error("{message}")]
    Validation { message: String, details: Value },

    #[error("{message}")]
    NotFound { message: String, details: Value },

    /// No free identifier was found within the retry budget. Retryable later.
    #[error("{message}")]
    CreationExhausted { message: String, details: Value },

    /// Authenticated decryption rejected the ciphertext: wrong passphrase or
    /// corrupted content.
    #[error("{message}")]
    DecryptionFailed { message: String, details: Value },

    /// Storage unavailable, randomness source failure and other faults that
    /// are escalated rather than retried.
    #[error("{message}")]
    Internal { message: String, details: Value },
}

impl AppError {
    pub fn bad_request(message: impl Into<String>, details: Value) -> Self {
        Self::Validation {
            message: message.into(),
            details,
        }
    }

    pub fn not_found(message: impl Into<String>, details: Value) -> Self {
        Self::NotFound {
            message: message.into(),
            details,
        }
    }

    pub fn creation_exhausted(message: impl Into<String>, details: Value) -> Self {
        Self::CreationExhausted {
            message: message.into(),
            details,
        }
    }

    pub fn decryption_failed(message: impl Into<String>, details: Value) -> Self {
        Self::DecryptionFailed {
            message: message.into(),
            details,
        }
    }

    pub fn internal(message: impl Into<String>, details: Value) -> Self {
        Self::Internal {
            message: message.into(),
            details,
        }
    }

    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            AppError::Validation { .. } => (StatusCode::BAD_REQUEST, "validation_error"),
            AppError::NotFound { .. } => (StatusCode::NOT_FOUND, "not_found"),
            AppError::CreationExhausted { .. } => {
                (StatusCode::SERVICE_UNAVAILABLE, "creation_exhausted")
            }
            AppError::DecryptionFailed { .. } => (StatusCode::FORBIDDEN, "decryption_failed"),
            AppError::Internal { .. } => (StatusCode::INTERNAL_SERVER_ERROR, "internal_error"),
        }
    }

    /// Converts the error into its serializable payload.
    pub fn to_error_info(&self) -> ErrorInfo {
        let (_, code) = self.status_and_code();
        let (message, details) = match self {
            AppError::Validation { message, details }
            | AppError::NotFound { message, details }
            | AppError::CreationExhausted { message, details }
            | AppError::DecryptionFailed { message, details }
            | AppError::Internal { message, details } => (message.clone(), details.clone()),
        };

        ErrorInfo {
            code,
            message,
            details,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, _) = self.status_and_code();

        if let AppError::Internal { message, details } = &self {
            tracing::error!(%message, %details, "Request failed with internal error");
        }

        let body = ErrorBody {
            error: self.to_error_info(),
        };

        let mut response = (status, Json(body)).into_response();
        if status == StatusCode::SERVICE_UNAVAILABLE {
            response
                .headers_mut()
                .insert(header::RETRY_AFTER, HeaderValue::from_static("1"));
        }
        response
    }
}

impl From<sqlx::Error> for AppError {
    /// Storage faults are escalated. Duplicate keys never reach this point:
    /// inserts report them as [`InsertOutcome::Duplicate`](crate::domain::repositories::InsertOutcome).
    fn from(e: sqlx::Error) -> Self {
        tracing::error!(error = %e, "Database error");
        AppError::internal("Database error", json!({}))
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(e: validator::ValidationErrors) -> Self {
        let fields: Vec<String> = e.field_errors().keys().map(|k| k.to_string()).collect();

        AppError::bad_request("Request validation failed", json!({ "fields": fields }))
    }
}

impl From<tokio::task::JoinError> for AppError {
    fn from(e: tokio::task::JoinError) -> Self {
        AppError::internal(
            "Background task failed",
            json!({ "reason": e.to_string() }),
        )
    }
}
