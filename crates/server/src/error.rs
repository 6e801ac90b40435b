//! Handler-boundary error mapping.
//!
//! Every handler failure converts to a structured JSON body here.
//! Cleanup deletes never surface to the caller; their outcomes are
//! logged at the call site instead.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use deckrelay_file_store::StoreError;

/// Errors surfaced to HTTP callers.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Caller-side input problem: missing file, bad name. HTTP 400.
    #[error("{0}")]
    Validation(String),

    #[error("malformed multipart request")]
    Multipart(#[from] axum::extract::multipart::MultipartError),

    /// Expected export file absent after the automation call. HTTP 404.
    #[error("{0}")]
    NotFound(String),

    #[error("failed to import deck")]
    Import(#[source] deckrelay_anki_connect::Error),

    #[error("failed to export deck")]
    Export(#[source] deckrelay_anki_connect::Error),

    #[error("file store error")]
    Store(#[source] StoreError),
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            // Bad names are the caller's fault, not a server failure.
            StoreError::InvalidName(msg) => ApiError::Validation(msg),
            other => ApiError::Store(other),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            ApiError::Validation(msg) => (StatusCode::BAD_REQUEST, json!({ "error": msg })),
            ApiError::Multipart(err) => (
                StatusCode::BAD_REQUEST,
                json!({ "error": self.to_string(), "details": err.to_string() }),
            ),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, json!({ "error": msg })),
            ApiError::Import(err) | ApiError::Export(err) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                json!({ "error": self.to_string(), "details": err.to_string() }),
            ),
            ApiError::Store(err) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                json!({ "error": self.to_string(), "details": err.to_string() }),
            ),
        };

        if status.is_server_error() {
            tracing::error!(status = %status, error = %self, "request failed");
        }

        (status, Json(body)).into_response()
    }
}
