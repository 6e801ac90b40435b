//! Automation endpoint connectivity probe.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use crate::state::AppState;

/// `GET /anki-connect-status`.
///
/// Pure pass-through of the automation version call; no filesystem
/// interaction. The failure body keeps the `{status, error}` shape
/// rather than the generic error envelope.
pub async fn anki_connect_status(State(state): State<AppState>) -> Response {
    match state.anki.version().await {
        Ok(version) => Json(json!({
            "status": "connected",
            "version": version,
        }))
        .into_response(),
        Err(err) => {
            tracing::warn!(error = %err, "AnkiConnect status probe failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "status": "disconnected",
                    "error": err.to_string(),
                })),
            )
                .into_response()
        }
    }
}
