//! HTTP routes.

use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::response::Html;
use axum::routing::{get, post};
use tower_http::cors::CorsLayer;

use crate::state::AppState;
use crate::{export, status, upload};

/// Maximum accepted upload size (50 MiB).
pub const MAX_UPLOAD_SIZE: usize = 50 * 1024 * 1024;

/// Upload form served at `/`.
const UPLOAD_FORM: &str = include_str!("../assets/upload.html");

/// Builds the relay router over the given state.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(|| async { Html(UPLOAD_FORM) }))
        .route("/anki-connect-status", get(status::anki_connect_status))
        .route(
            "/upload-deck",
            post(upload::upload_deck).layer(DefaultBodyLimit::max(MAX_UPLOAD_SIZE)),
        )
        .route("/exportDeck/:deckName", get(export::export_deck))
        .layer(CorsLayer::permissive())
        .with_state(state)
}
