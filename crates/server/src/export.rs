//! Deck archive export handling.

use std::sync::Arc;

use axum::body::Body;
use axum::extract::{Path, State};
use axum::http::header;
use axum::response::{IntoResponse, Response};

use deckrelay_file_store::StoreError;

use crate::error::ApiError;
use crate::state::AppState;
use crate::stream::RemoveOnEof;

/// `GET /exportDeck/:deckName`.
///
/// Exports the deck through the automation endpoint and streams the
/// resulting archive back with a download disposition. Success is decided
/// by the file's presence on disk, not by the automation call's result.
/// The archive is deleted only after the body has been fully streamed; an
/// aborted transfer leaves it on disk.
pub async fn export_deck(
    State(state): State<AppState>,
    Path(deck_name): Path<String>,
) -> Result<Response, ApiError> {
    let path = state.store.export_path(&deck_name)?;

    let guard = state.store.lock(&path).await;
    state
        .anki
        .export_package(&deck_name, &path, true)
        .await
        .map_err(ApiError::Export)?;

    let file = match tokio::fs::File::open(&path).await {
        Ok(file) => file,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            return Err(ApiError::NotFound(format!(
                "no exported file for deck {deck_name}"
            )));
        }
        Err(err) => return Err(StoreError::from(err).into()),
    };

    tracing::info!(deck = %deck_name, path = %path.display(), "streaming export");

    let body = Body::from_stream(RemoveOnEof::new(
        file,
        Arc::clone(&state.store),
        path,
        guard,
    ));
    let headers = [
        (header::CONTENT_TYPE, "application/octet-stream".to_owned()),
        (
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{deck_name}.apkg\""),
        ),
    ];
    Ok((headers, body).into_response())
}
