//! Deck archive upload handling.

use axum::Json;
use axum::extract::{Multipart, State};
use serde_json::{Value, json};

use crate::error::ApiError;
use crate::state::AppState;

/// `POST /upload-deck`.
///
/// Stages a multipart `.apkg` upload and triggers an import on the
/// automation endpoint. A file without the required suffix never reaches
/// the import call, and a failed import always removes the staged file.
pub async fn upload_deck(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<Value>, ApiError> {
    // First file-bearing field wins; the form names it `deck`.
    let mut upload = None;
    while let Some(field) = multipart.next_field().await? {
        let Some(name) = field.file_name().map(str::to_owned) else {
            continue;
        };
        let bytes = field.bytes().await?;
        upload = Some((name, bytes));
        break;
    }

    let Some((file_name, bytes)) = upload else {
        return Err(ApiError::Validation(
            "no file uploaded or file type not supported".into(),
        ));
    };

    // Name validation runs before any disk write or automation call.
    let path = state.store.archive_path(&file_name)?;

    let _guard = state.store.lock(&path).await;
    state.store.stage(&path, &bytes).await?;

    if let Err(err) = state.anki.import_package(&path).await {
        state.store.remove(&path);
        return Err(ApiError::Import(err));
    }

    tracing::info!(file = %file_name, "deck imported");
    Ok(Json(json!({
        "message": "Deck uploaded successfully",
        "file": file_name,
        "path": path.display().to_string(),
    })))
}
