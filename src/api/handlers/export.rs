use axum::extract::State;
use axum::http::header::{CONTENT_DISPOSITION, CONTENT_TYPE};
use axum::response::IntoResponse;

use crate::errors::AppError;
use crate::AppState;

use super::with_journal;

/// GET /api/export — the backing file, byte for byte, as a download
pub async fn download(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let file_name = state
        .config
        .journal_path
        .file_name()
        .map(|n| n.to_string_lossy().replace('"', ""))
        .unwrap_or_else(|| "trade_journal.csv".into());

    let bytes = with_journal(&state, |journal| journal.export()).await??;
    tracing::info!(size = bytes.len(), "Journal exported");

    Ok((
        [
            (CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (CONTENT_DISPOSITION, format!("attachment; filename=\"{file_name}\"")),
        ],
        bytes,
    ))
}
