use axum::extract::{Multipart, Path, State};
use axum::http::header::CONTENT_TYPE;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Serialize;

use crate::api::form::read_submission;
use crate::errors::AppError;
use crate::journal::{ActionOutcome, JournalAction, RenderModel, TradeView};
use crate::AppState;

use super::with_journal;

#[derive(Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<String>,
}

/// Actions always answer with the refreshed journal, failed or not.
fn render(outcome: ActionOutcome) -> (StatusCode, Json<ApiResponse<RenderModel>>) {
    let status = outcome
        .error
        .as_ref()
        .map(|e| e.status())
        .unwrap_or(StatusCode::OK);

    (
        status,
        Json(ApiResponse {
            success: outcome.error.is_none(),
            data: Some(outcome.view),
            error: outcome.error.map(|e| e.to_string()),
        }),
    )
}

/// GET /api/trades — full journal history
pub async fn list(
    State(state): State<AppState>,
) -> Result<(StatusCode, Json<ApiResponse<RenderModel>>), AppError> {
    let outcome = with_journal(&state, |journal| journal.handle(JournalAction::View)).await?;
    Ok(render(outcome))
}

/// POST /api/trades — submit the journal form (multipart, optional screenshot)
pub async fn create(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<(StatusCode, Json<ApiResponse<RenderModel>>), AppError> {
    let (trade, screenshot) = read_submission(multipart).await?;
    tracing::debug!(trade_id = %trade.trade_id, has_screenshot = screenshot.is_some(), "Form submitted");

    let outcome = with_journal(&state, move |journal| {
        journal.handle(JournalAction::Submit { trade, screenshot })
    })
    .await?;
    Ok(render(outcome))
}

/// GET /api/trades/{trade_id} — one record, expanded
pub async fn detail(
    State(state): State<AppState>,
    Path(trade_id): Path<String>,
) -> Result<Json<ApiResponse<TradeView>>, AppError> {
    let view = with_journal(&state, move |journal| journal.trade(&trade_id)).await??;

    Ok(Json(ApiResponse {
        success: true,
        data: Some(view),
        error: None,
    }))
}

/// GET /api/trades/{trade_id}/screenshot — the stored image
pub async fn screenshot(
    State(state): State<AppState>,
    Path(trade_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let shot = with_journal(&state, move |journal| journal.screenshot(&trade_id)).await??;
    Ok(([(CONTENT_TYPE, shot.content_type)], shot.bytes))
}

/// DELETE /api/trades/{trade_id}/screenshot — remove the image, clear the reference
pub async fn delete_screenshot(
    State(state): State<AppState>,
    Path(trade_id): Path<String>,
) -> Result<(StatusCode, Json<ApiResponse<RenderModel>>), AppError> {
    let outcome = with_journal(&state, move |journal| {
        journal.handle(JournalAction::DeleteScreenshot { trade_id })
    })
    .await?;
    Ok(render(outcome))
}
