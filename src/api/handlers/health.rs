use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde_json::json;

use crate::AppState;

use super::with_journal;

pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    match with_journal(&state, |journal| journal.check()).await {
        Ok(Ok(rows)) => (StatusCode::OK, Json(json!({ "status": "healthy", "rows": rows }))),
        Ok(Err(e)) => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({ "status": "unhealthy", "journal": e.to_string() })),
        ),
        Err(e) => {
            tracing::error!(error = %e, "Health check could not reach the journal");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({ "status": "unhealthy" })),
            )
        }
    }
}
