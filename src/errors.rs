use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

/// Failures of the journal core. Every variant carries a message fit to be
/// shown to the user as-is.
#[derive(Debug, thiserror::Error)]
pub enum JournalError {
    #[error("{0}")]
    Validation(String),

    #[error("Trade ID '{0}' already exists")]
    DuplicateKey(String),

    #[error("Could not read journal file: {0}")]
    StorageRead(String),

    #[error("Could not write journal file: {0}")]
    StorageWrite(String),

    #[error("Screenshot file error: {0}")]
    AttachmentWrite(String),

    #[error("Screenshot not found: {0}")]
    AttachmentNotFound(String),

    #[error("Trade '{0}' not found")]
    NotFound(String),
}

impl JournalError {
    pub fn status(&self) -> StatusCode {
        match self {
            JournalError::Validation(_) => StatusCode::BAD_REQUEST,
            JournalError::DuplicateKey(_) => StatusCode::CONFLICT,
            JournalError::NotFound(_) | JournalError::AttachmentNotFound(_) => {
                StatusCode::NOT_FOUND
            }
            JournalError::StorageRead(_)
            | JournalError::StorageWrite(_)
            | JournalError::AttachmentWrite(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error(transparent)]
    Journal(#[from] JournalError),

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

#[derive(Serialize)]
struct ErrorBody {
    success: bool,
    error: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::Journal(e) => {
                if e.status().is_server_error() {
                    tracing::error!(error = %e, "Journal storage failure");
                }
                (e.status(), e.to_string())
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error".into())
            }
        };

        (
            status,
            Json(ErrorBody {
                success: false,
                error: message,
            }),
        )
            .into_response()
    }
}
