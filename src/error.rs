use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Internal error: {0}")]
    #[allow(dead_code)]
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AppError::Database(e) => {
                tracing::error!("Database error: {e}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {msg}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };

        let body = axum::Json(json!({ "error": message }));
        (status, body).into_response()
    }
}

/// Failures raised by a platform backend while running a pipeline stage.
#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    #[error("agent request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("agent returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("invalid platform config: {0}")]
    InvalidConfig(#[from] serde_json::Error),

    /// The backend answered, but with something that breaks its contract.
    #[error("contract violation: {0}")]
    Contract(String),

    #[cfg(test)]
    #[error("{0}")]
    Other(String),
}

/// Failures loading raw platform configuration.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("config store query failed: {0}")]
    Database(#[from] sqlx::Error),

    #[cfg(test)]
    #[error("config store unavailable: {0}")]
    Unavailable(String),
}
