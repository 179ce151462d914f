use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

const GENERIC_MESSAGE: &str = "Internal server error";

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    /// One message per failing field; joined with `, ` on the wire.
    #[error("Validation error: {}", .0.join(", "))]
    Validation(Vec<String>),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Non-2xx answer from a called service. `status` is what the client sees.
    #[error("Upstream error (status {status}): {}", .message.as_deref().unwrap_or(GENERIC_MESSAGE))]
    Upstream { status: u16, message: Option<String> },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    pub fn validation(message: impl Into<String>) -> Self {
        AppError::Validation(vec![message.into()])
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::Upstream { status, .. } => {
                StatusCode::from_u16(*status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
            }
            AppError::Http(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// The single-line message sent to the client. Never leaks internals.
    pub fn client_message(&self) -> String {
        match self {
            AppError::Validation(messages) => messages.join(", "),
            AppError::NotFound(msg) | AppError::Unauthorized(msg) | AppError::Forbidden(msg) => {
                msg.clone()
            }
            AppError::Upstream { message, .. } => message
                .clone()
                .unwrap_or_else(|| GENERIC_MESSAGE.to_string()),
            AppError::Http(_) | AppError::Internal(_) => GENERIC_MESSAGE.to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        match &self {
            AppError::Http(e) => tracing::error!("Upstream transport error: {e}"),
            AppError::Internal(e) => tracing::error!("Internal error: {e:?}"),
            AppError::Upstream { status, message } if *status >= 500 => {
                tracing::error!("Upstream returned {status}: {message:?}")
            }
            other => tracing::debug!("Request failed: {other}"),
        }

        let body = Json(json!({ "message": self.client_message() }));
        (status, body).into_response()
    }
}
