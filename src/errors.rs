use crate::models::ErrorBody;
use axum::{http::StatusCode, Json};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("store document is not valid json: {0}")]
    Json(#[from] serde_json::Error),
}

/// The only two ways a document operation can fail.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("storage unavailable: {0}")]
    StorageUnavailable(#[from] StoreError),
    #[error("unhandled error: {0}")]
    Unhandled(String),
}

#[derive(Debug)]
pub struct AppError {
    pub status: StatusCode,
    pub message: String,
}

impl AppError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }

    /// A 500 whose body is a fixed message; the cause is only logged.
    pub fn internal(err: &ServiceError, message: &str) -> Self {
        tracing::error!("{message}: {err}");
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: message.to_string(),
        }
    }
}

impl axum::response::IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        (
            self.status,
            Json(ErrorBody {
                message: self.message,
            }),
        )
            .into_response()
    }
}
