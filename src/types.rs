// Error types shared by the HTTP layer

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::models::UploadResponse;
use crate::storage::StorageError;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Missing or unusable user input; the caller can retry with a valid file
    #[error("{0}")]
    Validation(String),

    /// Deployment problem (env vars, credentials); not retriable by the user
    #[error("{0}")]
    Configuration(String),

    #[error("Upload failed: {0}")]
    StorageWrite(String),

    #[error("Could not create a public link: {0}")]
    Signing(String),
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Configuration(_) | AppError::StorageWrite(_) | AppError::Signing(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl From<StorageError> for AppError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::Credential(msg) => AppError::Configuration(msg),
            StorageError::Write(msg) => AppError::StorageWrite(msg),
            StorageError::Signing(msg) => AppError::Signing(msg),
            StorageError::Transport(e) => AppError::StorageWrite(transport_summary(&e)),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        (status, Json(UploadResponse::failure(self.to_string()))).into_response()
    }
}

/// Short transport failure description without the request URL
fn transport_summary(err: &reqwest::Error) -> String {
    if err.is_timeout() {
        "storage request timed out".to_string()
    } else if err.is_connect() {
        "could not connect to storage".to_string()
    } else {
        "storage request failed".to_string()
    }
}

pub type AppResult<T> = std::result::Result<T, AppError>;
