use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::ingest::IngestError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error(transparent)]
    Ingest(#[from] IngestError),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::Ingest(err) => {
                let (status, code) = ingest_status(err);
                (status, code, err.to_string())
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}

fn ingest_status(err: &IngestError) -> (StatusCode, &'static str) {
    match err {
        IngestError::UnsupportedFormat(_) => {
            (StatusCode::UNSUPPORTED_MEDIA_TYPE, "UNSUPPORTED_FORMAT")
        }
        IngestError::FileTooLarge { .. } => (StatusCode::PAYLOAD_TOO_LARGE, "FILE_TOO_LARGE"),
        IngestError::EmptyFile => (StatusCode::UNPROCESSABLE_ENTITY, "EMPTY_FILE"),
        IngestError::EmptyExtraction(_) => (StatusCode::UNPROCESSABLE_ENTITY, "EMPTY_EXTRACTION"),
        IngestError::ExtractionFailure { .. } => {
            (StatusCode::UNPROCESSABLE_ENTITY, "EXTRACTION_FAILURE")
        }
        IngestError::InvalidFormat(_) => (StatusCode::BAD_REQUEST, "INVALID_FORMAT"),
        IngestError::JsonPassthrough => (StatusCode::BAD_REQUEST, "JSON_PASSTHROUGH"),
    }
}
