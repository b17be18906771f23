//! Application error types.

use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use talkback_core::completion::CompletionError;
use talkback_core::relay::ProbeError;
use thiserror::Error;

use crate::models::{ChatFailure, VideoProbeFailure};

/// Convenience alias for handler return types.
pub type AppResult<T> = Result<T, AppError>;

/// Application-level errors with HTTP status mapping.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid request body: {0}")]
    InvalidBody(String),

    #[error("Failed to process request")]
    Completion(#[from] CompletionError),

    #[error("Video provider probe failed")]
    VideoProbe(#[from] ProbeError),
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        match rejection {
            // A body that is not declared as JSON carries no message.
            JsonRejection::MissingJsonContentType(_) => {
                AppError::Validation("Message is required".into())
            }
            other => AppError::InvalidBody(other.body_text()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::Validation(m) => (
                StatusCode::BAD_REQUEST,
                Json(ChatFailure {
                    error: m.clone(),
                    details: serde_json::Value::String(m),
                    success: false,
                }),
            )
                .into_response(),
            AppError::InvalidBody(m) => (
                StatusCode::BAD_REQUEST,
                Json(ChatFailure {
                    error: "Invalid request body".to_string(),
                    details: serde_json::Value::String(m),
                    success: false,
                }),
            )
                .into_response(),
            AppError::Completion(e) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ChatFailure {
                    error: "Failed to process request".to_string(),
                    details: e.details(),
                    success: false,
                }),
            )
                .into_response(),
            AppError::VideoProbe(e) => {
                let error = match &e {
                    ProbeError::Video(v) => v.details(),
                    other => serde_json::Value::String(other.to_string()),
                };
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(VideoProbeFailure {
                        success: false,
                        error,
                    }),
                )
                    .into_response()
            }
        }
    }
}
