//! Error types for reading-ai

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use reading_common::api::ErrorResponse;
use thiserror::Error;

/// Generative backend errors
#[derive(Debug, Error)]
pub enum AiError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("API error {0}: {1}")]
    Api(u16, String),

    #[error("No content in model response")]
    EmptyResponse,

    #[error("Parse error: {0}")]
    Parse(String),
}

/// API error type
#[derive(Debug, Error)]
pub enum ApiError {
    /// Invalid request (400)
    #[error("{0}")]
    BadRequest(String),

    /// Backend failure surfaced to the caller (500)
    #[error("{error}: {source}")]
    Backend {
        error: String,
        #[source]
        source: AiError,
    },
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::BadRequest(msg) => {
                (StatusCode::BAD_REQUEST, Json(ErrorResponse::new(msg))).into_response()
            }
            ApiError::Backend { error, source } => {
                tracing::error!(error = %source, "{}", error);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(ErrorResponse::with_details(error, source.to_string())),
                )
                    .into_response()
            }
        }
    }
}

/// Result type for API handlers
pub type ApiResult<T> = Result<T, ApiError>;
