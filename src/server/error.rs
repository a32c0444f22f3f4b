//! HTTP error mapping.
//!
//! Undecodable images are not errors at this layer: they are answered with a
//! normal `200` carrying `{"error": "Invalid image file"}`. What lands here
//! is a malformed request or a failure inside the server itself.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use std::net::SocketAddr;
use thiserror::Error;

use crate::report::ErrorResponse;

/// Request-level failures with HTTP status mapping.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request is not a usable multipart upload.
    #[error("Unprocessable request: {0}")]
    Unprocessable(String),
    #[error("Internal error: {0}")]
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error) = match self {
            ApiError::Unprocessable(detail) => (StatusCode::UNPROCESSABLE_ENTITY, detail),
            ApiError::Internal(detail) => {
                tracing::error!(detail, "Analysis task failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal error".to_string(),
                )
            }
        };
        (status, Json(ErrorResponse { error })).into_response()
    }
}

/// Failures starting or running the listener.
#[derive(Debug, Error)]
pub enum ServeError {
    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        source: std::io::Error,
    },
    #[error("server error: {0}")]
    Io(#[from] std::io::Error),
}
