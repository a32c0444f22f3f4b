//! Request handlers.

use axum::Json;
use axum::extract::Multipart;
use axum::extract::multipart::MultipartRejection;
use axum::response::{IntoResponse, Response};

use super::error::ApiError;
use crate::pipeline;
use crate::report::{AnalyzeResponse, ErrorResponse};

/// Name of the multipart field carrying the image.
pub const IMAGE_FIELD: &str = "image";

/// One uploaded file, fully buffered.
#[derive(Debug)]
struct Upload {
    filename: String,
    bytes: Vec<u8>,
}

/// `POST /analyze`
///
/// Decodes the `image` field and classifies it. An image that fails to
/// decode is answered with `200` and an `error` body, never a 4xx.
pub async fn analyze(
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Response, ApiError> {
    let mut multipart = multipart.map_err(|e| ApiError::Unprocessable(e.body_text()))?;
    let Upload { filename, bytes } = read_upload(&mut multipart).await?;
    let size = bytes.len();

    let outcome = tokio::task::spawn_blocking(move || pipeline::analyze(&bytes))
        .await
        .map_err(|e| ApiError::Internal(e.to_string()))?;

    match outcome {
        Ok(analysis) => Ok(Json(AnalyzeResponse {
            filename,
            result: analysis.result,
        })
        .into_response()),
        Err(e) => {
            tracing::warn!(filename = %filename, size, error = %e, "Rejected upload");
            Ok(Json(ErrorResponse::invalid_image()).into_response())
        }
    }
}

/// `GET /health`
pub async fn health() -> &'static str {
    "ok"
}

/// Pull the first `image` field out of the body. Other fields are skipped.
async fn read_upload(multipart: &mut Multipart) -> Result<Upload, ApiError> {
    loop {
        let field = multipart
            .next_field()
            .await
            .map_err(|e| ApiError::Unprocessable(e.body_text()))?;
        let Some(field) = field else {
            return Err(ApiError::Unprocessable(format!(
                "Missing required field: {IMAGE_FIELD}"
            )));
        };
        if field.name() != Some(IMAGE_FIELD) {
            continue;
        }

        let filename = field.file_name().unwrap_or_default().to_string();
        let bytes = field
            .bytes()
            .await
            .map_err(|e| ApiError::Unprocessable(e.body_text()))?;
        return Ok(Upload {
            filename,
            bytes: bytes.to_vec(),
        });
    }
}
