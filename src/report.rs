//! Result assembly and the JSON shapes returned to callers.
//!
//! ```text
//! success  { "filename", "image_type", "confidence", "reason": [..], "subtype"? }
//! failure  { "error": "Invalid image file" }
//! ```

use crate::classify::{Confidence, Verdict};
use serde::Serialize;

/// Error text returned for any upload that fails to decode.
pub const INVALID_IMAGE: &str = "Invalid image file";

/// The classification verdict as returned to callers.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassificationResult {
    pub image_type: String,
    pub confidence: Confidence,
    pub reason: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subtype: Option<String>,
}

/// Package a cascade verdict.
pub fn assemble(verdict: Verdict) -> ClassificationResult {
    ClassificationResult {
        image_type: verdict.image_type.label().to_string(),
        confidence: verdict.confidence,
        reason: verdict.reasons,
        subtype: verdict.subtype.map(|s| s.label().to_string()),
    }
}

/// Success body of `POST /analyze`.
#[derive(Debug, Clone, Serialize)]
pub struct AnalyzeResponse {
    pub filename: String,
    #[serde(flatten)]
    pub result: ClassificationResult,
}

/// Error body: a single `error` field and nothing else.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn invalid_image() -> Self {
        Self {
            error: INVALID_IMAGE.to_string(),
        }
    }
}
