//! Loader → extractors → classifier → assembler.
//!
//! Every call owns its rasters; nothing is shared between calls, so the
//! pipeline can run on any number of threads at once.

use crate::classify::classify;
use crate::features::{FeatureVector, extract_features};
use crate::imaging::{LoadError, load_image};
use crate::report::{ClassificationResult, assemble};
use image::RgbImage;

/// The verdict together with the measurements that produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct Analysis {
    pub features: FeatureVector,
    pub result: ClassificationResult,
}

/// Classify an already-decoded raster.
pub fn analyze_image(img: &RgbImage) -> Analysis {
    let features = extract_features(img);
    tracing::debug!(
        width = img.width(),
        height = img.height(),
        noise_variance = features.noise_variance,
        entropy = features.entropy,
        edge_density = features.edge_density,
        straight_edge_ratio = features.straight_edge_ratio,
        unique_color_ratio = features.unique_color_ratio,
        color_saturation = features.color_saturation,
        "Extracted features"
    );

    let result = assemble(classify(&features));
    tracing::info!(
        image_type = %result.image_type,
        confidence = ?result.confidence,
        "Classified image"
    );

    Analysis { features, result }
}

/// Decode and classify raw upload bytes.
pub fn analyze(bytes: &[u8]) -> Result<Analysis, LoadError> {
    let img = load_image(bytes)?;
    Ok(analyze_image(&img))
}

/// Decode and classify, returning only the verdict.
pub fn classify_bytes(bytes: &[u8]) -> Result<ClassificationResult, LoadError> {
    analyze(bytes).map(|a| a.result)
}
