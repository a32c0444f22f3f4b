//! Byte buffer → RGB raster.
//!
//! The upload is attacker-controlled, so the format is sniffed from the
//! content's magic bytes and never from the client-supplied filename.
//! Every successfully decoded image is normalized to 8-bit RGB: palette and
//! grayscale sources are expanded, 16-bit sources are narrowed, and alpha is
//! dropped (not blended against a background).

use image::{ImageFormat, ImageReader, RgbImage};
use std::io::Cursor;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LoadError {
    /// The bytes are empty, of an unknown format, or corrupt.
    #[error("Invalid image: {0}")]
    InvalidImage(String),
}

/// Formats with decoders compiled into this binary.
const DECODABLE: &[ImageFormat] = &[
    ImageFormat::Jpeg,
    ImageFormat::Png,
    ImageFormat::Gif,
    ImageFormat::Bmp,
    ImageFormat::Tiff,
    ImageFormat::WebP,
];

/// Returns the formats `load_image` can decode.
pub fn supported_formats() -> impl Iterator<Item = ImageFormat> {
    DECODABLE.iter().copied().filter(|f| f.reading_enabled())
}

/// Decode `bytes` into an RGB raster.
pub fn load_image(bytes: &[u8]) -> Result<RgbImage, LoadError> {
    if bytes.is_empty() {
        return Err(LoadError::InvalidImage("empty payload".into()));
    }

    let reader = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|e| LoadError::InvalidImage(format!("unreadable payload: {e}")))?;

    match reader.format() {
        Some(format) if DECODABLE.contains(&format) => {}
        Some(format) => {
            return Err(LoadError::InvalidImage(format!(
                "unsupported format {format:?}"
            )));
        }
        None => return Err(LoadError::InvalidImage("unrecognized format".into())),
    }

    let decoded = reader
        .decode()
        .map_err(|e| LoadError::InvalidImage(format!("decode failed: {e}")))?;

    if decoded.width() == 0 || decoded.height() == 0 {
        return Err(LoadError::InvalidImage("zero-sized image".into()));
    }

    Ok(decoded.into_rgb8())
}
