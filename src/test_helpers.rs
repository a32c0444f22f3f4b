//! Shared test utilities for the image-triage test suite.
//!
//! Synthetic rasters with known feature values, plus encoders for building
//! upload bodies.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let bytes = encode_png(&DynamicImage::ImageRgb8(ui_mockup()));
//! let (content_type, body) = multipart_body("image", "mockup.png", &bytes);
//! ```

use image::{DynamicImage, GrayImage, ImageFormat, Luma, Rgb, RgbImage};
use std::io::Cursor;

/// Boundary used by [`multipart_body`].
pub const BOUNDARY: &str = "image-triage-test-boundary";

// =========================================================================
// Rasters
// =========================================================================

pub fn solid_rgb(width: u32, height: u32, color: [u8; 3]) -> RgbImage {
    RgbImage::from_pixel(width, height, Rgb(color))
}

/// Square checkerboard of `cell`-sized squares alternating `a` and `b`.
pub fn checkerboard_gray(size: u32, cell: u32, a: u8, b: u8) -> GrayImage {
    GrayImage::from_fn(size, size, |x, y| {
        if (x / cell + y / cell) % 2 == 0 {
            Luma([a])
        } else {
            Luma([b])
        }
    })
}

/// A 512×512 gray panel ruled with 1-px vertical dividers every 12 px.
///
/// Already at the canonical size so nothing is resampled. Each divider
/// yields two edge columns and one vertical segment per column, giving
/// noise ≈ 277, edge density ≈ 0.168 and a straight ratio of 1.0: a
/// confident screenshot.
pub fn ui_mockup() -> RgbImage {
    RgbImage::from_fn(512, 512, |x, _| {
        if x % 12 == 6 {
            Rgb([140, 140, 140])
        } else {
            Rgb([200, 200, 200])
        }
    })
}

// =========================================================================
// Encoding
// =========================================================================

pub fn encode_png(img: &DynamicImage) -> Vec<u8> {
    let mut buf = Cursor::new(Vec::new());
    img.write_to(&mut buf, ImageFormat::Png).unwrap();
    buf.into_inner()
}

/// A `multipart/form-data` body with one file field.
///
/// Returns the `Content-Type` header value and the body bytes.
pub fn multipart_body(field: &str, filename: &str, bytes: &[u8]) -> (String, Vec<u8>) {
    let mut body = Vec::new();
    body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
    body.extend_from_slice(
        format!(
            "Content-Disposition: form-data; name=\"{field}\"; filename=\"{filename}\"\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(b"Content-Type: application/octet-stream\r\n\r\n");
    body.extend_from_slice(bytes);
    body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());

    (format!("multipart/form-data; boundary={BOUNDARY}"), body)
}
