//! Derived rasters shared by the feature extractors.
//!
//! Spatial measurements (noise, entropy, edges, lines) run on a canonical
//! 512×512 grayscale raster so that they are comparable across inputs of any
//! resolution. The color-count measurement runs on a 256×256 downsample.
//! Both resizes use bicubic (Catmull-Rom) resampling.

use image::imageops::{self, FilterType};
use image::{GrayImage, Luma, RgbImage};

/// Side length of the grayscale raster used by spatial extractors.
pub const CANONICAL_SIZE: u32 = 512;

/// Side length of the color downsample used for distinct-color counting.
pub const PALETTE_SIZE: u32 = 256;

// BT.601 luma weights in 14-bit fixed point (sum = 1 << 14).
const LUMA_R: u32 = 4899;
const LUMA_G: u32 = 9617;
const LUMA_B: u32 = 1868;
const LUMA_SHIFT: u32 = 14;

/// BT.601 intensity of one RGB pixel, rounded to nearest.
pub fn luma(rgb: [u8; 3]) -> u8 {
    let [r, g, b] = rgb.map(u32::from);
    let weighted = r * LUMA_R + g * LUMA_G + b * LUMA_B + (1 << (LUMA_SHIFT - 1));
    (weighted >> LUMA_SHIFT) as u8
}

/// Convert an RGB raster to single-channel intensity without resizing.
pub fn to_gray(img: &RgbImage) -> GrayImage {
    GrayImage::from_fn(img.width(), img.height(), |x, y| {
        Luma([luma(img.get_pixel(x, y).0)])
    })
}

/// Resize to 512×512, then convert to intensity.
///
/// Color is resampled before conversion, so the result matches converting a
/// resized color image rather than resizing a grayscale one.
pub fn canonical_gray(img: &RgbImage) -> GrayImage {
    let resized = resize_exact(img, CANONICAL_SIZE);
    to_gray(&resized)
}

/// Downsample to 256×256 for distinct-color counting.
pub fn palette_sample(img: &RgbImage) -> RgbImage {
    resize_exact(img, PALETTE_SIZE)
}

fn resize_exact(img: &RgbImage, side: u32) -> RgbImage {
    if img.dimensions() == (side, side) {
        return img.clone();
    }
    imageops::resize(img, side, side, FilterType::CatmullRom)
}
