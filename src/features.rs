//! Feature extraction.
//!
//! Every extractor is a pure free function of an explicit raster. The
//! spatial ones take the canonical 512×512 grayscale raster (or the edge map
//! derived from it); the color ones take the RGB raster.
//! [`extract_features`] derives the shared rasters once and always computes
//! the full vector: only the classifier short-circuits.
//!
//! | Feature | Input | Measurement |
//! |---|---|---|
//! | `noise_variance` | gray 512² | population variance of intensity |
//! | `entropy` | gray 512² | Shannon entropy (bits) of the intensity histogram |
//! | `edge_density` | edge map | fraction of edge pixels |
//! | `straight_edge_ratio` | edge map | axis-aligned segments / all segments |
//! | `unique_color_ratio` | RGB 256² | distinct triples / 65536 |
//! | `color_saturation` | RGB, full size | mean HSV saturation (0–255) |

use crate::imaging::edges::{self, Thresholds};
use crate::imaging::lines::{self, HoughParams};
use crate::imaging::raster;
use image::{GrayImage, RgbImage};
use serde::Serialize;
use std::collections::HashSet;

/// Segments whose horizontal or vertical extent is under this many pixels
/// count as axis-aligned.
pub const AXIS_TOLERANCE: i32 = 6;

/// The measurements the classifier decides on.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FeatureVector {
    pub noise_variance: f64,
    pub entropy: f64,
    pub edge_density: f64,
    pub straight_edge_ratio: f64,
    pub unique_color_ratio: f64,
    pub color_saturation: f64,
}

/// Compute every feature for one decoded image.
pub fn extract_features(img: &RgbImage) -> FeatureVector {
    let gray = raster::canonical_gray(img);
    let edge_map = edges::canny(&gray, Thresholds::STANDARD);

    FeatureVector {
        noise_variance: noise_variance(&gray),
        entropy: entropy(&gray),
        edge_density: edge_density(&edge_map),
        straight_edge_ratio: straight_edge_ratio(&edge_map),
        unique_color_ratio: unique_color_ratio(img),
        color_saturation: color_saturation(img),
    }
}

/// Population variance of pixel intensity.
pub fn noise_variance(gray: &GrayImage) -> f64 {
    let n = gray.width() as usize * gray.height() as usize;
    if n == 0 {
        return 0.0;
    }
    let mean = gray.pixels().map(|p| f64::from(p.0[0])).sum::<f64>() / n as f64;
    gray.pixels()
        .map(|p| {
            let d = f64::from(p.0[0]) - mean;
            d * d
        })
        .sum::<f64>()
        / n as f64
}

/// Shannon entropy, in bits, of the intensity histogram.
pub fn entropy(gray: &GrayImage) -> f64 {
    let mut histogram = [0u64; 256];
    for p in gray.pixels() {
        histogram[usize::from(p.0[0])] += 1;
    }
    let total: u64 = histogram.iter().sum();
    if total == 0 {
        return 0.0;
    }
    let total = total as f64;
    histogram
        .iter()
        .filter(|&&count| count > 0)
        .map(|&count| {
            let p = count as f64 / total;
            -p * p.log2()
        })
        .sum::<f64>()
        .max(0.0)
}

/// Fraction of pixels flagged in a binary edge map.
pub fn edge_density(edge_map: &GrayImage) -> f64 {
    let total = u64::from(edge_map.width()) * u64::from(edge_map.height());
    if total == 0 {
        return 0.0;
    }
    edges::count_edges(edge_map) as f64 / total as f64
}

/// Share of detected segments that are nearly horizontal or vertical.
///
/// Defined as 0.0 when no segment is detected.
pub fn straight_edge_ratio(edge_map: &GrayImage) -> f64 {
    let segments = lines::detect_segments(edge_map, &HoughParams::STANDARD);
    if segments.is_empty() {
        return 0.0;
    }
    let aligned = segments
        .iter()
        .filter(|s| s.is_axis_aligned(AXIS_TOLERANCE))
        .count();
    aligned as f64 / segments.len() as f64
}

/// Distinct RGB triples in the 256×256 downsample, over 65536.
pub fn unique_color_ratio(img: &RgbImage) -> f64 {
    let sample = raster::palette_sample(img);
    let distinct: HashSet<[u8; 3]> = sample.pixels().map(|p| p.0).collect();
    let total = f64::from(raster::PALETTE_SIZE * raster::PALETTE_SIZE);
    distinct.len() as f64 / total
}

/// Mean HSV saturation over all pixels, on the 0–255 scale.
pub fn color_saturation(img: &RgbImage) -> f64 {
    let n = img.width() as usize * img.height() as usize;
    if n == 0 {
        return 0.0;
    }
    let sum: u64 = img.pixels().map(|p| u64::from(saturation(p.0))).sum();
    sum as f64 / n as f64
}

/// HSV saturation of one pixel: `255 * (max - min) / max`, rounded.
pub fn saturation(rgb: [u8; 3]) -> u8 {
    let max = u32::from(rgb.into_iter().max().unwrap_or(0));
    let min = u32::from(rgb.into_iter().min().unwrap_or(0));
    if max == 0 {
        return 0;
    }
    ((255 * (max - min) + max / 2) / max) as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{checkerboard_gray, solid_rgb, ui_mockup};
    use image::{Luma, Rgb};

    // =========================================================================
    // Grayscale statistics
    // =========================================================================

    #[test]
    fn variance_of_flat_raster_is_zero() {
        let gray = GrayImage::from_pixel(512, 512, Luma([128]));
        assert_eq!(noise_variance(&gray), 0.0);
    }

    #[test]
    fn variance_of_two_level_raster() {
        // Half 0, half 255: variance = 127.5²
        let gray = checkerboard_gray(64, 8, 0, 255);
        assert!((noise_variance(&gray) - 127.5 * 127.5).abs() < 1e-9);
    }

    #[test]
    fn entropy_of_flat_raster_is_zero() {
        let gray = GrayImage::from_pixel(32, 32, Luma([7]));
        assert_eq!(entropy(&gray), 0.0);
    }

    #[test]
    fn entropy_of_even_split_is_one_bit() {
        let gray = checkerboard_gray(64, 8, 10, 200);
        assert!((entropy(&gray) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn entropy_of_full_ramp_is_eight_bits() {
        let gray = GrayImage::from_fn(256, 4, |x, _| Luma([x as u8]));
        assert!((entropy(&gray) - 8.0).abs() < 1e-12);
    }

    // =========================================================================
    // Edge measurements
    // =========================================================================

    #[test]
    fn edge_density_counts_flagged_pixels() {
        let mut map = GrayImage::from_pixel(10, 10, Luma([0]));
        for x in 0..10 {
            map.put_pixel(x, 3, Luma([255]));
        }
        assert!((edge_density(&map) - 0.1).abs() < 1e-12);
    }

    #[test]
    fn straight_edge_ratio_without_segments_is_zero() {
        let map = GrayImage::from_pixel(512, 512, Luma([0]));
        let ratio = straight_edge_ratio(&map);
        assert_eq!(ratio, 0.0);
        assert!(!ratio.is_nan());
    }

    #[test]
    fn straight_edge_ratio_of_uniform_image_is_zero() {
        let features = extract_features(&solid_rgb(300, 200, [40, 90, 200]));
        assert_eq!(features.straight_edge_ratio, 0.0);
        assert_eq!(features.edge_density, 0.0);
    }

    #[test]
    fn straight_edge_ratio_mixes_aligned_and_diagonal() {
        let mut map = GrayImage::from_pixel(300, 300, Luma([0]));
        for i in 20..280 {
            map.put_pixel(i, 40, Luma([255]));
            map.put_pixel(i, i, Luma([255]));
        }
        // Crossing at (40, 40) can split the lines; count what we get.
        let ratio = straight_edge_ratio(&map);
        assert!(ratio > 0.0 && ratio < 1.0, "ratio = {ratio}");
    }

    // =========================================================================
    // Color measurements
    // =========================================================================

    #[test]
    fn unique_color_ratio_of_solid_image() {
        let ratio = unique_color_ratio(&solid_rgb(640, 480, [12, 34, 56]));
        assert_eq!(ratio, 1.0 / 65536.0);
    }

    #[test]
    fn unique_color_ratio_counts_distinct_triples() {
        let img = RgbImage::from_fn(256, 256, |x, y| Rgb([x as u8, y as u8, 0]));
        assert_eq!(unique_color_ratio(&img), 1.0);
    }

    #[test]
    fn saturation_of_grayscale_image_is_zero() {
        let img = RgbImage::from_fn(50, 50, |x, y| {
            let v = ((x * 5 + y) % 256) as u8;
            Rgb([v, v, v])
        });
        assert_eq!(color_saturation(&img), 0.0);
    }

    #[test]
    fn saturation_of_pure_hues_is_full() {
        assert_eq!(saturation([255, 0, 0]), 255);
        assert_eq!(saturation([0, 10, 0]), 255);
        assert_eq!(color_saturation(&solid_rgb(9, 9, [0, 0, 200])), 255.0);
    }

    #[test]
    fn saturation_rounds_to_nearest() {
        // 255 * 100 / 200 = 127.5 → 128
        assert_eq!(saturation([200, 100, 150]), 128);
        assert_eq!(saturation([0, 0, 0]), 0);
    }

    // =========================================================================
    // Full vector
    // =========================================================================

    #[test]
    fn extraction_is_deterministic() {
        let img = ui_mockup();
        assert_eq!(extract_features(&img), extract_features(&img));
    }

    #[test]
    fn features_stay_in_range() {
        let img = RgbImage::from_fn(97, 61, |x, y| {
            Rgb([(x * 13 % 256) as u8, (y * 29 % 256) as u8, ((x ^ y) % 256) as u8])
        });
        let f = extract_features(&img);
        assert!(f.noise_variance >= 0.0);
        assert!((0.0..=8.0).contains(&f.entropy));
        assert!((0.0..=1.0).contains(&f.edge_density));
        assert!((0.0..=1.0).contains(&f.straight_edge_ratio));
        assert!((0.0..=1.0).contains(&f.unique_color_ratio));
        assert!((0.0..=255.0).contains(&f.color_saturation));
    }

    #[test]
    fn ui_mockup_features_are_structural() {
        let f = extract_features(&ui_mockup());
        assert!(f.straight_edge_ratio > 0.55, "{f:?}");
        assert!(f.edge_density > 0.14, "{f:?}");
        assert!(f.noise_variance < 300.0, "{f:?}");
    }
}
