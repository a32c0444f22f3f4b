//! Dual-threshold edge detection.
//!
//! Classic Canny without pre-smoothing: 3×3 Sobel gradients, L1 gradient
//! magnitude (`|gx| + |gy|`), non-maximum suppression quantized to four
//! directions, then 8-connected hysteresis from the strong seeds.
//!
//! The output is a binary map: 255 for edge pixels, 0 elsewhere.

use image::{GrayImage, Luma};
use imageproc::gradients::{horizontal_sobel, vertical_sobel};

/// tan(22.5°) in 15-bit fixed point.
const TG22: i64 = 13573;

/// Hysteresis thresholds on the L1 gradient magnitude.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Thresholds {
    pub low: i32,
    pub high: i32,
}

impl Thresholds {
    /// Thresholds used by the classifier's structure measurements.
    pub const STANDARD: Self = Self {
        low: 100,
        high: 200,
    };

    /// Build thresholds, swapping them if given in the wrong order.
    pub fn new(low: i32, high: i32) -> Self {
        if low > high {
            Self {
                low: high,
                high: low,
            }
        } else {
            Self { low, high }
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Mark {
    None,
    Weak,
    Strong,
}

/// Run the detector over `gray` and return the binary edge map.
pub fn canny(gray: &GrayImage, thresholds: Thresholds) -> GrayImage {
    let (width, height) = gray.dimensions();
    let (w, h) = (width as i64, height as i64);
    let gx = horizontal_sobel(gray);
    let gy = vertical_sobel(gray);

    let n = (width * height) as usize;
    let mut dx = vec![0i32; n];
    let mut dy = vec![0i32; n];
    let mut magnitude = vec![0i32; n];
    for (x, y, p) in gx.enumerate_pixels() {
        let i = (y * width + x) as usize;
        dx[i] = i32::from(p.0[0]);
        dy[i] = i32::from(gy.get_pixel(x, y).0[0]);
        magnitude[i] = dx[i].abs() + dy[i].abs();
    }

    // Outside the raster the magnitude is zero.
    let mag_at = |x: i64, y: i64| -> i32 {
        if x < 0 || y < 0 || x >= w || y >= h {
            0
        } else {
            magnitude[(y * w + x) as usize]
        }
    };

    let mut marks = vec![Mark::None; n];
    let mut stack: Vec<usize> = Vec::new();

    for y in 0..h {
        for x in 0..w {
            let i = (y * w + x) as usize;
            let m = magnitude[i];
            if m <= thresholds.low {
                continue;
            }

            let (sx, sy) = (dx[i], dy[i]);
            let xs = i64::from(sx.abs());
            let ys = i64::from(sy.abs()) << 15;
            let tg22x = xs * TG22;

            let is_peak = if ys < tg22x {
                m > mag_at(x - 1, y) && m >= mag_at(x + 1, y)
            } else {
                let tg67x = tg22x + (xs << 16);
                if ys > tg67x {
                    m > mag_at(x, y - 1) && m >= mag_at(x, y + 1)
                } else {
                    let s = if (sx ^ sy) < 0 { -1 } else { 1 };
                    m > mag_at(x - s, y - 1) && m > mag_at(x + s, y + 1)
                }
            };
            if !is_peak {
                continue;
            }

            if m > thresholds.high {
                marks[i] = Mark::Strong;
                stack.push(i);
            } else {
                marks[i] = Mark::Weak;
            }
        }
    }

    while let Some(i) = stack.pop() {
        let (x, y) = ((i as i64) % w, (i as i64) / w);
        for ny in (y - 1)..=(y + 1) {
            for nx in (x - 1)..=(x + 1) {
                if nx < 0 || ny < 0 || nx >= w || ny >= h {
                    continue;
                }
                let j = (ny * w + nx) as usize;
                if marks[j] == Mark::Weak {
                    marks[j] = Mark::Strong;
                    stack.push(j);
                }
            }
        }
    }

    GrayImage::from_fn(width, height, |x, y| {
        if marks[(y * width + x) as usize] == Mark::Strong {
            Luma([255])
        } else {
            Luma([0])
        }
    })
}

/// Number of edge pixels in a binary map.
pub fn count_edges(edges: &GrayImage) -> usize {
    edges.pixels().filter(|p| p.0[0] > 0).count()
}
