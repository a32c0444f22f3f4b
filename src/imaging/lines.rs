//! Probabilistic line-segment detection over a binary edge map.
//!
//! Progressive probabilistic Hough transform: edge points are visited in a
//! fixed pseudo-random order, each one votes in a (theta, rho) accumulator,
//! and as soon as a bin crosses the vote threshold the detector walks the
//! corresponding line in both directions, tolerating gaps of up to
//! `max_line_gap` pixels. Walked points are removed from the map (and, for
//! accepted segments, their votes are withdrawn) so each point contributes to
//! at most one segment.
//!
//! The visiting order comes from a multiply-with-carry generator with a fixed
//! seed, so the same edge map always yields the same segments.

use image::GrayImage;
use std::f32::consts::PI;

/// Fixed-point precision used while walking a line.
const SHIFT: i32 = 16;

/// A detected segment with integer pixel endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineSegment {
    pub x1: i32,
    pub y1: i32,
    pub x2: i32,
    pub y2: i32,
}

impl LineSegment {
    /// True when the horizontal or vertical extent is below `tolerance`.
    pub fn is_axis_aligned(&self, tolerance: i32) -> bool {
        (self.x1 - self.x2).abs() < tolerance || (self.y1 - self.y2).abs() < tolerance
    }
}

/// Detector parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HoughParams {
    /// Distance resolution of the accumulator, in pixels.
    pub rho: f32,
    /// Angular resolution of the accumulator, in radians.
    pub theta: f32,
    /// Minimum votes for a line candidate.
    pub threshold: i32,
    /// Segments shorter than this (on both axes) are discarded.
    pub min_line_length: i32,
    /// Largest run of missing pixels bridged while walking a line.
    pub max_line_gap: i32,
}

impl HoughParams {
    /// Parameters used by the straight-edge measurement.
    pub const STANDARD: Self = Self {
        rho: 1.0,
        theta: PI / 180.0,
        threshold: 100,
        min_line_length: 60,
        max_line_gap: 10,
    };
}

/// Multiply-with-carry generator.
struct Mwc(u64);

impl Mwc {
    const COEFF: u64 = 4_164_903_690;

    fn seeded() -> Self {
        Self(u64::MAX)
    }

    fn next_u32(&mut self) -> u32 {
        self.0 = (self.0 & 0xFFFF_FFFF)
            .wrapping_mul(Self::COEFF)
            .wrapping_add(self.0 >> 32);
        self.0 as u32
    }

    /// Uniform in `0..upper`; `upper` must be non-zero.
    fn below(&mut self, upper: usize) -> usize {
        (self.next_u32() % upper as u32) as usize
    }
}

/// Precomputed (theta, rho) geometry for one raster size.
struct Accumulator {
    trig: Vec<(f32, f32)>,
    num_rho: usize,
    rho_offset: i32,
    votes: Vec<i32>,
}

impl Accumulator {
    fn new(width: i32, height: i32, params: &HoughParams) -> Self {
        let irho = 1.0 / params.rho;
        let num_angle = ((PI / params.theta).round() as usize).max(1);
        let num_rho = (((width + height) * 2 + 1) as f32 / params.rho).round() as usize;

        let mut trig = Vec::with_capacity(num_angle);
        let mut angle = 0.0f32;
        for _ in 0..num_angle {
            let a = f64::from(angle);
            trig.push(((a.cos() as f32) * irho, (a.sin() as f32) * irho));
            angle += params.theta;
        }

        Self {
            trig,
            num_rho,
            rho_offset: (num_rho as i32 - 1) / 2,
            votes: vec![0; num_angle * num_rho],
        }
    }

    fn bin(&self, n: usize, x: i32, y: i32) -> usize {
        let (c, s) = self.trig[n];
        let r = (x as f32 * c + y as f32 * s).round_ties_even() as i32 + self.rho_offset;
        n * self.num_rho + r as usize
    }

    /// Add the votes of (x, y); returns the strongest bin above `floor`.
    fn vote(&mut self, x: i32, y: i32, floor: i32) -> (i32, usize) {
        let mut best = (floor, 0);
        for n in 0..self.trig.len() {
            let b = self.bin(n, x, y);
            self.votes[b] += 1;
            if self.votes[b] > best.0 {
                best = (self.votes[b], n);
            }
        }
        best
    }

    fn withdraw(&mut self, x: i32, y: i32) {
        for n in 0..self.trig.len() {
            let b = self.bin(n, x, y);
            self.votes[b] -= 1;
        }
    }
}

/// Fixed-point walk along a line through a seed point.
#[derive(Clone, Copy)]
struct Walk {
    major_x: bool,
    x0: i32,
    y0: i32,
    dx: i32,
    dy: i32,
}

impl Walk {
    fn through(x: i32, y: i32, cos: f32, sin: f32) -> Self {
        // Direction of the line is perpendicular to its normal (cos, sin).
        let a = -sin;
        let b = cos;
        let unit = (1i32 << SHIFT) as f32;
        if a.abs() > b.abs() {
            Self {
                major_x: true,
                x0: x,
                y0: (y << SHIFT) + (1 << (SHIFT - 1)),
                dx: if a > 0.0 { 1 } else { -1 },
                dy: (b * unit / a.abs()).round_ties_even() as i32,
            }
        } else {
            Self {
                major_x: false,
                x0: (x << SHIFT) + (1 << (SHIFT - 1)),
                y0: y,
                dx: (a * unit / b.abs()).round_ties_even() as i32,
                dy: if b > 0.0 { 1 } else { -1 },
            }
        }
    }

    fn reversed(self) -> Self {
        Self {
            dx: -self.dx,
            dy: -self.dy,
            ..self
        }
    }

    fn pixel(&self, x: i32, y: i32) -> (i32, i32) {
        if self.major_x {
            (x, y >> SHIFT)
        } else {
            (x >> SHIFT, y)
        }
    }

    /// Pixel coordinates visited by this walk, in order, unbounded.
    fn pixels(self) -> impl Iterator<Item = (i32, i32)> {
        let mut x = self.x0;
        let mut y = self.y0;
        std::iter::from_fn(move || {
            let p = self.pixel(x, y);
            x += self.dx;
            y += self.dy;
            Some(p)
        })
    }
}

/// Detect line segments in a binary edge map (non-zero pixels are edges).
pub fn detect_segments(edges: &GrayImage, params: &HoughParams) -> Vec<LineSegment> {
    let width = edges.width() as i32;
    let height = edges.height() as i32;
    let inside = |x: i32, y: i32| x >= 0 && y >= 0 && x < width && y < height;
    let index = |x: i32, y: i32| (y * width + x) as usize;

    let mut mask: Vec<bool> = edges.pixels().map(|p| p.0[0] != 0).collect();
    let mut points: Vec<(i32, i32)> = edges
        .enumerate_pixels()
        .filter(|(_, _, p)| p.0[0] != 0)
        .map(|(x, y, _)| (x as i32, y as i32))
        .collect();

    let mut acc = Accumulator::new(width, height, params);
    let mut rng = Mwc::seeded();
    let mut segments = Vec::new();

    let mut remaining = points.len();
    while remaining > 0 {
        let pick = rng.below(remaining);
        let (x, y) = points[pick];
        points[pick] = points[remaining - 1];
        remaining -= 1;

        // Already consumed by an earlier segment.
        if !mask[index(x, y)] {
            continue;
        }

        let (votes, best_n) = acc.vote(x, y, params.threshold - 1);
        if votes < params.threshold {
            continue;
        }

        let (cos, sin) = acc.trig[best_n];
        let forward = Walk::through(x, y, cos, sin);
        let walks = [forward, forward.reversed()];

        let mut ends = [(x, y); 2];
        for (end, walk) in ends.iter_mut().zip(walks) {
            let mut gap = 0;
            for (px, py) in walk.pixels() {
                if !inside(px, py) {
                    break;
                }
                if mask[index(px, py)] {
                    gap = 0;
                    *end = (px, py);
                } else {
                    gap += 1;
                    if gap > params.max_line_gap {
                        break;
                    }
                }
            }
        }

        let accepted = (ends[1].0 - ends[0].0).abs() >= params.min_line_length
            || (ends[1].1 - ends[0].1).abs() >= params.min_line_length;

        for (end, walk) in ends.iter().zip(walks) {
            for (px, py) in walk.pixels() {
                if !inside(px, py) {
                    break;
                }
                let i = index(px, py);
                if mask[i] {
                    if accepted {
                        acc.withdraw(px, py);
                    }
                    mask[i] = false;
                }
                if (px, py) == *end {
                    break;
                }
            }
        }

        if accepted {
            segments.push(LineSegment {
                x1: ends[0].0,
                y1: ends[0].1,
                x2: ends[1].0,
                y2: ends[1].1,
            });
        }
    }

    segments
}
