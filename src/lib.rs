//! # Image Triage
//!
//! Sorts an uploaded image into one of five coarse categories (screenshot,
//! illustration, poster, photographic, unknown) using a handful of
//! hand-tuned measurements and a fixed decision cascade. No model, no
//! training data: six numbers and four ordered rules.
//!
//! # Architecture: Four-Stage Pipeline
//!
//! ```text
//! 1. Load       bytes        →  RGB raster      (decode, any supported format)
//! 2. Extract    RGB raster   →  FeatureVector   (six independent measurements)
//! 3. Classify   features     →  Verdict         (first matching rule wins)
//! 4. Assemble   verdict      →  JSON body       (label, confidence, reasons)
//! ```
//!
//! Only the load stage can fail. Every stage after it is total over decoded
//! rasters of at least 1×1, so any image that decodes gets a verdict.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`imaging`] | Decoding, grayscale and resampling, edge detection, line segment detection |
//! | [`features`] | The six extractors and the [`features::FeatureVector`] they fill |
//! | [`classify`] | The ordered rule table and the photographic subtype refinement |
//! | [`report`] | Result assembly and the JSON response shapes |
//! | [`pipeline`] | Load → extract → classify → assemble for one image |
//! | [`server`] | `POST /analyze` over axum, CORS and request tracing |
//! | [`config`] | Optional `config.toml`: listener address and log filter |
//! | [`output`] | Human-readable report for the `classify` command |
//!
//! # Design Decisions
//!
//! ## Fixed Working Sizes
//!
//! Grayscale measurements run on a 512×512 resample and the color
//! measurements on a 256×256 resample, both ignoring aspect ratio. The
//! thresholds in [`classify`] were tuned against these sizes, so the edge
//! and color ratios are only meaningful at them.
//!
//! ## Rule Order Is the Contract
//!
//! The rule predicates overlap. A flat UI image with few colors satisfies
//! both the screenshot and the illustration rules and is labelled a
//! screenshot because that rule is first. The table in [`classify::CASCADE`]
//! is evaluated top to bottom and must stay in that order.
//!
//! ## Undecodable Input Is Not an HTTP Error
//!
//! An upload that fails to decode gets `200` with
//! `{"error": "Invalid image file"}`. Clients branch on the presence of the
//! `error` key, not on the status code.

pub mod classify;
pub mod config;
pub mod features;
pub mod imaging;
pub mod output;
pub mod pipeline;
pub mod report;
pub mod server;

#[cfg(test)]
pub(crate) mod test_helpers;
