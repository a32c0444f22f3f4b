//! Image decoding and low-level raster operations, pure Rust.
//!
//! | Operation | Crate / function |
//! |---|---|
//! | **Decode** | `image::ImageReader` with content sniffing |
//! | **Resize** | `image::imageops::resize` with `CatmullRom` |
//! | **Gradients** | `imageproc::gradients` (3×3 Sobel) |
//! | **Edges** | dual-threshold detector in [`edges`] |
//! | **Segments** | probabilistic Hough transform in [`lines`] |
//!
//! The module is split into:
//! - **Loader**: bytes → RGB raster, the only fallible step
//! - **Raster**: fixed-size derivations shared by the extractors
//! - **Edges / Lines**: the structure detectors behind the edge features

pub mod edges;
pub mod lines;
pub mod loader;
pub mod raster;

pub use loader::{LoadError, load_image, supported_formats};
