//! Export module for ogimg
//!
//! Bitmaps leave the pipeline as PNG.

pub mod png;

pub use png::PngExporter;
