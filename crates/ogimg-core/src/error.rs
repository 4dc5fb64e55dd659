//! Error types for ogimg

use std::time::Duration;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, OgError>;

/// Main error type for ogimg
#[derive(Debug, Error)]
pub enum OgError {
    #[error("Font loading failed: {0}")]
    Font(#[from] FontError),

    #[error("Rendering failed: {0}")]
    Render(#[from] RenderError),

    #[error("Export failed: {0}")]
    Export(#[from] ExportError),

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Font fetching errors
///
/// Cloneable so a cached failure can be handed to every caller that asks
/// after it happened.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FontError {
    #[error("No font URL found in stylesheet from {url}")]
    Resolution { url: String },

    #[error("Request to {url} failed: {message}")]
    Network { url: String, message: String },

    #[error("Request to {url} returned HTTP {status}")]
    Status { url: String, status: u16 },

    #[error("Font fetch timed out after {after:?}")]
    Timeout { after: Duration },

    #[error("Data from {url} is not a usable font: {reason}")]
    Invalid { url: String, reason: String },
}

/// Layout and rasterization errors
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("Invalid dimensions: {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },

    #[error("Layout failed: {0}")]
    Layout(String),

    #[error("SVG parse failed: {0}")]
    SvgParse(String),

    #[error("Render task failed: {0}")]
    Task(String),
}

/// Export errors
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Encoding failed: {0}")]
    EncodingFailed(String),
}
