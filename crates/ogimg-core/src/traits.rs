//! The contracts that bind every stage together
//!
//! Three traits, one per step after tree construction. Each can be swapped
//! without touching the templates that build trees.
//!
//! - [`VectorRenderer`] - Where a layout tree becomes SVG
//! - [`Rasterizer`] - Where SVG becomes pixels
//! - [`Exporter`] - Where pixels become file bytes

use crate::{
    error::Result,
    layout::LayoutNode,
    types::{BitmapData, Canvas, FitTo, VectorImage},
    FontAsset,
};

/// Lays out a tree and writes it down as a vector image
///
/// `font` is the custom typeface when one loaded; `None` means text is set
/// in the generic system sans-serif.
pub trait VectorRenderer: Send + Sync {
    /// Identify yourself in logs and error messages
    fn name(&self) -> &'static str;

    fn render(
        &self,
        tree: &LayoutNode,
        canvas: Canvas,
        font: Option<&FontAsset>,
    ) -> Result<VectorImage>;
}

/// Turns a vector image into straight-alpha RGBA pixels
///
/// The rasterizer needs the same font the vector stage referenced, since
/// text stays text until pixels are drawn.
pub trait Rasterizer: Send + Sync {
    fn name(&self) -> &'static str;

    fn rasterize(
        &self,
        image: &VectorImage,
        fit: FitTo,
        font: Option<&FontAsset>,
    ) -> Result<BitmapData>;
}

/// The final step: pixels become files
pub trait Exporter: Send + Sync {
    /// Who are you?
    fn name(&self) -> &'static str;

    /// Encode the bitmap as bytes
    fn export(&self, bitmap: &BitmapData) -> Result<Vec<u8>>;

    /// What file extension should be used?
    fn extension(&self) -> &'static str;

    /// What MIME type identifies your format?
    fn mime_type(&self) -> &'static str;
}
