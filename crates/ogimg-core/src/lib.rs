//! ogimg Core: three stages from a layout tree to PNG bytes
//!
//! A blog post arrives as a title, a description and maybe a category. It
//! leaves as a 1200×630 PNG that social platforms show next to a shared
//! link. This crate holds the vocabulary every stage speaks.
//!
//! ## The Pipeline
//!
//! 1. **Tree construction** - request fields become a [`LayoutNode`] tree
//! 2. **Vector layout** - the tree is laid out flex-box style and emitted as SVG
//! 3. **Rasterization** - the SVG is fitted to a pixel width and encoded as PNG
//!
//! Stage two and three are pluggable through the traits in [`traits`]; the
//! [`Pipeline`] chains them.
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use ogimg_core::{Canvas, LayoutNode, Pipeline, Style};
//! # use ogimg_core::traits::*;
//! # use ogimg_core::types::*;
//! # use ogimg_core::FontAsset;
//! # struct MyLayout;
//! # impl VectorRenderer for MyLayout {
//! #     fn name(&self) -> &'static str { "test" }
//! #     fn render(&self, _: &LayoutNode, _: Canvas, _: Option<&FontAsset>)
//! #         -> ogimg_core::Result<VectorImage> { unimplemented!() }
//! # }
//! # struct MyRaster;
//! # impl Rasterizer for MyRaster {
//! #     fn name(&self) -> &'static str { "test" }
//! #     fn rasterize(&self, _: &VectorImage, _: FitTo, _: Option<&FontAsset>)
//! #         -> ogimg_core::Result<BitmapData> { unimplemented!() }
//! # }
//! # struct MyPng;
//! # impl Exporter for MyPng {
//! #     fn name(&self) -> &'static str { "test" }
//! #     fn export(&self, _: &BitmapData) -> ogimg_core::Result<Vec<u8>> { unimplemented!() }
//! #     fn extension(&self) -> &'static str { "png" }
//! #     fn mime_type(&self) -> &'static str { "image/png" }
//! # }
//!
//! let pipeline = Pipeline::builder()
//!     .vector_renderer(Arc::new(MyLayout))
//!     .rasterizer(Arc::new(MyRaster))
//!     .exporter(Arc::new(MyPng))
//!     .build()?;
//!
//! let tree = LayoutNode::container(Style::default(), vec![]);
//! let image = pipeline.process(&tree, Canvas::OG_IMAGE, None)?;
//! # Ok::<(), ogimg_core::OgError>(())
//! ```

pub mod config;
pub mod error;
pub mod font;
pub mod layout;
pub mod pipeline;
pub mod traits;

pub use config::{FontFailurePolicy, SiteIdentity};
pub use error::{ExportError, FontError, OgError, RenderError, Result};
pub use font::FontAsset;
pub use layout::{
    Align, Border, Dimension, Edges, FlexDirection, Justify, LayoutNode, NodeKind, Style,
    TextOverflow,
};
pub use pipeline::{Pipeline, PipelineBuilder};
pub use traits::{Exporter, Rasterizer, VectorRenderer};
pub use types::{Canvas, FitTo, RasterImage};

/// The data structures that travel between stages
pub mod types {
    /// Pixel dimensions of a layout canvas
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Canvas {
        pub width: u32,
        pub height: u32,
    }

    impl Canvas {
        /// Open Graph preview size used by every card
        pub const OG_IMAGE: Canvas = Canvas::new(1200, 630);

        pub const fn new(width: u32, height: u32) -> Self {
            Self { width, height }
        }
    }

    /// How the rasterizer sizes its output
    ///
    /// Cards render at their canvas width and icons scale the 32 px source
    /// up or down, so width is the only target.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub enum FitTo {
        /// Scale uniformly so the output is exactly this many pixels wide
        Width(u32),
    }

    /// What the vector stage hands to the rasterizer
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct VectorImage {
        pub width: u32,
        pub height: u32,
        pub svg: String,
    }

    impl VectorImage {
        pub fn new(width: u32, height: u32, svg: String) -> Self {
            Self { width, height, svg }
        }
    }

    /// Straight-alpha RGBA8 pixels, row-major
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct BitmapData {
        pub width: u32,
        pub height: u32,
        pub data: Vec<u8>,
    }

    impl BitmapData {
        /// Bytes a well-formed buffer of these dimensions must hold
        pub fn expected_len(&self) -> usize {
            self.width as usize * self.height as usize * 4
        }
    }

    /// The finished product: encoded bytes plus the size they decode to
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct RasterImage {
        pub width: u32,
        pub height: u32,
        pub bytes: Vec<u8>,
    }

    impl RasterImage {
        pub fn into_bytes(self) -> Vec<u8> {
            self.bytes
        }

        pub fn len(&self) -> usize {
            self.bytes.len()
        }

        pub fn is_empty(&self) -> bool {
            self.bytes.is_empty()
        }
    }
}

/// What callers ask for: the text fields of one post
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ImageRequest {
    pub title: String,
    pub description: String,
    pub category: Option<String>,
}

impl ImageRequest {
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            category: None,
        }
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// The category to badge, if there is one worth showing
    ///
    /// An empty string counts as no category.
    pub fn category(&self) -> Option<&str> {
        self.category.as_deref().filter(|c| !c.is_empty())
    }
}

/// Simple RGBA color that works everywhere
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::rgba(r, g, b, 255)
    }

    /// `0xRRGGBB` as an opaque color
    pub const fn hex(value: u32) -> Self {
        Self::rgb((value >> 16) as u8, (value >> 8) as u8, value as u8)
    }

    /// Same color with a fractional opacity in `0.0..=1.0`
    pub fn with_opacity(self, opacity: f32) -> Self {
        let a = (opacity.clamp(0.0, 1.0) * 255.0).round() as u8;
        Self { a, ..self }
    }

    pub const fn black() -> Self {
        Self::rgb(0, 0, 0)
    }

    pub const fn white() -> Self {
        Self::rgb(255, 255, 255)
    }

    /// Opacity as SVG expects it
    pub fn opacity(&self) -> f32 {
        self.a as f32 / 255.0
    }

    pub fn is_opaque(&self) -> bool {
        self.a == 255
    }

    /// `#rrggbb` without alpha; pair with [`Color::opacity`]
    pub fn to_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// One color stop on a gradient line, offset in `0.0..=1.0`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GradientStop {
    pub offset: f32,
    pub color: Color,
}

/// How a box paints its background
#[derive(Debug, Clone, PartialEq)]
pub enum Fill {
    Solid(Color),
    /// CSS-style linear gradient; 0° points up, 90° points right
    LinearGradient {
        angle: f32,
        stops: Vec<GradientStop>,
    },
}

impl Fill {
    pub fn linear_gradient(angle: f32, stops: &[(f32, Color)]) -> Self {
        Fill::LinearGradient {
            angle,
            stops: stops
                .iter()
                .map(|&(offset, color)| GradientStop { offset, color })
                .collect(),
        }
    }
}

impl From<Color> for Fill {
    fn from(color: Color) -> Self {
        Fill::Solid(color)
    }
}
