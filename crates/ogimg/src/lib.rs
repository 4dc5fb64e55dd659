//! ogimg - Open Graph images for a static blog
//!
//! Every post gets a 1200×630 PNG card with its title, description and
//! category; the site gets a default card and a set of icons. This crate
//! wires the stages together:
//!
//! 1. [`cards`] builds the layout tree for a request
//! 2. `ogimg-render-svg` lays it out and writes SVG
//! 3. `ogimg-render-skia` rasterizes it fitted to the target width
//! 4. `ogimg-export` encodes PNG
//!
//! The font comes from an explicitly shared [`FontProvider`], fetched at
//! most once per process. What happens when that fetch fails is up to the
//! caller's [`FontFailurePolicy`].
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use ogimg::{FontProvider, FontSource, ImageRequest, OgRenderer};
//!
//! # async fn run() -> ogimg::Result<()> {
//! let fonts = Arc::new(FontProvider::new(FontSource::default())?);
//! let renderer = OgRenderer::new(fonts)?;
//!
//! let request = ImageRequest::new("Hello", "First post").with_category("Rust");
//! let png = renderer.render_og_image(&request).await?;
//! assert_eq!((png.width, png.height), (1200, 630));
//! # Ok(())
//! # }
//! ```

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use ogimg_core::types::{FitTo, VectorImage};

pub use ogimg_core::{
    error, traits, Canvas, FontAsset, FontError, FontFailurePolicy, ImageRequest, LayoutNode,
    OgError, Pipeline, RasterImage, RenderError, Result, SiteIdentity,
};
pub use ogimg_fontdb::{FontFetcher, FontProvider, FontSource};

pub mod cards;
pub mod route;

pub use route::{og_image_response, static_paths, OgImageResponse, PostMeta, StaticPath};

/// File written for the default card
pub const DEFAULT_IMAGE_FILE: &str = "og-default.png";

/// One published icon size
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IconVariant {
    pub file_name: &'static str,
    pub size: u32,
}

/// The icons a site publishes, smallest first
pub const ICON_VARIANTS: [IconVariant; 3] = [
    IconVariant {
        file_name: "favicon-16x16.png",
        size: 16,
    },
    IconVariant {
        file_name: "favicon-32x32.png",
        size: 32,
    },
    IconVariant {
        file_name: "apple-touch-icon.png",
        size: 180,
    },
];

/// The standard stage stack: flex layout to SVG, resvg, PNG
pub fn default_pipeline() -> Result<Pipeline> {
    Pipeline::builder()
        .vector_renderer(Arc::new(ogimg_render_svg::SvgLayoutRenderer::new()))
        .rasterizer(Arc::new(ogimg_render_skia::ResvgRasterizer::new()))
        .exporter(Arc::new(ogimg_export::PngExporter::new()))
        .build()
}

/// Renders cards and icons with a shared font
pub struct OgRenderer {
    pipeline: Pipeline,
    fonts: Arc<FontProvider>,
    site: SiteIdentity,
    policy: FontFailurePolicy,
    warned: AtomicBool,
}

impl OgRenderer {
    /// Renderer on the default pipeline that aborts when the font is missing
    pub fn new(fonts: Arc<FontProvider>) -> Result<Self> {
        Ok(Self::with_pipeline(default_pipeline()?, fonts))
    }

    pub fn with_pipeline(pipeline: Pipeline, fonts: Arc<FontProvider>) -> Self {
        Self {
            pipeline,
            fonts,
            site: SiteIdentity::default(),
            policy: FontFailurePolicy::default(),
            warned: AtomicBool::new(false),
        }
    }

    pub fn with_policy(mut self, policy: FontFailurePolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_site(mut self, site: SiteIdentity) -> Self {
        self.site = site;
        self
    }

    pub fn pipeline(&self) -> &Pipeline {
        &self.pipeline
    }

    pub fn fonts(&self) -> &Arc<FontProvider> {
        &self.fonts
    }

    pub fn site(&self) -> &SiteIdentity {
        &self.site
    }

    pub fn policy(&self) -> FontFailurePolicy {
        self.policy
    }

    /// Layout tree for a post, before any rendering
    pub fn post_tree(&self, request: &ImageRequest) -> LayoutNode {
        cards::post_card(request, &self.site)
    }

    /// Card for one post
    pub async fn render_og_image(&self, request: &ImageRequest) -> Result<RasterImage> {
        let font = self.resolve_font().await?;
        log::debug!(
            "Rendering card for {:?} ({} chars, category {:?})",
            request.title,
            request.title.chars().count(),
            request.category()
        );
        self.render_card(self.post_tree(request), font).await
    }

    /// Card that depends on nothing but the site identity
    pub async fn render_default_image(&self) -> Result<RasterImage> {
        let font = self.resolve_font().await?;
        self.render_card(cards::default_card(&self.site), font).await
    }

    /// Site icon fitted to `size` pixels square; no font involved
    pub async fn render_icon(&self, size: u32) -> Result<RasterImage> {
        let pipeline = self.pipeline.clone();
        let icon = VectorImage::new(cards::ICON_GRID, cards::ICON_GRID, cards::ICON_SVG.to_string());
        run_blocking(move || pipeline.process_vector(&icon, FitTo::Width(size), None)).await
    }

    /// Every size in [`ICON_VARIANTS`]
    pub async fn render_icon_set(&self) -> Result<Vec<(IconVariant, RasterImage)>> {
        let mut icons = Vec::with_capacity(ICON_VARIANTS.len());
        for variant in ICON_VARIANTS {
            icons.push((variant, self.render_icon(variant.size).await?));
        }
        Ok(icons)
    }

    async fn render_card(
        &self,
        tree: LayoutNode,
        font: Option<Arc<FontAsset>>,
    ) -> Result<RasterImage> {
        let pipeline = self.pipeline.clone();
        run_blocking(move || pipeline.process(&tree, Canvas::OG_IMAGE, font.as_deref())).await
    }

    /// The provider's font, or `None` when the policy allows going without
    async fn resolve_font(&self) -> Result<Option<Arc<FontAsset>>> {
        match self.fonts.load().await {
            Ok(font) => Ok(Some(font)),
            Err(err) => match self.policy {
                FontFailurePolicy::Abort => Err(err.into()),
                FontFailurePolicy::Fallback => {
                    if !self.warned.swap(true, Ordering::Relaxed) {
                        log::warn!("Font unavailable ({}); using system sans-serif", err);
                    }
                    Ok(None)
                },
            },
        }
    }
}

/// Run CPU-bound rendering off the async reactor
async fn run_blocking<F>(job: F) -> Result<RasterImage>
where
    F: FnOnce() -> Result<RasterImage> + Send + 'static,
{
    tokio::task::spawn_blocking(job)
        .await
        .map_err(|e| RenderError::Task(e.to_string()))?
}

/// Common imports for typical usage
pub mod prelude {
    pub use crate::{
        FontFailurePolicy, FontProvider, FontSource, ImageRequest, OgRenderer, RasterImage,
        SiteIdentity, ICON_VARIANTS,
    };
}
