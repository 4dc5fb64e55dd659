//! The engine that drives a layout tree through layout, rasterization and export

// this_file: crates/ogimg-core/src/pipeline.rs

use crate::{
    error::{OgError, RenderError, Result},
    layout::LayoutNode,
    traits::{Exporter, Rasterizer, VectorRenderer},
    types::{BitmapData, Canvas, FitTo, RasterImage, VectorImage},
    FontAsset,
};
use std::sync::Arc;

/// Pipeline for preview images: Layout → Rasterize → Export
///
/// Every stage is a pure function of its inputs, and each stage's output is
/// the next stage's entire input. The intermediate steps are public so tests
/// can look at the SVG or the raw bitmap on their own.
///
/// ```ignore
/// use ogimg_core::{Canvas, Pipeline};
///
/// let pipeline = Pipeline::builder()
///     .vector_renderer(Arc::new(SvgLayoutRenderer::new()))
///     .rasterizer(Arc::new(ResvgRasterizer::new()))
///     .exporter(Arc::new(PngExporter::new()))
///     .build()?;
///
/// let png = pipeline.process(&tree, Canvas::OG_IMAGE, Some(&font))?;
/// ```
#[derive(Clone)]
pub struct Pipeline {
    vector_renderer: Arc<dyn VectorRenderer>,
    rasterizer: Arc<dyn Rasterizer>,
    exporter: Arc<dyn Exporter>,
}

impl Pipeline {
    /// Start building a new pipeline
    pub fn builder() -> PipelineBuilder {
        PipelineBuilder::new()
    }

    /// Layout tree to PNG bytes, output fitted to the canvas width
    pub fn process(
        &self,
        tree: &LayoutNode,
        canvas: Canvas,
        font: Option<&FontAsset>,
    ) -> Result<RasterImage> {
        let vector = self.layout(tree, canvas, font)?;
        self.process_vector(&vector, FitTo::Width(canvas.width), font)
    }

    /// Rasterize and export an SVG that did not come from a layout tree
    pub fn process_vector(
        &self,
        vector: &VectorImage,
        fit: FitTo,
        font: Option<&FontAsset>,
    ) -> Result<RasterImage> {
        let bitmap = self.rasterize(vector, fit, font)?;
        let bytes = self.export(&bitmap)?;

        Ok(RasterImage {
            width: bitmap.width,
            height: bitmap.height,
            bytes,
        })
    }

    /// Stage two on its own
    pub fn layout(
        &self,
        tree: &LayoutNode,
        canvas: Canvas,
        font: Option<&FontAsset>,
    ) -> Result<VectorImage> {
        if canvas.width == 0 || canvas.height == 0 {
            return Err(RenderError::InvalidDimensions {
                width: canvas.width,
                height: canvas.height,
            }
            .into());
        }

        log::debug!(
            "Laying out {}x{} canvas with {}",
            canvas.width,
            canvas.height,
            self.vector_renderer.name()
        );
        self.vector_renderer.render(tree, canvas, font)
    }

    /// Stage three on its own
    pub fn rasterize(
        &self,
        vector: &VectorImage,
        fit: FitTo,
        font: Option<&FontAsset>,
    ) -> Result<BitmapData> {
        log::debug!("Rasterizing with {} ({:?})", self.rasterizer.name(), fit);
        self.rasterizer.rasterize(vector, fit, font)
    }

    pub fn export(&self, bitmap: &BitmapData) -> Result<Vec<u8>> {
        log::debug!(
            "Exporting {}x{} bitmap as {}",
            bitmap.width,
            bitmap.height,
            self.exporter.name()
        );
        self.exporter.export(bitmap)
    }

    /// MIME type of what [`Pipeline::process`] returns
    pub fn mime_type(&self) -> &'static str {
        self.exporter.mime_type()
    }
}

/// Build pipelines piece by piece
///
/// All three stages are required; there are no sensible defaults at this
/// level since the implementations live in other crates.
#[derive(Default)]
pub struct PipelineBuilder {
    vector_renderer: Option<Arc<dyn VectorRenderer>>,
    rasterizer: Option<Arc<dyn Rasterizer>>,
    exporter: Option<Arc<dyn Exporter>>,
}

impl PipelineBuilder {
    /// Start with a clean slate
    pub fn new() -> Self {
        Self::default()
    }

    /// Choose who turns trees into SVG
    pub fn vector_renderer(mut self, renderer: Arc<dyn VectorRenderer>) -> Self {
        self.vector_renderer = Some(renderer);
        self
    }

    /// Choose who turns SVG into pixels
    pub fn rasterizer(mut self, rasterizer: Arc<dyn Rasterizer>) -> Self {
        self.rasterizer = Some(rasterizer);
        self
    }

    /// Choose who packages the final output
    pub fn exporter(mut self, exporter: Arc<dyn Exporter>) -> Self {
        self.exporter = Some(exporter);
        self
    }

    /// Create the pipeline, ready to run
    pub fn build(self) -> Result<Pipeline> {
        let vector_renderer = self
            .vector_renderer
            .ok_or_else(|| OgError::Config("No vector renderer configured".into()))?;
        let rasterizer = self
            .rasterizer
            .ok_or_else(|| OgError::Config("No rasterizer configured".into()))?;
        let exporter = self
            .exporter
            .ok_or_else(|| OgError::Config("No exporter configured".into()))?;

        Ok(Pipeline {
            vector_renderer,
            rasterizer,
            exporter,
        })
    }
}
