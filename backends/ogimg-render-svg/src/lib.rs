//! SVG Renderer: where layout trees become scalable vector documents
//!
//! The second stage of the pipeline. A [`LayoutNode`] tree goes in, a
//! complete SVG document comes out, with every box already positioned.
//!
//! ## How it works
//!
//! 1. Picks text metrics: the custom font's own advances when it parses,
//!    estimates otherwise ([`measure`])
//! 2. Solves the flex-box layout with taffy ([`flex`])
//! 3. Writes each placed node as SVG: backgrounds and borders as `rect`s,
//!    text as single-line `text` elements, labeled nodes wrapped in `<g id>`
//!
//! Text stays text. The rasterizer turns it into outlines using the same
//! font, so the family named here must be the family the font registers.

use std::fmt::{self, Write as FmtWrite};

use ogimg_core::{
    error::{RenderError, Result},
    traits::VectorRenderer,
    types::{Canvas, VectorImage},
    Color, Fill, FontAsset, LayoutNode, NodeKind,
};

pub mod flex;
pub mod measure;

pub use flex::{layout, Placed, PlacedText, Rect};
pub use measure::{metrics_for, EstimatedMetrics, FontMetrics, TextMeasure};

/// Generic family used when no custom font is available
pub const FALLBACK_FAMILY: &str = "sans-serif";

/// Lays out trees and writes them as SVG
#[derive(Debug, Clone, Copy, Default)]
pub struct SvgLayoutRenderer;

impl SvgLayoutRenderer {
    pub fn new() -> Self {
        Self
    }

    fn font_family(&self, font: Option<&FontAsset>) -> String {
        match font {
            Some(font) => format!("'{}', {}", font.family(), FALLBACK_FAMILY),
            None => FALLBACK_FAMILY.to_string(),
        }
    }
}

impl VectorRenderer for SvgLayoutRenderer {
    fn name(&self) -> &'static str {
        "svg-layout"
    }

    fn render(
        &self,
        tree: &LayoutNode,
        canvas: Canvas,
        font: Option<&FontAsset>,
    ) -> Result<VectorImage> {
        let measure = metrics_for(font);
        let placed = flex::layout(
            tree,
            canvas.width as f32,
            canvas.height as f32,
            measure.as_ref(),
        )
        .map_err(|e| RenderError::Layout(e.to_string()))?;

        let mut writer = SvgWriter::new(self.font_family(font));
        writer
            .node(&placed)
            .map_err(|_| RenderError::Layout("failed to write SVG".into()))?;
        let svg = writer
            .finish(canvas)
            .map_err(|_| RenderError::Layout("failed to write SVG".into()))?;

        log::debug!(
            "SvgLayoutRenderer: {} nodes into {} bytes of SVG",
            placed.walk().len(),
            svg.len()
        );

        Ok(VectorImage::new(canvas.width, canvas.height, svg))
    }
}

/// Accumulates `<defs>` and the drawing body separately
struct SvgWriter {
    family: String,
    defs: String,
    body: String,
    next_id: u32,
}

impl SvgWriter {
    fn new(family: String) -> Self {
        Self {
            family,
            defs: String::new(),
            body: String::new(),
            next_id: 0,
        }
    }

    fn id(&mut self, prefix: &str) -> String {
        let id = format!("{}{}", prefix, self.next_id);
        self.next_id += 1;
        id
    }

    fn node(&mut self, placed: &Placed<'_>) -> fmt::Result {
        let node = placed.node;
        if let Some(label) = node.label {
            writeln!(self.body, r#"<g id="{}">"#, escape(label))?;
        }

        self.paint_box(placed)?;

        if let Some(text) = &placed.text {
            self.text(node, text)?;
        }

        for child in &placed.children {
            self.node(child)?;
        }

        if node.label.is_some() {
            writeln!(self.body, "</g>")?;
        }
        Ok(())
    }

    fn paint_box(&mut self, placed: &Placed<'_>) -> fmt::Result {
        let style = &placed.node.style;
        let r = placed.rect;
        if r.width <= 0.0 || r.height <= 0.0 {
            return Ok(());
        }

        // Bars without a background still show up as their text color
        let background = match (&style.background, &placed.node.kind) {
            (Some(fill), _) => Some(fill.clone()),
            (None, NodeKind::Bar) => Some(Fill::Solid(style.color)),
            (None, _) => None,
        };

        if let Some(fill) = background {
            let paint = self.paint(&fill)?;
            writeln!(
                self.body,
                r#"<rect x="{}" y="{}" width="{}" height="{}"{} {}/>"#,
                num(r.x),
                num(r.y),
                num(r.width),
                num(r.height),
                corner(style.radius),
                paint
            )?;
        }

        if let Some(border) = style.border.filter(|b| b.width > 0.0) {
            let half = border.width / 2.0;
            writeln!(
                self.body,
                r#"<rect x="{}" y="{}" width="{}" height="{}"{} fill="none" stroke="{}"{} stroke-width="{}"/>"#,
                num(r.x + half),
                num(r.y + half),
                num((r.width - border.width).max(0.0)),
                num((r.height - border.width).max(0.0)),
                corner((style.radius - half).max(0.0)),
                border.color.to_hex(),
                opacity_attr("stroke-opacity", border.color),
                num(border.width)
            )?;
        }
        Ok(())
    }

    /// `fill="..."` attributes, adding a gradient definition when needed
    fn paint(&mut self, fill: &Fill) -> std::result::Result<String, fmt::Error> {
        match fill {
            Fill::Solid(color) => Ok(format!(
                r#"fill="{}"{}"#,
                color.to_hex(),
                opacity_attr("fill-opacity", *color)
            )),
            Fill::LinearGradient { angle, stops } => {
                let id = self.id("gradient");
                let (x1, y1, x2, y2) = gradient_line(*angle);
                writeln!(
                    self.defs,
                    r#"<linearGradient id="{}" x1="{}" y1="{}" x2="{}" y2="{}">"#,
                    id,
                    num(x1),
                    num(y1),
                    num(x2),
                    num(y2)
                )?;
                for stop in stops {
                    writeln!(
                        self.defs,
                        r#"<stop offset="{}" stop-color="{}"{}/>"#,
                        num(stop.offset),
                        stop.color.to_hex(),
                        opacity_attr("stop-opacity", stop.color)
                    )?;
                }
                writeln!(self.defs, "</linearGradient>")?;
                Ok(format!(r#"fill="url(#{})""#, id))
            },
        }
    }

    fn text(&mut self, node: &LayoutNode, text: &PlacedText) -> fmt::Result {
        if text.content.is_empty() {
            return Ok(());
        }
        let style = &node.style;

        let clip = if text.overflows {
            let id = self.id("clip");
            let c = text.clip;
            writeln!(
                self.defs,
                r#"<clipPath id="{}"><rect x="{}" y="{}" width="{}" height="{}"/></clipPath>"#,
                id,
                num(c.x),
                num(c.y),
                num(c.width),
                num(c.height)
            )?;
            format!(r#" clip-path="url(#{})""#, id)
        } else {
            String::new()
        };

        writeln!(
            self.body,
            r#"<text x="{}" y="{}" font-family="{}" font-size="{}" font-weight="{}" fill="{}"{}{} xml:space="preserve">{}</text>"#,
            num(text.x),
            num(text.baseline),
            escape(&self.family),
            num(style.font_size),
            style.font_weight,
            style.color.to_hex(),
            opacity_attr("fill-opacity", style.color),
            clip,
            escape(&text.content)
        )
    }

    fn finish(self, canvas: Canvas) -> std::result::Result<String, fmt::Error> {
        let mut svg = String::with_capacity(self.defs.len() + self.body.len() + 256);
        writeln!(
            svg,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#,
            w = canvas.width,
            h = canvas.height
        )?;
        if !self.defs.is_empty() {
            writeln!(svg, "<defs>")?;
            svg.push_str(&self.defs);
            writeln!(svg, "</defs>")?;
        }
        svg.push_str(&self.body);
        writeln!(svg, "</svg>")?;
        Ok(svg)
    }
}

/// Gradient vector in bounding-box units for a CSS angle
///
/// 0° runs bottom to top, 90° left to right; the vector is stretched so the
/// first and last stops land on the box's corners or edges.
fn gradient_line(angle: f32) -> (f32, f32, f32, f32) {
    let rad = angle.to_radians();
    let (dx, dy) = (rad.sin(), -rad.cos());
    let scale = 1.0 / dx.abs().max(dy.abs()).max(f32::EPSILON);
    let (hx, hy) = (dx * scale / 2.0, dy * scale / 2.0);
    (0.5 - hx, 0.5 - hy, 0.5 + hx, 0.5 + hy)
}

fn corner(radius: f32) -> String {
    if radius > 0.0 {
        format!(r#" rx="{}""#, num(radius))
    } else {
        String::new()
    }
}

fn opacity_attr(name: &str, color: Color) -> String {
    if color.is_opaque() {
        String::new()
    } else {
        format!(r#" {}="{}""#, name, num(color.opacity()))
    }
}

/// Two decimals, trailing zeros dropped
fn num(v: f32) -> String {
    let s = format!("{:.2}", v);
    let s = s.trim_end_matches('0').trim_end_matches('.');
    if s == "-0" {
        "0".to_string()
    } else {
        s.to_string()
    }
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            c => out.push(c),
        }
    }
    out
}
