//! Skia Rasterizer - SVG documents to pixels via resvg and tiny-skia
//!
//! The last drawing step before encoding. usvg parses the document and
//! turns its `text` elements into outlines, resvg paints them into a
//! tiny-skia pixmap, and the pixmap comes back as straight-alpha RGBA.
//!
//! ## Fonts
//!
//! When a custom font is passed in and registers, it becomes the
//! `sans-serif` generic, so text falls back to it before any system face.
//! Otherwise text resolves against the host's fonts, with the generic
//! families pointed at a face that is actually installed.

use std::sync::Arc;

use ogimg_core::{
    error::{RenderError, Result},
    traits::Rasterizer,
    types::{BitmapData, FitTo, VectorImage},
    FontAsset,
};
use once_cell::sync::OnceCell;
use tiny_skia::{Pixmap, Transform};
use usvg::fontdb::{Database, Source};

/// Installed families tried, in order, for the generic families
const SANS_SERIF_CANDIDATES: &[&str] = &[
    "Noto Sans KR",
    "Noto Sans CJK KR",
    "Noto Sans",
    "DejaVu Sans",
    "Liberation Sans",
    "Arial",
    "Helvetica",
];

/// Host font faces plus the family standing in for `sans-serif`
struct SystemFonts {
    db: Arc<Database>,
    family: Option<String>,
}

/// resvg-backed rasterizer
pub struct ResvgRasterizer {
    /// Largest output side accepted, to bound pixmap memory
    max_size: u32,
    system_fonts: OnceCell<SystemFonts>,
}

impl ResvgRasterizer {
    pub fn new() -> Self {
        Self {
            max_size: 8192,
            system_fonts: OnceCell::new(),
        }
    }

    /// Host fonts, scanned on first use
    fn system_fonts(&self) -> &SystemFonts {
        self.system_fonts.get_or_init(|| {
            let mut db = Database::new();
            db.load_system_fonts();

            let family = installed_sans_serif(&db);
            match &family {
                Some(family) => {
                    db.set_sans_serif_family(family.as_str());
                    db.set_serif_family(family.as_str());
                    log::debug!("Loaded {} system font faces, sans-serif is {}", db.len(), family);
                },
                None => log::warn!("No system fonts found; text needs a custom font to show"),
            }

            SystemFonts {
                db: Arc::new(db),
                family,
            }
        })
    }

    fn options(&self, font: Option<&FontAsset>) -> usvg::Options<'static> {
        let system = self.system_fonts();
        let mut family = system.family.clone();
        let mut fontdb = system.db.clone();

        if let Some(font) = font {
            let mut db = (*system.db).clone();
            let ids = db.load_font_source(Source::Binary(Arc::new(font.data().to_vec())));
            let registered = ids
                .first()
                .and_then(|id| db.face(*id))
                .and_then(|face| face.families.first())
                .map(|(name, _)| name.clone());

            match registered {
                Some(name) => {
                    db.set_sans_serif_family(name.as_str());
                    db.set_serif_family(name.as_str());
                    family = Some(name);
                    fontdb = Arc::new(db);
                },
                None => log::warn!(
                    "{} did not register as a font face; drawing text with system fonts",
                    font.family()
                ),
            }
        }

        let mut options = usvg::Options::default();
        if let Some(family) = family {
            options.font_family = family;
        }
        options.fontdb = fontdb;
        options
    }
}

/// First candidate the host has, else whatever family comes first
fn installed_sans_serif(db: &Database) -> Option<String> {
    let installed = |name: &str| {
        db.faces()
            .any(|face| face.families.iter().any(|(family, _)| family == name))
    };

    SANS_SERIF_CANDIDATES
        .iter()
        .copied()
        .find(|&name| installed(name))
        .map(str::to_string)
        .or_else(|| {
            db.faces()
                .find_map(|face| face.families.first())
                .map(|(family, _)| family.clone())
        })
}

impl Default for ResvgRasterizer {
    fn default() -> Self {
        Self::new()
    }
}

/// Uniform scale for a document of `width` source pixels
fn scale_for(fit: FitTo, width: f32) -> f32 {
    match fit {
        FitTo::Width(target) if width > 0.0 => target as f32 / width,
        FitTo::Width(_) => 0.0,
    }
}

impl Rasterizer for ResvgRasterizer {
    fn name(&self) -> &'static str {
        "resvg"
    }

    fn rasterize(
        &self,
        vector: &VectorImage,
        fit: FitTo,
        font: Option<&FontAsset>,
    ) -> Result<BitmapData> {
        let options = self.options(font);
        let tree = usvg::Tree::from_str(&vector.svg, &options)
            .map_err(|e| RenderError::SvgParse(e.to_string()))?;

        let size = tree.size();
        let scale = scale_for(fit, size.width());
        let width = (size.width() * scale).round() as u32;
        let height = (size.height() * scale).round() as u32;

        if width > self.max_size || height > self.max_size {
            return Err(RenderError::InvalidDimensions { width, height }.into());
        }
        let mut pixmap =
            Pixmap::new(width, height).ok_or(RenderError::InvalidDimensions { width, height })?;

        resvg::render(&tree, Transform::from_scale(scale, scale), &mut pixmap.as_mut());

        // tiny-skia stores premultiplied alpha; encoders expect straight
        let mut data = Vec::with_capacity((width * height * 4) as usize);
        for pixel in pixmap.pixels() {
            let c = pixel.demultiply();
            data.extend_from_slice(&[c.red(), c.green(), c.blue(), c.alpha()]);
        }

        log::debug!(
            "ResvgRasterizer: {}x{} document at scale {:.3} -> {}x{}",
            size.width(),
            size.height(),
            scale,
            width,
            height
        );

        Ok(BitmapData {
            width,
            height,
            data,
        })
    }
}
