//! How wide a run of text is, with or without a real font
//!
//! Layout only needs advances to size boxes that hug their text (the
//! category badge) and to decide where an ellipsis goes. Nothing here
//! wraps lines or picks font sizes.

use ogimg_core::FontAsset;
use skrifa::instance::{LocationRef, Size};
use skrifa::{FontRef, MetadataProvider};

/// Share of the em box above the baseline when no font says otherwise
const DEFAULT_ASCENT: f32 = 0.88;

/// Horizontal advance of text at a size
pub trait TextMeasure {
    /// Total advance in pixels, no kerning
    fn advance(&self, text: &str, font_size: f32) -> f32;

    /// Baseline distance from the top of the em box, as a share of font size
    fn ascent(&self) -> f32 {
        DEFAULT_ASCENT
    }

    fn char_advance(&self, ch: char, font_size: f32) -> f32 {
        let mut buf = [0u8; 4];
        self.advance(ch.encode_utf8(&mut buf), font_size)
    }
}

/// Rough advances for when the font is unknown
///
/// Latin letters average a bit over half an em; CJK and Hangul are a full
/// em wide.
#[derive(Debug, Clone, Copy, Default)]
pub struct EstimatedMetrics;

impl EstimatedMetrics {
    pub fn char_em(ch: char) -> f32 {
        match ch {
            ' ' => 0.26,
            c if c.is_ascii() => 0.56,
            c if is_wide(c) => 1.0,
            _ => 0.6,
        }
    }
}

impl TextMeasure for EstimatedMetrics {
    fn advance(&self, text: &str, font_size: f32) -> f32 {
        text.chars().map(Self::char_em).sum::<f32>() * font_size
    }
}

/// Full-width scripts: Hangul, CJK, kana and fullwidth forms
fn is_wide(ch: char) -> bool {
    matches!(ch as u32,
        0x1100..=0x115F
        | 0x2E80..=0x303E
        | 0x3040..=0xA4CF
        | 0xAC00..=0xD7A3
        | 0xF900..=0xFAFF
        | 0xFE30..=0xFE4F
        | 0xFF00..=0xFF60
        | 0xFFE0..=0xFFE6)
}

/// Advances read from the font's own tables
///
/// Characters the font lacks are estimated, so a partial font still lays
/// out sensibly.
pub struct FontMetrics<'a> {
    font: FontRef<'a>,
    ascent: f32,
}

impl<'a> FontMetrics<'a> {
    /// Parse the asset; `None` when the bytes are not a usable font
    pub fn new(asset: &'a FontAsset) -> Option<Self> {
        let font = FontRef::new(asset.data()).ok()?;
        let metrics = font.metrics(Size::unscaled(), LocationRef::default());
        let upem = metrics.units_per_em as f32;
        let ascent = if upem > 0.0 && metrics.ascent > 0.0 {
            metrics.ascent / upem
        } else {
            DEFAULT_ASCENT
        };

        Some(Self { font, ascent })
    }
}

impl TextMeasure for FontMetrics<'_> {
    fn advance(&self, text: &str, font_size: f32) -> f32 {
        let charmap = self.font.charmap();
        let glyphs = self
            .font
            .glyph_metrics(Size::new(font_size), LocationRef::default());

        text.chars()
            .map(|ch| {
                charmap
                    .map(ch)
                    .and_then(|gid| glyphs.advance_width(gid))
                    .unwrap_or_else(|| EstimatedMetrics::char_em(ch) * font_size)
            })
            .sum()
    }

    fn ascent(&self) -> f32 {
        self.ascent
    }
}

/// Metrics for a render: the font's when it parses, estimates otherwise
pub fn metrics_for(font: Option<&FontAsset>) -> Box<dyn TextMeasure + '_> {
    match font.and_then(FontMetrics::new) {
        Some(metrics) => Box::new(metrics),
        None => {
            if let Some(font) = font {
                log::debug!(
                    "{} did not parse as a font; estimating text advances",
                    font.family()
                );
            }
            Box::new(EstimatedMetrics)
        },
    }
}

/// Cut `text` so it fits `max_width`, marking the cut with `…`
///
/// Text that already fits comes back unchanged.
pub fn truncate_with_ellipsis(
    text: &str,
    max_width: f32,
    font_size: f32,
    measure: &dyn TextMeasure,
) -> String {
    if measure.advance(text, font_size) <= max_width {
        return text.to_string();
    }

    let ellipsis = '…';
    let budget = max_width - measure.char_advance(ellipsis, font_size);
    let mut kept = String::new();
    let mut width = 0.0;
    for ch in text.chars() {
        let w = measure.char_advance(ch, font_size);
        if width + w > budget {
            break;
        }
        kept.push(ch);
        width += w;
    }

    let mut out = kept.trim_end().to_string();
    out.push(ellipsis);
    out
}
