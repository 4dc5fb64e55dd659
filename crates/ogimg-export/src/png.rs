//! PNG encoding
//!
//! Bitmaps arrive as straight-alpha RGBA8. Encoder settings are fixed, so
//! identical pixels always produce identical bytes.

use image::codecs::png::{CompressionType, FilterType, PngEncoder};
use image::{ExtendedColorType, ImageEncoder};
use ogimg_core::{
    error::{ExportError, Result},
    traits::Exporter,
    types::BitmapData,
};

/// RGBA bitmaps to PNG files
///
/// ```
/// use ogimg_export::PngExporter;
/// use ogimg_core::{traits::Exporter, types::BitmapData};
///
/// let pixel = BitmapData { width: 1, height: 1, data: vec![8, 145, 178, 255] };
/// let png = PngExporter::new().export(&pixel).unwrap();
/// assert_eq!(&png[1..4], b"PNG");
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct PngExporter;

impl PngExporter {
    pub fn new() -> Self {
        Self
    }

    pub fn encode(&self, bitmap: &BitmapData) -> Result<Vec<u8>> {
        let expected = bitmap.expected_len();
        if bitmap.data.len() != expected {
            return Err(ExportError::EncodingFailed(format!(
                "{}x{} RGBA needs {} bytes, got {}",
                bitmap.width,
                bitmap.height,
                expected,
                bitmap.data.len()
            ))
            .into());
        }

        let mut out = Vec::new();
        PngEncoder::new_with_quality(&mut out, CompressionType::Default, FilterType::Adaptive)
            .write_image(
                &bitmap.data,
                bitmap.width,
                bitmap.height,
                ExtendedColorType::Rgba8,
            )
            .map_err(|e| ExportError::EncodingFailed(e.to_string()))?;

        log::debug!(
            "PNG {}x{}: {} bytes from {} raw",
            bitmap.width,
            bitmap.height,
            out.len(),
            expected
        );
        Ok(out)
    }
}

impl Exporter for PngExporter {
    fn name(&self) -> &'static str {
        "png"
    }

    fn export(&self, bitmap: &BitmapData) -> Result<Vec<u8>> {
        self.encode(bitmap)
    }

    fn extension(&self) -> &'static str {
        "png"
    }

    fn mime_type(&self) -> &'static str {
        "image/png"
    }
}
