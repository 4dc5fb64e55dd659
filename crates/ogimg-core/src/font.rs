//! The one font every preview image is set in

use std::fmt;

/// Raw font bytes plus the name they are registered under
///
/// Providers check that the bytes parse before handing an asset out.
/// Renderers still parse on demand and fall back to estimates or system
/// faces if they cannot use it.
#[derive(Clone, PartialEq, Eq)]
pub struct FontAsset {
    data: Vec<u8>,
    family: String,
    weight: u16,
}

impl FontAsset {
    pub fn new(data: Vec<u8>, family: impl Into<String>, weight: u16) -> Self {
        Self {
            data,
            family: family.into(),
            weight,
        }
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Family name used in `font-family` references
    pub fn family(&self) -> &str {
        &self.family
    }

    pub fn weight(&self) -> u16 {
        self.weight
    }
}

impl fmt::Debug for FontAsset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FontAsset")
            .field("family", &self.family)
            .field("weight", &self.weight)
            .field("bytes", &self.data.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_omits_font_bytes() {
        let font = FontAsset::new(vec![0; 4096], "Noto Sans KR", 700);
        let debug = format!("{:?}", font);
        assert!(debug.contains("Noto Sans KR"));
        assert!(debug.contains("bytes: 4096"));
    }
}
