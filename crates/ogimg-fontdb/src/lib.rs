//! Where the preview font comes from: remote resolution and the process cache
//!
//! Every card is set in one typeface fetched from a web-font service. The
//! service hands out a stylesheet first; the stylesheet names the binary.
//! Older clients get a plain TrueType file, so the fetch announces itself as
//! a legacy crawler.
//!
//! ## Caching
//!
//! A [`FontProvider`] fetches at most once. The outcome, success or failure,
//! is kept for the provider's lifetime. Bytes that do not parse as a font
//! (an HTML error page, a WOFF2 subset) count as a failure. Callers that arrive while the first
//! fetch is in flight wait for it instead of starting their own.
//!
//! ```rust,no_run
//! use ogimg_fontdb::{FontProvider, FontSource};
//!
//! # async fn demo() -> Result<(), ogimg_core::FontError> {
//! let provider = FontProvider::new(FontSource::from_env())?;
//! let font = provider.load().await?;
//! println!("{} bytes of {}", font.data().len(), font.family());
//! # Ok(())
//! # }
//! ```

use std::sync::Arc;
use std::time::Duration;

use ogimg_core::{config, FontAsset, FontError};
use skrifa::FontRef;
use tokio::sync::OnceCell;

pub mod fetch;
pub mod stylesheet;

pub use fetch::{FontFetcher, HttpFontFetcher};
pub use stylesheet::extract_font_url;

/// Legacy crawler identity; modern browser agents get WOFF2 subsets instead
pub const LEGACY_USER_AGENT: &str =
    "Mozilla/5.0 (compatible; Googlebot/2.1; +http://www.google.com/bot.html)";

/// Upper bound on the whole two-request fetch
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(20);

const DEFAULT_FAMILY: &str = "Noto Sans KR";
const DEFAULT_WEIGHT: u16 = 700;

/// Where and how to fetch the font
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FontSource {
    /// Stylesheet endpoint for one family and weight
    pub stylesheet_url: String,
    pub user_agent: String,
    /// Family name the font registers under; must match the font's own name
    pub family: String,
    pub weight: u16,
    pub timeout: Duration,
}

impl FontSource {
    /// Google Fonts `css2` request for one family at one weight
    pub fn google_fonts(family: &str, weight: u16) -> Self {
        Self {
            stylesheet_url: format!(
                "https://fonts.googleapis.com/css2?family={}:wght@{}",
                family.replace(' ', "+"),
                weight
            ),
            user_agent: LEGACY_USER_AGENT.to_string(),
            family: family.to_string(),
            weight,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Defaults with `OGIMG_FONT_*` overrides applied
    ///
    /// `OGIMG_FONT_FAMILY` and `OGIMG_FONT_WEIGHT` rebuild the stylesheet URL;
    /// `OGIMG_FONT_CSS_URL` replaces it outright.
    pub fn from_env() -> Self {
        let family = config::env_var("FONT_FAMILY").unwrap_or_else(|| DEFAULT_FAMILY.to_string());
        let weight = config::env_parse("FONT_WEIGHT").unwrap_or(DEFAULT_WEIGHT);

        let mut source = Self::google_fonts(&family, weight);
        if let Some(url) = config::env_var("FONT_CSS_URL") {
            source.stylesheet_url = url;
        }
        if let Some(user_agent) = config::env_var("FONT_USER_AGENT") {
            source.user_agent = user_agent;
        }
        if let Some(secs) = config::env_parse::<u64>("FONT_TIMEOUT_SECS") {
            source.timeout = Duration::from_secs(secs);
        }
        source
    }

    pub fn with_stylesheet_url(mut self, url: impl Into<String>) -> Self {
        self.stylesheet_url = url.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

impl Default for FontSource {
    fn default() -> Self {
        Self::google_fonts(DEFAULT_FAMILY, DEFAULT_WEIGHT)
    }
}

type FontOutcome = Result<Arc<FontAsset>, FontError>;

/// The process-wide font handle, passed explicitly to whoever renders
///
/// Build one per process (or per test) and share it behind an `Arc`.
pub struct FontProvider {
    source: FontSource,
    fetcher: Option<Arc<dyn FontFetcher>>,
    outcome: OnceCell<FontOutcome>,
}

impl FontProvider {
    /// Provider that fetches over HTTP on first use
    pub fn new(source: FontSource) -> Result<Self, FontError> {
        let fetcher = HttpFontFetcher::new(source.timeout)?;
        Ok(Self::with_fetcher(source, Arc::new(fetcher)))
    }

    /// Provider backed by any fetcher
    pub fn with_fetcher(source: FontSource, fetcher: Arc<dyn FontFetcher>) -> Self {
        Self {
            source,
            fetcher: Some(fetcher),
            outcome: OnceCell::new(),
        }
    }

    /// Provider that already holds a font and never touches the network
    pub fn preloaded(font: FontAsset) -> Self {
        let source = FontSource {
            family: font.family().to_string(),
            weight: font.weight(),
            ..FontSource::default()
        };
        Self {
            source,
            fetcher: None,
            outcome: OnceCell::new_with(Some(Ok(Arc::new(font)))),
        }
    }

    /// Provider whose fetch already failed
    pub fn unavailable(err: FontError) -> Self {
        Self {
            source: FontSource::default(),
            fetcher: None,
            outcome: OnceCell::new_with(Some(Err(err))),
        }
    }

    pub fn source(&self) -> &FontSource {
        &self.source
    }

    /// Resolve the font, fetching on the first call only
    ///
    /// Concurrent first callers share one fetch. A failed fetch is not
    /// retried; every later call sees the same error.
    pub async fn load(&self) -> Result<Arc<FontAsset>, FontError> {
        self.outcome
            .get_or_init(|| self.fetch_bounded())
            .await
            .clone()
    }

    /// The settled outcome, if the first fetch has finished
    pub fn cached(&self) -> Option<&FontOutcome> {
        self.outcome.get()
    }

    async fn fetch_bounded(&self) -> FontOutcome {
        let timeout = self.source.timeout;
        let outcome = match tokio::time::timeout(timeout, self.fetch()).await {
            Ok(outcome) => outcome,
            Err(_) => Err(FontError::Timeout { after: timeout }),
        };

        if let Err(ref e) = outcome {
            log::debug!("Font fetch failed, caching the failure: {}", e);
        }
        outcome
    }

    async fn fetch(&self) -> FontOutcome {
        let Some(fetcher) = self.fetcher.as_ref() else {
            return Err(FontError::Network {
                url: self.source.stylesheet_url.clone(),
                message: "provider has no fetcher".to_string(),
            });
        };

        let css_url = &self.source.stylesheet_url;
        log::debug!("Fetching font stylesheet from {}", css_url);
        let css = fetcher.fetch_text(css_url, &self.source.user_agent).await?;

        let font_url = extract_font_url(&css).ok_or_else(|| FontError::Resolution {
            url: css_url.clone(),
        })?;

        log::debug!("Fetching font binary from {}", font_url);
        let data = fetcher.fetch_bytes(&font_url).await?;
        check_font(&font_url, &data)?;

        log::info!(
            "Loaded font {} {} ({} bytes)",
            self.source.family,
            self.source.weight,
            data.len()
        );

        Ok(Arc::new(FontAsset::new(
            data,
            self.source.family.clone(),
            self.source.weight,
        )))
    }
}

/// Reject bytes that are not a single TrueType/OpenType face or collection
fn check_font(url: &str, data: &[u8]) -> Result<(), FontError> {
    FontRef::new(data)
        .map(|_| ())
        .map_err(|e| FontError::Invalid {
            url: url.to_string(),
            reason: e.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_source_targets_legacy_truetype() {
        let source = FontSource::default();
        assert_eq!(
            source.stylesheet_url,
            "https://fonts.googleapis.com/css2?family=Noto+Sans+KR:wght@700"
        );
        assert_eq!(source.user_agent, LEGACY_USER_AGENT);
        assert_eq!(source.family, "Noto Sans KR");
        assert_eq!(source.weight, 700);
        assert_eq!(source.timeout, DEFAULT_TIMEOUT);
    }

    #[tokio::test]
    async fn test_preloaded_provider_never_fetches() {
        let font = FontAsset::new(vec![1, 2, 3], "Test Sans", 400);
        let provider = FontProvider::preloaded(font.clone());

        assert!(provider.cached().is_some());
        let loaded = provider.load().await.unwrap();
        assert_eq!(*loaded, font);
        assert_eq!(provider.source().family, "Test Sans");
    }

    #[tokio::test]
    async fn test_unavailable_provider_repeats_its_error() {
        let err = FontError::Timeout {
            after: Duration::from_millis(500),
        };
        let provider = FontProvider::unavailable(err.clone());

        assert_eq!(provider.load().await.unwrap_err(), err);
        assert_eq!(provider.load().await.unwrap_err(), err);
    }

    #[test]
    fn test_html_and_woff2_are_not_fonts() {
        let html = check_font("https://fonts.test/a.ttf", b"<!doctype html><p>quota exceeded");
        assert!(matches!(html, Err(FontError::Invalid { .. })));

        let woff2 = check_font("https://fonts.test/a.woff2", b"wOF2\x00\x01\x00\x00rest");
        assert!(matches!(woff2, Err(FontError::Invalid { .. })));
    }
}
