//! Pulling the font binary URL out of a web-font stylesheet

use once_cell::sync::Lazy;
use regex::Regex;

#[allow(clippy::expect_used)]
static SRC_URL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"src:\s*url\(([^)]+)\)").expect("static pattern compiles"));

/// First `src: url(...)` reference in the stylesheet
///
/// Only the first `@font-face` block matters: the endpoint is asked for a
/// single family and weight, and legacy clients get one unsplit file.
/// Surrounding quotes are dropped.
pub fn extract_font_url(css: &str) -> Option<String> {
    let captured = SRC_URL.captures(css)?.get(1)?.as_str().trim();
    let url = captured.trim_matches(|c| c == '"' || c == '\'');
    if url.is_empty() {
        None
    } else {
        Some(url.to_string())
    }
}
