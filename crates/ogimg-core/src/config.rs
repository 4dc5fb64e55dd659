//! Knobs callers turn: font failure policy, site identity, env overrides
//!
//! # Environment Variables
//!
//! Settings that make sense to change without rebuilding read `OGIMG_*`
//! variables through [`env_var`]:
//!
//! ```bash
//! OGIMG_SITE_NAME=example.dev ./ogimg assets --public-dir public
//! ```

use std::str::FromStr;

/// Prefix shared by every environment override
pub const ENV_PREFIX: &str = "OGIMG_";

/// Read `OGIMG_<name>`, ignoring unset and blank values
pub fn env_var(name: &str) -> Option<String> {
    let key = format!("{}{}", ENV_PREFIX, name);
    match std::env::var(&key) {
        Ok(val) if !val.trim().is_empty() => {
            log::debug!("Using {} from environment", key);
            Some(val.trim().to_string())
        },
        _ => None,
    }
}

/// Read and parse `OGIMG_<name>`; unparsable values are logged and ignored
pub fn env_parse<T: FromStr>(name: &str) -> Option<T> {
    let raw = env_var(name)?;
    match raw.parse() {
        Ok(val) => Some(val),
        Err(_) => {
            log::warn!("Ignoring {}{}={:?}: not a valid value", ENV_PREFIX, name, raw);
            None
        },
    }
}

/// What a caller does when the custom font cannot be loaded
///
/// The per-post route aborts so a broken font never ships silently; the
/// asset script falls back so a flaky network never blocks a build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FontFailurePolicy {
    /// Propagate the font error to the caller
    #[default]
    Abort,
    /// Log it and render with the system sans-serif
    Fallback,
}

impl FontFailurePolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Abort => "abort",
            Self::Fallback => "fallback",
        }
    }
}

impl FromStr for FontFailurePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "abort" => Ok(Self::Abort),
            "fallback" => Ok(Self::Fallback),
            other => Err(format!("unknown font failure policy: {}", other)),
        }
    }
}

/// The words that identify the site on every card
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteIdentity {
    /// Shown on every post card and as the default card's headline
    pub name: String,
    /// Default card, under the headline
    pub tagline: String,
    /// Default card, next to the accent bar
    pub subtitle: String,
}

impl Default for SiteIdentity {
    fn default() -> Self {
        Self {
            name: "nimwver.me".to_string(),
            tagline: "개인 블로그".to_string(),
            subtitle: "작은 블로그".to_string(),
        }
    }
}

impl SiteIdentity {
    /// Defaults with `OGIMG_SITE_NAME`, `OGIMG_SITE_TAGLINE` and
    /// `OGIMG_SITE_SUBTITLE` applied
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            name: env_var("SITE_NAME").unwrap_or(defaults.name),
            tagline: env_var("SITE_TAGLINE").unwrap_or(defaults.tagline),
            subtitle: env_var("SITE_SUBTITLE").unwrap_or(defaults.subtitle),
        }
    }
}
