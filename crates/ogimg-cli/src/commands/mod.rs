//! Subcommand implementations and what they share

use std::fs;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use ogimg::{FontFailurePolicy, FontProvider, FontSource, OgRenderer, RasterImage, SiteIdentity};

use crate::cli::FontArgs;

pub mod assets;
pub mod posts;
pub mod render;

/// Progress lines on stdout, silenced by `--quiet`
#[derive(Debug, Clone, Copy)]
pub struct Reporter {
    quiet: bool,
}

impl Reporter {
    pub fn new(quiet: bool) -> Self {
        Self { quiet }
    }

    pub fn step(&self, message: impl AsRef<str>) {
        if !self.quiet {
            println!("{}", message.as_ref());
        }
    }

    pub fn saved(&self, path: &Path, image: &RasterImage) {
        self.step(format!(
            "✓ Saved {} ({}×{}, {} bytes)",
            path.display(),
            image.width,
            image.height,
            image.len()
        ));
    }
}

/// Font source from the environment with command-line overrides on top
pub fn font_source(args: &FontArgs) -> FontSource {
    let mut source = FontSource::from_env();
    if let Some(url) = &args.css_url {
        source = source.with_stylesheet_url(url.as_str());
    }
    if let Some(secs) = args.timeout_secs {
        source = source.with_timeout(Duration::from_secs(secs));
    }
    source
}

pub fn renderer(args: &FontArgs, policy: FontFailurePolicy) -> Result<OgRenderer> {
    let source = font_source(args);
    log::debug!(
        "Font source {} ({} {}), timeout {:?}, on failure: {}",
        source.stylesheet_url,
        source.family,
        source.weight,
        source.timeout,
        policy.as_str()
    );

    let fonts = FontProvider::new(source).context("Failed to set up the font client")?;
    let renderer = OgRenderer::new(Arc::new(fonts))
        .context("Failed to build the rendering pipeline")?
        .with_site(SiteIdentity::from_env())
        .with_policy(policy);
    Ok(renderer)
}

/// Write an image, creating parent directories as needed
pub fn write_image(path: &Path, image: &RasterImage) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {}", parent.display()))?;
    }
    fs::write(path, &image.bytes).with_context(|| format!("Failed to write {}", path.display()))
}
