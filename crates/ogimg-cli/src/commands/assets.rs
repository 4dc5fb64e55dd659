//! Assets command: the default card and the icon set

use anyhow::{Context, Result};
use ogimg::{DEFAULT_IMAGE_FILE, ICON_VARIANTS};

use super::{renderer, write_image, Reporter};
use crate::cli::{AssetsArgs, FontArgs};

pub async fn run(args: &AssetsArgs, font: &FontArgs, report: Reporter) -> Result<()> {
    let renderer = renderer(font, args.on_font_failure)?;

    report.step("Loading font...");
    match renderer.fonts().load().await {
        Ok(font) => report.step(format!("✓ Font loaded: {}", font.family())),
        Err(err) => report.step(format!("! Font unavailable ({}), using system fallback", err)),
    }

    report.step(format!("Generating {} (1200×630)...", DEFAULT_IMAGE_FILE));
    let card = renderer
        .render_default_image()
        .await
        .context("Failed to render the default card")?;
    let path = args.public_dir.join(DEFAULT_IMAGE_FILE);
    write_image(&path, &card)?;
    report.saved(&path, &card);

    report.step(format!("Generating {} icons...", ICON_VARIANTS.len()));
    for (variant, icon) in renderer
        .render_icon_set()
        .await
        .context("Failed to render the icon set")?
    {
        let path = args.public_dir.join(variant.file_name);
        write_image(&path, &icon)?;
        report.saved(&path, &icon);
    }

    Ok(())
}
