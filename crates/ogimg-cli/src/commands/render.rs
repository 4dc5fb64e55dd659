//! Render command: one card from command-line fields

use anyhow::{Context, Result};
use ogimg::ImageRequest;

use super::{renderer, write_image, Reporter};
use crate::cli::{FontArgs, RenderArgs};

pub async fn run(args: &RenderArgs, font: &FontArgs, report: Reporter) -> Result<()> {
    let renderer = renderer(font, args.on_font_failure)?;

    let mut request = ImageRequest::new(args.title.as_str(), args.description.as_str());
    if let Some(category) = &args.category {
        request = request.with_category(category.as_str());
    }

    report.step(format!("Rendering \"{}\"...", request.title));
    let image = renderer
        .render_og_image(&request)
        .await
        .with_context(|| format!("Failed to render card for \"{}\"", request.title))?;

    write_image(&args.output, &image)?;
    report.saved(&args.output, &image);
    Ok(())
}
