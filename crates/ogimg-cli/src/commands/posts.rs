//! Posts command: one card per post, rendered concurrently

use std::path::PathBuf;

use anyhow::{Context, Result};
use futures::stream::{self, StreamExt};
use ogimg::{static_paths, StaticPath};

use super::{renderer, write_image, Reporter};
use crate::cli::{FontArgs, PostsArgs};
use crate::content;

pub async fn run(args: &PostsArgs, font: &FontArgs, report: Reporter) -> Result<()> {
    let posts = content::load_posts(&args.content_dir)?;
    if posts.is_empty() {
        report.step(format!("No posts under {}", args.content_dir.display()));
        return Ok(());
    }

    let renderer = renderer(font, args.on_font_failure)?;
    let paths = static_paths(&posts);
    report.step(format!(
        "Rendering {} cards into {} ({} at a time)...",
        paths.len(),
        args.out.display(),
        args.concurrency
    ));

    let renderer = &renderer;
    let results: Vec<(String, Result<PathBuf>)> = stream::iter(paths)
        .map(|StaticPath { slug, request }| async move {
            let target = args.out.join(format!("{}.png", slug));
            let outcome = async {
                let image = renderer.render_og_image(&request).await?;
                write_image(&target, &image)?;
                report.saved(&target, &image);
                Ok::<_, anyhow::Error>(target)
            }
            .await;
            (slug, outcome)
        })
        .buffer_unordered(usize::from(args.concurrency))
        .collect()
        .await;

    let total = results.len();
    let mut failures = Vec::new();
    for (slug, outcome) in results {
        if let Err(err) = outcome {
            log::error!("{}: {:#}", slug, err);
            failures.push((slug, err));
        }
    }

    let failed = failures.len();
    if let Some((slug, err)) = failures.into_iter().next() {
        return Err(err).with_context(|| {
            format!("{} of {} cards failed, first was post {}", failed, total, slug)
        });
    }

    report.step(format!("✓ {} cards written", total));
    Ok(())
}
