//! CLI argument definitions using Clap v4

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use ogimg::FontFailurePolicy;

/// ogimg - Open Graph images and icons for the blog
#[derive(Parser, Debug)]
#[command(name = "ogimg")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[command(flatten)]
    pub font: FontArgs,

    /// Show debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Only print errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Write the default card and the icon set into the public directory
    Assets(AssetsArgs),

    /// Render one post card to a file
    #[command(alias = "r")]
    Render(RenderArgs),

    /// Render a card for every post in a content directory
    Posts(PostsArgs),
}

/// Where the font comes from; `OGIMG_FONT_*` variables set the defaults
#[derive(Args, Debug, Default)]
pub struct FontArgs {
    /// Stylesheet URL that references the font binary
    #[arg(long = "font-css-url", global = true)]
    pub css_url: Option<String>,

    /// Give up on the font after this many seconds
    #[arg(long = "font-timeout-secs", global = true)]
    pub timeout_secs: Option<u64>,
}

#[derive(Args, Debug)]
pub struct AssetsArgs {
    /// Directory the site serves as-is
    #[arg(long, default_value = "public")]
    pub public_dir: PathBuf,

    /// What to do when the font cannot be fetched: abort or fallback
    #[arg(long = "on-font-failure", default_value = "fallback")]
    pub on_font_failure: FontFailurePolicy,
}

#[derive(Args, Debug)]
pub struct RenderArgs {
    /// Post title
    #[arg(long)]
    pub title: String,

    /// Post description
    #[arg(long, default_value = "")]
    pub description: String,

    /// Category shown as a badge; omit or leave empty for none
    #[arg(long)]
    pub category: Option<String>,

    /// Output PNG path
    #[arg(short, long, default_value = "og.png")]
    pub output: PathBuf,

    /// What to do when the font cannot be fetched: abort or fallback
    #[arg(long = "on-font-failure", default_value = "abort")]
    pub on_font_failure: FontFailurePolicy,
}

#[derive(Args, Debug)]
pub struct PostsArgs {
    /// Directory of Markdown/MDX posts with frontmatter
    #[arg(long, default_value = "src/content/blog")]
    pub content_dir: PathBuf,

    /// Directory to write `<slug>.png` into
    #[arg(long, default_value = "public/og")]
    pub out: PathBuf,

    /// Cards rendered at the same time
    #[arg(long, default_value_t = 4, value_parser = clap::value_parser!(u16).range(1..))]
    pub concurrency: u16,

    /// What to do when the font cannot be fetched: abort or fallback
    #[arg(long = "on-font-failure", default_value = "abort")]
    pub on_font_failure: FontFailurePolicy,
}
