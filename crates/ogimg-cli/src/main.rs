// this_file: crates/ogimg-cli/src/main.rs

//! ogimg CLI: build-time Open Graph images for the blog.
//!
//! `assets` writes the default card and icons, `render` writes one card,
//! `posts` writes a card for every post in a content directory.

mod cli;
mod commands;
mod content;

use std::process::ExitCode;

use clap::Parser;

use cli::{Cli, Commands};
use commands::Reporter;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logger(cli.verbose, cli.quiet);

    let report = Reporter::new(cli.quiet);
    let result = match &cli.command {
        Commands::Assets(args) => commands::assets::run(args, &cli.font, report).await,
        Commands::Render(args) => commands::render::run(args, &cli.font, report).await,
        Commands::Posts(args) => commands::posts::run(args, &cli.font, report).await,
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {:#}", err);
            ExitCode::FAILURE
        },
    }
}

/// Initialize logging from the verbosity flags; `RUST_LOG` still wins.
fn init_logger(verbose: bool, quiet: bool) {
    let level = if verbose {
        log::LevelFilter::Debug
    } else if quiet {
        log::LevelFilter::Error
    } else {
        log::LevelFilter::Warn
    };

    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();
}
