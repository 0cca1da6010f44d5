//! tola-postbuild - post-build asset synthesis for static documentation sites.
//!
//! Runs once after the site generator: renders the social poster and its
//! derivatives, optional per-page OG images, and the blog feed.

#![allow(dead_code)]

mod blog;
mod cli;
mod config;
mod core;
mod generator;
mod image;
mod logger;
mod utils;

use anyhow::Result;
use clap::{ColorChoice, Parser};
use cli::Cli;
use config::SiteConfig;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set global color override based on CLI option
    match cli.color {
        ColorChoice::Always => owo_colors::set_override(true),
        ColorChoice::Never => owo_colors::set_override(false),
        ColorChoice::Auto => {} // owo-colors auto-detects TTY
    }
    logger::set_verbose(cli.verbose);

    let config = SiteConfig::load(&cli)?;
    cli::build::build_all(&config).await
}
