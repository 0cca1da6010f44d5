//! Command-line interface definitions.

use clap::{ColorChoice, Parser};
use std::path::PathBuf;

/// Post-build asset synthesis: social preview images and the blog feed
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Control colored output (auto, always, never)
    #[arg(long, default_value = "auto")]
    pub color: ColorChoice,

    /// Config file path (default: tola-postbuild.toml)
    #[arg(short = 'C', long, default_value = "tola-postbuild.toml", value_hint = clap::ValueHint::FilePath)]
    pub config: PathBuf,

    /// Site output directory (relative to project root)
    #[arg(short, long, value_hint = clap::ValueHint::DirPath)]
    pub output: Option<PathBuf>,

    /// Override site URL for deployment.
    ///
    /// The path component is used as the base path for canonical URLs.
    ///
    /// Example: tola-postbuild --site-url "https://example.github.io/docs/"
    #[arg(short = 'U', long = "site-url", value_hint = clap::ValueHint::Url)]
    pub site_url: Option<String>,

    /// Enable verbose output for debugging
    #[arg(short, long)]
    pub verbose: bool,
}
