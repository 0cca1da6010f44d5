//! Site configuration management for `tola-postbuild.toml`.
//!
//! # Module Structure
//!
//! ```text
//! config/
//! ├── section/       # Configuration section definitions
//! │   ├── build      # [build], [blog], [feed]
//! │   ├── poster     # [poster], [og]
//! │   └── site       # [site], [package]
//! ├── types/         # ConfigError, ConfigDiagnostics
//! └── mod.rs         # SiteConfig (this file)
//! ```
//!
//! # Sections
//!
//! | Section     | Purpose                                              |
//! |-------------|------------------------------------------------------|
//! | `[site]`    | Site URL, title, language, favicon, hub              |
//! | `[package]` | Name/version (feed generator), author, funding       |
//! | `[build]`   | Output directory, XML minification                   |
//! | `[blog]`    | Index path and rendered content manifest             |
//! | `[feed]`    | Feed format and directory                            |
//! | `[poster]`  | Social poster template, fonts, known images, outputs |
//! | `[og]`      | Per-page OG image generation                         |

pub mod section;
pub mod types;
mod util;

pub use section::{
    BlogConfig, BuildConfig, CategoryRule, FeedConfig, FeedFormat, KnownImage, OgConfig,
    PackageConfig, PosterConfig, SiteInfoConfig,
};
pub use types::{ConfigDiagnostics, ConfigError};

use crate::{cli::Cli, log};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};
use util::{find_config_file, resolve_path};

// ============================================================================
// root configuration
// ============================================================================

/// Root configuration structure representing tola-postbuild.toml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SiteConfig {
    /// Absolute path to the config file (internal use only)
    #[serde(skip)]
    pub config_path: PathBuf,

    /// Project root directory - parent of config file (internal use only)
    #[serde(skip)]
    pub root: PathBuf,

    #[serde(default)]
    pub site: SiteInfoConfig,

    #[serde(default)]
    pub package: PackageConfig,

    #[serde(default)]
    pub build: BuildConfig,

    #[serde(default)]
    pub blog: BlogConfig,

    #[serde(default)]
    pub feed: FeedConfig,

    #[serde(default)]
    pub poster: PosterConfig,

    #[serde(default)]
    pub og: OgConfig,
}

impl SiteConfig {
    /// Load configuration from CLI arguments.
    ///
    /// Searches upward from cwd to find the config file. The project root
    /// is the config file's parent directory.
    pub fn load(cli: &Cli) -> Result<Self> {
        let config_path =
            find_config_file(&cli.config).ok_or_else(|| ConfigError::NotFound(cli.config.clone()))?;

        let mut config = Self::from_path(&config_path)?;
        config.config_path = config_path;
        config.finalize(cli);
        config.validate()?;

        Ok(config)
    }

    /// Load configuration from file path with unknown field detection.
    fn from_path(path: &Path) -> Result<Self> {
        let content =
            fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;

        let (config, ignored) = Self::parse_with_ignored(&content)
            .with_context(|| format!("failed to parse `{}`", path.display()))?;

        if !ignored.is_empty() {
            log!("warning"; "unknown fields in {}, ignoring:", path.display());
            for field in &ignored {
                eprintln!("- {field}");
            }
        }

        Ok(config)
    }

    /// Parse TOML content, collecting any unknown fields.
    fn parse_with_ignored(content: &str) -> Result<(Self, Vec<String>), ConfigError> {
        let mut ignored = Vec::new();
        let deserializer = toml::Deserializer::new(content);
        let config = serde_ignored::deserialize(deserializer, |path: serde_ignored::Path| {
            ignored.push(path.to_string());
        })?;
        Ok((config, ignored))
    }

    /// Apply CLI overrides and resolve paths against the project root.
    fn finalize(&mut self, cli: &Cli) {
        let root = self
            .config_path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();

        if let Some(output) = &cli.output {
            self.build.output = output.clone();
        }
        if let Some(url) = &cli.site_url {
            self.site.url = url.clone();
        }

        self.normalize_paths(&root);
        self.root = root;
    }

    // ========================================================================
    // path normalization
    // ========================================================================

    /// Resolve every input path against `root`.
    ///
    /// Output-relative paths (feed dir, poster outputs, og dir) are kept
    /// relative; they are joined with the output directory at write time.
    fn normalize_paths(&mut self, root: &Path) {
        self.build.output = resolve_path(&self.build.output, root);
        self.blog.manifest = resolve_path(&self.blog.manifest, root);
        self.poster.template = resolve_path(&self.poster.template, root);
        self.poster.font_dir = resolve_path(&self.poster.font_dir, root);
        for image in &mut self.poster.images {
            image.path = resolve_path(&image.path, root);
        }
        self.og.template = resolve_path(&self.og.template, root);
    }

    /// Absolute paths of the configured font files.
    pub fn font_paths(&self) -> Vec<PathBuf> {
        self.poster
            .fonts
            .iter()
            .map(|name| self.poster.font_dir.join(name))
            .collect()
    }

    pub fn output_dir(&self) -> &Path {
        &self.build.output
    }

    // ========================================================================
    // validation
    // ========================================================================

    /// Validate configuration, collecting all errors before failing.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut diag = ConfigDiagnostics::new();

        self.site.validate(&mut diag);
        if self.poster.enable {
            self.poster.validate(&mut diag);
        }
        self.og.validate(&mut diag);

        if !self.blog.index.starts_with('/') {
            diag.error_with_hint(
                "blog.index",
                format!("`{}` is not a site path", self.blog.index),
                "use an absolute site path such as /blog/",
            );
        }

        diag.into_result()
    }
}

// ============================================================================
// Test Helpers (available to all modules via `use crate::config::test_*`)
// ============================================================================

/// Parse config with minimal required `[site]` fields.
/// Panics if there are unknown fields (to catch config typos in tests).
#[cfg(test)]
pub fn test_parse_config(extra: &str) -> SiteConfig {
    let config = format!(
        "[site]\nurl = \"https://example.com\"\ntitle = \"Test\"\ndescription = \"Test\"\n{extra}"
    );
    let (parsed, ignored) = SiteConfig::parse_with_ignored(&config).unwrap();
    assert!(
        ignored.is_empty(),
        "test config has unknown fields: {:?}",
        ignored
    );
    parsed
}

// ============================================================================
// tests
// ============================================================================
