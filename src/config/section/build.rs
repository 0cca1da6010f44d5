//! `[build]`, `[blog]` and `[feed]` configuration.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildConfig {
    /// Site output directory; every output path is relative to it.
    pub output: PathBuf,
    /// Strip indentation from XML feed output.
    pub minify: bool,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            output: "dist".into(),
            minify: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BlogConfig {
    /// URL path of the blog index page.
    pub index: String,
    /// JSON manifest of rendered blog items.
    pub manifest: PathBuf,
}

impl Default for BlogConfig {
    fn default() -> Self {
        Self {
            index: "/blog/".into(),
            manifest: ".cache/blog-posts.json".into(),
        }
    }
}

/// Feed output format.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum FeedFormat {
    /// Atom 1.0 (default).
    #[default]
    Atom,
    /// RSS 2.0.
    Rss,
    /// JSON Feed 1.1.
    Json,
}

impl FeedFormat {
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Atom => "atom",
            Self::Rss => "rss",
            Self::Json => "json",
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedConfig {
    pub format: FeedFormat,
    /// Directory (relative to the output dir) holding `feed.<ext>`.
    pub dir: Option<PathBuf>,
}

impl FeedConfig {
    /// Feed path relative to the output directory.
    pub fn path(&self) -> PathBuf {
        self.dir
            .clone()
            .unwrap_or_else(|| PathBuf::from("blog"))
            .join(format!("feed.{}", self.format.extension()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_parse_config;

    #[test]
    fn test_defaults() {
        let config = test_parse_config("");
        assert_eq!(config.build.output, PathBuf::from("dist"));
        assert_eq!(config.blog.index, "/blog/");
        assert_eq!(config.feed.format, FeedFormat::Atom);
        assert_eq!(config.feed.path(), PathBuf::from("blog/feed.atom"));
    }

    #[test]
    fn test_custom_feed() {
        let config = test_parse_config("[feed]\nformat = \"rss\"\ndir = \"news\"");
        assert_eq!(config.feed.path(), PathBuf::from("news/feed.rss"));

        let config = test_parse_config("[feed]\nformat = \"json\"");
        assert_eq!(config.feed.path(), PathBuf::from("blog/feed.json"));
    }
}
