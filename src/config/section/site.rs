//! `[site]` and `[package]` configuration.
//!
//! Site-wide metadata used for canonical URLs and feed-level fields.

use crate::config::{ConfigDiagnostics, util::split_site_url};
use serde::{Deserialize, Serialize};

/// Default WebSub hub advertised by feeds.
pub const DEFAULT_HUB: &str = "https://pubsubhubbub.appspot.com/";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteInfoConfig {
    /// Deployed site URL including base path (e.g. "https://example.com/docs/").
    pub url: String,
    pub title: String,
    pub description: String,
    /// Language code (e.g. "en", "zh-Hans").
    pub language: String,
    /// Favicon path or URL.
    pub favicon: Option<String>,
    /// Site logo path or URL, used as the feed image.
    pub image: Option<String>,
    /// Copyright notice; derived from the package author when unset.
    pub copyright: Option<String>,
    /// WebSub hub endpoint.
    pub hub: String,
}

impl Default for SiteInfoConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            title: String::new(),
            description: String::new(),
            language: "en".into(),
            favicon: None,
            image: None,
            copyright: None,
            hub: DEFAULT_HUB.into(),
        }
    }
}

impl SiteInfoConfig {
    /// Scheme and host of the site URL, without trailing slash.
    pub fn hostname(&self) -> String {
        split_site_url(&self.url)
            .map(|(origin, _)| origin)
            .unwrap_or_else(|| self.url.trim_end_matches('/').to_string())
    }

    /// Base path of the site URL, always `/`-delimited.
    pub fn base(&self) -> String {
        split_site_url(&self.url)
            .map(|(_, base)| base)
            .unwrap_or_else(|| "/".into())
    }

    /// Absolute URL for a site-relative path.
    ///
    /// Paths that are already absolute URLs are returned unchanged.
    pub fn canonical_url(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            return path.to_string();
        }
        format!(
            "{}{}{}",
            self.hostname(),
            self.base(),
            path.trim_start_matches('/')
        )
    }

    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        match split_site_url(&self.url) {
            Some((origin, _)) if origin.starts_with("http") => {}
            _ => diag.error_with_hint(
                "site.url",
                format!("`{}` is not an absolute http(s) URL", self.url),
                "set site.url or pass --site-url, e.g. https://example.com/docs/",
            ),
        }
        if self.title.is_empty() {
            diag.error("site.title", "site title is required for feed generation");
        }
    }
}

// ============================================================================
// [package]
// ============================================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PackageConfig {
    pub name: String,
    pub version: String,
    /// Funding URL, advertised as a `payment` link.
    pub funding: Option<String>,
    pub author: PackageAuthor,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PackageAuthor {
    pub name: String,
    pub email: Option<String>,
    pub url: Option<String>,
}

impl PackageConfig {
    /// Feed generator string, e.g. "my-docs 1.2.0".
    pub fn generator(&self) -> String {
        match (self.name.is_empty(), self.version.is_empty()) {
            (true, _) => format!("{} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION")),
            (false, true) => self.name.clone(),
            (false, false) => format!("{} {}", self.name, self.version),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_parse_config;

    fn site(url: &str) -> SiteInfoConfig {
        SiteInfoConfig {
            url: url.into(),
            title: "Docs".into(),
            ..Default::default()
        }
    }

    #[test]
    fn test_defaults() {
        let config = test_parse_config("");
        assert_eq!(config.site.language, "en");
        assert_eq!(config.site.hub, DEFAULT_HUB);
        assert!(config.site.copyright.is_none());
    }

    #[test]
    fn test_canonical_url_with_base() {
        let site = site("https://example.com/docs/");
        assert_eq!(site.canonical_url("/blog/a"), "https://example.com/docs/blog/a");
        assert_eq!(site.canonical_url(""), "https://example.com/docs/");
    }

    #[test]
    fn test_canonical_url_root() {
        let site = site("https://example.com");
        assert_eq!(site.canonical_url("/blog/"), "https://example.com/blog/");
        assert_eq!(
            site.canonical_url("https://cdn.example.com/x.png"),
            "https://cdn.example.com/x.png"
        );
    }

    #[test]
    fn test_validate_url() {
        let mut diag = ConfigDiagnostics::new();
        site("example.com").validate(&mut diag);
        assert_eq!(diag.errors()[0].field, "site.url");

        let mut diag = ConfigDiagnostics::new();
        site("https://example.com").validate(&mut diag);
        assert!(diag.is_empty());
    }

    #[test]
    fn test_generator() {
        let mut package = PackageConfig::default();
        assert!(package.generator().starts_with("tola-postbuild "));

        package.name = "my-docs".into();
        assert_eq!(package.generator(), "my-docs");

        package.version = "1.2.0".into();
        assert_eq!(package.generator(), "my-docs 1.2.0");
    }

    #[test]
    fn test_package_author() {
        let config = test_parse_config(
            "[package]\nname = \"docs\"\n[package.author]\nname = \"Ada\"\nemail = \"ada@example.com\"",
        );
        assert_eq!(config.package.author.name, "Ada");
        assert_eq!(config.package.author.email.as_deref(), Some("ada@example.com"));
    }
}
