//! Format-independent feed model.
//!
//! Every format writer works from the same [`FeedMeta`] and [`FeedEntry`]
//! list, so derivation rules (canonical links, description fallback,
//! author synthesis, category normalization, image lookup) live here once.

use crate::{
    blog::{Author, BlogPost},
    config::SiteConfig,
    core::{BuildError, Result},
    utils::{date::PostDate, html::find_element},
};
use rustc_hash::FxHashMap;

/// `name` attribute value that marks a post's representative image.
///
/// Page heads written by the OG image generator use `property="og:image"`.
/// Lookup here matches on `name` only; posts that carry just the
/// `property` form fall back to the generated image or their cover.
pub const OG_IMAGE_META_NAME: &str = "og:image";

/// Profile URL prefix for author handles.
pub const PROFILE_URL_BASE: &str = "https://github.com/";

/// Domain used to synthesize no-reply emails from author handles.
pub const NOREPLY_EMAIL_DOMAIN: &str = "users.noreply.github.com";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeedAuthor {
    pub name: Option<String>,
    pub link: Option<String>,
    pub email: Option<String>,
}

impl FeedAuthor {
    /// Display name, falling back to the email's local part.
    pub fn display_name(&self) -> String {
        self.name
            .clone()
            .or_else(|| {
                self.email
                    .as_deref()
                    .and_then(|email| email.split('@').next())
                    .map(str::to_owned)
            })
            .unwrap_or_default()
    }
}

/// A post prepared for any feed format.
#[derive(Debug, Clone)]
pub struct FeedEntry {
    /// Canonical absolute URL; used as both id and link.
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    /// Full rendered HTML.
    pub content: Option<String>,
    pub author: Option<FeedAuthor>,
    pub date: PostDate,
    pub image: Option<String>,
    pub categories: Option<Vec<String>>,
}

impl FeedEntry {
    /// Derive an entry from a collected post.
    ///
    /// `generated` maps post URLs to per-page images rendered in this build.
    pub fn from_post(
        post: &BlogPost,
        config: &SiteConfig,
        generated: &FxHashMap<String, String>,
    ) -> Result<Self> {
        let date = post
            .date
            .ok_or_else(|| BuildError::invalid_post(&post.url, "missing date"))?;

        let image = meta_image(post.html.as_deref())
            .or_else(|| generated.get(&post.url).cloned())
            .or_else(|| {
                post.cover
                    .as_deref()
                    .map(|cover| config.site.canonical_url(cover))
            });

        Ok(Self {
            id: config.site.canonical_url(&post.url),
            title: post.title.clone(),
            description: non_empty(post.excerpt.as_deref())
                .or_else(|| non_empty(post.description.as_deref())),
            content: post.html.clone(),
            author: post.author.as_ref().and_then(entry_author),
            date,
            image,
            categories: post.category_terms(),
        })
    }
}

/// Feed-level metadata shared by all formats.
#[derive(Debug, Clone)]
pub struct FeedMeta {
    pub title: String,
    pub description: String,
    /// Canonical blog index URL; feed id and alternate link.
    pub id: String,
    /// Absolute URL of the feed document itself.
    pub self_link: String,
    pub language: String,
    pub image: Option<String>,
    pub favicon: Option<String>,
    pub copyright: Option<String>,
    pub generator: String,
    pub author: Option<FeedAuthor>,
    pub hub: String,
    pub funding: Option<String>,
    /// Most recent entry date, epoch when there are none.
    pub updated: PostDate,
}

impl FeedMeta {
    pub fn new(config: &SiteConfig, entries: &[FeedEntry]) -> Self {
        let site = &config.site;
        let package = &config.package;

        let author = (!package.author.name.is_empty()).then(|| FeedAuthor {
            name: Some(package.author.name.clone()),
            link: package.author.url.clone(),
            email: package.author.email.clone(),
        });

        let copyright = site.copyright.clone().or_else(|| {
            author
                .as_ref()
                .and_then(|a| a.name.as_deref())
                .map(|name| format!("Copyright © {name}"))
        });

        let updated = entries
            .iter()
            .map(|e| e.date)
            .max()
            .unwrap_or_else(PostDate::epoch);

        Self {
            title: site.title.clone(),
            description: site.description.clone(),
            id: site.canonical_url(&config.blog.index),
            self_link: site.canonical_url(&config.feed.path().to_string_lossy()),
            language: site.language.clone(),
            image: site.image.as_deref().map(|i| site.canonical_url(i)),
            favicon: site.favicon.as_deref().map(|f| site.canonical_url(f)),
            copyright,
            generator: package.generator(),
            author,
            hub: site.hub.clone(),
            funding: package.funding.clone(),
            updated,
        }
    }
}

/// Content of the first `<meta name="og:image">` found breadth-first.
pub fn meta_image(html: Option<&str>) -> Option<String> {
    find_element(html, |el| {
        el.tag == "meta" && el.attr("name") == Some(OG_IMAGE_META_NAME)
    })
    .and_then(|el| el.attr("content").map(str::to_owned))
    .filter(|content| !content.is_empty())
}

/// Resolve author link and email from front matter.
///
/// Link: explicit link, else handle profile URL. Email: handle at the
/// no-reply domain, with `(Name)` appended when a name is known.
pub fn entry_author(author: &Author) -> Option<FeedAuthor> {
    let name = non_empty(author.name.as_deref());
    let handle = non_empty(author.handle.as_deref());

    let link = non_empty(author.link.as_deref())
        .or_else(|| handle.as_ref().map(|h| format!("{PROFILE_URL_BASE}{h}")));

    let email = handle.as_ref().map(|h| match &name {
        Some(name) => format!("{h}@{NOREPLY_EMAIL_DOMAIN} ({name})"),
        None => format!("{h}@{NOREPLY_EMAIL_DOMAIN}"),
    });

    if name.is_none() && link.is_none() && email.is_none() {
        return None;
    }
    Some(FeedAuthor { name, link, email })
}

fn non_empty(s: Option<&str>) -> Option<String> {
    s.map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_owned)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::blog::CategoryField;
    use crate::config::test_parse_config;

    pub fn make_config() -> SiteConfig {
        test_parse_config(
            "[package]\nname = \"docs\"\nversion = \"1.0.0\"\n[package.author]\nname = \"Team\"",
        )
    }

    pub fn make_post(url: &str, title: &str, date: &str) -> BlogPost {
        BlogPost {
            url: url.into(),
            title: title.into(),
            date: PostDate::parse(date),
            html: None,
            excerpt: None,
            description: None,
            author: None,
            category: None,
            categories: None,
            cover: None,
        }
    }

    fn entry(post: &BlogPost) -> FeedEntry {
        FeedEntry::from_post(post, &make_config(), &FxHashMap::default()).unwrap()
    }

    #[test]
    fn test_entry_id_is_canonical() {
        let e = entry(&make_post("/blog/a", "A", "2024-01-01"));
        assert_eq!(e.id, "https://example.com/blog/a");
        assert!(e.id.starts_with(&make_config().site.hostname()));
    }

    #[test]
    fn test_description_fallback() {
        let mut post = make_post("/blog/a", "A", "2024-01-01");
        post.description = Some("from front matter".into());
        post.excerpt = Some("   ".into());
        assert_eq!(entry(&post).description.as_deref(), Some("from front matter"));

        post.excerpt = Some("excerpt".into());
        assert_eq!(entry(&post).description.as_deref(), Some("excerpt"));

        post.excerpt = None;
        post.description = None;
        assert_eq!(entry(&post).description, None);
    }

    #[test]
    fn test_image_from_meta_tag() {
        let mut post = make_post("/blog/a", "A", "2024-01-01");
        post.html = Some(
            r#"<div><meta property="og:image" content="https://x/p.png"><meta name="og:image" content="https://x/n.png"></div>"#
                .into(),
        );
        post.cover = Some("/covers/a.png".into());
        assert_eq!(entry(&post).image.as_deref(), Some("https://x/n.png"));
    }

    #[test]
    fn test_image_fallbacks() {
        let mut post = make_post("/blog/a", "A", "2024-01-01");
        post.html = Some("<p>no meta</p>".into());
        post.cover = Some("/covers/a.png".into());

        let mut generated = FxHashMap::default();
        generated.insert("/blog/a".to_string(), "https://example.com/og/a.png".to_string());
        let with_generated = FeedEntry::from_post(&post, &make_config(), &generated).unwrap();
        assert_eq!(with_generated.image.as_deref(), Some("https://example.com/og/a.png"));

        assert_eq!(
            entry(&post).image.as_deref(),
            Some("https://example.com/covers/a.png")
        );
    }

    #[test]
    fn test_author_from_handle() {
        let author = Author {
            name: Some("Ada".into()),
            link: None,
            handle: Some("ada".into()),
        };
        assert_eq!(
            entry_author(&author),
            Some(FeedAuthor {
                name: Some("Ada".into()),
                link: Some("https://github.com/ada".into()),
                email: Some("ada@users.noreply.github.com (Ada)".into()),
            })
        );
    }

    #[test]
    fn test_author_explicit_link_wins() {
        let author = Author {
            name: None,
            link: Some("https://ada.dev".into()),
            handle: Some("ada".into()),
        };
        let resolved = entry_author(&author).unwrap();
        assert_eq!(resolved.link.as_deref(), Some("https://ada.dev"));
        assert_eq!(resolved.email.as_deref(), Some("ada@users.noreply.github.com"));
        assert_eq!(resolved.display_name(), "ada");
    }

    #[test]
    fn test_author_name_only() {
        let author = Author {
            name: Some("Ada".into()),
            ..Default::default()
        };
        let resolved = entry_author(&author).unwrap();
        assert_eq!(resolved.link, None);
        assert_eq!(resolved.email, None);
        assert_eq!(entry_author(&Author::default()), None);
    }

    #[test]
    fn test_categories_normalized() {
        let mut post = make_post("/blog/a", "A", "2024-01-01");
        post.category = Some(CategoryField::One("release".into()));
        assert_eq!(entry(&post).categories, Some(vec!["release".to_string()]));

        post.category = None;
        post.categories = Some(vec!["rust".into(), "docs".into()]);
        assert_eq!(
            entry(&post).categories,
            Some(vec!["rust".to_string(), "docs".to_string()])
        );
    }

    #[test]
    fn test_undated_post_rejected() {
        let mut post = make_post("/blog/a", "A", "2024-01-01");
        post.date = None;
        let err = FeedEntry::from_post(&post, &make_config(), &FxHashMap::default()).unwrap_err();
        assert!(err.to_string().contains("/blog/a"));
    }

    #[test]
    fn test_meta_updated_and_links() {
        let config = make_config();
        let entries = [
            entry(&make_post("/blog/a", "A", "2024-01-01")),
            entry(&make_post("/blog/b", "B", "2024-06-01")),
        ];
        let meta = FeedMeta::new(&config, &entries);
        assert_eq!(meta.updated, PostDate::parse("2024-06-01").unwrap());
        assert_eq!(meta.id, "https://example.com/blog/");
        assert_eq!(meta.self_link, "https://example.com/blog/feed.atom");
        assert_eq!(meta.generator, "docs 1.0.0");
        assert_eq!(meta.copyright.as_deref(), Some("Copyright © Team"));

        assert_eq!(FeedMeta::new(&config, &[]).updated, PostDate::epoch());
    }
}
