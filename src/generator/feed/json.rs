//! JSON Feed 1.1 generation.

use super::common::{FeedAuthor, FeedEntry, FeedMeta};
use crate::core::{BuildError, Result};
use serde::Serialize;

const VERSION: &str = "https://jsonfeed.org/version/1.1";

#[derive(Debug, Serialize)]
struct JsonFeed<'a> {
    version: &'static str,
    title: &'a str,
    home_page_url: &'a str,
    feed_url: &'a str,
    description: &'a str,
    language: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    icon: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    favicon: Option<&'a str>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    authors: Vec<JsonAuthor<'a>>,
    hubs: Vec<JsonHub<'a>>,
    items: Vec<JsonItem<'a>>,
}

#[derive(Debug, Serialize)]
struct JsonAuthor<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    url: Option<&'a str>,
}

#[derive(Debug, Serialize)]
struct JsonHub<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    url: &'a str,
}

#[derive(Debug, Serialize)]
struct JsonItem<'a> {
    id: &'a str,
    url: &'a str,
    title: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    content_html: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    summary: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    image: Option<&'a str>,
    date_published: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    authors: Vec<JsonAuthor<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tags: Option<&'a [String]>,
}

fn author(author: &FeedAuthor) -> JsonAuthor<'_> {
    JsonAuthor {
        name: author.name.as_deref(),
        url: author.link.as_deref(),
    }
}

/// Render the JSON Feed document.
pub fn render(meta: &FeedMeta, entries: &[FeedEntry]) -> Result<String> {
    let feed = JsonFeed {
        version: VERSION,
        title: &meta.title,
        home_page_url: &meta.id,
        feed_url: &meta.self_link,
        description: &meta.description,
        language: &meta.language,
        icon: meta.image.as_deref(),
        favicon: meta.favicon.as_deref(),
        authors: meta.author.iter().map(author).collect(),
        hubs: vec![JsonHub {
            kind: "WebSub",
            url: &meta.hub,
        }],
        items: entries
            .iter()
            .map(|entry| JsonItem {
                id: &entry.id,
                url: &entry.id,
                title: &entry.title,
                content_html: entry.content.as_deref(),
                summary: entry.description.as_deref(),
                image: entry.image.as_deref(),
                date_published: entry.date.to_rfc3339(),
                authors: entry.author.iter().map(author).collect(),
                tags: entry.categories.as_deref(),
            })
            .collect(),
    };

    serde_json::to_string_pretty(&feed).map_err(|e| BuildError::Feed(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::super::common::tests::{make_config, make_post};
    use super::*;
    use rustc_hash::FxHashMap;

    #[test]
    fn test_json_feed_shape() {
        let config = make_config();
        let mut post = make_post("/blog/a", "A", "2024-01-01");
        post.categories = Some(vec!["rust".into(), "docs".into()]);
        let entries = vec![FeedEntry::from_post(&post, &config, &FxHashMap::default()).unwrap()];

        let json = render(&FeedMeta::new(&config, &entries), &entries).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["version"], VERSION);
        assert_eq!(value["feed_url"], "https://example.com/blog/feed.atom");
        assert_eq!(value["hubs"][0]["type"], "WebSub");
        let item = &value["items"][0];
        assert_eq!(item["id"], "https://example.com/blog/a");
        assert_eq!(item["tags"], serde_json::json!(["rust", "docs"]));
        assert!(item.get("summary").is_none());
        assert!(item["date_published"].as_str().unwrap().starts_with("2024-01-01"));
    }
}
