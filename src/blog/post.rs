//! Blog post model as handed over by the content loader.

use crate::utils::date::PostDate;
use serde::Deserialize;

/// One rendered content item from the manifest.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawPost {
    pub url: String,
    pub frontmatter: FrontMatter,
    /// Plain-text excerpt.
    pub excerpt: Option<String>,
    /// Rendered HTML body.
    pub html: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct FrontMatter {
    pub title: Option<String>,
    /// Kept as text; validated into a [`PostDate`] by the collector.
    pub date: Option<String>,
    pub description: Option<String>,
    pub author: Option<Author>,
    pub category: Option<CategoryField>,
    pub categories: Option<Vec<String>>,
    /// Cover image path or URL.
    pub cover: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Author {
    pub name: Option<String>,
    pub link: Option<String>,
    /// Code-hosting handle, used for profile link and no-reply email.
    #[serde(alias = "github")]
    pub handle: Option<String>,
}

/// `category` accepts either a single term or a list.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum CategoryField {
    One(String),
    Many(Vec<String>),
}

/// A validated blog post.
///
/// Identity is the canonical URL path. Posts are immutable once collected.
#[derive(Debug, Clone)]
pub struct BlogPost {
    pub url: String,
    pub title: String,
    /// `None` only for the blog index page.
    pub date: Option<PostDate>,
    pub html: Option<String>,
    pub excerpt: Option<String>,
    pub description: Option<String>,
    pub author: Option<Author>,
    pub category: Option<CategoryField>,
    pub categories: Option<Vec<String>>,
    pub cover: Option<String>,
}

impl BlogPost {
    /// Category terms, in priority order: singular `category`, list-valued
    /// `category`, then `categories`. `None` when no field is present.
    pub fn category_terms(&self) -> Option<Vec<String>> {
        match (&self.category, &self.categories) {
            (Some(CategoryField::One(term)), _) => Some(vec![term.clone()]),
            (Some(CategoryField::Many(terms)), _) => Some(terms.clone()),
            (None, Some(terms)) => Some(terms.clone()),
            (None, None) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn post_with(category: Option<CategoryField>, categories: Option<Vec<String>>) -> BlogPost {
        BlogPost {
            url: "/blog/a".into(),
            title: "A".into(),
            date: None,
            html: None,
            excerpt: None,
            description: None,
            author: None,
            category,
            categories,
            cover: None,
        }
    }

    #[test]
    fn test_category_single() {
        let post = post_with(Some(CategoryField::One("release".into())), None);
        assert_eq!(post.category_terms(), Some(vec!["release".to_string()]));
    }

    #[test]
    fn test_category_list_keeps_order() {
        let post = post_with(None, Some(vec!["b".into(), "a".into()]));
        assert_eq!(post.category_terms(), Some(vec!["b".to_string(), "a".to_string()]));
    }

    #[test]
    fn test_category_priority() {
        let post = post_with(
            Some(CategoryField::Many(vec!["x".into(), "y".into()])),
            Some(vec!["z".into()]),
        );
        assert_eq!(post.category_terms(), Some(vec!["x".to_string(), "y".to_string()]));
        assert_eq!(post_with(None, None).category_terms(), None);
    }

    #[test]
    fn test_deserialize_manifest_item() {
        let json = r#"{
            "url": "/blog/a",
            "frontmatter": {
                "title": "A",
                "date": "2024-01-01",
                "author": { "name": "Ada", "github": "ada" },
                "category": ["x", "y"]
            },
            "excerpt": "",
            "html": "<p>hi</p>"
        }"#;
        let raw: RawPost = serde_json::from_str(json).unwrap();
        assert_eq!(raw.frontmatter.author.unwrap().handle.as_deref(), Some("ada"));
        assert_eq!(
            raw.frontmatter.category,
            Some(CategoryField::Many(vec!["x".into(), "y".into()]))
        );
    }
}
