//! Manifest loading, validation and ordering.

use super::post::{BlogPost, RawPost};
use crate::core::{BuildError, Result};
use crate::utils::date::PostDate;
use crate::debug;
use std::{cmp::Ordering, fs, path::Path};

/// Read the rendered content manifest written by the content loader.
pub fn load_manifest(path: &Path) -> Result<Vec<RawPost>> {
    let content = fs::read_to_string(path).map_err(|e| BuildError::io(path, e))?;
    let posts: Vec<RawPost> =
        serde_json::from_str(&content).map_err(|source| BuildError::Manifest {
            path: path.to_path_buf(),
            source,
        })?;
    debug!("blog"; "{} items in {}", posts.len(), path.display());
    Ok(posts)
}

/// Validate and order every content item.
///
/// The item at `index` is exempt from title/date checks but must be
/// present. Its absence is reported before any sorting happens.
pub fn collect_posts(raw: Vec<RawPost>, index: &str) -> Result<Vec<BlogPost>> {
    if !raw.iter().any(|item| item.url == index) {
        return Err(BuildError::MissingIndex(index.to_owned()));
    }

    let mut posts = raw
        .into_iter()
        .map(|item| {
            let is_index = item.url == index;
            validate(item, is_index)
        })
        .collect::<Result<Vec<_>>>()?;

    posts.sort_by(compare_posts);
    Ok(posts)
}

/// Remove the index page from a collected set.
///
/// Returns the index page and the remaining posts, order preserved.
pub fn split_index(mut posts: Vec<BlogPost>, index: &str) -> Result<(BlogPost, Vec<BlogPost>)> {
    let pos = posts
        .iter()
        .position(|post| post.url == index)
        .ok_or_else(|| BuildError::MissingIndex(index.to_owned()))?;
    let index_page = posts.remove(pos);
    Ok((index_page, posts))
}

/// Undated items first, then most recent first.
///
/// Used with the stable `sort_by`, so equal dates keep manifest order.
pub fn compare_posts(a: &BlogPost, b: &BlogPost) -> Ordering {
    match (a.date, b.date) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (Some(a), Some(b)) => b.cmp(&a),
    }
}

fn validate(item: RawPost, is_index: bool) -> Result<BlogPost> {
    let RawPost {
        url,
        frontmatter: fm,
        excerpt,
        html,
    } = item;

    let title = fm
        .title
        .map(|t| t.trim().to_owned())
        .filter(|t| !t.is_empty());
    let title = match title {
        Some(title) => title,
        None if is_index => String::new(),
        None => return Err(BuildError::invalid_post(&url, "missing title")),
    };

    let date = match fm.date.as_deref().map(str::trim).filter(|d| !d.is_empty()) {
        Some(raw) => match PostDate::parse(raw) {
            Some(date) => Some(date),
            None if is_index => None,
            None => {
                return Err(BuildError::invalid_post(&url, format!("invalid date `{raw}`")));
            }
        },
        None if is_index => None,
        None => return Err(BuildError::invalid_post(&url, "missing date")),
    };

    Ok(BlogPost {
        url,
        title,
        date,
        html,
        excerpt,
        description: fm.description,
        author: fm.author,
        category: fm.category,
        categories: fm.categories,
        cover: fm.cover,
    })
}
