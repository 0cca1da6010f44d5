//! Feed generation (Atom, RSS, JSON Feed).
//!
//! Builds one syndication document from the sorted, index-excluded posts:
//!
//! - **Atom 1.0**: `blog/feed.atom` (default)
//! - **RSS 2.0**: `blog/feed.rss`
//! - **JSON Feed 1.1**: `blog/feed.json`

mod atom;
mod common;
mod json;
mod rss;

pub use common::{FeedAuthor, FeedEntry, FeedMeta, OG_IMAGE_META_NAME, entry_author, meta_image};

use crate::{
    blog::BlogPost,
    config::{FeedFormat, SiteConfig},
    core::{AssetKind, RenderedAsset, Result},
    generator::minify_xml,
    log,
};
use rustc_hash::FxHashMap;

/// Build the feed document for `posts`.
///
/// `generated` maps post URLs to per-page OG images rendered in this build.
/// Entry order follows `posts`.
pub fn build_feed(
    config: &SiteConfig,
    posts: &[BlogPost],
    generated: &FxHashMap<String, String>,
) -> Result<RenderedAsset> {
    let entries = posts
        .iter()
        .map(|post| FeedEntry::from_post(post, config, generated))
        .collect::<Result<Vec<_>>>()?;
    let meta = FeedMeta::new(config, &entries);

    let document = match config.feed.format {
        FeedFormat::Atom => atom::render(&meta, &entries),
        FeedFormat::Rss => rss::render(&meta, &entries)?,
        FeedFormat::Json => json::render(&meta, &entries)?,
    };
    let document = match config.feed.format {
        FeedFormat::Json => document,
        _ => minify_xml(&document, config.build.minify)?.into_owned(),
    };

    let dest = config.feed.path();
    log!("feed"; "{} entries, {}", entries.len(), dest.display());
    Ok(RenderedAsset::new(AssetKind::Feed, dest, document.into_bytes()))
}
