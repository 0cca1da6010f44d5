//! RSS 2.0 feed generation.
//!
//! The channel is validated before serialization; invalid dates, URLs or
//! enclosure MIME types surface as [`BuildError::Feed`].

use super::common::{FeedEntry, FeedMeta};
use crate::{
    core::{BuildError, Result},
    utils::mime,
};
use rss::{
    CategoryBuilder, ChannelBuilder, EnclosureBuilder, GuidBuilder, ImageBuilder, Item,
    ItemBuilder, validation::Validate,
};
use std::collections::BTreeMap;

const CONTENT_NAMESPACE: &str = "http://purl.org/rss/1.0/modules/content/";

/// Render and validate the RSS document.
pub fn render(meta: &FeedMeta, entries: &[FeedEntry]) -> Result<String> {
    let image = meta.image.as_ref().map(|url| {
        ImageBuilder::default()
            .url(url.clone())
            .title(meta.title.clone())
            .link(meta.id.clone())
            .build()
    });

    let channel = ChannelBuilder::default()
        .namespaces(BTreeMap::from([(
            "content".to_string(),
            CONTENT_NAMESPACE.to_string(),
        )]))
        .title(&meta.title)
        .link(&meta.id)
        .description(&meta.description)
        .language(meta.language.clone())
        .copyright(meta.copyright.clone())
        .generator(meta.generator.clone())
        .last_build_date(meta.updated.to_rfc2822())
        .image(image)
        .items(entries.iter().map(item).collect::<Vec<_>>())
        .build();

    channel
        .validate()
        .map_err(|e| BuildError::Feed(format!("RSS validation failed: {e}")))?;
    Ok(channel.to_string())
}

fn item(entry: &FeedEntry) -> Item {
    let enclosure = entry.image.as_ref().map(|url| {
        EnclosureBuilder::default()
            .url(url.clone())
            .length("0".to_string())
            .mime_type(mime::image_from_url(url).to_string())
            .build()
    });

    let categories = entry
        .categories
        .iter()
        .flatten()
        .map(|name| CategoryBuilder::default().name(name.clone()).build())
        .collect::<Vec<_>>();

    ItemBuilder::default()
        .title(entry.title.clone())
        .link(entry.id.clone())
        .guid(GuidBuilder::default().permalink(true).value(entry.id.clone()).build())
        .description(entry.description.clone())
        .content(entry.content.clone())
        .pub_date(entry.date.to_rfc2822())
        .author(entry.author.as_ref().and_then(|a| a.email.clone()))
        .enclosure(enclosure)
        .categories(categories)
        .build()
}
