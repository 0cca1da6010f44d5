//! Atom 1.0 feed generation.

use super::common::{FeedAuthor, FeedEntry, FeedMeta};
use crate::utils::mime;
use atom_syndication::{
    Category, CategoryBuilder, ContentBuilder, Entry, EntryBuilder, Feed, FeedBuilder,
    GeneratorBuilder, Link, LinkBuilder, Person, PersonBuilder, Text,
};

/// Render the Atom document.
pub fn render(meta: &FeedMeta, entries: &[FeedEntry]) -> String {
    let mut links = vec![
        link(&meta.self_link, "self", Some(mime::types::ATOM)),
        link(&meta.id, "alternate", Some(mime::types::HTML)),
        link(&meta.hub, "hub", None),
    ];
    if let Some(funding) = &meta.funding {
        links.push(link(funding, "payment", None));
    }

    let feed: Feed = FeedBuilder::default()
        .title(Text::plain(meta.title.clone()))
        .id(&meta.id)
        .updated(*meta.updated.as_datetime())
        .authors(meta.author.as_ref().map(person).into_iter().collect::<Vec<_>>())
        .links(links)
        .subtitle(Some(Text::plain(meta.description.clone())))
        .icon(meta.favicon.clone())
        .logo(meta.image.clone())
        .rights(meta.copyright.clone().map(Text::plain))
        .generator(Some(
            GeneratorBuilder::default()
                .value(meta.generator.clone())
                .build(),
        ))
        .lang(meta.language.clone())
        .entries(entries.iter().map(entry).collect::<Vec<_>>())
        .build();

    feed.to_string()
}

fn entry(entry: &FeedEntry) -> Entry {
    let mut links = vec![link(&entry.id, "alternate", Some(mime::types::HTML))];
    if let Some(image) = &entry.image {
        links.push(link(image, "enclosure", Some(mime::image_from_url(image))));
    }

    let content = entry.content.as_ref().map(|html| {
        ContentBuilder::default()
            .value(Some(html.clone()))
            .content_type(Some("html".to_string()))
            .build()
    });

    let categories: Vec<Category> = entry
        .categories
        .iter()
        .flatten()
        .map(|term| CategoryBuilder::default().term(term.clone()).build())
        .collect();

    EntryBuilder::default()
        .title(Text::plain(entry.title.clone()))
        .id(&entry.id)
        .updated(*entry.date.as_datetime())
        .published(Some(*entry.date.as_datetime()))
        .links(links)
        .summary(entry.description.clone().map(Text::plain))
        .content(content)
        .authors(entry.author.as_ref().map(person).into_iter().collect::<Vec<_>>())
        .categories(categories)
        .build()
}

fn person(author: &FeedAuthor) -> Person {
    PersonBuilder::default()
        .name(author.display_name())
        .email(author.email.clone())
        .uri(author.link.clone())
        .build()
}

fn link(href: &str, rel: &str, mime_type: Option<&str>) -> Link {
    LinkBuilder::default()
        .href(href)
        .rel(rel)
        .mime_type(mime_type.map(str::to_owned))
        .build()
}
