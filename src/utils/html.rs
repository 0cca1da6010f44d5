//! HTML utility functions.
//!
//! - `escape()` - entity escaping for text spliced into markup (SVG templates)
//! - `unescape()` - decode entities in raw attribute values
//! - `find_element()` - breadth-first element search over parsed markup

use std::{borrow::Cow, collections::VecDeque};

// =============================================================================
// HTML Escaping
// =============================================================================

/// Characters that require escaping.
const ESCAPE_CHARS: [char; 5] = ['<', '>', '&', '"', '\''];

#[inline]
fn escape_char(c: char) -> Option<&'static str> {
    match c {
        '<' => Some("&lt;"),
        '>' => Some("&gt;"),
        '&' => Some("&amp;"),
        '"' => Some("&quot;"),
        '\'' => Some("&#39;"),
        _ => None,
    }
}

/// Escape markup special characters.
///
/// Uses `Cow` to avoid allocation when no escaping is needed.
pub fn escape(s: &str) -> Cow<'_, str> {
    if !s.contains(ESCAPE_CHARS) {
        return Cow::Borrowed(s);
    }

    let mut result = String::with_capacity(s.len() + 8);
    for c in s.chars() {
        match escape_char(c) {
            Some(entity) => result.push_str(entity),
            None => result.push(c),
        }
    }
    Cow::Owned(result)
}

/// Unescape HTML entities back to characters.
///
/// Handles the common named entities and numeric character references.
/// Unknown entities are kept verbatim.
pub fn unescape(s: &str) -> Cow<'_, str> {
    if !s.contains('&') {
        return Cow::Borrowed(s);
    }

    let mut result = String::with_capacity(s.len());
    let mut rest = s;

    while let Some(amp) = rest.find('&') {
        result.push_str(&rest[..amp]);
        let tail = &rest[amp + 1..];

        let decoded = tail
            .find(';')
            .filter(|&end| end <= 10)
            .and_then(|end| decode_entity(&tail[..end]).map(|c| (c, end)));

        match decoded {
            Some((c, end)) => {
                result.push(c);
                rest = &tail[end + 1..];
            }
            None => {
                result.push('&');
                rest = tail;
            }
        }
    }
    result.push_str(rest);

    Cow::Owned(result)
}

fn decode_entity(entity: &str) -> Option<char> {
    match entity {
        "lt" => Some('<'),
        "gt" => Some('>'),
        "amp" => Some('&'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        "nbsp" => Some('\u{00A0}'),
        s if s.starts_with("#x") || s.starts_with("#X") => {
            u32::from_str_radix(&s[2..], 16).ok().and_then(char::from_u32)
        }
        s if s.starts_with('#') => s[1..].parse().ok().and_then(char::from_u32),
        _ => None,
    }
}

// =============================================================================
// Element Locator
// =============================================================================

/// Owned snapshot of a matched element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FoundElement {
    /// Lowercased tag name.
    pub tag: String,
    /// Attributes in source order; valueless attributes map to `""`.
    pub attrs: Vec<(String, String)>,
}

impl FoundElement {
    fn from_tag(tag: &tl::HTMLTag<'_>) -> Self {
        let attrs = tag
            .attributes()
            .iter()
            .map(|(key, value)| {
                let value = value.map(|v| unescape(&v).into_owned()).unwrap_or_default();
                (key.to_ascii_lowercase(), value)
            })
            .collect();

        Self {
            tag: tag.name().as_utf8_str().to_ascii_lowercase(),
            attrs,
        }
    }

    /// Value of the first attribute named `name` (case-insensitive).
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

/// Find the first element, in breadth-first order from the document root,
/// for which `pred` holds.
///
/// Only element nodes are enqueued; text and comment nodes are skipped
/// without ending the walk. Absent or unparseable markup yields `None`.
pub fn find_element<P>(html: Option<&str>, mut pred: P) -> Option<FoundElement>
where
    P: FnMut(&FoundElement) -> bool,
{
    let dom = tl::parse(html?, tl::ParserOptions::default()).ok()?;
    let parser = dom.parser();

    let mut queue: VecDeque<tl::NodeHandle> = dom.children().iter().copied().collect();

    while let Some(handle) = queue.pop_front() {
        let Some(tl::Node::Tag(tag)) = handle.get(parser) else {
            continue;
        };

        let element = FoundElement::from_tag(tag);
        if pred(&element) {
            return Some(element);
        }
        queue.extend(tag.children().top().iter().copied());
    }

    None
}
