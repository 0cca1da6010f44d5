//! Content generators for the blog section.
//!
//! - **Feed**: Atom / RSS / JSON Feed document at `blog/feed.<ext>`
//!
//! Generators consume the validated, sorted posts from [`crate::blog`]
//! and return staged assets; nothing is written here.

pub mod feed;

use crate::core::{BuildError, Result};
use quick_xml::{Reader, Writer, events::Event};
use std::borrow::Cow;

/// Minify XML content if enabled.
///
/// Drops whitespace-only text between markup. Character data is written back
/// untouched, including whitespace next to entity references, so escaped
/// HTML inside `<content>` keeps its line breaks.
pub fn minify_xml(xml: &str, enabled: bool) -> Result<Cow<'_, str>> {
    if !enabled {
        return Ok(Cow::Borrowed(xml));
    }

    let mut reader = Reader::from_str(xml);
    let mut writer = Writer::new(Vec::with_capacity(xml.len()));
    let mut pending: Option<Event<'_>> = None;
    let mut after_ref = false;

    loop {
        let event = reader.read_event().map_err(minify_error)?;
        if matches!(event, Event::Eof) {
            break;
        }

        let is_ref = matches!(event, Event::GeneralRef(_));
        if let Some(space) = pending.take()
            && (after_ref || is_ref)
        {
            writer.write_event(space).map_err(minify_error)?;
        }

        if matches!(&event, Event::Text(text) if text.iter().all(u8::is_ascii_whitespace)) {
            pending = Some(event);
            continue;
        }

        after_ref = is_ref;
        writer.write_event(event).map_err(minify_error)?;
    }

    String::from_utf8(writer.into_inner())
        .map(Cow::Owned)
        .map_err(minify_error)
}

fn minify_error(err: impl std::fmt::Display) -> BuildError {
    BuildError::Feed(format!("XML minification failed: {err}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minify_xml_basic() {
        let xml = r#"<?xml version="1.0"?>
<feed>
  <entry>Hello</entry>
</feed>"#;
        assert_eq!(
            minify_xml(xml, true).unwrap(),
            r#"<?xml version="1.0"?><feed><entry>Hello</entry></feed>"#
        );
    }

    #[test]
    fn test_minify_xml_keeps_inline_text() {
        assert_eq!(
            minify_xml("<tag>  content  </tag>", true).unwrap(),
            "<tag>  content  </tag>"
        );
    }

    #[test]
    fn test_minify_xml_keeps_escaped_markup() {
        let xml = "<feed>\n  <content type=\"html\">&lt;pre&gt;fn main() {\n    run();\n}&lt;/pre&gt;\n&lt;p&gt;Hello\nworld&lt;/p&gt;</content>\n</feed>";
        let minified = minify_xml(xml, true).unwrap();
        assert_eq!(
            minified,
            "<feed><content type=\"html\">&lt;pre&gt;fn main() {\n    run();\n}&lt;/pre&gt;\n&lt;p&gt;Hello\nworld&lt;/p&gt;</content></feed>"
        );
    }

    #[test]
    fn test_minify_xml_enabled_drops_blank_lines() {
        let xml = "<feed>\n\n  <entry/>\n</feed>";
        assert_eq!(minify_xml(xml, true).unwrap(), "<feed><entry/></feed>");
    }

    #[test]
    fn test_minify_xml_disabled_borrows() {
        let xml = "<feed>\n\n  <entry/>\n</feed>";
        assert!(matches!(minify_xml(xml, false).unwrap(), Cow::Borrowed(s) if s == xml));
    }

    #[test]
    fn test_minify_xml_rejects_malformed() {
        assert!(matches!(
            minify_xml("<feed><entry></feed>", true),
            Err(BuildError::Feed(_))
        ));
    }
}
