//! Fragment parser for container markup supplied as a string.

#![allow(clippy::unused_self)] // Unit struct methods have &self for API consistency

use std::io::BufRead;

use quick_xml::events::{BytesStart, Event};
use quick_xml::reader::Reader;

use crate::entities::{convert_html_entities, decode_entity};
use crate::error::MarkupError;
use crate::node::{Markup, NodeId};

/// Parse an XML/HTML fragment into a [`Markup`] document.
pub(crate) struct FragmentParser;

impl FragmentParser {
    pub(crate) fn new() -> Self {
        Self
    }

    /// Parse a fragment whose first element becomes the document root.
    ///
    /// Content after the root element closes is ignored.
    pub(crate) fn parse(&self, fragment: &str) -> Result<Markup, MarkupError> {
        let html = convert_html_entities(fragment);

        let mut reader = Reader::from_str(&html);
        reader.config_mut().trim_text(false);

        let mut buf = Vec::new();
        let mut doc: Option<Markup> = None;
        let mut open: Vec<NodeId> = Vec::new();

        loop {
            match reader.read_event_into(&mut buf)? {
                Event::Start(e) => {
                    let id = self.open_element(&mut doc, &open, &reader, &e);
                    open.push(id);
                }
                Event::Empty(e) => {
                    self.open_element(&mut doc, &open, &reader, &e);
                    if open.is_empty() {
                        break;
                    }
                }
                Event::Text(e) => {
                    let text = reader.decoder().decode(&e)?.into_owned();
                    append_text(doc.as_mut(), &open, &text);
                }
                Event::GeneralRef(e) => {
                    let entity = reader.decoder().decode(&e)?.into_owned();
                    append_text(doc.as_mut(), &open, &decode_entity(&entity));
                }
                Event::CData(e) => {
                    let text = String::from_utf8_lossy(&e).into_owned();
                    append_text(doc.as_mut(), &open, &text);
                }
                Event::End(_) => {
                    open.pop();
                    if open.is_empty() {
                        break;
                    }
                }
                Event::Eof => break,
                Event::Comment(_) | Event::Decl(_) | Event::PI(_) | Event::DocType(_) => {}
            }
            buf.clear();
        }

        let doc = doc.ok_or(MarkupError::Empty)?;
        tracing::trace!(elements = doc.len(), root = doc.tag(doc.root()), "Parsed markup fragment");
        Ok(doc)
    }

    /// Create the root, or append a child to the innermost open element.
    fn open_element<R: BufRead>(
        &self,
        doc: &mut Option<Markup>,
        open: &[NodeId],
        reader: &Reader<R>,
        e: &BytesStart,
    ) -> NodeId {
        let tag = self.decode_name(reader, e.name().as_ref());
        let id = match doc {
            Some(existing) => {
                let parent = open.last().copied().unwrap_or(NodeId::ROOT);
                existing.add_child(parent, tag)
            }
            None => {
                *doc = Some(Markup::new(tag));
                NodeId::ROOT
            }
        };

        if let Some(doc) = doc.as_mut() {
            for (key, value) in self.decode_attrs(reader, e) {
                doc.set_attr(id, key, value);
            }
        }
        id
    }

    fn decode_name<R: BufRead>(&self, reader: &Reader<R>, name: &[u8]) -> String {
        reader.decoder().decode(name).map_or_else(
            |_| String::from_utf8_lossy(name).into_owned(),
            std::borrow::Cow::into_owned,
        )
    }

    fn decode_attrs<R: BufRead>(&self, reader: &Reader<R>, e: &BytesStart) -> Vec<(String, String)> {
        let mut attrs = Vec::new();
        for attr in e.attributes().flatten() {
            let key = self.decode_name(reader, attr.key.as_ref());
            let value = attr.unescape_value().map_or_else(
                |_| String::from_utf8_lossy(&attr.value).into_owned(),
                std::borrow::Cow::into_owned,
            );
            attrs.push((key, value));
        }
        attrs
    }
}

/// Append text to the open element, or to its last child's tail.
fn append_text(doc: Option<&mut Markup>, open: &[NodeId], text: &str) {
    let (Some(doc), Some(&current)) = (doc, open.last()) else {
        return;
    };
    match doc.children(current).last().copied() {
        Some(last_child) => doc.push_tail(last_child, text),
        None => doc.push_text(current, text),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_self_closing_root() {
        let doc = Markup::parse(r#"<div class="menu" />"#).unwrap();

        assert_eq!(doc.tag(doc.root()), "div");
        assert_eq!(doc.attr(doc.root(), "class"), Some("menu"));
        assert_eq!(doc.child_count(doc.root()), 0);
    }

    #[test]
    fn test_parse_nested_elements_with_tail() {
        let doc = Markup::parse("<p>Before<br/>After <b>bold</b></p>").unwrap();
        let root = doc.root();

        assert_eq!(doc.text(root), "Before");
        let children = doc.children(root);
        assert_eq!(children.len(), 2);
        assert_eq!(doc.tag(children[0]), "br");
        assert_eq!(doc.element(children[0]).tail, "After ");
        assert_eq!(doc.text(children[1]), "bold");
    }

    #[test]
    fn test_parse_entities() {
        let doc = Markup::parse("<span>a&amp;b&nbsp;c</span>").unwrap();

        assert_eq!(doc.text(doc.root()), "a&b\u{00a0}c");
    }

    #[test]
    fn test_parse_round_trips_through_serializer() {
        let html = r#"<nav id="main"><a href="/">Home</a><a href="/about">About</a></nav>"#;
        let doc = Markup::parse(html).unwrap();

        assert_eq!(doc.to_html(doc.root()), html);
    }

    #[test]
    fn test_parse_text_only_is_empty() {
        let result = Markup::parse("just text");

        assert!(matches!(result, Err(MarkupError::Empty)));
    }

    #[test]
    fn test_parse_mismatched_end_tag_is_error() {
        assert!(Markup::parse("<div><span></div>").is_err());
    }
}
