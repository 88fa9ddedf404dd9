//! HTML serializer for [`Markup`] documents.

use std::fmt::Write;

use crate::node::{Markup, NodeId};

/// XML declaration emitted by [`Markup::to_document`].
pub(crate) const XML_DECLARATION: &str = r#"<?xml version="1.0"?>"#;

/// Elements that never have content and serialize as `<tag/>`.
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param", "source",
    "track", "wbr",
];

/// Check whether an element is void (self-closing) in HTML.
///
/// Every other element is written with a closing tag, even when empty, so
/// an option-less `<select>` comes out as `<select></select>`.
#[must_use]
pub fn is_void_element(tag: &str) -> bool {
    VOID_ELEMENTS
        .iter()
        .any(|void| void.eq_ignore_ascii_case(tag))
}

pub(crate) fn serialize_document(doc: &Markup, node: NodeId) -> String {
    let mut out = String::with_capacity(256);
    out.push_str(XML_DECLARATION);
    out.push('\n');
    serialize_node(doc, node, &mut out);
    out.push('\n');
    out
}

/// Serialize a single element recursively.
pub(crate) fn serialize_node(doc: &Markup, node: NodeId, out: &mut String) {
    let element = doc.element(node);

    out.push('<');
    out.push_str(&element.tag);

    for (key, value) in &element.attrs {
        write!(out, r#" {}="{}""#, key, escape_attr(value)).unwrap();
    }

    let empty = element.children.is_empty() && element.text.is_empty();
    if empty && is_void_element(&element.tag) {
        out.push_str("/>");
    } else {
        out.push('>');
        out.push_str(&escape_text(&element.text));
        for &child in &element.children {
            serialize_node(doc, child, out);
        }
        write!(out, "</{}>", element.tag).unwrap();
    }

    if !element.tail.is_empty() {
        out.push_str(&escape_text(&element.tail));
    }
}

/// Escape text content. Non-breaking spaces are written as `&nbsp;`.
#[must_use]
pub fn escape_text(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            '\u{00a0}' => result.push_str("&nbsp;"),
            _ => result.push(ch),
        }
    }
    result
}

/// Escape an attribute value for a double-quoted attribute.
#[must_use]
pub fn escape_attr(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            '"' => result.push_str("&quot;"),
            _ => result.push(ch),
        }
    }
    result
}
