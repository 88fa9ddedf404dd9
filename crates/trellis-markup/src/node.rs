//! Arena-backed element tree.

use crate::error::MarkupError;
use crate::parser::FragmentParser;
use crate::serializer::{serialize_document, serialize_node};

/// Index of an element inside a [`Markup`] document.
///
/// Ids are only meaningful for the document that produced them.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u32);

impl NodeId {
    /// The root element of every document.
    pub const ROOT: Self = Self(0);

    fn index(self) -> usize {
        self.0 as usize
    }
}

/// A single element.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Element {
    /// Element tag name.
    pub tag: String,
    /// Text content placed before the first child.
    pub text: String,
    /// Text placed after the closing tag (only produced by the parser).
    pub tail: String,
    /// Attributes in the order they were first set.
    pub attrs: Vec<(String, String)>,
    /// Child elements in document order.
    pub children: Vec<NodeId>,
    /// Owning element; `None` for the root.
    pub parent: Option<NodeId>,
}

impl Element {
    fn new(tag: impl Into<String>, parent: Option<NodeId>) -> Self {
        Self {
            tag: tag.into(),
            parent,
            ..Default::default()
        }
    }

    /// Get an attribute value by name.
    #[must_use]
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }
}

/// Markup document: an ordered element tree with a single root.
///
/// Elements are never removed or re-parented, so every [`NodeId`] handed
/// out stays valid for the lifetime of the document.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Markup {
    nodes: Vec<Element>,
}

impl Markup {
    /// Create a document whose root element has the given tag.
    #[must_use]
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            nodes: vec![Element::new(tag, None)],
        }
    }

    /// Parse an XML/HTML fragment with a single root element.
    ///
    /// Named HTML entities such as `&nbsp;` are accepted.
    ///
    /// # Errors
    ///
    /// Returns an error if the fragment is not well-formed or has no element.
    pub fn parse(fragment: &str) -> Result<Self, MarkupError> {
        FragmentParser::new().parse(fragment)
    }

    /// The root element id.
    #[must_use]
    pub fn root(&self) -> NodeId {
        NodeId::ROOT
    }

    /// Number of elements in the document.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Documents always contain at least the root.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Borrow an element.
    ///
    /// # Panics
    ///
    /// Panics if `id` does not belong to this document.
    #[must_use]
    pub fn element(&self, id: NodeId) -> &Element {
        &self.nodes[id.index()]
    }

    fn element_mut(&mut self, id: NodeId) -> &mut Element {
        &mut self.nodes[id.index()]
    }

    /// Append an empty child element and return its id.
    pub fn add_child(&mut self, parent: NodeId, tag: impl Into<String>) -> NodeId {
        let id = NodeId(u32::try_from(self.nodes.len()).expect("markup arena overflow"));
        self.nodes.push(Element::new(tag, Some(parent)));
        self.element_mut(parent).children.push(id);
        id
    }

    /// Append a child element with text content and return its id.
    pub fn add_child_with_text(
        &mut self,
        parent: NodeId,
        tag: impl Into<String>,
        text: impl Into<String>,
    ) -> NodeId {
        let id = self.add_child(parent, tag);
        self.element_mut(id).text = text.into();
        id
    }

    /// Set an attribute. An existing attribute keeps its position and
    /// takes the new value.
    pub fn set_attr(&mut self, node: NodeId, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        let attrs = &mut self.element_mut(node).attrs;
        if let Some(slot) = attrs.iter_mut().find(|(key, _)| *key == name) {
            slot.1 = value;
        } else {
            attrs.push((name, value));
        }
    }

    /// Get an attribute value.
    #[must_use]
    pub fn attr(&self, node: NodeId, name: &str) -> Option<&str> {
        self.element(node).attr(name)
    }

    /// Replace the text content of an element.
    pub fn set_text(&mut self, node: NodeId, text: impl Into<String>) {
        self.element_mut(node).text = text.into();
    }

    pub(crate) fn push_text(&mut self, node: NodeId, text: &str) {
        self.element_mut(node).text.push_str(text);
    }

    pub(crate) fn push_tail(&mut self, node: NodeId, text: &str) {
        self.element_mut(node).tail.push_str(text);
    }

    /// Element text content.
    #[must_use]
    pub fn text(&self, node: NodeId) -> &str {
        &self.element(node).text
    }

    /// Element tag name.
    #[must_use]
    pub fn tag(&self, node: NodeId) -> &str {
        &self.element(node).tag
    }

    /// Child ids of an element.
    #[must_use]
    pub fn children(&self, node: NodeId) -> &[NodeId] {
        &self.element(node).children
    }

    /// Number of direct children.
    #[must_use]
    pub fn child_count(&self, node: NodeId) -> usize {
        self.element(node).children.len()
    }

    /// Parent id, `None` for the root.
    #[must_use]
    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.element(node).parent
    }

    /// Serialize an element and its descendants as HTML.
    #[must_use]
    pub fn to_html(&self, node: NodeId) -> String {
        let mut out = String::with_capacity(256);
        serialize_node(self, node, &mut out);
        out
    }

    /// Serialize an element as a standalone XML document.
    ///
    /// The output starts with an XML declaration and ends with a newline.
    #[must_use]
    pub fn to_document(&self, node: NodeId) -> String {
        serialize_document(self, node)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_document_has_root() {
        let doc = Markup::new("div");

        assert_eq!(doc.len(), 1);
        assert_eq!(doc.tag(doc.root()), "div");
        assert_eq!(doc.parent(doc.root()), None);
    }

    #[test]
    fn test_add_child_preserves_order() {
        let mut doc = Markup::new("ul");
        let root = doc.root();
        let a = doc.add_child_with_text(root, "li", "a");
        let b = doc.add_child_with_text(root, "li", "b");

        assert_eq!(doc.children(root), &[a, b]);
        assert_eq!(doc.parent(b), Some(root));
        assert_eq!(doc.text(a), "a");
    }

    #[test]
    fn test_set_attr_keeps_insertion_order() {
        let mut doc = Markup::new("input");
        let root = doc.root();
        doc.set_attr(root, "id", "foo");
        doc.set_attr(root, "class", "bar");
        doc.set_attr(root, "type", "text");

        let names: Vec<_> = doc
            .element(root)
            .attrs
            .iter()
            .map(|(name, _)| name.as_str())
            .collect();
        assert_eq!(names, vec!["id", "class", "type"]);
    }

    #[test]
    fn test_set_attr_replaces_existing_value_in_place() {
        let mut doc = Markup::new("a");
        let root = doc.root();
        doc.set_attr(root, "href", "/old");
        doc.set_attr(root, "title", "t");
        doc.set_attr(root, "href", "/new");

        assert_eq!(doc.attr(root, "href"), Some("/new"));
        assert_eq!(doc.element(root).attrs[0].0, "href");
        assert_eq!(doc.element(root).attrs.len(), 2);
    }

    #[test]
    fn test_missing_attr_is_none() {
        let doc = Markup::new("a");
        assert_eq!(doc.attr(doc.root(), "href"), None);
    }
}
