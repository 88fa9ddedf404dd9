//! Nested `<ul>`/`<ol>` compilation from loosely-shaped definitions.
//!
//! Each raw entry is classified once into a [`ListEntry`] and then
//! dispatched. The most recently created `<li>` is tracked by a cursor that
//! is local to each (recursive) call.

use serde_json::Value;
use trellis_markup::{Markup, NodeId};

use crate::options::ListType;
use crate::value::{EntryKey, entries, is_structured, scalar_text};

/// A classified list entry.
#[derive(Debug, PartialEq)]
pub enum ListEntry<'a> {
    /// Positional scalar: a new item with this text.
    ScalarItem(String),
    /// Positional mapping/array: attributes and inline sub-lists.
    AttributeMap(Vec<AttrEntry<'a>>),
    /// Named mapping/array: a new item titled by the key with a nested list.
    NamedSubList {
        /// Item text.
        name: &'a str,
        /// Nested list definition.
        items: &'a Value,
    },
    /// Named scalar: a new item titled by the key with a `class`.
    NamedClassItem {
        /// Item text.
        name: &'a str,
        /// Class attribute.
        class: String,
    },
}

/// A pair inside an [`ListEntry::AttributeMap`].
#[derive(Debug, PartialEq)]
pub enum AttrEntry<'a> {
    /// Attribute for the current item, or the container if there is none.
    Attribute {
        /// Attribute name.
        name: String,
        /// Attribute value.
        value: String,
    },
    /// Nested list attached to the current item.
    InlineSubList {
        /// Nested list type.
        list_type: ListType,
        /// Nested list definition.
        items: &'a Value,
    },
}

impl<'a> ListEntry<'a> {
    /// Classify a raw `(key, value)` entry.
    #[must_use]
    pub fn classify(key: EntryKey<'a>, value: &'a Value) -> Self {
        match (key, is_structured(value)) {
            (EntryKey::Position(_), false) => Self::ScalarItem(scalar_text(value)),
            (EntryKey::Position(_), true) => Self::AttributeMap(
                entries(value)
                    .into_iter()
                    .map(|(sub_key, sub_value)| AttrEntry::classify(sub_key, sub_value))
                    .collect(),
            ),
            (EntryKey::Name(name), true) => Self::NamedSubList { name, items: value },
            (EntryKey::Name(name), false) => Self::NamedClassItem {
                name,
                class: scalar_text(value),
            },
        }
    }
}

impl<'a> AttrEntry<'a> {
    /// Classify a pair from an attribute map.
    #[must_use]
    pub fn classify(key: EntryKey<'a>, value: &'a Value) -> Self {
        let marker = key.name().and_then(ListType::from_key);
        match marker {
            Some(list_type) if is_structured(value) => Self::InlineSubList {
                list_type,
                items: value,
            },
            _ => Self::Attribute {
                name: key.as_text().into_owned(),
                value: scalar_text(value),
            },
        }
    }
}

/// Compiles list definitions into `<ul>`/`<ol>` trees.
#[derive(Clone, Copy, Debug, Default)]
pub struct ListCompiler;

impl ListCompiler {
    /// Create a list compiler.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Compile a definition into a new document rooted at the list element.
    #[must_use]
    pub fn compile(&self, def: &Value, list_type: ListType) -> Markup {
        let mut doc = Markup::new(list_type.as_str());
        let root = doc.root();
        self.fill(&mut doc, root, def, list_type);
        doc
    }

    /// Compile a definition into a new list element under `parent`.
    pub fn compile_into(
        &self,
        doc: &mut Markup,
        parent: NodeId,
        def: &Value,
        list_type: ListType,
    ) -> NodeId {
        let list = doc.add_child(parent, list_type.as_str());
        self.fill(doc, list, def, list_type);
        list
    }

    fn fill(&self, doc: &mut Markup, list: NodeId, def: &Value, list_type: ListType) {
        if !is_structured(def) {
            tracing::debug!("List definition is not an array or mapping, leaving list empty");
            return;
        }

        let mut current: Option<NodeId> = None;

        for (key, value) in entries(def) {
            match ListEntry::classify(key, value) {
                ListEntry::ScalarItem(text) => {
                    current = Some(doc.add_child_with_text(list, "li", text));
                }
                ListEntry::AttributeMap(pairs) => {
                    for pair in pairs {
                        current = self.apply_attr_entry(doc, list, current, pair);
                    }
                }
                ListEntry::NamedSubList { name, items } => {
                    let item = doc.add_child_with_text(list, "li", name);
                    self.compile_into(doc, item, items, list_type);
                    current = Some(item);
                }
                ListEntry::NamedClassItem { name, class } => {
                    let item = doc.add_child_with_text(list, "li", name);
                    doc.set_attr(item, "class", class);
                    current = Some(item);
                }
            }
        }
    }

    /// Apply one attribute-map pair and return the updated cursor.
    fn apply_attr_entry(
        &self,
        doc: &mut Markup,
        list: NodeId,
        current: Option<NodeId>,
        pair: AttrEntry<'_>,
    ) -> Option<NodeId> {
        match pair {
            AttrEntry::InlineSubList { list_type, items } => {
                let item = current.unwrap_or_else(|| doc.add_child(list, "li"));
                self.compile_into(doc, item, items, list_type);
                Some(item)
            }
            AttrEntry::Attribute { name, value } => {
                doc.set_attr(current.unwrap_or(list), name, value);
                current
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn render(def: &Value, list_type: ListType) -> String {
        let doc = ListCompiler::new().compile(def, list_type);
        doc.to_html(doc.root())
    }

    #[test]
    fn test_basic_list() {
        assert_eq!(
            render(&json!(["first", "second"]), ListType::Ul),
            "<ul><li>first</li><li>second</li></ul>"
        );
    }

    #[test]
    fn test_leading_attributes_apply_to_container() {
        assert_eq!(
            render(&json!([{"id": "test"}, "first", "second"]), ListType::Ul),
            r#"<ul id="test"><li>first</li><li>second</li></ul>"#
        );
    }

    #[test]
    fn test_attributes_after_item_apply_to_item() {
        assert_eq!(
            render(&json!(["first", {"id": "f"}, "second"]), ListType::Ul),
            r#"<ul><li id="f">first</li><li>second</li></ul>"#
        );
    }

    #[test]
    fn test_named_scalar_becomes_class() {
        assert_eq!(
            render(&json!({"0": "first", "third": "added"}), ListType::Ul),
            r#"<ul><li>first</li><li class="added">third</li></ul>"#
        );
    }

    #[test]
    fn test_anonymous_inline_sub_list() {
        assert_eq!(
            render(&json!([{"ol": ["one", "two"]}, "first"]), ListType::Ul),
            "<ul><li><ol><li>one</li><li>two</li></ol></li><li>first</li></ul>"
        );
    }

    #[test]
    fn test_inline_sub_list_attaches_to_current_item() {
        assert_eq!(
            render(&json!(["second", {"ol": ["two", "one"]}]), ListType::Ul),
            "<ul><li>second<ol><li>two</li><li>one</li></ol></li></ul>"
        );
    }

    #[test]
    fn test_marker_with_scalar_value_is_attribute() {
        assert_eq!(
            render(&json!(["a", {"ul": "x"}]), ListType::Ul),
            r#"<ul><li ul="x">a</li></ul>"#
        );
    }

    #[test]
    fn test_full_sequence_ul() {
        let def = json!({
            "0": {"id": "test"},
            "1": {"ol": ["one", "two"]},
            "2": "first",
            "3": {"id": "f"},
            "4": "second",
            "5": {"ol": ["two", "one"]},
            "third": "added",
            "last": ["a", "b"]
        });

        assert_eq!(
            render(&def, ListType::Ul),
            concat!(
                r#"<ul id="test"><li><ol><li>one</li><li>two</li></ol></li>"#,
                r#"<li id="f">first</li><li>second<ol><li>two</li><li>one</li></ol></li>"#,
                r#"<li class="added">third</li><li>last<ul><li>a</li><li>b</li></ul></li></ul>"#
            )
        );
    }

    #[test]
    fn test_full_sequence_ol_swaps_types() {
        let def = json!({
            "0": {"id": "test"},
            "1": {"ul": ["one", "two"]},
            "2": "first",
            "3": {"id": "f"},
            "4": "second",
            "5": {"ul": ["two", "one"]},
            "third": "added",
            "last": ["a", "b"]
        });

        assert_eq!(
            render(&def, ListType::Ol),
            concat!(
                r#"<ol id="test"><li><ul><li>one</li><li>two</li></ul></li>"#,
                r#"<li id="f">first</li><li>second<ul><li>two</li><li>one</li></ul></li>"#,
                r#"<li class="added">third</li><li>last<ol><li>a</li><li>b</li></ol></li></ol>"#
            )
        );
    }

    #[test]
    fn test_sibling_order_matches_input() {
        let def = json!(["c", "a", "b", "d"]);
        let doc = ListCompiler::new().compile(&def, ListType::Ul);

        let texts: Vec<_> = doc
            .children(doc.root())
            .iter()
            .map(|&li| doc.text(li).to_owned())
            .collect();

        assert_eq!(texts, vec!["c", "a", "b", "d"]);
    }

    #[test]
    fn test_compile_into_existing_parent() {
        let mut doc = Markup::new("div");
        let root = doc.root();

        let list = ListCompiler::new().compile_into(&mut doc, root, &json!(["x"]), ListType::Ol);

        assert_eq!(doc.parent(list), Some(root));
        assert_eq!(doc.to_html(root), "<div><ol><li>x</li></ol></div>");
    }

    #[test]
    fn test_scalar_rendering() {
        assert_eq!(
            render(&json!([1, true, false, null]), ListType::Ul),
            "<ul><li>1</li><li>1</li><li></li><li></li></ul>"
        );
    }

    #[test]
    fn test_classify_entries() {
        let value = json!({"ol": ["x"], "id": "a"});
        let ListEntry::AttributeMap(pairs) = ListEntry::classify(EntryKey::Position(0), &value)
        else {
            panic!("expected attribute map");
        };

        assert!(matches!(
            pairs[0],
            AttrEntry::InlineSubList {
                list_type: ListType::Ol,
                ..
            }
        ));
        assert_eq!(
            pairs[1],
            AttrEntry::Attribute {
                name: "id".to_owned(),
                value: "a".to_owned()
            }
        );
    }

    #[test]
    fn test_idempotent_output() {
        let def = json!([{"class": "nav"}, "a", {"ul": ["b"]}]);

        assert_eq!(render(&def, ListType::Ul), render(&def, ListType::Ul));
    }
}
