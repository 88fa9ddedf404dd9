//! Output finishing: turning a compiled tree into the caller's format.

use std::sync::LazyLock;

use regex::Regex;

use crate::node::Markup;

/// Leading XML declaration plus the whitespace after it.
static DECLARATION_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<\?xml .*?\?>\s*").expect("invalid declaration regex"));

/// Output options shared by every builder.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct OutputOptions {
    /// Return the tree itself instead of its serialized form.
    pub raw: bool,
    /// Trim surrounding whitespace from the serialized form.
    pub trim: bool,
}

impl OutputOptions {
    /// Options producing trimmed HTML.
    #[must_use]
    pub fn trimmed() -> Self {
        Self {
            raw: false,
            trim: true,
        }
    }

    /// Options producing the tree.
    #[must_use]
    pub fn raw() -> Self {
        Self {
            raw: true,
            trim: false,
        }
    }
}

/// A finished render.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Rendered {
    /// The markup tree (`raw` output).
    Tree(Markup),
    /// Serialized HTML.
    Html(String),
}

impl Rendered {
    /// Borrow the serialized HTML, if this is not a tree.
    #[must_use]
    pub fn as_html(&self) -> Option<&str> {
        match self {
            Self::Html(html) => Some(html),
            Self::Tree(_) => None,
        }
    }

    /// Take the serialized HTML, serializing the tree if needed.
    #[must_use]
    pub fn into_html(self) -> String {
        match self {
            Self::Html(html) => html,
            Self::Tree(markup) => markup.to_html(markup.root()),
        }
    }

    /// Take the tree, if this is raw output.
    #[must_use]
    pub fn into_tree(self) -> Option<Markup> {
        match self {
            Self::Tree(markup) => Some(markup),
            Self::Html(_) => None,
        }
    }
}

/// Finish a compiled tree according to the output options.
///
/// Raw output returns the tree untouched. Otherwise the root is serialized
/// as a document, the XML declaration is removed, and surrounding whitespace
/// is trimmed on request. Without `trim` the trailing newline is kept.
#[must_use]
pub fn finish(markup: Markup, options: OutputOptions) -> Rendered {
    if options.raw {
        return Rendered::Tree(markup);
    }

    let document = markup.to_document(markup.root());
    let html = DECLARATION_PATTERN.replace(&document, "");
    let html = if options.trim {
        html.trim().to_owned()
    } else {
        html.into_owned()
    };
    Rendered::Html(html)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Markup {
        let mut doc = Markup::new("ul");
        let root = doc.root();
        doc.add_child_with_text(root, "li", "first");
        doc
    }

    #[test]
    fn test_finish_keeps_trailing_newline_without_trim() {
        let rendered = finish(sample(), OutputOptions::default());

        assert_eq!(rendered.as_html(), Some("<ul><li>first</li></ul>\n"));
    }

    #[test]
    fn test_finish_trims_when_requested() {
        let rendered = finish(sample(), OutputOptions::trimmed());

        assert_eq!(rendered.as_html(), Some("<ul><li>first</li></ul>"));
    }

    #[test]
    fn test_finish_raw_returns_tree() {
        let rendered = finish(sample(), OutputOptions::raw());

        let tree = rendered.into_tree().unwrap();
        assert_eq!(tree.tag(tree.root()), "ul");
        assert_eq!(tree.child_count(tree.root()), 1);
    }

    #[test]
    fn test_into_html_serializes_tree() {
        let rendered = Rendered::Tree(sample());

        assert_eq!(rendered.into_html(), "<ul><li>first</li></ul>");
    }
}
