//! Ordered markup tree used as the output of the Trellis compilers.
//!
//! A [`Markup`] document is an arena of elements addressed by [`NodeId`].
//! Compilers append children, set attributes, and keep several handles
//! into the same tree at once (an item wrapper, its link, its label)
//! without fighting the borrow checker.
//!
//! # Example
//!
//! ```
//! use trellis_markup::Markup;
//!
//! let mut doc = Markup::new("ul");
//! let root = doc.root();
//! let li = doc.add_child_with_text(root, "li", "first");
//! doc.set_attr(li, "class", "active");
//!
//! assert_eq!(doc.to_html(root), r#"<ul><li class="active">first</li></ul>"#);
//! ```

mod entities;
mod error;
mod node;
mod output;
mod parser;
mod serializer;

pub use entities::{decode_entities, decode_special_chars};
pub use error::MarkupError;
pub use node::{Element, Markup, NodeId};
pub use output::{OutputOptions, Rendered, finish};
pub use serializer::{escape_attr, escape_text, is_void_element};
