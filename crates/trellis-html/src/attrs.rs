//! Element attributes supplied to leaf builders.

use serde_json::Value;

use crate::options::attr_pairs;
use crate::value::scalar_text;

/// Attributes for a leaf element: a single primary value or a full list.
///
/// The meaning of the primary value depends on the builder: it is the
/// `name` of a `<select>` and the primary field (`id` or `name`) of an
/// `<input>`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Attrs {
    /// Shorthand for the builder's primary attribute.
    Primary(String),
    /// Attributes in the order they are written.
    List(Vec<(String, String)>),
}

impl Attrs {
    /// Read attributes from a definition value.
    ///
    /// Mappings become attribute lists; anything else is the primary value.
    #[must_use]
    pub fn from_value(value: &Value) -> Self {
        match value {
            Value::Object(_) => Self::List(attr_pairs(value)),
            other => Self::Primary(scalar_text(other)),
        }
    }

    /// Expand into an attribute list, using `primary` as the shorthand name.
    pub(crate) fn into_list(self, primary: &str) -> Vec<(String, String)> {
        match self {
            Self::Primary(value) => vec![(primary.to_owned(), value)],
            Self::List(list) => list,
        }
    }
}

impl From<&str> for Attrs {
    fn from(value: &str) -> Self {
        Self::Primary(value.to_owned())
    }
}

impl From<String> for Attrs {
    fn from(value: String) -> Self {
        Self::Primary(value)
    }
}

impl From<Vec<(String, String)>> for Attrs {
    fn from(list: Vec<(String, String)>) -> Self {
        Self::List(list)
    }
}

impl<const N: usize> From<[(&str, &str); N]> for Attrs {
    fn from(list: [(&str, &str); N]) -> Self {
        Self::List(
            list.into_iter()
                .map(|(name, value)| (name.to_owned(), value.to_owned()))
                .collect(),
        )
    }
}

/// Look up an attribute in a list.
pub(crate) fn find_attr<'a>(attrs: &'a [(String, String)], name: &str) -> Option<&'a str> {
    attrs
        .iter()
        .find(|(key, _)| key == name)
        .map(|(_, value)| value.as_str())
}

/// Whether an attribute is present in a list.
pub(crate) fn has_attr(attrs: &[(String, String)], name: &str) -> bool {
    find_attr(attrs, name).is_some()
}
