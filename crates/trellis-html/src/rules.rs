//! Menu extensibility rules: show filters, item builders, and handlers.
//!
//! Each rule is bound to a definition key and only consulted for items on
//! which that key is set.

use std::fmt;
use std::sync::Arc;

use serde_json::Value;
use trellis_markup::{Markup, NodeId};

use crate::context::NavContext;
use crate::value::{get_set, loose_eq};

/// Error returned by a rule callback.
pub type RuleError = Box<dyn std::error::Error + Send + Sync>;

/// Show predicate: `(item, key, ctx) -> keep?`.
pub type PredicateFn =
    dyn Fn(&Value, &str, &NavContext<'_>) -> Result<bool, RuleError> + Send + Sync;

/// Item builder: `(item, key, ctx, doc, container) -> item node`.
pub type BuilderFn = dyn Fn(&Value, &str, &NavContext<'_>, &mut Markup, NodeId) -> Result<NodeId, RuleError>
    + Send
    + Sync;

/// Post-build handler: `(item, key, ctx, doc, built)`.
pub type HandlerFn =
    dyn Fn(&Value, &str, &NavContext<'_>, &mut Markup, BuiltItem) -> Result<(), RuleError> + Send + Sync;

/// Nodes produced for a single menu item.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BuiltItem {
    /// The item node (wrapper, anchor, builder result, or sub-container).
    pub item: NodeId,
    /// The anchor inside a wrapper element; `None` for bare anchors, where
    /// `item` is the anchor.
    pub link: Option<NodeId>,
    /// The inner label element, when `inner_el` is in use.
    pub inner: Option<NodeId>,
}

impl BuiltItem {
    pub(crate) fn bare(item: NodeId) -> Self {
        Self {
            item,
            link: None,
            inner: None,
        }
    }
}

/// Filter deciding whether an item is rendered.
#[derive(Clone)]
pub enum ShowRule {
    /// Callback returning whether to keep the item.
    Predicate(Arc<PredicateFn>),
    /// The item's value for the rule key must loosely equal this value.
    Literal(Value),
}

impl ShowRule {
    /// Wrap a predicate callback.
    pub fn predicate<F>(predicate: F) -> Self
    where
        F: Fn(&Value, &str, &NavContext<'_>) -> Result<bool, RuleError> + Send + Sync + 'static,
    {
        Self::Predicate(Arc::new(predicate))
    }

    /// Require a literal value.
    pub fn literal(value: impl Into<Value>) -> Self {
        Self::Literal(value.into())
    }

    /// Evaluate the rule for an item on which `rule_key` is set.
    pub(crate) fn allows(
        &self,
        item: &Value,
        rule_key: &str,
        entry_key: &str,
        ctx: &NavContext<'_>,
    ) -> Result<bool, RuleError> {
        match self {
            Self::Predicate(predicate) => predicate(item, entry_key, ctx),
            Self::Literal(expected) => {
                Ok(get_set(item, rule_key).is_some_and(|actual| loose_eq(actual, expected)))
            }
        }
    }
}

impl fmt::Debug for ShowRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Predicate(_) => f.write_str("ShowRule::Predicate(..)"),
            Self::Literal(value) => f.debug_tuple("ShowRule::Literal").field(value).finish(),
        }
    }
}

/// Replacement for the default item construction.
#[derive(Clone)]
pub enum BuildRule {
    /// Callback that builds the item under the container.
    Callback(Arc<BuilderFn>),
    /// Translation key for a label element added under the container.
    Label(String),
}

impl BuildRule {
    /// Wrap a builder callback.
    pub fn callback<F>(builder: F) -> Self
    where
        F: Fn(&Value, &str, &NavContext<'_>, &mut Markup, NodeId) -> Result<NodeId, RuleError>
            + Send
            + Sync
            + 'static,
    {
        Self::Callback(Arc::new(builder))
    }

    /// Build a translated label.
    pub fn label(key: impl Into<String>) -> Self {
        Self::Label(key.into())
    }
}

impl fmt::Debug for BuildRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Callback(_) => f.write_str("BuildRule::Callback(..)"),
            Self::Label(key) => f.debug_tuple("BuildRule::Label").field(key).finish(),
        }
    }
}

/// Callback run after an item is built.
#[derive(Clone)]
pub struct Handler(Arc<HandlerFn>);

impl Handler {
    /// Wrap a handler callback.
    pub fn new<F>(handler: F) -> Self
    where
        F: Fn(&Value, &str, &NavContext<'_>, &mut Markup, BuiltItem) -> Result<(), RuleError>
            + Send
            + Sync
            + 'static,
    {
        Self(Arc::new(handler))
    }

    pub(crate) fn run(
        &self,
        item: &Value,
        entry_key: &str,
        ctx: &NavContext<'_>,
        doc: &mut Markup,
        built: BuiltItem,
    ) -> Result<(), RuleError> {
        (self.0)(item, entry_key, ctx, doc, built)
    }
}

impl fmt::Debug for Handler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Handler(..)")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::StaticRouter;
    use serde_json::json;

    #[test]
    fn test_literal_rule_uses_loose_equality() {
        let router = StaticRouter::new();
        let ctx = NavContext::new(&router);
        let item = json!({"level": "2"});

        assert!(ShowRule::literal(2).allows(&item, "level", "x", &ctx).unwrap());
        assert!(!ShowRule::literal(3).allows(&item, "level", "x", &ctx).unwrap());
    }

    #[test]
    fn test_predicate_receives_entry_key() {
        let router = StaticRouter::new();
        let ctx = NavContext::new(&router);
        let rule = ShowRule::predicate(|_, key, _| Ok(key == "admin"));

        assert!(rule.allows(&json!({}), "secure", "admin", &ctx).unwrap());
        assert!(!rule.allows(&json!({}), "secure", "home", &ctx).unwrap());
    }

    #[test]
    fn test_predicate_error_is_returned() {
        let router = StaticRouter::new();
        let ctx = NavContext::new(&router);
        let rule = ShowRule::predicate(|_, _, _| Err("denied".into()));

        let err = rule.allows(&json!({}), "secure", "0", &ctx).unwrap_err();
        assert_eq!(err.to_string(), "denied");
    }
}
