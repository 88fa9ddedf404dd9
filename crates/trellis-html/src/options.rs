//! Typed compiler options and overlay merging.
//!
//! Every option is optional so that overlays can tell "unset" apart from a
//! value, including an explicitly empty list. [`MenuOptions::overlay`] and
//! [`ListOptions::overlay`] merge shallowly: the overlay wins for every
//! option it defines and the outer options fill the gaps.

use std::fmt;
use std::str::FromStr;

use serde_json::Value;
use trellis_config::{ListConfig, MenuConfig};

use crate::rules::{BuildRule, Handler, ShowRule};
use crate::value::{as_integer, scalar_text};

/// Default menu container markup.
pub const DEFAULT_MENU_ROOT: &str = r#"<div class="menu"/>"#;

/// Icon placement relative to the item label.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum IconPosition {
    /// Icon precedes the label (`0`).
    #[default]
    Before,
    /// Icon follows the label (`1`).
    After,
}

impl IconPosition {
    /// Map the numeric form (`0` or `1`).
    #[must_use]
    pub fn from_index(index: i64) -> Option<Self> {
        match index {
            0 => Some(Self::Before),
            1 => Some(Self::After),
            _ => None,
        }
    }
}

/// List element type.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ListType {
    /// Unordered list.
    #[default]
    Ul,
    /// Ordered list.
    Ol,
}

impl ListType {
    /// Element name.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Ul => "ul",
            Self::Ol => "ol",
        }
    }

    /// Recognize a sub-list marker key.
    #[must_use]
    pub fn from_key(key: &str) -> Option<Self> {
        key.parse().ok()
    }
}

impl FromStr for ListType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ul" => Ok(Self::Ul),
            "ol" => Ok(Self::Ol),
            other => Err(format!("unknown list type: {other}")),
        }
    }
}

impl fmt::Display for ListType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// List compiler options.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ListOptions {
    /// List element type; `ul` when unset.
    pub list_type: Option<ListType>,
}

impl ListOptions {
    /// Options for a given list type.
    #[must_use]
    pub fn of_type(list_type: ListType) -> Self {
        Self {
            list_type: Some(list_type),
        }
    }

    /// Build from the `[list]` config section.
    #[must_use]
    pub fn from_config(config: &ListConfig) -> Self {
        Self {
            list_type: ListType::from_key(&config.list_type),
        }
    }

    /// Merge `overlay` over `self`.
    #[must_use]
    pub fn overlay(&self, overlay: &Self) -> Self {
        Self {
            list_type: overlay.list_type.or(self.list_type),
        }
    }

    /// The effective list type.
    #[must_use]
    pub fn resolved_type(&self) -> ListType {
        self.list_type.unwrap_or_default()
    }
}

/// Menu compiler options.
///
/// Rule lists keep their insertion order, which is the order rules are
/// consulted in.
#[derive(Clone, Debug, Default)]
pub struct MenuOptions {
    /// Container markup parsed by [`crate::MenuCompiler::compile`].
    pub root: Option<String>,
    /// Container element created by [`crate::MenuCompiler::compile_into`].
    pub element: Option<String>,
    /// Attributes of a created container.
    pub attrs: Option<Vec<(String, String)>>,
    /// Wrapper element for each item; bare anchors when unset or `a`.
    pub item_el: Option<String>,
    /// Label element inside each anchor.
    pub inner_el: Option<String>,
    /// Icon element name.
    pub icon_el: Option<String>,
    /// Class appended to every icon.
    pub icon_class: Option<String>,
    /// Icon placement.
    pub icon_pos: Option<IconPosition>,
    /// Class for the current item.
    pub current_class: Option<String>,
    /// Class for every default-built item.
    pub item_class: Option<String>,
    /// Element used for builder labels.
    pub label_class: Option<String>,
    /// Class attribute of the inner label element.
    pub inner_class: Option<String>,
    /// Show rules.
    pub show: Option<Vec<(String, ShowRule)>>,
    /// Builder rules.
    pub builders: Option<Vec<(String, BuildRule)>>,
    /// Post-build handlers.
    pub handlers: Option<Vec<(String, Handler)>>,
}

impl MenuOptions {
    /// Create empty options.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a show rule.
    #[must_use]
    pub fn with_show(mut self, key: impl Into<String>, rule: ShowRule) -> Self {
        self.show.get_or_insert_default().push((key.into(), rule));
        self
    }

    /// Add a builder rule.
    #[must_use]
    pub fn with_builder(mut self, key: impl Into<String>, rule: BuildRule) -> Self {
        self.builders
            .get_or_insert_default()
            .push((key.into(), rule));
        self
    }

    /// Add a handler.
    #[must_use]
    pub fn with_handler(mut self, key: impl Into<String>, handler: Handler) -> Self {
        self.handlers
            .get_or_insert_default()
            .push((key.into(), handler));
        self
    }

    /// Build from the `[menu]` config section.
    #[must_use]
    pub fn from_config(config: &MenuConfig) -> Self {
        Self {
            root: config.root.clone(),
            item_el: config.item_el.clone(),
            inner_el: config.inner_el.clone(),
            icon_el: config.icon_el.clone(),
            icon_class: config.icon_class.clone(),
            icon_pos: config
                .icon_pos
                .and_then(|pos| IconPosition::from_index(i64::from(pos))),
            current_class: config.current_class.clone(),
            item_class: config.item_class.clone(),
            label_class: config.label_class.clone(),
            inner_class: config.inner_class.clone(),
            ..Self::default()
        }
    }

    /// Parse a `submenu` overlay from a definition mapping.
    ///
    /// Only literal options are recognized: callbacks cannot be written in
    /// a definition, so `show` entries become literal rules and `builders`
    /// entries become label rules.
    #[must_use]
    pub fn from_value(value: &Value) -> Self {
        let mut options = Self::default();
        let Value::Object(map) = value else {
            tracing::debug!("Ignoring submenu options that are not a mapping");
            return options;
        };

        for (key, value) in map {
            if value.is_null() {
                continue;
            }
            let text = || Some(scalar_text(value));
            match key.as_str() {
                "root" => options.root = text(),
                "element" => options.element = text(),
                "attrs" => options.attrs = Some(attr_pairs(value)),
                "item_el" => options.item_el = text(),
                "inner_el" => options.inner_el = text(),
                "icon_el" => options.icon_el = text(),
                "icon_class" => options.icon_class = text(),
                "icon_pos" => {
                    options.icon_pos = as_integer(value).and_then(IconPosition::from_index);
                }
                "current_class" => options.current_class = text(),
                "item_class" => options.item_class = text(),
                "label_class" => options.label_class = text(),
                "inner_class" => options.inner_class = text(),
                "show" => {
                    options.show = Some(
                        object_pairs(value)
                            .map(|(rule_key, literal)| (rule_key, ShowRule::Literal(literal.clone())))
                            .collect(),
                    );
                }
                "builders" => {
                    options.builders = Some(
                        object_pairs(value)
                            .map(|(rule_key, label)| (rule_key, BuildRule::Label(scalar_text(label))))
                            .collect(),
                    );
                }
                other => tracing::trace!(option = other, "Ignoring unknown submenu option"),
            }
        }
        options
    }

    /// Merge `overlay` over `self`.
    ///
    /// Each option the overlay defines replaces the outer one whole. An
    /// empty rule list or attribute list is defined and clears the outer one.
    #[must_use]
    pub fn overlay(&self, overlay: &Self) -> Self {
        fn pick<T: Clone>(overlay: Option<&T>, outer: Option<&T>) -> Option<T> {
            overlay.or(outer).cloned()
        }

        Self {
            root: pick(overlay.root.as_ref(), self.root.as_ref()),
            element: pick(overlay.element.as_ref(), self.element.as_ref()),
            attrs: pick(overlay.attrs.as_ref(), self.attrs.as_ref()),
            item_el: pick(overlay.item_el.as_ref(), self.item_el.as_ref()),
            inner_el: pick(overlay.inner_el.as_ref(), self.inner_el.as_ref()),
            icon_el: pick(overlay.icon_el.as_ref(), self.icon_el.as_ref()),
            icon_class: pick(overlay.icon_class.as_ref(), self.icon_class.as_ref()),
            icon_pos: overlay.icon_pos.or(self.icon_pos),
            current_class: pick(overlay.current_class.as_ref(), self.current_class.as_ref()),
            item_class: pick(overlay.item_class.as_ref(), self.item_class.as_ref()),
            label_class: pick(overlay.label_class.as_ref(), self.label_class.as_ref()),
            inner_class: pick(overlay.inner_class.as_ref(), self.inner_class.as_ref()),
            show: pick(overlay.show.as_ref(), self.show.as_ref()),
            builders: pick(overlay.builders.as_ref(), self.builders.as_ref()),
            handlers: pick(overlay.handlers.as_ref(), self.handlers.as_ref()),
        }
    }

    pub(crate) fn attr_list(&self) -> &[(String, String)] {
        self.attrs.as_deref().unwrap_or_default()
    }

    pub(crate) fn show_rules(&self) -> &[(String, ShowRule)] {
        self.show.as_deref().unwrap_or_default()
    }

    pub(crate) fn build_rules(&self) -> &[(String, BuildRule)] {
        self.builders.as_deref().unwrap_or_default()
    }

    pub(crate) fn handler_rules(&self) -> &[(String, Handler)] {
        self.handlers.as_deref().unwrap_or_default()
    }

    pub(crate) fn root_markup(&self) -> &str {
        self.root.as_deref().unwrap_or(DEFAULT_MENU_ROOT)
    }

    pub(crate) fn element_name(&self) -> &str {
        self.element.as_deref().unwrap_or("div")
    }

    /// Wrapper element, lowercased; `None` means bare anchors.
    pub(crate) fn wrapper(&self) -> Option<String> {
        self.item_el
            .as_deref()
            .map(str::to_lowercase)
            .filter(|name| name != "a")
    }

    pub(crate) fn inner(&self) -> Option<String> {
        self.inner_el.as_deref().map(str::to_lowercase)
    }

    pub(crate) fn icon_element(&self) -> &str {
        self.icon_el.as_deref().unwrap_or("i")
    }

    pub(crate) fn icon_class_name(&self) -> &str {
        self.icon_class.as_deref().unwrap_or("icon")
    }

    pub(crate) fn current_class_name(&self) -> &str {
        self.current_class.as_deref().unwrap_or("current")
    }

    pub(crate) fn label_element(&self) -> &str {
        self.label_class.as_deref().unwrap_or("span")
    }
}

fn object_pairs(value: &Value) -> impl Iterator<Item = (String, &Value)> {
    value
        .as_object()
        .into_iter()
        .flat_map(|map| map.iter().map(|(key, value)| (key.clone(), value)))
}

/// Parse an attribute mapping into ordered pairs.
pub(crate) fn attr_pairs(value: &Value) -> Vec<(String, String)> {
    object_pairs(value)
        .map(|(key, value)| (key, scalar_text(value)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_list_type_parse() {
        assert_eq!("ol".parse::<ListType>(), Ok(ListType::Ol));
        assert!("dl".parse::<ListType>().is_err());
        assert_eq!(ListType::from_key("ul"), Some(ListType::Ul));
    }

    #[test]
    fn test_list_overlay() {
        let outer = ListOptions::of_type(ListType::Ol);

        assert_eq!(outer.overlay(&ListOptions::default()).resolved_type(), ListType::Ol);
        assert_eq!(
            outer.overlay(&ListOptions::of_type(ListType::Ul)).resolved_type(),
            ListType::Ul
        );
        assert_eq!(ListOptions::default().resolved_type(), ListType::Ul);
    }

    #[test]
    fn test_overlay_wins_and_outer_fills_gaps() {
        let outer = MenuOptions {
            item_el: Some("li".to_owned()),
            current_class: Some("active".to_owned()),
            ..MenuOptions::default()
        };
        let overlay = MenuOptions {
            item_el: Some("div".to_owned()),
            element: Some("ul".to_owned()),
            ..MenuOptions::default()
        };

        let merged = outer.overlay(&overlay);

        assert_eq!(merged.item_el.as_deref(), Some("div"));
        assert_eq!(merged.element.as_deref(), Some("ul"));
        assert_eq!(merged.current_class.as_deref(), Some("active"));
    }

    #[test]
    fn test_overlay_replaces_rule_lists_whole() {
        let outer = MenuOptions::new()
            .with_show("a", ShowRule::literal(1))
            .with_show("b", ShowRule::literal(2));
        let overlay = MenuOptions::new().with_show("c", ShowRule::literal(3));

        let merged = outer.overlay(&overlay);
        let keys: Vec<_> = merged.show_rules().iter().map(|(key, _)| key.as_str()).collect();

        assert_eq!(keys, vec!["c"]);
        assert_eq!(outer.overlay(&MenuOptions::new()).show_rules().len(), 2);
    }

    #[test]
    fn test_overlay_explicit_empty_lists_clear_outer() {
        let outer = MenuOptions {
            attrs: Some(vec![("id".to_owned(), "outer".to_owned())]),
            ..MenuOptions::new().with_show("a", ShowRule::literal(1))
        };
        let overlay = MenuOptions::from_value(&json!({"attrs": {}, "show": {}}));

        let merged = outer.overlay(&overlay);

        assert_eq!(merged.attrs, Some(Vec::new()));
        assert!(merged.show_rules().is_empty());
        assert_eq!(outer.overlay(&MenuOptions::new()).attr_list().len(), 1);
    }

    #[test]
    fn test_from_value_parses_literal_options() {
        let value = json!({
            "element": "ul",
            "attrs": {"class": "sub", "data-level": 2},
            "item_el": "li",
            "icon_pos": 1,
            "show": {"role": "admin"},
            "builders": {"divider": "menu.divider"},
            "unknown": true
        });

        let options = MenuOptions::from_value(&value);

        assert_eq!(options.element.as_deref(), Some("ul"));
        assert_eq!(
            options.attr_list(),
            [
                ("class".to_owned(), "sub".to_owned()),
                ("data-level".to_owned(), "2".to_owned()),
            ]
        );
        assert_eq!(options.icon_pos, Some(IconPosition::After));
        assert_eq!(options.show_rules().len(), 1);
        assert!(matches!(&options.build_rules()[0].1, BuildRule::Label(key) if key == "menu.divider"));
        assert!(options.handlers.is_none());
    }

    #[test]
    fn test_from_config() {
        let config = MenuConfig {
            item_el: Some("li".to_owned()),
            icon_pos: Some(1),
            ..MenuConfig::default()
        };

        let options = MenuOptions::from_config(&config);

        assert_eq!(options.item_el.as_deref(), Some("li"));
        assert_eq!(options.icon_pos, Some(IconPosition::After));
    }

    #[test]
    fn test_wrapper_ignores_anchor_and_lowercases() {
        let mut options = MenuOptions::new();
        assert_eq!(options.wrapper(), None);

        options.item_el = Some("A".to_owned());
        assert_eq!(options.wrapper(), None);

        options.item_el = Some("LI".to_owned());
        assert_eq!(options.wrapper().as_deref(), Some("li"));
    }
}
