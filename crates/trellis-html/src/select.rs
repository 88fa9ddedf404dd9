//! `<select>` construction and option selection matching.

use serde_json::Value;
use trellis_config::SelectConfig;
use trellis_markup::Markup;

use crate::attrs::{Attrs, find_attr, has_attr};
use crate::translate::Translator;
use crate::value::{EntryKey, as_integer, entries, get_set, loose_eq, scalar_text};

/// Options for [`build_select`].
#[derive(Clone, Debug, PartialEq)]
pub struct SelectOptions {
    /// The selected value, or a mapping from select `id`/`name` to it.
    pub selected: Option<Value>,
    /// Treat the selected value as a bitmask.
    pub mask: bool,
    /// Copy `name` into a missing `id`.
    pub id: bool,
    /// Translation prefix for option labels.
    pub ns: Option<String>,
    /// Translation prefix for option tooltips.
    pub ttns: Option<String>,
    /// Label key for complex option entries.
    pub labelkey: String,
    /// Value key for complex option entries.
    pub valuekey: String,
    /// Disable translation even when a translator is attached.
    pub translate: bool,
}

impl Default for SelectOptions {
    fn default() -> Self {
        Self {
            selected: None,
            mask: false,
            id: false,
            ns: None,
            ttns: None,
            labelkey: "text".to_owned(),
            valuekey: "id".to_owned(),
            translate: true,
        }
    }
}

impl SelectOptions {
    /// Build from the `[select]` config section.
    #[must_use]
    pub fn from_config(config: &SelectConfig) -> Self {
        Self {
            mask: config.mask,
            id: config.id,
            ns: config.ns.clone(),
            ttns: config.ttns.clone(),
            labelkey: config.labelkey.clone(),
            valuekey: config.valuekey.clone(),
            ..Self::default()
        }
    }

    /// Set the selected value.
    #[must_use]
    pub fn with_selected(mut self, selected: impl Into<Value>) -> Self {
        self.selected = Some(selected.into());
        self
    }

    /// Enable bitmask selection.
    #[must_use]
    pub fn with_mask(mut self, mask: bool) -> Self {
        self.mask = mask;
        self
    }
}

/// Decides which option values are selected.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Selection {
    selected: Option<Value>,
    mask: bool,
}

impl Selection {
    /// Create a matcher for an already-resolved selected value.
    #[must_use]
    pub fn new(selected: Option<Value>, mask: bool) -> Self {
        Self { selected, mask }
    }

    /// Resolve a selection specifier against the element attributes.
    ///
    /// A mapping specifier is keyed by the element `id`, else its `name`;
    /// without either, or without a matching entry, nothing is selected.
    #[must_use]
    pub fn resolve(selected: &Value, attrs: &[(String, String)]) -> Option<Value> {
        match selected {
            Value::Null => None,
            Value::Array(_) | Value::Object(_) => {
                let identifier = find_attr(attrs, "id").or_else(|| find_attr(attrs, "name"))?;
                get_set(selected, identifier).cloned()
            }
            scalar => Some(scalar.clone()),
        }
    }

    /// Whether an option value is selected.
    ///
    /// In mask mode any shared bit selects; loose equality always does.
    #[must_use]
    pub fn matches(&self, value: &Value) -> bool {
        let Some(selected) = &self.selected else {
            return false;
        };
        let bits_overlap = self.mask
            && matches!(
                (as_integer(value), as_integer(selected)),
                (Some(a), Some(b)) if a & b != 0
            );
        bits_overlap || loose_eq(value, selected)
    }
}

/// Build a `<select>` with one `<option>` per item.
///
/// `items` is a value-to-label mapping (or array, valued by position).
/// Complex labels are mappings whose `valuekey` entry replaces the option
/// value and whose `labelkey` entry is the label.
#[must_use]
pub fn build_select(
    attrs: Attrs,
    items: &Value,
    opts: &SelectOptions,
    translator: Option<&dyn Translator>,
) -> Markup {
    let mut attrs = attrs.into_list("name");
    if opts.id
        && !has_attr(&attrs, "id")
        && let Some(name) = find_attr(&attrs, "name")
    {
        let name = name.to_owned();
        attrs.push(("id".to_owned(), name));
    }

    let selection = Selection::new(
        opts.selected
            .as_ref()
            .and_then(|selected| Selection::resolve(selected, &attrs)),
        opts.mask,
    );

    let mut doc = Markup::new("select");
    let select = doc.root();
    for (name, value) in &attrs {
        doc.set_attr(select, name, value);
    }

    let translator = translator.filter(|_| opts.translate);
    let labels = translated_labels(items, opts, translator);

    for ((key, item), label) in entries(items).into_iter().zip(labels) {
        let key_text = key.as_text().into_owned();
        let tooltip = tooltip_for(&key_text, opts, translator);

        let mut value = key_value(key);
        let mut label_text = label;
        if item.is_object() {
            if let Some(remapped) = get_set(item, &opts.valuekey) {
                value = remapped.clone();
            }
            if let Some(text) = get_set(item, &opts.labelkey) {
                label_text = scalar_text(text);
            }
        }

        let option = doc.add_child_with_text(select, "option", label_text);
        doc.set_attr(option, "value", scalar_text(&value));
        if let Some(title) = tooltip {
            doc.set_attr(option, "title", title);
        }
        if selection.matches(&value) {
            doc.set_attr(option, "selected", "selected");
        }
    }

    tracing::trace!(options = doc.child_count(select), "Built select");
    doc
}

/// Option value implied by the entry key.
fn key_value(key: EntryKey<'_>) -> Value {
    match key {
        EntryKey::Position(index) => Value::from(index),
        EntryKey::Name(name) => Value::from(name),
    }
}

/// Label text per item, translated through `ns` when enabled.
fn translated_labels(
    items: &Value,
    opts: &SelectOptions,
    translator: Option<&dyn Translator>,
) -> Vec<String> {
    let pairs: Vec<(String, String)> = entries(items)
        .into_iter()
        .map(|(key, item)| (key.as_text().into_owned(), scalar_text(item)))
        .collect();

    let Some(translator) = translator else {
        return pairs.into_iter().map(|(_, label)| label).collect();
    };

    let prefix = opts.ns.as_deref().unwrap_or_default();
    let translated = translator.lookup_many(&pairs, prefix);
    entries(items)
        .into_iter()
        .zip(pairs.into_iter().zip(translated))
        .map(|((_, item), ((_, original), (_, label)))| {
            if item.is_string() { label } else { original }
        })
        .collect()
}

/// Tooltip for an option, only when a distinct translation exists.
fn tooltip_for(
    key_text: &str,
    opts: &SelectOptions,
    translator: Option<&dyn Translator>,
) -> Option<String> {
    let translator = translator?;
    let ttns = opts.ttns.as_deref()?;
    translator
        .get(&format!("{ttns}{key_text}"))
        .filter(|tooltip| tooltip != key_text)
}
