//! `<input>` builders: text inputs, buttons, submits, hidden and JSON fields.

use serde::Serialize;
use trellis_markup::Markup;

use crate::attrs::{Attrs, find_attr, has_attr};
use crate::error::BuildError;
use crate::translate::Translator;

/// Fallback copies between attributes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AttrMap {
    /// Copy `id` into a missing `name` and back.
    IdName,
    /// `(target, source)` pairs; a missing target takes the source value.
    Pairs(Vec<(String, String)>),
}

impl AttrMap {
    fn pairs(&self) -> Vec<(String, String)> {
        match self {
            Self::IdName => vec![
                ("id".to_owned(), "name".to_owned()),
                ("name".to_owned(), "id".to_owned()),
            ],
            Self::Pairs(pairs) => pairs.clone(),
        }
    }
}

/// Options for [`build_input`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct InputOptions {
    /// Primary attribute name; `id` when unset.
    pub def: Option<String>,
    /// Default `type`; `text` when unset.
    pub deftype: Option<String>,
    /// Attributes added when not already present.
    pub add: Vec<(String, String)>,
    /// Fallback copies applied after `add`.
    pub map: Option<AttrMap>,
    /// Translation prefix for a missing `value`.
    pub text_ns: Option<String>,
    /// Translation prefix for a missing `title`.
    pub tooltip_ns: Option<String>,
}

impl InputOptions {
    /// Options for a `<input type="button">`.
    #[must_use]
    pub fn button(mut self) -> Self {
        self.deftype = Some("button".to_owned());
        self
    }

    /// Options for a `<input type="submit">` keyed by `name`.
    #[must_use]
    pub fn submit(mut self) -> Self {
        self.def = Some("name".to_owned());
        self.deftype = Some("submit".to_owned());
        self
    }

    /// Enable the `id`/`name` fallback copy.
    #[must_use]
    pub fn with_id_name_map(mut self) -> Self {
        self.map = Some(AttrMap::IdName);
        self
    }
}

/// Build an `<input>` element.
///
/// A primary shorthand expands to `{def: value, type: deftype}`. An
/// attribute list must carry the primary attribute and gets the default
/// `type` appended when it has none.
pub fn build_input(
    attrs: Attrs,
    opts: &InputOptions,
    translator: Option<&dyn Translator>,
) -> Result<Markup, BuildError> {
    let primary = opts.def.as_deref().unwrap_or("id");
    let deftype = opts.deftype.as_deref().unwrap_or("text");

    let mut attrs = match attrs {
        Attrs::Primary(value) => vec![
            (primary.to_owned(), value),
            ("type".to_owned(), deftype.to_owned()),
        ],
        Attrs::List(mut list) => {
            if !has_attr(&list, primary) {
                return Err(BuildError::MissingPrimaryField(primary.to_owned()));
            }
            if !has_attr(&list, "type") {
                list.push(("type".to_owned(), deftype.to_owned()));
            }
            list
        }
    };

    for (name, value) in &opts.add {
        if !has_attr(&attrs, name) {
            attrs.push((name.clone(), value.clone()));
        }
    }

    if let Some(map) = &opts.map {
        for (target, source) in map.pairs() {
            if has_attr(&attrs, &target) {
                continue;
            }
            if let Some(value) = find_attr(&attrs, &source).map(str::to_owned) {
                attrs.push((target, value));
            }
        }
    }

    if let Some(translator) = translator {
        apply_translations(&mut attrs, primary, opts, translator);
    }

    let mut doc = Markup::new("input");
    let input = doc.root();
    for (name, value) in attrs {
        doc.set_attr(input, name, value);
    }
    Ok(doc)
}

/// Fill a missing `value` and `title` from translations of the primary value.
fn apply_translations(
    attrs: &mut Vec<(String, String)>,
    primary: &str,
    opts: &InputOptions,
    translator: &dyn Translator,
) {
    let Some(name) = find_attr(attrs, primary).map(str::to_owned) else {
        return;
    };

    if !has_attr(attrs, "value") {
        let prefix = opts.text_ns.as_deref().unwrap_or_default();
        attrs.push(("value".to_owned(), translator.lookup(&format!("{prefix}{name}"))));
    }

    if !has_attr(attrs, "title")
        && let Some(prefix) = opts.tooltip_ns.as_deref()
    {
        let key = format!("{prefix}{name}");
        if let Some(tooltip) = translator.get(&key).filter(|tooltip| *tooltip != key) {
            attrs.push(("title".to_owned(), tooltip));
        }
    }
}

/// Build `<input type="hidden" id name value/>`.
#[must_use]
pub fn build_hidden(name: &str, value: &str) -> Markup {
    let mut doc = Markup::new("input");
    let input = doc.root();
    doc.set_attr(input, "type", "hidden");
    doc.set_attr(input, "id", name);
    doc.set_attr(input, "name", name);
    doc.set_attr(input, "value", value);
    doc
}

/// Build a hidden field carrying the JSON encoding of `value`.
pub fn build_json<T: Serialize + ?Sized>(name: &str, value: &T) -> Result<Markup, BuildError> {
    let json = serde_json::to_string(value)?;
    Ok(build_hidden(name, &json))
}
