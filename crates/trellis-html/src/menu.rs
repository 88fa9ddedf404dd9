//! Menu compilation: navigation definitions to anchor trees.
//!
//! Each item goes through a fixed pipeline:
//!
//! 1. show rules (first failing rule drops the item),
//! 2. `submenu` + `items` recursion,
//! 3. builder rules (first match builds the item),
//! 4. the default anchor path (route/url resolution, label, icon, classes),
//! 5. handlers (every matching rule runs, in order).
//!
//! A container left without children receives a `<span>&nbsp;</span>`
//! placeholder.

use std::fmt;
use std::sync::Arc;

use serde_json::{Value, json};
use trellis_markup::{Markup, NodeId};

use crate::context::{BuildOptions, NavContext};
use crate::error::MenuError;
use crate::options::{IconPosition, MenuOptions, attr_pairs};
use crate::rules::{BuildRule, BuiltItem, RuleError};
use crate::translate::Translator;
use crate::value::{EntryKey, as_integer, entries, get_set, is_set, loose_eq, scalar_text};

/// Placeholder text for empty containers (a non-breaking space).
const PLACEHOLDER_TEXT: &str = "\u{00a0}";

/// Compiles menu definitions into anchor trees.
#[derive(Clone, Default)]
pub struct MenuCompiler {
    translator: Option<Arc<dyn Translator>>,
}

impl MenuCompiler {
    /// Create a compiler without translation.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Translate labels through `translator`.
    #[must_use]
    pub fn with_translator(mut self, translator: Arc<dyn Translator>) -> Self {
        self.translator = Some(translator);
        self
    }

    /// Compile a menu into a new document.
    ///
    /// The container is parsed from `opts.root`, or is `<div class="menu"/>`.
    pub fn compile(
        &self,
        menu: &Value,
        ctx: &NavContext<'_>,
        opts: &MenuOptions,
    ) -> Result<Markup, MenuError> {
        let mut doc = Markup::parse(opts.root_markup())?;
        let root = doc.root();
        self.compile_onto(&mut doc, root, menu, ctx, opts)?;
        Ok(doc)
    }

    /// Compile a menu into a new container element under `parent`.
    ///
    /// The container is `opts.element` (default `div`) with `opts.attrs`.
    pub fn compile_into(
        &self,
        doc: &mut Markup,
        parent: NodeId,
        menu: &Value,
        ctx: &NavContext<'_>,
        opts: &MenuOptions,
    ) -> Result<NodeId, MenuError> {
        let container = doc.add_child(parent, opts.element_name());
        for (name, value) in opts.attr_list() {
            doc.set_attr(container, name, value);
        }
        self.compile_onto(doc, container, menu, ctx, opts)?;
        Ok(container)
    }

    /// Compile a menu directly into an existing container.
    pub fn compile_onto(
        &self,
        doc: &mut Markup,
        container: NodeId,
        menu: &Value,
        ctx: &NavContext<'_>,
        opts: &MenuOptions,
    ) -> Result<(), MenuError> {
        for (key, def) in entries(menu) {
            self.compile_item(doc, container, key, def, ctx, opts)?;
        }

        if doc.child_count(container) == 0 {
            tracing::debug!("Menu container is empty, adding placeholder");
            doc.add_child_with_text(container, "span", PLACEHOLDER_TEXT);
        }
        Ok(())
    }

    fn compile_item(
        &self,
        doc: &mut Markup,
        container: NodeId,
        key: EntryKey<'_>,
        def: &Value,
        ctx: &NavContext<'_>,
        opts: &MenuOptions,
    ) -> Result<(), MenuError> {
        let normalized;
        let def = if let Value::String(name) = def {
            normalized = json!({ "name": name });
            &normalized
        } else {
            def
        };
        let entry_key = key.as_text();

        if !is_shown(def, &entry_key, ctx, opts)? {
            return Ok(());
        }

        let built = if let (Some(submenu), Some(items)) =
            (get_set(def, "submenu"), get_set(def, "items"))
        {
            let sub_opts = opts.overlay(&MenuOptions::from_value(submenu));
            BuiltItem::bare(self.compile_into(doc, container, items, ctx, &sub_opts)?)
        } else if let Some(item) = self.run_builders(doc, container, def, &entry_key, ctx, opts)? {
            BuiltItem::bare(item)
        } else if let Some(built) = self.build_default(doc, container, key, def, ctx, opts) {
            built
        } else {
            return Ok(());
        };

        for (rule_key, handler) in opts.handler_rules() {
            if is_set(def, rule_key) {
                handler
                    .run(def, &entry_key, ctx, doc, built)
                    .map_err(|source| rule_error(rule_key, source))?;
            }
        }
        Ok(())
    }

    /// Run the first builder rule whose key is set on the item.
    fn run_builders(
        &self,
        doc: &mut Markup,
        container: NodeId,
        def: &Value,
        entry_key: &str,
        ctx: &NavContext<'_>,
        opts: &MenuOptions,
    ) -> Result<Option<NodeId>, MenuError> {
        let Some((rule_key, rule)) = opts.build_rules().iter().find(|(key, _)| is_set(def, key)) else {
            return Ok(None);
        };

        let item = match rule {
            BuildRule::Callback(builder) => builder(def, entry_key, ctx, doc, container)
                .map_err(|source| rule_error(rule_key, source))?,
            BuildRule::Label(text_key) => {
                let text = self.translate(text_key);
                doc.add_child_with_text(container, opts.label_element(), text)
            }
        };
        tracing::trace!(key = entry_key, rule = %rule_key, "Menu item built by builder rule");
        Ok(Some(item))
    }

    /// Build an anchor item, or `None` when the item has no target or label.
    fn build_default(
        &self,
        doc: &mut Markup,
        container: NodeId,
        key: EntryKey<'_>,
        def: &Value,
        ctx: &NavContext<'_>,
        opts: &MenuOptions,
    ) -> Option<BuiltItem> {
        let (url, current) = if let Some(route) = get_set(def, "route") {
            resolve_route(&scalar_text(route), ctx)
        } else if let Some(url) = get_set(def, "url") {
            (scalar_text(url), matches_path(def, ctx))
        } else if let Some(route) = key.name().filter(|name| !name.starts_with('#')) {
            resolve_route(route, ctx)
        } else {
            tracing::debug!(key = %key.as_text(), "Skipping menu item without route, url, or name key");
            return None;
        };

        let label = if let Some(name) = get_set(def, "name") {
            scalar_text(name)
        } else if let Some(name) = key.name() {
            name.to_owned()
        } else {
            tracing::debug!(key = %key.as_text(), "Skipping menu item without label");
            return None;
        };
        let label = self.translate(&label);
        let icon = get_set(def, "icon").map(scalar_text);

        let (item, link) = match opts.wrapper() {
            Some(wrapper) => {
                let item = doc.add_child(container, wrapper);
                (item, doc.add_child(item, "a"))
            }
            None => {
                let link = doc.add_child(container, "a");
                (link, link)
            }
        };

        let inner = match opts.inner() {
            Some(inner_el) => Some(build_inner(doc, link, &inner_el, label, icon.as_deref(), opts)),
            None => {
                doc.set_text(link, label);
                None
            }
        };

        if let Some(attrs) = get_set(def, "attrs") {
            for (name, value) in attr_pairs(attrs) {
                doc.set_attr(link, name, value);
            }
        }
        doc.set_attr(link, "href", url);

        let mut classes: Vec<String> = Vec::new();
        if current {
            classes.push(opts.current_class_name().to_owned());
        }
        if let Some(item_class) = &opts.item_class {
            classes.push(item_class.clone());
        }
        if let Some(class) = get_set(def, "class") {
            classes.push(scalar_text(class));
        }
        if !classes.is_empty() {
            doc.set_attr(item, "class", classes.join(" "));
        }

        Some(BuiltItem {
            item,
            link: (link != item).then_some(link),
            inner,
        })
    }

    fn translate(&self, text: &str) -> String {
        match &self.translator {
            Some(translator) => translator.lookup(text),
            None => text.to_owned(),
        }
    }
}

impl fmt::Debug for MenuCompiler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MenuCompiler")
            .field("translator", &self.translator.is_some())
            .finish()
    }
}

/// Evaluate show rules; the first failing rule hides the item.
fn is_shown(
    def: &Value,
    entry_key: &str,
    ctx: &NavContext<'_>,
    opts: &MenuOptions,
) -> Result<bool, MenuError> {
    for (rule_key, rule) in opts.show_rules() {
        if !is_set(def, rule_key) {
            continue;
        }
        let allowed = rule
            .allows(def, rule_key, entry_key, ctx)
            .map_err(|source| rule_error(rule_key, source))?;
        if !allowed {
            tracing::debug!(key = entry_key, rule = %rule_key, "Menu item hidden by show rule");
            return Ok(false);
        }
    }
    Ok(true)
}

/// Add the inner label element with its optional icon to the anchor.
fn build_inner(
    doc: &mut Markup,
    link: NodeId,
    inner_el: &str,
    label: String,
    icon: Option<&str>,
    opts: &MenuOptions,
) -> NodeId {
    let position = opts.icon_pos.unwrap_or_default();
    let add_icon = |doc: &mut Markup, at: IconPosition| {
        if let Some(icon) = icon
            && position == at
        {
            let node = doc.add_child_with_text(link, opts.icon_element(), " ");
            doc.set_attr(node, "class", format!("{icon} {}", opts.icon_class_name()));
        }
    };

    add_icon(doc, IconPosition::Before);
    let inner = doc.add_child_with_text(link, inner_el, label);
    add_icon(doc, IconPosition::After);

    if let Some(class) = &opts.inner_class {
        doc.set_attr(inner, "class", class);
    }
    inner
}

/// Build a route URL and check whether it is the current route.
fn resolve_route(route: &str, ctx: &NavContext<'_>) -> (String, bool) {
    let url = ctx
        .router()
        .build(route, ctx.path_params(), BuildOptions { strict: false })
        .unwrap_or_else(|| {
            tracing::debug!(route, "Route did not resolve, using '#'");
            "#".to_owned()
        });
    let current = ctx.route_name() == Some(route);
    (url, current)
}

/// Check a `matchPath = [offset, segment]` pair against the request path.
fn matches_path(def: &Value, ctx: &NavContext<'_>) -> bool {
    let Some(Value::Array(pair)) = get_set(def, "matchPath") else {
        return false;
    };
    let [offset, expected] = pair.as_slice() else {
        return false;
    };
    as_integer(offset)
        .and_then(|offset| usize::try_from(offset).ok())
        .and_then(|offset| ctx.segment(offset))
        .is_some_and(|segment| loose_eq(&Value::String(segment.to_owned()), expected))
}

fn rule_error(key: &str, source: RuleError) -> MenuError {
    MenuError::Rule {
        key: key.to_owned(),
        source,
    }
}
