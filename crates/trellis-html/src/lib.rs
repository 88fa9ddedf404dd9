//! Declarative markup compilation for Trellis.
//!
//! Definitions are loosely-typed JSON values describing menus, nested lists,
//! and form controls. The compilers walk them depth-first and produce a
//! [`Markup`] tree, which [`Html`] finishes into a string or hands back raw.
//!
//! # Example
//!
//! ```
//! use serde_json::json;
//! use trellis_html::{Html, ListOptions};
//! use trellis_markup::OutputOptions;
//!
//! let html = Html::new().with_output(OutputOptions::trimmed());
//! let list = html.ul(&json!([{"id": "nav"}, "first", "second"]), &ListOptions::default());
//!
//! assert_eq!(
//!     list.into_html(),
//!     r#"<ul id="nav"><li>first</li><li>second</li></ul>"#
//! );
//! ```

mod attrs;
mod context;
mod error;
mod input;
mod list;
mod menu;
mod options;
mod rules;
mod select;
mod strip;
mod translate;
mod value;

use std::fmt;
use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;
use trellis_markup::{Markup, OutputOptions, Rendered, finish};

pub use attrs::Attrs;
pub use context::{BuildOptions, NavContext, Router, StaticRouter};
pub use error::{BuildError, MenuError};
pub use input::{AttrMap, InputOptions, build_hidden, build_input, build_json};
pub use list::{AttrEntry, ListCompiler, ListEntry};
pub use menu::MenuCompiler;
pub use options::{DEFAULT_MENU_ROOT, IconPosition, ListOptions, ListType, MenuOptions};
pub use rules::{
    BuildRule, BuilderFn, BuiltItem, Handler, HandlerFn, PredicateFn, RuleError, ShowRule,
};
pub use select::{Selection, SelectOptions, build_select};
pub use strip::{DEFAULT_FILTERS, strip};
pub use translate::{MapTranslator, Translator};
pub use value::{EntryKey, loose_eq};

/// Entry point for every builder, with shared translation and output options.
#[derive(Clone, Default)]
pub struct Html {
    translator: Option<Arc<dyn Translator>>,
    output: OutputOptions,
}

impl Html {
    /// Create a builder without translation that returns untrimmed HTML.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach a translator for labels, tooltips, and input values.
    #[must_use]
    pub fn with_translator(mut self, translator: Arc<dyn Translator>) -> Self {
        self.translator = Some(translator);
        self
    }

    /// Set the output options.
    #[must_use]
    pub fn with_output(mut self, output: OutputOptions) -> Self {
        self.output = output;
        self
    }

    /// The attached translator.
    #[must_use]
    pub fn translator(&self) -> Option<&dyn Translator> {
        self.translator.as_deref()
    }

    /// The output options.
    #[must_use]
    pub fn output(&self) -> OutputOptions {
        self.output
    }

    fn finish(&self, markup: Markup) -> Rendered {
        finish(markup, self.output)
    }

    /// Render a nested list, `ul` unless the options say otherwise.
    #[must_use]
    pub fn ul(&self, def: &Value, opts: &ListOptions) -> Rendered {
        let markup = ListCompiler::new().compile(def, opts.resolved_type());
        self.finish(markup)
    }

    /// Render a nested list, `ol` unless the options say otherwise.
    #[must_use]
    pub fn ol(&self, def: &Value, opts: &ListOptions) -> Rendered {
        self.ul(def, &ListOptions::of_type(ListType::Ol).overlay(opts))
    }

    /// Render a menu.
    pub fn menu(
        &self,
        menu: &Value,
        ctx: &NavContext<'_>,
        opts: &MenuOptions,
    ) -> Result<Rendered, MenuError> {
        let mut compiler = MenuCompiler::new();
        if let Some(translator) = &self.translator {
            compiler = compiler.with_translator(Arc::clone(translator));
        }
        let markup = compiler.compile(menu, ctx, opts)?;
        Ok(self.finish(markup))
    }

    /// Render a `<select>`.
    #[must_use]
    pub fn select(&self, attrs: impl Into<Attrs>, items: &Value, opts: &SelectOptions) -> Rendered {
        let markup = build_select(attrs.into(), items, opts, self.translator());
        self.finish(markup)
    }

    /// Render an `<input>`.
    pub fn input(&self, attrs: impl Into<Attrs>, opts: &InputOptions) -> Result<Rendered, BuildError> {
        let markup = build_input(attrs.into(), opts, self.translator())?;
        Ok(self.finish(markup))
    }

    /// Render an `<input type="button">`.
    pub fn button(&self, attrs: impl Into<Attrs>, opts: &InputOptions) -> Result<Rendered, BuildError> {
        self.input(attrs, &opts.clone().button())
    }

    /// Render an `<input type="submit">` keyed by `name`.
    pub fn submit(&self, attrs: impl Into<Attrs>, opts: &InputOptions) -> Result<Rendered, BuildError> {
        self.input(attrs, &opts.clone().submit())
    }

    /// Render a hidden field.
    #[must_use]
    pub fn hidden(&self, name: &str, value: &str) -> Rendered {
        self.finish(build_hidden(name, value))
    }

    /// Render a hidden field carrying the JSON encoding of `value`.
    pub fn json<T: Serialize + ?Sized>(&self, name: &str, value: &T) -> Result<Rendered, BuildError> {
        Ok(self.finish(build_json(name, value)?))
    }
}

impl fmt::Debug for Html {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Html")
            .field("translator", &self.translator.is_some())
            .field("output", &self.output)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn trimmed() -> Html {
        Html::new().with_output(OutputOptions::trimmed())
    }

    fn select_items() -> Value {
        json!({"first": "First", "second": "Second", "third": "Third"})
    }

    const SELECT_HTML: &str = concat!(
        r#"<select name="test"><option value="first">First</option>"#,
        r#"<option value="second">Second</option><option value="third">Third</option></select>"#
    );

    #[test]
    fn test_select_untrimmed_keeps_newline() {
        let rendered = Html::new().select("test", &select_items(), &SelectOptions::default());

        assert_eq!(rendered.into_html(), format!("{SELECT_HTML}\n"));
    }

    #[test]
    fn test_select_trimmed() {
        let rendered = trimmed().select("test", &select_items(), &SelectOptions::default());

        assert_eq!(rendered.as_html(), Some(SELECT_HTML));
    }

    #[test]
    fn test_ul_and_ol() {
        let def = json!(["a", {"ul": ["b"]}]);

        assert_eq!(
            trimmed().ul(&def, &ListOptions::default()).into_html(),
            "<ul><li>a<ul><li>b</li></ul></li></ul>"
        );
        assert_eq!(
            trimmed().ol(&def, &ListOptions::default()).into_html(),
            "<ol><li>a<ul><li>b</li></ul></li></ol>"
        );
    }

    #[test]
    fn test_ol_respects_explicit_type() {
        let rendered = trimmed().ol(&json!(["x"]), &ListOptions::of_type(ListType::Ul));

        assert_eq!(rendered.into_html(), "<ul><li>x</li></ul>");
    }

    #[test]
    fn test_menu_through_facade_translates() {
        let router = StaticRouter::new().with_route("home", "/");
        let ctx = NavContext::new(&router).with_route("home");
        let html = trimmed().with_translator(Arc::new(MapTranslator::new().with("home", "Home")));

        let rendered = html
            .menu(&json!({"home": {}}), &ctx, &MenuOptions::new())
            .unwrap();

        assert_eq!(
            rendered.into_html(),
            r#"<div class="menu"><a href="/" class="current">Home</a></div>"#
        );
    }

    #[test]
    fn test_hidden_and_json() {
        let html = trimmed();

        assert_eq!(
            html.hidden("foo", "bar").into_html(),
            r#"<input type="hidden" id="foo" name="foo" value="bar"/>"#
        );
        assert_eq!(
            html.json("foo", &json!({"bar": true})).unwrap().into_html(),
            r#"<input type="hidden" id="foo" name="foo" value="{&quot;bar&quot;:true}"/>"#
        );
    }

    #[test]
    fn test_input_button_submit() {
        let html = trimmed();
        let opts = InputOptions::default();

        assert_eq!(
            html.input("foo", &opts).unwrap().into_html(),
            r#"<input id="foo" type="text"/>"#
        );
        assert_eq!(
            html.button("foo", &opts).unwrap().into_html(),
            r#"<input id="foo" type="button"/>"#
        );
        assert_eq!(
            html.submit("foo", &opts).unwrap().into_html(),
            r#"<input name="foo" type="submit"/>"#
        );
    }

    #[test]
    fn test_raw_output_returns_tree() {
        let html = Html::new().with_output(OutputOptions::raw());

        let tree = html.hidden("foo", "bar").into_tree().unwrap();

        assert_eq!(tree.attr(tree.root(), "id"), Some("foo"));
    }
}
