//! Navigation context consumed by the menu compiler.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;

/// Placeholder in a route template, e.g. `{id}`.
static PLACEHOLDER_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{([A-Za-z_][A-Za-z0-9_]*)\}").expect("invalid placeholder regex"));

/// Options passed to [`Router::build`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BuildOptions {
    /// Refuse to build a URL when a path parameter is missing.
    pub strict: bool,
}

/// Route resolution capability.
///
/// Implementations must be thread-safe (`Send + Sync`).
pub trait Router: Send + Sync {
    /// Build the URL for a named route, or `None` if it cannot be built.
    fn build(
        &self,
        route: &str,
        params: &BTreeMap<String, String>,
        options: BuildOptions,
    ) -> Option<String>;
}

/// Table-driven router backed by `{param}` path templates.
#[derive(Clone, Debug, Default)]
pub struct StaticRouter {
    routes: BTreeMap<String, String>,
}

impl StaticRouter {
    /// Create an empty router.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a route template.
    #[must_use]
    pub fn with_route(mut self, name: impl Into<String>, template: impl Into<String>) -> Self {
        self.routes.insert(name.into(), template.into());
        self
    }
}

impl From<BTreeMap<String, String>> for StaticRouter {
    fn from(routes: BTreeMap<String, String>) -> Self {
        Self { routes }
    }
}

impl Router for StaticRouter {
    /// Substitute path parameters into the route template.
    ///
    /// Missing parameters fail in strict mode and are dropped otherwise.
    fn build(
        &self,
        route: &str,
        params: &BTreeMap<String, String>,
        options: BuildOptions,
    ) -> Option<String> {
        let template = self.routes.get(route)?;

        let mut missing = false;
        let url = PLACEHOLDER_PATTERN.replace_all(template, |caps: &regex::Captures| {
            params.get(&caps[1]).cloned().unwrap_or_else(|| {
                missing = true;
                String::new()
            })
        });

        if missing && options.strict {
            return None;
        }
        Some(url.into_owned())
    }
}

/// The request being rendered: router, current route, path, and parameters.
pub struct NavContext<'a> {
    router: &'a dyn Router,
    route_name: Option<String>,
    path: Vec<String>,
    path_params: BTreeMap<String, String>,
}

impl<'a> NavContext<'a> {
    /// Create a context with no current route.
    #[must_use]
    pub fn new(router: &'a dyn Router) -> Self {
        Self {
            router,
            route_name: None,
            path: Vec::new(),
            path_params: BTreeMap::new(),
        }
    }

    /// Set the name of the currently matched route.
    #[must_use]
    pub fn with_route(mut self, name: impl Into<String>) -> Self {
        self.route_name = Some(name.into());
        self
    }

    /// Set the request path segments.
    #[must_use]
    pub fn with_path<I, S>(mut self, segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.path = segments.into_iter().map(Into::into).collect();
        self
    }

    /// Set the request path from a URL path such as `/users/42`.
    #[must_use]
    pub fn with_request_path(self, path: &str) -> Self {
        self.with_path(path.split('/').filter(|segment| !segment.is_empty()))
    }

    /// Add a path parameter.
    #[must_use]
    pub fn with_path_param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.path_params.insert(name.into(), value.into());
        self
    }

    /// The route resolver.
    #[must_use]
    pub fn router(&self) -> &'a dyn Router {
        self.router
    }

    /// The currently matched route name.
    #[must_use]
    pub fn route_name(&self) -> Option<&str> {
        self.route_name.as_deref()
    }

    /// Request path segments.
    #[must_use]
    pub fn path(&self) -> &[String] {
        &self.path
    }

    /// A single path segment, if present.
    #[must_use]
    pub fn segment(&self, offset: usize) -> Option<&str> {
        self.path.get(offset).map(String::as_str)
    }

    /// Path parameters of the current request.
    #[must_use]
    pub fn path_params(&self) -> &BTreeMap<String, String> {
        &self.path_params
    }
}

impl std::fmt::Debug for NavContext<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NavContext")
            .field("route_name", &self.route_name)
            .field("path", &self.path)
            .field("path_params", &self.path_params)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn router() -> StaticRouter {
        StaticRouter::new()
            .with_route("home", "/")
            .with_route("user", "/users/{id}")
    }

    #[test]
    fn test_build_plain_route() {
        let url = router().build("home", &BTreeMap::new(), BuildOptions::default());

        assert_eq!(url.as_deref(), Some("/"));
    }

    #[test]
    fn test_build_substitutes_params() {
        let params = BTreeMap::from([("id".to_owned(), "42".to_owned())]);

        let url = router().build("user", &params, BuildOptions::default());

        assert_eq!(url.as_deref(), Some("/users/42"));
    }

    #[test]
    fn test_build_unknown_route_is_none() {
        assert_eq!(
            router().build("missing", &BTreeMap::new(), BuildOptions::default()),
            None
        );
    }

    #[test]
    fn test_build_missing_param_depends_on_strict() {
        let lenient = router().build("user", &BTreeMap::new(), BuildOptions { strict: false });
        let strict = router().build("user", &BTreeMap::new(), BuildOptions { strict: true });

        assert_eq!(lenient.as_deref(), Some("/users/"));
        assert_eq!(strict, None);
    }

    #[test]
    fn test_request_path_segments() {
        let router = router();
        let ctx = NavContext::new(&router).with_request_path("/users/42/");

        assert_eq!(ctx.path(), &["users".to_owned(), "42".to_owned()]);
        assert_eq!(ctx.segment(1), Some("42"));
        assert_eq!(ctx.segment(5), None);
    }
}
