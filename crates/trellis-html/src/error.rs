//! Error types for the markup compilers.

use trellis_markup::MarkupError;

use crate::rules::RuleError;

/// Error from a leaf builder.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum BuildError {
    /// The primary identifying attribute is missing.
    #[error("cannot build input without primary field `{0}`")]
    MissingPrimaryField(String),

    /// JSON encoding error.
    #[error("JSON error")]
    Json(#[from] serde_json::Error),
}

/// Error from the menu compiler.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum MenuError {
    /// A show, builder, or handler callback failed.
    #[error("menu rule `{key}` failed")]
    Rule {
        /// Definition key the rule is bound to.
        key: String,
        /// Error returned by the callback.
        #[source]
        source: RuleError,
    },

    /// The container markup could not be parsed.
    #[error("invalid menu root markup")]
    Markup(#[from] MarkupError),
}
