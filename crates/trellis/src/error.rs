//! CLI error types.

use std::path::PathBuf;

use trellis_config::ConfigError;
use trellis_html::MenuError;

/// CLI error type.
#[derive(Debug, thiserror::Error)]
pub(crate) enum CliError {
    #[error("{0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Menu(#[from] MenuError),

    #[error("invalid definition in {}: {source}", .path.display())]
    Definition {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}
