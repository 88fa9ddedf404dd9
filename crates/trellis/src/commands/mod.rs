//! CLI command implementations.

pub(crate) mod list;
pub(crate) mod menu;
pub(crate) mod select;
pub(crate) mod strip;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::Args;
use serde_json::Value;
use trellis_config::{CliSettings, Config};
use trellis_html::{Html, MapTranslator};
use trellis_markup::{OutputOptions, Rendered};

use crate::error::CliError;
use crate::output::Output;

pub(crate) use list::ListArgs;
pub(crate) use menu::MenuArgs;
pub(crate) use select::SelectArgs;
pub(crate) use strip::StripArgs;

/// Options shared by the rendering commands.
#[derive(Args)]
pub(crate) struct RenderArgs {
    /// Path to configuration file (default: auto-discover trellis.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Trim surrounding whitespace (overrides config).
    #[arg(long)]
    trim: Option<bool>,

    /// Keep the trailing newline.
    #[arg(long, conflicts_with = "trim")]
    no_trim: bool,
}

impl RenderArgs {
    fn resolve_trim(&self) -> Option<bool> {
        if self.no_trim { Some(false) } else { self.trim }
    }

    /// Load config with these arguments applied over `settings`.
    pub(crate) fn load_config(&self, settings: CliSettings) -> Result<Config, CliError> {
        let settings = CliSettings {
            trim: self.resolve_trim(),
            ..settings
        };
        Ok(Config::load(self.config.as_deref(), Some(&settings))?)
    }
}

/// Build the renderer for a loaded config.
///
/// The command line always prints HTML, so `output.raw` is ignored.
pub(crate) fn html_for(config: &Config, output: &Output) -> Html {
    if config.output.raw {
        output.warning("Warning: output.raw has no effect on the command line");
    }
    let translator = MapTranslator::from(config.strings.clone());
    Html::new()
        .with_translator(Arc::new(translator))
        .with_output(OutputOptions {
            raw: false,
            trim: config.output.trim,
        })
}

/// Read a JSON definition from `path`, or stdin when `path` is `-`.
pub(crate) fn read_definition(path: &Path) -> Result<Value, CliError> {
    tracing::debug!(path = %path.display(), "Reading definition");
    let text = read_input(Some(path))?;
    serde_json::from_str(&text).map_err(|source| CliError::Definition {
        path: path.to_path_buf(),
        source,
    })
}

/// Read text from `path`, or stdin when `path` is missing or `-`.
pub(crate) fn read_input(path: Option<&Path>) -> Result<String, CliError> {
    match path {
        Some(path) if path != Path::new("-") => Ok(std::fs::read_to_string(path)?),
        _ => Ok(std::io::read_to_string(std::io::stdin())?),
    }
}

/// Print a finished render.
pub(crate) fn print_rendered(output: &Output, rendered: Rendered) {
    output.result(&rendered.into_html());
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_read_definition_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"["first", "second"]"#).unwrap();

        let def = read_definition(file.path()).unwrap();

        assert_eq!(def, serde_json::json!(["first", "second"]));
    }

    #[test]
    fn test_read_definition_reports_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();

        let err = read_definition(file.path()).unwrap_err();

        assert!(matches!(err, CliError::Definition { .. }));
        assert!(err.to_string().contains(&file.path().display().to_string()));
    }

    #[test]
    fn test_read_definition_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();

        let err = read_definition(&dir.path().join("missing.json")).unwrap_err();

        assert!(matches!(err, CliError::Io(_)));
    }
}
