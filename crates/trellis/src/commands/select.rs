//! `trellis select` command implementation.

use std::path::PathBuf;

use clap::Args;
use serde_json::Value;
use trellis_config::CliSettings;
use trellis_html::SelectOptions;

use super::{RenderArgs, html_for, print_rendered, read_definition};
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the select command.
#[derive(Args)]
pub(crate) struct SelectArgs {
    /// Path to the JSON option mapping (`-` for stdin).
    file: PathBuf,

    /// Name of the select element.
    name: String,

    /// Selected value; JSON literals such as `3` or `[1, 2]` are parsed.
    #[arg(short, long)]
    selected: Option<String>,

    /// Treat the selected value as a bitmask (overrides config).
    #[arg(long)]
    mask: bool,

    /// Copy the name into the id attribute (overrides config).
    #[arg(long)]
    id: bool,

    #[command(flatten)]
    render: RenderArgs,
}

impl SelectArgs {
    /// Execute the select command.
    pub(crate) fn execute(self, output: &Output) -> Result<(), CliError> {
        let config = self.render.load_config(CliSettings::default())?;
        let items = read_definition(&self.file)?;

        let mut opts = SelectOptions::from_config(&config.select);
        opts.mask |= self.mask;
        opts.id |= self.id;
        if let Some(selected) = &self.selected {
            opts = opts.with_selected(parse_selected(selected));
        }

        let rendered = html_for(&config, output).select(self.name, &items, &opts);
        print_rendered(output, rendered);
        Ok(())
    }
}

/// Parse a selected value as JSON, falling back to the plain string.
fn parse_selected(arg: &str) -> Value {
    serde_json::from_str(arg).unwrap_or_else(|_| Value::String(arg.to_owned()))
}
