//! `trellis list` command implementation.

use std::path::PathBuf;

use clap::Args;
use trellis_config::CliSettings;
use trellis_html::{ListOptions, ListType};

use super::{RenderArgs, html_for, print_rendered, read_definition};
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the list command.
#[derive(Args)]
pub(crate) struct ListArgs {
    /// Path to the JSON list definition (`-` for stdin).
    file: PathBuf,

    /// Outer list type (overrides config).
    #[arg(short = 't', long = "type", value_parser = ["ul", "ol"])]
    list_type: Option<String>,

    #[command(flatten)]
    render: RenderArgs,
}

impl ListArgs {
    /// Execute the list command.
    pub(crate) fn execute(self, output: &Output) -> Result<(), CliError> {
        let config = self.render.load_config(CliSettings {
            list_type: self.list_type,
            ..CliSettings::default()
        })?;
        let definition = read_definition(&self.file)?;

        let opts = ListOptions::from_config(&config.list);
        let html = html_for(&config, output);
        let rendered = match opts.resolved_type() {
            ListType::Ul => html.ul(&definition, &opts),
            ListType::Ol => html.ol(&definition, &opts),
        };
        print_rendered(output, rendered);
        Ok(())
    }
}
