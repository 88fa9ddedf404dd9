//! `trellis menu` command implementation.

use std::path::PathBuf;

use clap::Args;
use trellis_config::CliSettings;
use trellis_html::{MenuOptions, NavContext, StaticRouter};

use super::{RenderArgs, html_for, print_rendered, read_definition};
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the menu command.
#[derive(Args)]
pub(crate) struct MenuArgs {
    /// Path to the JSON menu definition (`-` for stdin).
    file: PathBuf,

    /// Name of the current route.
    #[arg(short, long)]
    route: Option<String>,

    /// Current request path, e.g. `/users/42`.
    #[arg(short, long)]
    path: Option<String>,

    /// Route parameter of the current request (repeatable).
    #[arg(long = "param", value_name = "NAME=VALUE", value_parser = parse_param)]
    params: Vec<(String, String)>,

    /// JSON file with menu options applied over the config.
    #[arg(short, long)]
    options: Option<PathBuf>,

    /// Class of the current item (overrides config).
    #[arg(long)]
    current_class: Option<String>,

    #[command(flatten)]
    render: RenderArgs,
}

impl MenuArgs {
    /// Execute the menu command.
    pub(crate) fn execute(self, output: &Output) -> Result<(), CliError> {
        let config = self.render.load_config(CliSettings {
            current_class: self.current_class,
            ..CliSettings::default()
        })?;
        let definition = read_definition(&self.file)?;

        let mut opts = MenuOptions::from_config(&config.menu);
        if let Some(path) = &self.options {
            opts = opts.overlay(&MenuOptions::from_value(&read_definition(path)?));
        }

        let router = StaticRouter::from(config.routes.clone());
        let mut ctx = NavContext::new(&router);
        if let Some(route) = self.route {
            ctx = ctx.with_route(route);
        }
        if let Some(path) = &self.path {
            ctx = ctx.with_request_path(path);
        }
        for (name, value) in self.params {
            ctx = ctx.with_path_param(name, value);
        }

        let rendered = html_for(&config, output).menu(&definition, &ctx, &opts)?;
        print_rendered(output, rendered);
        Ok(())
    }
}

fn parse_param(arg: &str) -> Result<(String, String), String> {
    match arg.split_once('=') {
        Some((name, value)) if !name.is_empty() => Ok((name.to_owned(), value.to_owned())),
        _ => Err(format!("expected NAME=VALUE, got `{arg}`")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_param() {
        assert_eq!(
            parse_param("id=42"),
            Ok(("id".to_owned(), "42".to_owned()))
        );
        assert_eq!(
            parse_param("q=a=b"),
            Ok(("q".to_owned(), "a=b".to_owned()))
        );
        assert_eq!(parse_param("id="), Ok(("id".to_owned(), String::new())));
    }

    #[test]
    fn test_parse_param_rejects_missing_name() {
        assert!(parse_param("42").is_err());
        assert!(parse_param("=42").is_err());
    }
}
