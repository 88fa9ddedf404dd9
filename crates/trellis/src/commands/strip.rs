//! `trellis strip` command implementation.

use std::path::PathBuf;

use clap::Args;
use trellis_html::{DEFAULT_FILTERS, strip};

use super::read_input;
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the strip command.
#[derive(Args)]
pub(crate) struct StripArgs {
    /// HTML file to strip (default: stdin).
    file: Option<PathBuf>,

    /// Filter to apply, in order: T, E, EE, R, RR (default: R then E).
    #[arg(short, long = "filter")]
    filters: Vec<String>,
}

impl StripArgs {
    /// Execute the strip command.
    pub(crate) fn execute(self, output: &Output) -> Result<(), CliError> {
        let text = read_input(self.file.as_deref())?;
        output.result(&strip(&text, &self.filter_names()));
        Ok(())
    }

    fn filter_names(&self) -> Vec<&str> {
        if self.filters.is_empty() {
            DEFAULT_FILTERS.to_vec()
        } else {
            self.filters.iter().map(String::as_str).collect()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_default_filters_when_none_given() {
        let args = StripArgs {
            file: None,
            filters: Vec::new(),
        };

        assert_eq!(args.filter_names(), vec!["R", "E"]);
    }

    #[test]
    fn test_explicit_filters_keep_order() {
        let args = StripArgs {
            file: None,
            filters: vec!["EE".to_owned(), "T".to_owned()],
        };

        assert_eq!(args.filter_names(), vec!["EE", "T"]);
    }
}
