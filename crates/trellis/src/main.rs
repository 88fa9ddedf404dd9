//! Trellis CLI - declarative markup compiler.
//!
//! Provides commands for:
//! - `list`: Render a nested `ul`/`ol` list definition
//! - `menu`: Render a menu definition against a route and request path
//! - `select`: Render a `<select>` from an option mapping
//! - `strip`: Extract plain text from HTML

mod commands;
mod error;
mod output;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::{ListArgs, MenuArgs, SelectArgs, StripArgs};
use output::Output;

/// Trellis - declarative markup compiler.
#[derive(Parser)]
#[command(name = "trellis", version, about)]
struct Cli {
    /// Enable verbose output (info-level logs).
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render a list definition.
    List(ListArgs),
    /// Render a menu definition.
    Menu(MenuArgs),
    /// Render a select element.
    Select(SelectArgs),
    /// Strip markup from HTML.
    Strip(StripArgs),
}

fn main() {
    let cli = Cli::parse();
    let output = Output::new();

    // --verbose enables INFO level, otherwise use RUST_LOG or default to WARN
    let filter = if cli.verbose {
        EnvFilter::new("info")
    } else {
        EnvFilter::from_default_env()
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::List(args) => args.execute(&output),
        Commands::Menu(args) => args.execute(&output),
        Commands::Select(args) => args.execute(&output),
        Commands::Strip(args) => args.execute(&output),
    };

    if let Err(err) = result {
        output.error(&format!("Error: {err}"));
        #[allow(clippy::exit)]
        std::process::exit(1);
    }
}
