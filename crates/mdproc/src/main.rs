//! mdproc CLI - Markdown processor.
//!
//! Provides commands for:
//! - `serve`: Start the conversion web server
//! - `confluence`: Convert a Markdown file to Confluence wiki markup
//! - `mermaid`: Render a Markdown file's Mermaid diagrams to PNG

mod commands;
mod error;
mod output;

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::{ConfluenceArgs, MermaidArgs, ServeArgs};
use error::CliError;
use output::Output;

/// Application version from Cargo.toml.
const VERSION: &str = env!("CARGO_PKG_VERSION");

/// mdproc - Markdown to Confluence and Mermaid to PNG.
#[derive(Parser)]
#[command(name = "mdproc", version, about)]
struct Cli {
    /// Enable verbose output (info-level logs).
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the conversion web server.
    Serve(ServeArgs),
    /// Convert a Markdown file to Confluence wiki markup.
    Confluence(ConfluenceArgs),
    /// Render Mermaid diagrams in a Markdown file to PNG images.
    Mermaid(MermaidArgs),
}

fn main() -> ExitCode {
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
        Commands::Serve(args) => block_on(args.execute(VERSION)),
        Commands::Confluence(args) => args.execute(),
        Commands::Mermaid(args) => block_on(args.execute()),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            output.error(&format!("Error: {err}"));
            ExitCode::FAILURE
        }
    }
}

/// Run an async command on a fresh multi-threaded runtime.
fn block_on(future: impl Future<Output = Result<(), CliError>>) -> Result<(), CliError> {
    tokio::runtime::Runtime::new()?.block_on(future)
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_confluence_with_output() {
        let cli = Cli::try_parse_from(["mdproc", "confluence", "in.md", "out.txt"]).unwrap();
        assert!(matches!(cli.command, Commands::Confluence(_)));
        assert!(!cli.verbose);
    }

    #[test]
    fn test_parse_global_verbose() {
        let cli = Cli::try_parse_from(["mdproc", "serve", "-v", "--port", "8080"]).unwrap();
        assert!(cli.verbose);
        assert!(matches!(cli.command, Commands::Serve(_)));
    }

    #[test]
    fn test_confluence_requires_input() {
        assert!(Cli::try_parse_from(["mdproc", "confluence"]).is_err());
    }
}
