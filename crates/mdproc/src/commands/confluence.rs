//! `mdproc confluence` command implementation.

use std::path::{Path, PathBuf};

use clap::Args;
use mdproc_confluence::{confluence_filename, convert};

use super::validate_markdown_input;
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the confluence command.
#[derive(Args)]
pub(crate) struct ConfluenceArgs {
    /// Markdown file to convert.
    input: PathBuf,

    /// Output file (default: `<stem>-Confluence.txt` next to the input).
    output: Option<PathBuf>,
}

impl ConfluenceArgs {
    /// Execute the confluence command.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is invalid or files cannot be read or written.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        validate_markdown_input(&self.input)?;
        let output_path = self
            .output
            .unwrap_or_else(|| default_output_path(&self.input));

        output.info(&format!("Reading: {}", self.input.display()));
        let content = std::fs::read_to_string(&self.input)?;

        output.info("Converting to Confluence-compatible format...");
        let conversion = convert(&content)?;
        for warning in &conversion.warnings {
            output.warning(&format!("Warning: {warning}"));
        }

        output.info(&format!("Writing: {}", output_path.display()));
        std::fs::write(&output_path, &conversion.text)?;

        output.success("Conversion complete!");
        output.info(&format!("Output file: {}", output_path.display()));
        Ok(())
    }
}

/// `<input dir>/<stem>-Confluence.txt`.
fn default_output_path(input: &Path) -> PathBuf {
    input.with_file_name(confluence_filename(&input.to_string_lossy()))
}
