//! `mdproc mermaid` command implementation.

use std::path::PathBuf;

use clap::Args;
use mdproc_config::{CliSettings, Config};
use mdproc_confluence::file_stem;
use mdproc_diagrams::{MermaidCli, RenderError, extract_mermaid};

use super::validate_markdown_input;
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the mermaid command.
#[derive(Args)]
pub(crate) struct MermaidArgs {
    /// Markdown file to extract diagrams from.
    input: PathBuf,

    /// Output directory (default: `mermaid.output_dir` from config).
    output_dir: Option<PathBuf>,

    /// Path to configuration file (default: auto-discover mdproc.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Mermaid CLI executable (overrides config).
    #[arg(long)]
    mmdc: Option<String>,
}

impl MermaidArgs {
    /// Execute the mermaid command.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is invalid, the Mermaid CLI is missing,
    /// or files cannot be read or written. Individual diagram failures are
    /// reported but do not fail the command.
    pub(crate) async fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        let cli_settings = CliSettings {
            mmdc: self.mmdc,
            ..CliSettings::default()
        };
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;

        validate_markdown_input(&self.input)?;

        let settings = &config.mermaid;
        let cli = MermaidCli::new(settings.cli.clone())
            .scale(settings.scale)
            .width(settings.width)
            .background(settings.background.clone())
            .timeout(settings.timeout())
            .probe_timeout(settings.probe_timeout());
        if !cli.is_available().await {
            return Err(RenderError::NotInstalled(settings.cli.clone()).into());
        }

        let output_dir = self
            .output_dir
            .unwrap_or_else(|| settings.output_dir.clone());
        tokio::fs::create_dir_all(&output_dir).await?;

        output.info(&format!("Reading: {}", self.input.display()));
        let content = tokio::fs::read_to_string(&self.input).await?;

        output.info("Extracting Mermaid diagrams...");
        let diagrams = extract_mermaid(&content);
        if diagrams.is_empty() {
            output.warning("No Mermaid diagrams found in the file");
            return Ok(());
        }
        output.success(&format!("Found {} diagram(s)", diagrams.len()));

        let stem = file_stem(&self.input.to_string_lossy());
        let report = cli.render_all(&diagrams, &stem, &output_dir).await;

        for path in &report.outputs {
            output.info(&format!("  Saved: {}", path.display()));
        }
        for failure in &report.failures {
            output.error(&format!(
                "  Failed to convert diagram {}: {}",
                failure.index, failure.error
            ));
        }

        let absolute_dir = std::path::absolute(&output_dir).unwrap_or(output_dir);
        output.separator();
        output.success("Conversion complete!");
        output.info(&format!(
            "Successfully converted: {}/{} diagrams",
            report.outputs.len(),
            report.total
        ));
        output.info(&format!("Output directory: {}", absolute_dir.display()));
        output.separator();

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_execute_missing_cli() {
        let dir = tempfile::tempdir().unwrap();
        let config = dir.path().join("mdproc.toml");
        std::fs::write(&config, "").unwrap();
        let input = dir.path().join("flow.md");
        std::fs::write(&input, "```mermaid\ngraph TD\n```\n").unwrap();

        let err = MermaidArgs {
            input,
            output_dir: None,
            config: Some(config),
            mmdc: Some("mdproc-test-no-such-mmdc".to_owned()),
        }
        .execute()
        .await
        .unwrap_err();

        assert!(matches!(err, CliError::Render(RenderError::NotInstalled(_))));
    }

    #[tokio::test]
    async fn test_execute_rejects_non_markdown() {
        let dir = tempfile::tempdir().unwrap();
        let config = dir.path().join("mdproc.toml");
        std::fs::write(&config, "").unwrap();
        let input = dir.path().join("flow.txt");
        std::fs::write(&input, "graph TD").unwrap();

        let err = MermaidArgs {
            input,
            output_dir: None,
            config: Some(config),
            mmdc: None,
        }
        .execute()
        .await
        .unwrap_err();

        assert!(matches!(err, CliError::Validation(_)));
    }
}
