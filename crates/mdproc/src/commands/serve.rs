//! `mdproc serve` command implementation.

use std::path::PathBuf;

use clap::Args;
use mdproc_config::{CliSettings, Config};
use mdproc_server::{run_server, server_config_from_config};

use crate::error::CliError;
use crate::output::Output;

/// Arguments for the serve command.
#[derive(Args)]
pub(crate) struct ServeArgs {
    /// Path to configuration file (default: auto-discover mdproc.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Host to bind to (overrides config).
    #[arg(long, env = "MDPROC_HOST")]
    host: Option<String>,

    /// Port to bind to (overrides config).
    #[arg(short, long, env = "MDPROC_PORT")]
    port: Option<u16>,

    /// Mermaid CLI executable (overrides config).
    #[arg(long)]
    mmdc: Option<String>,
}

impl ServeArgs {
    /// Execute the serve command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration fails or the server fails to start.
    pub(crate) async fn execute(self, version: &str) -> Result<(), CliError> {
        let output = Output::new();

        let cli_settings = CliSettings {
            host: self.host,
            port: self.port,
            mmdc: self.mmdc,
        };
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;

        output.separator();
        output.highlight("MD File Processor Server");
        output.separator();
        output.info(&format!(
            "Server running at: http://{}:{}",
            config.server.host, config.server.port
        ));
        if let Some(path) = &config.config_path {
            output.info(&format!("Config: {}", path.display()));
        }
        output.info(&format!("Mermaid CLI: {}", config.mermaid.cli));
        output.info(&format!(
            "Upload limit: {} bytes",
            config.server.max_upload_bytes
        ));
        output.info("Press Ctrl+C to stop the server");

        let server_config = server_config_from_config(&config, version.to_owned());
        run_server(server_config)
            .await
            .map_err(|e| CliError::Server(e.to_string()))?;

        Ok(())
    }
}
