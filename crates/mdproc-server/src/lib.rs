//! HTTP server for mdproc.
//!
//! A thin axum shell around the converters, serving:
//! - `GET /`: upload page
//! - `GET /health`: liveness and Mermaid CLI availability
//! - `POST /convert/confluence`: Markdown to Confluence wiki markup download
//! - `POST /convert/mermaid`: Mermaid diagrams as a PNG or zip download
//!
//! # Quick Start
//!
//! ```ignore
//! use mdproc_server::{ServerConfig, run_server};
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = ServerConfig {
//!         port: 8080,
//!         ..ServerConfig::default()
//!     };
//!
//!     run_server(config).await.unwrap();
//! }
//! ```
//!
//! # Architecture
//!
//! ```text
//! Browser ──HTTP──► axum router (mdproc-server)
//!                        │
//!                        ├─► /convert/confluence ──► mdproc-confluence::convert
//!                        │
//!                        └─► /convert/mermaid ──► mdproc-diagrams
//!                                                    │
//!                                                    └─► mmdc child process
//! ```

mod app;
mod error;
mod handlers;
mod middleware;
mod state;

use std::sync::Arc;

use mdproc_diagrams::MermaidCli;
use state::AppState;

pub use error::ServerError;

/// Server configuration.
#[derive(Clone, Debug)]
pub struct ServerConfig {
    /// Host address to bind to.
    pub host: String,
    /// Port to listen on.
    pub port: u16,
    /// Maximum upload size in bytes.
    pub max_upload_bytes: usize,
    /// Enable permissive CORS.
    pub cors: bool,
    /// Mermaid CLI renderer.
    pub mermaid: MermaidCli,
    /// Application version reported by `/health`.
    pub version: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_owned(),
            port: 5001,
            max_upload_bytes: 16 * 1024 * 1024,
            cors: true,
            mermaid: MermaidCli::default(),
            version: String::new(),
        }
    }
}

/// Run the server until Ctrl-C.
///
/// # Errors
///
/// Returns an error if the address cannot be bound or the server fails.
pub async fn run_server(config: ServerConfig) -> std::io::Result<()> {
    let state = Arc::new(AppState {
        mermaid: config.mermaid,
        max_upload_bytes: config.max_upload_bytes,
        version: config.version,
    });

    let mermaid_available = state.mermaid.is_available().await;
    if !mermaid_available {
        tracing::warn!(
            program = state.mermaid.program(),
            "Mermaid CLI not found, /convert/mermaid will fail"
        );
    }

    let app = app::create_router(state, config.cors);

    let listener = tokio::net::TcpListener::bind((config.host.as_str(), config.port)).await?;
    tracing::info!(
        address = %listener.local_addr()?,
        mermaid_cli_available = mermaid_available,
        "Starting server"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
}

/// Wait for shutdown signal (Ctrl-C).
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for Ctrl-C");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received, stopping server...");
}

/// Create server configuration from mdproc config.
///
/// # Arguments
///
/// * `config` - Loaded mdproc configuration
/// * `version` - Application version
#[must_use]
pub fn server_config_from_config(config: &mdproc_config::Config, version: String) -> ServerConfig {
    let mermaid = &config.mermaid;
    ServerConfig {
        host: config.server.host.clone(),
        port: config.server.port,
        max_upload_bytes: config.server.max_upload_bytes,
        cors: config.server.cors,
        mermaid: MermaidCli::new(mermaid.cli.clone())
            .scale(mermaid.scale)
            .width(mermaid.width)
            .background(mermaid.background.clone())
            .timeout(mermaid.timeout())
            .probe_timeout(mermaid.probe_timeout()),
        version,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_config_from_config() {
        let mut config = mdproc_config::Config::default();
        config.server.port = 9000;
        config.server.cors = false;
        config.mermaid.cli = "/opt/mmdc".to_owned();

        let server = server_config_from_config(&config, "1.0.0".to_owned());

        assert_eq!(server.host, "127.0.0.1");
        assert_eq!(server.port, 9000);
        assert_eq!(server.max_upload_bytes, 16 * 1024 * 1024);
        assert!(!server.cors);
        assert_eq!(server.mermaid.program(), "/opt/mmdc");
        assert_eq!(server.version, "1.0.0");
    }
}
