//! CLI error types.

use mdproc_config::ConfigError;
use mdproc_confluence::ConvertError;

/// CLI error type.
#[derive(Debug, thiserror::Error)]
pub(crate) enum CliError {
    #[error("{0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Convert(#[from] ConvertError),

    #[error("{0}")]
    Render(#[from] mdproc_diagrams::RenderError),

    #[error("{0}")]
    Server(String),

    #[error("{0}")]
    Validation(String),
}
