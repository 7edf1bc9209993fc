//! Error types for diagram rendering and bundling.

use std::path::PathBuf;
use std::process::ExitStatus;
use std::time::Duration;

/// Error while rendering a diagram with the Mermaid CLI.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    /// The CLI executable could not be found.
    #[error(
        "mermaid-cli ({0}) is not installed. Install it using: npm install -g @mermaid-js/mermaid-cli"
    )]
    NotInstalled(String),

    /// The CLI process could not be started.
    #[error("failed to start mermaid-cli: {0}")]
    Spawn(#[source] std::io::Error),

    /// I/O error while preparing input files.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The CLI did not finish in time and was killed.
    #[error("conversion took longer than {}s", .0.as_secs())]
    Timeout(Duration),

    /// The CLI exited unsuccessfully.
    #[error("mermaid-cli failed ({status}): {stderr}")]
    Failed {
        /// Process exit status.
        status: ExitStatus,
        /// Captured standard error.
        stderr: String,
    },

    /// The CLI reported success but wrote no image.
    #[error("mermaid-cli produced no output at {}", .0.display())]
    MissingOutput(PathBuf),
}

/// Error while bundling rendered diagrams into a zip archive.
#[derive(Debug, thiserror::Error)]
pub enum ArchiveError {
    /// I/O error reading inputs or writing the archive.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Zip encoding error.
    #[error("zip error: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// Input path has no file name to use as the entry name.
    #[error("cannot derive archive entry name from {}", .0.display())]
    InvalidName(PathBuf),
}
