//! Mermaid CLI (`mmdc`) invocation.
//!
//! Each diagram is written to a temporary `.mmd` file and rendered by a
//! child process. Children are killed if they outlive the timeout.

use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;

use tokio::process::Command;

use crate::consts::{
    DEFAULT_BACKGROUND, DEFAULT_PROBE_TIMEOUT, DEFAULT_PROGRAM, DEFAULT_SCALE, DEFAULT_TIMEOUT,
    DEFAULT_WIDTH,
};
use crate::error::RenderError;
use crate::extract::{MermaidDiagram, diagram_filename};

/// Mermaid CLI renderer.
///
/// # Example
///
/// ```ignore
/// use mdproc_diagrams::{MermaidCli, extract_mermaid};
///
/// let cli = MermaidCli::new("mmdc").scale(2).width(1600);
/// let diagrams = extract_mermaid(&markdown);
/// let report = cli.render_all(&diagrams, "guide", Path::new("out")).await;
/// ```
#[derive(Debug, Clone)]
pub struct MermaidCli {
    /// Executable name (resolved via `PATH`) or path.
    program: String,
    /// Device scale factor (`-s`).
    scale: u32,
    /// Page width in pixels (`-w`).
    width: u32,
    /// Background colour (`-b`).
    background: String,
    /// Timeout for one render.
    timeout: Duration,
    /// Timeout for the availability probe.
    probe_timeout: Duration,
}

impl Default for MermaidCli {
    fn default() -> Self {
        Self::new(DEFAULT_PROGRAM)
    }
}

impl MermaidCli {
    /// Create a renderer for the given executable with default settings.
    #[must_use]
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            scale: DEFAULT_SCALE,
            width: DEFAULT_WIDTH,
            background: DEFAULT_BACKGROUND.to_owned(),
            timeout: DEFAULT_TIMEOUT,
            probe_timeout: DEFAULT_PROBE_TIMEOUT,
        }
    }

    /// Set the device scale factor (default: 3).
    #[must_use]
    pub fn scale(mut self, scale: u32) -> Self {
        self.scale = scale;
        self
    }

    /// Set the page width in pixels (default: 2400).
    #[must_use]
    pub fn width(mut self, width: u32) -> Self {
        self.width = width;
        self
    }

    /// Set the background colour (default: `transparent`).
    #[must_use]
    pub fn background(mut self, background: impl Into<String>) -> Self {
        self.background = background.into();
        self
    }

    /// Set the per-diagram render timeout (default: 30 seconds).
    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the availability probe timeout (default: 5 seconds).
    #[must_use]
    pub fn probe_timeout(mut self, timeout: Duration) -> Self {
        self.probe_timeout = timeout;
        self
    }

    /// Configured executable name.
    #[must_use]
    pub fn program(&self) -> &str {
        &self.program
    }

    /// Resolve the executable on `PATH` (or check an explicit path).
    fn resolve_program(&self) -> Result<PathBuf, RenderError> {
        which::which(&self.program).map_err(|_| RenderError::NotInstalled(self.program.clone()))
    }

    /// Check whether the CLI is installed and answers `--version`.
    pub async fn is_available(&self) -> bool {
        let Ok(program) = self.resolve_program() else {
            return false;
        };

        let mut command = Command::new(program);
        command
            .arg("--version")
            .stdin(Stdio::null())
            .kill_on_drop(true);

        match tokio::time::timeout(self.probe_timeout, command.output()).await {
            Ok(Ok(output)) => output.status.success(),
            Ok(Err(e)) => {
                tracing::debug!(error = %e, "Mermaid CLI probe failed to start");
                false
            }
            Err(_) => {
                tracing::debug!("Mermaid CLI probe timed out");
                false
            }
        }
    }

    /// Render one diagram to a PNG at `output`.
    ///
    /// # Errors
    ///
    /// Returns an error if the CLI is missing, fails, times out, or does not
    /// produce the output file.
    pub async fn render_png(&self, source: &str, output: &Path) -> Result<(), RenderError> {
        let program = self.resolve_program()?;

        // Removed on drop, whatever the outcome
        let input = tempfile::Builder::new()
            .prefix("mdproc-")
            .suffix(".mmd")
            .tempfile()?;
        tokio::fs::write(input.path(), source).await?;

        let mut command = Command::new(program);
        command
            .arg("-i")
            .arg(input.path())
            .arg("-o")
            .arg(output)
            .arg("-b")
            .arg(&self.background)
            .arg("-s")
            .arg(self.scale.to_string())
            .arg("-w")
            .arg(self.width.to_string())
            .stdin(Stdio::null())
            .kill_on_drop(true);

        let result = tokio::time::timeout(self.timeout, command.output())
            .await
            .map_err(|_| RenderError::Timeout(self.timeout))?
            .map_err(RenderError::Spawn)?;

        if !result.status.success() {
            return Err(RenderError::Failed {
                status: result.status,
                stderr: String::from_utf8_lossy(&result.stderr).trim().to_owned(),
            });
        }
        if !output.exists() {
            return Err(RenderError::MissingOutput(output.to_path_buf()));
        }

        Ok(())
    }

    /// Render every diagram into `out_dir` as `{stem}_diagram_{n}.png`.
    ///
    /// Diagrams are rendered one at a time; a failure does not stop the
    /// remaining diagrams.
    pub async fn render_all(
        &self,
        diagrams: &[MermaidDiagram],
        stem: &str,
        out_dir: &Path,
    ) -> RenderReport {
        let mut report = RenderReport {
            total: diagrams.len(),
            ..RenderReport::default()
        };

        for diagram in diagrams {
            let path = out_dir.join(diagram_filename(stem, diagram.index));
            tracing::debug!(
                index = diagram.index,
                total = diagrams.len(),
                path = %path.display(),
                "Rendering diagram"
            );
            match self.render_png(&diagram.source, &path).await {
                Ok(()) => report.outputs.push(path),
                Err(error) => {
                    tracing::warn!(index = diagram.index, error = %error, "Diagram rendering failed");
                    report.failures.push(DiagramFailure {
                        index: diagram.index,
                        error,
                    });
                }
            }
        }

        report
    }
}

/// Outcome of rendering a batch of diagrams.
#[derive(Debug, Default)]
pub struct RenderReport {
    /// Number of diagrams attempted.
    pub total: usize,
    /// Paths of successfully rendered PNGs, in diagram order.
    pub outputs: Vec<PathBuf>,
    /// Diagrams that failed to render.
    pub failures: Vec<DiagramFailure>,
}

/// A diagram that failed to render.
#[derive(Debug)]
pub struct DiagramFailure {
    /// One-based diagram index.
    pub index: usize,
    /// Failure reason.
    pub error: RenderError,
}
