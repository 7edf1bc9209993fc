//! Application state.

use mdproc_diagrams::MermaidCli;

/// Application state shared across all handlers.
pub(crate) struct AppState {
    /// Mermaid CLI used for `/convert/mermaid` and the health probe.
    pub(crate) mermaid: MermaidCli,
    /// Upload body limit in bytes.
    pub(crate) max_upload_bytes: usize,
    /// Application version reported by `/health`.
    pub(crate) version: String,
}
