//! Error types for the HTTP server.

use axum::extract::multipart::MultipartError;
use axum::extract::multipart::MultipartRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use mdproc_confluence::ConvertError;
use mdproc_diagrams::{ArchiveError, RenderError};
use serde_json::json;

/// Server error type.
///
/// Every variant renders as a JSON body `{"error": "<message>"}`.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// No multipart field named `file`.
    #[error("No file provided")]
    MissingFile,

    /// The `file` field carried an empty filename.
    #[error("No file selected")]
    EmptyFilename,

    /// Upload does not have a `.md` extension.
    #[error("File must be a .md file")]
    NotMarkdown,

    /// Upload body is not valid UTF-8.
    #[error("File must be UTF-8 encoded text")]
    InvalidEncoding,

    /// Malformed multipart request.
    #[error("Invalid upload: {0}")]
    InvalidUpload(String),

    /// Upload exceeds the configured body limit.
    #[error("File too large (limit is {0} bytes)")]
    PayloadTooLarge(usize),

    /// Conversion rejected the document.
    #[error("{0}")]
    Convert(#[from] ConvertError),

    /// Document contains no Mermaid diagrams.
    #[error("No Mermaid diagrams found in file")]
    NoDiagrams,

    /// Mermaid CLI is missing or unusable.
    #[error("{0}")]
    Render(#[from] RenderError),

    /// Every diagram failed to render.
    #[error("Failed to convert any diagrams")]
    AllDiagramsFailed,

    /// Zip bundling failed.
    #[error("{0}")]
    Archive(#[from] ArchiveError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Background task panicked or was cancelled.
    #[error("Background task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

impl ServerError {
    /// Map a multipart read failure, keeping the body limit distinguishable.
    pub(crate) fn from_multipart(err: &MultipartError, limit: usize) -> Self {
        if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
            Self::PayloadTooLarge(limit)
        } else {
            Self::InvalidUpload(err.body_text())
        }
    }

    /// HTTP status for this error.
    pub(crate) fn status(&self) -> StatusCode {
        match self {
            Self::MissingFile
            | Self::EmptyFilename
            | Self::NotMarkdown
            | Self::InvalidEncoding
            | Self::InvalidUpload(_)
            | Self::Convert(_)
            | Self::NoDiagrams => StatusCode::BAD_REQUEST,
            Self::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            Self::Render(_)
            | Self::AllDiagramsFailed
            | Self::Archive(_)
            | Self::Io(_)
            | Self::Task(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<MultipartRejection> for ServerError {
    fn from(rejection: MultipartRejection) -> Self {
        Self::InvalidUpload(rejection.body_text())
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "Request failed");
        } else {
            tracing::debug!(error = %self, status = status.as_u16(), "Request rejected");
        }

        (status, axum::Json(json!({"error": self.to_string()}))).into_response()
    }
}
