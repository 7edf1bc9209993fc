//! Conversion endpoints.
//!
//! Both endpoints accept a multipart upload with a `file` field holding a
//! `.md` document and answer with a file download.

use std::sync::Arc;

use axum::extract::multipart::MultipartRejection;
use axum::extract::{Multipart, State};
use axum::http::{HeaderValue, header};
use axum::response::{IntoResponse, Response};
use mdproc_confluence::{confluence_filename, convert, file_stem, is_markdown_filename};
use mdproc_diagrams::{RenderError, archive_filename, extract_mermaid, write_zip};

use crate::error::ServerError;
use crate::state::AppState;

/// Multipart field carrying the document.
const FILE_FIELD: &str = "file";

/// A validated Markdown upload.
struct Upload {
    /// Client-supplied filename.
    filename: String,
    /// Decoded document text.
    content: String,
}

/// Read and validate the `file` field of a multipart request.
///
/// Filename checks run before the body is read, so a wrong extension is
/// reported even for a non-UTF-8 body.
async fn read_upload(mut multipart: Multipart, limit: usize) -> Result<Upload, ServerError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ServerError::from_multipart(&e, limit))?
    {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }

        let filename = field.file_name().unwrap_or_default().to_owned();
        if filename.is_empty() {
            return Err(ServerError::EmptyFilename);
        }
        if !is_markdown_filename(&filename) {
            return Err(ServerError::NotMarkdown);
        }

        let bytes = field
            .bytes()
            .await
            .map_err(|e| ServerError::from_multipart(&e, limit))?;
        let content = String::from_utf8(bytes.to_vec()).map_err(|_| ServerError::InvalidEncoding)?;

        return Ok(Upload { filename, content });
    }

    Err(ServerError::MissingFile)
}

/// Build a download response with the given content type and filename.
fn attachment(content_type: &'static str, filename: &str, body: impl IntoResponse) -> Response {
    let disposition = format!("attachment; filename=\"{}\"", sanitize_filename(filename));
    // Sanitized names are visible ASCII
    let disposition = HeaderValue::from_str(&disposition)
        .unwrap_or_else(|_| HeaderValue::from_static("attachment"));

    (
        [
            (header::CONTENT_TYPE, HeaderValue::from_static(content_type)),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        body,
    )
        .into_response()
}

/// Restrict a filename to characters safe inside a quoted header parameter.
fn sanitize_filename(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c == ' ' || (c.is_ascii_graphic() && c != '"' && c != '\\') {
                c
            } else {
                '_'
            }
        })
        .collect()
}

/// Handle POST /convert/confluence.
///
/// Conversion runs on the blocking pool so large documents do not hold up
/// other requests.
pub(crate) async fn convert_confluence(
    State(state): State<Arc<AppState>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Response, ServerError> {
    let Upload { filename, content } = read_upload(multipart?, state.max_upload_bytes).await?;
    let bytes = content.len();
    let conversion = tokio::task::spawn_blocking(move || convert(&content)).await??;

    for warning in &conversion.warnings {
        tracing::debug!(file = %filename, warning, "Degraded construct");
    }
    tracing::info!(
        file = %filename,
        bytes,
        "Converted document to Confluence markup"
    );

    Ok(attachment(
        "text/plain; charset=utf-8",
        &confluence_filename(&filename),
        conversion.text,
    ))
}

/// Handle POST /convert/mermaid.
///
/// A single rendered diagram is returned as a PNG; several are bundled into
/// a zip archive. All intermediate files live in a temporary directory that
/// is removed when the request finishes.
pub(crate) async fn convert_mermaid(
    State(state): State<Arc<AppState>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Response, ServerError> {
    let upload = read_upload(multipart?, state.max_upload_bytes).await?;

    if !state.mermaid.is_available().await {
        return Err(ServerError::Render(RenderError::NotInstalled(
            state.mermaid.program().to_owned(),
        )));
    }

    let diagrams = extract_mermaid(&upload.content);
    if diagrams.is_empty() {
        return Err(ServerError::NoDiagrams);
    }

    let stem = file_stem(&upload.filename);
    let work_dir = tempfile::tempdir()?;
    let report = state
        .mermaid
        .render_all(&diagrams, &stem, work_dir.path())
        .await;

    tracing::info!(
        file = %upload.filename,
        converted = report.outputs.len(),
        total = report.total,
        "Rendered Mermaid diagrams"
    );

    match report.outputs.as_slice() {
        [] => Err(ServerError::AllDiagramsFailed),
        [single] => {
            let bytes = tokio::fs::read(single).await?;
            let name = single
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_default();
            Ok(attachment("image/png", &name, bytes))
        }
        outputs => {
            let zip_name = archive_filename(&stem);
            let zip_path = work_dir.path().join(&zip_name);
            let files = outputs.to_vec();
            let dest = zip_path.clone();
            tokio::task::spawn_blocking(move || write_zip(&files, &dest)).await??;

            let bytes = tokio::fs::read(&zip_path).await?;
            Ok(attachment("application/zip", &zip_name, bytes))
        }
    }
}
