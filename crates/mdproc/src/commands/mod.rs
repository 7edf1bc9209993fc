//! CLI command implementations.

pub(crate) mod confluence;
pub(crate) mod mermaid;
pub(crate) mod serve;

pub(crate) use confluence::ConfluenceArgs;
pub(crate) use mermaid::MermaidArgs;
pub(crate) use serve::ServeArgs;

use std::path::Path;

use mdproc_confluence::is_markdown_filename;

use crate::error::CliError;

/// Check that `input` exists and has a `.md` extension.
pub(crate) fn validate_markdown_input(input: &Path) -> Result<(), CliError> {
    if !input.is_file() {
        return Err(CliError::Validation(format!(
            "Input file not found: {}",
            input.display()
        )));
    }
    if !is_markdown_filename(&input.to_string_lossy()) {
        return Err(CliError::Validation(
            "Input file must be a .md (Markdown) file".to_owned(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_missing_input() {
        let dir = tempfile::tempdir().unwrap();
        let err = validate_markdown_input(&dir.path().join("absent.md")).unwrap_err();
        assert!(err.to_string().contains("Input file not found"));
    }

    #[test]
    fn test_validate_wrong_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.txt");
        std::fs::write(&path, "# Notes").unwrap();
        let err = validate_markdown_input(&path).unwrap_err();
        assert!(err.to_string().contains(".md"));
    }

    #[test]
    fn test_validate_markdown_input() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Notes.MD");
        std::fs::write(&path, "# Notes").unwrap();
        assert!(validate_markdown_input(&path).is_ok());
    }
}
