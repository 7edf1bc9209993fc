//! Output file naming.

use std::path::Path;

/// Suffix appended to the input stem for converted documents.
const CONFLUENCE_SUFFIX: &str = "-Confluence.txt";

/// Whether `name` has a `.md` extension (case-insensitive).
#[must_use]
pub fn is_markdown_filename(name: &str) -> bool {
    Path::new(name)
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("md"))
}

/// File stem of `name`: final path component without its extension.
///
/// Falls back to `"document"` when the name has no usable stem.
#[must_use]
pub fn file_stem(name: &str) -> String {
    Path::new(name)
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .filter(|stem| !stem.is_empty())
        .unwrap_or_else(|| "document".to_owned())
}

/// Suggested filename for the converted document: `{stem}-Confluence.txt`.
#[must_use]
pub fn confluence_filename(name: &str) -> String {
    format!("{}{CONFLUENCE_SUFFIX}", file_stem(name))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_markdown_filename() {
        assert!(is_markdown_filename("notes.md"));
        assert!(is_markdown_filename("NOTES.MD"));
        assert!(is_markdown_filename("dir/notes.Md"));
        assert!(!is_markdown_filename("notes.markdown"));
        assert!(!is_markdown_filename("notes.txt"));
        assert!(!is_markdown_filename("md"));
        assert!(!is_markdown_filename(""));
    }

    #[test]
    fn test_file_stem() {
        assert_eq!(file_stem("guide.md"), "guide");
        assert_eq!(file_stem("docs/guide.v2.md"), "guide.v2");
        assert_eq!(file_stem(""), "document");
    }

    #[test]
    fn test_confluence_filename() {
        assert_eq!(confluence_filename("README.md"), "README-Confluence.txt");
        assert_eq!(
            confluence_filename("/tmp/upload/design.md"),
            "design-Confluence.txt"
        );
    }
}
