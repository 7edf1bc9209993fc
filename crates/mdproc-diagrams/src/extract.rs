//! Mermaid code block extraction.
//!
//! Uses pulldown-cmark events so fences nested in lists or blockquotes are
//! found as well, and fence semantics match what a Markdown viewer shows.

use pulldown_cmark::{CodeBlockKind, Event, Parser, Tag, TagEnd};

/// A Mermaid diagram found in a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MermaidDiagram {
    /// One-based position among the document's Mermaid diagrams.
    pub index: usize,
    /// Diagram source with surrounding whitespace trimmed.
    pub source: String,
}

/// Whether a fence info string names the Mermaid language.
///
/// Accepts `kroki-mermaid` as well for documents written for Kroki.
fn is_mermaid(info: &str) -> bool {
    let lang = info.split_whitespace().next().unwrap_or_default();
    let lang = lang.strip_prefix("kroki-").unwrap_or(lang);
    lang.eq_ignore_ascii_case("mermaid")
}

/// Extract all Mermaid diagrams from Markdown text, in document order.
///
/// Empty diagram blocks are skipped and do not consume an index.
///
/// # Example
///
/// ```
/// use mdproc_diagrams::extract_mermaid;
///
/// let markdown = "# Flow\n\n```mermaid\ngraph TD\n  A --> B\n```\n";
/// let diagrams = extract_mermaid(markdown);
/// assert_eq!(diagrams.len(), 1);
/// assert_eq!(diagrams[0].index, 1);
/// assert_eq!(diagrams[0].source, "graph TD\n  A --> B");
/// ```
#[must_use]
pub fn extract_mermaid(markdown: &str) -> Vec<MermaidDiagram> {
    let mut diagrams = Vec::new();
    let mut current: Option<String> = None;

    for event in Parser::new(markdown) {
        match event {
            Event::Start(Tag::CodeBlock(CodeBlockKind::Fenced(info))) if is_mermaid(&info) => {
                current = Some(String::new());
            }
            Event::Text(text) => {
                if let Some(buf) = current.as_mut() {
                    buf.push_str(&text);
                }
            }
            Event::End(TagEnd::CodeBlock) => {
                if let Some(source) = current.take() {
                    let source = source.trim();
                    if source.is_empty() {
                        continue;
                    }
                    diagrams.push(MermaidDiagram {
                        index: diagrams.len() + 1,
                        source: source.to_owned(),
                    });
                }
            }
            _ => {}
        }
    }

    diagrams
}

/// PNG filename for a diagram: `{stem}_diagram_{index}.png`.
#[must_use]
pub fn diagram_filename(stem: &str, index: usize) -> String {
    format!("{stem}_diagram_{index}.png")
}

/// Archive filename for a document's diagrams: `{stem}_diagrams.zip`.
#[must_use]
pub fn archive_filename(stem: &str) -> String {
    format!("{stem}_diagrams.zip")
}
