//! Line classification.
//!
//! Each line outside a code fence is matched against an ordered list of
//! patterns; the first match wins. Fences are handled earlier by
//! [`FenceTracker`](crate::fence::FenceTracker), so nothing here ever sees
//! code block content.

use std::sync::LazyLock;

use regex::Regex;

/// ATX heading: 1-6 `#`, whitespace, text, optional closing `#` run.
static HEADING_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(#{1,6})[ \t]+(.*?)(?:[ \t]+#+)?[ \t]*$").expect("invalid heading regex")
});

/// A run of seven or more `#` that would otherwise look like a heading.
static DEEP_HEADING_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^#{7,}[ \t]").expect("invalid deep heading regex"));

/// Bullet (`-`, `*`, `+`) or ordered (`1.`) list item.
static LIST_ITEM_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([ \t]*)([-*+]|[0-9]{1,9}\.)[ \t]+(.*)$").expect("invalid list item regex")
});

/// Table separator row: pipes, dashes, colons and whitespace.
static TABLE_SEPARATOR_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[ \t]*\|?[ \t]*:?-+:?[ \t]*(?:\|[ \t]*:?-+:?[ \t]*)*\|?[ \t]*$")
        .expect("invalid table separator regex")
});

/// Blockquote line (up to three spaces of indentation).
static BLOCKQUOTE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^ {0,3}>[ \t]?(.*)$").expect("invalid blockquote regex"));

/// Classified source line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Block<'a> {
    /// Empty or whitespace-only line.
    Blank,
    /// ATX heading with level 1-6.
    Heading { level: usize, text: &'a str },
    /// Pipe row followed by a separator row.
    TableHeader,
    /// Pipe row inside a table body.
    TableRow,
    /// `---`, `***` or `___`.
    HorizontalRule,
    /// `> text`.
    Blockquote { text: &'a str },
    /// List item with its indentation width in columns.
    ListItem {
        indent: usize,
        ordered: bool,
        text: &'a str,
    },
    /// Anything else.
    Paragraph,
}

/// Classify a line given one line of lookahead.
///
/// `in_table` is true while the previous line was part of a table, which
/// lets subsequent pipe rows continue the table body.
pub(crate) fn classify<'a>(line: &'a str, next: Option<&str>, in_table: bool) -> Block<'a> {
    if line.trim().is_empty() {
        return Block::Blank;
    }

    if let Some(caps) = HEADING_PATTERN.captures(line) {
        let level = caps.get(1).map_or(0, |m| m.len());
        let text = caps.get(2).map_or("", |m| m.as_str()).trim();
        if !text.is_empty() {
            return Block::Heading { level, text };
        }
    }

    if is_pipe_row(line) {
        if in_table {
            return Block::TableRow;
        }
        if next.is_some_and(is_table_separator) {
            return Block::TableHeader;
        }
    }

    if matches!(line.trim(), "---" | "***" | "___") {
        return Block::HorizontalRule;
    }

    if let Some(caps) = BLOCKQUOTE_PATTERN.captures(line) {
        let text = caps.get(1).map_or("", |m| m.as_str());
        return Block::Blockquote { text };
    }

    if let Some(caps) = LIST_ITEM_PATTERN.captures(line) {
        let indent = caps.get(1).map_or(0, |m| indent_width(m.as_str()));
        let ordered = caps
            .get(2)
            .is_some_and(|m| m.as_str().ends_with('.'));
        let text = caps.get(3).map_or("", |m| m.as_str()).trim_end();
        return Block::ListItem {
            indent,
            ordered,
            text,
        };
    }

    Block::Paragraph
}

/// Whether a line starts (after indentation) with a pipe.
pub(crate) fn is_pipe_row(line: &str) -> bool {
    line.trim_start().starts_with('|')
}

/// Whether a line is a table separator row.
pub(crate) fn is_table_separator(line: &str) -> bool {
    line.contains('|') && TABLE_SEPARATOR_PATTERN.is_match(line)
}

/// Whether a line looks like a heading deeper than level 6.
pub(crate) fn is_too_deep_heading(line: &str) -> bool {
    DEEP_HEADING_PATTERN.is_match(line)
}

/// Indentation width in columns, with tabs advancing to the next multiple of 4.
fn indent_width(indent: &str) -> usize {
    indent.chars().fold(0, |width, c| match c {
        '\t' => width + 4 - width % 4,
        _ => width + 1,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank() {
        assert_eq!(classify("", None, false), Block::Blank);
        assert_eq!(classify("   \t", None, false), Block::Blank);
    }

    #[test]
    fn test_heading_levels() {
        for level in 1..=6 {
            let line = format!("{} Title", "#".repeat(level));
            assert_eq!(
                classify(&line, None, false),
                Block::Heading {
                    level,
                    text: "Title"
                }
            );
        }
    }

    #[test]
    fn test_heading_strips_whitespace_and_closing_hashes() {
        assert_eq!(
            classify("##   Spaced out   ##  ", None, false),
            Block::Heading {
                level: 2,
                text: "Spaced out"
            }
        );
    }

    #[test]
    fn test_seven_hashes_is_paragraph() {
        assert_eq!(classify("####### Too deep", None, false), Block::Paragraph);
        assert!(is_too_deep_heading("####### Too deep"));
    }

    #[test]
    fn test_hash_without_space_is_paragraph() {
        assert_eq!(classify("#hashtag", None, false), Block::Paragraph);
        assert_eq!(classify("##", None, false), Block::Paragraph);
    }

    #[test]
    fn test_table_header_requires_separator() {
        assert_eq!(
            classify("| a | b |", Some("|---|:---:|"), false),
            Block::TableHeader
        );
        assert_eq!(
            classify("| a | b |", Some("| not | sep |"), false),
            Block::Paragraph
        );
        assert_eq!(classify("| a | b |", None, false), Block::Paragraph);
    }

    #[test]
    fn test_table_row_in_body() {
        assert_eq!(classify("| 1 | 2 |", None, true), Block::TableRow);
    }

    #[test]
    fn test_separator_patterns() {
        assert!(is_table_separator("|---|---|"));
        assert!(is_table_separator("| :-- | --: |"));
        assert!(is_table_separator("---|---"));
        assert!(!is_table_separator("---"));
        assert!(!is_table_separator("| a |"));
        assert!(!is_table_separator("|  |"));
    }

    #[test]
    fn test_horizontal_rule() {
        assert_eq!(classify("---", None, false), Block::HorizontalRule);
        assert_eq!(classify(" *** ", None, false), Block::HorizontalRule);
        assert_eq!(classify("___", None, false), Block::HorizontalRule);
        assert_eq!(classify("----", None, false), Block::Paragraph);
    }

    #[test]
    fn test_blockquote() {
        assert_eq!(
            classify("> quoted", None, false),
            Block::Blockquote { text: "quoted" }
        );
    }

    #[test]
    fn test_list_items() {
        assert_eq!(
            classify("- one", None, false),
            Block::ListItem {
                indent: 0,
                ordered: false,
                text: "one"
            }
        );
        assert_eq!(
            classify("    * nested", None, false),
            Block::ListItem {
                indent: 4,
                ordered: false,
                text: "nested"
            }
        );
        assert_eq!(
            classify("12. twelfth", None, false),
            Block::ListItem {
                indent: 0,
                ordered: true,
                text: "twelfth"
            }
        );
        assert_eq!(
            classify("\t+ tabbed", None, false),
            Block::ListItem {
                indent: 4,
                ordered: false,
                text: "tabbed"
            }
        );
    }

    #[test]
    fn test_marker_without_space_is_paragraph() {
        assert_eq!(classify("-dash", None, false), Block::Paragraph);
        assert_eq!(classify("1.5 million", None, false), Block::Paragraph);
        assert_eq!(classify("*emphasis*", None, false), Block::Paragraph);
    }

    #[test]
    fn test_indent_width() {
        assert_eq!(indent_width(""), 0);
        assert_eq!(indent_width("  "), 2);
        assert_eq!(indent_width("\t"), 4);
        assert_eq!(indent_width("  \t"), 4);
        assert_eq!(indent_width("\t  "), 6);
    }
}
