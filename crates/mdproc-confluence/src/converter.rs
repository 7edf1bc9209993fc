//! Markdown to Confluence wiki markup conversion.
//!
//! A single forward pass over the input lines. All state lives in a
//! [`ConversionState`] owned by one [`convert`] call.
//!
//! Fenced content is copied verbatim into a `{code}` macro. Confluence has no
//! escape inside that macro, so a content line containing `{code}` ends the
//! block early; such lines are reported as warnings.

use crate::block::{self, Block};
use crate::error::ConvertError;
use crate::fence::{FenceEvent, FenceTracker};
use crate::inline::convert_inline;
use crate::language::{CODE_MACRO, code_macro_open};
use crate::list::ListStack;
use crate::table;

/// Result of a successful conversion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conversion {
    /// Converted document.
    pub text: String,
    /// Constructs that were degraded or repaired, with 1-indexed line numbers.
    pub warnings: Vec<String>,
}

/// Table parsing progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TableState {
    /// Not inside a table.
    None,
    /// Header row emitted; the next line is its separator and is dropped.
    SeparatorPending,
    /// Inside the table body.
    Body,
}

/// Per-call conversion state.
struct ConversionState {
    fence: FenceTracker,
    table: TableState,
    list: ListStack,
    warnings: Vec<String>,
}

impl ConversionState {
    fn new() -> Self {
        Self {
            fence: FenceTracker::new(),
            table: TableState::None,
            list: ListStack::new(),
            warnings: Vec::new(),
        }
    }

    /// Convert one line. Returns `None` when the line is consumed without output.
    fn process_line(&mut self, line: &str, next: Option<&str>, line_num: usize) -> Option<String> {
        // Fence state comes first so code content is never reinterpreted
        if let Some(event) = self.fence.update(line, line_num) {
            return Some(match event {
                FenceEvent::Open { info } => {
                    self.table = TableState::None;
                    self.list.reset();
                    code_macro_open(info)
                }
                FenceEvent::Close => CODE_MACRO.to_owned(),
            });
        }
        if self.fence.in_fence() {
            if line.contains(CODE_MACRO) {
                let reason = "code block content contains {code} and ends the macro early";
                tracing::debug!(line = line_num, reason, "Degraded construct");
                self.warnings.push(format!("line {line_num}: {reason}"));
            }
            return Some(line.to_owned());
        }

        if self.table == TableState::SeparatorPending {
            self.table = TableState::Body;
            return None;
        }

        let in_table = self.table == TableState::Body;
        let block = block::classify(line, next, in_table);
        if !matches!(block, Block::TableRow) {
            self.table = TableState::None;
        }

        match block {
            Block::Blank => Some(line.to_owned()),
            Block::Heading { level, text } => {
                self.list.reset();
                Some(format!("h{level}. {}", convert_inline(text)))
            }
            Block::TableHeader => {
                self.list.reset();
                self.table = TableState::SeparatorPending;
                Some(table::header_row(line))
            }
            Block::TableRow => Some(table::body_row(line)),
            Block::HorizontalRule => {
                self.list.reset();
                Some("----".to_owned())
            }
            Block::Blockquote { text } => {
                self.list.reset();
                Some(format!("bq. {}", convert_inline(text)))
            }
            Block::ListItem {
                indent,
                ordered,
                text,
            } => {
                let marker = self.list.push_item(indent, ordered);
                Some(format!("{marker} {}", convert_inline(text)))
            }
            Block::Paragraph => {
                self.list.reset();
                self.note_degraded(line, line_num);
                Some(convert_inline(line))
            }
        }
    }

    /// Record constructs that looked like source syntax but did not qualify.
    fn note_degraded(&mut self, line: &str, line_num: usize) {
        let reason = if block::is_pipe_row(line) {
            "table row without separator treated as text"
        } else if block::is_too_deep_heading(line) {
            "heading deeper than level 6 treated as text"
        } else {
            return;
        };
        tracing::debug!(line = line_num, reason, "Degraded construct");
        self.warnings.push(format!("line {line_num}: {reason}"));
    }

    /// Close anything still open at end of input.
    fn finish(&mut self, output: &mut Vec<String>) {
        if let Some(opened_at) = self.fence.opened_at() {
            tracing::debug!(line = opened_at, "Closing unterminated code fence");
            self.warnings.push(format!(
                "line {opened_at}: unterminated code fence closed at end of document"
            ));
            output.push(CODE_MACRO.to_owned());
        }
    }
}

/// Convert a Markdown document to Confluence wiki markup.
///
/// Line endings are normalized to `\n`; a trailing newline in the input is
/// kept in the output.
///
/// # Errors
///
/// Returns [`ConvertError::EmptyInput`] if the input is empty or whitespace-only.
///
/// # Example
///
/// ```
/// let result = mdproc_confluence::convert("## Hello\n\n- one\n- two\n").unwrap();
/// assert_eq!(result.text, "h2. Hello\n\n* one\n* two\n");
/// ```
pub fn convert(input: &str) -> Result<Conversion, ConvertError> {
    if input.trim().is_empty() {
        return Err(ConvertError::EmptyInput);
    }

    let lines: Vec<&str> = input.lines().collect();
    let mut state = ConversionState::new();
    let mut output = Vec::with_capacity(lines.len() + 1);

    for (idx, line) in lines.iter().enumerate() {
        let next = lines.get(idx + 1).copied();
        if let Some(converted) = state.process_line(line, next, idx + 1) {
            output.push(converted);
        }
    }
    state.finish(&mut output);

    let mut text = output.join("\n");
    if input.ends_with('\n') {
        text.push('\n');
    }

    Ok(Conversion {
        text,
        warnings: state.warnings,
    })
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn convert_text(input: &str) -> String {
        convert(input).unwrap().text
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(convert(""), Err(ConvertError::EmptyInput));
        assert_eq!(convert("  \n\t\n"), Err(ConvertError::EmptyInput));
    }

    #[test]
    fn test_heading_list_example() {
        assert_eq!(
            convert_text("## Hello\n\n- one\n- two\n"),
            "h2. Hello\n\n* one\n* two\n"
        );
    }

    #[test]
    fn test_all_heading_levels() {
        for level in 1..=6 {
            let input = format!("{} Title", "#".repeat(level));
            assert_eq!(convert_text(&input), format!("h{level}. Title"));
        }
    }

    #[test]
    fn test_seven_hashes_literal() {
        let result = convert("####### Not a heading").unwrap();
        assert_eq!(result.text, "####### Not a heading");
        assert_eq!(
            result.warnings,
            vec!["line 1: heading deeper than level 6 treated as text"]
        );
    }

    #[test]
    fn test_code_fence_with_language() {
        let input = "```python\n# not a heading\n- not a list\n```\n";
        assert_eq!(
            convert_text(input),
            "{code:language=python}\n# not a heading\n- not a list\n{code}\n"
        );
    }

    #[test]
    fn test_code_fence_unknown_language() {
        assert_eq!(
            convert_text("```mermaid\ngraph TD\n```"),
            "{code}\ngraph TD\n{code}"
        );
    }

    #[test]
    fn test_code_fence_content_verbatim() {
        let input = "~~~\n| a | b |\n|---|---|\n**bold**\n~~~";
        assert_eq!(
            convert_text(input),
            "{code}\n| a | b |\n|---|---|\n**bold**\n{code}"
        );
    }

    #[test]
    fn test_code_macro_inside_fence_warns() {
        let result = convert("```\nwiki uses {code} blocks\n```").unwrap();
        assert_eq!(result.text, "{code}\nwiki uses {code} blocks\n{code}");
        assert_eq!(
            result.warnings,
            vec!["line 2: code block content contains {code} and ends the macro early"]
        );
    }

    #[test]
    fn test_deeply_nested_emphasis_line() {
        let depth = 10_000;
        let line = format!("{}x{}", "*a **b ".repeat(depth), " c** d*".repeat(depth));
        let expected = format!("{}x{}", "_a *b ".repeat(depth), " c* d_".repeat(depth));
        assert_eq!(convert_text(&line), expected);
    }

    #[test]
    fn test_unterminated_fence_closed() {
        let result = convert("Intro\n\n```rust\nfn main() {}\n").unwrap();
        assert_eq!(
            result.text,
            "Intro\n\n{code:language=rust}\nfn main() {}\n{code}\n"
        );
        assert_eq!(
            result.warnings,
            vec!["line 3: unterminated code fence closed at end of document"]
        );
    }

    #[test]
    fn test_table() {
        let input = "| Name | Age |\n|------|-----|\n| Ann | 31 |\n| Bob | 42 |\n";
        assert_eq!(
            convert_text(input),
            "||Name||Age||\n|Ann|31|\n|Bob|42|\n"
        );
    }

    #[test]
    fn test_table_ends_at_last_pipe_row() {
        let input = "| a |\n|---|\n| 1 |\nAfter table";
        assert_eq!(convert_text(input), "||a||\n|1|\nAfter table");
    }

    #[test]
    fn test_pipe_row_without_separator_is_paragraph() {
        let result = convert("| just | pipes |\nnext line").unwrap();
        assert_eq!(result.text, "| just | pipes |\nnext line");
        assert_eq!(
            result.warnings,
            vec!["line 1: table row without separator treated as text"]
        );
    }

    #[test]
    fn test_two_tables_separated_by_blank() {
        let input = "| a |\n|---|\n| 1 |\n\n| b |\n|---|\n| 2 |";
        assert_eq!(
            convert_text(input),
            "||a||\n|1|\n\n||b||\n|2|"
        );
    }

    #[test]
    fn test_inline_emphasis() {
        assert_eq!(convert_text("**a** and *b*"), "*a* and _b_");
    }

    #[test]
    fn test_nested_lists() {
        let input = "- top\n  - child\n    - grandchild\n- back\n";
        assert_eq!(
            convert_text(input),
            "* top\n** child\n*** grandchild\n* back\n"
        );
    }

    #[test]
    fn test_ordered_list_with_nested_bullets() {
        let input = "1. first\n   - detail\n2. second";
        assert_eq!(convert_text(input), "# first\n#* detail\n# second");
    }

    #[test]
    fn test_list_survives_blank_line_but_not_paragraph() {
        let input = "- a\n  - b\n\n  - c\nText\n  - d";
        assert_eq!(
            convert_text(input),
            "* a\n** b\n\n** c\nText\n* d"
        );
    }

    #[test]
    fn test_horizontal_rule_and_quote() {
        assert_eq!(
            convert_text("> a **quote**\n\n---\n"),
            "bq. a *quote*\n\n----\n"
        );
    }

    #[test]
    fn test_blank_lines_preserved() {
        let input = "# T\n\n\npara\n\n- x\n\n\n\n";
        let output = convert_text(input);
        let blanks = |s: &str| s.lines().filter(|l| l.trim().is_empty()).count();
        assert_eq!(blanks(&output), blanks(input));
    }

    #[test]
    fn test_crlf_input() {
        assert_eq!(convert_text("# T\r\n\r\ntext\r\n"), "h1. T\n\ntext\n");
    }

    #[test]
    fn test_no_trailing_newline_kept() {
        assert_eq!(convert_text("plain"), "plain");
    }

    #[test]
    fn test_second_pass_keeps_headings_and_tables() {
        let input = "# Title\n\n| a | b |\n|---|---|\n| 1 | 2 |\n";
        let first = convert_text(input);
        let second = convert(&first).unwrap();
        assert_eq!(second.text, first);
    }

    #[test]
    fn test_full_document() {
        let input = "\
# Guide

Intro with **bold**, *italic* and `code`.

## Steps

1. Install
2. Run `tool --help`
   - see [docs](https://example.com)

| Option | Meaning |
| :----- | ------: |
| `-v` | verbose |

```sh
echo \"# hi\"
```
";
        let expected = "\
h1. Guide

Intro with *bold*, _italic_ and {{code}}.

h2. Steps

# Install
# Run {{tool --help}}
#* see [docs|https://example.com]

||Option||Meaning||
|{{-v}}|verbose|

{code:language=bash}
echo \"# hi\"
{code}
";
        assert_eq!(convert_text(input), expected);
    }
}
