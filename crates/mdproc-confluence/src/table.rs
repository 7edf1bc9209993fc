//! Table row rendering.
//!
//! Confluence tables have no separator row: a header row uses `||` between
//! cells and body rows use `|`.

use crate::inline::convert_inline;

/// Render a header row: `||a||b||`.
pub(crate) fn header_row(line: &str) -> String {
    render_row(line, "||")
}

/// Render a body row: `|a|b|`.
pub(crate) fn body_row(line: &str) -> String {
    render_row(line, "|")
}

fn render_row(line: &str, delimiter: &str) -> String {
    let mut out = String::from(delimiter);
    for cell in split_cells(line) {
        let converted = convert_inline(cell);
        // An empty cell would collapse into the neighbouring delimiter
        if converted.is_empty() {
            out.push(' ');
        } else {
            out.push_str(&converted);
        }
        out.push_str(delimiter);
    }
    out
}

/// Split a pipe-delimited row into trimmed cells.
///
/// Leading and trailing pipes are optional. A backslash-escaped pipe stays
/// inside its cell.
pub(crate) fn split_cells(line: &str) -> Vec<&str> {
    let trimmed = line.trim();
    let inner = trimmed.strip_prefix('|').unwrap_or(trimmed);
    let inner = match inner.strip_suffix('|') {
        Some(body) if !ends_with_escape(body) => body,
        _ => inner,
    };

    let bytes = inner.as_bytes();
    let mut cells = Vec::new();
    let mut start = 0;
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'\\' => i += 2,
            b'|' => {
                cells.push(inner[start..i].trim());
                start = i + 1;
                i += 1;
            }
            _ => i += 1,
        }
    }
    cells.push(inner[start..].trim());
    cells
}

/// Whether `text` ends in an odd number of backslashes, escaping what follows.
fn ends_with_escape(text: &str) -> bool {
    text.bytes().rev().take_while(|&b| b == b'\\').count() % 2 == 1
}
