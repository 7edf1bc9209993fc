//! Inline markup conversion.
//!
//! Rewrites emphasis, strikethrough, code spans, links and images inside a
//! single line of text. The line is scanned once: code spans, links and
//! images become finished markup, and runs of `*`, `_` and `~` go onto a
//! delimiter stack. A closing run pairs with the nearest compatible opener,
//! so spans nest properly and an opener without a partner stays literal.
//! Nothing recurses per nesting level, which keeps the pass linear on
//! hostile input.
//!
//! | Markdown        | Confluence    |
//! |-----------------|---------------|
//! | `**b**` `__b__` | `*b*`         |
//! | `*i*` `_i_`     | `_i_`         |
//! | `~~s~~`         | `-s-`         |
//! | `` `c` ``       | `{{c}}`       |
//! | `[t](url)`      | `[t\|url]`    |
//! | `![a](url)`     | `!url!`       |

use std::collections::HashMap;

/// Convert inline Markdown markup in `text` to Confluence wiki markup.
pub(crate) fn convert_inline(text: &str) -> String {
    render(text, true)
}

/// Render one run of inline text.
///
/// Link labels are rendered with `links` off: links do not nest, and the
/// label pass is the only recursion.
fn render(text: &str, links: bool) -> String {
    let bytes = text.as_bytes();
    let code_spans = find_code_spans(text);
    let brackets = match_brackets(text, &code_spans);
    let parens = match_parens(text);

    let mut tokens: Vec<Token<'_>> = Vec::new();
    let mut delimiters: Vec<Delimiter> = Vec::new();
    let mut openers = Openers::default();
    let mut plain_start = 0;
    let mut i = 0;

    while i < text.len() {
        let markup = match bytes[i] {
            b'\\' => {
                i += 1 + text[i + 1..].chars().next().map_or(0, char::len_utf8);
                continue;
            }
            b'`' => {
                let Some(span) = code_spans.get(&i) else {
                    i += run_length(bytes, i, b'`');
                    continue;
                };
                Some((format!("{{{{{}}}}}", span.content), span.end))
            }
            b'!' if bytes.get(i + 1) == Some(&b'[') => {
                parse_link(text, i + 1, &brackets, &parens)
                    .map(|link| (format!("!{}!", link.url), link.end))
            }
            b'[' if links => parse_link(text, i, &brackets, &parens).map(|link| {
                let label = escape_pipes(&render(link.label, false));
                (format!("[{label}|{}]", link.url), link.end)
            }),
            marker @ (b'*' | b'_' | b'~') => {
                let run = run_length(bytes, i, marker);
                if marker == b'~' && run < 2 {
                    i += run;
                    continue;
                }
                push_plain(&mut tokens, text, plain_start, i);
                let (can_open, can_close) = flanking(text, i, run, marker);
                tokens.push(Token::Delimiter(delimiters.len()));
                delimiters.push(Delimiter {
                    marker,
                    remaining: run,
                    opening: String::new(),
                    closing: String::new(),
                });
                openers.process(&mut delimiters, can_open, can_close);
                i += run;
                plain_start = i;
                continue;
            }
            _ => None,
        };

        if let Some((markup, end)) = markup {
            push_plain(&mut tokens, text, plain_start, i);
            tokens.push(Token::Markup(markup));
            i = end;
            plain_start = i;
        } else {
            i += text[i..].chars().next().map_or(1, char::len_utf8);
        }
    }
    push_plain(&mut tokens, text, plain_start, text.len());

    let mut out = String::with_capacity(text.len() + 8);
    for token in &tokens {
        match token {
            Token::Plain(s) => out.push_str(s),
            Token::Markup(s) => out.push_str(s),
            Token::Delimiter(idx) => delimiters[*idx].write_to(&mut out),
        }
    }
    out
}

/// A piece of the rendered line.
enum Token<'a> {
    /// Source text copied as is.
    Plain(&'a str),
    /// Finished markup (code span, link, image).
    Markup(String),
    /// Index into the delimiter list.
    Delimiter(usize),
}

fn push_plain<'a>(tokens: &mut Vec<Token<'a>>, text: &'a str, start: usize, end: usize) {
    if start < end {
        tokens.push(Token::Plain(&text[start..end]));
    }
}

/// A run of emphasis markers.
///
/// Pairing consumes markers from the inner edge of each run. Tags collected
/// while closing are written before any unconsumed markers, tags collected
/// while opening after them.
struct Delimiter {
    marker: u8,
    /// Markers not consumed by a span.
    remaining: usize,
    /// Opening tags, outermost first.
    opening: String,
    /// Closing tags, innermost first.
    closing: String,
}

impl Delimiter {
    fn write_to(&self, out: &mut String) {
        out.push_str(&self.closing);
        for _ in 0..self.remaining {
            out.push(char::from(self.marker));
        }
        out.push_str(&self.opening);
    }

    fn usable(&self) -> bool {
        self.remaining >= min_width(self.marker)
    }
}

/// Smallest run that forms a span: `~~` for strikethrough, one otherwise.
fn min_width(marker: u8) -> usize {
    if marker == b'~' { 2 } else { 1 }
}

/// Number of markers a matched opener/closer pair consumes.
///
/// With three or more on both sides the inner span is italic, so `***x***`
/// becomes bold around italic.
fn span_width(marker: u8, opener: usize, closer: usize) -> usize {
    match marker {
        b'~' => 2,
        _ if opener >= 3 && closer >= 3 => 1,
        _ if opener >= 2 && closer >= 2 => 2,
        _ => 1,
    }
}

fn span_tag(marker: u8, width: usize) -> &'static str {
    match (marker, width) {
        (b'~', _) => "-",
        (_, 2) => "*",
        _ => "_",
    }
}

/// Open delimiter runs, one stack per marker kind.
#[derive(Default)]
struct Openers {
    stacks: [Vec<usize>; 3],
}

impl Openers {
    fn slot(marker: u8) -> usize {
        match marker {
            b'*' => 0,
            b'_' => 1,
            _ => 2,
        }
    }

    /// Pair the newest delimiter with earlier openers, then keep it as an
    /// opener if markers are left.
    fn process(&mut self, delimiters: &mut [Delimiter], can_open: bool, can_close: bool) {
        let Some(current) = delimiters.len().checked_sub(1) else {
            return;
        };
        let marker = delimiters[current].marker;
        let slot = Self::slot(marker);

        if can_close {
            while delimiters[current].usable() {
                let Some(&opener) = self.stacks[slot].last() else {
                    break;
                };
                // Openers of other kinds inside the span can no longer close
                for (other, stack) in self.stacks.iter_mut().enumerate() {
                    if other != slot {
                        while stack.last().is_some_and(|&idx| idx > opener) {
                            stack.pop();
                        }
                    }
                }

                let width = span_width(
                    marker,
                    delimiters[opener].remaining,
                    delimiters[current].remaining,
                );
                let tag = span_tag(marker, width);

                let open = &mut delimiters[opener];
                open.remaining -= width;
                open.opening.insert_str(0, tag);
                if !open.usable() {
                    self.stacks[slot].pop();
                }

                let close = &mut delimiters[current];
                close.remaining -= width;
                close.closing.push_str(tag);
            }
        }

        if can_open && delimiters[current].usable() {
            self.stacks[slot].push(current);
        }
    }
}

/// Whether a run of `len` markers at `i` may open and may close a span.
///
/// An opener must be followed by non-whitespace and a closer preceded by
/// it. `_` additionally may not open or close inside a word.
fn flanking(text: &str, i: usize, len: usize, marker: u8) -> (bool, bool) {
    let prev = text[..i].chars().next_back();
    let next = text[i + len..].chars().next();

    let mut can_open = next.is_some_and(|c| !c.is_whitespace());
    let mut can_close = prev.is_some_and(|c| !c.is_whitespace());
    if marker == b'_' {
        can_open &= !prev.is_some_and(char::is_alphanumeric);
        can_close &= !next.is_some_and(char::is_alphanumeric);
    }
    (can_open, can_close)
}

/// Count consecutive `byte` characters starting at `i`.
fn run_length(bytes: &[u8], i: usize, byte: u8) -> usize {
    bytes[i..].iter().take_while(|&&b| b == byte).count()
}

/// A matched code span.
struct CodeSpan<'a> {
    content: &'a str,
    /// Byte offset just past the closing run.
    end: usize,
}

/// Locate every code span in `text`, keyed by the offset of its opening run.
///
/// The closing run must have exactly the same number of backticks. One
/// leading and one trailing space are stripped when both are present and
/// the content is not all spaces.
fn find_code_spans(text: &str) -> HashMap<usize, CodeSpan<'_>> {
    let bytes = text.as_bytes();
    let mut spans = HashMap::new();
    // Run lengths with no closer left in the line
    let mut unmatched: Vec<usize> = Vec::new();
    let mut i = 0;

    while i < bytes.len() {
        match bytes[i] {
            b'\\' => i += 2,
            b'`' => {
                let open = run_length(bytes, i, b'`');
                if !unmatched.contains(&open) {
                    if let Some(span) = code_span_at(text, i, open) {
                        let end = span.end;
                        spans.insert(i, span);
                        i = end;
                        continue;
                    }
                    unmatched.push(open);
                }
                i += open;
            }
            _ => i += 1,
        }
    }

    spans
}

/// Match a code span whose opening run of `open` backticks starts at `start`.
fn code_span_at(text: &str, start: usize, open: usize) -> Option<CodeSpan<'_>> {
    let bytes = text.as_bytes();
    let mut j = start + open;

    while j < bytes.len() {
        if bytes[j] != b'`' {
            j += 1;
            continue;
        }
        let run = run_length(bytes, j, b'`');
        if run == open {
            let mut content = &text[start + open..j];
            if content.len() >= 2
                && content.starts_with(' ')
                && content.ends_with(' ')
                && !content.bytes().all(|b| b == b' ')
            {
                content = &content[1..content.len() - 1];
            }
            return Some(CodeSpan {
                content,
                end: j + run,
            });
        }
        j += run;
    }

    None
}

/// Pair `[` with its `]`, skipping escapes and code spans.
fn match_brackets(text: &str, code_spans: &HashMap<usize, CodeSpan<'_>>) -> HashMap<usize, usize> {
    let bytes = text.as_bytes();
    let mut pairs = HashMap::new();
    let mut open = Vec::new();
    let mut i = 0;

    while i < bytes.len() {
        if let Some(span) = code_spans.get(&i) {
            i = span.end;
            continue;
        }
        match bytes[i] {
            b'\\' => i += 1,
            b'[' => open.push(i),
            b']' => {
                if let Some(start) = open.pop() {
                    pairs.insert(start, i);
                }
            }
            _ => {}
        }
        i += 1;
    }

    pairs
}

/// Pair `(` with its balancing `)`, skipping escapes.
fn match_parens(text: &str) -> HashMap<usize, usize> {
    let bytes = text.as_bytes();
    let mut pairs = HashMap::new();
    let mut open = Vec::new();
    let mut i = 0;

    while i < bytes.len() {
        match bytes[i] {
            b'\\' => i += 1,
            b'(' => open.push(i),
            b')' => {
                if let Some(start) = open.pop() {
                    pairs.insert(start, i);
                }
            }
            _ => {}
        }
        i += 1;
    }

    pairs
}

/// A matched `[label](url)` link.
struct Link<'a> {
    label: &'a str,
    url: &'a str,
    /// Byte offset just past the closing parenthesis.
    end: usize,
}

/// Match an inline link whose `[` is at byte `open`.
///
/// The target runs to the balancing `)`, so URLs may contain parenthesised
/// parts. A link title (`[t](url "title")`) is dropped since the target
/// syntax has no place for it.
fn parse_link<'a>(
    text: &'a str,
    open: usize,
    brackets: &HashMap<usize, usize>,
    parens: &HashMap<usize, usize>,
) -> Option<Link<'a>> {
    let close = *brackets.get(&open)?;
    if text.as_bytes().get(close + 1) != Some(&b'(') {
        return None;
    }
    let paren_close = *parens.get(&(close + 1))?;
    let url = text[close + 2..paren_close].split_whitespace().next()?;

    Some(Link {
        label: &text[open + 1..close],
        url,
        end: paren_close + 1,
    })
}

/// Escape `|` in a link label, where it would end the label early.
fn escape_pipes(label: &str) -> String {
    let mut out = String::with_capacity(label.len());
    let mut escaped = false;
    for c in label.chars() {
        if c == '|' && !escaped {
            out.push('\\');
        }
        escaped = c == '\\' && !escaped;
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use std::time::{Duration, Instant};

    use super::*;

    #[test]
    fn test_plain_text_unchanged() {
        assert_eq!(convert_inline("Just some text."), "Just some text.");
        assert_eq!(convert_inline(""), "");
    }

    #[test]
    fn test_bold_and_italic_in_one_line() {
        assert_eq!(convert_inline("**a** and *b*"), "*a* and _b_");
    }

    #[test]
    fn test_underscore_variants() {
        assert_eq!(convert_inline("__bold__ and _it_"), "*bold* and _it_");
    }

    #[test]
    fn test_bold_containing_italic() {
        assert_eq!(
            convert_inline("**bold with *italic* inside**"),
            "*bold with _italic_ inside*"
        );
    }

    #[test]
    fn test_italic_containing_bold() {
        assert_eq!(convert_inline("*a **b** c*"), "_a *b* c_");
    }

    #[test]
    fn test_triple_markers() {
        assert_eq!(convert_inline("***both***"), "*_both_*");
    }

    #[test]
    fn test_unmatched_marker_left_literal() {
        assert_eq!(convert_inline("**never closed"), "**never closed");
        assert_eq!(convert_inline("a *b"), "a *b");
        assert_eq!(convert_inline("*open **bold**"), "*open *bold*");
    }

    #[test]
    fn test_crossed_spans_do_not_overlap() {
        assert_eq!(convert_inline("*a _b* c_"), "_a _b_ c_");
    }

    #[test]
    fn test_spaced_asterisks_not_emphasis() {
        assert_eq!(convert_inline("2 * 3 * 4"), "2 * 3 * 4");
    }

    #[test]
    fn test_intraword_underscore_literal() {
        assert_eq!(convert_inline("call snake_case_name now"), "call snake_case_name now");
    }

    #[test]
    fn test_strikethrough() {
        assert_eq!(convert_inline("~~gone~~ and ~tilde"), "-gone- and ~tilde");
    }

    #[test]
    fn test_code_span_is_opaque() {
        assert_eq!(convert_inline("use `__init__` here"), "use {{__init__}} here");
        assert_eq!(convert_inline("`` a`b ``"), "{{a`b}}");
    }

    #[test]
    fn test_unmatched_backtick_literal() {
        assert_eq!(convert_inline("a ` b"), "a ` b");
        assert_eq!(convert_inline("`` a ` b `c`"), "`` a {{b}}c`");
    }

    #[test]
    fn test_code_span_hides_closing_marker() {
        assert_eq!(convert_inline("*a `*` b*"), "_a {{*}} b_");
    }

    #[test]
    fn test_link() {
        assert_eq!(
            convert_inline("see [the **docs**](https://example.com/a_b)"),
            "see [the *docs*|https://example.com/a_b]"
        );
    }

    #[test]
    fn test_link_title_dropped() {
        assert_eq!(
            convert_inline(r#"[x](http://e.com "Title")"#),
            "[x|http://e.com]"
        );
    }

    #[test]
    fn test_link_label_pipe_escaped() {
        assert_eq!(convert_inline("[a|b](http://e.com)"), r"[a\|b|http://e.com]");
    }

    #[test]
    fn test_link_url_with_parentheses() {
        assert_eq!(
            convert_inline("[Rust](https://en.wikipedia.org/wiki/Rust_(language)) rocks"),
            "[Rust|https://en.wikipedia.org/wiki/Rust_(language)] rocks"
        );
    }

    #[test]
    fn test_bracket_in_code_span_ignored_by_link() {
        assert_eq!(
            convert_inline("[see `a]` here](http://e.com)"),
            "[see {{a]}} here|http://e.com]"
        );
    }

    #[test]
    fn test_image() {
        assert_eq!(convert_inline("![logo](img/logo.png)"), "!img/logo.png!");
    }

    #[test]
    fn test_image_inside_link() {
        assert_eq!(
            convert_inline("[![badge](b.svg)](http://ci)"),
            "[!b.svg!|http://ci]"
        );
    }

    #[test]
    fn test_bracket_without_target_literal() {
        assert_eq!(convert_inline("[not a link] text"), "[not a link] text");
    }

    #[test]
    fn test_escaped_marker_literal() {
        assert_eq!(convert_inline(r"\*not italic\*"), r"\*not italic\*");
    }

    #[test]
    fn test_unicode_text_preserved() {
        assert_eq!(convert_inline("**héllo** → *wörld*"), "*héllo* → _wörld_");
    }

    #[test]
    fn test_many_unclosed_markers_stay_fast() {
        let line = "*a **b ".repeat(200);
        let started = Instant::now();
        let converted = convert_inline(&line);
        assert!(started.elapsed() < Duration::from_secs(1));
        assert_eq!(converted, line);
    }

    #[test]
    fn test_deep_nesting_does_not_overflow() {
        let depth = 10_000;
        let mut line = String::new();
        let mut expected = String::new();
        for level in 0..depth {
            let (marker, tag) = if level % 2 == 0 { ("**", "*") } else { ("*", "_") };
            line.push_str(&format!("{marker}a "));
            expected.push_str(&format!("{tag}a "));
        }
        for level in (0..depth).rev() {
            let (marker, tag) = if level % 2 == 0 { ("**", "*") } else { ("*", "_") };
            line.push_str(&format!("b{marker} "));
            expected.push_str(&format!("b{tag} "));
        }

        assert_eq!(convert_inline(&line), expected);
    }

    #[test]
    fn test_many_unclosed_brackets_stay_fast() {
        let line = "[a](b ".repeat(2_000);
        let started = Instant::now();
        let converted = convert_inline(&line);
        assert!(started.elapsed() < Duration::from_secs(1));
        assert_eq!(converted, line);
    }
}
