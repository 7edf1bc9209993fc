//! Markdown to Confluence wiki markup converter.
//!
//! A line-oriented rewriter, not a full Markdown parser: each line is
//! classified by its leading characters (with one line of lookahead for
//! table headers) and rewritten into the Confluence equivalent.
//!
//! # Architecture
//!
//! - [`convert`]: single forward pass, owning all per-call state
//! - `fence`: code fence tracking; fenced content is never reinterpreted
//! - `block`: ordered line matchers (heading, table, rule, quote, list)
//! - `inline`: emphasis, code spans and links within a line
//! - [`CodeLanguage`]: fence info string to `{code}` macro language
//! - [`confluence_filename`] and friends: output naming
//!
//! # Example
//!
//! ```
//! use mdproc_confluence::{ConvertError, convert};
//!
//! let result = convert("# Title\n\n**a** and *b*\n").unwrap();
//! assert_eq!(result.text, "h1. Title\n\n*a* and _b_\n");
//!
//! assert_eq!(convert("   "), Err(ConvertError::EmptyInput));
//! ```

mod block;
mod converter;
mod error;
mod fence;
mod filename;
mod inline;
mod language;
mod list;
mod table;

pub use converter::{Conversion, convert};
pub use error::ConvertError;
pub use filename::{confluence_filename, file_stem, is_markdown_filename};
pub use language::CodeLanguage;
