//! Error types for Confluence conversion.

/// Conversion error.
///
/// Malformed constructs never surface here: they degrade to paragraph
/// passthrough and are reported through
/// [`Conversion::warnings`](crate::Conversion::warnings).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum ConvertError {
    /// Input is empty or contains only whitespace.
    #[error("input document is empty")]
    EmptyInput,
}
