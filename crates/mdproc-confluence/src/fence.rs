//! Code fence tracking for line-by-line conversion.
//!
//! Content inside a fenced code block must reach the output verbatim, so the
//! converter consults the tracker before any other matcher.

/// A fence transition produced by [`FenceTracker::update`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum FenceEvent<'a> {
    /// Opening fence with the raw info string (may be empty).
    Open { info: &'a str },
    /// Closing fence matching the currently open one.
    Close,
}

/// Tracks code fence state during line-by-line processing.
///
/// Code fences can use backticks or tildes (three or more). The closing
/// fence must use the same character and be at least as long as the opening
/// fence.
#[derive(Debug, Default)]
pub(crate) struct FenceTracker {
    /// Character used for the current fence (backtick or tilde).
    fence_char: Option<char>,
    /// Length of the opening fence (minimum length for closing).
    fence_len: usize,
    /// Line number of the opening fence (1-indexed).
    opened_at: usize,
}

impl FenceTracker {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Check if currently inside a fenced code block.
    pub(crate) fn in_fence(&self) -> bool {
        self.fence_char.is_some()
    }

    /// Line number of the currently open fence, if any.
    pub(crate) fn opened_at(&self) -> Option<usize> {
        self.in_fence().then_some(self.opened_at)
    }

    /// Update fence state based on a line.
    ///
    /// Returns the transition if the line is a fence marker.
    pub(crate) fn update<'a>(&mut self, line: &'a str, line_num: usize) -> Option<FenceEvent<'a>> {
        let trimmed = line.trim_start();

        if let Some(fence_char) = self.fence_char {
            if is_closing_fence(trimmed, fence_char, self.fence_len) {
                self.fence_char = None;
                self.fence_len = 0;
                return Some(FenceEvent::Close);
            }
            return None;
        }

        let (ch, len) = detect_fence(trimmed)?;
        let info = trimmed[len..].trim();
        // Backtick fences cannot carry backticks in the info string
        if ch == '`' && info.contains('`') {
            return None;
        }
        self.fence_char = Some(ch);
        self.fence_len = len;
        self.opened_at = line_num;
        Some(FenceEvent::Open { info })
    }
}

/// Detect if a line starts a code fence.
///
/// Returns the fence character and length (in bytes, both fence chars are ASCII).
fn detect_fence(trimmed: &str) -> Option<(char, usize)> {
    let first = trimmed.chars().next()?;
    if first != '`' && first != '~' {
        return None;
    }

    let count = trimmed.chars().take_while(|&c| c == first).count();
    (count >= 3).then_some((first, count))
}

/// Check if a line is a valid closing fence.
///
/// The closing fence must:
/// - Use the same character as opening
/// - Be at least as long as opening
/// - Contain only fence characters (optionally followed by whitespace)
fn is_closing_fence(trimmed: &str, expected_char: char, min_len: usize) -> bool {
    if !trimmed.starts_with(expected_char) {
        return false;
    }

    let count = trimmed.chars().take_while(|&c| c == expected_char).count();
    if count < min_len {
        return false;
    }

    trimmed[count..].chars().all(char::is_whitespace)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_fence_initially() {
        let tracker = FenceTracker::new();
        assert!(!tracker.in_fence());
        assert_eq!(tracker.opened_at(), None);
    }

    #[test]
    fn test_backtick_fence_with_info() {
        let mut tracker = FenceTracker::new();

        assert_eq!(
            tracker.update("```rust", 1),
            Some(FenceEvent::Open { info: "rust" })
        );
        assert!(tracker.in_fence());
        assert_eq!(tracker.opened_at(), Some(1));

        assert_eq!(tracker.update("fn main() {}", 2), None);
        assert!(tracker.in_fence());

        assert_eq!(tracker.update("```", 3), Some(FenceEvent::Close));
        assert!(!tracker.in_fence());
    }

    #[test]
    fn test_tilde_fence() {
        let mut tracker = FenceTracker::new();

        assert_eq!(
            tracker.update("~~~ python ", 1),
            Some(FenceEvent::Open { info: "python" })
        );
        assert_eq!(tracker.update("print('hello')", 2), None);
        assert_eq!(tracker.update("~~~", 3), Some(FenceEvent::Close));
        assert!(!tracker.in_fence());
    }

    #[test]
    fn test_shorter_fence_not_closing() {
        let mut tracker = FenceTracker::new();

        assert!(tracker.update("````", 1).is_some());
        assert_eq!(tracker.update("```", 2), None);
        assert!(tracker.in_fence());

        // Longer closing fence is valid
        assert_eq!(tracker.update("`````", 3), Some(FenceEvent::Close));
    }

    #[test]
    fn test_mixed_fence_chars() {
        let mut tracker = FenceTracker::new();

        assert!(tracker.update("```", 1).is_some());
        assert_eq!(tracker.update("~~~", 2), None);
        assert!(tracker.in_fence());
        assert_eq!(tracker.update("```", 3), Some(FenceEvent::Close));
    }

    #[test]
    fn test_closing_fence_with_info_is_content() {
        let mut tracker = FenceTracker::new();

        assert!(tracker.update("```", 1).is_some());
        // A fence with trailing text cannot close
        assert_eq!(tracker.update("```js", 2), None);
        assert!(tracker.in_fence());
    }

    #[test]
    fn test_indented_fence() {
        let mut tracker = FenceTracker::new();

        assert!(tracker.update("   ```rust", 1).is_some());
        assert_eq!(tracker.update("  ```", 2), Some(FenceEvent::Close));
    }

    #[test]
    fn test_two_backticks_not_fence() {
        let mut tracker = FenceTracker::new();

        assert_eq!(tracker.update("``inline code``", 1), None);
        assert!(!tracker.in_fence());
    }

    #[test]
    fn test_inline_triple_backticks_not_fence() {
        let mut tracker = FenceTracker::new();

        assert_eq!(tracker.update("```code``` in prose", 1), None);
        assert!(!tracker.in_fence());
    }
}
