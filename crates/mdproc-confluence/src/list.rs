//! List nesting normalization.
//!
//! Markdown expresses nesting with indentation of arbitrary width while
//! Confluence repeats the marker once per level (`**` for a second-level
//! bullet, `#*` for a bullet under a numbered item). The stack below maps
//! indentation widths to levels as items are encountered.

/// One open nesting level.
#[derive(Debug, Clone, Copy)]
struct ListLevel {
    /// Indentation width (columns) of items on this level.
    indent: usize,
    /// Confluence marker for this level (`*` or `#`).
    marker: char,
}

/// Stack of open list levels for the current list.
#[derive(Debug, Default)]
pub(crate) struct ListStack {
    levels: Vec<ListLevel>,
}

impl ListStack {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Register an item and return its Confluence marker prefix.
    ///
    /// A deeper indent opens a new level; a shallower indent closes levels
    /// until one with an indent no deeper than the item remains.
    pub(crate) fn push_item(&mut self, indent: usize, ordered: bool) -> String {
        let marker = if ordered { '#' } else { '*' };

        while self.levels.last().is_some_and(|level| level.indent > indent) {
            self.levels.pop();
        }

        match self.levels.last_mut() {
            Some(level) if level.indent == indent => level.marker = marker,
            _ => self.levels.push(ListLevel { indent, marker }),
        }

        self.levels.iter().map(|level| level.marker).collect()
    }

    /// Forget all levels; the next item starts a new list.
    pub(crate) fn reset(&mut self) {
        self.levels.clear();
    }
}
