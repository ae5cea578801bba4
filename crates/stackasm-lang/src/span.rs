//! Source location tracking for error reporting and diagnostics.

use std::fmt;
use std::ops::Range;

use serde::{Deserialize, Serialize};

/// A byte range into the script text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Span {
    /// Byte offset of the first byte.
    pub start: u32,
    /// Byte offset one past the last byte.
    pub end: u32,
}

impl Span {
    /// Create a new span.
    pub fn new(start: u32, end: u32) -> Self {
        Self { start, end }
    }

    /// Length of the span in bytes.
    pub fn len(&self) -> u32 {
        assert!(
            self.end >= self.start,
            "malformed span: end ({}) < start ({})",
            self.end,
            self.start
        );
        self.end - self.start
    }

    /// Whether the span covers no bytes.
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

impl From<Range<usize>> for Span {
    fn from(range: Range<usize>) -> Self {
        assert!(range.end <= u32::MAX as usize, "script too large to span");
        Self {
            start: range.start as u32,
            end: range.end as u32,
        }
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "bytes {}..{}", self.start, self.end)
    }
}

/// Line lookup table for a script.
///
/// Turns byte offsets into one-based (line, column) pairs for human-readable
/// diagnostics. Build it once per script; lookups are a binary search.
#[derive(Debug, Clone)]
pub struct LineIndex {
    /// Byte offsets of each line start; `line_starts[0]` is always 0, the
    /// final entry is the EOF sentinel.
    line_starts: Vec<u32>,
}

impl LineIndex {
    /// Index the given source text.
    pub fn new(source: &str) -> Self {
        let mut line_starts = vec![0];

        for (idx, ch) in source.char_indices() {
            if ch == '\n' {
                line_starts.push((idx + 1) as u32);
            }
        }

        if line_starts.last() != Some(&(source.len() as u32)) {
            line_starts.push(source.len() as u32);
        }

        Self { line_starts }
    }

    /// One-based (line, column) for a byte offset.
    pub fn line_col(&self, offset: u32) -> (u32, u32) {
        let line_idx = match self.line_starts.binary_search(&offset) {
            Ok(idx) => idx,
            Err(idx) => idx.max(1) - 1,
        };

        // Clamp to the last real line so offsets at or past EOF still map
        // somewhere printable.
        let line_idx = line_idx.min(self.line_starts.len().saturating_sub(2));

        let line = (line_idx + 1) as u32;
        let col = offset.saturating_sub(self.line_starts[line_idx]) + 1;

        (line, col)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn span_from_range() {
        let span = Span::from(3..7);
        assert_eq!(span.start, 3);
        assert_eq!(span.end, 7);
        assert_eq!(span.len(), 4);
        assert!(!span.is_empty());
    }

    #[test]
    fn line_col_lookup() {
        let index = LineIndex::new("hello\nworld\n");

        assert_eq!(index.line_col(0), (1, 1)); // 'h'
        assert_eq!(index.line_col(5), (1, 6)); // '\n'
        assert_eq!(index.line_col(6), (2, 1)); // 'w'
        assert_eq!(index.line_col(11), (2, 6)); // '\n'
    }

    #[test]
    fn line_col_without_trailing_newline() {
        let index = LineIndex::new("1 2\n3 4");
        assert_eq!(index.line_col(4), (2, 1));
        assert_eq!(index.line_col(6), (2, 3));
    }

    #[test]
    fn empty_source_maps_to_origin() {
        let index = LineIndex::new("");
        assert_eq!(index.line_col(0), (1, 1));
    }
}
