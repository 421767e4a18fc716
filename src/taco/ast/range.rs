//! Source positions
//!
//! Nodes, tokens and comments all point back into the source through a [`Range`]: a
//! byte span plus the [`Position`] of each end. [`SourceLocation`] indexes line starts
//! once so offsets can be turned into positions without rescanning.
//!
//! ## Conventions
//!
//! - Lines are 1-based and columns are 0-based byte offsets from the line start, which is
//!   what ESTree tooling consumes.
//! - Every node, token and comment carries a `Range`; there are no optional locations.
//! - Line breaks are `\r\n`, `\r`, `\n`, `\u{2028}` and `\u{2029}`, the same set the
//!   tokenizer recognises.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Range as ByteRange;

/// A `line:column` point
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

impl Position {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

impl Default for Position {
    fn default() -> Self {
        Self::new(1, 0)
    }
}

/// Byte span of a node or token together with the positions of both ends
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Range {
    pub span: ByteRange<usize>,
    pub start: Position,
    pub end: Position,
}

impl Range {
    pub fn new(span: ByteRange<usize>, start: Position, end: Position) -> Self {
        Self { span, start, end }
    }

    /// Zero-width range at a single point
    pub fn point(offset: usize, position: Position) -> Self {
        Self::new(offset..offset, position, position)
    }

    /// Check if a byte offset falls inside this range (end exclusive)
    pub fn contains_offset(&self, offset: usize) -> bool {
        self.span.start <= offset && offset < self.span.end
    }

    /// Check if another range lies entirely inside this one
    pub fn encloses(&self, other: &Range) -> bool {
        self.span.start <= other.span.start && other.span.end <= self.span.end
    }

    /// Range from the start of `self` to the end of `other`
    pub fn to(&self, other: &Range) -> Range {
        Range::new(self.span.start..other.span.end, self.start, other.end)
    }
}

impl fmt::Display for Range {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

impl Default for Range {
    fn default() -> Self {
        Self::point(0, Position::default())
    }
}

/// True for the characters that end a line.
pub fn is_line_break(ch: char) -> bool {
    matches!(ch, '\n' | '\r' | '\u{2028}' | '\u{2029}')
}

/// Line index over a source text
pub struct SourceLocation {
    line_starts: Vec<usize>,
}

impl SourceLocation {
    pub fn new(source: &str) -> Self {
        let mut line_starts = vec![0];
        let mut chars = source.char_indices().peekable();

        while let Some((byte_pos, ch)) = chars.next() {
            if !is_line_break(ch) {
                continue;
            }
            if ch == '\r' {
                if let Some(&(_, '\n')) = chars.peek() {
                    continue;
                }
            }
            line_starts.push(byte_pos + ch.len_utf8());
        }

        Self { line_starts }
    }

    /// Offsets past the last line break land on the last line
    pub fn byte_to_position(&self, offset: usize) -> Position {
        let index = match self.line_starts.binary_search(&offset) {
            Ok(index) => index,
            Err(index) => index - 1,
        };
        Position::new(index + 1, offset - self.line_starts[index])
    }

    pub fn byte_range_to_range(&self, range: &ByteRange<usize>) -> Range {
        Range::new(
            range.clone(),
            self.byte_to_position(range.start),
            self.byte_to_position(range.end),
        )
    }

    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }

    /// Get the byte offset for the start of a 1-based line
    pub fn line_start(&self, line: usize) -> Option<usize> {
        line.checked_sub(1)
            .and_then(|index| self.line_starts.get(index).copied())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_positions_order_by_line_then_column() {
        assert!(Position::new(1, 9) < Position::new(2, 0));
        assert!(Position::new(3, 1) < Position::new(3, 2));
        assert_eq!(Position::default(), Position::new(1, 0));
    }

    #[test]
    fn test_range_encloses() {
        let outer = Range::new(0..10, Position::new(1, 0), Position::new(1, 10));
        let inner = Range::new(2..5, Position::new(1, 2), Position::new(1, 5));

        assert!(outer.encloses(&inner));
        assert!(!inner.encloses(&outer));
        assert!(outer.contains_offset(0));
        assert!(!outer.contains_offset(10));
    }

    #[test]
    fn test_range_to() {
        let a = Range::new(2..5, Position::new(1, 2), Position::new(1, 5));
        let b = Range::new(8..9, Position::new(2, 0), Position::new(2, 1));

        let joined = a.to(&b);
        assert_eq!(joined.span, 2..9);
        assert_eq!(joined.start, Position::new(1, 2));
        assert_eq!(joined.end, Position::new(2, 1));
    }

    #[test]
    fn test_display() {
        let range = Range::new(4..11, Position::new(2, 0), Position::new(2, 7));
        assert_eq!(range.to_string(), "2:0..2:7");
    }

    #[test]
    fn test_offsets_to_positions() {
        let index = SourceLocation::new("a = b
f!
  x
");

        assert_eq!(index.byte_to_position(0), Position::new(1, 0));
        assert_eq!(index.byte_to_position(4), Position::new(1, 4));
        assert_eq!(index.byte_to_position(6), Position::new(2, 0));
        assert_eq!(index.byte_to_position(11), Position::new(3, 2));
        assert_eq!(index.byte_range_to_range(&(6..8)).end, Position::new(2, 2));
    }

    #[test]
    fn test_crlf_counts_as_one_line_break() {
        let index = SourceLocation::new("a\r\nb\rc\u{2028}d");

        assert_eq!(index.line_count(), 4);
        assert_eq!(index.byte_to_position(3), Position::new(2, 0));
        assert_eq!(index.byte_to_position(5), Position::new(3, 0));
    }

    #[test]
    fn test_columns_count_bytes() {
        let index = SourceLocation::new("s = 'ö'\nt");
        assert_eq!(index.byte_to_position(7), Position::new(1, 7));
        assert_eq!(index.byte_to_position(9), Position::new(2, 0));
    }

    #[test]
    fn test_line_start() {
        let index = SourceLocation::new("x\n\ny\n");

        assert_eq!(index.line_start(0), None);
        assert_eq!(index.line_start(1), Some(0));
        assert_eq!(index.line_start(3), Some(3));
        assert_eq!(index.line_start(5), None);
    }
}
