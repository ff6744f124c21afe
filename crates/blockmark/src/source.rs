//! Line-oriented access to the source text.
//!
//! Markup positions are `(line, column)` pairs where the column counts Unicode scalar values
//! (`char`s) from the start of the line. [`SourceText`] keeps the text in a Rope so line lookup and
//! char-indexed slicing stay O(log N) for large documents.

use ropey::{Rope, RopeSlice};

/// A `(line, column)` position in the source text (both zero-based, column in `char`s).
///
/// Positions order lexicographically: first by line, then by column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Position {
    /// Zero-based line index.
    pub line: usize,
    /// Zero-based column, in `char`s.
    pub column: usize,
}

impl Position {
    /// Create a new position.
    pub const fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// Immutable, line-indexed view of a source document.
///
/// Lines are separated by `'\n'` only: N newlines produce N+1 lines, so a trailing newline yields a
/// trailing empty line. The `'\r'` of a CRLF line ending stays in the line text (it is whitespace, so
/// it never makes a line non-blank).
#[derive(Debug, Clone)]
pub struct SourceText {
    rope: Rope,
}

impl SourceText {
    /// Build a source view from text.
    pub fn new(text: &str) -> Self {
        Self {
            rope: Rope::from_str(text),
        }
    }

    /// Number of lines (always at least 1).
    pub fn line_count(&self) -> usize {
        self.rope.len_lines()
    }

    /// Index of the last line.
    pub fn last_line(&self) -> usize {
        self.line_count() - 1
    }

    fn line_slice(&self, line: usize) -> Option<RopeSlice<'_>> {
        if line >= self.rope.len_lines() {
            return None;
        }

        let slice = self.rope.line(line);
        let mut len = slice.len_chars();
        if len > 0 && slice.char(len - 1) == '\n' {
            len -= 1;
        }
        Some(slice.slice(..len))
    }

    /// Text of `line` without its `'\n'`, or `None` past the end of the document.
    pub fn line(&self, line: usize) -> Option<String> {
        self.line_slice(line).map(|slice| slice.to_string())
    }

    /// Length of `line` in `char`s (without the `'\n'`), or `None` past the end.
    pub fn line_len(&self, line: usize) -> Option<usize> {
        self.line_slice(line).map(|slice| slice.len_chars())
    }

    /// Returns `true` if `line` exists and contains only whitespace.
    pub fn is_blank(&self, line: usize) -> bool {
        self.line_slice(line)
            .is_some_and(|slice| slice.chars().all(char::is_whitespace))
    }

    /// Returns `true` if the first `column` chars of `line` are whitespace only.
    ///
    /// Columns past the end of the line are clamped.
    pub fn is_blank_before(&self, line: usize, column: usize) -> bool {
        self.line_slice(line).is_some_and(|slice| {
            let end = column.min(slice.len_chars());
            slice.slice(..end).chars().all(char::is_whitespace)
        })
    }

    /// Chars `start..end` of `line`, clamped to the line's length.
    pub fn slice(&self, line: usize, start: usize, end: usize) -> String {
        let Some(slice) = self.line_slice(line) else {
            return String::new();
        };

        let len = slice.len_chars();
        let end = end.min(len);
        let start = start.min(end);
        slice.slice(start..end).to_string()
    }

    /// Position just past the last char of the last line.
    pub fn end_position(&self) -> Position {
        let line = self.last_line();
        Position::new(line, self.line_len(line).unwrap_or(0))
    }
}
