//! Textual bounds of syntax nodes.
//!
//! The parser's spans are close to what the editor needs but not quite:
//!
//! - a node whose end lands at the start of a line (only whitespace before it) would swallow a
//!   trailing blank continuation, so its end is pulled back to the end of the previous line
//! - a statement sequence on its own indented lines starts right after the previous line ends,
//!   so the newline in front of the body belongs to the indent
//! - a conditional with an `else` branch ends where the `else` branch ends

use crate::error::MarkupError;
use crate::source::{Position, SourceText};
use crate::syntax::{Span, SyntaxNode};

/// Half-open `[start, end)` range of a node in `(line, column)` coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bounds {
    /// First position inside the node.
    pub start: Position,
    /// Position one past the node's last char.
    pub end: Position,
}

impl Bounds {
    /// Create bounds from two positions.
    pub fn new(start: Position, end: Position) -> Self {
        Self { start, end }
    }
}

/// Resolve the bounds of `node` against `source`.
pub fn bounds(node: &SyntaxNode, source: &SourceText) -> Result<Bounds, MarkupError> {
    match node {
        SyntaxNode::Block { span, statements } => {
            let last = statements.last().ok_or(MarkupError::EmptyNode {
                kind: "Block",
                span: *span,
            })?;
            let end = bounds(last, source)?.end;
            let start = block_start(span, source)?;
            Ok(Bounds::new(start, end))
        }
        SyntaxNode::Conditional {
            span,
            else_body: Some(else_body),
            ..
        } => {
            let start = checked(span.start(), source)?;
            let end = bounds(else_body, source)?.end;
            Ok(Bounds::new(start, pull_back(end, source)))
        }
        _ => default_bounds(&node.span(), source),
    }
}

fn default_bounds(span: &Span, source: &SourceText) -> Result<Bounds, MarkupError> {
    let start = checked(span.start(), source)?;
    let end = checked(span.end_exclusive(), source)?;
    Ok(Bounds::new(start, pull_back(end, source)))
}

/// Start of a statement sequence.
///
/// A body that begins its own line starts at the end of the previous line. An inline body (or one
/// on the first line) keeps its own start so it stays inside its parent.
fn block_start(span: &Span, source: &SourceText) -> Result<Position, MarkupError> {
    let start = checked(span.start(), source)?;
    if start.line == 0 || !source.is_blank_before(start.line, start.column) {
        return Ok(start);
    }

    let previous = start.line - 1;
    Ok(Position::new(previous, source.line_len(previous).unwrap_or(0)))
}

/// Move an end that sits after nothing but whitespace back to the end of the previous line.
fn pull_back(end: Position, source: &SourceText) -> Position {
    if end.line == 0 || !source.is_blank_before(end.line, end.column) {
        return end;
    }

    let previous = end.line - 1;
    let pulled = Position::new(previous, source.line_len(previous).unwrap_or(0));
    tracing::trace!(from = %end, to = %pulled, "pulled node end back over blank continuation");
    pulled
}

fn checked(position: Position, source: &SourceText) -> Result<Position, MarkupError> {
    if position.line >= source.line_count() {
        return Err(MarkupError::SpanOutOfBounds {
            line: position.line,
        });
    }
    Ok(position)
}
