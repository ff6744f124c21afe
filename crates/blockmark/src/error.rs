//! Error types for markup generation and stream building.

use crate::boundary::BoundaryId;
use crate::syntax::Span;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
/// Errors produced while turning a syntax tree into a token stream.
///
/// Every error aborts the current run; no partial stream is ever returned.
pub enum MarkupError {
    #[error("unsupported node kind '{kind}' at {span}")]
    /// The tree contains a node kind the generator has no rules for.
    UnsupportedNodeKind {
        /// Parser-side kind name.
        kind: String,
        /// Location of the node.
        span: Span,
    },

    #[error("{kind} node at {span} has no children to take bounds from")]
    /// Bounds were requested for a node that needs at least one child and has none.
    EmptyNode {
        /// Kind of the empty node.
        kind: &'static str,
        /// Location of the node.
        span: Span,
    },

    #[error("malformed markup for boundary {id}: {reason}")]
    /// A marker has no matching partner, or markers are not properly nested.
    MalformedMarkup {
        /// Boundary the problem was detected on.
        id: BoundaryId,
        /// What went wrong.
        reason: String,
    },

    #[error("span references line {line}, past the end of the text")]
    /// A node span points outside the source text.
    SpanOutOfBounds {
        /// Offending line index.
        line: usize,
    },
}

impl MarkupError {
    pub(crate) fn malformed(id: BoundaryId, reason: impl Into<String>) -> Self {
        Self::MalformedMarkup {
            id,
            reason: reason.into(),
        }
    }
}
