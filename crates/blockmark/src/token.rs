//! The token stream handed to the block renderer.
//!
//! Tokens live in an arena and are linked in both directions, so a renderer can walk the stream
//! forward or backward from any token without random access into the sequence. Marker tokens refer
//! to the stream's own boundary table for their presentation attributes.

use crate::boundary::{Boundary, BoundaryId, BoundaryKind, MarkerKind};
use crate::error::MarkupError;
use std::fmt::Write as _;

/// Handle to a token inside a [`TokenStream`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TokenId(u32);

impl TokenId {
    fn index(self) -> usize {
        self.0 as usize
    }
}

/// A single token of the stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// Literal source text (never contains a newline).
    Text(String),
    /// A line break.
    Newline,
    /// Start or end of a boundary.
    Marker {
        /// Which marker this is.
        kind: MarkerKind,
        /// Boundary shared with the partner marker.
        boundary: BoundaryId,
    },
}

impl Token {
    /// Returns the text of a [`Token::Text`].
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            _ => None,
        }
    }

    /// Returns the marker kind of a [`Token::Marker`].
    pub fn marker(&self) -> Option<MarkerKind> {
        match self {
            Self::Marker { kind, .. } => Some(*kind),
            _ => None,
        }
    }
}

impl std::fmt::Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Text(text) => write!(f, "text {text:?}"),
            Self::Newline => f.write_str("newline"),
            Self::Marker { kind, boundary } => write!(f, "{kind} {boundary}"),
        }
    }
}

#[derive(Debug, Clone)]
struct Link {
    token: Token,
    prev: Option<TokenId>,
    next: Option<TokenId>,
}

/// Doubly-linked, strictly ordered sequence of tokens.
///
/// The head has no predecessor and the tail has no successor.
#[derive(Debug, Clone, Default)]
pub struct TokenStream {
    links: Vec<Link>,
    head: Option<TokenId>,
    tail: Option<TokenId>,
    boundaries: Vec<Boundary>,
}

impl TokenStream {
    /// Create an empty stream over a boundary table (indexed by `BoundaryId`).
    pub fn new(boundaries: Vec<Boundary>) -> Self {
        Self {
            links: Vec::new(),
            head: None,
            tail: None,
            boundaries,
        }
    }

    /// Append a token at the tail.
    pub fn push(&mut self, token: Token) -> TokenId {
        let id = TokenId(self.links.len() as u32);
        self.links.push(Link {
            token,
            prev: self.tail,
            next: None,
        });

        match self.tail {
            Some(tail) => self.links[tail.index()].next = Some(id),
            None => self.head = Some(id),
        }
        self.tail = Some(id);
        id
    }

    /// Append a marker for `boundary`.
    pub fn push_marker(&mut self, kind: MarkerKind, boundary: BoundaryId) -> TokenId {
        self.push(Token::Marker { kind, boundary })
    }

    /// Register a new boundary and return its id.
    pub fn add_boundary(&mut self, make: impl FnOnce(BoundaryId) -> Boundary) -> BoundaryId {
        let id = BoundaryId(self.boundaries.len() as u32);
        self.boundaries.push(make(id));
        id
    }

    /// First token.
    pub fn head(&self) -> Option<TokenId> {
        self.head
    }

    /// Last token.
    pub fn tail(&self) -> Option<TokenId> {
        self.tail
    }

    /// Token behind a handle.
    pub fn get(&self, id: TokenId) -> Option<&Token> {
        self.links.get(id.index()).map(|link| &link.token)
    }

    /// Successor of `id`.
    pub fn next(&self, id: TokenId) -> Option<TokenId> {
        self.links.get(id.index()).and_then(|link| link.next)
    }

    /// Predecessor of `id`.
    pub fn prev(&self, id: TokenId) -> Option<TokenId> {
        self.links.get(id.index()).and_then(|link| link.prev)
    }

    /// Number of tokens.
    pub fn len(&self) -> usize {
        self.links.len()
    }

    /// Returns `true` if the stream has no tokens.
    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }

    /// Walk the stream by following links; reversible with `.rev()`.
    pub fn iter(&self) -> Iter<'_> {
        Iter {
            stream: self,
            front: self.head,
            back: self.tail,
            remaining: self.links.len(),
        }
    }

    /// Presentation attributes of a boundary.
    pub fn boundary(&self, id: BoundaryId) -> Option<&Boundary> {
        self.boundaries.get(id.0 as usize)
    }

    /// All boundaries known to the stream, including synthesized ones.
    pub fn boundaries(&self) -> &[Boundary] {
        &self.boundaries
    }

    /// Concatenated text and newline tokens.
    pub fn text(&self) -> String {
        let mut out = String::new();
        for token in self.iter() {
            match token {
                Token::Text(text) => out.push_str(text),
                Token::Newline => out.push('\n'),
                Token::Marker { .. } => {}
            }
        }
        out
    }

    /// Verify that markers are properly bracketed: every end closes the most recently opened
    /// boundary, with the same id and kind, and nothing is left open.
    pub fn check_nesting(&self) -> Result<(), MarkupError> {
        let mut open: Vec<BoundaryId> = Vec::new();

        for token in self.iter() {
            let Token::Marker { kind, boundary } = token else {
                continue;
            };
            let Some(attrs) = self.boundary(*boundary) else {
                return Err(MarkupError::malformed(*boundary, "marker for unknown boundary"));
            };
            if attrs.kind != kind.boundary_kind() {
                return Err(MarkupError::malformed(
                    *boundary,
                    format!("{kind} marker on a {:?} boundary", attrs.kind),
                ));
            }

            if kind.is_start() {
                open.push(*boundary);
                continue;
            }

            match open.pop() {
                Some(id) if id == *boundary => {}
                Some(id) => {
                    return Err(MarkupError::malformed(
                        *boundary,
                        format!("{kind} closes while {id} is still open"),
                    ));
                }
                None => {
                    return Err(MarkupError::malformed(
                        *boundary,
                        format!("{kind} without a matching start"),
                    ));
                }
            }
        }

        match open.pop() {
            Some(id) => Err(MarkupError::malformed(id, "left open at end of stream")),
            None => Ok(()),
        }
    }

    /// Describe one token, with or without its boundary id.
    fn describe(&self, token: &Token, with_ids: bool) -> String {
        let Token::Marker { kind, boundary } = token else {
            return token.to_string();
        };

        let mut out = kind.name().to_string();
        if with_ids {
            let _ = write!(out, " {boundary}");
        }
        if let Some(attrs) = self.boundary(*boundary).filter(|_| kind.is_start()) {
            if let Some(color) = attrs.color {
                let _ = write!(out, " {color}");
            }
            if attrs.kind == BoundaryKind::Indent {
                let _ = write!(out, " width={}", attrs.indent_width);
            }
            if attrs.is_handwritten() {
                out.push_str(" handwritten");
            }
            if attrs.is_implicit() {
                out.push_str(" implicit");
            }
        }
        out
    }

    /// One line per token, without boundary ids.
    ///
    /// Two runs over the same input produce identical outlines.
    pub fn outline(&self) -> Vec<String> {
        self.iter()
            .map(|token| self.describe(token, false))
            .collect()
    }
}

impl std::fmt::Display for TokenStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for token in self.iter() {
            writeln!(f, "{}", self.describe(token, true))?;
        }
        Ok(())
    }
}

/// Link-following iterator over a [`TokenStream`].
#[derive(Debug, Clone)]
pub struct Iter<'a> {
    stream: &'a TokenStream,
    front: Option<TokenId>,
    back: Option<TokenId>,
    remaining: usize,
}

impl<'a> Iterator for Iter<'a> {
    type Item = &'a Token;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let id = self.front?;
        self.front = self.stream.next(id);
        self.remaining -= 1;
        self.stream.get(id)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl DoubleEndedIterator for Iter<'_> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let id = self.back?;
        self.back = self.stream.prev(id);
        self.remaining -= 1;
        self.stream.get(id)
    }
}

impl ExactSizeIterator for Iter<'_> {}

impl<'a> IntoIterator for &'a TokenStream {
    type Item = &'a Token;
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
