//! Token stream construction: markup plus source text to a linked token stream.
//!
//! Markers are bucketed by line and sorted within each line, then interleaved with the text between
//! them. The ordering at a shared column closes before it opens:
//!
//! - lower column first
//! - two starts: lower id (outer boundary) first
//! - two ends: higher id (inner boundary) first
//! - a start and an end: the end first
//!
//! This is a total order on the markers of one run, so the result does not depend on the order the
//! markup lists them in. A zero-width boundary (start and end at the same position) stays out of the
//! sort: its end is emitted right after its start.
//!
//! A parse stack tracks the open boundaries. A block opened directly inside another block gets a
//! synthesized socket around it, so every nested block sits in an editable slot.

use crate::boundary::{Boundary, BoundaryId, BoundaryKind, BoundaryOrigin, MarkerKind};
use crate::error::MarkupError;
use crate::markup::{Markup, MarkupEntry};
use crate::source::{Position, SourceText};
use crate::token::{Token, TokenStream};
use std::cmp::Ordering;

/// Open boundary on the parse stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Frame {
    kind: BoundaryKind,
    boundary: BoundaryId,
    implicit: bool,
}

/// Order of two markers on the same line.
pub fn compare_entries(a: &MarkupEntry, b: &MarkupEntry) -> Ordering {
    entry_key(a).cmp(&entry_key(b))
}

/// `(column, ends before starts, starts by ascending id / ends by descending id)`.
fn entry_key(entry: &MarkupEntry) -> (usize, bool, i64) {
    let id = i64::from(entry.id.0);
    let rank = if entry.is_start() { id } else { -id };
    (entry.position.column, entry.is_start(), rank)
}

/// Build the token stream for `source` from generated markup.
///
/// The root segment is the stream itself, so its markers are checked but never emitted.
#[tracing::instrument(skip_all, fields(line_count = source.line_count(), entries = markup.entries.len()))]
pub fn build(source: &SourceText, markup: &Markup) -> Result<TokenStream, MarkupError> {
    markup.validate()?;

    let mut starts: Vec<Option<Position>> = vec![None; markup.boundaries.len()];
    for entry in markup.entries.iter().filter(|entry| entry.is_start()) {
        starts[entry.id.0 as usize] = Some(entry.position);
    }

    let mut collapsed = vec![false; markup.boundaries.len()];
    let mut lines: Vec<Vec<MarkupEntry>> = vec![Vec::new(); source.line_count()];
    for entry in &markup.entries {
        if entry.id.is_root() {
            continue;
        }
        let index = entry.id.0 as usize;
        if !entry.is_start() && starts[index] == Some(entry.position) {
            collapsed[index] = true;
            continue;
        }
        let Some(bucket) = lines.get_mut(entry.position.line) else {
            return Err(MarkupError::SpanOutOfBounds {
                line: entry.position.line,
            });
        };
        bucket.push(*entry);
    }

    let mut builder = StreamBuilder::new(markup.boundaries.clone(), collapsed);
    for (line, mut entries) in lines.into_iter().enumerate() {
        if line > 0 {
            builder.stream.push(Token::Newline);
        }
        entries.sort_by(compare_entries);

        if source.is_blank(line) {
            for entry in &entries {
                builder.marker(entry)?;
            }
            builder.placeholder();
            continue;
        }

        builder.line(source, line, &entries)?;
    }

    builder.finish()
}

struct StreamBuilder {
    stream: TokenStream,
    stack: Vec<Frame>,
    /// Zero-width boundaries, indexed by id; their end marker is not in the line buckets.
    collapsed: Vec<bool>,
    implicit_count: usize,
    placeholder_count: usize,
}

impl StreamBuilder {
    fn new(boundaries: Vec<Boundary>, collapsed: Vec<bool>) -> Self {
        Self {
            stream: TokenStream::new(boundaries),
            stack: Vec::new(),
            collapsed,
            implicit_count: 0,
            placeholder_count: 0,
        }
    }

    /// Interleave a non-blank line's text with its sorted markers.
    fn line(
        &mut self,
        source: &SourceText,
        line: usize,
        entries: &[MarkupEntry],
    ) -> Result<(), MarkupError> {
        let mut last = 0;
        for entry in entries {
            let column = entry.position.column;
            let text = source.slice(line, last, column);
            let text = if last == 0 {
                text.trim_start()
            } else {
                text.as_str()
            };
            self.text(text);

            self.marker(entry)?;
            last = column;
        }

        let len = source.line_len(line).unwrap_or(0);
        if last < len {
            self.text(&source.slice(line, last, len));
        }
        Ok(())
    }

    fn text(&mut self, text: &str) {
        if !text.is_empty() {
            self.stream.push(Token::Text(text.to_string()));
        }
    }

    fn marker(&mut self, entry: &MarkupEntry) -> Result<(), MarkupError> {
        let kind = entry.marker;

        if kind == MarkerKind::BlockStart
            && self
                .stack
                .last()
                .is_some_and(|frame| frame.kind == BoundaryKind::Block)
        {
            let socket = self.stream.add_boundary(|id| {
                Boundary::socket(id, 0).with_origin(BoundaryOrigin::Implicit)
            });
            tracing::trace!(block = %entry.id, socket = %socket, "wrapping nested block in implicit socket");
            self.stack.push(Frame {
                kind: BoundaryKind::Socket,
                boundary: socket,
                implicit: true,
            });
            self.stream.push_marker(MarkerKind::SocketStart, socket);
            self.implicit_count += 1;
        }

        if kind.is_start() {
            self.stack.push(Frame {
                kind: kind.boundary_kind(),
                boundary: entry.id,
                implicit: false,
            });
        } else {
            match self.stack.pop() {
                Some(frame) if frame.boundary == entry.id && !frame.implicit => {}
                Some(frame) => {
                    return Err(MarkupError::malformed(
                        entry.id,
                        format!(
                            "{} at {} closes while {} is still open",
                            kind, entry.position, frame.boundary
                        ),
                    ));
                }
                None => {
                    return Err(MarkupError::malformed(
                        entry.id,
                        format!("{} at {} without a matching start", kind, entry.position),
                    ));
                }
            }
        }
        self.stream.push_marker(kind, entry.id);

        if let Some(frame) = self.stack.last().copied().filter(|frame| frame.implicit) {
            self.stack.pop();
            self.stream.push_marker(MarkerKind::SocketEnd, frame.boundary);
        }

        let zero_width = self.collapsed.get(entry.id.0 as usize).copied() == Some(true);
        if kind.is_start() && zero_width {
            return self.marker(&MarkupEntry {
                marker: MarkerKind::end_of(kind.boundary_kind()),
                ..*entry
            });
        }
        Ok(())
    }

    /// Self-contained block + socket standing in for a blank line.
    fn placeholder(&mut self) {
        let block = self
            .stream
            .add_boundary(|id| Boundary::handwritten(id, BoundaryKind::Block));
        let socket = self
            .stream
            .add_boundary(|id| Boundary::handwritten(id, BoundaryKind::Socket));

        self.stream.push_marker(MarkerKind::BlockStart, block);
        self.stream.push_marker(MarkerKind::SocketStart, socket);
        self.stream.push_marker(MarkerKind::SocketEnd, socket);
        self.stream.push_marker(MarkerKind::BlockEnd, block);
        tracing::trace!(block = %block, socket = %socket, "inserted blank-line placeholder");
        self.placeholder_count += 1;
    }

    fn finish(self) -> Result<TokenStream, MarkupError> {
        if let Some(frame) = self.stack.last() {
            return Err(MarkupError::malformed(
                frame.boundary,
                "left open at end of text",
            ));
        }

        tracing::debug!(
            tokens = self.stream.len(),
            implicit_sockets = self.implicit_count,
            placeholders = self.placeholder_count,
            "built token stream"
        );
        Ok(self.stream)
    }
}
