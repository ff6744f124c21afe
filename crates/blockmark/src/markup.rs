//! Markup generation: syntax tree to boundary markers.
//!
//! [`generate`] walks the tree once and, for each node kind with a visual representation, creates
//! a [`Boundary`] and records its start and end markers at the node's [`bounds`]. The result is an
//! unordered list of [`MarkupEntry`] values; ordering and nesting are the stream builder's job.
//!
//! | Node kind | Boundary | Children visited |
//! |---|---|---|
//! | `Block` | indent | statements |
//! | `Operator` | block (`VALUE`, operator precedence) | operands, with that precedence |
//! | `Value` | - | base, same precedence |
//! | `Literal` | socket (inherited precedence) | - |
//! | `Call` | block (`COMMAND`) | arguments |
//! | `FunctionDef` | block (`VALUE`) | parameters, unwrapped body |
//! | `Parameter` | - | name |
//! | `Assignment` | block (`COMMAND`) | target, value |
//! | `ForLoop` | block (`CONTROL`) | index, source, name, from, body |
//! | `Range` | block (`VALUE`) | from, to |
//! | `Conditional` | block (`CONTROL`) | condition, body, else branch |
//! | `ArrayLiteral` | block (`VALUE`) | elements |
//! | `Return` | block (`RETURN`) | expression |
//! | `Parenthesized` | block (`VALUE`) | unwrapped body |
//! | `ObjectLiteral` | block (`VALUE`) + indent over the properties | properties |

use crate::boundary::{Boundary, BoundaryId, MarkerKind};
use crate::bounds::bounds;
use crate::error::MarkupError;
use crate::source::{Position, SourceText};
use crate::syntax::SyntaxNode;
use blockmark_lang::{Color, DEFAULT_INDENT_WIDTH, OperatorTable};

/// Configuration for [`generate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkupConfig {
    /// Width attached to every indent boundary.
    pub indent_width: usize,
    /// Precedences for operator blocks and the sockets directly below them.
    pub operators: OperatorTable,
}

impl MarkupConfig {
    /// Set the indent width.
    pub fn with_indent_width(mut self, width: usize) -> Self {
        self.indent_width = width;
        self
    }

    /// Replace the operator table.
    pub fn with_operators(mut self, operators: OperatorTable) -> Self {
        self.operators = operators;
        self
    }
}

impl Default for MarkupConfig {
    fn default() -> Self {
        Self {
            indent_width: DEFAULT_INDENT_WIDTH,
            operators: OperatorTable::default(),
        }
    }
}

/// One start or end marker anchored at a text position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MarkupEntry {
    /// Marker to emit.
    pub marker: MarkerKind,
    /// Where the marker goes.
    pub position: Position,
    /// Boundary the marker belongs to.
    pub id: BoundaryId,
}

impl MarkupEntry {
    /// Returns `true` for opening markers.
    pub fn is_start(&self) -> bool {
        self.marker.is_start()
    }
}

/// Output of [`generate`]: every boundary plus its two markers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Markup {
    /// Markers in generation order.
    pub entries: Vec<MarkupEntry>,
    /// Boundaries, indexed by `BoundaryId`.
    pub boundaries: Vec<Boundary>,
    /// The root segment wrapping the whole text.
    pub root: BoundaryId,
}

impl Markup {
    /// Markup holding only the root segment for `source`.
    pub fn new(source: &SourceText) -> Self {
        let root = Boundary::root();
        Self {
            entries: vec![
                MarkupEntry {
                    marker: root.start_marker(),
                    position: Position::new(0, 0),
                    id: root.id,
                },
                MarkupEntry {
                    marker: root.end_marker(),
                    position: source.end_position(),
                    id: root.id,
                },
            ],
            root: root.id,
            boundaries: vec![root],
        }
    }

    /// Look up a boundary.
    pub fn boundary(&self, id: BoundaryId) -> Option<&Boundary> {
        self.boundaries.get(id.0 as usize)
    }

    /// Number of boundaries, root included.
    pub fn boundary_count(&self) -> usize {
        self.boundaries.len()
    }

    /// Check the pairing invariant: every boundary has exactly one start and one end marker of its
    /// own kind, and the start does not come after the end.
    pub fn validate(&self) -> Result<(), MarkupError> {
        let mut pairs: Vec<(Option<Position>, Option<Position>)> =
            vec![(None, None); self.boundaries.len()];

        for entry in &self.entries {
            let Some(boundary) = self.boundary(entry.id) else {
                return Err(MarkupError::malformed(entry.id, "marker for unknown boundary"));
            };
            if entry.marker.boundary_kind() != boundary.kind {
                return Err(MarkupError::malformed(
                    entry.id,
                    format!("{} marker on a {:?} boundary", entry.marker, boundary.kind),
                ));
            }

            let (start, end) = &mut pairs[entry.id.0 as usize];
            let slot = if entry.is_start() { start } else { end };
            if slot.replace(entry.position).is_some() {
                return Err(MarkupError::malformed(
                    entry.id,
                    format!("duplicate {} marker", entry.marker),
                ));
            }
        }

        for (index, pair) in pairs.into_iter().enumerate() {
            let id = BoundaryId(index as u32);
            match pair {
                (Some(start), Some(end)) if start <= end => {}
                (Some(start), Some(end)) => {
                    return Err(MarkupError::malformed(
                        id,
                        format!("start {start} is after end {end}"),
                    ));
                }
                (None, _) => return Err(MarkupError::malformed(id, "missing start marker")),
                (_, None) => return Err(MarkupError::malformed(id, "missing end marker")),
            }
        }

        Ok(())
    }
}

/// Generate markup for the top-level nodes of a document.
#[tracing::instrument(
    skip_all,
    fields(
        node_count = nodes.iter().map(SyntaxNode::node_count).sum::<usize>(),
        line_count = source.line_count(),
    )
)]
pub fn generate(
    nodes: &[SyntaxNode],
    source: &SourceText,
    config: &MarkupConfig,
) -> Result<Markup, MarkupError> {
    let mut generator = MarkupGenerator::new(source, config);
    for node in nodes {
        generator.mark(node, 0)?;
    }

    let markup = generator.finish();
    tracing::debug!(
        boundaries = markup.boundary_count(),
        entries = markup.entries.len(),
        "generated markup"
    );
    Ok(markup)
}

/// Per-run generator state: the id counter (implicit in the boundary table length) and the
/// accumulated markup.
struct MarkupGenerator<'a> {
    source: &'a SourceText,
    config: &'a MarkupConfig,
    markup: Markup,
}

impl<'a> MarkupGenerator<'a> {
    fn new(source: &'a SourceText, config: &'a MarkupConfig) -> Self {
        Self {
            source,
            config,
            markup: Markup::new(source),
        }
    }

    fn finish(self) -> Markup {
        self.markup
    }

    fn next_id(&self) -> BoundaryId {
        BoundaryId(self.markup.boundaries.len() as u32)
    }

    fn push(&mut self, boundary: Boundary, start: Position, end: Position) {
        self.markup.entries.push(MarkupEntry {
            marker: boundary.start_marker(),
            position: start,
            id: boundary.id,
        });
        self.markup.entries.push(MarkupEntry {
            marker: boundary.end_marker(),
            position: end,
            id: boundary.id,
        });
        self.markup.boundaries.push(boundary);
    }

    /// Register a boundary spanning `node`.
    fn add(
        &mut self,
        make: impl FnOnce(BoundaryId) -> Boundary,
        node: &SyntaxNode,
    ) -> Result<(), MarkupError> {
        let node_bounds = bounds(node, self.source)?;
        let boundary = make(self.next_id());
        tracing::trace!(
            kind = node.kind_name(),
            id = %boundary.id,
            start = %node_bounds.start,
            end = %node_bounds.end,
            "added boundary"
        );
        self.push(boundary, node_bounds.start, node_bounds.end);
        Ok(())
    }

    fn add_block(&mut self, node: &SyntaxNode, color: Color) -> Result<(), MarkupError> {
        self.add(|id| Boundary::block(id, color, 0), node)
    }

    fn mark_all(&mut self, nodes: &[SyntaxNode]) -> Result<(), MarkupError> {
        for node in nodes {
            self.mark(node, 0)?;
        }
        Ok(())
    }

    fn mark_opt(&mut self, node: Option<&SyntaxNode>) -> Result<(), MarkupError> {
        match node {
            Some(node) => self.mark(node, 0),
            None => Ok(()),
        }
    }

    fn mark(&mut self, node: &SyntaxNode, precedence: u8) -> Result<(), MarkupError> {
        match node {
            SyntaxNode::Block { statements, .. } => {
                let width = self.config.indent_width;
                self.add(|id| Boundary::indent(id, width), node)?;
                self.mark_all(statements)
            }
            SyntaxNode::Operator {
                operator,
                first,
                second,
                ..
            } => {
                let operator_precedence = self.config.operators.precedence(operator);
                self.add(
                    |id| Boundary::block(id, Color::Value, operator_precedence),
                    node,
                )?;
                self.mark(first, operator_precedence)?;
                match second {
                    Some(second) => self.mark(second, operator_precedence),
                    None => Ok(()),
                }
            }
            SyntaxNode::Value { base, .. } => self.mark(base, precedence),
            SyntaxNode::Literal { .. } => self.add(|id| Boundary::socket(id, precedence), node),
            SyntaxNode::Call { args, .. } => {
                self.add_block(node, Color::Command)?;
                self.mark_all(args)
            }
            SyntaxNode::FunctionDef { params, body, .. } => {
                self.add_block(node, Color::Value)?;
                self.mark_all(params)?;
                self.mark(body.unwrap_block(), 0)
            }
            SyntaxNode::Parameter { name, .. } => self.mark(name, 0),
            SyntaxNode::Assignment { target, value, .. } => {
                self.add_block(node, Color::Command)?;
                self.mark(target, 0)?;
                self.mark(value, 0)
            }
            SyntaxNode::ForLoop {
                index,
                source,
                name,
                from,
                body,
                ..
            } => {
                self.add_block(node, Color::Control)?;
                self.mark_opt(index.as_deref())?;
                self.mark_opt(source.as_deref())?;
                self.mark_opt(name.as_deref())?;
                self.mark_opt(from.as_deref())?;
                self.mark(body, 0)
            }
            SyntaxNode::Range { from, to, .. } => {
                self.add_block(node, Color::Value)?;
                self.mark(from, 0)?;
                self.mark(to, 0)
            }
            SyntaxNode::Conditional {
                condition,
                body,
                else_body,
                ..
            } => {
                self.add_block(node, Color::Control)?;
                self.mark(condition, 0)?;
                self.mark(body, 0)?;
                self.mark_opt(else_body.as_deref())
            }
            SyntaxNode::ArrayLiteral { elements, .. } => {
                self.add_block(node, Color::Value)?;
                self.mark_all(elements)
            }
            SyntaxNode::Return { expression, .. } => {
                self.add_block(node, Color::Return)?;
                self.mark_opt(expression.as_deref())
            }
            SyntaxNode::Parenthesized { body, .. } => {
                self.add_block(node, Color::Value)?;
                self.mark_opt(body.as_deref().map(SyntaxNode::unwrap_block))
            }
            SyntaxNode::ObjectLiteral { span, properties } => {
                self.add_block(node, Color::Value)?;

                let (Some(first), Some(last)) = (properties.first(), properties.last()) else {
                    return Err(MarkupError::EmptyNode {
                        kind: "ObjectLiteral",
                        span: *span,
                    });
                };
                let start = bounds(first, self.source)?.start;
                let end = bounds(last, self.source)?.end;
                let indent = Boundary::indent(self.next_id(), self.config.indent_width);
                self.push(indent, start, end);

                self.mark_all(properties)
            }
            SyntaxNode::Unsupported { span, .. } => Err(MarkupError::UnsupportedNodeKind {
                kind: node.kind_name().to_string(),
                span: *span,
            }),
        }
    }
}
