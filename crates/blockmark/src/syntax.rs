//! Typed syntax tree consumed by the markup generator.
//!
//! The tree is produced by an external parser and is only ever borrowed here. Each node carries
//! the source span reported by the parser; the last column is inclusive (it points *at* the last
//! char of the node, not one past it).

use crate::source::Position;

/// Source location of a node, as reported by the parser.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Span {
    /// Line of the first char.
    pub first_line: usize,
    /// Column of the first char.
    pub first_column: usize,
    /// Line of the last char.
    pub last_line: usize,
    /// Column of the last char (inclusive).
    pub last_column: usize,
}

impl Span {
    /// Create a span from its four coordinates.
    pub const fn new(
        first_line: usize,
        first_column: usize,
        last_line: usize,
        last_column: usize,
    ) -> Self {
        Self {
            first_line,
            first_column,
            last_line,
            last_column,
        }
    }

    /// Span covering `len` chars of a single line starting at `column`.
    ///
    /// `len` is clamped to at least 1 char.
    pub const fn on_line(line: usize, column: usize, len: usize) -> Self {
        let last = if len == 0 { column } else { column + len - 1 };
        Self::new(line, column, line, last)
    }

    /// First char of the span.
    pub const fn start(&self) -> Position {
        Position::new(self.first_line, self.first_column)
    }

    /// Position one past the last char of the span.
    pub const fn end_exclusive(&self) -> Position {
        Position::new(self.last_line, self.last_column + 1)
    }
}

impl std::fmt::Display for Span {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.first_line, self.first_column)
    }
}

/// A node of the parsed syntax tree.
///
/// One variant per node kind the markup generator understands, plus [`SyntaxNode::Unsupported`]
/// for anything else a parser may produce.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SyntaxNode {
    /// A sequence of statements (a function body, a branch body, ...).
    Block {
        /// Location of the sequence.
        span: Span,
        /// Statements in source order.
        statements: Vec<SyntaxNode>,
    },
    /// A unary or binary operator application.
    Operator {
        /// Location of the whole expression.
        span: Span,
        /// Operator text (e.g. `+`, `&&`).
        operator: String,
        /// Left (or only) operand.
        first: Box<SyntaxNode>,
        /// Right operand, for binary operators.
        second: Option<Box<SyntaxNode>>,
    },
    /// A value wrapper around a base expression (accessors are not modelled).
    Value {
        /// Location of the wrapper.
        span: Span,
        /// Wrapped expression.
        base: Box<SyntaxNode>,
    },
    /// An atomic leaf: identifier, number, string, ...
    Literal {
        /// Location of the literal.
        span: Span,
        /// Literal source text.
        value: String,
    },
    /// A function call.
    Call {
        /// Location of the call expression.
        span: Span,
        /// Called expression. Rendered as plain block text.
        callee: Option<Box<SyntaxNode>>,
        /// Arguments in source order.
        args: Vec<SyntaxNode>,
    },
    /// A function literal.
    FunctionDef {
        /// Location of the function.
        span: Span,
        /// Parameters in source order.
        params: Vec<SyntaxNode>,
        /// Function body (usually a [`SyntaxNode::Block`]).
        body: Box<SyntaxNode>,
    },
    /// A function parameter.
    Parameter {
        /// Location of the parameter.
        span: Span,
        /// Parameter name node.
        name: Box<SyntaxNode>,
    },
    /// An assignment (also used for object properties).
    Assignment {
        /// Location of the assignment.
        span: Span,
        /// Assigned-to expression.
        target: Box<SyntaxNode>,
        /// Assigned value.
        value: Box<SyntaxNode>,
    },
    /// A `for` loop (comprehension forms included).
    ForLoop {
        /// Location of the loop.
        span: Span,
        /// Index variable.
        index: Option<Box<SyntaxNode>>,
        /// Iterated expression.
        source: Option<Box<SyntaxNode>>,
        /// Loop variable.
        name: Option<Box<SyntaxNode>>,
        /// Range start for numeric loops.
        from: Option<Box<SyntaxNode>>,
        /// Loop body.
        body: Box<SyntaxNode>,
    },
    /// A range expression `[from..to]`.
    Range {
        /// Location of the range.
        span: Span,
        /// Lower bound.
        from: Box<SyntaxNode>,
        /// Upper bound.
        to: Box<SyntaxNode>,
    },
    /// An `if`/`else` conditional.
    Conditional {
        /// Location of the `if` part.
        span: Span,
        /// Tested expression.
        condition: Box<SyntaxNode>,
        /// Body taken when the condition holds.
        body: Box<SyntaxNode>,
        /// `else` branch, if any.
        else_body: Option<Box<SyntaxNode>>,
    },
    /// An array literal.
    ArrayLiteral {
        /// Location of the literal.
        span: Span,
        /// Elements in source order.
        elements: Vec<SyntaxNode>,
    },
    /// A `return` statement.
    Return {
        /// Location of the statement.
        span: Span,
        /// Returned expression.
        expression: Option<Box<SyntaxNode>>,
    },
    /// A parenthesized expression.
    Parenthesized {
        /// Location including the parentheses.
        span: Span,
        /// Inner expression (usually a single-statement [`SyntaxNode::Block`]).
        body: Option<Box<SyntaxNode>>,
    },
    /// An object literal.
    ObjectLiteral {
        /// Location including the braces.
        span: Span,
        /// Properties in source order.
        properties: Vec<SyntaxNode>,
    },
    /// A node kind with no markup rules (classes, switches, ...).
    Unsupported {
        /// Location of the node.
        span: Span,
        /// Parser-side kind name.
        kind: String,
    },
}

impl SyntaxNode {
    /// Source span of the node.
    pub fn span(&self) -> Span {
        match self {
            Self::Block { span, .. }
            | Self::Operator { span, .. }
            | Self::Value { span, .. }
            | Self::Literal { span, .. }
            | Self::Call { span, .. }
            | Self::FunctionDef { span, .. }
            | Self::Parameter { span, .. }
            | Self::Assignment { span, .. }
            | Self::ForLoop { span, .. }
            | Self::Range { span, .. }
            | Self::Conditional { span, .. }
            | Self::ArrayLiteral { span, .. }
            | Self::Return { span, .. }
            | Self::Parenthesized { span, .. }
            | Self::ObjectLiteral { span, .. }
            | Self::Unsupported { span, .. } => *span,
        }
    }

    /// Stable kind name, used in diagnostics.
    pub fn kind_name(&self) -> &str {
        match self {
            Self::Block { .. } => "Block",
            Self::Operator { .. } => "Operator",
            Self::Value { .. } => "Value",
            Self::Literal { .. } => "Literal",
            Self::Call { .. } => "Call",
            Self::FunctionDef { .. } => "FunctionDef",
            Self::Parameter { .. } => "Parameter",
            Self::Assignment { .. } => "Assignment",
            Self::ForLoop { .. } => "ForLoop",
            Self::Range { .. } => "Range",
            Self::Conditional { .. } => "Conditional",
            Self::ArrayLiteral { .. } => "ArrayLiteral",
            Self::Return { .. } => "Return",
            Self::Parenthesized { .. } => "Parenthesized",
            Self::ObjectLiteral { .. } => "ObjectLiteral",
            Self::Unsupported { kind, .. } => kind.as_str(),
        }
    }

    /// A block holding exactly one statement unwraps to that statement; any other node is
    /// returned as is.
    pub fn unwrap_block(&self) -> &Self {
        match self {
            Self::Block { statements, .. } if statements.len() == 1 => &statements[0],
            _ => self,
        }
    }

    /// Number of nodes in this subtree, including `self`.
    pub fn node_count(&self) -> usize {
        1 + self.children().map(Self::node_count).sum::<usize>()
    }

    /// Direct children in evaluation order.
    pub fn children(&self) -> impl Iterator<Item = &Self> {
        let mut out: Vec<&Self> = Vec::new();
        match self {
            Self::Block { statements, .. } => out.extend(statements),
            Self::Operator { first, second, .. } => {
                out.push(first);
                out.extend(second.as_deref());
            }
            Self::Value { base, .. } => out.push(base),
            Self::Literal { .. } | Self::Unsupported { .. } => {}
            Self::Call { callee, args, .. } => {
                out.extend(callee.as_deref());
                out.extend(args);
            }
            Self::FunctionDef { params, body, .. } => {
                out.extend(params);
                out.push(body);
            }
            Self::Parameter { name, .. } => out.push(name),
            Self::Assignment { target, value, .. } => {
                out.push(target);
                out.push(value);
            }
            Self::ForLoop {
                index,
                source,
                name,
                from,
                body,
                ..
            } => {
                out.extend(index.as_deref());
                out.extend(source.as_deref());
                out.extend(name.as_deref());
                out.extend(from.as_deref());
                out.push(body);
            }
            Self::Range { from, to, .. } => {
                out.push(from);
                out.push(to);
            }
            Self::Conditional {
                condition,
                body,
                else_body,
                ..
            } => {
                out.push(condition);
                out.push(body);
                out.extend(else_body.as_deref());
            }
            Self::ArrayLiteral { elements, .. } => out.extend(elements),
            Self::Return { expression, .. } => out.extend(expression.as_deref()),
            Self::Parenthesized { body, .. } => out.extend(body.as_deref()),
            Self::ObjectLiteral { properties, .. } => out.extend(properties),
        }
        out.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lit(line: usize, column: usize, value: &str) -> SyntaxNode {
        SyntaxNode::Literal {
            span: Span::on_line(line, column, value.chars().count()),
            value: value.to_string(),
        }
    }

    #[test]
    fn test_span_positions() {
        let span = Span::on_line(2, 4, 3);
        assert_eq!(span.start(), Position::new(2, 4));
        assert_eq!(span.end_exclusive(), Position::new(2, 7));
        assert_eq!(Span::on_line(0, 5, 0).end_exclusive(), Position::new(0, 6));
    }

    #[test]
    fn test_unwrap_block_single_statement() {
        let inner = lit(1, 2, "x");
        let block = SyntaxNode::Block {
            span: Span::on_line(1, 2, 1),
            statements: vec![inner.clone()],
        };
        assert_eq!(block.unwrap_block(), &inner);

        let multi = SyntaxNode::Block {
            span: Span::new(1, 2, 2, 2),
            statements: vec![lit(1, 2, "x"), lit(2, 2, "y")],
        };
        assert_eq!(multi.unwrap_block(), &multi);
        assert_eq!(inner.unwrap_block(), &inner);
    }

    #[test]
    fn test_children_order_and_count() {
        let node = SyntaxNode::Operator {
            span: Span::on_line(0, 0, 5),
            operator: "+".to_string(),
            first: Box::new(lit(0, 0, "a")),
            second: Some(Box::new(lit(0, 4, "b"))),
        };
        let names: Vec<_> = node
            .children()
            .map(|child| match child {
                SyntaxNode::Literal { value, .. } => value.as_str(),
                _ => "?",
            })
            .collect();
        assert_eq!(names, ["a", "b"]);
        assert_eq!(node.node_count(), 3);
        assert_eq!(node.kind_name(), "Operator");
    }

    #[test]
    fn test_unsupported_kind_name() {
        let node = SyntaxNode::Unsupported {
            span: Span::on_line(0, 0, 5),
            kind: "Class".to_string(),
        };
        assert_eq!(node.kind_name(), "Class");
    }
}
