#![warn(missing_docs)]
//! Blockmark - Block Markup Core for Block-Based Code Editors
//!
//! # Overview
//!
//! `blockmark` turns a parsed syntax tree plus its source text into a flat, strictly ordered,
//! well-nested token stream. Each syntactic construct with a visual representation in a block
//! editor is bracketed by paired markers: draggable **blocks**, editable **sockets** and
//! indentation-governed **indents**. A renderer walks the stream to draw blocks, and the
//! concatenated text of the stream reproduces the source.
//!
//! Parsing and rendering are outside this crate. The tree comes from an external parser (see
//! [`SyntaxParser`]), and the renderer only consumes [`TokenStream`].
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │  Pipeline (markup_blocks / parse_blocks)    │  ← Public API
//! ├─────────────────────────────────────────────┤
//! │  Token Stream Builder                       │  ← Ordering + Placeholders
//! ├─────────────────────────────────────────────┤
//! │  Markup Generator                           │  ← Tree Walk
//! ├─────────────────────────────────────────────┤
//! │  Bounds Resolver                            │  ← Node Extents
//! ├─────────────────────────────────────────────┤
//! │  Source Text (Rope-based)                   │  ← Line Access
//! └─────────────────────────────────────────────┘
//! ```
//!
//! # Quick Start
//!
//! ```rust
//! use blockmark::{MarkupConfig, Span, SyntaxNode, markup_blocks};
//!
//! // `x = 1`
//! let tree = vec![SyntaxNode::Assignment {
//!     span: Span::on_line(0, 0, 5),
//!     target: Box::new(SyntaxNode::Literal {
//!         span: Span::on_line(0, 0, 1),
//!         value: "x".to_string(),
//!     }),
//!     value: Box::new(SyntaxNode::Literal {
//!         span: Span::on_line(0, 4, 1),
//!         value: "1".to_string(),
//!     }),
//! }];
//!
//! let stream = markup_blocks(&tree, "x = 1", &MarkupConfig::default()).unwrap();
//! assert_eq!(stream.text(), "x = 1");
//! assert_eq!(stream.outline()[0], "blockStart COMMAND");
//! stream.check_nesting().unwrap();
//! ```
//!
//! # Module Description
//!
//! - [`source`] - Rope based line access and `(line, column)` positions
//! - [`syntax`] - Syntax tree handed over by the parser
//! - [`bounds`] - Text bounds of tree nodes
//! - [`boundary`] - Boundaries and their start/end markers
//! - [`markup`] - Tree walk producing boundary markers
//! - [`builder`] - Merging markers and text into the token stream
//! - [`token`] - Doubly-linked token stream
//! - [`pipeline`] - Entry points and the parser seam

pub mod boundary;
pub mod bounds;
pub mod builder;
pub mod error;
pub mod markup;
pub mod pipeline;
pub mod source;
pub mod syntax;
pub mod token;

pub use blockmark_lang::{Color, DEFAULT_INDENT_WIDTH, OperatorTable, Palette};
pub use boundary::{Boundary, BoundaryId, BoundaryKind, BoundaryOrigin, MarkerKind};
pub use bounds::{Bounds, bounds};
pub use builder::build;
pub use error::MarkupError;
pub use markup::{Markup, MarkupConfig, MarkupEntry, generate};
pub use pipeline::{PipelineError, SyntaxParser, markup_blocks, parse_blocks};
pub use source::{Position, SourceText};
pub use syntax::{Span, SyntaxNode};
pub use token::{Token, TokenId, TokenStream};
