//! One-call entry points from source text to token stream.
//!
//! The parser itself lives outside this crate. [`SyntaxParser`] is the seam where a
//! language-specific parser plugs in; [`markup_blocks`] runs the core on a tree that was parsed
//! elsewhere.

use crate::builder::build;
use crate::error::MarkupError;
use crate::markup::{MarkupConfig, generate};
use crate::source::SourceText;
use crate::syntax::SyntaxNode;
use crate::token::TokenStream;
use thiserror::Error;

/// A parser producing the top-level statements of a document.
pub trait SyntaxParser {
    /// The error type returned by [`SyntaxParser::parse`].
    type Error;

    /// Parse `text` into its top-level nodes.
    fn parse(&mut self, text: &str) -> Result<Vec<SyntaxNode>, Self::Error>;
}

/// Failure of [`parse_blocks`].
#[derive(Debug, Error)]
pub enum PipelineError<E> {
    #[error("parse failed: {0}")]
    /// The parser rejected the text.
    Parse(#[source] E),

    #[error(transparent)]
    /// The tree could not be turned into a token stream.
    Markup(#[from] MarkupError),
}

/// Turn an already-parsed tree and its text into a token stream.
#[tracing::instrument(skip_all, fields(node_count = nodes.len(), text_len = text.len()))]
pub fn markup_blocks(
    nodes: &[SyntaxNode],
    text: &str,
    config: &MarkupConfig,
) -> Result<TokenStream, MarkupError> {
    let source = SourceText::new(text);
    let markup = generate(nodes, &source, config)?;
    build(&source, &markup)
}

/// Parse `text` with `parser`, then turn the result into a token stream.
pub fn parse_blocks<P>(
    parser: &mut P,
    text: &str,
    config: &MarkupConfig,
) -> Result<TokenStream, PipelineError<P::Error>>
where
    P: SyntaxParser,
    P::Error: std::error::Error + 'static,
{
    let nodes = parser.parse(text).map_err(PipelineError::Parse)?;
    tracing::debug!(nodes = nodes.len(), "parsed document");
    Ok(markup_blocks(&nodes, text, config)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::Span;

    #[derive(Debug, Error)]
    #[error("unexpected token at line {0}")]
    struct ParseFailure(usize);

    /// Treats every non-blank line as one bare literal.
    struct LineParser;

    impl SyntaxParser for LineParser {
        type Error = ParseFailure;

        fn parse(&mut self, text: &str) -> Result<Vec<SyntaxNode>, Self::Error> {
            let mut nodes = Vec::new();
            for (line, content) in text.split('\n').enumerate() {
                let trimmed = content.trim();
                if trimmed.is_empty() {
                    continue;
                }
                if trimmed.starts_with('@') {
                    return Err(ParseFailure(line));
                }
                let column = content.chars().count() - content.trim_start().chars().count();
                nodes.push(SyntaxNode::Literal {
                    span: Span::on_line(line, column, trimmed.chars().count()),
                    value: trimmed.to_string(),
                });
            }
            Ok(nodes)
        }
    }

    #[test]
    fn test_parse_blocks_runs_parser_and_core() {
        let stream = parse_blocks(&mut LineParser, "a\nb", &MarkupConfig::default()).unwrap();
        assert_eq!(stream.text(), "a\nb");
        stream.check_nesting().unwrap();
    }

    #[test]
    fn test_parse_error_is_wrapped() {
        let err = parse_blocks(&mut LineParser, "a\n@", &MarkupConfig::default()).unwrap_err();
        assert!(matches!(err, PipelineError::Parse(ParseFailure(1))));
        assert_eq!(err.to_string(), "parse failed: unexpected token at line 1");
    }

    #[test]
    fn test_markup_error_is_wrapped() {
        struct Broken;
        impl SyntaxParser for Broken {
            type Error = ParseFailure;
            fn parse(&mut self, _text: &str) -> Result<Vec<SyntaxNode>, Self::Error> {
                Ok(vec![SyntaxNode::Unsupported {
                    span: Span::on_line(0, 0, 5),
                    kind: "Class".to_string(),
                }])
            }
        }

        let err = parse_blocks(&mut Broken, "class", &MarkupConfig::default()).unwrap_err();
        assert!(matches!(
            err,
            PipelineError::Markup(MarkupError::UnsupportedNodeKind { .. })
        ));
    }
}
