//! Output formats for a token stream.

use blockmark::{BoundaryKind, Token, TokenStream};
use blockmark_lang::Palette;
use serde::Serialize;

/// One token as written by `--format json`.
#[derive(Debug, Serialize, PartialEq)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum TokenView<'a> {
    /// Source text.
    Text {
        /// The text itself.
        text: &'a str,
    },
    /// Line break.
    Newline,
    /// Boundary marker.
    Marker {
        /// Marker name (`blockStart`, `socketEnd`, ...).
        marker: &'static str,
        /// Boundary id shared with the partner marker.
        id: u32,
        /// Palette tag of a block.
        #[serde(skip_serializing_if = "Option::is_none")]
        color: Option<&'static str>,
        /// Palette value for the tag, with `--colors`.
        #[serde(skip_serializing_if = "Option::is_none")]
        hex: Option<&'a str>,
        /// Operator precedence of a block or socket.
        #[serde(skip_serializing_if = "is_zero")]
        precedence: u8,
        /// Width of an indent.
        #[serde(rename = "indentWidth", skip_serializing_if = "Option::is_none")]
        indent_width: Option<usize>,
        /// Blank-line placeholder.
        #[serde(skip_serializing_if = "std::ops::Not::not")]
        handwritten: bool,
        /// Socket synthesized around a nested block.
        #[serde(skip_serializing_if = "std::ops::Not::not")]
        implicit: bool,
    },
}

fn is_zero(value: &u8) -> bool {
    *value == 0
}

/// Build the JSON view of every token.
pub fn token_views<'a>(
    stream: &'a TokenStream,
    palette: Option<&'a Palette>,
) -> Vec<TokenView<'a>> {
    stream
        .iter()
        .map(|token| match token {
            Token::Text(text) => TokenView::Text { text },
            Token::Newline => TokenView::Newline,
            Token::Marker { kind, boundary } => {
                let attrs = stream.boundary(*boundary);
                let color = attrs.and_then(|b| b.color);
                TokenView::Marker {
                    marker: kind.name(),
                    id: boundary.0,
                    color: color.map(|c| c.name()),
                    hex: color.zip(palette).map(|(c, p)| p.get(c)),
                    precedence: attrs.map_or(0, |b| b.precedence),
                    indent_width: attrs
                        .filter(|b| b.kind == BoundaryKind::Indent)
                        .map(|b| b.indent_width),
                    handwritten: attrs.is_some_and(|b| b.is_handwritten()),
                    implicit: attrs.is_some_and(|b| b.is_implicit()),
                }
            }
        })
        .collect()
}

/// Render the stream one token per line, appending palette values to colored start markers.
pub fn render_text(stream: &TokenStream, palette: Option<&Palette>) -> String {
    let Some(palette) = palette else {
        return stream.to_string();
    };

    let mut out = String::new();
    for (token, line) in stream.iter().zip(stream.to_string().lines()) {
        out.push_str(line);
        if let Token::Marker { kind, boundary } = token
            && kind.is_start()
            && let Some(color) = stream.boundary(*boundary).and_then(|b| b.color)
        {
            out.push(' ');
            out.push_str(palette.get(color));
        }
        out.push('\n');
    }
    out
}
