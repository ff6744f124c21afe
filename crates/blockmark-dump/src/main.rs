//! Token stream dump tool.
//!
//! Reads a syntax tree serialized as JSON (the top-level statements of a document, as produced by
//! an external parser) together with the source file it was parsed from, and prints the resulting
//! block/socket/indent token stream.
//!
//! # Usage
//!
//! ```bash
//! cargo run -p blockmark-dump -- --tree tree.json source.coffee
//! cargo run -p blockmark-dump -- --tree tree.json source.coffee --format json --colors
//! cargo run -p blockmark-dump -- --tree tree.json source.coffee --colors --palette value=blue
//! cargo run -p blockmark-dump -- --tree tree.json source.coffee --precedence '+=5'
//! ```
//!
//! Set `RUST_LOG=blockmark=debug` to see what the pipeline synthesizes.

mod render;

use anyhow::Context;
use blockmark::{MarkupConfig, SyntaxNode, markup_blocks};
use blockmark_lang::{Color, DEFAULT_INDENT_WIDTH, OperatorTable, Palette};
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    /// One token per line.
    Text,
    /// A JSON array of tokens.
    Json,
}

#[derive(Debug, Parser)]
#[command(version, about = "Print the block editor token stream for a parsed document")]
struct Options {
    /// JSON file holding the document's top-level syntax nodes.
    #[arg(long)]
    tree: PathBuf,

    /// Source file the tree was parsed from.
    source: PathBuf,

    /// Output format.
    #[arg(long, value_enum, default_value_t = Format::Text)]
    format: Format,

    /// Width attached to indent boundaries.
    #[arg(long, default_value_t = DEFAULT_INDENT_WIDTH)]
    indent_width: usize,

    /// Print palette colors next to colored markers.
    #[arg(long)]
    colors: bool,

    /// Override a palette color, e.g. `command=red`. May be repeated.
    #[arg(long = "palette", value_name = "TAG=COLOR", value_parser = parse_palette_entry)]
    palette: Vec<(Color, String)>,

    /// Override an operator precedence, e.g. `+=5`. May be repeated.
    #[arg(long = "precedence", value_name = "OP=LEVEL", value_parser = parse_precedence)]
    precedences: Vec<(String, u8)>,
}

fn parse_palette_entry(arg: &str) -> Result<(Color, String), String> {
    let (tag, value) = arg
        .split_once('=')
        .ok_or_else(|| format!("expected TAG=COLOR, got `{arg}`"))?;
    let color = Color::from_name(tag).ok_or_else(|| {
        let tags: Vec<_> = Color::ALL.iter().map(|c| c.name()).collect();
        format!("unknown color tag `{tag}` (expected one of {})", tags.join(", "))
    })?;
    Ok((color, value.to_string()))
}

// Operators may themselves contain `=`, so the level follows the last one.
fn parse_precedence(arg: &str) -> Result<(String, u8), String> {
    let (operator, level) = arg
        .rsplit_once('=')
        .filter(|(operator, _)| !operator.is_empty())
        .ok_or_else(|| format!("expected OP=LEVEL, got `{arg}`"))?;
    let level = level
        .parse()
        .map_err(|err| format!("invalid precedence `{level}`: {err}"))?;
    Ok((operator.to_string(), level))
}

fn main() -> anyhow::Result<()> {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .try_init();

    let options = Options::parse();

    let text = std::fs::read_to_string(&options.source)
        .with_context(|| format!("failed to read `{}`", options.source.display()))?;
    let tree_json = std::fs::read_to_string(&options.tree)
        .with_context(|| format!("failed to read `{}`", options.tree.display()))?;
    let tree: Vec<SyntaxNode> = serde_json::from_str(&tree_json)
        .with_context(|| format!("failed to decode syntax tree `{}`", options.tree.display()))?;
    tracing::debug!(nodes = tree.len(), "loaded syntax tree");

    let operators = options
        .precedences
        .iter()
        .fold(OperatorTable::default(), |table, (operator, level)| {
            table.with_operator(operator.as_str(), *level)
        });
    let config = MarkupConfig::default()
        .with_indent_width(options.indent_width)
        .with_operators(operators);
    let stream = markup_blocks(&tree, &text, &config)
        .with_context(|| format!("failed to mark up `{}`", options.source.display()))?;

    let palette = options
        .palette
        .iter()
        .fold(Palette::default(), |palette, (color, value)| {
            palette.with(*color, value.as_str())
        });
    let palette = options.colors.then_some(&palette);
    match options.format {
        Format::Text => print!("{}", render::render_text(&stream, palette)),
        Format::Json => {
            let views = render::token_views(&stream, palette);
            println!("{}", serde_json::to_string_pretty(&views)?);
        }
    }

    Ok(())
}
