#![warn(missing_docs)]
//! `blockmark-lang` - static language lookups for `blockmark`.
//!
//! This crate intentionally stays lightweight and has no dependencies. It provides the small,
//! data-driven tables the markup core reads but never computes:
//!
//! - the four-entry block color palette
//! - the binary operator precedence table
//! - the default indent width

/// Indent width (in columns) used for every indent boundary unless configured otherwise.
pub const DEFAULT_INDENT_WIDTH: usize = 2;

/// Color tag attached to a block or socket boundary.
///
/// The core only tags boundaries; mapping a tag to an actual color is done through a [`Palette`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Color {
    /// Statements that perform an action (calls, assignments).
    Command,
    /// Control flow (loops, conditionals).
    Control,
    /// Expressions producing a value.
    Value,
    /// `return` statements.
    Return,
}

impl Color {
    /// All palette entries, in declaration order.
    pub const ALL: [Self; 4] = [Self::Command, Self::Control, Self::Value, Self::Return];

    /// Upper-case tag name (`COMMAND`, `CONTROL`, `VALUE`, `RETURN`).
    pub fn name(self) -> &'static str {
        match self {
            Self::Command => "COMMAND",
            Self::Control => "CONTROL",
            Self::Value => "VALUE",
            Self::Return => "RETURN",
        }
    }

    /// Parse an upper- or lower-case tag name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|color| color.name().eq_ignore_ascii_case(name))
    }
}

impl std::fmt::Display for Color {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Mapping from [`Color`] tags to renderable color strings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Palette {
    /// Color for [`Color::Command`].
    pub command: String,
    /// Color for [`Color::Control`].
    pub control: String,
    /// Color for [`Color::Value`].
    pub value: String,
    /// Color for [`Color::Return`].
    pub return_: String,
}

impl Palette {
    /// Look up the color string for a tag.
    pub fn get(&self, color: Color) -> &str {
        match color {
            Color::Command => &self.command,
            Color::Control => &self.control,
            Color::Value => &self.value,
            Color::Return => &self.return_,
        }
    }

    /// Override one entry.
    pub fn with(mut self, color: Color, value: impl Into<String>) -> Self {
        let slot = match color {
            Color::Command => &mut self.command,
            Color::Control => &mut self.control,
            Color::Value => &mut self.value,
            Color::Return => &mut self.return_,
        };
        *slot = value.into();
        self
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            command: "#268bd2".to_string(),
            control: "#daa520".to_string(),
            value: "#26cf3c".to_string(),
            return_: "#dc322f".to_string(),
        }
    }
}

/// Binary operator precedence table (higher binds tighter).
///
/// Operators missing from the table have precedence `0`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperatorTable {
    entries: Vec<(String, u8)>,
}

impl OperatorTable {
    /// Create an empty table (every operator resolves to `0`).
    pub fn empty() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Add or replace the precedence of an operator.
    pub fn with_operator(mut self, operator: impl Into<String>, precedence: u8) -> Self {
        self.set(operator, precedence);
        self
    }

    /// Add or replace the precedence of an operator.
    pub fn set(&mut self, operator: impl Into<String>, precedence: u8) {
        let operator = operator.into();
        match self.entries.iter_mut().find(|(op, _)| *op == operator) {
            Some(entry) => entry.1 = precedence,
            None => self.entries.push((operator, precedence)),
        }
    }

    /// Precedence of `operator`, or `None` if the operator is unknown.
    pub fn get(&self, operator: &str) -> Option<u8> {
        self.entries
            .iter()
            .find(|(op, _)| op == operator)
            .map(|(_, precedence)| *precedence)
    }

    /// Precedence of `operator`, defaulting to `0` for unknown operators.
    pub fn precedence(&self, operator: &str) -> u8 {
        self.get(operator).unwrap_or(0)
    }
}

impl Default for OperatorTable {
    fn default() -> Self {
        let mut table = Self::empty();
        for (operator, precedence) in [
            ("||", 1),
            ("&&", 2),
            ("===", 3),
            ("!==", 3),
            (">", 3),
            ("<", 3),
            (">=", 3),
            ("<=", 3),
            ("+", 4),
            ("-", 4),
            ("*", 5),
            ("/", 5),
            ("÷", 5),
            ("%", 6),
        ] {
            table.set(operator, precedence);
        }
        table
    }
}
