//! Boundaries and their start/end markers.
//!
//! A boundary is a visual region of the block editor: a draggable [`BoundaryKind::Block`], an
//! editable [`BoundaryKind::Socket`] or an indentation-governed [`BoundaryKind::Indent`]. Each
//! boundary shows up in the token stream as a start marker and a matching end marker.

use blockmark_lang::Color;

/// Identifier of a boundary, unique within one markup run.
///
/// `0` is reserved for the root segment that wraps the whole text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BoundaryId(pub u32);

impl BoundaryId {
    /// The root segment.
    pub const ROOT: Self = Self(0);

    /// Returns `true` for [`BoundaryId::ROOT`].
    pub fn is_root(self) -> bool {
        self == Self::ROOT
    }
}

impl std::fmt::Display for BoundaryId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Kind of region a boundary delimits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BoundaryKind {
    /// The root container. The token stream itself plays this role.
    Segment,
    /// A structured, draggable code unit.
    Block,
    /// An editable leaf slot.
    Socket,
    /// An indentation-governed region.
    Indent,
}

/// Where a boundary came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BoundaryOrigin {
    /// The root segment.
    Root,
    /// Derived from a syntax node.
    Tree,
    /// Placeholder synthesized for a blank line.
    Handwritten,
    /// Socket synthesized around a block nested directly inside another block.
    Implicit,
}

/// A paired region with its presentation attributes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Boundary {
    /// Identifier shared by the start and end markers.
    pub id: BoundaryId,
    /// Region kind.
    pub kind: BoundaryKind,
    /// Palette tag (blocks only).
    pub color: Option<Color>,
    /// Operator precedence used to classify expression nesting (blocks and sockets).
    pub precedence: u8,
    /// Indentation width in columns (indents only, `0` otherwise).
    pub indent_width: usize,
    /// Provenance of the boundary.
    pub origin: BoundaryOrigin,
}

impl Boundary {
    /// The root segment boundary.
    pub fn root() -> Self {
        Self {
            id: BoundaryId::ROOT,
            kind: BoundaryKind::Segment,
            color: None,
            precedence: 0,
            indent_width: 0,
            origin: BoundaryOrigin::Root,
        }
    }

    /// A tree-derived block.
    pub fn block(id: BoundaryId, color: Color, precedence: u8) -> Self {
        Self {
            id,
            kind: BoundaryKind::Block,
            color: Some(color),
            precedence,
            indent_width: 0,
            origin: BoundaryOrigin::Tree,
        }
    }

    /// A tree-derived socket.
    pub fn socket(id: BoundaryId, precedence: u8) -> Self {
        Self {
            id,
            kind: BoundaryKind::Socket,
            color: None,
            precedence,
            indent_width: 0,
            origin: BoundaryOrigin::Tree,
        }
    }

    /// A tree-derived indent.
    pub fn indent(id: BoundaryId, width: usize) -> Self {
        Self {
            id,
            kind: BoundaryKind::Indent,
            color: None,
            precedence: 0,
            indent_width: width,
            origin: BoundaryOrigin::Tree,
        }
    }

    /// A colorless block or socket used as a blank-line placeholder.
    pub fn handwritten(id: BoundaryId, kind: BoundaryKind) -> Self {
        Self {
            id,
            kind,
            color: None,
            precedence: 0,
            indent_width: 0,
            origin: BoundaryOrigin::Handwritten,
        }
    }

    /// Replace the origin tag.
    pub fn with_origin(mut self, origin: BoundaryOrigin) -> Self {
        self.origin = origin;
        self
    }

    /// Returns `true` for blank-line placeholders.
    pub fn is_handwritten(&self) -> bool {
        self.origin == BoundaryOrigin::Handwritten
    }

    /// Returns `true` for synthesized socket wrappers.
    pub fn is_implicit(&self) -> bool {
        self.origin == BoundaryOrigin::Implicit
    }

    /// Start marker for this boundary.
    pub fn start_marker(&self) -> MarkerKind {
        MarkerKind::start_of(self.kind)
    }

    /// End marker for this boundary.
    pub fn end_marker(&self) -> MarkerKind {
        MarkerKind::end_of(self.kind)
    }
}

/// Start or end marker of a boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MarkerKind {
    /// Opens the root segment.
    SegmentStart,
    /// Closes the root segment.
    SegmentEnd,
    /// Opens a block.
    BlockStart,
    /// Closes a block.
    BlockEnd,
    /// Opens a socket.
    SocketStart,
    /// Closes a socket.
    SocketEnd,
    /// Opens an indent.
    IndentStart,
    /// Closes an indent.
    IndentEnd,
}

impl MarkerKind {
    /// Start marker for a boundary kind.
    pub fn start_of(kind: BoundaryKind) -> Self {
        match kind {
            BoundaryKind::Segment => Self::SegmentStart,
            BoundaryKind::Block => Self::BlockStart,
            BoundaryKind::Socket => Self::SocketStart,
            BoundaryKind::Indent => Self::IndentStart,
        }
    }

    /// End marker for a boundary kind.
    pub fn end_of(kind: BoundaryKind) -> Self {
        match kind {
            BoundaryKind::Segment => Self::SegmentEnd,
            BoundaryKind::Block => Self::BlockEnd,
            BoundaryKind::Socket => Self::SocketEnd,
            BoundaryKind::Indent => Self::IndentEnd,
        }
    }

    /// Returns `true` for the opening half of a pair.
    pub fn is_start(self) -> bool {
        matches!(
            self,
            Self::SegmentStart | Self::BlockStart | Self::SocketStart | Self::IndentStart
        )
    }

    /// Kind of boundary this marker belongs to.
    pub fn boundary_kind(self) -> BoundaryKind {
        match self {
            Self::SegmentStart | Self::SegmentEnd => BoundaryKind::Segment,
            Self::BlockStart | Self::BlockEnd => BoundaryKind::Block,
            Self::SocketStart | Self::SocketEnd => BoundaryKind::Socket,
            Self::IndentStart | Self::IndentEnd => BoundaryKind::Indent,
        }
    }

    /// Marker name as used in stream dumps (`blockStart`, `socketEnd`, ...).
    pub fn name(self) -> &'static str {
        match self {
            Self::SegmentStart => "segmentStart",
            Self::SegmentEnd => "segmentEnd",
            Self::BlockStart => "blockStart",
            Self::BlockEnd => "blockEnd",
            Self::SocketStart => "socketStart",
            Self::SocketEnd => "socketEnd",
            Self::IndentStart => "indentStart",
            Self::IndentEnd => "indentEnd",
        }
    }
}

impl std::fmt::Display for MarkerKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
