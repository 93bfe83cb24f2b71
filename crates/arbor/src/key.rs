//! Addressing for positions in a view tree.
//!
//! View trees are rebuilt every frame, so a node has no identity of its own.
//! A [`ViewKey`] gives a position in the tree an identity that is stable for
//! as long as the tree keeps the same shape around it. The buffer's store,
//! its mouse claims and its event scopes are all addressed by key path.
//!
//! Default keys are structural: list combinators key unlabelled children by
//! their index, and stateful combinators scope their state under a fixed
//! name. Reordering unkeyed siblings therefore hands their stored state to
//! whichever node lands in the old position. Use [`ViewKey::key`] for children
//! that move, and [`ViewKey::id`] for nodes that should keep their state
//! wherever they appear in the tree.

use std::{
    borrow::Cow,
    fmt,
    hash::{Hash, Hasher},
};

/// Separator between path segments.
const SEPARATOR: char = '/';

/// An address for a node in the view tree.
#[derive(Debug, Clone, Default)]
pub enum ViewKey {
    /// No key. Appending it to a path leaves the path unchanged.
    #[default]
    None,
    /// A global identifier. Replaces the whole path when appended.
    Id(String),
    /// A named child, stable under reordering of its siblings.
    Key(String),
    /// A default name supplied by a combinator.
    Name(String),
    /// A position within a sibling list.
    Index(usize),
    /// A concatenated path of ancestor segments.
    Path(String),
}

impl ViewKey {
    /// Construct a global identifier key.
    pub fn id(s: impl Into<String>) -> Self {
        Self::Id(s.into())
    }

    /// Construct a named child key.
    pub fn key(s: impl Into<String>) -> Self {
        Self::Key(s.into())
    }

    /// Construct a combinator name key.
    pub fn name(s: impl Into<String>) -> Self {
        Self::Name(s.into())
    }

    /// Construct an index key.
    pub fn index(i: usize) -> Self {
        Self::Index(i)
    }

    /// Is this the empty key?
    pub fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }

    /// The canonical string form of this key. Equality and hashing are
    /// defined over this form.
    pub fn canonical(&self) -> Cow<'_, str> {
        match self {
            Self::None => Cow::Borrowed(""),
            Self::Id(s) => Cow::Owned(format!("#{s}")),
            Self::Key(s) => Cow::Owned(format!(":{s}")),
            Self::Name(s) | Self::Path(s) => Cow::Borrowed(s),
            Self::Index(i) => Cow::Owned(format!("[{i}]")),
        }
    }

    /// Append a child key to this key.
    ///
    /// | parent | child   | result          |
    /// |--------|---------|-----------------|
    /// | None   | any     | child           |
    /// | any    | None    | parent          |
    /// | any    | Id      | child           |
    /// | p      | c       | Path("p/c")     |
    pub fn append(&self, child: &Self) -> Self {
        match (self, child) {
            (Self::None, c) => c.clone(),
            (p, Self::None) => p.clone(),
            (_, c @ Self::Id(_)) => c.clone(),
            (p, c) => Self::Path(format!("{}{SEPARATOR}{}", p.canonical(), c.canonical())),
        }
    }

    /// Number of segments in the canonical path.
    pub fn depth(&self) -> usize {
        match self {
            Self::None => 0,
            Self::Path(p) => p.split(SEPARATOR).count(),
            _ => 1,
        }
    }
}

impl PartialEq for ViewKey {
    fn eq(&self, other: &Self) -> bool {
        self.canonical() == other.canonical()
    }
}

impl Eq for ViewKey {}

impl Hash for ViewKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.canonical().hash(state);
    }
}

impl fmt::Display for ViewKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.canonical())
    }
}

impl From<&str> for ViewKey {
    fn from(s: &str) -> Self {
        Self::Key(s.to_string())
    }
}

impl From<String> for ViewKey {
    fn from(s: String) -> Self {
        Self::Key(s)
    }
}

impl From<usize> for ViewKey {
    fn from(i: usize) -> Self {
        Self::Index(i)
    }
}
