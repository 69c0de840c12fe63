use std::fmt;

/// Literal token naming the repository's checked-out state.
pub const CURRENT_POSITION: &str = "HEAD";

/// A resolved point in history
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reference {
    /// The checked-out state (`HEAD`)
    CurrentPosition { hash: String },
    /// A tag, peeled to the commit it names
    Tag { name: String, hash: String },
    /// A branch name or full/abbreviated commit hash
    Commit { token: String, hash: String },
}

impl Reference {
    /// Full commit hash this reference points at
    pub fn hash(&self) -> &str {
        match self {
            Reference::CurrentPosition { hash }
            | Reference::Tag { hash, .. }
            | Reference::Commit { hash, .. } => hash,
        }
    }

    /// Tag name, if this reference is a tag
    pub fn tag_name(&self) -> Option<&str> {
        match self {
            Reference::Tag { name, .. } => Some(name),
            _ => None,
        }
    }

    pub fn is_current_position(&self) -> bool {
        matches!(self, Reference::CurrentPosition { .. })
    }
}

impl fmt::Display for Reference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reference::CurrentPosition { .. } => write!(f, "{}", CURRENT_POSITION),
            Reference::Tag { name, .. } => write!(f, "{}", name),
            Reference::Commit { token, .. } => write!(f, "{}", token),
        }
    }
}

/// Lower edge of a range: a concrete reference or the beginning of history
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Boundary {
    Root,
    At(Reference),
}

impl Boundary {
    /// Commit hash to hide during extraction; `None` means walk to the root commit
    pub fn hash(&self) -> Option<&str> {
        match self {
            Boundary::Root => None,
            Boundary::At(reference) => Some(reference.hash()),
        }
    }
}

impl fmt::Display for Boundary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Boundary::Root => write!(f, "<root>"),
            Boundary::At(reference) => write!(f, "{}", reference),
        }
    }
}

/// Commits reachable from `upper` but not from `lower` (lower exclusive, upper inclusive)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Range {
    pub upper: Reference,
    pub lower: Boundary,
}

impl Range {
    pub fn new(upper: Reference, lower: Boundary) -> Self {
        Range { upper, lower }
    }
}

impl fmt::Display for Range {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}~{}", self.upper, self.lower)
    }
}
