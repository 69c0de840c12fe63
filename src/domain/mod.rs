//! Domain logic - pure changelog records independent of git operations

pub mod commit;
pub mod document;
pub mod range;

pub use commit::{ClassifiedEntry, CommitKind, RawCommit};
pub use document::{ChangelogDocument, Section};
pub use range::{Boundary, Range, Reference};
