use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Unprocessed commit metadata as reported by the repository backend
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawCommit {
    /// Full commit hash
    pub hash: String,
    pub author: String,
    pub timestamp: DateTime<Utc>,
    /// First line of the message
    pub subject: String,
    /// Message text after the subject line (may be empty)
    pub body: String,
}

impl RawCommit {
    pub fn new(
        hash: impl Into<String>,
        author: impl Into<String>,
        timestamp: DateTime<Utc>,
        subject: impl Into<String>,
    ) -> Self {
        RawCommit {
            hash: hash.into(),
            author: author.into(),
            timestamp,
            subject: subject.into(),
            body: String::new(),
        }
    }

    /// Set the commit body
    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = body.into();
        self
    }
}

/// Changelog category a commit is filed under
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CommitKind {
    Feature,
    Fix,
    Documentation,
    Refactor,
    Performance,
    Test,
    Build,
    Chore,
    Revert,
    Other,
}

impl CommitKind {
    /// Order in which sections appear in a rendered document
    pub const RENDER_ORDER: [CommitKind; 10] = [
        CommitKind::Feature,
        CommitKind::Fix,
        CommitKind::Performance,
        CommitKind::Refactor,
        CommitKind::Documentation,
        CommitKind::Build,
        CommitKind::Test,
        CommitKind::Chore,
        CommitKind::Revert,
        CommitKind::Other,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            CommitKind::Feature => "feature",
            CommitKind::Fix => "fix",
            CommitKind::Documentation => "documentation",
            CommitKind::Refactor => "refactor",
            CommitKind::Performance => "performance",
            CommitKind::Test => "test",
            CommitKind::Build => "build",
            CommitKind::Chore => "chore",
            CommitKind::Revert => "revert",
            CommitKind::Other => "other",
        }
    }

    /// Section heading used when the configuration does not override it
    pub fn default_heading(&self) -> &'static str {
        match self {
            CommitKind::Feature => "Features",
            CommitKind::Fix => "Bug Fixes",
            CommitKind::Documentation => "Documentation",
            CommitKind::Refactor => "Code Refactoring",
            CommitKind::Performance => "Performance Improvements",
            CommitKind::Test => "Tests",
            CommitKind::Build => "Build System",
            CommitKind::Chore => "Chores",
            CommitKind::Revert => "Reverts",
            CommitKind::Other => "Other Changes",
        }
    }
}

impl fmt::Display for CommitKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A commit annotated with its changelog category and breaking-change status
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifiedEntry {
    pub kind: CommitKind,
    pub scope: Option<String>,
    pub subject: String,
    /// Present only when the commit declares a breaking change
    pub breaking_description: Option<String>,
    pub hash: String,
    pub author: String,
    pub timestamp: DateTime<Utc>,
}

impl ClassifiedEntry {
    pub fn is_breaking(&self) -> bool {
        self.breaking_description.is_some()
    }

    /// Abbreviated hash, at most `len` characters
    pub fn short_hash(&self, len: usize) -> &str {
        short_hash(&self.hash, len)
    }
}

/// First `len` characters of a hash
pub fn short_hash(hash: &str, len: usize) -> &str {
    let end = hash
        .char_indices()
        .nth(len)
        .map(|(idx, _)| idx)
        .unwrap_or(hash.len());
    &hash[..end]
}
