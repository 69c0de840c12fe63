//! Git operations abstraction layer
//!
//! This module provides a trait-based abstraction over the repository access
//! the changelog pipeline needs, allowing for multiple implementations
//! including real Git repositories and in-memory fakes for testing.
//!
//! # Overview
//!
//! The primary abstraction is the [Repository] trait. The concrete
//! implementations include:
//!
//! - [repository::Git2Repository]: A real implementation using the `git2` crate
//! - [mock::MockRepository]: An in-memory commit graph for testing
//!
//! # Usage
//!
//! Pipeline stages take the repository by reference as an explicit
//! capability rather than reaching for any global state.
//!
//! ```rust
//! # use changelog::git::Repository;
//! # fn example<R: Repository>(repo: &R) -> Result<(), Box<dyn std::error::Error>> {
//! let head = repo.current_position()?;
//! let commits = repo.commits_between(&head, None)?;
//! println!("{} commits in history", commits.len());
//! # Ok(())
//! # }
//! ```

pub mod mock;
pub mod repository;

pub use mock::MockRepository;
pub use repository::Git2Repository;

use crate::domain::RawCommit;
use crate::error::Result;
use chrono::{DateTime, Utc};

/// A tag and the commit it points at
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagInfo {
    pub name: String,
    /// Full hash of the tagged commit
    pub commit_hash: String,
    /// Creation time of the tag (tagger time, or the commit time for lightweight tags)
    pub timestamp: DateTime<Utc>,
    /// Commit time of the tagged commit
    pub commit_timestamp: DateTime<Utc>,
}

impl TagInfo {
    pub fn new(
        name: impl Into<String>,
        commit_hash: impl Into<String>,
        timestamp: DateTime<Utc>,
        commit_timestamp: DateTime<Utc>,
    ) -> Self {
        TagInfo {
            name: name.into(),
            commit_hash: commit_hash.into(),
            timestamp,
            commit_timestamp,
        }
    }
}

/// Repository access consumed by the changelog pipeline
///
/// ## Error Handling
///
/// All methods return [crate::error::Result<T>]. Implementations map lookup
/// failures to [crate::error::ChangelogError::ReferenceNotFound] and history
/// traversal failures to [crate::error::ChangelogError::ExtractionFailed].
///
/// ## Implementations
///
/// - [Git2Repository](repository::Git2Repository): Real Git implementation using the `git2` crate
/// - [MockRepository](mock::MockRepository): Test implementation backed by an in-memory graph
pub trait Repository {
    /// List all tags in creation order (oldest first)
    ///
    /// # Example
    /// ```rust
    /// # use changelog::git::Repository;
    /// # fn example<R: Repository>(repo: &R) -> Result<(), Box<dyn std::error::Error>> {
    /// if let Some(latest) = repo.list_tags()?.last() {
    ///     println!("Most recent tag: {}", latest.name);
    /// }
    /// # Ok(())
    /// # }
    /// ```
    fn list_tags(&self) -> Result<Vec<TagInfo>>;

    /// Resolve a tag, branch, or full/abbreviated hash to a full commit hash
    ///
    /// # Returns
    /// * `Ok(String)` - Full hash of the commit the token names
    /// * `Err(ReferenceNotFound)` - If the token is unknown or ambiguous
    fn resolve_reference(&self, token: &str) -> Result<String>;

    /// Full hash of the checked-out commit
    fn current_position(&self) -> Result<String>;

    /// Enumerate commits reachable from `upper` but not from `lower`
    ///
    /// A `lower` of `None` walks back to the root commit. Commits are returned
    /// newest first.
    ///
    /// # Example
    /// ```rust
    /// # use changelog::git::Repository;
    /// # fn example<R: Repository>(repo: &R) -> Result<(), Box<dyn std::error::Error>> {
    /// let upper = repo.resolve_reference("v1.3.0")?;
    /// let lower = repo.resolve_reference("v1.2.0")?;
    /// for commit in repo.commits_between(&upper, Some(lower.as_str()))? {
    ///     println!("{}: {}", commit.hash, commit.subject);
    /// }
    /// # Ok(())
    /// # }
    /// ```
    fn commits_between(&self, upper: &str, lower: Option<&str>) -> Result<Vec<RawCommit>>;
}
