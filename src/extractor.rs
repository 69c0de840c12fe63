//! Commit extraction for a resolved range

use tracing::{debug, instrument};

use crate::domain::{Range, RawCommit};
use crate::error::{ChangelogError, Result};
use crate::git::Repository;

/// Enumerate the commits in `range`, newest first
///
/// An empty range yields an empty vector. Any backend failure is reported as
/// [ChangelogError::ExtractionFailed].
#[instrument(skip(range, repo), fields(range = %range))]
pub fn extract<R: Repository + ?Sized>(range: &Range, repo: &R) -> Result<Vec<RawCommit>> {
    let commits = repo
        .commits_between(range.upper.hash(), range.lower.hash())
        .map_err(|e| match e {
            ChangelogError::ExtractionFailed(_) => e,
            other => ChangelogError::extraction(format!("{}: {}", range, other)),
        })?;

    debug!(count = commits.len(), "extracted commits");
    Ok(commits)
}
