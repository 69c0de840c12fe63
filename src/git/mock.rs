use crate::domain::RawCommit;
use crate::error::{ChangelogError, Result};
use crate::git::{Repository, TagInfo};
use chrono::{DateTime, TimeZone, Utc};
use std::collections::{HashMap, HashSet};

/// Shortest abbreviated hash the mock will resolve
const MIN_ABBREV_LEN: usize = 4;

struct MockCommit {
    raw: RawCommit,
    parents: Vec<String>,
}

/// In-memory commit graph for testing without actual git operations
///
/// Commits are kept in insertion order (oldest first) and each new commit
/// becomes the child of the current head unless parents are given explicitly.
pub struct MockRepository {
    commits: Vec<MockCommit>,
    tags: Vec<TagInfo>,
    branches: HashMap<String, String>,
    head: Option<String>,
    extraction_failure: Option<String>,
}

impl MockRepository {
    /// Create a new empty mock repository
    pub fn new() -> Self {
        MockRepository {
            commits: Vec::new(),
            tags: Vec::new(),
            branches: HashMap::new(),
            head: None,
            extraction_failure: None,
        }
    }

    /// Add a commit on top of the current head and move the head to it
    pub fn add_commit(&mut self, commit: RawCommit) {
        let parents = self.head.iter().cloned().collect();
        self.add_commit_with_parents(commit, parents);
    }

    /// Add a commit with explicit parents (e.g. a merge) and move the head to it
    pub fn add_commit_with_parents(&mut self, commit: RawCommit, parents: Vec<String>) {
        self.head = Some(commit.hash.clone());
        self.commits.push(MockCommit {
            raw: commit,
            parents,
        });
    }

    /// Add a commit from a full message, one minute after the previous commit
    ///
    /// The first line becomes the subject and everything after the first
    /// blank line becomes the body.
    pub fn commit(&mut self, hash: &str, message: &str) -> &mut Self {
        let (subject, body) = split_message(message);
        let timestamp = base_time() + chrono::Duration::minutes(self.commits.len() as i64);
        self.add_commit(RawCommit::new(hash, "Test Author", timestamp, subject).with_body(body));
        self
    }

    /// Tag a commit; tags are listed in the order they were added
    pub fn add_tag(&mut self, name: impl Into<String>, hash: &str) -> &mut Self {
        let timestamp = self
            .find(hash)
            .map(|c| c.raw.timestamp)
            .unwrap_or_else(base_time);
        self.tags.push(TagInfo::new(name, hash, timestamp, timestamp));
        self
    }

    /// Point a branch name at a commit
    pub fn set_branch(&mut self, name: impl Into<String>, hash: &str) -> &mut Self {
        self.branches.insert(name.into(), hash.to_string());
        self
    }

    /// Move the checked-out position
    pub fn set_head(&mut self, hash: &str) -> &mut Self {
        self.head = Some(hash.to_string());
        self
    }

    /// Make every subsequent enumeration fail with the given detail
    pub fn fail_extraction(&mut self, detail: impl Into<String>) -> &mut Self {
        self.extraction_failure = Some(detail.into());
        self
    }

    fn find(&self, hash: &str) -> Option<&MockCommit> {
        self.commits.iter().find(|c| c.raw.hash == hash)
    }

    fn ancestors(&self, start: &str) -> HashSet<String> {
        let mut seen = HashSet::new();
        let mut stack = vec![start.to_string()];

        while let Some(hash) = stack.pop() {
            if !seen.insert(hash.clone()) {
                continue;
            }
            if let Some(commit) = self.find(&hash) {
                stack.extend(commit.parents.iter().cloned());
            }
        }

        seen
    }
}

impl Default for MockRepository {
    fn default() -> Self {
        Self::new()
    }
}

fn base_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0)
        .single()
        .unwrap_or_else(Utc::now)
}

fn split_message(message: &str) -> (String, String) {
    match message.split_once('\n') {
        Some((subject, rest)) => (subject.to_string(), rest.trim().to_string()),
        None => (message.to_string(), String::new()),
    }
}

impl Repository for MockRepository {
    fn list_tags(&self) -> Result<Vec<TagInfo>> {
        Ok(self.tags.clone())
    }

    fn resolve_reference(&self, token: &str) -> Result<String> {
        if token == "HEAD" {
            return self.current_position();
        }
        if let Some(hash) = self.branches.get(token) {
            return Ok(hash.clone());
        }
        if let Some(tag) = self.tags.iter().find(|t| t.name == token) {
            return Ok(tag.commit_hash.clone());
        }
        if token.len() < MIN_ABBREV_LEN {
            return Err(ChangelogError::reference_not_found(token));
        }

        let mut matches = self.commits.iter().filter(|c| c.raw.hash.starts_with(token));
        match (matches.next(), matches.next()) {
            (Some(commit), None) => Ok(commit.raw.hash.clone()),
            _ => Err(ChangelogError::reference_not_found(token)),
        }
    }

    fn current_position(&self) -> Result<String> {
        self.head
            .clone()
            .ok_or_else(|| ChangelogError::reference_not_found("HEAD"))
    }

    fn commits_between(&self, upper: &str, lower: Option<&str>) -> Result<Vec<RawCommit>> {
        if let Some(detail) = &self.extraction_failure {
            return Err(ChangelogError::extraction(detail.clone()));
        }
        if self.find(upper).is_none() {
            return Err(ChangelogError::extraction(format!("unknown commit {}", upper)));
        }

        let included = self.ancestors(upper);
        let hidden = lower.map(|l| self.ancestors(l)).unwrap_or_default();

        Ok(self
            .commits
            .iter()
            .rev()
            .filter(|c| included.contains(&c.raw.hash) && !hidden.contains(&c.raw.hash))
            .map(|c| c.raw.clone())
            .collect())
    }
}
