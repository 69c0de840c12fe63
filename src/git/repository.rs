use crate::domain::RawCommit;
use crate::error::{ChangelogError, Result};
use crate::git::TagInfo;
use chrono::{DateTime, TimeZone, Utc};
use git2::{ErrorCode, Oid, Repository as Git2Repo, Sort};
use std::path::Path;
use tracing::{debug, instrument};

/// Wrapper around git2::Repository with our trait interface
pub struct Git2Repository {
    repo: Git2Repo,
}

impl Git2Repository {
    /// Open the repository containing `path`, searching parent directories
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let repo = Git2Repo::discover(path)?;

        Ok(Git2Repository { repo })
    }

    /// Create from existing git2::Repository
    pub fn from_git2(repo: Git2Repo) -> Self {
        Git2Repository { repo }
    }

    fn walk(
        &self,
        upper: &str,
        lower: Option<&str>,
    ) -> std::result::Result<Vec<RawCommit>, git2::Error> {
        let mut revwalk = self.repo.revwalk()?;
        revwalk.set_sorting(Sort::TOPOLOGICAL | Sort::TIME)?;
        revwalk.push(Oid::from_str(upper)?)?;

        if let Some(lower) = lower {
            revwalk.hide(Oid::from_str(lower)?)?;
        }

        let mut commits = Vec::new();

        for oid_result in revwalk {
            let oid = oid_result?;
            let commit = self.repo.find_commit(oid)?;

            let author = String::from_utf8_lossy(commit.author().name_bytes()).into_owned();
            let message = String::from_utf8_lossy(commit.message_bytes());
            let (subject, body) = split_message(&message);

            commits.push(
                RawCommit::new(oid.to_string(), author, to_utc(commit.time().seconds()), subject)
                    .with_body(body),
            );
        }

        Ok(commits)
    }
}

/// Creation time of a tag: tagger time when annotated, commit time otherwise
fn tag_timestamp(reference: &git2::Reference<'_>, commit: &git2::Commit<'_>) -> i64 {
    reference
        .peel_to_tag()
        .ok()
        .and_then(|tag| tag.tagger().map(|tagger| tagger.when().seconds()))
        .unwrap_or_else(|| commit.time().seconds())
}

/// First line as the subject, the rest (trimmed) as the body
fn split_message(message: &str) -> (String, String) {
    let (subject, body) = message.split_once('\n').unwrap_or((message, ""));
    (subject.trim_end_matches('\r').to_string(), body.trim().to_string())
}

fn to_utc(seconds: i64) -> DateTime<Utc> {
    Utc.timestamp_opt(seconds, 0).single().unwrap_or_else(Utc::now)
}

impl super::Repository for Git2Repository {
    #[instrument(skip(self))]
    fn list_tags(&self) -> Result<Vec<TagInfo>> {
        let names = self.repo.tag_names(None)?;
        let mut tags = Vec::new();

        for name in names.iter().flatten() {
            let reference = self.repo.find_reference(&format!("refs/tags/{}", name))?;

            // Tags on trees or blobs have no place in a commit history
            let commit = match reference.peel_to_commit() {
                Ok(commit) => commit,
                Err(e) => {
                    debug!(tag = name, error = %e, "skipping tag that does not name a commit");
                    continue;
                }
            };

            let timestamp = to_utc(tag_timestamp(&reference, &commit));
            let commit_timestamp = to_utc(commit.time().seconds());
            tags.push(TagInfo::new(
                name,
                commit.id().to_string(),
                timestamp,
                commit_timestamp,
            ));
        }

        tags.sort_by(|a, b| {
            a.timestamp
                .cmp(&b.timestamp)
                .then_with(|| a.name.cmp(&b.name))
        });

        debug!(count = tags.len(), "listed tags");
        Ok(tags)
    }

    fn resolve_reference(&self, token: &str) -> Result<String> {
        let object = self.repo.revparse_single(token).map_err(|e| match e.code() {
            ErrorCode::NotFound | ErrorCode::Ambiguous | ErrorCode::InvalidSpec => {
                ChangelogError::reference_not_found(token)
            }
            _ => ChangelogError::Git(e),
        })?;

        let commit = object
            .peel_to_commit()
            .map_err(|_| ChangelogError::reference_not_found(token))?;

        Ok(commit.id().to_string())
    }

    fn current_position(&self) -> Result<String> {
        let head = self.repo.head().map_err(|e| match e.code() {
            ErrorCode::UnbornBranch | ErrorCode::NotFound => {
                ChangelogError::reference_not_found("HEAD")
            }
            _ => ChangelogError::Git(e),
        })?;

        let commit = head
            .peel_to_commit()
            .map_err(|_| ChangelogError::reference_not_found("HEAD"))?;

        Ok(commit.id().to_string())
    }

    #[instrument(skip(self))]
    fn commits_between(&self, upper: &str, lower: Option<&str>) -> Result<Vec<RawCommit>> {
        self.walk(upper, lower).map_err(|e| {
            ChangelogError::extraction(format!(
                "cannot walk history from {} to {}: {}",
                upper,
                lower.unwrap_or("root"),
                e
            ))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::git::Repository;
    use git2::{ObjectType, Signature};
    use tempfile::TempDir;

    fn commit_file(repo: &Git2Repo, message: &str, seconds: i64) -> Oid {
        let sig = Signature::new("Test Author", "test@example.com", &git2::Time::new(seconds, 0))
            .unwrap();
        let tree_id = {
            let mut index = repo.index().unwrap();
            index.write_tree().unwrap()
        };
        let tree = repo.find_tree(tree_id).unwrap();
        let parents: Vec<git2::Commit> = repo
            .head()
            .ok()
            .and_then(|h| h.peel_to_commit().ok())
            .into_iter()
            .collect();
        let parent_refs: Vec<&git2::Commit> = parents.iter().collect();
        repo.commit(Some("HEAD"), &sig, &sig, message, &tree, &parent_refs)
            .unwrap()
    }

    #[test]
    fn test_unborn_head_is_reference_not_found() {
        let temp = TempDir::new().unwrap();
        Git2Repo::init(temp.path()).unwrap();
        let repo = Git2Repository::open(temp.path()).unwrap();

        let err = repo.current_position().unwrap_err();
        assert!(matches!(err, ChangelogError::ReferenceNotFound(ref t) if t == "HEAD"));
        assert!(repo.list_tags().unwrap().is_empty());
    }

    #[test]
    fn test_walk_hides_lower_boundary() {
        let temp = TempDir::new().unwrap();
        let raw = Git2Repo::init(temp.path()).unwrap();
        let first = commit_file(&raw, "chore: init", 1_700_000_000);
        let second = commit_file(&raw, "feat: second\n\nbody text\n", 1_700_000_100);
        let repo = Git2Repository::from_git2(raw);

        let commits = repo
            .commits_between(&second.to_string(), Some(first.to_string().as_str()))
            .unwrap();
        assert_eq!(commits.len(), 1);
        assert_eq!(commits[0].subject, "feat: second");
        assert_eq!(commits[0].body, "body text");
        assert_eq!(commits[0].author, "Test Author");
    }

    #[test]
    fn test_non_utf8_message_keeps_subject() {
        let temp = TempDir::new().unwrap();
        let raw = Git2Repo::init(temp.path()).unwrap();
        let tree = raw.index().unwrap().write_tree().unwrap();

        let mut buffer = format!(
            "tree {}\nauthor Ren\u{e9} <r@example.com> 1700000000 +0000\n\
             committer Ren\u{e9} <r@example.com> 1700000000 +0000\n\n",
            tree
        )
        .into_bytes();
        buffer.extend_from_slice(b"fix: caf\xe9 crash\n\nBREAKING CHANGE: cach\xe9 format\n");
        let oid = raw.odb().unwrap().write(ObjectType::Commit, &buffer).unwrap();
        let repo = Git2Repository::from_git2(raw);

        let commits = repo.commits_between(&oid.to_string(), None).unwrap();
        assert_eq!(commits.len(), 1);
        assert_eq!(commits[0].subject, "fix: caf\u{fffd} crash");
        assert_eq!(commits[0].body, "BREAKING CHANGE: cach\u{fffd} format");
        assert_eq!(commits[0].author, "Ren\u{e9}");
    }

    #[test]
    fn test_subject_is_first_line_only() {
        let (subject, body) = split_message("feat: wrapped\r\nsubject line\n\nbody\n");
        assert_eq!(subject, "feat: wrapped");
        assert_eq!(body, "subject line\n\nbody");
    }

    #[test]
    fn test_invalid_upper_is_extraction_failure() {
        let temp = TempDir::new().unwrap();
        let raw = Git2Repo::init(temp.path()).unwrap();
        commit_file(&raw, "chore: init", 1_700_000_000);
        let repo = Git2Repository::from_git2(raw);

        let err = repo.commits_between("not-a-hash", None).unwrap_err();
        assert!(matches!(err, ChangelogError::ExtractionFailed(_)));
    }
}
