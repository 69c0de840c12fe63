//! Commit classification following the conventional commits format
//!
//! Subjects of the form `type(scope): description` are filed under the
//! category their type token maps to. A `!` before or after the scope, or a
//! `BREAKING CHANGE:` footer in the body, marks the commit as breaking.
//! Anything else falls back to [CommitKind::Other] with the subject untouched.

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;
use tracing::{debug, instrument};

use crate::config::Config;
use crate::domain::{ClassifiedEntry, CommitKind, RawCommit};

static SUBJECT_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(?P<type>[A-Za-z][A-Za-z0-9_-]*)(?P<bang_before>!)?(?:\((?P<scope>[^()]*)\))?(?P<bang_after>!)?:[ \t]*(?P<description>.*)$",
    )
    .expect("Invalid regex")
});

static BREAKING_FOOTER_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^BREAKING[ -]CHANGE:[ \t]*(?P<text>.*)$").expect("Invalid regex")
});

/// Structured form of a conventional subject line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedSubject {
    pub r#type: String,
    pub scope: Option<String>,
    pub description: String,
    pub breaking_marker: bool,
}

/// Parse a subject line; `None` if it does not follow the conventional format
///
/// Supports formats:
/// - type(scope)!: description
/// - type!(scope): description
/// - type(scope): description
/// - type!: description
/// - type: description
pub fn parse_subject(subject: &str) -> Option<ParsedSubject> {
    let captures = SUBJECT_REGEX.captures(subject)?;

    let description = captures.name("description")?.as_str().trim();
    if description.is_empty() {
        return None;
    }

    let scope = captures
        .name("scope")
        .map(|m| m.as_str().trim())
        .filter(|s| !s.is_empty())
        .map(String::from);

    Some(ParsedSubject {
        r#type: captures.name("type")?.as_str().to_string(),
        scope,
        description: description.to_string(),
        breaking_marker: captures.name("bang_before").is_some()
            || captures.name("bang_after").is_some(),
    })
}

/// Text of the first `BREAKING CHANGE:` footer in a commit body
///
/// Indented lines directly after the footer continue its text.
pub fn breaking_footer(body: &str) -> Option<String> {
    let mut lines = body.lines();

    while let Some(line) = lines.next() {
        let Some(captures) = BREAKING_FOOTER_REGEX.captures(line) else {
            continue;
        };

        let mut text = captures
            .name("text")
            .map(|m| m.as_str().trim().to_string())
            .unwrap_or_default();

        for continuation in lines.by_ref() {
            if continuation.trim().is_empty() || !continuation.starts_with([' ', '\t']) {
                break;
            }
            if !text.is_empty() {
                text.push(' ');
            }
            text.push_str(continuation.trim());
        }

        return Some(text);
    }

    None
}

/// Maps raw commits to changelog entries using a commit-type token table
#[derive(Debug, Clone)]
pub struct Classifier {
    types: HashMap<String, CommitKind>,
}

impl Classifier {
    pub fn new(config: &Config) -> Self {
        Classifier {
            types: config.type_table(),
        }
    }

    /// Category for a type token; unknown tokens are [CommitKind::Other]
    pub fn kind_for(&self, token: &str) -> CommitKind {
        self.types
            .get(&token.to_lowercase())
            .copied()
            .unwrap_or(CommitKind::Other)
    }

    /// Classify one commit. Never fails: unparseable subjects become `Other`.
    pub fn classify_commit(&self, commit: &RawCommit) -> ClassifiedEntry {
        let parsed = parse_subject(&commit.subject);
        let footer = breaking_footer(&commit.body);

        let (kind, scope, subject, marker) = match parsed {
            Some(p) => (self.kind_for(&p.r#type), p.scope, p.description, p.breaking_marker),
            None => (CommitKind::Other, None, commit.subject.clone(), false),
        };

        let breaking_description = match footer {
            Some(text) if !text.is_empty() => Some(text),
            Some(_) => Some(subject.clone()),
            None if marker => Some(subject.clone()),
            None => None,
        };

        ClassifiedEntry {
            kind,
            scope,
            subject,
            breaking_description,
            hash: commit.hash.clone(),
            author: commit.author.clone(),
            timestamp: commit.timestamp,
        }
    }

    /// Classify commits, preserving their order
    #[instrument(skip_all, fields(count = commits.len()))]
    pub fn classify(&self, commits: &[RawCommit]) -> Vec<ClassifiedEntry> {
        let entries: Vec<ClassifiedEntry> =
            commits.iter().map(|c| self.classify_commit(c)).collect();

        debug!(
            breaking = entries.iter().filter(|e| e.is_breaking()).count(),
            "classified commits"
        );
        entries
    }
}

impl Default for Classifier {
    fn default() -> Self {
        Self::new(&Config::default())
    }
}

/// Classify commits with the default token table
pub fn classify(commits: &[RawCommit]) -> Vec<ClassifiedEntry> {
    Classifier::default().classify(commits)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn raw(subject: &str, body: &str) -> RawCommit {
        RawCommit::new("abc1234567890", "Test Author", Utc::now(), subject).with_body(body)
    }

    fn classify_one(subject: &str, body: &str) -> ClassifiedEntry {
        Classifier::default().classify_commit(&raw(subject, body))
    }

    #[test]
    fn test_parse_with_scope() {
        let entry = classify_one("feat(auth): add token refresh", "");
        assert_eq!(entry.kind, CommitKind::Feature);
        assert_eq!(entry.scope, Some("auth".to_string()));
        assert_eq!(entry.subject, "add token refresh");
        assert!(!entry.is_breaking());
    }

    #[test]
    fn test_breaking_marker_without_footer() {
        let entry = classify_one("fix!: drop legacy endpoint", "");
        assert_eq!(entry.kind, CommitKind::Fix);
        assert_eq!(entry.scope, None);
        assert_eq!(
            entry.breaking_description.as_deref(),
            Some("drop legacy endpoint")
        );
    }

    #[test]
    fn test_breaking_marker_on_either_side_of_scope() {
        let before = parse_subject("feat!(api): remove v1").unwrap();
        let after = parse_subject("feat(api)!: remove v1").unwrap();
        assert!(before.breaking_marker);
        assert!(after.breaking_marker);
        assert_eq!(before.scope, after.scope);
    }

    #[test]
    fn test_breaking_footer_wins_regardless_of_kind() {
        let entry = classify_one("docs: rename keys", "Some context.\n\nBREAKING CHANGE: config key renamed");
        assert_eq!(entry.kind, CommitKind::Documentation);
        assert_eq!(
            entry.breaking_description.as_deref(),
            Some("config key renamed")
        );

        let other = classify_one("Rework settings", "BREAKING CHANGE: config key renamed");
        assert_eq!(other.kind, CommitKind::Other);
        assert_eq!(
            other.breaking_description.as_deref(),
            Some("config key renamed")
        );
    }

    #[test]
    fn test_breaking_footer_continuation_lines() {
        let footer = breaking_footer("BREAKING CHANGE: the `port` option\n  is now `listen`\nRefs: #12");
        assert_eq!(footer.as_deref(), Some("the `port` option is now `listen`"));
    }

    #[test]
    fn test_breaking_footer_is_case_sensitive_and_anchored() {
        assert_eq!(breaking_footer("breaking change: nope"), None);
        assert_eq!(breaking_footer("  BREAKING CHANGE: indented"), None);
        assert_eq!(breaking_footer("BREAKING CHANGE without colon"), None);
        assert_eq!(
            breaking_footer("BREAKING-CHANGE: hyphenated").as_deref(),
            Some("hyphenated")
        );
    }

    #[test]
    fn test_empty_footer_falls_back_to_subject() {
        let entry = classify_one("refactor(core): split modules", "BREAKING CHANGE:");
        assert_eq!(entry.breaking_description.as_deref(), Some("split modules"));
    }

    #[test]
    fn test_non_conventional_subject_is_kept_verbatim() {
        let entry = classify_one("Merge branch 'main' into dev", "");
        assert_eq!(entry.kind, CommitKind::Other);
        assert_eq!(entry.subject, "Merge branch 'main' into dev");
        assert_eq!(entry.scope, None);
        assert!(!entry.is_breaking());
    }

    #[test]
    fn test_unknown_type_maps_to_other() {
        let entry = classify_one("wip(ui): sketch layout", "");
        assert_eq!(entry.kind, CommitKind::Other);
        assert_eq!(entry.scope, Some("ui".to_string()));
        assert_eq!(entry.subject, "sketch layout");
    }

    #[test]
    fn test_type_tokens_are_case_insensitive() {
        assert_eq!(classify_one("Feat: shout", "").kind, CommitKind::Feature);
        assert_eq!(classify_one("PERF: faster", "").kind, CommitKind::Performance);
    }

    #[test]
    fn test_description_is_trimmed_and_required() {
        assert_eq!(classify_one("fix:   spaced out  ", "").subject, "spaced out");
        let empty = classify_one("fix: ", "");
        assert_eq!(empty.kind, CommitKind::Other);
        assert_eq!(empty.subject, "fix: ");
    }

    #[test]
    fn test_empty_scope_is_absent() {
        let entry = classify_one("chore(): tidy", "");
        assert_eq!(entry.kind, CommitKind::Chore);
        assert_eq!(entry.scope, None);
    }

    #[test]
    fn test_configured_tokens() {
        let config: Config = toml::from_str("[types]\nwip = \"chore\"").unwrap();
        let classifier = Classifier::new(&config);
        assert_eq!(classifier.kind_for("wip"), CommitKind::Chore);
        assert_eq!(classifier.kind_for("feat"), CommitKind::Feature);
    }

    #[test]
    fn test_classification_is_pure() {
        let commits = vec![
            raw("feat(auth): add token refresh", ""),
            raw("fix!: drop legacy endpoint", ""),
            raw("random text", ""),
        ];
        let first = classify(&commits);
        let second = classify(&commits);
        assert_eq!(first, second);
        assert_eq!(first.len(), 3);
        assert_eq!(first[2].subject, "random text");
    }
}
