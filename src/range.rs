//! Range resolution - turns a version/range expression into concrete boundaries
//!
//! Accepted forms:
//! - `""` - from `HEAD` back to the most recent tag
//! - `v1.2.0` - the release named by a tag, back to the tag before it
//! - `<upper>~<lower>` - an explicit span; an empty `upper` means `HEAD` and an
//!   empty `lower` means the beginning of history

use tracing::{debug, instrument};

use crate::domain::range::CURRENT_POSITION;
use crate::domain::{Boundary, Range, Reference};
use crate::error::{ChangelogError, Result};
use crate::git::{Repository, TagInfo};

/// Character separating the upper and lower side of a span
pub const SEPARATOR: char = '~';

/// Syntactic shape of a range expression, before any repository lookup
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RangeExpression {
    /// Unreleased changes since the most recent tag
    Latest,
    /// A single release named by its tag
    Release(String),
    /// An explicit span; `None` marks an empty side
    Span {
        upper: Option<String>,
        lower: Option<String>,
    },
}

/// Parse an expression without consulting the repository
pub fn parse_expression(expression: &str) -> Result<RangeExpression> {
    let trimmed = expression.trim();

    if trimmed.is_empty() {
        return Ok(RangeExpression::Latest);
    }

    match trimmed.matches(SEPARATOR).count() {
        0 => {
            validate_token(expression, trimmed)?;
            if trimmed == CURRENT_POSITION {
                Ok(RangeExpression::Latest)
            } else {
                Ok(RangeExpression::Release(trimmed.to_string()))
            }
        }
        1 => {
            let (left, right) = trimmed
                .split_once(SEPARATOR)
                .ok_or_else(|| ChangelogError::invalid_expression(expression, "missing '~'"))?;

            Ok(RangeExpression::Span {
                upper: side(expression, left)?,
                lower: side(expression, right)?,
            })
        }
        n => Err(ChangelogError::invalid_expression(
            expression,
            format!("expected at most one '{}' separator, found {}", SEPARATOR, n),
        )),
    }
}

fn side(expression: &str, token: &str) -> Result<Option<String>> {
    if token.is_empty() {
        return Ok(None);
    }
    validate_token(expression, token)?;
    Ok(Some(token.to_string()))
}

fn validate_token(expression: &str, token: &str) -> Result<()> {
    if token.chars().any(|c| c.is_whitespace() || c.is_control()) {
        return Err(ChangelogError::invalid_expression(
            expression,
            format!("'{}' is not a valid reference name", token),
        ));
    }
    Ok(())
}

/// Resolve an expression into a concrete range against the repository
///
/// # Errors
/// * `InvalidExpression` - if the syntax is not recognized
/// * `ReferenceNotFound` - if a named tag, branch or hash does not exist
#[instrument(skip(repo))]
pub fn resolve<R: Repository + ?Sized>(expression: &str, repo: &R) -> Result<Range> {
    let parsed = parse_expression(expression)?;
    let tags = repo.list_tags()?;

    let range = match parsed {
        RangeExpression::Latest => {
            let lower = tags
                .last()
                .map(|tag| Boundary::At(tag_reference(tag)))
                .unwrap_or(Boundary::Root);
            Range::new(current_position(repo)?, lower)
        }
        RangeExpression::Release(name) => {
            let index = tags
                .iter()
                .position(|tag| tag.name == name)
                .ok_or_else(|| ChangelogError::reference_not_found(name.as_str()))?;

            let lower = index
                .checked_sub(1)
                .map(|previous| Boundary::At(tag_reference(&tags[previous])))
                .unwrap_or(Boundary::Root);
            Range::new(tag_reference(&tags[index]), lower)
        }
        RangeExpression::Span { upper, lower } => {
            let upper = match upper {
                Some(token) => resolve_token(&token, &tags, repo)?,
                None => current_position(repo)?,
            };
            let lower = match lower {
                Some(token) => Boundary::At(resolve_token(&token, &tags, repo)?),
                None => Boundary::Root,
            };
            Range::new(upper, lower)
        }
    };

    debug!(%range, "resolved range");
    Ok(range)
}

/// Resolve one token: the `HEAD` marker, then an exact tag, then a branch or hash
fn resolve_token<R: Repository + ?Sized>(
    token: &str,
    tags: &[TagInfo],
    repo: &R,
) -> Result<Reference> {
    if token == CURRENT_POSITION {
        return current_position(repo);
    }

    if let Some(tag) = tags.iter().find(|tag| tag.name == token) {
        return Ok(tag_reference(tag));
    }

    let hash = repo.resolve_reference(token)?;
    Ok(Reference::Commit {
        token: token.to_string(),
        hash,
    })
}

fn current_position<R: Repository + ?Sized>(repo: &R) -> Result<Reference> {
    Ok(Reference::CurrentPosition {
        hash: repo.current_position()?,
    })
}

fn tag_reference(tag: &TagInfo) -> Reference {
    Reference::Tag {
        name: tag.name.clone(),
        hash: tag.commit_hash.clone(),
    }
}
