//! Main workflow orchestration logic
//!
//! Drives the four pipeline stages in order: resolve the range expression,
//! extract the commits, classify them and render the document. Every stage
//! failure is wrapped with the stage and the input it was working on.

use std::path::PathBuf;

use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::config::{self, Config};
use crate::conventional::Classifier;
use crate::domain::Range;
use crate::extractor;
use crate::generator::Generator;
use crate::git::{Git2Repository, Repository};
use crate::range;

/// Arguments for the changelog workflow
///
/// Mirrors the CLI Args but in a format suitable for orchestration logic,
/// so the workflow can be called programmatically without depending on clap.
#[derive(Debug, Clone, PartialEq)]
pub struct ChangelogWorkflowArgs {
    /// Version or range expression; empty means "since the latest tag"
    pub expression: String,

    /// Directory inside the repository to operate on
    pub dir: PathBuf,

    /// Path to custom config file
    pub config_path: Option<PathBuf>,

    /// Template directory; accepted but not supported yet
    pub template_dir: Option<PathBuf>,
}

/// Result of a successful changelog workflow
#[derive(Debug, Clone, PartialEq)]
pub struct WorkflowResult {
    /// The range the document covers
    pub range: Range,

    /// Number of commits in the range
    pub commit_count: usize,

    /// The rendered document
    pub output: Vec<u8>,
}

/// Open the repository at `args.dir`, load configuration and run the pipeline
pub fn run_changelog_workflow(args: &ChangelogWorkflowArgs) -> Result<WorkflowResult> {
    if let Some(template_dir) = &args.template_dir {
        warn!(
            path = %template_dir.display(),
            "template directories are not supported yet, using the built-in format"
        );
    }

    let repo = Git2Repository::open(&args.dir)
        .with_context(|| format!("opening git repository at {}", args.dir.display()))?;

    let config = config::load_config(args.config_path.as_deref(), &args.dir)
        .context("loading configuration")?;

    generate(&args.expression, &repo, &config)
}

/// Run resolve, extract, classify and render against any repository
pub fn generate<R: Repository + ?Sized>(
    expression: &str,
    repo: &R,
    config: &Config,
) -> Result<WorkflowResult> {
    let range = range::resolve(expression, repo)
        .with_context(|| format!("resolving range expression '{}'", expression))?;

    let commits = extractor::extract(&range, repo)
        .with_context(|| format!("extracting commits for {}", range))?;

    let entries = Classifier::new(config).classify(&commits);

    let output = Generator::new(config)
        .render(&entries, &range, repo)
        .with_context(|| format!("rendering changelog for {}", range))?;

    info!(%range, commits = commits.len(), "generated changelog");

    Ok(WorkflowResult {
        range,
        commit_count: commits.len(),
        output,
    })
}
