use crate::domain::CommitKind;
use crate::error::{ChangelogError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// File name looked up in the operated-on directory
pub const PROJECT_CONFIG_FILE: &str = "changelog.toml";

/// File name looked up in the user configuration directory
pub const USER_CONFIG_FILE: &str = ".changelog.toml";

/// Represents the complete configuration for changelog.
///
/// Contains the commit-type token table, section headings and rendering options.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Default)]
pub struct Config {
    /// Extra or overriding commit-type tokens, e.g. `feature = "feature"`
    #[serde(default)]
    pub types: HashMap<String, CommitKind>,

    #[serde(default)]
    pub sections: SectionsConfig,

    #[serde(default)]
    pub render: RenderConfig,
}

/// Returns the default table of recognized commit-type tokens.
fn default_type_tokens() -> Vec<(&'static str, CommitKind)> {
    vec![
        ("feat", CommitKind::Feature),
        ("feature", CommitKind::Feature),
        ("fix", CommitKind::Fix),
        ("bugfix", CommitKind::Fix),
        ("hotfix", CommitKind::Fix),
        ("docs", CommitKind::Documentation),
        ("doc", CommitKind::Documentation),
        ("refactor", CommitKind::Refactor),
        ("perf", CommitKind::Performance),
        ("test", CommitKind::Test),
        ("tests", CommitKind::Test),
        ("build", CommitKind::Build),
        ("ci", CommitKind::Build),
        ("chore", CommitKind::Chore),
        ("style", CommitKind::Chore),
        ("revert", CommitKind::Revert),
    ]
}

impl Config {
    /// Token table with the configured entries layered over the defaults.
    ///
    /// Keys are lowercased so lookups are case-insensitive.
    pub fn type_table(&self) -> HashMap<String, CommitKind> {
        let mut table: HashMap<String, CommitKind> = default_type_tokens()
            .into_iter()
            .map(|(token, kind)| (token.to_string(), kind))
            .collect();

        for (token, kind) in &self.types {
            table.insert(token.to_lowercase(), *kind);
        }

        table
    }

    /// Reject heading overrides that name no category
    pub fn validate(&self) -> Result<()> {
        for key in self.sections.headings.keys() {
            if !CommitKind::RENDER_ORDER.iter().any(|kind| kind.name() == key.as_str()) {
                return Err(ChangelogError::config(format!(
                    "unknown section '{}' in [sections]",
                    key
                )));
            }
        }
        Ok(())
    }
}

fn default_breaking_heading() -> String {
    "⚠ BREAKING CHANGES".to_string()
}

/// Section headings for the rendered document.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct SectionsConfig {
    #[serde(default = "default_breaking_heading")]
    pub breaking_heading: String,

    /// Heading overrides keyed by category name, e.g. `feature = "New Features"`
    #[serde(flatten)]
    pub headings: HashMap<String, String>,
}

impl SectionsConfig {
    pub fn heading(&self, kind: CommitKind) -> &str {
        self.headings
            .get(kind.name())
            .map(|s| s.as_str())
            .unwrap_or_else(|| kind.default_heading())
    }
}

impl Default for SectionsConfig {
    fn default() -> Self {
        SectionsConfig {
            breaking_heading: default_breaking_heading(),
            headings: HashMap::new(),
        }
    }
}

fn default_unreleased_title() -> String {
    "Unreleased".to_string()
}

fn default_date_format() -> String {
    "%Y-%m-%d".to_string()
}

fn default_true() -> bool {
    true
}

fn default_short_hash_length() -> usize {
    7
}

/// Configuration for how entries and titles are rendered.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct RenderConfig {
    #[serde(default = "default_unreleased_title")]
    pub unreleased_title: String,

    /// chrono strftime pattern for title dates
    #[serde(default = "default_date_format")]
    pub date_format: String,

    #[serde(default = "default_true")]
    pub include_hashes: bool,

    #[serde(default = "default_short_hash_length")]
    pub short_hash_length: usize,

    #[serde(default)]
    pub include_authors: bool,

    /// Base URL used to turn hashes into commit links
    #[serde(default)]
    pub repo_url: Option<String>,
}

impl Default for RenderConfig {
    fn default() -> Self {
        RenderConfig {
            unreleased_title: default_unreleased_title(),
            date_format: default_date_format(),
            include_hashes: true,
            short_hash_length: default_short_hash_length(),
            include_authors: false,
            repo_url: None,
        }
    }
}

/// Loads configuration from file or returns defaults.
///
/// Attempts to load configuration in the following order:
/// 1. Custom path provided as parameter
/// 2. `changelog.toml` in the project directory
/// 3. `.changelog.toml` in the user config directory
/// 4. Default configuration if no file found
///
/// # Arguments
/// * `config_path` - Optional path to custom configuration file
/// * `project_dir` - Directory the changelog is generated for
///
/// # Returns
/// * `Ok(Config)` - Loaded or default configuration
/// * `Err` - If a file exists but cannot be read or parsed
pub fn load_config(config_path: Option<&Path>, project_dir: &Path) -> Result<Config> {
    let path = match config_path {
        Some(path) => Some(path.to_path_buf()),
        None => discover_config(project_dir),
    };

    let Some(path) = path else {
        debug!("no configuration file found, using defaults");
        return Ok(Config::default());
    };

    let config_str = fs::read_to_string(&path).map_err(|e| {
        ChangelogError::config(format!("cannot read {}: {}", path.display(), e))
    })?;

    let config: Config = toml::from_str(&config_str).map_err(|e| {
        ChangelogError::config(format!("cannot parse {}: {}", path.display(), e))
    })?;
    config.validate()?;

    debug!(path = %path.display(), "loaded configuration");
    Ok(config)
}

fn discover_config(project_dir: &Path) -> Option<PathBuf> {
    let project = project_dir.join(PROJECT_CONFIG_FILE);
    if project.exists() {
        return Some(project);
    }

    dirs::config_dir()
        .map(|dir| dir.join(USER_CONFIG_FILE))
        .filter(|path| path.exists())
}
