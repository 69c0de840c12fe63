// tests/config_test.rs
use changelog::config::{load_config, Config, PROJECT_CONFIG_FILE};
use changelog::domain::CommitKind;
use changelog::ChangelogError;
use std::fs;
use std::io::Write;
use tempfile::{NamedTempFile, TempDir};

#[test]
fn test_load_default_config() {
    let config = Config::default();
    assert!(config.types.is_empty());
    assert_eq!(config.render.unreleased_title, "Unreleased");
    assert_eq!(config.sections.heading(CommitKind::Feature), "Features");
}

#[test]
fn test_load_from_explicit_file() {
    let mut temp_file = NamedTempFile::new().unwrap();
    let toml_content = r#"
[types]
security = "fix"

[render]
unreleased_title = "Next"
short_hash_length = 10
"#;
    temp_file.write_all(toml_content.as_bytes()).unwrap();
    temp_file.flush().unwrap();

    let project = TempDir::new().unwrap();
    let config = load_config(Some(temp_file.path()), project.path()).unwrap();
    assert_eq!(config.types.get("security"), Some(&CommitKind::Fix));
    assert_eq!(config.render.unreleased_title, "Next");
    assert_eq!(config.render.short_hash_length, 10);
    assert!(config.render.include_hashes);
}

#[test]
fn test_load_from_project_directory() {
    let project = TempDir::new().unwrap();
    fs::write(
        project.path().join(PROJECT_CONFIG_FILE),
        "[render]\ninclude_authors = true\n",
    )
    .unwrap();

    let config = load_config(None, project.path()).unwrap();
    assert!(config.render.include_authors);
}

#[test]
fn test_invalid_file_is_config_error() {
    let mut temp_file = NamedTempFile::new().unwrap();
    temp_file.write_all(b"[types]\nfeat = \"not-a-kind\"\n").unwrap();
    temp_file.flush().unwrap();

    let project = TempDir::new().unwrap();
    let err = load_config(Some(temp_file.path()), project.path()).unwrap_err();
    assert!(matches!(err, ChangelogError::Config(_)));
}

#[test]
fn test_section_headings_from_file() {
    let project = TempDir::new().unwrap();
    fs::write(
        project.path().join(PROJECT_CONFIG_FILE),
        "[sections]\nfeature = \"New Features\"\nbreaking_heading = \"Breaking\"\n",
    )
    .unwrap();

    let config = load_config(None, project.path()).unwrap();
    assert_eq!(config.sections.heading(CommitKind::Feature), "New Features");
    assert_eq!(config.sections.breaking_heading, "Breaking");
    assert!(!config.sections.headings.contains_key("breaking_heading"));
}

#[test]
fn test_unknown_section_in_file_is_config_error() {
    let project = TempDir::new().unwrap();
    fs::write(
        project.path().join(PROJECT_CONFIG_FILE),
        "[sections]\nfeat = \"New Features\"\n",
    )
    .unwrap();

    let err = load_config(None, project.path()).unwrap_err();
    assert!(matches!(err, ChangelogError::Config(_)));
}

#[test]
fn test_missing_explicit_file_is_config_error() {
    let project = TempDir::new().unwrap();
    let missing = project.path().join("nope.toml");

    let err = load_config(Some(&missing), project.path()).unwrap_err();
    assert!(err.to_string().contains("nope.toml"));
}
