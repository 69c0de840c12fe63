//! Pure formatting functions for terminal output.
//!
//! Everything here writes to standard error; standard output carries only
//! the generated document.

use console::style;

/// Format and print an error message in red.
pub fn display_error(message: &str) {
    eprintln!("{} {}", style("ERROR:").red().bold(), message);
}

/// Format and print a warning message in yellow.
pub fn display_warning(message: &str) {
    eprintln!("{} {}", style("⚠ WARNING:").yellow(), message);
}

/// Render an error and its causes, outermost first.
///
/// ```text
/// resolving range expression 'v9.9.9'
///   caused by: Reference not found: v9.9.9
/// ```
pub fn format_error_chain(error: &anyhow::Error) -> String {
    let mut message = error.to_string();
    for cause in error.chain().skip(1) {
        message.push_str("\n  caused by: ");
        message.push_str(&cause.to_string());
    }
    message
}

/// Version line printed by `--version`.
pub fn format_version(version: &str, commit: &str, date: &str) -> String {
    format!("changelog {} {} {}", version, commit, date)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ChangelogError;
    use anyhow::Context;

    #[test]
    fn test_format_error_chain() {
        let result: anyhow::Result<()> = Err(ChangelogError::reference_not_found("v9.9.9"))
            .context("resolving range expression 'v9.9.9'");
        let message = format_error_chain(&result.unwrap_err());

        assert_eq!(
            message,
            "resolving range expression 'v9.9.9'\n  caused by: Reference not found: v9.9.9"
        );
    }

    #[test]
    fn test_format_version() {
        assert_eq!(
            format_version("0.1.0", "none", "unknown"),
            "changelog 0.1.0 none unknown"
        );
    }

    #[test]
    fn test_display_error() {
        // Visual verification test - output is printed to stderr
        display_error("test error");
    }
}
