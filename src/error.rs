use thiserror::Error;

/// Unified error type for changelog generation
#[derive(Error, Debug)]
pub enum ChangelogError {
    #[error("Invalid range expression '{expression}': {reason}")]
    InvalidExpression { expression: String, reason: String },

    #[error("Reference not found: {0}")]
    ReferenceNotFound(String),

    #[error("Commit extraction failed: {0}")]
    ExtractionFailed(String),

    #[error("Rendering failed: {0}")]
    RenderFailed(String),

    #[error("Git operation failed: {0}")]
    Git(#[from] git2::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience type alias for Results in changelog
pub type Result<T> = std::result::Result<T, ChangelogError>;

impl ChangelogError {
    /// Create an invalid expression error for the offending input
    pub fn invalid_expression(expression: impl Into<String>, reason: impl Into<String>) -> Self {
        ChangelogError::InvalidExpression {
            expression: expression.into(),
            reason: reason.into(),
        }
    }

    /// Create a reference lookup error naming the token
    pub fn reference_not_found(token: impl Into<String>) -> Self {
        ChangelogError::ReferenceNotFound(token.into())
    }

    /// Create an extraction error with context
    pub fn extraction(msg: impl Into<String>) -> Self {
        ChangelogError::ExtractionFailed(msg.into())
    }

    /// Create a rendering error with context
    pub fn render(msg: impl Into<String>) -> Self {
        ChangelogError::RenderFailed(msg.into())
    }

    /// Create a configuration error with context
    pub fn config(msg: impl Into<String>) -> Self {
        ChangelogError::Config(msg.into())
    }

    /// Pipeline stage the error originates from.
    pub fn stage(&self) -> &'static str {
        match self {
            ChangelogError::InvalidExpression { .. } | ChangelogError::ReferenceNotFound(_) => {
                "resolve"
            }
            ChangelogError::ExtractionFailed(_) => "extract",
            ChangelogError::RenderFailed(_) => "render",
            ChangelogError::Git(_) | ChangelogError::Config(_) | ChangelogError::Io(_) => "setup",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ChangelogError::config("test config issue");
        assert_eq!(err.to_string(), "Configuration error: test config issue");
    }

    #[test]
    fn test_invalid_expression_names_input() {
        let err = ChangelogError::invalid_expression("~~~", "more than one '~' separator");
        let msg = err.to_string();
        assert!(msg.contains("'~~~'"));
        assert!(msg.contains("more than one"));
    }

    #[test]
    fn test_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: ChangelogError = io_err.into();
        assert!(err.to_string().contains("I/O error"));
    }

    #[test]
    fn test_error_stages() {
        assert_eq!(ChangelogError::reference_not_found("v9").stage(), "resolve");
        assert_eq!(ChangelogError::invalid_expression("a~b~c", "x").stage(), "resolve");
        assert_eq!(ChangelogError::extraction("broken").stage(), "extract");
        assert_eq!(ChangelogError::render("fmt").stage(), "render");
        assert_eq!(ChangelogError::config("bad").stage(), "setup");
    }

    #[test]
    fn test_error_messages_are_descriptive() {
        let error_pairs = vec![
            (ChangelogError::reference_not_found("x"), "Reference not found"),
            (ChangelogError::extraction("x"), "Commit extraction failed"),
            (ChangelogError::render("x"), "Rendering failed"),
            (ChangelogError::config("x"), "Configuration error"),
        ];

        for (err, expected_prefix) in error_pairs {
            let msg = err.to_string();
            assert!(
                msg.starts_with(expected_prefix),
                "Error message should start with '{}', but got '{}'",
                expected_prefix,
                msg
            );
        }
    }
}
