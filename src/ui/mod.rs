//! User interface module - styled diagnostics for the terminal.

pub mod formatter;

// Re-export formatter functions for convenience
pub use formatter::{display_error, display_warning, format_error_chain, format_version};
