pub mod cli;
pub mod config;
pub mod conventional;
pub mod domain;
pub mod error;
pub mod extractor;
pub mod generator;
pub mod git;
pub mod range;
pub mod ui;

pub use error::{ChangelogError, Result};
