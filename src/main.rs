use std::io::{self, Write};
use std::path::PathBuf;
use std::process;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use changelog::cli::orchestration::{self, ChangelogWorkflowArgs};
use changelog::ui;

/// Exit code for any failure propagated out of the pipeline
const EXIT_FAILURE: i32 = 255;

const BUILD_COMMIT: &str = match option_env!("CHANGELOG_BUILD_COMMIT") {
    Some(commit) => commit,
    None => "none",
};

const BUILD_DATE: &str = match option_env!("CHANGELOG_BUILD_DATE") {
    Some(date) => date,
    None => "unknown",
};

const EXAMPLES: &str = "\
EXAMPLES:
  # generate changelog from HEAD to <latest version>
  $ changelog

  # generate changelog of the specified version
  $ changelog v1.2.0

  # generate changelog within the specified range
  $ changelog v1.3.0~v1.2.0

  # generate changelog from HEAD to specified version
  $ changelog HEAD~v1.3.0

  # generate all changelog
  $ changelog HEAD~

  # generate changelog from two commit hashes
  $ changelog 770ed02~585445d

  # generate changelog for the specified project
  $ changelog --dir=/path/to/project v1.0.0";

#[derive(clap::Parser)]
#[command(
    name = "changelog",
    about = "Generate a changelog from the git history of a project",
    after_help = EXAMPLES
)]
struct Args {
    #[arg(
        value_name = "VERSION",
        help = "Version or version range: empty, a tag (v1.2.0) or <upper>~<lower>"
    )]
    range: Option<String>,

    #[arg(long, value_name = "DIR", help = "Directory of the project, defaults to $PWD")]
    dir: Option<PathBuf>,

    #[arg(long, value_name = "DIR", help = "Template directory (not supported yet)")]
    tpl: Option<PathBuf>,

    #[arg(short, long, value_name = "FILE", help = "Custom configuration file path")]
    config: Option<PathBuf>,

    #[arg(long, help = "Log pipeline details to stderr")]
    verbose: bool,

    #[arg(short = 'V', long, help = "Print version information")]
    version: bool,
}

fn main() {
    let args = Args::parse();

    if args.version {
        println!(
            "{}",
            ui::format_version(env!("CARGO_PKG_VERSION"), BUILD_COMMIT, BUILD_DATE)
        );
        return;
    }

    init_tracing(args.verbose);

    if let Err(err) = run(args) {
        ui::display_error(&ui::format_error_chain(&err));
        process::exit(EXIT_FAILURE);
    }
}

fn run(args: Args) -> Result<()> {
    let dir = match args.dir {
        Some(dir) => dir,
        None => std::env::current_dir().context("determining the current directory")?,
    };

    let result = orchestration::run_changelog_workflow(&ChangelogWorkflowArgs {
        expression: args.range.unwrap_or_default(),
        dir,
        config_path: args.config,
        template_dir: args.tpl,
    })?;

    if result.commit_count == 0 {
        ui::display_warning(&format!("No commits in range {}", result.range));
    }

    let mut stdout = io::stdout().lock();
    stdout
        .write_all(&result.output)
        .context("writing changelog to standard output")?;
    stdout.flush()?;

    Ok(())
}

/// Console logging to stderr, controlled by RUST_LOG (default: warn)
fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}
