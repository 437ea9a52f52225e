//! CLI argument definitions for the `universal-jar` binary.
//!
//! This module defines the command-line interface using clap. It is separated
//! from the main entrypoint to keep the binary small and focused on
//! orchestration.

use camino::Utf8PathBuf;
use clap::Parser;
use std::num::NonZeroUsize;

/// Build every module and publish the universal archive.
#[derive(Parser, Debug, Clone, PartialEq, Eq)]
#[command(name = "universal-jar")]
#[command(version, about)]
#[command(long_about = concat!(
    "Build every module and publish the universal archive.\n\n",
    "Each module listed in universal.toml produces one packaged archive. Once ",
    "all of them are available, their entries are merged in the configured ",
    "module order into a single archive. When two modules ship the same path, ",
    "the module listed first wins and later copies are skipped.\n\n",
    "The result is written to build/libs/<product>-<version>.jar under the ",
    "project root unless the configuration says otherwise.",
))]
#[command(after_help = concat!(
    "EXAMPLES:\n",
    "  Build the project in the current directory:\n",
    "    $ universal-jar\n\n",
    "  Build a release with an explicit version:\n",
    "    $ universal-jar --set-version 5.0.0\n\n",
    "  Show the task plan without building:\n",
    "    $ universal-jar --dry-run\n\n",
    "  Limit concurrent module builds:\n",
    "    $ universal-jar -j 2",
))]
pub struct Cli {
    /// Project root containing universal.toml [default: current directory].
    #[arg(short, long, value_name = "DIR")]
    pub root: Option<Utf8PathBuf>,

    /// Configuration file, relative to the project root [default: universal.toml].
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<Utf8PathBuf>,

    /// Override the version embedded in the archive name.
    #[arg(long = "set-version", value_name = "VERSION")]
    pub set_version: Option<String>,

    /// Maximum number of tasks run concurrently.
    #[arg(short, long, value_name = "N")]
    pub jobs: Option<NonZeroUsize>,

    /// Show the resolved plan and exit without building.
    #[arg(long)]
    pub dry_run: bool,

    /// Print the build report or plan as JSON on stdout.
    #[arg(long)]
    pub json: bool,

    /// Increase log verbosity (repeatable: -v, -vv).
    #[arg(
        short,
        long = "verbose",
        alias = "verbosity",
        action = clap::ArgAction::Count,
        conflicts_with = "quiet"
    )]
    pub verbosity: u8,

    /// Suppress progress output (errors still shown).
    #[arg(short, long, conflicts_with = "verbosity")]
    pub quiet: bool,
}

impl Default for Cli {
    /// Creates a `Cli` with no overrides and all flags disabled.
    ///
    /// # Examples
    ///
    /// ```
    /// use universal_jar::cli::Cli;
    ///
    /// let cli = Cli::default();
    /// assert!(cli.root.is_none());
    /// assert!(!cli.dry_run);
    /// ```
    fn default() -> Self {
        Self {
            root: None,
            config: None,
            set_version: None,
            jobs: None,
            dry_run: false,
            json: false,
            verbosity: 0,
            quiet: false,
        }
    }
}

#[cfg(test)]
#[path = "cli_tests.rs"]
mod tests;
