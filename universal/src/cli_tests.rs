//! Tests for CLI parsing and default behaviours.

use super::*;
use rstest::rstest;

#[test]
fn cli_parses_defaults() {
    let cli = Cli::parse_from(["universal-jar"]);
    assert_eq!(cli, Cli::default());
}

#[test]
fn cli_parses_overrides() {
    let cli = Cli::parse_from([
        "universal-jar",
        "--root",
        "/work/viabackwards",
        "--config",
        "ci/universal.toml",
        "--set-version",
        "5.0.0",
        "-j",
        "3",
        "--dry-run",
        "--json",
    ]);
    assert_eq!(cli.root, Some(Utf8PathBuf::from("/work/viabackwards")));
    assert_eq!(cli.config, Some(Utf8PathBuf::from("ci/universal.toml")));
    assert_eq!(cli.set_version.as_deref(), Some("5.0.0"));
    assert_eq!(cli.jobs.map(NonZeroUsize::get), Some(3));
    assert!(cli.dry_run);
    assert!(cli.json);
}

#[rstest]
#[case::single(&["universal-jar", "-v"], 1)]
#[case::double(&["universal-jar", "-vv"], 2)]
#[case::long(&["universal-jar", "--verbose", "--verbose"], 2)]
fn cli_counts_verbosity(#[case] args: &[&str], #[case] expected: u8) {
    let cli = Cli::parse_from(args);
    assert_eq!(cli.verbosity, expected);
}

#[rstest]
#[case::zero_jobs(&["universal-jar", "-j", "0"])]
#[case::quiet_and_verbose(&["universal-jar", "-q", "-v"])]
fn cli_rejects_invalid_combinations(#[case] args: &[&str]) {
    assert!(Cli::try_parse_from(args).is_err());
}

#[test]
fn cli_definition_is_consistent() {
    use clap::CommandFactory;

    Cli::command().debug_assert();
}
