//! CLI entrypoint for the universal archive builder.
//!
//! Loads `universal.toml`, runs the `build` lifecycle task (module packaging,
//! then aggregation), and reports the published archive.

use camino::{Utf8Path, Utf8PathBuf};
use clap::Parser;
use std::io::Write;
use std::sync::Arc;
use universal_jar::cli::Cli;
use universal_jar::command::SystemCommandExecutor;
use universal_jar::config::ProjectConfig;
use universal_jar::error::{BuildError, ConfigError};
use universal_jar::lifecycle::{plan, run_build};
use universal_jar::logging;
use universal_jar::output::{BuildSummary, plan_text, write_stderr_line};

fn main() {
    let cli = Cli::parse();
    let mut stderr = std::io::stderr();
    if logging::init(logging::level_filter(cli.verbosity, cli.quiet)).is_err() {
        write_stderr_line(&mut stderr, "warning: logger already installed");
    }
    let mut stdout = std::io::stdout();
    let run_result = run(&cli, &mut stdout, &mut stderr);
    let exit_code = exit_code_for_run_result(run_result, &mut stderr);
    if exit_code != 0 {
        std::process::exit(exit_code);
    }
}

fn run(cli: &Cli, stdout: &mut dyn Write, stderr: &mut dyn Write) -> Result<(), BuildError> {
    let cwd = std::env::current_dir().map_err(|err| ConfigError::InvalidRoot {
        path: ".".to_owned(),
        reason: err.to_string(),
    })?;
    let config = load_config(cli, &cwd)?;

    if cli.dry_run {
        let plan = plan(&config)?;
        if cli.json {
            return write_json(stdout, &plan);
        }
        write_stderr_line(stderr, plan_text(&plan));
        return Ok(());
    }

    let report = run_build(&config, Arc::new(SystemCommandExecutor))?;
    let summary = BuildSummary::from_report(&report).map_err(BuildError::Publish)?;
    if cli.json {
        write_json(stdout, &summary)?;
    } else if !cli.quiet {
        write_stderr_line(stderr, summary.display_text());
    }
    Ok(())
}

fn load_config(cli: &Cli, cwd: &std::path::Path) -> Result<ProjectConfig, ConfigError> {
    let root = resolve_root(cli.root.as_deref(), cwd)?;
    let mut config = ProjectConfig::load(&root, cli.config.as_deref())?;
    if let Some(version) = &cli.set_version {
        config = config.with_version(version)?;
    }
    if let Some(jobs) = cli.jobs {
        config = config.with_jobs(jobs);
    }
    Ok(config)
}

/// Resolve `--root` against the working directory, defaulting to it.
fn resolve_root(root: Option<&Utf8Path>, cwd: &std::path::Path) -> Result<Utf8PathBuf, ConfigError> {
    let cwd = Utf8PathBuf::try_from(cwd.to_path_buf()).map_err(|err| ConfigError::InvalidRoot {
        path: cwd.display().to_string(),
        reason: err.to_string(),
    })?;
    Ok(root.map_or_else(|| cwd.clone(), |root| cwd.join(root)))
}

fn write_json(stdout: &mut dyn Write, value: &impl serde::Serialize) -> Result<(), BuildError> {
    serde_json::to_writer_pretty(&mut *stdout, value).map_err(BuildError::Report)?;
    writeln!(stdout).map_err(|err| BuildError::Report(serde_json::Error::io(err)))
}

fn exit_code_for_run_result(result: Result<(), BuildError>, stderr: &mut dyn Write) -> i32 {
    match result {
        Ok(()) => 0,
        Err(err) => {
            write_stderr_line(stderr, format!("error: {}: {err}", err.stage()));
            let mut source = std::error::Error::source(&err);
            while let Some(cause) = source {
                write_stderr_line(stderr, format!("  caused by: {cause}"));
                source = std::error::Error::source(cause);
            }
            1
        }
    }
}
