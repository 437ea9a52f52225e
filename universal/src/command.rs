//! External command execution for module packaging.
//!
//! Module packaging tasks run their configured command through the
//! [`CommandExecutor`] seam so tests can substitute a mock.

use camino::Utf8Path;
use serde::Serialize;
use std::fmt;
use std::io;
use std::process::{Command, Output};

/// Abstraction for running external commands.
#[cfg_attr(test, mockall::automock)]
pub trait CommandExecutor: Send + Sync {
    /// Runs `program` with `args` in `cwd` and returns the captured output.
    ///
    /// # Errors
    ///
    /// Returns any I/O errors encountered while spawning or running the command.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use camino::Utf8Path;
    /// use universal_jar::command::{CommandExecutor, SystemCommandExecutor};
    ///
    /// let executor = SystemCommandExecutor;
    /// let output = executor.run("./gradlew", &["shadowJar".to_owned()], Utf8Path::new("."))?;
    /// assert!(output.status.success());
    /// # Ok::<(), std::io::Error>(())
    /// ```
    fn run(&self, program: &str, args: &[String], cwd: &Utf8Path) -> io::Result<Output>;
}

/// Executes commands on the host system.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemCommandExecutor;

impl CommandExecutor for SystemCommandExecutor {
    fn run(&self, program: &str, args: &[String], cwd: &Utf8Path) -> io::Result<Output> {
        Command::new(program).args(args).current_dir(cwd).output()
    }
}

/// A program and its arguments, as configured for a module.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PackagingCommand {
    program: String,
    args: Vec<String>,
}

impl PackagingCommand {
    /// Split an argv-style list into program and arguments.
    ///
    /// Returns `None` when the list is empty or the program is blank.
    #[must_use]
    pub fn from_argv(argv: Vec<String>) -> Option<Self> {
        let mut parts = argv.into_iter();
        let program = parts.next().filter(|program| !program.trim().is_empty())?;
        Some(Self {
            program,
            args: parts.collect(),
        })
    }

    /// The program to run.
    #[must_use]
    pub fn program(&self) -> &str {
        &self.program
    }

    /// Arguments passed to the program.
    #[must_use]
    pub fn args(&self) -> &[String] {
        &self.args
    }
}

impl fmt::Display for PackagingCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.program)?;
        for arg in &self.args {
            write!(f, " {arg}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn argv(parts: &[&str]) -> Vec<String> {
        parts.iter().map(|part| (*part).to_owned()).collect()
    }

    #[test]
    fn splits_program_from_arguments() {
        let command = PackagingCommand::from_argv(argv(&["./gradlew", ":bukkit:shadowJar"]))
            .expect("valid command");
        assert_eq!(command.program(), "./gradlew");
        assert_eq!(command.args(), [":bukkit:shadowJar"]);
        assert_eq!(command.to_string(), "./gradlew :bukkit:shadowJar");
    }

    #[rstest]
    #[case::empty(&[])]
    #[case::blank_program(&["  ", "build"])]
    fn rejects_missing_program(#[case] parts: &[&str]) {
        assert!(PackagingCommand::from_argv(argv(parts)).is_none());
    }

    #[cfg(unix)]
    #[test]
    fn system_executor_runs_in_working_directory() {
        let dir = tempfile::tempdir().expect("temp dir");
        let cwd = Utf8Path::from_path(dir.path()).expect("utf-8 temp dir");

        let output = SystemCommandExecutor
            .run("pwd", &[], cwd)
            .expect("pwd runs");

        assert!(output.status.success());
        let printed = String::from_utf8_lossy(&output.stdout);
        let expected = cwd.canonicalize_utf8().expect("canonical temp dir");
        assert_eq!(printed.trim(), expected.as_str());
    }
}
