//! Output formatting for the `universal-jar` CLI.
//!
//! Human-readable progress and summaries go to stderr; `--json` reports go
//! to stdout so they can be piped.

use crate::archive::publish_error::PublishError;
use crate::archive::sha256_digest::Sha256Digest;
use crate::graph::TaskId;
use crate::lifecycle::{BuildPlan, BuildReport};
use camino::{Utf8Path, Utf8PathBuf};
use serde::Serialize;
use std::fmt;
use std::io::Write;

/// Write `message` followed by a newline, ignoring write failures.
pub fn write_stderr_line(stderr: &mut dyn Write, message: impl fmt::Display) {
    if writeln!(stderr, "{message}").is_err() {
        // Best-effort reporting; ignore write failures.
    }
}

/// A published archive and its digest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArtifactSummary {
    path: Utf8PathBuf,
    sha256: Sha256Digest,
}

impl ArtifactSummary {
    /// Digest the archive at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`PublishError::Digest`] if the archive cannot be read.
    pub fn for_path(path: &Utf8Path) -> Result<Self, PublishError> {
        let sha256 = Sha256Digest::of_file(path).map_err(|source| PublishError::Digest {
            path: path.to_owned(),
            source,
        })?;
        Ok(Self {
            path: path.to_owned(),
            sha256,
        })
    }
}

/// Summary of a finished build, as printed by the CLI.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BuildSummary {
    tasks: Vec<TaskId>,
    archives: Vec<ArtifactSummary>,
}

impl BuildSummary {
    /// Summarise `report`, digesting each published archive.
    ///
    /// # Errors
    ///
    /// Returns [`PublishError::Digest`] if a published archive cannot be read.
    pub fn from_report(report: &BuildReport) -> Result<Self, PublishError> {
        let archives = report
            .archives()
            .iter()
            .map(|path| ArtifactSummary::for_path(path))
            .collect::<Result<_, _>>()?;
        Ok(Self {
            tasks: report.order().to_vec(),
            archives,
        })
    }

    /// Multi-line text for stderr.
    #[must_use]
    pub fn display_text(&self) -> String {
        let mut lines = vec![format!("Build succeeded ({} tasks)", self.tasks.len())];
        for archive in &self.archives {
            lines.push(format!("  {}", archive.path));
            lines.push(format!("    sha256 {}", archive.sha256));
        }
        lines.join("\n")
    }
}

/// Multi-line dry-run description of `plan`.
#[must_use]
pub fn plan_text(plan: &BuildPlan) -> String {
    let mut lines = vec![
        "Dry run - no tasks will be executed".to_owned(),
        String::new(),
        "Modules (merge order):".to_owned(),
    ];
    lines.extend(plan.modules().iter().map(|module| format!("  - {module}")));
    lines.push(String::new());
    lines.push("Execution waves:".to_owned());
    lines.extend(plan.waves().iter().enumerate().map(|(number, wave)| {
        let tasks: Vec<&str> = wave.iter().map(TaskId::as_str).collect();
        format!("  {}. {}", number + 1, tasks.join(", "))
    }));
    lines.push(String::new());
    lines.push(format!("Output: {}", plan.artifact()));
    lines.join("\n")
}
