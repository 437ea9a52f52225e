//! Error types for configuration, task execution, and whole builds.
//!
//! Per-area errors live next to the code that raises them ([`GraphError`],
//! [`MergeError`], [`PublishError`], [`ArchiveError`]). This module holds the
//! errors shared across areas and the top-level [`BuildError`] taxonomy the
//! CLI reports, which names the stage that failed.
//!
//! [`ArchiveError`]: crate::archive::error::ArchiveError

use crate::archive::error::ArchiveError;
use crate::archive::merge_error::MergeError;
use crate::archive::publish_error::PublishError;
use crate::graph::{GraphError, TaskId};
use crate::module_name::ModuleName;
use camino::Utf8PathBuf;
use thiserror::Error;

/// Errors detected while loading or validating the project configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The project root could not be determined.
    #[error("invalid project root {path}: {reason}")]
    InvalidRoot {
        /// The root as given or discovered.
        path: String,
        /// Description of the failure.
        reason: String,
    },

    /// The configuration file could not be read.
    #[error("failed to read configuration {path}")]
    Read {
        /// Path of the configuration file.
        path: Utf8PathBuf,
        /// The underlying I/O failure.
        #[source]
        source: std::io::Error,
    },

    /// The configuration file is not valid TOML for the expected schema.
    #[error("invalid configuration {path}")]
    Parse {
        /// Path of the configuration file.
        path: Utf8PathBuf,
        /// The deserialisation failure.
        #[source]
        source: toml::de::Error,
    },

    /// The product name is empty or otherwise unusable.
    #[error("invalid product name \"{value}\": {reason}")]
    InvalidProduct {
        /// The rejected product name.
        value: String,
        /// Description of the validation failure.
        reason: String,
    },

    /// A module name is empty or contains forbidden characters.
    #[error("invalid module name \"{value}\": {reason}")]
    InvalidModuleName {
        /// The rejected module name.
        value: String,
        /// Description of the validation failure.
        reason: String,
    },

    /// The same module appears more than once in the module list.
    #[error("module {name} is listed more than once")]
    DuplicateModule {
        /// The repeated module.
        name: ModuleName,
    },

    /// A module's packaging command is malformed.
    #[error("invalid packaging command for module {module}: {reason}")]
    InvalidCommand {
        /// The module owning the command.
        module: ModuleName,
        /// Description of the validation failure.
        reason: String,
    },

    /// The name template or version is malformed.
    #[error(transparent)]
    InvalidName(#[from] ArchiveError),
}

/// Errors raised by an individual task while it executes.
#[derive(Debug, Error)]
pub enum TaskError {
    /// A dependency did not provide the single output file this task needs.
    #[error("dependency {task} did not provide a usable output: {reason}")]
    Upstream {
        /// The dependency whose output is unusable.
        task: TaskId,
        /// Description of what was wrong with the output.
        reason: String,
    },

    /// A packaging task finished without producing its declared output file.
    #[error("expected output {path} was not produced")]
    MissingOutput {
        /// The declared output path.
        path: Utf8PathBuf,
    },

    /// A packaging command could not be started.
    #[error("failed to run {program}")]
    Spawn {
        /// The program that could not be started.
        program: String,
        /// The underlying I/O failure.
        #[source]
        source: std::io::Error,
    },

    /// A packaging command exited unsuccessfully.
    #[error("{program} exited with {status}: {stderr}")]
    Command {
        /// The program that failed.
        program: String,
        /// Rendered exit status.
        status: String,
        /// Captured standard error, trimmed.
        stderr: String,
    },

    /// Merging module archives failed.
    #[error(transparent)]
    Merge(#[from] MergeError),

    /// Publishing the merged archive failed.
    #[error(transparent)]
    Publish(#[from] PublishError),
}

/// Top-level build failure, classified by the stage that failed.
#[derive(Debug, Error)]
pub enum BuildError {
    /// The project configuration is invalid.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The task graph is malformed or could not be executed.
    #[error(transparent)]
    Graph(GraphError),

    /// A module packaging task failed or produced no usable output.
    #[error("task {task} failed")]
    Upstream {
        /// The failing task.
        task: TaskId,
        /// Why it failed.
        #[source]
        source: TaskError,
    },

    /// An input archive was unreadable or corrupt.
    #[error(transparent)]
    Merge(MergeError),

    /// The aggregate archive could not be written.
    #[error(transparent)]
    Publish(PublishError),

    /// The build report could not be written.
    #[error("failed to write build report")]
    Report(#[source] serde_json::Error),
}

impl BuildError {
    /// Name of the build stage that failed, for user-facing reports.
    #[must_use]
    pub fn stage(&self) -> &'static str {
        match self {
            Self::Config(_) => "configuration",
            Self::Graph(GraphError::WorkerPanicked { .. }) => "execution",
            Self::Graph(_) => "configuration",
            Self::Upstream { .. } => "upstream",
            Self::Merge(_) => "merge",
            Self::Publish(_) => "publish",
            Self::Report(_) => "report",
        }
    }
}

impl From<GraphError> for BuildError {
    fn from(err: GraphError) -> Self {
        match err {
            GraphError::TaskFailed { task, source } => match source {
                TaskError::Merge(merge) => Self::Merge(merge),
                TaskError::Publish(publish) => Self::Publish(publish),
                other => Self::Upstream {
                    task,
                    source: other,
                },
            },
            other => Self::Graph(other),
        }
    }
}
