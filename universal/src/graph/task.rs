//! Task abstraction for the dependency graph.
//!
//! A [`Task`] is any unit of build work identified by a [`TaskId`]. When it
//! runs it receives a [`TaskContext`] exposing the outputs of the tasks it
//! depends on, and it reports the files it produced as a [`TaskOutput`].

use crate::error::TaskError;
use camino::{Utf8Path, Utf8PathBuf};
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;

/// Identifier of a task, unique within one graph.
///
/// Module packaging tasks use the `<module>:package` form; lifecycle and
/// aggregation tasks use plain names such as `build`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct TaskId(String);

impl TaskId {
    /// Create a task identifier.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for TaskId {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

impl From<String> for TaskId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Files produced by a completed task.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TaskOutput {
    files: Vec<Utf8PathBuf>,
}

impl TaskOutput {
    /// An output with no files, for tasks that only have side effects.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// An output consisting of exactly one file.
    #[must_use]
    pub fn file(path: impl Into<Utf8PathBuf>) -> Self {
        Self {
            files: vec![path.into()],
        }
    }

    /// An output consisting of the given files, in order.
    #[must_use]
    pub fn from_files(files: Vec<Utf8PathBuf>) -> Self {
        Self { files }
    }

    /// All produced files.
    #[must_use]
    pub fn files(&self) -> &[Utf8PathBuf] {
        &self.files
    }

    /// The produced file when there is exactly one, otherwise `None`.
    ///
    /// # Examples
    ///
    /// ```
    /// use universal_jar::graph::TaskOutput;
    ///
    /// assert!(TaskOutput::file("/out/a.jar").single_file().is_some());
    /// assert!(TaskOutput::empty().single_file().is_none());
    /// ```
    #[must_use]
    pub fn single_file(&self) -> Option<&Utf8Path> {
        match self.files.as_slice() {
            [only] => Some(only.as_path()),
            _ => None,
        }
    }
}

/// Outputs of completed tasks, keyed by task identifier.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(transparent)]
pub struct TaskOutputs {
    outputs: HashMap<TaskId, TaskOutput>,
}

impl TaskOutputs {
    /// Record the output of a completed task.
    pub fn insert(&mut self, task: TaskId, output: TaskOutput) {
        self.outputs.insert(task, output);
    }

    /// Output of `task`, if it has completed.
    #[must_use]
    pub fn get(&self, task: &TaskId) -> Option<&TaskOutput> {
        self.outputs.get(task)
    }

    /// Number of completed tasks.
    #[must_use]
    pub fn len(&self) -> usize {
        self.outputs.len()
    }

    /// Whether no task has completed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.outputs.is_empty()
    }
}

/// Read-only view handed to a running task.
///
/// Exposes only the outputs of the task's declared dependencies; a task
/// never sees another task's internal state.
#[derive(Debug, Clone, Copy)]
pub struct TaskContext<'a> {
    task: &'a TaskId,
    dependencies: &'a [TaskId],
    outputs: &'a TaskOutputs,
}

impl<'a> TaskContext<'a> {
    /// Create a context for `task` with the given dependencies and the
    /// outputs completed so far.
    #[must_use]
    pub fn new(task: &'a TaskId, dependencies: &'a [TaskId], outputs: &'a TaskOutputs) -> Self {
        Self {
            task,
            dependencies,
            outputs,
        }
    }

    /// Identifier of the running task.
    #[must_use]
    pub fn task_id(&self) -> &TaskId {
        self.task
    }

    /// Direct dependencies of the running task, in registration order.
    #[must_use]
    pub fn dependencies(&self) -> &[TaskId] {
        self.dependencies
    }

    /// Output of a direct dependency.
    ///
    /// Returns `None` when `task` is not a dependency of the running task or
    /// has not produced an output.
    #[must_use]
    pub fn output_of(&self, task: &TaskId) -> Option<&'a TaskOutput> {
        if self.dependencies.contains(task) {
            self.outputs.get(task)
        } else {
            None
        }
    }
}

/// A unit of build work in the dependency graph.
///
/// Tasks must be shareable across worker threads because independent tasks
/// run concurrently.
pub trait Task: Send + Sync {
    /// Identifier the task is registered under.
    fn id(&self) -> &TaskId;

    /// Execute the task.
    ///
    /// # Errors
    ///
    /// Returns a [`TaskError`] when the task cannot complete; the graph then
    /// stops and no dependent task runs.
    fn run(&self, ctx: &TaskContext<'_>) -> Result<TaskOutput, TaskError>;
}
