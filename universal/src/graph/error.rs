//! Error types for task graph construction and execution.

use super::task::TaskId;
use crate::error::TaskError;
use thiserror::Error;

/// Errors arising from building or running a [`super::TaskGraph`].
#[derive(Debug, Error)]
pub enum GraphError {
    /// A task with the same identifier is already registered.
    #[error("task {task} is already registered")]
    DuplicateTask {
        /// The repeated identifier.
        task: TaskId,
    },

    /// A dependency edge or run target names a task that was never registered.
    #[error("task {task} is not registered")]
    UnknownTask {
        /// The missing identifier.
        task: TaskId,
    },

    /// The dependency edges form a cycle.
    #[error("dependency cycle detected involving task {task}")]
    Cycle {
        /// A task that lies on the cycle.
        task: TaskId,
    },

    /// A task returned an error; tasks depending on it were not run.
    #[error("task {task} failed")]
    TaskFailed {
        /// The failing task.
        task: TaskId,
        /// The task's error.
        #[source]
        source: TaskError,
    },

    /// A worker thread panicked while running a task.
    #[error("task {task} panicked")]
    WorkerPanicked {
        /// The task whose worker panicked.
        task: TaskId,
    },
}
