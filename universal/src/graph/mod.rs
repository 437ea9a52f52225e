//! Task dependency graph and execution.
//!
//! Tasks are registered under a [`TaskId`] and linked with
//! "consumer depends on producer" edges. Running the graph validates it
//! (unknown tasks, cycles) before anything executes, then runs tasks in
//! waves: every task in a wave has all of its dependencies in earlier
//! waves, so the tasks of one wave run concurrently on a bounded pool of
//! scoped worker threads.
//!
//! # Sub-modules
//!
//! - [`dag`] - The [`TaskGraph`] itself and run results ([`GraphRun`]).
//! - [`error`] - Graph configuration and execution errors ([`GraphError`]).
//! - [`task`] - The [`Task`] trait, identifiers, outputs, and run context.

pub mod dag;
pub mod error;
pub mod task;

pub use dag::{GraphRun, TaskGraph};
pub use error::GraphError;
pub use task::{Task, TaskContext, TaskId, TaskOutput, TaskOutputs};
