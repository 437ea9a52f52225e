//! Dependency graph of build tasks.
//!
//! The graph stores each task as a node and each "consumer depends on
//! producer" relationship as an edge from producer to consumer. Every task is
//! a single node keyed by its [`TaskId`], so a task requested by several
//! consumers still runs exactly once per graph run.

use super::error::GraphError;
use super::task::{Task, TaskContext, TaskId, TaskOutput, TaskOutputs};
use log::{debug, info};
use petgraph::Direction;
use petgraph::algo::toposort;
use petgraph::graph::{DiGraph, NodeIndex};
use std::collections::{HashMap, HashSet};
use std::num::NonZeroUsize;
use std::thread;

/// A directed acyclic graph of tasks with wave-parallel execution.
///
/// # Examples
///
/// ```
/// use universal_jar::error::TaskError;
/// use universal_jar::graph::{Task, TaskContext, TaskGraph, TaskId, TaskOutput};
///
/// struct Noop(TaskId);
///
/// impl Task for Noop {
///     fn id(&self) -> &TaskId {
///         &self.0
///     }
///
///     fn run(&self, _ctx: &TaskContext<'_>) -> Result<TaskOutput, TaskError> {
///         Ok(TaskOutput::empty())
///     }
/// }
///
/// let mut graph = TaskGraph::new();
/// graph.add_task(Noop(TaskId::from("compile")))?;
/// graph.add_task(Noop(TaskId::from("build")))?;
/// graph.add_dependency(&TaskId::from("build"), &TaskId::from("compile"))?;
///
/// let run = graph.run_target(&TaskId::from("build"))?;
/// assert_eq!(run.order(), &[TaskId::from("compile"), TaskId::from("build")]);
/// # Ok::<(), universal_jar::graph::GraphError>(())
/// ```
pub struct TaskGraph {
    graph: DiGraph<Box<dyn Task>, ()>,
    nodes: HashMap<TaskId, NodeIndex>,
    jobs: NonZeroUsize,
}

impl Default for TaskGraph {
    fn default() -> Self {
        Self::new()
    }
}

impl TaskGraph {
    /// Create an empty graph that runs up to one task per available CPU at
    /// a time.
    #[must_use]
    pub fn new() -> Self {
        Self {
            graph: DiGraph::new(),
            nodes: HashMap::new(),
            jobs: thread::available_parallelism().unwrap_or(NonZeroUsize::MIN),
        }
    }

    /// Limit how many independent tasks may run at the same time.
    #[must_use]
    pub fn with_jobs(mut self, jobs: NonZeroUsize) -> Self {
        self.jobs = jobs;
        self
    }

    /// Maximum number of tasks run concurrently.
    #[must_use]
    pub fn jobs(&self) -> NonZeroUsize {
        self.jobs
    }

    /// Register a task.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::DuplicateTask`] if a task with the same
    /// identifier is already registered.
    pub fn add_task<T: Task + 'static>(&mut self, task: T) -> Result<(), GraphError> {
        self.add_boxed_task(Box::new(task))
    }

    /// Register an already boxed task.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::DuplicateTask`] if a task with the same
    /// identifier is already registered.
    pub fn add_boxed_task(&mut self, task: Box<dyn Task>) -> Result<(), GraphError> {
        let id = task.id().clone();
        if self.nodes.contains_key(&id) {
            return Err(GraphError::DuplicateTask { task: id });
        }
        let idx = self.graph.add_node(task);
        debug!("registered task {id}");
        self.nodes.insert(id, idx);
        Ok(())
    }

    /// Record that `consumer` must not run until `producer` has completed.
    ///
    /// Registering the same edge twice has no further effect.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::UnknownTask`] if either task is not registered.
    pub fn add_dependency(&mut self, consumer: &TaskId, producer: &TaskId) -> Result<(), GraphError> {
        let consumer_idx = self.index_of(consumer)?;
        let producer_idx = self.index_of(producer)?;
        self.graph.update_edge(producer_idx, consumer_idx, ());
        debug!("task {consumer} depends on {producer}");
        Ok(())
    }

    /// Whether a task with this identifier is registered.
    #[must_use]
    pub fn contains(&self, task: &TaskId) -> bool {
        self.nodes.contains_key(task)
    }

    /// Number of registered tasks.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether no task is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Direct dependencies of `task`, in registration order.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::UnknownTask`] if the task is not registered.
    pub fn dependencies_of(&self, task: &TaskId) -> Result<Vec<TaskId>, GraphError> {
        let idx = self.index_of(task)?;
        Ok(self.dependency_ids(idx))
    }

    /// Execution waves for running `target`, without running anything.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::UnknownTask`] for an unregistered target and
    /// [`GraphError::Cycle`] if the graph is cyclic.
    pub fn plan_target(&self, target: &TaskId) -> Result<Vec<Vec<TaskId>>, GraphError> {
        let idx = self.index_of(target)?;
        self.verify_acyclic()?;
        let waves = self.waves(&self.closure_of(idx))?;
        Ok(waves
            .iter()
            .map(|wave| wave.iter().map(|&node| self.id_of(node)).collect())
            .collect())
    }

    /// Run every registered task exactly once, dependencies first.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::Cycle`] before running anything if the graph is
    /// cyclic, or [`GraphError::TaskFailed`] / [`GraphError::WorkerPanicked`]
    /// for the first task that failed. No task that depends on a failed
    /// task is run.
    pub fn run_all(&self) -> Result<GraphRun, GraphError> {
        let selected: HashSet<NodeIndex> = self.graph.node_indices().collect();
        self.execute(&selected)
    }

    /// Run `target` and everything it transitively depends on.
    ///
    /// # Errors
    ///
    /// As for [`Self::run_all`], plus [`GraphError::UnknownTask`] when the
    /// target is not registered.
    pub fn run_target(&self, target: &TaskId) -> Result<GraphRun, GraphError> {
        let idx = self.index_of(target)?;
        self.execute(&self.closure_of(idx))
    }

    fn execute(&self, selected: &HashSet<NodeIndex>) -> Result<GraphRun, GraphError> {
        self.verify_acyclic()?;
        let waves = self.waves(selected)?;
        let mut run = GraphRun::default();

        for (number, wave) in waves.iter().enumerate() {
            debug!("starting wave {number} with {} task(s)", wave.len());
            for chunk in wave.chunks(self.jobs.get()) {
                let mut first_error = None;
                for (task, result) in self.run_chunk(chunk, &run.outputs) {
                    match result {
                        Ok(output) => run.record(task, output),
                        Err(err) => {
                            first_error.get_or_insert(err);
                        }
                    }
                }
                if let Some(err) = first_error {
                    return Err(err);
                }
            }
        }

        Ok(run)
    }

    /// Run one batch of independent tasks, returning results in batch order.
    ///
    /// Every task runs on a scoped worker thread, so a panicking task is
    /// reported as [`GraphError::WorkerPanicked`] whatever the batch size.
    fn run_chunk(
        &self,
        chunk: &[NodeIndex],
        outputs: &TaskOutputs,
    ) -> Vec<(TaskId, Result<TaskOutput, GraphError>)> {
        let prepared: Vec<(&dyn Task, Vec<TaskId>)> = chunk
            .iter()
            .filter_map(|&idx| {
                self.graph
                    .node_weight(idx)
                    .map(|task| (task.as_ref(), self.dependency_ids(idx)))
            })
            .collect();

        thread::scope(|scope| {
            let handles: Vec<_> = prepared
                .iter()
                .map(|(task, deps)| {
                    let task = *task;
                    (task, scope.spawn(move || run_task(task, deps, outputs)))
                })
                .collect();

            handles
                .into_iter()
                .map(|(task, handle)| {
                    let id = task.id().clone();
                    let result = handle.join().unwrap_or_else(|_| {
                        Err(GraphError::WorkerPanicked { task: id.clone() })
                    });
                    (id, result)
                })
                .collect()
        })
    }

    fn verify_acyclic(&self) -> Result<(), GraphError> {
        toposort(&self.graph, None)
            .map(|_| ())
            .map_err(|cycle| GraphError::Cycle {
                task: self.id_of(cycle.node_id()),
            })
    }

    /// Group the selected nodes into Kahn levels.
    ///
    /// Nodes within a wave are ordered by registration.
    fn waves(&self, selected: &HashSet<NodeIndex>) -> Result<Vec<Vec<NodeIndex>>, GraphError> {
        let mut in_degree: HashMap<NodeIndex, usize> = selected
            .iter()
            .map(|&idx| {
                let degree = self
                    .graph
                    .neighbors_directed(idx, Direction::Incoming)
                    .filter(|dep| selected.contains(dep))
                    .count();
                (idx, degree)
            })
            .collect();

        let mut ready: Vec<NodeIndex> = in_degree
            .iter()
            .filter(|(_, degree)| **degree == 0)
            .map(|(idx, _)| *idx)
            .collect();
        let mut waves = Vec::new();
        let mut scheduled = 0;

        while !ready.is_empty() {
            ready.sort_unstable();
            let mut next = Vec::new();
            for &idx in &ready {
                for dependent in self.graph.neighbors_directed(idx, Direction::Outgoing) {
                    if let Some(degree) = in_degree.get_mut(&dependent) {
                        *degree = degree.saturating_sub(1);
                        if *degree == 0 {
                            next.push(dependent);
                        }
                    }
                }
            }
            scheduled += ready.len();
            waves.push(std::mem::replace(&mut ready, next));
        }

        if scheduled != selected.len() {
            let stuck = in_degree
                .iter()
                .filter(|(_, degree)| **degree > 0)
                .map(|(idx, _)| *idx)
                .min();
            return Err(GraphError::Cycle {
                task: stuck.map_or_else(|| TaskId::from("<unknown>"), |idx| self.id_of(idx)),
            });
        }

        Ok(waves)
    }

    /// `target` plus every task it transitively depends on.
    fn closure_of(&self, target: NodeIndex) -> HashSet<NodeIndex> {
        let mut seen = HashSet::from([target]);
        let mut stack = vec![target];
        while let Some(idx) = stack.pop() {
            for dep in self.graph.neighbors_directed(idx, Direction::Incoming) {
                if seen.insert(dep) {
                    stack.push(dep);
                }
            }
        }
        seen
    }

    fn dependency_ids(&self, idx: NodeIndex) -> Vec<TaskId> {
        let mut deps: Vec<NodeIndex> = self
            .graph
            .neighbors_directed(idx, Direction::Incoming)
            .collect();
        deps.sort_unstable();
        deps.into_iter().map(|dep| self.id_of(dep)).collect()
    }

    fn index_of(&self, task: &TaskId) -> Result<NodeIndex, GraphError> {
        self.nodes
            .get(task)
            .copied()
            .ok_or_else(|| GraphError::UnknownTask { task: task.clone() })
    }

    fn id_of(&self, idx: NodeIndex) -> TaskId {
        self.graph.node_weight(idx).map_or_else(
            || TaskId::new(format!("#{}", idx.index())),
            |task| task.id().clone(),
        )
    }
}

fn run_task(task: &dyn Task, deps: &[TaskId], outputs: &TaskOutputs) -> Result<TaskOutput, GraphError> {
    let ctx = TaskContext::new(task.id(), deps, outputs);
    info!("running task {}", task.id());
    task.run(&ctx).map_err(|source| GraphError::TaskFailed {
        task: task.id().clone(),
        source,
    })
}

/// Result of a successful graph run.
#[derive(Debug, Default)]
pub struct GraphRun {
    order: Vec<TaskId>,
    outputs: TaskOutputs,
}

impl GraphRun {
    /// Tasks in the order their results were recorded.
    #[must_use]
    pub fn order(&self) -> &[TaskId] {
        &self.order
    }

    /// Output of a task that ran.
    #[must_use]
    pub fn output_of(&self, task: &TaskId) -> Option<&TaskOutput> {
        self.outputs.get(task)
    }

    /// Whether `task` ran during this run.
    #[must_use]
    pub fn executed(&self, task: &TaskId) -> bool {
        self.outputs.get(task).is_some()
    }

    fn record(&mut self, task: TaskId, output: TaskOutput) {
        self.order.push(task.clone());
        self.outputs.insert(task, output);
    }
}

#[cfg(test)]
#[path = "dag_tests.rs"]
mod tests;
