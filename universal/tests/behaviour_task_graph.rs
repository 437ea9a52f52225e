//! Behaviour-driven tests for the task dependency graph.
//!
//! Scenarios register recording tasks, wire dependencies between them, and
//! check execution order, single execution, and failure propagation. Tests
//! use the rstest-bdd v0.5.0 mutable world pattern.

use camino::Utf8PathBuf;
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use std::sync::{Arc, Mutex};
use universal_jar::error::TaskError;
use universal_jar::graph::{GraphError, GraphRun, Task, TaskContext, TaskGraph, TaskId, TaskOutput};

// ---------------------------------------------------------------------------
// World types
// ---------------------------------------------------------------------------

type ExecutionLog = Arc<Mutex<Vec<String>>>;

struct RecordingTask {
    id: TaskId,
    log: ExecutionLog,
    fails: bool,
}

impl Task for RecordingTask {
    fn id(&self) -> &TaskId {
        &self.id
    }

    fn run(&self, _ctx: &TaskContext<'_>) -> Result<TaskOutput, TaskError> {
        self.log
            .lock()
            .expect("execution log lock")
            .push(self.id.as_str().to_owned());
        if self.fails {
            return Err(TaskError::MissingOutput {
                path: Utf8PathBuf::from(format!("/out/{}.jar", self.id)),
            });
        }
        Ok(TaskOutput::empty())
    }
}

#[derive(Default)]
struct GraphWorld {
    graph: TaskGraph,
    log: ExecutionLog,
    result: Option<Result<GraphRun, GraphError>>,
    wiring_error: Option<GraphError>,
}

#[fixture]
fn world() -> GraphWorld {
    GraphWorld::default()
}

impl GraphWorld {
    fn register(&mut self, name: &str, fails: bool) {
        self.graph
            .add_task(RecordingTask {
                id: TaskId::from(name),
                log: Arc::clone(&self.log),
                fails,
            })
            .expect("task registers");
    }

    fn executed(&self) -> Vec<String> {
        self.log.lock().expect("execution log lock").clone()
    }
}

// ---------------------------------------------------------------------------
// Step definitions
// ---------------------------------------------------------------------------

#[given("a task \"{name}\" with no dependencies")]
fn given_task(world: &mut GraphWorld, name: String) {
    world.register(&name, false);
}

#[given("a failing task \"{name}\"")]
fn given_failing_task(world: &mut GraphWorld, name: String) {
    world.register(&name, true);
}

#[given("a task \"{name}\" depending on \"{dependency}\"")]
fn given_dependent_task(world: &mut GraphWorld, name: String, dependency: String) {
    world.register(&name, false);
    world
        .graph
        .add_dependency(&TaskId::from(name), &TaskId::from(dependency))
        .expect("dependency registers");
}

#[given("task \"{name}\" also depends on \"{dependency}\"")]
fn given_extra_dependency(world: &mut GraphWorld, name: String, dependency: String) {
    world
        .graph
        .add_dependency(&TaskId::from(name), &TaskId::from(dependency))
        .expect("dependency registers");
}

#[when("the graph runs target \"{target}\"")]
fn when_graph_runs(world: &mut GraphWorld, target: String) {
    world.result = Some(world.graph.run_target(&TaskId::from(target)));
}

#[when("task \"{name}\" is made to depend on \"{dependency}\"")]
fn when_dependency_added(world: &mut GraphWorld, name: String, dependency: String) {
    world.wiring_error = world
        .graph
        .add_dependency(&TaskId::from(name), &TaskId::from(dependency))
        .err();
}

#[then("the execution order is \"{order}\"")]
fn then_execution_order(world: &mut GraphWorld, order: String) {
    let run = match world.result.as_ref().expect("graph ran") {
        Ok(run) => run,
        Err(err) => panic!("graph run failed: {err}"),
    };
    let actual: Vec<&str> = run.order().iter().map(TaskId::as_str).collect();
    let expected: Vec<&str> = order.split(", ").collect();
    assert_eq!(actual, expected);
}

#[then("task \"{name}\" ran once")]
fn then_ran_once(world: &mut GraphWorld, name: String) {
    let runs = world.executed().iter().filter(|task| **task == name).count();
    assert_eq!(runs, 1);
}

#[then("task \"{name}\" ran last")]
fn then_ran_last(world: &mut GraphWorld, name: String) {
    assert_eq!(world.executed().last(), Some(&name));
}

#[then("the run is rejected as a cycle")]
fn then_cycle_rejected(world: &mut GraphWorld) {
    assert!(matches!(
        world.result.as_ref().expect("graph ran"),
        Err(GraphError::Cycle { .. })
    ));
}

#[then("no task ran")]
fn then_nothing_ran(world: &mut GraphWorld) {
    assert!(world.executed().is_empty());
}

#[then("the dependency is rejected as unknown")]
fn then_unknown_rejected(world: &mut GraphWorld) {
    assert!(matches!(
        world.wiring_error.as_ref(),
        Some(GraphError::UnknownTask { task }) if task.as_str() == "ghost"
    ));
}

#[then("the run fails in task \"{name}\"")]
fn then_run_fails(world: &mut GraphWorld, name: String) {
    match world.result.as_ref().expect("graph ran") {
        Err(GraphError::TaskFailed { task, .. }) => assert_eq!(task.as_str(), name),
        Err(other) => panic!("unexpected error: {other}"),
        Ok(_) => panic!("expected the run to fail"),
    }
}

#[then("task \"{name}\" did not run")]
fn then_did_not_run(world: &mut GraphWorld, name: String) {
    assert!(!world.executed().contains(&name));
}

// ---------------------------------------------------------------------------
// Scenario bindings
// ---------------------------------------------------------------------------

#[scenario(
    path = "tests/features/task_graph.feature",
    name = "Tasks run after their dependencies"
)]
fn scenario_dependency_order(world: GraphWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/task_graph.feature",
    name = "A shared dependency runs once"
)]
fn scenario_shared_dependency(world: GraphWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/task_graph.feature",
    name = "Cycles are rejected before any task runs"
)]
fn scenario_cycle_rejected(world: GraphWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/task_graph.feature",
    name = "Unknown dependencies are rejected"
)]
fn scenario_unknown_dependency(world: GraphWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/task_graph.feature",
    name = "A failing task stops its dependents"
)]
fn scenario_failure_stops_dependents(world: GraphWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/task_graph.feature",
    name = "Targets run only their own dependencies"
)]
fn scenario_target_closure(world: GraphWorld) {
    let _ = world;
}
