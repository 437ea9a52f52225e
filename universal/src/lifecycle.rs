//! The `build` lifecycle task and whole-build entry points.
//!
//! [`assemble_build_graph`] turns a [`ProjectConfig`] into a task graph: one
//! packaging task per module, the aggregation task, and the conventional
//! `build` task that depends on it. [`run_build`] executes that graph up to
//! `build`; [`plan`] resolves the same graph without running anything.

use crate::aggregation::AggregationTask;
use crate::command::{CommandExecutor, SystemCommandExecutor};
use crate::config::ProjectConfig;
use crate::error::{BuildError, TaskError};
use crate::graph::{GraphError, Task, TaskContext, TaskGraph, TaskId, TaskOutput};
use crate::module_name::ModuleName;
use camino::{Utf8Path, Utf8PathBuf};
use log::info;
use serde::Serialize;
use std::sync::Arc;

/// Identifier of the lifecycle task a generic build invokes.
pub const BUILD_TASK: &str = "build";

/// The conventional `build` task.
///
/// It performs no work; its output is every file its direct dependencies
/// produced, which is the set of published archives.
#[derive(Debug, Clone)]
pub struct LifecycleTask {
    id: TaskId,
}

impl LifecycleTask {
    /// The `build` lifecycle task.
    #[must_use]
    pub fn build() -> Self {
        Self {
            id: TaskId::from(BUILD_TASK),
        }
    }
}

impl Task for LifecycleTask {
    fn id(&self) -> &TaskId {
        &self.id
    }

    fn run(&self, ctx: &TaskContext<'_>) -> Result<TaskOutput, TaskError> {
        let archives = ctx
            .dependencies()
            .iter()
            .filter_map(|dependency| ctx.output_of(dependency))
            .flat_map(|output| output.files().iter().cloned())
            .collect();
        Ok(TaskOutput::from_files(archives))
    }
}

/// Build the full task graph for `config`.
///
/// # Errors
///
/// Returns a [`GraphError`] if two modules map to the same task or the
/// wiring references an unregistered task.
pub fn assemble_build_graph(
    config: &ProjectConfig,
    executor: Arc<dyn CommandExecutor>,
) -> Result<TaskGraph, GraphError> {
    let mut graph = TaskGraph::new();
    if let Some(jobs) = config.jobs() {
        graph = graph.with_jobs(jobs);
    }

    for module in config.modules() {
        graph.add_boxed_task(module.packaging_task(config.root(), &executor))?;
    }
    graph.add_task(LifecycleTask::build())?;
    AggregationTask::register(
        &mut graph,
        config.module_refs(),
        config.aggregation_settings(),
    )?;
    Ok(graph)
}

/// Outcome of a successful build.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BuildReport {
    order: Vec<TaskId>,
    archives: Vec<Utf8PathBuf>,
}

impl BuildReport {
    /// Tasks in the order they completed.
    #[must_use]
    pub fn order(&self) -> &[TaskId] {
        &self.order
    }

    /// Archives published by the build.
    #[must_use]
    pub fn archives(&self) -> &[Utf8PathBuf] {
        &self.archives
    }
}

/// Run the `build` lifecycle task and everything it depends on.
///
/// # Errors
///
/// Returns a [`BuildError`] naming the failed stage.
pub fn run_build(
    config: &ProjectConfig,
    executor: Arc<dyn CommandExecutor>,
) -> Result<BuildReport, BuildError> {
    let graph = assemble_build_graph(config, executor)?;
    let build = TaskId::from(BUILD_TASK);
    let run = graph.run_target(&build)?;
    let archives = run
        .output_of(&build)
        .map(|output| output.files().to_vec())
        .unwrap_or_default();
    info!("build finished: {} task(s), {} archive(s)", run.order().len(), archives.len());
    Ok(BuildReport {
        order: run.order().to_vec(),
        archives,
    })
}

/// What a build would do, resolved without running any task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BuildPlan {
    waves: Vec<Vec<TaskId>>,
    modules: Vec<ModuleName>,
    artifact: Utf8PathBuf,
}

impl BuildPlan {
    /// Execution waves; tasks within a wave may run concurrently.
    #[must_use]
    pub fn waves(&self) -> &[Vec<TaskId>] {
        &self.waves
    }

    /// Modules in merge order.
    #[must_use]
    pub fn modules(&self) -> &[ModuleName] {
        &self.modules
    }

    /// Path the aggregate archive would be published at.
    #[must_use]
    pub fn artifact(&self) -> &Utf8Path {
        &self.artifact
    }
}

/// Resolve the build plan for `config`.
///
/// # Errors
///
/// Returns a [`BuildError`] if the graph is malformed.
pub fn plan(config: &ProjectConfig) -> Result<BuildPlan, BuildError> {
    let graph = assemble_build_graph(config, Arc::new(SystemCommandExecutor))?;
    let waves = graph.plan_target(&TaskId::from(BUILD_TASK))?;
    Ok(BuildPlan {
        waves,
        modules: config
            .modules()
            .iter()
            .map(|module| module.name().clone())
            .collect(),
        artifact: config.aggregation_settings().artifact_path(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::MockCommandExecutor;
    use crate::test_utils::{Workspace, read_entries, workspace};
    use rstest::rstest;

    fn prebuilt_config(workspace: &Workspace) -> ProjectConfig {
        workspace.zip("alpha/alpha.jar", &[("A.class", b"alpha-A")]);
        workspace.zip("beta/beta.jar", &[("A.class", b"beta-A"), ("B.class", b"beta-B")]);
        ProjectConfig::from_toml_str(
            workspace.root(),
            r#"
                product = "tool"
                version = "1.2.3"

                [[modules]]
                name = "alpha"
                output = "alpha/alpha.jar"

                [[modules]]
                name = "beta"
                output = "beta/beta.jar"
            "#,
        )
        .expect("valid configuration")
    }

    fn unused_executor() -> Arc<dyn CommandExecutor> {
        let mut executor = MockCommandExecutor::new();
        executor.expect_run().never();
        Arc::new(executor)
    }

    #[rstest]
    fn build_publishes_aggregate_archive(workspace: Workspace) {
        let config = prebuilt_config(&workspace);

        let report = run_build(&config, unused_executor()).expect("build succeeds");

        let expected = workspace.path("build/libs/tool-1.2.3.jar");
        assert_eq!(report.archives(), [expected.clone()]);
        assert_eq!(
            report.order().last().map(TaskId::as_str),
            Some(BUILD_TASK)
        );
        assert_eq!(read_entries(&expected).len(), 2);
    }

    #[rstest]
    fn build_without_modules_publishes_empty_archive(workspace: Workspace) {
        let config = ProjectConfig::from_toml_str(
            workspace.root(),
            "product = \"tool\"\nversion = \"1.2.3\"\n",
        )
        .expect("a project without modules is valid");

        let report = run_build(&config, unused_executor()).expect("build succeeds");

        let expected = workspace.path("build/libs/tool-1.2.3.jar");
        assert_eq!(report.archives(), [expected.clone()]);
        assert!(read_entries(&expected).is_empty());
    }

    #[rstest]
    fn plan_orders_modules_before_aggregation(workspace: Workspace) {
        let config = prebuilt_config(&workspace);

        let plan = plan(&config).expect("plan resolves");

        let waves: Vec<Vec<&str>> = plan
            .waves()
            .iter()
            .map(|wave| wave.iter().map(TaskId::as_str).collect())
            .collect();
        assert_eq!(
            waves,
            vec![
                vec!["alpha:package", "beta:package"],
                vec!["universalJar"],
                vec!["build"],
            ]
        );
        assert_eq!(plan.artifact(), workspace.path("build/libs/tool-1.2.3.jar").as_path());
        assert!(!plan.artifact().exists(), "planning must not publish");
    }

    #[rstest]
    fn missing_module_archive_stops_before_aggregation(workspace: Workspace) {
        workspace.zip("alpha/alpha.jar", &[("A.class", b"a")]);
        let config = ProjectConfig::from_toml_str(
            workspace.root(),
            r#"
                product = "tool"
                version = "1.2.3"

                [[modules]]
                name = "alpha"
                output = "alpha/alpha.jar"

                [[modules]]
                name = "beta"
                output = "beta/missing.jar"
            "#,
        )
        .expect("valid configuration");

        let err = run_build(&config, unused_executor()).expect_err("build must fail");

        assert_eq!(err.stage(), "upstream");
        assert!(!workspace.path("build/libs/tool-1.2.3.jar").exists());
    }

    #[test]
    fn lifecycle_output_collects_dependency_files() {
        let aggregation = TaskId::from("universalJar");
        let mut outputs = crate::graph::TaskOutputs::default();
        outputs.insert(aggregation.clone(), TaskOutput::file("/out/tool-1.2.3.jar"));
        let dependencies = [aggregation];
        let task = LifecycleTask::build();

        let output = task
            .run(&TaskContext::new(task.id(), &dependencies, &outputs))
            .expect("lifecycle succeeds");

        assert_eq!(output.single_file().map(Utf8Path::as_str), Some("/out/tool-1.2.3.jar"));
    }
}
