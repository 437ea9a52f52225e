//! The aggregation task that merges module archives into one distributable.
//!
//! [`AggregationTask::register`] wires the task into a [`TaskGraph`]: it
//! depends on every module's packaging task and becomes a prerequisite of the
//! lifecycle `build` task. When it runs, module outputs are merged in the
//! configured module order, never in completion order.

use crate::archive::merge::merge;
use crate::archive::naming::{NameTemplate, Version};
use crate::archive::publish::publish;
use crate::error::TaskError;
use crate::graph::{GraphError, Task, TaskContext, TaskGraph, TaskId, TaskOutput};
use crate::lifecycle::BUILD_TASK;
use crate::module::ModuleOutputRef;
use camino::{Utf8Path, Utf8PathBuf};
use log::info;

/// Identifier of the aggregation task.
pub const AGGREGATION_TASK: &str = "universalJar";

/// Where and under what name the aggregate archive is published.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AggregationSettings {
    destination: Utf8PathBuf,
    template: NameTemplate,
    version: Version,
}

impl AggregationSettings {
    /// Create settings from validated parts.
    #[must_use]
    pub fn new(destination: Utf8PathBuf, template: NameTemplate, version: Version) -> Self {
        Self {
            destination,
            template,
            version,
        }
    }

    /// Directory the archive is published into.
    #[must_use]
    pub fn destination(&self) -> &Utf8Path {
        &self.destination
    }

    /// Filename template.
    #[must_use]
    pub fn template(&self) -> &NameTemplate {
        &self.template
    }

    /// Version substituted into the template.
    #[must_use]
    pub fn version(&self) -> &Version {
        &self.version
    }

    /// Full path the archive will be published at.
    #[must_use]
    pub fn artifact_path(&self) -> Utf8PathBuf {
        self.destination
            .join(self.template.render(&self.version).filename())
    }
}

/// Merges every module's archive and publishes the result.
#[derive(Debug, Clone)]
pub struct AggregationTask {
    id: TaskId,
    modules: Vec<ModuleOutputRef>,
    settings: AggregationSettings,
}

impl AggregationTask {
    /// Create the task for `modules`, merged in the order given.
    #[must_use]
    pub fn new(modules: Vec<ModuleOutputRef>, settings: AggregationSettings) -> Self {
        Self {
            id: TaskId::from(AGGREGATION_TASK),
            modules,
            settings,
        }
    }

    /// Add the task to `graph`, after every module task and before `build`.
    ///
    /// Returns the aggregation task id.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::DuplicateTask`] if an aggregation task is
    /// already registered, or [`GraphError::UnknownTask`] if a module task
    /// or the `build` task is missing from the graph.
    pub fn register(
        graph: &mut TaskGraph,
        modules: Vec<ModuleOutputRef>,
        settings: AggregationSettings,
    ) -> Result<TaskId, GraphError> {
        let task = Self::new(modules, settings);
        let id = task.id.clone();
        let producers: Vec<TaskId> = task.modules.iter().map(|m| m.task().clone()).collect();

        graph.add_task(task)?;
        for producer in &producers {
            graph.add_dependency(&id, producer)?;
        }
        graph.add_dependency(&TaskId::from(BUILD_TASK), &id)?;
        Ok(id)
    }

    /// Modules merged by this task, in merge order.
    #[must_use]
    pub fn modules(&self) -> &[ModuleOutputRef] {
        &self.modules
    }

    fn resolve_inputs(&self, ctx: &TaskContext<'_>) -> Result<Vec<Utf8PathBuf>, TaskError> {
        self.modules
            .iter()
            .map(|module| resolve_module_output(ctx, module.task()))
            .collect()
    }
}

impl Task for AggregationTask {
    fn id(&self) -> &TaskId {
        &self.id
    }

    fn run(&self, ctx: &TaskContext<'_>) -> Result<TaskOutput, TaskError> {
        let inputs = self.resolve_inputs(ctx)?;
        info!(
            "aggregating {} module archive(s) into {}",
            inputs.len(),
            self.settings.artifact_path()
        );

        let merged = merge(&inputs)?;
        let artifact = publish(
            &merged,
            &self.settings.destination,
            &self.settings.template,
            &self.settings.version,
        )?;
        Ok(TaskOutput::file(artifact.path()))
    }
}

fn resolve_module_output(ctx: &TaskContext<'_>, task: &TaskId) -> Result<Utf8PathBuf, TaskError> {
    let upstream = |reason: String| TaskError::Upstream {
        task: task.clone(),
        reason,
    };
    let output = ctx
        .output_of(task)
        .ok_or_else(|| upstream("no output was recorded".to_owned()))?;
    let file = output.single_file().ok_or_else(|| {
        upstream(format!(
            "expected exactly one output file, found {}",
            output.files().len()
        ))
    })?;
    if !file.is_file() {
        return Err(upstream(format!("output file {file} does not exist")));
    }
    Ok(file.to_owned())
}
