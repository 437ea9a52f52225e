//! Modules and the packaging tasks that produce their archives.
//!
//! Each module contributes exactly one packaged archive. How that archive is
//! produced is outside this crate: either it already exists on disk
//! ([`PrebuiltArchiveTask`]) or a configured command builds it
//! ([`CommandPackagingTask`]). Both expose the archive as the task's single
//! output file, which is all the aggregation task relies on.

use crate::command::{CommandExecutor, PackagingCommand};
use crate::error::TaskError;
use crate::graph::{Task, TaskContext, TaskId, TaskOutput};
use crate::module_name::ModuleName;
use camino::{Utf8Path, Utf8PathBuf};
use log::{debug, info};
use serde::Serialize;
use std::sync::Arc;

/// Suffix of every module packaging task id.
const PACKAGE_TASK_SUFFIX: &str = "package";

/// Immutable handle naming a module and the task that packages it.
///
/// # Examples
///
/// ```
/// use universal_jar::module::ModuleOutputRef;
/// use universal_jar::module_name::ModuleName;
///
/// let bukkit = ModuleName::try_from("bukkit").expect("valid module name");
/// let reference = ModuleOutputRef::new(bukkit);
/// assert_eq!(reference.task().as_str(), "bukkit:package");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModuleOutputRef {
    module: ModuleName,
    task: TaskId,
}

impl ModuleOutputRef {
    /// Reference the packaging task of `module`.
    #[must_use]
    pub fn new(module: ModuleName) -> Self {
        let task = TaskId::new(format!("{module}:{PACKAGE_TASK_SUFFIX}"));
        Self { module, task }
    }

    /// The referenced module.
    #[must_use]
    pub fn module(&self) -> &ModuleName {
        &self.module
    }

    /// The task producing the module's archive.
    #[must_use]
    pub fn task(&self) -> &TaskId {
        &self.task
    }
}

/// A configured module: its name, archive location, and optional command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModuleSpec {
    name: ModuleName,
    output: Utf8PathBuf,
    command: Option<PackagingCommand>,
}

impl ModuleSpec {
    /// Describe a module whose archive is found at `output`.
    #[must_use]
    pub fn new(name: ModuleName, output: Utf8PathBuf, command: Option<PackagingCommand>) -> Self {
        Self {
            name,
            output,
            command,
        }
    }

    /// The module name.
    #[must_use]
    pub fn name(&self) -> &ModuleName {
        &self.name
    }

    /// Where the module's packaged archive is written.
    #[must_use]
    pub fn output(&self) -> &Utf8Path {
        &self.output
    }

    /// Command that produces the archive, if any.
    #[must_use]
    pub fn command(&self) -> Option<&PackagingCommand> {
        self.command.as_ref()
    }

    /// Reference to this module's packaging task.
    #[must_use]
    pub fn output_ref(&self) -> ModuleOutputRef {
        ModuleOutputRef::new(self.name.clone())
    }

    /// Build the packaging task for this module.
    ///
    /// Commands run in `root` through `executor`; modules without a command
    /// get a [`PrebuiltArchiveTask`].
    #[must_use]
    pub fn packaging_task(
        &self,
        root: &Utf8Path,
        executor: &Arc<dyn CommandExecutor>,
    ) -> Box<dyn Task> {
        let reference = self.output_ref();
        match &self.command {
            Some(command) => Box::new(CommandPackagingTask {
                reference,
                output: self.output.clone(),
                command: command.clone(),
                cwd: root.to_owned(),
                executor: Arc::clone(executor),
            }),
            None => Box::new(PrebuiltArchiveTask {
                reference,
                output: self.output.clone(),
            }),
        }
    }
}

/// Reports an archive that is produced outside the build graph.
#[derive(Debug, Clone)]
pub struct PrebuiltArchiveTask {
    reference: ModuleOutputRef,
    output: Utf8PathBuf,
}

impl PrebuiltArchiveTask {
    /// Task for `module` whose archive already exists at `output`.
    #[must_use]
    pub fn new(module: ModuleName, output: Utf8PathBuf) -> Self {
        Self {
            reference: ModuleOutputRef::new(module),
            output,
        }
    }
}

impl Task for PrebuiltArchiveTask {
    fn id(&self) -> &TaskId {
        self.reference.task()
    }

    fn run(&self, _ctx: &TaskContext<'_>) -> Result<TaskOutput, TaskError> {
        debug!(
            "module {} uses prebuilt archive {}",
            self.reference.module(),
            self.output
        );
        verified_output(&self.output)
    }
}

/// Runs a module's packaging command, then reports its archive.
pub struct CommandPackagingTask {
    reference: ModuleOutputRef,
    output: Utf8PathBuf,
    command: PackagingCommand,
    cwd: Utf8PathBuf,
    executor: Arc<dyn CommandExecutor>,
}

impl Task for CommandPackagingTask {
    fn id(&self) -> &TaskId {
        self.reference.task()
    }

    fn run(&self, _ctx: &TaskContext<'_>) -> Result<TaskOutput, TaskError> {
        let program = self.command.program();
        info!("packaging module {}: {}", self.reference.module(), self.command);

        let output = self
            .executor
            .run(program, self.command.args(), &self.cwd)
            .map_err(|source| TaskError::Spawn {
                program: program.to_owned(),
                source,
            })?;

        if !output.status.success() {
            return Err(TaskError::Command {
                program: program.to_owned(),
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_owned(),
            });
        }

        verified_output(&self.output)
    }
}

fn verified_output(path: &Utf8Path) -> Result<TaskOutput, TaskError> {
    if path.is_file() {
        Ok(TaskOutput::file(path))
    } else {
        Err(TaskError::MissingOutput {
            path: path.to_owned(),
        })
    }
}
