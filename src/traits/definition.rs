use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::errors::{BuildError, TaskError};
use crate::observability::messages::definition::*;
use crate::observability::messages::StructuredLog;
use crate::process::{BuildArgs, Builder, Context, Process, Task, TaskRegistry};

/// How the children of a process node are scheduled relative to each other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExecutionMode {
    /// Children run one after another, each depending on its predecessor.
    #[default]
    Sequential,
    /// Children fan out from a shared start unit and join on completion.
    Concurrent,
}

impl ExecutionMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExecutionMode::Sequential => "sequential",
            ExecutionMode::Concurrent => "concurrent",
        }
    }
}

/// What the around-task hooks know about the unit being executed.
#[derive(Debug, Clone, Copy)]
pub struct TaskScope<'a> {
    pub identifier: &'a str,
    pub step: &'a str,
    pub description: Option<&'a str>,
}

/// A user-authored process blueprint.
///
/// A definition names its tasks, declares how its tree is built and reacts to
/// lifecycle events. A fresh instance is created for every build and, on the
/// worker side, for every executed unit; nothing but the identifier and the
/// kwargs travels between those instances.
///
/// The around-task hook is split into `before_task` and `after_task`.
/// `after_task` only runs when the task itself returned `Ok`.
pub trait ProcessDefinition: Send + Sync {
    /// Module (or crate path) the definition lives in. Together with `name`
    /// this is what a worker uses to reconstruct the definition.
    fn module(&self) -> &'static str;

    fn name(&self) -> &'static str;

    fn description(&self) -> Option<&str> {
        None
    }

    fn execution_mode(&self) -> ExecutionMode {
        ExecutionMode::Sequential
    }

    /// Register every task this definition can schedule.
    fn register_tasks(&self, tasks: &mut TaskRegistry);

    /// Construction entry point, run once per build against a root builder.
    fn define_process(&self, builder: &mut Builder<'_>) -> Result<(), BuildError>;

    fn on_started(&self, identifier: &str) {
        ProcessStarted {
            definition: self.name(),
            identifier,
        }
        .log();
    }

    fn before_task(&self, scope: &TaskScope<'_>, _context: &mut Context) -> Result<(), TaskError> {
        TaskExecuting {
            definition: self.name(),
            identifier: scope.identifier,
            step: scope.step,
            description: scope.description,
        }
        .log();
        Ok(())
    }

    fn after_task(&self, scope: &TaskScope<'_>, _context: &mut Context) -> Result<(), TaskError> {
        TaskCompleted {
            definition: self.name(),
            identifier: scope.identifier,
            step: scope.step,
            description: scope.description,
        }
        .log();
        Ok(())
    }

    fn on_completed(&self, identifier: &str) {
        ProcessCompleted {
            definition: self.name(),
            identifier,
        }
        .log();
    }

    fn on_failed(&self, identifier: &str, step: &str, error: &TaskError) {
        ProcessFailed {
            definition: self.name(),
            identifier,
            step,
            error,
        }
        .log();
    }

    fn on_cancelled(&self, identifier: &str) {
        ProcessCancelled {
            definition: self.name(),
            identifier,
        }
        .log();
    }

    /// Build a fresh process tree for this definition.
    fn build(args: BuildArgs) -> Result<Process, BuildError>
    where
        Self: Sized + Default + 'static,
    {
        crate::process::build::<Self>(args)
    }
}

/// A definition instance paired with its task registry.
///
/// The registry is collected once when the definition is loaded, so task
/// lookups by name never go back to the definition.
#[derive(Clone)]
pub struct LoadedDefinition {
    instance: Arc<dyn ProcessDefinition>,
    tasks: Arc<TaskRegistry>,
}

impl LoadedDefinition {
    pub fn new<D: ProcessDefinition + 'static>(definition: D) -> Self {
        Self::from_boxed(Box::new(definition))
    }

    pub fn from_boxed(definition: Box<dyn ProcessDefinition>) -> Self {
        let mut tasks = TaskRegistry::new();
        definition.register_tasks(&mut tasks);
        Self {
            instance: Arc::from(definition),
            tasks: Arc::new(tasks),
        }
    }

    pub fn instance(&self) -> &dyn ProcessDefinition {
        &*self.instance
    }

    pub fn tasks(&self) -> &TaskRegistry {
        &self.tasks
    }

    pub fn task(&self, name: &str) -> Option<&Task> {
        self.tasks.get(name)
    }

    pub fn module(&self) -> &'static str {
        self.instance.module()
    }

    pub fn name(&self) -> &'static str {
        self.instance.name()
    }

    /// `module::name`, the key definitions are registered and allow-listed under.
    pub fn qualified_name(&self) -> String {
        crate::engine::qualified_name(self.module(), self.name())
    }

    pub fn execution_mode(&self) -> ExecutionMode {
        self.instance.execution_mode()
    }
}

impl fmt::Debug for LoadedDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoadedDefinition")
            .field("definition", &self.qualified_name())
            .field("execution_mode", &self.execution_mode())
            .field("tasks", &self.tasks.names())
            .finish()
    }
}
