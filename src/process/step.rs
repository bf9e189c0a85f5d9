use std::fmt;

use crate::process::{Kwargs, Task};
use crate::traits::TaskPayload;

/// Leaf of a process tree: one task plus its fully-resolved arguments.
///
/// Steps are created by `Builder::task` and never mutated afterwards.
#[derive(Debug, Clone)]
pub struct Step {
    task: Task,
    description: Option<String>,
    kwargs: Kwargs,
}

impl Step {
    pub(crate) fn new(task: Task, description: Option<String>, kwargs: Kwargs) -> Self {
        Self {
            task,
            description,
            kwargs,
        }
    }

    /// Name the worker resolves the task function by.
    pub fn name(&self) -> &str {
        self.task.name()
    }

    pub fn task(&self) -> &Task {
        &self.task
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn kwargs(&self) -> &Kwargs {
        &self.kwargs
    }

    pub fn payload(&self) -> TaskPayload {
        TaskPayload {
            function_name: self.name().to_string(),
            description: self.description.clone(),
            kwargs: self.kwargs.clone(),
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Step(func={},kwargs={},)",
            self.name(),
            serde_json::Value::Object(self.kwargs.clone())
        )
    }
}
