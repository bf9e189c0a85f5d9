// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::errors::TaskError;
use crate::process::{Context, Kwargs};

/// Signature every task function has.
pub type TaskFn = Arc<dyn Fn(&mut Context, &Kwargs) -> Result<(), TaskError> + Send + Sync>;

/// A named task function with an optional attached description.
///
/// The attached description is consulted by `Builder::task` when the caller
/// does not pass one explicitly.
#[derive(Clone)]
pub struct Task {
    name: String,
    description: Option<String>,
    func: TaskFn,
}

impl Task {
    pub fn new<F>(name: impl Into<String>, func: F) -> Self
    where
        F: Fn(&mut Context, &Kwargs) -> Result<(), TaskError> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            description: None,
            func: Arc::new(func),
        }
    }

    pub fn described(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn call(&self, context: &mut Context, kwargs: &Kwargs) -> Result<(), TaskError> {
        (self.func)(context, kwargs)
    }
}

impl fmt::Debug for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Task")
            .field("name", &self.name)
            .field("description", &self.description)
            .finish()
    }
}

/// Tasks a definition can schedule, keyed by name.
///
/// Built once per loaded definition. Registering a second task under an
/// existing name replaces the first one.
#[derive(Clone, Default)]
pub struct TaskRegistry(HashMap<String, Task>);

impl TaskRegistry {
    pub fn new() -> Self {
        Self(HashMap::new())
    }

    pub fn register(&mut self, task: Task) -> &mut Self {
        if self.0.contains_key(task.name()) {
            tracing::debug!(task = task.name(), "Replacing previously registered task");
        }
        self.0.insert(task.name.clone(), task);
        self
    }

    pub fn get(&self, name: &str) -> Option<&Task> {
        self.0.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    /// Registered task names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.0.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for TaskRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TaskRegistry")
            .field("task_count", &self.0.len())
            .field("tasks", &self.names())
            .finish()
    }
}
