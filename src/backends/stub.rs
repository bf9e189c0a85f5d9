// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::sync::{Arc, Mutex};

use anyhow::anyhow;
use async_trait::async_trait;
use serde_json::Value;

use crate::errors::{BackendError, BuildError, TaskError};
use crate::process::{Builder, Context, Kwargs, Process, Task, TaskRegistry};
use crate::traits::{ExecutionMode, Job, LoadedDefinition, ProcessDefinition, TaskScope};

/// Identifier used for hand-built trees in tests.
pub const STUB_IDENTIFIER: &str = "foo";

fn noop(_: &mut Context, _: &Kwargs) -> Result<(), TaskError> {
    Ok(())
}

/// A definition with a handful of no-op tasks, one of them described.
#[derive(Debug, Default)]
pub struct Methods;

impl Methods {
    pub const MODULE: &'static str = module_path!();
}

impl ProcessDefinition for Methods {
    fn module(&self) -> &'static str {
        Self::MODULE
    }

    fn name(&self) -> &'static str {
        "Methods"
    }

    fn register_tasks(&self, tasks: &mut TaskRegistry) {
        tasks
            .register(Task::new("foo", noop))
            .register(Task::new("bar", noop))
            .register(Task::new("baz", noop))
            .register(Task::new("qux", noop))
            .register(Task::new("foo_task", noop).described("My Foo Task"));
    }

    fn define_process(&self, builder: &mut Builder<'_>) -> Result<(), BuildError> {
        builder.task("foo")?;
        builder.task("bar")?;
        builder.task("baz")
    }
}

/// Empty root node over [`Methods`], for driving a `Builder` by hand.
pub fn methods_process(mode: ExecutionMode) -> Process {
    Process::new(mode, STUB_IDENTIFIER.to_string(), LoadedDefinition::new(Methods))
}

#[derive(Debug, Default)]
pub struct SimpleConcurrent;

impl ProcessDefinition for SimpleConcurrent {
    fn module(&self) -> &'static str {
        Methods::MODULE
    }

    fn name(&self) -> &'static str {
        "SimpleConcurrent"
    }

    fn execution_mode(&self) -> ExecutionMode {
        ExecutionMode::Concurrent
    }

    fn register_tasks(&self, tasks: &mut TaskRegistry) {
        Methods.register_tasks(tasks);
    }

    fn define_process(&self, builder: &mut Builder<'_>) -> Result<(), BuildError> {
        builder.task("foo")?;
        builder.task("bar")
    }
}

/// Shared log of hook and task events, cloned into every definition instance
/// a resolver hands out.
#[derive(Debug, Clone, Default)]
pub struct HookRecorder(Arc<Mutex<Vec<String>>>);

impl HookRecorder {
    pub fn record(&self, event: impl Into<String>) {
        self.0.lock().unwrap().push(event.into());
    }

    pub fn events(&self) -> Vec<String> {
        self.0.lock().unwrap().clone()
    }

    /// Number of events starting with `prefix`.
    pub fn count(&self, prefix: &str) -> usize {
        self.0
            .lock()
            .unwrap()
            .iter()
            .filter(|event| event.starts_with(prefix))
            .count()
    }
}

/// A definition whose hooks and tasks report to a [`HookRecorder`].
///
/// The tree it builds depends on the kwargs and options:
/// * `items` (kwarg, list) - one `record_kwargs` step per item, via `each`
/// * `child` (option) - embed a [`RecordingChild`] sub-process
/// * `cancel` / `fail` (options) - add a cancelling or permanently failing step
#[derive(Debug, Clone, Default)]
pub struct Recording {
    recorder: HookRecorder,
    fail_before: bool,
}

impl Recording {
    pub const MODULE: &'static str = module_path!();
    pub const NAME: &'static str = "Recording";

    pub fn new(recorder: HookRecorder) -> Self {
        Self {
            recorder,
            fail_before: false,
        }
    }

    /// Make `before_task` fail with a retryable error.
    pub fn failing_before(mut self) -> Self {
        self.fail_before = true;
        self
    }
}

impl ProcessDefinition for Recording {
    fn module(&self) -> &'static str {
        Self::MODULE
    }

    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn description(&self) -> Option<&str> {
        Some("recorded")
    }

    fn register_tasks(&self, tasks: &mut TaskRegistry) {
        let recorder = self.recorder.clone();
        tasks.register(Task::new("succeed", move |_, _| {
            recorder.record("task:succeed");
            Ok(())
        }));

        tasks.register(Task::new("fail_permanently", |_, _| {
            Err(TaskError::non_retryable(anyhow!("invalid input")))
        }));

        tasks.register(Task::new("fail_transiently", |_, _| Err(anyhow!("timeout").into())));

        tasks.register(Task::new("cancel", |_, _| Err(TaskError::cancel("no longer needed"))));

        let recorder = self.recorder.clone();
        tasks.register(Task::new("count_context", move |context: &mut Context, _: &Kwargs| {
            context.insert("seen", true);
            recorder.record(format!("context:{}", context.len()));
            Ok(())
        }));

        let recorder = self.recorder.clone();
        tasks.register(Task::new("record_span", move |_, _| {
            let current = tracing::Span::current();
            let name = current.metadata().map(|meta| meta.name()).unwrap_or("none");
            recorder.record(format!("span:{}", name));
            Ok(())
        }));

        let recorder = self.recorder.clone();
        tasks.register(Task::new("record_kwargs", move |_: &mut Context, kwargs: &Kwargs| {
            recorder.record(format!("kwargs:{}", Value::Object(kwargs.clone())));
            Ok(())
        }));
    }

    fn define_process(&self, builder: &mut Builder<'_>) -> Result<(), BuildError> {
        builder.task("succeed")?;

        builder.each(
            |kwargs| {
                let items = kwargs
                    .get("items")
                    .and_then(Value::as_array)
                    .cloned()
                    .unwrap_or_default();
                Ok(items.into_iter().map(|item| crate::kwargs! { "item" => item }))
            },
            None,
            |b| b.task("record_kwargs"),
        )?;

        if builder.option_as::<bool>("child").unwrap_or(false) {
            builder.sub_process::<RecordingChild>(Some("child"))?;
        }
        if builder.option_as::<bool>("cancel").unwrap_or(false) {
            builder.task("cancel")?;
        }
        if builder.option_as::<bool>("fail").unwrap_or(false) {
            builder.task("fail_permanently")?;
        }

        builder.task("succeed")
    }

    fn on_started(&self, _identifier: &str) {
        self.recorder.record("started");
    }

    fn before_task(&self, scope: &TaskScope<'_>, _context: &mut Context) -> Result<(), TaskError> {
        if self.fail_before {
            return Err(anyhow!("before hook failed").into());
        }
        self.recorder.record(format!("before:{}", scope.step));
        Ok(())
    }

    fn after_task(&self, scope: &TaskScope<'_>, _context: &mut Context) -> Result<(), TaskError> {
        self.recorder.record(format!("after:{}", scope.step));
        Ok(())
    }

    fn on_completed(&self, _identifier: &str) {
        self.recorder.record("completed");
    }

    fn on_failed(&self, _identifier: &str, step: &str, _error: &TaskError) {
        self.recorder.record(format!("failed:{}", step));
    }

    fn on_cancelled(&self, _identifier: &str) {
        self.recorder.record("cancelled");
    }
}

/// Concurrent sub-process of [`Recording`]; its events are prefixed `child:`.
#[derive(Debug, Clone, Default)]
pub struct RecordingChild {
    recorder: HookRecorder,
}

impl RecordingChild {
    pub const NAME: &'static str = "RecordingChild";

    pub fn new(recorder: HookRecorder) -> Self {
        Self { recorder }
    }
}

impl ProcessDefinition for RecordingChild {
    fn module(&self) -> &'static str {
        Recording::MODULE
    }

    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn execution_mode(&self) -> ExecutionMode {
        ExecutionMode::Concurrent
    }

    fn register_tasks(&self, tasks: &mut TaskRegistry) {
        for name in ["ping", "pong"] {
            let recorder = self.recorder.clone();
            tasks.register(Task::new(name, move |_, _| {
                recorder.record(format!("child:task:{}", name));
                Ok(())
            }));
        }
    }

    fn define_process(&self, builder: &mut Builder<'_>) -> Result<(), BuildError> {
        builder.task("ping")?;
        builder.task("pong")
    }

    fn on_started(&self, _identifier: &str) {
        self.recorder.record("child:started");
    }

    fn on_completed(&self, _identifier: &str) {
        self.recorder.record("child:completed");
    }
}

/// Job handle that only records which capabilities were used, in order.
#[derive(Debug, Clone, Default)]
pub struct RecordingJob {
    calls: Arc<Mutex<Vec<&'static str>>>,
}

impl RecordingJob {
    pub fn calls(&self) -> Vec<&'static str> {
        self.calls.lock().unwrap().clone()
    }

    pub fn cancel_calls(&self) -> usize {
        self.calls().iter().filter(|call| **call == "cancel").count()
    }

    pub fn delete_dependents_calls(&self) -> usize {
        self.calls()
            .iter()
            .filter(|call| **call == "delete_dependents")
            .count()
    }
}

#[async_trait]
impl Job for RecordingJob {
    async fn cancel(&self) -> Result<(), BackendError> {
        self.calls.lock().unwrap().push("cancel");
        Ok(())
    }

    async fn delete_dependents(&self) -> Result<(), BackendError> {
        self.calls.lock().unwrap().push("delete_dependents");
        Ok(())
    }
}
