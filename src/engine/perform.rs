// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Task execution protocol, run by a worker for every dequeued unit.
//!
//! Each entry point reconstructs a fresh definition through the resolver; no
//! instance survives from build time or from a previous unit. Failures are
//! classified exactly once, here:
//!
//! * `TaskError::NonRetryable` - `on_failed`, returned as [`ExecutionError::NonRetryable`]
//! * `TaskError::Cancel` - job cancelled, dependents pruned, `on_cancelled`,
//!   reported as [`TaskOutcome::Cancelled`] instead of an error
//! * anything else - `on_failed`, returned as [`ExecutionError::Retryable`]
//!
//! Resolution failures are not classified and surface as [`ExecutionError::Resolve`].

use tracing::Instrument;

use crate::errors::{ExecutionError, ResolveError, TaskError};
use crate::engine::DefinitionResolver;
use crate::observability::messages::definition::TaskExecuting;
use crate::observability::messages::execution::{
    DefinitionResolutionFailed, TaskCancelled, TaskFailedPermanently, TaskFailedRetryable,
};
use crate::observability::messages::StructuredLog;
use crate::process::{Context, Kwargs, Task};
use crate::traits::{Job, LoadedDefinition, ProcessDefinition, ProcessRef, TaskPayload, TaskScope};

/// How a task unit ended when no error is reported to the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskOutcome {
    Completed,
    /// The task cancelled the process; its job was cancelled and every
    /// dependent unit deleted.
    Cancelled,
}

/// Run the start unit of a process: invokes `on_started`.
pub fn perform_start(resolver: &dyn DefinitionResolver, process: &ProcessRef) -> Result<(), ExecutionError> {
    let definition = load(resolver, process)?;
    definition.instance().on_started(&process.identifier);
    Ok(())
}

/// Run the completion unit of a process: invokes `on_completed`.
pub fn perform_complete(resolver: &dyn DefinitionResolver, process: &ProcessRef) -> Result<(), ExecutionError> {
    let definition = load(resolver, process)?;
    definition.instance().on_completed(&process.identifier);
    Ok(())
}

/// Run one task unit.
///
/// `job` is the queue's handle of this very unit; it is only touched when the
/// task cancels the process.
pub async fn perform_task<J: Job>(
    resolver: &dyn DefinitionResolver,
    process: &ProcessRef,
    task: &TaskPayload,
    job: &J,
) -> Result<TaskOutcome, ExecutionError> {
    let definition = load(resolver, process)?;
    let function = definition
        .task(&task.function_name)
        .cloned()
        .ok_or_else(|| ResolveError::UnknownTask {
            definition: definition.qualified_name(),
            task: task.function_name.clone(),
        })
        .map_err(|error| resolution_failed(process, error))?;

    let scope = TaskScope {
        identifier: &process.identifier,
        step: &task.function_name,
        description: task.description.as_deref(),
    };

    let span = TaskExecuting {
        definition: definition.name(),
        identifier: scope.identifier,
        step: scope.step,
        description: scope.description,
    }
    .span("perform_task");

    let instance = definition.instance();
    let result = span.in_scope(|| run_scoped(instance, &scope, &function, &task.kwargs));

    classify(instance, &scope, result, job).instrument(span).await
}

/// `before_task`, the task, then `after_task` only if the task succeeded.
fn run_scoped(
    definition: &dyn ProcessDefinition,
    scope: &TaskScope<'_>,
    task: &Task,
    kwargs: &Kwargs,
) -> Result<(), TaskError> {
    let mut context = Context::new();
    definition.before_task(scope, &mut context)?;
    task.call(&mut context, kwargs)?;
    definition.after_task(scope, &mut context)
}

async fn classify<J: Job>(
    definition: &dyn ProcessDefinition,
    scope: &TaskScope<'_>,
    result: Result<(), TaskError>,
    job: &J,
) -> Result<TaskOutcome, ExecutionError> {
    let error = match result {
        Ok(()) => return Ok(TaskOutcome::Completed),
        Err(error) => error,
    };

    match error {
        TaskError::Cancel { reason } => {
            TaskCancelled {
                definition: definition.name(),
                identifier: scope.identifier,
                step: scope.step,
                reason: &reason,
            }
            .log();
            job.cancel().await?;
            job.delete_dependents().await?;
            definition.on_cancelled(scope.identifier);
            Ok(TaskOutcome::Cancelled)
        }
        error @ TaskError::NonRetryable(_) => {
            TaskFailedPermanently {
                definition: definition.name(),
                identifier: scope.identifier,
                step: scope.step,
                error: &error,
            }
            .log();
            definition.on_failed(scope.identifier, scope.step, &error);
            Err(ExecutionError::NonRetryable {
                task: scope.step.to_string(),
                source: error,
            })
        }
        error => {
            TaskFailedRetryable {
                definition: definition.name(),
                identifier: scope.identifier,
                step: scope.step,
                error: &error,
            }
            .log();
            definition.on_failed(scope.identifier, scope.step, &error);
            Err(ExecutionError::Retryable {
                task: scope.step.to_string(),
                source: error,
            })
        }
    }
}

fn load(resolver: &dyn DefinitionResolver, process: &ProcessRef) -> Result<LoadedDefinition, ExecutionError> {
    resolver
        .resolve(&process.module, &process.definition)
        .map_err(|error| resolution_failed(process, error))
}

fn resolution_failed(process: &ProcessRef, error: ResolveError) -> ExecutionError {
    DefinitionResolutionFailed {
        module: &process.module,
        definition: &process.definition,
        error: &error,
    }
    .log();
    ExecutionError::Resolve(error)
}
