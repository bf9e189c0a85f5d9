// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for the worker-side task execution protocol.
//!
//! This module contains message types for logging events related to:
//! * Outcome classification of a failed task (permanent, retryable, cancel)
//! * Definitions a worker could not reconstruct
//! * Units an in-process runner had to skip

use crate::observability::messages::StructuredLog;
use std::fmt::{Display, Formatter};
use tracing::Span;

/// A task failed and must not be retried.
///
/// # Log Level
/// `error!` - Failure requiring attention
pub struct TaskFailedPermanently<'a> {
    pub definition: &'a str,
    pub identifier: &'a str,
    pub step: &'a str,
    pub error: &'a dyn std::error::Error,
}

impl Display for TaskFailedPermanently<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Task '{}' of '{}' ({}) failed permanently: {}",
            self.step, self.definition, self.identifier, self.error
        )
    }
}

impl StructuredLog for TaskFailedPermanently<'_> {
    fn log(&self) {
        tracing::error!(
            definition = self.definition,
            identifier = self.identifier,
            step = self.step,
            retryable = false,
            error = %self.error,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::error_span!(
            "task_failure",
            span_name = name,
            definition = self.definition,
            identifier = self.identifier,
            step = self.step,
        )
    }
}

/// A task failed; the backend decides whether to retry it.
///
/// # Log Level
/// `error!` - Failure requiring attention
///
/// # Example
/// ```
/// use tasktronaut::observability::messages::execution::TaskFailedRetryable;
///
/// let error = std::io::Error::new(std::io::ErrorKind::TimedOut, "smtp timeout");
/// let msg = TaskFailedRetryable {
///     definition: "Onboarding",
///     identifier: "3f2a",
///     step: "send_welcome",
///     error: &error,
/// };
///
/// tracing::error!("{}", msg);
/// ```
pub struct TaskFailedRetryable<'a> {
    pub definition: &'a str,
    pub identifier: &'a str,
    pub step: &'a str,
    pub error: &'a dyn std::error::Error,
}

impl Display for TaskFailedRetryable<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Task '{}' of '{}' ({}) failed, eligible for retry: {}",
            self.step, self.definition, self.identifier, self.error
        )
    }
}

impl StructuredLog for TaskFailedRetryable<'_> {
    fn log(&self) {
        tracing::error!(
            definition = self.definition,
            identifier = self.identifier,
            step = self.step,
            retryable = true,
            error = %self.error,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::error_span!(
            "task_failure",
            span_name = name,
            definition = self.definition,
            identifier = self.identifier,
            step = self.step,
        )
    }
}

/// A task asked for the process to be cancelled.
///
/// # Log Level
/// `warn!` - Potential issue or degraded behavior
pub struct TaskCancelled<'a> {
    pub definition: &'a str,
    pub identifier: &'a str,
    pub step: &'a str,
    pub reason: &'a str,
}

impl Display for TaskCancelled<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Task '{}' of '{}' ({}) cancelled the process, pruning dependents: {}",
            self.step, self.definition, self.identifier, self.reason
        )
    }
}

impl StructuredLog for TaskCancelled<'_> {
    fn log(&self) {
        tracing::warn!(
            definition = self.definition,
            identifier = self.identifier,
            step = self.step,
            reason = self.reason,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::warn_span!(
            "task_cancel",
            span_name = name,
            definition = self.definition,
            identifier = self.identifier,
            step = self.step,
        )
    }
}

/// A worker could not reconstruct a definition or one of its tasks.
///
/// # Log Level
/// `error!` - Failure requiring attention
pub struct DefinitionResolutionFailed<'a> {
    pub module: &'a str,
    pub definition: &'a str,
    pub error: &'a dyn std::error::Error,
}

impl Display for DefinitionResolutionFailed<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Failed to resolve definition '{}::{}': {}",
            self.module, self.definition, self.error
        )
    }
}

impl StructuredLog for DefinitionResolutionFailed<'_> {
    fn log(&self) {
        tracing::error!(
            module = self.module,
            definition = self.definition,
            error = %self.error,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::error_span!(
            "resolution",
            span_name = name,
            module = self.module,
            definition = self.definition,
        )
    }
}

/// A queued unit was skipped because one of its dependencies did not finish.
///
/// # Log Level
/// `warn!` - Potential issue or degraded behavior
pub struct UnitBlocked<'a> {
    pub identifier: &'a str,
    pub unit: &'a str,
    pub job: &'a str,
    pub dependency: &'a str,
}

impl Display for UnitBlocked<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Skipping {} unit {} of process ({}): dependency {} did not finish",
            self.unit, self.job, self.identifier, self.dependency
        )
    }
}

impl StructuredLog for UnitBlocked<'_> {
    fn log(&self) {
        tracing::warn!(
            identifier = self.identifier,
            unit = self.unit,
            job = self.job,
            dependency = self.dependency,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::warn_span!(
            "unit",
            span_name = name,
            identifier = self.identifier,
            job = self.job,
        )
    }
}
