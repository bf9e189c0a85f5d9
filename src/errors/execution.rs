// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use thiserror::Error;

use super::{BackendError, ResolveError, TaskError};

/// Outcome a worker reports back to the backend when a unit did not finish.
///
/// Cancellation never shows up here: a cancelled task is reported as a
/// successful unit and its dependents are pruned instead.
#[derive(Error, Debug)]
pub enum ExecutionError {
    /// The definition or task could not be reconstructed on the worker.
    #[error("Failed to resolve unit: {0}")]
    Resolve(#[from] ResolveError),

    /// The task failed permanently; the backend must not retry it.
    #[error("Task '{task}' failed permanently: {source}")]
    NonRetryable {
        task: String,
        #[source]
        source: TaskError,
    },

    /// The task failed; the backend's own retry policy decides what happens next.
    #[error("Task '{task}' failed: {source}")]
    Retryable {
        task: String,
        #[source]
        source: TaskError,
    },

    #[error(transparent)]
    Backend(#[from] BackendError),
}

impl ExecutionError {
    pub fn is_retryable(&self) -> bool {
        matches!(self, ExecutionError::Retryable { .. })
    }

    /// The task error behind a classified failure, if any.
    pub fn task_error(&self) -> Option<&TaskError> {
        match self {
            ExecutionError::NonRetryable { source, .. } | ExecutionError::Retryable { source, .. } => {
                Some(source)
            }
            _ => None,
        }
    }
}
