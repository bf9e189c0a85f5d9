// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Conditions a task (or its around-task hooks) may raise.
//!
//! The variant decides how the execution protocol reacts:
//!
//! * `NonRetryable` - permanent failure, `on_failed` runs, the backend must not retry
//! * `Cancel` - the job is cancelled and its dependents pruned, `on_cancelled` runs,
//!   the error itself is swallowed
//! * `Retryable` - any other failure, `on_failed` runs, the backend's retry policy applies
//!
//! Any `anyhow::Error` converts into `Retryable`, so plain `?` inside a task
//! produces a transient failure.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum TaskError {
    #[error("non-retryable failure: {0}")]
    NonRetryable(#[source] anyhow::Error),

    #[error("process cancelled: {reason}")]
    Cancel { reason: String },

    #[error("{0}")]
    Retryable(#[from] anyhow::Error),
}

impl TaskError {
    pub fn non_retryable(error: impl Into<anyhow::Error>) -> Self {
        Self::NonRetryable(error.into())
    }

    pub fn cancel(reason: impl Into<String>) -> Self {
        Self::Cancel {
            reason: reason.into(),
        }
    }

    pub fn retryable(error: impl Into<anyhow::Error>) -> Self {
        Self::Retryable(error.into())
    }

    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Retryable(_))
    }

    pub fn is_cancel(&self) -> bool {
        matches!(self, Self::Cancel { .. })
    }
}
