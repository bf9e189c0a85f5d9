// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use thiserror::Error;

/// Failures reported by a job-queue backend, either while enqueueing a unit
/// or while operating on a job handle.
#[derive(Error, Debug)]
pub enum BackendError {
    #[error("Failed to enqueue {unit} unit for process [{identifier}]: {reason}")]
    Enqueue {
        unit: &'static str,
        identifier: String,
        reason: String,
    },

    #[error("Job '{0}' is not known to the backend")]
    UnknownJob(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}
