// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Errors for reconstructing a process definition or one of its tasks on the
//! worker side. These are configuration/integrity failures: they are surfaced
//! immediately and never classified as retryable or cancellable.

use std::error::Error;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolveError {
    /// No constructor is registered for the qualified definition name
    UnknownDefinition { definition: String },

    /// The definition is registered but excluded by the configured allow-list
    NotAllowed { definition: String },

    /// The definition does not register a task with this name
    UnknownTask { definition: String, task: String },
}

impl fmt::Display for ResolveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResolveError::UnknownDefinition { definition } => {
                write!(f, "Process definition '{}' is not registered", definition)
            }
            ResolveError::NotAllowed { definition } => {
                write!(
                    f,
                    "Process definition '{}' is not in the allowed definitions list",
                    definition
                )
            }
            ResolveError::UnknownTask { definition, task } => {
                write!(
                    f,
                    "Task '{}' is not registered on process definition '{}'",
                    task, definition
                )
            }
        }
    }
}

impl Error for ResolveError {}
