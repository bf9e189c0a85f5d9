// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Errors raised while a process tree is being constructed.
//!
//! Build errors are always synchronous and always fatal to the `build()` call
//! that raised them. They never surface during task execution.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum BuildError {
    /// An expected keyword argument is absent from the active kwargs.
    #[error("Argument '{name}' not found.")]
    MissingArgument { name: String },

    /// A keyword argument is present but does not conform to its declared type.
    #[error("Argument '{name}' is expected to be of type '{expected}', found {found}.")]
    TypeMismatch {
        name: String,
        expected: String,
        found: &'static str,
    },

    /// `Builder::task` referenced a task the definition never registered.
    #[error("Task '{task}' is not registered on process definition '{definition}'.")]
    UnknownTask { definition: String, task: String },

    /// User code inside `define_process`, a generator or a transform failed.
    #[error("Process definition failed: {0}")]
    Definition(#[from] anyhow::Error),
}

impl BuildError {
    pub fn missing_argument(name: impl Into<String>) -> Self {
        Self::MissingArgument { name: name.into() }
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, Self::MissingArgument { .. } | Self::TypeMismatch { .. })
    }
}
