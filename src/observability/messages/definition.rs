// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for the default lifecycle hooks of a process definition.

use crate::observability::messages::StructuredLog;
use std::fmt::{Display, Formatter};
use tracing::Span;

/// A process received its start unit.
///
/// # Log Level
/// `info!` - Important operational event
pub struct ProcessStarted<'a> {
    pub definition: &'a str,
    pub identifier: &'a str,
}

impl Display for ProcessStarted<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Process '{}' ({}) started", self.definition, self.identifier)
    }
}

impl StructuredLog for ProcessStarted<'_> {
    fn log(&self) {
        tracing::info!(
            definition = self.definition,
            identifier = self.identifier,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!(
            "process",
            span_name = name,
            definition = self.definition,
            identifier = self.identifier,
        )
    }
}

/// A task is about to run.
///
/// # Log Level
/// `info!` - Important operational event
///
/// # Example
/// ```
/// use tasktronaut::observability::messages::definition::TaskExecuting;
///
/// let msg = TaskExecuting {
///     definition: "Onboarding",
///     identifier: "3f2a",
///     step: "send_welcome",
///     description: Some("Send the welcome mail"),
/// };
///
/// assert_eq!(
///     msg.to_string(),
///     "Executing 'send_welcome' of 'Onboarding' (3f2a): Send the welcome mail"
/// );
/// ```
pub struct TaskExecuting<'a> {
    pub definition: &'a str,
    pub identifier: &'a str,
    pub step: &'a str,
    pub description: Option<&'a str>,
}

impl Display for TaskExecuting<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Executing '{}' of '{}' ({})",
            self.step, self.definition, self.identifier
        )?;
        if let Some(description) = self.description {
            write!(f, ": {}", description)?;
        }
        Ok(())
    }
}

impl StructuredLog for TaskExecuting<'_> {
    fn log(&self) {
        tracing::info!(
            definition = self.definition,
            identifier = self.identifier,
            step = self.step,
            description = self.description,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!(
            "task",
            span_name = name,
            definition = self.definition,
            identifier = self.identifier,
            step = self.step,
        )
    }
}

/// A task returned successfully.
///
/// # Log Level
/// `info!` - Important operational event
pub struct TaskCompleted<'a> {
    pub definition: &'a str,
    pub identifier: &'a str,
    pub step: &'a str,
    pub description: Option<&'a str>,
}

impl Display for TaskCompleted<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Completed '{}' of '{}' ({})",
            self.step, self.definition, self.identifier
        )?;
        if let Some(description) = self.description {
            write!(f, ": {}", description)?;
        }
        Ok(())
    }
}

impl StructuredLog for TaskCompleted<'_> {
    fn log(&self) {
        tracing::info!(
            definition = self.definition,
            identifier = self.identifier,
            step = self.step,
            description = self.description,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!(
            "task",
            span_name = name,
            definition = self.definition,
            identifier = self.identifier,
            step = self.step,
        )
    }
}

/// A process reached its completion unit.
///
/// # Log Level
/// `info!` - Important operational event
pub struct ProcessCompleted<'a> {
    pub definition: &'a str,
    pub identifier: &'a str,
}

impl Display for ProcessCompleted<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Process '{}' ({}) completed", self.definition, self.identifier)
    }
}

impl StructuredLog for ProcessCompleted<'_> {
    fn log(&self) {
        tracing::info!(
            definition = self.definition,
            identifier = self.identifier,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!(
            "process",
            span_name = name,
            definition = self.definition,
            identifier = self.identifier,
        )
    }
}

/// A task of the process failed.
///
/// # Log Level
/// `error!` - Failure requiring attention
///
/// # Example
/// ```
/// use tasktronaut::errors::TaskError;
/// use tasktronaut::observability::messages::definition::ProcessFailed;
///
/// let error = TaskError::non_retryable(anyhow::anyhow!("disk full"));
/// let msg = ProcessFailed {
///     definition: "Onboarding",
///     identifier: "3f2a",
///     step: "write_report",
///     error: &error,
/// };
///
/// assert!(msg.to_string().ends_with("disk full"));
/// ```
pub struct ProcessFailed<'a> {
    pub definition: &'a str,
    pub identifier: &'a str,
    pub step: &'a str,
    pub error: &'a dyn std::error::Error,
}

impl Display for ProcessFailed<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Process '{}' ({}) failed in '{}': {}",
            self.definition, self.identifier, self.step, self.error
        )
    }
}

impl StructuredLog for ProcessFailed<'_> {
    fn log(&self) {
        tracing::error!(
            definition = self.definition,
            identifier = self.identifier,
            step = self.step,
            error = %self.error,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::error_span!(
            "process",
            span_name = name,
            definition = self.definition,
            identifier = self.identifier,
            step = self.step,
        )
    }
}

/// A task cancelled the process.
///
/// # Log Level
/// `warn!` - Potential issue or degraded behavior
pub struct ProcessCancelled<'a> {
    pub definition: &'a str,
    pub identifier: &'a str,
}

impl Display for ProcessCancelled<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Process '{}' ({}) cancelled", self.definition, self.identifier)
    }
}

impl StructuredLog for ProcessCancelled<'_> {
    fn log(&self) {
        tracing::warn!(
            definition = self.definition,
            identifier = self.identifier,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::warn_span!(
            "process",
            span_name = name,
            definition = self.definition,
            identifier = self.identifier,
        )
    }
}
