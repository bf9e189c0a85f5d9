// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for building process trees and compiling them into backend
//! units.

use crate::observability::messages::StructuredLog;
use std::fmt::{Display, Formatter};
use tracing::Span;

/// A definition finished building its process tree.
///
/// # Log Level
/// `info!` - Important operational event
///
/// # Example
/// ```
/// use tasktronaut::observability::messages::compile::ProcessBuilt;
///
/// let msg = ProcessBuilt {
///     definition: "Onboarding",
///     identifier: "3f2a",
///     mode: "sequential",
///     steps: 4,
/// };
///
/// assert_eq!(msg.to_string(), "Built sequential process 'Onboarding' (3f2a) with 4 steps");
/// ```
pub struct ProcessBuilt<'a> {
    pub definition: &'a str,
    pub identifier: &'a str,
    pub mode: &'a str,
    pub steps: usize,
}

impl Display for ProcessBuilt<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Built {} process '{}' ({}) with {} steps",
            self.mode, self.definition, self.identifier, self.steps
        )
    }
}

impl StructuredLog for ProcessBuilt<'_> {
    fn log(&self) {
        tracing::info!(
            definition = self.definition,
            identifier = self.identifier,
            mode = self.mode,
            steps = self.steps,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!(
            "build",
            span_name = name,
            definition = self.definition,
            identifier = self.identifier,
            mode = self.mode,
        )
    }
}

/// One unit was handed to the backend.
///
/// # Log Level
/// `debug!` - Detailed diagnostic information
pub struct UnitEnqueued<'a> {
    pub definition: &'a str,
    pub identifier: &'a str,
    pub unit: &'a str,
    pub step: Option<&'a str>,
    pub dependencies: usize,
}

impl Display for UnitEnqueued<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        match self.step {
            Some(step) => write!(
                f,
                "Enqueued {} unit '{}' of '{}' ({}) with {} dependencies",
                self.unit, step, self.definition, self.identifier, self.dependencies
            ),
            None => write!(
                f,
                "Enqueued {} unit of '{}' ({}) with {} dependencies",
                self.unit, self.definition, self.identifier, self.dependencies
            ),
        }
    }
}

impl StructuredLog for UnitEnqueued<'_> {
    fn log(&self) {
        tracing::debug!(
            definition = self.definition,
            identifier = self.identifier,
            unit = self.unit,
            step = self.step,
            dependencies = self.dependencies,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::debug_span!(
            "enqueue_unit",
            span_name = name,
            definition = self.definition,
            identifier = self.identifier,
            unit = self.unit,
        )
    }
}

/// A process node and its subtree were compiled.
///
/// # Log Level
/// `info!` - Important operational event
pub struct ProcessEnqueued<'a> {
    pub definition: &'a str,
    pub identifier: &'a str,
    pub mode: &'a str,
    pub children: usize,
}

impl Display for ProcessEnqueued<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Enqueued {} process '{}' ({}) with {} children",
            self.mode, self.definition, self.identifier, self.children
        )
    }
}

impl StructuredLog for ProcessEnqueued<'_> {
    fn log(&self) {
        tracing::info!(
            definition = self.definition,
            identifier = self.identifier,
            mode = self.mode,
            children = self.children,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!(
            "enqueue",
            span_name = name,
            definition = self.definition,
            identifier = self.identifier,
            mode = self.mode,
        )
    }
}
