// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Centralized message types for structured logging.
//!
//! Every diagnostic and operational event tasktronaut emits goes through one of
//! the structs below. Each implements `Display` for the human-readable line and
//! [`StructuredLog`] to emit it at the right level with its fields attached.
//!
//! # Organization
//!
//! * `definition` - lifecycle events of a process definition (default hooks)
//! * `execution` - task outcome classification on the worker side
//! * `compile` - tree construction and compilation into backend units
//!
//! # Usage Pattern
//!
//! ```rust
//! use tasktronaut::observability::messages::definition::ProcessStarted;
//! use tasktronaut::observability::messages::StructuredLog;
//!
//! let msg = ProcessStarted {
//!     definition: "Onboarding",
//!     identifier: "3f2a",
//! };
//!
//! msg.log();
//! assert_eq!(msg.to_string(), "Process 'Onboarding' (3f2a) started");
//! ```

use tracing::Span;

pub mod compile;
pub mod definition;
pub mod execution;

/// A message that knows its own log level and structured fields.
pub trait StructuredLog {
    /// Emit the message as a tracing event.
    fn log(&self);

    /// Open a span carrying the message's fields.
    fn span(&self, name: &str) -> Span;
}
