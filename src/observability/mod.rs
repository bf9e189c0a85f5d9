// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Observability module for structured logging and tracing.
//!
//! Message types follow a struct-based pattern with a `Display` implementation
//! so that log lines are not scattered as magic strings through the codebase.
//!
//! # Architecture
//!
//! Messages are organized by subsystem:
//! * `messages::definition` - default lifecycle hook events
//! * `messages::execution` - worker-side outcome classification
//! * `messages::compile` - tree construction and backend compilation
//!
//! # Usage
//!
//! ```rust
//! use tasktronaut::observability::messages::execution::TaskFailedPermanently;
//!
//! let error = std::io::Error::new(std::io::ErrorKind::Other, "test error");
//! let msg = TaskFailedPermanently {
//!     definition: "Onboarding",
//!     identifier: "3f2a",
//!     step: "send_welcome",
//!     error: &error,
//! };
//!
//! tracing::error!("{}", msg);
//! ```

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::LoggingConfig;

pub mod messages;

/// Install the global tracing subscriber.
///
/// `RUST_LOG` takes precedence over the configured filter. Returns an error if
/// the filter does not parse or a global subscriber is already installed.
pub fn init_tracing(config: &LoggingConfig) -> anyhow::Result<()> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(&config.filter)?,
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(config.with_target))
        .try_init()?;

    Ok(())
}
