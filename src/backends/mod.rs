// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Backend implementations for tasktronaut.
//!
//! A backend receives the units a process tree compiles to and schedules
//! them. Production deployments plug in their own job queue by implementing
//! [`crate::traits::Backend`]; this module ships the pieces tasktronaut itself
//! needs.
//!
//! # Available Backends
//!
//! ## Memory Backend
//! In-process recording queue:
//! - **Inspection**: every unit with its dependencies, in enqueue order
//! - **Execution**: `run_pending` performs queued units front to back
//! - **Cancellation**: jobs support `cancel` and transitive `delete_dependents`
//! - **Use Case**: development, dry runs, end-to-end tests
//!
//! ## Stub Backend (Test-Only)
//! Testing utilities (only available in test builds):
//! - **Definitions**: `Methods`, `SimpleConcurrent`, `Recording`, `RecordingChild`
//! - **HookRecorder**: collects lifecycle hook and task events
//! - **RecordingJob**: counts `cancel` and `delete_dependents` calls
//! - **Note**: NOT available in production builds
//!
//! # Example
//!
//! ```rust
//! use tasktronaut::backends::memory::InMemoryBackend;
//! use tasktronaut::demo::Onboarding;
//! use tasktronaut::process::BuildArgs;
//! use tasktronaut::traits::ProcessDefinition;
//!
//! # tokio::runtime::Runtime::new().unwrap().block_on(async {
//! let process = Onboarding::build(BuildArgs::new().arg("name", "ada")).unwrap();
//! let backend = InMemoryBackend::new();
//! process.enqueue(&backend).await.unwrap();
//! assert!(!backend.is_empty().await);
//! # });
//! ```

pub mod memory;
#[cfg(test)]
pub mod stub;
