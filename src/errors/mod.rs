// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

mod backend;
mod build;
mod config;
mod execution;
mod resolve;
mod task;

pub use backend::BackendError;
pub use build::BuildError;
pub use config::ConfigError;
pub use execution::ExecutionError;
pub use resolve::ResolveError;
pub use task::TaskError;
