// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

pub mod backends;   // in-memory and test backends
pub mod config;     // host configuration
pub mod demo;       // sample definitions
pub mod engine;     // worker-side execution protocol
pub mod errors;     // error handling
pub mod observability;
pub mod process;    // tree building and compilation
pub mod traits;     // definition and backend abstractions

// Re-exported for the `kwargs!` macro.
pub use serde_json;
