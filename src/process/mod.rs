// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Process trees: construction and compilation.
//!
//! A [`ProcessDefinition`](crate::traits::ProcessDefinition) populates a tree
//! of [`Process`] nodes and [`Step`] leaves through a [`Builder`]. The tree is
//! then compiled into backend units by [`Process::enqueue`].
//!
//! ```text
//! build::<D>() → Builder populates Process tree → Process::enqueue(backend) → job graph
//! ```

mod arguments;
mod builder;
mod compile;
mod context;
mod kwargs;
mod node;
mod step;
mod task;

pub use arguments::ArgType;
pub use builder::{build, build_with, new_identifier, BuildArgs, Builder};
pub use compile::EnqueueFuture;
pub use context::Context;
pub use kwargs::{Kwargs, Options, TaskArgs};
pub use node::{Node, Process};
pub use step::Step;
pub use task::{Task, TaskFn, TaskRegistry};
