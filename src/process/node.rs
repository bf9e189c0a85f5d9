// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::fmt;

use crate::process::Step;
use crate::traits::{ExecutionMode, LoadedDefinition, ProcessRef};

/// A child of a process node. The set of variants is closed: a leaf step, or
/// a nested sequential/concurrent process.
#[derive(Debug, Clone)]
pub enum Node {
    Step(Step),
    Process(Process),
}

impl Node {
    pub fn is_process(&self) -> bool {
        matches!(self, Node::Process(_))
    }

    pub fn as_step(&self) -> Option<&Step> {
        match self {
            Node::Step(step) => Some(step),
            Node::Process(_) => None,
        }
    }

    pub fn as_process(&self) -> Option<&Process> {
        match self {
            Node::Process(process) => Some(process),
            Node::Step(_) => None,
        }
    }
}

/// A composite node of a process tree.
///
/// Every node spawned by one `build()` carries the same identifier. Nodes own
/// their children and never point back at their parent.
#[derive(Debug, Clone)]
pub struct Process {
    mode: ExecutionMode,
    identifier: String,
    definition: LoadedDefinition,
    children: Vec<Node>,
}

impl Process {
    pub(crate) fn new(mode: ExecutionMode, identifier: String, definition: LoadedDefinition) -> Self {
        Self {
            mode,
            identifier,
            definition,
            children: Vec::new(),
        }
    }

    pub fn mode(&self) -> ExecutionMode {
        self.mode
    }

    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    pub fn definition(&self) -> &LoadedDefinition {
        &self.definition
    }

    pub fn children(&self) -> &[Node] {
        &self.children
    }

    pub fn len(&self) -> usize {
        self.children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    /// All steps of the tree, depth-first in registration order.
    pub fn steps(&self) -> Vec<&Step> {
        let mut steps = Vec::new();
        self.collect_steps(&mut steps);
        steps
    }

    fn collect_steps<'a>(&'a self, steps: &mut Vec<&'a Step>) {
        for child in &self.children {
            match child {
                Node::Step(step) => steps.push(step),
                Node::Process(process) => process.collect_steps(steps),
            }
        }
    }

    /// The payload a worker needs to reconstruct this node's definition.
    pub fn process_ref(&self) -> ProcessRef {
        ProcessRef {
            identifier: self.identifier.clone(),
            module: self.definition.module().to_string(),
            definition: self.definition.name().to_string(),
        }
    }

    pub(crate) fn push(&mut self, node: Node) {
        self.children.push(node);
    }
}

impl fmt::Display for Process {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match self.mode {
            ExecutionMode::Sequential => "SequentialProcess",
            ExecutionMode::Concurrent => "ConcurrentProcess",
        };
        write!(
            f,
            "{}(id={},definition={},steps={},)",
            kind,
            self.identifier,
            self.definition.name(),
            self.children.len()
        )
    }
}
