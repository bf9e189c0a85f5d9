// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Fluent construction of process trees.
//!
//! A [`Builder`] is a cursor over the process node currently being populated,
//! together with the active kwargs, the build options and the inherited
//! description. Entering a block always creates a new builder; the parent's
//! kwargs are never mutated in place.
//!
//! | Operation      | Node the child builder writes to | Kwargs of the child builder |
//! |----------------|----------------------------------|-----------------------------|
//! | `sequential`   | new sequential node              | same as parent              |
//! | `concurrent`   | new concurrent node              | same as parent              |
//! | `sub_process`  | new node, sub-definition's mode  | same as parent              |
//! | `each`         | same node as parent              | yielded bag, verbatim       |
//! | `transform`    | same node as parent              | transformed bag, verbatim   |
//!
//! New nodes are appended to the parent only once their block returned `Ok`.
//!
//! # Example
//!
//! ```
//! use tasktronaut::errors::BuildError;
//! use tasktronaut::process::{BuildArgs, Builder, Task, TaskRegistry};
//! use tasktronaut::traits::ProcessDefinition;
//!
//! #[derive(Default)]
//! struct Greeting;
//!
//! impl ProcessDefinition for Greeting {
//!     fn module(&self) -> &'static str { module_path!() }
//!     fn name(&self) -> &'static str { "Greeting" }
//!
//!     fn register_tasks(&self, tasks: &mut TaskRegistry) {
//!         tasks.register(Task::new("wave", |_, _| Ok(())));
//!         tasks.register(Task::new("smile", |_, _| Ok(())));
//!     }
//!
//!     fn define_process(&self, builder: &mut Builder<'_>) -> Result<(), BuildError> {
//!         builder.task("wave")?;
//!         builder.concurrent(None, |b| {
//!             b.task("smile")?;
//!             b.task("wave")
//!         })
//!     }
//! }
//!
//! let process = Greeting::build(BuildArgs::new().identifier("demo")).unwrap();
//! assert_eq!(process.len(), 2);
//! assert_eq!(process.steps().len(), 3);
//! ```

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde_json::Value;
use uuid::Uuid;

use crate::errors::BuildError;
use crate::observability::messages::compile::ProcessBuilt;
use crate::observability::messages::StructuredLog;
use crate::process::arguments::json_type_name;
use crate::process::{ArgType, Kwargs, Node, Options, Process, Step, TaskArgs};
use crate::traits::{ExecutionMode, LoadedDefinition, ProcessDefinition};

/// Generate a random process identifier (UUID v4, hex without dashes).
pub fn new_identifier() -> String {
    Uuid::new_v4().simple().to_string()
}

/// Inputs of a build: an optional identifier, the options and the initial kwargs.
#[derive(Debug, Clone, Default)]
pub struct BuildArgs {
    identifier: Option<String>,
    options: Options,
    kwargs: Kwargs,
}

impl BuildArgs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn identifier(mut self, identifier: impl Into<String>) -> Self {
        self.identifier = Some(identifier.into());
        self
    }

    pub fn options(mut self, options: Options) -> Self {
        self.options = options;
        self
    }

    pub fn kwargs(mut self, kwargs: Kwargs) -> Self {
        self.kwargs = kwargs;
        self
    }

    pub fn option(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.options.insert(name.into(), value.into());
        self
    }

    pub fn arg(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.kwargs.insert(name.into(), value.into());
        self
    }
}

/// Build a process tree from a fresh instance of `D`.
pub fn build<D>(args: BuildArgs) -> Result<Process, BuildError>
where
    D: ProcessDefinition + Default + 'static,
{
    build_with(LoadedDefinition::new(D::default()), args)
}

/// Build a process tree from an already loaded definition.
///
/// Generates an identifier if none was given, creates the root node in the
/// definition's execution mode and runs `define_process` once against it.
/// The root builder carries no description.
pub fn build_with(definition: LoadedDefinition, args: BuildArgs) -> Result<Process, BuildError> {
    let identifier = args.identifier.unwrap_or_else(new_identifier);
    let mut process = Process::new(definition.execution_mode(), identifier, definition.clone());

    {
        let mut builder = Builder::new(&mut process, args.kwargs, Arc::new(args.options), None);
        definition.instance().define_process(&mut builder)?;
    }

    ProcessBuilt {
        definition: definition.name(),
        identifier: process.identifier(),
        mode: process.mode().as_str(),
        steps: process.steps().len(),
    }
    .log();

    Ok(process)
}

pub struct Builder<'p> {
    process: &'p mut Process,
    kwargs: Kwargs,
    options: Arc<Options>,
    description: Option<String>,
}

impl<'p> Builder<'p> {
    pub(crate) fn new(
        process: &'p mut Process,
        kwargs: Kwargs,
        options: Arc<Options>,
        description: Option<String>,
    ) -> Self {
        Self {
            process,
            kwargs,
            options,
            description,
        }
    }

    pub fn kwargs(&self) -> &Kwargs {
        &self.kwargs
    }

    pub fn options(&self) -> &Options {
        &self.options
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn identifier(&self) -> &str {
        self.process.identifier()
    }

    /// The node this builder appends to.
    pub fn process(&self) -> &Process {
        &*self.process
    }

    /// Append a step for the named task.
    ///
    /// The step's description is the task's attached description, falling
    /// back to the builder's inherited one.
    pub fn task(&mut self, name: &str) -> Result<(), BuildError> {
        self.push_task(name, None)
    }

    /// Append a step with an explicit description, which wins over any other.
    pub fn task_with_description(
        &mut self,
        name: &str,
        description: impl Into<String>,
    ) -> Result<(), BuildError> {
        self.push_task(name, Some(description.into()))
    }

    fn push_task(&mut self, name: &str, description: Option<String>) -> Result<(), BuildError> {
        let definition = self.process.definition();
        let task = definition
            .task(name)
            .ok_or_else(|| BuildError::UnknownTask {
                definition: definition.qualified_name(),
                task: name.to_string(),
            })?
            .clone();

        let description = description
            .or_else(|| task.description().map(str::to_owned))
            .or_else(|| self.description.clone());

        self.process
            .push(Node::Step(Step::new(task, description, self.kwargs.clone())));
        Ok(())
    }

    /// Open a sequential block. The block's node is appended only if `block`
    /// returns `Ok`; on error it is discarded and the error propagates.
    pub fn sequential<F>(&mut self, description: Option<&str>, block: F) -> Result<(), BuildError>
    where
        F: FnOnce(&mut Builder<'_>) -> Result<(), BuildError>,
    {
        self.nested(ExecutionMode::Sequential, description, block)
    }

    /// Open a concurrent block, with the same append-on-success rule as
    /// [`Builder::sequential`].
    pub fn concurrent<F>(&mut self, description: Option<&str>, block: F) -> Result<(), BuildError>
    where
        F: FnOnce(&mut Builder<'_>) -> Result<(), BuildError>,
    {
        self.nested(ExecutionMode::Concurrent, description, block)
    }

    fn nested<F>(&mut self, mode: ExecutionMode, description: Option<&str>, block: F) -> Result<(), BuildError>
    where
        F: FnOnce(&mut Builder<'_>) -> Result<(), BuildError>,
    {
        let mut process = Process::new(
            mode,
            self.process.identifier().to_string(),
            self.process.definition().clone(),
        );

        {
            let mut builder = Builder::new(
                &mut process,
                self.kwargs.clone(),
                Arc::clone(&self.options),
                self.inherit(description),
            );
            block(&mut builder)?;
        }

        self.process.push(Node::Process(process));
        Ok(())
    }

    /// Embed a fresh instance of another definition as a nested node.
    ///
    /// The node takes `D`'s execution mode and resolves its tasks against `D`,
    /// but keeps this build's identifier. `D::define_process` runs right away.
    pub fn sub_process<D>(&mut self, description: Option<&str>) -> Result<(), BuildError>
    where
        D: ProcessDefinition + Default + 'static,
    {
        self.sub_process_with(LoadedDefinition::new(D::default()), description)
    }

    pub fn sub_process_with(
        &mut self,
        definition: LoadedDefinition,
        description: Option<&str>,
    ) -> Result<(), BuildError> {
        let mut process = Process::new(
            definition.execution_mode(),
            self.process.identifier().to_string(),
            definition.clone(),
        );

        {
            let mut builder = Builder::new(
                &mut process,
                self.kwargs.clone(),
                Arc::clone(&self.options),
                self.inherit(description),
            );
            definition.instance().define_process(&mut builder)?;
        }

        self.process.push(Node::Process(process));
        Ok(())
    }

    /// Iterate over the argument bags produced by `generator`.
    ///
    /// `generator` is called once with the current kwargs. `block` then runs
    /// once per yielded item with a builder on this same node whose kwargs are
    /// exactly the yielded bag. Keys of the enclosing kwargs are not carried
    /// over. Description precedence: per item, then `description`, then the
    /// inherited one.
    pub fn each<G, I, F>(&mut self, generator: G, description: Option<&str>, mut block: F) -> Result<(), BuildError>
    where
        G: FnOnce(&Kwargs) -> Result<I, BuildError>,
        I: IntoIterator,
        I::Item: Into<TaskArgs>,
        F: FnMut(&mut Builder<'_>) -> Result<(), BuildError>,
    {
        let items = generator(&self.kwargs)?;
        let inherited = self.inherit(description);

        for item in items {
            let TaskArgs {
                kwargs,
                description: item_description,
            } = item.into();

            let mut builder = Builder::new(
                &mut *self.process,
                kwargs,
                Arc::clone(&self.options),
                item_description.or_else(|| inherited.clone()),
            );
            block(&mut builder)?;
        }

        Ok(())
    }

    /// Replace the kwargs for the duration of `block`.
    ///
    /// `func` is called once with the current kwargs; `block` receives one
    /// builder on this same node carrying the transformed bag.
    pub fn transform<T, A, F>(&mut self, func: T, description: Option<&str>, block: F) -> Result<(), BuildError>
    where
        T: FnOnce(&Kwargs) -> Result<A, BuildError>,
        A: Into<TaskArgs>,
        F: FnOnce(&mut Builder<'_>) -> Result<(), BuildError>,
    {
        let TaskArgs {
            kwargs,
            description: transformed_description,
        } = func(&self.kwargs)?.into();

        let description = transformed_description.or_else(|| self.inherit(description));
        let mut builder = Builder::new(&mut *self.process, kwargs, Arc::clone(&self.options), description);
        block(&mut builder)
    }

    pub fn option(&self, name: &str) -> Option<&Value> {
        self.options.get(name)
    }

    pub fn option_or(&self, name: &str, default: impl Into<Value>) -> Value {
        self.option(name).cloned().unwrap_or_else(|| default.into())
    }

    /// Typed option lookup; `None` when absent or not convertible to `T`.
    pub fn option_as<T: DeserializeOwned>(&self, name: &str) -> Option<T> {
        self.option(name)
            .and_then(|value| serde_json::from_value(value.clone()).ok())
    }

    /// Assert that the current kwargs carry the named arguments.
    ///
    /// A `None` type only checks presence. Extra kwargs are not reported.
    pub fn expected_arguments<'n, I>(&self, expectations: I) -> Result<(), BuildError>
    where
        I: IntoIterator<Item = (&'n str, Option<ArgType>)>,
    {
        for (name, expected) in expectations {
            let value = self
                .kwargs
                .get(name)
                .ok_or_else(|| BuildError::missing_argument(name))?;

            if let Some(expected) = expected {
                if !expected.accepts(value) {
                    return Err(BuildError::TypeMismatch {
                        name: name.to_string(),
                        expected: expected.to_string(),
                        found: json_type_name(value),
                    });
                }
            }
        }
        Ok(())
    }

    fn inherit(&self, description: Option<&str>) -> Option<String> {
        description
            .map(str::to_owned)
            .or_else(|| self.description.clone())
    }
}
