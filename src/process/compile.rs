// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Compilation of a process tree into backend units.
//!
//! Sequential nodes become a chain: one start unit, every child depending on
//! its predecessor, one completion unit on the last child. Concurrent nodes fan
//! out from their own start unit and join on a completion unit that depends on
//! every child. Nested nodes are compiled recursively and their completion unit
//! stands in for the whole subtree.

use std::future::Future;
use std::pin::Pin;

use crate::errors::BackendError;
use crate::observability::messages::compile::{ProcessEnqueued, UnitEnqueued};
use crate::observability::messages::StructuredLog;
use crate::process::{Node, Process};
use crate::traits::{Backend, DependsOn, ExecutionMode, ProcessRef};

/// Boxed future returned by the recursive compilation step.
pub type EnqueueFuture<'a, J> = Pin<Box<dyn Future<Output = Result<J, BackendError>> + Send + 'a>>;

impl Process {
    /// Compile this tree against `backend` and return the handle of the root
    /// completion unit.
    pub async fn enqueue<B: Backend>(&self, backend: &B) -> Result<B::Job, BackendError> {
        self.enqueue_from(backend, None).await
    }

    /// Compile this node, optionally chained after `start_job`.
    ///
    /// A sequential node reuses `start_job` as its start unit when given one.
    /// A concurrent node always enqueues its own start unit without any
    /// dependency, whether or not `start_job` is given.
    pub fn enqueue_from<'a, B: Backend>(
        &'a self,
        backend: &'a B,
        start_job: Option<B::Job>,
    ) -> EnqueueFuture<'a, B::Job> {
        Box::pin(async move {
            let base = self.process_ref();
            let job = match self.mode() {
                ExecutionMode::Sequential => self.enqueue_sequential(backend, &base, start_job).await?,
                ExecutionMode::Concurrent => self.enqueue_concurrent(backend, &base).await?,
            };

            ProcessEnqueued {
                definition: self.definition().name(),
                identifier: self.identifier(),
                mode: self.mode().as_str(),
                children: self.len(),
            }
            .log();

            Ok(job)
        })
    }

    async fn enqueue_sequential<B: Backend>(
        &self,
        backend: &B,
        base: &ProcessRef,
        start_job: Option<B::Job>,
    ) -> Result<B::Job, BackendError> {
        let mut job = match start_job {
            Some(job) => job,
            None => {
                let job = backend.enqueue_start(base, None).await?;
                self.unit_enqueued("start", None, 0);
                job
            }
        };

        for child in self.children() {
            job = match child {
                Node::Step(step) => {
                    let payload = step.payload();
                    let next = backend.enqueue_task(base, &payload, Some(&job)).await?;
                    self.unit_enqueued("task", Some(step.name()), 1);
                    next
                }
                Node::Process(process) => process.enqueue_from(backend, Some(job)).await?,
            };
        }

        let complete = backend.enqueue_complete(base, DependsOn::One(&job)).await?;
        self.unit_enqueued("complete", None, 1);
        Ok(complete)
    }

    async fn enqueue_concurrent<B: Backend>(
        &self,
        backend: &B,
        base: &ProcessRef,
    ) -> Result<B::Job, BackendError> {
        let start = backend.enqueue_start(base, None).await?;
        self.unit_enqueued("start", None, 0);

        let mut jobs = Vec::with_capacity(self.len());
        for child in self.children() {
            let job = match child {
                Node::Step(step) => {
                    let payload = step.payload();
                    let job = backend.enqueue_task(base, &payload, Some(&start)).await?;
                    self.unit_enqueued("task", Some(step.name()), 1);
                    job
                }
                Node::Process(process) => process.enqueue_from(backend, Some(start.clone())).await?,
            };
            jobs.push(job);
        }

        let complete = backend.enqueue_complete(base, DependsOn::All(&jobs)).await?;
        self.unit_enqueued("complete", None, jobs.len());
        Ok(complete)
    }

    fn unit_enqueued(&self, unit: &str, step: Option<&str>, dependencies: usize) {
        UnitEnqueued {
            definition: self.definition().name(),
            identifier: self.identifier(),
            unit,
            step,
            dependencies,
        }
        .log();
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::backends::memory::{InMemoryBackend, JobId, UnitKind};
    use crate::backends::stub::{methods_process, Methods, STUB_IDENTIFIER};
    use crate::errors::BuildError;
    use crate::process::{Builder, Kwargs, Options};

    fn compile_tree<F>(mode: ExecutionMode, define: F) -> Process
    where
        F: FnOnce(&mut Builder<'_>) -> Result<(), BuildError>,
    {
        let mut process = methods_process(mode);
        {
            let mut builder = Builder::new(&mut process, Kwargs::new(), Arc::new(Options::new()), None);
            define(&mut builder).unwrap();
        }
        process
    }

    fn ids(raw: &[usize]) -> Vec<JobId> {
        raw.iter().copied().map(JobId::from).collect()
    }

    #[tokio::test]
    async fn test_sequential_chains_every_step() {
        let process = compile_tree(ExecutionMode::Sequential, |b| {
            b.task("foo")?;
            b.task("bar")?;
            b.task("baz")
        });
        let backend = InMemoryBackend::new();
        let root = process.enqueue(&backend).await.unwrap();

        let units = backend.units().await;
        assert_eq!(units.len(), 5);
        assert!(matches!(units[0].kind, UnitKind::Start));
        assert!(units[0].depends_on.is_empty());
        for (index, name) in ["foo", "bar", "baz"].iter().enumerate() {
            let unit = &units[index + 1];
            assert_eq!(unit.kind.function_name(), Some(*name));
            assert_eq!(unit.depends_on, ids(&[index]));
        }
        assert!(matches!(units[4].kind, UnitKind::Complete));
        assert_eq!(units[4].depends_on, ids(&[3]));
        assert_eq!(root.id(), JobId::from(4));
    }

    #[tokio::test]
    async fn test_concurrent_fans_out_and_joins() {
        let process = compile_tree(ExecutionMode::Concurrent, |b| {
            b.task("foo")?;
            b.task("bar")?;
            b.task("baz")
        });
        let backend = InMemoryBackend::new();
        process.enqueue(&backend).await.unwrap();

        let units = backend.units().await;
        assert_eq!(units.len(), 5);
        assert!(matches!(units[0].kind, UnitKind::Start));
        for unit in &units[1..4] {
            assert_eq!(unit.depends_on, ids(&[0]));
        }
        assert!(matches!(units[4].kind, UnitKind::Complete));
        assert_eq!(units[4].depends_on, ids(&[1, 2, 3]));
    }

    #[tokio::test]
    async fn test_every_unit_carries_the_base_payload() {
        let process = compile_tree(ExecutionMode::Sequential, |b| {
            b.task("foo")?;
            b.concurrent(None, |c| c.task("bar"))
        });
        let backend = InMemoryBackend::new();
        process.enqueue(&backend).await.unwrap();

        for unit in backend.units().await {
            assert_eq!(unit.process.identifier, STUB_IDENTIFIER);
            assert_eq!(unit.process.definition, "Methods");
            assert_eq!(unit.process.module, Methods::MODULE);
        }
    }

    #[tokio::test]
    async fn test_nested_sequential_reuses_predecessor_as_start() {
        let process = compile_tree(ExecutionMode::Sequential, |b| {
            b.task("foo")?;
            b.sequential(None, |s| {
                s.task("bar")?;
                s.task("baz")
            })?;
            b.task("qux")
        });
        let backend = InMemoryBackend::new();
        process.enqueue(&backend).await.unwrap();

        // 0 start, 1 foo, 2 bar, 3 baz, 4 nested complete, 5 qux, 6 complete
        let units = backend.units().await;
        assert_eq!(units.len(), 7);
        assert_eq!(units.iter().filter(|u| matches!(u.kind, UnitKind::Start)).count(), 1);
        assert_eq!(units[2].kind.function_name(), Some("bar"));
        assert_eq!(units[2].depends_on, ids(&[1]));
        assert!(matches!(units[4].kind, UnitKind::Complete));
        assert_eq!(units[4].depends_on, ids(&[3]));
        assert_eq!(units[5].kind.function_name(), Some("qux"));
        assert_eq!(units[5].depends_on, ids(&[4]));
        assert_eq!(units[6].depends_on, ids(&[5]));
    }

    #[tokio::test]
    async fn test_nested_concurrent_ignores_start_job() {
        let process = compile_tree(ExecutionMode::Sequential, |b| {
            b.task("foo")?;
            b.concurrent(None, |c| {
                c.task("bar")?;
                c.task("baz")
            })?;
            b.task("qux")
        });
        let backend = InMemoryBackend::new();
        process.enqueue(&backend).await.unwrap();

        // 0 start, 1 foo, 2 nested start, 3 bar, 4 baz, 5 nested complete, 6 qux, 7 complete
        let units = backend.units().await;
        assert_eq!(units.len(), 8);
        assert!(matches!(units[2].kind, UnitKind::Start));
        assert!(units[2].depends_on.is_empty(), "concurrent start must not chain on its predecessor");
        assert_eq!(units[3].depends_on, ids(&[2]));
        assert_eq!(units[4].depends_on, ids(&[2]));
        assert_eq!(units[5].depends_on, ids(&[3, 4]));
        assert_eq!(units[6].depends_on, ids(&[5]));
    }

    #[tokio::test]
    async fn test_concurrent_children_share_start() {
        let process = compile_tree(ExecutionMode::Concurrent, |b| {
            b.task("foo")?;
            b.sequential(None, |s| {
                s.task("bar")?;
                s.task("baz")
            })
        });
        let backend = InMemoryBackend::new();
        process.enqueue(&backend).await.unwrap();

        // 0 start, 1 foo, 2 bar, 3 baz, 4 nested complete, 5 complete
        let units = backend.units().await;
        assert_eq!(units.len(), 6);
        assert_eq!(units[1].depends_on, ids(&[0]));
        assert_eq!(units[2].depends_on, ids(&[0]));
        assert_eq!(units[3].depends_on, ids(&[2]));
        assert_eq!(units[5].depends_on, ids(&[1, 4]));
    }

    #[tokio::test]
    async fn test_empty_processes() {
        let backend = InMemoryBackend::new();
        methods_process(ExecutionMode::Sequential).enqueue(&backend).await.unwrap();
        methods_process(ExecutionMode::Concurrent).enqueue(&backend).await.unwrap();

        let units = backend.units().await;
        assert_eq!(units.len(), 4);
        assert_eq!(units[1].depends_on, ids(&[0]));
        assert!(units[3].depends_on.is_empty());
    }

    #[tokio::test]
    async fn test_task_payload_carries_description_and_kwargs() {
        let process = compile_tree(ExecutionMode::Sequential, |b| {
            b.transform(|_| Ok(crate::kwargs! { "n" => 7 }), None, |t| t.task("foo_task"))
        });
        let backend = InMemoryBackend::new();
        process.enqueue(&backend).await.unwrap();

        let units = backend.units().await;
        match &units[1].kind {
            UnitKind::Task(payload) => {
                assert_eq!(payload.function_name, "foo_task");
                assert_eq!(payload.description.as_deref(), Some("My Foo Task"));
                assert_eq!(payload.kwargs, crate::kwargs! { "n" => 7 });
            }
            other => panic!("expected a task unit, got {:?}", other),
        }
    }
}
