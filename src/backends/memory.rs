// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! In-process backend that records every enqueued unit.
//!
//! Useful for inspecting the graph a process compiles to and for running a
//! process end to end during development. Units are stored in enqueue order,
//! which is always a topological order of the dependency graph, so
//! [`InMemoryBackend::run_pending`] can execute them front to back.
//!
//! There is no persistence, no retry scheduling and no parallelism: a unit that
//! fails stays failed and everything depending on it is skipped.

use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::engine::{perform_complete, perform_start, perform_task, DefinitionResolver, TaskOutcome};
use crate::errors::{BackendError, ExecutionError};
use crate::observability::messages::execution::UnitBlocked;
use crate::observability::messages::StructuredLog;
use crate::traits::{Backend, DependsOn, Job, ProcessRef, TaskPayload};

/// Position of a unit in the queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct JobId(usize);

impl JobId {
    pub fn index(&self) -> usize {
        self.0
    }
}

impl From<usize> for JobId {
    fn from(index: usize) -> Self {
        Self(index)
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "job-{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum UnitKind {
    Start,
    Task(TaskPayload),
    Complete,
}

impl UnitKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            UnitKind::Start => "start",
            UnitKind::Task(_) => "task",
            UnitKind::Complete => "complete",
        }
    }

    /// Task function name for task units.
    pub fn function_name(&self) -> Option<&str> {
        match self {
            UnitKind::Task(payload) => Some(&payload.function_name),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobStatus {
    Queued,
    Finished,
    Failed,
    Cancelled,
    /// Removed by `delete_dependents` before it ran.
    Deleted,
    /// Skipped by `run_pending` because a dependency did not finish.
    Blocked,
}

#[derive(Debug, Clone)]
pub struct QueuedUnit {
    pub id: JobId,
    pub process: ProcessRef,
    pub kind: UnitKind,
    pub depends_on: Vec<JobId>,
    pub status: JobStatus,
}

impl fmt::Display for QueuedUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.id, self.kind.as_str())?;
        if let Some(name) = self.kind.function_name() {
            write!(f, " '{}'", name)?;
        }
        write!(f, " of {} [{:?}]", self.process.definition, self.status)?;
        if !self.depends_on.is_empty() {
            let dependencies: Vec<String> = self.depends_on.iter().map(JobId::to_string).collect();
            write!(f, " after {}", dependencies.join(", "))?;
        }
        Ok(())
    }
}

type Queue = Arc<Mutex<Vec<QueuedUnit>>>;

/// Handle to a unit queued on an [`InMemoryBackend`].
#[derive(Debug, Clone)]
pub struct MemoryJob {
    id: JobId,
    queue: Queue,
}

impl MemoryJob {
    pub fn id(&self) -> JobId {
        self.id
    }

    pub async fn status(&self) -> Option<JobStatus> {
        self.queue.lock().await.get(self.id.0).map(|unit| unit.status)
    }
}

#[async_trait]
impl Job for MemoryJob {
    async fn cancel(&self) -> Result<(), BackendError> {
        let mut queue = self.queue.lock().await;
        let unit = queue
            .get_mut(self.id.0)
            .ok_or_else(|| BackendError::UnknownJob(self.id.to_string()))?;
        unit.status = JobStatus::Cancelled;
        Ok(())
    }

    async fn delete_dependents(&self) -> Result<(), BackendError> {
        let mut queue = self.queue.lock().await;
        if self.id.0 >= queue.len() {
            return Err(BackendError::UnknownJob(self.id.to_string()));
        }

        // Dependencies are always enqueued before their dependents, so one
        // forward pass reaches every transitive dependent.
        let mut pruned = BTreeSet::from([self.id]);
        for unit in queue.iter_mut().skip(self.id.0 + 1) {
            if unit.depends_on.iter().any(|dependency| pruned.contains(dependency)) {
                pruned.insert(unit.id);
                if unit.status == JobStatus::Queued {
                    unit.status = JobStatus::Deleted;
                }
            }
        }

        tracing::debug!(job = %self.id, deleted = pruned.len() - 1, "Deleted dependent units");
        Ok(())
    }
}

/// A unit that `run_pending` executed and that returned an error.
#[derive(Debug)]
pub struct UnitFailure {
    pub id: JobId,
    pub error: ExecutionError,
}

/// Summary of a `run_pending` pass. Status counts cover the whole queue.
#[derive(Debug, Default)]
pub struct RunReport {
    pub finished: usize,
    pub cancelled: usize,
    pub deleted: usize,
    pub blocked: usize,
    pub failures: Vec<UnitFailure>,
}

impl RunReport {
    pub fn is_success(&self) -> bool {
        self.failures.is_empty() && self.blocked == 0
    }
}

impl fmt::Display for RunReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "finished={}, cancelled={}, deleted={}, blocked={}, failed={}",
            self.finished,
            self.cancelled,
            self.deleted,
            self.blocked,
            self.failures.len()
        )
    }
}

#[derive(Debug, Clone, Default)]
pub struct InMemoryBackend {
    queue: Queue,
}

impl InMemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of every unit enqueued so far.
    pub async fn units(&self) -> Vec<QueuedUnit> {
        self.queue.lock().await.clone()
    }

    pub async fn len(&self) -> usize {
        self.queue.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.queue.lock().await.is_empty()
    }

    /// Execute every queued unit in enqueue order.
    ///
    /// A unit runs only if all of its dependencies finished; otherwise it is
    /// marked [`JobStatus::Blocked`]. Failures are collected, not retried.
    pub async fn run_pending(&self, resolver: &dyn DefinitionResolver) -> RunReport {
        let mut report = RunReport::default();
        let mut index = 0;

        loop {
            let (unit, blocker) = {
                let queue = self.queue.lock().await;
                let Some(unit) = queue.get(index).cloned() else {
                    break;
                };
                let blocker = unit
                    .depends_on
                    .iter()
                    .copied()
                    .find(|dependency| queue[dependency.0].status != JobStatus::Finished);
                (unit, blocker)
            };
            index += 1;

            if unit.status != JobStatus::Queued {
                continue;
            }

            if let Some(dependency) = blocker {
                UnitBlocked {
                    identifier: &unit.process.identifier,
                    unit: unit.kind.as_str(),
                    job: &unit.id.to_string(),
                    dependency: &dependency.to_string(),
                }
                .log();
                self.set_status(unit.id, JobStatus::Blocked).await;
                continue;
            }

            let result = match &unit.kind {
                UnitKind::Start => perform_start(resolver, &unit.process).map(|_| TaskOutcome::Completed),
                UnitKind::Task(payload) => {
                    let job = self.handle(unit.id);
                    perform_task(resolver, &unit.process, payload, &job).await
                }
                UnitKind::Complete => perform_complete(resolver, &unit.process).map(|_| TaskOutcome::Completed),
            };

            match result {
                Ok(TaskOutcome::Completed) => self.set_status(unit.id, JobStatus::Finished).await,
                // The job already marked itself cancelled.
                Ok(TaskOutcome::Cancelled) => {}
                Err(error) => {
                    self.set_status(unit.id, JobStatus::Failed).await;
                    report.failures.push(UnitFailure { id: unit.id, error });
                }
            }
        }

        for unit in self.queue.lock().await.iter() {
            match unit.status {
                JobStatus::Finished => report.finished += 1,
                JobStatus::Cancelled => report.cancelled += 1,
                JobStatus::Deleted => report.deleted += 1,
                JobStatus::Blocked => report.blocked += 1,
                JobStatus::Queued | JobStatus::Failed => {}
            }
        }

        report
    }

    fn handle(&self, id: JobId) -> MemoryJob {
        MemoryJob {
            id,
            queue: Arc::clone(&self.queue),
        }
    }

    async fn set_status(&self, id: JobId, status: JobStatus) {
        if let Some(unit) = self.queue.lock().await.get_mut(id.0) {
            unit.status = status;
        }
    }

    async fn push(
        &self,
        process: &ProcessRef,
        kind: UnitKind,
        depends_on: &[MemoryJob],
    ) -> Result<MemoryJob, BackendError> {
        if let Some(foreign) = depends_on.iter().find(|job| !Arc::ptr_eq(&job.queue, &self.queue)) {
            return Err(BackendError::Enqueue {
                unit: kind.as_str(),
                identifier: process.identifier.clone(),
                reason: format!("dependency {} belongs to another backend", foreign.id),
            });
        }

        let mut queue = self.queue.lock().await;
        let id = JobId(queue.len());
        queue.push(QueuedUnit {
            id,
            process: process.clone(),
            kind,
            depends_on: depends_on.iter().map(MemoryJob::id).collect(),
            status: JobStatus::Queued,
        });

        Ok(self.handle(id))
    }
}

#[async_trait]
impl Backend for InMemoryBackend {
    type Job = MemoryJob;

    async fn enqueue_start(
        &self,
        process: &ProcessRef,
        depends_on: Option<&MemoryJob>,
    ) -> Result<MemoryJob, BackendError> {
        self.push(process, UnitKind::Start, depends_on.map(std::slice::from_ref).unwrap_or_default())
            .await
    }

    async fn enqueue_task(
        &self,
        process: &ProcessRef,
        task: &TaskPayload,
        depends_on: Option<&MemoryJob>,
    ) -> Result<MemoryJob, BackendError> {
        self.push(
            process,
            UnitKind::Task(task.clone()),
            depends_on.map(std::slice::from_ref).unwrap_or_default(),
        )
        .await
    }

    async fn enqueue_complete(
        &self,
        process: &ProcessRef,
        depends_on: DependsOn<'_, MemoryJob>,
    ) -> Result<MemoryJob, BackendError> {
        self.push(process, UnitKind::Complete, depends_on.jobs()).await
    }
}
