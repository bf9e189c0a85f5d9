use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::errors::BackendError;
use crate::process::Kwargs;

/// The payload needed to reconstruct a process definition out-of-process:
/// the build identifier plus the definition's module and name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessRef {
    pub identifier: String,
    pub module: String,
    pub definition: String,
}

/// Everything a worker needs to run one step, besides the `ProcessRef`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskPayload {
    pub function_name: String,
    pub description: Option<String>,
    pub kwargs: Kwargs,
}

/// Dependencies of a completion unit: a single predecessor for sequential
/// blocks, or every child of a concurrent block (fan-in).
#[derive(Debug)]
pub enum DependsOn<'a, J> {
    One(&'a J),
    All(&'a [J]),
}

impl<'a, J> DependsOn<'a, J> {
    pub fn jobs(&self) -> &'a [J] {
        match self {
            DependsOn::One(job) => std::slice::from_ref(*job),
            DependsOn::All(jobs) => *jobs,
        }
    }
}

/// Handle to one scheduled unit.
///
/// The core only uses handles as dependency tokens. The single exception is
/// the cancel path of the task execution protocol, which calls `cancel` and
/// then `delete_dependents` on the handle of the task that asked for it.
#[async_trait]
pub trait Job: Clone + Send + Sync {
    /// Cancel this unit.
    async fn cancel(&self) -> Result<(), BackendError>;

    /// Remove every unit scheduled to run after this one.
    async fn delete_dependents(&self) -> Result<(), BackendError>;
}

/// A job-queue backend the compiled process graph is handed to.
///
/// Implementations schedule three kinds of units. A worker later executes
/// them through [`crate::engine::perform_start`], [`crate::engine::perform_task`]
/// and [`crate::engine::perform_complete`] with the same payloads.
#[async_trait]
pub trait Backend: Send + Sync {
    type Job: Job + 'static;

    async fn enqueue_start(
        &self,
        process: &ProcessRef,
        depends_on: Option<&Self::Job>,
    ) -> Result<Self::Job, BackendError>;

    async fn enqueue_task(
        &self,
        process: &ProcessRef,
        task: &TaskPayload,
        depends_on: Option<&Self::Job>,
    ) -> Result<Self::Job, BackendError>;

    async fn enqueue_complete(
        &self,
        process: &ProcessRef,
        depends_on: DependsOn<'_, Self::Job>,
    ) -> Result<Self::Job, BackendError>;
}
