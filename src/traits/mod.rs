pub mod backend;
pub mod definition;

pub use backend::{Backend, DependsOn, Job, ProcessRef, TaskPayload};
pub use definition::{ExecutionMode, LoadedDefinition, ProcessDefinition, TaskScope};
