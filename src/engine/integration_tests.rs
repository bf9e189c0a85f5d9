#[cfg(test)]
mod integration_tests {
    use std::sync::Arc;

    use crate::backends::memory::{InMemoryBackend, JobStatus, UnitKind};
    use crate::backends::stub::{HookRecorder, Recording, RecordingChild};
    use crate::config::DefinitionsConfig;
    use crate::engine::{qualified_name, DefinitionRegistry};
    use crate::errors::{ExecutionError, ResolveError};
    use crate::kwargs;
    use crate::process::{BuildArgs, Builder, Kwargs, Options, Process};
    use crate::traits::{ExecutionMode, LoadedDefinition, ProcessDefinition};

    fn registry(recorder: &HookRecorder) -> DefinitionRegistry {
        let mut registry = DefinitionRegistry::new();
        let parent = recorder.clone();
        registry.register_with(Recording::MODULE, Recording::NAME, move || {
            Box::new(Recording::new(parent.clone()))
        });
        let child = recorder.clone();
        registry.register_with(Recording::MODULE, RecordingChild::NAME, move || {
            Box::new(RecordingChild::new(child.clone()))
        });
        registry
    }

    fn build(args: BuildArgs) -> Process {
        Recording::build(args.identifier("e2e")).unwrap()
    }

    /// Test a full build, compile and run of a process with iteration and a
    /// concurrent sub-process
    #[tokio::test]
    async fn test_end_to_end_success() {
        let recorder = HookRecorder::default();
        let process = build(
            BuildArgs::new()
                .kwargs(kwargs! { "items" => [1, 2] })
                .option("child", true),
        );
        let backend = InMemoryBackend::new();
        process.enqueue(&backend).await.unwrap();

        let units = backend.units().await;
        assert_eq!(units.len(), 10);
        assert!(units.iter().all(|unit| unit.process.identifier == "e2e"));

        let report = backend.run_pending(&registry(&recorder)).await;

        assert!(report.is_success(), "report: {}", report);
        assert_eq!(report.finished, 10);
        assert_eq!(
            recorder.events(),
            vec![
                "started",
                "before:succeed",
                "task:succeed",
                "after:succeed",
                "before:record_kwargs",
                r#"kwargs:{"item":1}"#,
                "after:record_kwargs",
                "before:record_kwargs",
                r#"kwargs:{"item":2}"#,
                "after:record_kwargs",
                "child:started",
                "child:task:ping",
                "child:task:pong",
                "child:completed",
                "before:succeed",
                "task:succeed",
                "after:succeed",
                "completed",
            ]
        );
    }

    /// Test that descriptions travel with the task units
    #[tokio::test]
    async fn test_descriptions_reach_the_backend() {
        let process = build(
            BuildArgs::new()
                .kwargs(kwargs! { "items" => [1] })
                .option("child", true),
        );
        let backend = InMemoryBackend::new();
        process.enqueue(&backend).await.unwrap();

        let descriptions: Vec<(String, Option<String>)> = backend
            .units()
            .await
            .into_iter()
            .filter_map(|unit| match unit.kind {
                UnitKind::Task(payload) => Some((payload.function_name, payload.description)),
                _ => None,
            })
            .collect();

        // root steps carry no description, the definition's own is metadata only
        let child = Some("child".to_string());
        assert_eq!(
            descriptions,
            vec![
                ("succeed".to_string(), None),
                ("record_kwargs".to_string(), None),
                ("ping".to_string(), child.clone()),
                ("pong".to_string(), child),
                ("succeed".to_string(), None),
            ]
        );
    }

    /// Test that a cancelling task prunes everything downstream without failing
    #[tokio::test]
    async fn test_end_to_end_cancel() {
        let recorder = HookRecorder::default();
        let process = build(BuildArgs::new().option("cancel", true));
        let backend = InMemoryBackend::new();
        process.enqueue(&backend).await.unwrap();

        let report = backend.run_pending(&registry(&recorder)).await;

        assert!(report.failures.is_empty());
        assert_eq!(report.finished, 2);
        assert_eq!(report.cancelled, 1);
        assert_eq!(report.deleted, 2);
        assert_eq!(recorder.count("cancelled"), 1);
        assert_eq!(recorder.count("completed"), 0);
        assert_eq!(recorder.count("task:succeed"), 1);
    }

    /// Test that a permanent failure blocks the rest of the chain
    #[tokio::test]
    async fn test_end_to_end_permanent_failure() {
        let recorder = HookRecorder::default();
        let process = build(BuildArgs::new().option("fail", true));
        let backend = InMemoryBackend::new();
        process.enqueue(&backend).await.unwrap();

        let report = backend.run_pending(&registry(&recorder)).await;

        assert!(!report.is_success());
        assert_eq!(report.failures.len(), 1);
        assert!(matches!(
            report.failures[0].error,
            ExecutionError::NonRetryable { ref task, .. } if task == "fail_permanently"
        ));
        assert_eq!(report.blocked, 2);
        assert_eq!(recorder.count("failed:fail_permanently"), 1);
        assert_eq!(recorder.count("completed"), 0);

        let statuses: Vec<JobStatus> = backend.units().await.iter().map(|u| u.status).collect();
        assert_eq!(
            statuses,
            vec![
                JobStatus::Finished,
                JobStatus::Finished,
                JobStatus::Failed,
                JobStatus::Blocked,
                JobStatus::Blocked,
            ]
        );
    }

    /// Test that cancelling inside a concurrent block leaves running siblings alone
    #[tokio::test]
    async fn test_cancel_does_not_reach_concurrent_siblings() {
        let recorder = HookRecorder::default();
        let mut process = Process::new(
            ExecutionMode::Concurrent,
            "e2e".to_string(),
            LoadedDefinition::new(Recording::new(recorder.clone())),
        );
        {
            let mut builder = Builder::new(&mut process, Kwargs::new(), Arc::new(Options::new()), None);
            builder.task("cancel").unwrap();
            builder.task("succeed").unwrap();
        }
        let backend = InMemoryBackend::new();
        process.enqueue(&backend).await.unwrap();

        let report = backend.run_pending(&registry(&recorder)).await;

        // start, cancel, succeed, complete
        assert_eq!(report.cancelled, 1);
        assert_eq!(report.deleted, 1);
        assert_eq!(report.finished, 2);
        assert_eq!(recorder.count("task:succeed"), 1);
        assert_eq!(recorder.count("completed"), 0);
    }

    /// Test that definitions outside the allow-list fail to resolve on the worker
    #[tokio::test]
    async fn test_allow_list_blocks_sub_process() {
        let recorder = HookRecorder::default();
        let process = build(BuildArgs::new().option("child", true));
        let backend = InMemoryBackend::new();
        process.enqueue(&backend).await.unwrap();

        let config = DefinitionsConfig {
            allowed: vec![qualified_name(Recording::MODULE, Recording::NAME)],
        };
        let registry = registry(&recorder).with_config(&config);
        let report = backend.run_pending(&registry).await;

        assert_eq!(report.failures.len(), 1);
        assert!(matches!(
            report.failures[0].error,
            ExecutionError::Resolve(ResolveError::NotAllowed { .. })
        ));
        assert!(!report.failures[0].error.is_retryable());
        assert_eq!(recorder.count("child:"), 0);
    }

    /// Test that a second run does not execute finished units again
    #[tokio::test]
    async fn test_run_pending_is_idempotent() {
        let recorder = HookRecorder::default();
        let process = build(BuildArgs::new());
        let backend = InMemoryBackend::new();
        process.enqueue(&backend).await.unwrap();
        let registry = registry(&recorder);

        backend.run_pending(&registry).await;
        let events = recorder.events().len();
        let report = backend.run_pending(&registry).await;

        assert_eq!(recorder.events().len(), events);
        assert_eq!(report.finished, backend.len().await);
    }
}
