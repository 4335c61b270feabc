//! Full runs through the orchestrator

#[cfg(test)]
mod tests {
    use crate::common::*;
    use bulkops::config::StrategyKind;
    use bulkops::core::JobOutcome;
    use bulkops::core::reporter::BulkEvent;
    use serde_json::json;
    use std::sync::Arc;
    use std::time::Duration;

    #[tokio::test(start_paused = true)]
    async fn test_every_row_reported_once_under_both_strategies() {
        for kind in [StrategyKind::Batch, StrategyKind::WorkerPool] {
            let remote = Arc::new(
                ScriptedRemote::new()
                    .fail_on(&["c"])
                    .with_latency(Duration::from_millis(30)),
            );
            let orchestrator = orchestrator(remote.clone());
            let mut log = EventLog::new();
            let mut request = request(&["a", "b", "c", "d", "e", "f", "g"]);
            request.concurrency = 3;
            request.strategy = Some(kind);

            let started = orchestrator
                .start_job(job_id("items"), request, log.sink())
                .unwrap();
            let outcome = started.completion.await.unwrap();

            let summary = match outcome {
                JobOutcome::Completed(summary) => summary,
                other => panic!("{kind:?}: unexpected outcome {other:?}"),
            };
            assert_eq!(summary.total, 7);
            assert_eq!(summary.dispatched, 7);
            assert_eq!(summary.succeeded, 6);
            assert_eq!(summary.failed, 1);

            assert_eq!(log.completed_rows(), (1..=7).collect::<Vec<_>>());
            assert!(remote.peak_in_flight() <= 3);
            assert_eq!(
                log.count(|e| matches!(e, BulkEvent::RowProcessing { .. })),
                7
            );

            let terminal = log.terminal();
            assert_eq!(terminal.len(), 1);
            assert!(matches!(terminal[0], BulkEvent::JobComplete { .. }));
            assert!(orchestrator.registry().is_empty());
        }
    }

    #[tokio::test]
    async fn test_row_results_carry_details_and_errors() {
        let remote = Arc::new(ScriptedRemote::new().fail_on(&["b"]));
        let orchestrator = orchestrator(remote);
        let mut log = EventLog::new();

        let started = orchestrator
            .start_job(job_id("items"), request(&["a", "b"]), log.sink())
            .unwrap();
        started.completion.await.unwrap();

        let completed = log.completed();
        let ok = completed.iter().find(|r| r.row_number == 1).unwrap();
        assert!(ok.success);
        assert_eq!(ok.identifier, "a");
        assert_eq!(ok.details.as_deref(), Some("Created id-a"));
        assert_eq!(ok.full_response, Some(json!({"data": {"id": "id-a"}})));

        let failed = completed.iter().find(|r| r.row_number == 2).unwrap();
        assert!(!failed.success);
        assert_eq!(failed.error.as_deref(), Some("HTTP 422: rejected b"));
        assert!(failed.full_response.is_some());
    }

    #[tokio::test]
    async fn test_resume_set_skips_rows_silently() {
        for kind in [StrategyKind::Batch, StrategyKind::WorkerPool] {
            let remote = Arc::new(ScriptedRemote::new());
            let orchestrator = orchestrator(remote.clone());
            let mut log = EventLog::new();
            let mut request = request(&["A", "B", "C", "D"]);
            request.resume_ids = vec!["A".to_string(), "C".to_string()];
            request.concurrency = 2;
            request.strategy = Some(kind);

            let started = orchestrator
                .start_job(job_id("items"), request, log.sink())
                .unwrap();
            let JobOutcome::Completed(summary) = started.completion.await.unwrap() else {
                panic!("job did not complete");
            };

            let mut created = remote.created_names();
            created.sort();
            assert_eq!(created, vec!["B", "D"]);
            assert_eq!(log.completed_rows(), vec![2, 4]);
            assert_eq!(summary.skipped, 2);
            assert_eq!(summary.dispatched, 2);
            assert_eq!(
                log.count(|e| matches!(e, BulkEvent::RowProcessing { .. })),
                2
            );
        }
    }

    #[tokio::test]
    async fn test_defaults_merge_and_path_templating() {
        let remote = Arc::new(ScriptedRemote::new());
        let orchestrator = orchestrator(remote.clone());
        let log = EventLog::new();

        let mut request = request(&[]);
        request.rows = bulkops::core::batch::RowSource::Records {
            records: vec![
                json!({"name": "a", "note": "hi"}),
                json!({"name": "b", "list": "gold"}),
            ],
        };
        request.defaults = json!({"list": "vip", "note": ""})
            .as_object()
            .cloned()
            .unwrap();
        request.path = "/lists/{list}/items".to_string();

        let started = orchestrator
            .start_job(job_id("items"), request, log.sink())
            .unwrap();
        started.completion.await.unwrap();

        let calls = remote.calls();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0].path, "/lists/vip/items");
        assert_eq!(
            calls[0].payload,
            Some(json!({"name": "a", "note": "hi", "list": "vip"}))
        );
        assert_eq!(calls[1].path, "/lists/gold/items");
        // Blank default stripped before sending
        assert_eq!(calls[1].payload, Some(json!({"name": "b", "list": "gold"})));
    }

    #[tokio::test(start_paused = true)]
    async fn test_batch_delay_only_between_batches() {
        let remote = Arc::new(ScriptedRemote::new());
        let orchestrator = orchestrator(remote);
        let mut log = EventLog::new();
        let mut request = request(&["a", "b", "c", "d"]);
        request.concurrency = 2;
        request.delay_ms = 3000;

        let begin = tokio::time::Instant::now();
        let started = orchestrator
            .start_job(job_id("items"), request, log.sink())
            .unwrap();
        started.completion.await.unwrap();
        let elapsed = begin.elapsed();

        assert!(elapsed >= Duration::from_secs(3), "{elapsed:?}");
        assert!(elapsed < Duration::from_secs(4), "{elapsed:?}");

        let ticks: Vec<u64> = log
            .events()
            .iter()
            .filter_map(|e| match e {
                BulkEvent::JobCountdown { seconds, .. } => Some(*seconds),
                _ => None,
            })
            .collect();
        assert_eq!(ticks, vec![3, 2, 1, 0]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_worker_pool_paces_each_item_without_trailing_delay() {
        let remote = Arc::new(ScriptedRemote::new());
        let orchestrator = orchestrator(remote);
        let mut log = EventLog::new();
        let mut request = request(&["a", "b", "c"]);
        request.strategy = Some(StrategyKind::WorkerPool);
        request.delay_ms = 1000;

        let begin = tokio::time::Instant::now();
        let started = orchestrator
            .start_job(job_id("items"), request, log.sink())
            .unwrap();
        started.completion.await.unwrap();
        let elapsed = begin.elapsed();

        assert!(elapsed >= Duration::from_secs(2), "{elapsed:?}");
        assert!(elapsed < Duration::from_secs(3), "{elapsed:?}");
        assert_eq!(
            log.count(|e| matches!(e, BulkEvent::JobCountdown { seconds: 0, .. })),
            2
        );
    }

    #[tokio::test]
    async fn test_same_id_can_restart_after_completion() {
        let remote = Arc::new(ScriptedRemote::new());
        let orchestrator = orchestrator(remote.clone());
        let log = EventLog::new();

        let first = orchestrator
            .start_job(job_id("items"), request(&["a"]), log.sink())
            .unwrap();
        first.completion.await.unwrap();

        let second = orchestrator
            .start_job(job_id("items"), request(&["b"]), log.sink())
            .unwrap();
        assert_ne!(first.job.run_id(), second.job.run_id());
        second.completion.await.unwrap();

        assert_eq!(remote.created_names(), vec!["a", "b"]);
    }
}
