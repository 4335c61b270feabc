//! Post-create verification of created resources

#[cfg(test)]
mod tests {
    use crate::common::*;
    use bulkops::core::JobOutcome;
    use bulkops::core::reporter::BulkEvent;
    use std::sync::Arc;
    use std::time::Duration;

    #[tokio::test(start_paused = true)]
    async fn test_amendments_arrive_before_terminal_event() {
        let remote = Arc::new(ScriptedRemote::new());
        let orchestrator = orchestrator(remote.clone());
        let mut log = EventLog::new();
        let mut request = request(&["a", "b", "c"]);
        request.verify = true;

        let started = orchestrator
            .start_job(job_id("items"), request, log.sink())
            .unwrap();
        assert!(matches!(
            started.completion.await.unwrap(),
            JobOutcome::Completed(_)
        ));

        let mut reads = remote.reads();
        reads.sort();
        assert_eq!(reads, vec!["/items/id-a", "/items/id-b", "/items/id-c"]);

        let verified = log.verified();
        assert_eq!(verified.len(), 3);
        assert!(verified.iter().all(|r| r.success && r.verified == Some(true)));

        let events = log.events();
        let last_verified = events
            .iter()
            .rposition(|e| matches!(e, BulkEvent::RowVerified { .. }))
            .unwrap();
        let terminal = events.iter().position(BulkEvent::is_terminal).unwrap();
        assert!(last_verified < terminal);
        assert_eq!(terminal, events.len() - 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_missing_resource_keeps_row_successful() {
        let remote = Arc::new(ScriptedRemote::new().missing_on_read(&["id-b"]));
        let orchestrator = orchestrator(remote);
        let mut log = EventLog::new();
        let mut request = request(&["a", "b"]);
        request.verify = true;

        let started = orchestrator
            .start_job(job_id("items"), request, log.sink())
            .unwrap();
        match started.completion.await.unwrap() {
            JobOutcome::Completed(summary) => {
                assert_eq!(summary.succeeded, 2);
                assert_eq!(summary.failed, 0);
            }
            other => panic!("unexpected outcome {other:?}"),
        }

        let mut verified = log.verified();
        verified.sort_by_key(|r| r.row_number);
        assert_eq!(verified[0].verified, Some(true));

        let missing = &verified[1];
        assert!(missing.success);
        assert_eq!(missing.verified, Some(false));
        assert_eq!(
            missing.details.as_deref(),
            Some("Created but verification failed")
        );
        assert!(missing.error.as_deref().unwrap().contains("404"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_custom_verify_path_is_templated() {
        let remote = Arc::new(ScriptedRemote::new());
        let orchestrator = orchestrator(remote.clone());
        let log = EventLog::new();
        let mut request = request(&["a"]);
        request.verify = true;
        request.verify_path = Some("/lookup/{name}/{id}".to_string());

        let started = orchestrator
            .start_job(job_id("items"), request, log.sink())
            .unwrap();
        started.completion.await.unwrap();

        assert_eq!(remote.reads(), vec!["/lookup/a/id-a"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed_rows_are_not_verified() {
        let remote = Arc::new(ScriptedRemote::new().fail_on(&["b"]));
        let orchestrator = orchestrator(remote.clone());
        let mut log = EventLog::new();
        let mut request = request(&["a", "b"]);
        request.verify = true;

        let started = orchestrator
            .start_job(job_id("items"), request, log.sink())
            .unwrap();
        started.completion.await.unwrap();

        assert_eq!(remote.reads(), vec!["/items/id-a"]);
        assert_eq!(log.verified().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_end_abandons_pending_verifications() {
        let remote = Arc::new(ScriptedRemote::new());
        let orchestrator = orchestrator(remote.clone());
        let mut log = EventLog::new();
        let id = job_id("items");
        let mut request = request(&["a", "b"]);
        request.verify = true;
        request.delay_ms = 60_000;

        let started = orchestrator
            .start_job(id.clone(), request, log.sink())
            .unwrap();
        let probe = remote.clone();
        wait_until(|| !probe.created_names().is_empty()).await;

        // Inside the verification grace period
        assert!(orchestrator.end_job(&id));
        assert!(matches!(
            started.completion.await.unwrap(),
            JobOutcome::Ended(_)
        ));

        tokio::time::sleep(Duration::from_secs(5)).await;
        assert!(remote.reads().is_empty());
        assert!(log.verified().is_empty());
        assert_eq!(log.terminal().len(), 1);
    }
}
