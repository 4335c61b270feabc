//! Rejected requests and error mapping

#[cfg(test)]
mod tests {
    use crate::common::*;
    use actix_web::ResponseError;
    use actix_web::http::StatusCode;
    use bulkops::BulkError;
    use bulkops::config::OrchestratorConfig;
    use bulkops::core::batch::{RowSource, StartJobRequest};
    use bulkops::core::reporter::BulkEvent;
    use bulkops::core::{JobOutcome, Orchestrator};
    use serde_json::json;
    use std::sync::Arc;

    fn rejected_code(orchestrator: &Orchestrator, request: StartJobRequest) -> (BulkError, String) {
        let mut log = EventLog::new();
        let err = orchestrator
            .start_job(job_id("items"), request, log.sink())
            .unwrap_err();
        let events = log.events().to_vec();
        assert_eq!(events.len(), 1, "exactly one event: {events:?}");
        match &events[0] {
            BulkEvent::JobError { code, .. } => (err, code.clone()),
            other => panic!("expected jobError, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_bad_row_sources_emit_job_error() {
        let remote = Arc::new(ScriptedRemote::new());
        let orchestrator = orchestrator(remote.clone());

        let empty = StartJobRequest::new(RowSource::Records { records: vec![] }, "/items");
        let (err, code) = rejected_code(&orchestrator, empty);
        assert!(matches!(err, BulkError::RowSource(_)));
        assert_eq!(code, "INVALID_ROW_SOURCE");

        let blank = StartJobRequest::new(
            RowSource::Delimited {
                text: " ,\n , ".to_string(),
                separator: ",".to_string(),
                field: "email".to_string(),
            },
            "/items",
        );
        let (_, code) = rejected_code(&orchestrator, blank);
        assert_eq!(code, "INVALID_ROW_SOURCE");

        let scalar = StartJobRequest::new(
            RowSource::Records {
                records: vec![json!({"name": "a"}), json!(42)],
            },
            "/items",
        );
        let (_, code) = rejected_code(&orchestrator, scalar);
        assert_eq!(code, "INVALID_ROW_SOURCE");

        assert!(orchestrator.registry().is_empty());
        assert!(remote.calls().is_empty());
    }

    #[tokio::test]
    async fn test_row_limit_is_enforced() {
        let config = OrchestratorConfig {
            max_rows: 2,
            ..fast_config()
        };
        let orchestrator = Orchestrator::new(Arc::new(ScriptedRemote::new()), config);

        let (err, code) = rejected_code(&orchestrator, request(&["a", "b", "c"]));
        assert_eq!(code, "INVALID_ROW_SOURCE");
        assert!(err.to_string().contains("limit is 2"));
    }

    #[tokio::test]
    async fn test_empty_path_is_a_validation_error() {
        let orchestrator = orchestrator(Arc::new(ScriptedRemote::new()));
        let mut request = request(&["a"]);
        request.path = "  ".to_string();

        let (err, code) = rejected_code(&orchestrator, request);
        assert!(matches!(err, BulkError::Validation(_)));
        assert_eq!(code, "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_duplicate_start_is_rejected_silently() {
        let orchestrator = orchestrator(Arc::new(ScriptedRemote::new()));
        let mut first_log = EventLog::new();
        let mut second_log = EventLog::new();
        let mut slow = request(&["a", "b"]);
        slow.delay_ms = 60_000;

        let started = orchestrator
            .start_job(job_id("items"), slow.clone(), first_log.sink())
            .unwrap();
        let err = orchestrator
            .start_job(job_id("items"), slow, second_log.sink())
            .unwrap_err();

        assert!(matches!(err, BulkError::Conflict(_)));
        assert_eq!(err.code(), "JOB_EXISTS");
        assert!(second_log.events().is_empty());

        // The original run is untouched
        assert_eq!(orchestrator.registry().len(), 1);
        assert!(orchestrator.end_job(&job_id("items")));
        assert!(matches!(
            started.completion.await.unwrap(),
            JobOutcome::Ended(_)
        ));
        assert_eq!(first_log.terminal().len(), 1);
    }

    #[tokio::test]
    async fn test_malformed_duplicate_leaves_running_job_untouched() {
        let orchestrator = orchestrator(Arc::new(ScriptedRemote::new()));
        let mut running_log = EventLog::new();
        let mut slow = request(&["a", "b"]);
        slow.delay_ms = 60_000;

        let started = orchestrator
            .start_job(job_id("items"), slow, running_log.sink())
            .unwrap();

        let empty = StartJobRequest::new(RowSource::Records { records: vec![] }, "/items");
        let err = orchestrator
            .start_job(job_id("items"), empty, running_log.sink())
            .unwrap_err();

        assert!(matches!(err, BulkError::Conflict(_)));
        assert!(running_log.terminal().is_empty());
        assert_eq!(
            running_log.count(|e| matches!(e, BulkEvent::JobError { .. })),
            0
        );
        assert!(!started.job.is_ended());
        assert_eq!(orchestrator.registry().len(), 1);

        assert!(orchestrator.end_job(&job_id("items")));
        assert!(matches!(
            started.completion.await.unwrap(),
            JobOutcome::Ended(_)
        ));
        let terminal = running_log.terminal();
        assert_eq!(terminal.len(), 1);
        assert!(matches!(terminal[0], BulkEvent::JobEnded { .. }));
    }

    #[tokio::test]
    async fn test_panicking_run_is_contained() {
        let remote = Arc::new(ScriptedRemote::new().panic_on(&["boom"]));
        let orchestrator = orchestrator(remote.clone());
        let mut log = EventLog::new();
        let mut failing = request(&["a", "boom", "c"]);
        failing.verify = true;

        let started = orchestrator
            .start_job(job_id("items"), failing, log.sink())
            .unwrap();
        match started.completion.await.unwrap() {
            JobOutcome::Failed(message) => assert!(message.contains("remote blew up on boom")),
            other => panic!("unexpected outcome {other:?}"),
        }

        assert!(orchestrator.registry().is_empty());
        let terminal = log.terminal();
        assert_eq!(terminal.len(), 1);
        assert!(matches!(
            &terminal[0],
            BulkEvent::JobError { code, .. } if code == "INTERNAL_ERROR"
        ));

        // Pending verification of row "a" was abandoned, row "c" never ran
        tokio::time::sleep(std::time::Duration::from_millis(500)).await;
        assert!(remote.reads().is_empty());
        assert!(log.verified().is_empty());
        assert_eq!(remote.created_names(), vec!["a", "boom"]);

        // The id is free again
        let restarted = orchestrator
            .start_job(job_id("items"), request(&["c"]), log.sink())
            .unwrap();
        assert!(matches!(
            restarted.completion.await.unwrap(),
            JobOutcome::Completed(_)
        ));
    }

    #[tokio::test]
    async fn test_concurrency_is_clamped() {
        let remote = Arc::new(ScriptedRemote::new().with_latency(std::time::Duration::from_millis(20)));
        let config = OrchestratorConfig {
            max_concurrency: 2,
            ..fast_config()
        };
        let orchestrator = Orchestrator::new(remote.clone(), config);

        let mut wide = request(&["a", "b", "c", "d", "e", "f"]);
        wide.concurrency = 10;
        let started = orchestrator
            .start_job(job_id("wide"), wide, EventLog::new().sink())
            .unwrap();
        started.completion.await.unwrap();
        assert_eq!(remote.peak_in_flight(), 2);

        let remote = Arc::new(ScriptedRemote::new().with_latency(std::time::Duration::from_millis(20)));
        let orchestrator = Orchestrator::new(remote.clone(), fast_config());
        let mut zero = request(&["a", "b", "c"]);
        zero.concurrency = 0;
        let started = orchestrator
            .start_job(job_id("zero"), zero, EventLog::new().sink())
            .unwrap();
        started.completion.await.unwrap();
        assert_eq!(remote.peak_in_flight(), 1);
        assert_eq!(remote.created_names().len(), 3);
    }

    #[test]
    fn test_error_status_mapping() {
        let cases = [
            (BulkError::conflict("dup"), StatusCode::CONFLICT),
            (BulkError::validation("bad"), StatusCode::BAD_REQUEST),
            (BulkError::row_source("empty"), StatusCode::BAD_REQUEST),
            (BulkError::not_found("gone"), StatusCode::NOT_FOUND),
            (BulkError::internal("boom"), StatusCode::INTERNAL_SERVER_ERROR),
        ];
        for (err, status) in cases {
            assert_eq!(err.status_code(), status, "{err}");
            assert_eq!(err.error_response().status(), status);
        }
    }
}
