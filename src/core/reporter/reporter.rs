//! Per-job result reporter

use super::events::{BulkEvent, JobSummary, RowResult};
use super::sink::EventSink;
use crate::core::jobs::{Job, JobRegistry};
use chrono::Utc;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Instant;
use tracing::debug;

/// Row counters for one run
#[derive(Debug)]
pub struct JobStats {
    total: usize,
    dispatched: AtomicUsize,
    succeeded: AtomicUsize,
    failed: AtomicUsize,
    skipped: AtomicUsize,
    started: Instant,
}

impl JobStats {
    pub fn new(total: usize) -> Self {
        Self {
            total,
            dispatched: AtomicUsize::new(0),
            succeeded: AtomicUsize::new(0),
            failed: AtomicUsize::new(0),
            skipped: AtomicUsize::new(0),
            started: Instant::now(),
        }
    }

    pub fn record_dispatched(&self) {
        self.dispatched.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_outcome(&self, success: bool) {
        let counter = if success {
            &self.succeeded
        } else {
            &self.failed
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_skipped(&self) {
        self.skipped.fetch_add(1, Ordering::Relaxed);
    }

    pub fn summary(&self) -> JobSummary {
        JobSummary {
            total: self.total,
            dispatched: self.dispatched.load(Ordering::Relaxed),
            succeeded: self.succeeded.load(Ordering::Relaxed),
            failed: self.failed.load(Ordering::Relaxed),
            skipped: self.skipped.load(Ordering::Relaxed),
            elapsed_ms: self.started.elapsed().as_millis() as u64,
        }
    }
}

/// Emits one job's row-level events
///
/// Events for a run that is no longer registered are dropped, so a call
/// that finishes after the job was torn down never reaches observers.
#[derive(Clone)]
pub struct ResultReporter {
    job: Arc<Job>,
    registry: Arc<JobRegistry>,
    sink: Arc<dyn EventSink>,
}

impl ResultReporter {
    pub fn new(job: Arc<Job>, registry: Arc<JobRegistry>, sink: Arc<dyn EventSink>) -> Self {
        Self {
            job,
            registry,
            sink,
        }
    }

    pub fn job(&self) -> &Arc<Job> {
        &self.job
    }

    fn emit_if_live(&self, event: BulkEvent) {
        if self.registry.is_current(&self.job) {
            self.sink.emit(event);
        } else {
            debug!("Dropping late event for job {}", self.job.id());
        }
    }

    /// Dispatch notice
    pub fn processing(&self, row_number: usize, identifier: &str) {
        self.emit_if_live(BulkEvent::RowProcessing {
            job_id: self.job.id().clone(),
            row_number,
            identifier: identifier.to_string(),
            timestamp: Utc::now(),
        });
    }

    /// Final outcome of a row
    pub fn complete(&self, result: RowResult) {
        self.emit_if_live(BulkEvent::RowComplete {
            job_id: self.job.id().clone(),
            result,
        });
    }

    /// Verification amendment
    pub fn verified(&self, result: RowResult) {
        self.emit_if_live(BulkEvent::RowVerified {
            job_id: self.job.id().clone(),
            result,
        });
    }

    pub fn countdown(&self, seconds: u64) {
        self.emit_if_live(BulkEvent::JobCountdown {
            job_id: self.job.id().clone(),
            seconds,
        });
    }

    pub fn auto_paused(&self, consecutive_failures: u32) {
        self.emit_if_live(BulkEvent::JobAutoPaused {
            job_id: self.job.id().clone(),
            consecutive_failures,
            reason: self.job.auto_pause_reason(consecutive_failures),
        });
    }
}
