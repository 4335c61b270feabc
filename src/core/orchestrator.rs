//! Bulk job orchestrator
//!
//! Control plane for bulk jobs: validates start requests, registers jobs,
//! selects a strategy and owns the single cleanup path of every run.

use crate::config::OrchestratorConfig;
use crate::core::batch::{
    ExecutionContext, ResumeFilter, RowProcessor, StartJobRequest, WorkItem, build_work_items,
    strategy_for,
};
use crate::core::jobs::{Job, JobId, JobRegistry, JobSnapshot};
use crate::core::remote::RemoteCall;
use crate::core::reporter::{BulkEvent, EventSink, JobStats, JobSummary, ResultReporter};
use crate::core::verification::Verifier;
use crate::utils::error::{BulkError, Result};
use futures::FutureExt;
use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Notify;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

/// How a run terminated
#[derive(Debug, Clone, PartialEq)]
pub enum JobOutcome {
    /// Every row was worked
    Completed(JobSummary),
    /// Stopped by the operator (or connection teardown)
    Ended(JobSummary),
    /// Fatal job-level error
    Failed(String),
}

/// A started run
#[derive(Debug)]
pub struct StartedJob {
    pub job: Arc<Job>,
    pub completion: JoinHandle<JobOutcome>,
}

/// Owns the job registry and drives job runs
pub struct Orchestrator {
    registry: Arc<JobRegistry>,
    remote: Arc<dyn RemoteCall>,
    config: OrchestratorConfig,
    /// Signalled each time a run finishes cleanup
    finished: Arc<Notify>,
}

impl Orchestrator {
    pub fn new(remote: Arc<dyn RemoteCall>, config: OrchestratorConfig) -> Self {
        Self {
            registry: Arc::new(JobRegistry::new()),
            remote,
            config,
            finished: Arc::new(Notify::new()),
        }
    }

    pub fn registry(&self) -> &Arc<JobRegistry> {
        &self.registry
    }

    pub fn config(&self) -> &OrchestratorConfig {
        &self.config
    }

    /// Start a run. A live duplicate id is rejected before anything else and
    /// emits nothing, so the running job's stream is untouched. Malformed
    /// requests are reported as a `jobError` event and leave nothing in the
    /// registry.
    pub fn start_job(
        &self,
        id: JobId,
        request: StartJobRequest,
        sink: Arc<dyn EventSink>,
    ) -> Result<StartedJob> {
        self.registry.ensure_vacant(&id)?;

        let items = match self.prepare(&request) {
            Ok(items) => items,
            Err(e) => {
                error!("Rejected job {}: {}", id, e);
                // A concurrent start may have claimed the id meanwhile
                if self.registry.get(&id).is_none() {
                    sink.emit(BulkEvent::JobError {
                        job_id: id,
                        code: e.code().to_string(),
                        message: e.to_string(),
                    });
                }
                return Err(e);
            }
        };

        let job = self.registry.create(id, request.failure_threshold)?;
        let strategy = strategy_for(request.strategy.unwrap_or(self.config.default_strategy));
        let concurrency = request.concurrency.clamp(1, self.config.max_concurrency.max(1));

        info!(
            "Starting job {} with {} rows ({:?}, concurrency {}, delay {}ms, threshold {}, verify {}, resume {})",
            job.id(),
            items.len(),
            strategy.kind(),
            concurrency,
            request.delay_ms,
            request.failure_threshold,
            request.verify,
            request.resume_ids.len()
        );

        let reporter = ResultReporter::new(job.clone(), self.registry.clone(), sink.clone());
        let verifier = request.verify.then(|| {
            Verifier::new(
                self.remote.clone(),
                request.verification_path(),
                request.credentials.clone(),
                self.config.verification_grace(),
            )
        });
        let processor = Arc::new(RowProcessor::new(
            job.clone(),
            reporter,
            self.remote.clone(),
            ResumeFilter::new(&request.resume_ids),
            request.method,
            request.path.clone(),
            request.credentials.clone(),
            verifier,
            Arc::new(JobStats::new(items.len())),
        ));
        let ctx = ExecutionContext {
            processor,
            concurrency,
            delay: Duration::from_millis(request.delay_ms),
            pause_wait: self.config.pause_wait,
            pause_poll_interval: self.config.pause_poll_interval(),
            cancel_poll_interval: self.config.cancel_poll_interval(),
        };

        let registry = self.registry.clone();
        let finished = self.finished.clone();
        let completion = tokio::spawn(async move {
            let execution = AssertUnwindSafe(strategy.execute(&ctx, &items))
                .catch_unwind()
                .await;
            let outcome = finish(&ctx, &registry, sink.as_ref(), execution).await;
            finished.notify_waiters();
            outcome
        });

        Ok(StartedJob { job, completion })
    }

    fn prepare(&self, request: &StartJobRequest) -> Result<Vec<WorkItem>> {
        if request.path.trim().is_empty() {
            return Err(BulkError::validation("Job path cannot be empty"));
        }
        let items = build_work_items(
            &request.rows,
            &request.defaults,
            request.primary_field.as_deref(),
        )?;
        if items.len() > self.config.max_rows {
            return Err(BulkError::row_source(format!(
                "Row list has {} rows, limit is {}",
                items.len(),
                self.config.max_rows
            )));
        }
        Ok(items)
    }

    /// Running -> paused. No-op if absent or not running.
    pub fn pause_job(&self, id: &JobId) -> bool {
        let changed = self.registry.get(id).is_some_and(|job| job.pause());
        if changed {
            info!("Job {} paused", id);
        }
        changed
    }

    /// Paused -> running. No-op if absent or not paused.
    pub fn resume_job(&self, id: &JobId) -> bool {
        let changed = self.registry.get(id).is_some_and(|job| job.resume());
        if changed {
            info!("Job {} resumed", id);
        }
        changed
    }

    /// Mark the job ended; its run observes this at the next poll point
    pub fn end_job(&self, id: &JobId) -> bool {
        let changed = self.registry.get(id).is_some_and(|job| job.end());
        if changed {
            info!("Job {} ended by operator", id);
        }
        changed
    }

    /// End every job owned by a control connection
    pub fn end_connection(&self, connection: &str) -> usize {
        let jobs = self.registry.jobs_for_connection(connection);
        let ended = jobs.iter().filter(|job| job.end()).count();
        if ended > 0 {
            info!("Ended {} job(s) for closed connection {}", ended, connection);
        }
        ended
    }

    pub fn jobs(&self) -> Vec<JobSnapshot> {
        self.registry.snapshot()
    }

    /// End every live job and wait up to `timeout` for their cleanup
    pub async fn shutdown(&self, timeout: Duration) -> bool {
        for job in self.registry.all() {
            job.end();
        }

        let drained = tokio::time::timeout(timeout, async {
            loop {
                // Created before the check so a finish in between is not missed
                let next = self.finished.notified();
                if self.registry.is_empty() {
                    break;
                }
                next.await;
            }
        })
        .await
        .is_ok();

        if drained {
            info!("Orchestrator shut down cleanly");
        } else {
            warn!(
                "Orchestrator shutdown timed out with {} job(s) still registered",
                self.registry.len()
            );
        }
        drained
    }
}

/// Terminal cleanup: runs exactly once per job, whatever ended it
async fn finish(
    ctx: &ExecutionContext,
    registry: &JobRegistry,
    sink: &dyn EventSink,
    execution: std::result::Result<(), Box<dyn Any + Send>>,
) -> JobOutcome {
    let processor = &ctx.processor;
    let job = ctx.job();

    let outcome = match execution {
        Err(panic) => {
            processor.abort_verifications();
            JobOutcome::Failed(panic_message(panic.as_ref()))
        }
        Ok(()) if job.is_ended() => {
            processor.abort_verifications();
            JobOutcome::Ended(processor.stats().summary())
        }
        Ok(()) => {
            processor.drain_verifications().await;
            JobOutcome::Completed(processor.stats().summary())
        }
    };

    job.end();
    registry.remove_run(job);

    let job_id = job.id().clone();
    let event = match &outcome {
        JobOutcome::Completed(summary) => {
            info!(
                "Job {} complete: {} succeeded, {} failed, {} skipped",
                job_id, summary.succeeded, summary.failed, summary.skipped
            );
            BulkEvent::JobComplete {
                job_id,
                summary: summary.clone(),
            }
        }
        JobOutcome::Ended(summary) => {
            info!(
                "Job {} ended after {} of {} rows",
                job_id, summary.dispatched, summary.total
            );
            BulkEvent::JobEnded {
                job_id,
                summary: summary.clone(),
            }
        }
        JobOutcome::Failed(message) => {
            error!("Job {} failed: {}", job_id, message);
            BulkEvent::JobError {
                job_id,
                code: "INTERNAL_ERROR".to_string(),
                message: message.clone(),
            }
        }
    };
    sink.emit(event);

    outcome
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(message) = panic.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = panic.downcast_ref::<String>() {
        message.clone()
    } else {
        "job execution panicked".to_string()
    }
}
