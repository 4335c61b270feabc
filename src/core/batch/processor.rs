//! Per-row processing shared by both strategies

use super::resume::ResumeFilter;
use super::types::WorkItem;
use crate::core::jobs::Job;
use crate::core::remote::{Credentials, HttpMethod, RemoteCall, RemoteRequest, render_path};
use crate::core::reporter::{JobStats, ResultReporter, RowResult};
use crate::core::verification::{Verifier, extract_resource_id};
use futures::future::join_all;
use parking_lot::Mutex;
use serde_json::Value;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

/// What happened to one row
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowOutcome {
    /// In the resume set; nothing was sent or reported
    Skipped,
    Succeeded,
    Failed,
}

/// Sends one row, applies the failure policy and reports the outcome
pub struct RowProcessor {
    job: Arc<Job>,
    reporter: ResultReporter,
    remote: Arc<dyn RemoteCall>,
    resume: ResumeFilter,
    method: HttpMethod,
    path_template: String,
    credentials: Credentials,
    verifier: Option<Verifier>,
    stats: Arc<JobStats>,
    verifications: Mutex<Vec<JoinHandle<()>>>,
}

impl RowProcessor {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        job: Arc<Job>,
        reporter: ResultReporter,
        remote: Arc<dyn RemoteCall>,
        resume: ResumeFilter,
        method: HttpMethod,
        path_template: impl Into<String>,
        credentials: Credentials,
        verifier: Option<Verifier>,
        stats: Arc<JobStats>,
    ) -> Self {
        Self {
            job,
            reporter,
            remote,
            resume,
            method,
            path_template: path_template.into(),
            credentials,
            verifier,
            stats,
            verifications: Mutex::new(Vec::new()),
        }
    }

    pub fn job(&self) -> &Arc<Job> {
        &self.job
    }

    pub fn reporter(&self) -> &ResultReporter {
        &self.reporter
    }

    pub fn stats(&self) -> &Arc<JobStats> {
        &self.stats
    }

    /// Process one row. Remote errors become failed results, never panics or `Err`s.
    pub async fn process(&self, item: &WorkItem) -> RowOutcome {
        if self.resume.contains(&item.identifier) {
            debug!(
                "Skipping row {} ({}): already processed",
                item.row_number, item.identifier
            );
            self.stats.record_skipped();
            return RowOutcome::Skipped;
        }

        self.stats.record_dispatched();
        self.reporter.processing(item.row_number, &item.identifier);

        let path = render_path(&self.path_template, &item.payload);
        let request = RemoteRequest::new(
            self.method,
            path,
            Some(Value::Object(item.payload.clone())),
            self.credentials.clone(),
        );

        match self.remote.call(request).await {
            Ok(response) => {
                self.job.record_success();
                self.stats.record_outcome(true);

                let resource_id = extract_resource_id(&response);
                let details = match &resource_id {
                    Some(id) => format!("Created {}", id),
                    None => "Success".to_string(),
                };
                debug!("Row {} succeeded: {}", item.row_number, details);
                self.reporter.complete(RowResult::success(
                    item.row_number,
                    item.identifier.clone(),
                    details,
                    Some(response),
                ));

                if let (Some(verifier), Some(resource_id)) = (&self.verifier, resource_id) {
                    self.spawn_verification(verifier.clone(), item, resource_id);
                }
                RowOutcome::Succeeded
            }
            Err(e) => {
                let outcome = self.job.record_failure();
                self.stats.record_outcome(false);
                warn!(
                    "Row {} ({}) failed for job {}: {}",
                    item.row_number,
                    item.identifier,
                    self.job.id(),
                    e
                );
                self.reporter.complete(RowResult::failure(
                    item.row_number,
                    item.identifier.clone(),
                    e.summary(),
                    e.body().cloned(),
                ));

                if outcome.auto_paused {
                    warn!(
                        "Job {} auto-paused after {} consecutive failures",
                        self.job.id(),
                        outcome.consecutive_failures
                    );
                    self.reporter.auto_paused(outcome.consecutive_failures);
                }
                RowOutcome::Failed
            }
        }
    }

    fn spawn_verification(&self, verifier: Verifier, item: &WorkItem, resource_id: String) {
        let reporter = self.reporter.clone();
        let row_number = item.row_number;
        let identifier = item.identifier.clone();
        let payload = item.payload.clone();

        let handle = tokio::spawn(async move {
            let result = verifier
                .verify(row_number, &identifier, &resource_id, &payload)
                .await;
            reporter.verified(result);
        });

        let mut verifications = self.verifications.lock();
        verifications.retain(|task| !task.is_finished());
        verifications.push(handle);
    }

    /// Wait for every outstanding verification
    pub async fn drain_verifications(&self) {
        let pending = std::mem::take(&mut *self.verifications.lock());
        if pending.is_empty() {
            return;
        }
        debug!(
            "Waiting for {} verification(s) of job {}",
            pending.len(),
            self.job.id()
        );
        for joined in join_all(pending).await {
            if let Err(e) = joined {
                warn!("Verification task failed: {}", e);
            }
        }
    }

    /// Cancel every outstanding verification
    pub fn abort_verifications(&self) {
        for task in std::mem::take(&mut *self.verifications.lock()) {
            task.abort();
        }
    }
}
