//! In-memory job registry

use super::types::{Job, JobId, JobSnapshot, JobStatus};
use crate::utils::error::{BulkError, Result};
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use std::sync::Arc;
use tracing::debug;

/// Registry of live jobs, keyed per job so concurrent jobs never contend
#[derive(Debug, Default)]
pub struct JobRegistry {
    jobs: DashMap<JobId, Arc<Job>>,
}

impl JobRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new running job. Fails if the id is still live.
    pub fn create(&self, id: JobId, failure_threshold: u32) -> Result<Arc<Job>> {
        match self.jobs.entry(id.clone()) {
            Entry::Occupied(_) => Err(already_active(&id)),
            Entry::Vacant(slot) => {
                let job = Arc::new(Job::new(id, failure_threshold));
                slot.insert(job.clone());
                debug!("Registered job {} ({})", job.id(), job.run_id());
                Ok(job)
            }
        }
    }

    /// `Conflict` if `id` is still live
    pub fn ensure_vacant(&self, id: &JobId) -> Result<()> {
        if self.jobs.contains_key(id) {
            return Err(already_active(id));
        }
        Ok(())
    }

    pub fn get(&self, id: &JobId) -> Option<Arc<Job>> {
        self.jobs.get(id).map(|entry| entry.value().clone())
    }

    /// No-op if the job is absent
    pub fn set_status(&self, id: &JobId, status: JobStatus) -> bool {
        self.get(id).is_some_and(|job| job.set_status(status))
    }

    pub fn remove(&self, id: &JobId) -> Option<Arc<Job>> {
        self.jobs.remove(id).map(|(_, job)| job)
    }

    /// Remove `job` only if it is still the registered run for its id
    pub fn remove_run(&self, job: &Job) -> bool {
        self.jobs
            .remove_if(job.id(), |_, current| current.run_id() == job.run_id())
            .is_some()
    }

    /// Whether `job` is still the registered run for its id
    pub fn is_current(&self, job: &Job) -> bool {
        self.jobs
            .get(job.id())
            .is_some_and(|entry| entry.value().run_id() == job.run_id())
    }

    /// Live jobs owned by one control connection
    pub fn jobs_for_connection(&self, connection: &str) -> Vec<Arc<Job>> {
        self.jobs
            .iter()
            .filter(|entry| entry.key().connection == connection)
            .map(|entry| entry.value().clone())
            .collect()
    }

    pub fn all(&self) -> Vec<Arc<Job>> {
        self.jobs.iter().map(|entry| entry.value().clone()).collect()
    }

    pub fn snapshot(&self) -> Vec<JobSnapshot> {
        self.jobs.iter().map(|entry| entry.value().snapshot()).collect()
    }

    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }
}

fn already_active(id: &JobId) -> BulkError {
    BulkError::conflict(format!(
        "Job {} is already active; end it before starting again",
        id
    ))
}
