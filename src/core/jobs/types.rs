//! Job identity and control state

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::fmt;
use tokio::sync::watch;
use uuid::Uuid;

/// Composite job key, scoped to one control connection
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobId {
    /// Owning control connection
    pub connection: String,
    /// Credential profile the job runs under
    pub profile: String,
    /// Kind of bulk operation
    pub job_type: String,
}

impl JobId {
    pub fn new(
        connection: impl Into<String>,
        profile: impl Into<String>,
        job_type: impl Into<String>,
    ) -> Self {
        Self {
            connection: connection.into(),
            profile: profile.into(),
            job_type: job_type.into(),
        }
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.connection, self.profile, self.job_type)
    }
}

/// Job status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    Running,
    Paused,
    Ended,
}

/// Registry entry for one job run
pub struct Job {
    id: JobId,
    run_id: Uuid,
    failure_threshold: u32,
    status: watch::Sender<JobStatus>,
    pub(super) consecutive_failures: Mutex<u32>,
}

impl Job {
    pub(super) fn new(id: JobId, failure_threshold: u32) -> Self {
        let (status, _) = watch::channel(JobStatus::Running);
        Self {
            id,
            run_id: Uuid::new_v4(),
            failure_threshold,
            status,
            consecutive_failures: Mutex::new(0),
        }
    }

    pub fn id(&self) -> &JobId {
        &self.id
    }

    /// Distinguishes successive runs that reuse the same [`JobId`]
    pub fn run_id(&self) -> Uuid {
        self.run_id
    }

    /// Zero disables auto-pause
    pub fn failure_threshold(&self) -> u32 {
        self.failure_threshold
    }

    pub fn status(&self) -> JobStatus {
        *self.status.borrow()
    }

    pub fn is_ended(&self) -> bool {
        self.status() == JobStatus::Ended
    }

    pub fn is_paused(&self) -> bool {
        self.status() == JobStatus::Paused
    }

    /// Receiver that observes every status change
    pub fn subscribe(&self) -> watch::Receiver<JobStatus> {
        self.status.subscribe()
    }

    /// Set the status. `Ended` is terminal; returns whether anything changed.
    pub fn set_status(&self, next: JobStatus) -> bool {
        self.status.send_if_modified(|current| {
            if *current == JobStatus::Ended || *current == next {
                return false;
            }
            *current = next;
            true
        })
    }

    /// Running -> Paused
    pub fn pause(&self) -> bool {
        self.transition(JobStatus::Running, JobStatus::Paused)
    }

    /// Paused -> Running
    pub fn resume(&self) -> bool {
        self.transition(JobStatus::Paused, JobStatus::Running)
    }

    /// Any -> Ended
    pub fn end(&self) -> bool {
        self.set_status(JobStatus::Ended)
    }

    pub(super) fn transition(&self, from: JobStatus, to: JobStatus) -> bool {
        self.status.send_if_modified(|current| {
            if *current != from {
                return false;
            }
            *current = to;
            true
        })
    }

    pub fn consecutive_failures(&self) -> u32 {
        *self.consecutive_failures.lock()
    }

    pub fn snapshot(&self) -> JobSnapshot {
        JobSnapshot {
            id: self.id.clone(),
            run_id: self.run_id,
            status: self.status(),
            consecutive_failures: self.consecutive_failures(),
            failure_threshold: self.failure_threshold,
        }
    }
}

impl fmt::Debug for Job {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Job")
            .field("id", &self.id)
            .field("run_id", &self.run_id)
            .field("status", &self.status())
            .field("consecutive_failures", &self.consecutive_failures())
            .field("failure_threshold", &self.failure_threshold)
            .finish()
    }
}

/// Point-in-time view of a registry entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobSnapshot {
    pub id: JobId,
    pub run_id: Uuid,
    pub status: JobStatus,
    pub consecutive_failures: u32,
    pub failure_threshold: u32,
}
