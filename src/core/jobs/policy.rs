//! Failure-threshold auto-pause
//!
//! The counter lock is held across the status check and transition so that
//! a counter update and the pause decision it triggers happen together.

use super::types::{Job, JobStatus};

/// What a failed call did to the job
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FailureOutcome {
    /// Counter value after the increment
    pub consecutive_failures: u32,
    /// This failure tripped the threshold and paused the job
    pub auto_paused: bool,
}

impl Job {
    /// Reset the failure run, unless the job is currently paused
    pub fn record_success(&self) -> u32 {
        let mut failures = self.consecutive_failures.lock();
        if self.status() != JobStatus::Paused {
            *failures = 0;
        }
        *failures
    }

    /// Extend the failure run and pause the job once it reaches the threshold
    pub fn record_failure(&self) -> FailureOutcome {
        let mut failures = self.consecutive_failures.lock();
        *failures = failures.saturating_add(1);
        let count = *failures;

        let threshold = self.failure_threshold();
        let auto_paused = threshold > 0
            && count >= threshold
            && self.transition(JobStatus::Running, JobStatus::Paused);

        FailureOutcome {
            consecutive_failures: count,
            auto_paused,
        }
    }

    /// Human-readable reason attached to an auto-pause notification
    pub fn auto_pause_reason(&self, consecutive_failures: u32) -> String {
        format!(
            "Paused after {} consecutive failures (threshold {})",
            consecutive_failures,
            self.failure_threshold()
        )
    }
}
