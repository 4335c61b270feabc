//! Event model for the data plane

use crate::core::jobs::JobId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One reported row outcome
///
/// Results are an append-only log keyed by `(row_number, identifier)`; a
/// verification amendment is a second entry, not a replacement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RowResult {
    /// 1-based position in the original row list
    pub row_number: usize,
    pub identifier: String,
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_response: Option<Value>,
    /// Set only on verification amendments
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verified: Option<bool>,
    pub timestamp: DateTime<Utc>,
}

impl RowResult {
    pub fn success(
        row_number: usize,
        identifier: impl Into<String>,
        details: impl Into<String>,
        full_response: Option<Value>,
    ) -> Self {
        Self {
            row_number,
            identifier: identifier.into(),
            success: true,
            details: Some(details.into()),
            error: None,
            full_response,
            verified: None,
            timestamp: Utc::now(),
        }
    }

    pub fn failure(
        row_number: usize,
        identifier: impl Into<String>,
        error: impl Into<String>,
        full_response: Option<Value>,
    ) -> Self {
        Self {
            row_number,
            identifier: identifier.into(),
            success: false,
            details: None,
            error: Some(error.into()),
            full_response,
            verified: None,
            timestamp: Utc::now(),
        }
    }

    /// Amendment for a created row. `success` stays true either way.
    pub fn verification(
        row_number: usize,
        identifier: impl Into<String>,
        verified: bool,
        message: impl Into<String>,
        full_response: Option<Value>,
    ) -> Self {
        let message = message.into();
        let (details, error) = if verified {
            (Some(message), None)
        } else {
            (Some("Created but verification failed".to_string()), Some(message))
        };
        Self {
            row_number,
            identifier: identifier.into(),
            success: true,
            details,
            error,
            full_response,
            verified: Some(verified),
            timestamp: Utc::now(),
        }
    }
}

/// Counts carried by terminal job events
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobSummary {
    pub total: usize,
    pub dispatched: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub skipped: usize,
    pub elapsed_ms: u64,
}

/// Outbound event, one job to many observers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum BulkEvent {
    /// A row was dispatched to the remote
    RowProcessing {
        job_id: JobId,
        row_number: usize,
        identifier: String,
        timestamp: DateTime<Utc>,
    },
    /// Final outcome of a row's remote call
    RowComplete { job_id: JobId, result: RowResult },
    /// Verification amendment for an earlier successful row
    RowVerified { job_id: JobId, result: RowResult },
    /// Seconds until the next batch or item
    JobCountdown { job_id: JobId, seconds: u64 },
    /// The failure threshold was reached
    JobAutoPaused {
        job_id: JobId,
        consecutive_failures: u32,
        reason: String,
    },
    /// Operator stopped the job
    JobEnded { job_id: JobId, summary: JobSummary },
    /// Every row was worked
    JobComplete { job_id: JobId, summary: JobSummary },
    /// Fatal, job-level failure
    JobError {
        job_id: JobId,
        code: String,
        message: String,
    },
}

impl BulkEvent {
    pub fn job_id(&self) -> &JobId {
        match self {
            BulkEvent::RowProcessing { job_id, .. }
            | BulkEvent::RowComplete { job_id, .. }
            | BulkEvent::RowVerified { job_id, .. }
            | BulkEvent::JobCountdown { job_id, .. }
            | BulkEvent::JobAutoPaused { job_id, .. }
            | BulkEvent::JobEnded { job_id, .. }
            | BulkEvent::JobComplete { job_id, .. }
            | BulkEvent::JobError { job_id, .. } => job_id,
        }
    }

    /// Terminal events end a job's stream
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            BulkEvent::JobEnded { .. } | BulkEvent::JobComplete { .. } | BulkEvent::JobError { .. }
        )
    }
}
