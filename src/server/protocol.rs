//! Control channel messages
//!
//! Inbound commands address a job by `(profile, jobType)`; the owning
//! connection completes the job id.

use crate::core::Orchestrator;
use crate::core::batch::StartJobRequest;
use crate::core::jobs::JobId;
use crate::core::reporter::EventSink;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, warn};

/// Inbound control command
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum ControlCommand {
    StartJob {
        profile: String,
        job_type: String,
        request: Box<StartJobRequest>,
    },
    PauseJob { profile: String, job_type: String },
    ResumeJob { profile: String, job_type: String },
    EndJob { profile: String, job_type: String },
}

impl ControlCommand {
    pub fn name(&self) -> &'static str {
        match self {
            ControlCommand::StartJob { .. } => "startJob",
            ControlCommand::PauseJob { .. } => "pauseJob",
            ControlCommand::ResumeJob { .. } => "resumeJob",
            ControlCommand::EndJob { .. } => "endJob",
        }
    }

    fn job_id(&self, connection: &str) -> JobId {
        let (profile, job_type) = match self {
            ControlCommand::StartJob {
                profile, job_type, ..
            }
            | ControlCommand::PauseJob { profile, job_type }
            | ControlCommand::ResumeJob { profile, job_type }
            | ControlCommand::EndJob { profile, job_type } => (profile, job_type),
        };
        JobId::new(connection, profile.as_str(), job_type.as_str())
    }
}

/// Direct reply to one command; job events follow separately
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum ControlReply {
    /// `changed` is false when the command was a no-op
    CommandAccepted {
        command: String,
        job_id: JobId,
        changed: bool,
    },
    CommandError { message: String },
}

impl ControlReply {
    fn error(message: impl Into<String>) -> Self {
        ControlReply::CommandError {
            message: message.into(),
        }
    }
}

/// Parse and apply one text frame from `connection`
pub fn handle_command(
    orchestrator: &Orchestrator,
    connection: &str,
    sink: Arc<dyn EventSink>,
    text: &str,
) -> ControlReply {
    let command: ControlCommand = match serde_json::from_str(text) {
        Ok(command) => command,
        Err(e) => {
            debug!("Unparseable command on {}: {}", connection, e);
            return ControlReply::error(format!("Invalid command: {}", e));
        }
    };

    let name = command.name().to_string();
    let job_id = command.job_id(connection);
    let changed = match command {
        ControlCommand::StartJob { request, .. } => {
            match orchestrator.start_job(job_id.clone(), *request, sink) {
                Ok(_) => true,
                Err(e) => {
                    warn!("{} rejected for {}: {}", name, job_id, e);
                    return ControlReply::error(e.to_string());
                }
            }
        }
        ControlCommand::PauseJob { .. } => orchestrator.pause_job(&job_id),
        ControlCommand::ResumeJob { .. } => orchestrator.resume_job(&job_id),
        ControlCommand::EndJob { .. } => orchestrator.end_job(&job_id),
    };

    ControlReply::CommandAccepted {
        command: name,
        job_id,
        changed,
    }
}
