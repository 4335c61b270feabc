//! Common test utilities for bulkops
//!
//! All helpers drive real orchestrator code; only the remote is scripted.

pub mod remote;

pub use fixtures::{EventLog, fast_config, job_id, orchestrator, request, wait_until};
pub use remote::{RecordedCall, ScriptedRemote};
