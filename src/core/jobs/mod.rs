//! Job registry
//!
//! Process-wide map from job identifier to mutable control state. Entries are
//! created at start time and removed exactly once by the job's cleanup path.

mod policy;
mod registry;
mod types;

pub use policy::FailureOutcome;
pub use registry::JobRegistry;
pub use types::{Job, JobId, JobSnapshot, JobStatus};
