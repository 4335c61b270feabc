//! Core functionality for the orchestrator
//!
//! Job registry, execution strategies, pacing, reporting and the remote
//! call seam. Orchestration talks to the remote only through `RemoteCall`
//! and is transport-agnostic; `remote::http` is the reqwest adapter.

pub mod batch;
pub mod delay;
pub mod jobs;
pub mod orchestrator;
pub mod remote;
pub mod reporter;
pub mod timer;
pub mod verification;

pub use orchestrator::{JobOutcome, Orchestrator, StartedJob};
