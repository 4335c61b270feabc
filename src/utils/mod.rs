//! Utility modules for the orchestrator
//!
//! - **error**: crate error type and HTTP error mapping
//! - **logging**: subscriber setup

pub mod error;
pub mod logging;

pub use logging::init_logging;
