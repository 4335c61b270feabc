//! Configuration data models
//!
//! This module defines all configuration structures used throughout the orchestrator.

#![allow(missing_docs)]

pub mod logging;
pub mod orchestrator;
pub mod remote;
pub mod server;

// Re-export all configuration types
pub use logging::*;
pub use orchestrator::*;
pub use remote::*;
pub use server::*;

/// Default server host
pub fn default_host() -> String {
    "127.0.0.1".to_string()
}

/// Default server port
pub fn default_port() -> u16 {
    8080
}

/// Default log level
pub fn default_log_level() -> String {
    "info".to_string()
}

/// Default remote timeout in seconds
pub fn default_remote_timeout() -> u64 {
    30
}

/// Default user agent for remote calls
pub fn default_user_agent() -> String {
    format!("bulkops/{}", env!("CARGO_PKG_VERSION"))
}

/// Default remote base URL
pub fn default_base_url() -> String {
    "http://127.0.0.1:9000".to_string()
}

/// Default pause poll interval in milliseconds
pub fn default_pause_poll_interval_ms() -> u64 {
    1000
}

/// Default cancellation poll interval in milliseconds
pub fn default_cancel_poll_interval_ms() -> u64 {
    50
}

/// Default verification grace period in milliseconds
pub fn default_verification_grace_ms() -> u64 {
    3000
}

/// Default upper bound for per-job concurrency
pub fn default_max_concurrency() -> usize {
    50
}

/// Default upper bound for rows per job
pub fn default_max_rows() -> usize {
    100_000
}
