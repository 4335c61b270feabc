//! Orchestrator configuration

use super::*;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::time::Duration;

/// Execution strategy used for a job
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StrategyKind {
    /// Fixed-size batches, each fully awaited, delay between batches
    #[default]
    Batch,
    /// Long-lived workers over a shared cursor, delay after every item
    WorkerPool,
}

impl FromStr for StrategyKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().replace('-', "_").as_str() {
            "batch" => Ok(StrategyKind::Batch),
            "worker_pool" | "pool" => Ok(StrategyKind::WorkerPool),
            other => Err(format!("unknown strategy: {}", other)),
        }
    }
}

/// How executors wait while a job is paused
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PauseWait {
    /// Re-check the status every `pause_poll_interval_ms`
    #[default]
    Poll,
    /// Sleep until the status channel reports a change
    Notify,
}

/// Orchestrator configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrchestratorConfig {
    /// Strategy used when a start request names none
    #[serde(default)]
    pub default_strategy: StrategyKind,
    /// Pause waiting mode
    #[serde(default)]
    pub pause_wait: PauseWait,
    /// Poll interval while paused
    #[serde(default = "default_pause_poll_interval_ms")]
    pub pause_poll_interval_ms: u64,
    /// How often delays check for cancellation
    #[serde(default = "default_cancel_poll_interval_ms")]
    pub cancel_poll_interval_ms: u64,
    /// Wait before re-reading a created resource
    #[serde(default = "default_verification_grace_ms")]
    pub verification_grace_ms: u64,
    /// Upper bound for per-job concurrency
    #[serde(default = "default_max_concurrency")]
    pub max_concurrency: usize,
    /// Upper bound for rows per job
    #[serde(default = "default_max_rows")]
    pub max_rows: usize,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            default_strategy: StrategyKind::default(),
            pause_wait: PauseWait::default(),
            pause_poll_interval_ms: default_pause_poll_interval_ms(),
            cancel_poll_interval_ms: default_cancel_poll_interval_ms(),
            verification_grace_ms: default_verification_grace_ms(),
            max_concurrency: default_max_concurrency(),
            max_rows: default_max_rows(),
        }
    }
}

impl OrchestratorConfig {
    pub fn pause_poll_interval(&self) -> Duration {
        Duration::from_millis(self.pause_poll_interval_ms)
    }

    pub fn cancel_poll_interval(&self) -> Duration {
        Duration::from_millis(self.cancel_poll_interval_ms)
    }

    pub fn verification_grace(&self) -> Duration {
        Duration::from_millis(self.verification_grace_ms)
    }
}
