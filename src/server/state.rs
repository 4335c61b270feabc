//! Application state shared across HTTP handlers

use crate::config::Config;
use crate::core::Orchestrator;
use std::sync::Arc;

/// HTTP server state shared across handlers
///
/// Cloned into every actix worker; all fields are `Arc`s.
#[derive(Clone)]
pub struct AppState {
    /// Loaded configuration (read-only)
    pub config: Arc<Config>,
    /// The single orchestrator owning the job registry
    pub orchestrator: Arc<Orchestrator>,
}

impl AppState {
    pub fn new(config: Config, orchestrator: Orchestrator) -> Self {
        Self {
            config: Arc::new(config),
            orchestrator: Arc::new(orchestrator),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }
}
