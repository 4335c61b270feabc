//! Configuration management for the orchestrator
//!
//! This module handles loading, validation, and management of all configuration.

pub mod models;
pub mod validation;

pub use models::*;
pub use validation::Validate;

use crate::utils::error::{BulkError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info};

/// Main configuration struct
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub orchestrator: OrchestratorConfig,
    #[serde(default)]
    pub remote: RemoteConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from a YAML file, then apply environment overrides
    pub async fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        info!("Loading configuration from: {:?}", path);

        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| BulkError::config(format!("Failed to read config file: {}", e)))?;

        let mut config: Config = serde_yaml::from_str(&content)
            .map_err(|e| BulkError::config(format!("Failed to parse config: {}", e)))?;
        config.apply_env_overrides(|key| std::env::var(key).ok())?;

        config.validate()?;

        debug!("Configuration loaded successfully");
        Ok(config)
    }

    /// Load configuration from environment variables only
    pub fn from_env() -> Result<Self> {
        info!("Loading configuration from environment variables");

        let mut config = Self::default();
        config.apply_env_overrides(|key| std::env::var(key).ok())?;

        config.validate()?;
        Ok(config)
    }

    /// Apply `BULKOPS_*` overrides using the given variable lookup
    pub fn apply_env_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(host) = lookup("BULKOPS_HOST") {
            self.server.host = host;
        }
        if let Some(port) = lookup("BULKOPS_PORT") {
            self.server.port = port
                .parse()
                .map_err(|e| BulkError::config(format!("Invalid BULKOPS_PORT: {}", e)))?;
        }
        if let Some(base_url) = lookup("BULKOPS_REMOTE_BASE_URL") {
            self.remote.base_url = base_url;
        }
        if let Some(token) = lookup("BULKOPS_REMOTE_TOKEN") {
            self.remote.token = Some(token);
        }
        if let Some(level) = lookup("BULKOPS_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Some(strategy) = lookup("BULKOPS_DEFAULT_STRATEGY") {
            self.orchestrator.default_strategy = strategy
                .parse()
                .map_err(|e: String| BulkError::config(format!("Invalid BULKOPS_DEFAULT_STRATEGY: {}", e)))?;
        }
        Ok(())
    }

    /// Validate the entire configuration
    pub fn validate(&self) -> Result<()> {
        debug!("Validating configuration");

        self.server
            .validate()
            .map_err(|e| BulkError::config(format!("Server config error: {}", e)))?;
        self.orchestrator
            .validate()
            .map_err(|e| BulkError::config(format!("Orchestrator config error: {}", e)))?;
        self.remote
            .validate()
            .map_err(|e| BulkError::config(format!("Remote config error: {}", e)))?;
        self.logging
            .validate()
            .map_err(|e| BulkError::config(format!("Logging config error: {}", e)))?;

        Ok(())
    }
}
