//! Configuration validation
//!
//! This module provides validation logic for all configuration structures.

use super::models::*;
use url::Url;

/// Validation trait for configuration structures
pub trait Validate {
    fn validate(&self) -> Result<(), String>;
}

impl Validate for ServerConfig {
    fn validate(&self) -> Result<(), String> {
        if self.host.trim().is_empty() {
            return Err("Server host cannot be empty".to_string());
        }
        if self.port == 0 {
            return Err("Server port cannot be 0".to_string());
        }
        if self.workers == Some(0) {
            return Err("Server workers must be greater than 0".to_string());
        }
        Ok(())
    }
}

impl Validate for RemoteConfig {
    fn validate(&self) -> Result<(), String> {
        let url = Url::parse(&self.base_url)
            .map_err(|e| format!("Remote base_url is invalid: {}", e))?;
        match url.scheme() {
            "http" | "https" => {}
            scheme => {
                return Err(format!(
                    "Remote base_url must use http:// or https://, got: {}",
                    scheme
                ));
            }
        }
        if self.timeout_secs == 0 {
            return Err("Remote timeout_secs must be greater than 0".to_string());
        }
        if self.requests_per_second == Some(0) {
            return Err("Remote requests_per_second must be greater than 0".to_string());
        }
        Ok(())
    }
}

impl Validate for OrchestratorConfig {
    fn validate(&self) -> Result<(), String> {
        if self.pause_poll_interval_ms == 0 {
            return Err("pause_poll_interval_ms must be greater than 0".to_string());
        }
        if self.cancel_poll_interval_ms == 0 {
            return Err("cancel_poll_interval_ms must be greater than 0".to_string());
        }
        if self.max_concurrency == 0 {
            return Err("max_concurrency must be greater than 0".to_string());
        }
        if self.max_rows == 0 {
            return Err("max_rows must be greater than 0".to_string());
        }
        Ok(())
    }
}

impl Validate for LoggingConfig {
    fn validate(&self) -> Result<(), String> {
        match self.level.to_ascii_lowercase().as_str() {
            "trace" | "debug" | "info" | "warn" | "error" | "off" => Ok(()),
            other => Err(format!("Unknown log level: {}", other)),
        }
    }
}
