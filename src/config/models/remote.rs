//! Remote API configuration

use super::*;
use serde::{Deserialize, Serialize};

/// Settings for the HTTP remote adapter
#[derive(Clone, PartialEq, Serialize, Deserialize)]
pub struct RemoteConfig {
    /// Base URL that relative job paths are joined onto
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Per-call timeout in seconds
    #[serde(default = "default_remote_timeout")]
    pub timeout_secs: u64,
    /// User agent sent with every call
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    /// Token used when a job supplies no credentials
    #[serde(default)]
    pub token: Option<String>,
    /// Client-side cap on calls per second across all jobs
    #[serde(default)]
    pub requests_per_second: Option<u32>,
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_remote_timeout(),
            user_agent: default_user_agent(),
            token: None,
            requests_per_second: None,
        }
    }
}

impl std::fmt::Debug for RemoteConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RemoteConfig")
            .field("base_url", &self.base_url)
            .field("timeout_secs", &self.timeout_secs)
            .field("user_agent", &self.user_agent)
            .field("token", &self.token.as_ref().map(|_| "***"))
            .field("requests_per_second", &self.requests_per_second)
            .finish()
    }
}
