//! Remote call capability
//!
//! The orchestrator treats the per-service API adapter as an opaque
//! `call(method, path, payload, credentials)` function. This module defines
//! that seam as the [`RemoteCall`] trait and ships a reqwest-backed adapter.

mod http;
mod types;

pub use http::HttpRemote;
pub use types::{Credentials, HttpMethod, RemoteError, RemoteRequest, render_path, strip_empty};

use async_trait::async_trait;

/// An opaque remote call, as consumed by the executors
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RemoteCall: Send + Sync {
    /// Issue one call and return the decoded response body
    async fn call(&self, request: RemoteRequest) -> Result<serde_json::Value, RemoteError>;
}
