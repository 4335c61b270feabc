//! reqwest-backed remote adapter

use super::RemoteCall;
use super::types::{HttpMethod, RemoteError, RemoteRequest};
use crate::config::RemoteConfig;
use crate::utils::error::{BulkError, Result};
use async_trait::async_trait;
use governor::clock::DefaultClock;
use governor::state::{InMemoryState, NotKeyed};
use governor::{Quota, RateLimiter};
use reqwest::Client;
use serde_json::Value;
use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

type DirectLimiter = RateLimiter<NotKeyed, InMemoryState, DefaultClock>;

/// HTTP implementation of [`RemoteCall`]
#[derive(Clone)]
pub struct HttpRemote {
    client: Client,
    base_url: String,
    default_token: Option<String>,
    limiter: Option<Arc<DirectLimiter>>,
}

impl HttpRemote {
    /// Create a new adapter from configuration
    pub fn new(config: &RemoteConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| BulkError::config(format!("Failed to create HTTP client: {}", e)))?;

        let limiter = config
            .requests_per_second
            .and_then(NonZeroU32::new)
            .map(|rps| Arc::new(RateLimiter::direct(Quota::per_second(rps))));

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            default_token: config.token.clone(),
            limiter,
        })
    }

    fn url_for(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            path.to_string()
        } else {
            format!("{}/{}", self.base_url, path.trim_start_matches('/'))
        }
    }
}

fn to_reqwest_method(method: HttpMethod) -> reqwest::Method {
    match method {
        HttpMethod::Get => reqwest::Method::GET,
        HttpMethod::Post => reqwest::Method::POST,
        HttpMethod::Put => reqwest::Method::PUT,
        HttpMethod::Patch => reqwest::Method::PATCH,
        HttpMethod::Delete => reqwest::Method::DELETE,
    }
}

fn decode_body(text: &str) -> Value {
    if text.trim().is_empty() {
        return Value::Null;
    }
    serde_json::from_str(text).unwrap_or_else(|_| Value::String(text.to_string()))
}

fn error_message(body: &Value) -> String {
    match body {
        Value::Object(map) => ["message", "error", "detail", "title"]
            .iter()
            .find_map(|key| match map.get(*key) {
                Some(Value::String(s)) => Some(s.clone()),
                Some(Value::Object(inner)) => inner
                    .get("message")
                    .and_then(Value::as_str)
                    .map(str::to_string),
                _ => None,
            })
            .unwrap_or_default(),
        Value::String(s) => s.chars().take(200).collect(),
        _ => String::new(),
    }
}

#[async_trait]
impl RemoteCall for HttpRemote {
    async fn call(&self, request: RemoteRequest) -> std::result::Result<Value, RemoteError> {
        if let Some(limiter) = &self.limiter {
            limiter.until_ready().await;
        }

        let url = self.url_for(&request.path);
        debug!("{} {}", request.method, url);

        let mut builder = self
            .client
            .request(to_reqwest_method(request.method), &url);

        let token = request
            .credentials
            .token
            .as_ref()
            .or(self.default_token.as_ref());
        if let Some(token) = token {
            builder = builder.bearer_auth(token);
        }
        for (key, value) in &request.credentials.headers {
            builder = builder.header(key, value);
        }
        if let Some(payload) = &request.payload {
            builder = builder.json(payload);
        }

        let response = builder.send().await?;
        let status = response.status();
        let text = response.text().await?;
        let body = decode_body(&text);

        if status.is_success() {
            return Ok(body);
        }

        if status.as_u16() == 429 {
            return Err(RemoteError::RateLimited(error_message(&body)));
        }

        Err(RemoteError::Status {
            status: status.as_u16(),
            message: error_message(&body),
            body: Some(body),
        })
    }
}
