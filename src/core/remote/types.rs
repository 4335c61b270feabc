//! Remote call request and error types

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::fmt;
use thiserror::Error;
use url::form_urlencoded;

/// HTTP method of a remote call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    Get,
    #[default]
    Post,
    Put,
    Patch,
    Delete,
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Delete => "DELETE",
        };
        f.write_str(name)
    }
}

/// Credentials forwarded untouched to the remote adapter
#[derive(Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Credentials {
    /// Bearer token
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    /// Extra headers required by the remote service
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub headers: HashMap<String, String>,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("token", &self.token.as_ref().map(|_| "***"))
            .field("headers", &self.headers.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// One remote call
#[derive(Debug, Clone, PartialEq)]
pub struct RemoteRequest {
    pub method: HttpMethod,
    pub path: String,
    pub payload: Option<Value>,
    pub credentials: Credentials,
}

impl RemoteRequest {
    /// Build a request; payload keys with empty or null values are stripped
    pub fn new(
        method: HttpMethod,
        path: impl Into<String>,
        payload: Option<Value>,
        credentials: Credentials,
    ) -> Self {
        Self {
            method,
            path: path.into(),
            payload: payload.map(strip_empty),
            credentials,
        }
    }
}

/// Structured error a remote call may throw
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RemoteError {
    /// Non-success HTTP status
    #[error("HTTP {status}: {message}")]
    Status {
        status: u16,
        message: String,
        body: Option<Value>,
    },

    /// Transport failure
    #[error("Network error: {0}")]
    Network(String),

    /// Call exceeded its deadline
    #[error("Timeout: {0}")]
    Timeout(String),

    /// Response body could not be decoded
    #[error("Decode error: {0}")]
    Decode(String),

    /// Remote refused the call for rate reasons
    #[error("Rate limited: {0}")]
    RateLimited(String),
}

impl RemoteError {
    /// Human text placed in a failed row result
    pub fn summary(&self) -> String {
        match self {
            RemoteError::Status {
                status, message, ..
            } if message.is_empty() => format!("HTTP {}", status),
            other => other.to_string(),
        }
    }

    /// Remote body attached to the error, if any
    pub fn body(&self) -> Option<&Value> {
        match self {
            RemoteError::Status { body, .. } => body.as_ref(),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for RemoteError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            RemoteError::Timeout(err.to_string())
        } else if err.is_decode() {
            RemoteError::Decode(err.to_string())
        } else {
            RemoteError::Network(err.to_string())
        }
    }
}

/// Drop object keys whose value is null or an empty string, recursively
pub fn strip_empty(value: Value) -> Value {
    match value {
        Value::Object(map) => Value::Object(
            map.into_iter()
                .filter(|(_, v)| !is_empty_value(v))
                .map(|(k, v)| (k, strip_empty(v)))
                .collect::<Map<String, Value>>(),
        ),
        other => other,
    }
}

fn is_empty_value(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.trim().is_empty(),
        _ => false,
    }
}

/// Fill `{name}` placeholders from `vars`; unknown placeholders are kept.
/// Each value is percent-encoded as a single path segment.
pub fn render_path(template: &str, vars: &Map<String, Value>) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        match after.find('}') {
            Some(close) => {
                let name = &after[..close];
                match vars.get(name) {
                    Some(Value::String(s)) => out.push_str(&encode_segment(s)),
                    Some(Value::Null) | None => {
                        out.push('{');
                        out.push_str(name);
                        out.push('}');
                    }
                    Some(other) => out.push_str(&encode_segment(&other.to_string())),
                }
                rest = &after[close + 1..];
            }
            None => {
                out.push_str(&rest[open..]);
                rest = "";
            }
        }
    }
    out.push_str(rest);
    out
}

/// Percent-encode everything but unreserved characters. `/`, `?`, `#` and
/// spaces cannot escape the segment.
fn encode_segment(value: &str) -> String {
    form_urlencoded::byte_serialize(value.as_bytes())
        .collect::<String>()
        .replace('+', "%20")
}
