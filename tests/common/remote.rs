//! Scripted remote
//!
//! Creates succeed with `{"data": {"id": "id-<name>"}}` unless the row's
//! `name` is scripted to fail or panic. Reads succeed unless the id is scripted as
//! missing.

use async_trait::async_trait;
use bulkops::core::remote::{HttpMethod, RemoteCall, RemoteError, RemoteRequest};
use parking_lot::Mutex;
use serde_json::{Value, json};
use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

/// One call as the remote saw it
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedCall {
    pub method: HttpMethod,
    pub path: String,
    pub payload: Option<Value>,
}

#[derive(Debug, Default)]
pub struct ScriptedRemote {
    failing: HashSet<String>,
    panicking: HashSet<String>,
    missing: HashSet<String>,
    latency: Duration,
    calls: Mutex<Vec<RecordedCall>>,
    in_flight: AtomicUsize,
    peak: AtomicUsize,
}

impl ScriptedRemote {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates for these row names fail with HTTP 422
    pub fn fail_on(mut self, names: &[&str]) -> Self {
        self.failing.extend(names.iter().map(|n| n.to_string()));
        self
    }

    /// Creates for these row names panic inside the call
    pub fn panic_on(mut self, names: &[&str]) -> Self {
        self.panicking.extend(names.iter().map(|n| n.to_string()));
        self
    }

    /// Reads of these resource ids fail with HTTP 404
    pub fn missing_on_read(mut self, ids: &[&str]) -> Self {
        self.missing.extend(ids.iter().map(|id| id.to_string()));
        self
    }

    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().clone()
    }

    /// Row names of every create, in dispatch order
    pub fn created_names(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter(|call| call.method != HttpMethod::Get)
            .filter_map(|call| {
                call.payload
                    .as_ref()
                    .and_then(|p| p.get("name"))
                    .and_then(Value::as_str)
                    .map(str::to_string)
            })
            .collect()
    }

    pub fn reads(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter(|call| call.method == HttpMethod::Get)
            .map(|call| call.path)
            .collect()
    }

    /// Highest number of creates observed in flight at once
    pub fn peak_in_flight(&self) -> usize {
        self.peak.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RemoteCall for ScriptedRemote {
    async fn call(&self, request: RemoteRequest) -> Result<Value, RemoteError> {
        self.calls.lock().push(RecordedCall {
            method: request.method,
            path: request.path.clone(),
            payload: request.payload.clone(),
        });

        if request.method == HttpMethod::Get {
            let id = request.path.rsplit('/').next().unwrap_or_default();
            return if self.missing.contains(id) {
                Err(RemoteError::Status {
                    status: 404,
                    message: "not found".to_string(),
                    body: Some(json!({"error": "not found"})),
                })
            } else {
                Ok(json!({"id": id}))
            };
        }

        let name = request
            .payload
            .as_ref()
            .and_then(|p| p.get("name"))
            .and_then(Value::as_str)
            .unwrap_or_default();
        if self.panicking.contains(name) {
            panic!("remote blew up on {}", name);
        }

        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);
        tokio::time::sleep(self.latency).await;
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        if self.failing.contains(name) {
            Err(RemoteError::Status {
                status: 422,
                message: format!("rejected {}", name),
                body: Some(json!({"error": {"message": format!("rejected {}", name)}})),
            })
        } else {
            Ok(json!({"data": {"id": format!("id-{}", name)}}))
        }
    }
}
