//! Post-creation verification
//!
//! After a successful create, re-read the resource once after a grace period
//! and report an amendment. A failed verification never turns a created row
//! into a failed one.

use crate::core::remote::{Credentials, HttpMethod, RemoteCall, RemoteRequest, render_path};
use crate::core::reporter::RowResult;
use serde_json::{Map, Value};
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// Keys treated as a direct resource id, in priority order
const ID_KEYS: [&str; 4] = ["id", "Id", "ID", "_id"];

/// Best-effort search for a created resource's id.
///
/// Order: a direct id key, then any key ending in `_id`, then nested objects.
/// Keys are visited in the map's sorted order, so the first match is stable.
// TODO: responses with several plausible id fields resolve to the first match;
// let jobs name the id field explicitly once a remote needs it.
pub fn extract_resource_id(value: &Value) -> Option<String> {
    let map = value.as_object()?;
    find_id(map)
}

fn find_id(map: &Map<String, Value>) -> Option<String> {
    if let Some(id) = ID_KEYS
        .iter()
        .find_map(|key| map.get(*key).and_then(scalar_id))
    {
        return Some(id);
    }

    if let Some(id) = map
        .iter()
        .filter(|(key, _)| key.to_ascii_lowercase().ends_with("_id"))
        .find_map(|(_, value)| scalar_id(value))
    {
        return Some(id);
    }

    map.values()
        .filter_map(Value::as_object)
        .find_map(find_id)
}

fn scalar_id(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// A fetched body counts as found when it is present and non-empty
pub fn is_found(body: &Value) -> bool {
    match body {
        Value::Null => false,
        Value::Object(map) => !map.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::String(s) => !s.trim().is_empty(),
        _ => true,
    }
}

/// Re-reads created resources for one job
#[derive(Clone)]
pub struct Verifier {
    remote: Arc<dyn RemoteCall>,
    path_template: String,
    credentials: Credentials,
    grace: Duration,
}

impl Verifier {
    pub fn new(
        remote: Arc<dyn RemoteCall>,
        path_template: impl Into<String>,
        credentials: Credentials,
        grace: Duration,
    ) -> Self {
        Self {
            remote,
            path_template: path_template.into(),
            credentials,
            grace,
        }
    }

    /// Wait out the grace period, fetch once, and build the amendment
    pub async fn verify(
        &self,
        row_number: usize,
        identifier: &str,
        resource_id: &str,
        row_payload: &Map<String, Value>,
    ) -> RowResult {
        tokio::time::sleep(self.grace).await;

        let mut vars = row_payload.clone();
        vars.insert("id".to_string(), Value::String(resource_id.to_string()));
        let path = render_path(&self.path_template, &vars);
        debug!("Verifying row {} at {}", row_number, path);

        let request = RemoteRequest::new(HttpMethod::Get, path, None, self.credentials.clone());
        match self.remote.call(request).await {
            Ok(body) if is_found(&body) => RowResult::verification(
                row_number,
                identifier,
                true,
                format!("Verified: resource {} exists", resource_id),
                Some(body),
            ),
            Ok(body) => RowResult::verification(
                row_number,
                identifier,
                false,
                format!("Resource {} returned an empty response", resource_id),
                Some(body),
            ),
            Err(e) => RowResult::verification(
                row_number,
                identifier,
                false,
                e.summary(),
                e.body().cloned(),
            ),
        }
    }
}
