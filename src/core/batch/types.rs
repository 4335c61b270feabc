//! Work items and start requests

use crate::config::StrategyKind;
use crate::core::remote::{Credentials, HttpMethod};
use crate::utils::error::{BulkError, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One logical row
#[derive(Debug, Clone, PartialEq)]
pub struct WorkItem {
    /// 1-based, assigned before any fan-out
    pub row_number: usize,
    pub identifier: String,
    /// Job defaults merged under the row's own values
    pub payload: Map<String, Value>,
}

/// Where a job's rows come from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum RowSource {
    /// One value per entry, split on newlines and `separator`
    Delimited {
        text: String,
        #[serde(default = "default_separator")]
        separator: String,
        /// Payload field the value is written to
        field: String,
    },
    /// Pre-built payloads, one object per row
    Records { records: Vec<Value> },
}

fn default_separator() -> String {
    ",".to_string()
}

fn default_concurrency() -> usize {
    1
}

/// Everything needed to start one job
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StartJobRequest {
    pub rows: RowSource,
    /// Values applied to every row unless the row overrides them
    #[serde(default)]
    pub defaults: Map<String, Value>,
    /// Field whose value identifies a row; rows without it become "Row N"
    #[serde(default)]
    pub primary_field: Option<String>,
    #[serde(default)]
    pub method: HttpMethod,
    /// Create path; `{field}` placeholders are filled from the row
    pub path: String,
    /// Read-back path for verification; `{id}` is the created resource id
    #[serde(default)]
    pub verify_path: Option<String>,
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,
    #[serde(default)]
    pub delay_ms: u64,
    /// Consecutive failures before auto-pause; 0 disables
    #[serde(default)]
    pub failure_threshold: u32,
    #[serde(default)]
    pub verify: bool,
    /// Identifiers already processed by an earlier run
    #[serde(default)]
    pub resume_ids: Vec<String>,
    #[serde(default)]
    pub strategy: Option<StrategyKind>,
    #[serde(default)]
    pub credentials: Credentials,
}

impl StartJobRequest {
    pub fn new(rows: RowSource, path: impl Into<String>) -> Self {
        Self {
            rows,
            defaults: Map::new(),
            primary_field: None,
            method: HttpMethod::Post,
            path: path.into(),
            verify_path: None,
            concurrency: default_concurrency(),
            delay_ms: 0,
            failure_threshold: 0,
            verify: false,
            resume_ids: Vec::new(),
            strategy: None,
            credentials: Credentials::default(),
        }
    }

    /// Verification path, defaulting to `<path>/{id}`
    pub fn verification_path(&self) -> String {
        self.verify_path
            .clone()
            .unwrap_or_else(|| format!("{}/{{id}}", self.path.trim_end_matches('/')))
    }
}

/// Expand a row source into numbered work items
pub fn build_work_items(
    source: &RowSource,
    defaults: &Map<String, Value>,
    primary_field: Option<&str>,
) -> Result<Vec<WorkItem>> {
    let (records, primary_field) = match source {
        RowSource::Delimited {
            text,
            separator,
            field,
        } => {
            if separator.is_empty() {
                return Err(BulkError::row_source("Separator cannot be empty"));
            }
            if field.trim().is_empty() {
                return Err(BulkError::row_source("Delimited rows need a target field"));
            }
            let records: Vec<Map<String, Value>> = text
                .lines()
                .flat_map(|line| line.split(separator.as_str()))
                .map(str::trim)
                .filter(|value| !value.is_empty())
                .map(|value| {
                    let mut row = Map::new();
                    row.insert(field.clone(), Value::String(value.to_string()));
                    row
                })
                .collect();
            (records, primary_field.or(Some(field.as_str())))
        }
        RowSource::Records { records } => {
            let records = records
                .iter()
                .enumerate()
                .map(|(index, record)| match record {
                    Value::Object(map) => Ok(map.clone()),
                    other => Err(BulkError::row_source(format!(
                        "Row {} is not an object: {}",
                        index + 1,
                        other
                    ))),
                })
                .collect::<Result<Vec<_>>>()?;
            (records, primary_field)
        }
    };

    if records.is_empty() {
        return Err(BulkError::row_source("Row list is empty"));
    }

    Ok(records
        .into_iter()
        .enumerate()
        .map(|(index, row)| {
            let row_number = index + 1;
            let mut payload = defaults.clone();
            payload.extend(row);

            let identifier = primary_field
                .and_then(|field| payload.get(field))
                .and_then(identifier_text)
                .unwrap_or_else(|| format!("Row {}", row_number));

            WorkItem {
                row_number,
                identifier,
                payload,
            }
        })
        .collect())
}

fn identifier_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}
