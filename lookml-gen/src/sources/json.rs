//! JSON, NDJSON and YAML document source.
//!
//! A document is either a list of records or a single record. Nested objects
//! are flattened into dotted column names (`{"user": {"id": 1}}` becomes the
//! column `user.id`), and arrays are kept as JSON text. Columns appear in the
//! order their keys are first seen.
//!
//! Each column is typed from its non-null values: all booleans give
//! `Boolean`, all integers `Int64`, all numbers `Float64`, anything else
//! `Utf8`. A record missing a key contributes a null.

use std::path::Path;
use std::sync::Arc;

use arrow::array::{ArrayRef, BooleanArray, Float64Array, Int64Array, StringArray};
use async_trait::async_trait;
use serde_json::{Map, Value};
use tracing::{debug, info, instrument};

use super::DatasetSource;
use crate::dataset::Dataset;
use crate::error::{LookmlError, Result};
use crate::logging::truncate_field;

/// Document syntax of a [`JsonSource`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    /// A single JSON value
    Json,
    /// One JSON object per line
    NdJson,
    Yaml,
}

impl DocumentFormat {
    /// Detects the format from a file extension.
    pub fn from_path(path: &str) -> Option<Self> {
        let extension = Path::new(path)
            .extension()
            .and_then(|e| e.to_str())?
            .to_ascii_lowercase();
        match extension.as_str() {
            "json" => Some(Self::Json),
            "ndjson" | "jsonl" => Some(Self::NdJson),
            "yaml" | "yml" => Some(Self::Yaml),
            _ => None,
        }
    }

    fn label(&self) -> &'static str {
        match self {
            Self::Json => "JSON",
            Self::NdJson => "NDJSON",
            Self::Yaml => "YAML",
        }
    }
}

/// A JSON, NDJSON or YAML file holding records.
#[derive(Debug, Clone)]
pub struct JsonSource {
    path: String,
    format: DocumentFormat,
}

impl JsonSource {
    /// Creates a source, detecting the format from the extension.
    pub fn new(path: impl Into<String>) -> Result<Self> {
        let path = path.into();
        let format = DocumentFormat::from_path(&path).ok_or_else(|| {
            LookmlError::data_source(
                "JSON",
                format!("Cannot detect document format of '{path}'"),
            )
        })?;
        Ok(Self { path, format })
    }

    pub fn with_format(path: impl Into<String>, format: DocumentFormat) -> Self {
        Self {
            path: path.into(),
            format,
        }
    }

    pub fn format(&self) -> DocumentFormat {
        self.format
    }
}

#[async_trait]
impl DatasetSource for JsonSource {
    #[instrument(skip(self), fields(source.type = self.format.label(), source.path = %self.path))]
    async fn load(&self) -> Result<Dataset> {
        let content = tokio::fs::read_to_string(&self.path).await?;
        let dataset = parse_document(&content, self.format)?;
        info!(
            source.path = %self.path,
            rows = dataset.num_rows(),
            columns = dataset.num_columns(),
            "Loaded document data source"
        );
        Ok(dataset)
    }

    fn description(&self) -> String {
        format!("{} file {}", self.format.label(), self.path)
    }
}

/// Parses document text into a dataset.
pub fn parse_document(content: &str, format: DocumentFormat) -> Result<Dataset> {
    let label = format.label();
    let records = match format {
        DocumentFormat::Json => records_from_value(serde_json::from_str(content)?, label)?,
        DocumentFormat::Yaml => records_from_value(serde_yaml::from_str(content)?, label)?,
        DocumentFormat::NdJson => content
            .lines()
            .filter(|line| !line.trim().is_empty())
            .map(|line| match serde_json::from_str(line)? {
                Value::Object(record) => Ok(record),
                other => Err(not_a_record(label, &other)),
            })
            .collect::<Result<Vec<_>>>()?,
    };
    debug!(records = records.len(), format = label, "Parsed document");
    records_to_dataset(&records)
}

fn records_from_value(value: Value, label: &str) -> Result<Vec<Map<String, Value>>> {
    match value {
        Value::Object(record) => Ok(vec![record]),
        Value::Array(items) => items
            .into_iter()
            .map(|item| match item {
                Value::Object(record) => Ok(record),
                other => Err(not_a_record(label, &other)),
            })
            .collect(),
        Value::Null => Ok(Vec::new()),
        other => Err(LookmlError::data_source(
            label,
            format!(
                "Unsupported {label} document: expected a list or a mapping, found {}",
                truncate_field(&other.to_string(), 80)
            ),
        )),
    }
}

fn not_a_record(label: &str, value: &Value) -> LookmlError {
    let found = truncate_field(&value.to_string(), 80);
    LookmlError::data_source(label, format!("Expected a record, found {found}"))
}

fn flatten_into(prefix: Option<&str>, record: &Map<String, Value>, out: &mut Vec<(String, Value)>) {
    for (key, value) in record {
        let name = match prefix {
            Some(prefix) => format!("{prefix}.{key}"),
            None => key.clone(),
        };
        match value {
            Value::Object(nested) if !nested.is_empty() => flatten_into(Some(&name), nested, out),
            other => out.push((name, other.clone())),
        }
    }
}

/// Inferred Arrow type of a document column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ColumnKind {
    Boolean,
    Integer,
    Float,
    Text,
}

fn column_kind(values: &[Option<Value>]) -> ColumnKind {
    let present: Vec<&Value> = values
        .iter()
        .flatten()
        .filter(|v| !v.is_null())
        .collect();
    if present.is_empty() {
        ColumnKind::Text
    } else if present.iter().all(|v| v.is_boolean()) {
        ColumnKind::Boolean
    } else if present.iter().all(|v| v.is_i64()) {
        ColumnKind::Integer
    } else if present.iter().all(|v| v.is_number()) {
        ColumnKind::Float
    } else {
        ColumnKind::Text
    }
}

fn to_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

fn present(value: &Option<Value>) -> Option<&Value> {
    value.as_ref().filter(|v| !v.is_null())
}

fn build_array(values: &[Option<Value>]) -> ArrayRef {
    match column_kind(values) {
        ColumnKind::Boolean => Arc::new(BooleanArray::from(
            values
                .iter()
                .map(|v| present(v).and_then(Value::as_bool))
                .collect::<Vec<_>>(),
        )),
        ColumnKind::Integer => Arc::new(Int64Array::from(
            values
                .iter()
                .map(|v| present(v).and_then(Value::as_i64))
                .collect::<Vec<_>>(),
        )),
        ColumnKind::Float => Arc::new(Float64Array::from(
            values
                .iter()
                .map(|v| present(v).and_then(Value::as_f64))
                .collect::<Vec<_>>(),
        )),
        ColumnKind::Text => Arc::new(StringArray::from(
            values
                .iter()
                .map(|v| present(v).and_then(to_text))
                .collect::<Vec<_>>(),
        )),
    }
}

fn records_to_dataset(records: &[Map<String, Value>]) -> Result<Dataset> {
    let mut names: Vec<String> = Vec::new();
    let mut columns: Vec<Vec<Option<Value>>> = Vec::new();

    for (row, record) in records.iter().enumerate() {
        let mut flat = Vec::new();
        flatten_into(None, record, &mut flat);
        for (name, value) in flat {
            let index = match names.iter().position(|n| *n == name) {
                Some(index) => index,
                None => {
                    names.push(name);
                    columns.push(vec![None; records.len()]);
                    names.len() - 1
                }
            };
            columns[index][row] = Some(value);
        }
    }

    Dataset::from_columns(
        names
            .into_iter()
            .zip(columns.iter().map(|values| build_array(values))),
    )
}
