//! File loaders that produce a [`Dataset`].
//!
//! CSV, TSV and Parquet files are read through DataFusion. JSON, NDJSON and
//! YAML documents are parsed directly, with nested objects flattened into
//! `parent.child` columns.
//!
//! [`open_source`] picks the loader from the file extension.

use std::fmt::Debug;
use std::path::Path;

use arrow::datatypes::SchemaRef;
use arrow::record_batch::RecordBatch;
use async_trait::async_trait;
use tracing::instrument;

use crate::dataset::Dataset;
use crate::error::{LookmlError, Result};

mod csv;
mod json;
mod parquet;

pub use csv::{CsvOptions, CsvSource};
pub use json::{DocumentFormat, JsonSource};
pub use parquet::ParquetSource;

/// A loader for one tabular file.
///
/// # Examples
///
/// ```rust,no_run
/// use lookml_gen::sources::{CsvSource, DatasetSource};
///
/// # async fn example() -> lookml_gen::error::Result<()> {
/// let source = CsvSource::new("data/orders.csv");
/// let dataset = source.load().await?;
/// println!("{} rows from {}", dataset.num_rows(), source.description());
/// # Ok(())
/// # }
/// ```
#[async_trait]
pub trait DatasetSource: Debug + Send + Sync {
    /// Reads the whole file into memory.
    async fn load(&self) -> Result<Dataset>;

    /// Returns a human-readable description of this source.
    fn description(&self) -> String;
}

/// Supported file extensions, lower case.
pub const SUPPORTED_EXTENSIONS: &[&str] = &[
    "csv", "tsv", "parquet", "pq", "json", "ndjson", "jsonl", "yaml", "yml",
];

/// Chooses a loader from the path's extension.
#[instrument(skip(path), fields(path = %path.as_ref().display()))]
pub fn open_source(path: impl AsRef<Path>) -> Result<Box<dyn DatasetSource>> {
    let path = path.as_ref();
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();
    let path_str = path.to_string_lossy().into_owned();

    let source: Box<dyn DatasetSource> = match extension.as_str() {
        "csv" => Box::new(CsvSource::new(path_str)),
        "tsv" => Box::new(CsvSource::with_options(path_str, CsvOptions::tsv())),
        "parquet" | "pq" => Box::new(ParquetSource::new(path_str)),
        "json" | "ndjson" | "jsonl" | "yaml" | "yml" => Box::new(JsonSource::new(path_str)?),
        _ => {
            return Err(LookmlError::data_source(
                "file",
                format!(
                    "Unsupported file format '{}'; expected one of: {}",
                    path.display(),
                    SUPPORTED_EXTENSIONS.join(", ")
                ),
            ))
        }
    };
    Ok(source)
}

/// Opens and loads a file in one step.
pub async fn load_dataset(path: impl AsRef<Path>) -> Result<Dataset> {
    open_source(path)?.load().await
}

/// Builds a dataset from collected batches, preferring the schema the batches
/// actually carry over the planned one.
pub(crate) fn dataset_from_batches(planned: SchemaRef, batches: Vec<RecordBatch>) -> Result<Dataset> {
    let schema = batches.first().map(|b| b.schema()).unwrap_or(planned);
    Dataset::try_new(schema, batches)
}
