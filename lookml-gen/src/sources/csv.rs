//! CSV and TSV file source.

use std::path::Path;

use async_trait::async_trait;
use datafusion::prelude::{CsvReadOptions, SessionContext};
use tracing::{debug, info, instrument};

use super::{dataset_from_batches, DatasetSource};
use crate::dataset::Dataset;
use crate::error::{LookmlError, Result};

/// Options for configuring CSV file reading.
#[derive(Debug, Clone)]
pub struct CsvOptions {
    /// Whether the file has a header row
    pub has_header: bool,
    /// Field delimiter (default: ',')
    pub delimiter: u8,
    /// Quote character (default: '"')
    pub quote: u8,
    /// Maximum records to read for schema inference
    pub schema_infer_max_records: usize,
}

impl Default for CsvOptions {
    fn default() -> Self {
        Self {
            has_header: true,
            delimiter: b',',
            quote: b'"',
            schema_infer_max_records: 1000,
        }
    }
}

impl CsvOptions {
    /// Tab separated values with a header row.
    pub fn tsv() -> Self {
        Self {
            delimiter: b'\t',
            ..Self::default()
        }
    }
}

/// A delimited text file. Column types are inferred by DataFusion, so ISO
/// dates and timestamps arrive as temporal columns.
///
/// # Examples
///
/// ```rust,no_run
/// use lookml_gen::sources::{CsvOptions, CsvSource, DatasetSource};
///
/// # async fn example() -> lookml_gen::error::Result<()> {
/// let orders = CsvSource::new("data/orders.csv").load().await?;
/// let events = CsvSource::with_options("data/events.tsv", CsvOptions::tsv())
///     .load()
///     .await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct CsvSource {
    path: String,
    options: CsvOptions,
}

impl CsvSource {
    pub fn new(path: impl Into<String>) -> Self {
        Self::with_options(path, CsvOptions::default())
    }

    pub fn with_options(path: impl Into<String>, options: CsvOptions) -> Self {
        Self {
            path: path.into(),
            options,
        }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    fn file_extension(&self) -> String {
        Path::new(&self.path)
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| format!(".{e}"))
            .unwrap_or_default()
    }
}

#[async_trait]
impl DatasetSource for CsvSource {
    #[instrument(skip(self), fields(
        source.type = "csv",
        source.path = %self.path,
        csv.delimiter = %(self.options.delimiter as char),
        csv.has_header = self.options.has_header
    ))]
    async fn load(&self) -> Result<Dataset> {
        let ctx = SessionContext::new();
        let extension = self.file_extension();
        let options = CsvReadOptions::new()
            .has_header(self.options.has_header)
            .delimiter(self.options.delimiter)
            .quote(self.options.quote)
            .schema_infer_max_records(self.options.schema_infer_max_records)
            .file_extension(&extension);

        let df = ctx
            .read_csv(self.path.as_str(), options)
            .await
            .map_err(|e| {
                LookmlError::data_source_with_source(
                    "CSV",
                    format!("Failed to read {}", self.path),
                    Box::new(e),
                )
            })?;
        let schema = df.schema().inner().clone();
        debug!(columns = schema.fields().len(), "Inferred CSV schema");

        let batches = df.collect().await?;
        let dataset = dataset_from_batches(schema, batches)?;

        info!(
            source.path = %self.path,
            rows = dataset.num_rows(),
            columns = dataset.num_columns(),
            "Loaded CSV data source"
        );
        Ok(dataset)
    }

    fn description(&self) -> String {
        format!(
            "CSV file {} (delimiter '{}')",
            self.path,
            (self.options.delimiter as char).escape_default()
        )
    }
}
