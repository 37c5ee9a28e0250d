//! Parquet file source.

use std::path::Path;

use async_trait::async_trait;
use datafusion::prelude::{ParquetReadOptions, SessionContext};
use tracing::{info, instrument};

use super::{dataset_from_batches, DatasetSource};
use crate::dataset::Dataset;
use crate::error::{LookmlError, Result};

/// A Parquet file; column types come from the file metadata.
#[derive(Debug, Clone)]
pub struct ParquetSource {
    path: String,
}

impl ParquetSource {
    pub fn new(path: impl Into<String>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &str {
        &self.path
    }
}

#[async_trait]
impl DatasetSource for ParquetSource {
    #[instrument(skip(self), fields(source.type = "parquet", source.path = %self.path))]
    async fn load(&self) -> Result<Dataset> {
        let ctx = SessionContext::new();
        let extension = Path::new(&self.path)
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| format!(".{e}"))
            .unwrap_or_default();
        let options = ParquetReadOptions {
            file_extension: &extension,
            ..Default::default()
        };

        let df = ctx
            .read_parquet(self.path.as_str(), options)
            .await
            .map_err(|e| {
                LookmlError::data_source_with_source(
                    "Parquet",
                    format!("Failed to read {}", self.path),
                    Box::new(e),
                )
            })?;
        let schema = df.schema().inner().clone();
        let batches = df.collect().await?;
        let dataset = dataset_from_batches(schema, batches)?;

        info!(
            source.path = %self.path,
            rows = dataset.num_rows(),
            columns = dataset.num_columns(),
            "Loaded Parquet data source"
        );
        Ok(dataset)
    }

    fn description(&self) -> String {
        format!("Parquet file {}", self.path)
    }
}
