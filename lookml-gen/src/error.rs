//! Error types for the LookML generator.
//!
//! Every fallible operation in the crate returns [`LookmlError`]. The compile
//! errors (`EmptyDataset`, `NoFieldsConfigured`, `NoTilesConfigured`,
//! `UnsupportedSemanticType`, `ColumnNotFound`) are deterministic validation
//! failures raised at the call that violates a precondition; the remaining
//! variants come from ingestion and serialization.

use thiserror::Error;

/// The main error type for the LookML generator.
#[derive(Error, Debug)]
pub enum LookmlError {
    /// Automatic classification needs at least one row to compute unique ratios.
    #[error("Dataset has no rows; column classification is undefined")]
    EmptyDataset,

    /// A view was requested but every column was excluded.
    #[error("No fields configured: at least one column must be a dimension or measure")]
    NoFieldsConfigured,

    /// A dashboard was requested without any tile.
    #[error("No tiles configured: a dashboard needs at least one tile")]
    NoTilesConfigured,

    /// A declared semantic type is outside `string`, `number`, `date`, `yesno`.
    #[error("Unsupported semantic type '{value}' (expected string, number, date or yesno)")]
    UnsupportedSemanticType { value: String },

    /// An override or tile refers to a column the dataset does not have.
    #[error("Column '{column}' not found in dataset")]
    ColumnNotFound { column: String },

    /// Error from DataFusion operations.
    #[error("DataFusion error: {0}")]
    DataFusion(#[from] datafusion::error::DataFusionError),

    /// Error from Arrow operations.
    #[error("Arrow error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    /// Error from data source operations.
    #[error("Data source error: {message}")]
    DataSource {
        /// Type of data source (e.g., "CSV", "JSON", "Parquet")
        source_type: String,
        /// Detailed error message
        message: String,
        /// Optional underlying error
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Error from I/O operations.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Error related to configuration.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Error from serialization/deserialization operations.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Generic internal error for unexpected conditions.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// A type alias for `Result<T, LookmlError>`.
pub type Result<T> = std::result::Result<T, LookmlError>;

impl LookmlError {
    /// Creates a new data source error.
    pub fn data_source(source_type: impl Into<String>, message: impl Into<String>) -> Self {
        Self::DataSource {
            source_type: source_type.into(),
            message: message.into(),
            source: None,
        }
    }

    /// Creates a new data source error with a source error.
    pub fn data_source_with_source(
        source_type: impl Into<String>,
        message: impl Into<String>,
        source: Box<dyn std::error::Error + Send + Sync>,
    ) -> Self {
        Self::DataSource {
            source_type: source_type.into(),
            message: message.into(),
            source: Some(source),
        }
    }

    /// Creates an unsupported semantic type error.
    pub fn unsupported_type(value: impl Into<String>) -> Self {
        Self::UnsupportedSemanticType {
            value: value.into(),
        }
    }

    /// Creates a column not found error.
    pub fn column_not_found(column: impl Into<String>) -> Self {
        Self::ColumnNotFound {
            column: column.into(),
        }
    }

    /// Returns true for the compile-time validation failures a UI should
    /// surface as a targeted message rather than a crash report.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::EmptyDataset
                | Self::NoFieldsConfigured
                | Self::NoTilesConfigured
                | Self::UnsupportedSemanticType { .. }
                | Self::ColumnNotFound { .. }
        )
    }
}

impl From<serde_json::Error> for LookmlError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

impl From<serde_yaml::Error> for LookmlError {
    fn from(err: serde_yaml::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

/// Extension trait for adding context to errors.
pub trait ErrorContext<T> {
    /// Adds context to an error.
    fn context(self, msg: &str) -> Result<T>;

    /// Adds context with a lazy message.
    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String;
}

impl<T, E> ErrorContext<T> for std::result::Result<T, E>
where
    E: Into<LookmlError>,
{
    fn context(self, msg: &str) -> Result<T> {
        self.map_err(|e| wrap(msg, e.into()))
    }

    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| wrap(&f(), e.into()))
    }
}

fn wrap(msg: &str, base: LookmlError) -> LookmlError {
    // Validation errors keep their kind so callers can still match on them.
    if base.is_validation() {
        return base;
    }
    match base {
        LookmlError::Internal(inner) => LookmlError::Internal(format!("{msg}: {inner}")),
        other => LookmlError::Internal(format!("{msg}: {other}")),
    }
}
