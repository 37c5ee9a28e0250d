//! # lookml-gen - LookML generation from tabular data
//!
//! lookml-gen turns a tabular dataset into LookML artifacts: a view file that
//! declares one dimension, dimension group or measure per column, and an
//! optional dashboard file whose tiles query that view.
//!
//! ## Overview
//!
//! A generation run loads a file into an Arrow-backed [`dataset::Dataset`],
//! decides for each column whether it is a dimension or a measure (either from
//! the data or from explicit overrides), compiles the resulting field map into
//! typed view and dashboard models, and serializes those models as LookML text
//! and YAML.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use lookml_gen::prelude::*;
//!
//! # async fn example() -> Result<()> {
//! let dataset = load_dataset("data/orders.csv").await?;
//!
//! let config = ProjectConfig::default()
//!     .with_view_name("orders")
//!     .with_schema("ANALYTICS.CORE")
//!     .with_auto_classify(true)
//!     .with_suggest_tiles(true);
//!
//! let artifacts = ArtifactGenerator::new(config).generate(&dataset)?;
//! std::fs::write(&artifacts.view_file_name, &artifacts.view_text)?;
//! if let Some(dashboard) = &artifacts.dashboard {
//!     std::fs::write(&dashboard.file_name, &dashboard.yaml)?;
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Key Features
//!
//! - **Column classification**: unique-value ratios decide dimensions and measures
//! - **Overrides**: per-column role and semantic type from a project file
//! - **Layout suggestions**: trend, breakdown and KPI tiles from a field map
//! - **Deterministic output**: field and key order follow the input
//! - **Multiple formats**: CSV, TSV, Parquet, JSON, NDJSON and YAML inputs
//!
//! ## Architecture
//!
//! - `naming`: label to LookML identifier normalization and qualification
//! - `dataset`: in-memory Arrow tables and per-column statistics
//! - `sources`: file loaders producing datasets
//! - `model`: field maps, view models and dashboard models
//! - `analyzers`: type inference, column classification and layout advice
//! - `compiler`: field maps to views, tile specs to dashboards
//! - `formatters`: LookML view text, dashboard YAML and profile reports
//! - `config`: project configuration files
//! - `generator`: the full pipeline in one call
//! - `logging`: subscriber setup for binaries

pub mod analyzers;
pub mod compiler;
pub mod config;
pub mod dataset;
pub mod error;
pub mod formatters;
pub mod generator;
pub mod logging;
pub mod model;
pub mod naming;
pub mod prelude;
pub mod sources;
