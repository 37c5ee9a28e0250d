//! Analysis of dataset columns and field maps.
//!
//! - **Type inference** (`inference`): native Arrow type to LookML semantic type
//! - **Column classifier** (`classifier`): dimension/measure decisions, automatic or from overrides
//! - **Layout advisor** (`advisor`): rule-based dashboard tile suggestions
//!
//! ## Example Usage
//!
//! ```rust
//! use std::sync::Arc;
//! use arrow::array::{ArrayRef, Int64Array, StringArray};
//! use lookml_gen::analyzers::{ColumnClassifier, LayoutAdvisor};
//! use lookml_gen::dataset::Dataset;
//!
//! let dataset = Dataset::from_columns(vec![
//!     ("id", Arc::new(Int64Array::from((0..20).collect::<Vec<i64>>())) as ArrayRef),
//!     ("amount", Arc::new(Int64Array::from(vec![10; 20])) as ArrayRef),
//! ])
//! .unwrap();
//!
//! let fields = ColumnClassifier::new().classify(&dataset).unwrap();
//! let tiles = LayoutAdvisor::new().suggest(&fields);
//! assert_eq!(tiles.last().unwrap().title, "Total amount");
//! ```

pub mod advisor;
pub mod classifier;
pub mod inference;

pub use advisor::{BreakdownRule, KpiRule, LayoutAdvisor, LayoutContext, LayoutRule, TrendRule};
pub use classifier::{
    ClassifierConfig, ClassifierConfigBuilder, ColumnClassifier, ColumnProfile, FieldOverride,
};
pub use inference::infer_semantic_type;
