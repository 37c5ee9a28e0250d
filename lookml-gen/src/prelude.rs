//! Prelude for commonly used types and traits in lookml-gen.

pub use crate::analyzers::{ColumnClassifier, FieldOverride, LayoutAdvisor, LayoutRule};
pub use crate::compiler::{compile_dashboard, compile_view};
pub use crate::config::ProjectConfig;
pub use crate::dataset::Dataset;
pub use crate::error::{ErrorContext, LookmlError, Result};
pub use crate::formatters::{render_dashboard, render_view};
pub use crate::generator::{ArtifactGenerator, Artifacts};
pub use crate::model::{
    DashboardModel, FieldConfig, FieldMap, FieldRole, SemanticType, TileSpec, TileType, ViewModel,
};
pub use crate::naming::{normalize, qualify};
pub use crate::sources::{load_dataset, open_source, DatasetSource};
