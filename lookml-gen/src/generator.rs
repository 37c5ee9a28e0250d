//! One-call pipeline from a dataset to rendered artifacts.
//!
//! ```rust
//! use std::sync::Arc;
//! use arrow::array::{ArrayRef, Int64Array};
//! use lookml_gen::config::ProjectConfig;
//! use lookml_gen::dataset::Dataset;
//! use lookml_gen::generator::ArtifactGenerator;
//!
//! let dataset = Dataset::from_columns(vec![
//!     ("id", Arc::new(Int64Array::from((0..20).collect::<Vec<i64>>())) as ArrayRef),
//!     ("amount", Arc::new(Int64Array::from(vec![3; 20])) as ArrayRef),
//! ])
//! .unwrap();
//!
//! let config = ProjectConfig::default()
//!     .with_view_name("orders")
//!     .with_auto_classify(true)
//!     .with_suggest_tiles(true);
//! let artifacts = ArtifactGenerator::new(config).generate(&dataset).unwrap();
//!
//! assert_eq!(artifacts.view_file_name, "orders.view.lkml");
//! assert!(artifacts.dashboard.is_some());
//! ```

use tracing::{debug, info, instrument};

use crate::analyzers::{ColumnClassifier, LayoutAdvisor};
use crate::compiler::{compile_dashboard, compile_view};
use crate::config::ProjectConfig;
use crate::dataset::Dataset;
use crate::error::Result;
use crate::formatters::{render_dashboard, render_view};
use crate::model::{DashboardModel, FieldMap, FieldRole, TileSpec, ViewModel};

/// A rendered dashboard and the file name it belongs in.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardArtifact {
    pub model: DashboardModel,
    pub file_name: String,
    pub yaml: String,
}

/// Everything one generation run produces.
#[derive(Debug, Clone, PartialEq)]
pub struct Artifacts {
    pub fields: FieldMap,
    pub view: ViewModel,
    pub view_file_name: String,
    pub view_text: String,
    /// `None` when no tile was configured or suggested
    pub dashboard: Option<DashboardArtifact>,
}

/// Runs classification, compilation and rendering for a [`ProjectConfig`].
#[derive(Debug)]
pub struct ArtifactGenerator {
    config: ProjectConfig,
    classifier: ColumnClassifier,
    advisor: LayoutAdvisor,
}

impl ArtifactGenerator {
    pub fn new(config: ProjectConfig) -> Self {
        let classifier = ColumnClassifier::with_config(config.classifier);
        Self {
            config,
            classifier,
            advisor: LayoutAdvisor::new(),
        }
    }

    /// Replaces the layout advisor used when tiles are suggested.
    pub fn with_advisor(mut self, advisor: LayoutAdvisor) -> Self {
        self.advisor = advisor;
        self
    }

    pub fn config(&self) -> &ProjectConfig {
        &self.config
    }

    /// Field map for the dataset. With `auto_classify` the configured
    /// overrides are applied on top of the automatic classification.
    pub fn classify(&self, dataset: &Dataset) -> Result<FieldMap> {
        if self.config.auto_classify {
            self.classifier
                .classify_with_overrides(dataset, &self.config.fields)
        } else {
            self.classifier.classify_manual(dataset, &self.config.fields)
        }
    }

    /// Configured tiles, or advisor suggestions when enabled and none are configured.
    ///
    /// The advisor always reads the automatic classification with overrides
    /// applied, even when the view itself was built from overrides alone.
    /// `fields` is used instead when it already is that map or when the
    /// dataset has no rows to classify. Tiles without a model get the
    /// project's model name.
    pub fn tiles(&self, dataset: &Dataset, fields: &FieldMap) -> Result<Vec<TileSpec>> {
        let tiles = if self.config.tiles.is_empty() && self.config.suggest_tiles {
            if self.config.auto_classify || dataset.num_rows() == 0 {
                self.advisor.suggest(fields)
            } else {
                let classified = self
                    .classifier
                    .classify_with_overrides(dataset, &self.config.fields)?;
                debug!(
                    measures = classified.iter().filter(|f| f.role == FieldRole::Measure).count(),
                    "Classified columns for tile suggestions"
                );
                self.advisor.suggest(&classified)
            }
        } else {
            self.config.tiles.clone()
        };

        Ok(tiles
            .into_iter()
            .map(|mut tile| {
                if tile.model_name.is_none() {
                    tile.model_name = Some(self.config.model_name.clone());
                }
                tile
            })
            .collect())
    }

    #[instrument(skip(self, dataset), fields(view = %self.config.view_name, rows = dataset.num_rows()))]
    pub fn generate(&self, dataset: &Dataset) -> Result<Artifacts> {
        let fields = self.classify(dataset)?;
        let view = compile_view(
            &fields,
            &self.config.view_name,
            &self.config.resolved_sql_table_name(),
        )?;
        let view_text = render_view(&view);

        let tiles = self.tiles(dataset, &fields)?;
        let dashboard = if tiles.is_empty() {
            None
        } else {
            let model = compile_dashboard(&self.config.dashboard_title, &view.name, &tiles)?;
            let yaml = render_dashboard(&model)?;
            Some(DashboardArtifact {
                file_name: model.file_name(),
                model,
                yaml,
            })
        };

        info!(
            fields = view.fields.len(),
            tiles = tiles.len(),
            dashboard = dashboard.is_some(),
            "Generated LookML artifacts"
        );

        Ok(Artifacts {
            view_file_name: view.file_name(),
            fields,
            view,
            view_text,
            dashboard,
        })
    }
}
