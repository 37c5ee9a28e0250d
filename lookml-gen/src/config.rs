//! Project configuration for a generation run.
//!
//! A project file names the view and dashboard, binds the view to a table,
//! and optionally overrides column roles and lists dashboard tiles:
//!
//! ```yaml
//! view_name: orders
//! schema: ANALYTICS.CORE
//! dashboard_title: Sales Overview
//! model_name: sales
//! fields:
//!   amount: { role: measure, type: number }
//!   internal_id: { role: excluded }
//! tiles:
//!   - title: Revenue by Day
//!     type: looker_line
//!     fields: [order_date, amount]
//! ```
//!
//! Every key is optional. JSON files with the same shape are accepted.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::analyzers::{ClassifierConfig, FieldOverride};
use crate::error::{ErrorContext, LookmlError, Result};
use crate::model::TileSpec;
use crate::naming::identifier_warnings;

pub use crate::model::dashboard::DEFAULT_MODEL_NAME;

pub const DEFAULT_VIEW_NAME: &str = "your_view_name";
pub const DEFAULT_DASHBOARD_TITLE: &str = "My Advanced LookML Dashboard";

/// Settings for one generation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectConfig {
    pub view_name: String,
    /// Explicit table binding; derived from `schema` and `view_name` when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sql_table_name: Option<String>,
    /// Database/schema prefix used when `sql_table_name` is unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schema: Option<String>,
    pub dashboard_title: String,
    /// Model applied to tiles that do not name one
    pub model_name: String,
    /// Classify columns from the data instead of `fields`
    pub auto_classify: bool,
    pub classifier: ClassifierConfig,
    pub fields: BTreeMap<String, FieldOverride>,
    pub tiles: Vec<TileSpec>,
    /// Ask the layout advisor for tiles when `tiles` is empty
    pub suggest_tiles: bool,
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            view_name: DEFAULT_VIEW_NAME.to_string(),
            sql_table_name: None,
            schema: None,
            dashboard_title: DEFAULT_DASHBOARD_TITLE.to_string(),
            model_name: DEFAULT_MODEL_NAME.to_string(),
            auto_classify: false,
            classifier: ClassifierConfig::default(),
            fields: BTreeMap::new(),
            tiles: Vec::new(),
            suggest_tiles: false,
        }
    }
}

impl ProjectConfig {
    /// Parses a YAML document.
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Parses a JSON document.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads a configuration file; `.json` files are read as JSON, anything
    /// else as YAML.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read project configuration {}", path.display()))?;
        debug!(path = %path.display(), "Loaded project configuration");

        let is_json = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("json"));
        if is_json {
            Self::from_json_str(&content)
        } else {
            Self::from_yaml_str(&content)
        }
    }

    /// Checks values that would produce unusable artifacts.
    ///
    /// Empty names are errors. Names LookML would reject are only logged.
    pub fn validate(&self) -> Result<()> {
        if self.view_name.trim().is_empty() {
            return Err(LookmlError::Configuration(
                "view_name must not be empty".to_string(),
            ));
        }
        if self.dashboard_title.trim().is_empty() {
            return Err(LookmlError::Configuration(
                "dashboard_title must not be empty".to_string(),
            ));
        }
        if let Some(tile) = self.tiles.iter().find(|t| t.selected_fields.is_empty()) {
            return Err(LookmlError::Configuration(format!(
                "Tile '{}' selects no fields",
                tile.title
            )));
        }
        for field in self.fields.values() {
            field.declared_type()?;
        }
        for warning in identifier_warnings(&self.view_name) {
            warn!(view = %self.view_name, %warning, "View name is not a valid LookML identifier");
        }
        Ok(())
    }

    /// Table the view binds to.
    pub fn resolved_sql_table_name(&self) -> String {
        match (&self.sql_table_name, &self.schema) {
            (Some(table), _) => table.clone(),
            (None, Some(schema)) => format!("{schema}.{}", self.view_name),
            (None, None) => self.view_name.clone(),
        }
    }

    pub fn with_view_name(mut self, view_name: impl Into<String>) -> Self {
        self.view_name = view_name.into();
        self
    }

    pub fn with_sql_table_name(mut self, sql_table_name: impl Into<String>) -> Self {
        self.sql_table_name = Some(sql_table_name.into());
        self
    }

    pub fn with_schema(mut self, schema: impl Into<String>) -> Self {
        self.schema = Some(schema.into());
        self
    }

    pub fn with_dashboard_title(mut self, title: impl Into<String>) -> Self {
        self.dashboard_title = title.into();
        self
    }

    pub fn with_model_name(mut self, model_name: impl Into<String>) -> Self {
        self.model_name = model_name.into();
        self
    }

    pub fn with_auto_classify(mut self, enabled: bool) -> Self {
        self.auto_classify = enabled;
        self
    }

    pub fn with_classifier(mut self, classifier: ClassifierConfig) -> Self {
        self.classifier = classifier;
        self
    }

    pub fn with_field(mut self, column: impl Into<String>, field: FieldOverride) -> Self {
        self.fields.insert(column.into(), field);
        self
    }

    pub fn with_tile(mut self, tile: TileSpec) -> Self {
        self.tiles.push(tile);
        self
    }

    pub fn with_suggest_tiles(mut self, enabled: bool) -> Self {
        self.suggest_tiles = enabled;
        self
    }
}
