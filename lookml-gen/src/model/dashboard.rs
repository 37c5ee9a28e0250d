//! Tile specifications and the compiled dashboard model.
//!
//! [`TileSpec`] is what a user (or the layout advisor) asks for: a title, a
//! visualization type, the selected fields and any optional display settings.
//! Unset options stay `None` until the dashboard compiler resolves them into a
//! [`DashboardElement`] using the `DEFAULT_*` constants below.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::LookmlError;

pub const DEFAULT_MODEL_NAME: &str = "your_model_name";
pub const DEFAULT_LIMIT: u32 = 500;
pub const DEFAULT_COLUMN_LIMIT: u32 = 50;
pub const DEFAULT_TIMEZONE: &str = "America/Los_Angeles";
pub const DEFAULT_ROW: u32 = 0;
pub const DEFAULT_COL: u32 = 0;
pub const DEFAULT_WIDTH: u32 = 8;
pub const DEFAULT_HEIGHT: u32 = 6;
pub const DEFAULT_SHOW_VIEW_NAMES: bool = false;
pub const DEFAULT_SHOW_Y_AXIS_LABELS: bool = true;
pub const DEFAULT_SHOW_X_AXIS_LABEL: bool = true;
pub const DEFAULT_Y_AXIS_SCALE_MODE: &str = "linear";
pub const DEFAULT_X_AXIS_SCALE: &str = "auto";
pub const DEFAULT_SHOW_VALUE_LABELS: bool = true;
pub const DASHBOARD_LAYOUT: &str = "newspaper";
pub const PREFERRED_VIEWER: &str = "dashboards-next";

/// Looker visualization type of a tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TileType {
    LookerLine,
    LookerBar,
    LookerColumn,
    LookerArea,
    LookerPie,
    LookerScatter,
    LookerGrid,
    SingleValue,
    Table,
}

impl TileType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TileType::LookerLine => "looker_line",
            TileType::LookerBar => "looker_bar",
            TileType::LookerColumn => "looker_column",
            TileType::LookerArea => "looker_area",
            TileType::LookerPie => "looker_pie",
            TileType::LookerScatter => "looker_scatter",
            TileType::LookerGrid => "looker_grid",
            TileType::SingleValue => "single_value",
            TileType::Table => "table",
        }
    }
}

impl fmt::Display for TileType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TileType {
    type Err = LookmlError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        serde_json::from_value(serde_json::Value::String(s.trim().to_string())).map_err(|_| {
            LookmlError::Configuration(format!("Unknown tile type '{s}'"))
        })
    }
}

/// Placement of a chart legend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LegendPosition {
    #[default]
    Center,
    Top,
    Bottom,
    Left,
    Right,
}

impl FromStr for LegendPosition {
    type Err = LookmlError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "center" => Ok(LegendPosition::Center),
            "top" => Ok(LegendPosition::Top),
            "bottom" => Ok(LegendPosition::Bottom),
            "left" => Ok(LegendPosition::Left),
            "right" => Ok(LegendPosition::Right),
            other => Err(LookmlError::Configuration(format!(
                "Unknown legend position '{other}'"
            ))),
        }
    }
}

/// Filter expressions keyed by field, kept in the order they were written.
pub type Filters = serde_json::Map<String, serde_json::Value>;

/// A requested dashboard tile.
///
/// Field names may be raw column labels (`"Order Date"`) or already qualified
/// (`"orders.order_date"`); the compiler qualifies them either way.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TileSpec {
    pub title: String,
    #[serde(rename = "type", alias = "tile_type")]
    pub tile_type: TileType,
    #[serde(rename = "fields", alias = "selected_fields", default)]
    pub selected_fields: Vec<String>,
    #[serde(
        rename = "model",
        alias = "model_name",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub model_name: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub pivots: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fill_fields: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Filters::is_empty")]
    pub filters: Filters,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sorts: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub column_limit: Option<u32>,
    #[serde(
        alias = "query_timezone",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub timezone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub row: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub col: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub show_view_names: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub show_y_axis_labels: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub show_x_axis_label: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y_axis_scale_mode: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x_axis_scale: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub legend_position: Option<LegendPosition>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub show_value_labels: Option<bool>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub dynamic_fields: Vec<serde_json::Value>,
}

impl TileSpec {
    /// Starts a builder for a tile with the given title and type.
    pub fn builder(title: impl Into<String>, tile_type: TileType) -> TileSpecBuilder {
        TileSpecBuilder {
            spec: TileSpec {
                title: title.into(),
                tile_type,
                selected_fields: Vec::new(),
                model_name: None,
                pivots: Vec::new(),
                fill_fields: None,
                filters: Filters::new(),
                sorts: Vec::new(),
                limit: None,
                column_limit: None,
                timezone: None,
                row: None,
                col: None,
                width: None,
                height: None,
                show_view_names: None,
                show_y_axis_labels: None,
                show_x_axis_label: None,
                y_axis_scale_mode: None,
                x_axis_scale: None,
                legend_position: None,
                show_value_labels: None,
                dynamic_fields: Vec::new(),
            },
        }
    }
}

/// Builder for [`TileSpec`].
#[derive(Debug, Clone)]
pub struct TileSpecBuilder {
    spec: TileSpec,
}

impl TileSpecBuilder {
    /// Appends a selected field
    pub fn field(mut self, field: impl Into<String>) -> Self {
        self.spec.selected_fields.push(field.into());
        self
    }

    /// Appends several selected fields
    pub fn fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.spec
            .selected_fields
            .extend(fields.into_iter().map(Into::into));
        self
    }

    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.spec.model_name = Some(model.into());
        self
    }

    pub fn pivot(mut self, field: impl Into<String>) -> Self {
        self.spec.pivots.push(field.into());
        self
    }

    pub fn fill_fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.spec.fill_fields = Some(fields.into_iter().map(Into::into).collect());
        self
    }

    pub fn filter(mut self, field: impl Into<String>, expression: impl Into<String>) -> Self {
        self.spec
            .filters
            .insert(field.into(), serde_json::Value::String(expression.into()));
        self
    }

    /// Appends a sort, e.g. `"amount desc"`
    pub fn sort(mut self, sort: impl Into<String>) -> Self {
        self.spec.sorts.push(sort.into());
        self
    }

    pub fn limit(mut self, limit: u32) -> Self {
        self.spec.limit = Some(limit);
        self
    }

    pub fn column_limit(mut self, limit: u32) -> Self {
        self.spec.column_limit = Some(limit);
        self
    }

    pub fn timezone(mut self, timezone: impl Into<String>) -> Self {
        self.spec.timezone = Some(timezone.into());
        self
    }

    /// Sets the grid position
    pub fn position(mut self, row: u32, col: u32) -> Self {
        self.spec.row = Some(row);
        self.spec.col = Some(col);
        self
    }

    /// Sets the tile size in grid units
    pub fn size(mut self, width: u32, height: u32) -> Self {
        self.spec.width = Some(width);
        self.spec.height = Some(height);
        self
    }

    pub fn show_view_names(mut self, show: bool) -> Self {
        self.spec.show_view_names = Some(show);
        self
    }

    pub fn axis_labels(mut self, show_y: bool, show_x: bool) -> Self {
        self.spec.show_y_axis_labels = Some(show_y);
        self.spec.show_x_axis_label = Some(show_x);
        self
    }

    pub fn axis_scales(mut self, y_mode: impl Into<String>, x_scale: impl Into<String>) -> Self {
        self.spec.y_axis_scale_mode = Some(y_mode.into());
        self.spec.x_axis_scale = Some(x_scale.into());
        self
    }

    pub fn legend_position(mut self, position: LegendPosition) -> Self {
        self.spec.legend_position = Some(position);
        self
    }

    pub fn show_value_labels(mut self, show: bool) -> Self {
        self.spec.show_value_labels = Some(show);
        self
    }

    pub fn dynamic_field(mut self, field: serde_json::Value) -> Self {
        self.spec.dynamic_fields.push(field);
        self
    }

    pub fn build(self) -> TileSpec {
        self.spec
    }
}

/// A fully resolved dashboard tile. Field order is the serialized key order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardElement {
    pub title: String,
    pub name: String,
    pub model: String,
    pub explore: String,
    #[serde(rename = "type")]
    pub tile_type: TileType,
    pub fields: Vec<String>,
    pub pivots: Vec<String>,
    pub fill_fields: Vec<String>,
    pub filters: Filters,
    pub sorts: Vec<String>,
    pub limit: u32,
    pub column_limit: u32,
    pub query_timezone: String,
    pub row: u32,
    pub col: u32,
    pub width: u32,
    pub height: u32,
    pub show_view_names: bool,
    pub show_y_axis_labels: bool,
    pub show_x_axis_label: bool,
    pub y_axis_scale_mode: String,
    pub x_axis_scale: String,
    pub legend_position: LegendPosition,
    pub show_value_labels: bool,
    pub dynamic_fields: Vec<serde_json::Value>,
}

/// A compiled dashboard. Field order is the serialized key order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardModel {
    #[serde(rename = "dashboard")]
    pub identifier: String,
    pub title: String,
    pub layout: String,
    pub preferred_viewer: String,
    pub elements: Vec<DashboardElement>,
}

impl DashboardModel {
    /// File name the dashboard is conventionally saved under.
    pub fn file_name(&self) -> String {
        format!("{}.dashboard.lookml", self.identifier)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tile_type_round_trip_names() {
        assert_eq!(TileType::SingleValue.to_string(), "single_value");
        assert_eq!("looker_bar".parse::<TileType>().unwrap(), TileType::LookerBar);
        assert!("pie_chart".parse::<TileType>().is_err());
    }

    #[test]
    fn test_builder_leaves_unset_options_empty() {
        let spec = TileSpec::builder("Revenue", TileType::LookerLine)
            .fields(["order_date", "amount"])
            .limit(100)
            .build();

        assert_eq!(spec.selected_fields, vec!["order_date", "amount"]);
        assert_eq!(spec.limit, Some(100));
        assert_eq!(spec.column_limit, None);
        assert_eq!(spec.fill_fields, None);
        assert!(spec.filters.is_empty());
    }

    #[test]
    fn test_tile_spec_deserializes_with_aliases() {
        let yaml = r#"
title: Daily Orders
tile_type: looker_column
selected_fields: [order_date, amount]
model_name: sales
timezone: UTC
legend_position: top
filters:
  order_date: 30 days
  status: -cancelled
"#;
        let spec: TileSpec = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(spec.tile_type, TileType::LookerColumn);
        assert_eq!(spec.selected_fields, vec!["order_date", "amount"]);
        assert_eq!(spec.model_name.as_deref(), Some("sales"));
        assert_eq!(spec.timezone.as_deref(), Some("UTC"));
        assert_eq!(spec.legend_position, Some(LegendPosition::Top));
        assert_eq!(spec.filters["order_date"], "30 days");
        assert_eq!(
            spec.filters.keys().collect::<Vec<_>>(),
            vec!["order_date", "status"]
        );
        assert_eq!(spec.limit, None);
    }

    #[test]
    fn test_legend_position_parsing() {
        assert_eq!("Right".parse::<LegendPosition>().unwrap(), LegendPosition::Right);
        assert!("middle".parse::<LegendPosition>().is_err());
    }
}
