//! Rule-based dashboard layout suggestions.
//!
//! The advisor groups a field map into time fields, measures and dimensions
//! and runs an ordered list of [`LayoutRule`]s over those groups. Each rule
//! contributes at most one tile. The standard rule set produces, in order:
//!
//! - **Trend** (`looker_line`): first time field against the first measure
//! - **Breakdown** (`looker_bar`): first dimension against the first measure
//! - **KPI** (`single_value`): the first measure on its own
//!
//! Suggested tiles carry unqualified column labels; the dashboard compiler
//! qualifies them against the view.
//!
//! ## Example Usage
//!
//! ```rust
//! use lookml_gen::analyzers::{KpiRule, LayoutAdvisor};
//! use lookml_gen::model::{FieldConfig, FieldMap, SemanticType};
//!
//! let fields: FieldMap = vec![
//!     FieldConfig::dimension("category", SemanticType::String),
//!     FieldConfig::measure("amount", SemanticType::Number),
//! ]
//! .into_iter()
//! .collect();
//!
//! let tiles = LayoutAdvisor::new().suggest(&fields);
//! assert_eq!(tiles.len(), 2);
//! assert_eq!(tiles[0].title, "Top category by amount");
//!
//! let kpis_only = LayoutAdvisor::empty().add_rule(Box::new(KpiRule)).suggest(&fields);
//! assert_eq!(kpis_only[0].title, "Total amount");
//! ```

use tracing::{debug, instrument};

use crate::model::{FieldConfig, FieldMap, FieldRole, SemanticType, TileSpec, TileType};

/// Field names grouped the way layout rules consume them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LayoutContext {
    /// Fields with a `date` semantic type, any role
    pub time_fields: Vec<String>,
    /// Numeric measures, or every measure when none is numeric
    pub measures: Vec<String>,
    pub dimensions: Vec<String>,
}

impl LayoutContext {
    pub fn from_fields(fields: &FieldMap) -> Self {
        let time_fields = names_where(fields, |f| f.semantic_type == SemanticType::Date);
        let numeric_measures = names_where(fields, |f| {
            f.role == FieldRole::Measure && f.semantic_type == SemanticType::Number
        });
        let measures = if numeric_measures.is_empty() {
            names_where(fields, |f| f.role == FieldRole::Measure)
        } else {
            numeric_measures
        };
        let dimensions = names_where(fields, |f| f.role == FieldRole::Dimension);

        Self {
            time_fields,
            measures,
            dimensions,
        }
    }
}

fn names_where(fields: &FieldMap, keep: impl Fn(&FieldConfig) -> bool) -> Vec<String> {
    fields
        .iter()
        .filter(|f| keep(f))
        .map(|f| f.name.clone())
        .collect()
}

/// A rule that may propose one tile.
pub trait LayoutRule: Send + Sync {
    /// Returns the suggested tile, or `None` when the rule does not apply
    fn apply(&self, context: &LayoutContext) -> Option<TileSpec>;

    fn name(&self) -> &str;

    fn description(&self) -> &str;
}

/// Line chart of the first measure over the first time field.
#[derive(Debug, Clone, Copy, Default)]
pub struct TrendRule;

impl LayoutRule for TrendRule {
    fn apply(&self, context: &LayoutContext) -> Option<TileSpec> {
        let time_field = context.time_fields.first()?;
        let measure = context.measures.first()?;
        Some(
            TileSpec::builder("Trend Over Time", TileType::LookerLine)
                .fields([time_field, measure])
                .build(),
        )
    }

    fn name(&self) -> &str {
        "trend"
    }

    fn description(&self) -> &str {
        "Plots the first measure over the first date field"
    }
}

/// Bar chart of the first measure per value of the first dimension.
#[derive(Debug, Clone, Copy, Default)]
pub struct BreakdownRule;

impl LayoutRule for BreakdownRule {
    fn apply(&self, context: &LayoutContext) -> Option<TileSpec> {
        let dimension = context.dimensions.first()?;
        let measure = context.measures.first()?;
        Some(
            TileSpec::builder(format!("Top {dimension} by {measure}"), TileType::LookerBar)
                .fields([dimension, measure])
                .build(),
        )
    }

    fn name(&self) -> &str {
        "breakdown"
    }

    fn description(&self) -> &str {
        "Breaks the first measure down by the first dimension"
    }
}

/// Single value tile with the first measure.
#[derive(Debug, Clone, Copy, Default)]
pub struct KpiRule;

impl LayoutRule for KpiRule {
    fn apply(&self, context: &LayoutContext) -> Option<TileSpec> {
        let measure = context.measures.first()?;
        Some(
            TileSpec::builder(format!("Total {measure}"), TileType::SingleValue)
                .field(measure)
                .build(),
        )
    }

    fn name(&self) -> &str {
        "kpi"
    }

    fn description(&self) -> &str {
        "Shows the first measure as a single value"
    }
}

/// Runs layout rules in registration order.
pub struct LayoutAdvisor {
    rules: Vec<Box<dyn LayoutRule>>,
}

impl LayoutAdvisor {
    /// Creates an advisor with the trend, breakdown and KPI rules.
    pub fn new() -> Self {
        Self::empty()
            .add_rule(Box::new(TrendRule))
            .add_rule(Box::new(BreakdownRule))
            .add_rule(Box::new(KpiRule))
    }

    /// Creates an advisor without rules.
    pub fn empty() -> Self {
        Self { rules: Vec::new() }
    }

    /// Appends a rule; rules run in the order they were added.
    pub fn add_rule(mut self, rule: Box<dyn LayoutRule>) -> Self {
        self.rules.push(rule);
        self
    }

    pub fn rule_names(&self) -> Vec<&str> {
        self.rules.iter().map(|r| r.name()).collect()
    }

    /// Suggests tiles for a field map. May return an empty list.
    #[instrument(skip(self, fields), fields(field_count = fields.len(), rules = self.rules.len()))]
    pub fn suggest(&self, fields: &FieldMap) -> Vec<TileSpec> {
        let context = LayoutContext::from_fields(fields);
        debug!(
            time_fields = context.time_fields.len(),
            measures = context.measures.len(),
            dimensions = context.dimensions.len(),
            "Grouped fields for layout"
        );

        self.rules
            .iter()
            .filter_map(|rule| {
                let tile = rule.apply(&context);
                debug!(rule = rule.name(), applied = tile.is_some(), "Evaluated layout rule");
                tile
            })
            .collect()
    }
}

impl Default for LayoutAdvisor {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for LayoutAdvisor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LayoutAdvisor")
            .field("rules", &self.rule_names())
            .finish()
    }
}
