//! Typed representation of a LookML view.

use serde::Serialize;

use super::field::SemanticType;

/// Timeframes emitted for every dimension group.
pub const DEFAULT_TIMEFRAMES: [Timeframe; 6] = [
    Timeframe::Raw,
    Timeframe::Date,
    Timeframe::Week,
    Timeframe::Month,
    Timeframe::Quarter,
    Timeframe::Year,
];

/// A time grain of a dimension group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Timeframe {
    Raw,
    Date,
    Week,
    Month,
    Quarter,
    Year,
}

impl Timeframe {
    pub fn as_str(&self) -> &'static str {
        match self {
            Timeframe::Raw => "raw",
            Timeframe::Date => "date",
            Timeframe::Week => "week",
            Timeframe::Month => "month",
            Timeframe::Quarter => "quarter",
            Timeframe::Year => "year",
        }
    }
}

/// One field block of a view.
///
/// `name` is the normalized LookML identifier, `column` the original column
/// label referenced from the `sql:` clause.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FieldDefinition {
    Dimension {
        name: String,
        column: String,
        semantic_type: SemanticType,
    },
    DimensionGroup {
        name: String,
        column: String,
        timeframes: Vec<Timeframe>,
    },
    Measure {
        name: String,
        column: String,
        semantic_type: SemanticType,
    },
}

impl FieldDefinition {
    pub fn name(&self) -> &str {
        match self {
            FieldDefinition::Dimension { name, .. }
            | FieldDefinition::DimensionGroup { name, .. }
            | FieldDefinition::Measure { name, .. } => name,
        }
    }

    pub fn column(&self) -> &str {
        match self {
            FieldDefinition::Dimension { column, .. }
            | FieldDefinition::DimensionGroup { column, .. }
            | FieldDefinition::Measure { column, .. } => column,
        }
    }

    /// LookML keyword that opens the block.
    pub fn keyword(&self) -> &'static str {
        match self {
            FieldDefinition::Dimension { .. } => "dimension",
            FieldDefinition::DimensionGroup { .. } => "dimension_group",
            FieldDefinition::Measure { .. } => "measure",
        }
    }
}

/// A compiled view: table binding plus ordered field definitions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ViewModel {
    pub name: String,
    pub sql_table_name: String,
    pub fields: Vec<FieldDefinition>,
}

impl ViewModel {
    pub fn field(&self, name: &str) -> Option<&FieldDefinition> {
        self.fields.iter().find(|f| f.name() == name)
    }

    /// File name the view is conventionally saved under.
    pub fn file_name(&self) -> String {
        format!("{}.view.lkml", self.name)
    }
}
