//! Field-level vocabulary: semantic types, roles and the ordered field map.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::LookmlError;

/// LookML semantic type of a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum SemanticType {
    String,
    Number,
    Date,
    YesNo,
}

impl SemanticType {
    pub fn as_str(&self) -> &'static str {
        match self {
            SemanticType::String => "string",
            SemanticType::Number => "number",
            SemanticType::Date => "date",
            SemanticType::YesNo => "yesno",
        }
    }

    /// Temporal types compile to dimension groups.
    pub fn is_temporal(&self) -> bool {
        matches!(self, SemanticType::Date)
    }

    pub fn all() -> [SemanticType; 4] {
        [
            SemanticType::String,
            SemanticType::Number,
            SemanticType::Date,
            SemanticType::YesNo,
        ]
    }
}

impl fmt::Display for SemanticType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SemanticType {
    type Err = LookmlError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "string" => Ok(SemanticType::String),
            "number" => Ok(SemanticType::Number),
            "date" | "datetime" | "timestamp" => Ok(SemanticType::Date),
            "yesno" => Ok(SemanticType::YesNo),
            _ => Err(LookmlError::unsupported_type(s)),
        }
    }
}

impl TryFrom<String> for SemanticType {
    type Error = LookmlError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Role a column plays in the generated view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldRole {
    #[default]
    Dimension,
    Measure,
    #[serde(alias = "exclude")]
    Excluded,
}

impl FieldRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldRole::Dimension => "dimension",
            FieldRole::Measure => "measure",
            FieldRole::Excluded => "excluded",
        }
    }
}

impl fmt::Display for FieldRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FieldRole {
    type Err = LookmlError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "dimension" => Ok(FieldRole::Dimension),
            "measure" => Ok(FieldRole::Measure),
            "excluded" | "exclude" => Ok(FieldRole::Excluded),
            other => Err(LookmlError::Configuration(format!(
                "Unknown field role '{other}' (expected dimension, measure or excluded)"
            ))),
        }
    }
}

/// Role and type decided for one column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldConfig {
    /// Original column label as it appears in the dataset
    pub name: String,
    pub role: FieldRole,
    pub semantic_type: SemanticType,
}

impl FieldConfig {
    pub fn new(name: impl Into<String>, role: FieldRole, semantic_type: SemanticType) -> Self {
        Self {
            name: name.into(),
            role,
            semantic_type,
        }
    }

    pub fn dimension(name: impl Into<String>, semantic_type: SemanticType) -> Self {
        Self::new(name, FieldRole::Dimension, semantic_type)
    }

    pub fn measure(name: impl Into<String>, semantic_type: SemanticType) -> Self {
        Self::new(name, FieldRole::Measure, semantic_type)
    }

    pub fn is_retained(&self) -> bool {
        self.role != FieldRole::Excluded
    }
}

/// Column name to [`FieldConfig`] mapping that keeps dataset column order.
///
/// Inserting a name that is already present replaces its config in place.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldMap {
    fields: Vec<FieldConfig>,
}

impl FieldMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, config: FieldConfig) {
        match self.fields.iter_mut().find(|f| f.name == config.name) {
            Some(existing) => *existing = config,
            None => self.fields.push(config),
        }
    }

    pub fn get(&self, name: &str) -> Option<&FieldConfig> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, FieldConfig> {
        self.fields.iter()
    }

    /// Fields that are not excluded, in order.
    pub fn retained(&self) -> impl Iterator<Item = &FieldConfig> {
        self.fields.iter().filter(|f| f.is_retained())
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|f| f.name.as_str())
    }
}

impl FromIterator<FieldConfig> for FieldMap {
    fn from_iter<T: IntoIterator<Item = FieldConfig>>(iter: T) -> Self {
        let mut map = FieldMap::new();
        for config in iter {
            map.insert(config);
        }
        map
    }
}

impl<'a> IntoIterator for &'a FieldMap {
    type Item = &'a FieldConfig;
    type IntoIter = std::slice::Iter<'a, FieldConfig>;

    fn into_iter(self) -> Self::IntoIter {
        self.fields.iter()
    }
}

impl IntoIterator for FieldMap {
    type Item = FieldConfig;
    type IntoIter = std::vec::IntoIter<FieldConfig>;

    fn into_iter(self) -> Self::IntoIter {
        self.fields.into_iter()
    }
}
