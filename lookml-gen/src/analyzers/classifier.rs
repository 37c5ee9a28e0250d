//! Column classification into dimensions and measures.
//!
//! The automatic path looks at each column's semantic type and its unique
//! ratio (distinct non-null values over total rows) and applies a fixed
//! decision table:
//!
//! | semantic type | condition                                | role      |
//! |---------------|------------------------------------------|-----------|
//! | number        | ratio < `numeric_measure_threshold`      | measure   |
//! | number        | otherwise                                | dimension |
//! | date          |                                          | dimension |
//! | yesno         |                                          | dimension |
//! | string        | ratio > `categorical_dimension_threshold`| dimension |
//! | string        | otherwise                                | measure   |
//!
//! The comparison is strict on both sides, so a ratio exactly at a threshold
//! makes a number a dimension and a string a measure.
//!
//! The manual path takes explicit per-column overrides and fills the gaps
//! with defaults; it never looks at the data and works on empty datasets.
//! [`ColumnClassifier::classify_with_overrides`] runs the automatic path and
//! then applies the same overrides on top of it.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

use crate::analyzers::inference::infer_semantic_type;
use crate::dataset::{Column, Dataset};
use crate::error::{LookmlError, Result};
use crate::model::{FieldConfig, FieldMap, FieldRole, SemanticType};

/// Thresholds driving automatic classification.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    /// Numeric columns with a unique ratio strictly below this become measures (default: 0.1)
    pub numeric_measure_threshold: f64,
    /// String columns with a unique ratio strictly above this become dimensions (default: 0.1)
    pub categorical_dimension_threshold: f64,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            numeric_measure_threshold: 0.1,
            categorical_dimension_threshold: 0.1,
        }
    }
}

impl ClassifierConfig {
    pub fn builder() -> ClassifierConfigBuilder {
        ClassifierConfigBuilder {
            config: Self::default(),
        }
    }
}

/// Builder for [`ClassifierConfig`]
#[derive(Debug, Clone)]
pub struct ClassifierConfigBuilder {
    config: ClassifierConfig,
}

impl ClassifierConfigBuilder {
    /// Set the unique-ratio threshold below which numbers become measures
    pub fn numeric_measure_threshold(mut self, threshold: f64) -> Self {
        self.config.numeric_measure_threshold = threshold.clamp(0.0, 1.0);
        self
    }

    /// Set the unique-ratio threshold above which strings become dimensions
    pub fn categorical_dimension_threshold(mut self, threshold: f64) -> Self {
        self.config.categorical_dimension_threshold = threshold.clamp(0.0, 1.0);
        self
    }

    pub fn build(self) -> ClassifierConfig {
        self.config
    }
}

/// Explicit role and/or type for one column.
///
/// Deserializes from `{ role: measure, type: number }`; either key may be
/// omitted. The type is kept as written and checked by [`declared_type`],
/// so an unknown name surfaces as [`LookmlError::UnsupportedSemanticType`].
///
/// [`declared_type`]: FieldOverride::declared_type
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldOverride {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<FieldRole>,
    #[serde(
        rename = "type",
        alias = "semantic_type",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub semantic_type: Option<String>,
}

impl FieldOverride {
    pub fn role(role: FieldRole) -> Self {
        Self {
            role: Some(role),
            semantic_type: None,
        }
    }

    pub fn with_type(mut self, semantic_type: SemanticType) -> Self {
        self.semantic_type = Some(semantic_type.as_str().to_string());
        self
    }

    /// Parses the declared type, if any.
    pub fn declared_type(&self) -> Result<Option<SemanticType>> {
        self.semantic_type
            .as_deref()
            .map(str::parse)
            .transpose()
    }

    /// Applies this override to a classified field. Returns `None` when the
    /// field ends up excluded.
    fn apply(&self, mut field: FieldConfig) -> Result<Option<FieldConfig>> {
        if let Some(role) = self.role {
            field.role = role;
        }
        if let Some(semantic_type) = self.declared_type()? {
            field.semantic_type = semantic_type;
        }
        Ok((field.role != FieldRole::Excluded).then_some(field))
    }
}

/// What the classifier observed about one column.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnProfile {
    pub column_name: String,
    /// Native Arrow type, rendered for display
    pub native_type: String,
    pub semantic_type: SemanticType,
    pub row_count: usize,
    pub null_count: usize,
    pub distinct_count: usize,
    pub unique_ratio: f64,
    pub role: FieldRole,
}

/// Assigns a [`FieldRole`] and [`SemanticType`] to every dataset column.
#[derive(Debug, Clone, Default)]
pub struct ColumnClassifier {
    config: ClassifierConfig,
}

impl ColumnClassifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: ClassifierConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ClassifierConfig {
        &self.config
    }

    /// Classifies every column automatically.
    ///
    /// Fails with [`LookmlError::EmptyDataset`] when the dataset has no rows.
    #[instrument(skip(self, dataset), fields(columns = dataset.num_columns(), rows = dataset.num_rows()))]
    pub fn classify(&self, dataset: &Dataset) -> Result<FieldMap> {
        let fields: FieldMap = self
            .profile(dataset)?
            .into_iter()
            .map(|p| FieldConfig::new(p.column_name, p.role, p.semantic_type))
            .collect();

        info!(
            fields = fields.len(),
            measures = fields.iter().filter(|f| f.role == FieldRole::Measure).count(),
            "Classified dataset columns"
        );
        Ok(fields)
    }

    /// Profiles each column and records the role automatic classification
    /// would give it.
    pub fn profile(&self, dataset: &Dataset) -> Result<Vec<ColumnProfile>> {
        let row_count = dataset.num_rows();
        if row_count == 0 {
            return Err(LookmlError::EmptyDataset);
        }

        dataset
            .columns()
            .map(|column| self.profile_column(&column, row_count))
            .collect()
    }

    fn profile_column(&self, column: &Column<'_>, row_count: usize) -> Result<ColumnProfile> {
        let semantic_type = infer_semantic_type(column.data_type());
        let distinct_count = column.distinct_count()?;
        let unique_ratio = distinct_count as f64 / row_count as f64;
        let role = self.decide_role(semantic_type, unique_ratio);

        debug!(
            column = column.name(),
            semantic_type = %semantic_type,
            unique_ratio,
            role = %role,
            "Classified column"
        );

        Ok(ColumnProfile {
            column_name: column.name().to_string(),
            native_type: column.data_type().to_string(),
            semantic_type,
            row_count,
            null_count: column.null_count(),
            distinct_count,
            unique_ratio,
            role,
        })
    }

    /// Applies the decision table to one column.
    pub fn decide_role(&self, semantic_type: SemanticType, unique_ratio: f64) -> FieldRole {
        match semantic_type {
            SemanticType::Number if unique_ratio < self.config.numeric_measure_threshold => {
                FieldRole::Measure
            }
            SemanticType::Number | SemanticType::Date | SemanticType::YesNo => FieldRole::Dimension,
            SemanticType::String if unique_ratio > self.config.categorical_dimension_threshold => {
                FieldRole::Dimension
            }
            SemanticType::String => FieldRole::Measure,
        }
    }

    /// Builds the field map from explicit overrides.
    ///
    /// Columns without an override become dimensions of their inferred type.
    /// Excluded columns are left out of the result. An override for a column
    /// the dataset does not have fails with [`LookmlError::ColumnNotFound`],
    /// an unknown declared type with [`LookmlError::UnsupportedSemanticType`].
    #[instrument(skip(self, dataset, overrides), fields(override_count = overrides.len()))]
    pub fn classify_manual(
        &self,
        dataset: &Dataset,
        overrides: &BTreeMap<String, FieldOverride>,
    ) -> Result<FieldMap> {
        check_overrides(dataset, overrides)?;

        let defaults = dataset.columns().map(|column| {
            FieldConfig::dimension(column.name(), infer_semantic_type(column.data_type()))
        });
        let fields = apply_overrides(defaults, overrides)?;

        info!(fields = fields.len(), "Built field map from overrides");
        Ok(fields)
    }

    /// Classifies every column automatically, then applies `overrides`.
    ///
    /// Overridden columns keep their position; excluded ones are dropped.
    /// Fails like [`classify`](Self::classify) on an empty dataset and like
    /// [`classify_manual`](Self::classify_manual) on a bad override.
    #[instrument(skip(self, dataset, overrides), fields(override_count = overrides.len()))]
    pub fn classify_with_overrides(
        &self,
        dataset: &Dataset,
        overrides: &BTreeMap<String, FieldOverride>,
    ) -> Result<FieldMap> {
        check_overrides(dataset, overrides)?;
        let classified = self.classify(dataset)?;
        if overrides.is_empty() {
            return Ok(classified);
        }
        apply_overrides(classified, overrides)
    }
}

fn check_overrides(dataset: &Dataset, overrides: &BTreeMap<String, FieldOverride>) -> Result<()> {
    for (name, field) in overrides {
        if dataset.column(name).is_none() {
            return Err(LookmlError::column_not_found(name.as_str()));
        }
        field.declared_type()?;
    }
    Ok(())
}

fn apply_overrides(
    fields: impl IntoIterator<Item = FieldConfig>,
    overrides: &BTreeMap<String, FieldOverride>,
) -> Result<FieldMap> {
    let mut result = FieldMap::new();
    for field in fields {
        let field = match overrides.get(&field.name) {
            Some(field_override) => match field_override.apply(field)? {
                Some(field) => field,
                None => continue,
            },
            None => field,
        };
        result.insert(field);
    }
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use arrow::array::{ArrayRef, BooleanArray, Date32Array, Int64Array, StringArray};
    use std::sync::Arc;

    /// 20 rows: unique ids, a 2-value region, unique names, a 1-value amount
    fn dataset() -> Dataset {
        let ids: Vec<i64> = (0..20).collect();
        let regions: Vec<&str> = (0..20).map(|i| if i % 2 == 0 { "north" } else { "south" }).collect();
        let names: Vec<String> = (0..20).map(|i| format!("customer {i}")).collect();
        let amounts: Vec<i64> = vec![5; 20];
        let days: Vec<i32> = (0..20).map(|i| 19_000 + i % 3).collect();
        let flags: Vec<bool> = (0..20).map(|i| i % 2 == 0).collect();

        Dataset::from_columns(vec![
            ("id", Arc::new(Int64Array::from(ids)) as ArrayRef),
            ("Region", Arc::new(StringArray::from(regions)) as ArrayRef),
            ("name", Arc::new(StringArray::from(names)) as ArrayRef),
            ("amount", Arc::new(Int64Array::from(amounts)) as ArrayRef),
            ("Order Date", Arc::new(Date32Array::from(days)) as ArrayRef),
            ("active", Arc::new(BooleanArray::from(flags)) as ArrayRef),
        ])
        .unwrap()
    }

    #[test]
    fn test_automatic_classification_decision_table() {
        let fields = ColumnClassifier::new().classify(&dataset()).unwrap();

        let role = |name: &str| fields.get(name).unwrap().role;
        let ty = |name: &str| fields.get(name).unwrap().semantic_type;

        assert_eq!(role("id"), FieldRole::Dimension);
        assert_eq!(ty("id"), SemanticType::Number);
        assert_eq!(role("Region"), FieldRole::Measure);
        assert_eq!(role("name"), FieldRole::Dimension);
        assert_eq!(role("amount"), FieldRole::Measure);
        assert_eq!(role("Order Date"), FieldRole::Dimension);
        assert_eq!(ty("Order Date"), SemanticType::Date);
        // two booleans over 20 rows sits exactly on the numeric threshold
        assert_eq!(role("active"), FieldRole::Dimension);
        assert_eq!(ty("active"), SemanticType::Number);

        assert_eq!(
            fields.names().collect::<Vec<_>>(),
            vec!["id", "Region", "name", "amount", "Order Date", "active"]
        );
        assert!(fields.iter().all(|f| f.role != FieldRole::Excluded));
    }

    #[test]
    fn test_threshold_boundaries_are_strict() {
        let classifier = ColumnClassifier::new();
        assert_eq!(
            classifier.decide_role(SemanticType::Number, 0.1),
            FieldRole::Dimension
        );
        assert_eq!(
            classifier.decide_role(SemanticType::Number, 0.099),
            FieldRole::Measure
        );
        assert_eq!(
            classifier.decide_role(SemanticType::String, 0.1),
            FieldRole::Measure
        );
        assert_eq!(
            classifier.decide_role(SemanticType::String, 0.101),
            FieldRole::Dimension
        );
        assert_eq!(
            classifier.decide_role(SemanticType::Date, 0.0),
            FieldRole::Dimension
        );
        assert_eq!(
            classifier.decide_role(SemanticType::YesNo, 0.0),
            FieldRole::Dimension
        );
    }

    #[test]
    fn test_custom_thresholds() {
        let config = ClassifierConfig::builder()
            .numeric_measure_threshold(0.5)
            .categorical_dimension_threshold(0.9)
            .build();
        let classifier = ColumnClassifier::with_config(config);
        assert_eq!(
            classifier.decide_role(SemanticType::Number, 0.4),
            FieldRole::Measure
        );
        assert_eq!(
            classifier.decide_role(SemanticType::String, 0.5),
            FieldRole::Measure
        );
    }

    #[test]
    fn test_empty_dataset_is_rejected() {
        let ds = Dataset::from_columns(vec![(
            "id",
            Arc::new(Int64Array::from(Vec::<i64>::new())) as ArrayRef,
        )])
        .unwrap();
        let err = ColumnClassifier::new().classify(&ds).unwrap_err();
        assert!(matches!(err, LookmlError::EmptyDataset));
    }

    #[test]
    fn test_profile_reports_ratios() {
        let profiles = ColumnClassifier::new().profile(&dataset()).unwrap();
        let region = profiles.iter().find(|p| p.column_name == "Region").unwrap();
        assert_eq!(region.distinct_count, 2);
        assert_eq!(region.row_count, 20);
        assert!((region.unique_ratio - 0.1).abs() < f64::EPSILON);
        assert_eq!(region.native_type, "Utf8");
    }

    #[test]
    fn test_manual_overrides_take_precedence() {
        let mut overrides = BTreeMap::new();
        overrides.insert(
            "amount".to_string(),
            FieldOverride::role(FieldRole::Measure),
        );
        overrides.insert(
            "active".to_string(),
            FieldOverride::role(FieldRole::Dimension).with_type(SemanticType::YesNo),
        );
        overrides.insert("name".to_string(), FieldOverride::role(FieldRole::Excluded));
        overrides.insert(
            "id".to_string(),
            FieldOverride::default().with_type(SemanticType::String),
        );

        let fields = ColumnClassifier::new()
            .classify_manual(&dataset(), &overrides)
            .unwrap();

        assert_eq!(
            fields.names().collect::<Vec<_>>(),
            vec!["id", "Region", "amount", "Order Date", "active"]
        );
        assert_eq!(
            fields.get("id").unwrap(),
            &FieldConfig::dimension("id", SemanticType::String)
        );
        assert_eq!(
            fields.get("Region").unwrap(),
            &FieldConfig::dimension("Region", SemanticType::String)
        );
        assert_eq!(
            fields.get("amount").unwrap(),
            &FieldConfig::measure("amount", SemanticType::Number)
        );
        assert_eq!(
            fields.get("active").unwrap(),
            &FieldConfig::dimension("active", SemanticType::YesNo)
        );
    }

    #[test]
    fn test_manual_unknown_column() {
        let mut overrides = BTreeMap::new();
        overrides.insert("revenue".to_string(), FieldOverride::role(FieldRole::Measure));
        let err = ColumnClassifier::new()
            .classify_manual(&dataset(), &overrides)
            .unwrap_err();
        assert!(matches!(err, LookmlError::ColumnNotFound { ref column } if column == "revenue"));
    }

    #[test]
    fn test_manual_works_without_rows() {
        let ds = Dataset::from_columns(vec![(
            "created_at",
            Arc::new(Date32Array::from(Vec::<i32>::new())) as ArrayRef,
        )])
        .unwrap();
        let fields = ColumnClassifier::new()
            .classify_manual(&ds, &BTreeMap::new())
            .unwrap();
        assert_eq!(
            fields.get("created_at").unwrap(),
            &FieldConfig::dimension("created_at", SemanticType::Date)
        );
    }

    #[test]
    fn test_field_override_deserializes() {
        let yaml = "role: measure\ntype: number\n";
        let parsed: FieldOverride = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(
            parsed,
            FieldOverride::role(FieldRole::Measure).with_type(SemanticType::Number)
        );
        let money: FieldOverride = serde_yaml::from_str("type: money\n").unwrap();
        let err = money.declared_type().unwrap_err();
        assert!(matches!(err, LookmlError::UnsupportedSemanticType { ref value } if value == "money"));
        assert_eq!(
            serde_yaml::from_str::<FieldOverride>("type: timestamp\n")
                .unwrap()
                .declared_type()
                .unwrap(),
            Some(SemanticType::Date)
        );
    }

    #[test]
    fn test_manual_unknown_declared_type() {
        let mut overrides = BTreeMap::new();
        overrides.insert(
            "amount".to_string(),
            FieldOverride {
                role: Some(FieldRole::Measure),
                semantic_type: Some("currency".to_string()),
            },
        );
        let err = ColumnClassifier::new()
            .classify_manual(&dataset(), &overrides)
            .unwrap_err();
        assert!(matches!(err, LookmlError::UnsupportedSemanticType { ref value } if value == "currency"));
    }

    #[test]
    fn test_overrides_on_top_of_automatic_classification() {
        let mut overrides = BTreeMap::new();
        overrides.insert("id".to_string(), FieldOverride::role(FieldRole::Excluded));
        overrides.insert(
            "Region".to_string(),
            FieldOverride::role(FieldRole::Dimension).with_type(SemanticType::YesNo),
        );
        overrides.insert(
            "name".to_string(),
            FieldOverride::default().with_type(SemanticType::Number),
        );

        let fields = ColumnClassifier::new()
            .classify_with_overrides(&dataset(), &overrides)
            .unwrap();

        assert_eq!(
            fields.names().collect::<Vec<_>>(),
            vec!["Region", "name", "amount", "Order Date", "active"]
        );
        assert_eq!(
            fields.get("Region").unwrap(),
            &FieldConfig::dimension("Region", SemanticType::YesNo)
        );
        // role still comes from the data when only the type is overridden
        assert_eq!(
            fields.get("name").unwrap(),
            &FieldConfig::dimension("name", SemanticType::Number)
        );
        assert_eq!(
            fields.get("amount").unwrap(),
            &FieldConfig::measure("amount", SemanticType::Number)
        );

        let mut unknown = BTreeMap::new();
        unknown.insert("revenue".to_string(), FieldOverride::role(FieldRole::Measure));
        let err = ColumnClassifier::new()
            .classify_with_overrides(&dataset(), &unknown)
            .unwrap_err();
        assert!(matches!(err, LookmlError::ColumnNotFound { ref column } if column == "revenue"));
    }
}
