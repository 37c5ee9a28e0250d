//! Mapping of native Arrow types onto LookML semantic types.
//!
//! Inference looks at the declared type only. A numeric column stored as text
//! stays `string`, and `yesno` is never inferred.

use arrow::datatypes::DataType;

use crate::model::SemanticType;

/// Infers the semantic type of a column from its native type.
///
/// ```
/// use arrow::datatypes::{DataType, TimeUnit};
/// use lookml_gen::analyzers::infer_semantic_type;
/// use lookml_gen::model::SemanticType;
///
/// assert_eq!(infer_semantic_type(&DataType::Float64), SemanticType::Number);
/// assert_eq!(
///     infer_semantic_type(&DataType::Timestamp(TimeUnit::Second, None)),
///     SemanticType::Date
/// );
/// assert_eq!(infer_semantic_type(&DataType::Utf8), SemanticType::String);
/// ```
pub fn infer_semantic_type(data_type: &DataType) -> SemanticType {
    match data_type {
        DataType::Date32 | DataType::Date64 | DataType::Timestamp(_, _) => SemanticType::Date,

        // booleans count as numeric, matching dataframe semantics
        DataType::Boolean => SemanticType::Number,
        dt if dt.is_numeric() => SemanticType::Number,

        DataType::Dictionary(_, value_type) => infer_semantic_type(value_type),

        _ => SemanticType::String,
    }
}
