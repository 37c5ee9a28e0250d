//! Field map to view model compilation.

use tracing::{debug, info, instrument};

use crate::error::{LookmlError, Result};
use crate::model::{FieldDefinition, FieldMap, FieldRole, ViewModel, DEFAULT_TIMEFRAMES};
use crate::naming::normalize;

/// Compiles a field map into a [`ViewModel`] bound to `sql_table_name`.
///
/// Fields keep the map's order. Temporal dimensions become dimension groups
/// with the standard timeframes; excluded fields are skipped. Fails with
/// [`LookmlError::NoFieldsConfigured`] when nothing is left.
///
/// ```
/// use lookml_gen::compiler::compile_view;
/// use lookml_gen::model::{FieldConfig, FieldMap, SemanticType};
///
/// let fields: FieldMap = vec![
///     FieldConfig::dimension("Order Date", SemanticType::Date),
///     FieldConfig::measure("Amount", SemanticType::Number),
/// ]
/// .into_iter()
/// .collect();
///
/// let view = compile_view(&fields, "orders", "ANALYTICS.orders").unwrap();
/// assert_eq!(view.fields[0].keyword(), "dimension_group");
/// assert_eq!(view.fields[1].name(), "amount");
/// assert_eq!(view.fields[1].column(), "Amount");
/// ```
#[instrument(skip(fields), fields(field_count = fields.len()))]
pub fn compile_view(fields: &FieldMap, view_name: &str, sql_table_name: &str) -> Result<ViewModel> {
    let definitions: Vec<FieldDefinition> = fields
        .retained()
        .map(|field| {
            let name = normalize(&field.name);
            let column = field.name.clone();
            let definition = match field.role {
                FieldRole::Measure => FieldDefinition::Measure {
                    name,
                    column,
                    semantic_type: field.semantic_type,
                },
                _ if field.semantic_type.is_temporal() => FieldDefinition::DimensionGroup {
                    name,
                    column,
                    timeframes: DEFAULT_TIMEFRAMES.to_vec(),
                },
                _ => FieldDefinition::Dimension {
                    name,
                    column,
                    semantic_type: field.semantic_type,
                },
            };
            debug!(
                field = definition.name(),
                kind = definition.keyword(),
                "Compiled field"
            );
            definition
        })
        .collect();

    if definitions.is_empty() {
        return Err(LookmlError::NoFieldsConfigured);
    }

    info!(
        view = view_name,
        fields = definitions.len(),
        "Compiled view"
    );

    Ok(ViewModel {
        name: view_name.to_string(),
        sql_table_name: sql_table_name.to_string(),
        fields: definitions,
    })
}
