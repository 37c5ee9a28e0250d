//! Tile list to dashboard model compilation.

use tracing::{debug, info, instrument};

use crate::error::{LookmlError, Result};
use crate::model::dashboard::{
    DASHBOARD_LAYOUT, DEFAULT_COL, DEFAULT_COLUMN_LIMIT, DEFAULT_HEIGHT, DEFAULT_LIMIT,
    DEFAULT_MODEL_NAME, DEFAULT_ROW, DEFAULT_SHOW_VALUE_LABELS, DEFAULT_SHOW_VIEW_NAMES,
    DEFAULT_SHOW_X_AXIS_LABEL, DEFAULT_SHOW_Y_AXIS_LABELS, DEFAULT_TIMEZONE, DEFAULT_WIDTH,
    DEFAULT_X_AXIS_SCALE, DEFAULT_Y_AXIS_SCALE_MODE, PREFERRED_VIEWER,
};
use crate::model::{DashboardElement, DashboardModel, Filters, TileSpec};
use crate::naming::{normalize, qualify};

/// Compiles tiles into a [`DashboardModel`] over `view_name`.
///
/// Every field reference is qualified as `<view>.<field>` and every unset
/// option takes its default. Fails with [`LookmlError::NoTilesConfigured`]
/// for an empty tile list.
///
/// ```
/// use lookml_gen::compiler::compile_dashboard;
/// use lookml_gen::model::{TileSpec, TileType};
///
/// let tiles = vec![TileSpec::builder("Total Amount", TileType::SingleValue)
///     .field("amount")
///     .build()];
/// let dashboard = compile_dashboard("Sales Overview", "orders", &tiles).unwrap();
///
/// assert_eq!(dashboard.identifier, "sales_overview");
/// assert_eq!(dashboard.elements[0].name, "total_amount");
/// assert_eq!(dashboard.elements[0].fields, vec!["orders.amount"]);
/// assert_eq!(dashboard.elements[0].fill_fields, vec!["orders.amount"]);
/// ```
#[instrument(skip(tiles), fields(tile_count = tiles.len()))]
pub fn compile_dashboard(title: &str, view_name: &str, tiles: &[TileSpec]) -> Result<DashboardModel> {
    if tiles.is_empty() {
        return Err(LookmlError::NoTilesConfigured);
    }

    let elements: Vec<DashboardElement> = tiles
        .iter()
        .map(|tile| resolve_tile(tile, view_name))
        .collect();

    info!(
        dashboard = %normalize(title),
        view = view_name,
        tiles = elements.len(),
        "Compiled dashboard"
    );

    Ok(DashboardModel {
        identifier: normalize(title),
        title: title.to_string(),
        layout: DASHBOARD_LAYOUT.to_string(),
        preferred_viewer: PREFERRED_VIEWER.to_string(),
        elements,
    })
}

/// Resolves one tile against a view, filling defaults.
pub fn resolve_tile(tile: &TileSpec, view_name: &str) -> DashboardElement {
    let qualify_all =
        |names: &[String]| -> Vec<String> { names.iter().map(|n| qualify(view_name, n)).collect() };

    let fields = qualify_all(&tile.selected_fields);
    let fill_fields = match &tile.fill_fields {
        Some(fill) => qualify_all(fill),
        None => fields.clone(),
    };
    let filters: Filters = tile
        .filters
        .iter()
        .map(|(field, expression)| (qualify(view_name, field), expression.clone()))
        .collect();
    let sorts = tile
        .sorts
        .iter()
        .map(|sort| qualify_sort(view_name, sort))
        .collect();

    let element = DashboardElement {
        title: tile.title.clone(),
        name: normalize(&tile.title),
        model: tile
            .model_name
            .clone()
            .unwrap_or_else(|| DEFAULT_MODEL_NAME.to_string()),
        explore: view_name.to_string(),
        tile_type: tile.tile_type,
        fields,
        pivots: qualify_all(&tile.pivots),
        fill_fields,
        filters,
        sorts,
        limit: tile.limit.unwrap_or(DEFAULT_LIMIT),
        column_limit: tile.column_limit.unwrap_or(DEFAULT_COLUMN_LIMIT),
        query_timezone: tile
            .timezone
            .clone()
            .unwrap_or_else(|| DEFAULT_TIMEZONE.to_string()),
        row: tile.row.unwrap_or(DEFAULT_ROW),
        col: tile.col.unwrap_or(DEFAULT_COL),
        width: tile.width.unwrap_or(DEFAULT_WIDTH),
        height: tile.height.unwrap_or(DEFAULT_HEIGHT),
        show_view_names: tile.show_view_names.unwrap_or(DEFAULT_SHOW_VIEW_NAMES),
        show_y_axis_labels: tile.show_y_axis_labels.unwrap_or(DEFAULT_SHOW_Y_AXIS_LABELS),
        show_x_axis_label: tile.show_x_axis_label.unwrap_or(DEFAULT_SHOW_X_AXIS_LABEL),
        y_axis_scale_mode: tile
            .y_axis_scale_mode
            .clone()
            .unwrap_or_else(|| DEFAULT_Y_AXIS_SCALE_MODE.to_string()),
        x_axis_scale: tile
            .x_axis_scale
            .clone()
            .unwrap_or_else(|| DEFAULT_X_AXIS_SCALE.to_string()),
        legend_position: tile.legend_position.unwrap_or_default(),
        show_value_labels: tile.show_value_labels.unwrap_or(DEFAULT_SHOW_VALUE_LABELS),
        dynamic_fields: tile.dynamic_fields.clone(),
    };

    debug!(
        tile = %element.name,
        tile_type = %element.tile_type,
        fields = element.fields.len(),
        "Resolved tile"
    );
    element
}

/// Qualifies a sort expression, keeping a trailing `asc`/`desc`.
fn qualify_sort(view_name: &str, sort: &str) -> String {
    match sort.rsplit_once(' ') {
        Some((field, direction))
            if direction.eq_ignore_ascii_case("asc") || direction.eq_ignore_ascii_case("desc") =>
        {
            format!("{} {direction}", qualify(view_name, field))
        }
        _ => qualify(view_name, sort),
    }
}
