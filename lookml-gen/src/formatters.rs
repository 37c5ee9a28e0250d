//! Serialization of compiled models into LookML artifacts.
//!
//! - [`render_view`] writes the LookML view text
//! - [`render_dashboard`] writes the dashboard as a one-element YAML sequence
//! - [`render_profile_table`] and [`render_profile_json`] describe a
//!   classification for humans and tools
//!
//! # Examples
//!
//! ```rust
//! use lookml_gen::formatters::render_view;
//! use lookml_gen::model::{FieldDefinition, SemanticType, ViewModel};
//!
//! let view = ViewModel {
//!     name: "orders".into(),
//!     sql_table_name: "db.orders".into(),
//!     fields: vec![FieldDefinition::Measure {
//!         name: "amount".into(),
//!         column: "Amount".into(),
//!         semantic_type: SemanticType::Number,
//!     }],
//! };
//!
//! let text = render_view(&view);
//! assert!(text.starts_with("view: orders {\n  sql_table_name: db.orders ;;\n\n"));
//! assert!(text.contains("    sql: ${TABLE}.Amount ;;\n"));
//! assert!(text.ends_with("  }\n\n}"));
//! ```

use std::fmt::Write;

use crate::analyzers::ColumnProfile;
use crate::error::{LookmlError, Result};
use crate::model::{DashboardModel, FieldDefinition, ViewModel};

/// Renders a view as LookML text.
///
/// Each field block is followed by a blank line and the text ends with the
/// closing brace, without a trailing newline.
pub fn render_view(view: &ViewModel) -> String {
    let mut out = String::new();
    // Writing to a String cannot fail.
    let _ = write_view(&mut out, view);
    out
}

fn write_view(out: &mut String, view: &ViewModel) -> std::fmt::Result {
    writeln!(out, "view: {} {{", view.name)?;
    writeln!(out, "  sql_table_name: {} ;;", view.sql_table_name)?;
    writeln!(out)?;

    for field in &view.fields {
        writeln!(out, "  {}: {} {{", field.keyword(), field.name())?;
        match field {
            FieldDefinition::Dimension { semantic_type, .. }
            | FieldDefinition::Measure { semantic_type, .. } => {
                writeln!(out, "    type: {semantic_type}")?;
            }
            FieldDefinition::DimensionGroup { timeframes, .. } => {
                let timeframes: Vec<&str> = timeframes.iter().map(|t| t.as_str()).collect();
                writeln!(out, "    type: time")?;
                writeln!(out, "    timeframes: [{}]", timeframes.join(", "))?;
            }
        }
        writeln!(out, "    sql: ${{TABLE}}.{} ;;", field.column())?;
        writeln!(out, "  }}")?;
        writeln!(out)?;
    }

    write!(out, "}}")
}

/// Renders a dashboard as block-style YAML, keys in model order.
pub fn render_dashboard(dashboard: &DashboardModel) -> Result<String> {
    serde_yaml::to_string(std::slice::from_ref(dashboard)).map_err(|e| {
        LookmlError::Serialization(format!("Failed to serialize dashboard to YAML: {e}"))
    })
}

/// Renders column profiles as an aligned text table.
pub fn render_profile_table(profiles: &[ColumnProfile]) -> String {
    let headers = ["column", "native type", "type", "distinct", "nulls", "ratio", "role"];
    let rows: Vec<[String; 7]> = profiles
        .iter()
        .map(|p| {
            [
                p.column_name.clone(),
                p.native_type.clone(),
                p.semantic_type.to_string(),
                p.distinct_count.to_string(),
                p.null_count.to_string(),
                format!("{:.3}", p.unique_ratio),
                p.role.to_string(),
            ]
        })
        .collect();

    let mut widths = headers.map(str::len);
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut out = String::new();
    let mut push_row = |cells: &[&str]| {
        let line: Vec<String> = cells
            .iter()
            .zip(widths)
            .map(|(cell, width)| format!("{cell:<width$}"))
            .collect();
        let _ = writeln!(out, "{}", line.join("  ").trim_end());
    };

    push_row(&headers);
    for row in &rows {
        let cells: Vec<&str> = row.iter().map(String::as_str).collect();
        push_row(&cells);
    }
    out
}

/// Renders column profiles as pretty-printed JSON.
pub fn render_profile_json(profiles: &[ColumnProfile]) -> Result<String> {
    serde_json::to_string_pretty(profiles).map_err(|e| {
        LookmlError::Serialization(format!("Failed to serialize profiles to JSON: {e}"))
    })
}
