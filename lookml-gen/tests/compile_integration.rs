//! End-to-end tests from an in-memory dataset to rendered artifacts.

use std::sync::Arc;

use arrow::array::{ArrayRef, Date32Array, Int64Array, StringArray};
use lookml_gen::analyzers::{ColumnClassifier, FieldOverride, LayoutAdvisor};
use lookml_gen::compiler::{compile_dashboard, compile_view};
use lookml_gen::config::ProjectConfig;
use lookml_gen::dataset::Dataset;
use lookml_gen::error::LookmlError;
use lookml_gen::formatters::{render_dashboard, render_view};
use lookml_gen::generator::ArtifactGenerator;
use lookml_gen::model::{FieldDefinition, FieldRole, SemanticType, TileType};

/// 1000 orders: unique ids, three categories, fifty amounts, one date per row.
fn orders() -> Dataset {
    let rows = 1000i64;
    let categories = ["books", "games", "music"];
    Dataset::from_columns(vec![
        (
            "id",
            Arc::new(Int64Array::from((0..rows).collect::<Vec<_>>())) as ArrayRef,
        ),
        (
            "category",
            Arc::new(StringArray::from(
                (0..rows)
                    .map(|i| categories[(i % 3) as usize])
                    .collect::<Vec<_>>(),
            )) as ArrayRef,
        ),
        (
            "amount",
            Arc::new(Int64Array::from((0..rows).map(|i| i % 50).collect::<Vec<_>>())) as ArrayRef,
        ),
        (
            "order_date",
            Arc::new(Date32Array::from((0..rows as i32).map(|i| 19_000 + i).collect::<Vec<_>>()))
                as ArrayRef,
        ),
    ])
    .unwrap()
}

#[test]
fn test_orders_classification() {
    let fields = ColumnClassifier::new().classify(&orders()).unwrap();

    let roles: Vec<(&str, FieldRole, SemanticType)> = fields
        .iter()
        .map(|f| (f.name.as_str(), f.role, f.semantic_type))
        .collect();
    assert_eq!(
        roles,
        vec![
            ("id", FieldRole::Dimension, SemanticType::Number),
            ("category", FieldRole::Measure, SemanticType::String),
            ("amount", FieldRole::Measure, SemanticType::Number),
            ("order_date", FieldRole::Dimension, SemanticType::Date),
        ]
    );
}

#[test]
fn test_orders_view() {
    let fields = ColumnClassifier::new().classify(&orders()).unwrap();
    let view = compile_view(&fields, "orders", "ANALYTICS.CORE.orders").unwrap();

    let keywords: Vec<(&str, &str)> = view.fields.iter().map(|f| (f.keyword(), f.name())).collect();
    assert_eq!(
        keywords,
        vec![
            ("dimension", "id"),
            ("measure", "category"),
            ("measure", "amount"),
            ("dimension_group", "order_date"),
        ]
    );
    assert!(matches!(
        view.field("category"),
        Some(FieldDefinition::Measure {
            semantic_type: SemanticType::String,
            ..
        })
    ));

    let text = render_view(&view);
    assert!(text.starts_with("view: orders {\n  sql_table_name: ANALYTICS.CORE.orders ;;\n\n"));
    assert!(text.contains(
        "  dimension_group: order_date {\n    type: time\n    timeframes: [raw, date, week, month, quarter, year]\n    sql: ${TABLE}.order_date ;;\n  }\n"
    ));
    assert!(text.contains("  measure: category {\n    type: string\n"));
    assert!(text.ends_with("}"));
}

#[test]
fn test_orders_suggested_dashboard() {
    let fields = ColumnClassifier::new().classify(&orders()).unwrap();
    let tiles = LayoutAdvisor::new().suggest(&fields);

    let summary: Vec<(&str, TileType, Vec<&str>)> = tiles
        .iter()
        .map(|t| {
            (
                t.title.as_str(),
                t.tile_type,
                t.selected_fields.iter().map(String::as_str).collect(),
            )
        })
        .collect();
    assert_eq!(
        summary,
        vec![
            ("Trend Over Time", TileType::LookerLine, vec!["order_date", "amount"]),
            ("Top id by amount", TileType::LookerBar, vec!["id", "amount"]),
            ("Total amount", TileType::SingleValue, vec!["amount"]),
        ]
    );

    let dashboard = compile_dashboard("Orders Overview", "orders", &tiles).unwrap();
    assert_eq!(dashboard.file_name(), "orders_overview.dashboard.lookml");
    let names: Vec<&str> = dashboard.elements.iter().map(|e| e.name.as_str()).collect();
    assert_eq!(names, vec!["trend_over_time", "top_id_by_amount", "total_amount"]);
    assert_eq!(
        dashboard.elements[0].fields,
        vec!["orders.order_date", "orders.amount"]
    );

    let yaml = render_dashboard(&dashboard).unwrap();
    let parsed: serde_yaml::Value = serde_yaml::from_str(&yaml).unwrap();
    assert_eq!(parsed[0]["dashboard"].as_str(), Some("orders_overview"));
    assert_eq!(parsed[0]["layout"].as_str(), Some("newspaper"));
    assert_eq!(parsed[0]["preferred_viewer"].as_str(), Some("dashboards-next"));
    assert_eq!(parsed[0]["elements"][1]["type"].as_str(), Some("looker_bar"));
    assert_eq!(parsed[0]["elements"][2]["fields"][0].as_str(), Some("orders.amount"));
}

#[test]
fn test_manual_project_suggests_three_tiles() {
    let config = ProjectConfig::default()
        .with_view_name("orders")
        .with_suggest_tiles(true);
    let artifacts = ArtifactGenerator::new(config).generate(&orders()).unwrap();

    assert!(artifacts.view_text.contains("  dimension: amount {\n"));
    let dashboard = artifacts.dashboard.unwrap();
    let titles: Vec<&str> = dashboard
        .model
        .elements
        .iter()
        .map(|e| e.title.as_str())
        .collect();
    assert_eq!(titles, vec!["Trend Over Time", "Top id by amount", "Total amount"]);
}

#[test]
fn test_auto_project_applies_field_overrides() {
    let config = ProjectConfig::from_yaml_str(
        r#"
view_name: orders
auto_classify: true
fields:
  id: { role: excluded }
  category: { role: dimension, type: yesno }
"#,
    )
    .unwrap();

    let artifacts = ArtifactGenerator::new(config).generate(&orders()).unwrap();

    let roles: Vec<(&str, FieldRole, SemanticType)> = artifacts
        .fields
        .iter()
        .map(|f| (f.name.as_str(), f.role, f.semantic_type))
        .collect();
    assert_eq!(
        roles,
        vec![
            ("category", FieldRole::Dimension, SemanticType::YesNo),
            ("amount", FieldRole::Measure, SemanticType::Number),
            ("order_date", FieldRole::Dimension, SemanticType::Date),
        ]
    );
}

#[test]
fn test_generator_from_yaml_project() {
    let config = ProjectConfig::from_yaml_str(
        r#"
view_name: orders
schema: ANALYTICS.CORE
dashboard_title: Category Mix
model_name: retail
fields:
  category: { role: dimension }
  amount: { role: measure, type: number }
  id: { role: excluded }
tiles:
  - title: Amount by Category
    type: looker_column
    fields: [category, amount]
    sorts: [amount desc]
    filters: { category: "-books", amount: ">10" }
"#,
    )
    .unwrap();

    let artifacts = ArtifactGenerator::new(config).generate(&orders()).unwrap();

    assert_eq!(artifacts.view_file_name, "orders.view.lkml");
    assert!(artifacts.view.field("id").is_none());
    assert!(artifacts.view_text.contains("  dimension_group: order_date {\n"));
    assert!(artifacts.view_text.contains("  dimension: category {\n    type: string\n"));

    let dashboard = artifacts.dashboard.unwrap();
    assert_eq!(dashboard.file_name, "category_mix.dashboard.lookml");
    let element = &dashboard.model.elements[0];
    assert_eq!(element.model, "retail");
    assert_eq!(element.sorts, vec!["orders.amount desc"]);
    assert_eq!(element.filters["orders.category"], "-books");
    assert_eq!(
        element.filters.keys().collect::<Vec<_>>(),
        vec!["orders.category", "orders.amount"]
    );
    let parsed: serde_yaml::Value = serde_yaml::from_str(&dashboard.yaml).unwrap();
    let rendered: Vec<(&str, &str)> = parsed[0]["elements"][0]["filters"]
        .as_mapping()
        .unwrap()
        .iter()
        .filter_map(|(k, v)| Some((k.as_str()?, v.as_str()?)))
        .collect();
    assert_eq!(
        rendered,
        vec![("orders.category", "-books"), ("orders.amount", ">10")]
    );
}

#[test]
fn test_excluding_everything_fails() {
    let mut config = ProjectConfig::default();
    for column in ["id", "category", "amount", "order_date"] {
        config = config.with_field(column, FieldOverride::role(FieldRole::Excluded));
    }
    let err = ArtifactGenerator::new(config).generate(&orders()).unwrap_err();
    assert!(matches!(err, LookmlError::NoFieldsConfigured));
}
