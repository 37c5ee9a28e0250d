//! Typed data model shared by the analyzers, compilers and formatters.

pub mod dashboard;
pub mod field;
pub mod view;

pub use dashboard::{
    DashboardElement, DashboardModel, Filters, LegendPosition, TileSpec, TileSpecBuilder,
    TileType,
};
pub use field::{FieldConfig, FieldMap, FieldRole, SemanticType};
pub use view::{FieldDefinition, Timeframe, ViewModel, DEFAULT_TIMEFRAMES};
