//! Compilation of field maps and tile lists into typed LookML models.

pub mod dashboard;
pub mod view;

pub use dashboard::{compile_dashboard, resolve_tile};
pub use view::compile_view;
