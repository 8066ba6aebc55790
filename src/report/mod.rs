//! Dashboard presentation: terminal view and exported reports.

pub mod generator;
pub mod terminal;

pub use generator::{generate_json_report, generate_markdown_report, Report};
pub use terminal::render_dashboard;
