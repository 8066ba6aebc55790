//! Renderers for the dashboard slots.
//!
//! Both renderers validate raw payloads themselves; malformed data ends as
//! a no-op or placeholder text, never as an error.

pub mod cloud;
pub mod statistics;

pub use cloud::{CloudOutcome, WordCloudRenderer};
pub use statistics::StatisticsRenderer;
