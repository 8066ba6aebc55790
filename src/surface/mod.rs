//! Rendering surface abstraction.
//!
//! The renderers and the orchestrator never reach a concrete display.
//! They write through `Surface`, addressing display slots by id.

pub mod layout;
pub mod memory;

pub use layout::CloudLayout;
pub use memory::{MemorySurface, SurfaceSnapshot};

use crate::config::CloudSettings;
use crate::error::Result;
use crate::models::SelectOption;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Slot ids the dashboard reads and writes.
pub mod slots {
    pub const YEAR_SELECT: &str = "yearSelect";
    pub const ASPECT_SELECT: &str = "aspectSelect";
    pub const TOTAL_COMPLAINTS: &str = "totalComplaints";
    pub const POSITIVE_COUNT: &str = "positiveCount";
    pub const NEGATIVE_COUNT: &str = "negativeCount";
    pub const POSITIVE_WORD_CLOUD: &str = "positiveWordCloud";
    pub const NEGATIVE_WORD_CLOUD: &str = "negativeWordCloud";

    pub const ALL: [&str; 7] = [
        YEAR_SELECT,
        ASPECT_SELECT,
        TOTAL_COMPLAINTS,
        POSITIVE_COUNT,
        NEGATIVE_COUNT,
        POSITIVE_WORD_CLOUD,
        NEGATIVE_WORD_CLOUD,
    ];
}

/// Everything the cloud renderer needs to draw one word cloud.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CloudConfig {
    /// `(text, weight)` pairs, already sanitized.
    pub list: Vec<(String, f64)>,
    pub grid_size: u32,
    /// Exponent of the weight factor `f(size) = size^exponent`.
    pub weight_exponent: f64,
    pub font_family: String,
    pub color: String,
    pub rotate_ratio: f64,
    pub rotation_steps: u32,
    pub background_color: String,
    pub min_size: f64,
}

impl CloudConfig {
    pub fn new(list: Vec<(String, f64)>, color: &str, settings: &CloudSettings) -> Self {
        Self {
            list,
            grid_size: settings.grid_size,
            weight_exponent: settings.weight_exponent,
            font_family: settings.font_family.clone(),
            color: color.to_string(),
            rotate_ratio: settings.rotate_ratio,
            rotation_steps: settings.rotation_steps,
            background_color: settings.background_color.clone(),
            min_size: settings.min_size,
        }
    }

    /// Scaled glyph size for a word weight.
    pub fn weight_factor(&self, size: f64) -> f64 {
        size.powf(self.weight_exponent)
    }
}

/// A dismissible error banner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Banner {
    pub id: u64,
    pub message: String,
    pub shown_at: DateTime<Utc>,
}

/// Capability interface over the display.
///
/// Methods take `&self`; implementations use interior mutability so a
/// surface can be shared between concurrently running transitions.
/// Slot-addressed writes return `false` when the slot does not exist.
pub trait Surface: Send + Sync {
    fn has_slot(&self, slot: &str) -> bool;

    /// Replace a slot's content with plain text.
    fn set_text(&self, slot: &str, value: &str) -> bool;

    /// Replace a slot's content with a placeholder message.
    fn set_placeholder(&self, slot: &str, message: &str) -> bool;

    /// Rebuild a selection list and mark `selected` as the chosen value.
    fn set_options(&self, slot: &str, options: &[SelectOption], selected: Option<&str>) -> bool;

    /// Draw a word cloud into a slot.
    fn render_cloud(&self, slot: &str, config: &CloudConfig) -> Result<()>;

    /// Insert a banner at the top of the surface.
    fn show_banner(&self, banner: Banner);

    /// Remove a banner; `false` if it was already gone.
    fn remove_banner(&self, id: u64) -> bool;
}
