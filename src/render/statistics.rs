//! Summary counter rendering.

use crate::models::Statistics;
use crate::surface::{slots, Surface};
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, warn};

/// Writes total/positive/negative counts into their slots.
pub struct StatisticsRenderer {
    surface: Arc<dyn Surface>,
}

impl StatisticsRenderer {
    pub fn new(surface: Arc<dyn Surface>) -> Self {
        Self { surface }
    }

    /// Render a raw statistics payload.
    ///
    /// Non-object payloads are ignored. Returns the counts that were
    /// written, if any.
    pub fn render(&self, stats: &Value) -> Option<Statistics> {
        let Some(stats) = Statistics::from_json(stats) else {
            warn!("Ignoring statistics payload that is not an object");
            return None;
        };

        for (slot, value) in [
            (slots::TOTAL_COMPLAINTS, stats.total),
            (slots::POSITIVE_COUNT, stats.positive),
            (slots::NEGATIVE_COUNT, stats.negative),
        ] {
            if !self.surface.set_text(slot, &value.to_string()) {
                debug!("Statistics slot {} not present, skipping", slot);
            }
        }

        Some(stats)
    }
}
