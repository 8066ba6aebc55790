//! Word cloud rendering.
//!
//! Raw word lists are validated and sanitized here before they reach the
//! surface's cloud renderer. Every failure ends as inline placeholder text.

use crate::config::CloudSettings;
use crate::models::WordEntry;
use crate::surface::{CloudConfig, Surface};
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, error};

pub const NO_DATA: &str = "No data available";
pub const NO_VALID_DATA: &str = "No valid data available";
pub const RENDER_FAILED: &str = "Error generating wordcloud";

/// Characters removed from word text before rendering.
const STRIPPED_CHARS: [char; 5] = ['<', '>', '"', '\'', '&'];

/// Outcome of a render call.
#[derive(Debug, Clone, PartialEq)]
pub enum CloudOutcome {
    Rendered(Vec<WordEntry>),
    /// A placeholder message was shown instead.
    Placeholder(&'static str),
}

/// Validates word lists and hands them to the surface.
pub struct WordCloudRenderer {
    surface: Arc<dyn Surface>,
    settings: CloudSettings,
}

impl WordCloudRenderer {
    pub fn new(surface: Arc<dyn Surface>, settings: CloudSettings) -> Self {
        Self { surface, settings }
    }

    pub fn settings(&self) -> &CloudSettings {
        &self.settings
    }

    /// Render `words` into `slot` using the accent `color`.
    pub fn render(&self, slot: &str, words: &Value, color: &str) -> CloudOutcome {
        let raw = match words.as_array() {
            Some(list) if !list.is_empty() => list,
            _ => return self.placeholder(slot, NO_DATA),
        };

        let entries = prepare_words(raw);
        if entries.is_empty() {
            return self.placeholder(slot, NO_VALID_DATA);
        }

        let list = entries
            .iter()
            .map(|w| (w.text.clone(), w.weight))
            .collect();
        let config = CloudConfig::new(list, color, &self.settings);

        match self.surface.render_cloud(slot, &config) {
            Ok(()) => {
                debug!("Rendered {} words into {}", entries.len(), slot);
                CloudOutcome::Rendered(entries)
            }
            Err(e) => {
                error!("Word cloud rendering failed for {}: {}", slot, e);
                self.placeholder(slot, RENDER_FAILED)
            }
        }
    }

    fn placeholder(&self, slot: &str, message: &'static str) -> CloudOutcome {
        if !self.surface.set_placeholder(slot, message) {
            debug!("Cloud slot {} not present, skipping placeholder", slot);
        }
        CloudOutcome::Placeholder(message)
    }
}

/// Keep well-formed entries, clamp negative weights and sanitize text.
///
/// An entry is well-formed when `text` is a string and `weight` a number.
/// Entries whose text is empty after sanitizing are dropped.
pub fn prepare_words(raw: &[Value]) -> Vec<WordEntry> {
    raw.iter()
        .filter_map(|entry| {
            let text = entry.get("text")?.as_str()?;
            let weight = entry.get("weight")?.as_f64()?;
            let text = sanitize_text(text);
            if text.is_empty() {
                return None;
            }
            Some(WordEntry::new(text, weight.max(0.0)))
        })
        .collect()
}

/// Strip `< > " ' &` from word text.
pub fn sanitize_text(text: &str) -> String {
    text.chars().filter(|c| !STRIPPED_CHARS.contains(c)).collect()
}
