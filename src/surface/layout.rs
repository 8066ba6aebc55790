//! Terminal word-cloud layout.
//!
//! Scales each weight, drops glyphs that would be too small, assigns a
//! rotation and packs the words into fixed-width rows. Rotation choice is
//! an FNV hash of the word text, so the same input always lays out the same.

use super::CloudConfig;
use crate::error::{DashboardError, Result};
use serde::{Deserialize, Serialize};
use fnv::FnvHasher;
use std::hash::{Hash, Hasher};

const MIN_ROTATION: f64 = -90.0;
const MAX_ROTATION: f64 = 90.0;

/// A word with its computed size and position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlacedWord {
    pub text: String,
    pub weight: f64,
    /// Output of the weight factor.
    pub size: f64,
    /// 0 (small) to 2 (large), relative to the largest word.
    pub emphasis: u8,
    /// Degrees; 0 for upright words.
    pub rotation: f64,
    pub row: usize,
    pub column: usize,
}

/// A laid-out cloud, ready for presentation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CloudLayout {
    pub color: String,
    pub background_color: String,
    pub font_family: String,
    pub width: usize,
    pub words: Vec<PlacedWord>,
}

impl CloudLayout {
    /// Compute a layout for `config` within `width` terminal columns.
    pub fn compute(config: &CloudConfig, width: usize) -> Result<Self> {
        if config.grid_size == 0 {
            return Err(DashboardError::Render("grid size must be positive".to_string()));
        }
        if config.rotation_steps == 0 {
            return Err(DashboardError::Render(
                "rotation steps must be positive".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&config.rotate_ratio) {
            return Err(DashboardError::Render(format!(
                "rotate ratio {} is outside 0..=1",
                config.rotate_ratio
            )));
        }
        if width == 0 {
            return Err(DashboardError::Render("width must be positive".to_string()));
        }

        let mut sized = Vec::with_capacity(config.list.len());
        for (text, weight) in &config.list {
            let size = config.weight_factor(*weight);
            if !size.is_finite() {
                return Err(DashboardError::Render(format!(
                    "weight {} of {:?} does not scale to a finite size",
                    weight, text
                )));
            }
            if size <= config.min_size {
                continue;
            }
            sized.push((text.as_str(), *weight, size));
        }

        // Largest first; ties keep input order.
        sized.sort_by(|a, b| b.2.total_cmp(&a.2));

        let max_size = sized.first().map(|w| w.2).unwrap_or(0.0);
        let gap = (config.grid_size as usize / 8).max(1);

        let mut words = Vec::with_capacity(sized.len());
        let mut row = 0;
        let mut column = 0;

        for (text, weight, size) in sized {
            let emphasis = emphasis(size, max_size);
            let len = display_text(text, emphasis).chars().count();
            if column > 0 && column + gap + len > width {
                row += 1;
                column = 0;
            }
            if column > 0 {
                column += gap;
            }

            words.push(PlacedWord {
                text: text.to_string(),
                weight,
                size,
                emphasis,
                rotation: rotation(text, config),
                row,
                column,
            });
            column += len;
        }

        Ok(Self {
            color: config.color.clone(),
            background_color: config.background_color.clone(),
            font_family: config.font_family.clone(),
            width,
            words,
        })
    }

    /// Number of rows used.
    pub fn rows(&self) -> usize {
        self.words.last().map(|w| w.row + 1).unwrap_or(0)
    }

    /// Plain-text rendering, one string per row.
    pub fn lines(&self) -> Vec<String> {
        let mut lines = vec![String::new(); self.rows()];
        for word in &self.words {
            let line = &mut lines[word.row];
            let current = line.chars().count();
            if word.column > current {
                line.push_str(&" ".repeat(word.column - current));
            }
            line.push_str(&styled_text(word));
        }
        lines
    }
}

/// Text of a word as shown in plain output. Large words are upper-cased.
pub fn styled_text(word: &PlacedWord) -> String {
    display_text(&word.text, word.emphasis)
}

fn display_text(text: &str, emphasis: u8) -> String {
    if emphasis == 2 {
        text.to_uppercase()
    } else {
        text.to_string()
    }
}

fn emphasis(size: f64, max_size: f64) -> u8 {
    if max_size <= 0.0 {
        return 0;
    }
    let ratio = size / max_size;
    if ratio >= 0.66 {
        2
    } else if ratio >= 0.33 {
        1
    } else {
        0
    }
}

fn rotation(text: &str, config: &CloudConfig) -> f64 {
    let mut hasher = FnvHasher::default();
    text.hash(&mut hasher);
    let h = hasher.finish();

    let draw = (h % 10_000) as f64 / 10_000.0;
    if draw >= config.rotate_ratio {
        return 0.0;
    }

    if config.rotation_steps == 1 {
        return MIN_ROTATION;
    }
    let step = (h >> 32) % config.rotation_steps as u64;
    let range = MAX_ROTATION - MIN_ROTATION;
    MIN_ROTATION + step as f64 * range / (config.rotation_steps - 1) as f64
}
