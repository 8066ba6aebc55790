//! In-memory surface.
//!
//! Holds slot contents and banners behind a mutex and lays clouds out with
//! the terminal layout engine. The CLI presents its snapshot; tests inspect
//! it directly.

use super::{Banner, CloudConfig, CloudLayout, Surface};
use crate::error::{DashboardError, Result};
use crate::models::SelectOption;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};
use tracing::debug;

/// Content currently shown in a slot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SlotContent {
    Empty,
    Text {
        value: String,
    },
    Placeholder {
        message: String,
    },
    Options {
        options: Vec<SelectOption>,
        selected: Option<String>,
    },
    Cloud {
        layout: CloudLayout,
    },
}

impl SlotContent {
    /// Text shown for text and placeholder slots.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            SlotContent::Text { value } => Some(value),
            SlotContent::Placeholder { message } => Some(message),
            _ => None,
        }
    }
}

/// Point-in-time copy of the surface state.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SurfaceSnapshot {
    pub slots: BTreeMap<String, SlotContent>,
    /// Newest first.
    pub banners: Vec<Banner>,
}

impl SurfaceSnapshot {
    pub fn slot(&self, slot: &str) -> Option<&SlotContent> {
        self.slots.get(slot)
    }

    pub fn text(&self, slot: &str) -> Option<&str> {
        self.slot(slot).and_then(SlotContent::as_text)
    }

    pub fn cloud(&self, slot: &str) -> Option<&CloudLayout> {
        match self.slot(slot) {
            Some(SlotContent::Cloud { layout }) => Some(layout),
            _ => None,
        }
    }

    pub fn options(&self, slot: &str) -> Option<(&[SelectOption], Option<&str>)> {
        match self.slot(slot) {
            Some(SlotContent::Options { options, selected }) => {
                Some((options.as_slice(), selected.as_deref()))
            }
            _ => None,
        }
    }
}

/// Mutex-backed surface with a fixed set of slots.
pub struct MemorySurface {
    width: usize,
    state: Mutex<SurfaceSnapshot>,
}

impl MemorySurface {
    /// A surface exposing exactly `slots`, laying clouds out `width` columns wide.
    pub fn with_slots(slots: &[&str], width: usize) -> Self {
        let slots = slots
            .iter()
            .map(|id| (id.to_string(), SlotContent::Empty))
            .collect();
        Self {
            width,
            state: Mutex::new(SurfaceSnapshot {
                slots,
                banners: Vec::new(),
            }),
        }
    }

    /// A surface with every dashboard slot.
    pub fn dashboard(width: usize) -> Self {
        Self::with_slots(&super::slots::ALL, width)
    }

    pub fn snapshot(&self) -> SurfaceSnapshot {
        self.lock().clone()
    }

    fn lock(&self) -> MutexGuard<'_, SurfaceSnapshot> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn replace(&self, slot: &str, content: SlotContent) -> bool {
        match self.lock().slots.get_mut(slot) {
            Some(existing) => {
                *existing = content;
                true
            }
            None => {
                debug!("Slot {} does not exist", slot);
                false
            }
        }
    }
}

impl Surface for MemorySurface {
    fn has_slot(&self, slot: &str) -> bool {
        self.lock().slots.contains_key(slot)
    }

    fn set_text(&self, slot: &str, value: &str) -> bool {
        self.replace(
            slot,
            SlotContent::Text {
                value: value.to_string(),
            },
        )
    }

    fn set_placeholder(&self, slot: &str, message: &str) -> bool {
        self.replace(
            slot,
            SlotContent::Placeholder {
                message: message.to_string(),
            },
        )
    }

    fn set_options(&self, slot: &str, options: &[SelectOption], selected: Option<&str>) -> bool {
        self.replace(
            slot,
            SlotContent::Options {
                options: options.to_vec(),
                selected: selected.map(String::from),
            },
        )
    }

    fn render_cloud(&self, slot: &str, config: &CloudConfig) -> Result<()> {
        if !self.has_slot(slot) {
            return Err(DashboardError::Render(format!("Slot {} does not exist", slot)));
        }
        let layout = CloudLayout::compute(config, self.width)?;
        self.replace(slot, SlotContent::Cloud { layout });
        Ok(())
    }

    fn show_banner(&self, banner: Banner) {
        self.lock().banners.insert(0, banner);
    }

    fn remove_banner(&self, id: u64) -> bool {
        let mut state = self.lock();
        let before = state.banners.len();
        state.banners.retain(|b| b.id != id);
        state.banners.len() != before
    }
}
