//! Transient error banners.

use crate::config::NotifierConfig;
use crate::surface::{Banner, Surface};
use chrono::Utc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

pub const GENERIC_MESSAGE: &str = "An error occurred";

/// Shows sanitized error banners that dismiss themselves.
pub struct ErrorNotifier {
    surface: Arc<dyn Surface>,
    config: NotifierConfig,
    next_id: AtomicU64,
}

impl ErrorNotifier {
    pub fn new(surface: Arc<dyn Surface>, config: NotifierConfig) -> Self {
        Self {
            surface,
            config,
            next_id: AtomicU64::new(1),
        }
    }

    /// Show a banner for `message` and schedule its removal.
    ///
    /// Returns the banner id.
    pub fn notify(&self, message: Option<&str>) -> u64 {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let message = sanitize_message(message, self.config.max_length);

        self.surface.show_banner(Banner {
            id,
            message,
            shown_at: Utc::now(),
        });

        let delay = Duration::from_millis(self.config.dismiss_after_ms);
        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                let surface = self.surface.clone();
                handle.spawn(async move {
                    tokio::time::sleep(delay).await;
                    if surface.remove_banner(id) {
                        debug!("Banner {} dismissed after {:?}", id, delay);
                    }
                });
            }
            Err(_) => warn!("No async runtime; banner {} will not auto-dismiss", id),
        }

        id
    }

    /// Remove a banner before its timer fires.
    pub fn dismiss(&self, id: u64) -> bool {
        self.surface.remove_banner(id)
    }
}

/// Fall back to the generic message, strip `<...>` tags, and cap the
/// length at `max_length` characters.
pub fn sanitize_message(message: Option<&str>, max_length: usize) -> String {
    let stripped = match message {
        Some(m) if !m.trim().is_empty() => strip_tags(m),
        _ => String::new(),
    };
    let text = if stripped.trim().is_empty() {
        GENERIC_MESSAGE.to_string()
    } else {
        stripped
    };
    text.chars().take(max_length).collect()
}

/// Remove every `<...>` sequence. An unclosed `<` is kept as text.
fn strip_tags(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut rest = input;

    while let Some(start) = rest.find('<') {
        match rest[start..].find('>') {
            Some(len) => {
                out.push_str(&rest[..start]);
                rest = &rest[start + len + 1..];
            }
            None => break,
        }
    }
    out.push_str(rest);
    out
}
