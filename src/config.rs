//! Configuration file handling.
//!
//! This module handles loading and merging configuration from
//! `.complaint-cloud.toml` files.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default configuration file name, looked up in the working directory.
pub const CONFIG_FILE_NAME: &str = ".complaint-cloud.toml";

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Backend connection settings.
    #[serde(default)]
    pub backend: BackendConfig,

    /// Word cloud appearance.
    #[serde(default)]
    pub cloud: CloudSettings,

    /// Error banner behaviour.
    #[serde(default)]
    pub notifier: NotifierConfig,

    /// Dashboard behaviour.
    #[serde(default)]
    pub dashboard: DashboardConfig,
}

/// Backend connection settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendConfig {
    /// Base URL of the dashboard backend.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Request timeout in seconds. Unset means no timeout.
    #[serde(default)]
    pub timeout_seconds: Option<u64>,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_seconds: None,
        }
    }
}

fn default_base_url() -> String {
    "http://localhost:5000".to_string()
}

/// Word cloud appearance settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CloudSettings {
    #[serde(default = "default_grid_size")]
    pub grid_size: u32,

    /// Exponent applied to each weight.
    #[serde(default = "default_weight_exponent")]
    pub weight_exponent: f64,

    #[serde(default = "default_font_family")]
    pub font_family: String,

    /// Share of words drawn rotated (0.0 - 1.0).
    #[serde(default = "default_rotate_ratio")]
    pub rotate_ratio: f64,

    #[serde(default = "default_rotation_steps")]
    pub rotation_steps: u32,

    #[serde(default = "default_background_color")]
    pub background_color: String,

    /// Words whose scaled size is not above this are skipped.
    #[serde(default = "default_min_size")]
    pub min_size: f64,

    #[serde(default = "default_positive_color")]
    pub positive_color: String,

    #[serde(default = "default_negative_color")]
    pub negative_color: String,
}

impl Default for CloudSettings {
    fn default() -> Self {
        Self {
            grid_size: default_grid_size(),
            weight_exponent: default_weight_exponent(),
            font_family: default_font_family(),
            rotate_ratio: default_rotate_ratio(),
            rotation_steps: default_rotation_steps(),
            background_color: default_background_color(),
            min_size: default_min_size(),
            positive_color: default_positive_color(),
            negative_color: default_negative_color(),
        }
    }
}

fn default_grid_size() -> u32 {
    16
}

fn default_weight_exponent() -> f64 {
    2.3
}

fn default_font_family() -> String {
    "Inter, sans-serif".to_string()
}

fn default_rotate_ratio() -> f64 {
    0.5
}

fn default_rotation_steps() -> u32 {
    2
}

fn default_background_color() -> String {
    "transparent".to_string()
}

fn default_min_size() -> f64 {
    10.0
}

fn default_positive_color() -> String {
    "#4CAF50".to_string()
}

fn default_negative_color() -> String {
    "#FF5252".to_string()
}

/// Error banner settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotifierConfig {
    /// Maximum banner length in characters.
    #[serde(default = "default_max_length")]
    pub max_length: usize,

    /// Banner lifetime in milliseconds.
    #[serde(default = "default_dismiss_after_ms")]
    pub dismiss_after_ms: u64,
}

impl Default for NotifierConfig {
    fn default() -> Self {
        Self {
            max_length: default_max_length(),
            dismiss_after_ms: default_dismiss_after_ms(),
        }
    }
}

fn default_max_length() -> usize {
    200
}

fn default_dismiss_after_ms() -> u64 {
    5000
}

/// Dashboard behaviour settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardConfig {
    /// Keep the selected aspect when the new year also offers it.
    /// When false, every year change resets the aspect to "all".
    #[serde(default)]
    pub keep_aspect_on_year_change: bool,

    /// Width of the terminal cloud layout in columns.
    #[serde(default = "default_terminal_width")]
    pub terminal_width: usize,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            keep_aspect_on_year_change: false,
            terminal_width: default_terminal_width(),
        }
    }
}

fn default_terminal_width() -> usize {
    80
}

impl Config {
    /// Load configuration from a file path.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Try to load configuration from the default location.
    ///
    /// Returns `Ok(None)` if the file doesn't exist, `Err` if it exists but can't be parsed.
    pub fn load_default() -> Result<Option<Self>> {
        Self::load_from_dir(Path::new("."))
    }

    /// Try to load `.complaint-cloud.toml` from a directory.
    pub fn load_from_dir(dir: &Path) -> Result<Option<Self>> {
        let config_path = dir.join(CONFIG_FILE_NAME);

        if config_path.exists() {
            Ok(Some(Self::load(&config_path)?))
        } else {
            Ok(None)
        }
    }

    /// Merge this configuration with CLI arguments.
    ///
    /// CLI arguments take precedence over config file settings, but only
    /// when the CLI provides an explicit value.
    pub fn merge_with_args(&mut self, args: &crate::cli::Args) {
        if let Some(ref base_url) = args.base_url {
            self.backend.base_url = base_url.clone();
        }

        if let Some(timeout) = args.timeout {
            self.backend.timeout_seconds = Some(timeout);
        }

        if let Some(width) = args.width {
            self.dashboard.terminal_width = width;
        }

        if args.keep_aspect {
            self.dashboard.keep_aspect_on_year_change = true;
        }
    }

    /// Generate a default configuration file content.
    pub fn default_toml() -> String {
        let config = Config::default();
        toml::to_string_pretty(&config).unwrap_or_else(|_| String::new())
    }
}
