//! Command-line interface argument parsing.
//!
//! This module handles CLI argument parsing using clap, plus the small
//! command language of interactive mode.

use clap::Parser;
use std::path::PathBuf;

/// complaint-cloud - sentiment word clouds for complaint dashboards
///
/// Loads years, aspects and word-cloud data from a dashboard backend and
/// renders the counters and both word clouds in the terminal, or exports
/// them as a Markdown/JSON report.
///
/// Examples:
///   complaint-cloud --base-url http://localhost:5000
///   complaint-cloud --year 2023 --aspect "Permasalahan Parkir"
///   complaint-cloud --format markdown --output report.md
///   complaint-cloud --interactive
///   complaint-cloud --init-config
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Args {
    /// Base URL of the dashboard backend
    ///
    /// Overrides `[backend] base_url` from the config file.
    #[arg(short = 'u', long, value_name = "URL", env = "COMPLAINT_CLOUD_URL")]
    pub base_url: Option<String>,

    /// Path to configuration file
    ///
    /// If not specified, looks for .complaint-cloud.toml in the current directory
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Year to select after the initial load
    #[arg(short, long, value_name = "YEAR")]
    pub year: Option<String>,

    /// Aspect to select after the initial load
    #[arg(short, long, value_name = "ASPECT")]
    pub aspect: Option<String>,

    /// Request timeout in seconds (default: no timeout)
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Width of the terminal word clouds in columns
    #[arg(long, value_name = "COLUMNS")]
    pub width: Option<usize>,

    /// Keep the selected aspect when switching to a year that also has it
    #[arg(long)]
    pub keep_aspect: bool,

    /// Output format (text, markdown, json)
    #[arg(long, default_value = "text", value_name = "FORMAT")]
    pub format: OutputFormat,

    /// Write the output to a file instead of stdout
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Read selection commands from stdin after the initial load
    #[arg(short, long)]
    pub interactive: bool,

    /// Enable verbose logging output
    #[arg(short, long)]
    pub verbose: bool,

    /// Run in quiet mode (minimal output)
    #[arg(short, long)]
    pub quiet: bool,

    /// Generate a default .complaint-cloud.toml configuration file
    #[arg(long)]
    pub init_config: bool,
}

/// Output format for the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Coloured terminal view (default)
    #[default]
    Text,
    /// Markdown report
    Markdown,
    /// JSON report
    Json,
}

impl Args {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate the parsed arguments.
    pub fn validate(&self) -> Result<(), String> {
        if self.init_config {
            return Ok(());
        }

        if let Some(ref url) = self.base_url {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err("Base URL must start with 'http://' or 'https://'".to_string());
            }
        }

        if self.verbose && self.quiet {
            return Err("Cannot use both --verbose and --quiet".to_string());
        }

        if let Some(timeout) = self.timeout {
            if timeout == 0 {
                return Err("Timeout must be at least 1 second".to_string());
            }
        }

        if let Some(width) = self.width {
            if width < 10 {
                return Err("Width must be at least 10 columns".to_string());
            }
        }

        if let Some(ref year) = self.year {
            if year.trim().is_empty() {
                return Err("Year must not be empty".to_string());
            }
        }

        if let Some(ref aspect) = self.aspect {
            if aspect.trim().is_empty() {
                return Err("Aspect must not be empty".to_string());
            }
        }

        Ok(())
    }

    /// Returns the log level based on verbosity settings.
    pub fn log_level(&self) -> tracing::Level {
        if self.quiet {
            tracing::Level::ERROR
        } else if self.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::WARN
        }
    }
}

/// A command typed in interactive mode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Year(String),
    Aspect(String),
    Show,
    Dismiss,
    Help,
    Quit,
}

pub const INTERACTIVE_HELP: &str = "\
Commands:
  year <YEAR>       select a year (reloads aspects and clouds)
  aspect <ASPECT>   select an aspect within the current year (`all` for every aspect)
  show              print the dashboard
  dismiss           close all error banners
  help              print this help
  quit              wait for pending loads and exit";

/// Parse one line of interactive input.
pub fn parse_command(line: &str) -> Result<Command, String> {
    let line = line.trim();
    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };

    match word.to_lowercase().as_str() {
        "year" | "y" if !rest.is_empty() => Ok(Command::Year(rest.to_string())),
        "aspect" | "a" if !rest.is_empty() => Ok(Command::Aspect(rest.to_string())),
        "year" | "y" | "aspect" | "a" => Err(format!("`{}` needs a value", word)),
        "show" | "s" => Ok(Command::Show),
        "dismiss" | "d" => Ok(Command::Dismiss),
        "help" | "h" | "?" => Ok(Command::Help),
        "quit" | "q" | "exit" => Ok(Command::Quit),
        "" => Err("empty command".to_string()),
        other => Err(format!("unknown command `{}`", other)),
    }
}
