//! complaint-cloud - sentiment word-cloud dashboard client
//!
//! Loads complaint statistics and word weights from a dashboard backend,
//! renders the counters and word clouds in the terminal, and exports
//! Markdown/JSON reports.
//!
//! Exit codes:
//!   0 - Success (dashboard data was loaded and shown)
//!   1 - Runtime error (invalid arguments, unreadable config, output failure)
//!   2 - No dashboard data could be loaded

mod cli;
mod config;
mod dashboard;
mod error;
mod loader;
mod models;
mod notifier;
mod render;
mod report;
mod surface;
#[cfg(test)]
mod testing;

use anyhow::{Context, Result};
use cli::{Args, Command, OutputFormat};
use config::{Config, CONFIG_FILE_NAME};
use dashboard::{Dashboard, Transition};
use indicatif::{ProgressBar, ProgressStyle};
use loader::{DataLoader, HttpTransport, TransportConfig};
use models::{Aspect, Year};
use std::sync::Arc;
use std::time::Duration;
use surface::MemorySurface;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, error, info, warn};
use tracing_subscriber::FmtSubscriber;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command-line arguments
    let args = Args::parse_args();

    // Validate arguments
    if let Err(e) = args.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    // Handle --init-config early (no logging needed)
    if args.init_config {
        return handle_init_config();
    }

    init_logging(&args);

    info!("complaint-cloud v{}", env!("CARGO_PKG_VERSION"));
    debug!("Arguments: {:?}", args);

    match run(args).await {
        Ok(exit_code) => std::process::exit(exit_code),
        Err(e) => {
            error!("Dashboard failed: {}", e);
            eprintln!("\n❌ Error: {:#}", e);
            std::process::exit(1);
        }
    }
}

/// Handle --init-config: generate a default .complaint-cloud.toml.
fn handle_init_config() -> Result<()> {
    let path = std::path::Path::new(CONFIG_FILE_NAME);

    if path.exists() {
        eprintln!(
            "⚠️  {} already exists. Remove it first or edit it manually.",
            CONFIG_FILE_NAME
        );
        std::process::exit(1);
    }

    let content = Config::default_toml();
    std::fs::write(path, &content)
        .with_context(|| format!("Failed to write {}", CONFIG_FILE_NAME))?;

    println!("✅ Created {} with default settings.", CONFIG_FILE_NAME);
    println!("   Edit it to change the backend URL, cloud colours and banner timing.");
    Ok(())
}

/// Initialize logging based on verbosity settings.
fn init_logging(args: &Args) {
    let level = args.log_level();

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .finish();

    tracing::subscriber::set_global_default(subscriber).expect("Failed to set tracing subscriber");
}

/// Load the dashboard, apply the requested selection and emit the output.
/// Returns the exit code (0 or 2).
async fn run(args: Args) -> Result<i32> {
    let mut config = load_config(&args)?;
    config.merge_with_args(&args);

    let transport = HttpTransport::new(TransportConfig {
        base_url: config.backend.base_url.clone(),
        timeout_seconds: config.backend.timeout_seconds,
    })?;
    let surface = Arc::new(MemorySurface::dashboard(config.dashboard.terminal_width));
    let dashboard = Arc::new(Dashboard::new(
        DataLoader::new(Arc::new(transport)),
        surface.clone(),
        &config,
    ));

    // Step 1: initial load
    let spinner = (!args.quiet).then(|| loading_spinner(&config.backend.base_url));
    let mut outcome = dashboard.initialize().await;

    // Step 2: explicit selection from the command line
    if let Some(ref year) = args.year {
        outcome = dashboard.year_changed(Year::new(year.trim())).await;
    }
    if let Some(ref aspect) = args.aspect {
        outcome = dashboard.aspect_changed(Aspect::new(aspect.trim())).await;
    }

    if let Some(pb) = spinner {
        pb.finish_and_clear();
    }
    debug!("Initial load finished: {:?}", outcome);

    // Step 3: interactive session
    if args.interactive {
        run_interactive(&dashboard, &surface).await?;
    }

    // Step 4: output
    emit(&args, &config, &dashboard, &surface)?;

    if dashboard.applied().is_none() {
        warn!("No dashboard data was loaded");
        return Ok(2);
    }
    Ok(0)
}

fn loading_spinner(base_url: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.set_message(format!("Loading dashboard from {}...", base_url));
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

/// Read commands from stdin until `quit` or end of input.
///
/// Every selection change runs as its own task, so a slow response can
/// still be in flight when the next command arrives.
async fn run_interactive(dashboard: &Arc<Dashboard>, surface: &Arc<MemorySurface>) -> Result<()> {
    println!("{}", report::render_dashboard(&surface.snapshot()));
    println!("{}\n", cli::INTERACTIVE_HELP);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut pending = Vec::new();

    while let Some(line) = lines.next_line().await.context("Failed to read stdin")? {
        let command = match cli::parse_command(&line) {
            Ok(command) => command,
            Err(e) => {
                eprintln!("{} (type `help` for commands)", e);
                continue;
            }
        };

        match command {
            Command::Year(year) => {
                let dashboard = dashboard.clone();
                let surface = surface.clone();
                pending.push(tokio::spawn(async move {
                    let outcome = dashboard.year_changed(Year::new(year)).await;
                    print_if_applied(outcome, &surface);
                }));
            }
            Command::Aspect(aspect) => {
                let dashboard = dashboard.clone();
                let surface = surface.clone();
                pending.push(tokio::spawn(async move {
                    let outcome = dashboard.aspect_changed(Aspect::new(aspect)).await;
                    print_if_applied(outcome, &surface);
                }));
            }
            Command::Show => println!("{}", report::render_dashboard(&surface.snapshot())),
            Command::Dismiss => {
                for banner in surface.snapshot().banners {
                    dashboard.notifier().dismiss(banner.id);
                }
            }
            Command::Help => println!("{}", cli::INTERACTIVE_HELP),
            Command::Quit => break,
        }

        pending.retain(|handle| !handle.is_finished());
    }

    for handle in futures::future::join_all(pending).await {
        if let Err(e) = handle {
            warn!("Selection task failed: {}", e);
        }
    }
    Ok(())
}

fn print_if_applied(outcome: Transition, surface: &MemorySurface) {
    match outcome {
        Transition::Applied => println!("{}", report::render_dashboard(&surface.snapshot())),
        Transition::Stale => debug!("Superseded by a newer selection"),
        other => debug!("Selection finished without update: {:?}", other),
    }
}

/// Print the dashboard or write it to `--output`.
fn emit(args: &Args, config: &Config, dashboard: &Dashboard, surface: &MemorySurface) -> Result<()> {
    let snapshot = surface.snapshot();

    let content = match args.format {
        OutputFormat::Text => {
            if args.output.is_some() {
                colored::control::set_override(false);
            }
            report::render_dashboard(&snapshot)
        }
        OutputFormat::Markdown => {
            let report = report::Report::capture(dashboard, snapshot, &config.backend.base_url);
            report::generate_markdown_report(&report)
        }
        OutputFormat::Json => {
            let report = report::Report::capture(dashboard, snapshot, &config.backend.base_url);
            report::generate_json_report(&report)?
        }
    };

    match args.output {
        Some(ref path) => {
            std::fs::write(path, &content)
                .with_context(|| format!("Failed to write output to {}", path.display()))?;
            if !args.quiet {
                println!("✅ Dashboard saved to: {}", path.display());
            }
        }
        None => println!("{}", content),
    }

    Ok(())
}

/// Load configuration from file or use defaults.
fn load_config(args: &Args) -> Result<Config> {
    // Try explicit config path
    if let Some(ref config_path) = args.config {
        info!("Loading config from: {}", config_path.display());
        return Config::load(config_path);
    }

    // Try default location
    match Config::load_default() {
        Ok(Some(config)) => {
            info!("Loaded default config from {}", CONFIG_FILE_NAME);
            Ok(config)
        }
        Ok(None) => {
            debug!("No config file found, using defaults");
            Ok(Config::default())
        }
        Err(e) => {
            warn!("Failed to load config: {}", e);
            Ok(Config::default())
        }
    }
}
