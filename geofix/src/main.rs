//! geofix - single-screen location fetcher
//!
//! Parses arguments, loads config, sets up logging and the terminal, then
//! hands over to [`geofix::app::run_app`] or runs one headless fetch.
//!
//! # Usage
//!
//! ```sh
//! # Simulated provider, prompt for permission
//! cargo run -p geofix
//!
//! # Provider slower than the timeout
//! cargo run -p geofix -- --delay-ms 11000
//!
//! # One fetch, printed to stdout
//! cargo run -p geofix -- --once --permission granted --provider ip
//! ```

use std::fs::File;
use std::io;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use clap::Parser;
use crossterm::{
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use geofix::app::run_app;
use geofix::config::{Config, Overrides, PermissionMode, ProviderKind, SimulatedOutcome};
use geofix::gate::StdinGate;
use geofix::sink::StdoutSink;
use geofix_core::{FixedGate, LocationController, PermissionGate, Trigger};
use ratatui::{Terminal, backend::CrosstermBackend};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Fetch and show this device's current location
#[derive(Parser, Debug)]
#[command(name = "geofix")]
#[command(about = "Fetch the current location on demand")]
struct Args {
    /// TOML config file
    #[arg(long, short)]
    config: Option<PathBuf>,

    /// Location source
    #[arg(long, value_enum)]
    provider: Option<ProviderKind>,

    /// Fetch timeout in milliseconds
    #[arg(long)]
    timeout_ms: Option<u64>,

    /// Simulated provider delay in milliseconds
    #[arg(long)]
    delay_ms: Option<u64>,

    /// Simulated provider result
    #[arg(long, value_enum)]
    result: Option<SimulatedOutcome>,

    /// How the permission question is answered
    #[arg(long, value_enum)]
    permission: Option<PermissionMode>,

    /// Fetch once, print the result, and exit
    #[arg(long)]
    once: bool,

    /// Log file (the terminal belongs to the UI)
    #[arg(long)]
    log_file: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> io::Result<()> {
    let args = Args::parse();

    let config = match load_config(&args) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };
    init_logging(&config)?;
    info!(?config, "starting");

    if args.once {
        return run_once(&config).await;
    }

    // ===== Terminal setup =====
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, &config, CancellationToken::new()).await;

    // ===== Cleanup =====
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn load_config(args: &Args) -> Result<Config, geofix::config::ConfigError> {
    let config = Config::load(args.config.as_deref())?.with_overrides(Overrides {
        timeout_ms: args.timeout_ms,
        permission: args.permission,
        provider: args.provider,
        delay_ms: args.delay_ms,
        result: args.result,
        log_file: args.log_file.clone(),
    });
    config.validate()?;
    Ok(config)
}

fn init_logging(config: &Config) -> io::Result<()> {
    let file = File::create(&config.log.file)?;
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log.level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_env_filter(filter)
        .init();
    Ok(())
}

/// Headless mode: one trigger, output on stdout.
async fn run_once(config: &Config) -> io::Result<()> {
    let gate: Arc<dyn PermissionGate> = match config.permission.mode {
        PermissionMode::Granted => Arc::new(FixedGate::granted()),
        PermissionMode::Denied => Arc::new(FixedGate::answering(false)),
        PermissionMode::Prompt => Arc::new(StdinGate::new()),
    };
    let controller = LocationController::new(config.location_provider(), gate, StdoutSink)
        .with_options(config.fetch_options());

    match controller.request_location().await {
        Trigger::Started(handle) => {
            if handle.outcome().await.is_none() {
                warn!("fetch ended without delivering");
            }
        }
        Trigger::Denied => {}
    }
    Ok(())
}
