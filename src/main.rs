//! Application entry point for the `satmon` telemetry monitor.
//!
//! This binary runs one batch pass over a telemetry file:
//! - Loading configuration from environment variables or `.env`
//! - Initializing structured logging/tracing (on stderr)
//! - Parsing the input file into readings (`ingest`)
//! - Feeding every reading through the violation monitor (`monitor`)
//! - Rendering the alert ledger as JSON on stdout (`formatter`)
//!
//! # Usage
//! `satmon <input_file>`
//!
//! # Environment Variables
//! - `SATMON_WINDOW_SECS` (optional) – breach window in seconds (default: 300)
//! - `SATMON_SKIP_MALFORMED` (optional) – skip malformed lines (default: false)
//! - `SATMON_LOG_LEVEL` (optional) – log verbosity (default: `warn`)
//! - `FORCE_COLOR` (optional) – force coloured logs on or off
//!
//! The report is rendered completely before anything reaches stdout, so a
//! failed run never prints partial JSON.
use std::{env, path::Path, process::ExitCode};

use dotenvy::dotenv;
use is_terminal::IsTerminal;
use tracing_subscriber::filter::EnvFilter;

use anyhow::Result;

mod config;
mod formatter;
mod ingest;
mod models;
mod monitor;

pub use config::Config;

use monitor::{Detector, Monitor};

// ---

fn main() -> Result<ExitCode> {
    // ---
    let args: Vec<String> = env::args().collect();
    if args.len() != 2 {
        let program = args.first().map(String::as_str).unwrap_or("satmon");
        eprintln!("Usage: {} <input_file>", program);
        return Ok(ExitCode::FAILURE);
    }

    dotenv().ok();
    init_tracing();

    let cfg = config::load_from_env()?;
    cfg.log_config();

    let report = run(Path::new(&args[1]), &cfg)?;
    println!("{}", report);

    Ok(ExitCode::SUCCESS)
}

/// Process one telemetry file and return the rendered JSON report.
fn run(path: &Path, cfg: &Config) -> Result<String> {
    // ---
    let readings = ingest::read_readings(path, cfg.skip_malformed)?;

    let mut monitor = Monitor::new(Detector::new(cfg.window_secs));
    let added = monitor.ingest_all(readings);
    debug_assert_eq!(added, monitor.ledger().len());

    tracing::info!(
        "Processed {} satellite/component histories, {} alerts raised",
        monitor.store().key_count(),
        monitor.ledger().len()
    );
    if monitor.ledger().is_empty() {
        tracing::debug!("No violations detected in '{}'", path.display());
    }

    formatter::render(monitor.ledger())
}

// ---

/// Initialize the global tracing subscriber for structured logging.
///
/// This function configures the [`tracing_subscriber`] with:
/// - Output on stderr, leaving stdout to the JSON report
/// - Log target, file, and line number output enabled
/// - Color output controlled by TTY detection and `FORCE_COLOR` env var:
///   - `FORCE_COLOR=1|true|yes`: force colors on
///   - `FORCE_COLOR=0|false|no`: force colors off
///   - unset or other values: auto-detect TTY on stderr
/// - Log level controlled by `RUST_LOG`, else the `SATMON_LOG_LEVEL` env var
///
/// This should be called once at startup before any logging or tracing
/// macros are invoked.
fn init_tracing() {
    // ---
    let use_color = match env::var("FORCE_COLOR").as_deref() {
        Ok("1") | Ok("true") | Ok("yes") => true,
        Ok("0") | Ok("false") | Ok("no") => false,
        _ => std::io::stderr().is_terminal(),
    };

    // Use RUST_LOG if available, otherwise fall back to SATMON_LOG_LEVEL
    let env_filter = if env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else {
        let level = match env::var("SATMON_LOG_LEVEL").ok().as_deref() {
            Some("trace") => "trace",
            Some("debug") => "debug",
            Some("info") => "info",
            Some("error") => "error",
            _ => "warn",
        };
        EnvFilter::new(level)
    };

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_file(true)
        .with_line_number(true)
        .with_env_filter(env_filter)
        .with_ansi(use_color)
        .compact()
        .init();
}
