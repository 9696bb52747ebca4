//! Configuration loader for the `satmon` telemetry monitor.
//!
//! This module centralizes all runtime configuration values and their defaults,
//! loading from environment variables (with optional `.env` file support
//! provided by the caller). The input path itself comes from the command line
//! and is not part of this configuration.
use std::env;

use anyhow::{anyhow, Result};

use crate::monitor::DEFAULT_WINDOW_SECS;

/// Parse an optional integer environment variable with a default value.
macro_rules! parse_env_u32 {
    ($var_name:expr, $default:expr) => {
        env::var($var_name)
            .ok()
            .map(|v| v.parse::<u32>())
            .transpose()
            .map_err(|e| anyhow!("Invalid {}: {}", $var_name, e))?
            .unwrap_or($default)
    };
}

/// Parse an optional boolean environment variable with a default value.
macro_rules! parse_env_bool {
    ($var_name:expr, $default:expr) => {
        match env::var($var_name).ok().as_deref() {
            None => $default,
            Some("1") | Some("true") | Some("yes") => true,
            Some("0") | Some("false") | Some("no") => false,
            Some(other) => {
                return Err(anyhow!(
                    "Invalid {}: expected 1/true/yes or 0/false/no, got '{}'",
                    $var_name,
                    other
                ))
            }
        }
    };
}

/// Strongly typed application configuration.
///
/// All fields are immutable after loading, ensuring a consistent configuration
/// snapshot for the lifetime of the run.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    // ---
    /// Maximum span, in seconds, between the first and third breach of an alert.
    pub window_secs: u32,

    /// Drop malformed input lines with a warning instead of aborting.
    pub skip_malformed: bool,
}

/// Load configuration from environment variables with defaults.
///
/// Optional:
/// - `SATMON_WINDOW_SECS` – breach window in seconds (default: 300)
/// - `SATMON_SKIP_MALFORMED` – skip bad lines instead of failing (default: false)
///
/// Returns an error if any variable is present but invalid.
pub fn load_from_env() -> Result<Config> {
    // ---
    let window_secs = parse_env_u32!("SATMON_WINDOW_SECS", DEFAULT_WINDOW_SECS);
    let skip_malformed = parse_env_bool!("SATMON_SKIP_MALFORMED", false);

    if window_secs == 0 {
        return Err(anyhow!("Invalid SATMON_WINDOW_SECS: must be greater than 0"));
    }

    Ok(Config {
        window_secs,
        skip_malformed,
    })
}

impl Config {
    /// Log the loaded configuration for debugging purposes.
    pub fn log_config(&self) {
        // ---
        tracing::info!("Configuration loaded:");
        tracing::info!("  SATMON_WINDOW_SECS    : {}", self.window_secs);
        tracing::info!("  SATMON_SKIP_MALFORMED : {}", self.skip_malformed);
    }
}
