//! Command-line arguments and configuration resolution

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::Parser;
use vehicle_console_core::bridge::DEFAULT_BRIDGE_TIMEOUT_MS;
use vehicle_console_core::config::{BridgeSettings, ConsoleConfig};

/// Environment variable that forces polling an HTTP bridge at its value
pub const BRIDGE_URL_ENV: &str = "VEHICLE_CONSOLE_BRIDGE_URL";

const CONFIG_DIR_NAME: &str = "vehicle-console";
const CONFIG_FILE_NAME: &str = "config.json";

/// Command-line arguments
#[derive(Parser, Debug, Default)]
#[command(name = "vehicle-console", version)]
#[command(about = "Vehicle operations console with simulated or live telemetry")]
pub struct Cli {
    /// Configuration file (default: <config dir>/vehicle-console/config.json)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Poll a live HTTP bridge at this base URL
    #[arg(long, conflicts_with_all = ["onboard", "simulate"])]
    pub bridge_url: Option<String>,

    /// Use the in-process onboard vehicle as the live bridge
    #[arg(long, conflicts_with = "simulate")]
    pub onboard: bool,

    /// Ignore any configured bridge and run the simulator
    #[arg(long)]
    pub simulate: bool,

    /// Milliseconds between live bridge polls
    #[arg(long)]
    pub poll_ms: Option<u64>,

    /// Milliseconds between simulator frames
    #[arg(long)]
    pub frame_ms: Option<u64>,

    /// Milliseconds between dashboard redraws on the console
    #[arg(long)]
    pub render_ms: Option<u64>,

    /// Emit JSON log lines
    #[arg(long)]
    pub json_logs: bool,

    /// Exit after this many seconds instead of waiting for `q` or Ctrl-C
    #[arg(long)]
    pub run_seconds: Option<u64>,

    /// Print the resolved configuration as JSON and exit
    #[arg(long)]
    pub print_config: bool,
}

/// `<platform config dir>/vehicle-console/config.json`
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
}

fn load_config(path: &Path, explicit: bool) -> Result<ConsoleConfig> {
    if !path.exists() {
        if explicit {
            bail!("Config file not found: {}", path.display());
        }
        tracing::debug!("No config file at {}; using defaults", path.display());
        return Ok(ConsoleConfig::default());
    }
    ConsoleConfig::load(path).with_context(|| format!("Failed to load config from {}", path.display()))
}

/// Build the effective configuration.
///
/// Precedence, lowest to highest: defaults, config file, the bridge URL
/// environment marker, command-line flags.
pub fn resolve_config(cli: &Cli, env_bridge_url: Option<String>) -> Result<ConsoleConfig> {
    let mut config = match &cli.config {
        Some(path) => load_config(path, true)?,
        None => match default_config_path() {
            Some(path) => load_config(&path, false)?,
            None => ConsoleConfig::default(),
        },
    };

    if let Some(url) = env_bridge_url.filter(|u| !u.trim().is_empty()) {
        config.bridge = http_bridge(url, &config.bridge);
    }

    if let Some(url) = &cli.bridge_url {
        config.bridge = http_bridge(url.clone(), &config.bridge);
    } else if cli.onboard {
        config.bridge = BridgeSettings::Onboard;
    } else if cli.simulate {
        config.bridge = BridgeSettings::None;
    }

    if let Some(ms) = cli.poll_ms {
        config.poll_interval_ms = ms;
    }
    if let Some(ms) = cli.frame_ms {
        config.frame_interval_ms = ms;
    }
    if let Some(ms) = cli.render_ms {
        config.render_interval_ms = ms;
    }
    if cli.json_logs {
        config.logging.json = true;
    }

    config.validate().context("Invalid configuration")?;
    Ok(config)
}

/// HTTP bridge settings for `url`, keeping a configured timeout
fn http_bridge(url: String, current: &BridgeSettings) -> BridgeSettings {
    let timeout_ms = match current {
        BridgeSettings::Http { timeout_ms, .. } => *timeout_ms,
        _ => DEFAULT_BRIDGE_TIMEOUT_MS,
    };
    BridgeSettings::Http { url, timeout_ms }
}
