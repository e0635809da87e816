//! Console configuration
//!
//! Loaded from a JSON file. Every field has a default, so an empty object is a
//! valid configuration.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::bridge::DEFAULT_BRIDGE_TIMEOUT_MS;

/// Default interval between live bridge polls in milliseconds
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 250;

/// Default simulator frame interval in milliseconds (~60 Hz)
pub const DEFAULT_FRAME_INTERVAL_MS: u64 = 16;

/// Default interval between console summary renders in milliseconds
pub const DEFAULT_RENDER_INTERVAL_MS: u64 = 1000;

/// Default reverse camera feed address
pub const DEFAULT_CAMERA_FEED_URL: &str = "rtp://127.0.0.1:5004";

/// Errors raised while loading or validating configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("{field} must be positive")]
    NonPositive { field: &'static str },

    #[error("Bridge URL must not be empty")]
    EmptyBridgeUrl,
}

/// Which live bridge, if any, the console should poll
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum BridgeSettings {
    /// No live bridge: run the simulator
    #[default]
    None,
    /// In-process onboard vehicle backend
    Onboard,
    /// External provider reachable over HTTP
    Http {
        url: String,
        #[serde(default = "default_bridge_timeout_ms")]
        timeout_ms: u64,
    },
}

fn default_bridge_timeout_ms() -> u64 {
    DEFAULT_BRIDGE_TIMEOUT_MS
}

/// Reverse camera feed settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraSettings {
    /// Address of the opaque video feed; displayed, never decoded here
    pub feed_url: String,
}

impl Default for CameraSettings {
    fn default() -> Self {
        Self {
            feed_url: DEFAULT_CAMERA_FEED_URL.to_string(),
        }
    }
}

/// Logging output settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct LoggingSettings {
    /// Emit JSON log lines instead of human-readable ones
    pub json: bool,
    /// Filter directive, e.g. "info,vehicle_console_core=debug"
    pub filter: Option<String>,
}

/// Complete console configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConsoleConfig {
    /// Pause between settled live bridge polls
    pub poll_interval_ms: u64,
    /// Simulator frame period
    pub frame_interval_ms: u64,
    /// Dashboard redraw period in the console host
    pub render_interval_ms: u64,
    /// Which live bridge to use, if any
    pub bridge: BridgeSettings,
    pub camera: CameraSettings,
    pub logging: LoggingSettings,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
            frame_interval_ms: DEFAULT_FRAME_INTERVAL_MS,
            render_interval_ms: DEFAULT_RENDER_INTERVAL_MS,
            bridge: BridgeSettings::None,
            camera: CameraSettings::default(),
            logging: LoggingSettings::default(),
        }
    }
}

impl ConsoleConfig {
    /// Load and validate a configuration file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: ConsoleConfig = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Write the configuration as pretty JSON
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Check intervals are positive and the bridge is usable
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.poll_interval_ms == 0 {
            return Err(ConfigError::NonPositive { field: "poll_interval_ms" });
        }
        if self.frame_interval_ms == 0 {
            return Err(ConfigError::NonPositive { field: "frame_interval_ms" });
        }
        if self.render_interval_ms == 0 {
            return Err(ConfigError::NonPositive { field: "render_interval_ms" });
        }
        if let BridgeSettings::Http { url, timeout_ms } = &self.bridge {
            if url.trim().is_empty() {
                return Err(ConfigError::EmptyBridgeUrl);
            }
            if *timeout_ms == 0 {
                return Err(ConfigError::NonPositive { field: "bridge.timeout_ms" });
            }
        }
        Ok(())
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn frame_interval(&self) -> Duration {
        Duration::from_millis(self.frame_interval_ms)
    }

    pub fn render_interval(&self) -> Duration {
        Duration::from_millis(self.render_interval_ms)
    }
}
