//! Telemetry runtime
//!
//! Chooses where snapshots come from (the simulator or a live bridge) and
//! publishes them to the display layer.

mod selector;

use serde::{Deserialize, Serialize};

pub use selector::{SelectorConfig, TelemetrySelector};

/// Which data path the selector is running
///
/// Starts as `Unknown` and moves once to `Simulated` or `Live` when the
/// selector starts; there is no transition back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RuntimeKind {
    /// Not started yet
    Unknown,
    /// Free-running simulator on the frame clock
    Simulated,
    /// Polling a live vehicle bridge
    Live,
}

impl RuntimeKind {
    /// Decide the runtime from whether a live bridge is available
    pub fn detect(bridge_available: bool) -> Self {
        if bridge_available {
            RuntimeKind::Live
        } else {
            RuntimeKind::Simulated
        }
    }
}
