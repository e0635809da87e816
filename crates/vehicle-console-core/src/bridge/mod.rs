//! Live Vehicle Bridge
//!
//! The external vehicle data provider the console polls when one is present.
//! A bridge answers two calls: fetch the current snapshot, and apply a drive
//! mode. Both must fail with an error rather than hang indefinitely.

mod error;
pub mod http;
pub mod onboard;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::config::BridgeSettings;
use crate::telemetry::{DriveMode, VehicleSnapshot};

pub use error::BridgeError;
pub use http::{HttpBridge, DEFAULT_BRIDGE_TIMEOUT_MS};
pub use onboard::OnboardVehicle;

/// Body of a set-drive-mode request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DriveModeRequest {
    pub mode: DriveMode,
}

/// A source of live vehicle telemetry
#[async_trait]
pub trait VehicleBridge: Send + Sync {
    /// Fetch the current vehicle snapshot
    async fn get_snapshot(&self) -> Result<VehicleSnapshot, BridgeError>;

    /// Ask the vehicle to switch drive mode, returning the acknowledged mode
    async fn set_drive_mode(&self, mode: DriveMode) -> Result<DriveMode, BridgeError>;

    /// Short human-readable description for logs
    fn describe(&self) -> String {
        "vehicle bridge".to_string()
    }
}

/// Build the bridge described by `settings`, or `None` when no bridge is
/// configured
pub fn connect_bridge(settings: &BridgeSettings) -> Result<Option<Arc<dyn VehicleBridge>>, BridgeError> {
    match settings {
        BridgeSettings::None => Ok(None),
        BridgeSettings::Onboard => Ok(Some(Arc::new(OnboardVehicle::new()))),
        BridgeSettings::Http { url, timeout_ms } => {
            let bridge = HttpBridge::new(url, Duration::from_millis(*timeout_ms))?;
            Ok(Some(Arc::new(bridge)))
        }
    }
}
