//! Onboard vehicle backend
//!
//! An in-process vehicle data provider that answers the same calls as an
//! external bridge. It runs its own motion profile, keeps its own log (a status
//! line at most every 900 ms plus one line per drive-mode change) and reports
//! a fifth metric, the battery health index.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use tokio::sync::Mutex;

use super::{BridgeError, VehicleBridge};
use crate::demo::metrics::{battery_health_metric, build_derived_metrics};
use crate::demo::{build_sections, RollingLog};
use crate::telemetry::{to_fixed, DriveMode, ImuReading, VehicleSnapshot};

/// First line in the onboard log
pub const ONBOARD_BOOT_LOG_LINE: &str = "telemetry online";

/// Minimum spacing between onboard status lines
pub const ONBOARD_LOG_INTERVAL: Duration = Duration::from_millis(900);

struct OnboardState {
    drive_mode: DriveMode,
    /// Elapsed time of the last status line
    last_log_at: Duration,
    log: RollingLog,
}

/// In-process vehicle backend
pub struct OnboardVehicle {
    started: Instant,
    state: Mutex<OnboardState>,
}

impl Default for OnboardVehicle {
    fn default() -> Self {
        Self::new()
    }
}

impl OnboardVehicle {
    pub fn new() -> Self {
        Self {
            started: Instant::now(),
            state: Mutex::new(OnboardState {
                drive_mode: DriveMode::Park,
                last_log_at: Duration::ZERO,
                log: RollingLog::seeded(ONBOARD_BOOT_LOG_LINE),
            }),
        }
    }

    /// Current drive mode
    pub async fn drive_mode(&self) -> DriveMode {
        self.state.lock().await.drive_mode
    }

    /// Snapshot at `elapsed` since the backend started
    pub async fn snapshot_at(&self, elapsed: Duration) -> VehicleSnapshot {
        let mut state = self.state.lock().await;
        let mode = state.drive_mode;
        let t = elapsed.as_secs_f64();

        let (speed, torque) = motion(mode, t);
        let battery = 79.0 + (t * 0.05).sin() * 2.5;

        if elapsed.saturating_sub(state.last_log_at) > ONBOARD_LOG_INTERVAL {
            state.last_log_at = elapsed;
            state.log.push(format!(
                "{}: speed={} torque={}% battery={}",
                mode.name(),
                to_fixed(speed, 1),
                to_fixed(torque * 100.0, 0),
                to_fixed(battery, 1)
            ));
        }

        let mut derived_metrics = build_derived_metrics(t, torque, battery);
        let health = battery_health_metric(t, battery, &derived_metrics[0].sparkline);
        derived_metrics.push(health);

        VehicleSnapshot {
            speed_mph: speed,
            torque_ratio: torque.clamp(0.0, 1.0),
            battery_pct: battery,
            drive_mode: mode,
            imu: ImuReading {
                pitch: (t * 0.4).sin() * 7.0,
                roll: (t * 0.3).cos() * 5.0,
                yaw: (t * 12.0) % 360.0,
            },
            sections: build_sections(mode, speed, torque, battery, t),
            live_text_logs: state.log.to_vec(),
            derived_metrics,
        }
    }

    /// Apply a drive mode change and log it
    pub async fn apply_drive_mode(&self, mode: DriveMode) -> DriveMode {
        let mut state = self.state.lock().await;
        state.drive_mode = mode;
        state.log.push(format!("drive -> {}", mode.name()));
        mode
    }
}

/// Signed speed and torque ratio for the onboard motion profile
fn motion(mode: DriveMode, t: f64) -> (f64, f64) {
    let speed = match mode {
        DriveMode::Drive => 32.0 + (t * 0.7).sin() * 6.0,
        DriveMode::Reverse => -5.0 + (t * 0.9).sin(),
        DriveMode::Park => (t * 0.1).sin() * 0.4,
    };
    let torque = match mode {
        DriveMode::Park => 0.0,
        _ => 0.35 + 0.25 * (t * 0.8).sin().abs(),
    };
    (speed, torque)
}

#[async_trait]
impl VehicleBridge for OnboardVehicle {
    async fn get_snapshot(&self) -> Result<VehicleSnapshot, BridgeError> {
        Ok(self.snapshot_at(self.started.elapsed()).await)
    }

    async fn set_drive_mode(&self, mode: DriveMode) -> Result<DriveMode, BridgeError> {
        Ok(self.apply_drive_mode(mode).await)
    }

    fn describe(&self) -> String {
        "onboard vehicle".to_string()
    }
}
