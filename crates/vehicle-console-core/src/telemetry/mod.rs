//! Vehicle Telemetry Model
//!
//! The snapshot types published to the display layer and exchanged with the
//! live vehicle bridge. Field names serialize in camelCase to match the bridge
//! wire format.

pub mod format;

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

pub use format::{round_to, to_fixed};

/// Log line shown before the first tick produces real telemetry
pub const WARMUP_LOG_LINE: &str = "telemetry buffer warming up";

/// Battery level shown by the placeholder snapshot
pub const PLACEHOLDER_BATTERY_PCT: f64 = 82.0;

/// Drive mode selected on the gear lever
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum DriveMode {
    #[serde(rename = "P")]
    #[default]
    Park,
    #[serde(rename = "D")]
    Drive,
    #[serde(rename = "R")]
    Reverse,
}

impl DriveMode {
    /// Lever positions from top to bottom
    pub const LEVER_ORDER: [DriveMode; 3] = [DriveMode::Reverse, DriveMode::Park, DriveMode::Drive];

    /// Single-letter code used on the wire and in display strings
    pub fn code(&self) -> &'static str {
        match self {
            DriveMode::Park => "P",
            DriveMode::Drive => "D",
            DriveMode::Reverse => "R",
        }
    }

    /// Full name, e.g. "Drive"
    pub fn name(&self) -> &'static str {
        match self {
            DriveMode::Park => "Park",
            DriveMode::Drive => "Drive",
            DriveMode::Reverse => "Reverse",
        }
    }

    fn lever_index(&self) -> usize {
        match self {
            DriveMode::Reverse => 0,
            DriveMode::Park => 1,
            DriveMode::Drive => 2,
        }
    }

    /// Move the lever one position towards Reverse, stopping at the end
    pub fn shift_up(self) -> Self {
        Self::LEVER_ORDER[self.lever_index().saturating_sub(1)]
    }

    /// Move the lever one position towards Drive, stopping at the end
    pub fn shift_down(self) -> Self {
        Self::LEVER_ORDER[(self.lever_index() + 1).min(Self::LEVER_ORDER.len() - 1)]
    }
}

impl fmt::Display for DriveMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Error returned when a drive mode string is not recognized
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown drive mode: '{0}'")]
pub struct ParseDriveModeError(pub String);

impl FromStr for DriveMode {
    type Err = ParseDriveModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "p" | "park" => Ok(DriveMode::Park),
            "d" | "drive" => Ok(DriveMode::Drive),
            "r" | "reverse" => Ok(DriveMode::Reverse),
            _ => Err(ParseDriveModeError(s.to_string())),
        }
    }
}

/// Vehicle attitude in degrees
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ImuReading {
    #[serde(deserialize_with = "null_as_default")]
    pub pitch: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub roll: f64,
    /// Heading, wrapped to 0..360
    #[serde(deserialize_with = "null_as_default")]
    pub yaw: f64,
}

/// A single display-ready reading
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct VehicleField {
    pub label: String,
    /// Already formatted for display
    pub value: String,
    /// Display unit; `None` for states and modes
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
}

impl VehicleField {
    /// Create a field with a unit
    pub fn new(label: &str, value: impl Into<String>, unit: &str) -> Self {
        Self {
            label: label.to_string(),
            value: value.into(),
            unit: Some(unit.to_string()),
        }
    }

    /// Create a field that has no unit (states, modes)
    pub fn unitless(label: &str, value: impl Into<String>) -> Self {
        Self {
            label: label.to_string(),
            value: value.into(),
            unit: None,
        }
    }
}

/// A named group of fields, e.g. "Battery Pack"
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct VehicleSection {
    /// Stable kebab-case key, e.g. "battery-pack"
    pub id: String,
    pub title: String,
    /// In display order
    pub fields: Vec<VehicleField>,
}

impl VehicleSection {
    /// Create a section from its fields in display order
    pub fn new(id: &str, title: &str, fields: Vec<VehicleField>) -> Self {
        Self {
            id: id.to_string(),
            title: title.to_string(),
            fields,
        }
    }

    /// Look up a field by label
    pub fn field(&self, label: &str) -> Option<&VehicleField> {
        self.fields.iter().find(|f| f.label == label)
    }
}

/// Trailing average over a sparkline, labelled by its nominal time window
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MetricWindow {
    /// Nominal window, e.g. "5m"
    pub label: String,
    /// Formatted average, with the metric's unit suffix where it has one
    pub value: String,
}

impl MetricWindow {
    /// Create a window entry from its label and formatted average
    pub fn new(label: &str, value: impl Into<String>) -> Self {
        Self {
            label: label.to_string(),
            value: value.into(),
        }
    }
}

/// An efficiency metric with its recent history
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DerivedMetric {
    pub label: String,
    /// Unit of `current`, e.g. "kWh / 100 mi"
    pub unit: String,
    /// Latest value, formatted
    pub current: String,
    /// Trailing averages, shortest window first
    pub windows: Vec<MetricWindow>,
    /// Recent samples, oldest first. Null samples are dropped on decode.
    #[serde(deserialize_with = "finite_samples")]
    pub sparkline: Vec<f64>,
}

/// Complete vehicle state at one instant
///
/// Every field has a serde default taken from [`VehicleSnapshot::placeholder`],
/// so a bridge payload with missing fields still decodes. Numeric fields sent
/// as `null` decode to the same placeholder values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct VehicleSnapshot {
    /// Signed; negative in reverse
    #[serde(deserialize_with = "null_as_default")]
    pub speed_mph: f64,
    /// Nominally 0..=1, not clamped by the simulator
    #[serde(deserialize_with = "null_as_default")]
    pub torque_ratio: f64,
    /// State of charge, 0..=100
    #[serde(deserialize_with = "null_as_placeholder_battery")]
    pub battery_pct: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub drive_mode: DriveMode,
    /// Vehicle attitude
    #[serde(deserialize_with = "null_as_default")]
    pub imu: ImuReading,
    /// Battery pack, powertrain, chassis and thermal, in that order
    pub sections: Vec<VehicleSection>,
    /// Newest first
    pub live_text_logs: Vec<String>,
    /// Efficiency metrics with sparklines and window averages
    pub derived_metrics: Vec<DerivedMetric>,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn null_as_placeholder_battery<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<f64>::deserialize(deserializer)?.unwrap_or(PLACEHOLDER_BATTERY_PCT))
}

fn finite_samples<'de, D>(deserializer: D) -> Result<Vec<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let samples = Option::<Vec<Option<f64>>>::deserialize(deserializer)?;
    Ok(samples.into_iter().flatten().flatten().collect())
}

impl Default for VehicleSnapshot {
    fn default() -> Self {
        Self::placeholder()
    }
}

impl VehicleSnapshot {
    /// Snapshot displayed before the first tick
    pub fn placeholder() -> Self {
        Self {
            speed_mph: 0.0,
            torque_ratio: 0.0,
            battery_pct: PLACEHOLDER_BATTERY_PCT,
            drive_mode: DriveMode::Park,
            imu: ImuReading::default(),
            sections: Vec::new(),
            live_text_logs: vec![WARMUP_LOG_LINE.to_string()],
            derived_metrics: Vec::new(),
        }
    }

    /// Copy of this snapshot with a different drive mode
    pub fn with_drive_mode(&self, mode: DriveMode) -> Self {
        Self {
            drive_mode: mode,
            ..self.clone()
        }
    }

    /// Look up a section by id
    pub fn section(&self, id: &str) -> Option<&VehicleSection> {
        self.sections.iter().find(|s| s.id == id)
    }

    /// Look up a derived metric by label
    pub fn metric(&self, label: &str) -> Option<&DerivedMetric> {
        self.derived_metrics.iter().find(|m| m.label == label)
    }

    /// Replace non-finite numbers with placeholder values.
    ///
    /// Applied to every snapshot received from an external source before it is
    /// published.
    pub fn sanitized(mut self) -> Self {
        fn finite_or(value: f64, fallback: f64) -> f64 {
            if value.is_finite() {
                value
            } else {
                fallback
            }
        }

        self.speed_mph = finite_or(self.speed_mph, 0.0);
        self.torque_ratio = finite_or(self.torque_ratio, 0.0);
        self.battery_pct = finite_or(self.battery_pct, PLACEHOLDER_BATTERY_PCT);
        self.imu.pitch = finite_or(self.imu.pitch, 0.0);
        self.imu.roll = finite_or(self.imu.roll, 0.0);
        self.imu.yaw = finite_or(self.imu.yaw, 0.0);
        for metric in &mut self.derived_metrics {
            metric.sparkline.retain(|v| v.is_finite());
        }
        self
    }
}
