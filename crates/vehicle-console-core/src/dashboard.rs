//! Dashboard Module
//!
//! Display-ready summaries derived from a snapshot: the quick stats rail,
//! status chips, efficiency highlights, speed gauge sweep and sparklines.
//! Everything here is a pure function of the snapshot it is given.

use serde::{Deserialize, Serialize};

use crate::telemetry::{to_fixed, DriveMode, VehicleSnapshot, WARMUP_LOG_LINE};

/// Speed at which the speed gauge reads full scale, in mph
pub const GAUGE_MAX_SPEED_MPH: f64 = 160.0;

/// Glyphs used by [`render_sparkline`], lowest to highest
const SPARK_GLYPHS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

/// Tabs of the telemetry dock
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DockTab {
    /// Raw section fields
    #[default]
    Raw,
    /// Derived efficiency metrics
    Metrics,
    /// Live log stream
    Logs,
}

impl DockTab {
    pub fn title(&self) -> &'static str {
        match self {
            DockTab::Raw => "Raw Data",
            DockTab::Metrics => "Metrics",
            DockTab::Logs => "Logs",
        }
    }

    /// Next tab, wrapping around
    pub fn next(self) -> Self {
        match self {
            DockTab::Raw => DockTab::Metrics,
            DockTab::Metrics => DockTab::Logs,
            DockTab::Logs => DockTab::Raw,
        }
    }
}

/// A labelled value on the quick stats rail or in the efficiency window
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuickStat {
    pub label: String,
    pub value: String,
}

impl QuickStat {
    fn new(label: &str, value: String) -> Self {
        Self {
            label: label.to_string(),
            value,
        }
    }
}

/// Speed, battery and torque summary cards
pub fn quick_stats(snapshot: &VehicleSnapshot) -> Vec<QuickStat> {
    vec![
        QuickStat::new("Speed", format!("{} mph", to_fixed(snapshot.speed_mph, 1))),
        QuickStat::new("Battery", format!("{}%", to_fixed(snapshot.battery_pct, 1))),
        QuickStat::new(
            "Torque",
            format!("{}%", to_fixed(round_half_up(snapshot.torque_ratio * 100.0), 0)),
        ),
    ]
}

/// Top bar chips: mode, speed, state of charge
pub fn status_chips(mode: DriveMode, snapshot: &VehicleSnapshot) -> Vec<String> {
    vec![
        format!("Mode {mode}"),
        format!("{} mph", to_fixed(snapshot.speed_mph, 1)),
        format!("SOC {}%", to_fixed(snapshot.battery_pct, 1)),
    ]
}

/// Newest log line, or the warm-up message when there is none
pub fn status_line(snapshot: &VehicleSnapshot) -> &str {
    snapshot
        .live_text_logs
        .first()
        .map(String::as_str)
        .unwrap_or(WARMUP_LOG_LINE)
}

/// The first two derived metrics as `current unit` pairs, with fallbacks
/// while metrics are not yet available
pub fn efficiency_highlights(snapshot: &VehicleSnapshot) -> Vec<QuickStat> {
    ["Energy", "Regen"]
        .iter()
        .enumerate()
        .map(|(idx, fallback)| match snapshot.derived_metrics.get(idx) {
            Some(metric) => QuickStat::new(&metric.label, format!("{} {}", metric.current, metric.unit)),
            None => QuickStat::new(fallback, "--".to_string()),
        })
        .collect()
}

/// Fraction of the speed gauge to fill, 0..=1, by absolute speed
pub fn speed_gauge_fraction(speed_mph: f64) -> f64 {
    if !speed_mph.is_finite() {
        return 0.0;
    }
    speed_mph.abs().min(GAUGE_MAX_SPEED_MPH) / GAUGE_MAX_SPEED_MPH
}

/// Render values as a one-line block sparkline scaled between their min and max
pub fn render_sparkline(values: &[f64]) -> String {
    let finite: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
    if finite.is_empty() {
        return String::new();
    }
    let min = finite.iter().copied().fold(f64::INFINITY, f64::min);
    let max = finite.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    // A flat series would divide by zero
    let range = if max - min > 0.0 { max - min } else { 1.0 };
    let top = (SPARK_GLYPHS.len() - 1) as f64;

    finite
        .iter()
        .map(|v| SPARK_GLYPHS[(((v - min) / range) * top).round() as usize])
        .collect()
}

/// Nearest integer, halves rounded towards positive infinity
fn round_half_up(value: f64) -> f64 {
    (value + 0.5).floor()
}
