//! Derived efficiency metrics
//!
//! Each metric carries a synthetic 30-sample sparkline plus trailing averages
//! over the most recent samples.

use crate::telemetry::{round_to, to_fixed, DerivedMetric, MetricWindow};

/// Number of samples in every sparkline
pub const SPARKLINE_LEN: usize = 30;

/// Lowest value the trip efficiency readout will display
pub const TRIP_EFFICIENCY_FLOOR: f64 = 2.4;

/// Window labels and how many trailing samples each averages.
///
/// The "30m" window averages 20 samples, not 30.
pub const WINDOWS: [(&str, usize); 3] = [("5m", 5), ("10m", 10), ("30m", 20)];

/// Generate a sparkline oscillating around `base`, samples rounded to 2 decimals
pub fn sparkline(base: f64, variance: f64, t: f64) -> Vec<f64> {
    (0..SPARKLINE_LEN)
        .map(|idx| round_to(base + (t * 0.3 + idx as f64 * 0.25).sin() * variance, 2))
        .collect()
}

/// Mean of the last `count` values; an empty slice averages to 0
pub fn average_tail(values: &[f64], count: usize) -> f64 {
    let start = values.len().saturating_sub(count);
    let tail = &values[start..];
    if tail.is_empty() {
        return 0.0;
    }
    tail.iter().sum::<f64>() / tail.len() as f64
}

/// The three trailing windows for a sparkline, each suffixed with `suffix`
pub fn metric_windows(spark: &[f64], suffix: &str) -> Vec<MetricWindow> {
    WINDOWS
        .iter()
        .map(|(label, count)| {
            MetricWindow::new(label, format!("{}{suffix}", to_fixed(average_tail(spark, *count), 1)))
        })
        .collect()
}

fn metric(label: &str, unit: &str, current: String, suffix: &str, spark: Vec<f64>) -> DerivedMetric {
    DerivedMetric {
        label: label.to_string(),
        unit: unit.to_string(),
        current,
        windows: metric_windows(&spark, suffix),
        sparkline: spark,
    }
}

/// Build the four simulated efficiency metrics.
///
/// `_battery` is accepted for parity with the live bridge; the simulated
/// series do not depend on it.
pub fn build_derived_metrics(t: f64, torque: f64, _battery: f64) -> Vec<DerivedMetric> {
    let energy = sparkline(26.0 + torque * 8.0, 2.4, t);
    let regen = sparkline(68.0 + torque * 20.0, 4.0, t);
    let thermal = sparkline(12.0 + (t * 0.1).sin() * 2.0, 1.2, t);
    let efficiency = sparkline(3.6 - torque, 0.2, t);

    let last = |spark: &[f64]| spark.last().copied();

    vec![
        metric(
            "Energy Consumption",
            "kWh / 100 mi",
            to_fixed(last(&energy).unwrap_or(0.0), 1),
            "",
            energy,
        ),
        metric(
            "Regen Efficiency",
            "%",
            to_fixed(last(&regen).unwrap_or(0.0), 1),
            "%",
            regen,
        ),
        metric(
            "Thermal Load",
            "kW",
            to_fixed(last(&thermal).unwrap_or(0.0), 1),
            "",
            thermal,
        ),
        metric(
            "Trip Efficiency",
            "mi / kWh",
            to_fixed(last(&efficiency).unwrap_or(3.0).max(TRIP_EFFICIENCY_FLOOR), 2),
            "",
            efficiency,
        ),
    ]
}

/// Battery health index reported by the onboard vehicle backend.
///
/// Its windows average the energy sparkline, not its own.
pub fn battery_health_metric(t: f64, battery: f64, energy_spark: &[f64]) -> DerivedMetric {
    DerivedMetric {
        label: "Battery Health Index".to_string(),
        unit: "%".to_string(),
        current: to_fixed((battery / 100.0 * 98.0).clamp(80.0, 99.0), 1),
        windows: metric_windows(energy_spark, "%"),
        sparkline: sparkline(95.0, 0.4, t),
    }
}
