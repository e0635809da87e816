use chrono::NaiveTime;
use pretty_assertions::assert_eq;
use vehicle_console_core::demo::signals::{signed_speed, torque_ratio};
use vehicle_console_core::demo::{average_tail, DemoSimulator, RollingLog, LOG_CAPACITY};
use vehicle_console_core::telemetry::{DriveMode, VehicleSnapshot, WARMUP_LOG_LINE};

fn sample_times() -> impl Iterator<Item = f64> {
    (0..5000).map(|i| i as f64 * 0.137)
}

fn field(snapshot: &VehicleSnapshot, section: &str, label: &str) -> String {
    snapshot
        .section(section)
        .and_then(|s| s.field(label))
        .map(|f| f.value.clone())
        .unwrap_or_default()
}

fn noon() -> NaiveTime {
    NaiveTime::from_hms_opt(12, 0, 0).unwrap()
}

#[test]
fn test_park_is_stationary_without_torque() {
    for t in sample_times() {
        assert!(signed_speed(DriveMode::Park, t).abs() <= 0.5, "t={t}");
        assert_eq!(torque_ratio(DriveMode::Park, t), 0.0);
    }
}

#[test]
fn test_torque_stays_in_band() {
    for mode in [DriveMode::Drive, DriveMode::Reverse] {
        for t in sample_times() {
            let torque = torque_ratio(mode, t);
            assert!((0.35..=0.6).contains(&torque), "{mode:?} t={t} torque={torque}");
        }
    }
}

#[test]
fn test_reverse_speed_is_negative() {
    for t in sample_times() {
        assert!(signed_speed(DriveMode::Reverse, t) < 0.0);
    }
}

#[test]
fn test_window_averages() {
    assert_eq!(average_tail(&[], 5), 0.0);
    let constant = [7.5; 30];
    for window in [5, 10, 20] {
        assert_eq!(average_tail(&constant, window), 7.5);
    }
}

#[test]
fn test_log_drops_oldest_after_81_ticks() {
    let mut log = RollingLog::new(LOG_CAPACITY);
    for tick in 0..81 {
        log.push(format!("tick {tick}"));
    }
    assert_eq!(log.len(), LOG_CAPACITY);
    assert_eq!(log.latest(), Some("tick 80"));
    assert!(!log.iter().any(|line| line == "tick 0"));
}

#[test]
fn test_simulator_log_never_exceeds_capacity() {
    let mut sim = DemoSimulator::new();
    for tick in 0..81 {
        let snapshot = sim.snapshot_at(DriveMode::Drive, tick as f64, noon());
        assert!(snapshot.live_text_logs.len() <= LOG_CAPACITY);
    }
    assert!(!sim.log().iter().any(|line| line == WARMUP_LOG_LINE));
    assert_eq!(sim.log().len(), LOG_CAPACITY);
}

#[test]
fn test_drive_at_zero() {
    let mut sim = DemoSimulator::new();
    let snapshot = sim.snapshot_at(DriveMode::Drive, 0.0, noon());

    assert_eq!(snapshot.speed_mph, 32.0);
    assert_eq!(snapshot.torque_ratio, 0.35);
    assert_eq!(field(&snapshot, "battery-pack", "Contactor State"), "Closed");
    assert_eq!(field(&snapshot, "powertrain", "Drive Mode"), "D");
}

#[test]
fn test_park_at_zero() {
    let mut sim = DemoSimulator::new();
    let snapshot = sim.snapshot_at(DriveMode::Park, 0.0, noon());

    assert_eq!(snapshot.battery_pct, 78.0);
    assert_eq!(field(&snapshot, "thermal", "Battery Heater"), "Off");
    assert_eq!(field(&snapshot, "battery-pack", "Contactor State"), "Open");
}

#[test]
fn test_chassis_fields_are_always_finite() {
    let mut sim = DemoSimulator::new();
    for t in sample_times().take(500) {
        let snapshot = sim.snapshot_at(DriveMode::Reverse, t, noon());
        let chassis = snapshot.section("chassis").unwrap();
        assert_eq!(chassis.fields.len(), 9);
        for f in &chassis.fields {
            assert!(!f.value.contains("NaN") && !f.value.contains("inf"), "{}={}", f.label, f.value);
        }
    }
}

#[test]
fn test_trip_efficiency_respects_floor() {
    let mut sim = DemoSimulator::new();
    for mode in [DriveMode::Park, DriveMode::Drive, DriveMode::Reverse] {
        for t in sample_times().take(500) {
            let snapshot = sim.snapshot_at(mode, t, noon());
            let trip = snapshot.metric("Trip Efficiency").unwrap();
            let current: f64 = trip.current.parse().unwrap();
            assert!(current >= 2.4, "t={t} current={}", trip.current);
            assert_eq!(trip.current.split('.').nth(1).map(str::len), Some(2));
        }
    }
}

#[test]
fn test_snapshot_wire_format() {
    let mut sim = DemoSimulator::new();
    let snapshot = sim.snapshot_at(DriveMode::Reverse, 3.0, noon());
    let json: serde_json::Value = serde_json::to_value(&snapshot).unwrap();

    assert_eq!(json["driveMode"], "R");
    assert!(json["speedMph"].is_number());
    assert!(json["liveTextLogs"].is_array());
    assert_eq!(json["derivedMetrics"].as_array().map(Vec::len), Some(4));

    let partial: VehicleSnapshot = serde_json::from_str(r#"{"speedMph": 12.5}"#).unwrap();
    assert_eq!(partial.speed_mph, 12.5);
    assert_eq!(partial.drive_mode, DriveMode::Park);
    assert_eq!(partial.live_text_logs, vec![WARMUP_LOG_LINE.to_string()]);
}

struct Golden {
    mode: DriveMode,
    t: f64,
    /// Field values per section, joined with '|'
    sections: [&'static str; 4],
    /// (current, windows joined with ',') per metric
    metrics: [(&'static str, &'static str); 4],
}

/// Reference strings for the dashboard at points where every sine term is live
const GOLDEN: [Golden; 5] = [
    Golden {
        mode: DriveMode::Drive,
        t: 0.0731,
        sections: [
            "78.0|780|153|1.51|32.1|37.1|20|4.81|Closed|3",
            "32.6|117|131|48.2|1.61|77|80.1|0.11|D",
            "0.39|3.00|0.06|110|111|110|111|223|0.6",
            "20.0|19.5|Cooling|62|Off|358|12.0",
        ],
        metrics: [
            ("30.9", "30.0,28.7,28.3"),
            ("78.6", "77.1%,74.9%,74.3%"),
            ("13.0", "12.5,11.9,11.7"),
            ("3.40", "3.3,3.2,3.2"),
        ],
    },
    Golden {
        mode: DriveMode::Drive,
        t: 7.3,
        sections: [
            "78.9|794|192|2.49|34.4|38.5|23|4.70|Closed|122",
            "38.8|146|165|45.1|2.40|96|83.9|0.77|D",
            "1.70|1.16|0.44|112|112|111|111|254|-13.2",
            "20.7|19.9|Cooling|68|Off|6454|12.9",
        ],
        metrics: [
            ("29.6", "30.7,31.3,30.1"),
            ("77.1", "78.9%,79.9%,77.8%"),
            ("13.3", "13.9,14.2,13.5"),
            ("3.14", "3.2,3.3,3.2"),
        ],
    },
    Golden {
        mode: DriveMode::Reverse,
        t: 2.5,
        sections: [
            "78.3|788|252|1.98|34.0|40.0|33|4.99|Closed|102",
            "-5.1|192|216|53.7|1.98|126|82.3|1.64|R",
            "4.67|-0.53|1.68|114|113|114|113|244|14.0",
            "20.2|19.6|Cooling|83|Off|6888|12.3",
        ],
        metrics: [
            ("33.2", "32.9,31.8,30.4"),
            ("83.9", "83.5%,81.7%,79.4%"),
            ("13.7", "13.6,13.0,12.3"),
            ("3.20", "3.2,3.1,3.0"),
        ],
    },
    Golden {
        mode: DriveMode::Park,
        t: 13.9,
        sections: [
            "79.6|775|0|1.85|29.4|35.3|10|4.92|Open|0",
            "0.2|0|0|51.7|1.88|0|78.7|1.79|P",
            "-0.34|-2.86|-1.32|111|110|109|109|259|12.4",
            "21.0|20.1|Heating|58|Off|2104|13.6",
        ],
        metrics: [
            ("23.8", "23.8,24.6,26.2"),
            ("64.3", "64.3%,65.7%,68.4%"),
            ("12.9", "12.8,13.3,14.1"),
            ("3.42", "3.4,3.5,3.6"),
        ],
    },
    Golden {
        mode: DriveMode::Reverse,
        t: 613.7,
        sections: [
            "76.3|787|211|1.28|34.8|39.2|26|4.63|Closed|142",
            "-5.2|161|181|42.9|1.43|105|82.0|1.38|R",
            "-3.34|-2.07|0.84|106|107|107|106|255|-8.5",
            "19.0|18.8|Cooling|43|Off|5061|10.3",
        ],
        metrics: [
            ("30.7", "31.6,31.8,30.3"),
            ("79.1", "80.7%,81.0%,78.5%"),
            ("10.3", "10.8,10.9,10.1"),
            ("3.15", "3.2,3.2,3.1"),
        ],
    },
];

#[test]
fn test_snapshot_strings_match_reference_values() {
    for golden in &GOLDEN {
        let mut sim = DemoSimulator::new();
        let snapshot = sim.snapshot_at(golden.mode, golden.t, noon());
        let context = format!("{:?} t={}", golden.mode, golden.t);

        let sections: Vec<String> = snapshot
            .sections
            .iter()
            .map(|s| s.fields.iter().map(|f| f.value.as_str()).collect::<Vec<_>>().join("|"))
            .collect();
        assert_eq!(sections, golden.sections.to_vec(), "{context}");

        let metrics: Vec<(String, String)> = snapshot
            .derived_metrics
            .iter()
            .map(|m| {
                let windows: Vec<&str> = m.windows.iter().map(|w| w.value.as_str()).collect();
                (m.current.clone(), windows.join(","))
            })
            .collect();
        let expected: Vec<(String, String)> = golden
            .metrics
            .iter()
            .map(|(current, windows)| (current.to_string(), windows.to_string()))
            .collect();
        assert_eq!(metrics, expected, "{context}");
    }
}
