//! Text console: operator commands and the dashboard frame

use std::fmt::Write as _;
use std::str::FromStr;

use vehicle_console_core::dashboard::{
    efficiency_highlights, quick_stats, render_sparkline, speed_gauge_fraction, status_chips,
    status_line, DockTab,
};
use vehicle_console_core::runtime::{RuntimeKind, TelemetrySelector};
use vehicle_console_core::telemetry::{DriveMode, VehicleSnapshot};

/// Width of the speed gauge bar in characters
const GAUGE_WIDTH: usize = 20;

/// Log lines shown on the Logs tab
const VISIBLE_LOG_LINES: usize = 12;

pub const HELP: &str = "commands: p|d|r (drive mode), up|down (lever), raw|metrics|logs|tab (dock), e (emergency stop), q (quit)";

/// One line of operator input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsoleCommand {
    SetMode(DriveMode),
    ShiftUp,
    ShiftDown,
    ShowTab(DockTab),
    NextTab,
    EmergencyStop,
    Help,
    Quit,
}

impl FromStr for ConsoleCommand {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let input = s.trim().to_ascii_lowercase();
        let command = match input.as_str() {
            "up" | "+" => ConsoleCommand::ShiftUp,
            "down" | "-" => ConsoleCommand::ShiftDown,
            "raw" => ConsoleCommand::ShowTab(DockTab::Raw),
            "metrics" => ConsoleCommand::ShowTab(DockTab::Metrics),
            "logs" => ConsoleCommand::ShowTab(DockTab::Logs),
            "tab" => ConsoleCommand::NextTab,
            "e" | "estop" => ConsoleCommand::EmergencyStop,
            "h" | "help" | "?" => ConsoleCommand::Help,
            "q" | "quit" | "exit" => ConsoleCommand::Quit,
            other => match other.parse::<DriveMode>() {
                Ok(mode) => ConsoleCommand::SetMode(mode),
                Err(_) => return Err(format!("Unknown command '{}'", s.trim())),
            },
        };
        Ok(command)
    }
}

/// Whether the session keeps running after a command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Console view state and the command handler
#[derive(Debug, Clone)]
pub struct ConsoleSession {
    pub tab: DockTab,
    pub camera_feed_url: String,
}

impl ConsoleSession {
    pub fn new(camera_feed_url: impl Into<String>) -> Self {
        Self {
            tab: DockTab::default(),
            camera_feed_url: camera_feed_url.into(),
        }
    }

    /// Apply one command to the session and the selector
    pub fn apply(&mut self, command: ConsoleCommand, selector: &TelemetrySelector) -> Flow {
        match command {
            ConsoleCommand::SetMode(mode) => {
                selector.change_mode(mode);
                tracing::info!(mode = %mode, "Drive mode changed");
            }
            ConsoleCommand::ShiftUp => {
                let mode = selector.shift_up();
                tracing::info!(mode = %mode, "Lever up");
            }
            ConsoleCommand::ShiftDown => {
                let mode = selector.shift_down();
                tracing::info!(mode = %mode, "Lever down");
            }
            ConsoleCommand::ShowTab(tab) => self.tab = tab,
            ConsoleCommand::NextTab => self.tab = self.tab.next(),
            ConsoleCommand::EmergencyStop => {
                // Operator acknowledgement only; nothing is sent to the vehicle
                tracing::warn!("Emergency shutdown requested");
            }
            ConsoleCommand::Help => println!("{HELP}"),
            ConsoleCommand::Quit => return Flow::Quit,
        }
        Flow::Continue
    }

    /// Render the dashboard as plain text
    pub fn render(&self, runtime: RuntimeKind, mode: DriveMode, snapshot: &VehicleSnapshot) -> String {
        let mut out = String::new();

        let runtime = match runtime {
            RuntimeKind::Live => "LIVE",
            RuntimeKind::Simulated => "SIM",
            RuntimeKind::Unknown => "----",
        };
        let _ = writeln!(out, "[{runtime}] {}", status_chips(mode, snapshot).join(" | "));

        let stats: Vec<String> = quick_stats(snapshot)
            .into_iter()
            .map(|s| format!("{} {}", s.label, s.value))
            .collect();
        let _ = writeln!(out, "{}  {}", stats.join("  "), gauge_bar(snapshot.speed_mph));

        let highlights: Vec<String> = efficiency_highlights(snapshot)
            .into_iter()
            .map(|s| format!("{}: {}", s.label, s.value))
            .collect();
        let _ = writeln!(out, "{}", highlights.join(" | "));
        let _ = writeln!(
            out,
            "IMU pitch {:.1} roll {:.1} yaw {:.0}  camera {}",
            snapshot.imu.pitch, snapshot.imu.roll, snapshot.imu.yaw, self.camera_feed_url
        );
        let _ = writeln!(out, "> {}", status_line(snapshot));
        let _ = writeln!(out, "--- {} ---", self.tab.title());

        match self.tab {
            DockTab::Raw => {
                for section in &snapshot.sections {
                    let fields: Vec<String> = section
                        .fields
                        .iter()
                        .map(|f| match &f.unit {
                            Some(unit) => format!("{} {} {}", f.label, f.value, unit),
                            None => format!("{} {}", f.label, f.value),
                        })
                        .collect();
                    let _ = writeln!(out, "{}: {}", section.title, fields.join(", "));
                }
            }
            DockTab::Metrics => {
                for metric in &snapshot.derived_metrics {
                    let windows: Vec<String> = metric
                        .windows
                        .iter()
                        .map(|w| format!("{} {}", w.label, w.value))
                        .collect();
                    let _ = writeln!(
                        out,
                        "{}: {} {}  [{}]  {}",
                        metric.label,
                        metric.current,
                        metric.unit,
                        windows.join(" | "),
                        render_sparkline(&metric.sparkline)
                    );
                }
            }
            DockTab::Logs => {
                for line in snapshot.live_text_logs.iter().take(VISIBLE_LOG_LINES) {
                    let _ = writeln!(out, "  {line}");
                }
            }
        }

        out
    }
}

fn gauge_bar(speed_mph: f64) -> String {
    let filled = (speed_gauge_fraction(speed_mph) * GAUGE_WIDTH as f64).round() as usize;
    format!("[{}{}]", "#".repeat(filled), ".".repeat(GAUGE_WIDTH - filled))
}
