//! Rolling telemetry log
//!
//! A bounded, newest-first buffer of formatted log lines.

use std::collections::VecDeque;

use chrono::NaiveTime;

use crate::telemetry::{to_fixed, DriveMode};

/// Maximum lines kept in a rolling log
pub const LOG_CAPACITY: usize = 80;

/// Bounded log buffer, newest line first
#[derive(Debug, Clone)]
pub struct RollingLog {
    lines: VecDeque<String>,
    capacity: usize,
}

impl Default for RollingLog {
    fn default() -> Self {
        Self::new(LOG_CAPACITY)
    }
}

impl RollingLog {
    /// Create an empty log holding at most `capacity` lines (minimum 1)
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            lines: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Create a log with the default capacity and one initial line
    pub fn seeded(line: impl Into<String>) -> Self {
        let mut log = Self::default();
        log.push(line);
        log
    }

    /// Prepend a line, dropping the oldest if the log is full
    pub fn push(&mut self, line: impl Into<String>) {
        self.lines.push_front(line.into());
        self.lines.truncate(self.capacity);
    }

    /// Number of lines held, never more than the capacity
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Whether no line has been pushed yet
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Maximum number of lines kept
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Most recent line
    pub fn latest(&self) -> Option<&str> {
        self.lines.front().map(String::as_str)
    }

    /// Lines from newest to oldest
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.lines.iter().map(String::as_str)
    }

    /// Copy the lines out, newest first
    pub fn to_vec(&self) -> Vec<String> {
        self.lines.iter().cloned().collect()
    }
}

/// Format a simulator log line, e.g. `sim:2:05:09 PM speed=32.0 mode=D`
pub fn sim_log_line(wall_clock: NaiveTime, speed: f64, mode: DriveMode) -> String {
    format!(
        "sim:{} speed={} mode={}",
        wall_clock.format("%-I:%M:%S %p"),
        to_fixed(speed, 1),
        mode
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_newest_first() {
        let mut log = RollingLog::default();
        log.push("a");
        log.push("b");
        assert_eq!(log.to_vec(), vec!["b".to_string(), "a".to_string()]);
        assert_eq!(log.latest(), Some("b"));
    }

    #[test]
    fn test_capacity_is_enforced() {
        let mut log = RollingLog::default();
        for i in 0..=LOG_CAPACITY {
            log.push(format!("tick {i}"));
        }
        assert_eq!(log.len(), LOG_CAPACITY);
        assert_eq!(log.latest(), Some("tick 80"));
        assert!(log.iter().all(|line| line != "tick 0"));
        assert_eq!(log.iter().last(), Some("tick 1"));
    }

    #[test]
    fn test_zero_capacity_keeps_one_line() {
        let mut log = RollingLog::new(0);
        log.push("a");
        log.push("b");
        assert_eq!(log.to_vec(), vec!["b".to_string()]);
    }

    #[test]
    fn test_sim_log_line_format() {
        let time = NaiveTime::from_hms_opt(14, 5, 9).unwrap();
        assert_eq!(
            sim_log_line(time, 32.0, DriveMode::Drive),
            "sim:2:05:09 PM speed=32.0 mode=D"
        );
        let morning = NaiveTime::from_hms_opt(0, 30, 0).unwrap();
        assert_eq!(
            sim_log_line(morning, -4.96, DriveMode::Reverse),
            "sim:12:30:00 AM speed=-5.0 mode=R"
        );
    }
}
