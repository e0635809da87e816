//! # Vehicle Console Core Library
//!
//! Core functionality for the vehicle operations console.

#![warn(missing_docs)]
#![cfg_attr(docsrs, feature(doc_cfg))]

//!
//! This library provides:
//! - The vehicle snapshot model and its JSON wire format
//! - A deterministic telemetry simulator with a rolling log buffer
//! - Live vehicle bridges (HTTP and an in-process onboard backend)
//! - The runtime selector that publishes snapshots and owns the drive mode
//! - Display helpers for the dashboard
//!
//! ## Example
//!
//! ```rust,ignore
//! use vehicle_console_core::prelude::*;
//!
//! let mut selector = TelemetrySelector::new(SelectorConfig::default(), None);
//! selector.start();
//! selector.change_mode(DriveMode::Drive);
//! let snapshot = selector.snapshot();
//! println!("{}", status_line(&snapshot));
//! selector.shutdown().await;
//! ```

pub mod bridge;
pub mod config;
pub mod dashboard;
pub mod demo;
pub mod runtime;
pub mod telemetry;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::bridge::{connect_bridge, BridgeError, HttpBridge, OnboardVehicle, VehicleBridge};
    pub use crate::config::{BridgeSettings, ConfigError, ConsoleConfig};
    pub use crate::dashboard::{
        efficiency_highlights, quick_stats, render_sparkline, speed_gauge_fraction, status_chips,
        status_line, DockTab, QuickStat,
    };
    pub use crate::demo::{DemoSimulator, RollingLog};
    pub use crate::runtime::{RuntimeKind, SelectorConfig, TelemetrySelector};
    pub use crate::telemetry::{
        DerivedMetric, DriveMode, ImuReading, MetricWindow, VehicleField, VehicleSection,
        VehicleSnapshot,
    };
}

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
