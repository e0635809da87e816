//! Vehicle console host
//!
//! Resolves configuration, installs logging, decides once whether a live
//! bridge is available and then drives the telemetry selector: redraws the
//! dashboard on a fixed cadence and applies operator commands read from stdin.

pub mod cli;
pub mod console;
pub mod logging;

use std::future;
use std::time::Duration;

use anyhow::{Context, Result};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::time::{self, MissedTickBehavior};
use vehicle_console_core::bridge::connect_bridge;
use vehicle_console_core::runtime::{SelectorConfig, TelemetrySelector};

pub use cli::{resolve_config, Cli, BRIDGE_URL_ENV};
pub use console::{ConsoleCommand, ConsoleSession, Flow};

/// Build identifier stamped by build.rs (`YYYY.MM.DD+g<sha>` or `unknown`)
pub const BUILD_ID: &str = match option_env!("VEHICLE_CONSOLE_BUILD_ID") {
    Some(id) => id,
    None => "unknown",
};

/// Run the console until the operator quits, Ctrl-C, or `--run-seconds` elapses
pub async fn run(cli: Cli) -> Result<()> {
    let config = resolve_config(&cli, std::env::var(BRIDGE_URL_ENV).ok())?;

    if cli.print_config {
        println!("{}", serde_json::to_string_pretty(&config)?);
        return Ok(());
    }

    logging::init_tracing(config.logging.json, config.logging.filter.as_deref());
    tracing::info!(build = BUILD_ID, "Vehicle console starting");

    let bridge = connect_bridge(&config.bridge).context("Failed to set up vehicle bridge")?;
    let mut selector = TelemetrySelector::new(SelectorConfig::from(&config), bridge);
    let runtime = selector.start();
    tracing::info!(runtime = ?runtime, "Telemetry runtime selected");

    let mut session = ConsoleSession::new(config.camera.feed_url.clone());
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdin_open = true;

    let mut redraw = time::interval(config.render_interval());
    redraw.set_missed_tick_behavior(MissedTickBehavior::Skip);

    let deadline = async {
        match cli.run_seconds {
            Some(secs) => time::sleep(Duration::from_secs(secs)).await,
            None => future::pending::<()>().await,
        }
    };
    tokio::pin!(deadline);
    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    println!("{}", console::HELP);

    loop {
        tokio::select! {
            result = &mut ctrl_c => {
                if let Err(e) = result {
                    tracing::warn!("Failed to listen for Ctrl-C: {e}");
                }
                break;
            }
            _ = &mut deadline => break,
            _ = redraw.tick() => {
                let snapshot = selector.snapshot();
                print!("{}", session.render(selector.runtime(), selector.drive_mode(), &snapshot));
            }
            line = lines.next_line(), if stdin_open => match line {
                Ok(Some(line)) if line.trim().is_empty() => {}
                Ok(Some(line)) => match line.parse::<ConsoleCommand>() {
                    Ok(command) => {
                        if session.apply(command, &selector) == Flow::Quit {
                            break;
                        }
                    }
                    Err(e) => tracing::warn!("{e}; {}", console::HELP),
                },
                Ok(None) => {
                    tracing::debug!("stdin closed; commands disabled");
                    stdin_open = false;
                }
                Err(e) => {
                    tracing::warn!("Failed to read stdin: {e}");
                    stdin_open = false;
                }
            },
        }
    }

    selector.shutdown().await;
    tracing::info!(
        published = selector.published_count(),
        faults = selector.fault_count(),
        "Vehicle console stopped"
    );
    Ok(())
}
