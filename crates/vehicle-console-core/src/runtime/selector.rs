//! Runtime/source selector
//!
//! Owns the published snapshot and the authoritative drive mode. On start it
//! decides once between the simulator and the live bridge, then runs one
//! background task for the rest of the session:
//!
//! - simulated: a frame ticker republishes a simulator snapshot every frame
//! - live: a sequential poll loop publishes the bridge's snapshot, or a single
//!   simulated snapshot for any poll that fails
//!
//! Snapshots go out through a `watch` channel of `Arc<VehicleSnapshot>`, so
//! readers always see a complete value.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::runtime::Handle;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use super::RuntimeKind;
use crate::bridge::VehicleBridge;
use crate::config::{ConsoleConfig, DEFAULT_FRAME_INTERVAL_MS, DEFAULT_POLL_INTERVAL_MS};
use crate::demo::DemoSimulator;
use crate::telemetry::{DriveMode, VehicleSnapshot};

/// Loop timing for the selector
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectorConfig {
    /// Pause between settled live polls
    pub poll_interval: Duration,
    /// Simulator frame period
    pub frame_interval: Duration,
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_millis(DEFAULT_POLL_INTERVAL_MS),
            frame_interval: Duration::from_millis(DEFAULT_FRAME_INTERVAL_MS),
        }
    }
}

impl From<&ConsoleConfig> for SelectorConfig {
    fn from(config: &ConsoleConfig) -> Self {
        Self {
            poll_interval: config.poll_interval(),
            frame_interval: config.frame_interval(),
        }
    }
}

/// State shared between the selector handle and its loop task
struct Shared {
    snapshot: watch::Sender<Arc<VehicleSnapshot>>,
    mode: watch::Sender<DriveMode>,
    cancel: CancellationToken,
    published: AtomicU64,
    faults: AtomicU64,
}

impl Shared {
    fn mode(&self) -> DriveMode {
        *self.mode.borrow()
    }

    fn publish(&self, snapshot: VehicleSnapshot) {
        if self.cancel.is_cancelled() {
            return;
        }
        self.snapshot.send_replace(Arc::new(snapshot));
        self.published.fetch_add(1, Ordering::Relaxed);
    }

    /// Publish a locally generated frame under the mode current at publish time.
    ///
    /// The mode is read while the snapshot channel is held, so a frame built
    /// just before a concurrent `change_mode` cannot overwrite its patch.
    fn publish_frame(&self, snapshot: VehicleSnapshot) {
        if self.cancel.is_cancelled() {
            return;
        }
        self.snapshot.send_modify(|current| {
            let mode = *self.mode.borrow();
            *current = if snapshot.drive_mode == mode {
                Arc::new(snapshot)
            } else {
                Arc::new(snapshot.with_drive_mode(mode))
            };
        });
        self.published.fetch_add(1, Ordering::Relaxed);
    }
}

/// Chooses the telemetry source and publishes snapshots
pub struct TelemetrySelector {
    config: SelectorConfig,
    /// Live bridge capability, decided by the host before construction
    bridge: Option<Arc<dyn VehicleBridge>>,
    runtime: RuntimeKind,
    shared: Arc<Shared>,
    /// Monotonic origin for fallback snapshots in live mode
    epoch: Instant,
    /// Runtime captured by `start`, used to send drive mode commands
    runtime_handle: Option<Handle>,
    task: Option<JoinHandle<()>>,
}

impl TelemetrySelector {
    /// Create a selector. Pass `Some(bridge)` when a live bridge is available.
    pub fn new(config: SelectorConfig, bridge: Option<Arc<dyn VehicleBridge>>) -> Self {
        let (snapshot, _) = watch::channel(Arc::new(VehicleSnapshot::placeholder()));
        let (mode, _) = watch::channel(DriveMode::Park);
        Self {
            config,
            bridge,
            runtime: RuntimeKind::Unknown,
            shared: Arc::new(Shared {
                snapshot,
                mode,
                cancel: CancellationToken::new(),
                published: AtomicU64::new(0),
                faults: AtomicU64::new(0),
            }),
            epoch: Instant::now(),
            runtime_handle: None,
            task: None,
        }
    }

    /// Decide the runtime and start its loop. Calling again is a no-op.
    ///
    /// Must be called from within a tokio runtime.
    pub fn start(&mut self) -> RuntimeKind {
        if self.runtime != RuntimeKind::Unknown {
            return self.runtime;
        }
        self.runtime = RuntimeKind::detect(self.bridge.is_some());
        self.runtime_handle = Some(Handle::current());

        let shared = Arc::clone(&self.shared);
        let handle = match self.bridge.clone() {
            Some(bridge) => {
                tracing::info!(
                    bridge = %bridge.describe(),
                    poll_ms = self.config.poll_interval.as_millis() as u64,
                    "Live vehicle bridge detected; polling"
                );
                tokio::spawn(run_live(shared, bridge, self.config.poll_interval, self.epoch))
            }
            None => {
                tracing::info!(
                    frame_ms = self.config.frame_interval.as_millis() as u64,
                    "No live vehicle bridge; running simulator"
                );
                tokio::spawn(run_simulated(shared, self.config.frame_interval))
            }
        };
        self.task = Some(handle);
        self.runtime
    }

    /// Stop the loop and wait for it to finish. Nothing is published after
    /// this returns.
    pub async fn shutdown(&mut self) {
        self.shared.cancel.cancel();
        if let Some(task) = self.task.take() {
            if let Err(e) = task.await {
                tracing::debug!("Telemetry loop ended abnormally: {e}");
            }
        }
    }

    /// Runtime chosen by `start`, `Unknown` before it
    pub fn runtime(&self) -> RuntimeKind {
        self.runtime
    }

    /// Loop timing this selector was created with
    pub fn config(&self) -> SelectorConfig {
        self.config
    }

    /// Whether the loop task is still running
    pub fn is_running(&self) -> bool {
        self.task.as_ref().is_some_and(|t| !t.is_finished())
    }

    /// The currently published snapshot
    pub fn snapshot(&self) -> Arc<VehicleSnapshot> {
        self.shared.snapshot.borrow().clone()
    }

    /// Receive every published snapshot
    pub fn subscribe(&self) -> watch::Receiver<Arc<VehicleSnapshot>> {
        self.shared.snapshot.subscribe()
    }

    /// The authoritative drive mode
    pub fn drive_mode(&self) -> DriveMode {
        self.shared.mode()
    }

    /// Receive drive mode changes
    pub fn subscribe_mode(&self) -> watch::Receiver<DriveMode> {
        self.shared.mode.subscribe()
    }

    /// Number of snapshots published by the loop
    pub fn published_count(&self) -> u64 {
        self.shared.published.load(Ordering::Relaxed)
    }

    /// Number of live polls that failed and fell back to the simulator
    pub fn fault_count(&self) -> u64 {
        self.shared.faults.load(Ordering::Relaxed)
    }

    /// Switch drive mode.
    ///
    /// The local mode and the published snapshot change before this returns.
    /// In live mode the bridge is told in the background on the runtime that
    /// `start` ran on, so this may be called from any thread. If the bridge
    /// refuses, the error is logged and the local mode stands.
    pub fn change_mode(&self, next: DriveMode) {
        self.shared.mode.send_replace(next);
        self.shared.snapshot.send_if_modified(|current| {
            if current.drive_mode == next {
                return false;
            }
            *current = Arc::new(current.with_drive_mode(next));
            true
        });

        if self.runtime != RuntimeKind::Live {
            return;
        }
        if let (Some(bridge), Some(handle)) = (self.bridge.clone(), self.runtime_handle.as_ref()) {
            handle.spawn(async move {
                match bridge.set_drive_mode(next).await {
                    Ok(ack) => tracing::debug!(requested = %next, acknowledged = %ack, "Drive mode sent"),
                    Err(e) => tracing::error!(mode = %next, "Failed to update drive mode: {e}"),
                }
            });
        }
    }

    /// Move the lever one position towards Reverse
    pub fn shift_up(&self) -> DriveMode {
        let next = self.drive_mode().shift_up();
        self.change_mode(next);
        next
    }

    /// Move the lever one position towards Drive
    pub fn shift_down(&self) -> DriveMode {
        let next = self.drive_mode().shift_down();
        self.change_mode(next);
        next
    }
}

impl Drop for TelemetrySelector {
    fn drop(&mut self) {
        self.shared.cancel.cancel();
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

async fn run_simulated(shared: Arc<Shared>, frame_interval: Duration) {
    let mut simulator = DemoSimulator::new();
    let mut frames = time::interval(frame_interval);
    frames.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let start = Instant::now();

    loop {
        tokio::select! {
            biased;
            _ = shared.cancel.cancelled() => break,
            _ = frames.tick() => {}
        }
        let t = start.elapsed().as_secs_f64();
        let snapshot = simulator.snapshot(shared.mode(), t);
        shared.publish_frame(snapshot);
    }

    tracing::debug!("Simulator loop stopped");
}

async fn run_live(
    shared: Arc<Shared>,
    bridge: Arc<dyn VehicleBridge>,
    poll_interval: Duration,
    epoch: Instant,
) {
    // Only used when a poll fails
    let mut fallback = DemoSimulator::new();

    loop {
        let result = tokio::select! {
            biased;
            _ = shared.cancel.cancelled() => break,
            result = bridge.get_snapshot() => result,
        };
        if shared.cancel.is_cancelled() {
            break;
        }

        match result {
            Ok(snapshot) => {
                let snapshot = snapshot.sanitized();
                shared.mode.send_replace(snapshot.drive_mode);
                shared.publish(snapshot);
            }
            Err(e) => {
                shared.faults.fetch_add(1, Ordering::Relaxed);
                tracing::warn!("Vehicle bridge poll failed; using simulated telemetry: {e}");
                let t = epoch.elapsed().as_secs_f64();
                shared.publish_frame(fallback.snapshot(shared.mode(), t));
            }
        }

        tokio::select! {
            biased;
            _ = shared.cancel.cancelled() => break,
            _ = time::sleep(poll_interval) => {}
        }
    }

    tracing::debug!("Bridge poll loop stopped");
}
