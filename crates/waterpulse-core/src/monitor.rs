//! Live pulse monitor
//!
//! Background task that feeds readings into [`PulseState`] on a fixed
//! interval while the device is connected, and publishes a [`PulseSnapshot`]
//! after each one.
//!
//! The loop pauses as soon as the device disconnects and picks up again on
//! reconnect. It ends for good when the snapshot receiver is dropped, the
//! device store goes away, or the monitor itself is shut down or dropped.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, watch, Mutex};
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::{debug, info, trace, warn};

use crate::device::{DeviceState, DeviceStore};
use crate::pulse::{PulseSnapshot, PulseState};
use crate::source::ReadingSource;

/// Interval between simulated readings
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(1500);

/// Snapshots buffered for a slow consumer before updates are dropped
pub const DEFAULT_CHANNEL_CAPACITY: usize = 16;

/// Timing of the monitor loop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonitorConfig {
    /// Time between readings
    pub poll_interval: Duration,
    /// Snapshot channel capacity
    pub channel_capacity: usize,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            poll_interval: DEFAULT_POLL_INTERVAL,
            channel_capacity: DEFAULT_CHANNEL_CAPACITY,
        }
    }
}

/// Owns the background reading loop for one pulse screen
pub struct PulseMonitor {
    state: Arc<Mutex<PulseState>>,
    device: watch::Receiver<DeviceState>,
    updates: mpsc::Sender<PulseSnapshot>,
    task: Option<JoinHandle<()>>,
}

impl PulseMonitor {
    /// Spawn the loop on the current tokio runtime.
    ///
    /// Returns the monitor and the receiving end of the snapshot channel.
    pub fn spawn<S>(
        config: MonitorConfig,
        device: &DeviceStore,
        source: S,
        state: PulseState,
    ) -> (Self, mpsc::Receiver<PulseSnapshot>)
    where
        S: ReadingSource + 'static,
    {
        let poll_interval = config.poll_interval.max(Duration::from_millis(1));
        let (tx, rx) = mpsc::channel(config.channel_capacity.max(1));
        let state = Arc::new(Mutex::new(state));

        let task = tokio::spawn(run_loop(
            poll_interval,
            device.subscribe(),
            source,
            state.clone(),
            tx.clone(),
        ));

        let monitor = Self {
            state,
            device: device.subscribe(),
            updates: tx,
            task: Some(task),
        };
        (monitor, rx)
    }

    /// Apply a reading pushed by a live feed instead of the timer.
    ///
    /// Ignored (returns `None`) while the device is disconnected or after
    /// shutdown.
    pub async fn push(&self, normalized: f64) -> Option<PulseSnapshot> {
        if !self.is_running() || !self.device.borrow().is_connected {
            trace!("ignoring pushed reading, monitor inactive");
            return None;
        }
        let snapshot = self.state.lock().await.apply_reading(normalized);
        publish(&self.updates, snapshot.clone()).ok()?;
        Some(snapshot)
    }

    /// Record the measured gauge bar width
    pub async fn set_bar_width(&self, width: f64) {
        self.state.lock().await.set_bar_width(width);
    }

    /// Current state as a snapshot
    pub async fn snapshot(&self) -> PulseSnapshot {
        self.state.lock().await.snapshot()
    }

    /// Whether the loop task is still alive
    pub fn is_running(&self) -> bool {
        self.task.as_ref().is_some_and(|t| !t.is_finished())
    }

    /// Stop the loop. No snapshot is published afterwards.
    pub fn shutdown(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
            info!("pulse monitor shut down");
        }
    }
}

impl Drop for PulseMonitor {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

struct Closed;

fn publish(tx: &mpsc::Sender<PulseSnapshot>, snapshot: PulseSnapshot) -> Result<(), Closed> {
    match tx.try_send(snapshot) {
        Ok(()) => Ok(()),
        Err(mpsc::error::TrySendError::Full(_)) => {
            warn!("pulse consumer is lagging, dropping update");
            Ok(())
        }
        Err(mpsc::error::TrySendError::Closed(_)) => Err(Closed),
    }
}

async fn run_loop<S>(
    poll_interval: Duration,
    mut device: watch::Receiver<DeviceState>,
    mut source: S,
    state: Arc<Mutex<PulseState>>,
    tx: mpsc::Sender<PulseSnapshot>,
) where
    S: ReadingSource,
{
    loop {
        // Idle until the device reports connected
        while !device.borrow_and_update().is_connected {
            if device.changed().await.is_err() {
                debug!("device store dropped, pulse monitor exiting");
                return;
            }
        }

        info!(interval_ms = poll_interval.as_millis() as u64, "pulse monitor running");
        let mut ticker = interval_at(Instant::now() + poll_interval, poll_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                biased;

                changed = device.changed() => {
                    if changed.is_err() {
                        debug!("device store dropped, pulse monitor exiting");
                        return;
                    }
                    if !device.borrow_and_update().is_connected {
                        info!("device disconnected, pulse monitor paused");
                        break;
                    }
                }
                _ = ticker.tick() => {
                    let mut guard = state.lock().await;
                    // a disconnect may land while waiting on the lock
                    if !device.borrow().is_connected {
                        drop(guard);
                        info!("device disconnected, pulse monitor paused");
                        break;
                    }
                    let reading = source.next_reading();
                    let snapshot = guard.apply_reading(reading);
                    drop(guard);
                    trace!(score = snapshot.score, band = %snapshot.band, "pulse reading");
                    if publish(&tx, snapshot).is_err() {
                        debug!("pulse receiver dropped, pulse monitor exiting");
                        return;
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::ScriptedSource;

    #[tokio::test(start_paused = true)]
    async fn test_idle_while_disconnected() {
        let device = DeviceStore::new();
        let (monitor, mut rx) = PulseMonitor::spawn(
            MonitorConfig::default(),
            &device,
            ScriptedSource::new([0.5]),
            PulseState::default(),
        );

        tokio::time::sleep(Duration::from_secs(10)).await;
        assert!(rx.try_recv().is_err());
        assert!(monitor.is_running());
    }

    #[tokio::test(start_paused = true)]
    async fn test_first_tick_after_one_interval() {
        let device = DeviceStore::new();
        device.set_connected(true);
        let (_monitor, mut rx) = PulseMonitor::spawn(
            MonitorConfig::default(),
            &device,
            ScriptedSource::new([0.25]),
            PulseState::default(),
        );

        tokio::time::sleep(Duration::from_millis(1400)).await;
        assert!(rx.try_recv().is_err());

        let snapshot = rx.recv().await.unwrap();
        assert_eq!(snapshot.score, 25);
        assert_eq!(snapshot.history[0], 25);
    }

    #[tokio::test(start_paused = true)]
    async fn test_push_ignored_when_disconnected() {
        let device = DeviceStore::new();
        let (monitor, _rx) = PulseMonitor::spawn(
            MonitorConfig::default(),
            &device,
            ScriptedSource::new([0.5]),
            PulseState::default(),
        );

        assert!(monitor.push(0.9).await.is_none());
        device.set_connected(true);
        let snapshot = monitor.push(0.9).await.unwrap();
        assert_eq!(snapshot.score, 90);
    }

    #[tokio::test(start_paused = true)]
    async fn test_disconnect_while_state_locked() {
        let device = DeviceStore::new();
        device.set_connected(true);
        let (monitor, mut rx) = PulseMonitor::spawn(
            MonitorConfig::default(),
            &device,
            ScriptedSource::new([0.5]),
            PulseState::default(),
        );

        // the tick fires while the state is held elsewhere
        let guard = monitor.state.lock().await;
        tokio::time::sleep(Duration::from_millis(1600)).await;
        device.set_connected(false);
        drop(guard);

        tokio::time::sleep(Duration::from_secs(10)).await;
        assert!(rx.try_recv().is_err());
        assert_eq!(monitor.snapshot().await.score, 70);
        assert!(monitor.is_running());
    }

    #[tokio::test(start_paused = true)]
    async fn test_shutdown_stops_loop() {
        let device = DeviceStore::new();
        device.set_connected(true);
        let (mut monitor, mut rx) = PulseMonitor::spawn(
            MonitorConfig::default(),
            &device,
            ScriptedSource::new([0.5]),
            PulseState::default(),
        );

        monitor.shutdown();
        assert!(!monitor.is_running());
        assert!(monitor.push(0.3).await.is_none());
        drop(monitor);

        assert!(rx.recv().await.is_none());
    }
}
