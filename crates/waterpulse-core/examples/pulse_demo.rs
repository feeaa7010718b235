//! WaterPulse Live Reading Demo
//!
//! Runs the pulse monitor against simulated readings and prints each update
//! as it would appear on the pulse screen. The device connects after a short
//! delay, drops out halfway through and reconnects, so the gating of the
//! reading loop is visible in the output.
//!
//! Usage:
//!   cargo run --example pulse_demo -- [CONFIG.json]
//!
//! Set `RUST_LOG=waterpulse_core=debug` for loop state transitions.

use std::time::Duration;

use anyhow::{Context, Result};
use tracing_subscriber::EnvFilter;
use waterpulse_core::indicator::measure_deferred;
use waterpulse_core::prelude::*;

/// Tab offsets a 390px window lays out, keyed by tab
fn tab_geometry() -> std::collections::HashMap<String, MeasuredGeometry> {
    [("home", 70.0), ("pulse", 138.0), ("report", 206.0), ("profile", 274.0)]
        .into_iter()
        .map(|(key, offset)| (key.to_string(), MeasuredGeometry::new(56.0, offset)))
        .collect()
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = match std::env::args().nth(1) {
        Some(path) => PulseConfig::from_file(&path)
            .with_context(|| format!("failed to load config from {path}"))?,
        None => PulseConfig::default(),
    };

    // Tab bar: focus the pulse tab and let the highlight glide there
    let probe = tab_geometry();
    let mut tracker = config.tracker()?;
    let req = tracker.remeasure();
    tracker.on_measured(&req, measure_deferred(&probe, &req).await);
    if let Some(req) = tracker.select_key("pulse") {
        tracker.on_measured(&req, measure_deferred(&probe, &req).await);
    }
    while tracker.is_animating() {
        tracker.advance(Duration::from_millis(16));
    }
    println!(
        "Indicator under '{}' at x={:.1} w={:.1}",
        tracker.active_segment().label,
        tracker.frame().translate_x,
        tracker.frame().width
    );

    let device = DeviceStore::new();
    device.pair("demo-sensor-01", &MemoryDeviceIdStore::new())?;

    let (mut monitor, mut updates) = PulseMonitor::spawn(
        config.monitor(),
        &device,
        SimulatedSource::new(),
        config.pulse_state(),
    );
    monitor.set_bar_width(config.screen_width - 40.0).await;

    let controller = device.clone();
    let interval = config.monitor().poll_interval;
    tokio::spawn(async move {
        tokio::time::sleep(interval / 2).await;
        controller.set_connected(true);
        tokio::time::sleep(interval * 4).await;
        println!("-- device disconnected --");
        controller.set_connected(false);
        tokio::time::sleep(interval * 3).await;
        println!("-- device reconnected --");
        controller.set_connected(true);
    });

    let mut received = 0;
    while let Some(snapshot) = updates.recv().await {
        received += 1;
        println!(
            "{:>3} {:<7} {} bubble@{:>6.1} history={:?}",
            snapshot.score,
            snapshot.band.badge_label(),
            snapshot.band.color(),
            snapshot.placement.bubble_left,
            snapshot.history
        );
        if received == 8 {
            break;
        }
    }

    monitor.shutdown();
    Ok(())
}
