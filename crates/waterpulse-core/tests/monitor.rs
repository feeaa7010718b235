use std::time::Duration;

use tokio::sync::mpsc::error::TryRecvError;
use waterpulse_core::device::DeviceStore;
use waterpulse_core::monitor::{MonitorConfig, PulseMonitor};
use waterpulse_core::pulse::PulseState;
use waterpulse_core::quality::QualityBand;
use waterpulse_core::source::ScriptedSource;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("waterpulse_core=debug")
        .with_test_writer()
        .try_init();
}

const INTERVAL: Duration = Duration::from_millis(1500);

#[tokio::test(start_paused = true)]
async fn test_no_updates_after_disconnect() {
    init_tracing();
    let device = DeviceStore::new();
    device.set_connected(true);

    let (_monitor, mut rx) = PulseMonitor::spawn(
        MonitorConfig::default(),
        &device,
        ScriptedSource::new([0.2, 0.8, 0.5]),
        PulseState::default(),
    );

    let first = rx.recv().await.unwrap();
    assert_eq!(first.score, 20);
    assert_eq!(first.band, QualityBand::Poor);

    let second = rx.recv().await.unwrap();
    assert_eq!(second.score, 80);

    device.set_connected(false);
    tokio::time::sleep(INTERVAL * 10).await;
    assert_eq!(rx.try_recv().unwrap_err(), TryRecvError::Empty);
}

#[tokio::test(start_paused = true)]
async fn test_resumes_after_reconnect() {
    init_tracing();
    let device = DeviceStore::new();
    device.set_connected(true);

    let (_monitor, mut rx) = PulseMonitor::spawn(
        MonitorConfig::default(),
        &device,
        ScriptedSource::new([0.1, 0.9]),
        PulseState::default(),
    );

    assert_eq!(rx.recv().await.unwrap().score, 10);
    device.set_connected(false);
    tokio::time::sleep(INTERVAL * 4).await;
    assert!(rx.try_recv().is_err());

    device.set_connected(true);
    // first tick comes a full interval after reconnecting
    tokio::time::sleep(Duration::from_millis(1000)).await;
    assert!(rx.try_recv().is_err());

    let snapshot = rx.recv().await.unwrap();
    assert_eq!(snapshot.score, 90);
    assert_eq!(&snapshot.history[..2], &[90, 10]);
}

#[tokio::test(start_paused = true)]
async fn test_teardown_stops_updates() {
    let device = DeviceStore::new();
    device.set_connected(true);

    let (monitor, mut rx) = PulseMonitor::spawn(
        MonitorConfig::default(),
        &device,
        ScriptedSource::new([0.5]),
        PulseState::default(),
    );

    assert!(rx.recv().await.is_some());
    drop(monitor);

    // channel closes instead of delivering more readings
    assert!(rx.recv().await.is_none());
}

#[tokio::test(start_paused = true)]
async fn test_dropping_receiver_ends_loop() {
    let device = DeviceStore::new();
    device.set_connected(true);

    let (monitor, rx) = PulseMonitor::spawn(
        MonitorConfig::default(),
        &device,
        ScriptedSource::new([0.5]),
        PulseState::default(),
    );
    drop(rx);

    tokio::time::sleep(INTERVAL * 2).await;
    assert!(!monitor.is_running());
}

#[tokio::test(start_paused = true)]
async fn test_bar_width_feeds_placement() {
    let device = DeviceStore::new();
    device.set_connected(true);

    let (monitor, mut rx) = PulseMonitor::spawn(
        MonitorConfig {
            poll_interval: Duration::from_millis(250),
            ..MonitorConfig::default()
        },
        &device,
        ScriptedSource::new([0.05, 0.5, 0.98]),
        PulseState::default(),
    );
    monitor.set_bar_width(300.0).await;

    let left = rx.recv().await.unwrap();
    assert_eq!(left.placement.bubble_left, 0.0);

    let middle = rx.recv().await.unwrap();
    assert_eq!(middle.placement.marker_left, 150.0);
    assert_eq!(middle.placement.bubble_left, 90.0);

    let right = rx.recv().await.unwrap();
    assert!((right.placement.bubble_left + 120.0 - 300.0).abs() < 1e-9);

    assert_eq!(monitor.snapshot().await.score, 98);
}

#[tokio::test(start_paused = true)]
async fn test_push_and_timer_share_history() {
    let device = DeviceStore::new();
    device.set_connected(true);

    let (monitor, mut rx) = PulseMonitor::spawn(
        MonitorConfig::default(),
        &device,
        ScriptedSource::new([0.3]),
        PulseState::default(),
    );

    let pushed = monitor.push(0.66).await.unwrap();
    assert_eq!(pushed.score, 66);
    assert_eq!(rx.recv().await.unwrap().score, 66);

    let ticked = rx.recv().await.unwrap();
    assert_eq!(ticked.score, 30);
    assert_eq!(&ticked.history[..2], &[30, 66]);
    assert_eq!(ticked.history.len(), 12);
}

#[tokio::test(start_paused = true)]
async fn test_device_store_drop_ends_loop() {
    let device = DeviceStore::new();
    device.set_connected(true);

    let (monitor, mut rx) = PulseMonitor::spawn(
        MonitorConfig::default(),
        &device,
        ScriptedSource::new([0.4]),
        PulseState::default(),
    );
    assert_eq!(rx.recv().await.unwrap().score, 40);

    drop(device);
    tokio::time::sleep(INTERVAL * 10).await;
    assert!(!monitor.is_running());
    assert_eq!(rx.try_recv().unwrap_err(), TryRecvError::Empty);
}

#[tokio::test(start_paused = true)]
async fn test_store_drop_while_idle_ends_loop() {
    let device = DeviceStore::new();

    let (monitor, _rx) = PulseMonitor::spawn(
        MonitorConfig::default(),
        &device,
        ScriptedSource::new([0.4]),
        PulseState::default(),
    );
    tokio::time::sleep(INTERVAL).await;
    assert!(monitor.is_running());

    drop(device);
    tokio::time::sleep(INTERVAL).await;
    assert!(!monitor.is_running());
}
