//! # WaterPulse Core Library
//!
//! Client-side logic for the WaterPulse water-quality monitor.

#![warn(missing_docs)]
#![cfg_attr(docsrs, feature(doc_cfg))]

//!
//! This library provides:
//! - Tab-bar indicator tracking with spring animation
//! - Gauge marker and label bubble placement
//! - Water quality classification and reading history
//! - A live reading loop gated by device connection state
//! - Device pairing state and notification permission handling
//!
//! ## Example
//!
//! ```rust,ignore
//! use waterpulse_core::prelude::*;
//!
//! let config = PulseConfig::default();
//! let device = DeviceStore::new();
//!
//! // Start the reading loop; it idles until the device connects
//! let (monitor, mut updates) = PulseMonitor::spawn(
//!     config.monitor(),
//!     &device,
//!     SimulatedSource::new(),
//!     config.pulse_state(),
//! );
//! device.set_connected(true);
//!
//! while let Some(snapshot) = updates.recv().await {
//!     println!("{} ({})", snapshot.score, snapshot.band.badge_label());
//! }
//! ```

pub mod animation;
pub mod config;
pub mod device;
pub mod gauge;
pub mod geometry;
pub mod history;
pub mod indicator;
pub mod monitor;
pub mod notification;
pub mod pulse;
pub mod quality;
pub mod source;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::animation::{Spring, SpringConfig, SpringStatus};
    pub use crate::config::{ConfigError, PulseConfig};
    pub use crate::device::{DeviceIdStore, DeviceState, DeviceStore, MemoryDeviceIdStore};
    pub use crate::gauge::{place, GaugePlacement};
    pub use crate::geometry::{ContainerLayout, MeasuredGeometry};
    pub use crate::history::ReadingHistory;
    pub use crate::indicator::{
        IndicatorFrame, IndicatorTracker, LayoutProbe, MeasureOutcome, MeasureRequest, SegmentList,
        TabDefinition,
    };
    pub use crate::monitor::{MonitorConfig, PulseMonitor};
    pub use crate::notification::{NotificationToggle, PermissionStatus, ToggleOutcome};
    pub use crate::pulse::{PulseSnapshot, PulseState};
    pub use crate::quality::{classify, QualityBand};
    pub use crate::source::{ReadingSource, ScriptedSource, SimulatedSource};
}

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
