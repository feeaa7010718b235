//! Client configuration
//!
//! Tunables for the tab bar, gauge and live-reading loop. Every field has a
//! default matching the shipped app, so a config file only needs the values
//! it overrides.

use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::animation::SpringConfig;
use crate::gauge::{DEFAULT_BUBBLE_WIDTH, DEFAULT_MARKER_WIDTH};
use crate::geometry::{ContainerLayout, DEFAULT_TRACK_RATIO};
use crate::history::DEFAULT_HISTORY_CAPACITY;
use crate::indicator::{default_tabs, IndicatorError, IndicatorTracker, SegmentList, TabDefinition};
use crate::monitor::{MonitorConfig, DEFAULT_CHANNEL_CAPACITY};
use crate::pulse::PulseState;

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid config JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid segments: {0}")]
    Segments(#[from] IndicatorError),

    #[error("Invalid config value for {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Client configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PulseConfig {
    /// Window width in pixels
    pub screen_width: f64,
    /// Share of the window the tab bar occupies
    pub track_ratio: f64,
    /// Indicator spring
    pub spring: SpringConfig,
    /// Width of the gauge label bubble
    pub bubble_width: f64,
    /// Width of the gauge marker pin
    pub marker_width: f64,
    /// Milliseconds between readings
    pub poll_interval_ms: u64,
    /// Readings kept for the trend chart
    pub history_capacity: usize,
    /// Snapshots buffered for the UI
    pub channel_capacity: usize,
    /// Tabs, in display order
    pub segments: Vec<TabDefinition>,
    /// Send a confirmation notification when notifications are switched on
    pub confirm_notifications: bool,
}

impl Default for PulseConfig {
    fn default() -> Self {
        Self {
            screen_width: 390.0,
            track_ratio: DEFAULT_TRACK_RATIO,
            spring: SpringConfig::default(),
            bubble_width: DEFAULT_BUBBLE_WIDTH,
            marker_width: DEFAULT_MARKER_WIDTH,
            poll_interval_ms: 1500,
            history_capacity: DEFAULT_HISTORY_CAPACITY,
            channel_capacity: DEFAULT_CHANNEL_CAPACITY,
            segments: default_tabs(),
            confirm_notifications: true,
        }
    }
}

fn invalid(field: &'static str, reason: impl Into<String>) -> ConfigError {
    ConfigError::Invalid {
        field,
        reason: reason.into(),
    }
}

impl PulseConfig {
    /// Parse and validate a JSON document
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a JSON config file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)?;
        let config = Self::from_json_str(&content)?;
        debug!(path = %path.display(), "loaded pulse config");
        Ok(config)
    }

    /// Write the config as pretty JSON
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    /// Check every value is usable
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.screen_width.is_finite() && self.screen_width > 0.0) {
            return Err(invalid("screen_width", "must be positive"));
        }
        if !(self.track_ratio > 0.0 && self.track_ratio <= 1.0) {
            return Err(invalid("track_ratio", "must be in (0, 1]"));
        }
        if !(self.bubble_width.is_finite() && self.bubble_width > 0.0) {
            return Err(invalid("bubble_width", "must be positive"));
        }
        if !(self.marker_width.is_finite() && self.marker_width > 0.0) {
            return Err(invalid("marker_width", "must be positive"));
        }
        let spring = &self.spring;
        if !(spring.stiffness.is_finite() && spring.stiffness > 0.0) {
            return Err(invalid("spring.stiffness", "must be positive"));
        }
        if !(spring.damping.is_finite() && spring.damping > 0.0) {
            return Err(invalid("spring.damping", "must be positive"));
        }
        if !(spring.rest_threshold.is_finite() && spring.rest_threshold > 0.0) {
            return Err(invalid("spring.rest_threshold", "must be positive"));
        }
        if self.poll_interval_ms == 0 {
            return Err(invalid("poll_interval_ms", "must be at least 1"));
        }
        if self.history_capacity == 0 {
            return Err(invalid("history_capacity", "must be at least 1"));
        }
        if self.channel_capacity == 0 {
            return Err(invalid("channel_capacity", "must be at least 1"));
        }
        SegmentList::new(&self.segments)?;
        Ok(())
    }

    /// Tab-bar container layout
    pub fn layout(&self) -> ContainerLayout {
        ContainerLayout::new(self.screen_width, self.track_ratio)
    }

    /// Reading loop timing
    pub fn monitor(&self) -> MonitorConfig {
        MonitorConfig {
            poll_interval: Duration::from_millis(self.poll_interval_ms),
            channel_capacity: self.channel_capacity,
        }
    }

    /// Fresh indicator tracker for the configured tabs
    pub fn tracker(&self) -> Result<IndicatorTracker, ConfigError> {
        let segments = SegmentList::new(&self.segments)?;
        Ok(IndicatorTracker::new(segments, self.layout(), self.spring))
    }

    /// Fresh pulse screen state
    pub fn pulse_state(&self) -> PulseState {
        PulseState::new(self.bubble_width, self.marker_width, self.history_capacity)
    }
}
