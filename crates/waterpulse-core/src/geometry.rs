//! Layout geometry
//!
//! Measured element geometry and the clamp helpers shared by the indicator
//! tracker and the gauge.

use serde::{Deserialize, Serialize};

/// Default share of the screen width taken by the tab-bar track
pub const DEFAULT_TRACK_RATIO: f64 = 0.7;

/// Clamp a value into `[0, 1]`. NaN maps to 0.
pub fn clamp_unit(value: f64) -> f64 {
    if value.is_nan() {
        return 0.0;
    }
    value.clamp(0.0, 1.0)
}

/// Clamp a length to be non-negative and finite.
pub fn non_negative(value: f64) -> f64 {
    if value.is_finite() {
        value.max(0.0)
    } else {
        0.0
    }
}

/// Geometry of a rendered element, as reported by the host layout pass
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct MeasuredGeometry {
    /// Rendered width in pixels
    pub width: f64,
    /// Horizontal offset on screen in pixels
    pub offset_x: f64,
}

impl MeasuredGeometry {
    /// Create a measurement. Negative or non-finite inputs are clamped to 0.
    pub fn new(width: f64, offset_x: f64) -> Self {
        Self {
            width: non_negative(width),
            offset_x: non_negative(offset_x),
        }
    }
}

/// A horizontally centered track inside a wider screen.
///
/// The tab bar is laid out at `track_ratio` of the screen width and centered,
/// so page offsets reported by the host must be shifted by the left inset to
/// become track-relative.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ContainerLayout {
    /// Full screen (window) width in pixels
    pub screen_width: f64,
    /// Fraction of the screen occupied by the track, in `(0, 1]`
    pub track_ratio: f64,
}

impl ContainerLayout {
    /// Create a layout. The ratio is clamped into `[0, 1]`.
    pub fn new(screen_width: f64, track_ratio: f64) -> Self {
        Self {
            screen_width: non_negative(screen_width),
            track_ratio: clamp_unit(track_ratio),
        }
    }

    /// Width of the centered track
    pub fn track_width(&self) -> f64 {
        self.screen_width * self.track_ratio
    }

    /// Distance from the screen's left edge to the track's left edge
    pub fn left_inset(&self) -> f64 {
        (self.screen_width - self.track_width()) / 2.0
    }

    /// Convert a page offset into a track-relative translation
    pub fn to_track(&self, page_offset: f64) -> f64 {
        page_offset - self.left_inset()
    }
}

impl Default for ContainerLayout {
    fn default() -> Self {
        Self::new(390.0, DEFAULT_TRACK_RATIO)
    }
}
