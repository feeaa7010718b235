//! Gauge marker placement
//!
//! Positions the marker and the "Your water status" bubble along the
//! gradient bar of the pulse screen. Pure functions of the reading and the
//! measured bar width.

use serde::Serialize;

use crate::geometry::{clamp_unit, non_negative};

/// Width of the label bubble
pub const DEFAULT_BUBBLE_WIDTH: f64 = 120.0;

/// Width of the marker pin drawn on the bar
pub const DEFAULT_MARKER_WIDTH: f64 = 8.0;

/// Computed placement of marker and bubble
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct GaugePlacement {
    /// Marker's left edge, `bar_width * normalized`
    pub marker_left: f64,
    /// Distance from the bubble's left edge to the marker
    pub bubble_offset: f64,
    /// Bubble's left edge
    pub bubble_left: f64,
}

impl GaugePlacement {
    /// Left edge of a marker of `marker_width` centered on the reading
    pub fn marker_center_left(&self, marker_width: f64) -> f64 {
        self.marker_left - non_negative(marker_width) / 2.0
    }
}

/// Place marker and bubble for a reading.
///
/// `normalized` is clamped into `[0, 1]` and widths to be non-negative.
/// Near either edge the bubble is pinned to that edge instead of centered, so
/// it stays inside the bar whenever the bar is at least `bubble_width` wide.
pub fn place(normalized: f64, bar_width: f64, bubble_width: f64) -> GaugePlacement {
    let normalized = clamp_unit(normalized);
    let bar_width = non_negative(bar_width);
    let bubble_width = non_negative(bubble_width);

    let marker_left = bar_width * normalized;
    let half = bubble_width / 2.0;

    let bubble_offset = if marker_left < half {
        marker_left
    } else if marker_left > bar_width - half {
        bubble_width - (bar_width - marker_left)
    } else {
        half
    };

    GaugePlacement {
        marker_left,
        bubble_offset,
        bubble_left: marker_left - bubble_offset,
    }
}
