//! Pulse screen state
//!
//! Current reading, measured bar width and history for the live water-quality
//! card. [`PulseState::apply_reading`] is the one update path for every
//! reading, whether it came from the polling timer or a push subscription.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::gauge::{place, GaugePlacement, DEFAULT_BUBBLE_WIDTH, DEFAULT_MARKER_WIDTH};
use crate::geometry::{clamp_unit, non_negative};
use crate::history::{ReadingHistory, DEFAULT_HISTORY_CAPACITY};
use crate::quality::QualityBand;

/// Reading shown before the first live update
pub const INITIAL_READING: f64 = 0.7;

/// Everything the pulse screen renders for one reading
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PulseSnapshot {
    /// Normalized reading in `[0, 1]`
    pub normalized: f64,
    /// Reading on the 0-100 scale, rounded
    pub score: u8,
    /// Quality band of the unrounded reading. Near a band edge this can
    /// disagree with `score`: 0.5996 shows score 60 but stays Caution.
    pub band: QualityBand,
    /// Marker and bubble placement on the bar
    pub placement: GaugePlacement,
    /// Left edge of the marker pin, centered on the reading
    pub marker_center_left: f64,
    /// Recent scores, newest first
    pub history: Vec<u8>,
    /// When the reading was applied
    pub updated_at: DateTime<Utc>,
}

/// Mutable state behind the pulse screen
#[derive(Debug, Clone)]
pub struct PulseState {
    normalized: f64,
    bar_width: f64,
    bubble_width: f64,
    marker_width: f64,
    history: ReadingHistory,
    updated_at: DateTime<Utc>,
}

impl PulseState {
    /// Create state with the given bubble and marker widths and history
    /// capacity. The history starts from the seeded sample and the bar is
    /// unmeasured.
    pub fn new(bubble_width: f64, marker_width: f64, history_capacity: usize) -> Self {
        Self {
            normalized: INITIAL_READING,
            bar_width: 0.0,
            bubble_width: non_negative(bubble_width),
            marker_width: non_negative(marker_width),
            history: ReadingHistory::seeded(history_capacity),
            updated_at: Utc::now(),
        }
    }

    /// Current normalized reading
    pub fn normalized(&self) -> f64 {
        self.normalized
    }

    /// Measured bar width, 0 until measured
    pub fn bar_width(&self) -> f64 {
        self.bar_width
    }

    /// Reading history
    pub fn history(&self) -> &ReadingHistory {
        &self.history
    }

    /// Record the bar width reported by the layout pass
    pub fn set_bar_width(&mut self, width: f64) {
        self.bar_width = non_negative(width);
    }

    /// Placement for the current reading
    pub fn placement(&self) -> GaugePlacement {
        place(self.normalized, self.bar_width, self.bubble_width)
    }

    /// Band of the current reading
    pub fn band(&self) -> QualityBand {
        QualityBand::from_normalized(self.normalized)
    }

    /// Take a new reading: clamp it, store it and push its score into history
    pub fn apply_reading(&mut self, normalized: f64) -> PulseSnapshot {
        self.normalized = clamp_unit(normalized);
        self.history.push(ReadingHistory::score_of(self.normalized));
        self.updated_at = Utc::now();
        self.snapshot()
    }

    /// Render-ready view of the current state
    pub fn snapshot(&self) -> PulseSnapshot {
        let placement = self.placement();
        PulseSnapshot {
            normalized: self.normalized,
            score: ReadingHistory::score_of(self.normalized),
            band: self.band(),
            placement,
            marker_center_left: placement.marker_center_left(self.marker_width),
            history: self.history.iter().collect(),
            updated_at: self.updated_at,
        }
    }
}

impl Default for PulseState {
    fn default() -> Self {
        Self::new(
            DEFAULT_BUBBLE_WIDTH,
            DEFAULT_MARKER_WIDTH,
            DEFAULT_HISTORY_CAPACITY,
        )
    }
}
