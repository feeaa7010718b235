//! Active-segment indicator tracking
//!
//! Keeps the tab-bar highlight aligned under the focused tab. Segment
//! geometry is only known after the host lays the tab bar out, so every
//! selection produces a tagged [`MeasureRequest`]; the host resolves it after
//! the layout pass and hands the result back through
//! [`IndicatorTracker::on_measured`]. Only the most recent request may move
//! the indicator.

use std::time::Duration;

use serde::Serialize;
use tracing::{debug, trace, warn};

use super::{Segment, SegmentList};
use crate::animation::{Spring, SpringConfig, SpringStatus};
use crate::geometry::{ContainerLayout, MeasuredGeometry};

/// A pending measurement of one segment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MeasureRequest {
    /// Index the request was issued for
    pub index: usize,
    /// Key of the segment to measure
    pub key: String,
    /// Monotonic tag, only the latest generation is honored
    pub generation: u64,
}

/// What happened to a measurement result
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MeasureOutcome {
    /// First measurement: indicator snapped into place and became visible
    Revealed,
    /// Indicator retargeted toward the new segment
    Applied,
    /// Result belonged to a superseded request and was dropped
    Stale,
    /// Segment was not mounted; indicator left as it was
    Unavailable,
}

/// Position and size the renderer should draw the indicator at
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct IndicatorFrame {
    /// Horizontal translation relative to the track
    pub translate_x: f64,
    /// Indicator width
    pub width: f64,
    /// Whether the indicator should be drawn at all
    pub visible: bool,
}

/// Tracks the active segment and animates the highlight under it
#[derive(Debug, Clone)]
pub struct IndicatorTracker {
    segments: SegmentList,
    layout: ContainerLayout,
    active: usize,
    generation: u64,
    translate: Spring,
    width: f64,
    revealed: bool,
}

impl IndicatorTracker {
    /// Create a tracker with the first segment active and the indicator hidden
    pub fn new(segments: SegmentList, layout: ContainerLayout, spring: SpringConfig) -> Self {
        Self {
            segments,
            layout,
            active: 0,
            generation: 0,
            translate: Spring::new(0.0, spring),
            width: 0.0,
            revealed: false,
        }
    }

    /// Index of the active segment
    pub fn active_index(&self) -> usize {
        self.active
    }

    /// The active segment
    pub fn active_segment(&self) -> &Segment {
        // `active` is always clamped into range and the list is never empty
        &self.segments.as_slice()[self.active]
    }

    /// All segments
    pub fn segments(&self) -> &SegmentList {
        &self.segments
    }

    /// Layout the tracker converts page offsets with
    pub fn layout(&self) -> ContainerLayout {
        self.layout
    }

    /// Whether a measurement has landed yet
    pub fn is_visible(&self) -> bool {
        self.revealed
    }

    /// Tag of the most recently issued request
    pub fn generation(&self) -> u64 {
        self.generation
    }

    fn issue(&mut self) -> MeasureRequest {
        self.generation += 1;
        let key = self
            .segments
            .get(self.active)
            .map(|s| s.key.clone())
            .unwrap_or_default();
        trace!(index = self.active, generation = self.generation, "measure requested");
        MeasureRequest {
            index: self.active,
            key,
            generation: self.generation,
        }
    }

    /// Focus segment `index` and request its measurement.
    ///
    /// Out-of-range indices are clamped to the last segment.
    pub fn select(&mut self, index: usize) -> MeasureRequest {
        let clamped = self.segments.clamp_index(index);
        if clamped != index {
            warn!(
                index,
                clamped,
                count = self.segments.len(),
                "segment index out of range, clamping"
            );
        }
        self.active = clamped;
        self.issue()
    }

    /// Focus the segment with `key`. Unknown keys leave the selection alone.
    pub fn select_key(&mut self, key: &str) -> Option<MeasureRequest> {
        let index = self.segments.position(key)?;
        Some(self.select(index))
    }

    /// Request a fresh measurement of the current segment, e.g. on mount or
    /// after an earlier measurement came back empty.
    pub fn remeasure(&mut self) -> MeasureRequest {
        self.issue()
    }

    /// Replace the container layout (rotation, window resize) and remeasure
    pub fn set_layout(&mut self, layout: ContainerLayout) -> MeasureRequest {
        self.layout = layout;
        self.issue()
    }

    /// Feed back the result of a measurement request
    pub fn on_measured(
        &mut self,
        request: &MeasureRequest,
        geometry: Option<MeasuredGeometry>,
    ) -> MeasureOutcome {
        if request.generation != self.generation || request.index != self.active {
            debug!(
                index = request.index,
                generation = request.generation,
                latest = self.generation,
                "discarding stale measurement"
            );
            return MeasureOutcome::Stale;
        }

        let Some(geometry) = geometry else {
            debug!(index = request.index, "segment not mounted, skipping measurement");
            return MeasureOutcome::Unavailable;
        };

        let target = self.layout.to_track(geometry.offset_x);
        self.width = geometry.width;

        if !self.revealed {
            self.translate.snap_to(target);
            self.revealed = true;
            debug!(index = request.index, target, width = self.width, "indicator revealed");
            return MeasureOutcome::Revealed;
        }

        self.translate.set_target(target);
        trace!(index = request.index, target, width = self.width, "indicator retargeted");
        MeasureOutcome::Applied
    }

    /// Advance the translation animation by one frame
    pub fn advance(&mut self, dt: Duration) -> SpringStatus {
        self.translate.advance(dt)
    }

    /// Whether the indicator is still moving
    pub fn is_animating(&self) -> bool {
        self.revealed && !self.translate.is_at_rest()
    }

    /// Translation the indicator is heading for
    pub fn target_translate_x(&self) -> f64 {
        self.translate.target()
    }

    /// Current drawing state. Hidden indicators report a zero-sized frame.
    pub fn frame(&self) -> IndicatorFrame {
        if !self.revealed {
            return IndicatorFrame::default();
        }
        IndicatorFrame {
            translate_x: self.translate.position(),
            width: self.width,
            visible: true,
        }
    }
}
