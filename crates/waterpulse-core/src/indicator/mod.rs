//! Tab-bar Indicator
//!
//! Segment definitions and the tracker that keeps the animated highlight
//! under the focused tab.

mod error;
mod probe;
mod segment;
mod tracker;

pub use error::IndicatorError;
pub use probe::{measure_deferred, LayoutProbe};
pub use segment::{default_tabs, Segment, SegmentList, TabDefinition};
pub use tracker::{IndicatorFrame, IndicatorTracker, MeasureOutcome, MeasureRequest};
