//! Layout measurement collaborator

use std::collections::HashMap;

use super::MeasureRequest;
use crate::geometry::MeasuredGeometry;

/// Host capability that reports the geometry of a rendered segment.
///
/// Returns `None` while the segment is not mounted.
pub trait LayoutProbe {
    /// Measure the segment with `key`
    fn measure(&self, key: &str) -> Option<MeasuredGeometry>;
}

impl LayoutProbe for HashMap<String, MeasuredGeometry> {
    fn measure(&self, key: &str) -> Option<MeasuredGeometry> {
        self.get(key).copied()
    }
}

/// Resolve `request` once the current layout pass has committed.
///
/// Yields to the scheduler first so the probe observes post-layout geometry.
pub async fn measure_deferred<P>(probe: &P, request: &MeasureRequest) -> Option<MeasuredGeometry>
where
    P: LayoutProbe + ?Sized,
{
    tokio::task::yield_now().await;
    probe.measure(&request.key)
}
