//! Hit testing for placed equipment and calibration handles.
//!
//! ## Performance Notes
//!
//! Candidates come from the store's R-tree in O(log n); only those are tested
//! against their exact shape, front to back.

use crate::board::EquipmentStore;
use crate::calibration::{CalibrationLine, Endpoint};
use crate::constants::{CALIBRATION_HIT_SLOP, CALIBRATION_POINT_RADIUS};
use crate::geometry::Point;
use crate::perf::HitTestProfiler;
use crate::profile_scope;
use crate::types::{InstanceId, PlacedEquipment};
use crate::viewport::ViewTransform;

/// Topmost item whose shape contains `canvas_point`, if any.
pub fn hit_test(store: &EquipmentStore, canvas_point: Point) -> Option<InstanceId> {
    profile_scope!("hit_test");
    hit_test_profiled(store, canvas_point, None)
}

/// Same as [`hit_test`], recording candidate counts into `profiler` when present.
pub fn hit_test_profiled(
    store: &EquipmentStore,
    canvas_point: Point,
    profiler: Option<&mut HitTestProfiler>,
) -> Option<InstanceId> {
    if !canvas_point.is_finite() {
        return None;
    }
    let candidates = store.candidates_at(canvas_point);
    if let Some(profiler) = profiler {
        profiler.record(candidates.len(), store.len());
    }
    if candidates.is_empty() {
        return None;
    }

    store
        .items()
        .iter()
        .rev()
        .filter(|item| candidates.contains(&item.id))
        .find(|item| hit_item(item, canvas_point))
        .map(|item| item.id.clone())
}

/// Exact shape test for one item.
#[inline]
pub fn hit_item(item: &PlacedEquipment, canvas_point: Point) -> bool {
    item.is_finite() && item.contains(canvas_point)
}

/// Which calibration endpoint, if any, is under `screen_point`.
///
/// Handles keep a constant on-screen size, so the test runs in screen space.
pub fn hit_calibration_endpoint(
    line: &CalibrationLine,
    view: &ViewTransform,
    screen_point: Point,
) -> Option<Endpoint> {
    let reach = CALIBRATION_POINT_RADIUS + CALIBRATION_HIT_SLOP;
    let start = view.canvas_to_screen(line.start).distance_to(screen_point);
    let end = view.canvas_to_screen(line.end).distance_to(screen_point);

    // End wins ties; it is drawn last.
    match (start <= reach, end <= reach) {
        (_, true) if end <= start => Some(Endpoint::End),
        (true, _) => Some(Endpoint::Start),
        (false, true) => Some(Endpoint::End),
        (false, false) => None,
    }
}
