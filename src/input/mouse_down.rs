//! Pointer down handling - calibration points, measuring, selection, drag and pan start.
//!
//! ## Performance Notes
//!
//! Pointer down runs a hit test per press. Candidates come from the R-tree,
//! so the cost is O(log n) plus the exact test on the few items under the
//! pointer.
//!
//! Enable profiling with `cargo build --features profiling` to see timing.

use super::coords::CoordinateConverter;
use super::payload::DragPayload;
use super::pointer::{PointerButton, PointerEvent};
use crate::editor::LayoutEditor;
use crate::error::LayoutResult;
use crate::geometry::Point;
use crate::hit_testing::{hit_calibration_endpoint, hit_test_profiled};
use crate::profile_scope;
use crate::types::EquipmentDefinition;
use tracing::{debug, warn};

impl LayoutEditor {
    /// Route a pointer press on the canvas. Returns true if it was consumed.
    pub fn handle_pointer_down(&mut self, event: &PointerEvent) -> bool {
        profile_scope!("handle_pointer_down");

        if !self.surface.contains(event.position) {
            return false;
        }
        let ctx = self.coords();
        let surface_pos = CoordinateConverter::window_to_surface(event.position, &ctx);
        let canvas_pos = CoordinateConverter::window_to_canvas(event.position, &ctx);

        // Calibration clicks take priority over everything on the canvas
        if self.calibration.is_awaiting_point() {
            if !event.is_primary() {
                return false;
            }
            if let Err(e) = self.calibration.place_point(canvas_pos) {
                warn!(error = %e, "Calibration point rejected");
                return false;
            }
            self.mark_dirty();
            return true;
        }

        if self.calibration.endpoints_draggable() && event.is_primary() {
            let endpoint = self
                .calibration
                .line()
                .and_then(|line| hit_calibration_endpoint(line, &self.view, surface_pos));
            if let Some(endpoint) = endpoint {
                debug!(?endpoint, "Calibration endpoint grabbed");
                self.canvas_input.start_endpoint_drag(endpoint);
                return true;
            }
        }

        if self.measure.is_active() && event.is_primary() {
            let unit = self.settings.measurement_unit;
            match self.measure.add_point(canvas_pos, self.real_scale(), unit) {
                Ok(Some(measurement)) => debug!(label = %measurement.label(), "Measured"),
                Ok(None) => {}
                Err(e) => warn!(error = %e, "Measure point rejected"),
            }
            self.mark_dirty();
            return true;
        }

        if event.button == PointerButton::Middle {
            self.canvas_input.start_panning(event.position);
            return true;
        }
        if !event.is_primary() {
            return false;
        }

        match hit_test_profiled(&self.store, canvas_pos, Some(&mut self.hit_profiler)) {
            Some(id) => {
                // Selection happens on press, before click/drag is known
                if let Err(e) = self.store.select(Some(&id)) {
                    warn!(error = %e, "Selection failed");
                    return false;
                }
                let grab_offset = self
                    .store
                    .get(&id)
                    .map(|item| canvas_pos - item.position)
                    .unwrap_or(Point::ORIGIN);
                self.orchestrator
                    .begin_drag(DragPayload::Placed(id), event, grab_offset);
            }
            None => {
                if let Err(e) = self.store.select(None) {
                    warn!(error = %e, "Deselect failed");
                }
                self.canvas_input.start_panning(event.position);
            }
        }
        self.mark_dirty();
        true
    }

    /// Start dragging a catalog entry from the sidebar.
    pub fn begin_sidebar_drag(&mut self, definition: EquipmentDefinition, event: &PointerEvent) -> bool {
        self.orchestrator
            .begin_drag(DragPayload::definition(definition), event, Point::ORIGIN)
    }

    /// Start a drag from transfer data handed across a UI boundary.
    ///
    /// Malformed data is rejected and no session starts.
    pub fn begin_transfer_drag(&mut self, data: &str, event: &PointerEvent) -> LayoutResult<bool> {
        let payload = DragPayload::from_transfer_data(data).inspect_err(|e| {
            warn!(error = %e, "Ignoring malformed drag payload");
        })?;
        Ok(self.orchestrator.begin_drag(payload, event, Point::ORIGIN))
    }
}
