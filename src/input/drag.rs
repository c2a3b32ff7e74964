//! Pointer move handling - panning, calibration endpoint drags, drag sessions.
//!
//! ## Performance Notes
//!
//! Moves arrive at display rate while a button is held. Nothing here touches
//! the store: a canvas drag only updates the session, and the render loop
//! draws the item at the session position until the drop.

use super::coords::CoordinateConverter;
use super::pointer::PointerEvent;
use super::resolver::GestureUpdate;
use crate::editor::LayoutEditor;
use crate::profile_scope;
use tracing::warn;

impl LayoutEditor {
    /// Route a pointer move. Returns true if a redraw is needed.
    pub fn handle_pointer_move(&mut self, event: &PointerEvent) -> bool {
        profile_scope!("handle_pointer_move");

        if let Some(delta) = self.canvas_input.pan_to(event.position) {
            if self.view.pan_by(delta) {
                self.mark_dirty();
                return true;
            }
            return false;
        }

        if let Some(endpoint) = self.canvas_input.dragged_endpoint() {
            let canvas_pos = CoordinateConverter::window_to_canvas(event.position, &self.coords());
            match self.calibration.move_endpoint(endpoint, canvas_pos) {
                Ok(()) => {
                    self.mark_dirty();
                    return true;
                }
                Err(e) => {
                    warn!(error = %e, "Calibration endpoint move rejected");
                    self.canvas_input.reset();
                    return false;
                }
            }
        }

        match self.orchestrator.update_position(event) {
            GestureUpdate::DragStarted | GestureUpdate::Dragged => {
                self.mark_dirty();
                true
            }
            GestureUpdate::Pending | GestureUpdate::Ignored => false,
        }
    }
}
