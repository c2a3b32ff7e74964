//! Canvas transformations - wheel and button zoom, fit to content, key commands.

use super::coords::CoordinateConverter;
use super::pointer::Key;
use crate::editor::LayoutEditor;
use crate::geometry::Point;
use tracing::debug;

impl LayoutEditor {
    /// Convert a window position to canvas space.
    pub fn window_to_canvas(&self, pos: Point) -> Point {
        CoordinateConverter::window_to_canvas(pos, &self.coords())
    }

    /// Convert a canvas position to window space.
    pub fn canvas_to_window(&self, pos: Point) -> Point {
        CoordinateConverter::canvas_to_window(pos, &self.coords())
    }

    /// Wheel zoom around the pointer (window coordinates).
    pub fn handle_wheel(&mut self, delta_y: f64, position: Point) -> bool {
        if !self.surface.contains(position) {
            return false;
        }
        let anchor = CoordinateConverter::window_to_surface(position, &self.coords());
        self.apply_view_change(|view| view.wheel_zoom(delta_y, anchor))
    }

    pub fn zoom_in(&mut self) -> bool {
        let anchor = self.surface_size().center();
        self.apply_view_change(|view| view.zoom_in(anchor))
    }

    pub fn zoom_out(&mut self) -> bool {
        let anchor = self.surface_size().center();
        self.apply_view_change(|view| view.zoom_out(anchor))
    }

    /// Jump to the maximum zoom around the surface center.
    pub fn max_out(&mut self) -> bool {
        let anchor = self.surface_size().center();
        self.apply_view_change(|view| view.max_out(anchor))
    }

    /// Set zoom and pan directly. The scale is clamped to the configured bounds;
    /// an invalid scale or offset leaves the view as it was.
    pub fn set_view(&mut self, scale: f64, offset: Point) -> bool {
        self.apply_view_change(|view| view.set_view(scale, offset))
    }

    pub fn reset_view(&mut self) {
        self.view.reset();
        self.mark_dirty();
    }

    /// Zoom and pan so every placed item is visible.
    pub fn fit_to_content(&mut self) -> bool {
        let bounds = self.store.item_bounds();
        let viewport = self.surface_size();
        let padding = self.settings.fit_padding;
        self.apply_view_change(|view| view.fit_to_content(&bounds, viewport, padding))
    }

    /// Key commands. Returns true if the key was consumed.
    pub fn handle_key(&mut self, key: Key) -> bool {
        match key {
            Key::Escape => {
                let cancelled = self.orchestrator.cancel();
                let calibrating = self.calibration.is_active();
                let measuring = self.measure.is_active();
                let interacting = !self.canvas_input.is_idle();
                if calibrating {
                    self.calibration.cancel();
                }
                if measuring {
                    self.measure.deactivate();
                }
                self.canvas_input.reset();
                let consumed = cancelled || calibrating || measuring || interacting;
                if consumed {
                    debug!(cancelled, calibrating, measuring, "Escape");
                    self.mark_dirty();
                }
                consumed
            }
            Key::Delete | Key::Backspace => {
                // Deleting mid-drag would leave the session pointing at nothing
                if !self.orchestrator.is_idle() {
                    return false;
                }
                self.store.remove_selected().is_some()
            }
            Key::Other => false,
        }
    }

    fn apply_view_change(&mut self, change: impl FnOnce(&mut crate::viewport::ViewTransform) -> bool) -> bool {
        let changed = change(&mut self.view);
        if changed {
            self.mark_dirty();
        }
        changed
    }
}
