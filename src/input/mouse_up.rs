//! Pointer up handling - finish pans and endpoint drags, resolve drops.

use super::orchestrator::DropOutcome;
use super::pointer::PointerEvent;
use crate::editor::LayoutEditor;
use crate::profile_scope;
use tracing::debug;

impl LayoutEditor {
    /// Route a pointer release.
    ///
    /// Pans and calibration drags end with `DropOutcome::NoSession`; drag
    /// sessions resolve against this editor as the drop target.
    pub fn handle_pointer_up(&mut self, event: &PointerEvent) -> DropOutcome {
        profile_scope!("handle_pointer_up");

        if !self.canvas_input.is_idle() {
            debug!(input = ?self.canvas_input, "Canvas interaction finished");
            self.canvas_input.reset();
            self.mark_dirty();
            return DropOutcome::NoSession;
        }

        let orchestrator = self.orchestrator.clone();
        let outcome = orchestrator.resolve_drop(event, self);
        if outcome != DropOutcome::NoSession {
            self.mark_dirty();
        }
        outcome
    }
}
