//! Shared drag orchestration.
//!
//! `DragOrchestrator` is a cloneable handle around one `GestureResolver`. The
//! sidebar and the canvas each hold a clone, so a drag that starts in one and
//! ends in the other is a single session. Drops resolve synchronously at
//! pointer-up against a `DropTarget`.

use super::payload::DragPayload;
use super::pointer::{ListenerPair, PointerEvent};
use super::resolver::{GestureEnd, GestureResolver, GestureUpdate};
use super::state::{DragSession, GestureState};
use crate::error::LayoutError;
use crate::error::LayoutResult;
use crate::geometry::{Bounds, Point};
use crate::types::{EquipmentDefinition, InstanceId};
use parking_lot::Mutex;
use std::sync::Arc;
use tracing::{debug, warn};

/// Receiver of drops; implemented by the layout editor.
pub trait DropTarget {
    /// Window-space rectangle of the canvas surface
    fn surface_rect(&self) -> Bounds;

    fn window_to_canvas(&self, window_pos: Point) -> Point;

    /// Canvas position used for click-to-place before any drop happened
    fn default_placement(&self) -> Point;

    fn place(&mut self, definition: &EquipmentDefinition, at: Point) -> LayoutResult<InstanceId>;

    fn relocate(&mut self, id: &InstanceId, at: Point) -> LayoutResult<()>;
}

/// What pointer-up did.
#[derive(Debug, Clone, PartialEq)]
pub enum DropOutcome {
    /// A catalog entry was placed
    Placed(InstanceId),
    /// A placed item was moved
    Moved(InstanceId),
    /// A placed item was clicked without moving; selection only
    Clicked(InstanceId),
    /// Released outside the canvas; nothing changed
    Missed,
    Cancelled,
    /// The target refused the drop
    Rejected(LayoutError),
    /// No session for this event
    NoSession,
}

impl DropOutcome {
    /// The drop changed the layout.
    pub fn is_mutation(&self) -> bool {
        matches!(self, DropOutcome::Placed(_) | DropOutcome::Moved(_))
    }
}

#[derive(Debug, Default)]
struct Inner {
    resolver: GestureResolver,
    last_drop: Option<Point>,
}

#[derive(Debug, Clone, Default)]
pub struct DragOrchestrator {
    inner: Arc<Mutex<Inner>>,
}

impl DragOrchestrator {
    pub fn new(threshold: f64) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Inner {
                resolver: GestureResolver::new(threshold),
                last_drop: None,
            })),
        }
    }

    pub fn set_threshold(&self, threshold: f64) {
        self.inner.lock().resolver.set_threshold(threshold);
    }

    /// Start a session for `payload`. `grab_offset` is the canvas offset from
    /// the item center to the pointer (zero for catalog entries).
    pub fn begin_drag(&self, payload: DragPayload, event: &PointerEvent, grab_offset: Point) -> bool {
        self.inner.lock().resolver.pointer_down(event, payload, grab_offset)
    }

    pub fn update_position(&self, event: &PointerEvent) -> GestureUpdate {
        self.inner.lock().resolver.pointer_move(event)
    }

    /// Finish the session at pointer-up and apply it to `target`.
    pub fn resolve_drop<T: DropTarget + ?Sized>(&self, event: &PointerEvent, target: &mut T) -> DropOutcome {
        let (end, last_drop) = {
            let mut inner = self.inner.lock();
            (inner.resolver.pointer_up(event), inner.last_drop)
        };
        let Some(end) = end else {
            return DropOutcome::NoSession;
        };

        let outcome = match end {
            GestureEnd::Click(session) => match session.payload {
                DragPayload::Definition(def) => {
                    let at = last_drop.unwrap_or_else(|| target.default_placement());
                    place(target, &def, at)
                }
                DragPayload::Placed(id) => DropOutcome::Clicked(id),
            },
            GestureEnd::Drop(session) => self.apply_drop(session, target),
            GestureEnd::Cancelled(_) => DropOutcome::Cancelled,
        };
        debug!(?outcome, "Gesture resolved");
        outcome
    }

    fn apply_drop<T: DropTarget + ?Sized>(&self, session: DragSession, target: &mut T) -> DropOutcome {
        if !target.surface_rect().contains(session.current) {
            debug!(x = session.current.x, y = session.current.y, "Drop outside canvas");
            return DropOutcome::Missed;
        }
        let at = target.window_to_canvas(session.current) - session.grab_offset;
        if !at.is_finite() {
            warn!("Drop position is not finite");
            return DropOutcome::Rejected(LayoutError::NonFinite { field: "drop position" });
        }
        let outcome = match session.payload {
            DragPayload::Definition(def) => place(target, &def, at),
            DragPayload::Placed(id) => match target.relocate(&id, at) {
                Ok(()) => DropOutcome::Moved(id),
                Err(e) => DropOutcome::Rejected(e),
            },
        };
        if outcome.is_mutation() {
            self.inner.lock().last_drop = Some(at);
        }
        outcome
    }

    /// Abort the running session, if any.
    pub fn cancel(&self) -> bool {
        self.inner.lock().resolver.cancel().is_some()
    }

    pub fn state(&self) -> GestureState {
        self.inner.lock().resolver.state().clone()
    }

    pub fn session(&self) -> Option<DragSession> {
        self.inner.lock().resolver.state().session().cloned()
    }

    pub fn is_dragging(&self) -> bool {
        self.inner.lock().resolver.state().is_dragging()
    }

    pub fn is_idle(&self) -> bool {
        self.inner.lock().resolver.state().is_idle()
    }

    pub fn active_listeners(&self) -> Option<ListenerPair> {
        self.inner.lock().resolver.active_listeners()
    }

    pub fn last_drop(&self) -> Option<Point> {
        self.inner.lock().last_drop
    }
}

fn place<T: DropTarget + ?Sized>(target: &mut T, def: &EquipmentDefinition, at: Point) -> DropOutcome {
    match target.place(def, at) {
        Ok(id) => DropOutcome::Placed(id),
        Err(e) => {
            warn!(error = %e, "Placement rejected");
            DropOutcome::Rejected(e)
        }
    }
}
