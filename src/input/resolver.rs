//! Click-versus-drag resolution over unified pointer events.

use super::payload::{DragPayload, DragSource};
use super::pointer::{InputDevice, ListenerPair, PointerEvent};
use super::state::{DragSession, GestureState};
use crate::constants::DRAG_THRESHOLD;
use crate::geometry::Point;
use tracing::{debug, trace, warn};

/// Result of feeding a move event to the resolver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GestureUpdate {
    /// No session, or the event came from the other device
    Ignored,
    /// Still below the threshold
    Pending,
    /// This move crossed the threshold
    DragStarted,
    /// Already dragging; position updated
    Dragged,
}

/// How a session ended.
#[derive(Debug, Clone, PartialEq)]
pub enum GestureEnd {
    /// Released below the threshold
    Click(DragSession),
    /// Released after dragging; `session.current` is the release position
    Drop(DragSession),
    /// Escape or explicit cancel
    Cancelled(DragSession),
}

impl GestureEnd {
    pub fn session(&self) -> &DragSession {
        match self {
            GestureEnd::Click(s) | GestureEnd::Drop(s) | GestureEnd::Cancelled(s) => s,
        }
    }
}

#[derive(Debug)]
pub struct GestureResolver {
    state: GestureState,
    threshold: f64,
}

impl Default for GestureResolver {
    fn default() -> Self {
        Self::new(DRAG_THRESHOLD)
    }
}

impl GestureResolver {
    pub fn new(threshold: f64) -> Self {
        let threshold = if threshold.is_finite() && threshold >= 0.0 {
            threshold
        } else {
            warn!(threshold, "Invalid drag threshold, using default");
            DRAG_THRESHOLD
        };
        Self {
            state: GestureState::Idle,
            threshold,
        }
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    pub fn set_threshold(&mut self, threshold: f64) {
        if threshold.is_finite() && threshold >= 0.0 {
            self.threshold = threshold;
        } else {
            warn!(threshold, "Rejected invalid drag threshold");
        }
    }

    pub fn state(&self) -> &GestureState {
        &self.state
    }

    /// Listener pair the host should have installed right now.
    pub fn active_listeners(&self) -> Option<ListenerPair> {
        self.state.device().map(|d| d.listeners())
    }

    /// Start a session. Returns false if the event cannot start one.
    pub fn pointer_down(
        &mut self,
        event: &PointerEvent,
        payload: DragPayload,
        grab_offset: Point,
    ) -> bool {
        if !self.state.is_idle() {
            trace!("Pointer down ignored, session already running");
            return false;
        }
        if !event.is_primary() || !event.position.is_finite() {
            return false;
        }
        let source = payload.source();
        if source == DragSource::Sidebar && !event.target.is_valid_drag_target() {
            trace!(target = ?event.target, "Not a valid drag target");
            return false;
        }

        self.state = GestureState::Armed(DragSession {
            payload,
            source,
            device: event.device,
            origin: event.position,
            current: event.position,
            grab_offset,
        });
        debug!(?source, device = ?event.device, "Gesture armed");
        true
    }

    pub fn pointer_move(&mut self, event: &PointerEvent) -> GestureUpdate {
        let threshold = self.threshold;
        if !self.accepts(event) {
            return GestureUpdate::Ignored;
        }
        let Some(session) = self.state.session_mut() else {
            return GestureUpdate::Ignored;
        };
        session.current = event.position;

        if self.state.is_dragging() {
            return GestureUpdate::Dragged;
        }
        let travel = self.state.session().map(DragSession::travel).unwrap_or(0.0);
        if travel >= threshold {
            self.state.promote();
            debug!(travel, "Drag started");
            GestureUpdate::DragStarted
        } else {
            GestureUpdate::Pending
        }
    }

    /// End the session. `None` when there is no session for this device.
    pub fn pointer_up(&mut self, event: &PointerEvent) -> Option<GestureEnd> {
        if !self.accepts(event) {
            return None;
        }
        if let Some(session) = self.state.session_mut() {
            session.current = event.position;
        }
        let threshold = self.threshold;
        match self.state.take() {
            GestureState::Armed(session) if session.travel() < threshold => {
                debug!("Gesture resolved as click");
                Some(GestureEnd::Click(session))
            }
            GestureState::Armed(session) | GestureState::Dragging(session) => {
                debug!(x = session.current.x, y = session.current.y, "Gesture resolved as drop");
                Some(GestureEnd::Drop(session))
            }
            GestureState::Idle => None,
        }
    }

    /// Abort the session without a click or drop.
    pub fn cancel(&mut self) -> Option<GestureEnd> {
        match self.state.take() {
            GestureState::Armed(session) | GestureState::Dragging(session) => {
                debug!("Gesture cancelled");
                Some(GestureEnd::Cancelled(session))
            }
            GestureState::Idle => None,
        }
    }

    /// Events from the device that owns the session, with a usable position.
    fn accepts(&self, event: &PointerEvent) -> bool {
        match self.state.device() {
            Some(device) if device == event.device => {
                if !event.position.is_finite() {
                    warn!("Ignoring pointer event with non-finite position");
                    return false;
                }
                // Extra touch points never drive a session.
                !(device == InputDevice::Touch && event.touch_index != 0)
            }
            _ => false,
        }
    }
}
