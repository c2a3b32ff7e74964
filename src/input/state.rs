//! Input state machines.
//!
//! `GestureState` is the single drag state machine shared by the sidebar and
//! the canvas. `CanvasInput` covers canvas-only interactions that never leave
//! the canvas (panning, calibration handle drags).
//!
//! ## Gesture transitions
//!
//! ```text
//! Idle -> Armed          (primary pointer down on a valid target)
//! Armed -> Armed         (move below the drag threshold)
//! Armed -> Dragging      (move reaches the threshold)
//! Dragging -> Dragging   (move)
//! Armed -> Idle          (pointer up: click)
//! Dragging -> Idle       (pointer up: drop)
//! Armed|Dragging -> Idle (Escape or cancel)
//! ```

use super::payload::{DragPayload, DragSource};
use super::pointer::InputDevice;
use crate::calibration::Endpoint;
use crate::geometry::Point;

/// One press-move-release sequence.
#[derive(Debug, Clone, PartialEq)]
pub struct DragSession {
    pub payload: DragPayload,
    pub source: DragSource,
    /// Device whose listener pair is installed
    pub device: InputDevice,
    /// Window position of the press
    pub origin: Point,
    /// Latest window position
    pub current: Point,
    /// Canvas offset from the item center to the pointer at press time
    pub grab_offset: Point,
}

impl DragSession {
    pub fn travel(&self) -> f64 {
        self.origin.distance_to(self.current)
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum GestureState {
    #[default]
    Idle,
    /// Pressed, not yet past the threshold
    Armed(DragSession),
    /// Past the threshold
    Dragging(DragSession),
}

impl GestureState {
    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }

    pub fn is_armed(&self) -> bool {
        matches!(self, Self::Armed(_))
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self, Self::Dragging(_))
    }

    pub fn session(&self) -> Option<&DragSession> {
        match self {
            Self::Armed(s) | Self::Dragging(s) => Some(s),
            Self::Idle => None,
        }
    }

    pub fn session_mut(&mut self) -> Option<&mut DragSession> {
        match self {
            Self::Armed(s) | Self::Dragging(s) => Some(s),
            Self::Idle => None,
        }
    }

    /// Device of the running session
    pub fn device(&self) -> Option<InputDevice> {
        self.session().map(|s| s.device)
    }

    /// Move Armed to Dragging; other states are unchanged.
    pub fn promote(&mut self) {
        if let Self::Armed(session) = std::mem::take(self) {
            *self = Self::Dragging(session);
        }
    }

    /// End the session, returning whatever it held.
    pub fn take(&mut self) -> GestureState {
        std::mem::take(self)
    }

    pub fn reset(&mut self) {
        *self = Self::Idle;
    }
}

/// Canvas-local interactions outside the drag state machine.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum CanvasInput {
    #[default]
    Idle,
    /// Empty-canvas or middle-button pan
    Panning { last_pos: Point },
    /// Dragging a calibration endpoint
    DraggingEndpoint { endpoint: Endpoint },
}

impl CanvasInput {
    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }

    pub fn is_panning(&self) -> bool {
        matches!(self, Self::Panning { .. })
    }

    pub fn dragged_endpoint(&self) -> Option<Endpoint> {
        match self {
            Self::DraggingEndpoint { endpoint } => Some(*endpoint),
            _ => None,
        }
    }

    pub fn start_panning(&mut self, pos: Point) {
        *self = Self::Panning { last_pos: pos };
    }

    /// Record a new pan position, returning the delta since the last one.
    pub fn pan_to(&mut self, pos: Point) -> Option<Point> {
        match self {
            Self::Panning { last_pos } => {
                let delta = pos - *last_pos;
                *last_pos = pos;
                Some(delta)
            }
            _ => None,
        }
    }

    pub fn start_endpoint_drag(&mut self, endpoint: Endpoint) {
        *self = Self::DraggingEndpoint { endpoint };
    }

    pub fn reset(&mut self) {
        *self = Self::Idle;
    }
}
