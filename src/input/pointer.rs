//! Device-independent pointer events.
//!
//! Mouse and touch input are both lowered to `PointerEvent` by the host. Only
//! the primary mouse button and the first touch point can start a gesture.

use crate::geometry::Point;

/// Device that produced an event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputDevice {
    Mouse,
    Touch,
}

impl InputDevice {
    /// Global listener pair to install while a gesture from this device runs.
    pub fn listeners(&self) -> ListenerPair {
        match self {
            InputDevice::Mouse => ListenerPair::MOUSE,
            InputDevice::Touch => ListenerPair::TOUCH,
        }
    }
}

/// Move/end event names a host subscribes to for one gesture session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListenerPair {
    pub move_event: &'static str,
    pub end_event: &'static str,
}

impl ListenerPair {
    pub const MOUSE: ListenerPair = ListenerPair { move_event: "mousemove", end_event: "mouseup" };
    pub const TOUCH: ListenerPair = ListenerPair { move_event: "touchmove", end_event: "touchend" };
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerButton {
    Primary,
    Middle,
    Secondary,
}

/// What the pointer was over when the event fired.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TargetKind {
    /// Ordinary UI element (sidebar card, toolbar)
    #[default]
    Element,
    /// The canvas rendering surface itself
    RenderSurface,
    /// A node owned by the graphics library
    GraphicsNode,
}

impl TargetKind {
    /// Sidebar drags may not start on the render surface or its internals.
    pub fn is_valid_drag_target(&self) -> bool {
        matches!(self, TargetKind::Element)
    }
}

/// A pointer event in window coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    pub device: InputDevice,
    pub button: PointerButton,
    /// Index of the touch point; always 0 for mouse input
    pub touch_index: u32,
    pub position: Point,
    pub target: TargetKind,
}

impl PointerEvent {
    pub fn mouse(position: Point) -> Self {
        Self {
            device: InputDevice::Mouse,
            button: PointerButton::Primary,
            touch_index: 0,
            position,
            target: TargetKind::Element,
        }
    }

    pub fn touch(position: Point) -> Self {
        Self {
            device: InputDevice::Touch,
            button: PointerButton::Primary,
            touch_index: 0,
            position,
            target: TargetKind::Element,
        }
    }

    pub fn with_button(mut self, button: PointerButton) -> Self {
        self.button = button;
        self
    }

    pub fn with_touch_index(mut self, index: u32) -> Self {
        self.touch_index = index;
        self
    }

    pub fn on(mut self, target: TargetKind) -> Self {
        self.target = target;
        self
    }

    /// Primary mouse button or first touch point.
    pub fn is_primary(&self) -> bool {
        match self.device {
            InputDevice::Mouse => self.button == PointerButton::Primary,
            InputDevice::Touch => self.touch_index == 0,
        }
    }
}

/// Keys the editor reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Escape,
    Delete,
    Backspace,
    Other,
}
