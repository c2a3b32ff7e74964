//! Pointer, wheel, and key input for the layout editor.
//!
//! ## Architecture
//!
//! Drags use one explicit state machine (`GestureState`) driven by a
//! `GestureResolver`. The resolver lives behind a `DragOrchestrator` handle
//! that the sidebar and the canvas share, so a catalog drag and a canvas move
//! are the same kind of session. Canvas-only interactions (panning,
//! calibration handle drags) use the separate `CanvasInput` state.
//!
//! ## Modules
//!
//! - `pointer` - Unified mouse/touch event and listener pairs
//! - `payload` - What a drag carries, and cross-boundary transfer data
//! - `state` - Gesture and canvas state machines
//! - `resolver` - Click vs drag resolution by travel threshold
//! - `orchestrator` - Shared drag handle and synchronous drop resolution
//! - `preview` - Floating drag preview sizing
//! - `coords` - Window, surface, and canvas conversions
//! - `mouse_down` - Pointer down routing (calibration, measure, select, pan)
//! - `drag` - Pointer move handling (pan, endpoint drag, drag updates)
//! - `mouse_up` - Pointer up handling (drop, click, end pan)
//! - `transform` - Wheel and button zoom, fit to content, keys

pub mod coords;
mod drag;
mod mouse_down;
mod mouse_up;
mod orchestrator;
mod payload;
mod pointer;
mod preview;
mod resolver;
mod state;
mod transform;

pub use orchestrator::{DragOrchestrator, DropOutcome, DropTarget};
pub use payload::{DragPayload, DragSource};
pub use pointer::{InputDevice, Key, ListenerPair, PointerButton, PointerEvent, TargetKind};
pub use preview::{DragPreview, preview_size};
pub use resolver::{GestureEnd, GestureResolver, GestureUpdate};
pub use state::{CanvasInput, DragSession, GestureState};
