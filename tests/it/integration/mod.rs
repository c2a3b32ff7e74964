//! Integration tests for LotPlanner.
//!
//! These drive `LayoutEditor` the way a host would: pointer, wheel, and key
//! events in window coordinates, then inspect the store, view, and frame.

mod drag_drop_tests;
mod editor_workflow_tests;
