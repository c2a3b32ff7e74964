//! Unit tests for the gesture resolver and the shared drag orchestrator.

use crate::helpers::{assert_point_eq, def, mouse, touch};
use lotplanner::LayoutResult;
use lotplanner::geometry::{Bounds, Point};
use lotplanner::input::{
    DragOrchestrator, DragPayload, DropOutcome, DropTarget, GestureEnd, GestureResolver,
    GestureUpdate, ListenerPair, TargetKind,
};
use lotplanner::types::{EquipmentDefinition, InstanceId};

/// Drop target that records calls. Surface is 800 x 600 at (200, 0), identity view.
#[derive(Default)]
struct RecordingTarget {
    placed: Vec<(String, Point)>,
    relocated: Vec<(InstanceId, Point)>,
}

impl DropTarget for RecordingTarget {
    fn surface_rect(&self) -> Bounds {
        Bounds::new(Point::new(200.0, 0.0), Point::new(1000.0, 600.0))
    }

    fn window_to_canvas(&self, window_pos: Point) -> Point {
        Point::new(window_pos.x - 200.0, window_pos.y)
    }

    fn default_placement(&self) -> Point {
        Point::new(400.0, 300.0)
    }

    fn place(&mut self, definition: &EquipmentDefinition, at: Point) -> LayoutResult<InstanceId> {
        self.placed.push((definition.id.clone(), at));
        Ok(InstanceId::from(format!("{}-{}", definition.id, self.placed.len()).as_str()))
    }

    fn relocate(&mut self, id: &InstanceId, at: Point) -> LayoutResult<()> {
        self.relocated.push((id.clone(), at));
        Ok(())
    }
}

fn sidebar_payload() -> DragPayload {
    DragPayload::definition(def("game-001"))
}

// ============================================================================
// Resolver
// ============================================================================

#[test]
fn test_threshold_is_inclusive() {
    let mut resolver = GestureResolver::new(5.0);
    assert!(resolver.pointer_down(&mouse(0.0, 0.0), sidebar_payload(), Point::ORIGIN));

    assert_eq!(resolver.pointer_move(&mouse(2.0, 2.0)), GestureUpdate::Pending);
    assert_eq!(resolver.pointer_move(&mouse(3.0, 4.0)), GestureUpdate::DragStarted);
    assert_eq!(resolver.pointer_move(&mouse(30.0, 40.0)), GestureUpdate::Dragged);
}

#[test]
fn test_release_below_threshold_is_click() {
    let mut resolver = GestureResolver::new(5.0);
    resolver.pointer_down(&mouse(10.0, 10.0), sidebar_payload(), Point::ORIGIN);

    let end = resolver.pointer_up(&mouse(13.0, 10.0));

    assert!(matches!(end, Some(GestureEnd::Click(_))));
    assert!(resolver.state().is_idle());
}

#[test]
fn test_release_at_threshold_is_drop() {
    let mut resolver = GestureResolver::new(5.0);
    resolver.pointer_down(&mouse(10.0, 10.0), sidebar_payload(), Point::ORIGIN);

    let end = resolver.pointer_up(&mouse(15.0, 10.0));

    assert!(matches!(end, Some(GestureEnd::Drop(_))));
}

#[test]
fn test_sidebar_drag_rejected_on_render_surface() {
    let mut resolver = GestureResolver::new(5.0);
    let on_canvas = mouse(0.0, 0.0).on(TargetKind::RenderSurface);
    let on_node = mouse(0.0, 0.0).on(TargetKind::GraphicsNode);

    assert!(!resolver.pointer_down(&on_canvas, sidebar_payload(), Point::ORIGIN));
    assert!(!resolver.pointer_down(&on_node, sidebar_payload(), Point::ORIGIN));
    assert!(resolver.state().is_idle());
}

#[test]
fn test_only_primary_starts() {
    use lotplanner::input::PointerButton;

    let mut resolver = GestureResolver::new(5.0);
    let right = mouse(0.0, 0.0).with_button(PointerButton::Secondary);
    let second_finger = touch(0.0, 0.0).with_touch_index(1);

    assert!(!resolver.pointer_down(&right, sidebar_payload(), Point::ORIGIN));
    assert!(!resolver.pointer_down(&second_finger, sidebar_payload(), Point::ORIGIN));
}

#[test]
fn test_session_follows_starting_device() {
    let mut resolver = GestureResolver::new(5.0);
    resolver.pointer_down(&touch(0.0, 0.0), sidebar_payload(), Point::ORIGIN);
    assert_eq!(resolver.active_listeners(), Some(ListenerPair::TOUCH));

    assert_eq!(resolver.pointer_move(&mouse(100.0, 100.0)), GestureUpdate::Ignored);
    assert!(resolver.pointer_up(&mouse(100.0, 100.0)).is_none());
    assert!(resolver.state().is_armed());

    assert!(resolver.pointer_up(&touch(1.0, 0.0)).is_some());
    assert_eq!(resolver.active_listeners(), None);
}

#[test]
fn test_second_press_ignored_while_running() {
    let mut resolver = GestureResolver::new(5.0);
    assert!(resolver.pointer_down(&mouse(0.0, 0.0), sidebar_payload(), Point::ORIGIN));
    assert!(!resolver.pointer_down(&mouse(50.0, 50.0), sidebar_payload(), Point::ORIGIN));
    assert_point_eq(resolver.state().session().unwrap().origin, (0.0, 0.0));
}

// ============================================================================
// Orchestrator
// ============================================================================

#[test]
fn test_drop_inside_surface_places() {
    let orchestrator = DragOrchestrator::new(5.0);
    let mut target = RecordingTarget::default();
    orchestrator.begin_drag(sidebar_payload(), &mouse(50.0, 50.0), Point::ORIGIN);
    orchestrator.update_position(&mouse(500.0, 200.0));

    let outcome = orchestrator.resolve_drop(&mouse(500.0, 200.0), &mut target);

    assert!(matches!(outcome, DropOutcome::Placed(_)));
    assert_eq!(target.placed.len(), 1);
    assert_point_eq(target.placed[0].1, (300.0, 200.0));
    assert_eq!(orchestrator.last_drop(), Some(Point::new(300.0, 200.0)));
}

#[test]
fn test_drop_outside_surface_misses() {
    let orchestrator = DragOrchestrator::new(5.0);
    let mut target = RecordingTarget::default();
    orchestrator.begin_drag(sidebar_payload(), &mouse(50.0, 50.0), Point::ORIGIN);
    orchestrator.update_position(&mouse(100.0, 300.0));

    let outcome = orchestrator.resolve_drop(&mouse(100.0, 300.0), &mut target);

    assert_eq!(outcome, DropOutcome::Missed);
    assert!(target.placed.is_empty());
    assert!(orchestrator.is_idle());
}

#[test]
fn test_click_places_at_last_drop_then_default() {
    let orchestrator = DragOrchestrator::new(5.0);
    let mut target = RecordingTarget::default();

    orchestrator.begin_drag(sidebar_payload(), &mouse(50.0, 50.0), Point::ORIGIN);
    orchestrator.resolve_drop(&mouse(51.0, 50.0), &mut target);
    assert_point_eq(target.placed[0].1, (400.0, 300.0));

    orchestrator.begin_drag(sidebar_payload(), &mouse(50.0, 50.0), Point::ORIGIN);
    orchestrator.resolve_drop(&mouse(700.0, 100.0), &mut target);
    assert_point_eq(target.placed[1].1, (500.0, 100.0));

    orchestrator.begin_drag(sidebar_payload(), &mouse(50.0, 50.0), Point::ORIGIN);
    orchestrator.resolve_drop(&mouse(50.0, 50.0), &mut target);
    assert_point_eq(target.placed[2].1, (500.0, 100.0));
}

#[test]
fn test_canvas_drop_keeps_grab_offset() {
    let orchestrator = DragOrchestrator::new(5.0);
    let mut target = RecordingTarget::default();
    let id = InstanceId::from("game-001-1");
    orchestrator.begin_drag(DragPayload::Placed(id.clone()), &mouse(310.0, 105.0), Point::new(10.0, 5.0));
    orchestrator.update_position(&mouse(410.0, 305.0));

    let outcome = orchestrator.resolve_drop(&mouse(410.0, 305.0), &mut target);

    assert_eq!(outcome, DropOutcome::Moved(id.clone()));
    assert_eq!(target.relocated.len(), 1);
    assert_eq!(target.relocated[0].0, id);
    assert_point_eq(target.relocated[0].1, (200.0, 300.0));
}

#[test]
fn test_canvas_click_selects_only() {
    let orchestrator = DragOrchestrator::new(5.0);
    let mut target = RecordingTarget::default();
    let id = InstanceId::from("game-001-1");
    orchestrator.begin_drag(DragPayload::Placed(id.clone()), &mouse(300.0, 100.0), Point::ORIGIN);

    let outcome = orchestrator.resolve_drop(&mouse(302.0, 100.0), &mut target);

    assert_eq!(outcome, DropOutcome::Clicked(id));
    assert!(target.relocated.is_empty());
}

#[test]
fn test_clones_share_one_session() {
    let sidebar = DragOrchestrator::new(5.0);
    let canvas = sidebar.clone();
    let mut target = RecordingTarget::default();

    sidebar.begin_drag(sidebar_payload(), &mouse(50.0, 50.0), Point::ORIGIN);
    assert_eq!(canvas.update_position(&mouse(400.0, 100.0)), GestureUpdate::DragStarted);
    assert!(sidebar.is_dragging());

    assert!(matches!(canvas.resolve_drop(&mouse(400.0, 100.0), &mut target), DropOutcome::Placed(_)));
    assert!(sidebar.is_idle());
}

#[test]
fn test_cancel_then_release_does_nothing() {
    let orchestrator = DragOrchestrator::new(5.0);
    let mut target = RecordingTarget::default();
    orchestrator.begin_drag(sidebar_payload(), &mouse(50.0, 50.0), Point::ORIGIN);
    orchestrator.update_position(&mouse(400.0, 100.0));

    assert!(orchestrator.cancel());
    assert_eq!(orchestrator.resolve_drop(&mouse(400.0, 100.0), &mut target), DropOutcome::NoSession);
    assert!(target.placed.is_empty());
}

#[test]
fn test_transfer_data_parsing() {
    assert!(matches!(
        DragPayload::from_transfer_data(r#"{"equipment_id":"ride-003"}"#),
        Ok(DragPayload::Definition(_))
    ));
    assert!(DragPayload::from_transfer_data("not json").is_err());
    assert!(DragPayload::from_transfer_data(r#"{"equipment_id":"nope"}"#).is_err());
}
