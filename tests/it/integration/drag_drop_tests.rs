//! Drag and Drop Integration Tests

use crate::helpers::{TestLayoutBuilder, assert_item_count, assert_point_eq, def, mouse, touch};
use lotplanner::LayoutEditor;
use lotplanner::LayoutError;
use lotplanner::geometry::{Point, Size};
use lotplanner::input::{DragPayload, DropOutcome, Key, PointerButton};
use lotplanner::render::DrawCommand;
use lotplanner::settings::EditorSettings;

/// Window position of a sidebar card, right of the default 800 x 600 surface
const SIDEBAR: (f64, f64) = (900.0, 50.0);

fn sidebar_press() -> lotplanner::input::PointerEvent {
    mouse(SIDEBAR.0, SIDEBAR.1)
}

fn placed_id(outcome: DropOutcome) -> lotplanner::types::InstanceId {
    match outcome {
        DropOutcome::Placed(id) => id,
        other => panic!("expected Placed, got {:?}", other),
    }
}

// ============================================================================
// Sidebar to canvas
// ============================================================================

#[test]
fn test_sidebar_drop_places_at_pointer() {
    let mut editor = LayoutEditor::default();
    assert!(editor.begin_sidebar_drag(def("game-001"), &sidebar_press()));
    assert!(editor.handle_pointer_move(&mouse(300.0, 200.0)));

    let id = placed_id(editor.handle_pointer_up(&mouse(300.0, 200.0)));

    let item = editor.store().get(&id).unwrap();
    assert_point_eq(item.position, (300.0, 200.0));
    assert_eq!(item.name, "Ring Toss");
    assert!(editor.store().selected().is_none());
}

#[test]
fn test_sidebar_click_places_at_view_center() {
    let mut editor = LayoutEditor::default();
    editor.begin_sidebar_drag(def("game-002"), &sidebar_press());

    let id = placed_id(editor.handle_pointer_up(&mouse(SIDEBAR.0 + 2.0, SIDEBAR.1)));

    assert_point_eq(editor.store().get(&id).unwrap().position, (400.0, 300.0));
}

#[test]
fn test_sidebar_click_after_drop_reuses_drop_point() {
    let mut editor = LayoutEditor::default();
    editor.begin_sidebar_drag(def("game-001"), &sidebar_press());
    editor.handle_pointer_move(&mouse(250.0, 150.0));
    editor.handle_pointer_up(&mouse(250.0, 150.0));

    editor.begin_sidebar_drag(def("game-002"), &sidebar_press());
    let id = placed_id(editor.handle_pointer_up(&sidebar_press()));

    assert_point_eq(editor.store().get(&id).unwrap().position, (250.0, 150.0));
}

#[test]
fn test_drop_outside_surface_is_missed() {
    let mut editor = LayoutEditor::default();
    editor.begin_sidebar_drag(def("game-001"), &sidebar_press());
    editor.handle_pointer_move(&mouse(900.0, 300.0));

    assert_eq!(editor.handle_pointer_up(&mouse(900.0, 300.0)), DropOutcome::Missed);
    assert_item_count(&editor, 0);
    assert!(editor.orchestrator().is_idle());
}

#[test]
fn test_drop_respects_surface_origin() {
    let mut editor = LayoutEditor::default();
    editor.set_surface(Point::new(200.0, 0.0), Size::new(800.0, 600.0));

    editor.begin_sidebar_drag(def("game-001"), &mouse(50.0, 50.0));
    editor.handle_pointer_move(&mouse(500.0, 200.0));
    let id = placed_id(editor.handle_pointer_up(&mouse(500.0, 200.0)));
    assert_point_eq(editor.store().get(&id).unwrap().position, (300.0, 200.0));

    editor.begin_sidebar_drag(def("game-001"), &mouse(50.0, 50.0));
    editor.handle_pointer_move(&mouse(150.0, 200.0));
    assert_eq!(editor.handle_pointer_up(&mouse(150.0, 200.0)), DropOutcome::Missed);
}

#[test]
fn test_drop_lands_under_pointer_when_zoomed() {
    let (mut editor, _) = TestLayoutBuilder::new().with_scale(2.0).with_offset(100.0, 0.0).build();
    editor.begin_sidebar_drag(def("game-001"), &sidebar_press());
    editor.handle_pointer_move(&mouse(300.0, 200.0));

    let id = placed_id(editor.handle_pointer_up(&mouse(300.0, 200.0)));

    assert_point_eq(editor.store().get(&id).unwrap().position, (100.0, 100.0));
}

#[test]
fn test_snap_to_grid_on_drop() {
    let settings = EditorSettings {
        snap_to_grid: true,
        grid_size: 50.0,
        ..Default::default()
    };
    let mut editor = LayoutEditor::new(settings);
    editor.begin_sidebar_drag(def("game-001"), &sidebar_press());
    editor.handle_pointer_move(&mouse(107.0, 93.0));

    let id = placed_id(editor.handle_pointer_up(&mouse(107.0, 93.0)));

    assert_point_eq(editor.store().get(&id).unwrap().position, (100.0, 100.0));
}

#[test]
fn test_transfer_drag() {
    let mut editor = LayoutEditor::default();
    assert!(matches!(
        editor.begin_transfer_drag("not json", &sidebar_press()),
        Err(LayoutError::MalformedPayload(_))
    ));
    assert!(editor.orchestrator().is_idle());

    assert!(editor
        .begin_transfer_drag(r#"{"equipment_id":"food-001"}"#, &sidebar_press())
        .unwrap());
    editor.handle_pointer_move(&mouse(400.0, 300.0));
    let id = placed_id(editor.handle_pointer_up(&mouse(400.0, 300.0)));

    assert_eq!(editor.store().get(&id).unwrap().name, "Food Truck");
}

#[test]
fn test_shared_orchestrator_handle() {
    let mut editor = LayoutEditor::default();
    let sidebar = editor.orchestrator();

    sidebar.begin_drag(DragPayload::definition(def("util-002")), &sidebar_press(), Point::ORIGIN);
    assert!(editor.handle_pointer_move(&mouse(300.0, 300.0)));
    assert!(editor.drag_preview().is_some());

    let id = placed_id(editor.handle_pointer_up(&mouse(300.0, 300.0)));
    assert_eq!(editor.store().get(&id).unwrap().definition_id, "util-002");
    assert!(sidebar.is_idle());
}

// ============================================================================
// Moving placed items
// ============================================================================

#[test]
fn test_canvas_drag_moves_on_drop_only() {
    let (mut editor, ids) = TestLayoutBuilder::new().with_equipment("game-001", (100.0, 100.0)).build();
    let id = ids[0].clone();

    assert!(editor.handle_pointer_down(&mouse(110.0, 105.0)));
    assert_eq!(editor.store().selected(), Some(&id));
    assert!(editor.handle_pointer_move(&mouse(150.0, 105.0)));

    // The store keeps the old position until the drop
    assert_point_eq(editor.store().get(&id).unwrap().position, (100.0, 100.0));
    let preview = editor.drag_preview().unwrap();
    assert_eq!(preview.item.as_ref(), Some(&id));
    assert_point_eq(preview.canvas_center, (140.0, 100.0));

    let (frame, _) = editor.frame();
    let body = frame
        .equipment
        .iter()
        .find_map(|cmd| match cmd {
            DrawCommand::Rect { center, corner_radius, .. } if *corner_radius > 0.0 => Some(*center),
            _ => None,
        })
        .unwrap();
    assert_point_eq(body, (140.0, 100.0));

    assert_eq!(editor.handle_pointer_up(&mouse(210.0, 305.0)), DropOutcome::Moved(id.clone()));
    assert_point_eq(editor.store().get(&id).unwrap().position, (200.0, 300.0));
}

#[test]
fn test_rotated_item_preview_keeps_rotation() {
    let (mut editor, ids) = TestLayoutBuilder::new().with_equipment("game-001", (100.0, 100.0)).build();
    editor.rotate_equipment(&ids[0], 90.0).unwrap();

    editor.handle_pointer_down(&mouse(100.0, 100.0));
    editor.handle_pointer_move(&mouse(160.0, 100.0));

    assert_eq!(editor.drag_preview().unwrap().rotation, 90.0);
    let (frame, _) = editor.frame();
    let preview_rotation = frame.overlay.iter().find_map(|cmd| match cmd {
        DrawCommand::Rect { rotation, .. } => Some(*rotation),
        _ => None,
    });
    assert_eq!(preview_rotation, Some(90.0));
}

#[test]
fn test_canvas_click_selects_without_moving() {
    let (mut editor, ids) = TestLayoutBuilder::new().with_equipment("game-001", (100.0, 100.0)).build();
    let id = ids[0].clone();

    editor.handle_pointer_down(&mouse(100.0, 100.0));
    editor.handle_pointer_move(&mouse(102.0, 100.0));
    assert!(editor.drag_preview().is_none());

    assert_eq!(editor.handle_pointer_up(&mouse(102.0, 100.0)), DropOutcome::Clicked(id.clone()));
    assert_point_eq(editor.store().get(&id).unwrap().position, (100.0, 100.0));
    assert_eq!(editor.store().selected(), Some(&id));
    assert_eq!(editor.hit_profiler().queries(), 1);
    assert_eq!(editor.hit_profiler().candidate_ratio(), 1.0);
}

#[test]
fn test_threshold_boundary_moves() {
    let (mut editor, ids) = TestLayoutBuilder::new().with_equipment("game-001", (100.0, 100.0)).build();
    let id = ids[0].clone();

    editor.handle_pointer_down(&mouse(100.0, 100.0));

    assert_eq!(editor.handle_pointer_up(&mouse(103.0, 104.0)), DropOutcome::Moved(id.clone()));
    assert_point_eq(editor.store().get(&id).unwrap().position, (103.0, 104.0));
}

#[test]
fn test_topmost_item_is_grabbed() {
    let (mut editor, ids) = TestLayoutBuilder::new()
        .with_equipment("game-001", (100.0, 100.0))
        .with_equipment("game-002", (110.0, 110.0))
        .build();

    editor.handle_pointer_down(&mouse(105.0, 105.0));

    assert_eq!(editor.store().selected(), Some(&ids[1]));
}

#[test]
fn test_touch_session_ignores_mouse() {
    let (mut editor, ids) = TestLayoutBuilder::new().with_equipment("game-001", (100.0, 100.0)).build();

    assert!(editor.handle_pointer_down(&touch(100.0, 100.0)));
    assert!(!editor.handle_pointer_move(&mouse(300.0, 300.0)));
    assert!(editor.handle_pointer_move(&touch(150.0, 100.0)));

    assert_eq!(editor.handle_pointer_up(&mouse(300.0, 300.0)), DropOutcome::NoSession);
    assert_eq!(editor.handle_pointer_up(&touch(150.0, 100.0)), DropOutcome::Moved(ids[0].clone()));
}

// ============================================================================
// Panning and keys
// ============================================================================

#[test]
fn test_empty_canvas_press_pans() {
    let (mut editor, ids) = TestLayoutBuilder::new().with_equipment("game-001", (100.0, 100.0)).build();
    editor.select(Some(&ids[0])).unwrap();

    assert!(editor.handle_pointer_down(&mouse(500.0, 500.0)));
    assert!(editor.store().selected().is_none());
    assert!(editor.canvas_input().is_panning());

    assert!(editor.handle_pointer_move(&mouse(520.0, 510.0)));
    assert_point_eq(editor.view().offset(), (20.0, 10.0));

    assert_eq!(editor.handle_pointer_up(&mouse(520.0, 510.0)), DropOutcome::NoSession);
    assert!(editor.canvas_input().is_idle());
    assert_point_eq(editor.store().get(&ids[0]).unwrap().position, (100.0, 100.0));
}

#[test]
fn test_middle_button_pans_over_items() {
    let (mut editor, _) = TestLayoutBuilder::new().with_equipment("game-001", (100.0, 100.0)).build();

    assert!(editor.handle_pointer_down(&mouse(100.0, 100.0).with_button(PointerButton::Middle)));

    assert!(editor.canvas_input().is_panning());
    assert!(editor.orchestrator().is_idle());
}

#[test]
fn test_press_outside_surface_ignored() {
    let mut editor = LayoutEditor::default();
    assert!(!editor.handle_pointer_down(&mouse(900.0, 100.0)));
    assert!(editor.canvas_input().is_idle());
}

#[test]
fn test_escape_cancels_drag() {
    let mut editor = LayoutEditor::default();
    editor.begin_sidebar_drag(def("game-001"), &sidebar_press());
    editor.handle_pointer_move(&mouse(300.0, 200.0));

    assert!(editor.handle_key(Key::Escape));

    assert!(editor.orchestrator().is_idle());
    assert_eq!(editor.handle_pointer_up(&mouse(300.0, 200.0)), DropOutcome::NoSession);
    assert_item_count(&editor, 0);
}

#[test]
fn test_delete_removes_selection() {
    let (mut editor, ids) = TestLayoutBuilder::new().with_equipment("game-001", (100.0, 100.0)).build();
    editor.select(Some(&ids[0])).unwrap();

    assert!(editor.handle_key(Key::Delete));

    assert_item_count(&editor, 0);
    assert!(!editor.handle_key(Key::Backspace));
}

#[test]
fn test_delete_ignored_mid_drag() {
    let (mut editor, ids) = TestLayoutBuilder::new().with_equipment("game-001", (100.0, 100.0)).build();
    editor.handle_pointer_down(&mouse(100.0, 100.0));
    editor.handle_pointer_move(&mouse(150.0, 100.0));

    assert!(!editor.handle_key(Key::Delete));

    assert_eq!(editor.handle_pointer_up(&mouse(150.0, 100.0)), DropOutcome::Moved(ids[0].clone()));
    assert_item_count(&editor, 1);
}
