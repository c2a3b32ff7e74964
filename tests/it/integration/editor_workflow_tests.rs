//! Editor Workflow Integration Tests

use crate::helpers::{TestLayoutBuilder, assert_item_count, assert_point_eq, def, square_def};
use lotplanner::LayoutEditor;
use lotplanner::geometry::{Point, Size};
use lotplanner::hit_testing::hit_test;
use lotplanner::reference_image::ReferenceImage;
use lotplanner::settings::EditorSettings;
use lotplanner::types::PixelShape;
use tempfile::tempdir;

#[test]
fn test_new_editor() {
    let editor = LayoutEditor::default();
    assert!(editor.store().is_empty());
    assert_eq!(editor.view().scale(), 1.0);
    assert_eq!(editor.project_name(), "Untitled Layout");
    assert!(uuid::Uuid::parse_str(editor.project_id()).is_ok());
}

#[test]
fn test_place_hit_move() {
    let mut editor = LayoutEditor::default();
    let id = editor.add_equipment(&def("game-001"), Point::new(100.0, 100.0)).unwrap();
    assert_eq!(hit_test(editor.store(), Point::new(100.0, 100.0)), Some(id.clone()));

    editor.move_equipment(&id, Point::new(200.0, 200.0)).unwrap();

    assert_eq!(hit_test(editor.store(), Point::new(200.0, 200.0)), Some(id));
    assert_eq!(hit_test(editor.store(), Point::new(100.0, 100.0)), None);
}

#[test]
fn test_rotate_selected() {
    let (mut editor, ids) = TestLayoutBuilder::new().with_equipment("game-001", (0.0, 0.0)).build();
    assert!(editor.rotate_selected(90.0).is_err());

    editor.select(Some(&ids[0])).unwrap();
    editor.rotate_selected(370.0).unwrap();
    assert!((editor.store().get(&ids[0]).unwrap().rotation - 10.0).abs() < 1e-9);

    editor.rotate_selected(-100.0).unwrap();
    assert!((editor.store().get(&ids[0]).unwrap().rotation - 270.0).abs() < 1e-9);
}

#[test]
fn test_fit_single_item() {
    let (mut editor, _) = TestLayoutBuilder::new()
        .with_definition(square_def("booth", 5.0), (0.0, 0.0))
        .build();

    assert!(editor.fit_to_content());

    assert!(editor.view().scale() <= 1.2);
    assert_point_eq(editor.canvas_to_window(Point::ORIGIN), (400.0, 300.0));
}

#[test]
fn test_fit_empty_layout_resets_view() {
    let (mut editor, _) = TestLayoutBuilder::new().with_scale(3.0).with_offset(40.0, 40.0).build();

    editor.fit_to_content();

    assert_eq!(editor.view().scale(), 1.0);
    assert_eq!(editor.view().offset(), Point::ORIGIN);
}

#[test]
fn test_wheel_zoom_anchored_on_surface() {
    let mut editor = LayoutEditor::default();
    editor.set_surface(Point::new(100.0, 50.0), Size::new(800.0, 600.0));
    let pointer = Point::new(300.0, 200.0);
    let before = editor.window_to_canvas(pointer);
    assert_point_eq(before, (200.0, 150.0));

    assert!(editor.handle_wheel(-1.0, pointer));

    assert!(editor.view().scale() > 1.0);
    assert_point_eq(editor.window_to_canvas(pointer), (200.0, 150.0));
    assert!(!editor.handle_wheel(-1.0, Point::new(10.0, 10.0)));
}

#[test]
fn test_zoom_buttons_and_reset() {
    let mut editor = LayoutEditor::default();
    editor.zoom_in();
    assert!((editor.view().scale() - 1.2).abs() < 1e-9);
    editor.zoom_out();
    assert!((editor.view().scale() - 0.96).abs() < 1e-9);
    editor.max_out();
    assert_eq!(editor.view().scale(), editor.view().max_scale());

    editor.reset_view();
    assert_eq!(editor.view().scale(), 1.0);
}

#[test]
fn test_export_import_round_trip() {
    let (mut editor, ids) = TestLayoutBuilder::new()
        .with_equipment("game-001", (100.0, 100.0))
        .with_equipment("ride-002", (600.0, 400.0))
        .with_scale(0.5)
        .with_offset(30.0, 40.0)
        .build();
    editor.select(Some(&ids[1])).unwrap();
    editor.rotate_equipment(&ids[0], 45.0).unwrap();
    editor.set_project_name("County Fair");

    let json = editor.export_json().unwrap();
    let mut restored = LayoutEditor::default();
    restored.import_json(&json).unwrap();

    assert_item_count(&restored, 2);
    assert_eq!(restored.store().selected(), Some(&ids[1]));
    assert_eq!(restored.project_name(), "County Fair");
    assert_eq!(restored.project_id(), editor.project_id());
    assert_eq!(restored.view().scale(), 0.5);
    assert_eq!(restored.store().items(), editor.store().items());
    assert_eq!(hit_test(restored.store(), Point::new(600.0, 400.0)), Some(ids[1].clone()));
}

#[test]
fn test_add_after_import_gets_fresh_id() {
    let mut source = LayoutEditor::default();
    let ring_toss = def("game-001");
    for _ in 0..50 {
        source.add_equipment(&ring_toss, Point::ORIGIN).unwrap();
    }
    let json = source.export_json().unwrap();

    let mut editor = LayoutEditor::default();
    editor.import_json(&json).unwrap();
    let added = editor.add_equipment(&ring_toss, Point::ORIGIN).unwrap();

    let ids: std::collections::HashSet<_> = editor.store().items().iter().map(|i| i.id.clone()).collect();
    assert_item_count(&editor, 51);
    assert_eq!(ids.len(), 51);
    assert!(!source.store().contains(&added));
}

#[test]
fn test_import_rederives_tampered_geometry() {
    let (source, ids) = TestLayoutBuilder::new().with_equipment("game-001", (100.0, 100.0)).build();
    let json = source.export_json().unwrap().replace("\"width\": 80.0", "\"width\": -80.0");
    assert!(json.contains("-80.0"));

    let mut editor = LayoutEditor::default();
    editor.import_json(&json).unwrap();

    assert_eq!(
        editor.store().get(&ids[0]).unwrap().geometry,
        PixelShape::Rectangle { width: 80.0, height: 120.0 }
    );
    assert_eq!(hit_test(editor.store(), Point::new(100.0, 100.0)), Some(ids[0].clone()));
}

#[test]
fn test_bad_import_keeps_state() {
    let (mut editor, _) = TestLayoutBuilder::new().with_equipment("game-001", (100.0, 100.0)).build();
    let before = editor.export_json().unwrap();

    assert!(editor.import_json("{ broken").is_err());
    assert!(editor
        .import_json(r#"{ "version": 7, "id": "x", "name": "n", "equipment": [] }"#)
        .is_err());

    assert_item_count(&editor, 1);
    assert_eq!(editor.export_json().unwrap(), before);
}

#[test]
fn test_apply_settings_rescales_geometry() {
    let (mut editor, ids) = TestLayoutBuilder::new().with_equipment("game-001", (0.0, 0.0)).build();
    let settings = EditorSettings {
        pixels_per_foot: 20.0,
        ..Default::default()
    };

    editor.apply_settings(settings).unwrap();

    assert_eq!(
        editor.store().get(&ids[0]).unwrap().geometry,
        PixelShape::Rectangle { width: 160.0, height: 240.0 }
    );
}

#[test]
fn test_invalid_settings_rejected() {
    let mut editor = LayoutEditor::default();
    let settings = EditorSettings {
        min_scale: 3.0,
        max_scale: 1.0,
        ..Default::default()
    };

    assert!(editor.apply_settings(settings).is_err());
    assert_eq!(editor.settings(), &EditorSettings::default());
}

#[test]
fn test_settings_reload_without_watcher() {
    let mut editor = LayoutEditor::default();
    assert!(!editor.check_settings_reload());
}

#[test]
fn test_watch_settings_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("settings.json");
    EditorSettings::default().save_to(&path).unwrap();

    let mut editor = LayoutEditor::default();
    editor.watch_settings(&path).unwrap();

    // Polling must never block, whether or not an event has arrived yet
    let _ = editor.check_settings_reload();
}

#[test]
fn test_reference_image_sets_initial_scale() {
    let mut editor = LayoutEditor::default();
    editor.set_reference_image(ReferenceImage::new(1000, 500, 0.05, 0.9).unwrap());

    assert!((editor.view().scale() - 2.0).abs() < 1e-9);
    let (frame, _) = editor.frame();
    assert!(!frame.reference.is_empty());

    editor.clear_reference_image();
    assert!(editor.reference_image().is_none());
    let (frame, _) = editor.frame();
    assert!(frame.reference.is_empty());
}

#[test]
fn test_load_reference_image_from_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("lot.png");
    image::RgbaImage::new(4, 2).save(&path).unwrap();

    let mut editor = LayoutEditor::default();
    editor.load_reference_image(&path, 0.05, 1.0).unwrap();

    let reference = editor.reference_image().unwrap();
    assert_eq!((reference.width, reference.height), (4, 2));
    assert!(editor.load_reference_image(dir.path().join("missing.png"), 0.05, 1.0).is_err());
}

#[test]
fn test_frame_rebuilds_only_when_dirty() {
    let mut editor = LayoutEditor::default();
    assert!(editor.frame().1);
    assert!(!editor.frame().1);
    assert!(!editor.needs_redraw());

    editor.add_equipment(&def("game-001"), Point::new(100.0, 100.0)).unwrap();

    assert!(editor.needs_redraw());
    let (frame, rebuilt) = editor.frame();
    assert!(rebuilt);
    assert!(!frame.equipment.is_empty());
}

#[test]
fn test_rejected_view_change_keeps_view_and_frame() {
    let mut editor = LayoutEditor::default();
    editor.frame();

    assert!(!editor.set_view(2.0, Point::new(f64::NAN, 0.0)));
    assert_eq!(editor.view().scale(), 1.0);
    assert!(!editor.needs_redraw());

    assert!(editor.set_view(2.0, Point::new(10.0, 0.0)));
    assert_eq!(editor.view().scale(), 2.0);
    assert!(editor.needs_redraw());
}

#[test]
fn test_clear_layout() {
    let (mut editor, _) = TestLayoutBuilder::new()
        .with_equipment("game-001", (100.0, 100.0))
        .with_equipment("game-002", (300.0, 100.0))
        .build();

    editor.clear_layout();

    assert_item_count(&editor, 0);
    assert!(editor.store().selected().is_none());
}
