//! Unit tests for the view transform.

use crate::helpers::assert_point_eq;
use lotplanner::geometry::{Bounds, Point, Size};
use lotplanner::viewport::{ViewTransform, zoom_toward_point};

#[test]
fn test_identity_by_default() {
    let view = ViewTransform::new();
    assert_eq!(view.scale(), 1.0);
    assert_point_eq(view.screen_to_canvas(Point::new(42.0, 7.0)), (42.0, 7.0));
}

#[test]
fn test_screen_to_canvas_applies_offset_then_scale() {
    let mut view = ViewTransform::new();
    view.set_scale(2.0);
    view.set_offset(Point::new(100.0, 50.0));

    assert_point_eq(view.screen_to_canvas(Point::new(300.0, 250.0)), (100.0, 100.0));
    assert_point_eq(view.canvas_to_screen(Point::new(100.0, 100.0)), (300.0, 250.0));
}

#[test]
fn test_scale_is_clamped() {
    let mut view = ViewTransform::new();
    view.set_scale(50.0);
    assert_eq!(view.scale(), view.max_scale());
    view.set_scale(0.001);
    assert_eq!(view.scale(), view.min_scale());
}

#[test]
fn test_invalid_scale_rejected() {
    let mut view = ViewTransform::new();
    view.set_scale(2.0);
    assert!(!view.set_scale(f64::NAN));
    assert!(!view.set_scale(-1.0));
    assert_eq!(view.scale(), 2.0);
}

#[test]
fn test_set_view_is_all_or_nothing() {
    let mut view = ViewTransform::new();
    assert!(!view.set_view(2.0, Point::new(f64::NAN, 0.0)));
    assert!(!view.set_view(f64::INFINITY, Point::new(5.0, 5.0)));
    assert_eq!(view.scale(), 1.0);
    assert_point_eq(view.offset(), (0.0, 0.0));

    assert!(view.set_view(2.0, Point::new(5.0, -5.0)));
    assert_eq!(view.scale(), 2.0);
    assert_point_eq(view.offset(), (5.0, -5.0));
}

#[test]
fn test_wheel_zoom_keeps_pointer_fixed() {
    let mut view = ViewTransform::new();
    let pointer = Point::new(200.0, 150.0);
    let before = view.screen_to_canvas(pointer);

    assert!(view.wheel_zoom(-1.0, pointer));
    assert!((view.scale() - 1.1).abs() < 1e-9);
    assert_point_eq(view.screen_to_canvas(pointer), (before.x, before.y));

    assert!(view.wheel_zoom(1.0, pointer));
    assert_point_eq(view.screen_to_canvas(pointer), (before.x, before.y));
}

#[test]
fn test_zoom_toward_point_formula() {
    let offset = zoom_toward_point(Point::new(100.0, 100.0), Point::ORIGIN, 1.0, 2.0);
    assert_point_eq(offset, (-100.0, -100.0));
}

#[test]
fn test_fit_single_item_caps_scale_and_centers() {
    let mut view = ViewTransform::new();
    let item = Bounds::from_center(Point::ORIGIN, Size::new(50.0, 50.0));

    assert!(view.fit_to_content(&[item], Size::new(800.0, 600.0), 50.0));

    assert!(view.scale() <= 1.2);
    assert_point_eq(view.canvas_to_screen(Point::ORIGIN), (400.0, 300.0));
}

#[test]
fn test_fit_many_items_shows_all() {
    let mut view = ViewTransform::new();
    let items = [
        Bounds::new(Point::new(0.0, 0.0), Point::new(100.0, 100.0)),
        Bounds::new(Point::new(1900.0, 900.0), Point::new(2000.0, 1000.0)),
    ];

    assert!(view.fit_to_content(&items, Size::new(800.0, 600.0), 50.0));

    let top_left = view.canvas_to_screen(Point::new(0.0, 0.0));
    let bottom_right = view.canvas_to_screen(Point::new(2000.0, 1000.0));
    assert!(top_left.x >= 0.0 && top_left.y >= 0.0);
    assert!(bottom_right.x <= 800.0 && bottom_right.y <= 600.0);
}

#[test]
fn test_fit_empty_resets() {
    let mut view = ViewTransform::new();
    view.set_scale(3.0);
    view.set_offset(Point::new(10.0, 10.0));

    assert!(view.fit_to_content(&[], Size::new(800.0, 600.0), 50.0));

    assert_eq!(view.scale(), 1.0);
    assert_eq!(view.offset(), Point::ORIGIN);
}

#[test]
fn test_invalid_transform_falls_back_to_identity() {
    let view: ViewTransform =
        serde_json::from_str(r#"{ "scale": 0.0, "offset": { "x": 5.0, "y": 5.0 } }"#).unwrap();
    assert!(!view.is_valid());
    assert_point_eq(view.screen_to_canvas(Point::new(12.0, 34.0)), (12.0, 34.0));
}
