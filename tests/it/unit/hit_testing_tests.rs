//! Unit tests for hit testing.

use crate::helpers::def;
use lotplanner::board::EquipmentStore;
use lotplanner::calibration::{CalibrationLine, Endpoint};
use lotplanner::geometry::Point;
use lotplanner::hit_testing::{hit_calibration_endpoint, hit_test};
use lotplanner::viewport::ViewTransform;

#[test]
fn test_hit_and_miss() {
    let mut store = EquipmentStore::new(10.0);
    let id = store.add(&def("game-001"), Point::new(100.0, 100.0)).unwrap();

    assert_eq!(hit_test(&store, Point::new(100.0, 100.0)), Some(id.clone()));
    assert_eq!(hit_test(&store, Point::new(139.0, 159.0)), Some(id));
    assert_eq!(hit_test(&store, Point::new(141.0, 100.0)), None);
}

#[test]
fn test_topmost_wins() {
    let mut store = EquipmentStore::new(10.0);
    let _below = store.add(&def("game-001"), Point::new(100.0, 100.0)).unwrap();
    let above = store.add(&def("game-002"), Point::new(110.0, 110.0)).unwrap();

    assert_eq!(hit_test(&store, Point::new(105.0, 105.0)), Some(above));
}

#[test]
fn test_bring_to_front_changes_winner() {
    let mut store = EquipmentStore::new(10.0);
    let below = store.add(&def("game-001"), Point::new(100.0, 100.0)).unwrap();
    let _above = store.add(&def("game-002"), Point::new(110.0, 110.0)).unwrap();

    store.bring_to_front(&below).unwrap();

    assert_eq!(hit_test(&store, Point::new(105.0, 105.0)), Some(below));
}

#[test]
fn test_rotation_aware() {
    let mut store = EquipmentStore::new(10.0);
    // 80 x 120 px
    let id = store.add(&def("game-001"), Point::ORIGIN).unwrap();
    assert_eq!(hit_test(&store, Point::new(50.0, 0.0)), None);

    store.rotate(&id, 90.0).unwrap();

    assert_eq!(hit_test(&store, Point::new(50.0, 0.0)), Some(id));
    assert_eq!(hit_test(&store, Point::new(0.0, 50.0)), None);
}

#[test]
fn test_circle_corners_miss() {
    let mut store = EquipmentStore::new(10.0);
    // radius 250 px
    let id = store.add(&def("ride-002"), Point::ORIGIN).unwrap();

    assert_eq!(hit_test(&store, Point::new(0.0, 249.0)), Some(id));
    assert_eq!(hit_test(&store, Point::new(240.0, 240.0)), None);
}

#[test]
fn test_moved_item_hit_at_new_position() {
    let mut store = EquipmentStore::new(10.0);
    let id = store.add(&def("game-001"), Point::new(100.0, 100.0)).unwrap();

    store.move_to(&id, Point::new(200.0, 200.0)).unwrap();

    assert_eq!(hit_test(&store, Point::new(200.0, 200.0)), Some(id));
    assert_eq!(hit_test(&store, Point::new(100.0, 100.0)), None);
}

#[test]
fn test_non_finite_point_never_hits() {
    let mut store = EquipmentStore::new(10.0);
    store.add(&def("game-001"), Point::ORIGIN).unwrap();
    assert_eq!(hit_test(&store, Point::new(f64::NAN, 0.0)), None);
}

#[test]
fn test_calibration_endpoint_in_screen_space() {
    let line = CalibrationLine::new(Point::new(10.0, 10.0), Point::new(100.0, 100.0));
    let mut view = ViewTransform::new();
    view.set_scale(2.0);

    assert_eq!(hit_calibration_endpoint(&line, &view, Point::new(25.0, 20.0)), Some(Endpoint::Start));
    assert_eq!(hit_calibration_endpoint(&line, &view, Point::new(205.0, 200.0)), Some(Endpoint::End));
    assert_eq!(hit_calibration_endpoint(&line, &view, Point::new(110.0, 110.0)), None);
}
