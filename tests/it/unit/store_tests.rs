//! Unit tests for the equipment store.

use crate::helpers::{assert_point_eq, def, square_def};
use lotplanner::LayoutError;
use lotplanner::board::{EquipmentStore, PropertyEdit};
use lotplanner::geometry::Point;
use lotplanner::types::{Clearance, Footprint, InstanceId, PixelShape};

fn store() -> EquipmentStore {
    EquipmentStore::new(10.0)
}

#[test]
fn test_add_derives_pixel_geometry() {
    let mut store = store();
    let id = store.add(&def("game-001"), Point::new(100.0, 100.0)).unwrap();

    let item = store.get(&id).unwrap();
    assert_eq!(item.geometry, PixelShape::Rectangle { width: 80.0, height: 120.0 });
    assert_eq!(item.rotation, 0.0);
    assert_point_eq(item.position, (100.0, 100.0));
}

#[test]
fn test_round_ride_becomes_circle() {
    let mut store = store();
    let id = store.add(&def("ride-001"), Point::ORIGIN).unwrap();
    assert_eq!(store.get(&id).unwrap().geometry, PixelShape::Circle { radius: 400.0 });
}

#[test]
fn test_ids_unique_for_same_definition() {
    let mut store = store();
    let a = store.add(&def("game-002"), Point::ORIGIN).unwrap();
    let b = store.add(&def("game-002"), Point::ORIGIN).unwrap();
    assert_ne!(a, b);
    assert_eq!(store.len(), 2);
}

#[test]
fn test_add_rejects_non_finite_position() {
    let mut store = store();
    let result = store.add(&def("game-001"), Point::new(f64::NAN, 0.0));
    assert!(matches!(result, Err(LayoutError::NonFinite { .. })));
    assert!(store.is_empty());
}

#[test]
fn test_add_rejects_zero_footprint() {
    let mut store = store();
    let result = store.add(&square_def("flat", 0.0), Point::ORIGIN);
    assert!(matches!(result, Err(LayoutError::InvalidDimension { .. })));
    assert!(store.is_empty());
}

#[test]
fn test_rotation_normalized() {
    let mut store = store();
    let id = store.add(&def("game-001"), Point::ORIGIN).unwrap();

    store.rotate(&id, 370.0).unwrap();
    assert!((store.get(&id).unwrap().rotation - 10.0).abs() < 1e-9);

    store.rotate(&id, -90.0).unwrap();
    assert!((store.get(&id).unwrap().rotation - 270.0).abs() < 1e-9);

    store.rotate_by(&id, 180.0).unwrap();
    assert!((store.get(&id).unwrap().rotation - 90.0).abs() < 1e-9);
}

#[test]
fn test_unknown_id_leaves_store_untouched() {
    let mut store = store();
    let id = store.add(&def("game-001"), Point::new(5.0, 5.0)).unwrap();
    let ghost = InstanceId::from("ghost-1");

    assert!(matches!(
        store.move_to(&ghost, Point::ORIGIN),
        Err(LayoutError::UnknownEquipment(_))
    ));
    assert!(store.remove(&ghost).is_err());
    assert!(store.select(Some(&ghost)).is_err());
    assert_point_eq(store.get(&id).unwrap().position, (5.0, 5.0));
    assert_eq!(store.len(), 1);
}

#[test]
fn test_remove_clears_selection() {
    let mut store = store();
    let id = store.add(&def("game-001"), Point::ORIGIN).unwrap();
    store.select(Some(&id)).unwrap();

    store.remove(&id).unwrap();

    assert!(store.selected().is_none());
    assert!(store.is_empty());
}

#[test]
fn test_single_selection() {
    let mut store = store();
    let a = store.add(&def("game-001"), Point::ORIGIN).unwrap();
    let b = store.add(&def("game-002"), Point::new(200.0, 0.0)).unwrap();

    store.select(Some(&a)).unwrap();
    store.select(Some(&b)).unwrap();
    assert_eq!(store.selected(), Some(&b));

    store.select(None).unwrap();
    assert!(store.selected().is_none());
}

#[test]
fn test_resize_rederives_geometry() {
    let mut store = store();
    let id = store.add(&def("game-001"), Point::ORIGIN).unwrap();

    store
        .update_properties(&id, PropertyEdit::resize(Footprint::Rectangle { width: 10.0, length: 20.0 }))
        .unwrap();

    assert_eq!(store.get(&id).unwrap().geometry, PixelShape::Rectangle { width: 100.0, height: 200.0 });
}

#[test]
fn test_invalid_edit_applies_nothing() {
    let mut store = store();
    let id = store.add(&def("game-001"), Point::ORIGIN).unwrap();
    let mut edit = PropertyEdit::rename("Renamed");
    edit.clearance = Some(Some(Clearance::Circle { radius: -1.0 }));

    assert!(store.update_properties(&id, edit).is_err());
    assert_eq!(store.get(&id).unwrap().name, "Ring Toss");
}

#[test]
fn test_bring_to_front_changes_draw_order() {
    let mut store = store();
    let a = store.add(&def("game-001"), Point::ORIGIN).unwrap();
    let b = store.add(&def("game-002"), Point::ORIGIN).unwrap();

    store.bring_to_front(&a).unwrap();

    let order: Vec<_> = store.items().iter().map(|i| i.id.clone()).collect();
    assert_eq!(order, vec![b, a]);
}

#[test]
fn test_dirty_flag_taken_once() {
    let mut store = store();
    store.take_dirty();
    store.add(&def("game-001"), Point::ORIGIN).unwrap();

    assert!(store.take_dirty());
    assert!(!store.take_dirty());
}
