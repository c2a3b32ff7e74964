//! Floating preview shown while a drag is past the threshold.
//!
//! The preview matches the on-canvas size of what would be dropped: real-world
//! footprint × pixels per foot × view scale, never smaller than
//! `MIN_PREVIEW_SIZE` on a side.

use super::coords::{CoordinateContext, CoordinateConverter};
use super::payload::DragPayload;
use super::state::DragSession;
use crate::board::EquipmentStore;
use crate::constants::MIN_PREVIEW_SIZE;
use crate::geometry::{Point, Size};
use crate::types::{Footprint, InstanceId, ShapeKind};

#[derive(Debug, Clone, PartialEq)]
pub struct DragPreview {
    /// Surface-local center of the preview
    pub center: Point,
    /// Surface-local size of the preview
    pub size: Size,
    /// Where the item would land, in canvas space
    pub canvas_center: Point,
    pub shape: ShapeKind,
    /// Degrees, matching the item being moved
    pub rotation: f64,
    pub name: String,
    pub thumbnail: String,
    pub color: String,
    /// Set when an existing item is being moved
    pub item: Option<InstanceId>,
}

/// On-screen preview size for a footprint.
pub fn preview_size(footprint: &Footprint, pixels_per_foot: f64, view_scale: f64) -> Size {
    let extent = footprint.extent();
    let factor = pixels_per_foot * view_scale;
    Size::new(
        (extent.width * factor).max(MIN_PREVIEW_SIZE),
        (extent.height * factor).max(MIN_PREVIEW_SIZE),
    )
}

impl DragPreview {
    /// Build the preview for a session that is past the threshold.
    ///
    /// Returns `None` for a placed item that no longer exists.
    pub fn for_session(
        session: &DragSession,
        store: &EquipmentStore,
        ctx: &CoordinateContext<'_>,
    ) -> Option<Self> {
        let pointer_canvas = CoordinateConverter::window_to_canvas(session.current, ctx);
        let canvas_center = pointer_canvas - session.grab_offset;
        let center = CoordinateConverter::canvas_to_surface(canvas_center, ctx);
        let scale = ctx.view.validated().scale();
        let ppf = store.pixels_per_foot();

        match &session.payload {
            DragPayload::Definition(def) => Some(Self {
                center,
                size: preview_size(&def.footprint, ppf, scale),
                canvas_center,
                shape: def.footprint.shape_kind(),
                rotation: 0.0,
                name: def.name.clone(),
                thumbnail: def.thumbnail.clone(),
                color: def.color.clone(),
                item: None,
            }),
            DragPayload::Placed(id) => {
                let item = store.get(id)?;
                Some(Self {
                    center,
                    size: preview_size(&item.footprint, ppf, scale),
                    canvas_center,
                    shape: item.shape(),
                    rotation: item.rotation,
                    name: item.name.clone(),
                    thumbnail: item.thumbnail.clone(),
                    color: item.color.clone(),
                    item: Some(item.id.clone()),
                })
            }
        }
    }
}
