//! Equipment state store.
//!
//! Holds placed equipment in creation order (last is drawn on top), the
//! single selection, and an R-tree kept in sync with every mutation.
//! Rejected mutations leave the store untouched.

use crate::catalog::default_clearance;
use crate::constants::FEET_TO_PIXELS;
use crate::error::{LayoutError, LayoutResult, ensure_finite, ensure_positive};
use crate::geometry::{Bounds, Point};
use crate::spatial_index::SpatialIndex;
use crate::types::{
    Clearance, EquipmentDefinition, Footprint, InstanceId, PlacedEquipment, normalize_degrees,
};
use std::collections::HashSet;
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::{debug, warn};

/// A partial edit applied by `update_properties`. `None` leaves a field alone.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PropertyEdit {
    pub name: Option<String>,
    pub color: Option<String>,
    /// New footprint in feet; pixel geometry is re-derived
    pub footprint: Option<Footprint>,
    /// `Some(None)` clears the clearance region
    pub clearance: Option<Option<Clearance>>,
}

impl PropertyEdit {
    pub fn rename(name: impl Into<String>) -> Self {
        Self { name: Some(name.into()), ..Default::default() }
    }

    pub fn recolor(color: impl Into<String>) -> Self {
        Self { color: Some(color.into()), ..Default::default() }
    }

    pub fn resize(footprint: Footprint) -> Self {
        Self { footprint: Some(footprint), ..Default::default() }
    }
}

#[derive(Debug)]
pub struct EquipmentStore {
    items: Vec<PlacedEquipment>,
    selected: Option<InstanceId>,
    index: SpatialIndex,
    pixels_per_foot: f64,
    last_stamp: u64,
    dirty: bool,
}

impl Default for EquipmentStore {
    fn default() -> Self {
        Self::new(FEET_TO_PIXELS)
    }
}

impl EquipmentStore {
    pub fn new(pixels_per_foot: f64) -> Self {
        let pixels_per_foot = if pixels_per_foot.is_finite() && pixels_per_foot > 0.0 {
            pixels_per_foot
        } else {
            warn!(pixels_per_foot, "Invalid pixels per foot, using default");
            FEET_TO_PIXELS
        };
        Self {
            items: Vec::new(),
            selected: None,
            index: SpatialIndex::new(),
            pixels_per_foot,
            last_stamp: 0,
            dirty: true,
        }
    }

    pub fn pixels_per_foot(&self) -> f64 {
        self.pixels_per_foot
    }

    /// Change the feet-to-pixel ratio and re-derive every item's geometry.
    pub fn set_pixels_per_foot(&mut self, pixels_per_foot: f64) -> LayoutResult<()> {
        ensure_positive(pixels_per_foot, "pixels_per_foot")?;
        if pixels_per_foot == self.pixels_per_foot {
            return Ok(());
        }
        self.pixels_per_foot = pixels_per_foot;
        for item in &mut self.items {
            item.geometry = item.footprint.to_pixels(pixels_per_foot);
        }
        self.index
            .rebuild(self.items.iter().map(|item| (item.id.clone(), item.bounds())));
        self.mark_dirty();
        debug!(pixels_per_foot, "Re-derived equipment geometry");
        Ok(())
    }

    // ------------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------------

    /// Items in creation order.
    pub fn items(&self) -> &[PlacedEquipment] {
        &self.items
    }

    pub fn get(&self, id: &InstanceId) -> Option<&PlacedEquipment> {
        self.items.iter().find(|item| &item.id == id)
    }

    pub fn contains(&self, id: &InstanceId) -> bool {
        self.get(id).is_some()
    }

    pub fn selected(&self) -> Option<&InstanceId> {
        self.selected.as_ref()
    }

    pub fn selected_item(&self) -> Option<&PlacedEquipment> {
        self.selected.as_ref().and_then(|id| self.get(id))
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Ids whose envelope contains `p`, from the spatial index.
    pub fn candidates_at(&self, p: Point) -> HashSet<InstanceId> {
        self.index.query_point(p).into_iter().collect()
    }

    /// Ids whose envelope intersects `region`.
    pub fn query_region(&self, region: Bounds) -> Vec<InstanceId> {
        self.index.query_rect(region)
    }

    /// Rotated axis-aligned bounds of every item.
    pub fn item_bounds(&self) -> Vec<Bounds> {
        self.items.iter().map(PlacedEquipment::bounds).collect()
    }

    // ------------------------------------------------------------------------
    // Dirty tracking
    // ------------------------------------------------------------------------

    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Read and clear the dirty flag.
    pub fn take_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    // ------------------------------------------------------------------------
    // Mutations
    // ------------------------------------------------------------------------

    /// Place a new instance of `definition` centered at `position`.
    pub fn add(&mut self, definition: &EquipmentDefinition, position: Point) -> LayoutResult<InstanceId> {
        ensure_finite(position.x, "position.x")?;
        ensure_finite(position.y, "position.y")?;
        validate_footprint(&definition.footprint)?;

        let id = self.next_id(&definition.id);
        let clearance = definition
            .clearance
            .unwrap_or_else(|| default_clearance(&definition.category, &definition.footprint));

        let item = PlacedEquipment {
            id: id.clone(),
            definition_id: definition.id.clone(),
            name: definition.name.clone(),
            category: definition.category.clone(),
            size: definition.size,
            footprint: definition.footprint,
            height_ft: definition.height_ft,
            thumbnail: definition.thumbnail.clone(),
            color: definition.color.clone(),
            position,
            geometry: definition.footprint.to_pixels(self.pixels_per_foot),
            rotation: 0.0,
            clearance: Some(clearance),
        };
        if !item.is_finite() {
            warn!(definition = %definition.id, "Rejected equipment with non-finite geometry");
            return Err(LayoutError::NonFinite { field: "geometry" });
        }

        self.index.insert(id.clone(), item.bounds());
        self.items.push(item);
        self.mark_dirty();
        debug!(%id, x = position.x, y = position.y, "Added equipment");
        Ok(id)
    }

    /// Move an item so its center lands on `position`.
    pub fn move_to(&mut self, id: &InstanceId, position: Point) -> LayoutResult<()> {
        ensure_finite(position.x, "position.x")?;
        ensure_finite(position.y, "position.y")?;
        self.modify(id, |item| {
            item.position = position;
            Ok(())
        })
    }

    /// Set an item's rotation, normalized into [0, 360).
    pub fn rotate(&mut self, id: &InstanceId, degrees: f64) -> LayoutResult<()> {
        ensure_finite(degrees, "rotation")?;
        self.modify(id, |item| {
            item.rotation = normalize_degrees(degrees);
            Ok(())
        })
    }

    /// Rotate an item relative to its current rotation.
    pub fn rotate_by(&mut self, id: &InstanceId, delta: f64) -> LayoutResult<()> {
        let current = self.require(id)?.rotation;
        self.rotate(id, current + delta)
    }

    pub fn remove(&mut self, id: &InstanceId) -> LayoutResult<PlacedEquipment> {
        let Some(pos) = self.position_of(id) else {
            warn!(%id, "Remove of unknown equipment");
            return Err(LayoutError::UnknownEquipment(id.to_string()));
        };
        let item = self.items.remove(pos);
        self.index.remove(id);
        if self.selected.as_ref() == Some(id) {
            self.selected = None;
        }
        self.mark_dirty();
        debug!(%id, "Removed equipment");
        Ok(item)
    }

    /// Remove the selected item, if any.
    pub fn remove_selected(&mut self) -> Option<PlacedEquipment> {
        let id = self.selected.clone()?;
        self.remove(&id).ok()
    }

    /// Replace the selection. `None` deselects.
    pub fn select(&mut self, id: Option<&InstanceId>) -> LayoutResult<()> {
        if let Some(id) = id {
            if !self.contains(id) {
                warn!(%id, "Select of unknown equipment");
                return Err(LayoutError::UnknownEquipment(id.to_string()));
            }
        }
        let next = id.cloned();
        if self.selected != next {
            self.selected = next;
            self.mark_dirty();
        }
        Ok(())
    }

    /// Apply a property edit. All fields are validated before any are written.
    pub fn update_properties(&mut self, id: &InstanceId, edit: PropertyEdit) -> LayoutResult<()> {
        if let Some(footprint) = &edit.footprint {
            validate_footprint(footprint)?;
        }
        if let Some(Some(clearance)) = &edit.clearance {
            if !clearance.is_valid() {
                return Err(LayoutError::InvalidDimension { field: "clearance", value: 0.0 });
            }
        }
        let pixels_per_foot = self.pixels_per_foot;
        self.modify(id, move |item| {
            if let Some(name) = edit.name {
                item.name = name;
            }
            if let Some(color) = edit.color {
                item.color = color;
            }
            if let Some(footprint) = edit.footprint {
                item.footprint = footprint;
                item.geometry = footprint.to_pixels(pixels_per_foot);
            }
            if let Some(clearance) = edit.clearance {
                item.clearance = clearance;
            }
            Ok(())
        })
    }

    /// Move an item to the end of the draw order.
    pub fn bring_to_front(&mut self, id: &InstanceId) -> LayoutResult<()> {
        let Some(pos) = self.position_of(id) else {
            warn!(%id, "Bring to front of unknown equipment");
            return Err(LayoutError::UnknownEquipment(id.to_string()));
        };
        let item = self.items.remove(pos);
        self.items.push(item);
        self.mark_dirty();
        Ok(())
    }

    pub fn clear(&mut self) {
        self.items.clear();
        self.selected = None;
        self.index.clear();
        self.mark_dirty();
    }

    /// Replace the whole contents, e.g. from a snapshot.
    ///
    /// Ids must be unique and every item finite; the selection must exist.
    pub fn restore(
        &mut self,
        items: Vec<PlacedEquipment>,
        selected: Option<InstanceId>,
    ) -> LayoutResult<()> {
        let mut seen = HashSet::new();
        for item in &items {
            if !seen.insert(&item.id) {
                return Err(LayoutError::DuplicateId(item.id.to_string()));
            }
            if !item.is_finite() {
                return Err(LayoutError::NonFinite { field: "equipment" });
            }
            validate_footprint(&item.footprint)?;
            if let Some(clearance) = &item.clearance {
                if !clearance.is_valid() {
                    return Err(LayoutError::InvalidDimension { field: "clearance", value: 0.0 });
                }
            }
        }
        if let Some(sel) = &selected {
            if !seen.contains(sel) {
                return Err(LayoutError::UnknownEquipment(sel.to_string()));
            }
        }

        // Geometry is always derived from the footprint at this store's scale
        let mut items = items;
        for item in &mut items {
            item.rotation = normalize_degrees(item.rotation);
            item.geometry = item.footprint.to_pixels(self.pixels_per_foot);
        }
        let highest = items.iter().filter_map(|item| item.id.stamp()).max().unwrap_or(0);
        self.last_stamp = self.last_stamp.max(highest);
        self.index
            .rebuild(items.iter().map(|item| (item.id.clone(), item.bounds())));
        self.items = items;
        self.selected = selected;
        self.mark_dirty();
        Ok(())
    }

    // ------------------------------------------------------------------------
    // Internals
    // ------------------------------------------------------------------------

    fn position_of(&self, id: &InstanceId) -> Option<usize> {
        self.items.iter().position(|item| &item.id == id)
    }

    fn require(&self, id: &InstanceId) -> LayoutResult<&PlacedEquipment> {
        self.get(id).ok_or_else(|| {
            warn!(%id, "Unknown equipment");
            LayoutError::UnknownEquipment(id.to_string())
        })
    }

    /// Apply `f` to a copy of the item and commit only if the result is finite.
    fn modify<F>(&mut self, id: &InstanceId, f: F) -> LayoutResult<()>
    where
        F: FnOnce(&mut PlacedEquipment) -> LayoutResult<()>,
    {
        let Some(pos) = self.position_of(id) else {
            warn!(%id, "Update of unknown equipment");
            return Err(LayoutError::UnknownEquipment(id.to_string()));
        };
        let mut updated = self.items[pos].clone();
        f(&mut updated)?;
        if !updated.is_finite() {
            warn!(%id, "Rejected update producing non-finite geometry");
            return Err(LayoutError::NonFinite { field: "equipment" });
        }
        self.index.update(id.clone(), updated.bounds());
        self.items[pos] = updated;
        self.mark_dirty();
        Ok(())
    }

    /// A `<definition>-<stamp>` id not held by any current item.
    fn next_id(&mut self, definition_id: &str) -> InstanceId {
        loop {
            let id = InstanceId::for_definition(definition_id, self.next_stamp());
            if !self.contains(&id) {
                return id;
            }
        }
    }

    /// Millisecond timestamp, bumped so it never repeats within this store.
    fn next_stamp(&mut self) -> u64 {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0);
        let stamp = now.max(self.last_stamp + 1);
        self.last_stamp = stamp;
        stamp
    }
}

fn validate_footprint(footprint: &Footprint) -> LayoutResult<()> {
    match *footprint {
        Footprint::Rectangle { width, length } => {
            ensure_positive(width, "width")?;
            ensure_positive(length, "length")?;
        }
        Footprint::Circle { radius } => {
            ensure_positive(radius, "radius")?;
        }
    }
    Ok(())
}
