//! Equipment spatial index.
//!
//! R-tree over the axis-aligned envelopes of placed equipment. Point queries
//! return candidates only; exact shape tests happen in `hit_testing`.

use crate::geometry::{Bounds, Point};
use crate::types::InstanceId;
use rstar::{AABB, RTree, RTreeObject};
use std::collections::HashMap;

/// Envelope of one placed item, rotation included.
#[derive(Debug, Clone)]
pub struct SpatialEntry {
    pub id: InstanceId,
    pub bounds: Bounds,
}

impl SpatialEntry {
    pub fn new(id: InstanceId, bounds: Bounds) -> Self {
        Self { id, bounds }
    }

    #[inline]
    pub fn contains_point(&self, p: Point) -> bool {
        self.bounds.contains(p)
    }
}

impl RTreeObject for SpatialEntry {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_corners(
            [self.bounds.min.x, self.bounds.min.y],
            [self.bounds.max.x, self.bounds.max.y],
        )
    }
}

impl PartialEq for SpatialEntry {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

/// Spatial index keyed by instance id.
#[derive(Debug)]
pub struct SpatialIndex {
    tree: RTree<SpatialEntry>,
    entries: HashMap<InstanceId, SpatialEntry>,
}

impl SpatialIndex {
    pub fn new() -> Self {
        Self {
            tree: RTree::new(),
            entries: HashMap::new(),
        }
    }

    /// Bulk-load an index from `(id, bounds)` pairs.
    pub fn from_items<I>(items: I) -> Self
    where
        I: IntoIterator<Item = (InstanceId, Bounds)>,
    {
        let mut index = Self::new();
        index.rebuild(items);
        index
    }

    /// Insert or replace the envelope for `id`. Non-finite bounds are not indexed.
    pub fn insert(&mut self, id: InstanceId, bounds: Bounds) {
        self.remove(&id);
        if !bounds.is_finite() {
            tracing::warn!(%id, "Skipping non-finite bounds in spatial index");
            return;
        }
        let entry = SpatialEntry::new(id.clone(), bounds);
        self.tree.insert(entry.clone());
        self.entries.insert(id, entry);
    }

    pub fn remove(&mut self, id: &InstanceId) -> bool {
        if let Some(entry) = self.entries.remove(id) {
            self.tree.remove(&entry);
            true
        } else {
            false
        }
    }

    pub fn update(&mut self, id: InstanceId, bounds: Bounds) {
        self.insert(id, bounds);
    }

    /// Ids whose envelope contains `p` (canvas coordinates), in no particular order.
    pub fn query_point(&self, p: Point) -> Vec<InstanceId> {
        let point_envelope = AABB::from_point([p.x, p.y]);

        self.tree
            .locate_in_envelope_intersecting(&point_envelope)
            .filter(|entry| entry.contains_point(p))
            .map(|entry| entry.id.clone())
            .collect()
    }

    /// Ids whose envelope intersects `region`.
    pub fn query_rect(&self, region: Bounds) -> Vec<InstanceId> {
        let envelope = AABB::from_corners(
            [region.min.x, region.min.y],
            [region.max.x, region.max.y],
        );

        self.tree
            .locate_in_envelope_intersecting(&envelope)
            .map(|entry| entry.id.clone())
            .collect()
    }

    pub fn bounds_of(&self, id: &InstanceId) -> Option<Bounds> {
        self.entries.get(id).map(|e| e.bounds)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn rebuild<I>(&mut self, items: I)
    where
        I: IntoIterator<Item = (InstanceId, Bounds)>,
    {
        let entries: Vec<SpatialEntry> = items
            .into_iter()
            .filter(|(_, bounds)| bounds.is_finite())
            .map(|(id, bounds)| SpatialEntry::new(id, bounds))
            .collect();

        self.entries = entries.iter().map(|e| (e.id.clone(), e.clone())).collect();
        self.tree = RTree::bulk_load(entries);
    }

    pub fn clear(&mut self) {
        self.tree = RTree::new();
        self.entries.clear();
    }
}

impl Default for SpatialIndex {
    fn default() -> Self {
        Self::new()
    }
}
