//! Core types for the layout canvas.
//!
//! This module defines the equipment catalog entries, placed equipment
//! instances, and the shape-tagged geometry they carry. Dimensions that
//! depend on shape are tagged unions so a circle can never carry a width.

use crate::geometry::{Bounds, Point, Size};
use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// Identifiers
// ============================================================================

/// Unique id of a placed equipment instance (`<definition id>-<stamp>`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InstanceId(String);

impl InstanceId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Build an instance id from a definition id and a stamp.
    pub fn for_definition(definition_id: &str, stamp: u64) -> Self {
        Self(format!("{}-{}", definition_id, stamp))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Numeric suffix after the last `-`, if any.
    pub fn stamp(&self) -> Option<u64> {
        self.0.rsplit_once('-').and_then(|(_, tail)| tail.parse().ok())
    }
}

impl fmt::Display for InstanceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for InstanceId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

// ============================================================================
// Catalog Types
// ============================================================================

/// Size class shown in the equipment sidebar
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SizeClass {
    Small,
    Medium,
    Large,
    #[serde(rename = "Extra Large")]
    ExtraLarge,
}

impl SizeClass {
    pub fn label(&self) -> &'static str {
        match self {
            SizeClass::Small => "Small",
            SizeClass::Medium => "Medium",
            SizeClass::Large => "Large",
            SizeClass::ExtraLarge => "Extra Large",
        }
    }
}

/// Nominal footprint of a piece of equipment, in feet.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Footprint {
    Rectangle { width: f64, length: f64 },
    Circle { radius: f64 },
}

impl Footprint {
    /// Pixel geometry at `pixels_per_foot`.
    pub fn to_pixels(&self, pixels_per_foot: f64) -> PixelShape {
        match *self {
            Footprint::Rectangle { width, length } => PixelShape::Rectangle {
                width: width * pixels_per_foot,
                height: length * pixels_per_foot,
            },
            Footprint::Circle { radius } => PixelShape::Circle {
                radius: radius * pixels_per_foot,
            },
        }
    }

    /// Width and length in feet (a circle reports its diameter for both).
    pub fn extent(&self) -> Size {
        match *self {
            Footprint::Rectangle { width, length } => Size::new(width, length),
            Footprint::Circle { radius } => Size::new(radius * 2.0, radius * 2.0),
        }
    }

    pub fn shape_kind(&self) -> ShapeKind {
        match self {
            Footprint::Rectangle { .. } => ShapeKind::Rectangle,
            Footprint::Circle { .. } => ShapeKind::Circle,
        }
    }

    pub fn is_valid(&self) -> bool {
        match *self {
            Footprint::Rectangle { width, length } => {
                width.is_finite() && length.is_finite() && width > 0.0 && length > 0.0
            }
            Footprint::Circle { radius } => radius.is_finite() && radius > 0.0,
        }
    }
}

/// Safety buffer drawn around equipment, in feet.
///
/// Rectangle offsets are measured outward from each edge; a circle radius is
/// measured from the item center.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Clearance {
    Rectangle {
        top: f64,
        right: f64,
        bottom: f64,
        left: f64,
    },
    Circle {
        radius: f64,
    },
}

impl Clearance {
    /// Same offset on all four sides.
    pub fn uniform(offset: f64) -> Self {
        Clearance::Rectangle {
            top: offset,
            right: offset,
            bottom: offset,
            left: offset,
        }
    }

    pub fn is_valid(&self) -> bool {
        match *self {
            Clearance::Rectangle { top, right, bottom, left } => [top, right, bottom, left]
                .iter()
                .all(|v| v.is_finite() && *v >= 0.0),
            Clearance::Circle { radius } => radius.is_finite() && radius > 0.0,
        }
    }
}

/// Catalog entry. Immutable reference data loaded once at startup.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EquipmentDefinition {
    pub id: String,
    pub name: String,
    pub category: String,
    pub size: SizeClass,
    pub footprint: Footprint,
    /// Height in feet, when known
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height_ft: Option<f64>,
    #[serde(default)]
    pub description: String,
    pub thumbnail: String,
    pub color: String,
    /// 1-10, used for sidebar sorting
    pub popularity: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub clearance: Option<Clearance>,
}

// ============================================================================
// Canvas Types
// ============================================================================

/// Shape tag of a placed item
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShapeKind {
    Rectangle,
    Circle,
}

/// Canvas-pixel geometry of a placed item, centered on its position.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum PixelShape {
    Rectangle { width: f64, height: f64 },
    Circle { radius: f64 },
}

impl PixelShape {
    /// Unrotated extent in canvas pixels.
    pub fn size(&self) -> Size {
        match *self {
            PixelShape::Rectangle { width, height } => Size::new(width, height),
            PixelShape::Circle { radius } => Size::new(radius * 2.0, radius * 2.0),
        }
    }

    pub fn kind(&self) -> ShapeKind {
        match self {
            PixelShape::Rectangle { .. } => ShapeKind::Rectangle,
            PixelShape::Circle { .. } => ShapeKind::Circle,
        }
    }

    pub fn is_finite(&self) -> bool {
        self.size().is_finite()
    }
}

/// An equipment definition placed on the canvas.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlacedEquipment {
    pub id: InstanceId,
    pub definition_id: String,
    pub name: String,
    pub category: String,
    pub size: SizeClass,
    /// Nominal footprint in feet
    pub footprint: Footprint,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height_ft: Option<f64>,
    pub thumbnail: String,
    pub color: String,
    /// Center point in canvas space
    pub position: Point,
    /// Pixel geometry derived from the footprint
    pub geometry: PixelShape,
    /// Degrees in [0, 360)
    pub rotation: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub clearance: Option<Clearance>,
}

impl PlacedEquipment {
    pub fn shape(&self) -> ShapeKind {
        self.geometry.kind()
    }

    /// Axis-aligned bounds of the item as drawn, rotation included.
    pub fn bounds(&self) -> Bounds {
        Bounds::from_center(self.position, self.rotated_extent())
    }

    /// Extent of the axis-aligned box that encloses the rotated shape.
    pub fn rotated_extent(&self) -> Size {
        match self.geometry {
            PixelShape::Circle { radius } => Size::new(radius * 2.0, radius * 2.0),
            PixelShape::Rectangle { width, height } => {
                let (sin, cos) = self.rotation.to_radians().sin_cos();
                Size::new(
                    (width * cos).abs() + (height * sin).abs(),
                    (width * sin).abs() + (height * cos).abs(),
                )
            }
        }
    }

    /// Exact point-in-shape test in canvas space.
    ///
    /// Rectangles are tested after rotating the query point back into the
    /// item's local frame.
    pub fn contains(&self, p: Point) -> bool {
        match self.geometry {
            PixelShape::Circle { radius } => self.position.distance_to(p) <= radius,
            PixelShape::Rectangle { width, height } => {
                let local = if self.rotation == 0.0 {
                    p
                } else {
                    p.rotated_about(self.position, -self.rotation)
                };
                (local.x - self.position.x).abs() <= width / 2.0
                    && (local.y - self.position.y).abs() <= height / 2.0
            }
        }
    }

    /// Position, rotation, and geometry are all finite.
    pub fn is_finite(&self) -> bool {
        self.position.is_finite() && self.rotation.is_finite() && self.geometry.is_finite()
    }
}

/// Normalize degrees into [0, 360).
pub fn normalize_degrees(degrees: f64) -> f64 {
    let wrapped = degrees.rem_euclid(360.0);
    // rem_euclid can return 360.0 for tiny negative inputs due to rounding
    if wrapped >= 360.0 { 0.0 } else { wrapped }
}
