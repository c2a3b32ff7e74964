//! Distance, perimeter, and area measurement in real-world units.

use crate::calibration::Calibration;
use crate::error::{LayoutError, LayoutResult};
use crate::geometry::Point;
use crate::units::{LengthUnit, format_length};
use serde::{Deserialize, Serialize};
use tracing::debug;

// ============================================================================
// Pixel-space formulas
// ============================================================================

#[inline]
pub fn distance(a: Point, b: Point) -> f64 {
    a.distance_to(b)
}

/// Length of the closed polygon through `points`.
pub fn perimeter(points: &[Point]) -> f64 {
    if points.len() < 2 {
        return 0.0;
    }
    let open: f64 = points.windows(2).map(|w| w[0].distance_to(w[1])).sum();
    match (points.first(), points.last()) {
        (Some(first), Some(last)) if points.len() > 2 => open + last.distance_to(*first),
        _ => open,
    }
}

/// Unsigned polygon area by the shoelace formula.
pub fn area(points: &[Point]) -> f64 {
    if points.len() < 3 {
        return 0.0;
    }
    let twice: f64 = points
        .iter()
        .zip(points.iter().cycle().skip(1))
        .map(|(a, b)| a.x * b.y - b.x * a.y)
        .sum();
    twice.abs() / 2.0
}

// ============================================================================
// Real-world scale
// ============================================================================

/// Canvas pixels per real-world unit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RealScale {
    pub pixels_per_unit: f64,
    pub unit: LengthUnit,
}

impl RealScale {
    pub fn new(pixels_per_unit: f64, unit: LengthUnit) -> LayoutResult<Self> {
        if !pixels_per_unit.is_finite() || pixels_per_unit <= 0.0 {
            return Err(LayoutError::InvalidDimension {
                field: "pixels_per_unit",
                value: pixels_per_unit,
            });
        }
        Ok(Self { pixels_per_unit, unit })
    }

    /// The calibrated scale, or `pixels_per_foot` in feet without one.
    pub fn resolve(calibration: &Calibration, pixels_per_foot: f64) -> Self {
        match (calibration.pixels_per_unit(), calibration.line()) {
            (Some(ppu), Some(line)) => Self { pixels_per_unit: ppu, unit: line.unit },
            _ => Self { pixels_per_unit: pixels_per_foot, unit: LengthUnit::Feet },
        }
    }

    pub fn length(&self, pixels: f64, target: LengthUnit) -> f64 {
        self.unit.convert(pixels / self.pixels_per_unit, target)
    }

    pub fn area(&self, square_pixels: f64, target: LengthUnit) -> f64 {
        let factor = self.unit.convert(1.0, target);
        square_pixels / (self.pixels_per_unit * self.pixels_per_unit) * factor * factor
    }
}

// ============================================================================
// Measure tool
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MeasureKind {
    Distance,
    Perimeter,
    Area,
}

impl MeasureKind {
    pub fn label(&self) -> &'static str {
        match self {
            MeasureKind::Distance => "Distance",
            MeasureKind::Perimeter => "Perimeter",
            MeasureKind::Area => "Area",
        }
    }

    fn min_points(&self) -> usize {
        match self {
            MeasureKind::Distance => 2,
            MeasureKind::Perimeter | MeasureKind::Area => 3,
        }
    }
}

/// A completed measurement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Measurement {
    pub kind: MeasureKind,
    pub points: Vec<Point>,
    /// In `unit` (square units for area)
    pub value: f64,
    pub unit: LengthUnit,
}

impl Measurement {
    pub fn label(&self) -> String {
        match self.kind {
            MeasureKind::Area => format!("{} sq {}", format_value(self.value), self.unit.abbreviation()),
            _ => format_length(self.value, self.unit),
        }
    }
}

fn format_value(v: f64) -> String {
    if v.fract() == 0.0 { format!("{}", v as i64) } else { format!("{:.2}", v) }
}

/// Collects canvas points for one measurement at a time.
#[derive(Debug, Clone, Default)]
pub struct MeasureTool {
    kind: Option<MeasureKind>,
    points: Vec<Point>,
    result: Option<Measurement>,
}

impl MeasureTool {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn kind(&self) -> Option<MeasureKind> {
        self.kind
    }

    pub fn is_active(&self) -> bool {
        self.kind.is_some()
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn result(&self) -> Option<&Measurement> {
        self.result.as_ref()
    }

    /// Switch to `kind`, discarding any points in progress.
    pub fn activate(&mut self, kind: MeasureKind) {
        self.kind = Some(kind);
        self.points.clear();
        self.result = None;
    }

    pub fn deactivate(&mut self) {
        self.kind = None;
        self.points.clear();
    }

    pub fn clear(&mut self) {
        self.points.clear();
        self.result = None;
    }

    /// Add a point. A distance completes on its second point.
    pub fn add_point(&mut self, p: Point, scale: RealScale, unit: LengthUnit) -> LayoutResult<Option<Measurement>> {
        let Some(kind) = self.kind else {
            return Ok(None);
        };
        if !p.is_finite() {
            return Err(LayoutError::NonFinite { field: "measure point" });
        }
        if self.result.is_some() {
            // Start a fresh measurement after a completed one.
            self.points.clear();
            self.result = None;
        }
        self.points.push(p);
        if kind == MeasureKind::Distance && self.points.len() == 2 {
            return self.finish(scale, unit).map(Some);
        }
        Ok(None)
    }

    /// Close a perimeter or area polygon.
    pub fn close(&mut self, scale: RealScale, unit: LengthUnit) -> LayoutResult<Measurement> {
        self.finish(scale, unit)
    }

    fn finish(&mut self, scale: RealScale, unit: LengthUnit) -> LayoutResult<Measurement> {
        let kind = self
            .kind
            .ok_or_else(|| LayoutError::InvalidDimension { field: "measure tool", value: 0.0 })?;
        if self.points.len() < kind.min_points() {
            return Err(LayoutError::InvalidDimension {
                field: "measure points",
                value: self.points.len() as f64,
            });
        }
        let value = match kind {
            MeasureKind::Distance => scale.length(distance(self.points[0], self.points[1]), unit),
            MeasureKind::Perimeter => scale.length(perimeter(&self.points), unit),
            MeasureKind::Area => scale.area(area(&self.points), unit),
        };
        if !value.is_finite() {
            return Err(LayoutError::NonFinite { field: "measurement" });
        }
        let measurement = Measurement {
            kind,
            points: self.points.clone(),
            value,
            unit,
        };
        debug!(kind = kind.label(), value, "Measurement complete");
        self.result = Some(measurement.clone());
        Ok(measurement)
    }
}
