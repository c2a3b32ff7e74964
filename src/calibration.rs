//! Two-point scale calibration.
//!
//! ## Phases
//!
//! ```text
//! Inactive -> AwaitingFirstPoint   (start)
//! AwaitingFirstPoint -> AwaitingSecondPoint   (place_point)
//! AwaitingSecondPoint -> AwaitingDistance     (place_point, distance prompt shown)
//! AwaitingDistance -> Adjusting               (set_real_distance)
//! Adjusting | Inactive -> Editing             (edit, endpoints draggable)
//! any active -> Inactive                      (save / cancel)
//! any -> Inactive, no line                    (reset)
//! ```
//!
//! The scale is pixels per real-world unit: `pixel_distance / real_distance`,
//! or 1 when no real distance is known.

use crate::error::{LayoutError, LayoutResult};
use crate::geometry::Point;
use crate::units::{LengthUnit, format_length};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// One end of the calibration line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    Start,
    End,
}

/// Calibration line in canvas space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CalibrationLine {
    pub start: Point,
    pub end: Point,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub real_distance: Option<f64>,
    #[serde(default)]
    pub unit: LengthUnit,
}

impl CalibrationLine {
    pub fn new(start: Point, end: Point) -> Self {
        Self {
            start,
            end,
            real_distance: None,
            unit: LengthUnit::default(),
        }
    }

    pub fn pixel_distance(&self) -> f64 {
        self.start.distance_to(self.end)
    }

    /// Pixels per unit, or 1 without a real distance or a measurable line.
    pub fn scale(&self) -> f64 {
        let pixels = self.pixel_distance();
        match self.real_distance {
            Some(real) if real > 0.0 && pixels > 0.0 => pixels / real,
            _ => 1.0,
        }
    }

    fn is_degenerate(&self) -> bool {
        self.pixel_distance() <= 0.0
    }

    pub fn endpoint(&self, which: Endpoint) -> Point {
        match which {
            Endpoint::Start => self.start,
            Endpoint::End => self.end,
        }
    }

    /// Overlay label such as `10 ft`; `None` before a distance is entered.
    pub fn label(&self) -> Option<String> {
        self.real_distance.map(|d| format_length(d, self.unit))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CalibrationPhase {
    #[default]
    Inactive,
    AwaitingFirstPoint,
    AwaitingSecondPoint,
    /// Both points placed; waiting for the real-world distance
    AwaitingDistance,
    /// Distance known, not yet saved
    Adjusting,
    /// Endpoints can be dragged
    Editing,
}

#[derive(Debug, Clone, Default)]
pub struct Calibration {
    phase: CalibrationPhase,
    line: Option<CalibrationLine>,
}

impl Calibration {
    pub fn new() -> Self {
        Self::default()
    }

    /// Restore a previously saved line.
    pub fn from_line(line: CalibrationLine) -> LayoutResult<Self> {
        validate_line(&line)?;
        if let Some(real) = line.real_distance {
            validate_distance(real)?;
            if line.is_degenerate() {
                return Err(LayoutError::InvalidCalibration("line has zero length".into()));
            }
        }
        Ok(Self {
            phase: CalibrationPhase::Inactive,
            line: Some(line),
        })
    }

    pub fn phase(&self) -> CalibrationPhase {
        self.phase
    }

    pub fn line(&self) -> Option<&CalibrationLine> {
        self.line.as_ref()
    }

    pub fn is_active(&self) -> bool {
        self.phase != CalibrationPhase::Inactive
    }

    /// The next canvas click places a calibration point.
    pub fn is_awaiting_point(&self) -> bool {
        matches!(
            self.phase,
            CalibrationPhase::AwaitingFirstPoint | CalibrationPhase::AwaitingSecondPoint
        )
    }

    /// The host should show the distance prompt.
    pub fn needs_distance(&self) -> bool {
        self.phase == CalibrationPhase::AwaitingDistance
    }

    /// Endpoints accept drags.
    pub fn endpoints_draggable(&self) -> bool {
        matches!(
            self.phase,
            CalibrationPhase::AwaitingDistance | CalibrationPhase::Adjusting | CalibrationPhase::Editing
        )
    }

    /// Current pixels-per-unit scale (1 when uncalibrated).
    pub fn scale(&self) -> f64 {
        self.line.map(|l| l.scale()).unwrap_or(1.0)
    }

    /// Pixels per unit once a real distance is known.
    pub fn pixels_per_unit(&self) -> Option<f64> {
        let line = self.line?;
        line.real_distance?;
        if line.is_degenerate() {
            return None;
        }
        let scale = line.scale();
        (scale.is_finite() && scale > 0.0).then_some(scale)
    }

    /// Pixels per foot once a real distance is known.
    pub fn pixels_per_foot(&self) -> Option<f64> {
        let line = self.line?;
        let per_unit = self.pixels_per_unit()?;
        Some(per_unit * LengthUnit::Feet.convert(1.0, line.unit))
    }

    pub fn start(&mut self) {
        self.phase = CalibrationPhase::AwaitingFirstPoint;
        self.line = None;
        debug!("Calibration started");
    }

    /// Place the next calibration point (canvas space).
    pub fn place_point(&mut self, p: Point) -> LayoutResult<()> {
        if !p.is_finite() {
            return Err(LayoutError::NonFinite { field: "calibration point" });
        }
        match self.phase {
            CalibrationPhase::AwaitingFirstPoint => {
                self.line = Some(CalibrationLine::new(p, p));
                self.phase = CalibrationPhase::AwaitingSecondPoint;
                Ok(())
            }
            CalibrationPhase::AwaitingSecondPoint => {
                let line = self.line.as_mut().ok_or_else(|| {
                    LayoutError::InvalidCalibration("no first point".into())
                })?;
                line.end = p;
                self.phase = CalibrationPhase::AwaitingDistance;
                debug!(pixel_distance = line.pixel_distance(), "Calibration line placed");
                Ok(())
            }
            phase => Err(LayoutError::InvalidCalibration(format!(
                "not waiting for a point ({:?})",
                phase
            ))),
        }
    }

    /// Enter the real-world length of the line.
    pub fn set_real_distance(&mut self, distance: f64, unit: LengthUnit) -> LayoutResult<f64> {
        validate_distance(distance)?;
        let line = self
            .line
            .as_mut()
            .ok_or_else(|| LayoutError::InvalidCalibration("no calibration line".into()))?;
        if line.pixel_distance() <= 0.0 {
            warn!("Calibration line has zero length");
            return Err(LayoutError::InvalidCalibration("line has zero length".into()));
        }
        line.real_distance = Some(distance);
        line.unit = unit;
        if self.phase == CalibrationPhase::AwaitingDistance {
            self.phase = CalibrationPhase::Adjusting;
        }
        let scale = line.scale();
        debug!(scale, %unit, "Calibration distance set");
        Ok(scale)
    }

    /// Reopen a line for endpoint editing.
    pub fn edit(&mut self) -> LayoutResult<()> {
        if self.line.is_none() {
            return Err(LayoutError::InvalidCalibration("no calibration line".into()));
        }
        self.phase = CalibrationPhase::Editing;
        Ok(())
    }

    /// Move one endpoint; the scale follows the new pixel distance.
    pub fn move_endpoint(&mut self, which: Endpoint, p: Point) -> LayoutResult<()> {
        if !p.is_finite() {
            return Err(LayoutError::NonFinite { field: "calibration point" });
        }
        if !self.endpoints_draggable() {
            return Err(LayoutError::InvalidCalibration("endpoints are locked".into()));
        }
        let line = self
            .line
            .as_mut()
            .ok_or_else(|| LayoutError::InvalidCalibration("no calibration line".into()))?;
        match which {
            Endpoint::Start => line.start = p,
            Endpoint::End => line.end = p,
        }
        Ok(())
    }

    /// Commit the line. Requires a real distance.
    pub fn save(&mut self) -> LayoutResult<()> {
        let line = self
            .line
            .as_ref()
            .ok_or_else(|| LayoutError::InvalidCalibration("no calibration line".into()))?;
        if line.real_distance.is_none() {
            return Err(LayoutError::InvalidCalibration("distance not set".into()));
        }
        if line.is_degenerate() {
            return Err(LayoutError::InvalidCalibration("line has zero length".into()));
        }
        self.phase = CalibrationPhase::Inactive;
        debug!(scale = line.scale(), "Calibration saved");
        Ok(())
    }

    /// Leave calibration mode, keeping any line already drawn.
    pub fn cancel(&mut self) {
        self.phase = CalibrationPhase::Inactive;
        if self.line.is_some_and(|l| l.pixel_distance() == 0.0) {
            self.line = None;
        }
    }

    /// Drop the line and leave calibration mode.
    pub fn reset(&mut self) {
        self.phase = CalibrationPhase::Inactive;
        self.line = None;
    }
}

fn validate_distance(distance: f64) -> LayoutResult<()> {
    if !distance.is_finite() || distance <= 0.0 {
        warn!(distance, "Rejected calibration distance");
        return Err(LayoutError::InvalidCalibration(format!(
            "distance must be a positive number, got {}",
            distance
        )));
    }
    Ok(())
}

fn validate_line(line: &CalibrationLine) -> LayoutResult<()> {
    if line.start.is_finite() && line.end.is_finite() {
        Ok(())
    } else {
        Err(LayoutError::NonFinite { field: "calibration line" })
    }
}
