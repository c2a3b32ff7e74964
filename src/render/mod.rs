//! Display-list rendering.
//!
//! The core never paints. Each frame is a list of `DrawCommand`s in
//! surface-local screen pixels that the host replays in order:
//!
//! 1. reference image
//! 2. adaptive grid
//! 3. equipment (clearance, shape, glyph, label, caption, handles)
//! 4. overlays (calibration, measurement, drag preview)
//!
//! Frames are only rebuilt when something marked the loop dirty.

pub mod equipment;
pub mod grid;
pub mod overlay;

use crate::board::EquipmentStore;
use crate::calibration::Calibration;
use crate::constants::{GRID_SIZE, LABEL_MAX_CHARS, MAJOR_GRID_INTERVAL};
use crate::geometry::{Bounds, Point, Size};
use crate::input::DragPreview;
use crate::measure::MeasureTool;
use crate::perf::{PerfMonitor, measure};
use crate::profile_scope;
use crate::reference_image::ReferenceImage;
use crate::viewport::ViewTransform;
use serde::Serialize;
use tracing::trace;

// ============================================================================
// Display list
// ============================================================================

/// An sRGB color with alpha.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f64,
}

impl Rgba {
    pub const BLACK: Rgba = Rgba { r: 0, g: 0, b: 0, a: 1.0 };

    /// Parse `#rrggbb` or `#rgb`.
    pub fn from_hex(hex: &str) -> Option<Rgba> {
        let hex = hex.trim().trim_start_matches('#');
        let expanded: String = match hex.len() {
            3 => hex.chars().flat_map(|c| [c, c]).collect(),
            6 => hex.to_string(),
            _ => return None,
        };
        let channel = |i: usize| u8::from_str_radix(expanded.get(i..i + 2)?, 16).ok();
        Some(Rgba {
            r: channel(0)?,
            g: channel(2)?,
            b: channel(4)?,
            a: 1.0,
        })
    }

    /// Parse, falling back to `fallback` (which must itself be valid hex).
    pub fn from_hex_or(hex: &str, fallback: &str) -> Rgba {
        Self::from_hex(hex)
            .or_else(|| Self::from_hex(fallback))
            .unwrap_or(Self::BLACK)
    }

    pub fn with_alpha(self, a: f64) -> Rgba {
        Rgba { a, ..self }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Stroke {
    pub color: Rgba,
    pub width: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dash: Option<[f64; 2]>,
}

impl Stroke {
    pub fn solid(color: Rgba, width: f64) -> Self {
        Self { color, width, dash: None }
    }

    pub fn dashed(color: Rgba, width: f64, dash: [f64; 2]) -> Self {
        Self { color, width, dash: Some(dash) }
    }
}

/// One drawing instruction in surface-local pixels. Rotations are in degrees
/// about the command's center.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum DrawCommand {
    Image {
        bounds: Bounds,
        alpha: f64,
    },
    Rect {
        center: Point,
        size: Size,
        rotation: f64,
        corner_radius: f64,
        fill: Option<Rgba>,
        stroke: Option<Stroke>,
    },
    Circle {
        center: Point,
        radius: f64,
        fill: Option<Rgba>,
        stroke: Option<Stroke>,
    },
    Line {
        from: Point,
        to: Point,
        stroke: Stroke,
    },
    Text {
        center: Point,
        text: String,
        font_size: f64,
        rotation: f64,
        color: Rgba,
    },
}

/// A complete display list, grouped by layer in paint order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Frame {
    pub surface: Size,
    pub reference: Vec<DrawCommand>,
    pub grid: Vec<DrawCommand>,
    pub equipment: Vec<DrawCommand>,
    pub overlay: Vec<DrawCommand>,
}

impl Frame {
    /// All commands in paint order.
    pub fn commands(&self) -> impl Iterator<Item = &DrawCommand> {
        self.reference
            .iter()
            .chain(&self.grid)
            .chain(&self.equipment)
            .chain(&self.overlay)
    }

    pub fn len(&self) -> usize {
        self.reference.len() + self.grid.len() + self.equipment.len() + self.overlay.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

// ============================================================================
// Scene
// ============================================================================

/// Display options that come from settings.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderStyle {
    pub show_grid: bool,
    pub grid_size: f64,
    pub major_grid_interval: u32,
    pub show_clearance: bool,
    pub label_max_chars: usize,
}

impl Default for RenderStyle {
    fn default() -> Self {
        Self {
            show_grid: true,
            grid_size: GRID_SIZE,
            major_grid_interval: MAJOR_GRID_INTERVAL,
            show_clearance: true,
            label_max_chars: LABEL_MAX_CHARS,
        }
    }
}

/// Everything a frame is built from.
pub struct Scene<'a> {
    pub store: &'a EquipmentStore,
    pub view: &'a ViewTransform,
    pub surface: Size,
    pub calibration: &'a Calibration,
    pub reference: Option<&'a ReferenceImage>,
    pub measure: Option<&'a MeasureTool>,
    pub preview: Option<&'a DragPreview>,
    pub style: &'a RenderStyle,
}

/// Build a frame. Pure: the same scene always yields the same frame.
pub fn build_frame(scene: &Scene<'_>) -> Frame {
    profile_scope!("build_frame");
    let view = scene.view.validated();

    Frame {
        surface: scene.surface,
        reference: scene
            .reference
            .map(|img| overlay::reference_image(img, &view))
            .unwrap_or_default(),
        grid: if scene.style.show_grid {
            grid::grid_lines(&view, scene.surface, scene.style)
        } else {
            Vec::new()
        },
        equipment: equipment::equipment_layer(scene.store, &view, scene.surface, scene.style, scene.preview),
        overlay: overlay::overlay_layer(scene, &view),
    }
}

// ============================================================================
// Render loop
// ============================================================================

/// Frames between slow-render summaries.
const SUMMARY_INTERVAL: u64 = 120;

/// Dirty-flag driven frame cache with frame timing.
#[derive(Debug)]
pub struct RenderLoop {
    dirty: bool,
    frame: Frame,
    perf: PerfMonitor,
}

impl Default for RenderLoop {
    fn default() -> Self {
        Self::new()
    }
}

impl RenderLoop {
    pub fn new() -> Self {
        Self {
            dirty: true,
            frame: Frame::default(),
            perf: PerfMonitor::new(),
        }
    }

    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Rebuild if dirty, then return the current frame. The second value is
    /// true when a new frame was built.
    pub fn frame(&mut self, scene: &Scene<'_>, store_dirty: bool) -> (&Frame, bool) {
        if !(self.dirty || store_dirty) {
            return (&self.frame, false);
        }
        self.perf.begin_frame();
        let (frame, build_ms) = measure(|| build_frame(scene));
        self.perf.record_operation("build_frame", build_ms);
        self.frame = frame;
        if let Some(ms) = self.perf.end_frame() {
            trace!(commands = self.frame.len(), frame_ms = ms, "Frame built");
        }
        if self.perf.total_frames() % SUMMARY_INTERVAL == 0 {
            self.perf.log_summary_if_slow();
        }
        self.dirty = false;
        (&self.frame, true)
    }

    /// Last built frame, without rebuilding.
    pub fn last_frame(&self) -> &Frame {
        &self.frame
    }

    pub fn perf(&self) -> &PerfMonitor {
        &self.perf
    }
}
