//! Coordinate transforms between screen, canvas, and real-world space.
//!
//! The free functions are the pure formulas. `ViewTransform` owns the current
//! scale and offset and refuses to store anything non-finite.
//!
//! ```text
//! screen = canvas * scale + offset
//! canvas = (screen - offset) / scale
//! real   = canvas / effective_scale
//! ```

use crate::constants::{
    DEFAULT_SCALE, FIT_MAX_SCALE, FIT_MIN_SCALE, FIT_SINGLE_ITEM_MAX_SCALE, MAX_SCALE, MIN_SCALE,
    WHEEL_ZOOM_IN, WHEEL_ZOOM_OUT, ZOOM_IN_FACTOR, ZOOM_OUT_FACTOR,
};
use crate::geometry::{Bounds, Point, Size};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

// ============================================================================
// Pure conversions
// ============================================================================

#[inline]
pub fn screen_to_canvas(p: Point, scale: f64, offset: Point) -> Point {
    Point::new((p.x - offset.x) / scale, (p.y - offset.y) / scale)
}

#[inline]
pub fn canvas_to_screen(p: Point, scale: f64, offset: Point) -> Point {
    Point::new(p.x * scale + offset.x, p.y * scale + offset.y)
}

/// Canvas pixel dimensions to real-world units.
#[inline]
pub fn canvas_to_real_world(dims: Size, effective_scale: f64) -> Size {
    Size::new(dims.width / effective_scale, dims.height / effective_scale)
}

/// Real-world dimensions to canvas pixels.
#[inline]
pub fn real_world_to_canvas(dims: Size, effective_scale: f64) -> Size {
    Size::new(dims.width * effective_scale, dims.height * effective_scale)
}

/// Offset that keeps the canvas point under `pointer` fixed across a zoom.
#[inline]
pub fn zoom_toward_point(pointer: Point, offset: Point, old_scale: f64, new_scale: f64) -> Point {
    let ratio = new_scale / old_scale;
    Point::new(
        pointer.x - (pointer.x - offset.x) * ratio,
        pointer.y - (pointer.y - offset.y) * ratio,
    )
}

// ============================================================================
// View transform
// ============================================================================

/// Pan and zoom state of the canvas view.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewTransform {
    scale: f64,
    offset: Point,
    min_scale: f64,
    max_scale: f64,
}

impl Default for ViewTransform {
    fn default() -> Self {
        Self {
            scale: DEFAULT_SCALE,
            offset: Point::ORIGIN,
            min_scale: MIN_SCALE,
            max_scale: MAX_SCALE,
        }
    }
}

impl ViewTransform {
    pub fn new() -> Self {
        Self::default()
    }

    /// Identity transform with custom scale bounds. Invalid bounds fall back to the defaults.
    pub fn with_scale_bounds(min_scale: f64, max_scale: f64) -> Self {
        let mut view = Self::default();
        view.set_scale_bounds(min_scale, max_scale);
        view
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    pub fn offset(&self) -> Point {
        self.offset
    }

    pub fn min_scale(&self) -> f64 {
        self.min_scale
    }

    pub fn max_scale(&self) -> f64 {
        self.max_scale
    }

    /// Replace the scale bounds and re-clamp the current scale.
    pub fn set_scale_bounds(&mut self, min_scale: f64, max_scale: f64) -> bool {
        let valid = min_scale.is_finite()
            && max_scale.is_finite()
            && min_scale > 0.0
            && min_scale <= max_scale;
        if !valid {
            warn!(min_scale, max_scale, "Rejected invalid scale bounds");
            return false;
        }
        self.min_scale = min_scale;
        self.max_scale = max_scale;
        self.scale = self.scale.clamp(min_scale, max_scale);
        true
    }

    /// Set the zoom level, clamped to the bounds. Non-finite or non-positive
    /// values are rejected and the current scale is kept.
    pub fn set_scale(&mut self, scale: f64) -> bool {
        if !scale.is_finite() || scale <= 0.0 {
            warn!(scale, "Rejected invalid view scale");
            return false;
        }
        self.scale = scale.clamp(self.min_scale, self.max_scale);
        true
    }

    pub fn set_offset(&mut self, offset: Point) -> bool {
        if !offset.is_finite() {
            warn!(?offset, "Rejected non-finite view offset");
            return false;
        }
        self.offset = offset;
        true
    }

    /// Set scale and offset together. Nothing changes unless both are valid.
    pub fn set_view(&mut self, scale: f64, offset: Point) -> bool {
        if !scale.is_finite() || scale <= 0.0 || !offset.is_finite() {
            warn!(scale, ?offset, "Rejected invalid view");
            return false;
        }
        self.scale = scale.clamp(self.min_scale, self.max_scale);
        self.offset = offset;
        true
    }

    /// Pan by a screen-space delta.
    pub fn pan_by(&mut self, delta: Point) -> bool {
        self.set_offset(self.offset + delta)
    }

    /// Multiply the scale by `factor`, keeping the canvas point under `anchor` fixed.
    pub fn zoom_at(&mut self, factor: f64, anchor: Point) -> bool {
        self.zoom_to(self.scale * factor, anchor)
    }

    /// Set the scale to `target` (clamped), keeping the canvas point under `anchor` fixed.
    pub fn zoom_to(&mut self, target: f64, anchor: Point) -> bool {
        if !target.is_finite() || target <= 0.0 || !anchor.is_finite() {
            warn!(target, ?anchor, "Rejected invalid zoom");
            return false;
        }
        let old_scale = self.scale;
        let new_scale = target.clamp(self.min_scale, self.max_scale);
        let offset = zoom_toward_point(anchor, self.offset, old_scale, new_scale);
        if !offset.is_finite() {
            warn!(?offset, "Zoom produced a non-finite offset");
            return false;
        }
        self.scale = new_scale;
        self.offset = offset;
        debug!(scale = new_scale, "Zoomed view");
        true
    }

    pub fn zoom_in(&mut self, anchor: Point) -> bool {
        self.zoom_at(ZOOM_IN_FACTOR, anchor)
    }

    pub fn zoom_out(&mut self, anchor: Point) -> bool {
        self.zoom_at(ZOOM_OUT_FACTOR, anchor)
    }

    /// One wheel notch: negative `delta_y` (wheel up) zooms in.
    pub fn wheel_zoom(&mut self, delta_y: f64, pointer: Point) -> bool {
        if delta_y == 0.0 || !delta_y.is_finite() {
            return false;
        }
        let factor = if delta_y < 0.0 { WHEEL_ZOOM_IN } else { WHEEL_ZOOM_OUT };
        self.zoom_at(factor, pointer)
    }

    /// Jump straight to the maximum zoom around `anchor`.
    pub fn max_out(&mut self, anchor: Point) -> bool {
        self.zoom_to(self.max_scale, anchor)
    }

    /// Restore identity (scale 1, offset 0), keeping the bounds.
    pub fn reset(&mut self) {
        self.scale = DEFAULT_SCALE.clamp(self.min_scale, self.max_scale);
        self.offset = Point::ORIGIN;
    }

    pub fn is_valid(&self) -> bool {
        self.scale.is_finite() && self.scale > 0.0 && self.offset.is_finite()
    }

    /// This transform, or identity if it somehow holds invalid values.
    pub fn validated(&self) -> ViewTransform {
        if self.is_valid() {
            *self
        } else {
            warn!(scale = self.scale, offset = ?self.offset, "Invalid view transform, using identity");
            ViewTransform {
                scale: 1.0,
                offset: Point::ORIGIN,
                ..*self
            }
        }
    }

    /// Screen point to canvas point. Falls back to identity on a non-finite result.
    pub fn screen_to_canvas(&self, p: Point) -> Point {
        let view = self.validated();
        let out = screen_to_canvas(p, view.scale, view.offset);
        if out.is_finite() {
            out
        } else {
            warn!(?p, "Non-finite screen_to_canvas result");
            p
        }
    }

    /// Canvas point to screen point. Falls back to identity on a non-finite result.
    pub fn canvas_to_screen(&self, p: Point) -> Point {
        let view = self.validated();
        let out = canvas_to_screen(p, view.scale, view.offset);
        if out.is_finite() {
            out
        } else {
            warn!(?p, "Non-finite canvas_to_screen result");
            p
        }
    }

    /// Fit `items` into a viewport of `viewport` size with `padding` on every side.
    ///
    /// No items resets the view.
    pub fn fit_to_content(&mut self, items: &[Bounds], viewport: Size, padding: f64) -> bool {
        let finite: Vec<&Bounds> = items.iter().filter(|b| b.is_finite()).collect();
        let Some(first) = finite.first() else {
            self.reset();
            return true;
        };
        if !viewport.is_finite() || viewport.width <= 0.0 || viewport.height <= 0.0 {
            warn!(?viewport, "Cannot fit content into an empty viewport");
            return false;
        }

        let content = finite.iter().skip(1).fold(**first, |acc, b| acc.union(b));
        let ratio = |available: f64, extent: f64| {
            if extent > 0.0 { available / extent } else { f64::INFINITY }
        };
        let fit = ratio(viewport.width - padding * 2.0, content.width())
            .min(ratio(viewport.height - padding * 2.0, content.height()));

        let mut scale = fit.clamp(FIT_MIN_SCALE, FIT_MAX_SCALE);
        if finite.len() == 1 {
            scale = scale.min(FIT_SINGLE_ITEM_MAX_SCALE);
        }
        let scale = scale.clamp(self.min_scale, self.max_scale);

        let center = content.center();
        let offset = Point::new(
            viewport.width / 2.0 - center.x * scale,
            viewport.height / 2.0 - center.y * scale,
        );
        if !offset.is_finite() {
            warn!(?offset, "Fit produced a non-finite offset");
            return false;
        }
        self.scale = scale;
        self.offset = offset;
        debug!(scale, items = finite.len(), "Fit view to content");
        true
    }
}
