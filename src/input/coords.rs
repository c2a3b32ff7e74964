//! Coordinate conversion for pointer input.
//!
//! Pointer events arrive in window coordinates. The canvas surface sits at
//! `surface_origin` inside the window, and the view transform maps surface
//! coordinates to canvas space.

use crate::geometry::Point;
use crate::viewport::ViewTransform;

/// Context needed for coordinate conversions
#[derive(Debug, Clone, Copy)]
pub struct CoordinateContext<'a> {
    pub view: &'a ViewTransform,
    pub surface_origin: Point,
}

impl<'a> CoordinateContext<'a> {
    #[inline]
    pub fn new(view: &'a ViewTransform, surface_origin: Point) -> Self {
        Self { view, surface_origin }
    }
}

pub struct CoordinateConverter;

impl CoordinateConverter {
    /// Window position to surface-local position
    #[inline]
    pub fn window_to_surface(window_pos: Point, ctx: &CoordinateContext<'_>) -> Point {
        window_pos - ctx.surface_origin
    }

    /// Window position to canvas position
    #[inline]
    pub fn window_to_canvas(window_pos: Point, ctx: &CoordinateContext<'_>) -> Point {
        ctx.view
            .screen_to_canvas(Self::window_to_surface(window_pos, ctx))
    }

    /// Canvas position to surface-local position (what the display list uses)
    #[inline]
    pub fn canvas_to_surface(canvas_pos: Point, ctx: &CoordinateContext<'_>) -> Point {
        ctx.view.canvas_to_screen(canvas_pos)
    }

    /// Canvas position to window position
    #[inline]
    pub fn canvas_to_window(canvas_pos: Point, ctx: &CoordinateContext<'_>) -> Point {
        Self::canvas_to_surface(canvas_pos, ctx) + ctx.surface_origin
    }

    /// Convert a delta from screen to canvas (for drag operations)
    #[inline]
    pub fn delta_screen_to_canvas(delta: Point, scale: f64) -> Point {
        Point::new(delta.x / scale, delta.y / scale)
    }

    /// Convert a delta from canvas to screen
    #[inline]
    pub fn delta_canvas_to_screen(delta: Point, scale: f64) -> Point {
        delta * scale
    }
}
