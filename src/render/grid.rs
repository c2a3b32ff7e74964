//! Adaptive background grid.
//!
//! The pitch grows as the view zooms out so lines stay readable; when even the
//! coarsest pitch projects to fewer than `MIN_GRID_SCREEN_SPACING` pixels the
//! grid is dropped.

use super::{DrawCommand, RenderStyle, Rgba, Stroke};
use crate::constants::{GRID_COLOR, GRID_PITCH_STEPS, MAJOR_GRID_COLOR, MIN_GRID_SCREEN_SPACING};
use crate::geometry::{Point, Size};
use crate::profile_scope;
use crate::viewport::ViewTransform;

/// Pitch multiplier for a view scale.
pub fn pitch_multiplier(scale: f64) -> f64 {
    GRID_PITCH_STEPS
        .iter()
        .find(|(below, _)| scale < *below)
        .map(|(_, multiplier)| *multiplier)
        .unwrap_or(1.0)
}

/// Canvas-space grid pitch at `scale`.
pub fn grid_pitch(base: f64, scale: f64) -> f64 {
    base * pitch_multiplier(scale)
}

/// Grid lines covering the visible surface.
pub fn grid_lines(view: &ViewTransform, surface: Size, style: &RenderStyle) -> Vec<DrawCommand> {
    profile_scope!("grid_lines");
    let scale = view.scale();
    let pitch = grid_pitch(style.grid_size, scale);
    if !(pitch.is_finite() && pitch > 0.0) || pitch * scale < MIN_GRID_SCREEN_SPACING {
        return Vec::new();
    }

    let top_left = view.screen_to_canvas(Point::ORIGIN);
    let bottom_right = view.screen_to_canvas(Point::new(surface.width, surface.height));
    let minor = Stroke::solid(Rgba::from_hex_or(GRID_COLOR, GRID_COLOR), 1.0);
    let major = Stroke::solid(Rgba::from_hex_or(MAJOR_GRID_COLOR, MAJOR_GRID_COLOR), 1.0);
    let interval = style.major_grid_interval.max(1) as i64;
    let stroke_for = |i: i64| if i.rem_euclid(interval) == 0 { major } else { minor };

    let first_col = (top_left.x / pitch).floor() as i64;
    let last_col = (bottom_right.x / pitch).ceil() as i64;
    let first_row = (top_left.y / pitch).floor() as i64;
    let last_row = (bottom_right.y / pitch).ceil() as i64;

    let mut lines = Vec::with_capacity(((last_col - first_col) + (last_row - first_row) + 2).max(0) as usize);
    for i in first_col..=last_col {
        let x = view.canvas_to_screen(Point::new(i as f64 * pitch, 0.0)).x;
        lines.push(DrawCommand::Line {
            from: Point::new(x, 0.0),
            to: Point::new(x, surface.height),
            stroke: stroke_for(i),
        });
    }
    for j in first_row..=last_row {
        let y = view.canvas_to_screen(Point::new(0.0, j as f64 * pitch)).y;
        lines.push(DrawCommand::Line {
            from: Point::new(0.0, y),
            to: Point::new(surface.width, y),
            stroke: stroke_for(j),
        });
    }
    lines
}
