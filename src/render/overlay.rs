//! Reference image and overlays drawn above the equipment.

use super::{DrawCommand, Rgba, Scene, Stroke};
use crate::calibration::{CalibrationLine, CalibrationPhase};
use crate::constants::{
    ACCENT_COLOR, CALIBRATION_COLOR, CALIBRATION_DASH, CALIBRATION_LINE_WIDTH,
    CALIBRATION_POINT_RADIUS, DEFAULT_EQUIPMENT_COLOR, LABEL_COLOR, LABEL_FONT_SIZE,
    PREVIEW_ALPHA, REFERENCE_IMAGE_ALPHA, THUMBNAIL_SIZE_RATIO,
};
use crate::geometry::{Bounds, Point};
use crate::input::DragPreview;
use crate::measure::MeasureTool;
use crate::reference_image::ReferenceImage;
use crate::types::ShapeKind;
use crate::viewport::ViewTransform;

/// Label offset above a line's midpoint, in surface pixels
const LABEL_LIFT: f64 = 14.0;

/// Reference image with a thin accent border.
pub fn reference_image(img: &ReferenceImage, view: &ViewTransform) -> Vec<DrawCommand> {
    let canvas = img.bounds();
    let bounds = Bounds::new(view.canvas_to_screen(canvas.min), view.canvas_to_screen(canvas.max));
    if !bounds.is_finite() {
        return Vec::new();
    }
    vec![
        DrawCommand::Image { bounds, alpha: REFERENCE_IMAGE_ALPHA },
        DrawCommand::Rect {
            center: bounds.center(),
            size: bounds.size(),
            rotation: 0.0,
            corner_radius: 0.0,
            fill: None,
            stroke: Some(Stroke::solid(accent(), 1.0)),
        },
    ]
}

/// Calibration line, measurement, and drag preview, in that order.
pub fn overlay_layer(scene: &Scene<'_>, view: &ViewTransform) -> Vec<DrawCommand> {
    let mut out = Vec::new();
    if let Some(line) = scene.calibration.line() {
        if scene.calibration.phase() == CalibrationPhase::AwaitingSecondPoint {
            calibration_point(&mut out, view.canvas_to_screen(line.start));
        } else {
            calibration_line(&mut out, line, view);
        }
    }
    if let Some(tool) = scene.measure {
        measurement(&mut out, tool, view);
    }
    if let Some(preview) = scene.preview {
        drag_preview(&mut out, preview);
    }
    out
}

fn accent() -> Rgba {
    Rgba::from_hex_or(ACCENT_COLOR, "#000")
}

fn label_above(out: &mut Vec<DrawCommand>, a: Point, b: Point, text: String, color: Rgba) {
    let mid = a.midpoint(b);
    out.push(DrawCommand::Text {
        center: Point::new(mid.x, mid.y - LABEL_LIFT),
        text,
        font_size: LABEL_FONT_SIZE,
        rotation: 0.0,
        color,
    });
}

fn calibration_point(out: &mut Vec<DrawCommand>, at: Point) {
    out.push(DrawCommand::Circle {
        center: at,
        radius: CALIBRATION_POINT_RADIUS,
        fill: Some(Rgba::from_hex_or(CALIBRATION_COLOR, "#000")),
        stroke: Some(Stroke::solid(Rgba { r: 255, g: 255, b: 255, a: 1.0 }, 2.0)),
    });
}

fn calibration_line(out: &mut Vec<DrawCommand>, line: &CalibrationLine, view: &ViewTransform) {
    let color = Rgba::from_hex_or(CALIBRATION_COLOR, "#000");
    let start = view.canvas_to_screen(line.start);
    let end = view.canvas_to_screen(line.end);
    out.push(DrawCommand::Line {
        from: start,
        to: end,
        stroke: Stroke::dashed(color, CALIBRATION_LINE_WIDTH, CALIBRATION_DASH),
    });
    calibration_point(out, start);
    calibration_point(out, end);
    if let Some(text) = line.label() {
        label_above(out, start, end, text, color);
    }
}

fn measurement(out: &mut Vec<DrawCommand>, tool: &MeasureTool, view: &ViewTransform) {
    let (points, closed) = match tool.result() {
        Some(m) => (m.points.as_slice(), m.points.len() > 2),
        None => (tool.points(), false),
    };
    if points.is_empty() {
        return;
    }
    let stroke = Stroke::solid(accent(), CALIBRATION_LINE_WIDTH);
    let screen: Vec<Point> = points.iter().map(|p| view.canvas_to_screen(*p)).collect();
    for pair in screen.windows(2) {
        out.push(DrawCommand::Line { from: pair[0], to: pair[1], stroke });
    }
    if closed {
        if let (Some(first), Some(last)) = (screen.first(), screen.last()) {
            out.push(DrawCommand::Line { from: *last, to: *first, stroke });
        }
    }
    for p in &screen {
        out.push(DrawCommand::Circle { center: *p, radius: 4.0, fill: Some(accent()), stroke: None });
    }
    if let (Some(result), Some(first), Some(last)) = (tool.result(), screen.first(), screen.last()) {
        label_above(out, *first, *last, result.label(), Rgba::from_hex_or(LABEL_COLOR, "#000"));
    }
}

fn drag_preview(out: &mut Vec<DrawCommand>, preview: &DragPreview) {
    let fill = Rgba::from_hex_or(&preview.color, DEFAULT_EQUIPMENT_COLOR).with_alpha(PREVIEW_ALPHA);
    let stroke = Some(Stroke::dashed(accent(), 2.0, [4.0, 4.0]));
    out.push(match preview.shape {
        ShapeKind::Rectangle => DrawCommand::Rect {
            center: preview.center,
            size: preview.size,
            rotation: preview.rotation,
            corner_radius: 0.0,
            fill: Some(fill),
            stroke,
        },
        ShapeKind::Circle => DrawCommand::Circle {
            center: preview.center,
            radius: preview.size.width.min(preview.size.height) / 2.0,
            fill: Some(fill),
            stroke,
        },
    });
    out.push(DrawCommand::Text {
        center: preview.center,
        text: preview.thumbnail.clone(),
        font_size: preview.size.width.min(preview.size.height) * THUMBNAIL_SIZE_RATIO,
        rotation: preview.rotation,
        color: Rgba::BLACK,
    });
}
