//! Equipment layer: clearance, body, glyph, name, caption, selection handles.
//!
//! ## Performance Notes
//!
//! Items entirely outside the surface (plus `CULLING_MARGIN`) are skipped.

use super::{DrawCommand, RenderStyle, Rgba, Stroke};
use crate::board::EquipmentStore;
use crate::constants::{
    ACCENT_COLOR, CAPTION_COLOR, CAPTION_FONT_SIZE, CAPTION_Y_RATIO, CLEARANCE_ALPHA,
    CLEARANCE_COLOR, CULLING_MARGIN, DEFAULT_EQUIPMENT_COLOR, EQUIPMENT_CORNER_RADIUS,
    EQUIPMENT_FILL_ALPHA, EQUIPMENT_STROKE_COLOR, EQUIPMENT_STROKE_WIDTH, LABEL_COLOR,
    LABEL_FONT_SIZE, LABEL_TRUNCATE_TO, LABEL_Y_RATIO, SELECTED_STROKE_WIDTH,
    SELECTION_HANDLE_SIZE, THUMBNAIL_SIZE_RATIO, THUMBNAIL_Y_RATIO,
};
use crate::geometry::{Bounds, Point, Size};
use crate::input::DragPreview;
use crate::profile_scope;
use crate::types::{Clearance, Footprint, PixelShape, PlacedEquipment};
use crate::viewport::ViewTransform;
use tracing::warn;

/// Shorten `name` to `max_chars`, keeping `LABEL_TRUNCATE_TO` characters plus `...`.
pub fn truncate_label(name: &str, max_chars: usize) -> String {
    if name.chars().count() > max_chars {
        let keep = LABEL_TRUNCATE_TO.min(max_chars);
        let head: String = name.chars().take(keep).collect();
        format!("{}...", head)
    } else {
        name.to_string()
    }
}

/// Dimension caption such as `8' × 12'` (diameter for round items).
pub fn dimension_caption(footprint: &Footprint) -> String {
    let extent = footprint.extent();
    format!("{}' × {}'", feet(extent.width), feet(extent.height))
}

fn feet(v: f64) -> String {
    if v.fract() == 0.0 { format!("{}", v as i64) } else { format!("{:.1}", v) }
}

pub fn equipment_layer(
    store: &EquipmentStore,
    view: &ViewTransform,
    surface: Size,
    style: &RenderStyle,
    preview: Option<&DragPreview>,
) -> Vec<DrawCommand> {
    profile_scope!("equipment_layer");
    let visible = Bounds::new(
        Point::new(-CULLING_MARGIN, -CULLING_MARGIN),
        Point::new(surface.width + CULLING_MARGIN, surface.height + CULLING_MARGIN),
    );
    let dragged = preview.and_then(|p| p.item.as_ref().map(|id| (id, p.canvas_center)));
    let selected = store.selected();
    let mut commands = Vec::with_capacity(store.len() * 6);

    for item in store.items() {
        if !item.is_finite() {
            warn!(id = %item.id, "Skipping equipment with non-finite geometry");
            continue;
        }
        // A canvas drag draws the item where it would land.
        let center = match dragged {
            Some((id, at)) if *id == item.id && at.is_finite() => at,
            _ => item.position,
        };
        let screen_bounds = screen_bounds(item, center, view);
        if !intersects(&screen_bounds, &visible) {
            continue;
        }
        let is_selected = selected == Some(&item.id);
        draw_item(&mut commands, item, center, view, store.pixels_per_foot(), style, is_selected);
    }
    commands
}

fn screen_bounds(item: &PlacedEquipment, center: Point, view: &ViewTransform) -> Bounds {
    let extent = item.rotated_extent();
    let screen_center = view.canvas_to_screen(center);
    let scale = view.scale();
    Bounds::from_center(screen_center, Size::new(extent.width * scale, extent.height * scale))
}

fn intersects(a: &Bounds, b: &Bounds) -> bool {
    a.min.x <= b.max.x && a.max.x >= b.min.x && a.min.y <= b.max.y && a.max.y >= b.min.y
}

fn draw_item(
    out: &mut Vec<DrawCommand>,
    item: &PlacedEquipment,
    center: Point,
    view: &ViewTransform,
    pixels_per_foot: f64,
    style: &RenderStyle,
    is_selected: bool,
) {
    let scale = view.scale();
    let screen_center = view.canvas_to_screen(center);
    let rotation = item.rotation;
    let size = item.geometry.size();
    let screen_size = Size::new(size.width * scale, size.height * scale);

    if style.show_clearance {
        if let Some(clearance) = &item.clearance {
            out.push(clearance_command(clearance, screen_size, screen_center, rotation, pixels_per_foot * scale));
        }
    }

    let fill = Rgba::from_hex_or(&item.color, DEFAULT_EQUIPMENT_COLOR).with_alpha(EQUIPMENT_FILL_ALPHA);
    let stroke = if is_selected {
        Stroke::solid(Rgba::from_hex_or(ACCENT_COLOR, "#000"), SELECTED_STROKE_WIDTH)
    } else {
        Stroke::solid(Rgba::from_hex_or(EQUIPMENT_STROKE_COLOR, "#000"), EQUIPMENT_STROKE_WIDTH)
    };
    out.push(match item.geometry {
        PixelShape::Rectangle { .. } => DrawCommand::Rect {
            center: screen_center,
            size: screen_size,
            rotation,
            corner_radius: EQUIPMENT_CORNER_RADIUS,
            fill: Some(fill),
            stroke: Some(stroke),
        },
        PixelShape::Circle { radius } => DrawCommand::Circle {
            center: screen_center,
            radius: radius * scale,
            fill: Some(fill),
            stroke: Some(stroke),
        },
    });

    // Text rows are laid out top to bottom in the item's own frame.
    let row = |ratio: f64| {
        let local = Point::new(
            screen_center.x,
            screen_center.y - screen_size.height / 2.0 + screen_size.height * ratio,
        );
        local.rotated_about(screen_center, rotation)
    };
    let glyph_size = screen_size.width.min(screen_size.height) * THUMBNAIL_SIZE_RATIO;
    out.push(DrawCommand::Text {
        center: row(THUMBNAIL_Y_RATIO),
        text: item.thumbnail.clone(),
        font_size: glyph_size,
        rotation,
        color: Rgba::BLACK,
    });
    out.push(DrawCommand::Text {
        center: row(LABEL_Y_RATIO),
        text: truncate_label(&item.name, style.label_max_chars),
        font_size: LABEL_FONT_SIZE * scale,
        rotation,
        color: Rgba::from_hex_or(LABEL_COLOR, "#000"),
    });
    out.push(DrawCommand::Text {
        center: row(CAPTION_Y_RATIO),
        text: dimension_caption(&item.footprint),
        font_size: CAPTION_FONT_SIZE * scale,
        rotation,
        color: Rgba::from_hex_or(CAPTION_COLOR, "#000"),
    });

    if is_selected {
        push_handles(out, screen_center, screen_size, rotation);
    }
}

/// Clearance region behind the item, in surface pixels.
fn clearance_command(
    clearance: &Clearance,
    screen_size: Size,
    screen_center: Point,
    rotation: f64,
    px_per_ft: f64,
) -> DrawCommand {
    let color = Rgba::from_hex_or(CLEARANCE_COLOR, "#000");
    let fill = Some(color.with_alpha(CLEARANCE_ALPHA));
    let stroke = Some(Stroke::dashed(color, 1.0, [4.0, 4.0]));
    match *clearance {
        Clearance::Circle { radius } => DrawCommand::Circle {
            center: screen_center,
            radius: radius * px_per_ft,
            fill,
            stroke,
        },
        Clearance::Rectangle { top, right, bottom, left } => {
            let size = Size::new(
                screen_size.width + (left + right) * px_per_ft,
                screen_size.height + (top + bottom) * px_per_ft,
            );
            // Uneven offsets shift the center; the shift turns with the item.
            let shift = Point::new((right - left) / 2.0 * px_per_ft, (bottom - top) / 2.0 * px_per_ft);
            DrawCommand::Rect {
                center: (screen_center + shift).rotated_about(screen_center, rotation),
                size,
                rotation,
                corner_radius: 0.0,
                fill,
                stroke,
            }
        }
    }
}

fn push_handles(out: &mut Vec<DrawCommand>, center: Point, size: Size, rotation: f64) {
    let fill = Rgba { r: 255, g: 255, b: 255, a: 1.0 };
    let stroke = Stroke::solid(Rgba::from_hex_or(ACCENT_COLOR, "#000"), 1.0);
    let (hw, hh) = (size.width / 2.0, size.height / 2.0);
    for (dx, dy) in [(-hw, -hh), (hw, -hh), (hw, hh), (-hw, hh)] {
        out.push(DrawCommand::Rect {
            center: Point::new(center.x + dx, center.y + dy).rotated_about(center, rotation),
            size: Size::new(SELECTION_HANDLE_SIZE, SELECTION_HANDLE_SIZE),
            rotation,
            corner_radius: 0.0,
            fill: Some(fill),
            stroke: Some(stroke),
        });
    }
}
