//! Application-wide constants.
//!
//! Centralizes magic numbers and layout values to make the codebase
//! more maintainable and self-documenting.

// ============================================================================
// Real-World Scale
// ============================================================================

/// Canvas pixels per foot used when deriving pixel geometry from a footprint
pub const FEET_TO_PIXELS: f64 = 10.0;

/// Fallback footprint (feet) for catalog entries with missing dimensions
pub const DEFAULT_FOOTPRINT_FT: f64 = 20.0;

/// Multiplier applied to pixels-per-meter when a reference image sets the initial scale
pub const REFERENCE_IMAGE_SCALE_FACTOR: f64 = 0.1;

// ============================================================================
// Zoom & Pan
// ============================================================================

/// Minimum zoom level
pub const MIN_SCALE: f64 = 0.1;

/// Maximum zoom level
pub const MAX_SCALE: f64 = 5.0;

/// Default zoom level
pub const DEFAULT_SCALE: f64 = 1.0;

/// Multiplier for the zoom-in button
pub const ZOOM_IN_FACTOR: f64 = 1.2;

/// Multiplier for the zoom-out button
pub const ZOOM_OUT_FACTOR: f64 = 0.8;

/// Multiplier for one wheel notch towards the user
pub const WHEEL_ZOOM_IN: f64 = 1.1;

/// Multiplier for one wheel notch away from the user
pub const WHEEL_ZOOM_OUT: f64 = 0.9;

// ============================================================================
// Fit To Content
// ============================================================================

/// Screen padding around content when fitting, in pixels
pub const FIT_PADDING: f64 = 50.0;

/// Lowest scale fit-to-content will choose
pub const FIT_MIN_SCALE: f64 = 0.2;

/// Highest scale fit-to-content will choose
pub const FIT_MAX_SCALE: f64 = 1.5;

/// Highest scale when only one item is on the canvas
pub const FIT_SINGLE_ITEM_MAX_SCALE: f64 = 1.2;

// ============================================================================
// Input Handling
// ============================================================================

/// Pointer travel (screen pixels) that turns a press into a drag
pub const DRAG_THRESHOLD: f64 = 5.0;

/// Minimum edge of the floating drag preview in pixels
pub const MIN_PREVIEW_SIZE: f64 = 20.0;

/// Radius of a calibration endpoint handle in screen pixels
pub const CALIBRATION_POINT_RADIUS: f64 = 8.0;

/// Extra slop around calibration handles when grabbing them
pub const CALIBRATION_HIT_SLOP: f64 = 5.0;

// ============================================================================
// Grid
// ============================================================================

/// Base grid pitch in canvas pixels
pub const GRID_SIZE: f64 = 20.0;

/// Every Nth grid line is drawn as a major line
pub const MAJOR_GRID_INTERVAL: u32 = 5;

/// Grid is skipped when projected spacing falls below this many screen pixels
pub const MIN_GRID_SCREEN_SPACING: f64 = 5.0;

/// Scale thresholds and pitch multipliers, checked from the smallest scale up
pub const GRID_PITCH_STEPS: [(f64, f64); 3] = [(0.125, 16.0), (0.25, 8.0), (0.5, 4.0)];

// ============================================================================
// Equipment Rendering
// ============================================================================

/// Labels longer than this many characters are truncated
pub const LABEL_MAX_CHARS: usize = 12;

/// Characters kept before the ellipsis when truncating
pub const LABEL_TRUNCATE_TO: usize = 10;

/// Corner radius for equipment rectangles in screen pixels
pub const EQUIPMENT_CORNER_RADIUS: f64 = 4.0;

/// Edge of a selection handle in screen pixels
pub const SELECTION_HANDLE_SIZE: f64 = 8.0;

/// Fill alpha of equipment shapes
pub const EQUIPMENT_FILL_ALPHA: f64 = 0.8;

/// Stroke width of unselected / selected equipment in screen pixels
pub const EQUIPMENT_STROKE_WIDTH: f64 = 2.0;
pub const SELECTED_STROKE_WIDTH: f64 = 3.0;

/// Thumbnail glyph size as a fraction of the item's shorter side
pub const THUMBNAIL_SIZE_RATIO: f64 = 0.3;

/// Vertical placement of thumbnail, name, and caption as fractions of item height
pub const THUMBNAIL_Y_RATIO: f64 = 0.35;
pub const LABEL_Y_RATIO: f64 = 0.6;
pub const CAPTION_Y_RATIO: f64 = 0.85;

/// Font sizes at zoom 1
pub const LABEL_FONT_SIZE: f64 = 12.0;
pub const CAPTION_FONT_SIZE: f64 = 10.0;

/// Items this far outside the surface (screen pixels) are still drawn
pub const CULLING_MARGIN: f64 = 100.0;

/// Dash pattern of the calibration line
pub const CALIBRATION_DASH: [f64; 2] = [8.0, 8.0];

/// Calibration line width in screen pixels
pub const CALIBRATION_LINE_WIDTH: f64 = 2.0;

/// Alpha of the floating drag preview
pub const PREVIEW_ALPHA: f64 = 0.6;

/// Alpha of the reference image layer
pub const REFERENCE_IMAGE_ALPHA: f64 = 0.8;

/// Alpha of clearance overlays
pub const CLEARANCE_ALPHA: f64 = 0.25;

// ============================================================================
// Colors (default hex values)
// ============================================================================

/// Accent used for selection, reference image border, and drag preview
pub const ACCENT_COLOR: &str = "#007AFF";

/// Stroke for unselected equipment
pub const EQUIPMENT_STROKE_COLOR: &str = "#666666";

/// Fill used when an item carries no color
pub const DEFAULT_EQUIPMENT_COLOR: &str = "#3b82f6";

/// Minor grid line color
pub const GRID_COLOR: &str = "#e5e7eb";

/// Major grid line color
pub const MAJOR_GRID_COLOR: &str = "#d1d5db";

/// Calibration line and handle color
pub const CALIBRATION_COLOR: &str = "#FF3B30";

/// Clearance overlay color
pub const CLEARANCE_COLOR: &str = "#F59E0B";

/// Label text color
pub const LABEL_COLOR: &str = "#000000";

/// Caption text color
pub const CAPTION_COLOR: &str = "#666666";

/// Default thumbnail when a definition has none
pub const DEFAULT_THUMBNAIL: &str = "🎪";
