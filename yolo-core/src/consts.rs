/// Outline color for bounding boxes drawn on an image (cyan).
pub const BOUNDING_BOX_COLOR: [u8; 3] = [0, 255, 255];

/// Outline thickness, in pixels, for bounding boxes.
///
/// The renderer draws this many nested one-pixel rectangles, growing
/// outwards from the pixel-snapped corners.
pub const BOUNDING_BOX_THICKNESS: u32 = 2;

/// Radius of the marker drawn at the center of a bounding box.
pub const MIDPOINT_SIZE: i32 = 1;

/// Color of the center marker (magenta).
pub const MIDPOINT_COLOR: [u8; 3] = [255, 0, 255];

/// Color used for grid lines.
pub const GRID_LINE_COLOR: [u8; 3] = [127, 127, 127];

/// Default number of grid columns.
///
/// A 7x7 partition of the input image is the classic YOLO layout: every
/// cell is responsible for the objects whose center falls inside it.
pub const DEFAULT_GRID_COLS: u32 = 7;

/// Default number of grid rows.
pub const DEFAULT_GRID_ROWS: u32 = 7;

/// Confidence assigned to rectangles built from two corners.
///
/// Ground truth boxes carry no uncertainty, so corner-built rectangles are
/// always fully confident.
pub const GROUND_TRUTH_CONFIDENCE: f64 = 1.0;

/// Environment variable that overrides the CLI log level.
pub const LOG_ENV_NAME: &str = "RUST_LOG";
