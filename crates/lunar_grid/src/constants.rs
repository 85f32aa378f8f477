//! Fixed values for the lunar quad-sphere.
//!
//! # Level ladder
//!
//! ```text
//!  level   0 ──► 4 ──► 8 ──► 12 ──► 16
//!          │     │     │     │      │
//!        face  global regional local terminal block
//!        (6)   grid
//! ```
//!
//! Only the stops of the ladder are selectable. Each stop is `LEVEL_STEP`
//! levels below the previous one, so one drill reveals 4^4 = 256 cells; the
//! last step is clamped to the terminal level.

/// Mean lunar radius in meters.
pub const MOON_RADIUS_M: f64 = 1_737_400.0;

/// Height of the grid/picking shell above the mean surface, in meters.
///
/// Clears the highest lunar relief so the grid never dips under terrain.
pub const DEFAULT_GRID_ALTITUDE_M: f64 = 10_000.0;

/// Levels advanced by one drill.
pub const LEVEL_STEP: u8 = 4;

/// Deepest selectable level (the "block" level).
pub const DEFAULT_TERMINAL_LEVEL: u8 = 16;

/// Deepest level representable by the 64-bit cell id layout.
pub const MAX_CELL_LEVEL: u8 = 30;

/// Number of level-0 cube faces.
pub const FACE_COUNT: u8 = 6;

/// Fill-mode shrink toward the cell center (leaves a visible gap).
pub const FILL_INSET_RATIO: f64 = 0.97;

/// Bounds of the line-mode ring inset.
pub const MIN_LINE_INSET: f64 = 0.5;
pub const MAX_LINE_INSET: f64 = 0.998;

/// Border ring width in world meters.
pub const DEFAULT_LINE_WIDTH_M: f64 = 60.0;

/// Base-grid polyline width in screen pixels.
pub const DEFAULT_GRID_LINE_WIDTH: f32 = 1.0;

/// Segments per edge when tracing grid polylines along the sphere.
pub const DEFAULT_ARC_SEGMENTS: usize = 4;

/// Flight timing.
pub const DEFAULT_FLIGHT_SECS: f64 = 1.2;
pub const DEFAULT_MID_FLIGHT_FRACTION: f64 = 0.3;

// Camera heights above the mean surface, in meters.
pub const GLOBAL_HEIGHT_M: f64 = 4_500_000.0;
pub const REGIONAL_HEIGHT_M: f64 = 900_000.0;
pub const LOCAL_HEIGHT_M: f64 = 120_000.0;
pub const CLOSE_HEIGHT_M: f64 = 25_000.0;
pub const TERMINAL_HEIGHT_M: f64 = 11_000.0;

/// Number of distinguishable sibling layer colors.
pub const SIBLING_COLOR_COUNT: usize = 4;

#[cfg(test)]
#[path = "constants_test.rs"]
mod constants_test;
