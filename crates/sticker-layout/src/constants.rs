//! Shared constants for sticker sheet layout
//!
//! This module centralizes magic numbers and constants used throughout
//! planning, placement and rasterization.

// =============================================================================
// Sheet Defaults
// =============================================================================

/// Print resolution of every sheet (dots per inch)
pub const DEFAULT_DPI: u32 = 300;

/// Default outer margin from the sheet edge (inches)
pub const DEFAULT_MARGIN_IN: f32 = 0.125;

/// Default minimum spacing between adjacent stickers (inches)
pub const DEFAULT_GUTTER_IN: f32 = 0.0625;

/// Default on-screen canvas edge (pixels)
pub const DEFAULT_CANVAS_PX: f32 = 360.0;

/// Default per-image load timeout for rasterization (milliseconds)
pub const DEFAULT_IMAGE_TIMEOUT_MS: u64 = 10_000;

// =============================================================================
// Layout Planner
// =============================================================================

/// Smallest sticker edge the printer can cut cleanly (inches)
pub const MIN_STICKER_SIZE_IN: f32 = 0.35;

/// Largest sticker edge offered on a sheet (inches)
pub const MAX_STICKER_SIZE_IN: f32 = 2.5;

/// Weight of packing efficiency in the recommendation score
pub const EFFICIENCY_WEIGHT: f32 = 0.7;

/// Weight of sticker count in the recommendation score
pub const COUNT_WEIGHT: f32 = 0.3;

/// Count at which the count term of the recommendation score saturates
pub const COUNT_CEILING: usize = 36;

/// Only this many top-ranked candidates compete for the recommendation
pub const RECOMMENDATION_POOL: usize = 6;

// =============================================================================
// Placement Engine
// =============================================================================

/// Minimum edge of a sticker box on the canvas (pixels)
pub const MIN_BOX_EDGE_PX: f32 = 24.0;

/// Step of the fine-grained scan used when no grid cell is free (pixels)
pub const SCAN_STEP_PX: f32 = 8.0;

/// Tolerance for floating point comparisons on canvas coordinates (pixels)
pub const GEOMETRY_EPSILON: f32 = 1e-3;

// =============================================================================
// Rasterizer
// =============================================================================

/// Largest raster surface the compositor will allocate (bytes, RGBA8)
pub const MAX_RASTER_BYTES: usize = 512 * 1024 * 1024;

/// Background used when the options do not specify one (opaque white)
pub const DEFAULT_BACKGROUND: [u8; 4] = [255, 255, 255, 255];
