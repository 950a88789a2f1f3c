//! Box math shared by every layout stage
//!
//! Bounds containment, gutter-aware collision and aspect-ratio fitting.
//! All functions are pure.

use crate::constants::{GEOMETRY_EPSILON, MIN_BOX_EDGE_PX};

use super::{PrintableArea, Rect};

/// Whether the box `[x, x+w] x [y, y+h]` lies entirely inside the printable area.
pub fn is_within_bounds(x: f32, y: f32, width: f32, height: f32, area: &PrintableArea) -> bool {
    x >= area.margin_x - GEOMETRY_EPSILON
        && y >= area.margin_y - GEOMETRY_EPSILON
        && x + width <= area.margin_x + area.usable_width + GEOMETRY_EPSILON
        && y + height <= area.margin_y + area.usable_height + GEOMETRY_EPSILON
}

/// Whether two boxes are closer than `gutter` on every axis.
///
/// Two boxes are clear of each other when one lies fully left, right,
/// above or below the other with at least `gutter` between them.
/// Symmetric in `a` and `b`.
pub fn check_collision(a: &Rect, b: &Rect, gutter: f32) -> bool {
    let a_left_of_b = a.right() + gutter <= b.x + GEOMETRY_EPSILON;
    let a_right_of_b = b.right() + gutter <= a.x + GEOMETRY_EPSILON;
    let a_above_b = a.bottom() + gutter <= b.y + GEOMETRY_EPSILON;
    let a_below_b = b.bottom() + gutter <= a.y + GEOMETRY_EPSILON;

    !(a_left_of_b || a_right_of_b || a_above_b || a_below_b)
}

/// Fit a box of the given aspect ratio (width / height) inside `cell_width` x `cell_height`.
///
/// One side matches the cell, the other is no larger than the cell.
/// A non-finite or non-positive ratio is treated as square.
pub fn fit_aspect(aspect_ratio: f32, cell_width: f32, cell_height: f32) -> (f32, f32) {
    let aspect = if aspect_ratio.is_finite() && aspect_ratio > 0.0 {
        aspect_ratio
    } else {
        1.0
    };

    if aspect >= cell_width / cell_height {
        // Width constrains
        (cell_width, cell_width / aspect)
    } else {
        // Height constrains
        (cell_height * aspect, cell_height)
    }
}

/// Fit an image of natural size `natural_width` x `natural_height` into a cell,
/// keeping its aspect ratio and never going below [`MIN_BOX_EDGE_PX`] on either side.
///
/// Missing dimensions (zero) fall back to a square box.
pub fn fit_box(
    natural_width: u32,
    natural_height: u32,
    cell_width: f32,
    cell_height: f32,
) -> (f32, f32) {
    let aspect = if natural_width == 0 || natural_height == 0 {
        1.0
    } else {
        natural_width as f32 / natural_height as f32
    };

    let (w, h) = fit_aspect(aspect, cell_width, cell_height);
    (w.max(MIN_BOX_EDGE_PX), h.max(MIN_BOX_EDGE_PX))
}

/// Fit an image into a square cell of edge `cell_size`.
pub fn compute_sticker_box(natural_width: u32, natural_height: u32, cell_size: f32) -> (f32, f32) {
    fit_box(natural_width, natural_height, cell_size, cell_size)
}

/// Origin that centers a `width` x `height` box inside `cell`.
pub fn center_in(cell: &Rect, width: f32, height: f32) -> (f32, f32) {
    (
        cell.x + (cell.width - width) / 2.0,
        cell.y + (cell.height - height) / 2.0,
    )
}

// =============================================================================
// Tests
// =============================================================================
