//! Grid layout calculation
//!
//! This module places grids on the canvas: the uniform grid implied by a
//! chosen [`LayoutOption`](super::LayoutOption), used for first-fit
//! placement, and the item-sized grid searched for auto-arrange.

use crate::constants::GEOMETRY_EPSILON;

use super::{GridLayout, GridPosition, PrintableArea, Rect};

// =============================================================================
// Grid Creation
// =============================================================================

/// Create a grid of identical cells, centered in the printable area.
pub fn create_uniform_grid(
    cols: usize,
    rows: usize,
    cell_width: f32,
    cell_height: f32,
    gutter: f32,
    area: &PrintableArea,
) -> GridLayout {
    centered(
        cols,
        rows,
        vec![cell_width; cols],
        vec![cell_height; rows],
        gutter,
        area,
    )
}

fn centered(
    cols: usize,
    rows: usize,
    col_widths: Vec<f32>,
    row_heights: Vec<f32>,
    gutter: f32,
    area: &PrintableArea,
) -> GridLayout {
    let mut grid = GridLayout {
        cols,
        rows,
        col_widths,
        row_heights,
        gutter,
        origin: (area.margin_x, area.margin_y),
    };
    grid.origin = (
        area.margin_x + (area.usable_width - grid.width()) / 2.0,
        area.margin_y + (area.usable_height - grid.height()) / 2.0,
    );
    grid
}

/// Whether the whole grid lies inside the printable area
pub fn grid_fits(grid: &GridLayout, area: &PrintableArea) -> bool {
    grid.width() <= area.usable_width + GEOMETRY_EPSILON
        && grid.height() <= area.usable_height + GEOMETRY_EPSILON
}

// =============================================================================
// Cell Calculations
// =============================================================================

/// Calculate the bounds of a cell at the given grid position.
pub fn cell_bounds(grid: &GridLayout, pos: GridPosition) -> Rect {
    let (origin_x, origin_y) = grid.origin;

    let x = origin_x
        + grid.col_widths[..pos.col].iter().sum::<f32>()
        + pos.col as f32 * grid.gutter;
    let y = origin_y
        + grid.row_heights[..pos.row].iter().sum::<f32>()
        + pos.row as f32 * grid.gutter;

    Rect::new(x, y, grid.col_widths[pos.col], grid.row_heights[pos.row])
}

// =============================================================================
// Auto-arrange Search
// =============================================================================

/// Result of searching a grid for a set of boxes
#[derive(Debug, Clone, PartialEq)]
pub struct ArrangedGrid {
    pub grid: GridLayout,
    /// False when no candidate fit the printable area and the grid is best effort
    pub fits: bool,
}

/// Search a centered grid holding every box in `boxes` (row-major order).
///
/// Each column is as wide as the widest slot in it, each row as tall as the
/// tallest; a slot is the larger of `slot` and the item's own box. Among the
/// column counts that fit, the one with the densest footprint wins. When
/// nothing fits with the full slot size, the search is repeated with slots
/// shrunk to the boxes themselves, and finally the least-overflowing grid is
/// returned as best effort.
pub fn arrange_grid(
    boxes: &[(f32, f32)],
    slot: (f32, f32),
    gutter: f32,
    area: &PrintableArea,
) -> ArrangedGrid {
    let count = boxes.len().max(1);
    let box_area: f32 = boxes.iter().map(|(w, h)| w * h).sum();

    for slot in [slot, (0.0, 0.0)] {
        let mut best: Option<(f32, GridLayout)> = None;
        for grid in candidate_grids(boxes, count, slot, gutter, area) {
            if !grid_fits(&grid, area) {
                continue;
            }
            let footprint = grid.width() * grid.height();
            let density = if footprint > 0.0 {
                box_area / footprint
            } else {
                0.0
            };
            if best.as_ref().is_none_or(|(d, _)| density > *d) {
                best = Some((density, grid));
            }
        }
        if let Some((_, grid)) = best {
            return ArrangedGrid { grid, fits: true };
        }
    }

    // Nothing fits: least overflow wins
    let mut fallback: Option<(f32, GridLayout)> = None;
    for grid in candidate_grids(boxes, count, (0.0, 0.0), gutter, area) {
        let overflow =
            (grid.width() / area.usable_width).max(grid.height() / area.usable_height);
        if fallback.as_ref().is_none_or(|(o, _)| overflow < *o) {
            fallback = Some((overflow, grid));
        }
    }

    let grid = match fallback {
        Some((_, grid)) => grid,
        None => centered(1, 1, vec![slot.0], vec![slot.1], gutter, area),
    };
    ArrangedGrid { grid, fits: false }
}

/// One grid per useful column count; skips counts whose last column stays empty.
fn candidate_grids<'a>(
    boxes: &'a [(f32, f32)],
    count: usize,
    slot: (f32, f32),
    gutter: f32,
    area: &'a PrintableArea,
) -> impl Iterator<Item = GridLayout> + 'a {
    (1..=count)
        .filter(move |&cols| {
            let rows = count.div_ceil(cols);
            count.div_ceil(rows) == cols
        })
        .map(move |cols| {
            let rows = count.div_ceil(cols);
            let mut col_widths = vec![slot.0; cols];
            let mut row_heights = vec![slot.1; rows];
            for (i, &(w, h)) in boxes.iter().enumerate() {
                let (row, col) = (i / cols, i % cols);
                col_widths[col] = col_widths[col].max(w);
                row_heights[row] = row_heights[row].max(h);
            }
            centered(cols, rows, col_widths, row_heights, gutter, area)
        })
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn area() -> PrintableArea {
        PrintableArea::new(10.0, 10.0, 340.0, 340.0)
    }

    #[test]
    fn test_uniform_grid_is_centered() {
        let grid = create_uniform_grid(3, 3, 100.0, 100.0, 5.0, &area());

        assert_eq!(grid.cell_count(), 9);
        assert_eq!(grid.width(), 310.0);
        assert_eq!(grid.height(), 310.0);
        assert_eq!(grid.origin, (25.0, 25.0));
        assert!(grid_fits(&grid, &area()));
    }

    #[test]
    fn test_cell_bounds() {
        let grid = create_uniform_grid(3, 3, 100.0, 100.0, 5.0, &area());

        // Top-left cell
        let bounds = cell_bounds(&grid, GridPosition::new(0, 0));
        assert_eq!(bounds, Rect::new(25.0, 25.0, 100.0, 100.0));

        // Bottom-right cell
        let bounds = cell_bounds(&grid, GridPosition::new(2, 2));
        assert_eq!(bounds.x, 235.0);
        assert_eq!(bounds.y, 235.0);
    }

    #[test]
    fn test_position_of_is_row_major() {
        let grid = create_uniform_grid(3, 2, 50.0, 50.0, 5.0, &area());
        assert_eq!(grid.position_of(0), GridPosition::new(0, 0));
        assert_eq!(grid.position_of(2), GridPosition::new(0, 2));
        assert_eq!(grid.position_of(4), GridPosition::new(1, 1));
    }

    #[test]
    fn test_arrange_grid_fits_uniform_boxes() {
        let boxes = vec![(100.0, 100.0); 5];
        let arranged = arrange_grid(&boxes, (100.0, 100.0), 5.0, &area());

        assert!(arranged.fits);
        assert!(arranged.grid.cell_count() >= 5);
        assert!(grid_fits(&arranged.grid, &area()));
    }

    #[test]
    fn test_arrange_grid_uses_largest_box_per_track() {
        let boxes = vec![(40.0, 40.0), (80.0, 30.0), (40.0, 90.0), (40.0, 40.0)];
        let arranged = arrange_grid(&boxes, (50.0, 50.0), 5.0, &area());

        let grid = &arranged.grid;
        for (i, &(w, h)) in boxes.iter().enumerate() {
            let pos = grid.position_of(i);
            assert!(grid.col_widths[pos.col] >= w.max(50.0));
            assert!(grid.row_heights[pos.row] >= h.max(50.0));
        }
    }

    #[test]
    fn test_arrange_grid_overflow_is_best_effort() {
        let boxes = vec![(300.0, 300.0); 4];
        let arranged = arrange_grid(&boxes, (300.0, 300.0), 5.0, &area());
        assert!(!arranged.fits);
        assert_eq!(arranged.grid.cell_count(), 4);
    }
}
