//! First-fit placement and auto-arrange

use crate::constants::SCAN_STEP_PX;
use crate::layout::{
    Rect, arrange_grid, cell_bounds, center_in, create_uniform_grid, is_within_bounds,
};

use super::{Session, ValidationResult};

impl Session {
    /// First free cell of the layout grid (row-major), box centered in the cell.
    pub(super) fn first_fit(&self, width: f32, height: f32) -> Option<(f32, f32)> {
        let grid = create_uniform_grid(
            self.layout.cols,
            self.layout.rows,
            self.cell_px.0,
            self.cell_px.1,
            self.gutter_px,
            &self.area,
        );

        (0..grid.cell_count()).find_map(|index| {
            let cell = cell_bounds(&grid, grid.position_of(index));
            let (x, y) = center_in(&cell, width, height);
            self.is_free(&Rect::new(x, y, width, height))
                .then_some((x, y))
        })
    }

    /// First free position scanning the usable area in fixed steps, rows first.
    pub(super) fn scan_fit(&self, width: f32, height: f32) -> Option<(f32, f32)> {
        let area = self.area;
        let max_x = area.margin_x + area.usable_width - width;
        let max_y = area.margin_y + area.usable_height - height;

        let mut y = area.margin_y;
        while y <= max_y {
            let mut x = area.margin_x;
            while x <= max_x {
                if self.is_free(&Rect::new(x, y, width, height)) {
                    log::debug!("Grid full; scan found a spot at ({x:.1}, {y:.1})");
                    return Some((x, y));
                }
                x += SCAN_STEP_PX;
            }
            y += SCAN_STEP_PX;
        }
        None
    }

    fn is_free(&self, rect: &Rect) -> bool {
        is_within_bounds(rect.x, rect.y, rect.width, rect.height, &self.area)
            && !self.collides_with_any(rect, None)
    }

    /// Lay every placement out on a fresh centered grid.
    ///
    /// Placements keep their list order (row-major). Each slot is the larger
    /// of the layout cell and the placement's own box, and the box is
    /// centered in its slot, so the result never collides. If the grid
    /// cannot fit the sheet the positions are still committed and the
    /// offending placements stay flagged.
    pub fn auto_arrange(&mut self) -> ValidationResult {
        // Optimistically clear errors; validation below is authoritative
        self.validation = ValidationResult::default();
        for p in &mut self.placements {
            p.out_of_bounds = false;
            p.colliding = false;
        }

        if self.placements.is_empty() {
            return self.validation.clone();
        }

        let boxes: Vec<(f32, f32)> = self
            .placements
            .iter()
            .map(|p| (p.width, p.height))
            .collect();
        let arranged = arrange_grid(&boxes, self.cell_px, self.gutter_px, &self.area);
        let grid = &arranged.grid;

        for (index, p) in self.placements.iter_mut().enumerate() {
            let cell = cell_bounds(grid, grid.position_of(index));
            let (x, y) = center_in(&cell, p.width, p.height);
            p.x = x;
            p.y = y;
        }

        if arranged.fits {
            log::debug!(
                "Auto-arranged {} sticker(s) on a {}x{} grid",
                self.placements.len(),
                grid.cols,
                grid.rows
            );
        } else {
            log::warn!(
                "Auto-arrange could not fit {} sticker(s); keeping best-effort {}x{} grid",
                self.placements.len(),
                grid.cols,
                grid.rows
            );
        }

        self.validate().clone()
    }
}

#[cfg(test)]
mod tests {
    use crate::layout::plan_layouts;
    use crate::options::SheetOptions;
    use crate::session::create_session;
    use crate::types::ImageDimensions;

    #[test]
    fn test_scan_used_when_grid_cells_are_blocked() {
        let options = SheetOptions::default();
        let plan = plan_layouts(&options.sheet(), 1.0, Some(4)).unwrap();
        let mut session = create_session(&options, plan.recommended).unwrap();
        let wide = Some(ImageDimensions::new(100, 20));

        let a = session.add_sticker("a", wide).unwrap();
        let b = session.add_sticker("b", wide).unwrap();
        let c = session.add_sticker("c", wide).unwrap();

        // Straddling the bottom row blocks both of its cells
        let (ax, bx) = (
            session.placement(a).unwrap().x,
            session.placement(b).unwrap().x,
        );
        let bottom_y = session.placement(c).unwrap().y;
        assert!(
            session
                .relocate_sticker(c, (ax + bx) / 2.0, bottom_y)
                .unwrap()
                .is_valid()
        );

        let d = session.add_sticker("d", wide).unwrap();
        let top_y = session.placement(a).unwrap().y;
        assert!(session.placement(d).unwrap().y < top_y);
        assert_eq!(session.len(), 4);
        assert!(session.validation().is_valid());
    }

    #[test]
    fn test_auto_arrange_empty_session() {
        let options = SheetOptions::default();
        let plan = plan_layouts(&options.sheet(), 1.0, Some(4)).unwrap();
        let mut session = create_session(&options, plan.recommended).unwrap();
        assert!(session.auto_arrange().is_valid());
    }
}
