//! Sticker sheet editing sessions
//!
//! A [`Session`] exclusively owns the placements of one sheet being built.
//! Every mutation re-runs validation to completion before returning, so
//! callers never observe a half-validated sheet:
//! 1. Add a sticker (grid first-fit, then a fine scan, then auto-arrange)
//! 2. Drag, rotate or remove placements
//! 3. Auto-arrange everything into a clean grid
//! 4. Hand the finished session to the rasterizer

mod arrange;
mod drag;
mod placement;

pub use drag::DragResolution;
pub use placement::{PlacedSticker, ValidationResult};

use crate::layout::{
    LayoutOption, PrintableArea, Rect, check_collision, fit_box, is_within_bounds,
};
use crate::options::SheetOptions;
use crate::transform::CoordinateTransform;
use crate::types::*;

/// The live placement state for one sheet
#[derive(Debug, Clone)]
pub struct Session {
    options: SheetOptions,
    layout: LayoutOption,
    max_stickers: usize,
    /// Printable area in canvas pixels
    area: PrintableArea,
    /// Gutter in canvas pixels
    gutter_px: f32,
    /// Layout cell in canvas pixels
    cell_px: (f32, f32),
    placements: Vec<PlacedSticker>,
    next_id: u64,
    drag_target: Option<PlacementId>,
    validation: ValidationResult,
}

/// Start an editing session for a sheet and a planned layout.
pub fn create_session(options: &SheetOptions, layout: LayoutOption) -> Result<Session> {
    options.validate()?;
    if layout.count() == 0 {
        return Err(StickerError::Config(
            "Layout must have at least one cell".to_string(),
        ));
    }

    let sheet = options.sheet();
    let (sheet_w, sheet_h) = sheet.dimensions_in();
    let (usable_w, usable_h) = sheet.usable_in();
    let ppi_x = options.canvas_width_px / sheet_w;
    let ppi_y = options.canvas_height_px / sheet_h;

    let area = PrintableArea::new(
        sheet.margin_in * ppi_x,
        sheet.margin_in * ppi_y,
        usable_w * ppi_x,
        usable_h * ppi_y,
    );
    // The smaller scale keeps the planned grid inside the area on both axes
    let gutter_px = sheet.gutter_in * ppi_x.min(ppi_y);
    let cell_px = (
        layout.sticker_width_in * ppi_x,
        layout.sticker_height_in * ppi_y,
    );
    // Boxes are sized to the layout cell, so the layout bounds the capacity
    let max_stickers = match options.max_stickers {
        Some(max) if max > layout.count() => {
            return Err(StickerError::Config(format!(
                "Max stickers {max} exceeds the {} cells of layout {}x{}",
                layout.count(),
                layout.cols,
                layout.rows
            )));
        }
        Some(max) => max,
        None => layout.count(),
    };

    log::debug!(
        "New session on {} sheet: layout {}x{}, max {}, cell {:.1}x{:.1}px, gutter {:.2}px",
        sheet.size,
        layout.cols,
        layout.rows,
        max_stickers,
        cell_px.0,
        cell_px.1,
        gutter_px
    );

    Ok(Session {
        options: options.clone(),
        layout,
        max_stickers,
        area,
        gutter_px,
        cell_px,
        placements: Vec::new(),
        next_id: 1,
        drag_target: None,
        validation: ValidationResult::default(),
    })
}

impl Session {
    pub fn options(&self) -> &SheetOptions {
        &self.options
    }

    pub fn sheet(&self) -> Sheet {
        self.options.sheet()
    }

    pub fn layout(&self) -> &LayoutOption {
        &self.layout
    }

    pub fn max_stickers(&self) -> usize {
        self.max_stickers
    }

    pub fn printable_area(&self) -> &PrintableArea {
        &self.area
    }

    pub fn gutter_px(&self) -> f32 {
        self.gutter_px
    }

    /// Size a sticker box is fitted into, in canvas pixels
    pub fn cell_px(&self) -> (f32, f32) {
        self.cell_px
    }

    /// Placements in draw order (later entries draw on top)
    pub fn placements(&self) -> &[PlacedSticker] {
        &self.placements
    }

    pub fn placement(&self, id: PlacementId) -> Option<&PlacedSticker> {
        self.placements.iter().find(|p| p.id == id)
    }

    pub fn len(&self) -> usize {
        self.placements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.placements.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.placements.len() >= self.max_stickers
    }

    /// Result of the last validation pass
    pub fn validation(&self) -> &ValidationResult {
        &self.validation
    }

    /// Canvas to full print resolution mapping for this sheet
    pub fn transform(&self) -> CoordinateTransform {
        CoordinateTransform::for_sheet(
            &self.sheet(),
            self.options.canvas_width_px,
            self.options.canvas_height_px,
        )
    }

    /// Add a sticker for `source` and return its placement id.
    ///
    /// The box is fitted to the source's natural aspect ratio inside the
    /// layout cell (square when the size is unknown). Placement tries the
    /// layout grid's cells in row-major order, then a fine scan of the
    /// usable area; failing both, the sticker is parked at the top-left
    /// corner and the whole sheet is auto-arranged.
    pub fn add_sticker(
        &mut self,
        source: impl Into<SourceRef>,
        natural: Option<ImageDimensions>,
    ) -> Result<PlacementId> {
        if self.is_full() {
            log::debug!("Rejecting add: sheet already holds {}", self.max_stickers);
            return Err(StickerError::CapacityExceeded {
                max: self.max_stickers,
            });
        }

        let (natural_w, natural_h) = natural.map_or((0, 0), |d| (d.width, d.height));
        let (width, height) = fit_box(natural_w, natural_h, self.cell_px.0, self.cell_px.1);

        let id = PlacementId(self.next_id);
        self.next_id += 1;

        let position = self
            .first_fit(width, height)
            .or_else(|| self.scan_fit(width, height));
        let needs_arrange = position.is_none();
        let (x, y) = position.unwrap_or((self.area.margin_x, self.area.margin_y));

        self.placements.push(PlacedSticker {
            id,
            source: source.into(),
            natural,
            x,
            y,
            width,
            height,
            rotation: Rotation::None,
            out_of_bounds: false,
            colliding: false,
        });

        if needs_arrange {
            log::debug!("No free position for {id}; auto-arranging the sheet");
            self.auto_arrange();
        } else {
            self.validate();
        }
        Ok(id)
    }

    /// Delete a placement.
    pub fn remove_sticker(&mut self, id: PlacementId) -> Result<ValidationResult> {
        let index = self.index_of(id)?;
        self.placements.remove(index);
        if self.drag_target == Some(id) {
            self.drag_target = None;
        }
        Ok(self.validate().clone())
    }

    /// Turn a placement a quarter clockwise. Its box is unchanged.
    pub fn rotate_sticker(&mut self, id: PlacementId) -> Result<Rotation> {
        let index = self.index_of(id)?;
        let placement = &mut self.placements[index];
        placement.rotation = placement.rotation.next();
        let rotation = placement.rotation;
        self.validate();
        Ok(rotation)
    }

    /// Remove every placement.
    pub fn clear(&mut self) {
        self.placements.clear();
        self.drag_target = None;
        self.validate();
    }

    /// Recompute bounds and collision flags for every placement.
    ///
    /// A full pairwise scan; the placement count is bounded by the sheet's
    /// capacity.
    pub fn validate(&mut self) -> &ValidationResult {
        let area = self.area;
        let gutter = self.gutter_px;

        for p in &mut self.placements {
            p.out_of_bounds = !is_within_bounds(p.x, p.y, p.width, p.height, &area);
            p.colliding = false;
        }

        let count = self.placements.len();
        for i in 0..count {
            for j in (i + 1)..count {
                if check_collision(&self.placements[i].rect(), &self.placements[j].rect(), gutter)
                {
                    self.placements[i].colliding = true;
                    self.placements[j].colliding = true;
                }
            }
        }

        self.validation = ValidationResult::from_placements(&self.placements);
        &self.validation
    }

    fn index_of(&self, id: PlacementId) -> Result<usize> {
        self.placements
            .iter()
            .position(|p| p.id == id)
            .ok_or(StickerError::UnknownPlacement(id))
    }

    /// Boxes of every other placement that `rect` collides with, in list order
    fn colliding_rects(&self, rect: &Rect, exclude: Option<PlacementId>) -> Vec<Rect> {
        self.placements
            .iter()
            .filter(|p| Some(p.id) != exclude)
            .map(PlacedSticker::rect)
            .filter(|other| check_collision(rect, other, self.gutter_px))
            .collect()
    }

    fn collides_with_any(&self, rect: &Rect, exclude: Option<PlacementId>) -> bool {
        self.placements
            .iter()
            .filter(|p| Some(p.id) != exclude)
            .any(|p| check_collision(rect, &p.rect(), self.gutter_px))
    }
}

// =============================================================================
// Tests
// =============================================================================
