//! Layout data types for sticker sheets
//!
//! These types carry the geometry shared by the planner, the placement
//! engine and the rasterizer. Canvas coordinates have their origin at the
//! top-left corner of the sheet with y growing downwards.

/// An axis-aligned rectangle
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Rect {
    /// X position (left edge)
    pub x: f32,
    /// Y position (top edge)
    pub y: f32,
    /// Width
    pub width: f32,
    /// Height
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Right edge x coordinate
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    /// Bottom edge y coordinate
    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    /// Center x coordinate
    pub fn center_x(&self) -> f32 {
        self.x + self.width / 2.0
    }

    /// Center y coordinate
    pub fn center_y(&self) -> f32 {
        self.y + self.height / 2.0
    }

    pub fn area(&self) -> f32 {
        self.width * self.height
    }

    /// Same size, moved to a new origin
    pub fn with_origin(&self, x: f32, y: f32) -> Self {
        Self::new(x, y, self.width, self.height)
    }
}

/// The region of the sheet stickers must stay inside
///
/// Expressed in the same units as the boxes tested against it (canvas pixels
/// for the placement engine).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PrintableArea {
    /// Left inset from the sheet edge
    pub margin_x: f32,
    /// Top inset from the sheet edge
    pub margin_y: f32,
    pub usable_width: f32,
    pub usable_height: f32,
}

impl PrintableArea {
    pub fn new(margin_x: f32, margin_y: f32, usable_width: f32, usable_height: f32) -> Self {
        Self {
            margin_x,
            margin_y,
            usable_width,
            usable_height,
        }
    }

    pub fn bounds(&self) -> Rect {
        Rect::new(
            self.margin_x,
            self.margin_y,
            self.usable_width,
            self.usable_height,
        )
    }

    /// Clamp a box origin so a `width` x `height` box stays inside the area.
    ///
    /// A box larger than the area is pinned to the area's top-left corner.
    pub fn clamp_origin(&self, x: f32, y: f32, width: f32, height: f32) -> (f32, f32) {
        let max_x = (self.margin_x + self.usable_width - width).max(self.margin_x);
        let max_y = (self.margin_y + self.usable_height - height).max(self.margin_y);
        (x.clamp(self.margin_x, max_x), y.clamp(self.margin_y, max_y))
    }
}

/// Position within a grid (row, column)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridPosition {
    /// Row index (0 = top row)
    pub row: usize,
    /// Column index (0 = leftmost column)
    pub col: usize,
}

impl GridPosition {
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

/// A concrete grid placed on the canvas
///
/// Columns and rows may differ in size; adjacent tracks are separated by
/// the gutter. Cells are numbered row-major.
#[derive(Debug, Clone, PartialEq)]
pub struct GridLayout {
    /// Number of columns
    pub cols: usize,
    /// Number of rows
    pub rows: usize,
    /// Width of each column
    pub col_widths: Vec<f32>,
    /// Height of each row
    pub row_heights: Vec<f32>,
    /// Spacing between adjacent columns and rows
    pub gutter: f32,
    /// Top-left corner of the first cell
    pub origin: (f32, f32),
}

impl GridLayout {
    /// Total number of cells in the grid
    pub fn cell_count(&self) -> usize {
        self.cols * self.rows
    }

    /// Full width including gutters
    pub fn width(&self) -> f32 {
        self.col_widths.iter().sum::<f32>() + self.gutter * self.cols.saturating_sub(1) as f32
    }

    /// Full height including gutters
    pub fn height(&self) -> f32 {
        self.row_heights.iter().sum::<f32>() + self.gutter * self.rows.saturating_sub(1) as f32
    }

    /// Row-major position of the cell at `index`
    pub fn position_of(&self, index: usize) -> GridPosition {
        GridPosition::new(index / self.cols, index % self.cols)
    }
}

/// A candidate grid configuration for a sheet and source aspect ratio
///
/// Derived, never persisted: recomputed whenever the sheet, count or
/// aspect ratio change.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LayoutOption {
    pub cols: usize,
    pub rows: usize,
    /// Sticker box width (inches)
    pub sticker_width_in: f32,
    /// Sticker box height (inches)
    pub sticker_height_in: f32,
    /// Sticker box width at print resolution
    pub sticker_width_px: u32,
    /// Sticker box height at print resolution
    pub sticker_height_px: u32,
    /// Human readable description
    pub label: String,
    /// Sticker area over usable sheet area
    pub efficiency: f32,
}

impl LayoutOption {
    /// Stickers this layout holds
    pub fn count(&self) -> usize {
        self.cols * self.rows
    }
}

/// Planner output: ranked options plus the recommended one
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LayoutPlan {
    /// Sorted by efficiency (descending), one option per distinct count
    pub options: Vec<LayoutOption>,
    pub recommended: LayoutOption,
}
