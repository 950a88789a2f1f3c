//! Canvas to print coordinate mapping
//!
//! The placement engine works in on-screen canvas pixels; the rasterizer
//! draws in print pixels. Every conversion between the two goes through
//! one [`CoordinateTransform`], scaled independently per axis so
//! non-square canvases map correctly.

use crate::layout::Rect;
use crate::types::Sheet;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoordinateTransform {
    pub canvas_width: f32,
    pub canvas_height: f32,
    pub print_width: u32,
    pub print_height: u32,
}

impl CoordinateTransform {
    pub fn new(canvas_width: f32, canvas_height: f32, print_width: u32, print_height: u32) -> Self {
        Self {
            canvas_width,
            canvas_height,
            print_width,
            print_height,
        }
    }

    /// Transform from a canvas to the sheet's full print resolution
    pub fn for_sheet(sheet: &Sheet, canvas_width: f32, canvas_height: f32) -> Self {
        let (print_width, print_height) = sheet.print_pixels();
        Self::new(canvas_width, canvas_height, print_width, print_height)
    }

    /// Same canvas, different print resolution
    pub fn with_print_size(&self, print_width: u32, print_height: u32) -> Self {
        Self::new(self.canvas_width, self.canvas_height, print_width, print_height)
    }

    /// Print pixels per canvas pixel along x
    pub fn scale_x(&self) -> f32 {
        self.print_width as f32 / self.canvas_width
    }

    /// Print pixels per canvas pixel along y
    pub fn scale_y(&self) -> f32 {
        self.print_height as f32 / self.canvas_height
    }

    pub fn to_print_point(&self, x: f32, y: f32) -> (f32, f32) {
        (x * self.scale_x(), y * self.scale_y())
    }

    pub fn to_canvas_point(&self, x: f32, y: f32) -> (f32, f32) {
        (x / self.scale_x(), y / self.scale_y())
    }

    pub fn to_print_rect(&self, rect: &Rect) -> Rect {
        Rect::new(
            rect.x * self.scale_x(),
            rect.y * self.scale_y(),
            rect.width * self.scale_x(),
            rect.height * self.scale_y(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::SheetSize;

    #[test]
    fn test_square_canvas_scales_uniformly() {
        let t = CoordinateTransform::for_sheet(&Sheet::new(SheetSize::Medium), 400.0, 400.0);
        assert_eq!((t.print_width, t.print_height), (1200, 1200));
        assert_eq!(t.scale_x(), 3.0);
        assert_eq!(t.scale_y(), 3.0);
        assert_eq!(
            t.to_print_rect(&Rect::new(10.0, 20.0, 100.0, 50.0)),
            Rect::new(30.0, 60.0, 300.0, 150.0)
        );
    }

    #[test]
    fn test_non_square_canvas_scales_per_axis() {
        let t = CoordinateTransform::new(300.0, 400.0, 1200, 1200);
        assert_eq!(t.scale_x(), 4.0);
        assert_eq!(t.scale_y(), 3.0);
        assert_eq!(t.to_print_point(10.0, 10.0), (40.0, 30.0));
        assert_eq!(t.to_canvas_point(40.0, 30.0), (10.0, 10.0));
    }
}
