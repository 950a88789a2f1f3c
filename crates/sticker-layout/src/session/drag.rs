//! Drag resolution and relocation
//!
//! The UI can call [`Session::preview_drag`] every frame for feedback; only
//! [`Session::relocate_sticker`] commits a position.

use crate::layout::{Rect, is_within_bounds};
use crate::types::{PlacementId, Result};

use super::{Session, ValidationResult};

/// Where a dragged sticker ends up and whether that spot is valid
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DragResolution {
    pub x: f32,
    pub y: f32,
    /// In bounds and clear of every other placement
    pub valid: bool,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum PushDirection {
    Left,
    Right,
    Up,
    Down,
}

impl PushDirection {
    fn opposite(self) -> Self {
        match self {
            PushDirection::Left => PushDirection::Right,
            PushDirection::Right => PushDirection::Left,
            PushDirection::Up => PushDirection::Down,
            PushDirection::Down => PushDirection::Up,
        }
    }
}

/// Directions to push `item` away from `neighbor`, most natural first.
///
/// The dominant axis of the center-to-center vector comes first, then the
/// other axis, then their opposites.
fn push_order(item: &Rect, neighbor: &Rect) -> [PushDirection; 4] {
    let dx = item.center_x() - neighbor.center_x();
    let dy = item.center_y() - neighbor.center_y();
    let horizontal = if dx >= 0.0 {
        PushDirection::Right
    } else {
        PushDirection::Left
    };
    let vertical = if dy >= 0.0 {
        PushDirection::Down
    } else {
        PushDirection::Up
    };

    if dx.abs() >= dy.abs() {
        [horizontal, vertical, vertical.opposite(), horizontal.opposite()]
    } else {
        [vertical, horizontal, horizontal.opposite(), vertical.opposite()]
    }
}

/// Origin that puts `item` exactly one gutter past `neighbor` in `direction`.
fn push_away(item: &Rect, neighbor: &Rect, direction: PushDirection, gutter: f32) -> (f32, f32) {
    match direction {
        PushDirection::Right => (neighbor.right() + gutter, item.y),
        PushDirection::Left => (neighbor.x - item.width - gutter, item.y),
        PushDirection::Down => (item.x, neighbor.bottom() + gutter),
        PushDirection::Up => (item.x, neighbor.y - item.height - gutter),
    }
}

impl Session {
    /// Mark a placement as being dragged.
    pub fn begin_drag(&mut self, id: PlacementId) -> Result<()> {
        self.index_of(id)?;
        self.drag_target = Some(id);
        Ok(())
    }

    /// Abandon the current drag without moving anything.
    pub fn cancel_drag(&mut self) {
        self.drag_target = None;
    }

    pub fn drag_target(&self) -> Option<PlacementId> {
        self.drag_target
    }

    /// Resolve a drag from `start` moved by `delta` without changing the session.
    pub fn preview_drag(
        &self,
        id: PlacementId,
        start: (f32, f32),
        delta: (f32, f32),
    ) -> Result<DragResolution> {
        self.resolve_position(id, start.0 + delta.0, start.1 + delta.1)
    }

    /// Nearest acceptable position for placement `id` dropped at (`target_x`, `target_y`).
    ///
    /// The target is clamped into the printable area. If the clamped box
    /// collides, it is pushed past each colliding neighbor by the neighbor's
    /// size plus the gutter, in each of the four directions, and re-clamped;
    /// the valid candidate closest to the clamped target wins. With no valid
    /// candidate the first push is returned as a best-effort, invalid result.
    pub fn resolve_position(
        &self,
        id: PlacementId,
        target_x: f32,
        target_y: f32,
    ) -> Result<DragResolution> {
        let index = self.index_of(id)?;
        let placement = &self.placements[index];
        let (width, height) = (placement.width, placement.height);

        let (x, y) = self.area.clamp_origin(target_x, target_y, width, height);
        let clamped = Rect::new(x, y, width, height);
        let in_bounds = |r: &Rect| is_within_bounds(r.x, r.y, r.width, r.height, &self.area);

        let neighbors = self.colliding_rects(&clamped, Some(id));
        if neighbors.is_empty() {
            return Ok(DragResolution {
                x,
                y,
                valid: in_bounds(&clamped),
            });
        }

        let mut best: Option<(f32, f32, f32)> = None;
        let mut best_effort: Option<(f32, f32)> = None;
        for neighbor in &neighbors {
            for direction in push_order(&clamped, neighbor) {
                let (px, py) = push_away(&clamped, neighbor, direction, self.gutter_px);
                let (px, py) = self.area.clamp_origin(px, py, width, height);
                let candidate = clamped.with_origin(px, py);
                best_effort.get_or_insert((px, py));

                if in_bounds(&candidate) && !self.collides_with_any(&candidate, Some(id)) {
                    let distance = (px - x).powi(2) + (py - y).powi(2);
                    if best.is_none_or(|(d, _, _)| distance < d) {
                        best = Some((distance, px, py));
                    }
                }
            }
        }

        Ok(match best {
            Some((_, x, y)) => DragResolution { x, y, valid: true },
            None => {
                let (x, y) = best_effort.unwrap_or((x, y));
                DragResolution { x, y, valid: false }
            }
        })
    }

    /// Commit a drag release for placement `id`.
    ///
    /// Never rejects the move: an unresolvable drop is kept where it landed
    /// and stays flagged until the user fixes it or auto-arranges.
    pub fn relocate_sticker(
        &mut self,
        id: PlacementId,
        target_x: f32,
        target_y: f32,
    ) -> Result<ValidationResult> {
        let resolution = self.resolve_position(id, target_x, target_y)?;
        let index = self.index_of(id)?;

        let placement = &mut self.placements[index];
        placement.x = resolution.x;
        placement.y = resolution.y;

        if !resolution.valid {
            log::warn!(
                "Placement {id} left at ({:.1}, {:.1}) with unresolved collision",
                resolution.x,
                resolution.y
            );
        }

        self.drag_target = None;
        Ok(self.validate().clone())
    }
}
