//! Placement records and validation results

use std::collections::BTreeSet;

use crate::layout::Rect;
use crate::types::{ImageDimensions, PlacementId, Rotation, SourceRef};

/// One instance of a source sticker on the canvas
///
/// Position and size are canvas pixels; `x`/`y` is the top-left corner of
/// the unrotated bounding box.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PlacedSticker {
    pub id: PlacementId,
    pub source: SourceRef,
    /// Natural size of the source image, when the provider knew it
    pub natural: Option<ImageDimensions>,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub rotation: Rotation,
    /// Set by the last validation pass
    pub out_of_bounds: bool,
    /// Set by the last validation pass
    pub colliding: bool,
}

impl PlacedSticker {
    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }

    pub fn is_valid(&self) -> bool {
        !self.out_of_bounds && !self.colliding
    }
}

/// Placements currently out of bounds or colliding with another placement
///
/// Always recomputed from scratch after a structural change.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ValidationResult {
    pub out_of_bounds: BTreeSet<PlacementId>,
    pub colliding: BTreeSet<PlacementId>,
}

impl ValidationResult {
    pub(crate) fn from_placements(placements: &[PlacedSticker]) -> Self {
        Self {
            out_of_bounds: placements
                .iter()
                .filter(|p| p.out_of_bounds)
                .map(|p| p.id)
                .collect(),
            colliding: placements
                .iter()
                .filter(|p| p.colliding)
                .map(|p| p.id)
                .collect(),
        }
    }

    /// True when nothing is flagged; finalize is allowed only then
    pub fn is_valid(&self) -> bool {
        self.out_of_bounds.is_empty() && self.colliding.is_empty()
    }

    pub fn is_flagged(&self, id: PlacementId) -> bool {
        self.out_of_bounds.contains(&id) || self.colliding.contains(&id)
    }

    /// Distinct placements with at least one flag
    pub fn invalid_count(&self) -> usize {
        self.out_of_bounds.union(&self.colliding).count()
    }
}
