use crate::session::Session;

/// Summary of a sheet's fill and validity
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SheetStatistics {
    pub placed: usize,
    pub capacity: usize,
    pub remaining: usize,
    /// Fraction of the usable area covered by sticker boxes (overlaps counted twice)
    pub coverage: f32,
    pub out_of_bounds: usize,
    pub colliding: usize,
    /// At least one sticker and nothing flagged
    pub ready_to_print: bool,
}

/// Calculate statistics for the sheet
pub fn calculate_statistics(session: &Session) -> SheetStatistics {
    let placed = session.len();
    let capacity = session.max_stickers();
    let validation = session.validation();

    let usable = session.printable_area().bounds().area();
    let covered: f32 = session.placements().iter().map(|p| p.rect().area()).sum();
    let coverage = if usable > 0.0 { covered / usable } else { 0.0 };

    SheetStatistics {
        placed,
        capacity,
        remaining: capacity.saturating_sub(placed),
        coverage,
        out_of_bounds: validation.out_of_bounds.len(),
        colliding: validation.colliding.len(),
        ready_to_print: placed > 0 && validation.is_valid(),
    }
}
