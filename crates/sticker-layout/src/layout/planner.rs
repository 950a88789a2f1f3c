//! Layout planning
//!
//! Enumerates grid configurations for a sheet, sizes each cell for the
//! source aspect ratio, scores candidates by packing efficiency and picks
//! a recommendation. Planning is deterministic: identical inputs always
//! produce the identical plan.

use crate::constants::{
    COUNT_CEILING, COUNT_WEIGHT, EFFICIENCY_WEIGHT, MAX_STICKER_SIZE_IN, MIN_STICKER_SIZE_IN,
    RECOMMENDATION_POOL,
};
use crate::types::{Result, Sheet, StickerError};

use super::{LayoutOption, LayoutPlan, fit_aspect};

/// Which candidate counts a search stage accepts
#[derive(Debug, Clone, Copy, PartialEq)]
enum CountFilter {
    Any,
    Exactly(usize),
    AtLeast(usize),
}

impl CountFilter {
    fn accepts(self, count: usize) -> bool {
        match self {
            CountFilter::Any => true,
            CountFilter::Exactly(n) => count == n,
            CountFilter::AtLeast(n) => count >= n,
        }
    }
}

/// One pass of the grid search
#[derive(Debug, Clone, Copy)]
struct SearchStage {
    min_tracks: usize,
    filter: CountFilter,
}

/// Plan sticker layouts for a sheet.
///
/// # Arguments
/// * `sheet` - The target sheet (size, DPI, margin, gutter)
/// * `aspect_ratio` - Width / height of the representative sticker image
/// * `desired_count` - Requested sticker count, or `None` to let the planner choose
///
/// The search first tries grids of at least 2x2. When nothing survives the
/// sticker size bounds it widens to single rows and columns and, for a
/// requested count, to grids with spare cells. Only when every stage comes
/// back empty is [`StickerError::InfeasibleLayout`] returned.
pub fn plan_layouts(
    sheet: &Sheet,
    aspect_ratio: f32,
    desired_count: Option<usize>,
) -> Result<LayoutPlan> {
    if desired_count == Some(0) {
        return Err(StickerError::Config(
            "Desired sticker count must be at least 1".to_string(),
        ));
    }

    let (usable_w, usable_h) = sheet.usable_in();
    if usable_w <= 0.0 || usable_h <= 0.0 {
        return Err(StickerError::Config(format!(
            "Margin of {}in leaves no usable area on a {} sheet",
            sheet.margin_in, sheet.size
        )));
    }

    let stages: Vec<SearchStage> = match desired_count {
        None => vec![
            SearchStage {
                min_tracks: 2,
                filter: CountFilter::Any,
            },
            SearchStage {
                min_tracks: 1,
                filter: CountFilter::Any,
            },
        ],
        Some(n) => vec![
            SearchStage {
                min_tracks: 2,
                filter: CountFilter::Exactly(n),
            },
            SearchStage {
                min_tracks: 1,
                filter: CountFilter::Exactly(n),
            },
            SearchStage {
                min_tracks: 1,
                filter: CountFilter::AtLeast(n),
            },
        ],
    };

    let max_tracks = max_grid_size(sheet);
    for stage in stages {
        let candidates = enumerate_candidates(sheet, aspect_ratio, stage, max_tracks);
        log::debug!(
            "Layout search on {} (tracks {}..={}, {:?}): {} candidate(s)",
            sheet.size,
            stage.min_tracks,
            max_tracks,
            stage.filter,
            candidates.len()
        );
        if candidates.is_empty() {
            continue;
        }

        let options = rank_candidates(candidates);
        let recommended = recommend(&options).clone();
        return Ok(LayoutPlan {
            options,
            recommended,
        });
    }

    Err(StickerError::InfeasibleLayout {
        sheet: sheet.size,
        aspect_ratio,
        requested: desired_count,
    })
}

/// Largest column or row count worth searching on this sheet.
///
/// Grows with the usable area: the most minimum-size stickers that fit
/// along the longer usable side, never below 2. Any grid with more tracks
/// would shrink its stickers under the minimum size.
pub fn max_grid_size(sheet: &Sheet) -> usize {
    let (usable_w, usable_h) = sheet.usable_in();
    let longer = usable_w.max(usable_h).max(0.0);
    let gutter = sheet.gutter_in.max(0.0);
    let tracks = ((longer + gutter) / (MIN_STICKER_SIZE_IN + gutter)).floor() as usize;
    tracks.max(2)
}

fn enumerate_candidates(
    sheet: &Sheet,
    aspect_ratio: f32,
    stage: SearchStage,
    max_tracks: usize,
) -> Vec<LayoutOption> {
    let (usable_w, usable_h) = sheet.usable_in();
    let usable_area = usable_w * usable_h;
    let gutter = sheet.gutter_in.max(0.0);

    let mut candidates = Vec::new();
    for cols in stage.min_tracks..=max_tracks {
        for rows in stage.min_tracks..=max_tracks {
            let count = cols * rows;
            if !stage.filter.accepts(count) {
                continue;
            }

            let cell_w = (usable_w - (cols - 1) as f32 * gutter) / cols as f32;
            let cell_h = (usable_h - (rows - 1) as f32 * gutter) / rows as f32;
            if cell_w <= 0.0 || cell_h <= 0.0 {
                continue;
            }

            let (sticker_w, sticker_h) = fit_aspect(aspect_ratio, cell_w, cell_h);
            let in_range = |edge: f32| (MIN_STICKER_SIZE_IN..=MAX_STICKER_SIZE_IN).contains(&edge);
            if !in_range(sticker_w) || !in_range(sticker_h) {
                continue;
            }

            let efficiency = (count as f32 * sticker_w * sticker_h) / usable_area;
            candidates.push(LayoutOption {
                cols,
                rows,
                sticker_width_in: sticker_w,
                sticker_height_in: sticker_h,
                sticker_width_px: (sticker_w * sheet.dpi as f32).round() as u32,
                sticker_height_px: (sticker_h * sheet.dpi as f32).round() as u32,
                label: format!(
                    "{cols}x{rows} - {count} stickers ({sticker_w:.2}in x {sticker_h:.2}in)"
                ),
                efficiency,
            });
        }
    }
    candidates
}

/// Sort by efficiency, then count, then shape; keep the best layout per count.
fn rank_candidates(mut candidates: Vec<LayoutOption>) -> Vec<LayoutOption> {
    candidates.sort_by(|a, b| {
        b.efficiency
            .total_cmp(&a.efficiency)
            .then_with(|| b.count().cmp(&a.count()))
            .then_with(|| a.cols.cmp(&b.cols))
    });

    let mut seen = Vec::new();
    candidates.retain(|option| {
        if seen.contains(&option.count()) {
            false
        } else {
            seen.push(option.count());
            true
        }
    });
    candidates
}

/// Weighted pick among the top-ranked options; earlier options win ties.
fn recommend(options: &[LayoutOption]) -> &LayoutOption {
    let mut best = &options[0];
    let mut best_score = recommendation_score(best);
    for option in options.iter().take(RECOMMENDATION_POOL).skip(1) {
        let score = recommendation_score(option);
        if score > best_score {
            best = option;
            best_score = score;
        }
    }
    best
}

fn recommendation_score(option: &LayoutOption) -> f32 {
    let normalized_count = (option.count() as f32 / COUNT_CEILING as f32).min(1.0);
    EFFICIENCY_WEIGHT * option.efficiency + COUNT_WEIGHT * normalized_count
}

// =============================================================================
// Tests
// =============================================================================
