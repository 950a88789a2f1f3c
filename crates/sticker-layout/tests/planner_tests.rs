use sticker_layout::constants::{MAX_STICKER_SIZE_IN, MIN_STICKER_SIZE_IN};
use sticker_layout::*;

#[test]
fn test_square_stickers_nine_up_on_medium_sheet() {
    let sheet = Sheet::new(SheetSize::Medium);
    let plan = plan_layouts(&sheet, 1.0, Some(9)).unwrap();

    assert_eq!(plan.recommended.cols, 3);
    assert_eq!(plan.recommended.rows, 3);
    assert!(plan.recommended.efficiency > 0.0);
    for edge in [
        plan.recommended.sticker_width_in,
        plan.recommended.sticker_height_in,
    ] {
        assert!((MIN_STICKER_SIZE_IN..=MAX_STICKER_SIZE_IN).contains(&edge));
    }
}

#[test]
fn test_planning_is_deterministic() {
    let sheet = Sheet::new(SheetSize::Large);
    let first = plan_layouts(&sheet, 1.5, None).unwrap();
    let second = plan_layouts(&sheet, 1.5, None).unwrap();

    assert_eq!(first, second);
    #[cfg(feature = "serde")]
    assert_eq!(
        serde_json::to_string(&first).unwrap(),
        serde_json::to_string(&second).unwrap()
    );
}

#[test]
fn test_options_sorted_by_efficiency() {
    for size in [SheetSize::Small, SheetSize::Medium, SheetSize::Large] {
        let plan = plan_layouts(&Sheet::new(size), 0.75, None).unwrap();
        for pair in plan.options.windows(2) {
            assert!(pair[0].efficiency >= pair[1].efficiency);
        }

        let position = plan
            .options
            .iter()
            .position(|o| *o == plan.recommended)
            .unwrap();
        for below in &plan.options[position..] {
            assert!(plan.recommended.efficiency >= below.efficiency);
        }
    }
}

#[test]
fn test_one_option_per_count() {
    let plan = plan_layouts(&Sheet::new(SheetSize::Medium), 1.0, None).unwrap();
    let mut counts: Vec<usize> = plan.options.iter().map(LayoutOption::count).collect();
    let total = counts.len();
    counts.sort_unstable();
    counts.dedup();
    assert_eq!(counts.len(), total);
}

#[test]
fn test_every_option_respects_size_bounds() {
    let plan = plan_layouts(&Sheet::new(SheetSize::Large), 2.0, None).unwrap();
    assert!(!plan.options.is_empty());
    for option in &plan.options {
        assert!(option.sticker_width_in >= MIN_STICKER_SIZE_IN);
        assert!(option.sticker_width_in <= MAX_STICKER_SIZE_IN);
        assert!(option.sticker_height_in >= MIN_STICKER_SIZE_IN);
        assert!(option.sticker_height_in <= MAX_STICKER_SIZE_IN);
    }
}

#[test]
fn test_prime_count_widens_to_single_row() {
    // 5 only factors as 1x5 or 5x1
    let plan = plan_layouts(&Sheet::new(SheetSize::Medium), 1.0, Some(5)).unwrap();
    assert_eq!(plan.recommended.count(), 5);
    assert!(plan.recommended.cols == 1 || plan.recommended.rows == 1);
}

#[test]
fn test_unreachable_count_falls_back_to_spare_cells() {
    // 7 in one row is too small per sticker on a 3in sheet, but a 3x3 holds it
    let plan = plan_layouts(&Sheet::new(SheetSize::Small), 1.0, Some(7)).unwrap();
    assert!(plan.recommended.count() >= 7);
}

#[test]
fn test_infeasible_layout() {
    // A 40:1 sliver is always thinner than the smallest printable sticker
    let result = plan_layouts(&Sheet::new(SheetSize::Medium), 40.0, None);
    assert!(matches!(
        result,
        Err(StickerError::InfeasibleLayout { .. })
    ));
}

#[test]
fn test_zero_count_is_rejected() {
    let result = plan_layouts(&Sheet::new(SheetSize::Medium), 1.0, Some(0));
    assert!(matches!(result, Err(StickerError::Config(_))));
}

#[test]
fn test_large_custom_sheet_searches_finer_grids() {
    // Fewer than 14 tracks on both axes leaves every cell above the largest sticker size
    let sheet = Sheet::new("36x36".parse().unwrap());
    let plan = plan_layouts(&sheet, 1.0, None).unwrap();

    assert!(plan.recommended.cols.max(plan.recommended.rows) >= 14);
    for option in &plan.options {
        for edge in [option.sticker_width_in, option.sticker_height_in] {
            assert!((MIN_STICKER_SIZE_IN..=MAX_STICKER_SIZE_IN).contains(&edge));
        }
    }
}

#[test]
fn test_large_custom_sheet_small_count_uses_spare_cells() {
    let sheet = Sheet::new("36x36".parse().unwrap());
    let plan = plan_layouts(&sheet, 1.0, Some(4)).unwrap();
    assert!(plan.recommended.count() >= 14);
    assert!(plan.recommended.sticker_width_in <= MAX_STICKER_SIZE_IN);
}
