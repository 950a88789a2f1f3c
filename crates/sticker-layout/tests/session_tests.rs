use sticker_layout::*;

fn session_for(count: usize, options: &SheetOptions) -> Session {
    let plan = plan_layouts(&options.sheet(), 1.0, Some(count)).unwrap();
    create_session(options, plan.recommended).unwrap()
}

fn square() -> Option<ImageDimensions> {
    Some(ImageDimensions::new(512, 512))
}

fn assert_bounds_invariant(session: &Session) {
    let area = session.printable_area();
    for p in session.placements() {
        if p.out_of_bounds {
            continue;
        }
        assert!(p.x >= area.margin_x - 1e-3, "{} left of margin", p.id);
        assert!(p.y >= area.margin_y - 1e-3, "{} above margin", p.id);
        assert!(p.x + p.width <= area.margin_x + area.usable_width + 1e-3);
        assert!(p.y + p.height <= area.margin_y + area.usable_height + 1e-3);
    }
}

#[test]
fn test_fifth_sticker_exceeds_capacity() {
    let mut session = session_for(4, &SheetOptions::default());
    for i in 0..4 {
        session.add_sticker(format!("sticker-{i}"), square()).unwrap();
    }

    let result = session.add_sticker("one-too-many", square());
    assert!(matches!(
        result,
        Err(StickerError::CapacityExceeded { max: 4 })
    ));
    assert_eq!(session.len(), 4);
    assert!(session.is_full());
    assert!(session.validation().is_valid());
}

#[test]
fn test_max_stickers_override() {
    let options = SheetOptions {
        max_stickers: Some(2),
        ..Default::default()
    };
    let mut session = session_for(9, &options);
    session.add_sticker("a", square()).unwrap();
    session.add_sticker("b", square()).unwrap();
    assert!(matches!(
        session.add_sticker("c", square()),
        Err(StickerError::CapacityExceeded { max: 2 })
    ));
}

#[test]
fn test_max_stickers_override_cannot_exceed_layout() {
    let options = SheetOptions {
        max_stickers: Some(30),
        ..Default::default()
    };
    let plan = plan_layouts(&options.sheet(), 1.0, Some(4)).unwrap();
    let result = create_session(&options, plan.recommended.clone());
    assert!(matches!(result, Err(StickerError::Config(_))));

    // Filling a full-size layout still arranges without bounds issues
    let options = SheetOptions {
        max_stickers: Some(4),
        ..Default::default()
    };
    let mut session = create_session(&options, plan.recommended).unwrap();
    for i in 0..4 {
        session.add_sticker(format!("sticker-{i}"), square()).unwrap();
    }
    let validation = session.auto_arrange();
    assert!(validation.is_valid());
    assert_bounds_invariant(&session);
}

#[test]
fn test_same_source_placed_twice() {
    let mut session = session_for(4, &SheetOptions::default());
    let a = session.add_sticker("cat.png", square()).unwrap();
    let b = session.add_sticker("cat.png", square()).unwrap();
    assert_ne!(a, b);
    assert!(session.validation().is_valid());
}

#[test]
fn test_relocate_far_outside_is_clamped() {
    let mut session = session_for(4, &SheetOptions::default());
    let id = session.add_sticker("a", square()).unwrap();

    let validation = session.relocate_sticker(id, -500.0, 900.0).unwrap();
    let p = session.placement(id).unwrap();
    let area = *session.printable_area();

    assert!(!p.out_of_bounds);
    assert!(validation.is_valid());
    assert!((p.x - area.margin_x).abs() < 1e-3);
    assert!((p.y + p.height - (area.margin_y + area.usable_height)).abs() < 1e-3);
}

#[test]
fn test_drop_on_neighbor_is_pushed_clear() {
    let mut session = session_for(4, &SheetOptions::default());
    let a = session.add_sticker("a", square()).unwrap();
    let b = session.add_sticker("b", square()).unwrap();
    let target = session.placement(a).unwrap().rect();

    let validation = session.relocate_sticker(b, target.x, target.y).unwrap();
    let moved = session.placement(b).unwrap().rect();

    assert!(validation.is_valid());
    assert!(!check_collision(&target, &moved, session.gutter_px()));
}

#[test]
fn test_unresolvable_drop_stays_flagged_until_arranged() {
    let mut session = session_for(4, &SheetOptions::default());
    let ids: Vec<_> = (0..4)
        .map(|i| session.add_sticker(format!("s{i}"), square()).unwrap())
        .collect();
    let target = session.placement(ids[0]).unwrap().rect();

    // Every push lands on another sticker in a full grid
    let validation = session.relocate_sticker(ids[3], target.x, target.y).unwrap();
    assert!(!validation.is_valid());
    assert!(validation.is_flagged(ids[3]));
    assert!(session.placement(ids[3]).unwrap().colliding);

    let arranged = session.auto_arrange();
    assert!(arranged.is_valid());
    assert_bounds_invariant(&session);
}

#[test]
fn test_preview_drag_does_not_mutate() {
    let mut session = session_for(4, &SheetOptions::default());
    let id = session.add_sticker("a", square()).unwrap();
    let before = session.placement(id).unwrap().clone();

    session.begin_drag(id).unwrap();
    assert_eq!(session.drag_target(), Some(id));

    let resolution = session
        .preview_drag(id, (before.x, before.y), (40.0, 10_000.0))
        .unwrap();
    assert!(resolution.valid);
    assert_eq!(session.placement(id).unwrap(), &before);

    session.relocate_sticker(id, resolution.x, resolution.y).unwrap();
    assert_eq!(session.drag_target(), None);
    let after = session.placement(id).unwrap();
    assert_eq!((after.x, after.y), (resolution.x, resolution.y));
}

#[test]
fn test_cancel_drag() {
    let mut session = session_for(4, &SheetOptions::default());
    let id = session.add_sticker("a", square()).unwrap();
    session.begin_drag(id).unwrap();
    session.cancel_drag();
    assert_eq!(session.drag_target(), None);

    assert!(matches!(
        session.begin_drag(PlacementId(99)),
        Err(StickerError::UnknownPlacement(_))
    ));
}

#[test]
fn test_remove_clears_drag_target() {
    let mut session = session_for(4, &SheetOptions::default());
    let id = session.add_sticker("a", square()).unwrap();
    session.begin_drag(id).unwrap();
    session.remove_sticker(id).unwrap();
    assert_eq!(session.drag_target(), None);
    assert!(session.is_empty());
}

#[test]
fn test_auto_arrange_mixed_aspects_never_collides() {
    let mut session = session_for(9, &SheetOptions::default());
    let shapes = [
        (512, 512),
        (1024, 256),
        (256, 1024),
        (800, 600),
        (600, 800),
        (300, 300),
        (1000, 100),
        (100, 1000),
        (640, 480),
    ];
    for (i, (w, h)) in shapes.into_iter().enumerate() {
        session
            .add_sticker(format!("s{i}"), Some(ImageDimensions::new(w, h)))
            .unwrap();
    }

    // Scramble the sheet with a few drops, then rearrange
    let ids: Vec<_> = session.placements().iter().map(|p| p.id).collect();
    for (i, id) in ids.iter().enumerate() {
        let offset = (i as f32) * 13.0;
        session.relocate_sticker(*id, offset, offset).unwrap();
    }

    let validation = session.auto_arrange();
    assert!(validation.colliding.is_empty());
    assert!(validation.is_valid());
    assert_bounds_invariant(&session);
}

#[test]
fn test_auto_arrange_keeps_list_order() {
    let mut session = session_for(4, &SheetOptions::default());
    let ids: Vec<_> = (0..3)
        .map(|i| session.add_sticker(format!("s{i}"), square()).unwrap())
        .collect();
    session.auto_arrange();

    let order: Vec<_> = session.placements().iter().map(|p| p.id).collect();
    assert_eq!(order, ids);
    let first = session.placement(ids[0]).unwrap();
    let second = session.placement(ids[1]).unwrap();
    assert!(second.x > first.x || second.y > first.y);
}

#[test]
fn test_rotation_does_not_affect_validation() {
    let mut session = session_for(4, &SheetOptions::default());
    let id = session
        .add_sticker("wide", Some(ImageDimensions::new(400, 100)))
        .unwrap();
    session.add_sticker("other", square()).unwrap();

    session.rotate_sticker(id).unwrap();
    assert_eq!(
        session.placement(id).unwrap().rotation,
        Rotation::Clockwise90
    );
    assert!(session.validation().is_valid());
}

#[test]
fn test_non_square_canvas() {
    let options = SheetOptions {
        canvas_width_px: 480.0,
        canvas_height_px: 360.0,
        ..Default::default()
    };
    let mut session = session_for(4, &options);
    for i in 0..4 {
        session.add_sticker(format!("s{i}"), square()).unwrap();
    }
    assert!(session.validation().is_valid());
    assert_bounds_invariant(&session);

    let area = session.printable_area();
    assert!((area.margin_x - 15.0).abs() < 1e-3);
    assert!((area.margin_y - 11.25).abs() < 1e-3);
}

#[test]
fn test_session_rejects_invalid_options() {
    let plan = plan_layouts(&Sheet::default(), 1.0, Some(4)).unwrap();
    let options = SheetOptions {
        dpi: 0,
        ..Default::default()
    };
    assert!(matches!(
        create_session(&options, plan.recommended),
        Err(StickerError::Config(_))
    ));
}
