use sticker_layout::*;

#[test]
fn test_sheet_size_dimensions() {
    assert_eq!(SheetSize::Small.dimensions_in(), (3.0, 3.0));
    assert_eq!(SheetSize::Medium.dimensions_in(), (4.0, 4.0));
    assert_eq!(SheetSize::Large.dimensions_in(), (5.5, 5.5));

    let custom = SheetSize::Custom {
        width_in: 3.0,
        height_in: 5.0,
    };
    assert_eq!(custom.dimensions_in(), (3.0, 5.0));
}

#[test]
fn test_sheet_size_parsing() {
    assert_eq!("4x4".parse::<SheetSize>().unwrap(), SheetSize::Medium);
    assert_eq!("small".parse::<SheetSize>().unwrap(), SheetSize::Small);
    assert_eq!("5.5X5.5".parse::<SheetSize>().unwrap(), SheetSize::Large);
    assert_eq!(
        "2.5 x 6".parse::<SheetSize>().unwrap(),
        SheetSize::Custom {
            width_in: 2.5,
            height_in: 6.0
        }
    );

    assert!("".parse::<SheetSize>().is_err());
    assert!("4by4".parse::<SheetSize>().is_err());
    assert!("-1x4".parse::<SheetSize>().is_err());
}

#[test]
fn test_sheet_size_ids() {
    assert_eq!(SheetSize::Medium.id(), "4x4");
    assert_eq!(SheetSize::Large.to_string(), "5.5x5.5");
}

#[test]
fn test_sheet_usable_area() {
    let sheet = Sheet::new(SheetSize::Medium);
    assert_eq!(sheet.usable_in(), (3.75, 3.75));
    assert!((sheet.usable_area_in2() - 14.0625).abs() < 1e-6);
}

#[test]
fn test_rotation_cycle() {
    let mut rotation = Rotation::default();
    let mut degrees = Vec::new();
    for _ in 0..4 {
        rotation = rotation.next();
        degrees.push(rotation.degrees());
    }
    assert_eq!(degrees, vec![90, 180, 270, 0]);
    assert!(Rotation::Clockwise90.is_quarter_turn());
    assert!(!Rotation::Clockwise180.is_quarter_turn());
}

#[test]
fn test_image_dimensions_aspect() {
    assert_eq!(ImageDimensions::new(200, 100).aspect_ratio(), Some(2.0));
    assert_eq!(ImageDimensions::new(0, 100).aspect_ratio(), None);
}

#[test]
fn test_error_messages() {
    let err = StickerError::CapacityExceeded { max: 4 };
    assert!(err.to_string().contains('4'));

    let err = StickerError::InfeasibleLayout {
        sheet: SheetSize::Small,
        aspect_ratio: 40.0,
        requested: Some(9),
    };
    let message = err.to_string();
    assert!(message.contains("9 stickers"));
    assert!(message.contains("3x3"));
}
