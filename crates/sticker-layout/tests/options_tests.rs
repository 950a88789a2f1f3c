use sticker_layout::*;

#[test]
fn test_default_options_are_valid() {
    let options = SheetOptions::default();
    assert!(options.validate().is_ok());
    assert_eq!(options.sheet_size, SheetSize::Medium);
    assert_eq!(options.dpi, 300);
    assert_eq!(options.sheet().print_pixels(), (1200, 1200));
}

#[test]
fn test_validation_zero_dpi() {
    let options = SheetOptions {
        dpi: 0,
        ..Default::default()
    };
    match options.validate() {
        Err(StickerError::Config(msg)) => {
            assert!(msg.contains("DPI"));
        }
        _ => panic!("Expected Config error"),
    }
}

#[test]
fn test_validation_margins() {
    let mut options = SheetOptions::default();

    // Negative gutter
    options.gutter_in = -0.1;
    assert!(options.validate().is_err());

    // Margins that swallow the sheet
    options.gutter_in = 0.0;
    options.margin_in = 2.0;
    assert!(options.validate().is_err());

    // Zero margin is fine
    options.margin_in = 0.0;
    assert!(options.validate().is_ok());

    // NaN never validates
    options.margin_in = f32::NAN;
    assert!(options.validate().is_err());
}

#[test]
fn test_validation_canvas_and_limits() {
    let mut options = SheetOptions::default();

    options.canvas_height_px = 0.0;
    assert!(options.validate().is_err());

    options.canvas_height_px = 360.0;
    options.max_stickers = Some(0);
    assert!(options.validate().is_err());

    options.max_stickers = Some(12);
    options.image_timeout_ms = 0;
    assert!(options.validate().is_err());

    options.image_timeout_ms = 250;
    assert!(options.validate().is_ok());
    assert_eq!(options.image_timeout().as_millis(), 250);
}

#[test]
fn test_validation_custom_sheet() {
    let options = SheetOptions::for_size(SheetSize::Custom {
        width_in: 0.0,
        height_in: 4.0,
    });
    assert!(options.validate().is_err());

    let options = SheetOptions::for_size(SheetSize::Custom {
        width_in: 3.0,
        height_in: 5.0,
    });
    assert!(options.validate().is_ok());
}

#[cfg(feature = "serde")]
#[tokio::test]
async fn test_save_and_load_options() {
    use tempfile::NamedTempFile;

    let options = SheetOptions {
        sheet_size: SheetSize::Large,
        dpi: 600,
        margin_in: 0.2,
        gutter_in: 0.1,
        max_stickers: Some(20),
        background: [0, 0, 0, 0],
        image_timeout_ms: 2_500,
        ..Default::default()
    };

    let temp_file = NamedTempFile::new().unwrap();
    let path = temp_file.path();

    // Save
    options.save(path).await.unwrap();

    // Load
    let loaded = SheetOptions::load(path).await.unwrap();
    assert_eq!(loaded, options);
}

#[cfg(feature = "serde")]
#[tokio::test]
async fn test_load_partial_config_uses_defaults() {
    use tempfile::NamedTempFile;

    let temp_file = NamedTempFile::new().unwrap();
    tokio::fs::write(temp_file.path(), r#"{ "sheet_size": "3x5", "dpi": 150 }"#)
        .await
        .unwrap();

    let loaded = SheetOptions::load(temp_file.path()).await.unwrap();
    assert_eq!(
        loaded.sheet_size,
        SheetSize::Custom {
            width_in: 3.0,
            height_in: 5.0
        }
    );
    assert_eq!(loaded.dpi, 150);
    assert_eq!(loaded.margin_in, SheetOptions::default().margin_in);
    assert_eq!(loaded.sheet().print_pixels(), (450, 750));
}

#[cfg(feature = "serde")]
#[tokio::test]
async fn test_load_rejects_bad_sheet_size() {
    use tempfile::NamedTempFile;

    let temp_file = NamedTempFile::new().unwrap();
    tokio::fs::write(temp_file.path(), r#"{ "sheet_size": "huge" }"#)
        .await
        .unwrap();

    assert!(matches!(
        SheetOptions::load(temp_file.path()).await,
        Err(StickerError::Config(_))
    ));
}
