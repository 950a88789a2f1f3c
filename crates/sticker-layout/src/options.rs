use crate::constants::*;
use crate::types::*;
use std::time::Duration;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Configuration of one sticker sheet editing session
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SheetOptions {
    // Sheet
    pub sheet_size: SheetSize,
    pub dpi: u32,
    pub margin_in: f32,
    pub gutter_in: f32,

    // On-screen canvas the placements are expressed in
    pub canvas_width_px: f32,
    pub canvas_height_px: f32,

    // Capacity override, at most the layout's cell count
    pub max_stickers: Option<usize>,

    // Rasterization
    pub background: [u8; 4],
    pub image_timeout_ms: u64,
}

impl Default for SheetOptions {
    fn default() -> Self {
        Self {
            sheet_size: SheetSize::Medium,
            dpi: DEFAULT_DPI,
            margin_in: DEFAULT_MARGIN_IN,
            gutter_in: DEFAULT_GUTTER_IN,
            canvas_width_px: DEFAULT_CANVAS_PX,
            canvas_height_px: DEFAULT_CANVAS_PX,
            max_stickers: None,
            background: DEFAULT_BACKGROUND,
            image_timeout_ms: DEFAULT_IMAGE_TIMEOUT_MS,
        }
    }
}

impl SheetOptions {
    /// Options for a sheet size with every other setting at its default
    pub fn for_size(sheet_size: SheetSize) -> Self {
        Self {
            sheet_size,
            ..Default::default()
        }
    }

    pub fn sheet(&self) -> Sheet {
        Sheet {
            size: self.sheet_size,
            dpi: self.dpi,
            margin_in: self.margin_in,
            gutter_in: self.gutter_in,
        }
    }

    pub fn image_timeout(&self) -> Duration {
        Duration::from_millis(self.image_timeout_ms)
    }

    /// Load options from JSON file
    #[cfg(feature = "serde")]
    pub async fn load(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let bytes = tokio::fs::read(path).await?;
        let options = serde_json::from_slice(&bytes)
            .map_err(|e| StickerError::Config(format!("Failed to parse config: {}", e)))?;
        Ok(options)
    }

    /// Save options to JSON file
    #[cfg(feature = "serde")]
    pub async fn save(&self, path: impl AsRef<std::path::Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| StickerError::Config(format!("Failed to serialize config: {}", e)))?;
        tokio::fs::write(path, json).await?;
        Ok(())
    }

    /// Validate the options
    pub fn validate(&self) -> Result<()> {
        let (width_in, height_in) = self.sheet_size.dimensions_in();
        if !(width_in > 0.0 && height_in > 0.0) {
            return Err(StickerError::Config(format!(
                "Sheet size {} must be positive",
                self.sheet_size
            )));
        }

        if self.dpi == 0 {
            return Err(StickerError::Config("DPI must be positive".to_string()));
        }

        if !(self.margin_in >= 0.0) || !(self.gutter_in >= 0.0) {
            return Err(StickerError::Config(
                "Margin and gutter must not be negative".to_string(),
            ));
        }

        if 2.0 * self.margin_in >= width_in.min(height_in) {
            return Err(StickerError::Config(format!(
                "Margin of {}in leaves no usable area on a {} sheet",
                self.margin_in, self.sheet_size
            )));
        }

        if !(self.canvas_width_px > 0.0 && self.canvas_height_px > 0.0) {
            return Err(StickerError::Config(
                "Canvas size must be positive".to_string(),
            ));
        }

        if self.max_stickers == Some(0) {
            return Err(StickerError::Config(
                "Maximum sticker count must be at least 1".to_string(),
            ));
        }

        if self.image_timeout_ms == 0 {
            return Err(StickerError::Config(
                "Image load timeout must be positive".to_string(),
            ));
        }

        Ok(())
    }
}

#[cfg(feature = "serde")]
mod serde_impls {
    use super::*;
    use serde::{Deserialize, Serialize};

    // Sheet sizes travel as their identifier ("4x4", "5.5x5.5", "3x5")
    impl Serialize for SheetSize {
        fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
        where
            S: serde::Serializer,
        {
            serializer.serialize_str(&self.id())
        }
    }

    impl<'de> Deserialize<'de> for SheetSize {
        fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
        where
            D: serde::Deserializer<'de>,
        {
            let s = String::deserialize(deserializer)?;
            s.parse().map_err(serde::de::Error::custom)
        }
    }
} // end of serde_impls module
