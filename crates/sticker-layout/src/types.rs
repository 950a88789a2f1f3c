use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::constants::{DEFAULT_DPI, DEFAULT_GUTTER_IN, DEFAULT_MARGIN_IN};

#[derive(Error, Debug)]
pub enum StickerError {
    #[error("Sheet is full: this layout holds at most {max} stickers")]
    CapacityExceeded { max: usize },
    #[error(
        "No layout fits {} on a {sheet} sheet at aspect ratio {aspect_ratio:.3}",
        describe_count(.requested)
    )]
    InfeasibleLayout {
        sheet: SheetSize,
        aspect_ratio: f32,
        requested: Option<usize>,
    },
    #[error("Unknown placement {0}")]
    UnknownPlacement(PlacementId),
    #[error(
        "Sheet has unresolved placements ({out_of_bounds} out of bounds, {colliding} colliding)"
    )]
    UnresolvedPlacements {
        out_of_bounds: usize,
        colliding: usize,
    },
    #[error("Raster surface unavailable: {0}")]
    RasterContextUnavailable(String),
    #[error("Operation cancelled")]
    Cancelled,
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid configuration: {0}")]
    Config(String),
    #[error("Task join error: {0}")]
    TaskJoin(#[from] tokio::task::JoinError),
}

fn describe_count(requested: &Option<usize>) -> String {
    match requested {
        Some(1) => "1 sticker".to_string(),
        Some(n) => format!("{n} stickers"),
        None => "any sticker count".to_string(),
    }
}

pub type Result<T> = std::result::Result<T, StickerError>;

/// Physical sheet sizes offered for printing
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum SheetSize {
    /// 3" x 3"
    Small,
    /// 4" x 4"
    #[default]
    Medium,
    /// 5.5" x 5.5"
    Large,
    Custom { width_in: f32, height_in: f32 },
}

impl SheetSize {
    pub fn dimensions_in(self) -> (f32, f32) {
        match self {
            SheetSize::Small => (3.0, 3.0),
            SheetSize::Medium => (4.0, 4.0),
            SheetSize::Large => (5.5, 5.5),
            SheetSize::Custom {
                width_in,
                height_in,
            } => (width_in, height_in),
        }
    }

    /// Identifier used by the fulfillment side and on the command line
    pub fn id(self) -> String {
        match self {
            SheetSize::Small => "3x3".to_string(),
            SheetSize::Medium => "4x4".to_string(),
            SheetSize::Large => "5.5x5.5".to_string(),
            SheetSize::Custom {
                width_in,
                height_in,
            } => format!("{width_in}x{height_in}"),
        }
    }
}

impl fmt::Display for SheetSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.id())
    }
}

impl FromStr for SheetSize {
    type Err = StickerError;

    fn from_str(s: &str) -> Result<Self> {
        let normalized = s.trim().to_ascii_lowercase().replace('"', "");
        match normalized.as_str() {
            "3x3" | "small" => return Ok(SheetSize::Small),
            "4x4" | "medium" => return Ok(SheetSize::Medium),
            "5.5x5.5" | "large" => return Ok(SheetSize::Large),
            _ => {}
        }

        let (w, h) = normalized
            .split_once('x')
            .ok_or_else(|| StickerError::Config(format!("Unrecognized sheet size '{s}'")))?;
        let parse = |v: &str| {
            v.trim()
                .parse::<f32>()
                .ok()
                .filter(|n| n.is_finite() && *n > 0.0)
                .ok_or_else(|| StickerError::Config(format!("Invalid sheet dimension '{v}'")))
        };
        Ok(SheetSize::Custom {
            width_in: parse(w)?,
            height_in: parse(h)?,
        })
    }
}

/// The printable sheet for one layout session
///
/// Chosen once when the session starts; never changes afterwards.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Sheet {
    pub size: SheetSize,
    /// Print resolution in dots per inch
    pub dpi: u32,
    /// Inset from every edge of the sheet
    pub margin_in: f32,
    /// Minimum spacing between adjacent sticker boxes
    pub gutter_in: f32,
}

impl Default for Sheet {
    fn default() -> Self {
        Self::new(SheetSize::default())
    }
}

impl Sheet {
    pub fn new(size: SheetSize) -> Self {
        Self {
            size,
            dpi: DEFAULT_DPI,
            margin_in: DEFAULT_MARGIN_IN,
            gutter_in: DEFAULT_GUTTER_IN,
        }
    }

    pub fn dimensions_in(&self) -> (f32, f32) {
        self.size.dimensions_in()
    }

    /// Sheet size minus the outer margin on both sides of each axis
    pub fn usable_in(&self) -> (f32, f32) {
        let (w, h) = self.dimensions_in();
        (w - 2.0 * self.margin_in, h - 2.0 * self.margin_in)
    }

    pub fn usable_area_in2(&self) -> f32 {
        let (w, h) = self.usable_in();
        w * h
    }

    /// Exact pixel dimensions of the print raster
    pub fn print_pixels(&self) -> (u32, u32) {
        let (w, h) = self.dimensions_in();
        (
            (w * self.dpi as f32).round() as u32,
            (h * self.dpi as f32).round() as u32,
        )
    }
}

/// Identity of one placement on the sheet
///
/// Distinct from the source image: the same source may be placed many times.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PlacementId(pub u64);

impl fmt::Display for PlacementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Read-only reference to a source sticker image (id, URI or path)
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SourceRef(String);

impl SourceRef {
    pub fn new(source: impl Into<String>) -> Self {
        Self(source.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for SourceRef {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for SourceRef {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl fmt::Display for SourceRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Natural pixel size of a source image
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ImageDimensions {
    pub width: u32,
    pub height: u32,
}

impl ImageDimensions {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Width over height, or `None` when either side is zero
    pub fn aspect_ratio(&self) -> Option<f32> {
        if self.width == 0 || self.height == 0 {
            None
        } else {
            Some(self.width as f32 / self.height as f32)
        }
    }
}

/// Visual rotation of a placed sticker
///
/// Rotation never changes the box used for bounds and collision checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Rotation {
    #[default]
    None,
    Clockwise90,
    Clockwise180,
    Clockwise270,
}

impl Rotation {
    pub fn degrees(self) -> i32 {
        match self {
            Rotation::None => 0,
            Rotation::Clockwise90 => 90,
            Rotation::Clockwise180 => 180,
            Rotation::Clockwise270 => 270,
        }
    }

    /// Next quarter turn, wrapping at 360
    pub fn next(self) -> Self {
        match self {
            Rotation::None => Rotation::Clockwise90,
            Rotation::Clockwise90 => Rotation::Clockwise180,
            Rotation::Clockwise180 => Rotation::Clockwise270,
            Rotation::Clockwise270 => Rotation::None,
        }
    }

    /// Whether the rotated image swaps its width and height
    pub fn is_quarter_turn(self) -> bool {
        matches!(self, Rotation::Clockwise90 | Rotation::Clockwise270)
    }
}
