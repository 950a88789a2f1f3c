//! Compositing placements into the print raster

use std::collections::HashSet;
use std::fmt;
use std::io::Cursor;
use std::sync::Arc;
use std::time::Duration;

use image::imageops::{self, FilterType};
use image::{DynamicImage, ImageFormat, Rgba, RgbaImage};

use super::cancel::CancelToken;
use super::loader::{LoadedImages, load_images};
use super::source::ImageSource;
use crate::constants::MAX_RASTER_BYTES;
use crate::layout::{Rect, center_in, fit_aspect};
use crate::session::Session;
use crate::transform::CoordinateTransform;
use crate::types::*;

/// Why a placement was left out of the composite
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SkipReason {
    /// The source could not be fetched
    Fetch(String),
    /// The bytes were fetched but are not a decodable image
    Decode(String),
    /// Fetch and decode did not finish within the load timeout
    Timeout,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::Fetch(e) => write!(f, "fetch failed: {e}"),
            SkipReason::Decode(e) => write!(f, "decode failed: {e}"),
            SkipReason::Timeout => f.write_str("timed out"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SkippedPlacement {
    pub id: PlacementId,
    pub reason: SkipReason,
}

/// An encoded composite image
#[derive(Clone, PartialEq)]
pub struct EncodedRaster {
    /// PNG bytes
    pub bytes: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

impl fmt::Debug for EncodedRaster {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EncodedRaster")
            .field("bytes", &format_args!("[{} bytes]", self.bytes.len()))
            .field("width", &self.width)
            .field("height", &self.height)
            .finish()
    }
}

impl EncodedRaster {
    pub fn decode(&self) -> Result<DynamicImage> {
        Ok(image::load_from_memory_with_format(
            &self.bytes,
            ImageFormat::Png,
        )?)
    }
}

/// Metadata handed to the fulfillment side with the composite
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OrderSummary {
    pub sheet_id: String,
    /// Stickers actually drawn on the sheet
    pub sticker_count: usize,
    pub width_px: u32,
    pub height_px: u32,
    pub dpi: u32,
}

#[derive(Debug, Clone)]
pub struct RasterOutput {
    pub image: EncodedRaster,
    pub drawn_count: usize,
    /// Placements left out, in draw order
    pub skipped: Vec<SkippedPlacement>,
}

impl RasterOutput {
    pub fn skipped_ids(&self) -> Vec<PlacementId> {
        self.skipped.iter().map(|s| s.id).collect()
    }

    pub fn order_summary(&self, sheet: &Sheet) -> OrderSummary {
        OrderSummary {
            sheet_id: sheet.size.id(),
            sticker_count: self.drawn_count,
            width_px: self.image.width,
            height_px: self.image.height,
            dpi: sheet.dpi,
        }
    }
}

// =============================================================================
// Raster jobs
// =============================================================================

#[derive(Debug, Clone)]
struct RasterItem {
    id: PlacementId,
    source: SourceRef,
    /// Box in canvas pixels
    rect: Rect,
    rotation: Rotation,
}

/// Everything needed to rasterize a sheet, detached from its session
///
/// Taking a snapshot lets the session keep changing while the raster is
/// produced; the job renders the sheet as it was when the job was made.
#[derive(Debug, Clone)]
pub struct RasterJob {
    transform: CoordinateTransform,
    background: [u8; 4],
    timeout: Duration,
    items: Vec<RasterItem>,
}

impl RasterJob {
    /// Snapshot a session for rasterization.
    ///
    /// Fails with [`StickerError::UnresolvedPlacements`] while any placement
    /// is out of bounds or colliding, unless `allow_invalid` is set.
    pub fn from_session(session: &Session, allow_invalid: bool) -> Result<Self> {
        let validation = session.validation();
        if !allow_invalid && !validation.is_valid() {
            return Err(StickerError::UnresolvedPlacements {
                out_of_bounds: validation.out_of_bounds.len(),
                colliding: validation.colliding.len(),
            });
        }

        let options = session.options();
        Ok(Self {
            transform: session.transform(),
            background: options.background,
            timeout: options.image_timeout(),
            items: session
                .placements()
                .iter()
                .map(|p| RasterItem {
                    id: p.id,
                    source: p.source.clone(),
                    rect: p.rect(),
                    rotation: p.rotation,
                })
                .collect(),
        })
    }

    /// Render at a different output size (e.g. a preview) instead of full print size.
    pub fn with_print_size(mut self, width: u32, height: u32) -> Self {
        self.transform = self.transform.with_print_size(width, height);
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn transform(&self) -> &CoordinateTransform {
        &self.transform
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Load every image and composite the sheet.
    pub async fn run<S: ImageSource>(
        self,
        source: Arc<S>,
        cancel: &CancelToken,
    ) -> Result<RasterOutput> {
        if cancel.is_cancelled() {
            return Err(StickerError::Cancelled);
        }

        // Fail before fetching anything when the surface cannot exist
        check_surface(self.transform.print_width, self.transform.print_height)?;

        let mut seen = HashSet::new();
        let references: Vec<SourceRef> = self
            .items
            .iter()
            .filter(|item| seen.insert(item.source.clone()))
            .map(|item| item.source.clone())
            .collect();
        log::debug!(
            "Loading {} source image(s) for {} placement(s)",
            references.len(),
            self.items.len()
        );

        let images = load_images(source, references, self.timeout, cancel).await?;

        let handle = tokio::task::spawn_blocking(move || compose(&self, &images));
        let output = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(StickerError::Cancelled),
            joined = handle => joined??,
        };

        log::info!(
            "Rasterized {}x{} sheet: {} drawn, {} skipped",
            output.image.width,
            output.image.height,
            output.drawn_count,
            output.skipped.len()
        );
        Ok(output)
    }
}

/// Rasterize a session at full print resolution.
///
/// Refuses to run while placements are unresolved. Images that fail to
/// load are skipped and reported, never fatal.
pub async fn rasterize<S: ImageSource>(
    session: &Session,
    source: Arc<S>,
    cancel: &CancelToken,
) -> Result<RasterOutput> {
    RasterJob::from_session(session, false)?
        .run(source, cancel)
        .await
}

// =============================================================================
// Compositing
// =============================================================================

fn check_surface(width: u32, height: u32) -> Result<()> {
    if width == 0 || height == 0 {
        return Err(StickerError::RasterContextUnavailable(format!(
            "cannot allocate a {width}x{height} surface"
        )));
    }

    let bytes = (width as usize)
        .checked_mul(height as usize)
        .and_then(|pixels| pixels.checked_mul(4));
    match bytes {
        Some(bytes) if bytes <= MAX_RASTER_BYTES => Ok(()),
        _ => Err(StickerError::RasterContextUnavailable(format!(
            "{width}x{height} surface exceeds the {} MiB limit",
            MAX_RASTER_BYTES / (1024 * 1024)
        ))),
    }
}

fn compose(job: &RasterJob, images: &LoadedImages) -> Result<RasterOutput> {
    let (width, height) = (job.transform.print_width, job.transform.print_height);
    check_surface(width, height)?;

    let mut canvas = RgbaImage::from_pixel(width, height, Rgba(job.background));
    let mut drawn_count = 0;
    let mut skipped = Vec::new();

    for item in &job.items {
        let reason = match images.get(&item.source) {
            Some(Ok(image)) => {
                let target = job.transform.to_print_rect(&item.rect);
                draw_sticker(&mut canvas, image, &target, item.rotation);
                drawn_count += 1;
                continue;
            }
            Some(Err(reason)) => reason.clone(),
            None => SkipReason::Fetch("image was never requested".to_string()),
        };

        log::warn!("Skipping placement {} ({}): {}", item.id, item.source, reason);
        skipped.push(SkippedPlacement {
            id: item.id,
            reason,
        });
    }

    let mut bytes = Vec::new();
    canvas.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)?;

    Ok(RasterOutput {
        image: EncodedRaster {
            bytes,
            width,
            height,
        },
        drawn_count,
        skipped,
    })
}

/// Draw `image` rotated and fitted by its own aspect ratio, centered in `target`.
///
/// Quarter turns are fitted after rotation so the drawn image stays inside
/// the placement's box.
fn draw_sticker(canvas: &mut RgbaImage, image: &DynamicImage, target: &Rect, rotation: Rotation) {
    let (natural_w, natural_h) = (image.width().max(1), image.height().max(1));
    let (rotated_w, rotated_h) = if rotation.is_quarter_turn() {
        (natural_h, natural_w)
    } else {
        (natural_w, natural_h)
    };

    let (fit_w, fit_h) = fit_aspect(
        rotated_w as f32 / rotated_h as f32,
        target.width,
        target.height,
    );
    let draw_w = (fit_w.round() as u32).max(1);
    let draw_h = (fit_h.round() as u32).max(1);

    // Resize in the unrotated frame, then turn
    let (resize_w, resize_h) = if rotation.is_quarter_turn() {
        (draw_h, draw_w)
    } else {
        (draw_w, draw_h)
    };
    let resized = image.resize_exact(resize_w, resize_h, FilterType::Lanczos3);
    let turned = match rotation {
        Rotation::None => resized,
        Rotation::Clockwise90 => resized.rotate90(),
        Rotation::Clockwise180 => resized.rotate180(),
        Rotation::Clockwise270 => resized.rotate270(),
    };

    let (x, y) = center_in(target, draw_w as f32, draw_h as f32);
    imageops::overlay(canvas, &turned.to_rgba8(), x.round() as i64, y.round() as i64);
}
