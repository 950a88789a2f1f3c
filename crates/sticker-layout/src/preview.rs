use std::sync::Arc;

use crate::render::{CancelToken, ImageSource, RasterJob, RasterOutput};
use crate::session::Session;
use crate::types::*;

/// Generate a reduced-resolution proof of the sheet
///
/// The longer print edge is scaled down to `max_edge_px` (never up), keeping
/// the sheet's proportions. Unlike [`rasterize`](crate::rasterize) this
/// renders unresolved placements too, so the user can see what is wrong.
pub async fn generate_preview<S: ImageSource>(
    session: &Session,
    source: Arc<S>,
    max_edge_px: u32,
    cancel: &CancelToken,
) -> Result<RasterOutput> {
    preview_job(session, max_edge_px)?.run(source, cancel).await
}

/// Snapshot a session as a preview raster job, for callers that run it elsewhere.
pub fn preview_job(session: &Session, max_edge_px: u32) -> Result<RasterJob> {
    if max_edge_px == 0 {
        return Err(StickerError::Config(
            "Preview edge must be at least 1 pixel".to_string(),
        ));
    }

    let (print_w, print_h) = session.sheet().print_pixels();
    let (width, height) = preview_size(print_w, print_h, max_edge_px);
    log::debug!("Preview at {width}x{height} (print size {print_w}x{print_h})");

    Ok(RasterJob::from_session(session, true)?.with_print_size(width, height))
}

fn preview_size(print_w: u32, print_h: u32, max_edge_px: u32) -> (u32, u32) {
    let longest = print_w.max(print_h);
    if longest <= max_edge_px {
        return (print_w, print_h);
    }

    let scale = max_edge_px as f32 / longest as f32;
    (
        ((print_w as f32 * scale).round() as u32).max(1),
        ((print_h as f32 * scale).round() as u32).max(1),
    )
}
