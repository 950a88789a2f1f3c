//! Concurrent image loading with per-image timeouts

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use image::DynamicImage;
use tokio::task::JoinSet;

use super::cancel::CancelToken;
use super::composite::SkipReason;
use super::source::ImageSource;
use crate::types::{Result, SourceRef, StickerError};

/// Outcome of loading each requested source
pub type LoadedImages = HashMap<SourceRef, std::result::Result<DynamicImage, SkipReason>>;

/// Fetch and decode every source concurrently.
///
/// Completes once every source has either loaded or failed; a source that
/// takes longer than `timeout` counts as failed. Individual failures are
/// recorded in the map, never returned as errors. Cancelling `cancel`
/// aborts all outstanding loads and returns [`StickerError::Cancelled`].
pub async fn load_images<S: ImageSource>(
    source: Arc<S>,
    references: impl IntoIterator<Item = SourceRef>,
    timeout: Duration,
    cancel: &CancelToken,
) -> Result<LoadedImages> {
    let mut tasks = JoinSet::new();
    for reference in references {
        let source = Arc::clone(&source);
        tasks.spawn(async move {
            let outcome = match tokio::time::timeout(timeout, load_one(&*source, &reference)).await
            {
                Ok(outcome) => outcome,
                Err(_) => Err(SkipReason::Timeout),
            };
            (reference, outcome)
        });
    }

    let mut loaded = LoadedImages::new();
    loop {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                log::debug!("Image loading cancelled with {} load(s) outstanding", tasks.len());
                tasks.abort_all();
                return Err(StickerError::Cancelled);
            }
            joined = tasks.join_next() => match joined {
                Some(Ok((reference, outcome))) => {
                    loaded.insert(reference, outcome);
                }
                Some(Err(e)) => {
                    tasks.abort_all();
                    return Err(e.into());
                }
                None => break,
            }
        }
    }
    Ok(loaded)
}

async fn load_one<S: ImageSource>(
    source: &S,
    reference: &SourceRef,
) -> std::result::Result<DynamicImage, SkipReason> {
    let bytes = source
        .fetch(reference)
        .await
        .map_err(|e| SkipReason::Fetch(e.to_string()))?;

    tokio::task::spawn_blocking(move || image::load_from_memory(&bytes))
        .await
        .map_err(|e| SkipReason::Decode(e.to_string()))?
        .map_err(|e| SkipReason::Decode(e.to_string()))
}
