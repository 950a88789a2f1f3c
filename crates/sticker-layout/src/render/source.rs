//! Where sticker images come from

use std::collections::{HashMap, HashSet};
use std::future::Future;
use std::io::{self, Cursor};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use image::{DynamicImage, ImageFormat, ImageReader};

use crate::types::{ImageDimensions, Result, SourceRef};

/// Provider of encoded sticker images
///
/// `dimensions` is a cheap lookup used when a sticker is added; it may
/// report `None` when the size is unknown. `fetch` returns the encoded
/// bytes and is the only slow part of rasterization.
pub trait ImageSource: Send + Sync + 'static {
    fn dimensions(&self, source: &SourceRef) -> Option<ImageDimensions>;

    fn fetch(&self, source: &SourceRef) -> impl Future<Output = io::Result<Vec<u8>>> + Send;
}

/// Look up a source's dimensions on the blocking pool.
///
/// [`ImageSource::dimensions`] may read from disk, which must not stall an
/// async task. A lookup that panics is reported as unknown.
pub async fn probe_dimensions<S: ImageSource>(
    source: &Arc<S>,
    reference: &SourceRef,
) -> Option<ImageDimensions> {
    let source = Arc::clone(source);
    let reference = reference.clone();
    let lookup = reference.clone();
    match tokio::task::spawn_blocking(move || source.dimensions(&lookup)).await {
        Ok(dimensions) => dimensions,
        Err(e) => {
            log::warn!("Dimension lookup for {reference} failed: {e}");
            None
        }
    }
}

// =============================================================================
// Files on disk
// =============================================================================

/// Images read from the filesystem, optionally relative to a root directory
#[derive(Debug, Clone, Default)]
pub struct FsImageSource {
    root: Option<PathBuf>,
}

impl FsImageSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        Self {
            root: Some(root.into()),
        }
    }

    fn resolve(&self, source: &SourceRef) -> PathBuf {
        let path = Path::new(source.as_str());
        match &self.root {
            Some(root) if path.is_relative() => root.join(path),
            _ => path.to_path_buf(),
        }
    }
}

impl ImageSource for FsImageSource {
    fn dimensions(&self, source: &SourceRef) -> Option<ImageDimensions> {
        // Reads only the image header
        image::image_dimensions(self.resolve(source))
            .ok()
            .map(|(width, height)| ImageDimensions::new(width, height))
    }

    async fn fetch(&self, source: &SourceRef) -> io::Result<Vec<u8>> {
        tokio::fs::read(self.resolve(source)).await
    }
}

// =============================================================================
// In-memory blobs
// =============================================================================

/// Encoded images held in memory, keyed by source
///
/// Sources marked unreachable never finish fetching, which lets callers
/// exercise load timeouts.
#[derive(Debug, Clone, Default)]
pub struct MemoryImageSource {
    blobs: HashMap<SourceRef, Vec<u8>>,
    unreachable: HashSet<SourceRef>,
}

impl MemoryImageSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store already-encoded image bytes.
    pub fn insert(&mut self, source: impl Into<SourceRef>, bytes: Vec<u8>) {
        self.blobs.insert(source.into(), bytes);
    }

    /// Store an image, encoded as PNG.
    pub fn insert_image(&mut self, source: impl Into<SourceRef>, image: &DynamicImage) -> Result<()> {
        let mut bytes = Vec::new();
        image.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)?;
        self.insert(source, bytes);
        Ok(())
    }

    /// Make fetches of `source` hang forever.
    pub fn mark_unreachable(&mut self, source: impl Into<SourceRef>) {
        let source = source.into();
        self.blobs.remove(&source);
        self.unreachable.insert(source);
    }

    pub fn len(&self) -> usize {
        self.blobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blobs.is_empty()
    }
}

impl ImageSource for MemoryImageSource {
    fn dimensions(&self, source: &SourceRef) -> Option<ImageDimensions> {
        let bytes = self.blobs.get(source)?;
        let (width, height) = ImageReader::new(Cursor::new(bytes))
            .with_guessed_format()
            .ok()?
            .into_dimensions()
            .ok()?;
        Some(ImageDimensions::new(width, height))
    }

    async fn fetch(&self, source: &SourceRef) -> io::Result<Vec<u8>> {
        if self.unreachable.contains(source) {
            return std::future::pending().await;
        }
        self.blobs.get(source).cloned().ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::NotFound,
                format!("No image stored for '{source}'"),
            )
        })
    }
}
