//! Print rasterization for finished sheets
//!
//! This module turns a session's placements into one print-ready image:
//! - Fetching and decoding source images concurrently, each under a timeout
//! - Cancelling in-flight loads when the sheet goes away
//! - Compositing every placement at print resolution
//! - Encoding the composite for the fulfillment side

mod cancel;
mod composite;
mod loader;
mod source;

pub use cancel::CancelToken;
pub use composite::*;
pub use loader::{LoadedImages, load_images};
pub use source::{FsImageSource, ImageSource, MemoryImageSource, probe_dimensions};
