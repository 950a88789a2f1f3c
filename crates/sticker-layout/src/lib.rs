pub mod constants;
mod layout;
mod options;
mod preview;
mod render;
mod session;
mod stats;
mod transform;
mod types;

pub use layout::*;
pub use options::*;
pub use preview::{generate_preview, preview_job};
pub use render::*;
pub use session::*;
pub use stats::{SheetStatistics, calculate_statistics};
pub use transform::CoordinateTransform;
pub use types::*;
