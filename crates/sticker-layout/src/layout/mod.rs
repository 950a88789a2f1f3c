//! Layout calculation modules for sticker sheets
//!
//! This module handles all the geometric calculations for a sheet:
//! - Box math (bounds, gutter-aware collision, aspect fitting)
//! - Grid layout (uniform grids, auto-arrange grid search)
//! - Layout planning (candidate grids scored by packing efficiency)

mod geometry;
mod grid;
mod planner;
mod types;

pub use geometry::*;
pub use grid::*;
pub use planner::*;
pub use types::*;
