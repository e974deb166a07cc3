//! Layout module: pixel geometry and the coarse dirty grid.
//!
//! Dirty tracking uses a fixed grid of square cells, not merged rectangles.
//! Marking is O(1) per cell and recomposition walks a bounded set of regions.

mod grid;
mod rect;

pub use grid::{DirtyGrid, GridCell};
pub use rect::{Point, Rect};
