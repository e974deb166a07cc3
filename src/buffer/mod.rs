//! Buffer module: pixel storage and rasterization.
//!
//! This module contains:
//! - [`Rgb`]: 24-bit pixel color
//! - [`Surface`]: a fixed-size grid of pixels (background, composite, sprites)
//! - [`Shape`]: closed set of drawable primitives
//! - [`raster`]: the line, rectangle, circle and polygon rasterizers

mod color;
pub mod raster;
mod surface;

pub use color::Rgb;
pub use raster::{RegularPolygon, Shape};
pub use surface::Surface;
