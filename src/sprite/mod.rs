//! Sprite module: named overlay bitmaps composited above the background.
//!
//! - [`Sprite`]: private RGB buffer, float position, visibility, occupied cells
//! - [`SpriteRegistry`]: name lookup plus z-order

mod registry;
#[allow(clippy::module_inception)]
mod sprite;

pub use registry::SpriteRegistry;
pub use sprite::Sprite;
