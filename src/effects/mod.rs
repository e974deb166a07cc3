//! Text overlay effects: glyph masks animated onto the canvas.
//!
//! - [`GlyphMask`] / [`GlyphSource`]: where glyph bitmaps come from
//! - [`TextAnimation`]: a frame script for one effect, played with one push
//!   per frame

mod glyph;
mod text;

pub use glyph::{GlyphMask, GlyphSource, MapGlyphSource};
pub use text::{PixelWrite, TextAnimation, TextEffect, TextMode};
