//! Surface: a fixed-size grid of RGB pixels.
//!
//! Pixels are stored contiguously in row-major order. The same type backs
//! the background truth, the composite (sink-bound) buffer, and every
//! sprite's private bitmap.

use super::color::Rgb;
use super::raster::Shape;
use crate::error::Result;
use crate::layout::{Point, Rect};

/// A grid of RGB pixels.
///
/// Access is in row-major order: `index = y * width + x`. Coordinates are
/// signed; anything outside `0..width` x `0..height` is silently ignored by
/// the writers, since shapes routinely spill off the edges.
#[derive(Clone, PartialEq, Eq)]
pub struct Surface {
    /// Contiguous pixel storage (row-major order).
    pixels: Vec<Rgb>,
    /// Width in pixels.
    width: u16,
    /// Height in pixels.
    height: u16,
}

impl Surface {
    /// Create a new black surface with the given dimensions.
    ///
    /// # Panics
    /// Panics if width or height is 0.
    pub fn new(width: u16, height: u16) -> Self {
        Self::filled(width, height, Rgb::BLACK)
    }

    /// Create a surface with every pixel set to `color`.
    ///
    /// # Panics
    /// Panics if width or height is 0.
    pub fn filled(width: u16, height: u16, color: Rgb) -> Self {
        assert!(width > 0 && height > 0, "Surface dimensions must be non-zero");
        Self {
            pixels: vec![color; usize::from(width) * usize::from(height)],
            width,
            height,
        }
    }

    /// Get the surface width.
    #[inline]
    pub const fn width(&self) -> u16 {
        self.width
    }

    /// Get the surface height.
    #[inline]
    pub const fn height(&self) -> u16 {
        self.height
    }

    /// The rectangle covering the whole surface.
    #[inline]
    pub const fn bounds(&self) -> Rect {
        Rect::from_size(self.width, self.height)
    }

    /// Get the total number of pixels.
    #[inline]
    pub fn len(&self) -> usize {
        self.pixels.len()
    }

    /// Check if the surface is empty (never true after construction).
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.pixels.is_empty()
    }

    /// Get a reference to the underlying pixel slice.
    #[inline]
    pub fn pixels(&self) -> &[Rgb] {
        &self.pixels
    }

    /// Convert (x, y) coordinates to a linear index.
    ///
    /// Returns `None` if coordinates are out of bounds.
    #[inline]
    pub fn index_of(&self, x: i32, y: i32) -> Option<usize> {
        let (x, y) = (usize::try_from(x).ok()?, usize::try_from(y).ok()?);
        let (w, h) = (usize::from(self.width), usize::from(self.height));
        (x < w && y < h).then_some(y * w + x)
    }

    /// Get the pixel at (x, y), or `None` if out of bounds.
    #[inline]
    pub fn get(&self, x: i32, y: i32) -> Option<Rgb> {
        self.index_of(x, y).map(|i| self.pixels[i])
    }

    /// Set the pixel at (x, y).
    ///
    /// Returns `false` (and writes nothing) if coordinates are out of bounds.
    #[inline]
    pub fn set(&mut self, x: i32, y: i32, color: Rgb) -> bool {
        if let Some(idx) = self.index_of(x, y) {
            self.pixels[idx] = color;
            true
        } else {
            false
        }
    }

    /// Reset every pixel to `color`.
    pub fn fill(&mut self, color: Rgb) {
        self.pixels.fill(color);
    }

    /// Fill a rectangular region, clipped to the surface.
    ///
    /// Returns the clipped rectangle that was actually written.
    pub fn fill_rect(&mut self, rect: &Rect, color: Rgb) -> Rect {
        let clipped = rect.intersection(&self.bounds());
        let w = usize::from(self.width);
        for y in clipped.y..clipped.bottom() {
            let start = y as usize * w + clipped.x as usize;
            self.pixels[start..start + usize::from(clipped.width)].fill(color);
        }
        clipped
    }

    /// Copy the pixels of `rect` from `other` into the same place here.
    ///
    /// Both surfaces must have the same dimensions.
    pub fn copy_rect_from(&mut self, other: &Self, rect: &Rect) {
        debug_assert_eq!(self.width, other.width);
        debug_assert_eq!(self.height, other.height);
        let clipped = rect.intersection(&self.bounds());
        let w = usize::from(self.width);
        for y in clipped.y..clipped.bottom() {
            let start = y as usize * w + clipped.x as usize;
            let end = start + usize::from(clipped.width);
            self.pixels[start..end].copy_from_slice(&other.pixels[start..end]);
        }
    }

    /// Paint `src` with its top-left corner at `origin`, skipping pixels
    /// equal to `transparent` and anything outside `clip`.
    ///
    /// Returns the number of pixels written.
    pub fn blit(&mut self, src: &Self, origin: Point, clip: &Rect, transparent: Rgb) -> usize {
        let placed = Rect::new(origin.x, origin.y, src.width, src.height);
        let region = placed.intersection(clip).intersection(&self.bounds());
        let mut written = 0;
        for p in region.points() {
            if let Some(color) = src.get(p.x - origin.x, p.y - origin.y) {
                if color != transparent && self.set(p.x, p.y, color) {
                    written += 1;
                }
            }
        }
        written
    }

    /// Rasterize `shape` in `color`.
    ///
    /// Returns the on-surface pixels that were written, without duplicates.
    pub fn draw(&mut self, shape: &Shape, color: Rgb) -> Result<Vec<Point>> {
        let touched = shape.rasterize(&self.bounds())?;
        for p in &touched {
            self.set(p.x, p.y, color);
        }
        Ok(touched)
    }

    /// Get an iterator over rows.
    pub fn rows(&self) -> impl Iterator<Item = &[Rgb]> {
        self.pixels.chunks(usize::from(self.width))
    }
}

impl std::fmt::Debug for Surface {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Surface")
            .field("width", &self.width)
            .field("height", &self.height)
            .finish_non_exhaustive()
    }
}
