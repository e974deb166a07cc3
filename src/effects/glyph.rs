//! Glyph masks and the sources that supply them.

use crate::error::{CanvasError, Result};
use crate::layout::Point;
use std::collections::HashMap;

/// A monochrome glyph bitmap, row-major.
#[derive(Clone, PartialEq, Eq)]
pub struct GlyphMask {
    width: u16,
    height: u16,
    bits: Vec<bool>,
}

impl GlyphMask {
    /// Create a mask from row-major on/off bits.
    pub fn new(width: u16, height: u16, bits: Vec<bool>) -> Result<Self> {
        let expected = usize::from(width) * usize::from(height);
        if bits.len() != expected {
            return Err(CanvasError::MalformedShape(format!(
                "glyph mask {width}x{height} needs {expected} bits, got {}",
                bits.len()
            )));
        }
        Ok(Self { width, height, bits })
    }

    /// Build a mask from text rows, `#` meaning on.
    ///
    /// Rows shorter than the longest are padded with off bits.
    pub fn from_rows(rows: &[&str]) -> Result<Self> {
        let width = rows.iter().map(|r| r.chars().count()).max().unwrap_or(0);
        let width = u16::try_from(width)
            .map_err(|_| CanvasError::MalformedShape("glyph too wide".into()))?;
        let height = u16::try_from(rows.len())
            .map_err(|_| CanvasError::MalformedShape("glyph too tall".into()))?;
        let mut bits = Vec::with_capacity(usize::from(width) * usize::from(height));
        for row in rows {
            let mut count = 0;
            for c in row.chars() {
                bits.push(c == '#');
                count += 1;
            }
            bits.resize(bits.len() + usize::from(width) - count, false);
        }
        Self::new(width, height, bits)
    }

    /// Width in pixels.
    #[inline]
    pub const fn width(&self) -> u16 {
        self.width
    }

    /// Height in pixels.
    #[inline]
    pub const fn height(&self) -> u16 {
        self.height
    }

    /// Whether the bit at (x, y) is set. Out of range is off.
    pub fn is_on(&self, x: u16, y: u16) -> bool {
        x < self.width && y < self.height && self.bits[usize::from(y) * usize::from(self.width) + usize::from(x)]
    }

    /// Offsets of every set bit, row-major.
    pub fn on_pixels(&self) -> impl Iterator<Item = Point> + '_ {
        let width = usize::from(self.width.max(1));
        self.bits
            .iter()
            .enumerate()
            .filter(|(_, on)| **on)
            .map(move |(i, _)| Point::new((i % width) as i32, (i / width) as i32))
    }
}

impl std::fmt::Debug for GlyphMask {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "GlyphMask({}x{})", self.width, self.height)?;
        for y in 0..self.height {
            for x in 0..self.width {
                f.write_str(if self.is_on(x, y) { "#" } else { "." })?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// Supplies glyph masks by grapheme cluster.
pub trait GlyphSource {
    /// The mask for `grapheme`, if the source has one.
    fn glyph(&self, grapheme: &str) -> Option<&GlyphMask>;

    /// Advance for whitespace and missing glyphs.
    fn space_width(&self) -> u16;
}

/// An in-memory glyph table.
#[derive(Debug, Clone, Default)]
pub struct MapGlyphSource {
    glyphs: HashMap<String, GlyphMask>,
    space_width: u16,
}

impl MapGlyphSource {
    /// Create an empty table with the given space advance.
    pub fn new(space_width: u16) -> Self {
        Self {
            glyphs: HashMap::new(),
            space_width,
        }
    }

    /// Add or replace a glyph.
    pub fn insert(&mut self, grapheme: impl Into<String>, mask: GlyphMask) -> Option<GlyphMask> {
        self.glyphs.insert(grapheme.into(), mask)
    }

    /// Builder form of [`insert`](Self::insert).
    #[must_use]
    pub fn with_glyph(mut self, grapheme: impl Into<String>, mask: GlyphMask) -> Self {
        self.insert(grapheme, mask);
        self
    }

    /// Number of glyphs.
    pub fn len(&self) -> usize {
        self.glyphs.len()
    }

    /// Check if the table has no glyphs.
    pub fn is_empty(&self) -> bool {
        self.glyphs.is_empty()
    }
}

impl GlyphSource for MapGlyphSource {
    fn glyph(&self, grapheme: &str) -> Option<&GlyphMask> {
        self.glyphs.get(grapheme)
    }

    fn space_width(&self) -> u16 {
        self.space_width
    }
}
