//! Sprite: a named, positioned bitmap with a transparent sentinel color.

use crate::buffer::{Rgb, Shape, Surface};
use crate::error::{CanvasError, Result};
use crate::layout::{DirtyGrid, GridCell, Point, Rect};

/// A positioned overlay bitmap.
///
/// The private buffer starts out entirely transparent. Pixels equal to the
/// transparent sentinel are never composited.
#[derive(Debug, Clone)]
pub struct Sprite {
    name: String,
    /// Private pixel buffer.
    surface: Surface,
    /// Sub-pixel position; the top-left pixel is `(x.floor(), y.floor())`.
    x: f32,
    y: f32,
    visible: bool,
    /// Grid cells covered at the current position while visible.
    cells: Vec<GridCell>,
    transparent: Rgb,
}

impl Sprite {
    /// Create a hidden sprite at the origin.
    pub fn new(name: impl Into<String>, width: u16, height: u16, transparent: Rgb) -> Result<Self> {
        let name = name.into();
        if width == 0 || height == 0 {
            return Err(CanvasError::MalformedShape(format!(
                "sprite '{name}' must have non-zero size, got {width}x{height}"
            )));
        }
        Ok(Self {
            name,
            surface: Surface::filled(width, height, transparent),
            x: 0.0,
            y: 0.0,
            visible: false,
            cells: Vec::new(),
            transparent,
        })
    }

    /// The registry key.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Bitmap width.
    #[inline]
    pub const fn width(&self) -> u16 {
        self.surface.width()
    }

    /// Bitmap height.
    #[inline]
    pub const fn height(&self) -> u16 {
        self.surface.height()
    }

    /// The private pixel buffer.
    #[inline]
    pub const fn surface(&self) -> &Surface {
        &self.surface
    }

    /// The transparent sentinel.
    #[inline]
    pub const fn transparent(&self) -> Rgb {
        self.transparent
    }

    /// The floating-point position.
    #[inline]
    pub const fn position(&self) -> (f32, f32) {
        (self.x, self.y)
    }

    /// Whether the sprite is currently shown.
    #[inline]
    pub const fn is_visible(&self) -> bool {
        self.visible
    }

    /// Cells covered while visible; empty when hidden.
    #[inline]
    pub fn cells(&self) -> &[GridCell] {
        &self.cells
    }

    /// The pixel where the sprite's top-left corner lands.
    pub fn origin(&self) -> Point {
        Point::new(self.x.floor() as i32, self.y.floor() as i32)
    }

    /// Pixel rectangle covered at the current position.
    pub fn bounds(&self) -> Rect {
        let origin = self.origin();
        Rect::new(origin.x, origin.y, self.width(), self.height())
    }

    /// Whether this sprite is visible and covers any of `cells`.
    pub fn occupies_any(&self, cells: &[GridCell]) -> bool {
        self.visible && self.cells.iter().any(|c| cells.contains(c))
    }

    /// Rasterize `shape` into the private buffer.
    ///
    /// Coordinates are sprite-local.
    pub fn draw(&mut self, shape: &Shape, color: Rgb) -> Result<Vec<Point>> {
        self.surface.draw(shape, color)
    }

    /// Reset the private buffer to fully transparent.
    pub fn clear(&mut self) {
        self.surface.fill(self.transparent);
    }

    /// Move without changing visibility. Visible sprites recompute their
    /// cells; returns the cells they covered before.
    pub fn set_position(&mut self, x: f32, y: f32, grid: &DirtyGrid) -> Vec<GridCell> {
        self.x = x;
        self.y = y;
        if self.visible {
            let cells = grid.cells_for_rect(&self.bounds());
            std::mem::replace(&mut self.cells, cells)
        } else {
            Vec::new()
        }
    }

    /// Show at `(x, y)`. Returns the cells covered before (empty if it was
    /// hidden).
    pub fn show(&mut self, x: f32, y: f32, grid: &DirtyGrid) -> Vec<GridCell> {
        self.visible = true;
        self.set_position(x, y, grid)
    }

    /// Hide, returning the cells that were covered.
    pub fn hide(&mut self) -> Vec<GridCell> {
        self.visible = false;
        std::mem::take(&mut self.cells)
    }
}
