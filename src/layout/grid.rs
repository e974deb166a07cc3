//! Dirty Grid: coarse-cell change tracking for partial recomposition.
//!
//! The surface is divided into square cells of `cell_size` pixels. A cell is
//! dirty when the composite buffer may hold stale sprite pixels there; the
//! compositor replays the background and the overlapping sprites for each
//! dirty cell, then clears it.

use super::rect::{Point, Rect};

/// Coordinates of one grid cell.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, PartialOrd, Ord)]
pub struct GridCell {
    /// Column index.
    pub col: u16,
    /// Row index.
    pub row: u16,
}

impl GridCell {
    /// Create a new cell coordinate.
    pub const fn new(col: u16, row: u16) -> Self {
        Self { col, row }
    }
}

/// Boolean dirty flags over a coarse grid.
#[derive(Clone, Debug)]
pub struct DirtyGrid {
    /// Row-major dirty flags.
    flags: Vec<bool>,
    /// Number of dirty cells, kept in sync with `flags`.
    dirty: usize,
    cols: u16,
    rows: u16,
    cell_size: u16,
    /// Pixel bounds of the surface the grid overlays.
    bounds: Rect,
}

impl DirtyGrid {
    /// Create a grid over a `width` x `height` surface.
    ///
    /// # Panics
    /// Panics if any dimension is 0.
    pub fn new(width: u16, height: u16, cell_size: u16) -> Self {
        assert!(
            width > 0 && height > 0 && cell_size > 0,
            "Grid dimensions must be non-zero"
        );
        let cols = width.div_ceil(cell_size);
        let rows = height.div_ceil(cell_size);
        Self {
            flags: vec![false; usize::from(cols) * usize::from(rows)],
            dirty: 0,
            cols,
            rows,
            cell_size,
            bounds: Rect::from_size(width, height),
        }
    }

    /// Number of grid columns.
    #[inline]
    pub const fn cols(&self) -> u16 {
        self.cols
    }

    /// Number of grid rows.
    #[inline]
    pub const fn rows(&self) -> u16 {
        self.rows
    }

    /// Cell edge length in pixels.
    #[inline]
    pub const fn cell_size(&self) -> u16 {
        self.cell_size
    }

    #[inline]
    fn index_of(&self, cell: GridCell) -> Option<usize> {
        (cell.col < self.cols && cell.row < self.rows)
            .then(|| usize::from(cell.row) * usize::from(self.cols) + usize::from(cell.col))
    }

    /// The cell containing pixel `p`, if `p` is on the surface.
    pub fn cell_of(&self, p: Point) -> Option<GridCell> {
        if !self.bounds.contains(p) {
            return None;
        }
        let size = i32::from(self.cell_size);
        Some(GridCell::new((p.x / size) as u16, (p.y / size) as u16))
    }

    /// Every cell overlapping `rect`, in row-major order.
    ///
    /// Parts of `rect` outside the surface contribute no cells.
    pub fn cells_for_rect(&self, rect: &Rect) -> Vec<GridCell> {
        let clipped = rect.intersection(&self.bounds);
        if clipped.is_empty() {
            return Vec::new();
        }
        let size = i32::from(self.cell_size);
        let (c0, c1) = (clipped.x / size, (clipped.right() - 1) / size);
        let (r0, r1) = (clipped.y / size, (clipped.bottom() - 1) / size);
        (r0..=r1)
            .flat_map(|r| (c0..=c1).map(move |c| GridCell::new(c as u16, r as u16)))
            .collect()
    }

    /// Pixel rectangle covered by `cell`, clipped to the surface.
    pub fn cell_rect(&self, cell: GridCell) -> Rect {
        let size = i32::from(self.cell_size);
        Rect::new(
            i32::from(cell.col) * size,
            i32::from(cell.row) * size,
            self.cell_size,
            self.cell_size,
        )
        .intersection(&self.bounds)
    }

    /// Mark cells dirty. Out-of-range cells are ignored.
    pub fn mark<I>(&mut self, cells: I)
    where
        I: IntoIterator<Item = GridCell>,
    {
        for cell in cells {
            if let Some(idx) = self.index_of(cell) {
                if !self.flags[idx] {
                    self.flags[idx] = true;
                    self.dirty += 1;
                }
            }
        }
    }

    /// Mark every cell dirty.
    pub fn mark_all(&mut self) {
        self.flags.fill(true);
        self.dirty = self.flags.len();
    }

    /// Check whether a cell is dirty.
    pub fn is_dirty(&self, cell: GridCell) -> bool {
        self.index_of(cell).is_some_and(|idx| self.flags[idx])
    }

    /// Number of dirty cells.
    #[inline]
    pub const fn dirty_count(&self) -> usize {
        self.dirty
    }

    /// Check if no cell is dirty.
    #[inline]
    pub const fn is_clean(&self) -> bool {
        self.dirty == 0
    }

    /// Return the dirty cells in row-major order and clear their flags.
    pub fn take_dirty(&mut self) -> Vec<GridCell> {
        if self.dirty == 0 {
            return Vec::new();
        }
        let cols = usize::from(self.cols);
        let mut out = Vec::with_capacity(self.dirty);
        for (idx, flag) in self.flags.iter_mut().enumerate() {
            if std::mem::take(flag) {
                out.push(GridCell::new((idx % cols) as u16, (idx / cols) as u16));
            }
        }
        self.dirty = 0;
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grid_dimensions_round_up() {
        let grid = DirtyGrid::new(70, 32, 16);
        assert_eq!(grid.cols(), 5);
        assert_eq!(grid.rows(), 2);
        // The last column is clipped to the surface.
        assert_eq!(grid.cell_rect(GridCell::new(4, 0)), Rect::new(64, 0, 6, 16));
    }

    #[test]
    fn test_grid_mark_ignores_out_of_range() {
        let mut grid = DirtyGrid::new(64, 32, 16);
        grid.mark([GridCell::new(1, 1), GridCell::new(4, 0), GridCell::new(0, 2)]);
        assert_eq!(grid.dirty_count(), 1);
        assert!(grid.is_dirty(GridCell::new(1, 1)));
        assert!(!grid.is_dirty(GridCell::new(4, 0)));
    }

    #[test]
    fn test_grid_mark_is_idempotent() {
        let mut grid = DirtyGrid::new(64, 32, 16);
        grid.mark([GridCell::new(0, 0), GridCell::new(0, 0)]);
        grid.mark([GridCell::new(0, 0)]);
        assert_eq!(grid.dirty_count(), 1);
    }

    #[test]
    fn test_grid_take_dirty_clears() {
        let mut grid = DirtyGrid::new(64, 32, 16);
        grid.mark([GridCell::new(3, 1), GridCell::new(0, 0)]);
        assert_eq!(grid.take_dirty(), vec![GridCell::new(0, 0), GridCell::new(3, 1)]);
        assert!(grid.is_clean());
        assert!(grid.take_dirty().is_empty());
    }

    #[test]
    fn test_grid_cells_for_rect() {
        let grid = DirtyGrid::new(64, 32, 16);
        // [10,14) x [10,14) sits inside cell (0,0).
        assert_eq!(grid.cells_for_rect(&Rect::new(10, 10, 4, 4)), vec![GridCell::new(0, 0)]);
        // [26,30) x [10,14) sits inside cell (1,0).
        assert_eq!(grid.cells_for_rect(&Rect::new(26, 10, 4, 4)), vec![GridCell::new(1, 0)]);
        // Straddling a boundary touches both neighbours.
        assert_eq!(
            grid.cells_for_rect(&Rect::new(14, 14, 4, 4)),
            vec![
                GridCell::new(0, 0),
                GridCell::new(1, 0),
                GridCell::new(0, 1),
                GridCell::new(1, 1),
            ]
        );
    }

    #[test]
    fn test_grid_cells_for_offscreen_rect() {
        let grid = DirtyGrid::new(64, 32, 16);
        assert!(grid.cells_for_rect(&Rect::new(-10, -10, 5, 5)).is_empty());
        assert_eq!(grid.cells_for_rect(&Rect::new(-10, -10, 12, 12)), vec![GridCell::new(0, 0)]);
    }

    #[test]
    fn test_grid_cell_of() {
        let grid = DirtyGrid::new(64, 32, 16);
        assert_eq!(grid.cell_of(Point::new(17, 31)), Some(GridCell::new(1, 1)));
        assert_eq!(grid.cell_of(Point::new(-1, 0)), None);
        assert_eq!(grid.cell_of(Point::new(64, 0)), None);
    }
}
