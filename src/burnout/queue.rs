//! Burnout queue: pending timed marks and their expiry scan.

use crate::buffer::{Rgb, Shape, Surface};
use crate::layout::{DirtyGrid, GridCell, Point};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

/// A drawn shape scheduled to be blanked at `expires_at`.
#[derive(Debug, Clone)]
pub struct BurnoutObject {
    id: u64,
    /// Queue epoch at creation; a later `clear_all` makes the object stale.
    epoch: u64,
    shape: Shape,
    /// Pixels to blank. Empty for filled rectangles, which revert as one
    /// bounded fill.
    points: Vec<Point>,
    expires_at: Instant,
}

impl BurnoutObject {
    /// Identifier assigned by the queue.
    #[inline]
    pub const fn id(&self) -> u64 {
        self.id
    }

    /// The shape that was drawn.
    #[inline]
    pub const fn shape(&self) -> &Shape {
        &self.shape
    }

    /// Recorded pixels (empty for filled rectangles).
    #[inline]
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    /// Absolute expiry instant.
    #[inline]
    pub const fn expires_at(&self) -> Instant {
        self.expires_at
    }

    /// Whether the object has expired at `now`.
    #[inline]
    pub fn is_expired(&self, now: Instant) -> bool {
        self.expires_at <= now
    }

    /// Blank this object's pixels on `surface`.
    pub fn revert(&self, surface: &mut Surface) {
        match self.shape {
            Shape::Rect { rect, fill: true } => {
                surface.fill_rect(&rect, Rgb::BLACK);
            }
            Shape::Point(_)
            | Shape::Line { .. }
            | Shape::Rect { fill: false, .. }
            | Shape::Circle { .. }
            | Shape::Polygon(_) => {
                for p in &self.points {
                    surface.set(p.x, p.y, Rgb::BLACK);
                }
            }
        }
    }

    /// Grid cells this object's pixels fall in.
    pub fn cells(&self, grid: &DirtyGrid) -> Vec<GridCell> {
        let mut cells = match self.shape {
            Shape::Rect { rect, fill: true } => grid.cells_for_rect(&rect),
            _ => self.points.iter().filter_map(|&p| grid.cell_of(p)).collect(),
        };
        cells.sort_unstable();
        cells.dedup();
        cells
    }
}

/// Thread-safe set of pending burnouts.
///
/// The queue has its own lock, separate from the canvas state, so the
/// scheduler's scan never contends with foreground drawing.
#[derive(Debug, Default)]
pub struct BurnoutQueue {
    pending: Mutex<Vec<BurnoutObject>>,
    next_id: AtomicU64,
    epoch: AtomicU64,
}

impl BurnoutQueue {
    /// Create an empty queue.
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<BurnoutObject>> {
        // Every critical section leaves the vector consistent, so a
        // poisoned lock still guards valid data.
        self.pending.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Schedule `shape` (which touched `points`) to expire after `duration`.
    ///
    /// `None` means the mark never expires; nothing is queued and `None` is
    /// returned. Otherwise returns the new object's id.
    pub fn add_object(&self, shape: Shape, points: Vec<Point>, duration: Option<Duration>) -> Option<u64> {
        self.add_object_at(shape, points, duration, Instant::now())
    }

    /// [`add_object`](Self::add_object) with an explicit creation instant.
    pub fn add_object_at(
        &self,
        shape: Shape,
        points: Vec<Point>,
        duration: Option<Duration>,
        now: Instant,
    ) -> Option<u64> {
        let duration = duration?;
        let points = match shape {
            Shape::Rect { fill: true, .. } => Vec::new(),
            _ => points,
        };
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let mut pending = self.lock();
        pending.push(BurnoutObject {
            id,
            epoch: self.epoch.load(Ordering::Acquire),
            shape,
            points,
            expires_at: now + duration,
        });
        log::trace!("burnout #{id} queued for {duration:?}");
        Some(id)
    }

    /// Remove and return every object that has expired by now.
    pub fn process_burnouts(&self) -> Vec<BurnoutObject> {
        self.process_at(Instant::now())
    }

    /// Remove and return every object expired at `now`, earliest first.
    pub fn process_at(&self, now: Instant) -> Vec<BurnoutObject> {
        let mut pending = self.lock();
        let (mut expired, keep): (Vec<_>, Vec<_>) = pending.drain(..).partition(|o| o.is_expired(now));
        *pending = keep;
        drop(pending);
        expired.sort_by_key(|o| (o.expires_at, o.id));
        expired
    }

    /// Drop every pending object without reverting anything.
    ///
    /// Objects already handed out by a scan but not yet reverted become
    /// stale (see [`is_current`](Self::is_current)). Returns how many
    /// pending objects were discarded.
    pub fn clear_all(&self) -> usize {
        let mut pending = self.lock();
        self.epoch.fetch_add(1, Ordering::AcqRel);
        let count = pending.len();
        pending.clear();
        count
    }

    /// Whether `object` was queued after the most recent `clear_all`.
    pub fn is_current(&self, object: &BurnoutObject) -> bool {
        object.epoch == self.epoch.load(Ordering::Acquire)
    }

    /// Number of pending objects.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Check if nothing is pending.
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// The earliest pending expiry, if any.
    pub fn next_expiry(&self) -> Option<Instant> {
        self.lock().iter().map(BurnoutObject::expires_at).min()
    }
}
