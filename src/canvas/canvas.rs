//! Canvas: the compositing context.
//!
//! One mutex guards everything a frame is made of: the background truth,
//! the composite (sink-bound) surface, the dirty grid, the sprites, the
//! frame mode and the sink itself. Foreground calls and burnout reversion
//! both go through it, so no push ever shows a half-applied change.

use super::config::CanvasConfig;
use super::frame::FrameMode;
use crate::buffer::{RegularPolygon, Rgb, Shape, Surface};
use crate::burnout::{BurnoutActor, BurnoutObject, BurnoutQueue};
use crate::error::{CanvasError, Result};
use crate::layout::{DirtyGrid, GridCell, Point, Rect};
use crate::sink::{self, DisplaySink};
use crate::sprite::SpriteRegistry;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

/// Everything guarded by the canvas lock.
struct CanvasState<S: DisplaySink> {
    /// Background truth written by direct drawing.
    background: Surface,
    /// Background plus sprites; copied into the sink on every push.
    composite: Surface,
    grid: DirtyGrid,
    sprites: SpriteRegistry,
    frame: FrameMode,
    sink: S,
    /// The sink's reusable offscreen buffer.
    offscreen: Option<S::Buffer>,
    transparent: Rgb,
    pushes: u64,
}

impl<S: DisplaySink> CanvasState<S> {
    fn new(mut sink: S, config: &CanvasConfig) -> Self {
        let offscreen = sink.create_buffer();
        Self {
            background: Surface::new(config.width, config.height),
            composite: Surface::new(config.width, config.height),
            grid: DirtyGrid::new(config.width, config.height, config.cell_size),
            sprites: SpriteRegistry::new(),
            frame: FrameMode::default(),
            sink,
            offscreen: Some(offscreen),
            transparent: config.transparent,
            pushes: 0,
        }
    }

    /// Copy the composite into the sink and make it visible.
    fn push(&mut self) {
        let mut buffer = self
            .offscreen
            .take()
            .unwrap_or_else(|| self.sink.create_buffer());
        sink::upload(&self.composite, &mut buffer);
        self.offscreen = Some(self.sink.push_and_swap(buffer));
        self.pushes += 1;
        log::trace!("push #{}", self.pushes);
    }

    /// Restore pending dirty cells and push, iff the frame mode is Immediate.
    ///
    /// Returns whether a push happened.
    fn maybe_push(&mut self) -> bool {
        if !self.frame.should_push() {
            return false;
        }
        self.restore_dirty();
        self.push();
        true
    }

    /// Run `f` as one buffered frame. If a frame was already open it stays
    /// open and nothing is pushed here.
    fn atomically(&mut self, f: impl FnOnce(&mut Self)) {
        let entered = self.frame.begin();
        f(self);
        if entered && self.frame.end() {
            self.restore_dirty();
            self.push();
        }
    }

    /// Replay the background for each dirty cell, then the sprites
    /// overlapping it in z-order, clipped to the cell.
    fn restore_dirty(&mut self) -> usize {
        let cells = self.grid.take_dirty();
        for cell in &cells {
            let rect = self.grid.cell_rect(*cell);
            self.composite.copy_rect_from(&self.background, &rect);
            for sprite in self.sprites.overlapping(std::slice::from_ref(cell)) {
                self.composite
                    .blit(sprite.surface(), sprite.origin(), &rect, sprite.transparent());
            }
        }
        cells.len()
    }

    /// Dirty the cells under `cells` that a visible sprite occupies, so a
    /// background write there gets the sprite painted back on top.
    fn protect_sprites(&mut self, cells: &[GridCell]) {
        let covered: Vec<GridCell> = cells
            .iter()
            .copied()
            .filter(|c| self.sprites.overlapping(std::slice::from_ref(c)).next().is_some())
            .collect();
        self.grid.mark(covered);
    }

    fn cells_of(&self, points: &[Point]) -> Vec<GridCell> {
        let mut cells: Vec<GridCell> = points.iter().filter_map(|&p| self.grid.cell_of(p)).collect();
        cells.sort_unstable();
        cells.dedup();
        cells
    }

    /// Draw onto the background and the composite.
    fn draw_background(&mut self, shape: &Shape, color: Rgb) -> Result<Vec<Point>> {
        let touched = self.background.draw(shape, color)?;
        for p in &touched {
            self.composite.set(p.x, p.y, color);
        }
        if !self.sprites.is_empty() {
            let cells = self.cells_of(&touched);
            self.protect_sprites(&cells);
        }
        Ok(touched)
    }

    /// Blank expired objects and push once for the whole batch.
    fn revert(&mut self, objects: &[BurnoutObject]) {
        for object in objects {
            object.revert(&mut self.background);
            object.revert(&mut self.composite);
            if !self.sprites.is_empty() {
                let cells = object.cells(&self.grid);
                self.protect_sprites(&cells);
            }
        }
        self.maybe_push();
    }
}

/// Lock the shared state, reporting poisoning as an error.
fn lock_state<S: DisplaySink>(state: &Mutex<CanvasState<S>>) -> Result<MutexGuard<'_, CanvasState<S>>> {
    state.lock().map_err(|_| CanvasError::LockPoisoned)
}

/// Revert a batch of expired objects under the canvas lock.
///
/// Objects invalidated by a `clear` since they were collected are skipped.
fn revert_batch<S: DisplaySink>(
    state: &Mutex<CanvasState<S>>,
    queue: &BurnoutQueue,
    mut objects: Vec<BurnoutObject>,
) -> Result<usize> {
    let mut state = lock_state(state)?;
    let collected = objects.len();
    objects.retain(|o| queue.is_current(o));
    if objects.len() < collected {
        log::debug!("skipped {} burnout(s) invalidated by clear", collected - objects.len());
    }
    if !objects.is_empty() {
        state.revert(&objects);
    }
    Ok(objects.len())
}

/// The drawing and compositing context.
///
/// Construct one per display and share it by reference (or `Arc`) with
/// whatever issues drawing commands. All methods take `&self`.
///
/// # Example
///
/// ```rust,ignore
/// use burnout::{Canvas, CanvasConfig, MemorySink, Point, Rgb};
/// use std::time::Duration;
///
/// let canvas = Canvas::new(MemorySink::new(64, 32), CanvasConfig::default())?;
/// canvas.plot(5, 5, Rgb::RED, None)?;
/// canvas.line(Point::new(0, 0), Point::new(63, 31), Rgb::WHITE, Some(Duration::from_secs(2)))?;
/// ```
pub struct Canvas<S: DisplaySink + 'static> {
    state: Arc<Mutex<CanvasState<S>>>,
    burnouts: Arc<BurnoutQueue>,
    scheduler: Option<BurnoutActor>,
    config: CanvasConfig,
}

impl<S: DisplaySink + 'static> Canvas<S> {
    /// Create a canvas drawing to `sink` and start the burnout scheduler.
    pub fn new(sink: S, config: CanvasConfig) -> Result<Self> {
        config.validate()?;
        let state = Arc::new(Mutex::new(CanvasState::new(sink, &config)));
        let burnouts = Arc::new(BurnoutQueue::new());

        let scheduler = if config.scheduler {
            let shared = Arc::clone(&state);
            let queue = Arc::clone(&burnouts);
            Some(BurnoutActor::spawn(
                Arc::clone(&burnouts),
                config.burnout_interval,
                move |expired| revert_batch(&shared, &queue, expired).map(|_| ()),
            )?)
        } else {
            None
        };

        log::debug!(
            "canvas {}x{} ready (cell {}, scheduler {})",
            config.width,
            config.height,
            config.cell_size,
            if config.scheduler { "on" } else { "off" }
        );
        Ok(Self {
            state,
            burnouts,
            scheduler,
            config,
        })
    }

    fn lock(&self) -> Result<MutexGuard<'_, CanvasState<S>>> {
        lock_state(&self.state)
    }

    /// Surface width in pixels.
    pub const fn width(&self) -> u16 {
        self.config.width
    }

    /// Surface height in pixels.
    pub const fn height(&self) -> u16 {
        self.config.height
    }

    /// The configuration this canvas was built with.
    pub const fn config(&self) -> &CanvasConfig {
        &self.config
    }

    // ---------------------------------------------------------------------
    // Direct drawing
    // ---------------------------------------------------------------------

    /// Draw `shape` onto the background.
    ///
    /// With `burnout` set, the touched pixels revert to black once it
    /// elapses. Returns the number of on-surface pixels touched.
    pub fn draw(&self, shape: Shape, color: Rgb, burnout: Option<Duration>) -> Result<usize> {
        let mut state = self.lock()?;
        let touched = state.draw_background(&shape, color)?;
        let count = touched.len();
        if !touched.is_empty() {
            self.burnouts.add_object(shape, touched, burnout);
        }
        state.maybe_push();
        Ok(count)
    }

    /// Set one pixel.
    pub fn plot(&self, x: i32, y: i32, color: Rgb, burnout: Option<Duration>) -> Result<()> {
        self.draw(Shape::Point(Point::new(x, y)), color, burnout).map(|_| ())
    }

    /// Draw a line, both endpoints inclusive.
    pub fn line(&self, from: Point, to: Point, color: Rgb, burnout: Option<Duration>) -> Result<usize> {
        self.draw(Shape::Line { from, to }, color, burnout)
    }

    /// Draw a rectangle outline, or a filled rectangle with `fill`.
    pub fn rectangle(&self, rect: Rect, fill: bool, color: Rgb, burnout: Option<Duration>) -> Result<usize> {
        self.draw(Shape::Rect { rect, fill }, color, burnout)
    }

    /// Draw a circle outline, or a filled disc with `fill`.
    pub fn circle(
        &self,
        center: Point,
        radius: i32,
        fill: bool,
        color: Rgb,
        burnout: Option<Duration>,
    ) -> Result<usize> {
        self.draw(Shape::Circle { center, radius, fill }, color, burnout)
    }

    /// Draw a regular polygon.
    pub fn polygon(&self, polygon: RegularPolygon, color: Rgb, burnout: Option<Duration>) -> Result<usize> {
        self.draw(Shape::Polygon(polygon), color, burnout)
    }

    /// Blank the whole background and forget pending burnouts.
    ///
    /// Sprites survive and are repainted over the cleared background.
    pub fn clear(&self) -> Result<()> {
        let mut state = self.lock()?;
        let dropped = self.burnouts.clear_all();
        state.background.fill(Rgb::BLACK);
        state.grid.mark_all();
        state.maybe_push();
        log::debug!("canvas cleared ({dropped} pending burnout(s) dropped)");
        Ok(())
    }

    // ---------------------------------------------------------------------
    // Frame batching
    // ---------------------------------------------------------------------

    /// Suppress pushes until [`end_frame`](Self::end_frame). Idempotent.
    pub fn begin_frame(&self) -> Result<()> {
        let mut state = self.lock()?;
        if state.frame.begin() {
            log::trace!("frame begin");
        }
        Ok(())
    }

    /// Close the open frame with exactly one push. No-op if none is open.
    pub fn end_frame(&self) -> Result<()> {
        let mut state = self.lock()?;
        if state.frame.end() {
            state.restore_dirty();
            state.push();
        }
        Ok(())
    }

    /// The current frame mode.
    pub fn frame_mode(&self) -> Result<FrameMode> {
        Ok(self.lock()?.frame)
    }

    // ---------------------------------------------------------------------
    // Sprites
    // ---------------------------------------------------------------------

    /// Register a hidden, fully transparent `width` x `height` sprite.
    ///
    /// Fails with [`CanvasError::DuplicateSprite`] if the name is taken.
    pub fn create_sprite(&self, name: &str, width: u16, height: u16) -> Result<()> {
        let mut state = self.lock()?;
        let transparent = state.transparent;
        state.sprites.create(name, width, height, transparent)?;
        log::debug!("sprite '{name}' created ({width}x{height})");
        Ok(())
    }

    /// Show a sprite with its top-left corner at `(x, y)`.
    pub fn show_sprite(&self, name: &str, x: f32, y: f32) -> Result<()> {
        let mut guard = self.lock()?;
        let state = &mut *guard;
        let Some(sprite) = state.sprites.get_mut(name) else {
            log::warn!("show: unknown sprite '{name}'");
            return Ok(());
        };
        let old = sprite.show(x, y, &state.grid);
        state.grid.mark(old);
        state.grid.mark(sprite.cells().iter().copied());
        state.maybe_push();
        Ok(())
    }

    /// Hide a sprite, letting the background show through again.
    pub fn hide_sprite(&self, name: &str) -> Result<()> {
        let mut guard = self.lock()?;
        let state = &mut *guard;
        let Some(sprite) = state.sprites.get_mut(name) else {
            log::warn!("hide: unknown sprite '{name}'");
            return Ok(());
        };
        if !sprite.is_visible() {
            return Ok(());
        }
        state.grid.mark(sprite.hide());
        state.maybe_push();
        Ok(())
    }

    /// Move a sprite to `(x, y)`.
    ///
    /// A visible sprite is erased and redrawn inside one buffered frame, so
    /// no push ever shows it in both places or in neither. A hidden sprite
    /// only has its position updated.
    pub fn move_sprite(&self, name: &str, x: f32, y: f32) -> Result<()> {
        let mut guard = self.lock()?;
        let state = &mut *guard;
        let Some(sprite) = state.sprites.get_mut(name) else {
            log::warn!("move: unknown sprite '{name}'");
            return Ok(());
        };
        let old = sprite.set_position(x, y, &state.grid);
        if !sprite.is_visible() {
            return Ok(());
        }
        let new = sprite.cells().to_vec();
        state.atomically(|s| {
            s.grid.mark(old);
            s.grid.mark(new);
        });
        Ok(())
    }

    /// Draw `shape` into a sprite's private buffer (sprite-local
    /// coordinates). Returns the number of sprite pixels touched.
    pub fn draw_to_sprite(&self, name: &str, shape: Shape, color: Rgb) -> Result<usize> {
        let mut guard = self.lock()?;
        let state = &mut *guard;
        let Some(sprite) = state.sprites.get_mut(name) else {
            log::warn!("draw: unknown sprite '{name}'");
            return Ok(0);
        };
        let touched = sprite.draw(&shape, color)?.len();
        if sprite.is_visible() {
            state.grid.mark(sprite.cells().iter().copied());
            state.maybe_push();
        }
        Ok(touched)
    }

    /// Reset a sprite's private buffer to fully transparent.
    pub fn clear_sprite(&self, name: &str) -> Result<()> {
        let mut guard = self.lock()?;
        let state = &mut *guard;
        let Some(sprite) = state.sprites.get_mut(name) else {
            log::warn!("clear: unknown sprite '{name}'");
            return Ok(());
        };
        sprite.clear();
        if sprite.is_visible() {
            state.grid.mark(sprite.cells().iter().copied());
            state.maybe_push();
        }
        Ok(())
    }

    /// Paint a sprite above every other sprite.
    pub fn raise_sprite(&self, name: &str) -> Result<()> {
        let mut guard = self.lock()?;
        let state = &mut *guard;
        if !state.sprites.raise(name) {
            log::warn!("raise: unknown sprite '{name}'");
            return Ok(());
        }
        if let Some(sprite) = state.sprites.get(name).filter(|s| s.is_visible()) {
            let cells = sprite.cells().to_vec();
            state.grid.mark(cells);
            state.maybe_push();
        }
        Ok(())
    }

    /// Remove one sprite.
    pub fn dispose_sprite(&self, name: &str) -> Result<()> {
        let mut state = self.lock()?;
        let Some(mut sprite) = state.sprites.remove(name) else {
            log::warn!("dispose: unknown sprite '{name}'");
            return Ok(());
        };
        if sprite.is_visible() {
            state.grid.mark(sprite.hide());
            state.maybe_push();
        }
        log::debug!("sprite '{name}' disposed");
        Ok(())
    }

    /// Remove every sprite.
    pub fn dispose_all_sprites(&self) -> Result<()> {
        let mut state = self.lock()?;
        let count = state.sprites.len();
        let cells = state.sprites.dispose_all();
        if !cells.is_empty() {
            state.grid.mark(cells);
            state.maybe_push();
        }
        log::debug!("{count} sprite(s) disposed");
        Ok(())
    }

    /// Whether a sprite is registered and visible; `None` if unknown.
    pub fn sprite_visible(&self, name: &str) -> Option<bool> {
        let state = self.lock().ok()?;
        state.sprites.get(name).map(crate::sprite::Sprite::is_visible)
    }

    /// Grid cells a sprite occupies; `None` if unknown.
    pub fn sprite_cells(&self, name: &str) -> Option<Vec<GridCell>> {
        let state = self.lock().ok()?;
        state.sprites.get(name).map(|s| s.cells().to_vec())
    }

    /// Sprite names in paint order (back to front).
    pub fn sprite_order(&self) -> Vec<String> {
        self.lock().map(|s| s.sprites.z_order().to_vec()).unwrap_or_default()
    }

    // ---------------------------------------------------------------------
    // Burnouts
    // ---------------------------------------------------------------------

    /// Revert every expired burnout now, on the calling thread.
    ///
    /// This is the same pass the background scheduler runs. Returns the
    /// number of objects reverted.
    pub fn process_burnouts(&self) -> Result<usize> {
        let expired = self.burnouts.process_burnouts();
        if expired.is_empty() {
            return Ok(0);
        }
        revert_batch(&self.state, &self.burnouts, expired)
    }

    /// Number of burnouts waiting to expire.
    pub fn pending_burnouts(&self) -> usize {
        self.burnouts.len()
    }

    // ---------------------------------------------------------------------
    // Inspection
    // ---------------------------------------------------------------------

    /// Background color at (x, y).
    pub fn pixel(&self, x: i32, y: i32) -> Option<Rgb> {
        self.lock().ok()?.background.get(x, y)
    }

    /// Composited (sink-bound) color at (x, y).
    pub fn composite_pixel(&self, x: i32, y: i32) -> Option<Rgb> {
        self.lock().ok()?.composite.get(x, y)
    }

    /// Number of pushes made to the sink.
    pub fn push_count(&self) -> u64 {
        self.lock().map_or(0, |s| s.pushes)
    }

    /// Number of grid cells awaiting restoration.
    pub fn dirty_cells(&self) -> usize {
        self.lock().map_or(0, |s| s.grid.dirty_count())
    }

    /// Stop the burnout scheduler and wait for it.
    ///
    /// After this returns no reversion can touch the surface. Idempotent;
    /// also run on drop.
    pub fn shutdown(&mut self) {
        if let Some(actor) = self.scheduler.take() {
            actor.join();
        }
    }
}

impl<S: DisplaySink + 'static> Drop for Canvas<S> {
    fn drop(&mut self) {
        self.shutdown();
    }
}

impl<S: DisplaySink + 'static> std::fmt::Debug for Canvas<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Canvas")
            .field("config", &self.config)
            .field("scheduler", &self.scheduler)
            .field("pending_burnouts", &self.burnouts.len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sink::{MemoryMonitor, MemorySink};
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::thread;
    use std::time::Instant;

    /// A 64x32 canvas with 16px cells and no background scheduler.
    fn manual_canvas() -> (Canvas<MemorySink>, MemoryMonitor) {
        let sink = MemorySink::new(64, 32);
        let monitor = sink.monitor();
        let config = CanvasConfig::default().with_scheduler(false);
        (Canvas::new(sink, config).unwrap(), monitor)
    }

    fn solid_sprite(canvas: &Canvas<MemorySink>, name: &str, color: Rgb) {
        canvas.create_sprite(name, 4, 4).unwrap();
        canvas
            .draw_to_sprite(name, Shape::Rect { rect: Rect::from_size(4, 4), fill: true }, color)
            .unwrap();
    }

    #[test]
    fn test_no_push_at_construction() {
        let (canvas, monitor) = manual_canvas();
        assert_eq!(monitor.pushes(), 0);
        assert_eq!(canvas.push_count(), 0);
        assert_eq!(canvas.frame_mode().unwrap(), FrameMode::Immediate);
    }

    #[test]
    fn test_plot_pushes_when_immediate() {
        let (canvas, monitor) = manual_canvas();
        canvas.plot(5, 5, Rgb::RED, None).unwrap();
        assert_eq!(monitor.pushes(), 1);
        assert_eq!(monitor.pixel(5, 5), Some(Rgb::RED));
    }

    #[test]
    fn test_buffered_frame_defers_until_end() {
        let (canvas, monitor) = manual_canvas();
        canvas.begin_frame().unwrap();
        canvas.begin_frame().unwrap();
        canvas.plot(5, 5, Rgb::RED, None).unwrap();
        canvas.line(Point::new(0, 0), Point::new(10, 0), Rgb::GREEN, None).unwrap();
        assert_eq!(monitor.pushes(), 0);
        assert_eq!(monitor.pixel(5, 5), Some(Rgb::BLACK));

        canvas.end_frame().unwrap();
        assert_eq!(monitor.pushes(), 1);
        assert_eq!(monitor.pixel(5, 5), Some(Rgb::RED));
        assert_eq!(monitor.pixel(10, 0), Some(Rgb::GREEN));
    }

    #[test]
    fn test_end_frame_when_immediate_is_noop() {
        let (canvas, monitor) = manual_canvas();
        canvas.end_frame().unwrap();
        canvas.end_frame().unwrap();
        assert_eq!(monitor.pushes(), 0);
    }

    #[test]
    fn test_rectangle_touched_counts() {
        let (canvas, _monitor) = manual_canvas();
        let rect = Rect::new(0, 0, 10, 10);
        assert_eq!(canvas.rectangle(rect, true, Rgb::WHITE, None).unwrap(), 100);
        assert_eq!(canvas.rectangle(rect, false, Rgb::WHITE, None).unwrap(), 36);
    }

    #[test]
    fn test_off_surface_drawing_clips() {
        let (canvas, monitor) = manual_canvas();
        assert_eq!(canvas.draw(Shape::Point(Point::new(-1, 3)), Rgb::RED, None).unwrap(), 0);
        assert_eq!(canvas.rectangle(Rect::new(60, 30, 10, 10), true, Rgb::RED, None).unwrap(), 8);
        assert_eq!(monitor.pixel(63, 31), Some(Rgb::RED));
    }

    #[test]
    fn test_polygon_with_too_few_sides_fails() {
        let (canvas, monitor) = manual_canvas();
        let result = canvas.polygon(RegularPolygon::new(Point::new(10, 10), 5, 0), Rgb::RED, None);
        assert!(matches!(result, Err(CanvasError::MalformedShape(_))));
        assert_eq!(monitor.pushes(), 0);
    }

    #[test]
    fn test_duplicate_sprite_is_an_error() {
        let (canvas, _monitor) = manual_canvas();
        canvas.create_sprite("ship", 4, 4).unwrap();
        assert!(matches!(
            canvas.create_sprite("ship", 2, 2),
            Err(CanvasError::DuplicateSprite(name)) if name == "ship"
        ));
    }

    #[test]
    fn test_unknown_sprite_is_a_noop() {
        let (canvas, monitor) = manual_canvas();
        canvas.show_sprite("ghost", 1.0, 1.0).unwrap();
        canvas.move_sprite("ghost", 2.0, 2.0).unwrap();
        canvas.hide_sprite("ghost").unwrap();
        canvas.dispose_sprite("ghost").unwrap();
        assert_eq!(canvas.draw_to_sprite("ghost", Shape::Point(Point::ORIGIN), Rgb::RED).unwrap(), 0);
        assert_eq!(monitor.pushes(), 0);
        assert_eq!(canvas.sprite_visible("ghost"), None);
    }

    #[test]
    fn test_show_then_hide_restores_background() {
        let (canvas, monitor) = manual_canvas();
        canvas.rectangle(Rect::new(0, 0, 20, 20), true, Rgb::GREEN, None).unwrap();
        let before = monitor.frame();

        solid_sprite(&canvas, "box", Rgb::WHITE);
        canvas.show_sprite("box", 2.0, 2.0).unwrap();
        assert_eq!(monitor.pixel(3, 3), Some(Rgb::WHITE));
        assert_eq!(canvas.pixel(3, 3), Some(Rgb::GREEN));

        canvas.hide_sprite("box").unwrap();
        assert_eq!(monitor.frame().pixels(), before.pixels());
        assert_eq!(canvas.sprite_visible("box"), Some(false));
    }

    #[test]
    fn test_transparent_pixels_show_background() {
        let (canvas, monitor) = manual_canvas();
        canvas.plot(1, 1, Rgb::GREEN, None).unwrap();
        canvas.create_sprite("dot", 4, 4).unwrap();
        canvas.draw_to_sprite("dot", Shape::Point(Point::ORIGIN), Rgb::WHITE).unwrap();
        canvas.show_sprite("dot", 0.0, 0.0).unwrap();
        assert_eq!(monitor.pixel(0, 0), Some(Rgb::WHITE));
        assert_eq!(monitor.pixel(1, 1), Some(Rgb::GREEN));
    }

    #[test]
    fn test_later_sprite_paints_on_top() {
        let (canvas, monitor) = manual_canvas();
        solid_sprite(&canvas, "a", Rgb::RED);
        solid_sprite(&canvas, "b", Rgb::BLUE);
        canvas.show_sprite("a", 0.0, 0.0).unwrap();
        canvas.show_sprite("b", 2.0, 2.0).unwrap();
        assert_eq!(monitor.pixel(3, 3), Some(Rgb::BLUE));
        assert_eq!(monitor.pixel(1, 1), Some(Rgb::RED));

        canvas.raise_sprite("a").unwrap();
        assert_eq!(monitor.pixel(3, 3), Some(Rgb::RED));
        assert_eq!(canvas.sprite_order(), vec!["b".to_string(), "a".to_string()]);
    }

    #[test]
    fn test_background_draw_stays_under_sprite() {
        let (canvas, monitor) = manual_canvas();
        solid_sprite(&canvas, "box", Rgb::WHITE);
        canvas.show_sprite("box", 0.0, 0.0).unwrap();
        canvas.plot(1, 1, Rgb::RED, None).unwrap();
        assert_eq!(canvas.pixel(1, 1), Some(Rgb::RED));
        assert_eq!(monitor.pixel(1, 1), Some(Rgb::WHITE));

        canvas.hide_sprite("box").unwrap();
        assert_eq!(monitor.pixel(1, 1), Some(Rgb::RED));
    }

    #[test]
    fn test_ship_moves_in_one_push() {
        let (canvas, monitor) = manual_canvas();
        solid_sprite(&canvas, "ship", Rgb::WHITE);
        canvas.show_sprite("ship", 10.0, 10.0).unwrap();
        assert_eq!(canvas.sprite_cells("ship"), Some(vec![GridCell::new(0, 0)]));

        let pushes = monitor.pushes();
        canvas.move_sprite("ship", 26.0, 10.0).unwrap();
        assert_eq!(monitor.pushes(), pushes + 1);
        assert_eq!(canvas.sprite_cells("ship"), Some(vec![GridCell::new(1, 0)]));
        assert_eq!(monitor.pixel(10, 10), Some(Rgb::BLACK));
        assert_eq!(monitor.pixel(26, 10), Some(Rgb::WHITE));
        assert_eq!(monitor.pixel(29, 13), Some(Rgb::WHITE));
        assert_eq!(canvas.frame_mode().unwrap(), FrameMode::Immediate);
    }

    #[test]
    fn test_move_inside_open_frame_keeps_it_open() {
        let (canvas, monitor) = manual_canvas();
        solid_sprite(&canvas, "ship", Rgb::WHITE);
        canvas.show_sprite("ship", 0.0, 0.0).unwrap();
        let pushes = monitor.pushes();

        canvas.begin_frame().unwrap();
        canvas.move_sprite("ship", 20.0, 0.0).unwrap();
        assert_eq!(canvas.frame_mode().unwrap(), FrameMode::Buffered);
        assert_eq!(monitor.pushes(), pushes);

        canvas.end_frame().unwrap();
        assert_eq!(monitor.pushes(), pushes + 1);
        assert_eq!(monitor.pixel(0, 0), Some(Rgb::BLACK));
        assert_eq!(monitor.pixel(20, 0), Some(Rgb::WHITE));
    }

    #[test]
    fn test_hidden_sprite_move_does_not_push() {
        let (canvas, monitor) = manual_canvas();
        canvas.create_sprite("ship", 4, 4).unwrap();
        canvas.move_sprite("ship", 5.0, 5.0).unwrap();
        assert_eq!(monitor.pushes(), 0);
        assert_eq!(canvas.sprite_cells("ship"), Some(Vec::new()));
    }

    #[test]
    fn test_manual_burnout_pass() {
        let (canvas, monitor) = manual_canvas();
        canvas.plot(5, 5, Rgb::RED, None).unwrap();
        canvas.plot(5, 5, Rgb::RED, Some(Duration::from_millis(100))).unwrap();
        assert_eq!(canvas.pending_burnouts(), 1);
        assert_eq!(canvas.process_burnouts().unwrap(), 0);

        thread::sleep(Duration::from_millis(150));
        assert_eq!(canvas.process_burnouts().unwrap(), 1);
        assert_eq!(canvas.pixel(5, 5), Some(Rgb::BLACK));
        assert_eq!(monitor.pixel(5, 5), Some(Rgb::BLACK));
        assert_eq!(canvas.pending_burnouts(), 0);
    }

    #[test]
    fn test_scheduler_reverts_expired_plot() {
        let sink = MemorySink::new(64, 32);
        let monitor = sink.monitor();
        let canvas = Canvas::new(sink, CanvasConfig::default()).unwrap();
        canvas.plot(5, 5, Rgb::RED, None).unwrap();
        canvas.plot(5, 5, Rgb::RED, Some(Duration::from_millis(100))).unwrap();
        assert_eq!(monitor.pixel(5, 5), Some(Rgb::RED));

        thread::sleep(Duration::from_millis(150));
        assert_eq!(canvas.pixel(5, 5), Some(Rgb::BLACK));
        assert_eq!(monitor.pixel(5, 5), Some(Rgb::BLACK));
    }

    #[test]
    fn test_burnout_under_sprite_keeps_sprite() {
        let (canvas, monitor) = manual_canvas();
        canvas.plot(1, 1, Rgb::RED, Some(Duration::from_millis(1))).unwrap();
        solid_sprite(&canvas, "box", Rgb::WHITE);
        canvas.show_sprite("box", 0.0, 0.0).unwrap();

        thread::sleep(Duration::from_millis(5));
        canvas.process_burnouts().unwrap();
        assert_eq!(canvas.pixel(1, 1), Some(Rgb::BLACK));
        assert_eq!(monitor.pixel(1, 1), Some(Rgb::WHITE));
    }

    #[test]
    fn test_clear_keeps_sprites_and_drops_burnouts() {
        let (canvas, monitor) = manual_canvas();
        canvas.rectangle(Rect::new(0, 0, 64, 32), true, Rgb::GREEN, Some(Duration::from_millis(1))).unwrap();
        solid_sprite(&canvas, "box", Rgb::WHITE);
        canvas.show_sprite("box", 30.0, 10.0).unwrap();

        canvas.clear().unwrap();
        assert_eq!(canvas.pending_burnouts(), 0);
        assert_eq!(monitor.pixel(0, 0), Some(Rgb::BLACK));
        assert_eq!(monitor.pixel(31, 11), Some(Rgb::WHITE));
        assert_eq!(canvas.sprite_visible("box"), Some(true));

        // Drawn after the clear; nothing may blank it.
        canvas.plot(0, 0, Rgb::RED, None).unwrap();
        thread::sleep(Duration::from_millis(5));
        assert_eq!(canvas.process_burnouts().unwrap(), 0);
        assert_eq!(monitor.pixel(0, 0), Some(Rgb::RED));
    }

    #[test]
    fn test_dispose_all_sprites() {
        let (canvas, monitor) = manual_canvas();
        solid_sprite(&canvas, "a", Rgb::RED);
        solid_sprite(&canvas, "b", Rgb::BLUE);
        canvas.show_sprite("a", 0.0, 0.0).unwrap();
        canvas.show_sprite("b", 40.0, 20.0).unwrap();

        canvas.dispose_all_sprites().unwrap();
        assert!(canvas.sprite_order().is_empty());
        assert_eq!(monitor.pixel(0, 0), Some(Rgb::BLACK));
        assert_eq!(monitor.pixel(41, 21), Some(Rgb::BLACK));
        // The names are free again.
        canvas.create_sprite("a", 2, 2).unwrap();
    }

    #[test]
    fn test_shutdown_is_idempotent() {
        let mut canvas = Canvas::new(MemorySink::new(8, 8), CanvasConfig::default().with_size(8, 8)).unwrap();
        canvas.shutdown();
        canvas.shutdown();
        canvas.plot(1, 1, Rgb::RED, Some(Duration::from_millis(1))).unwrap();
        thread::sleep(Duration::from_millis(30));
        assert_eq!(canvas.pixel(1, 1), Some(Rgb::RED));
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = CanvasConfig::default().with_cell_size(0);
        assert!(matches!(
            Canvas::new(MemorySink::new(64, 32), config),
            Err(CanvasError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_offscreen_burnout_is_not_queued() {
        let (canvas, _monitor) = manual_canvas();
        canvas.plot(-5, 100, Rgb::RED, Some(Duration::from_millis(1))).unwrap();
        assert_eq!(canvas.line(Point::new(100, 0), Point::new(200, 0), Rgb::RED, Some(Duration::from_millis(1))).unwrap(), 0);
        assert_eq!(canvas.pending_burnouts(), 0);

        canvas.plot(1, 1, Rgb::RED, Some(Duration::from_millis(1))).unwrap();
        assert_eq!(canvas.pending_burnouts(), 1);
    }

    #[test]
    fn test_extreme_shapes_leave_canvas_usable() {
        let (canvas, monitor) = manual_canvas();
        let far = Some(Duration::from_millis(1));
        canvas.circle(Point::new(10, 10), i32::MAX - 5, false, Rgb::RED, far).unwrap();
        canvas.circle(Point::new(i32::MIN, i32::MAX), i32::MAX, true, Rgb::RED, far).unwrap();
        canvas.rectangle(Rect::new(i32::MAX - 3, i32::MAX - 3, u16::MAX, u16::MAX), false, Rgb::RED, far).unwrap();
        canvas.rectangle(Rect::new(i32::MIN, i32::MIN, u16::MAX, u16::MAX), true, Rgb::RED, far).unwrap();
        canvas.line(Point::new(i32::MAX, i32::MIN), Point::new(i32::MIN, i32::MAX), Rgb::RED, far).unwrap();
        assert_eq!(canvas.line(Point::new(0, 0), Point::new(50_000_000, 0), Rgb::BLUE, None).unwrap(), 64);
        assert_eq!(monitor.pixel(63, 0), Some(Rgb::BLUE));

        canvas.plot(1, 1, Rgb::RED, None).unwrap();
        assert_eq!(monitor.pixel(1, 1), Some(Rgb::RED));

        thread::sleep(Duration::from_millis(5));
        canvas.process_burnouts().unwrap();
        assert_eq!(canvas.pending_burnouts(), 0);
        assert_eq!(monitor.pixel(1, 1), Some(Rgb::RED));
    }

    #[test]
    fn test_reversion_is_atomic_under_concurrent_drawing() {
        let sink = MemorySink::new(64, 32);
        let monitor = sink.monitor();
        let canvas = Canvas::new(sink, CanvasConfig::default()).unwrap();
        let block = Rect::new(0, 0, 40, 20);
        let area = block.width as usize * block.height as usize;
        canvas.rectangle(block, true, Rgb::GREEN, Some(Duration::from_millis(60))).unwrap();

        let lit = |frame: &Surface| {
            block
                .points()
                .filter(|p| frame.get(p.x, p.y) == Some(Rgb::GREEN))
                .count()
        };
        let stop = AtomicBool::new(false);
        let mut partial = Vec::new();
        thread::scope(|scope| {
            scope.spawn(|| {
                let mut i = 0i32;
                while !stop.load(Ordering::Relaxed) {
                    let y = 24 + i % 8;
                    canvas.plot(i % 64, y, Rgb::BLUE, None).unwrap();
                    canvas.line(Point::new(0, y), Point::new(63, y), Rgb::RED, None).unwrap();
                    i = i.wrapping_add(1);
                    thread::yield_now();
                }
            });

            let until = Instant::now() + Duration::from_millis(200);
            while Instant::now() < until {
                let count = lit(&monitor.frame());
                if count != 0 && count != area {
                    partial.push(count);
                }
            }
            stop.store(true, Ordering::Relaxed);
        });
        assert!(partial.is_empty(), "partially lit frames: {partial:?}");

        let until = Instant::now() + Duration::from_secs(1);
        while canvas.pending_burnouts() > 0 && Instant::now() < until {
            thread::sleep(Duration::from_millis(10));
        }
        assert_eq!(lit(&monitor.frame()), 0);
        assert_eq!(canvas.pixel(0, 0), Some(Rgb::BLACK));
        assert_eq!(canvas.pending_burnouts(), 0);
    }
}
