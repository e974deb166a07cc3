//! Animated text overlays built from glyph masks.
//!
//! An animation is precomputed as a script of frames, each a list of pixel
//! writes. Playing it wraps every frame in one buffered canvas frame, so
//! each step becomes exactly one push.

use super::glyph::GlyphSource;
use crate::buffer::Rgb;
use crate::canvas::Canvas;
use crate::error::Result;
use crate::layout::Point;
use crate::sink::DisplaySink;
use rand::{rngs::StdRng, seq::SliceRandom, SeedableRng};
use std::collections::HashSet;
use std::thread;
use std::time::Duration;
use unicode_segmentation::UnicodeSegmentation;

/// Gap between adjacent glyphs, in pixels.
const LETTER_SPACING: i32 = 1;

/// How text appears (or disappears) over time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextEffect {
    /// One glyph per frame.
    Typewriter,
    /// One pixel column per frame, left to right.
    Wipe,
    /// Pixels in a seeded random order, spread over `frames` frames.
    Dissolve {
        /// Number of frames (at least one is used).
        frames: usize,
        /// RNG seed; equal seeds give equal scripts.
        seed: u64,
    },
    /// The text travels horizontally between `start_x` and its origin,
    /// `step` pixels per frame.
    Slide {
        /// Left edge of the text in the first (reveal) or last (erase)
        /// placement, usually the display's right edge.
        start_x: i32,
        /// Pixels moved per frame (at least one is used).
        step: u32,
    },
}

/// Whether an animation draws the text or removes it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextMode {
    /// Draw in the given color.
    #[default]
    Reveal,
    /// Draw black over it. A slide in this mode carries the text back out
    /// to `start_x`.
    Erase,
}

/// One pixel to set during a frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelWrite {
    /// Target pixel.
    pub point: Point,
    /// Color to write.
    pub color: Rgb,
}

/// A lit pixel of laid-out text, tagged with its grapheme index.
#[derive(Debug, Clone, Copy)]
struct Ink {
    grapheme: usize,
    point: Point,
}

/// Lay `text` out left to right from `origin` and collect its lit pixels.
fn layout<G: GlyphSource + ?Sized>(text: &str, source: &G, origin: Point) -> Vec<Ink> {
    let space = i32::from(source.space_width());
    let mut x = origin.x;
    let mut ink = Vec::new();
    for (grapheme, cluster) in text.graphemes(true).enumerate() {
        if cluster.chars().all(char::is_whitespace) {
            x += space;
            continue;
        }
        let Some(mask) = source.glyph(cluster) else {
            log::warn!("no glyph for {cluster:?}");
            x += space;
            continue;
        };
        ink.extend(mask.on_pixels().map(|p| Ink {
            grapheme,
            point: Point::new(x + p.x, origin.y + p.y),
        }));
        x += i32::from(mask.width()) + LETTER_SPACING;
    }
    ink
}

fn paint(points: impl Iterator<Item = Point>, color: Rgb) -> Vec<PixelWrite> {
    points.map(|point| PixelWrite { point, color }).collect()
}

/// A precomputed text animation.
#[derive(Debug, Clone, Default)]
pub struct TextAnimation {
    frames: Vec<Vec<PixelWrite>>,
}

impl TextAnimation {
    /// Script `effect` for `text` placed at `origin`.
    pub fn build<G: GlyphSource + ?Sized>(
        effect: TextEffect,
        mode: TextMode,
        text: &str,
        source: &G,
        origin: Point,
        color: Rgb,
    ) -> Self {
        let ink = layout(text, source, origin);
        let pen = match mode {
            TextMode::Reveal => color,
            TextMode::Erase => Rgb::BLACK,
        };
        let frames = match effect {
            TextEffect::Typewriter => {
                let mut frames: Vec<Vec<PixelWrite>> = Vec::new();
                let mut current = None;
                for dot in &ink {
                    if current != Some(dot.grapheme) {
                        current = Some(dot.grapheme);
                        frames.push(Vec::new());
                    }
                    if let Some(frame) = frames.last_mut() {
                        frame.push(PixelWrite { point: dot.point, color: pen });
                    }
                }
                frames
            }
            TextEffect::Wipe => {
                let min = ink.iter().map(|d| d.point.x).min();
                let max = ink.iter().map(|d| d.point.x).max();
                match (min, max) {
                    (Some(min), Some(max)) => (min..=max)
                        .map(|col| paint(ink.iter().map(|d| d.point).filter(|p| p.x == col), pen))
                        .collect(),
                    _ => Vec::new(),
                }
            }
            TextEffect::Dissolve { frames, seed } => {
                let mut points: Vec<Point> = ink.iter().map(|d| d.point).collect();
                points.shuffle(&mut StdRng::seed_from_u64(seed));
                let per_frame = points.len().div_ceil(frames.max(1)).max(1);
                points
                    .chunks(per_frame)
                    .map(|chunk| paint(chunk.iter().copied(), pen))
                    .collect()
            }
            TextEffect::Slide { start_x, step } => {
                let points: Vec<Point> = ink.iter().map(|d| d.point).collect();
                slide_frames(&points, start_x.saturating_sub(origin.x), step, mode, color)
            }
        };
        log::debug!("text animation {effect:?}/{mode:?}: {} frame(s)", frames.len());
        Self { frames }
    }

    /// The scripted frames.
    pub fn frames(&self) -> &[Vec<PixelWrite>] {
        &self.frames
    }

    /// Number of frames.
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    /// Check if there is nothing to play.
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Play on `canvas`, one push per frame, sleeping `delay` between frames.
    pub fn play<S: DisplaySink + 'static>(&self, canvas: &Canvas<S>, delay: Duration) -> Result<()> {
        for (i, frame) in self.frames.iter().enumerate() {
            if i > 0 && !delay.is_zero() {
                thread::sleep(delay);
            }
            canvas.begin_frame()?;
            let drawn = frame
                .iter()
                .try_for_each(|w| canvas.plot(w.point.x, w.point.y, w.color, None));
            canvas.end_frame()?;
            drawn?;
        }
        Ok(())
    }
}

/// Frames moving `points` between offset `distance` and offset zero.
///
/// Each frame draws the new placement and blanks whatever the previous one
/// lit that the new one does not.
fn slide_frames(points: &[Point], distance: i32, step: u32, mode: TextMode, color: Rgb) -> Vec<Vec<PixelWrite>> {
    let step = i32::try_from(step.max(1)).unwrap_or(i32::MAX);
    let mut offsets: Vec<i32> = Vec::new();
    let mut d = distance.max(0);
    while d > 0 {
        offsets.push(d);
        d -= step;
    }
    offsets.push(0);
    if mode == TextMode::Erase {
        offsets.reverse();
    }

    let place = |dx: i32| -> HashSet<Point> { points.iter().map(|p| p.offset(dx, 0)).collect() };
    let mut frames = Vec::with_capacity(offsets.len() + 1);
    let mut previous: HashSet<Point> = HashSet::new();
    for dx in offsets {
        let next = place(dx);
        let mut frame: Vec<PixelWrite> = previous
            .difference(&next)
            .map(|&point| PixelWrite { point, color: Rgb::BLACK })
            .collect();
        frame.extend(next.iter().map(|&point| PixelWrite { point, color }));
        frame.sort_by_key(|w| (w.point.y, w.point.x));
        frames.push(frame);
        previous = next;
    }
    if mode == TextMode::Erase {
        let mut last: Vec<PixelWrite> = previous
            .into_iter()
            .map(|point| PixelWrite { point, color: Rgb::BLACK })
            .collect();
        last.sort_by_key(|w| (w.point.y, w.point.x));
        frames.push(last);
    }
    frames
}
