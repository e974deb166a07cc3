//! Rasterization: turn shapes into pixel coordinates.
//!
//! Every primitive produces the exact set of pixels it covers (clipped to a
//! caller-supplied rectangle, deduplicated). Surfaces write those pixels,
//! and burnout registration keeps them so they can be reverted later.

use crate::error::{CanvasError, Result};
use crate::layout::{Point, Rect};
use std::f64::consts::TAU;

/// A regular polygon described by its circumscribed circle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RegularPolygon {
    /// Center of the circumscribed circle.
    pub center: Point,
    /// Distance from the center to each vertex.
    pub radius: i32,
    /// Number of sides (at least 3).
    pub sides: u32,
    /// Rotation in degrees, clockwise-positive. At 0 the first vertex
    /// points straight up.
    pub rotation: f32,
    /// Fill the interior instead of drawing the outline.
    pub fill: bool,
}

impl RegularPolygon {
    /// Create an unrotated outline polygon.
    pub const fn new(center: Point, radius: i32, sides: u32) -> Self {
        Self {
            center,
            radius,
            sides,
            rotation: 0.0,
            fill: false,
        }
    }

    /// Set the rotation in degrees.
    #[must_use]
    pub const fn rotated(mut self, degrees: f32) -> Self {
        self.rotation = degrees;
        self
    }

    /// Fill the interior.
    #[must_use]
    pub const fn filled(mut self) -> Self {
        self.fill = true;
        self
    }

    /// Compute the integer vertex positions.
    pub fn vertices(&self) -> Result<Vec<Point>> {
        if self.sides < 3 {
            return Err(CanvasError::MalformedShape(format!(
                "polygon needs at least 3 sides, got {}",
                self.sides
            )));
        }
        if self.radius < 0 {
            return Err(CanvasError::MalformedShape(format!(
                "negative polygon radius {}",
                self.radius
            )));
        }
        if !self.rotation.is_finite() {
            return Err(CanvasError::MalformedShape("non-finite polygon rotation".into()));
        }

        let rotation = f64::from(self.rotation).to_radians();
        let radius = f64::from(self.radius);
        let (cx, cy) = (f64::from(self.center.x), f64::from(self.center.y));
        Ok((0..self.sides)
            .map(|i| {
                let angle = rotation + TAU * f64::from(i) / f64::from(self.sides);
                Point::new(
                    (cx + radius * angle.sin()).round() as i32,
                    (cy - radius * angle.cos()).round() as i32,
                )
            })
            .collect())
    }
}

/// A drawable primitive carrying its own geometry.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Shape {
    /// A single pixel.
    Point(Point),
    /// A straight line, both endpoints inclusive.
    Line {
        /// Start point.
        from: Point,
        /// End point.
        to: Point,
    },
    /// An axis-aligned rectangle.
    Rect {
        /// Position and size.
        rect: Rect,
        /// Fill the interior instead of drawing the border.
        fill: bool,
    },
    /// A circle.
    Circle {
        /// Center pixel.
        center: Point,
        /// Radius in pixels (0 draws just the center).
        radius: i32,
        /// Fill the interior instead of drawing the outline.
        fill: bool,
    },
    /// A regular polygon.
    Polygon(RegularPolygon),
}

impl Shape {
    /// Collect the pixels this shape covers inside `clip`.
    ///
    /// The result is sorted and free of duplicates.
    pub fn rasterize(&self, clip: &Rect) -> Result<Vec<Point>> {
        let mut points = match *self {
            Self::Point(p) => vec![p],
            Self::Line { from, to } => line_points(from, to, clip),
            Self::Rect { rect, fill: true } => rect.intersection(clip).points().collect(),
            Self::Rect { rect, fill: false } => rect_outline_points(&rect, clip),
            Self::Circle { center, radius, fill } => {
                if radius < 0 {
                    return Err(CanvasError::MalformedShape(format!(
                        "negative circle radius {radius}"
                    )));
                }
                if fill {
                    circle_fill_points(center, radius, clip)
                } else {
                    circle_outline_points(center, radius, clip)
                }
            }
            Self::Polygon(polygon) => {
                let vertices = polygon.vertices()?;
                let mut points = polygon_outline_points(&vertices, clip);
                if polygon.fill {
                    points.extend(polygon_fill_points(&vertices, clip));
                }
                points
            }
        };
        points.retain(|p| clip.contains(*p));
        points.sort_unstable();
        points.dedup();
        Ok(points)
    }
}

/// Clip edges in `i64`: left, top, right (exclusive), bottom (exclusive).
fn edges(clip: &Rect) -> (i64, i64, i64, i64) {
    let (x, y) = (i64::from(clip.x), i64::from(clip.y));
    (x, y, x + i64::from(clip.width), y + i64::from(clip.height))
}

fn push_clipped(points: &mut Vec<Point>, x: i64, y: i64, clip: &Rect) {
    let (left, top, right, bottom) = edges(clip);
    if (left..right).contains(&x) && (top..bottom).contains(&y) {
        points.push(Point::new(x as i32, y as i32));
    }
}

fn push_span(points: &mut Vec<Point>, x0: i64, x1: i64, y: i64, clip: &Rect) {
    let (left, top, right, bottom) = edges(clip);
    if !(top..bottom).contains(&y) {
        return;
    }
    let (x0, x1) = (x0.max(left), x1.min(right - 1));
    points.extend((x0..=x1).map(|x| Point::new(x as i32, y as i32)));
}

/// Integer square root of a non-negative value, rounded to nearest.
fn round_sqrt(v: i64) -> i64 {
    if v <= 0 {
        return 0;
    }
    let mut s = (v as f64).sqrt() as i64;
    while s * s > v {
        s -= 1;
    }
    while (s + 1) * (s + 1) <= v {
        s += 1;
    }
    if s * s + s < v {
        s + 1
    } else {
        s
    }
}

/// Bresenham-style line from `from` to `to`, endpoints inclusive, clipped
/// to `clip`.
///
/// Only the steps whose major-axis coordinate falls inside `clip` are
/// visited, so the cost is bounded by the clip size, not the line length.
pub fn line_points(from: Point, to: Point, clip: &Rect) -> Vec<Point> {
    let (x0, y0) = (i64::from(from.x), i64::from(from.y));
    let (x1, y1) = (i64::from(to.x), i64::from(to.y));
    let (dx, dy) = ((x1 - x0).abs(), (y1 - y0).abs());
    let sx = if x1 >= x0 { 1 } else { -1 };
    let sy = if y1 >= y0 { 1 } else { -1 };
    let (left, top, right, bottom) = edges(clip);

    let x_major = dx >= dy;
    let (major, minor, start, step, lo, hi) = if x_major {
        (dx, dy, x0, sx, left, right - 1)
    } else {
        (dy, dx, y0, sy, top, bottom - 1)
    };
    let (first, last) = if step > 0 { (lo - start, hi - start) } else { (start - hi, start - lo) };
    let (first, last) = (first.max(0), last.min(major));

    let mut points = Vec::new();
    for i in first..=last {
        // Minor offset is round(i * minor / major), ties away from the start.
        let offset = if major == 0 {
            0
        } else {
            let num = 2 * i128::from(i) * i128::from(minor) + i128::from(major);
            (num / (2 * i128::from(major))) as i64
        };
        let (x, y) = if x_major {
            (x0 + sx * i, y0 + sy * offset)
        } else {
            (x0 + sx * offset, y0 + sy * i)
        };
        push_clipped(&mut points, x, y, clip);
    }
    points
}

/// Border pixels of `rect` inside `clip`: two horizontal runs and two
/// vertical runs, with no corner visited twice.
pub fn rect_outline_points(rect: &Rect, clip: &Rect) -> Vec<Point> {
    if rect.is_empty() {
        return Vec::new();
    }
    let (left, top) = (i64::from(rect.x), i64::from(rect.y));
    let right = left + i64::from(rect.width) - 1;
    let bottom = top + i64::from(rect.height) - 1;

    let mut points = Vec::new();
    push_span(&mut points, left, right, top, clip);
    if bottom > top {
        push_span(&mut points, left, right, bottom, clip);
    }
    let (_, clip_top, _, clip_bottom) = edges(clip);
    for y in (top + 1).max(clip_top)..bottom.min(clip_bottom) {
        push_clipped(&mut points, left, y, clip);
        if right > left {
            push_clipped(&mut points, right, y, clip);
        }
    }
    points
}

/// Circle outline with 8-way symmetry, clipped to `clip`.
///
/// In the first octant the x offset for row offset `y` is
/// `round(sqrt(r² - y²))`. Only offsets that can land a point on a clip
/// row or column are evaluated, so huge radii cost no more than small ones.
pub fn circle_outline_points(center: Point, radius: i32, clip: &Rect) -> Vec<Point> {
    let (cx, cy, r) = (i64::from(center.x), i64::from(center.y), i64::from(radius));
    let (left, top, right, bottom) = edges(clip);
    let mut offsets: Vec<i64> = (top..bottom)
        .map(|row| (row - cy).abs())
        .chain((left..right).map(|col| (col - cx).abs()))
        .filter(|&y| y <= r)
        .collect();
    offsets.sort_unstable();
    offsets.dedup();

    let mut points = Vec::new();
    for y in offsets {
        let x = round_sqrt(r * r - y * y);
        if y > x {
            break;
        }
        for (px, py) in [(x, y), (y, x), (-y, x), (-x, y), (-x, -y), (-y, -x), (y, -x), (x, -y)] {
            push_clipped(&mut points, cx + px, cy + py, clip);
        }
    }
    points
}

/// Filled circle as one horizontal span per clip row, plus the outline so
/// the fill always covers it.
pub fn circle_fill_points(center: Point, radius: i32, clip: &Rect) -> Vec<Point> {
    let (cx, cy, r) = (i64::from(center.x), i64::from(center.y), i64::from(radius));
    let (_, top, _, bottom) = edges(clip);
    let mut points = Vec::new();
    for row in top..bottom {
        let d = (row - cy).abs();
        if d > r {
            continue;
        }
        let half = round_sqrt(r * r - d * d);
        push_span(&mut points, cx - half, cx + half, row, clip);
    }
    points.extend(circle_outline_points(center, radius, clip));
    points
}

/// Outline connecting consecutive vertices, wrapping last to first.
pub fn polygon_outline_points(vertices: &[Point], clip: &Rect) -> Vec<Point> {
    let mut points = Vec::new();
    for (i, &from) in vertices.iter().enumerate() {
        let to = vertices[(i + 1) % vertices.len()];
        points.extend(line_points(from, to, clip));
    }
    points
}

/// Scanline fill: per row, collect edge crossings, sort them, and fill
/// between successive pairs.
pub fn polygon_fill_points(vertices: &[Point], clip: &Rect) -> Vec<Point> {
    let Some(min_y) = vertices.iter().map(|p| i64::from(p.y)).min() else {
        return Vec::new();
    };
    let max_y = vertices.iter().map(|p| i64::from(p.y)).max().unwrap_or(min_y);
    let (_, top, _, bottom) = edges(clip);
    let (min_y, max_y) = (min_y.max(top), max_y.min(bottom - 1));

    let mut points = Vec::new();
    let mut crossings: Vec<f64> = Vec::with_capacity(vertices.len());
    for y in min_y..=max_y {
        crossings.clear();
        for (i, a) in vertices.iter().enumerate() {
            let b = vertices[(i + 1) % vertices.len()];
            if a.y == b.y {
                continue;
            }
            let (lo, hi) = if a.y < b.y { (a, &b) } else { (&b, a) };
            // Half-open in y so shared vertices count once.
            if y >= i64::from(lo.y) && y < i64::from(hi.y) {
                let (lo_x, lo_y) = (f64::from(lo.x), f64::from(lo.y));
                let t = (y as f64 - lo_y) / (f64::from(hi.y) - lo_y);
                crossings.push(t.mul_add(f64::from(hi.x) - lo_x, lo_x));
            }
        }
        crossings.sort_by(f64::total_cmp);
        for pair in crossings.chunks_exact(2) {
            push_span(&mut points, pair[0].ceil() as i64, pair[1].floor() as i64, y, clip);
        }
    }
    points
}
