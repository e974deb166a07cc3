//! Burnout Demo: sprites, burnout trails and text effects in the terminal.
//!
//! Two pixels per terminal cell. Runs for 20 seconds.
//!
//! Press 'q' or Escape to quit.

use burnout::{
    Canvas, CanvasConfig, GlyphMask, MapGlyphSource, Point, Rgb, Shape, TerminalSink, TextAnimation, TextEffect,
    TextMode,
};
use crossterm::event::{self, Event, KeyCode};
use crossterm::terminal;
use rand::Rng;
use std::error::Error;
use std::time::{Duration, Instant};

/// 3x5 glyphs for the banner.
fn banner_font() -> Result<MapGlyphSource, burnout::CanvasError> {
    let rows: [(&str, [&str; 5]); 7] = [
        ("B", ["##.", "#.#", "##.", "#.#", "##."]),
        ("U", ["#.#", "#.#", "#.#", "#.#", "###"]),
        ("R", ["##.", "#.#", "##.", "#.#", "#.#"]),
        ("N", ["#.#", "###", "###", "###", "#.#"]),
        ("O", ["###", "#.#", "#.#", "#.#", "###"]),
        ("T", ["###", ".#.", ".#.", ".#.", ".#."]),
        ("!", [".#.", ".#.", ".#.", "...", ".#."]),
    ];
    let mut font = MapGlyphSource::new(3);
    for (grapheme, glyph) in rows {
        font.insert(grapheme, GlyphMask::from_rows(&glyph)?);
    }
    Ok(font)
}

fn quit_requested() -> std::io::Result<bool> {
    while event::poll(Duration::ZERO)? {
        if let Event::Key(key) = event::read()? {
            if matches!(key.code, KeyCode::Char('q') | KeyCode::Esc) {
                return Ok(true);
            }
        }
    }
    Ok(false)
}

/// Keeps the terminal in raw mode until dropped, on every exit path.
struct RawMode;

impl RawMode {
    fn enable() -> std::io::Result<Self> {
        terminal::enable_raw_mode()?;
        Ok(Self)
    }
}

impl Drop for RawMode {
    fn drop(&mut self) {
        let _ = terminal::disable_raw_mode();
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();

    let sink = TerminalSink::fit_terminal()?;
    let (width, height) = (sink.width(), sink.height());
    let canvas = Canvas::new(sink, CanvasConfig::default().with_size(width, height))?;
    let raw = RawMode::enable()?;

    let font = banner_font()?;
    let origin = Point::new(2, 2);
    TextAnimation::build(TextEffect::Typewriter, TextMode::Reveal, "BURNOUT!", &font, origin, Rgb::WHITE)
        .play(&canvas, Duration::from_millis(120))?;

    canvas.create_sprite("ship", 7, 5)?;
    canvas.draw_to_sprite("ship", Shape::Circle { center: Point::new(3, 2), radius: 2, fill: true }, Rgb::new(80, 200, 255))?;
    canvas.show_sprite("ship", 0.0, f32::from(height) / 2.0)?;

    let mut rng = rand::rng();
    let start = Instant::now();
    let (w, h) = (i32::from(width), i32::from(height));
    let mut x = 0.0_f32;
    while start.elapsed() < Duration::from_secs(20) && !quit_requested()? {
        let hue = Rgb::new(rng.random(), rng.random(), rng.random());
        let from = Point::new(rng.random_range(0..w), rng.random_range(0..h));
        let to = Point::new(rng.random_range(0..w), rng.random_range(0..h));
        canvas.line(from, to, hue, Some(Duration::from_millis(rng.random_range(200..1500))))?;

        x = (x + 0.5) % f32::from(width);
        canvas.move_sprite("ship", x, f32::from(height) / 2.0)?;
        std::thread::sleep(Duration::from_millis(30));
    }

    TextAnimation::build(
        TextEffect::Dissolve { frames: 12, seed: 42 },
        TextMode::Erase,
        "BURNOUT!",
        &font,
        origin,
        Rgb::WHITE,
    )
    .play(&canvas, Duration::from_millis(60))?;

    drop(raw);
    drop(canvas);
    Ok(())
}
