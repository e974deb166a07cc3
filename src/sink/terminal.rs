//! Terminal sink: renders pixel frames to a true-color terminal.
//!
//! Each text cell shows two vertically stacked pixels using the upper half
//! block: foreground is the top pixel, background the bottom one. Pushes
//! only emit cells that differ from the visible frame, and all output for a
//! frame goes out in a single write to avoid flicker.

use super::DisplaySink;
use crate::buffer::{Rgb, Surface};
use crossterm::{
    cursor, execute,
    terminal::{self, EnterAlternateScreen, LeaveAlternateScreen},
};
use std::io::{self, Stdout, Write};

const UPPER_HALF: &str = "\u{2580}";

/// Pre-allocated buffer for building ANSI escape sequences.
struct OutputBuffer {
    data: Vec<u8>,
    /// Last emitted colors, to skip redundant SGR sequences.
    fg: Option<Rgb>,
    bg: Option<Rgb>,
    /// Column/row the terminal cursor is known to be at.
    cursor: Option<(u16, u16)>,
}

impl OutputBuffer {
    fn with_capacity(capacity: usize) -> Self {
        Self {
            data: Vec::with_capacity(capacity),
            fg: None,
            bg: None,
            cursor: None,
        }
    }

    fn clear(&mut self) {
        self.data.clear();
    }

    /// Move cursor to (x, y) position (1-indexed for ANSI).
    fn cursor_move(&mut self, x: u16, y: u16) {
        if self.cursor != Some((x, y)) {
            let _ = write!(self.data, "\x1b[{};{}H", y + 1, x + 1);
        }
    }

    fn set_fg(&mut self, color: Rgb) {
        if self.fg != Some(color) {
            let _ = write!(self.data, "\x1b[38;2;{};{};{}m", color.r, color.g, color.b);
            self.fg = Some(color);
        }
    }

    fn set_bg(&mut self, color: Rgb) {
        if self.bg != Some(color) {
            let _ = write!(self.data, "\x1b[48;2;{};{};{}m", color.r, color.g, color.b);
            self.bg = Some(color);
        }
    }

    /// Emit one half-block cell at (x, y) and advance the cursor.
    fn cell(&mut self, x: u16, y: u16, top: Rgb, bottom: Rgb) {
        self.cursor_move(x, y);
        self.set_fg(top);
        self.set_bg(bottom);
        self.data.extend_from_slice(UPPER_HALF.as_bytes());
        self.cursor = Some((x + 1, y));
    }

    fn flush_to<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        writer.write_all(&self.data)?;
        writer.flush()
    }
}

/// Render the cells where `next` differs from `current` (all cells when
/// `full`) into `out`. Returns the number of cells emitted.
fn render_diff(current: &Surface, next: &Surface, full: bool, out: &mut OutputBuffer) -> usize {
    let pixel = |s: &Surface, x: i32, y: i32| s.get(x, y).unwrap_or(Rgb::BLACK);
    let mut emitted = 0;
    for row in 0..next.height().div_ceil(2) {
        let (top_y, bottom_y) = (i32::from(row) * 2, i32::from(row) * 2 + 1);
        for col in 0..next.width() {
            let x = i32::from(col);
            let (top, bottom) = (pixel(next, x, top_y), pixel(next, x, bottom_y));
            if !full && top == pixel(current, x, top_y) && bottom == pixel(current, x, bottom_y) {
                continue;
            }
            out.cell(col, row, top, bottom);
            emitted += 1;
        }
    }
    emitted
}

/// A sink drawing into the terminal's alternate screen.
pub struct TerminalSink {
    width: u16,
    height: u16,
    /// What the terminal currently shows.
    visible: Surface,
    output: OutputBuffer,
    stdout: Stdout,
    needs_full_redraw: bool,
}

impl TerminalSink {
    /// Enter the alternate screen and hide the cursor.
    ///
    /// The display occupies `width` columns and `height / 2` rows.
    pub fn new(width: u16, height: u16) -> io::Result<Self> {
        let mut stdout = io::stdout();
        execute!(
            stdout,
            EnterAlternateScreen,
            cursor::Hide,
            terminal::Clear(terminal::ClearType::All)
        )?;
        Ok(Self {
            width,
            height,
            visible: Surface::new(width, height),
            output: OutputBuffer::with_capacity(65536),
            stdout,
            needs_full_redraw: true,
        })
    }

    /// Create a sink sized to the current terminal.
    pub fn fit_terminal() -> io::Result<Self> {
        let (cols, rows) = terminal::size()?;
        Self::new(cols.max(1), rows.saturating_mul(2).max(2))
    }

    /// Display width in pixels.
    pub const fn width(&self) -> u16 {
        self.width
    }

    /// Display height in pixels.
    pub const fn height(&self) -> u16 {
        self.height
    }
}

impl DisplaySink for TerminalSink {
    type Buffer = Surface;

    fn create_buffer(&mut self) -> Surface {
        Surface::new(self.width, self.height)
    }

    fn push_and_swap(&mut self, buffer: Surface) -> Surface {
        self.output.clear();
        let cells = render_diff(&self.visible, &buffer, self.needs_full_redraw, &mut self.output);
        if let Err(e) = self.output.flush_to(&mut self.stdout) {
            log::error!("terminal write failed: {e}");
            // The screen is in an unknown state; repaint everything next time.
            self.needs_full_redraw = true;
            self.output.fg = None;
            self.output.bg = None;
            self.output.cursor = None;
        } else {
            self.needs_full_redraw = false;
            log::trace!("terminal push: {cells} cell(s)");
        }
        std::mem::replace(&mut self.visible, buffer)
    }
}

impl Drop for TerminalSink {
    fn drop(&mut self) {
        let _ = execute!(self.stdout, cursor::Show, LeaveAlternateScreen);
    }
}

impl std::fmt::Debug for TerminalSink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TerminalSink")
            .field("width", &self.width)
            .field("height", &self.height)
            .finish_non_exhaustive()
    }
}
