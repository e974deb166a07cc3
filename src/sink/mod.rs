//! Display sinks: where composited frames go.
//!
//! The compositor only relies on four operations: create a buffer, set a
//! pixel in it, fill it, and push it (atomically swapping it visible and
//! getting the previously visible buffer back for reuse).
//!
//! - [`MemorySink`]: headless sink for tests and offscreen rendering
//! - [`TerminalSink`]: true-color terminal output, two pixels per cell

mod memory;
mod terminal;

pub use memory::{MemoryMonitor, MemorySink};
pub use terminal::TerminalSink;

use crate::buffer::{Rgb, Surface};

/// An offscreen pixel buffer owned by a sink.
pub trait FrameBuffer {
    /// Write one pixel. Out-of-range coordinates are ignored.
    fn set_pixel(&mut self, x: u16, y: u16, color: Rgb);

    /// Set every pixel to `color`.
    fn fill(&mut self, color: Rgb);
}

/// A double-buffered display.
pub trait DisplaySink: Send {
    /// The sink's offscreen buffer type.
    type Buffer: FrameBuffer + Send;

    /// Allocate an offscreen buffer matching the display size.
    fn create_buffer(&mut self) -> Self::Buffer;

    /// Make `buffer` visible and return the now-offscreen buffer.
    fn push_and_swap(&mut self, buffer: Self::Buffer) -> Self::Buffer;
}

impl FrameBuffer for Surface {
    #[inline]
    fn set_pixel(&mut self, x: u16, y: u16, color: Rgb) {
        self.set(i32::from(x), i32::from(y), color);
    }

    #[inline]
    fn fill(&mut self, color: Rgb) {
        Self::fill(self, color);
    }
}

/// Copy every pixel of `surface` into a sink buffer.
pub fn upload<B: FrameBuffer + ?Sized>(surface: &Surface, buffer: &mut B) {
    for (y, row) in surface.rows().enumerate() {
        for (x, &color) in row.iter().enumerate() {
            buffer.set_pixel(x as u16, y as u16, color);
        }
    }
}
