//! Headless in-memory sink.

use super::DisplaySink;
use crate::buffer::{Rgb, Surface};
use std::sync::{Arc, Mutex, PoisonError};

#[derive(Debug)]
struct Shown {
    frame: Surface,
    pushes: u64,
}

/// Read-only view of what a [`MemorySink`] has made visible.
///
/// Cloneable, so it can be kept after the sink moves into a canvas.
#[derive(Debug, Clone)]
pub struct MemoryMonitor {
    shown: Arc<Mutex<Shown>>,
}

impl MemoryMonitor {
    /// Number of pushes so far.
    pub fn pushes(&self) -> u64 {
        self.shown.lock().unwrap_or_else(PoisonError::into_inner).pushes
    }

    /// Visible pixel at (x, y).
    pub fn pixel(&self, x: i32, y: i32) -> Option<Rgb> {
        self.shown.lock().unwrap_or_else(PoisonError::into_inner).frame.get(x, y)
    }

    /// A copy of the visible frame.
    pub fn frame(&self) -> Surface {
        self.shown.lock().unwrap_or_else(PoisonError::into_inner).frame.clone()
    }
}

/// A sink that keeps the visible frame in memory.
#[derive(Debug)]
pub struct MemorySink {
    width: u16,
    height: u16,
    shown: Arc<Mutex<Shown>>,
}

impl MemorySink {
    /// Create a black display of the given size.
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            width,
            height,
            shown: Arc::new(Mutex::new(Shown {
                frame: Surface::new(width, height),
                pushes: 0,
            })),
        }
    }

    /// A monitor observing this sink.
    pub fn monitor(&self) -> MemoryMonitor {
        MemoryMonitor {
            shown: self.shown.clone(),
        }
    }
}

impl DisplaySink for MemorySink {
    type Buffer = Surface;

    fn create_buffer(&mut self) -> Surface {
        Surface::new(self.width, self.height)
    }

    fn push_and_swap(&mut self, buffer: Surface) -> Surface {
        let mut shown = self.shown.lock().unwrap_or_else(PoisonError::into_inner);
        shown.pushes += 1;
        std::mem::replace(&mut shown.frame, buffer)
    }
}
