//! # Burnout
//!
//! A pixel compositor for small RGB displays.
//!
//! Direct drawing goes to a background surface; named sprites float above it
//! with a transparent key color; marks drawn with a burnout duration erase
//! themselves once it elapses. Every change ends in a push of the composited
//! frame to a display sink, unless a frame is open to batch them.
//!
//! ## Core Concepts
//!
//! - **Background + composite**: drawing writes the background truth, pushes
//!   send the composite (background plus sprites)
//! - **Dirty grid**: sprite changes restore only the coarse cells they cover
//! - **Burnouts**: a scheduler thread reverts expired marks to black
//! - **Frame Mode**: Immediate pushes per call, Buffered pushes once at `end_frame`
//!
//! ## Example
//!
//! ```rust,ignore
//! use burnout::{Canvas, CanvasConfig, MemorySink, Point, Rgb, Shape};
//! use std::time::Duration;
//!
//! let canvas = Canvas::new(MemorySink::new(64, 32), CanvasConfig::default())?;
//!
//! // A red dot that disappears after 100ms
//! canvas.plot(5, 5, Rgb::RED, Some(Duration::from_millis(100)))?;
//!
//! // A sprite moved atomically
//! canvas.create_sprite("ship", 4, 4)?;
//! canvas.draw_to_sprite("ship", Shape::Point(Point::new(1, 1)), Rgb::WHITE)?;
//! canvas.show_sprite("ship", 10.0, 10.0)?;
//! canvas.move_sprite("ship", 26.0, 10.0)?;
//! ```

#![warn(missing_docs)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

pub mod buffer;
pub mod burnout;
pub mod canvas;
pub mod effects;
pub mod error;
pub mod layout;
pub mod sink;
pub mod sprite;

// Re-exports for convenience
pub use buffer::{RegularPolygon, Rgb, Shape, Surface};
pub use canvas::{Canvas, CanvasConfig, FrameMode};
pub use effects::{GlyphMask, GlyphSource, MapGlyphSource, TextAnimation, TextEffect, TextMode};
pub use error::{CanvasError, Result};
pub use layout::{DirtyGrid, GridCell, Point, Rect};
pub use sink::{DisplaySink, FrameBuffer, MemoryMonitor, MemorySink, TerminalSink};
