//! Canvas module: the compositor and its push policy.
//!
//! - [`Canvas`]: shared drawing context owning surfaces, sprites and sink
//! - [`FrameMode`]: Immediate/Buffered push state machine
//! - [`CanvasConfig`]: construction parameters

#[allow(clippy::module_inception)]
mod canvas;
mod config;
mod frame;

pub use canvas::Canvas;
pub use config::CanvasConfig;
pub use frame::FrameMode;
