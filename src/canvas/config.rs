//! Canvas configuration.

use crate::buffer::Rgb;
use crate::error::{CanvasError, Result};
use std::time::Duration;

/// Configuration for a [`Canvas`](super::Canvas).
#[derive(Debug, Clone)]
pub struct CanvasConfig {
    /// Surface width in pixels.
    pub width: u16,
    /// Surface height in pixels.
    pub height: u16,
    /// Dirty-grid cell edge in pixels.
    pub cell_size: u16,
    /// Time between burnout expiry scans.
    pub burnout_interval: Duration,
    /// Whether to run the background burnout scheduler. When disabled the
    /// host drives expiry with [`Canvas::process_burnouts`](super::Canvas::process_burnouts).
    pub scheduler: bool,
    /// Sprite transparent sentinel.
    pub transparent: Rgb,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            width: 64,
            height: 32,
            cell_size: 16,
            burnout_interval: Duration::from_millis(10),
            scheduler: true,
            transparent: Rgb::TRANSPARENT,
        }
    }
}

impl CanvasConfig {
    /// Set the surface size.
    #[must_use]
    pub const fn with_size(mut self, width: u16, height: u16) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    /// Set the dirty-grid cell size.
    #[must_use]
    pub const fn with_cell_size(mut self, cell_size: u16) -> Self {
        self.cell_size = cell_size;
        self
    }

    /// Set the burnout scan interval.
    #[must_use]
    pub const fn with_burnout_interval(mut self, interval: Duration) -> Self {
        self.burnout_interval = interval;
        self
    }

    /// Enable or disable the background scheduler.
    #[must_use]
    pub const fn with_scheduler(mut self, enabled: bool) -> Self {
        self.scheduler = enabled;
        self
    }

    /// Set the sprite transparent sentinel.
    #[must_use]
    pub const fn with_transparent(mut self, color: Rgb) -> Self {
        self.transparent = color;
        self
    }

    /// Reject values that cannot describe a display.
    pub fn validate(&self) -> Result<()> {
        if self.width == 0 || self.height == 0 {
            return Err(CanvasError::InvalidConfig(format!(
                "surface size must be non-zero, got {}x{}",
                self.width, self.height
            )));
        }
        if self.cell_size == 0 {
            return Err(CanvasError::InvalidConfig("cell size must be non-zero".into()));
        }
        if self.scheduler && self.burnout_interval.is_zero() {
            return Err(CanvasError::InvalidConfig("burnout interval must be non-zero".into()));
        }
        Ok(())
    }
}
