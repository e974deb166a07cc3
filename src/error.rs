//! Error types shared by every canvas operation.
//!
//! Out-of-bounds drawing and unknown sprite names are not errors: the first
//! clips silently, the second is logged and dropped.

/// Errors surfaced to callers of the canvas API.
#[derive(Debug, thiserror::Error)]
pub enum CanvasError {
    /// A sprite with this name is already registered.
    #[error("Sprite already exists: {0}")]
    DuplicateSprite(String),

    /// Shape parameters the rasterizer cannot honour.
    #[error("Malformed shape: {0}")]
    MalformedShape(String),

    /// A writer panicked while holding the shared surface lock.
    #[error("Canvas state lock poisoned")]
    LockPoisoned,

    /// The burnout scheduler thread could not be started.
    #[error("Failed to spawn burnout scheduler: {0}")]
    SchedulerSpawn(#[source] std::io::Error),

    /// Configuration values that cannot describe a display.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, CanvasError>;
