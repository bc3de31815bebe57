//! Error types for the game core.

use thiserror::Error;

use crate::stage::SpriteHandle;

/// Failures reported by a [`crate::stage::Stage`] implementation.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum StageError {
    /// The handle was deleted or invalidated by a `clear`.
    #[error("sprite handle {0:?} no longer resolves")]
    StaleHandle(SpriteHandle),
}

/// Result type for stage operations.
pub type StageResult<T> = Result<T, StageError>;

/// Rejected rule values.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("tick rate must be between 1 and {max} Hz, got {got}")]
    TickRate { got: u32, max: u32 },

    #[error("{field} must be positive")]
    NotPositive { field: &'static str },

    #[error("boss interval must be at least 2 waves, got {0}")]
    BossInterval(u32),

    #[error("spawn margin {margin} leaves no room in a playfield {width} wide")]
    SpawnMargin { margin: u32, width: f32 },
}
