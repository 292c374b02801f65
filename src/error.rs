//! Error Types
//!
//! The frame pipeline itself has no I/O. Errors come from two places:
//! bad configuration (rejected up front) and entity hooks (isolated per
//! entity, never propagated out of a frame).

use thiserror::Error;

/// Configuration rejected at construction or load time.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Spawner interval must be strictly positive
    #[error("spawner interval must be greater than zero")]
    InvalidInterval,

    /// Play-field extents must be finite and positive
    #[error("invalid play-field {width}x{height}")]
    InvalidPlayField {
        /// Requested width
        width: f64,
        /// Requested height
        height: f64,
    },

    /// Scaled time step needs a positive reference frame
    #[error("reference frame duration must be greater than zero")]
    InvalidTimeStep,

    /// Malformed JSON
    #[error("config parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Config file could not be read
    #[error("config read error: {0}")]
    Io(#[from] std::io::Error),
}

/// Failure reported by an entity hook.
///
/// The registry logs it, counts it in the frame statistics and moves on to
/// the next entity.
#[derive(Debug, Error)]
pub enum HookError {
    /// The entity refused to handle the notification
    #[error("{0}")]
    Rejected(String),

    /// Any other error raised by game code
    #[error("{0}")]
    Other(Box<dyn std::error::Error>),
}

impl From<Box<dyn std::error::Error>> for HookError {
    fn from(err: Box<dyn std::error::Error>) -> Self {
        HookError::Other(err)
    }
}

impl HookError {
    /// Build a `Rejected` error from a message.
    pub fn msg(message: impl Into<String>) -> Self {
        HookError::Rejected(message.into())
    }
}

/// Result type returned by every entity hook.
pub type HookResult = Result<(), HookError>;
