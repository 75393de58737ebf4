//! Error types for ClipMark.

use crate::time::{RationalTime, TimeBound};
use thiserror::Error;

/// Main error type for ClipMark operations.
#[derive(Error, Debug)]
pub enum ClipMarkError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Media error: {0}")]
    Media(String),

    #[error("Decoder error: {0}")]
    Decoder(String),

    #[error("Encoder error: {0}")]
    Encoder(String),

    #[error("Audio error: {0}")]
    Audio(String),

    /// An action needed media that has not been loaded or buffered yet.
    #[error("{0}")]
    NotReady(String),

    #[error("Start must be less than End (start {start}, end {end})")]
    InvalidTrim { start: RationalTime, end: TimeBound },

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Font error: {0}")]
    Font(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ClipMarkError {
    /// Whether this error is a user-facing precondition or validation failure
    /// rather than a backend fault.
    pub fn is_user_facing(&self) -> bool {
        matches!(self, Self::NotReady(_) | Self::InvalidTrim { .. })
    }
}

/// Result type alias for ClipMark operations.
pub type Result<T> = std::result::Result<T, ClipMarkError>;
