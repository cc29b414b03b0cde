//! Error types for playback

use thiserror::Error;

/// Result type for playback operations
pub type Result<T> = std::result::Result<T, PlaybackError>;

/// Errors raised by a playback surface
#[derive(Error, Debug)]
pub enum PlaybackError {
    /// The surface could not present a clip
    #[error("Could not present clip {path}: {reason}")]
    Present { path: String, reason: String },

    /// Audio output device error
    #[error("Audio output error: {0}")]
    Output(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
