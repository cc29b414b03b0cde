//! Error types for voice operations

use std::path::PathBuf;

use thiserror::Error;

/// Result type for voice operations
pub type Result<T> = std::result::Result<T, VoiceError>;

/// Errors that can occur while synthesising or recognising speech
#[derive(Error, Debug)]
pub enum VoiceError {
    /// Configuration error (missing credential, bad URL)
    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    /// Invalid API key or authentication failed
    #[error("Voice provider authentication failed")]
    AuthenticationFailed,

    /// Rate limit exceeded
    #[error("Rate limit exceeded: {0}")]
    RateLimitExceeded(String),

    /// Invalid request
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// API request failed
    #[error("Voice request failed: {0}")]
    RequestFailed(String),

    /// HTTP error
    #[error("HTTP error: {0}")]
    HttpError(#[from] reqwest::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    /// Requesting or streaming one agent's clip failed
    #[error("Voice generation failed for {agent}: {source}")]
    ClipRequest {
        agent: String,
        #[source]
        source: Box<VoiceError>,
    },

    /// Writing one agent's clip to disk failed
    #[error("Error writing audio file for {agent} at {}: {source}", path.display())]
    ClipWrite {
        agent: String,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The batch handed to the renderer was empty
    #[error("No agent messages to generate voice for.")]
    NothingToRender,

    /// Single-text rendering got blank text
    #[error("No text provided for voice generation.")]
    EmptyText,

    /// Speech could not be turned into text; the message is user-facing
    #[error("{0}")]
    Recognition(String),

    /// Recorded audio could not be decoded
    #[error("Unsupported audio: {0}")]
    UnsupportedAudio(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl VoiceError {
    /// Missing or invalid configuration, as opposed to a provider failure
    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::ConfigurationError(_))
    }
}
