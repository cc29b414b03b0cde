//! Error types for the analysis desk

use agent_graph::GraphError;
use agent_playback::PlaybackError;
use agent_voice::VoiceError;
use thiserror::Error;

/// Analysis desk errors
#[derive(Debug, Error)]
pub enum StockError {
    /// Missing or invalid configuration; the message is user-facing
    #[error("{0}")]
    ConfigError(String),

    /// The agent graph could not be reached or the run failed
    #[error("Agent graph error: {0}")]
    Graph(#[from] GraphError),

    /// Speech synthesis or recognition failed
    #[error(transparent)]
    Voice(#[from] VoiceError),

    /// Playback could not present a clip
    #[error("Playback error: {0}")]
    Playback(#[from] PlaybackError),

    /// Command parsing error
    #[error("Command error: {0}")]
    CommandError(String),

    /// File I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for desk operations
pub type Result<T> = std::result::Result<T, StockError>;

/// How a failure should be surfaced
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Blocking message; nothing was attempted
    Configuration,
    /// Network or service failure; the run was aborted
    Provider,
    /// Speech could not be understood; soft warning
    Recognition,
    /// Reading or writing a file failed
    Io,
    /// The user typed something the desk does not understand
    Usage,
}

impl StockError {
    /// Classify the error for presentation
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::ConfigError(_) => ErrorCategory::Configuration,
            Self::Graph(GraphError::ConfigurationError(_)) => ErrorCategory::Configuration,
            Self::Graph(_) => ErrorCategory::Provider,
            Self::Voice(e) => voice_category(e),
            Self::Playback(_) | Self::Io(_) => ErrorCategory::Io,
            Self::CommandError(_) => ErrorCategory::Usage,
        }
    }

    /// Soft failures are warnings; the session keeps its previous state
    pub fn is_soft(&self) -> bool {
        matches!(
            self.category(),
            ErrorCategory::Recognition | ErrorCategory::Usage
        )
    }
}

fn voice_category(error: &VoiceError) -> ErrorCategory {
    match error {
        VoiceError::ConfigurationError(_) => ErrorCategory::Configuration,
        VoiceError::Recognition(_) | VoiceError::UnsupportedAudio(_) => ErrorCategory::Recognition,
        VoiceError::ClipWrite { .. } | VoiceError::Io(_) => ErrorCategory::Io,
        VoiceError::ClipRequest { source, .. } => voice_category(source),
        _ => ErrorCategory::Provider,
    }
}
