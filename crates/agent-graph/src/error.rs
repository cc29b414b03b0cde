//! Error types for agent graph operations

use thiserror::Error;

/// Result type for agent graph operations
pub type Result<T> = std::result::Result<T, GraphError>;

/// Errors that can occur while running the agent graph
#[derive(Error, Debug)]
pub enum GraphError {
    /// API request failed
    #[error("Agent graph request failed: {0}")]
    RequestFailed(String),

    /// Invalid API key or authentication failed
    #[error("Agent graph authentication failed")]
    AuthenticationFailed,

    /// Rate limit exceeded
    #[error("Rate limit exceeded: {0}")]
    RateLimitExceeded(String),

    /// Invalid request
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// The configured assistant does not exist on the server
    #[error("Assistant not found: {0}")]
    AssistantNotFound(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    /// HTTP error
    #[error("HTTP error: {0}")]
    HttpError(#[from] reqwest::Error),

    /// The event stream violated the expected protocol
    #[error("Stream protocol error: {0}")]
    StreamProtocol(String),

    /// The run itself reported an error
    #[error("Agent run failed: {0}")]
    RunFailed(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigurationError(String),
}
