//! Error types for agent-core

use thiserror::Error;

/// Result type alias for agent-core
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for core domain operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// The identifier does not name one of the known agents
    #[error("Unknown agent: {0}")]
    UnknownAgent(String),
}
