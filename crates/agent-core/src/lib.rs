//! Core domain types for the narrated stock analysis desk
//!
//! This crate defines the identity of the cooperating agents and the message
//! type that flows from the agent graph through rendering and playback.

pub mod agent;
pub mod error;
pub mod message;

pub use agent::AgentId;
pub use error::{Error, Result};
pub use message::AgentMessage;
