//! Client layer for an external multi-agent graph runtime
//!
//! The agents themselves (scheduling, tool loops, LLM calls) run in an
//! external orchestration framework. This crate provides:
//!
//! - [`RunRequest`]: the input and run configuration for one analysis run
//! - [`NodeUpdate`]: one streamed update from a graph node
//! - [`AgentGraph`]: the provider trait for graph runtimes
//! - [`messages`]: field probing over the framework's polymorphic message shapes
//! - [`providers::LangGraphClient`]: an HTTP + Server-Sent Events client

pub mod error;
pub mod graph;
pub mod messages;
pub mod providers;
pub mod request;
pub mod sse;
pub mod update;

// Re-export main types
pub use error::{GraphError, Result};
pub use graph::{AgentGraph, UpdateStream};
pub use messages::{message_name, message_text};
pub use request::{InputMessage, RunRequest, RunRequestBuilder};
pub use update::NodeUpdate;
