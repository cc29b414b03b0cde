//! Graph runtime implementations

pub mod langgraph;

pub use langgraph::{LangGraphClient, LangGraphConfig};
