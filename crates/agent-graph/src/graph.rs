//! Agent graph trait definition

use std::pin::Pin;

use async_trait::async_trait;
use futures::Stream;

use crate::{NodeUpdate, Result, RunRequest};

/// Stream of node updates for one run
pub type UpdateStream = Pin<Box<dyn Stream<Item = Result<NodeUpdate>> + Send>>;

/// Trait for multi-agent graph runtimes
///
/// Implementations start one run per call and stream the updates each graph
/// node produces. The stream ends when the run completes; an `Err` item
/// means the run failed and no further items follow.
#[async_trait]
pub trait AgentGraph: Send + Sync {
    /// Start a run and stream its node updates
    async fn stream(&self, request: RunRequest) -> Result<UpdateStream>;

    /// Get the runtime name (e.g., "langgraph")
    fn name(&self) -> &str;
}
