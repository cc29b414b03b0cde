//! Agent messages
//!
//! One [`AgentMessage`] per agent per analysis run. Messages are immutable
//! once built and sort by pipeline position, not arrival order.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::AgentId;

/// The text one agent contributed to an analysis run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentMessage {
    agent: AgentId,
    text: String,
}

impl AgentMessage {
    pub fn new(agent: AgentId, text: impl Into<String>) -> Self {
        Self {
            agent,
            text: text.into(),
        }
    }

    pub fn agent(&self) -> &AgentId {
        &self.agent
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Position of the author in the pipeline
    pub fn sequence_position(&self) -> usize {
        self.agent.sequence_position()
    }

    /// True when the text is empty after trimming
    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }

    pub fn into_parts(self) -> (AgentId, String) {
        (self.agent, self.text)
    }
}

impl PartialOrd for AgentMessage {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for AgentMessage {
    fn cmp(&self, other: &Self) -> Ordering {
        self.agent
            .cmp(&other.agent)
            .then_with(|| self.text.cmp(&other.text))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sorts_by_pipeline_position() {
        let mut messages = vec![
            AgentMessage::new(AgentId::Supervisor, "verdict"),
            AgentMessage::new(AgentId::MarketData, "prices"),
            AgentMessage::new(AgentId::StockFinder, "picks"),
        ];
        messages.sort();
        let order: Vec<_> = messages.iter().map(AgentMessage::sequence_position).collect();
        assert_eq!(order, vec![0, 1, 4]);
    }

    #[test]
    fn test_blank_detection() {
        assert!(AgentMessage::new(AgentId::NewsAnalyst, "  \n\t").is_blank());
        assert!(!AgentMessage::new(AgentId::NewsAnalyst, " news ").is_blank());
    }

    #[test]
    fn test_into_parts() {
        let (agent, text) = AgentMessage::new(AgentId::Supervisor, "done").into_parts();
        assert_eq!(agent, AgentId::Supervisor);
        assert_eq!(text, "done");
    }
}
