//! Agent output filtering
//!
//! Two passes decide what each agent said. While the run streams, every
//! substantial message from a known agent node replaces that agent's display
//! output. When the run ends, the supervisor's message history is the final
//! transcript: its long messages from known agents override the streamed
//! outputs and become what is spoken.

use std::collections::BTreeMap;

use agent_core::{AgentId, AgentMessage};
use agent_graph::{NodeUpdate, message_name, message_text};
use serde_json::Value;
use tracing::debug;

/// Streamed messages at or below this many characters are tool chatter
pub const MIN_STREAMING_CONTENT_LENGTH: usize = 50;

/// Final-transcript messages at or below this many characters are handoffs
pub const MIN_FINAL_CONTENT_LENGTH: usize = 100;

fn longer_than(text: &str, min: usize) -> bool {
    text.trim().chars().count() > min
}

/// Text of a streamed message when it is long enough to display
pub fn streaming_text(message: &Value) -> Option<String> {
    message_text(message).filter(|text| longer_than(text, MIN_STREAMING_CONTENT_LENGTH))
}

/// A final-transcript message from a known agent with enough text to speak
pub fn final_message(message: &Value) -> Option<AgentMessage> {
    let agent = AgentId::from_wire(&message_name(message)?);
    if !agent.is_known() {
        return None;
    }
    let text = message_text(message)?;
    longer_than(&text, MIN_FINAL_CONTENT_LENGTH).then(|| AgentMessage::new(agent, text))
}

/// Collects agent outputs across one analysis run
#[derive(Debug, Clone, Default)]
pub struct OutputCollector {
    outputs: BTreeMap<AgentId, String>,
    transcript: BTreeMap<AgentId, String>,
}

impl OutputCollector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a streamed node update.
    ///
    /// Returns the agent when the node is one of the known agents, whether
    /// or not any of its messages were long enough to keep.
    pub fn observe(&mut self, update: &NodeUpdate) -> Option<AgentId> {
        let agent = AgentId::from_wire(&update.node);
        if !agent.is_known() {
            debug!(node = %update.node, "ignoring update from unknown node");
            return None;
        }

        if let Some(text) = update.messages.iter().filter_map(streaming_text).last() {
            self.outputs.insert(agent.clone(), text);
        }
        Some(agent)
    }

    /// Apply the final message history. Later messages from the same agent
    /// replace earlier ones.
    pub fn apply_final(&mut self, history: &[Value]) {
        for message in history.iter().filter_map(final_message) {
            let (agent, text) = message.into_parts();
            self.outputs.insert(agent.clone(), text.clone());
            self.transcript.insert(agent, text);
        }
    }

    /// Display outputs in pipeline order
    pub fn outputs(&self) -> &BTreeMap<AgentId, String> {
        &self.outputs
    }

    /// Messages to speak, in pipeline order
    pub fn transcript(&self) -> Vec<AgentMessage> {
        self.transcript
            .iter()
            .map(|(agent, text)| AgentMessage::new(agent.clone(), text.clone()))
            .collect()
    }

    pub fn into_parts(self) -> (BTreeMap<AgentId, String>, Vec<AgentMessage>) {
        let transcript = self.transcript();
        (self.outputs, transcript)
    }
}
