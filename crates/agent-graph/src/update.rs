//! Streamed node updates

use serde_json::Value;

/// The state delta one graph node emitted during a run
#[derive(Debug, Clone, PartialEq)]
pub struct NodeUpdate {
    /// Subgraph path of the node; empty for top-level nodes
    pub namespace: Vec<String>,
    /// Node name as registered in the graph
    pub node: String,
    /// Messages carried by the update, in the framework's raw shape
    pub messages: Vec<Value>,
}

impl NodeUpdate {
    pub fn new(node: impl Into<String>, messages: Vec<Value>) -> Self {
        Self {
            namespace: Vec::new(),
            node: node.into(),
            messages,
        }
    }

    pub fn with_namespace(mut self, namespace: Vec<String>) -> Self {
        self.namespace = namespace;
        self
    }

    /// Last message of the update, which is what the node just said
    pub fn last_message(&self) -> Option<&Value> {
        self.messages.last()
    }

    pub fn is_top_level(&self) -> bool {
        self.namespace.is_empty()
    }

    /// Split an `updates` payload into one update per node.
    ///
    /// The payload is an object keyed by node name whose values are state
    /// deltas. A delta without a `messages` list (or a null delta) yields an
    /// update with no messages.
    pub fn from_payload(namespace: &[String], payload: Value) -> Vec<NodeUpdate> {
        let Value::Object(nodes) = payload else {
            return Vec::new();
        };

        nodes
            .into_iter()
            .map(|(node, delta)| {
                let messages = match delta {
                    Value::Object(mut fields) => match fields.remove("messages") {
                        Some(Value::Array(messages)) => messages,
                        _ => Vec::new(),
                    },
                    _ => Vec::new(),
                };
                NodeUpdate::new(node, messages).with_namespace(namespace.to_vec())
            })
            .collect()
    }
}
