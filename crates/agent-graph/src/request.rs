//! Run request types

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One input message handed to the graph
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputMessage {
    /// Message role ("user", "system", ...)
    pub role: String,
    /// Message text
    pub content: String,
}

impl InputMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

/// Request for one graph run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunRequest {
    /// Input conversation
    pub messages: Vec<InputMessage>,

    /// Run configuration forwarded to every node (model settings, tool
    /// credentials, prompts)
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub configurable: Map<String, Value>,

    /// Also stream updates from nodes nested inside subgraphs
    #[serde(default)]
    pub stream_subgraphs: bool,
}

impl RunRequest {
    /// Create a builder for run requests
    pub fn builder() -> RunRequestBuilder {
        RunRequestBuilder::new()
    }

    /// Single user message with no extra configuration
    pub fn user(query: impl Into<String>) -> Self {
        Self::builder().user_message(query).build()
    }
}

/// Builder for RunRequest
#[derive(Debug, Default)]
pub struct RunRequestBuilder {
    messages: Vec<InputMessage>,
    configurable: Map<String, Value>,
    stream_subgraphs: bool,
}

impl RunRequestBuilder {
    /// Create a new builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a user message
    pub fn user_message(mut self, content: impl Into<String>) -> Self {
        self.messages.push(InputMessage::user(content));
        self
    }

    /// Add a single message
    pub fn add_message(mut self, message: InputMessage) -> Self {
        self.messages.push(message);
        self
    }

    /// Set one run configuration entry
    pub fn configurable(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.configurable.insert(key.into(), value.into());
        self
    }

    /// Set a configuration entry only when a value is present
    pub fn configurable_opt(self, key: impl Into<String>, value: Option<impl Into<Value>>) -> Self {
        match value {
            Some(value) => self.configurable(key, value),
            None => self,
        }
    }

    /// Stream nested subgraph nodes as well
    pub fn stream_subgraphs(mut self, enabled: bool) -> Self {
        self.stream_subgraphs = enabled;
        self
    }

    /// Build the request
    pub fn build(self) -> RunRequest {
        RunRequest {
            messages: self.messages,
            configurable: self.configurable,
            stream_subgraphs: self.stream_subgraphs,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_builder_collects_messages_and_config() {
        let request = RunRequest::builder()
            .user_message("Find 2 NSE stocks")
            .configurable("model", "qwen/qwen3-32b")
            .configurable("max_tokens", 1000)
            .configurable_opt("api_key", None::<String>)
            .configurable_opt("zone", Some("unblocker"))
            .build();

        assert_eq!(request.messages, vec![InputMessage::user("Find 2 NSE stocks")]);
        assert_eq!(request.configurable["model"], json!("qwen/qwen3-32b"));
        assert_eq!(request.configurable["max_tokens"], json!(1000));
        assert_eq!(request.configurable["zone"], json!("unblocker"));
        assert!(!request.configurable.contains_key("api_key"));
        assert!(!request.stream_subgraphs);
    }

    #[test]
    fn test_user_shorthand() {
        let request = RunRequest::user("hello");
        assert_eq!(request.messages.len(), 1);
        assert_eq!(request.messages[0].role, "user");
        assert!(request.configurable.is_empty());
    }
}
