//! LangGraph server client
//!
//! Talks to a LangGraph-compatible HTTP server: one `POST /runs/stream` per
//! analysis run, answered with a Server-Sent Events stream in `updates` mode.
//!
//! # Example
//!
//! ```no_run
//! use agent_graph::{AgentGraph, RunRequest};
//! use agent_graph::providers::{LangGraphClient, LangGraphConfig};
//! use futures::StreamExt;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = LangGraphConfig::new("http://localhost:2024")
//!         .with_assistant("supervisor")
//!         .with_timeout(600);
//!     let client = LangGraphClient::with_config(config)?;
//!
//!     let mut updates = client.stream(RunRequest::user("Find 2 NSE stocks")).await?;
//!     while let Some(update) = updates.next().await {
//!         let update = update?;
//!         println!("{} produced {} messages", update.node, update.messages.len());
//!     }
//!     Ok(())
//! }
//! ```

use std::collections::VecDeque;
use std::pin::Pin;
use std::time::Duration;

use agent_utils::{EnvSource, ProcessEnv};
use async_trait::async_trait;
use bytes::Bytes;
use futures::{Stream, StreamExt};
use reqwest::Client;
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::{debug, instrument, warn};
use url::Url;

use crate::sse::{SseEvent, SseParser};
use crate::{AgentGraph, GraphError, InputMessage, NodeUpdate, Result, RunRequest, UpdateStream};

const DEFAULT_GRAPH_URL: &str = "http://localhost:2024";
const DEFAULT_ASSISTANT: &str = "supervisor";
const DEFAULT_TIMEOUT_SECS: u64 = 600;

/// Configuration for the LangGraph client
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LangGraphConfig {
    /// Server base URL (default: "http://localhost:2024")
    pub base_url: String,

    /// Assistant or graph id to run (default: "supervisor")
    pub assistant_id: String,

    /// Optional API key sent as `x-api-key`
    pub api_key: Option<String>,

    /// Request timeout in seconds, covering the whole streamed run (default: 600)
    pub timeout_secs: u64,
}

impl LangGraphConfig {
    /// Create a new config for the given server and default settings
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    /// Create config from the process environment
    ///
    /// Reads `AGENT_GRAPH_URL`, `AGENT_GRAPH_ASSISTANT`, `AGENT_GRAPH_API_KEY`
    /// and `AGENT_GRAPH_TIMEOUT_SECS`, all optional.
    pub fn from_env() -> Result<Self> {
        Self::from_source(&ProcessEnv)
    }

    /// Create config from any environment source
    pub fn from_source(env: &impl EnvSource) -> Result<Self> {
        let config = Self {
            base_url: env.get_or("AGENT_GRAPH_URL", DEFAULT_GRAPH_URL),
            assistant_id: env.get_or("AGENT_GRAPH_ASSISTANT", DEFAULT_ASSISTANT),
            api_key: env.non_empty("AGENT_GRAPH_API_KEY"),
            timeout_secs: env.parse_or("AGENT_GRAPH_TIMEOUT_SECS", DEFAULT_TIMEOUT_SECS),
        };
        config.validate()?;
        Ok(config)
    }

    /// Set the assistant id
    pub fn with_assistant(mut self, assistant_id: impl Into<String>) -> Self {
        self.assistant_id = assistant_id.into();
        self
    }

    /// Set the API key
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Set request timeout in seconds
    pub fn with_timeout(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }

    /// Check that the base URL is an absolute http(s) URL and the assistant
    /// id is set
    pub fn validate(&self) -> Result<()> {
        let url = Url::parse(&self.base_url).map_err(|e| {
            GraphError::ConfigurationError(format!("invalid graph URL '{}': {e}", self.base_url))
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(GraphError::ConfigurationError(format!(
                "graph URL must use http or https, got '{}'",
                url.scheme()
            )));
        }
        if self.assistant_id.trim().is_empty() {
            return Err(GraphError::ConfigurationError(
                "assistant id must not be empty".to_string(),
            ));
        }
        if self.timeout_secs == 0 {
            return Err(GraphError::ConfigurationError(
                "timeout must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }

    fn runs_endpoint(&self) -> String {
        format!("{}/runs/stream", self.base_url.trim_end_matches('/'))
    }
}

impl Default for LangGraphConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_GRAPH_URL.to_string(),
            assistant_id: DEFAULT_ASSISTANT.to_string(),
            api_key: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

/// LangGraph client
pub struct LangGraphClient {
    client: Client,
    config: LangGraphConfig,
}

impl LangGraphClient {
    /// Create a new client with custom configuration
    pub fn with_config(config: LangGraphConfig) -> Result<Self> {
        config.validate()?;
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { client, config })
    }

    /// Create a client from the process environment
    pub fn from_env() -> Result<Self> {
        Self::with_config(LangGraphConfig::from_env()?)
    }

    /// Get the current configuration
    pub fn config(&self) -> &LangGraphConfig {
        &self.config
    }
}

#[async_trait]
impl AgentGraph for LangGraphClient {
    #[instrument(skip(self, request), fields(assistant = %self.config.assistant_id, base_url = %self.config.base_url))]
    async fn stream(&self, request: RunRequest) -> Result<UpdateStream> {
        debug!("Starting graph run at {}", self.config.base_url);

        let body = RunBody {
            assistant_id: &self.config.assistant_id,
            input: RunInput {
                messages: &request.messages,
            },
            stream_mode: ["updates"],
            stream_subgraphs: request.stream_subgraphs,
            config: RunConfig {
                configurable: &request.configurable,
            },
        };

        let mut http = self
            .client
            .post(self.config.runs_endpoint())
            .header("Accept", "text/event-stream")
            .json(&body);
        if let Some(api_key) = &self.config.api_key {
            http = http.header("x-api-key", api_key);
        }

        let response = http.send().await?;

        // Handle errors
        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await?;

            return Err(match status.as_u16() {
                401 | 403 => GraphError::AuthenticationFailed,
                429 => GraphError::RateLimitExceeded(error_text),
                400 | 422 => GraphError::InvalidRequest(error_text),
                404 => GraphError::AssistantNotFound(self.config.assistant_id.clone()),
                _ => GraphError::RequestFailed(format!("HTTP {status}: {error_text}")),
            });
        }

        debug!("Graph run accepted, streaming updates");
        Ok(Box::pin(update_stream(response.bytes_stream())))
    }

    fn name(&self) -> &'static str {
        "langgraph"
    }
}

// ============================================================================
// Wire types
// ============================================================================

#[derive(Debug, Serialize)]
struct RunBody<'a> {
    assistant_id: &'a str,
    input: RunInput<'a>,
    stream_mode: [&'static str; 1],
    stream_subgraphs: bool,
    config: RunConfig<'a>,
}

#[derive(Debug, Serialize)]
struct RunInput<'a> {
    messages: &'a [InputMessage],
}

#[derive(Debug, Serialize)]
struct RunConfig<'a> {
    configurable: &'a Map<String, Value>,
}

// ============================================================================
// Event stream decoding
// ============================================================================

/// What one SSE event means for the run
#[derive(Debug)]
enum Decoded {
    Updates(Vec<NodeUpdate>),
    Failed(GraphError),
    End,
    Skip,
}

fn decode_event(event: &SseEvent) -> Decoded {
    let kind = event.kind();
    let (base, namespace): (&str, Vec<String>) = match kind.split_once('|') {
        Some((base, ns)) => (base, ns.split('|').map(str::to_string).collect()),
        None => (kind, Vec::new()),
    };

    match base {
        "updates" => match serde_json::from_str::<Value>(&event.data) {
            Ok(payload) => Decoded::Updates(NodeUpdate::from_payload(&namespace, payload)),
            Err(e) => Decoded::Failed(GraphError::StreamProtocol(format!(
                "malformed updates payload: {e}"
            ))),
        },
        "error" => Decoded::Failed(GraphError::RunFailed(error_message(&event.data))),
        "end" => Decoded::End,
        "metadata" => {
            if let Ok(meta) = serde_json::from_str::<Value>(&event.data) {
                debug!(run_id = ?meta.get("run_id"), "graph run metadata");
            }
            Decoded::Skip
        }
        other => {
            debug!(event = other, "ignoring graph stream event");
            Decoded::Skip
        }
    }
}

/// Pull a readable message out of an `error` event payload
fn error_message(data: &str) -> String {
    match serde_json::from_str::<Value>(data) {
        Ok(Value::Object(fields)) => ["message", "error", "detail"]
            .iter()
            .find_map(|key| fields.get(*key).and_then(Value::as_str))
            .map_or_else(|| Value::Object(fields.clone()).to_string(), str::to_string),
        Ok(Value::String(message)) => message,
        _ if data.trim().is_empty() => "unknown error".to_string(),
        _ => data.to_string(),
    }
}

struct StreamState<S> {
    bytes: Pin<Box<S>>,
    parser: SseParser,
    pending: VecDeque<Result<NodeUpdate>>,
    finished: bool,
}

impl<S> StreamState<S> {
    /// Queue the outcome of one event; returns true when the run is over
    fn absorb(&mut self, event: &SseEvent) -> bool {
        match decode_event(event) {
            Decoded::Updates(updates) => {
                self.pending.extend(updates.into_iter().map(Ok));
                false
            }
            Decoded::Failed(err) => {
                warn!(error = %err, "graph run reported an error");
                self.pending.push_back(Err(err));
                true
            }
            Decoded::End => true,
            Decoded::Skip => false,
        }
    }
}

fn update_stream<S>(bytes: S) -> impl Stream<Item = Result<NodeUpdate>> + Send
where
    S: Stream<Item = reqwest::Result<Bytes>> + Send + 'static,
{
    let state = StreamState {
        bytes: Box::pin(bytes),
        parser: SseParser::new(),
        pending: VecDeque::new(),
        finished: false,
    };

    futures::stream::unfold(state, |mut state| async move {
        loop {
            // Drain decoded updates first
            if let Some(item) = state.pending.pop_front() {
                return Some((item, state));
            }
            if state.finished {
                return None;
            }

            match state.bytes.next().await {
                Some(Ok(chunk)) => {
                    for event in state.parser.push(&chunk) {
                        if state.absorb(&event) {
                            state.finished = true;
                            break;
                        }
                    }
                }
                Some(Err(e)) => {
                    state.finished = true;
                    state.pending.push_back(Err(GraphError::HttpError(e)));
                }
                None => {
                    state.finished = true;
                    if let Some(event) = state.parser.finish() {
                        state.absorb(&event);
                    }
                }
            }
        }
    })
}
