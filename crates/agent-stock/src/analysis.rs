//! One analysis run against the agent graph
//!
//! The runner builds the run request (query, model settings, tool sidecar
//! zones and agent prompts), drives the update stream to completion, reports
//! progress to an [`AnalysisEventHandler`] and returns the filtered outputs.

use std::collections::BTreeMap;
use std::sync::Arc;

use agent_core::{AgentId, AgentMessage};
use agent_graph::{AgentGraph, RunRequest};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use futures::StreamExt;
use serde_json::Value;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use crate::config::StockConfig;
use crate::error::Result;
use crate::filter::OutputCollector;
use crate::prompts;

pub const STATUS_INITIALIZING: &str = "🔄 Initializing AI agents...";
pub const STATUS_COMPLETE: &str = "✅ Analysis complete!";

/// Progress line shown while an agent is producing output
pub fn working_status(agent: &AgentId) -> String {
    format!("{} {} is working...", agent.icon(), agent.display_name())
}

/// Event handler for analysis progress
///
/// Implement this trait to show progress while the graph runs.
#[async_trait]
pub trait AnalysisEventHandler: Send + Sync {
    /// Called with a status line
    async fn on_status(&self, _status: &str) {}

    /// Called for every update from a known agent node
    async fn on_agent_working(&self, _agent: &AgentId) {}

    /// Called when the run has finished
    async fn on_complete(&self, _outcome: &AnalysisOutcome) {}

    /// Called when the run failed
    async fn on_error(&self, _error: &str) {}
}

/// No-op event handler for when progress is not shown
pub struct NoOpEventHandler;

#[async_trait]
impl AnalysisEventHandler for NoOpEventHandler {}

/// Result of a completed analysis run
#[derive(Debug, Clone)]
pub struct AnalysisOutcome {
    pub run_id: Uuid,
    pub query: String,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    /// Number of node updates received
    pub updates: usize,
    /// Display output per agent, in pipeline order
    pub outputs: BTreeMap<AgentId, String>,
    /// Messages to speak, in pipeline order
    pub transcript: Vec<AgentMessage>,
}

impl AnalysisOutcome {
    /// The supervisor's consolidated verdict, when it made the transcript
    pub fn verdict(&self) -> Option<&str> {
        self.transcript
            .iter()
            .find(|message| message.agent() == &AgentId::Supervisor)
            .map(AgentMessage::text)
    }
}

/// Build the run request for a query
pub fn build_request(config: &StockConfig, query: &str) -> RunRequest {
    let mut builder = RunRequest::builder()
        .user_message(query)
        .configurable("model", config.model.as_str())
        .configurable("model_provider", config.model_provider.as_str())
        .configurable("max_tokens", config.max_tokens)
        .configurable("web_unlocker_zone", config.web_unlocker_zone.as_str())
        .configurable("browser_zone", config.browser_zone.as_str());

    for (key, prompt) in prompts::all_prompts() {
        builder = builder.configurable(key, prompt);
    }
    builder.build()
}

/// Runs analyses against an agent graph
pub struct AnalysisRunner<G> {
    graph: G,
    event_handler: Option<Arc<dyn AnalysisEventHandler>>,
}

impl<G: AgentGraph> AnalysisRunner<G> {
    pub fn new(graph: G) -> Self {
        Self {
            graph,
            event_handler: None,
        }
    }

    /// Set the event handler for receiving progress events
    pub fn with_event_handler(mut self, handler: Arc<dyn AnalysisEventHandler>) -> Self {
        self.event_handler = Some(handler);
        self
    }

    pub fn graph(&self) -> &G {
        &self.graph
    }

    /// Run one analysis to completion.
    ///
    /// The update stream is consumed fully and dropped before returning. The
    /// final transcript comes from the last top-level supervisor update.
    #[instrument(skip(self, request), fields(graph = self.graph.name()))]
    pub async fn run(&self, query: &str, request: RunRequest) -> Result<AnalysisOutcome> {
        let handler: Arc<dyn AnalysisEventHandler> = match &self.event_handler {
            Some(handler) => Arc::clone(handler),
            None => Arc::new(NoOpEventHandler),
        };

        match self.drive(query, request, handler.as_ref()).await {
            Ok(outcome) => {
                handler.on_complete(&outcome).await;
                Ok(outcome)
            }
            Err(e) => {
                warn!(error = %e, "analysis run failed");
                handler.on_error(&e.to_string()).await;
                Err(e)
            }
        }
    }

    async fn drive(
        &self,
        query: &str,
        request: RunRequest,
        handler: &dyn AnalysisEventHandler,
    ) -> Result<AnalysisOutcome> {
        let run_id = Uuid::new_v4();
        let started_at = Utc::now();
        handler.on_status(STATUS_INITIALIZING).await;
        info!(%run_id, "Starting analysis run");

        let mut stream = self.graph.stream(request).await?;
        let mut collector = OutputCollector::new();
        let mut final_history: Vec<Value> = Vec::new();
        let mut updates = 0;

        while let Some(update) = stream.next().await {
            let update = update?;
            updates += 1;
            debug!(node = %update.node, messages = update.messages.len(), "node update");

            if let Some(agent) = collector.observe(&update) {
                handler.on_status(&working_status(&agent)).await;
                handler.on_agent_working(&agent).await;
                if agent == AgentId::Supervisor && update.is_top_level() {
                    final_history = update.messages;
                }
            }
        }
        drop(stream);

        handler.on_status(STATUS_COMPLETE).await;
        collector.apply_final(&final_history);
        let (outputs, transcript) = collector.into_parts();
        info!(%run_id, updates, agents = outputs.len(), spoken = transcript.len(), "Analysis complete");

        Ok(AnalysisOutcome {
            run_id,
            query: query.to_string(),
            started_at,
            finished_at: Utc::now(),
            updates,
            outputs,
            transcript,
        })
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use std::sync::Mutex;

    use agent_graph::{GraphError, NodeUpdate, UpdateStream};
    use futures::stream;
    use serde_json::json;

    use super::*;

    /// Graph that replays canned updates
    pub(crate) struct ScriptedGraph {
        updates: Mutex<Option<Vec<agent_graph::Result<NodeUpdate>>>>,
        pub(crate) requests: Mutex<Vec<RunRequest>>,
    }

    impl ScriptedGraph {
        pub(crate) fn new(updates: Vec<agent_graph::Result<NodeUpdate>>) -> Self {
            Self {
                updates: Mutex::new(Some(updates)),
                requests: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl AgentGraph for ScriptedGraph {
        async fn stream(&self, request: RunRequest) -> agent_graph::Result<UpdateStream> {
            self.requests.lock().unwrap().push(request);
            let updates = self.updates.lock().unwrap().take().unwrap_or_default();
            Ok(Box::pin(stream::iter(updates)))
        }

        fn name(&self) -> &str {
            "scripted"
        }
    }

    #[derive(Default)]
    struct RecordingHandler {
        statuses: Mutex<Vec<String>>,
        errors: Mutex<Vec<String>>,
        completed: Mutex<usize>,
    }

    #[async_trait]
    impl AnalysisEventHandler for RecordingHandler {
        async fn on_status(&self, status: &str) {
            self.statuses.lock().unwrap().push(status.to_string());
        }

        async fn on_complete(&self, _outcome: &AnalysisOutcome) {
            *self.completed.lock().unwrap() += 1;
        }

        async fn on_error(&self, error: &str) {
            self.errors.lock().unwrap().push(error.to_string());
        }
    }

    pub(crate) fn long(prefix: &str) -> String {
        format!("{prefix} {}", "detail ".repeat(20))
    }

    pub(crate) fn sample_run() -> Vec<agent_graph::Result<NodeUpdate>> {
        vec![
            Ok(NodeUpdate::new(
                "stock_finder_agent",
                vec![json!({"name": "stock_finder_agent", "content": long("Picked RELIANCE and TCS")})],
            )),
            Ok(NodeUpdate::new(
                "market_data_agent",
                vec![json!({"name": "market_data_agent", "content": long("RELIANCE trades at 2900")})],
            )),
            Ok(NodeUpdate::new(
                "supervisor",
                vec![
                    json!({"type": "human", "content": "Find 2 stocks"}),
                    json!({"name": "stock_finder_agent", "content": long("Picked RELIANCE and TCS")}),
                    json!({"name": "market_data_agent", "content": long("RELIANCE trades at 2900")}),
                    json!({"name": "supervisor", "content": long("FINAL VERDICT: BUY RELIANCE")}),
                ],
            )),
        ]
    }

    #[tokio::test]
    async fn test_run_collects_outputs_and_transcript() {
        let runner = AnalysisRunner::new(ScriptedGraph::new(sample_run()));
        let config = StockConfig::default();

        let outcome = runner
            .run("Find 2 stocks", build_request(&config, "Find 2 stocks"))
            .await
            .unwrap();

        assert_eq!(outcome.updates, 3);
        assert_eq!(outcome.query, "Find 2 stocks");
        let spoken: Vec<&AgentId> = outcome.transcript.iter().map(AgentMessage::agent).collect();
        assert_eq!(
            spoken,
            vec![&AgentId::StockFinder, &AgentId::MarketData, &AgentId::Supervisor]
        );
        assert!(outcome.verdict().unwrap().starts_with("FINAL VERDICT"));
        assert_eq!(outcome.outputs.len(), 3);
        assert!(outcome.finished_at >= outcome.started_at);
    }

    #[tokio::test]
    async fn test_progress_events() {
        let handler = Arc::new(RecordingHandler::default());
        let runner = AnalysisRunner::new(ScriptedGraph::new(sample_run()))
            .with_event_handler(handler.clone());

        runner
            .run("q", build_request(&StockConfig::default(), "q"))
            .await
            .unwrap();

        let statuses = handler.statuses.lock().unwrap().clone();
        assert_eq!(statuses.first().map(String::as_str), Some(STATUS_INITIALIZING));
        assert_eq!(statuses.last().map(String::as_str), Some(STATUS_COMPLETE));
        assert!(statuses.contains(&"🔍 Stock Finder Agent is working...".to_string()));
        assert!(statuses.contains(&"👨‍💼 Supervisor is working...".to_string()));
        assert_eq!(*handler.completed.lock().unwrap(), 1);
    }

    #[tokio::test]
    async fn test_stream_error_aborts_run() {
        let handler = Arc::new(RecordingHandler::default());
        let updates = vec![
            Ok(NodeUpdate::new("stock_finder_agent", vec![])),
            Err(GraphError::RunFailed("model quota exhausted".to_string())),
        ];
        let runner =
            AnalysisRunner::new(ScriptedGraph::new(updates)).with_event_handler(handler.clone());

        let err = runner
            .run("q", build_request(&StockConfig::default(), "q"))
            .await
            .unwrap_err();

        assert!(err.to_string().contains("model quota exhausted"));
        assert_eq!(handler.errors.lock().unwrap().len(), 1);
        assert_eq!(*handler.completed.lock().unwrap(), 0);
    }

    #[tokio::test]
    async fn test_no_supervisor_update_means_empty_transcript() {
        let updates = vec![Ok(NodeUpdate::new(
            "news_analyst_agent",
            vec![json!({"content": long("Positive coverage for TCS")})],
        ))];
        let runner = AnalysisRunner::new(ScriptedGraph::new(updates));

        let outcome = runner
            .run("q", build_request(&StockConfig::default(), "q"))
            .await
            .unwrap();

        assert!(outcome.transcript.is_empty());
        assert!(outcome.outputs.contains_key(&AgentId::NewsAnalyst));
    }

    #[tokio::test]
    async fn test_nested_supervisor_updates_are_not_final() {
        let updates = vec![Ok(NodeUpdate::new(
            "supervisor",
            vec![json!({"name": "supervisor", "content": long("nested")})],
        )
        .with_namespace(vec!["supervisor:1".to_string()]))];
        let runner = AnalysisRunner::new(ScriptedGraph::new(updates));

        let outcome = runner
            .run("q", build_request(&StockConfig::default(), "q"))
            .await
            .unwrap();
        assert!(outcome.transcript.is_empty());
    }

    #[test]
    fn test_build_request() {
        let config = StockConfig::builder()
            .model("llama-3.3-70b")
            .max_tokens(512)
            .build()
            .unwrap();
        let request = build_request(&config, "Analyse INFY");

        assert_eq!(request.messages.len(), 1);
        assert_eq!(request.messages[0].role, "user");
        assert_eq!(request.messages[0].content, "Analyse INFY");
        assert_eq!(request.configurable["model"], json!("llama-3.3-70b"));
        assert_eq!(request.configurable["max_tokens"], json!(512));
        assert_eq!(request.configurable["browser_zone"], json!("scraping_browser"));
        assert!(request.configurable.contains_key("supervisor_prompt"));
        assert!(request.configurable.contains_key("price_recommender_agent_prompt"));
        assert!(!request.configurable.contains_key("groq_api_key"));
    }
}
