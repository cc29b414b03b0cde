//! Stock analysis desk
//!
//! [`StockBot`] handles one user turn at a time against an explicit
//! [`SessionState`]:
//!
//! - **Analysis turn**: reset voice state, check credentials, run the agent
//!   graph, store outputs and the spoken transcript
//! - **Voice turn**: render one clip per agent and play them in order
//! - **Voice input**: transcribe a recording once and analyse it
//!
//! # Example
//!
//! ```rust,ignore
//! use agent_playback::NoOpSurface;
//! use agent_stock::{SessionState, StockBot, StockConfig};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let bot = StockBot::from_config(StockConfig::from_env()?)?;
//!     let mut session = SessionState::new();
//!     let reply = bot.process_input("/analyze", &mut session, &mut NoOpSurface).await?;
//!     println!("{reply:?}");
//!     Ok(())
//! }
//! ```

pub mod commands;

use std::path::Path;
use std::sync::Arc;

use agent_core::AgentId;
use agent_graph::AgentGraph;
use agent_graph::providers::LangGraphClient;
use agent_playback::{PlaybackClip, PlaybackDriver, PlaybackSurface};
use agent_voice::providers::{GoogleSpeechClient, MurfClient};
use agent_voice::{ClipRenderer, SpeechRecognizer, SpeechSynthesizer};
use tracing::{info, instrument, warn};

use crate::analysis::{AnalysisEventHandler, AnalysisRunner, build_request};
use crate::config::StockConfig;
use crate::error::{Result, StockError};
use crate::interface::formatter;
use crate::session::{SessionState, audio_digest};

pub use commands::Command;

/// File written by `/say`
const SAY_FILE: &str = "output.wav";

/// Shown for `/voice` when neither recognizer has a key
const NO_RECOGNIZER: &str =
    "Voice input requires GOOGLE_SPEECH_API_KEY or MURF_API_KEY to be set in environment variables.";

/// What the front-end should do with a handled turn
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    /// Show this text
    Message(String),
    /// Leave the session
    Exit,
}

/// Analysis desk wired to a graph runtime and a speech synthesizer
pub struct StockBot<G, S> {
    config: StockConfig,
    runner: AnalysisRunner<G>,
    renderer: ClipRenderer<S>,
    recognizer: SpeechRecognizer,
}

impl StockBot<LangGraphClient, MurfClient> {
    /// Build the desk from configuration: a LangGraph client for analysis,
    /// Murf for speech output and the voice-changer fallback, and Google
    /// speech as the primary recognizer when its key is set.
    pub fn from_config(config: StockConfig) -> Result<Self> {
        let graph = LangGraphClient::with_config(config.graph.clone())?;
        let murf = MurfClient::with_config(config.voice.murf.clone())?;

        let mut recognizer = SpeechRecognizer::new();
        if config.voice.google.api_key.is_some() {
            recognizer = recognizer.with_primary(GoogleSpeechClient::with_config(
                config.voice.google.clone(),
            )?);
        }
        if config.voice.has_speech_output() {
            recognizer =
                recognizer.with_fallback(murf.transcriber(config.voice.voices.default_voice()));
        }

        Ok(Self::new(config, graph, murf, recognizer))
    }
}

impl<G: AgentGraph, S: SpeechSynthesizer> StockBot<G, S> {
    pub fn new(config: StockConfig, graph: G, synthesizer: S, recognizer: SpeechRecognizer) -> Self {
        let renderer = ClipRenderer::new(
            synthesizer,
            config.voice.voices.clone(),
            config.output_dir.clone(),
        );
        Self {
            config,
            runner: AnalysisRunner::new(graph),
            renderer,
            recognizer,
        }
    }

    /// Set the handler receiving analysis progress
    pub fn with_event_handler(mut self, handler: Arc<dyn AnalysisEventHandler>) -> Self {
        self.runner = self.runner.with_event_handler(handler);
        self
    }

    pub fn config(&self) -> &StockConfig {
        &self.config
    }

    /// Get the welcome message
    pub fn welcome(&self) -> &'static str {
        "📈 Stock Analysis Desk - type /help for commands"
    }

    /// Parse and handle one line of user input.
    ///
    /// A successful voice transcription requests an automatic analysis run,
    /// which happens before this turn returns.
    pub async fn process_input(
        &self,
        input: &str,
        session: &mut SessionState,
        surface: &mut impl PlaybackSurface,
    ) -> Result<Reply> {
        let command = Command::parse(input)?;
        let reply = self.execute_command(command, session, surface).await?;

        match reply {
            Reply::Message(transcribed) if session.take_auto_run() => {
                let analysis = self.run_analysis(session, surface).await?;
                Ok(Reply::Message(format!("{transcribed}\n\n{analysis}")))
            }
            other => Ok(other),
        }
    }

    /// Execute a parsed command
    pub async fn execute_command(
        &self,
        command: Command,
        session: &mut SessionState,
        surface: &mut impl PlaybackSurface,
    ) -> Result<Reply> {
        let message = match command {
            Command::Analyze { query } => {
                if let Some(query) = query {
                    session.set_query(query);
                }
                self.run_analysis(session, surface).await?
            }
            Command::Ask { text } => {
                session.set_query(text);
                self.run_analysis(session, surface).await?
            }
            Command::Voice { path } => self.voice_input(&path, session).await?,
            Command::ResetAudio => {
                session.reset_audio();
                "🔄 Audio reset. The next recording will be transcribed.".to_string()
            }
            Command::Say { text } => self.say(&text, surface).await?,
            Command::Results { agent } => formatter::results(session.outputs(), agent.as_ref()),
            Command::Status => self.status(session),
            Command::Query { text: None } => format!("Current query: {}", session.query()),
            Command::Query { text: Some(text) } => {
                session.set_query(text);
                format!("Query updated: {}", session.query())
            }
            Command::Help => Command::help_text().to_string(),
            Command::Exit => return Ok(Reply::Exit),
        };
        Ok(Reply::Message(message))
    }

    /// Analysis turn followed by the voice turn.
    ///
    /// A failed voice turn does not discard the analysis; its error is
    /// appended to the reply.
    pub async fn run_analysis(
        &self,
        session: &mut SessionState,
        surface: &mut impl PlaybackSurface,
    ) -> Result<String> {
        let mut reply = self.analysis_turn(session).await?;

        if session.needs_voice_output() {
            match self.voice_turn(session, surface).await {
                Ok(line) => {
                    reply.push_str("\n\n");
                    reply.push_str(&line);
                }
                Err(e) => {
                    warn!(error = %e, "voice output failed");
                    reply.push_str("\n\n");
                    reply.push_str(&formatter::format_error(&e));
                }
            }
        }
        Ok(reply)
    }

    /// Run the agent graph for the session's query.
    ///
    /// Voice state is reset first, so a failed run leaves nothing from the
    /// previous run to play.
    #[instrument(skip(self, session), fields(query = %session.query()))]
    pub async fn analysis_turn(&self, session: &mut SessionState) -> Result<String> {
        session.reset_voice_state();
        self.config.require_analysis_keys()?;

        let query = session.query().to_string();
        let request = build_request(&self.config, &query);
        let outcome = self.runner.run(&query, request).await?;

        let summary = formatter::results(&outcome.outputs, None);
        session.record_analysis(outcome);
        Ok(summary)
    }

    /// Render the transcript and play it to completion, once per analysis
    pub async fn voice_turn(
        &self,
        session: &mut SessionState,
        surface: &mut impl PlaybackSurface,
    ) -> Result<String> {
        if !session.is_analysis_complete() {
            return Ok("🎯 Run a stock analysis to enable voice output.".to_string());
        }
        if session.is_playback_complete() {
            return Ok(formatter::COMPLETE_LINE.to_string());
        }
        if session.transcript().is_empty() {
            return Ok("⚠️ No agent messages available for voice output.".to_string());
        }

        session.set_voice_playing(true);
        let clips = match self.renderer.render(session.transcript()).await {
            Ok(clips) => clips,
            Err(e) => {
                session.set_voice_playing(false);
                return Err(e.into());
            }
        };
        info!(clips = clips.len(), "Playing agent clips");
        session.load_clips(clips);

        let report = PlaybackDriver::new(surface).run(session.sequencer_mut()).await;
        session.set_voice_playing(false);

        let mut line = formatter::COMPLETE_LINE.to_string();
        if report.failed > 0 {
            line.push_str(&format!(" ({} of {} clips could not be played)", report.failed, report.presented));
        }
        Ok(line)
    }

    /// Transcribe a recording into the query and request an analysis run.
    ///
    /// A recording is transcribed at most once until the audio is reset. A
    /// failed transcription keeps the previous query.
    pub async fn voice_input(&self, path: &Path, session: &mut SessionState) -> Result<String> {
        if !self.recognizer.is_available() {
            return Err(agent_voice::VoiceError::Recognition(NO_RECOGNIZER.to_string()).into());
        }

        let audio = tokio::fs::read(path).await?;
        if audio.is_empty() {
            return Err(StockError::CommandError(format!(
                "{} is empty",
                path.display()
            )));
        }

        let digest = audio_digest(&audio);
        if !session.is_new_audio(&digest) {
            return Ok(
                "ℹ️ Audio already transcribed. Record new audio or use /reset-audio to re-transcribe."
                    .to_string(),
            );
        }

        session.mark_audio_processed(digest);
        let text = self.recognizer.transcribe(&audio).await?;
        if !session.set_query(text) {
            return Err(agent_voice::VoiceError::Recognition(
                "No transcription could be generated from the audio.".to_string(),
            )
            .into());
        }
        session.request_auto_run();
        Ok(format!("✅ Transcribed: \"{}\"", session.query()))
    }

    /// Speak one text with the default voice and hand it to the surface
    pub async fn say(&self, text: &str, surface: &mut impl PlaybackSurface) -> Result<String> {
        let path = self.config.output_dir.join(SAY_FILE);
        let audio = self.renderer.render_text(text, None, &path).await?;

        let clip = PlaybackClip::new(AgentId::Other("narrator".to_string()), &audio.path, audio.duration);
        surface.present(&clip)?;
        Ok(format!("🔊 Voice output saved to: {}", audio.path.display()))
    }

    /// Which recognizers `/voice` will use
    pub fn voice_input_mode(&self) -> String {
        match (self.recognizer.primary_name(), self.recognizer.fallback_name()) {
            (Some(primary), Some(fallback)) => format!("{primary}, {fallback} fallback"),
            (Some(primary), None) => format!("{primary} only"),
            (None, Some(fallback)) => {
                format!("{fallback} only (GOOGLE_SPEECH_API_KEY not set)")
            }
            (None, None) => "unavailable (set GOOGLE_SPEECH_API_KEY or MURF_API_KEY)".to_string(),
        }
    }

    fn status(&self, session: &SessionState) -> String {
        let mut out = formatter::status_table(&self.config.api_status());
        out.push_str(&format!("\nQuery: {}", session.query()));
        out.push_str(&format!("\nAgent graph: {} ({})", self.config.graph.base_url, self.config.graph.assistant_id));
        match session.last_run() {
            Some(run_id) => out.push_str(&format!("\nLast run: {run_id}")),
            None => out.push_str("\nLast run: none"),
        }
        out.push_str(&format!(
            "\nVoice output: {}",
            if session.is_playback_complete() {
                "complete"
            } else if session.is_analysis_complete() {
                "pending"
            } else {
                "waiting for analysis"
            }
        ));
        out.push_str(&format!("\nVoice input: {}", self.voice_input_mode()));
        out.push('\n');
        out.push_str(&formatter::agent_circles(session.active_agent()));
        out
    }
}
