//! Command parsing for the analysis desk
//!
//! Lines starting with `/` are commands; anything else is an analysis
//! request in plain language.

use std::path::PathBuf;

use agent_core::AgentId;

use crate::error::{Result, StockError};

/// Parsed command from user input
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Run an analysis, optionally replacing the query first
    Analyze { query: Option<String> },
    /// Transcribe a WAV recording and use it as the query
    Voice { path: PathBuf },
    /// Allow the last recording to be transcribed again
    ResetAudio,
    /// Speak a single text with the default voice
    Say { text: String },
    /// Show analysis outputs, all or one agent's
    Results { agent: Option<AgentId> },
    /// Show API and session status
    Status,
    /// Show or replace the query
    Query { text: Option<String> },
    /// Show help
    Help,
    /// Exit the desk
    Exit,
    /// Plain text: analyse with this query
    Ask { text: String },
}

impl Command {
    /// Parse a command from user input
    pub fn parse(input: &str) -> Result<Self> {
        let input = input.trim();

        if input.is_empty() {
            return Err(StockError::CommandError("Empty input".to_string()));
        }

        let Some(body) = input.strip_prefix('/') else {
            return Ok(Command::Ask {
                text: input.to_string(),
            });
        };

        let (cmd, rest) = body
            .split_once(char::is_whitespace)
            .unwrap_or((body, ""));
        let rest = rest.trim();
        let arg = (!rest.is_empty()).then(|| rest.to_string());

        if cmd.is_empty() {
            return Err(StockError::CommandError("Empty command".to_string()));
        }

        match cmd.to_lowercase().as_str() {
            "analyze" | "analyse" | "a" | "run" => Ok(Command::Analyze { query: arg }),
            "voice" | "v" | "listen" => {
                let path = arg.ok_or_else(|| {
                    StockError::CommandError("Missing WAV file for voice command".to_string())
                })?;
                Ok(Command::Voice {
                    path: PathBuf::from(path),
                })
            }
            "reset-audio" | "reset" => Ok(Command::ResetAudio),
            "say" | "speak" => {
                let text = arg.ok_or_else(|| {
                    StockError::CommandError("Missing text for say command".to_string())
                })?;
                Ok(Command::Say { text })
            }
            "results" | "r" => {
                let agent = arg
                    .map(|name| {
                        name.parse::<AgentId>()
                            .map_err(|e| StockError::CommandError(e.to_string()))
                    })
                    .transpose()?;
                Ok(Command::Results { agent })
            }
            "status" | "s" => Ok(Command::Status),
            "query" => Ok(Command::Query { text: arg }),
            "help" | "h" | "?" => Ok(Command::Help),
            "exit" | "quit" | "q" => Ok(Command::Exit),
            other => Err(StockError::CommandError(format!("Unknown command: {other}"))),
        }
    }

    /// Get help text for all commands
    pub fn help_text() -> &'static str {
        r"
Stock Analysis Desk Commands
============================

Analysis:
  /analyze [query]       Run the agent team (optionally with a new query)
  /results [agent]       Show the latest outputs (e.g. /results supervisor)
  /query [text]          Show or replace the current query

Voice:
  /voice <file.wav>      Transcribe a recording and analyse it
  /reset-audio           Allow the last recording to be transcribed again
  /say <text>            Speak a text with the default voice

  /voice uses Google speech when GOOGLE_SPEECH_API_KEY is set, falling back
  to the Murf voice changer. Without it, only the Murf fallback is used.

Other:
  /status                Show API and session status
  /help                  Show help
  /exit                  Exit

Aliases:
  /a = /analyze    /v = /voice    /r = /results    /s = /status    /q = /exit

Anything that is not a command is analysed as a query, e.g.
  Find 2 undervalued NSE banking stocks
"
    }

    /// Get a short description of the command
    pub fn description(&self) -> &'static str {
        match self {
            Command::Analyze { .. } => "Run an analysis",
            Command::Voice { .. } => "Transcribe a recording",
            Command::ResetAudio => "Reset the processed recording",
            Command::Say { .. } => "Speak a text",
            Command::Results { .. } => "Show analysis results",
            Command::Status => "Show status",
            Command::Query { .. } => "Show or replace the query",
            Command::Help => "Show help",
            Command::Exit => "Exit the desk",
            Command::Ask { .. } => "Plain language analysis request",
        }
    }
}
