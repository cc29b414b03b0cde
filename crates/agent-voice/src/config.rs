//! Voice configuration
//!
//! Each agent speaks with its own voice; anything without an entry uses the
//! default voice. All values can be overridden from the environment.

use std::collections::HashMap;

use agent_core::AgentId;
use agent_utils::{EnvSource, ProcessEnv};

use crate::Result;
use crate::providers::google::GoogleSpeechConfig;
use crate::providers::murf::MurfConfig;

/// Fallback voice for agents without their own entry
pub const DEFAULT_VOICE: &str = "Matthew";

/// Per-agent voice selection with a default fallback
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VoiceMap {
    voices: HashMap<AgentId, String>,
    default_voice: String,
}

impl VoiceMap {
    /// Empty map that answers every agent with `default_voice`
    pub fn new(default_voice: impl Into<String>) -> Self {
        Self {
            voices: HashMap::new(),
            default_voice: default_voice.into(),
        }
    }

    /// Map built from the process environment
    pub fn from_env() -> Self {
        Self::from_source(&ProcessEnv)
    }

    /// Map built from `MURF_VOICE_*` entries of any environment source
    pub fn from_source(env: &impl EnvSource) -> Self {
        let defaults = Self::default();
        let mut map = Self::new(env.get_or("MURF_VOICE_ID", &defaults.default_voice));
        for (agent, key) in [
            (AgentId::StockFinder, "MURF_VOICE_STOCK_FINDER"),
            (AgentId::MarketData, "MURF_VOICE_MARKET_DATA"),
            (AgentId::NewsAnalyst, "MURF_VOICE_NEWS_ANALYST"),
            (AgentId::PriceRecommender, "MURF_VOICE_RECOMMENDER"),
            (AgentId::Supervisor, "MURF_VOICE_SUPERVISOR"),
        ] {
            let fallback = defaults.voice_for(&agent).to_string();
            map = map.with_voice(agent, env.get_or(key, &fallback));
        }
        map
    }

    /// Assign a voice to an agent
    pub fn with_voice(mut self, agent: AgentId, voice_id: impl Into<String>) -> Self {
        self.voices.insert(agent, voice_id.into());
        self
    }

    /// Voice for an agent, or the default voice
    pub fn voice_for(&self, agent: &AgentId) -> &str {
        self.voices.get(agent).unwrap_or(&self.default_voice)
    }

    pub fn default_voice(&self) -> &str {
        &self.default_voice
    }
}

impl Default for VoiceMap {
    fn default() -> Self {
        Self::new(DEFAULT_VOICE)
            .with_voice(AgentId::StockFinder, "Matthew")
            .with_voice(AgentId::MarketData, "Julia")
            .with_voice(AgentId::NewsAnalyst, "Ken")
            .with_voice(AgentId::PriceRecommender, "Ruby")
            .with_voice(AgentId::Supervisor, "Emily")
    }
}

/// Everything the voice layer reads from the environment
#[derive(Debug, Clone, Default)]
pub struct VoiceConfig {
    /// Text-to-speech and voice-changer provider
    pub murf: MurfConfig,
    /// Primary speech recognition provider
    pub google: GoogleSpeechConfig,
    /// Per-agent voices
    pub voices: VoiceMap,
}

impl VoiceConfig {
    /// Create config from the process environment
    pub fn from_env() -> Result<Self> {
        Self::from_source(&ProcessEnv)
    }

    /// Create config from any environment source
    pub fn from_source(env: &impl EnvSource) -> Result<Self> {
        Ok(Self {
            murf: MurfConfig::from_source(env)?,
            google: GoogleSpeechConfig::from_source(env)?,
            voices: VoiceMap::from_source(env),
        })
    }

    /// Whether speech output can be produced at all
    pub fn has_speech_output(&self) -> bool {
        self.murf.api_key.is_some()
    }
}
