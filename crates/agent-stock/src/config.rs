//! Configuration for the analysis desk

use std::path::PathBuf;

use agent_graph::providers::LangGraphConfig;
use agent_utils::{EnvSource, ProcessEnv};
use agent_voice::VoiceConfig;

use crate::error::{Result, StockError};

pub const DEFAULT_MODEL: &str = "qwen/qwen3-32b";
pub const DEFAULT_MODEL_PROVIDER: &str = "groq";
pub const DEFAULT_MAX_TOKENS: u32 = 1000;
pub const DEFAULT_WEB_UNLOCKER_ZONE: &str = "unblocker";
pub const DEFAULT_BROWSER_ZONE: &str = "scraping_browser";

/// Whether an external service is usable
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiState {
    /// Credential present
    Connected,
    /// Required credential absent
    Missing,
    /// Optional credential absent
    Optional,
}

impl ApiState {
    fn required(present: bool) -> Self {
        if present { Self::Connected } else { Self::Missing }
    }

    fn optional(present: bool) -> Self {
        if present { Self::Connected } else { Self::Optional }
    }
}

/// One line of the API status panel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ApiStatus {
    pub name: &'static str,
    pub state: ApiState,
}

/// Configuration for analysis runs and voice output
#[derive(Debug, Clone)]
pub struct StockConfig {
    /// Model provider credential, required for analysis
    pub groq_api_key: Option<String>,

    /// Web tool sidecar credential, required for analysis
    pub bright_data_api_token: Option<String>,

    /// Model the agents run on
    pub model: String,

    /// Model provider name
    pub model_provider: String,

    /// Token cap per model call
    pub max_tokens: u32,

    /// Tool sidecar unlocker zone
    pub web_unlocker_zone: String,

    /// Tool sidecar browser zone
    pub browser_zone: String,

    /// Agent graph server
    pub graph: LangGraphConfig,

    /// Speech providers and per-agent voices
    pub voice: VoiceConfig,

    /// Where clips are written
    pub output_dir: PathBuf,
}

impl Default for StockConfig {
    fn default() -> Self {
        Self {
            groq_api_key: None,
            bright_data_api_token: None,
            model: DEFAULT_MODEL.to_string(),
            model_provider: DEFAULT_MODEL_PROVIDER.to_string(),
            max_tokens: DEFAULT_MAX_TOKENS,
            web_unlocker_zone: DEFAULT_WEB_UNLOCKER_ZONE.to_string(),
            browser_zone: DEFAULT_BROWSER_ZONE.to_string(),
            graph: LangGraphConfig::default(),
            voice: VoiceConfig::default(),
            output_dir: PathBuf::from("."),
        }
    }
}

impl StockConfig {
    /// Create a new configuration builder
    pub fn builder() -> StockConfigBuilder {
        StockConfigBuilder::default()
    }

    /// Load configuration from the process environment
    pub fn from_env() -> Result<Self> {
        Self::from_source(&ProcessEnv)
    }

    /// Load configuration from any environment source
    pub fn from_source(env: &impl EnvSource) -> Result<Self> {
        StockConfig::builder().fill_from(env).build()
    }

    /// Validate the configuration.
    ///
    /// Missing analysis credentials are not a validation error; they block
    /// analysis runs only, see [`StockConfig::require_analysis_keys`].
    pub fn validate(&self) -> Result<()> {
        if self.model.trim().is_empty() {
            return Err(StockError::ConfigError("model must not be empty".to_string()));
        }

        if self.max_tokens == 0 {
            return Err(StockError::ConfigError(
                "max_tokens must be greater than 0".to_string(),
            ));
        }

        self.graph.validate()?;
        self.voice.murf.validate()?;
        Ok(())
    }

    /// Fail with a blocking message unless both analysis credentials are set
    pub fn require_analysis_keys(&self) -> Result<()> {
        if self.groq_api_key.is_none() {
            return Err(StockError::ConfigError(
                "GROQ_API_KEY is required. Please set it in your environment variables."
                    .to_string(),
            ));
        }
        if self.bright_data_api_token.is_none() {
            return Err(StockError::ConfigError(
                "BRIGHT_DATA_API_TOKEN is required. Please set it in your environment variables."
                    .to_string(),
            ));
        }
        Ok(())
    }

    /// Credential status for each external service
    pub fn api_status(&self) -> Vec<ApiStatus> {
        vec![
            ApiStatus {
                name: "GROQ API",
                state: ApiState::required(self.groq_api_key.is_some()),
            },
            ApiStatus {
                name: "Bright Data",
                state: ApiState::required(self.bright_data_api_token.is_some()),
            },
            ApiStatus {
                name: "Murf AI",
                state: ApiState::optional(self.voice.murf.api_key.is_some()),
            },
            ApiStatus {
                name: "Google Speech",
                state: ApiState::optional(self.voice.google.api_key.is_some()),
            },
        ]
    }
}

/// Builder for StockConfig
#[derive(Debug, Default)]
pub struct StockConfigBuilder {
    groq_api_key: Option<String>,
    bright_data_api_token: Option<String>,
    model: Option<String>,
    model_provider: Option<String>,
    max_tokens: Option<u32>,
    web_unlocker_zone: Option<String>,
    browser_zone: Option<String>,
    graph: Option<LangGraphConfig>,
    voice: Option<VoiceConfig>,
    output_dir: Option<PathBuf>,
    env_error: Option<StockError>,
}

impl StockConfigBuilder {
    /// Set the model provider credential
    pub fn groq_api_key(mut self, key: impl Into<String>) -> Self {
        self.groq_api_key = Some(key.into());
        self
    }

    /// Set the tool sidecar credential
    pub fn bright_data_api_token(mut self, token: impl Into<String>) -> Self {
        self.bright_data_api_token = Some(token.into());
        self
    }

    /// Set the model
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Set the model provider
    pub fn model_provider(mut self, provider: impl Into<String>) -> Self {
        self.model_provider = Some(provider.into());
        self
    }

    /// Set the token cap
    pub fn max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    /// Set the tool sidecar zones
    pub fn zones(mut self, web_unlocker: impl Into<String>, browser: impl Into<String>) -> Self {
        self.web_unlocker_zone = Some(web_unlocker.into());
        self.browser_zone = Some(browser.into());
        self
    }

    /// Set the graph server configuration
    pub fn graph(mut self, graph: LangGraphConfig) -> Self {
        self.graph = Some(graph);
        self
    }

    /// Set the voice configuration
    pub fn voice(mut self, voice: VoiceConfig) -> Self {
        self.voice = Some(voice);
        self
    }

    /// Set the clip directory
    pub fn output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = Some(dir.into());
        self
    }

    /// Fill every unset field from an environment source
    pub fn fill_from(mut self, env: &impl EnvSource) -> Self {
        self.groq_api_key = self.groq_api_key.or_else(|| env.non_empty("GROQ_API_KEY"));
        self.bright_data_api_token = self
            .bright_data_api_token
            .or_else(|| env.non_empty("BRIGHT_DATA_API_TOKEN"));
        self.model = self.model.or_else(|| env.non_empty("AGENT_MODEL"));
        self.model_provider = self
            .model_provider
            .or_else(|| env.non_empty("AGENT_MODEL_PROVIDER"));
        self.max_tokens = self
            .max_tokens
            .or_else(|| Some(env.parse_or("AGENT_MAX_TOKENS", DEFAULT_MAX_TOKENS)));
        self.web_unlocker_zone = self
            .web_unlocker_zone
            .or_else(|| env.non_empty("WEB_UNLOCKER_ZONE"));
        self.browser_zone = self.browser_zone.or_else(|| env.non_empty("BROWSER_ZONE"));
        self.output_dir = self
            .output_dir
            .or_else(|| env.non_empty("AUDIO_OUTPUT_DIR").map(PathBuf::from));

        if self.graph.is_none() {
            match LangGraphConfig::from_source(env) {
                Ok(graph) => self.graph = Some(graph),
                Err(e) => self.env_error = Some(e.into()),
            }
        }
        if self.voice.is_none() {
            match VoiceConfig::from_source(env) {
                Ok(voice) => self.voice = Some(voice),
                Err(e) => self.env_error = Some(e.into()),
            }
        }
        self
    }

    /// Fill every unset field from the process environment
    pub fn fill_from_env(self) -> Self {
        self.fill_from(&ProcessEnv)
    }

    /// Build the configuration
    pub fn build(self) -> Result<StockConfig> {
        if let Some(e) = self.env_error {
            return Err(e);
        }

        let defaults = StockConfig::default();
        let config = StockConfig {
            groq_api_key: self.groq_api_key,
            bright_data_api_token: self.bright_data_api_token,
            model: self.model.unwrap_or(defaults.model),
            model_provider: self.model_provider.unwrap_or(defaults.model_provider),
            max_tokens: self.max_tokens.unwrap_or(defaults.max_tokens),
            web_unlocker_zone: self.web_unlocker_zone.unwrap_or(defaults.web_unlocker_zone),
            browser_zone: self.browser_zone.unwrap_or(defaults.browser_zone),
            graph: self.graph.unwrap_or(defaults.graph),
            voice: self.voice.unwrap_or(defaults.voice),
            output_dir: self.output_dir.unwrap_or(defaults.output_dir),
        };

        config.validate()?;
        Ok(config)
    }
}
