//! Murf provider implementation
//!
//! Streams speech from `POST /v1/speech/stream` and, for speech recognition
//! fallback, asks the voice changer (`POST /v1/voice-changer/convert`) to
//! return a transcription of an uploaded recording.

use std::time::Duration;

use agent_utils::{EnvSource, ProcessEnv};
use async_trait::async_trait;
use futures::StreamExt;
use reqwest::{Client, Response};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};
use url::Url;

use crate::recognition::Transcriber;
use crate::{AudioStream, Result, SpeechSynthesizer, SynthesisRequest, VoiceError};

const DEFAULT_MURF_API_BASE: &str = "https://api.murf.ai";
const DEFAULT_MODEL: &str = "FALCON";
const DEFAULT_LOCALE: &str = "en-US";
const DEFAULT_SAMPLE_RATE: u32 = 24_000;
const DEFAULT_TIMEOUT_SECS: u64 = 120;

const MISSING_KEY: &str = "Voice generation requires MURF_API_KEY to be set in environment variables.";

/// Configuration for the Murf provider
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MurfConfig {
    /// API key; voice features are off without it
    pub api_key: Option<String>,

    /// Base URL for the Murf API (default: "https://api.murf.ai")
    pub api_base: String,

    /// Speech model (default: "FALCON")
    pub model: String,

    /// Locale passed as `multiNativeLocale` (default: "en-US")
    pub locale: String,

    /// Output sample rate in Hz (default: 24000)
    pub sample_rate: u32,

    /// Request timeout in seconds (default: 120)
    pub timeout_secs: u64,
}

impl MurfConfig {
    /// Create a new config with the given API key and default settings
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: Some(api_key.into()),
            ..Self::default()
        }
    }

    /// Create config from the process environment
    pub fn from_env() -> Result<Self> {
        Self::from_source(&ProcessEnv)
    }

    /// Create config from any environment source
    ///
    /// Reads `MURF_API_KEY`, `MURF_API_BASE`, `MURF_MODEL`, `MURF_LOCALE` and
    /// `MURF_SAMPLE_RATE`. A missing key is not an error here; it surfaces
    /// when speech is first requested.
    pub fn from_source(env: &impl EnvSource) -> Result<Self> {
        let config = Self {
            api_key: env.non_empty("MURF_API_KEY"),
            api_base: env.get_or("MURF_API_BASE", DEFAULT_MURF_API_BASE),
            model: env.get_or("MURF_MODEL", DEFAULT_MODEL),
            locale: env.get_or("MURF_LOCALE", DEFAULT_LOCALE),
            sample_rate: env.parse_or("MURF_SAMPLE_RATE", DEFAULT_SAMPLE_RATE),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        };
        config.validate()?;
        Ok(config)
    }

    /// Set custom API base URL
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }

    /// Set the speech model
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Set request timeout in seconds
    pub fn with_timeout(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }

    pub fn validate(&self) -> Result<()> {
        Url::parse(&self.api_base).map_err(|e| {
            VoiceError::ConfigurationError(format!("invalid Murf API base '{}': {e}", self.api_base))
        })?;
        if self.sample_rate == 0 {
            return Err(VoiceError::ConfigurationError(
                "sample rate must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{path}", self.api_base.trim_end_matches('/'))
    }
}

impl Default for MurfConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            api_base: DEFAULT_MURF_API_BASE.to_string(),
            model: DEFAULT_MODEL.to_string(),
            locale: DEFAULT_LOCALE.to_string(),
            sample_rate: DEFAULT_SAMPLE_RATE,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

/// Murf client
#[derive(Debug, Clone)]
pub struct MurfClient {
    client: Client,
    config: MurfConfig,
}

impl MurfClient {
    /// Create a new client with custom configuration
    pub fn with_config(config: MurfConfig) -> Result<Self> {
        config.validate()?;
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { client, config })
    }

    /// Create a client from the process environment
    pub fn from_env() -> Result<Self> {
        Self::with_config(MurfConfig::from_env()?)
    }

    /// Get the current configuration
    pub fn config(&self) -> &MurfConfig {
        &self.config
    }

    /// Voice-changer transcription using the given voice
    pub fn transcriber(&self, voice_id: impl Into<String>) -> MurfTranscriber {
        MurfTranscriber {
            client: self.clone(),
            voice_id: voice_id.into(),
        }
    }

    fn api_key(&self) -> Result<&str> {
        self.config
            .api_key
            .as_deref()
            .ok_or_else(|| VoiceError::ConfigurationError(MISSING_KEY.to_string()))
    }

    /// Upload a recording to the voice changer and return its transcription
    #[instrument(skip(self, audio), fields(voice = %voice_id, bytes = audio.len()))]
    pub async fn transcribe_with_voice(&self, audio: Vec<u8>, voice_id: &str) -> Result<Option<String>> {
        let api_key = self.api_key()?;

        let file = reqwest::multipart::Part::bytes(audio)
            .file_name("recording.wav")
            .mime_str("audio/wav")?;
        let form = reqwest::multipart::Form::new()
            .part("file", file)
            .text("voice_id", voice_id.to_string())
            .text("return_transcription", "true")
            .text("multi_native_locale", self.config.locale.clone());

        let response = self
            .client
            .post(self.config.endpoint("/v1/voice-changer/convert"))
            .header("api-key", api_key)
            .multipart(form)
            .send()
            .await?;
        let response = check_status(response).await?;

        let body: VoiceChangerResponse = response.json().await?;
        debug!(has_transcription = body.transcription.is_some(), "voice changer responded");
        Ok(body
            .transcription
            .map(|text| text.trim().to_string())
            .filter(|text| !text.is_empty()))
    }
}

#[async_trait]
impl SpeechSynthesizer for MurfClient {
    fn ensure_configured(&self) -> Result<()> {
        self.api_key().map(|_| ())
    }

    #[instrument(skip(self, request), fields(model = %self.config.model, voice = %request.voice_id))]
    async fn synthesize(&self, request: SynthesisRequest) -> Result<AudioStream> {
        let api_key = self.api_key()?;
        debug!("Sending speech request to Murf at {}", self.config.api_base);

        let body = SpeechRequest {
            text: &request.text,
            voice_id: &request.voice_id,
            model: &self.config.model,
            multi_native_locale: &self.config.locale,
            sample_rate: self.config.sample_rate,
            format: "WAV",
            channel_type: "MONO",
        };

        let response = self
            .client
            .post(self.config.endpoint("/v1/speech/stream"))
            .header("api-key", api_key)
            .json(&body)
            .send()
            .await?;
        let response = check_status(response).await?;

        Ok(Box::pin(
            response
                .bytes_stream()
                .map(|chunk| chunk.map_err(VoiceError::from)),
        ))
    }

    fn name(&self) -> &'static str {
        "murf"
    }
}

/// Voice-changer transcription bound to one voice
#[derive(Debug, Clone)]
pub struct MurfTranscriber {
    client: MurfClient,
    voice_id: String,
}

#[async_trait]
impl Transcriber for MurfTranscriber {
    async fn transcribe(&self, audio: &[u8]) -> Result<String> {
        self.client
            .transcribe_with_voice(audio.to_vec(), &self.voice_id)
            .await?
            .ok_or_else(|| {
                VoiceError::Recognition("No transcription could be generated from the audio.".to_string())
            })
    }

    fn name(&self) -> &'static str {
        "murf-voice-changer"
    }
}

/// Map non-success statuses to errors
async fn check_status(response: Response) -> Result<Response> {
    if response.status().is_success() {
        return Ok(response);
    }

    let status = response.status();
    let error_text = response.text().await?;

    Err(match status.as_u16() {
        401 | 403 => VoiceError::AuthenticationFailed,
        429 => VoiceError::RateLimitExceeded(error_text),
        400 | 422 => VoiceError::InvalidRequest(error_text),
        _ => VoiceError::RequestFailed(format!("HTTP {status}: {error_text}")),
    })
}

// ============================================================================
// Murf-specific wire types
// ============================================================================

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SpeechRequest<'a> {
    text: &'a str,
    voice_id: &'a str,
    model: &'a str,
    multi_native_locale: &'a str,
    sample_rate: u32,
    format: &'static str,
    channel_type: &'static str,
}

#[derive(Debug, Deserialize)]
struct VoiceChangerResponse {
    #[serde(default)]
    transcription: Option<String>,
}
