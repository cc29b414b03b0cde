//! Google speech recognition client
//!
//! The recording is written to a temporary WAV file, decoded with `hound`,
//! downmixed to mono and re-encoded as big-endian 16-bit PCM, then posted as
//! `audio/l16`. The service answers with newline-delimited JSON objects; the
//! first one carrying a result holds the alternatives.

use std::io::Write;
use std::time::Duration;

use agent_utils::{EnvSource, ProcessEnv};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, instrument};
use url::Url;

use crate::recognition::Transcriber;
use crate::{Result, VoiceError};

const DEFAULT_ENDPOINT: &str = "https://www.google.com/speech-api/v2/recognize";
const DEFAULT_LANGUAGE: &str = "en-US";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

pub(crate) const NOT_UNDERSTOOD: &str =
    "Could not understand the audio. Please speak clearly and try again.";
pub(crate) const UNREACHABLE: &str =
    "Could not connect to speech recognition service. Please check your internet connection.";

/// Configuration for the Google speech client
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GoogleSpeechConfig {
    /// API key; the primary recognizer is disabled without it
    pub api_key: Option<String>,

    /// Recognition endpoint
    pub endpoint: String,

    /// Recognition language (default: "en-US")
    pub language: String,

    /// Request timeout in seconds (default: 30)
    pub timeout_secs: u64,
}

impl GoogleSpeechConfig {
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

    /// Create config from `GOOGLE_SPEECH_API_KEY` and `GOOGLE_SPEECH_LANGUAGE`
    pub fn from_source(env: &impl EnvSource) -> Result<Self> {
        let config = Self {
            api_key: env.non_empty("GOOGLE_SPEECH_API_KEY"),
            language: env.get_or("GOOGLE_SPEECH_LANGUAGE", DEFAULT_LANGUAGE),
            ..Self::default()
        };
        config.validate()?;
        Ok(config)
    }

    /// Set the recognition endpoint
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    pub fn validate(&self) -> Result<()> {
        Url::parse(&self.endpoint).map_err(|e| {
            VoiceError::ConfigurationError(format!(
                "invalid speech endpoint '{}': {e}",
                self.endpoint
            ))
        })?;
        Ok(())
    }
}

impl Default for GoogleSpeechConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            endpoint: DEFAULT_ENDPOINT.to_string(),
            language: DEFAULT_LANGUAGE.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

/// Google speech recognition client
#[derive(Debug, Clone)]
pub struct GoogleSpeechClient {
    client: Client,
    config: GoogleSpeechConfig,
}

impl GoogleSpeechClient {
    /// Create a new client; fails when no API key is configured
    pub fn with_config(config: GoogleSpeechConfig) -> Result<Self> {
        config.validate()?;
        if config.api_key.is_none() {
            return Err(VoiceError::ConfigurationError(
                "GOOGLE_SPEECH_API_KEY is not set".to_string(),
            ));
        }
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { client, config })
    }

    fn recognize_url(&self, key: &str) -> Result<Url> {
        Url::parse_with_params(
            &self.config.endpoint,
            [
                ("client", "chromium"),
                ("lang", self.config.language.as_str()),
                ("key", key),
            ],
        )
        .map_err(|e| VoiceError::ConfigurationError(e.to_string()))
    }
}

#[async_trait]
impl Transcriber for GoogleSpeechClient {
    #[instrument(skip(self, audio), fields(language = %self.config.language, bytes = audio.len()))]
    async fn transcribe(&self, audio: &[u8]) -> Result<String> {
        let key = self.config.api_key.as_deref().ok_or_else(|| {
            VoiceError::ConfigurationError("GOOGLE_SPEECH_API_KEY is not set".to_string())
        })?;

        let recording = audio.to_vec();
        let pcm = tokio::task::spawn_blocking(move || decode_recording(&recording))
            .await
            .map_err(|e| VoiceError::Recognition(format!("Speech recognition error: {e}")))??;
        debug!(sample_rate = pcm.sample_rate, samples = pcm.samples.len(), "decoded recording");

        let response = self
            .client
            .post(self.recognize_url(key)?)
            .header("Content-Type", format!("audio/l16; rate={}", pcm.sample_rate))
            .body(pcm.to_be_bytes())
            .send()
            .await
            .map_err(|e| {
                debug!(error = %e, "speech service unreachable");
                VoiceError::Recognition(UNREACHABLE.to_string())
            })?;

        if !response.status().is_success() {
            debug!(status = %response.status(), "speech service rejected request");
            return Err(VoiceError::Recognition(UNREACHABLE.to_string()));
        }

        let body = response
            .text()
            .await
            .map_err(|_| VoiceError::Recognition(UNREACHABLE.to_string()))?;
        best_transcript(&body).ok_or_else(|| VoiceError::Recognition(NOT_UNDERSTOOD.to_string()))
    }

    fn name(&self) -> &'static str {
        "google-speech"
    }
}

// ============================================================================
// Audio preparation
// ============================================================================

/// Mono 16-bit PCM ready for upload
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct MonoPcm {
    pub sample_rate: u32,
    pub samples: Vec<i16>,
}

impl MonoPcm {
    fn to_be_bytes(&self) -> Vec<u8> {
        self.samples.iter().flat_map(|s| s.to_be_bytes()).collect()
    }
}

/// Write the recording to a temp file and decode it as WAV
pub(crate) fn decode_recording(audio: &[u8]) -> Result<MonoPcm> {
    let mut file = tempfile::Builder::new()
        .prefix("recording-")
        .suffix(".wav")
        .tempfile()?;
    file.write_all(audio)?;
    file.flush()?;

    let reader = hound::WavReader::open(file.path())
        .map_err(|e| VoiceError::Recognition(format!("Speech recognition error: {e}")))?;
    let spec = reader.spec();
    let channels = usize::from(spec.channels.max(1));

    let interleaved = read_samples(reader)?;
    let samples = interleaved
        .chunks(channels)
        .map(|frame| {
            let sum: i32 = frame.iter().map(|&s| i32::from(s)).sum();
            (sum / frame.len() as i32) as i16
        })
        .collect();

    Ok(MonoPcm {
        sample_rate: spec.sample_rate,
        samples,
    })
}

fn read_samples<R: std::io::Read>(reader: hound::WavReader<R>) -> Result<Vec<i16>> {
    let spec = reader.spec();
    let unsupported = |e: hound::Error| VoiceError::UnsupportedAudio(e.to_string());

    match (spec.sample_format, spec.bits_per_sample) {
        (hound::SampleFormat::Float, _) => reader
            .into_samples::<f32>()
            .map(|s| s.map(|v| (v.clamp(-1.0, 1.0) * f32::from(i16::MAX)) as i16))
            .collect::<std::result::Result<_, _>>()
            .map_err(unsupported),
        (hound::SampleFormat::Int, 8) => reader
            .into_samples::<i8>()
            .map(|s| s.map(|v| i16::from(v) << 8))
            .collect::<std::result::Result<_, _>>()
            .map_err(unsupported),
        (hound::SampleFormat::Int, 16) => reader
            .into_samples::<i16>()
            .collect::<std::result::Result<_, _>>()
            .map_err(unsupported),
        (hound::SampleFormat::Int, bits @ 17..=32) => {
            let shift = u32::from(bits) - 16;
            reader
                .into_samples::<i32>()
                .map(|s| s.map(|v| (v >> shift) as i16))
                .collect::<std::result::Result<_, _>>()
                .map_err(unsupported)
        }
        (_, bits) => Err(VoiceError::UnsupportedAudio(format!(
            "{bits}-bit samples are not supported"
        ))),
    }
}

// ============================================================================
// Response parsing
// ============================================================================

#[derive(Debug, Deserialize)]
struct RecognizeLine {
    #[serde(default)]
    result: Vec<RecognizeResult>,
}

#[derive(Debug, Deserialize)]
struct RecognizeResult {
    #[serde(default)]
    alternative: Vec<Alternative>,
}

#[derive(Debug, Deserialize)]
struct Alternative {
    transcript: String,
    #[serde(default)]
    confidence: Option<f64>,
}

/// Pick the transcript from the first non-empty result: the alternative
/// with a confidence score if any has one, otherwise the first.
fn best_transcript(body: &str) -> Option<String> {
    let alternatives = body
        .lines()
        .filter(|line| !line.trim().is_empty())
        .filter_map(|line| serde_json::from_str::<RecognizeLine>(line).ok())
        .find_map(|line| {
            line.result
                .into_iter()
                .next()
                .filter(|result| !result.alternative.is_empty())
        })?
        .alternative;

    let chosen = alternatives
        .iter()
        .find(|alt| alt.confidence.is_some())
        .or_else(|| alternatives.first())?;
    let transcript = chosen.transcript.trim();
    (!transcript.is_empty()).then(|| transcript.to_string())
}
