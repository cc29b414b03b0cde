//! Speech recognition
//!
//! A [`SpeechRecognizer`] tries an optional primary transcriber and then an
//! optional fallback. Failures are soft: the caller gets a
//! [`VoiceError::Recognition`] whose message is meant for the user, and the
//! primary's message wins over the fallback's because it usually says more
//! about the recording itself.

use async_trait::async_trait;
use tracing::{debug, info, warn};

use crate::{Result, VoiceError};

const NO_FALLBACK: &str = "Speech recognition failed and no fallback API key is configured.";

/// Trait for speech-to-text providers
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Transcriber: Send + Sync {
    /// Transcribe a WAV recording
    async fn transcribe(&self, audio: &[u8]) -> Result<String>;

    /// Get the provider name
    fn name(&self) -> &str;
}

/// Primary transcriber with an optional fallback
#[derive(Default)]
pub struct SpeechRecognizer {
    primary: Option<Box<dyn Transcriber>>,
    fallback: Option<Box<dyn Transcriber>>,
}

impl SpeechRecognizer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_primary(mut self, transcriber: impl Transcriber + 'static) -> Self {
        self.primary = Some(Box::new(transcriber));
        self
    }

    pub fn with_fallback(mut self, transcriber: impl Transcriber + 'static) -> Self {
        self.fallback = Some(Box::new(transcriber));
        self
    }

    /// True when at least one transcriber is configured
    pub fn is_available(&self) -> bool {
        self.primary.is_some() || self.fallback.is_some()
    }

    /// Name of the primary transcriber, if any
    pub fn primary_name(&self) -> Option<&str> {
        self.primary.as_deref().map(|t| t.name())
    }

    pub fn fallback_name(&self) -> Option<&str> {
        self.fallback.as_deref().map(|t| t.name())
    }

    /// Transcribe recorded audio bytes
    pub async fn transcribe(&self, audio: &[u8]) -> Result<String> {
        let mut primary_error = None;

        if let Some(primary) = &self.primary {
            match primary.transcribe(audio).await {
                Ok(text) => {
                    info!(provider = primary.name(), "transcription successful");
                    return Ok(text);
                }
                Err(e) => {
                    warn!(provider = primary.name(), error = %e, "primary speech recognition failed");
                    primary_error = Some(user_message(&e));
                }
            }
        }

        let Some(fallback) = &self.fallback else {
            return Err(VoiceError::Recognition(
                primary_error.unwrap_or_else(|| NO_FALLBACK.to_string()),
            ));
        };

        debug!(provider = fallback.name(), "trying fallback speech recognition");
        match fallback.transcribe(audio).await {
            Ok(text) => Ok(text),
            Err(e) => {
                warn!(provider = fallback.name(), error = %e, "fallback speech recognition failed");
                let message = match (primary_error, &e) {
                    (Some(primary), _) => primary,
                    (None, VoiceError::Recognition(msg)) => msg.clone(),
                    (None, other) => format!("Transcription error: {other}"),
                };
                Err(VoiceError::Recognition(message))
            }
        }
    }
}

fn user_message(err: &VoiceError) -> String {
    match err {
        VoiceError::Recognition(msg) => msg.clone(),
        other => format!("Speech recognition error: {other}"),
    }
}
