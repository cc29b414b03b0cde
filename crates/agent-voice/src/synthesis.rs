//! Speech synthesis trait definition

use std::pin::Pin;

use async_trait::async_trait;
use bytes::Bytes;
use futures::Stream;

use crate::Result;

/// Audio bytes as they arrive from the provider
pub type AudioStream = Pin<Box<dyn Stream<Item = Result<Bytes>> + Send>>;

/// One text-to-speech request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SynthesisRequest {
    /// Text to speak
    pub text: String,
    /// Provider voice id
    pub voice_id: String,
}

impl SynthesisRequest {
    pub fn new(text: impl Into<String>, voice_id: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            voice_id: voice_id.into(),
        }
    }
}

/// Trait for text-to-speech providers
///
/// Model, locale and sample rate are provider configuration; each request
/// only carries the text and the voice.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SpeechSynthesizer: Send + Sync {
    /// Fail with a configuration error when the provider cannot be used
    /// (for example, no API key). Called before any request is made.
    fn ensure_configured(&self) -> Result<()>;

    /// Start synthesis and stream the encoded audio
    async fn synthesize(&self, request: SynthesisRequest) -> Result<AudioStream>;

    /// Get the provider name (e.g., "murf")
    fn name(&self) -> &str;
}
