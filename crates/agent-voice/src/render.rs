//! Per-agent clip rendering
//!
//! Each agent message becomes one WAV file named after the agent, spoken
//! with the agent's voice and prefixed with "<Agent Name> speaking: ". The
//! batch stops at the first failure; files already written stay on disk.

use std::path::{Path, PathBuf};
use std::time::Duration;

use agent_core::{AgentId, AgentMessage};
use futures::StreamExt;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info, instrument};

use crate::duration::estimate_duration;
use crate::{Result, SpeechSynthesizer, SynthesisRequest, VoiceError, VoiceMap};

/// An audio file on disk with its size and estimated playback length
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioFile {
    pub path: PathBuf,
    pub byte_size: u64,
    pub duration: Duration,
}

impl AudioFile {
    fn new(path: PathBuf, byte_size: u64) -> Self {
        Self {
            path,
            byte_size,
            duration: estimate_duration(byte_size),
        }
    }
}

/// One agent's rendered clip
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedClip {
    pub agent: AgentId,
    pub audio: AudioFile,
}

impl RenderedClip {
    pub fn path(&self) -> &Path {
        &self.audio.path
    }

    pub fn duration(&self) -> Duration {
        self.audio.duration
    }
}

/// Rendered clips in the order their messages were given
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClipSet {
    clips: Vec<RenderedClip>,
}

impl ClipSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.clips.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clips.is_empty()
    }

    pub fn get(&self, agent: &AgentId) -> Option<&RenderedClip> {
        self.clips.iter().find(|clip| &clip.agent == agent)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, RenderedClip> {
        self.clips.iter()
    }

    pub fn agents(&self) -> impl Iterator<Item = &AgentId> {
        self.clips.iter().map(|clip| &clip.agent)
    }

    pub fn clear(&mut self) {
        self.clips.clear();
    }

    fn push(&mut self, clip: RenderedClip) {
        self.clips.push(clip);
    }
}

impl<'a> IntoIterator for &'a ClipSet {
    type Item = &'a RenderedClip;
    type IntoIter = std::slice::Iter<'a, RenderedClip>;

    fn into_iter(self) -> Self::IntoIter {
        self.clips.iter()
    }
}

impl IntoIterator for ClipSet {
    type Item = RenderedClip;
    type IntoIter = std::vec::IntoIter<RenderedClip>;

    fn into_iter(self) -> Self::IntoIter {
        self.clips.into_iter()
    }
}

/// Failure while streaming one file to disk
enum StreamFailure {
    Request(VoiceError),
    Write(std::io::Error),
}

/// Renders agent messages into per-agent clips
pub struct ClipRenderer<S> {
    synthesizer: S,
    voices: VoiceMap,
    output_dir: PathBuf,
}

impl<S: SpeechSynthesizer> ClipRenderer<S> {
    pub fn new(synthesizer: S, voices: VoiceMap, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            synthesizer,
            voices,
            output_dir: output_dir.into(),
        }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    pub fn voices(&self) -> &VoiceMap {
        &self.voices
    }

    /// Path of an agent's clip: `<output_dir>/<wire id>_audio.wav`
    pub fn clip_path(&self, agent: &AgentId) -> PathBuf {
        self.output_dir.join(format!("{}_audio.wav", agent.wire_id()))
    }

    /// Render one clip per non-blank message.
    ///
    /// Fails before any request when the synthesizer is not configured, and
    /// with [`VoiceError::NothingToRender`] when `messages` is empty.
    #[instrument(skip(self, messages), fields(provider = self.synthesizer.name(), count = messages.len()))]
    pub async fn render(&self, messages: &[AgentMessage]) -> Result<ClipSet> {
        self.synthesizer.ensure_configured()?;
        if messages.is_empty() {
            return Err(VoiceError::NothingToRender);
        }

        let mut clips = ClipSet::new();
        for message in messages {
            if message.is_blank() {
                debug!(agent = %message.agent(), "skipping blank message");
                continue;
            }

            let agent = message.agent().clone();
            let voice_id = self.voices.voice_for(&agent).to_string();
            let text = format!("{} speaking: {}", agent.display_name(), message.text());
            let path = self.clip_path(&agent);

            info!(agent = %agent, voice = %voice_id, "Generating voice clip");
            let byte_size = self
                .stream_to_file(SynthesisRequest::new(text, voice_id), &path)
                .await
                .map_err(|failure| match failure {
                    StreamFailure::Request(source) => VoiceError::ClipRequest {
                        agent: agent.wire_id().to_string(),
                        source: Box::new(source),
                    },
                    StreamFailure::Write(source) => VoiceError::ClipWrite {
                        agent: agent.wire_id().to_string(),
                        path: path.clone(),
                        source,
                    },
                })?;

            info!(agent = %agent, path = %path.display(), bytes = byte_size, "Audio saved");
            clips.push(RenderedClip {
                agent,
                audio: AudioFile::new(path, byte_size),
            });
        }

        Ok(clips)
    }

    /// Render a single text to `path` with the given voice, or the default
    /// voice when none is given.
    #[instrument(skip(self, text), fields(provider = self.synthesizer.name()))]
    pub async fn render_text(&self, text: &str, voice_id: Option<&str>, path: &Path) -> Result<AudioFile> {
        self.synthesizer.ensure_configured()?;
        if text.trim().is_empty() {
            return Err(VoiceError::EmptyText);
        }

        let voice_id = voice_id.unwrap_or_else(|| self.voices.default_voice());
        let byte_size = self
            .stream_to_file(SynthesisRequest::new(text, voice_id), path)
            .await
            .map_err(|failure| match failure {
                StreamFailure::Request(source) => source,
                StreamFailure::Write(source) => VoiceError::Io(source),
            })?;

        info!(path = %path.display(), bytes = byte_size, "Voice output saved");
        Ok(AudioFile::new(path.to_path_buf(), byte_size))
    }

    /// Stream synthesized audio into `path`, returning the bytes written
    async fn stream_to_file(
        &self,
        request: SynthesisRequest,
        path: &Path,
    ) -> std::result::Result<u64, StreamFailure> {
        let mut audio = self
            .synthesizer
            .synthesize(request)
            .await
            .map_err(StreamFailure::Request)?;

        let mut file = tokio::fs::File::create(path)
            .await
            .map_err(StreamFailure::Write)?;

        let mut written = 0u64;
        while let Some(chunk) = audio.next().await {
            let chunk = chunk.map_err(StreamFailure::Request)?;
            file.write_all(&chunk).await.map_err(StreamFailure::Write)?;
            written += chunk.len() as u64;
        }
        file.flush().await.map_err(StreamFailure::Write)?;

        Ok(written)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::synthesis::MockSpeechSynthesizer;
    use bytes::Bytes;
    use mockall::predicate::function;

    fn configured() -> MockSpeechSynthesizer {
        let mut mock = MockSpeechSynthesizer::new();
        mock.expect_ensure_configured().returning(|| Ok(()));
        mock.expect_name().return_const("mock".to_string());
        mock
    }

    fn audio_of(size: usize) -> crate::AudioStream {
        let half = size / 2;
        let chunks: Vec<Result<Bytes>> = vec![
            Ok(Bytes::from(vec![1u8; half])),
            Ok(Bytes::from(vec![2u8; size - half])),
        ];
        Box::pin(futures::stream::iter(chunks))
    }

    #[tokio::test]
    async fn test_renders_one_clip_per_agent() {
        let dir = tempfile::tempdir().unwrap();
        let mut synth = configured();
        synth
            .expect_synthesize()
            .with(function(|req: &SynthesisRequest| {
                req.voice_id == "Matthew" && req.text == "Stock Finder Agent speaking: RELIANCE, TCS"
            }))
            .times(1)
            .returning(|_| Ok(audio_of(96_000)));
        synth
            .expect_synthesize()
            .with(function(|req: &SynthesisRequest| {
                req.voice_id == "Emily" && req.text.starts_with("Supervisor speaking: ")
            }))
            .times(1)
            .returning(|_| Ok(audio_of(480_000)));

        let renderer = ClipRenderer::new(synth, VoiceMap::default(), dir.path());
        let clips = renderer
            .render(&[
                AgentMessage::new(AgentId::StockFinder, "RELIANCE, TCS"),
                AgentMessage::new(AgentId::Supervisor, "FINAL VERDICT: BUY"),
            ])
            .await
            .unwrap();

        assert_eq!(clips.len(), 2);
        let agents: Vec<_> = clips.agents().cloned().collect();
        assert_eq!(agents, vec![AgentId::StockFinder, AgentId::Supervisor]);

        let finder = clips.get(&AgentId::StockFinder).unwrap();
        assert_eq!(finder.path(), dir.path().join("stock_finder_agent_audio.wav"));
        assert_eq!(finder.audio.byte_size, 96_000);
        assert_eq!(finder.duration(), Duration::from_secs(5));
        assert_eq!(std::fs::metadata(finder.path()).unwrap().len(), 96_000);

        let supervisor = clips.get(&AgentId::Supervisor).unwrap();
        assert_eq!(supervisor.duration(), Duration::from_secs(10));
    }

    #[tokio::test]
    async fn test_blank_messages_are_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let mut synth = configured();
        synth
            .expect_synthesize()
            .times(1)
            .returning(|_| Ok(audio_of(1_000)));

        let renderer = ClipRenderer::new(synth, VoiceMap::default(), dir.path());
        let clips = renderer
            .render(&[
                AgentMessage::new(AgentId::MarketData, "   "),
                AgentMessage::new(AgentId::NewsAnalyst, "Positive coverage for INFY"),
            ])
            .await
            .unwrap();

        assert_eq!(clips.len(), 1);
        assert!(clips.get(&AgentId::MarketData).is_none());
        assert!(clips.get(&AgentId::NewsAnalyst).is_some());
        assert!(!dir.path().join("market_data_agent_audio.wav").exists());
    }

    #[tokio::test]
    async fn test_missing_credential_fails_before_any_request() {
        let dir = tempfile::tempdir().unwrap();
        let mut synth = MockSpeechSynthesizer::new();
        synth.expect_ensure_configured().returning(|| {
            Err(VoiceError::ConfigurationError(
                "Voice generation requires MURF_API_KEY to be set in environment variables.".into(),
            ))
        });
        synth.expect_name().return_const("mock".to_string());
        synth.expect_synthesize().never();

        let renderer = ClipRenderer::new(synth, VoiceMap::default(), dir.path());
        let err = renderer
            .render(&[AgentMessage::new(AgentId::Supervisor, "verdict")])
            .await
            .unwrap_err();

        assert!(err.is_configuration());
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn test_empty_batch() {
        let renderer = ClipRenderer::new(configured(), VoiceMap::default(), ".");
        assert!(matches!(
            renderer.render(&[]).await,
            Err(VoiceError::NothingToRender)
        ));
    }

    #[tokio::test]
    async fn test_request_failure_names_agent_and_stops_batch() {
        let dir = tempfile::tempdir().unwrap();
        let mut synth = configured();
        synth
            .expect_synthesize()
            .times(1)
            .returning(|_| Err(VoiceError::RateLimitExceeded("slow down".into())));

        let renderer = ClipRenderer::new(synth, VoiceMap::default(), dir.path());
        let err = renderer
            .render(&[
                AgentMessage::new(AgentId::MarketData, "prices"),
                AgentMessage::new(AgentId::Supervisor, "verdict"),
            ])
            .await
            .unwrap_err();

        match err {
            VoiceError::ClipRequest { agent, source } => {
                assert_eq!(agent, "market_data_agent");
                assert!(matches!(*source, VoiceError::RateLimitExceeded(_)));
            }
            other => panic!("expected ClipRequest, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_write_failure_names_path() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("does-not-exist");
        let mut synth = configured();
        synth
            .expect_synthesize()
            .returning(|_| Ok(audio_of(10)));

        let renderer = ClipRenderer::new(synth, VoiceMap::default(), &missing);
        let err = renderer
            .render(&[AgentMessage::new(AgentId::NewsAnalyst, "headlines")])
            .await
            .unwrap_err();

        match err {
            VoiceError::ClipWrite { agent, path, .. } => {
                assert_eq!(agent, "news_analyst_agent");
                assert_eq!(path, missing.join("news_analyst_agent_audio.wav"));
            }
            other => panic!("expected ClipWrite, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_unknown_agent_uses_default_voice() {
        let dir = tempfile::tempdir().unwrap();
        let mut synth = configured();
        synth
            .expect_synthesize()
            .with(function(|req: &SynthesisRequest| {
                req.voice_id == "Matthew" && req.text.starts_with("Risk Desk speaking: ")
            }))
            .returning(|_| Ok(audio_of(10)));

        let renderer = ClipRenderer::new(synth, VoiceMap::default(), dir.path());
        let clips = renderer
            .render(&[AgentMessage::new(AgentId::Other("risk_desk".into()), "hedged")])
            .await
            .unwrap();
        assert!(dir.path().join("risk_desk_audio.wav").exists());
        assert_eq!(clips.len(), 1);
    }

    #[tokio::test]
    async fn test_render_text() {
        let dir = tempfile::tempdir().unwrap();
        let mut synth = configured();
        synth
            .expect_synthesize()
            .with(function(|req: &SynthesisRequest| {
                req.voice_id == "Matthew" && req.text == "Markets closed higher"
            }))
            .returning(|_| Ok(audio_of(600_000)));

        let renderer = ClipRenderer::new(synth, VoiceMap::default(), dir.path());
        let path = dir.path().join("output.wav");
        let file = renderer
            .render_text("Markets closed higher", None, &path)
            .await
            .unwrap();

        assert_eq!(file.path, path);
        assert_eq!(file.duration, Duration::from_millis(12_500));
    }

    #[tokio::test]
    async fn test_render_text_rejects_blank() {
        let renderer = ClipRenderer::new(configured(), VoiceMap::default(), ".");
        assert!(matches!(
            renderer.render_text("  ", Some("Ken"), Path::new("x.wav")).await,
            Err(VoiceError::EmptyText)
        ));
    }
}
