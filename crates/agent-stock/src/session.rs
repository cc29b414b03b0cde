//! Per-session state
//!
//! One [`SessionState`] lives for the whole front-end session and is passed
//! by `&mut` into every handling turn. Starting an analysis run always
//! resets the voice and playback fields through
//! [`SessionState::reset_voice_state`].

use std::collections::BTreeMap;

use agent_core::{AgentId, AgentMessage};
use agent_playback::{PlaybackClip, Sequencer};
use agent_voice::ClipSet;
use chrono::{DateTime, Utc};
use sha2::{Digest, Sha256};
use uuid::Uuid;

use crate::analysis::AnalysisOutcome;

pub const DEFAULT_QUERY: &str =
    "Find 2 promising NSE stocks and provide detailed analysis with buy/sell recommendations";

/// SHA-256 hex digest identifying a recording
pub fn audio_digest(audio: &[u8]) -> String {
    hex::encode(Sha256::digest(audio))
}

/// Mutable state for one user session
#[derive(Debug, Clone)]
pub struct SessionState {
    pub session_id: Uuid,
    pub created_at: DateTime<Utc>,
    query: String,
    last_audio_digest: Option<String>,
    auto_run: bool,
    last_run: Option<Uuid>,
    outputs: BTreeMap<AgentId, String>,
    transcript: Vec<AgentMessage>,
    analysis_complete: bool,
    voice_playing: bool,
    clips: ClipSet,
    sequencer: Sequencer,
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionState {
    pub fn new() -> Self {
        Self {
            session_id: Uuid::new_v4(),
            created_at: Utc::now(),
            query: DEFAULT_QUERY.to_string(),
            last_audio_digest: None,
            auto_run: false,
            last_run: None,
            outputs: BTreeMap::new(),
            transcript: Vec::new(),
            analysis_complete: false,
            voice_playing: false,
            clips: ClipSet::new(),
            sequencer: Sequencer::default(),
        }
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    /// Replace the query; blank text keeps the current one
    pub fn set_query(&mut self, query: impl Into<String>) -> bool {
        let query = query.into();
        if query.trim().is_empty() {
            return false;
        }
        self.query = query.trim().to_string();
        true
    }

    /// Whether this recording has not been transcribed yet
    pub fn is_new_audio(&self, digest: &str) -> bool {
        self.last_audio_digest.as_deref() != Some(digest)
    }

    /// Remember a recording as transcribed, whatever the outcome
    pub fn mark_audio_processed(&mut self, digest: impl Into<String>) {
        self.last_audio_digest = Some(digest.into());
    }

    /// Forget the last recording so it can be transcribed again
    pub fn reset_audio(&mut self) {
        self.last_audio_digest = None;
    }

    pub fn last_audio_digest(&self) -> Option<&str> {
        self.last_audio_digest.as_deref()
    }

    /// Ask for an analysis run at the next opportunity
    pub fn request_auto_run(&mut self) {
        self.auto_run = true;
    }

    /// Consume the auto-run flag
    pub fn take_auto_run(&mut self) -> bool {
        std::mem::take(&mut self.auto_run)
    }

    /// Clear everything a previous run left for voice output: analysis and
    /// voice flags, rendered clips, play list, index and active agent.
    pub fn reset_voice_state(&mut self) {
        self.analysis_complete = false;
        self.voice_playing = false;
        self.clips.clear();
        self.sequencer.reset();
    }

    /// Store the results of a finished run
    pub fn record_analysis(&mut self, outcome: AnalysisOutcome) {
        self.last_run = Some(outcome.run_id);
        self.outputs = outcome.outputs;
        self.transcript = outcome.transcript;
        self.analysis_complete = true;
    }

    pub fn last_run(&self) -> Option<Uuid> {
        self.last_run
    }

    pub fn outputs(&self) -> &BTreeMap<AgentId, String> {
        &self.outputs
    }

    pub fn transcript(&self) -> &[AgentMessage] {
        &self.transcript
    }

    pub fn is_analysis_complete(&self) -> bool {
        self.analysis_complete
    }

    pub fn is_voice_playing(&self) -> bool {
        self.voice_playing
    }

    pub fn set_voice_playing(&mut self, playing: bool) {
        self.voice_playing = playing;
    }

    /// Playback of the current run's clips has finished
    pub fn is_playback_complete(&self) -> bool {
        self.sequencer.is_complete()
    }

    /// Voice output should start: the analysis is done and playback has
    /// neither started nor finished
    pub fn needs_voice_output(&self) -> bool {
        self.analysis_complete && !self.voice_playing && !self.is_playback_complete()
    }

    pub fn clips(&self) -> &ClipSet {
        &self.clips
    }

    /// Store rendered clips and load them, in order, as the play list
    pub fn load_clips(&mut self, clips: ClipSet) {
        let playlist = clips
            .iter()
            .map(|clip| PlaybackClip::new(clip.agent.clone(), clip.path(), clip.duration()))
            .collect();
        self.sequencer.load(playlist);
        self.clips = clips;
    }

    pub fn active_agent(&self) -> Option<&AgentId> {
        self.sequencer.active_agent()
    }

    pub fn sequencer(&self) -> &Sequencer {
        &self.sequencer
    }

    pub fn sequencer_mut(&mut self) -> &mut Sequencer {
        &mut self.sequencer
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use agent_playback::PlaybackPhase;
    use tokio::time::Instant;

    use super::*;

    fn outcome(transcript: Vec<AgentMessage>) -> AnalysisOutcome {
        let outputs = transcript
            .iter()
            .map(|m| (m.agent().clone(), m.text().to_string()))
            .collect();
        AnalysisOutcome {
            run_id: Uuid::new_v4(),
            query: DEFAULT_QUERY.to_string(),
            started_at: Utc::now(),
            finished_at: Utc::now(),
            updates: transcript.len(),
            outputs,
            transcript,
        }
    }

    #[test]
    fn test_new_session_defaults() {
        let session = SessionState::new();
        assert_eq!(session.query(), DEFAULT_QUERY);
        assert!(!session.is_analysis_complete());
        assert!(!session.is_voice_playing());
        assert!(session.clips().is_empty());
        assert_eq!(session.sequencer().phase(), PlaybackPhase::Idle);
        assert!(!session.needs_voice_output());
    }

    #[test]
    fn test_set_query_ignores_blank() {
        let mut session = SessionState::new();
        assert!(!session.set_query("   "));
        assert_eq!(session.query(), DEFAULT_QUERY);
        assert!(session.set_query("  Analyse INFY  "));
        assert_eq!(session.query(), "Analyse INFY");
    }

    #[test]
    fn test_audio_digest_tracking() {
        let mut session = SessionState::new();
        let digest = audio_digest(b"RIFF....WAVE");
        assert_eq!(digest.len(), 64);
        assert_eq!(digest, audio_digest(b"RIFF....WAVE"));
        assert_ne!(digest, audio_digest(b"RIFF....WAVF"));

        assert!(session.is_new_audio(&digest));
        session.mark_audio_processed(digest.clone());
        assert!(!session.is_new_audio(&digest));

        session.reset_audio();
        assert!(session.is_new_audio(&digest));
    }

    #[test]
    fn test_auto_run_is_consumed() {
        let mut session = SessionState::new();
        assert!(!session.take_auto_run());
        session.request_auto_run();
        assert!(session.take_auto_run());
        assert!(!session.take_auto_run());
    }

    #[test]
    fn test_reset_voice_state_clears_playback() {
        let mut session = SessionState::new();
        session.record_analysis(outcome(vec![AgentMessage::new(AgentId::Supervisor, "verdict")]));
        session.set_voice_playing(true);
        session.sequencer_mut().load(vec![
            PlaybackClip::new(AgentId::StockFinder, "stock_finder_agent_audio.wav", Duration::from_secs(5)),
            PlaybackClip::new(AgentId::MarketData, "market_data_agent_audio.wav", Duration::from_secs(7)),
        ]);

        let start = Instant::now();
        session.sequencer_mut().tick(start);
        session.sequencer_mut().tick(start + Duration::from_secs(6));
        assert_eq!(session.sequencer().index(), 1);
        assert_eq!(session.active_agent(), Some(&AgentId::MarketData));

        session.reset_voice_state();

        assert!(!session.is_analysis_complete());
        assert!(!session.is_voice_playing());
        assert!(!session.is_playback_complete());
        assert!(session.clips().is_empty());
        assert!(session.active_agent().is_none());
        assert_eq!(session.sequencer().index(), 0);
        assert!(session.sequencer().playlist().is_empty());
    }

    #[test]
    fn test_record_analysis() {
        let mut session = SessionState::new();
        let recorded = outcome(vec![
            AgentMessage::new(AgentId::StockFinder, "picks"),
            AgentMessage::new(AgentId::Supervisor, "verdict"),
        ]);
        let run_id = recorded.run_id;
        session.record_analysis(recorded);

        assert!(session.is_analysis_complete());
        assert_eq!(session.last_run(), Some(run_id));
        assert_eq!(session.transcript().len(), 2);
        assert_eq!(session.outputs().get(&AgentId::Supervisor).map(String::as_str), Some("verdict"));
        assert!(session.needs_voice_output());
    }
}
