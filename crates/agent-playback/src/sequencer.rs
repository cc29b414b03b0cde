//! Playback sequencer
//!
//! Holds the play list, the current index, the per-agent clip start times and
//! the active-agent marker. Only [`Sequencer::tick`] and the reset methods
//! mutate it; the index never moves backwards while clips are playing and
//! returns to 0 once the last clip has run out.

use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

use agent_core::AgentId;
use tokio::time::Instant;
use tracing::debug;

use crate::timer::{ClipTimer, refresh_interval};

/// One entry of the play list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaybackClip {
    pub agent: AgentId,
    pub path: PathBuf,
    pub duration: Duration,
}

impl PlaybackClip {
    pub fn new(agent: AgentId, path: impl Into<PathBuf>, duration: Duration) -> Self {
        Self {
            agent,
            path: path.into(),
            duration,
        }
    }
}

/// Where the sequencer is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackPhase {
    Idle,
    Playing(usize),
    Complete,
}

/// Something the surface should show
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlaybackEvent {
    /// A clip became current: highlight its agent and expose the audio
    Present { index: usize, clip: PlaybackClip },
    /// The last clip ran out
    Finished,
}

/// What the caller should do after a tick
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TickStatus {
    /// A clip is still playing; check again after `refresh`
    Waiting {
        agent: AgentId,
        remaining: Duration,
        refresh: Duration,
    },
    /// Nothing left to play
    Complete,
}

/// Result of one tick
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tick {
    pub events: Vec<PlaybackEvent>,
    pub status: TickStatus,
}

/// Sequential playback state machine
#[derive(Debug, Clone)]
pub struct Sequencer {
    playlist: Vec<PlaybackClip>,
    index: usize,
    started: HashMap<AgentId, Instant>,
    active: Option<AgentId>,
    phase: PlaybackPhase,
}

impl Default for Sequencer {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl Sequencer {
    pub fn new(playlist: Vec<PlaybackClip>) -> Self {
        Self {
            playlist,
            index: 0,
            started: HashMap::new(),
            active: None,
            phase: PlaybackPhase::Idle,
        }
    }

    /// Drop all playback state: empty play list, index 0, no active agent,
    /// no start times, back to idle.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Reset and install a new play list
    pub fn load(&mut self, playlist: Vec<PlaybackClip>) {
        *self = Self::new(playlist);
    }

    pub fn phase(&self) -> PlaybackPhase {
        self.phase
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn playlist(&self) -> &[PlaybackClip] {
        &self.playlist
    }

    pub fn active_agent(&self) -> Option<&AgentId> {
        self.active.as_ref()
    }

    pub fn is_complete(&self) -> bool {
        self.phase == PlaybackPhase::Complete
    }

    /// Clip at the current index, if one is playing
    pub fn current_clip(&self) -> Option<&PlaybackClip> {
        match self.phase {
            PlaybackPhase::Playing(i) => self.playlist.get(i),
            _ => None,
        }
    }

    /// Timer of the current clip, if one is playing
    pub fn current_timer(&self) -> Option<ClipTimer> {
        let clip = self.current_clip()?;
        let started = self.started.get(&clip.agent)?;
        Some(ClipTimer::new(*started, clip.duration))
    }

    /// Advance as far as `now` allows.
    ///
    /// Starts playback from idle, moves past every clip whose estimated
    /// duration has elapsed (a clip entered during this tick starts at
    /// `now`), and reports either the wait before the next check or
    /// completion.
    pub fn tick(&mut self, now: Instant) -> Tick {
        let mut events = Vec::new();

        loop {
            match self.phase {
                PlaybackPhase::Idle => {
                    if self.playlist.is_empty() {
                        self.complete(&mut events);
                    } else {
                        self.enter(0, now, &mut events);
                    }
                }
                PlaybackPhase::Playing(i) => {
                    let Some(timer) = self.current_timer() else {
                        // Start time lost; restart the clip from now
                        self.enter(i, now, &mut events);
                        continue;
                    };

                    if !timer.is_elapsed(now) {
                        let remaining = timer.remaining(now);
                        return Tick {
                            events,
                            status: TickStatus::Waiting {
                                agent: self.playlist[i].agent.clone(),
                                remaining,
                                refresh: refresh_interval(remaining),
                            },
                        };
                    }

                    self.started.remove(&self.playlist[i].agent);
                    let next = i + 1;
                    if next < self.playlist.len() {
                        debug!(from = i, to = next, "advancing playback");
                        self.enter(next, now, &mut events);
                    } else {
                        self.complete(&mut events);
                    }
                }
                PlaybackPhase::Complete => {
                    return Tick {
                        events,
                        status: TickStatus::Complete,
                    };
                }
            }
        }
    }

    fn enter(&mut self, index: usize, now: Instant, events: &mut Vec<PlaybackEvent>) {
        let clip = self.playlist[index].clone();
        self.index = index;
        self.phase = PlaybackPhase::Playing(index);
        self.active = Some(clip.agent.clone());
        self.started.entry(clip.agent.clone()).or_insert(now);
        debug!(index, agent = %clip.agent, "presenting clip");
        events.push(PlaybackEvent::Present { index, clip });
    }

    fn complete(&mut self, events: &mut Vec<PlaybackEvent>) {
        self.phase = PlaybackPhase::Complete;
        self.active = None;
        self.index = 0;
        debug!(clips = self.playlist.len(), "playback complete");
        events.push(PlaybackEvent::Finished);
    }
}
