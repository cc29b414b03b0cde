//! Playback surface trait
//!
//! The surface is whatever shows playback to the user: it highlights the
//! active agent, exposes the current clip, shows a countdown and announces
//! the end. All methods but [`PlaybackSurface::present`] default to no-ops.

use std::time::Duration;

use agent_core::AgentId;

use crate::{PlaybackClip, Result};

/// Receives playback callbacks from the driver
pub trait PlaybackSurface {
    /// Called when the active agent changes; `None` clears the highlight
    fn highlight(&mut self, _agent: Option<&AgentId>) {}

    /// Called when a clip becomes current
    fn present(&mut self, clip: &PlaybackClip) -> Result<()>;

    /// Called before each wait with the time left on the current clip
    fn countdown(&mut self, _agent: &AgentId, _remaining: Duration) {}

    /// Called once when the last clip has run out
    fn finished(&mut self) {}
}

/// Surface that ignores everything
#[derive(Debug, Default, Clone, Copy)]
pub struct NoOpSurface;

impl PlaybackSurface for NoOpSurface {
    fn present(&mut self, _clip: &PlaybackClip) -> Result<()> {
        Ok(())
    }
}
