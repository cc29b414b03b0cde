//! Async playback driver

use tokio::time::Instant;
use tracing::{info, warn};

use crate::{PlaybackEvent, PlaybackSurface, Sequencer, TickStatus};

/// Summary of one playback run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PlaybackReport {
    /// Clips handed to the surface
    pub presented: usize,
    /// Clips the surface failed to present
    pub failed: usize,
}

/// Ticks a [`Sequencer`] to completion on the tokio timer
pub struct PlaybackDriver<'a, S: PlaybackSurface> {
    surface: &'a mut S,
}

impl<'a, S: PlaybackSurface> PlaybackDriver<'a, S> {
    pub fn new(surface: &'a mut S) -> Self {
        Self { surface }
    }

    /// Run until the sequencer completes.
    ///
    /// A surface that fails to present a clip does not stop the timer; the
    /// clip's slot still elapses and the failure is counted in the report.
    pub async fn run(&mut self, sequencer: &mut Sequencer) -> PlaybackReport {
        let mut report = PlaybackReport::default();

        loop {
            let tick = sequencer.tick(Instant::now());

            for event in tick.events {
                match event {
                    PlaybackEvent::Present { index, clip } => {
                        self.surface.highlight(Some(&clip.agent));
                        report.presented += 1;
                        if let Err(e) = self.surface.present(&clip) {
                            warn!(index, agent = %clip.agent, error = %e, "surface could not present clip");
                            report.failed += 1;
                        }
                    }
                    PlaybackEvent::Finished => {
                        self.surface.highlight(None);
                        self.surface.finished();
                    }
                }
            }

            match tick.status {
                TickStatus::Waiting {
                    agent,
                    remaining,
                    refresh,
                } => {
                    self.surface.countdown(&agent, remaining);
                    tokio::time::sleep(refresh).await;
                }
                TickStatus::Complete => break,
            }
        }

        info!(presented = report.presented, failed = report.failed, "Voice output complete");
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{PlaybackClip, PlaybackError, Result};
    use agent_core::AgentId;
    use std::time::Duration;

    #[derive(Default)]
    struct RecordingSurface {
        highlights: Vec<Option<AgentId>>,
        presented: Vec<AgentId>,
        countdowns: Vec<(AgentId, Duration)>,
        finished: usize,
        fail_for: Option<AgentId>,
    }

    impl PlaybackSurface for RecordingSurface {
        fn highlight(&mut self, agent: Option<&AgentId>) {
            self.highlights.push(agent.cloned());
        }

        fn present(&mut self, clip: &PlaybackClip) -> Result<()> {
            self.presented.push(clip.agent.clone());
            if self.fail_for.as_ref() == Some(&clip.agent) {
                return Err(PlaybackError::Output("no device".to_string()));
            }
            Ok(())
        }

        fn countdown(&mut self, agent: &AgentId, remaining: Duration) {
            self.countdowns.push((agent.clone(), remaining));
        }

        fn finished(&mut self) {
            self.finished += 1;
        }
    }

    fn playlist() -> Vec<PlaybackClip> {
        vec![
            PlaybackClip::new(AgentId::StockFinder, "a.wav", Duration::from_secs(5)),
            PlaybackClip::new(AgentId::MarketData, "b.wav", Duration::from_secs(7)),
        ]
    }

    #[tokio::test(start_paused = true)]
    async fn test_plays_clips_in_order() {
        let mut surface = RecordingSurface::default();
        let mut sequencer = Sequencer::new(playlist());
        let started = Instant::now();

        let report = PlaybackDriver::new(&mut surface).run(&mut sequencer).await;

        assert_eq!(report, PlaybackReport { presented: 2, failed: 0 });
        assert_eq!(surface.presented, vec![AgentId::StockFinder, AgentId::MarketData]);
        assert_eq!(
            surface.highlights,
            vec![Some(AgentId::StockFinder), Some(AgentId::MarketData), None]
        );
        assert_eq!(surface.finished, 1);
        assert!(sequencer.is_complete());

        // 5 s + 7 s of clips, overshooting by at most one refresh per clip
        let elapsed = started.elapsed();
        assert!(elapsed >= Duration::from_secs(12), "elapsed {elapsed:?}");
        assert!(elapsed <= Duration::from_secs(14), "elapsed {elapsed:?}");
    }

    #[tokio::test(start_paused = true)]
    async fn test_countdown_uses_adaptive_refresh() {
        let mut surface = RecordingSurface::default();
        let mut sequencer = Sequencer::new(playlist());

        PlaybackDriver::new(&mut surface).run(&mut sequencer).await;

        let first = &surface.countdowns[0];
        assert_eq!(first, &(AgentId::StockFinder, Duration::from_secs(5)));
        assert!(surface
            .countdowns
            .iter()
            .all(|(_, remaining)| *remaining <= Duration::from_secs(7)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_surface_error_does_not_stall() {
        let mut surface = RecordingSurface {
            fail_for: Some(AgentId::StockFinder),
            ..RecordingSurface::default()
        };
        let mut sequencer = Sequencer::new(playlist());

        let report = PlaybackDriver::new(&mut surface).run(&mut sequencer).await;

        assert_eq!(report, PlaybackReport { presented: 2, failed: 1 });
        assert_eq!(surface.finished, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_empty_playlist_finishes() {
        let mut surface = RecordingSurface::default();
        let mut sequencer = Sequencer::default();

        let report = PlaybackDriver::new(&mut surface).run(&mut sequencer).await;

        assert_eq!(report, PlaybackReport::default());
        assert_eq!(surface.finished, 1);
        assert!(surface.countdowns.is_empty());
    }
}
