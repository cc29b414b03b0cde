//! Terminal playback surface and progress output

use std::sync::Mutex;
use std::time::Duration;

use agent_core::AgentId;
use agent_playback::{PlaybackClip, PlaybackSurface};
use agent_stock::AnalysisEventHandler;
use agent_stock::interface::{COMPLETE_LINE, agent_circles, countdown_line, presenting_line};
use async_trait::async_trait;

/// Prints playback progress and, with the `speaker` feature, plays clips
/// through the default output device.
pub struct TerminalSurface {
    last_countdown: Option<u64>,
    #[cfg(feature = "speaker")]
    speaker: Option<speaker::Speaker>,
}

impl TerminalSurface {
    pub fn new() -> Self {
        Self {
            last_countdown: None,
            #[cfg(feature = "speaker")]
            speaker: speaker::Speaker::open(),
        }
    }
}

impl TerminalSurface {
    #[cfg(feature = "speaker")]
    fn play(&self, clip: &PlaybackClip) -> agent_playback::Result<()> {
        match &self.speaker {
            Some(speaker) => speaker.play(clip),
            None => Ok(()),
        }
    }

    #[cfg(not(feature = "speaker"))]
    fn play(&self, _clip: &PlaybackClip) -> agent_playback::Result<()> {
        Ok(())
    }
}

impl Default for TerminalSurface {
    fn default() -> Self {
        Self::new()
    }
}

impl PlaybackSurface for TerminalSurface {
    fn highlight(&mut self, agent: Option<&AgentId>) {
        self.last_countdown = None;
        println!("{}", agent_circles(agent));
        if let Some(agent) = agent {
            println!("{}", presenting_line(agent));
        }
    }

    fn present(&mut self, clip: &PlaybackClip) -> agent_playback::Result<()> {
        println!("   🔊 {}", clip.path.display());
        self.play(clip)
    }

    fn countdown(&mut self, _agent: &AgentId, remaining: Duration) {
        // One line per whole second
        let secs = remaining.as_secs();
        if self.last_countdown != Some(secs) {
            self.last_countdown = Some(secs);
            println!("   {}", countdown_line(remaining));
        }
    }

    fn finished(&mut self) {
        self.last_countdown = None;
        println!("{COMPLETE_LINE}");
    }
}

#[cfg(feature = "speaker")]
mod speaker {
    use std::fs::File;
    use std::io::BufReader;

    use agent_playback::{PlaybackClip, PlaybackError};
    use rodio::{Decoder, OutputStream, OutputStreamHandle, Sink};
    use tracing::warn;

    pub(super) struct Speaker {
        sink: Sink,
        _stream: OutputStream,
        _handle: OutputStreamHandle,
    }

    impl Speaker {
        /// Open the default output device; without one, clips are only listed
        pub(super) fn open() -> Option<Self> {
            let (stream, handle) = match OutputStream::try_default() {
                Ok(pair) => pair,
                Err(e) => {
                    warn!(error = %e, "no audio output device");
                    return None;
                }
            };
            match Sink::try_new(&handle) {
                Ok(sink) => Some(Self {
                    sink,
                    _stream: stream,
                    _handle: handle,
                }),
                Err(e) => {
                    warn!(error = %e, "could not create audio sink");
                    None
                }
            }
        }

        /// Queue a clip; it starts once the previous one has drained
        pub(super) fn play(&self, clip: &PlaybackClip) -> agent_playback::Result<()> {
            let present_error = |reason: String| PlaybackError::Present {
                path: clip.path.display().to_string(),
                reason,
            };
            let file = File::open(&clip.path).map_err(|e| present_error(e.to_string()))?;
            let source =
                Decoder::new(BufReader::new(file)).map_err(|e| present_error(e.to_string()))?;
            self.sink.append(source);
            Ok(())
        }
    }
}

/// Prints analysis status lines, skipping repeats
#[derive(Default)]
pub struct ConsoleProgress {
    last: Mutex<Option<String>>,
}

#[async_trait]
impl AnalysisEventHandler for ConsoleProgress {
    async fn on_status(&self, status: &str) {
        let Ok(mut last) = self.last.lock() else {
            return;
        };
        if last.as_deref() != Some(status) {
            println!("{status}");
            *last = Some(status.to_string());
        }
    }

    async fn on_error(&self, _error: &str) {
        if let Ok(mut last) = self.last.lock() {
            *last = None;
        }
    }

    async fn on_complete(&self, _outcome: &agent_stock::AnalysisOutcome) {
        if let Ok(mut last) = self.last.lock() {
            *last = None;
        }
    }
}
