//! Sequential voice playback
//!
//! Agents speak one after another. The [`Sequencer`] owns the play list and
//! decides, on every [`Sequencer::tick`], whether the current clip has run
//! its estimated length. The [`PlaybackDriver`] ticks it on the tokio timer
//! and forwards what happens to a [`PlaybackSurface`].
//!
//! ```text
//! Idle ──start──▶ Playing(0) ──elapsed──▶ Playing(1) ─ … ─▶ Complete
//! ```

pub mod driver;
pub mod error;
pub mod sequencer;
pub mod surface;
pub mod timer;

pub use driver::{PlaybackDriver, PlaybackReport};
pub use error::{PlaybackError, Result};
pub use sequencer::{PlaybackClip, PlaybackEvent, PlaybackPhase, Sequencer, Tick, TickStatus};
pub use surface::{NoOpSurface, PlaybackSurface};
pub use timer::{ClipTimer, refresh_interval};
