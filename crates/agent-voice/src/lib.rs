//! Voice layer for the stock analysis desk
//!
//! - [`SpeechSynthesizer`]: provider trait for streamed text-to-speech
//! - [`ClipRenderer`]: turns agent messages into one WAV clip per agent
//! - [`duration`]: playback length estimates from clip size
//! - [`recognition`]: speech-to-text with a primary and a fallback provider
//! - [`providers`]: Murf (speech and voice changer) and Google speech clients

pub mod config;
pub mod duration;
pub mod error;
pub mod providers;
pub mod recognition;
pub mod render;
pub mod synthesis;

// Re-export main types
pub use config::{VoiceConfig, VoiceMap};
pub use duration::estimate_duration;
pub use error::{Result, VoiceError};
pub use recognition::{SpeechRecognizer, Transcriber};
pub use render::{AudioFile, ClipRenderer, ClipSet, RenderedClip};
pub use synthesis::{AudioStream, SpeechSynthesizer, SynthesisRequest};
