//! Voice provider implementations

pub mod google;
pub mod murf;

pub use google::{GoogleSpeechClient, GoogleSpeechConfig};
pub use murf::{MurfClient, MurfConfig, MurfTranscriber};
