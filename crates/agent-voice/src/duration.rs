//! Clip duration estimates
//!
//! Clips are mono 16-bit PCM at 24 kHz, so one second of audio is 48 000
//! bytes. The estimate ignores the WAV header and never goes below five
//! seconds, which keeps very short clips on screen long enough to notice.

use std::time::Duration;

/// Bytes of audio per second of playback
pub const BYTES_PER_SECOND: u64 = 48_000;

/// Shortest estimate ever returned
pub const MIN_CLIP_DURATION: Duration = Duration::from_secs(5);

/// `max(5 s, byte_size / 48000 s)`
pub fn estimate_duration(byte_size: u64) -> Duration {
    let seconds = byte_size as f64 / BYTES_PER_SECOND as f64;
    Duration::from_secs_f64(seconds).max(MIN_CLIP_DURATION)
}
