//! Clip timer and refresh cadence

use std::time::Duration;

use tokio::time::Instant;

/// Fastest refresh while a clip is playing
pub const MIN_REFRESH: Duration = Duration::from_millis(1_000);

/// Slowest refresh while a clip is playing
pub const MAX_REFRESH: Duration = Duration::from_millis(3_000);

/// Tracks how long the current clip has been playing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClipTimer {
    started: Instant,
    duration: Duration,
}

impl ClipTimer {
    pub fn new(started: Instant, duration: Duration) -> Self {
        Self { started, duration }
    }

    pub fn started(&self) -> Instant {
        self.started
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }

    /// Time since the clip started; zero if `now` is before the start
    pub fn elapsed(&self, now: Instant) -> Duration {
        now.saturating_duration_since(self.started)
    }

    /// Time left before the clip's estimated end
    pub fn remaining(&self, now: Instant) -> Duration {
        self.duration.saturating_sub(self.elapsed(now))
    }

    pub fn is_elapsed(&self, now: Instant) -> bool {
        self.elapsed(now) >= self.duration
    }
}

/// Half a second per whole remaining second, clamped to 1–3 s
pub fn refresh_interval(remaining: Duration) -> Duration {
    Duration::from_millis(remaining.as_secs().saturating_mul(500)).clamp(MIN_REFRESH, MAX_REFRESH)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timer_progress() {
        let start = Instant::now();
        let timer = ClipTimer::new(start, Duration::from_secs(5));

        assert_eq!(timer.remaining(start), Duration::from_secs(5));
        assert!(!timer.is_elapsed(start + Duration::from_millis(4_999)));
        assert!(timer.is_elapsed(start + Duration::from_secs(5)));
        assert_eq!(timer.remaining(start + Duration::from_secs(9)), Duration::ZERO);
    }

    #[test]
    fn test_timer_before_start() {
        let start = Instant::now() + Duration::from_secs(60);
        let timer = ClipTimer::new(start, Duration::from_secs(5));
        assert_eq!(timer.elapsed(Instant::now()), Duration::ZERO);
        assert_eq!(timer.remaining(Instant::now()), Duration::from_secs(5));
    }

    #[test]
    fn test_refresh_interval_cadence() {
        assert_eq!(refresh_interval(Duration::ZERO), MIN_REFRESH);
        assert_eq!(refresh_interval(Duration::from_millis(1_900)), MIN_REFRESH);
        assert_eq!(refresh_interval(Duration::from_secs(3)), Duration::from_millis(1_500));
        assert_eq!(refresh_interval(Duration::from_secs(5)), Duration::from_millis(2_500));
        assert_eq!(refresh_interval(Duration::from_secs(6)), MAX_REFRESH);
        assert_eq!(refresh_interval(Duration::MAX), MAX_REFRESH);
    }

    #[test]
    fn test_refresh_interval_bounds() {
        for millis in (0..120_000).step_by(250) {
            let interval = refresh_interval(Duration::from_millis(millis));
            assert!((MIN_REFRESH..=MAX_REFRESH).contains(&interval));
        }
    }
}
