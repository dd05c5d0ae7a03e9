//! Rate limiter for byte progress.

use std::time::{Duration, Instant};

/// Default minimum spacing between progress events.
pub const DEFAULT_INTERVAL: Duration = Duration::from_millis(100);

/// Decides which `(downloaded, total)` updates are worth emitting.
///
/// The first update and the final one (`downloaded == total`) always pass;
/// everything else is limited to one per interval and must have moved.
#[derive(Debug)]
pub struct ProgressThrottle {
    last_emit: Option<Instant>,
    last_downloaded: u64,
    min_interval: Duration,
}

impl ProgressThrottle {
    pub const fn new(min_interval: Duration) -> Self {
        Self {
            last_emit: None,
            last_downloaded: 0,
            min_interval,
        }
    }

    /// Whether this update should become an event.
    pub fn should_emit(&mut self, downloaded: u64, total: u64) -> bool {
        let now = Instant::now();
        let finished = total > 0 && downloaded >= total;
        let due = match self.last_emit {
            None => true,
            Some(last) => now.duration_since(last) >= self.min_interval,
        };

        let moved = downloaded > self.last_downloaded;
        if (finished && downloaded != self.last_downloaded) || (due && moved) {
            self.last_emit = Some(now);
            self.last_downloaded = downloaded;
            true
        } else {
            false
        }
    }

    /// Start over for a new attempt.
    pub const fn reset(&mut self) {
        self.last_emit = None;
        self.last_downloaded = 0;
    }
}

impl Default for ProgressThrottle {
    fn default() -> Self {
        Self::new(DEFAULT_INTERVAL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_update_passes() {
        let mut throttle = ProgressThrottle::default();
        assert!(throttle.should_emit(10, 100));
    }

    #[test]
    fn test_respects_interval() {
        let mut throttle = ProgressThrottle::new(Duration::from_millis(50));
        assert!(throttle.should_emit(10, 100));
        assert!(!throttle.should_emit(20, 100));

        std::thread::sleep(Duration::from_millis(60));
        assert!(throttle.should_emit(30, 100));
    }

    #[test]
    fn test_final_update_always_passes_once() {
        let mut throttle = ProgressThrottle::new(Duration::from_secs(60));
        assert!(throttle.should_emit(10, 100));
        assert!(throttle.should_emit(100, 100));
        assert!(!throttle.should_emit(100, 100));
    }

    #[test]
    fn test_stalled_progress_is_dropped() {
        let mut throttle = ProgressThrottle::new(Duration::ZERO);
        assert!(throttle.should_emit(10, 0));
        assert!(!throttle.should_emit(10, 0));
        assert!(throttle.should_emit(11, 0));
    }

    #[test]
    fn test_reset() {
        let mut throttle = ProgressThrottle::new(Duration::from_secs(60));
        assert!(throttle.should_emit(10, 100));
        assert!(!throttle.should_emit(20, 100));

        throttle.reset();
        assert!(throttle.should_emit(5, 100));
    }
}
