//! Frame clock for debounce and throttle timing.
//!
//! All per-frame timing decisions (hold promotion, key-press
//! throttling) are made against milliseconds elapsed since the
//! keybinder was started. The clock hands out `f64` milliseconds so
//! the hot path can compare directly against configured thresholds
//! like `hold_trigger_ms` and `throttle_ms`, and so tests can drive
//! the same code with simulated timestamps.

use std::time::Instant;

/// A monotonic clock anchored to a fixed epoch (the moment the
/// keybinder started).
#[derive(Debug, Clone)]
pub struct FrameClock {
    /// The instant the clock was started.
    epoch: Instant,

    /// Wall-clock time at epoch (ISO 8601 string).
    epoch_wall: String,
}

impl FrameClock {
    /// Create a new clock anchored to now.
    pub fn start() -> Self {
        Self {
            epoch: Instant::now(),
            epoch_wall: chrono::Utc::now().to_rfc3339(),
        }
    }

    /// Milliseconds elapsed since the epoch.
    pub fn elapsed_ms(&self) -> f64 {
        self.epoch.elapsed().as_secs_f64() * 1000.0
    }

    /// Seconds elapsed since the epoch.
    pub fn elapsed_secs(&self) -> f64 {
        self.epoch.elapsed().as_secs_f64()
    }

    /// Wall-clock time at the epoch.
    pub fn epoch_wall(&self) -> &str {
        &self.epoch_wall
    }

    /// The underlying epoch instant.
    pub fn epoch(&self) -> Instant {
        self.epoch
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clock_elapsed_is_small_and_nonnegative() {
        let clock = FrameClock::start();
        let ms = clock.elapsed_ms();
        assert!(ms >= 0.0);
        assert!(ms < 1000.0);
    }

    #[test]
    fn test_elapsed_units_agree() {
        let clock = FrameClock::start();
        let secs = clock.elapsed_secs();
        let ms = clock.elapsed_ms();
        // ms sampled after secs, so it can only be larger
        assert!(ms >= secs * 1000.0 - 1e-6);
    }

    #[test]
    fn test_epoch_wall_is_rfc3339() {
        let clock = FrameClock::start();
        assert!(chrono::DateTime::parse_from_rfc3339(clock.epoch_wall()).is_ok());
    }
}
