//! High resolution timing.

use std::time::{Duration, Instant};

/// Ticks per second reported by [`HighResTimer::elapsed_ticks`].
pub const TICK_FREQUENCY: u64 = 1_000_000_000;

/// Monotonic stopwatch measuring time since creation or the last reset.
#[derive(Clone, Copy, Debug)]
pub struct HighResTimer {
    start: Instant,
}

impl Default for HighResTimer {
    fn default() -> Self {
        Self::new()
    }
}

impl HighResTimer {
    /// Starts a timer at the current instant.
    #[must_use]
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }

    /// Restarts the timer.
    pub fn reset(&mut self) {
        self.start = Instant::now();
    }

    /// Elapsed time as a [`Duration`].
    #[must_use]
    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    /// Elapsed seconds.
    #[must_use]
    pub fn elapsed_seconds(&self) -> f64 {
        self.elapsed().as_secs_f64()
    }

    /// Elapsed milliseconds.
    #[must_use]
    pub fn elapsed_ms(&self) -> f64 {
        self.elapsed_seconds() * 1000.0
    }

    /// Elapsed ticks at [`TICK_FREQUENCY`].
    #[must_use]
    pub fn elapsed_ticks(&self) -> u64 {
        u64::try_from(self.elapsed().as_nanos()).unwrap_or(u64::MAX)
    }

    /// Ticks per second.
    #[must_use]
    pub const fn tick_frequency() -> u64 {
        TICK_FREQUENCY
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timer_is_monotonic() {
        let timer = HighResTimer::new();
        let first = timer.elapsed_ticks();
        crate::sync::sleep_ms(2);
        let second = timer.elapsed_ticks();
        assert!(second > first);
        assert!(timer.elapsed_ms() >= 2.0);
    }

    #[test]
    fn test_reset_restarts() {
        let mut timer = HighResTimer::new();
        crate::sync::sleep_ms(5);
        timer.reset();
        assert!(timer.elapsed_ms() < 5.0 * 100.0);
        assert_eq!(HighResTimer::tick_frequency(), TICK_FREQUENCY);
    }
}
