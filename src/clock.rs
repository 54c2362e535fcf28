//! Autoplay timing.
//!
//! The player never owns a real timer. The host calls [`crate::player::Player::tick`]
//! with the wall-clock time that passed, and the [`Metronome`] turns that
//! into whole beats.

use std::num::NonZeroU32;
use std::time::Duration;

/// Shortest interval a metronome will run at, the same floor a browser puts
/// under `setInterval`.
pub const MIN_INTERVAL: Duration = Duration::from_millis(1);

/// `60000 / bpm / subdivisions` milliseconds, floored at [`MIN_INTERVAL`].
pub fn beat_interval(bpm: NonZeroU32, subdivisions: NonZeroU32) -> Duration {
    let ms = 60_000.0 / bpm.get() as f64 / subdivisions.get() as f64;
    Duration::from_secs_f64(ms / 1000.0).max(MIN_INTERVAL)
}

/// A repeating interval fed by elapsed time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Metronome {
    interval: Duration,
    pending: Duration,
}

impl Metronome {
    pub fn new(interval: Duration) -> Self {
        Metronome {
            interval: interval.max(MIN_INTERVAL),
            pending: Duration::ZERO,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Add wall-clock time that passed since the last call.
    pub fn accumulate(&mut self, elapsed: Duration) {
        self.pending = self.pending.saturating_add(elapsed);
    }

    /// Consume one interval if enough time is pending.
    pub fn take_tick(&mut self) -> bool {
        if self.pending >= self.interval {
            self.pending -= self.interval;
            true
        } else {
            false
        }
    }
}
