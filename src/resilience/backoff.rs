//! Jittered exponential delay between receipt polls.

use std::time::Duration;

use rand::Rng;

/// Delay schedule for polling: doubles from `base` up to `max`, plus up to
/// 10% jitter.
#[derive(Debug, Clone, Copy)]
pub struct PollSchedule {
    base_ms: u64,
    max_ms: u64,
}

impl PollSchedule {
    pub fn new(base_ms: u64, max_ms: u64) -> Self {
        Self {
            base_ms,
            max_ms: max_ms.max(base_ms),
        }
    }

    /// Delay before poll number `attempt` (0-based). The first poll is
    /// immediate.
    pub fn delay(&self, attempt: u32) -> Duration {
        if attempt == 0 {
            return Duration::ZERO;
        }

        let factor = 2u64.saturating_pow(attempt - 1);
        let capped = self.base_ms.saturating_mul(factor).min(self.max_ms);

        let jitter_range = capped / 10;
        let jitter = if jitter_range > 0 {
            rand::thread_rng().gen_range(0..jitter_range)
        } else {
            0
        };

        Duration::from_millis(capped + jitter)
    }
}
