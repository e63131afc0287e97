//! Wall-clock vs. chain time.
//!
//! `Blockchain` never reads `SystemTime::now()` directly when stamping a
//! block; it goes through a `TimeSource` so `setTime`/`increaseTime` can
//! shift the chain's notion of "now" without touching the host clock, and
//! so that adjustment is itself snapshot/revert-able.

use std::time::{SystemTime, UNIX_EPOCH};

/// Tracks an offset (in seconds, may be negative) applied to the host
/// clock when the chain needs "now".
#[derive(Debug, Clone, Copy, Default)]
pub struct TimeSource {
    adjustment_secs: i64,
}

impl TimeSource {
    pub fn adjustment(&self) -> i64 {
        self.adjustment_secs
    }

    pub fn set_adjustment(&mut self, adjustment_secs: i64) {
        self.adjustment_secs = adjustment_secs;
    }

    /// `setTime(date)`: sets the adjustment so `now()` reads as `target`
    /// at the moment this call is made. Returns the new adjustment.
    pub fn set_time(&mut self, target_unix_secs: i64) -> i64 {
        let wall_clock = wall_clock_unix_secs();
        self.adjustment_secs = target_unix_secs - wall_clock;
        self.adjustment_secs
    }

    /// `increaseTime(seconds)`: adds to the adjustment, returning the new
    /// total adjustment.
    pub fn increase_time(&mut self, seconds: i64) -> i64 {
        self.adjustment_secs += seconds;
        self.adjustment_secs
    }

    /// The chain's current notion of "now", in unix seconds.
    pub fn now_unix_secs(&self) -> i64 {
        wall_clock_unix_secs() + self.adjustment_secs
    }
}

fn wall_clock_unix_secs() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("system clock is after the unix epoch")
        .as_secs() as i64
}
