//! Time handling for the control loop
//!
//! The cycle controller never sleeps. Every wait is a [`Deadline`] computed
//! from a monotonic [`TimeSource`] and checked once per control-loop step, so
//! tests can drive a whole cycle by advancing a [`FixedTime`].

use fugit::MillisDurationU64;

use crate::constants::time::MS_PER_DAY;

/// Timestamp in milliseconds since epoch (or device boot for monotonic)
pub type Timestamp = u64;

/// Millisecond duration used for all cycle timing
pub type Millis = MillisDurationU64;

/// Monotonic millisecond clock the controller measures waits against
pub trait TimeSource {
    /// Current timestamp in milliseconds
    fn now(&self) -> Timestamp;
}

/// Fixed time source for testing
#[derive(Debug, Clone, Default)]
pub struct FixedTime {
    timestamp: Timestamp,
}

impl FixedTime {
    /// Clock frozen at `timestamp`
    pub fn new(timestamp: Timestamp) -> Self {
        Self { timestamp }
    }

    /// Jump to `timestamp`
    pub fn set(&mut self, timestamp: Timestamp) {
        self.timestamp = timestamp;
    }

    /// Move forward by `duration`
    pub fn advance(&mut self, duration: Millis) {
        self.timestamp = self.timestamp.saturating_add(duration.ticks());
    }
}

impl TimeSource for FixedTime {
    fn now(&self) -> Timestamp {
        self.timestamp
    }
}

/// A point in monotonic time after which a wait is over
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Deadline {
    at: Timestamp,
}

impl Deadline {
    /// Deadline `duration` after `now`
    pub fn after(now: Timestamp, duration: Millis) -> Self {
        Self { at: now.saturating_add(duration.ticks()) }
    }

    /// Whether the deadline has passed at `now`
    pub const fn expired(&self, now: Timestamp) -> bool {
        now >= self.at
    }

    /// Time left at `now`, zero once expired
    pub fn remaining(&self, now: Timestamp) -> Millis {
        Millis::millis(self.at.saturating_sub(now))
    }

    /// Absolute expiry
    pub const fn at(&self) -> Timestamp {
        self.at
    }
}

/// Day number since the Unix epoch for a UTC wall-clock timestamp
pub const fn utc_day(timestamp: Timestamp) -> u64 {
    timestamp / MS_PER_DAY
}
