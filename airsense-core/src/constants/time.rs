//! Cycle Timing Constants

/// Milliseconds per second.
pub const MS_PER_SECOND: u64 = 1000;

/// Milliseconds per UTC day, used to decide whether NTP is due again.
pub const MS_PER_DAY: u64 = 86_400_000;

/// Default delay between two sample ticks (seconds).
pub const DEFAULT_SAMPLE_INTERVAL_S: u64 = 60;

/// Default number of sample ticks averaged into one cycle.
pub const DEFAULT_SAMPLES_PER_CYCLE: u16 = 30;

/// Sample counts the device accepts per cycle.
///
/// Each divides an hour evenly at one-minute spacing.
pub const ACCEPTED_SAMPLES_PER_CYCLE: [u16; 12] = [1, 2, 3, 4, 5, 6, 10, 12, 15, 20, 30, 60];

/// Give up waiting for NTP after this long (seconds).
pub const NTP_SYNC_TIMEOUT_S: u64 = 20;

/// Pause in the Error state before attempting recovery (seconds).
pub const ERROR_BACKOFF_S: u64 = 5;

/// Recovery attempts before the cycle is restarted from the top.
pub const MAX_ERROR_RETRIES: u8 = 3;
