//! Error Types for the Measurement Core
//!
//! ## Design Philosophy
//!
//! Errors are returned from the sampling hot path and stored in the cycle
//! context, so they follow the same rules as every other type in the core:
//!
//! 1. **Small and `Copy`**: no heap, messages are `&'static str`.
//! 2. **Classified**: every error maps to exactly one [`ErrorKind`], which is
//!    what the cycle controller dispatches on.
//! 3. **Local first**: a fault that only affects one sensor channel degrades that
//!    channel and never aborts the cycle.
//!
//! ## Error Taxonomy
//!
//! ```text
//! Kind         Example                               Handling
//! ───────────  ────────────────────────────────────  ─────────────────────────────
//! Transient    one tick's read missed                absorbed by failure counter
//! Exhaustion   failures consumed the whole cycle     channel disabled + flagged
//! Model        gas curve produced a negative value   channel disabled + flagged
//! Cycle        no network, NTP timeout, fw check     Error state, bounded retry
//! Fatal        persistent storage missing            reported upward, no retry
//! Input        rejected calibration or settings      caller fixes input
//! ```
//!
//! ## Error Handling Strategy
//!
//! ```rust
//! use airsense_core::{CoreError, ErrorKind};
//!
//! fn on_fault(err: CoreError) {
//!     match err.kind() {
//!         ErrorKind::Fatal => {
//!             // hand over to the device-level fault policy
//!         }
//!         ErrorKind::Cycle => {
//!             // the controller routes this through its Error state
//!         }
//!         _ => {
//!             // degraded, keep going
//!         }
//!     }
//! }
//! ```

use core::fmt;

use thiserror_no_std::Error;

use crate::channel::SensorFamily;

/// Result type for core operations
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors raised by the measurement core
#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum CoreError {
    /// A single tick's read failed for one channel
    #[error("Read miss on {family} channel")]
    ReadMiss {
        /// Channel that missed
        family: SensorFamily,
    },

    /// Every tick of the cycle failed for a channel
    #[error("{family} channel exhausted: {failures} failures in {samples} samples")]
    ChannelExhausted {
        /// Channel that was disabled
        family: SensorFamily,
        /// Failure count at finalize time
        failures: u16,
        /// Cycle length at finalize time
        samples: u16,
    },

    /// Conversion model rejected its input or produced an invalid result
    #[error("{family} model failure: {reason}")]
    ModelFailure {
        /// Channel whose model failed
        family: SensorFamily,
        /// What went wrong
        reason: &'static str,
    },

    /// Cycle-level fault that the Error state may recover from
    #[error("Cycle fault: {0}")]
    CycleFault(CycleFault),

    /// Outside this core's authority; never retried internally
    #[error("Fatal: {reason}")]
    Fatal {
        /// What is missing
        reason: &'static str,
    },

    /// Calibration values cannot be used
    #[error("Invalid calibration: {reason}")]
    InvalidCalibration {
        /// Which value was rejected
        reason: &'static str,
    },

    /// Cycle settings cannot be used
    #[error("Invalid settings: {reason}")]
    InvalidSettings {
        /// Which setting was rejected
        reason: &'static str,
    },
}

/// Coarse classification used by the controller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Single-tick miss
    Transient,
    /// Channel used up its cycle
    Exhaustion,
    /// Gas model fault
    Model,
    /// Recoverable cycle-level fault
    Cycle,
    /// Report upward and stop retrying
    Fatal,
    /// Rejected caller input
    Input,
}

impl CoreError {
    /// Taxonomy kind of this error
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::ReadMiss { .. } => ErrorKind::Transient,
            Self::ChannelExhausted { .. } => ErrorKind::Exhaustion,
            Self::ModelFailure { .. } => ErrorKind::Model,
            Self::CycleFault(_) => ErrorKind::Cycle,
            Self::Fatal { .. } => ErrorKind::Fatal,
            Self::InvalidCalibration { .. } | Self::InvalidSettings { .. } => ErrorKind::Input,
        }
    }

    /// Whether automated handling may continue after this error
    pub const fn is_recoverable(&self) -> bool {
        !matches!(self.kind(), ErrorKind::Fatal)
    }

    /// Channel this error is attributed to, if any
    pub const fn family(&self) -> Option<SensorFamily> {
        match self {
            Self::ReadMiss { family }
            | Self::ChannelExhausted { family, .. }
            | Self::ModelFailure { family, .. } => Some(*family),
            _ => None,
        }
    }
}

impl From<CycleFault> for CoreError {
    fn from(fault: CycleFault) -> Self {
        Self::CycleFault(fault)
    }
}

/// Recoverable faults raised by cycle states
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleFault {
    /// Network collaborator reported a failure
    Network(NetworkFault),
    /// NTP did not answer before the deadline
    NtpTimeout,
    /// Sensor bus could not be prepared for a sample tick
    SensorBus(BusFault),
    /// Non-fatal storage failure (e.g. log append)
    Storage(StorageFault),
    /// The control loop overran a wait deadline
    WaitOverrun,
}

impl fmt::Display for CycleFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Network(fault) => write!(f, "network: {}", fault),
            Self::NtpTimeout => f.write_str("NTP sync timed out"),
            Self::SensorBus(fault) => write!(f, "sensor bus: {}", fault),
            Self::Storage(fault) => write!(f, "storage: {}", fault),
            Self::WaitOverrun => f.write_str("wait deadline overrun"),
        }
    }
}

/// Failures reported by the network collaborator
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum NetworkFault {
    /// No link to the access point or modem
    #[error("not connected")]
    NotConnected,
    /// Request sent but no usable answer arrived
    #[error("request timed out")]
    Timeout,
    /// Server answered with an error
    #[error("server rejected request")]
    Rejected,
}

/// Failures reported by the storage collaborator
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageFault {
    /// No card or card unreadable
    #[error("storage absent")]
    Absent,
    /// Write did not complete
    #[error("write failed")]
    WriteFailed,
}

/// Failures reported while preparing the sensor bus
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum BusFault {
    /// A sensor did not wake in time
    #[error("sensor not awake")]
    NotAwake,
    /// The bus itself is stuck
    #[error("bus error")]
    Bus,
}

#[cfg(feature = "defmt")]
impl defmt::Format for CoreError {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            Self::ReadMiss { family } =>
                defmt::write!(fmt, "Read miss on {}", family.name()),
            Self::ChannelExhausted { family, failures, samples } =>
                defmt::write!(fmt, "{} exhausted: {}/{}", family.name(), failures, samples),
            Self::ModelFailure { family, reason } =>
                defmt::write!(fmt, "{} model failure: {}", family.name(), reason),
            Self::CycleFault(_) =>
                defmt::write!(fmt, "Cycle fault"),
            Self::Fatal { reason } =>
                defmt::write!(fmt, "Fatal: {}", reason),
            Self::InvalidCalibration { reason } =>
                defmt::write!(fmt, "Invalid calibration: {}", reason),
            Self::InvalidSettings { reason } =>
                defmt::write!(fmt, "Invalid settings: {}", reason),
        }
    }
}
