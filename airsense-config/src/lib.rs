//! Configuration documents for airsense
//!
//! Two documents reach the device:
//!
//! - The configuration file written by the provisioning tool, read once at
//!   boot ([`DeviceConfig`])
//! - The server's configuration answer, delivered through the core's
//!   single-slot mailbox and decoded on the device's own schedule
//!   ([`ServerConfig`], [`JsonConfigDecoder`])
//!
//! Both are JSON. The file wraps its settings in a `"config"` object next to a
//! `"help"` object meant for humans:
//!
//! ```json
//! {
//!   "config": {
//!     "ssid": "office",
//!     "device_id": "MSP001",
//!     "wifi_power": "17dBm",
//!     "average_measurements": 30,
//!     "mics_calibration_values": { "RED": 955, "OX": 900, "NH3": 163 },
//!     "compensation_factors": { "compH": 0.6, "compT": 1.352, "compP": 0.0132 },
//!     "gas_sensor_type": 0
//!   },
//!   "help": {}
//! }
//! ```
//!
//! Missing keys take the factory defaults.
//!
//! ## Usage
//!
//! ```no_run
//! use airsense_config::DeviceConfig;
//! use airsense_core::{DeviceContext, FirmwareVersion};
//!
//! let config = DeviceConfig::load("config_v4.json")?;
//! let context = DeviceContext::new(
//!     config.to_settings()?,
//!     config.to_calibration()?,
//!     FirmwareVersion::new(1, 0, 0),
//! )?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod device;
pub mod server;

pub use device::{CompensationFactors, DeviceConfig, MicsValues, WIFI_POWER_DBM};
pub use server::{JsonConfigDecoder, ServerConfig};

/// Configuration errors
#[derive(Debug, thiserror_no_std::Error)]
pub enum ConfigError {
    /// Document is not the JSON we expect
    #[error("Failed to parse configuration: {0}")]
    Parse(#[from] serde_json::Error),

    /// A value parsed but cannot be used
    #[error("Invalid {field}: {reason}")]
    Invalid {
        /// Offending key
        field: &'static str,
        /// What is wrong with it
        reason: String,
    },

    /// Configuration file could not be read
    #[error("Failed to read configuration: {0}")]
    Io(#[from] std::io::Error),
}

impl ConfigError {
    pub(crate) fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        Self::Invalid { field, reason: reason.into() }
    }
}

/// Result alias for configuration handling
pub type ConfigResult<T> = Result<T, ConfigError>;
