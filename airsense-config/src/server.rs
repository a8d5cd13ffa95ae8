//! Server configuration payloads
//!
//! The upload server may answer a configuration request with a small JSON
//! object. Every key is optional; keys the device does not know are ignored
//! so the server can roll out new settings ahead of firmware.

use airsense_core::{
    settings::is_accepted_sample_count, ConfigDecoder, ConfigUpdate, CoreError, CoreResult, Millis,
};
use serde::{Deserialize, Serialize};

use crate::{
    device::{CompensationFactors, MicsValues},
    ConfigError, ConfigResult,
};

/// Overrides sent by the upload server
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Sample ticks per record
    #[serde(skip_serializing_if = "Option::is_none")]
    pub average_measurements: Option<u16>,
    /// Seconds between sample ticks
    #[serde(skip_serializing_if = "Option::is_none")]
    pub average_delay_seconds: Option<u64>,
    /// Gas sensor baselines
    #[serde(rename = "mics_calibration_values", skip_serializing_if = "Option::is_none")]
    pub mics_calibration: Option<MicsValues>,
    /// Compensation factors
    #[serde(rename = "compensation_factors", skip_serializing_if = "Option::is_none")]
    pub compensation: Option<CompensationFactors>,
    /// Auto-upgrade policy
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fw_auto_upgrade: Option<bool>,
}

impl ServerConfig {
    /// Parse a payload
    pub fn from_slice(payload: &[u8]) -> ConfigResult<Self> {
        Ok(serde_json::from_slice(payload)?)
    }

    /// Range-check the overrides and convert them to core types
    ///
    /// Cross-field checks against the live settings happen when the update
    /// is applied.
    pub fn to_update(&self) -> ConfigResult<ConfigUpdate> {
        if let Some(count) = self.average_measurements {
            if !is_accepted_sample_count(count) {
                return Err(ConfigError::invalid(
                    "average_measurements",
                    format!("{} is not an accepted sample count", count),
                ));
            }
        }
        if self.average_delay_seconds == Some(0) {
            return Err(ConfigError::invalid("average_delay_seconds", "must be positive"));
        }

        Ok(ConfigUpdate {
            samples_per_cycle: self.average_measurements,
            sample_interval: self.average_delay_seconds.map(Millis::secs),
            baselines: self.mics_calibration.map(MicsValues::to_baselines).transpose()?,
            compensation: self.compensation.map(CompensationFactors::to_coefficients).transpose()?,
            firmware_auto_upgrade: self.fw_auto_upgrade,
        })
    }
}

/// Decodes mailbox payloads as [`ServerConfig`] JSON
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonConfigDecoder;

impl ConfigDecoder for JsonConfigDecoder {
    fn decode(&self, payload: &[u8]) -> CoreResult<ConfigUpdate> {
        // The controller logs the returned error
        let config = ServerConfig::from_slice(payload).map_err(|_| CoreError::InvalidSettings {
            reason: "server configuration is not valid JSON",
        })?;

        config.to_update().map_err(|_| CoreError::InvalidSettings {
            reason: "server configuration value out of range",
        })
    }
}
