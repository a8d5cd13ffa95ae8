//! Cycle settings and server-issued overrides

use crate::{
    calibration::{BaselineResistances, CalibrationData, CompensationCoefficients},
    constants::time::{
        ACCEPTED_SAMPLES_PER_CYCLE, DEFAULT_SAMPLES_PER_CYCLE, DEFAULT_SAMPLE_INTERVAL_S,
        ERROR_BACKOFF_S, MAX_ERROR_RETRIES, NTP_SYNC_TIMEOUT_S,
    },
    errors::{CoreError, CoreResult},
    time::Millis,
};

/// Which MOS gas sensor is fitted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum GasSensorKind {
    /// Three-channel I²C module reporting ppm
    #[default]
    Mics6814,
    /// Two-electrode sensor read through the ADC
    Mics4514,
}

impl GasSensorKind {
    /// Map the configuration file's numeric selector
    pub const fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(Self::Mics6814),
            1 => Some(Self::Mics4514),
            _ => None,
        }
    }
}

/// Timing and policy for the cycle controller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CycleSettings {
    /// Sample ticks per measurement cycle
    pub samples_per_cycle: u16,
    /// Wait between two sample ticks
    pub sample_interval: Millis,
    /// Fitted gas sensor
    pub gas_sensor: GasSensorKind,
    /// How long to wait for the server configuration answer
    pub config_timeout: Millis,
    /// How long to wait for NTP
    pub ntp_timeout: Millis,
    /// Error-state retries before the cycle restarts
    pub max_error_retries: u8,
    /// Pause in the Error state before resuming
    pub error_backoff: Millis,
    /// Install newer firmware automatically
    pub firmware_auto_upgrade: bool,
}

impl Default for CycleSettings {
    fn default() -> Self {
        Self {
            samples_per_cycle: DEFAULT_SAMPLES_PER_CYCLE,
            sample_interval: Millis::secs(DEFAULT_SAMPLE_INTERVAL_S),
            gas_sensor: GasSensorKind::default(),
            config_timeout: Millis::secs(NTP_SYNC_TIMEOUT_S),
            ntp_timeout: Millis::secs(NTP_SYNC_TIMEOUT_S),
            max_error_retries: MAX_ERROR_RETRIES,
            error_backoff: Millis::secs(ERROR_BACKOFF_S),
            firmware_auto_upgrade: true,
        }
    }
}

impl CycleSettings {
    /// Check the settings the controller relies on
    pub fn validate(&self) -> CoreResult<()> {
        if !is_accepted_sample_count(self.samples_per_cycle) {
            return Err(CoreError::InvalidSettings {
                reason: "samples per cycle not in accepted list",
            });
        }
        if self.sample_interval.ticks() == 0 {
            return Err(CoreError::InvalidSettings {
                reason: "sample interval must be positive",
            });
        }
        if self.ntp_timeout.ticks() == 0 || self.config_timeout.ticks() == 0 {
            return Err(CoreError::InvalidSettings {
                reason: "timeouts must be positive",
            });
        }
        Ok(())
    }
}

/// Whether a samples-per-cycle value is one the device supports
pub fn is_accepted_sample_count(count: u16) -> bool {
    ACCEPTED_SAMPLES_PER_CYCLE.contains(&count)
}

/// Overrides carried by a server configuration message
///
/// Every field is optional; absent fields keep the current value.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ConfigUpdate {
    /// New samples per cycle
    pub samples_per_cycle: Option<u16>,
    /// New wait between ticks
    pub sample_interval: Option<Millis>,
    /// New gas sensor baselines
    pub baselines: Option<BaselineResistances>,
    /// New compensation coefficients
    pub compensation: Option<CompensationCoefficients>,
    /// New auto-upgrade policy
    pub firmware_auto_upgrade: Option<bool>,
}

impl ConfigUpdate {
    /// True when the message changes nothing
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Apply the overrides, all or nothing
    ///
    /// The merged result is validated before anything is committed.
    pub fn apply(
        &self,
        settings: &mut CycleSettings,
        calibration: &mut CalibrationData,
    ) -> CoreResult<()> {
        let mut next_settings = *settings;
        let mut next_calibration = *calibration;

        if let Some(count) = self.samples_per_cycle {
            next_settings.samples_per_cycle = count;
        }
        if let Some(interval) = self.sample_interval {
            next_settings.sample_interval = interval;
        }
        if let Some(auto) = self.firmware_auto_upgrade {
            next_settings.firmware_auto_upgrade = auto;
        }
        if let Some(baselines) = self.baselines {
            next_calibration.baselines = baselines;
        }
        if let Some(compensation) = self.compensation {
            next_calibration.compensation = compensation;
        }

        next_settings.validate()?;
        next_calibration.validate()?;

        *settings = next_settings;
        *calibration = next_calibration;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_validate() {
        assert!(CycleSettings::default().validate().is_ok());
    }

    #[test]
    fn unaccepted_sample_count() {
        let settings = CycleSettings { samples_per_cycle: 7, ..CycleSettings::default() };
        assert!(matches!(settings.validate(), Err(CoreError::InvalidSettings { .. })));
    }

    #[test]
    fn gas_sensor_codes() {
        assert_eq!(GasSensorKind::from_code(0), Some(GasSensorKind::Mics6814));
        assert_eq!(GasSensorKind::from_code(1), Some(GasSensorKind::Mics4514));
        assert_eq!(GasSensorKind::from_code(2), None);
    }

    #[test]
    fn update_is_all_or_nothing() {
        let mut settings = CycleSettings::default();
        let mut calibration = CalibrationData::default();

        let bad = ConfigUpdate {
            samples_per_cycle: Some(10),
            baselines: Some(BaselineResistances { red: 0, ox: 900, nh3: 163 }),
            ..ConfigUpdate::default()
        };
        assert!(bad.apply(&mut settings, &mut calibration).is_err());
        assert_eq!(settings.samples_per_cycle, DEFAULT_SAMPLES_PER_CYCLE);

        let good = ConfigUpdate { samples_per_cycle: Some(10), ..ConfigUpdate::default() };
        assert!(good.apply(&mut settings, &mut calibration).is_ok());
        assert_eq!(settings.samples_per_cycle, 10);
    }
}
