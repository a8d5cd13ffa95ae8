//! Calibration Data
//!
//! Per-device constants loaded once at startup from configuration and kept
//! immutable for the duration of a cycle. The baseline resistances may also be
//! written back to the gas sensor's EEPROM when the health check at boot finds
//! them out of sync.

use crate::{
    constants::physics::{MOLAR_MASS_CO, MOLAR_MASS_NH3, MOLAR_MASS_NO2, MOLAR_MASS_O3},
    errors::{CoreError, CoreResult},
};

/// Command byte that stores new R0 values in the MiCS-6814 module's EEPROM
pub const CMD_SET_BASELINES: u8 = 0x02;

/// Length of an encoded baseline-write command
pub const BASELINE_COMMAND_LEN: usize = 7;

/// Clean-air baseline readings per electrode
///
/// For the ADC-based sensor these are raw counts taken with the same
/// acquisition function as the live readings, so conversion factors cancel in
/// the Rs/R0 ratio.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BaselineResistances {
    /// Reducing electrode (CO, NH3)
    pub red: u16,
    /// Oxidizing electrode (NO2)
    pub ox: u16,
    /// Dedicated NH3 electrode (three-channel sensor only)
    pub nh3: u16,
}

impl Default for BaselineResistances {
    fn default() -> Self {
        Self { red: 955, ox: 900, nh3: 163 }
    }
}

impl BaselineResistances {
    /// Encode a baseline-write command: command byte then NH3, RED, OX as big-endian u16
    pub fn encode_write_command(&self) -> [u8; BASELINE_COMMAND_LEN] {
        let nh3 = self.nh3.to_be_bytes();
        let red = self.red.to_be_bytes();
        let ox = self.ox.to_be_bytes();
        [CMD_SET_BASELINES, nh3[0], nh3[1], red[0], red[1], ox[0], ox[1]]
    }
}

/// Per-electrode measurement offsets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SensorOffsets {
    /// Reducing electrode offset
    pub red: i16,
    /// Oxidizing electrode offset
    pub ox: i16,
    /// NH3 electrode offset
    pub nh3: i16,
}

/// Molar masses used by the ppm → µg/m³ step (g/mol)
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MolarMasses {
    /// Carbon monoxide
    pub co: f32,
    /// Nitrogen dioxide
    pub no2: f32,
    /// Ammonia
    pub nh3: f32,
    /// Ozone
    pub o3: f32,
}

impl Default for MolarMasses {
    fn default() -> Self {
        Self {
            co: MOLAR_MASS_CO,
            no2: MOLAR_MASS_NO2,
            nh3: MOLAR_MASS_NH3,
            o3: MOLAR_MASS_O3,
        }
    }
}

/// Environmental compensation coefficients for NO2/VOC channels
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CompensationCoefficients {
    /// Multiplier on the normalised humidity term
    pub humidity: f32,
    /// Per-°C offset from the 25 °C reference
    pub temperature: f32,
    /// Per-hPa offset from the 1013.25 hPa reference
    pub pressure: f32,
}

impl Default for CompensationCoefficients {
    fn default() -> Self {
        Self { humidity: 0.6, temperature: 1.352, pressure: 0.0132 }
    }
}

/// Everything the conversion models need from configuration
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CalibrationData {
    /// Gas sensor clean-air baselines
    pub baselines: BaselineResistances,
    /// Gas sensor measurement offsets
    pub offsets: SensorOffsets,
    /// Molar masses for unit conversion
    pub molar_masses: MolarMasses,
    /// Compensation coefficients
    pub compensation: CompensationCoefficients,
    /// Ozone ADC zero offset; `None` means no ozone sensor fitted
    pub o3_zero_offset: Option<i32>,
}

impl CalibrationData {
    /// Reject values the models would divide by or cannot use
    pub fn validate(&self) -> CoreResult<()> {
        if self.baselines.red == 0 || self.baselines.ox == 0 {
            return Err(CoreError::InvalidCalibration {
                reason: "baseline resistance must be non-zero",
            });
        }

        let masses = [
            self.molar_masses.co,
            self.molar_masses.no2,
            self.molar_masses.nh3,
            self.molar_masses.o3,
        ];
        if masses.iter().any(|m| !m.is_finite() || *m <= 0.0) {
            return Err(CoreError::InvalidCalibration {
                reason: "molar mass must be positive",
            });
        }

        let comp = self.compensation;
        if !(comp.humidity.is_finite() && comp.temperature.is_finite() && comp.pressure.is_finite()) {
            return Err(CoreError::InvalidCalibration {
                reason: "compensation coefficient is not a number",
            });
        }

        if let Some(offset) = self.o3_zero_offset {
            if offset < 0 {
                return Err(CoreError::InvalidCalibration {
                    reason: "ozone zero offset must be non-negative",
                });
            }
        }

        Ok(())
    }
}
