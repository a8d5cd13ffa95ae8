//! On-device configuration file

use std::{fs, path::Path};

use airsense_core::{
    calibration::{CompensationCoefficients, SensorOffsets},
    settings::is_accepted_sample_count,
    BaselineResistances, CalibrationData, CycleSettings, GasSensorKind, Millis,
};
use serde::{Deserialize, Serialize};

use crate::{ConfigError, ConfigResult};

/// Transmit power levels the radio accepts (dBm)
pub const WIFI_POWER_DBM: [f32; 12] =
    [-1.0, 2.0, 5.0, 7.0, 8.5, 11.0, 13.0, 15.0, 17.0, 18.5, 19.0, 19.5];

/// Ozone zero value meaning "no ozone sensor fitted"
const O3_DISABLED: i32 = -1;

/// One value per MiCS electrode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MicsValues {
    /// Reducing electrode
    #[serde(rename = "RED")]
    pub red: i32,
    /// Oxidizing electrode
    #[serde(rename = "OX")]
    pub ox: i32,
    /// NH3 electrode
    #[serde(rename = "NH3")]
    pub nh3: i32,
}

impl MicsValues {
    const FACTORY_BASELINES: Self = Self { red: 955, ox: 900, nh3: 163 };

    pub(crate) fn to_baselines(self) -> ConfigResult<BaselineResistances> {
        let field = "mics_calibration_values";
        let convert = |value: i32| {
            u16::try_from(value)
                .ok()
                .filter(|v| *v > 0)
                .ok_or_else(|| ConfigError::invalid(field, format!("{} is not a baseline", value)))
        };
        Ok(BaselineResistances {
            red: convert(self.red)?,
            ox: convert(self.ox)?,
            nh3: convert(self.nh3)?,
        })
    }

    fn to_offsets(self) -> ConfigResult<SensorOffsets> {
        let convert = |value: i32| {
            i16::try_from(value).map_err(|_| {
                ConfigError::invalid("mics_measurements_offsets", format!("{} out of range", value))
            })
        };
        Ok(SensorOffsets {
            red: convert(self.red)?,
            ox: convert(self.ox)?,
            nh3: convert(self.nh3)?,
        })
    }
}

/// Environmental compensation factors as the provisioning tool names them
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompensationFactors {
    /// Humidity factor
    #[serde(rename = "compH")]
    pub h: f32,
    /// Temperature factor
    #[serde(rename = "compT")]
    pub t: f32,
    /// Pressure factor
    #[serde(rename = "compP")]
    pub p: f32,
}

impl Default for CompensationFactors {
    fn default() -> Self {
        let coefficients = CompensationCoefficients::default();
        Self { h: coefficients.humidity, t: coefficients.temperature, p: coefficients.pressure }
    }
}

impl CompensationFactors {
    pub(crate) fn to_coefficients(self) -> ConfigResult<CompensationCoefficients> {
        if !(self.h.is_finite() && self.t.is_finite() && self.p.is_finite()) {
            return Err(ConfigError::invalid("compensation_factors", "factor is not a number"));
        }
        Ok(CompensationCoefficients { humidity: self.h, temperature: self.t, pressure: self.p })
    }
}

/// Everything the provisioning tool writes for one device
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeviceConfig {
    /// WiFi network name
    pub ssid: String,
    /// WiFi password
    pub password: String,
    /// Identifier reported with every record
    pub device_id: String,
    /// Transmit power, e.g. `"17dBm"`
    pub wifi_power: String,
    /// Ozone ADC zero offset, -1 when no ozone sensor is fitted
    pub o3_zero_value: i32,
    /// Sample ticks averaged into one record
    pub average_measurements: u16,
    /// Seconds between two sample ticks
    pub average_delay_seconds: u64,
    /// Installation altitude in metres
    pub sea_level_altitude: f32,
    /// Upload endpoint
    pub upload_server: String,
    /// Clean-air gas sensor baselines
    #[serde(rename = "mics_calibration_values")]
    pub mics_calibration: MicsValues,
    /// Gas sensor measurement offsets
    #[serde(rename = "mics_measurements_offsets")]
    pub mics_offsets: MicsValues,
    /// NO2/VOC compensation
    #[serde(rename = "compensation_factors")]
    pub compensation: CompensationFactors,
    /// Use the cellular modem instead of WiFi
    pub use_modem: bool,
    /// Cellular access point name
    pub modem_apn: String,
    /// Time server host
    pub ntp_server: String,
    /// POSIX TZ definition
    pub timezone: String,
    /// Install newer firmware automatically
    pub fw_auto_upgrade: bool,
    /// 0 = MICS6814, 1 = MICS4514
    pub gas_sensor_type: u8,
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            ssid: String::new(),
            password: String::new(),
            device_id: String::new(),
            wifi_power: "17dBm".into(),
            o3_zero_value: O3_DISABLED,
            average_measurements: 30,
            average_delay_seconds: 60,
            sea_level_altitude: 122.0,
            upload_server: String::new(),
            mics_calibration: MicsValues::FACTORY_BASELINES,
            mics_offsets: MicsValues::default(),
            compensation: CompensationFactors::default(),
            use_modem: false,
            modem_apn: String::new(),
            ntp_server: "pool.ntp.org".into(),
            timezone: "GMT0".into(),
            fw_auto_upgrade: true,
            gas_sensor_type: 0,
        }
    }
}

#[derive(Deserialize)]
struct ConfigFile {
    config: DeviceConfig,
}

#[derive(Serialize)]
struct ConfigFileRef<'a> {
    config: &'a DeviceConfig,
}

impl DeviceConfig {
    /// Read, parse and validate a configuration file
    pub fn load(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)?;
        let config = Self::from_json(&text)?;
        config.validate()?;
        log::info!(
            "loaded configuration for {} from {}",
            config.device_id,
            path.display()
        );
        Ok(config)
    }

    /// Parse a configuration document without validating it
    pub fn from_json(text: &str) -> ConfigResult<Self> {
        let file: ConfigFile = serde_json::from_str(text)?;
        Ok(file.config)
    }

    /// Render the document the way the provisioning tool writes it
    pub fn to_json(&self) -> ConfigResult<String> {
        Ok(serde_json::to_string_pretty(&ConfigFileRef { config: self })?)
    }

    /// Transmit power in dBm
    pub fn wifi_power_dbm(&self) -> ConfigResult<f32> {
        let raw = self.wifi_power.trim();
        let number = raw.strip_suffix("dBm").unwrap_or(raw).trim();
        let dbm: f32 = number
            .parse()
            .map_err(|_| ConfigError::invalid("wifi_power", format!("'{}' is not a power", raw)))?;

        if WIFI_POWER_DBM.iter().any(|p| (p - dbm).abs() < f32::EPSILON) {
            Ok(dbm)
        } else {
            Err(ConfigError::invalid("wifi_power", format!("{} dBm not supported", dbm)))
        }
    }

    /// Fitted gas sensor
    pub fn gas_sensor(&self) -> ConfigResult<GasSensorKind> {
        GasSensorKind::from_code(self.gas_sensor_type).ok_or_else(|| {
            ConfigError::invalid(
                "gas_sensor_type",
                format!("unknown sensor type {}", self.gas_sensor_type),
            )
        })
    }

    /// Reject values the device cannot run with
    pub fn validate(&self) -> ConfigResult<()> {
        if self.ssid.trim().is_empty() {
            return Err(ConfigError::invalid("ssid", "must not be empty"));
        }
        if self.device_id.trim().is_empty() {
            return Err(ConfigError::invalid("device_id", "must not be empty"));
        }
        self.wifi_power_dbm()?;
        self.gas_sensor()?;
        if self.use_modem && self.modem_apn.trim().is_empty() {
            return Err(ConfigError::invalid("modem_apn", "required when the modem is used"));
        }
        self.to_settings()?;
        self.to_calibration()?;
        Ok(())
    }

    /// Conversion constants for the measurement core
    pub fn to_calibration(&self) -> ConfigResult<CalibrationData> {
        let o3_zero_offset = match self.o3_zero_value {
            O3_DISABLED => None,
            value if value >= 0 => Some(value),
            value => {
                return Err(ConfigError::invalid(
                    "o3_zero_value",
                    format!("{} is neither -1 nor a zero offset", value),
                ))
            }
        };

        let calibration = CalibrationData {
            baselines: self.mics_calibration.to_baselines()?,
            offsets: self.mics_offsets.to_offsets()?,
            compensation: self.compensation.to_coefficients()?,
            o3_zero_offset,
            ..CalibrationData::default()
        };
        calibration
            .validate()
            .map_err(|e| ConfigError::invalid("calibration", e.to_string()))?;
        Ok(calibration)
    }

    /// Cycle timing and policy for the measurement core
    pub fn to_settings(&self) -> ConfigResult<CycleSettings> {
        if !is_accepted_sample_count(self.average_measurements) {
            return Err(ConfigError::invalid(
                "average_measurements",
                format!("{} is not an accepted sample count", self.average_measurements),
            ));
        }
        if self.average_delay_seconds == 0 {
            return Err(ConfigError::invalid("average_delay_seconds", "must be positive"));
        }

        let settings = CycleSettings {
            samples_per_cycle: self.average_measurements,
            sample_interval: Millis::secs(self.average_delay_seconds),
            gas_sensor: self.gas_sensor()?,
            firmware_auto_upgrade: self.fw_auto_upgrade,
            ..CycleSettings::default()
        };
        settings
            .validate()
            .map_err(|e| ConfigError::invalid("settings", e.to_string()))?;
        Ok(settings)
    }
}
