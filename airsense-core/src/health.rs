//! Sensor health checks
//!
//! Run once at boot to decide which channels start enabled. A channel whose
//! probe fails simply starts disabled; none of these checks abort startup.

use crate::{
    calibration::{BaselineResistances, CalibrationData},
    channel::{ChannelStatus, SensorFamily},
    errors::{CoreError, CoreResult, CycleFault},
    settings::GasSensorKind,
    traits::{CalibrationStore, SensorHub},
};

/// Library and sensor status codes reported by the climate sensor's fusion library
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FusionStatus {
    /// Library status
    pub library: i32,
    /// Sensor status
    pub sensor: i32,
}

/// Outcome of a status probe
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HealthStatus {
    /// Working
    Ok,
    /// Working with a reported warning
    Warning,
    /// Not usable
    Error,
}

/// Classify fusion-library codes: negative is an error, positive a warning
pub fn check_fusion_status(status: FusionStatus) -> HealthStatus {
    if status.library < 0 || status.sensor < 0 {
        log_error!(
            "climate sensor error (library {}, sensor {})",
            status.library,
            status.sensor
        );
        HealthStatus::Error
    } else if status.library > 0 || status.sensor > 0 {
        log_warn!(
            "climate sensor warning (library {}, sensor {})",
            status.library,
            status.sensor
        );
        HealthStatus::Warning
    } else {
        HealthStatus::Ok
    }
}

/// An analog input reading exactly zero has nothing connected
pub const fn analog_presence(reading: i32) -> bool {
    reading != 0
}

/// Result of the EEPROM baseline round-trip
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BaselineCheck {
    /// Stored values already matched
    Verified,
    /// Values were rewritten and then matched
    Rewritten,
}

/// Compare the sensor's stored baselines with the configured ones
///
/// On mismatch the configured values are written back and read again. A
/// second mismatch is an error and the caller disables the gas channel.
pub fn verify_baselines(
    store: &mut dyn CalibrationStore,
    expected: &BaselineResistances,
) -> CoreResult<BaselineCheck> {
    let stored = store
        .read_baselines()
        .map_err(|fault| CoreError::from(CycleFault::SensorBus(fault)))?;
    if stored == *expected {
        return Ok(BaselineCheck::Verified);
    }

    log_warn!(
        "stored baselines RED={} OX={} NH3={} differ, writing RED={} OX={} NH3={}",
        stored.red,
        stored.ox,
        stored.nh3,
        expected.red,
        expected.ox,
        expected.nh3
    );
    store
        .write_baselines(&expected.encode_write_command())
        .map_err(|fault| CoreError::from(CycleFault::SensorBus(fault)))?;

    let reread = store
        .read_baselines()
        .map_err(|fault| CoreError::from(CycleFault::SensorBus(fault)))?;
    if reread == *expected {
        Ok(BaselineCheck::Rewritten)
    } else {
        Err(CoreError::InvalidCalibration {
            reason: "baseline write-back did not verify",
        })
    }
}

/// Probe every sensor and build the boot-time channel status
pub fn probe_channels(
    sensors: &mut dyn SensorHub,
    store: &mut dyn CalibrationStore,
    calibration: &CalibrationData,
    gas_sensor: GasSensorKind,
) -> ChannelStatus {
    let mut status = ChannelStatus::new();

    if check_fusion_status(sensors.fusion_status()) != HealthStatus::Error {
        status.enable(SensorFamily::Climate);
    }

    if sensors.responds(SensorFamily::Particulate) {
        status.enable(SensorFamily::Particulate);
    } else {
        log_warn!("particulate sensor not responding");
    }

    match gas_sensor {
        GasSensorKind::Mics6814 => {
            if !sensors.responds(SensorFamily::PrimaryGas) {
                log_warn!("primary gas sensor not responding");
            } else {
                match verify_baselines(store, &calibration.baselines) {
                    Ok(_) => status.enable(SensorFamily::PrimaryGas),
                    Err(err) => log_error!("primary gas disabled: {}", err),
                }
            }
        }
        GasSensorKind::Mics4514 => {
            if analog_presence(sensors.analog_level(SensorFamily::AlternateGas)) {
                status.enable(SensorFamily::AlternateGas);
            } else {
                log_warn!("alternate gas sensor not connected");
            }
        }
    }

    if calibration.o3_zero_offset.is_some() {
        if analog_presence(sensors.analog_level(SensorFamily::Ozone)) {
            status.enable(SensorFamily::Ozone);
        } else {
            log_warn!("ozone sensor not connected");
        }
    }

    log_info!("{} channels enabled at boot", status.enabled().len());
    status
}
