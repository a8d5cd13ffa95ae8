//! Sensor setups and settings used across the integration tests

use airsense_core::{
    health::FusionStatus, AdcPair, BaselineResistances, CalibrationData, ClimateReading,
    CycleSettings, DeviceContext, FamilySet, FirmwareVersion, GasSensorKind, GasTriplet, Millis,
    ParticulateReading, SensorFamily,
};

use super::fakes::{FakeEeprom, ScriptedNetwork, ScriptedSensors};
use super::Rig;

/// 2023-11-14T22:13:20Z
pub const SYNC_UTC_MS: u64 = 1_700_000_000_000;

/// Indoor climate at the compensation reference point
pub fn reference_climate() -> ClimateReading {
    ClimateReading { temperature: 25.0, humidity: 50.0, pressure: 1013.25, voc: 120.0 }
}

/// Short cycles so tests finish in a few hundred steps
pub fn fast_settings(gas_sensor: GasSensorKind) -> CycleSettings {
    CycleSettings {
        samples_per_cycle: 3,
        sample_interval: Millis::secs(2),
        gas_sensor,
        config_timeout: Millis::secs(2),
        ntp_timeout: Millis::secs(3),
        max_error_retries: 3,
        error_backoff: Millis::secs(1),
        firmware_auto_upgrade: true,
    }
}

/// Every sensor fitted and healthy, three-channel gas module
pub fn healthy_primary() -> ScriptedSensors {
    let mut responding = FamilySet::empty();
    responding.insert(SensorFamily::Particulate);
    responding.insert(SensorFamily::PrimaryGas);

    let mut analog = [0; 5];
    analog[SensorFamily::Ozone as usize] = 1_500;

    ScriptedSensors {
        climate: Some(reference_climate()),
        particulate: Some(ParticulateReading { pm1: 4, pm25: 12, pm10: 18 }),
        primary_gas: Some(GasTriplet { co: 1.0, no2: 0.05, nh3: 1.0 }),
        ozone_points: Some(1_520),
        fusion: FusionStatus::default(),
        responding,
        analog,
        ..ScriptedSensors::default()
    }
}

/// Climate, particulate and the two-electrode gas sensor at its baselines
pub fn healthy_alternate() -> ScriptedSensors {
    let baselines = BaselineResistances::default();
    let mut responding = FamilySet::empty();
    responding.insert(SensorFamily::Particulate);

    let mut analog = [0; 5];
    analog[SensorFamily::AlternateGas as usize] = 512;

    ScriptedSensors {
        climate: Some(reference_climate()),
        particulate: Some(ParticulateReading { pm1: 2, pm25: 6, pm10: 9 }),
        alternate_gas: Some(AdcPair { ox: baselines.ox as i16, red: baselines.red as i16 }),
        fusion: FusionStatus::default(),
        responding,
        analog,
        ..ScriptedSensors::default()
    }
}

/// Calibration with the ozone channel fitted
pub fn calibration_with_ozone() -> CalibrationData {
    CalibrationData { o3_zero_offset: Some(1_500), ..CalibrationData::default() }
}

/// Booted context plus its rig
pub fn booted(
    sensors: ScriptedSensors,
    settings: CycleSettings,
    calibration: CalibrationData,
) -> (Rig, DeviceContext) {
    let eeprom = FakeEeprom::holding(calibration.baselines);
    let network = ScriptedNetwork::synced_at(SYNC_UTC_MS);
    let mut rig = Rig::new(sensors, eeprom, network);

    let mut context = DeviceContext::new(settings, calibration, FirmwareVersion::new(1, 0, 0))
        .expect("valid test configuration");
    rig.boot(&mut context);
    (rig, context)
}
