//! Averaging and Degradation
//!
//! Runs once per cycle. Each enabled channel's sums are divided by
//! `runs = cycle_length − failures`; a channel whose failures consumed the
//! whole cycle is disabled and flagged instead of divided.
//!
//! The alternate gas channel gets a second pass after its ADC sums are
//! averaged: Rs/R0 ratios → power-law curves → µg/m³ → NO2 compensation with
//! the climate averages from the same finalize call. A ratio or curve
//! failure there degrades the channel the same way exhaustion does. The
//! compensated NO2 value is reported as is, even below zero.

use crate::{
    accumulator::{ChannelSums, MeasurementAccumulator},
    calibration::CalibrationData,
    channel::{ChannelStatus, DegradationFlags, FamilySet, SensorFamily},
    constants::sensors::ROUNDING_THRESHOLD,
    errors::{CoreError, CoreResult},
    gas::{compensate, concentrations_from_ratios, ratios_from_adc},
    readings::{ClimateReading, GasTriplet, ParticulateReading},
    units::ppm_to_ug_m3,
};

/// Per-cycle means for every channel that survived the cycle
///
/// A `None` field means the channel was disabled before or during this
/// finalize.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CycleAverages {
    /// Climate means
    pub climate: Option<ClimateReading>,
    /// Rounded particulate means (µg/m³)
    pub particulate: Option<ParticulateReading>,
    /// Gas means in µg/m³, from whichever gas family is fitted
    pub gas: Option<GasTriplet>,
    /// Ozone mean (µg/m³)
    pub ozone: Option<f32>,
    /// Channels disabled by this finalize
    pub degraded: FamilySet,
    /// Ticks in the cycle
    pub samples: u16,
}

/// Divide an integer sum and round half up
///
/// `25 / 4 → 6`, `27 / 4 → 7`. `runs` must be positive.
pub fn round_half_up(sum: u32, runs: u16) -> u16 {
    let mean = sum as f32 / f32::from(runs);
    let whole = mean as u32;
    let rounded = if mean - whole as f32 >= ROUNDING_THRESHOLD {
        whole + 1
    } else {
        whole
    };
    rounded.min(u32::from(u16::MAX)) as u16
}

/// Successful ticks for a channel, `None` when nothing is left to divide by
fn runs(cycle_length: u16, failures: u16) -> Option<u16> {
    let runs = i32::from(cycle_length) - i32::from(failures);
    if runs > 0 {
        Some(runs as u16)
    } else {
        None
    }
}

/// Reduce the cycle's sums to means, degrading exhausted channels
///
/// Must be called exactly once per cycle. The accumulator is reset for the
/// channels still enabled afterwards.
pub fn finalize(
    accumulator: &mut MeasurementAccumulator,
    cycle_length: u16,
    status: &mut ChannelStatus,
    flags: &mut DegradationFlags,
    calibration: &CalibrationData,
) -> CycleAverages {
    let mut out = CycleAverages {
        samples: cycle_length,
        ..CycleAverages::default()
    };

    // Climate first: the alternate gas pass needs its averages
    for family in status.enabled().iter() {
        let failures = accumulator.failures(family);
        let Some(channel) = accumulator.channel(family) else {
            degrade(status, flags, &mut out, CoreError::ChannelExhausted {
                family,
                failures: 0,
                samples: cycle_length,
            });
            continue;
        };

        let Some(runs) = runs(cycle_length, failures) else {
            degrade(status, flags, &mut out, CoreError::ChannelExhausted {
                family,
                failures,
                samples: cycle_length,
            });
            continue;
        };

        let n = f32::from(runs);
        match channel.sums {
            ChannelSums::Climate { temperature, humidity, pressure, voc } => {
                out.climate = Some(ClimateReading {
                    temperature: temperature / n,
                    humidity: humidity / n,
                    pressure: pressure / n,
                    voc: voc / n,
                });
            }
            ChannelSums::Particulate { pm1, pm25, pm10 } => {
                out.particulate = Some(ParticulateReading {
                    pm1: round_half_up(pm1, runs),
                    pm25: round_half_up(pm25, runs),
                    pm10: round_half_up(pm10, runs),
                });
            }
            ChannelSums::PrimaryGas { co, no2, nh3 } => {
                out.gas = Some(GasTriplet { co: co / n, no2: no2 / n, nh3: nh3 / n });
            }
            ChannelSums::AlternateGas { ox, red } => {
                let climate = out.climate;
                match alternate_gas_pass(red as f32 / n, ox as f32 / n, climate.as_ref(), calibration) {
                    Ok(gas) => out.gas = Some(gas),
                    Err(err) => degrade(status, flags, &mut out, err),
                }
            }
            ChannelSums::Ozone { o3 } => {
                out.ozone = Some(o3 / n);
            }
        }

        log_info!("{} averaged over {} of {} ticks", family, runs, cycle_length);
    }

    accumulator.reset(status);
    out
}

/// Averaged ADC counts → compensated µg/m³ triplet
fn alternate_gas_pass(
    avg_red: f32,
    avg_ox: f32,
    climate: Option<&ClimateReading>,
    calibration: &CalibrationData,
) -> CoreResult<GasTriplet> {
    let ratios = ratios_from_adc(avg_red, avg_ox, &calibration.baselines)?;
    log_debug!("Rs/R0 RED={} OX={}", ratios.red, ratios.ox);

    let ppm = concentrations_from_ratios(ratios.red, ratios.ox)?;
    let masses = &calibration.molar_masses;
    let mut gas = GasTriplet {
        co: ppm_to_ug_m3(ppm.co, masses.co),
        no2: ppm_to_ug_m3(ppm.no2, masses.no2),
        nh3: ppm_to_ug_m3(ppm.nh3, masses.nh3),
    };

    // May go below zero in cold or high-pressure air
    if let Some(climate) = climate {
        gas.no2 = compensate(gas.no2, climate, &calibration.compensation);
    }
    Ok(gas)
}

fn degrade(
    status: &mut ChannelStatus,
    flags: &mut DegradationFlags,
    out: &mut CycleAverages,
    err: CoreError,
) {
    let Some(family) = err.family() else {
        return;
    };
    log_error!("disabling channel: {}", err);
    status.disable(family);
    flags.raise(family);
    out.degraded.insert(family);
}
