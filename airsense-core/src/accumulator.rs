//! Measurement Accumulator
//!
//! ## Overview
//!
//! Holds running sums for one measurement cycle. The sampling routine calls
//! [`MeasurementAccumulator::accumulate`] once per tick; the averaging step
//! ([`crate::averaging::finalize`]) consumes the sums exactly once and resets
//! the accumulator for the next cycle.
//!
//! ## Layout
//!
//! State is keyed by [`SensorFamily`] instead of fixed array positions:
//!
//! ```text
//! FnvIndexMap<SensorFamily, ChannelAccumulator, 8>
//! ├── Climate       → Σtemperature Σhumidity Σpressure Σvoc   failures
//! ├── Particulate   → Σpm1 Σpm25 Σpm10 (integer)               failures
//! ├── PrimaryGas    → Σco Σno2 Σnh3 (µg/m³, compensated)        failures
//! ├── AlternateGas  → Σox Σred (raw ADC counts)                 failures
//! └── Ozone         → Σo3 (µg/m³)                               failures
//! ```
//!
//! Only channels enabled when the cycle starts get an entry. A tick's read
//! miss increments that channel's failure counter instead of its sums.

use heapless::FnvIndexMap;

use crate::{
    calibration::CalibrationData,
    channel::{ChannelStatus, SensorFamily},
    constants::physics::REFERENCE_TEMP_C,
    gas::{compensate, ozone_ug_m3},
    readings::{AdcPair, ClimateReading, GasTriplet, ParticulateReading, Sample},
    units::ppm_to_ug_m3,
};

/// Map capacity (power of two, at least the number of families)
pub const CHANNEL_MAP_CAPACITY: usize = 8;

/// Running sums for one channel
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ChannelSums {
    /// Climate sensor sums
    Climate {
        /// Σ temperature (°C)
        temperature: f32,
        /// Σ relative humidity (%)
        humidity: f32,
        /// Σ pressure (hPa)
        pressure: f32,
        /// Σ VOC resistance (kΩ)
        voc: f32,
    },
    /// Particle counter sums (µg/m³)
    Particulate {
        /// Σ PM1.0
        pm1: u32,
        /// Σ PM2.5
        pm25: u32,
        /// Σ PM10
        pm10: u32,
    },
    /// Three-channel gas sensor sums (µg/m³)
    PrimaryGas {
        /// Σ CO
        co: f32,
        /// Σ NO2
        no2: f32,
        /// Σ NH3
        nh3: f32,
    },
    /// Two-electrode gas sensor raw ADC sums
    AlternateGas {
        /// Σ oxidizing counts
        ox: u32,
        /// Σ reducing counts
        red: u32,
    },
    /// Ozone sums (µg/m³)
    Ozone {
        /// Σ O3
        o3: f32,
    },
}

impl ChannelSums {
    /// Zeroed sums for a family
    pub const fn zero(family: SensorFamily) -> Self {
        match family {
            SensorFamily::Climate => Self::Climate {
                temperature: 0.0,
                humidity: 0.0,
                pressure: 0.0,
                voc: 0.0,
            },
            SensorFamily::Particulate => Self::Particulate { pm1: 0, pm25: 0, pm10: 0 },
            SensorFamily::PrimaryGas => Self::PrimaryGas { co: 0.0, no2: 0.0, nh3: 0.0 },
            SensorFamily::AlternateGas => Self::AlternateGas { ox: 0, red: 0 },
            SensorFamily::Ozone => Self::Ozone { o3: 0.0 },
        }
    }
}

/// Sums plus failure bookkeeping for one channel
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChannelAccumulator {
    /// Running sums
    pub sums: ChannelSums,
    /// Ticks whose read failed
    pub failures: u16,
    /// Ticks that contributed to the sums
    pub successes: u16,
}

impl ChannelAccumulator {
    /// Fresh accumulator for a family
    pub const fn new(family: SensorFamily) -> Self {
        Self {
            sums: ChannelSums::zero(family),
            failures: 0,
            successes: 0,
        }
    }

    fn miss(&mut self) {
        self.failures = self.failures.saturating_add(1);
    }

    fn hit(&mut self) {
        self.successes = self.successes.saturating_add(1);
    }
}

/// Per-cycle running state across all enabled channels
#[derive(Debug, Clone)]
pub struct MeasurementAccumulator {
    channels: FnvIndexMap<SensorFamily, ChannelAccumulator, CHANNEL_MAP_CAPACITY>,
    samples: u16,
}

impl MeasurementAccumulator {
    /// Start a cycle for the channels enabled in `status`
    pub fn new(status: &ChannelStatus) -> Self {
        let mut acc = Self {
            channels: FnvIndexMap::new(),
            samples: 0,
        };
        acc.reset(status);
        acc
    }

    /// Drop all sums and rebuild entries for the currently enabled channels
    pub fn reset(&mut self, status: &ChannelStatus) {
        self.channels.clear();
        self.samples = 0;
        for family in status.enabled().iter() {
            if self.channels.insert(family, ChannelAccumulator::new(family)).is_err() {
                log_error!("accumulator map full, {} not tracked", family);
            }
        }
    }

    /// Ticks accumulated so far this cycle
    pub const fn samples(&self) -> u16 {
        self.samples
    }

    /// State of one channel, if it is tracked this cycle
    pub fn channel(&self, family: SensorFamily) -> Option<&ChannelAccumulator> {
        self.channels.get(&family)
    }

    /// Failure count of one channel (zero when untracked)
    pub fn failures(&self, family: SensorFamily) -> u16 {
        self.channel(family).map(|c| c.failures).unwrap_or(0)
    }

    /// Add one tick's readings
    ///
    /// Disabled channels are skipped entirely. For enabled channels a missing
    /// or unusable reading counts as a failure for that tick.
    ///
    /// The three-channel gas values are converted to µg/m³ here and NO2 is
    /// compensated against the same tick's climate reading when one exists.
    /// Ozone is converted at the same tick's temperature, or 25 °C when the
    /// climate channel is off or missed.
    pub fn accumulate(
        &mut self,
        status: &ChannelStatus,
        sample: &Sample,
        calibration: &CalibrationData,
    ) {
        self.samples = self.samples.saturating_add(1);

        let tick_climate = if status.is_enabled(SensorFamily::Climate) {
            sample.climate.filter(|c| {
                c.temperature.is_finite() && c.humidity.is_finite() && c.pressure.is_finite()
            })
        } else {
            None
        };

        for family in status.enabled().iter() {
            let Some(channel) = self.channels.get_mut(&family) else {
                continue;
            };

            let accepted = match family {
                SensorFamily::Climate => tick_climate.map(|c| add_climate(channel, &c)).is_some(),
                SensorFamily::Particulate => sample
                    .particulate
                    .map(|p| add_particulate(channel, &p))
                    .is_some(),
                SensorFamily::PrimaryGas => sample
                    .primary_gas
                    .filter(|g| !g.has_invalid())
                    .map(|g| add_primary_gas(channel, &g, tick_climate.as_ref(), calibration))
                    .is_some(),
                SensorFamily::AlternateGas => sample
                    .alternate_gas
                    .filter(AdcPair::is_valid)
                    .map(|adc| add_alternate_gas(channel, &adc))
                    .is_some(),
                SensorFamily::Ozone => match (sample.ozone_points, calibration.o3_zero_offset) {
                    (Some(points), Some(offset)) => {
                        let temperature = tick_climate
                            .map(|c| c.temperature)
                            .unwrap_or(REFERENCE_TEMP_C);
                        add_ozone(channel, ozone_ug_m3(points, offset, temperature));
                        true
                    }
                    _ => false,
                },
            };

            if accepted {
                channel.hit();
            } else {
                channel.miss();
                log_debug!("read miss on {} (tick {})", family, self.samples);
            }
        }
    }
}

fn add_climate(channel: &mut ChannelAccumulator, reading: &ClimateReading) {
    if let ChannelSums::Climate { temperature, humidity, pressure, voc } = &mut channel.sums {
        *temperature += reading.temperature;
        *humidity += reading.humidity;
        *pressure += reading.pressure;
        *voc += reading.voc;
    }
}

fn add_particulate(channel: &mut ChannelAccumulator, reading: &ParticulateReading) {
    if let ChannelSums::Particulate { pm1, pm25, pm10 } = &mut channel.sums {
        *pm1 = pm1.saturating_add(u32::from(reading.pm1));
        *pm25 = pm25.saturating_add(u32::from(reading.pm25));
        *pm10 = pm10.saturating_add(u32::from(reading.pm10));
    }
}

fn add_primary_gas(
    channel: &mut ChannelAccumulator,
    ppm: &GasTriplet,
    climate: Option<&ClimateReading>,
    calibration: &CalibrationData,
) {
    let masses = &calibration.molar_masses;
    let mut no2 = ppm_to_ug_m3(ppm.no2, masses.no2);
    if let Some(climate) = climate {
        no2 = compensate(no2, climate, &calibration.compensation);
    }

    if let ChannelSums::PrimaryGas { co, no2: no2_sum, nh3 } = &mut channel.sums {
        *co += ppm_to_ug_m3(ppm.co, masses.co);
        *no2_sum += no2;
        *nh3 += ppm_to_ug_m3(ppm.nh3, masses.nh3);
    }
}

fn add_alternate_gas(channel: &mut ChannelAccumulator, adc: &AdcPair) {
    if let ChannelSums::AlternateGas { ox, red } = &mut channel.sums {
        // is_valid() guarantees non-negative counts
        *ox = ox.saturating_add(adc.ox as u32);
        *red = red.saturating_add(adc.red as u32);
    }
}

fn add_ozone(channel: &mut ChannelAccumulator, ug_m3: f32) {
    if let ChannelSums::Ozone { o3 } = &mut channel.sums {
        *o3 += ug_m3;
    }
}
