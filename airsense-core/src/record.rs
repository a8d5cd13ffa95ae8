//! Measurement record emitted once per cycle
//!
//! Units are fixed: µg/m³ for every pollutant, °C / % / hPa for climate,
//! kΩ for the VOC proxy and a unitless 0–4 index. Disabled channels leave
//! their fields empty.

use core::fmt::Write;

use heapless::String;

use crate::{
    averaging::CycleAverages,
    channel::FamilySet,
    index::AirQualityIndex,
    time::Timestamp,
    units::format_decimal_comma,
};

/// Capacity of the human-readable summary line
pub const SUMMARY_CAPACITY: usize = 256;

/// One cycle's output
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MeasurementRecord {
    /// Wall-clock time of the cycle end (UTC ms), or monotonic ms before the first sync
    pub timestamp: Timestamp,
    /// Temperature (°C)
    pub temperature: Option<f32>,
    /// Relative humidity (%)
    pub humidity: Option<f32>,
    /// Pressure (hPa)
    pub pressure: Option<f32>,
    /// VOC proxy resistance (kΩ)
    pub voc: Option<f32>,
    /// PM1.0 (µg/m³)
    pub pm1: Option<u16>,
    /// PM2.5 (µg/m³)
    pub pm25: Option<u16>,
    /// PM10 (µg/m³)
    pub pm10: Option<u16>,
    /// CO (µg/m³)
    pub co: Option<f32>,
    /// NO2 (µg/m³)
    pub no2: Option<f32>,
    /// NH3 (µg/m³)
    pub nh3: Option<f32>,
    /// O3 (µg/m³)
    pub o3: Option<f32>,
    /// Per-family and composite scores
    pub index: AirQualityIndex,
    /// Channels disabled during this cycle
    pub degraded: FamilySet,
}

impl MeasurementRecord {
    /// Assemble the record from a finalized cycle
    pub fn from_cycle(timestamp: Timestamp, averages: &CycleAverages, index: AirQualityIndex) -> Self {
        let climate = averages.climate;
        let particulate = averages.particulate;
        let gas = averages.gas;

        Self {
            timestamp,
            temperature: climate.map(|c| c.temperature),
            humidity: climate.map(|c| c.humidity),
            pressure: climate.map(|c| c.pressure),
            voc: climate.map(|c| c.voc),
            pm1: particulate.map(|p| p.pm1),
            pm25: particulate.map(|p| p.pm25),
            pm10: particulate.map(|p| p.pm10),
            co: gas.map(|g| g.co),
            no2: gas.map(|g| g.no2),
            nh3: gas.map(|g| g.nh3),
            o3: averages.ozone,
            index,
            degraded: averages.degraded,
        }
    }

    /// Human-readable one-liner listing only the channels that reported
    pub fn summary(&self) -> String<SUMMARY_CAPACITY> {
        let mut out: String<SUMMARY_CAPACITY> = String::new();
        // overflow truncates the line, which is acceptable for a log message
        let _ = self.write_summary(&mut out);
        out
    }

    fn write_summary(&self, out: &mut String<SUMMARY_CAPACITY>) -> core::fmt::Result {
        if let (Some(t), Some(h), Some(p)) = (self.temperature, self.humidity, self.pressure) {
            write!(
                out,
                "{} °C {} % {} hPa ",
                format_decimal_comma(t, 1),
                format_decimal_comma(h, 1),
                format_decimal_comma(p, 1)
            )?;
        }
        if let Some(voc) = self.voc {
            write!(out, "VOC {} kΩ ", format_decimal_comma(voc, 1))?;
        }
        if let (Some(pm1), Some(pm25), Some(pm10)) = (self.pm1, self.pm25, self.pm10) {
            write!(out, "PM1 {} PM2.5 {} PM10 {} ", pm1, pm25, pm10)?;
        }
        if let Some(o3) = self.o3 {
            write!(out, "O3 {} ", format_decimal_comma(o3, 1))?;
        }
        if let (Some(no2), Some(co), Some(nh3)) = (self.no2, self.co, self.nh3) {
            write!(
                out,
                "NOx {} CO {} NH3 {} ",
                format_decimal_comma(no2, 1),
                format_decimal_comma(co, 1),
                format_decimal_comma(nh3, 1)
            )?;
        }
        write!(out, "AQI {}", self.index.composite)
    }

    /// Log [`summary`](Self::summary) at info level
    pub fn log_summary(&self) {
        log_info!("measurement: {}", self.summary());
    }
}
