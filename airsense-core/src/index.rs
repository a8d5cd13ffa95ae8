//! Air-Quality Index
//!
//! Three pollutant families are scored independently against fixed
//! breakpoints, then reduced to one composite score.
//!
//! ```text
//! Family   >high→4  >mid→3  >low→2  else→1   inactive→0
//! PM2.5      50       25      10
//! NOx       400      200     100
//! O3        240      180     120
//! ```
//!
//! Reduction of `[pm, nox, o3]`:
//!
//! 1. All three scored and some pair agrees: the NOx/O3 value when those two
//!    agree, otherwise the PM2.5 value.
//! 2. Otherwise the maximum, ties resolved PM2.5 → NOx → O3.
//!
//! The asymmetric tie-break in rule 1 is deliberate and must stay as is.

use crate::{
    averaging::CycleAverages,
    channel::{ChannelStatus, SensorFamily},
    constants::thresholds::{
        NOX_HIGH_UG_M3, NOX_LOW_UG_M3, NOX_MID_UG_M3, O3_HIGH_UG_M3, O3_LOW_UG_M3,
        O3_MID_UG_M3, PM25_HIGH_UG_M3, PM25_LOW_UG_M3, PM25_MID_UG_M3,
    },
};

/// Score for a family whose sensor is inactive
pub const NO_DATA: u8 = 0;

/// High / mid / low breakpoints for one pollutant (µg/m³)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Breakpoints {
    /// Above this → 4
    pub high: f32,
    /// Above this → 3
    pub mid: f32,
    /// Above this → 2
    pub low: f32,
}

/// PM2.5 breakpoints
pub const PM25_BREAKPOINTS: Breakpoints = Breakpoints {
    high: PM25_HIGH_UG_M3,
    mid: PM25_MID_UG_M3,
    low: PM25_LOW_UG_M3,
};

/// NOx breakpoints
pub const NOX_BREAKPOINTS: Breakpoints = Breakpoints {
    high: NOX_HIGH_UG_M3,
    mid: NOX_MID_UG_M3,
    low: NOX_LOW_UG_M3,
};

/// O3 breakpoints
pub const O3_BREAKPOINTS: Breakpoints = Breakpoints {
    high: O3_HIGH_UG_M3,
    mid: O3_MID_UG_M3,
    low: O3_LOW_UG_M3,
};

/// Score one averaged concentration; `None` means the sensor is inactive
pub fn severity(value: Option<f32>, breakpoints: &Breakpoints) -> u8 {
    match value {
        None => NO_DATA,
        Some(v) if v > breakpoints.high => 4,
        Some(v) if v > breakpoints.mid => 3,
        Some(v) if v > breakpoints.low => 2,
        Some(_) => 1,
    }
}

/// Composite score from `[pm, nox, o3]`
pub fn reduce(scores: [u8; 3]) -> u8 {
    let [pm, nox, o3] = scores;

    let all_scored = pm > NO_DATA && nox > NO_DATA && o3 > NO_DATA;
    if all_scored && (pm == nox || pm == o3 || nox == o3) {
        return if nox == o3 { nox } else { pm };
    }

    if pm >= nox && pm >= o3 {
        pm
    } else if nox >= o3 {
        nox
    } else {
        o3
    }
}

/// Per-family scores and the composite for one cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AirQualityIndex {
    /// PM2.5 score
    pub pm25: u8,
    /// NOx score
    pub nox: u8,
    /// O3 score
    pub o3: u8,
    /// Composite score
    pub composite: u8,
}

impl AirQualityIndex {
    /// Score a finalized cycle
    ///
    /// Only channels still enabled after finalize contribute; NOx comes from
    /// whichever gas family is fitted.
    pub fn evaluate(averages: &CycleAverages, status: &ChannelStatus) -> Self {
        let pm_value = averages
            .particulate
            .filter(|_| status.is_enabled(SensorFamily::Particulate))
            .map(|p| f32::from(p.pm25));

        let gas_enabled = status.is_enabled(SensorFamily::PrimaryGas)
            || status.is_enabled(SensorFamily::AlternateGas);
        let nox_value = averages.gas.filter(|_| gas_enabled).map(|g| g.no2);

        let o3_value = averages
            .ozone
            .filter(|_| status.is_enabled(SensorFamily::Ozone));

        let pm25 = severity(pm_value, &PM25_BREAKPOINTS);
        let nox = severity(nox_value, &NOX_BREAKPOINTS);
        let o3 = severity(o3_value, &O3_BREAKPOINTS);
        let composite = reduce([pm25, nox, o3]);

        log_debug!("index pm={} nox={} o3={} -> {}", pm25, nox, o3, composite);
        Self { pm25, nox, o3, composite }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::readings::{GasTriplet, ParticulateReading};

    #[test]
    fn severity_bands() {
        assert_eq!(severity(None, &PM25_BREAKPOINTS), 0);
        assert_eq!(severity(Some(5.0), &PM25_BREAKPOINTS), 1);
        assert_eq!(severity(Some(10.0), &PM25_BREAKPOINTS), 1);
        assert_eq!(severity(Some(10.5), &PM25_BREAKPOINTS), 2);
        assert_eq!(severity(Some(30.0), &PM25_BREAKPOINTS), 3);
        assert_eq!(severity(Some(51.0), &PM25_BREAKPOINTS), 4);
        assert_eq!(severity(Some(250.0), &O3_BREAKPOINTS), 4);
        assert_eq!(severity(Some(150.0), &NOX_BREAKPOINTS), 2);
    }

    #[test]
    fn pm_and_nox_agree() {
        assert_eq!(reduce([2, 2, 3]), 2);
    }

    #[test]
    fn nox_and_o3_agree_with_pm_inactive() {
        assert_eq!(reduce([0, 3, 3]), 3);
    }

    #[test]
    fn no_agreement_takes_max() {
        assert_eq!(reduce([1, 2, 4]), 4);
        assert_eq!(reduce([3, 1, 2]), 3);
    }

    #[test]
    fn nox_o3_pair_beats_pm() {
        assert_eq!(reduce([4, 1, 1]), 1);
        assert_eq!(reduce([1, 3, 3]), 3);
    }

    #[test]
    fn pm_o3_pair_returns_pm() {
        assert_eq!(reduce([2, 4, 2]), 2);
    }

    #[test]
    fn nothing_active() {
        assert_eq!(reduce([0, 0, 0]), 0);
    }

    #[test]
    fn disabled_channels_score_zero() {
        let averages = CycleAverages {
            particulate: Some(ParticulateReading { pm1: 10, pm25: 60, pm10: 80 }),
            gas: Some(GasTriplet { co: 500.0, no2: 150.0, nh3: 20.0 }),
            ..CycleAverages::default()
        };
        let mut status = ChannelStatus::new();
        status.enable(SensorFamily::Particulate);

        let aqi = AirQualityIndex::evaluate(&averages, &status);
        assert_eq!(aqi.pm25, 4);
        assert_eq!(aqi.nox, 0);
        assert_eq!(aqi.o3, 0);
        assert_eq!(aqi.composite, 4);
    }
}
