//! MiCS-4514 power-law response curves
//!
//! The reducing electrode's resistance falls as CO/NH3 rise; the oxidizing
//! electrode's resistance rises with NO2. Each curve has a clean-air region
//! where the fit is meaningless and a fixed baseline is reported instead.

use crate::{
    calibration::BaselineResistances,
    channel::SensorFamily,
    constants::sensors::{
        CO_CLEAN_AIR_PPM, CO_CLEAN_AIR_RATIO, CO_CURVE_A, CO_CURVE_B, CO_MAX_PPM, CO_MIN_PPM,
        NH3_CLEAN_AIR_PPM, NH3_CLEAN_AIR_RATIO, NH3_CURVE_A, NH3_CURVE_B, NH3_MAX_PPM,
        NH3_MIN_PPM, NO2_CLEAN_AIR_RATIO, NO2_CURVE_A, NO2_CURVE_B, NO2_MAX_PPM, NO2_MIN_PPM,
    },
    errors::{CoreError, CoreResult},
    readings::{AdcPair, GasTriplet},
    units::{float_gt, float_lt},
};

/// Rs/R0 ratios for both electrodes
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RsR0Ratios {
    /// Reducing electrode
    pub red: f32,
    /// Oxidizing electrode
    pub ox: f32,
}

/// Reducing-electrode ratio → CO (ppm)
pub fn co_ppm(red_ratio: f32) -> f32 {
    if float_gt(red_ratio, CO_CLEAN_AIR_RATIO) {
        return CO_CLEAN_AIR_PPM;
    }

    let mut ppm = CO_CURVE_A * libm::powf(red_ratio, CO_CURVE_B);
    if ppm > CO_MAX_PPM {
        ppm = CO_MAX_PPM;
    }
    if ppm < CO_MIN_PPM {
        ppm = CO_MIN_PPM;
    }
    ppm
}

/// Oxidizing-electrode ratio → NO2 (ppm)
pub fn no2_ppm(ox_ratio: f32) -> f32 {
    if float_lt(ox_ratio, NO2_CLEAN_AIR_RATIO) {
        return 0.0;
    }

    let mut ppm = NO2_CURVE_A * libm::powf(ox_ratio, NO2_CURVE_B);
    if ppm < NO2_MIN_PPM {
        ppm = 0.0;
    }
    if ppm > NO2_MAX_PPM {
        ppm = NO2_MAX_PPM;
    }
    ppm
}

/// Reducing-electrode ratio → NH3 (ppm)
pub fn nh3_ppm(red_ratio: f32) -> f32 {
    if float_gt(red_ratio, NH3_CLEAN_AIR_RATIO) {
        return NH3_CLEAN_AIR_PPM;
    }

    let mut ppm = NH3_CURVE_A * libm::powf(red_ratio, NH3_CURVE_B);
    if ppm > NH3_MAX_PPM {
        ppm = NH3_MAX_PPM;
    }
    if ppm < NH3_MIN_PPM {
        ppm = NH3_MIN_PPM;
    }
    ppm
}

/// Evaluate all three curves
///
/// Fails for the whole triplet if any result is negative or not a number;
/// partial results are never returned.
pub fn concentrations_from_ratios(red_ratio: f32, ox_ratio: f32) -> CoreResult<GasTriplet> {
    let triplet = GasTriplet {
        co: co_ppm(red_ratio),
        no2: no2_ppm(ox_ratio),
        nh3: nh3_ppm(red_ratio),
    };

    if triplet.has_invalid() {
        log_warn!(
            "gas curves returned invalid values: CO={} NO2={} NH3={}",
            triplet.co, triplet.no2, triplet.nh3
        );
        return Err(CoreError::ModelFailure {
            family: SensorFamily::AlternateGas,
            reason: "negative or non-finite concentration",
        });
    }

    Ok(triplet)
}

/// Averaged ADC counts → Rs/R0 using the clean-air baselines
pub fn ratios_from_adc(
    avg_red_counts: f32,
    avg_ox_counts: f32,
    baselines: &BaselineResistances,
) -> CoreResult<RsR0Ratios> {
    if baselines.red == 0 || baselines.ox == 0 {
        return Err(CoreError::ModelFailure {
            family: SensorFamily::AlternateGas,
            reason: "zero baseline",
        });
    }
    if !(avg_red_counts.is_finite() && avg_ox_counts.is_finite())
        || avg_red_counts < 0.0
        || avg_ox_counts < 0.0
    {
        return Err(CoreError::ModelFailure {
            family: SensorFamily::AlternateGas,
            reason: "invalid averaged ADC counts",
        });
    }

    Ok(RsR0Ratios {
        red: avg_red_counts / f32::from(baselines.red),
        ox: avg_ox_counts / f32::from(baselines.ox),
    })
}

/// One-shot concentrations (ppm) from a single ADC pair
///
/// Feeds [`Display::show_live_gas`](crate::traits::Display::show_live_gas)
/// on every tick. Does not touch any accumulator, and a failure here never
/// degrades the channel.
pub fn immediate_concentrations(
    adc: AdcPair,
    baselines: &BaselineResistances,
) -> CoreResult<GasTriplet> {
    if !adc.is_valid() {
        return Err(CoreError::ReadMiss { family: SensorFamily::AlternateGas });
    }

    let ratios = ratios_from_adc(f32::from(adc.red), f32::from(adc.ox), baselines)?;
    log_debug!("immediate Rs/R0 RED={} OX={}", ratios.red, ratios.ox);
    concentrations_from_ratios(ratios.red, ratios.ox)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn co_clean_air_clamp() {
        assert_eq!(co_ppm(4.5), CO_CLEAN_AIR_PPM);
        assert_eq!(co_ppm(100.0), CO_CLEAN_AIR_PPM);
    }

    #[test]
    fn co_curve_and_limits() {
        // ratio 1.0 → a
        assert!((co_ppm(1.0) - CO_CURVE_A).abs() < 1e-4);
        // very low ratio saturates
        assert_eq!(co_ppm(0.001), CO_MAX_PPM);
        // ratio 3.9 falls under 1 ppm on the curve
        assert_eq!(co_ppm(3.9), CO_MIN_PPM);
    }

    #[test]
    fn no2_clean_air_and_limits() {
        assert_eq!(no2_ppm(0.01), 0.0);
        assert_eq!(no2_ppm(0.05), 0.0);
        assert_eq!(no2_ppm(100.0), NO2_MAX_PPM);
        let mid = no2_ppm(10.0);
        assert!(mid > 1.0 && mid < 2.0, "NO2(10) = {}", mid);
    }

    #[test]
    fn nh3_clean_air_and_limits() {
        assert_eq!(nh3_ppm(1.5), NH3_CLEAN_AIR_PPM);
        assert_eq!(nh3_ppm(0.01), NH3_MAX_PPM);
        let mid = nh3_ppm(0.5);
        assert!(mid > NH3_MIN_PPM && mid < NH3_MAX_PPM, "NH3(0.5) = {}", mid);
    }

    #[test]
    fn nan_ratio_fails_whole_triplet() {
        let result = concentrations_from_ratios(f32::NAN, 1.0);
        assert!(matches!(result, Err(CoreError::ModelFailure { .. })));
    }

    #[test]
    fn ratios_cancel_scale() {
        let baselines = BaselineResistances { red: 400, ox: 200, nh3: 163 };
        let ratios = ratios_from_adc(200.0, 300.0, &baselines).unwrap();
        assert_eq!(ratios.red, 0.5);
        assert_eq!(ratios.ox, 1.5);
    }

    #[test]
    fn zero_baseline_is_model_failure() {
        let baselines = BaselineResistances { red: 0, ox: 200, nh3: 163 };
        assert!(ratios_from_adc(200.0, 300.0, &baselines).is_err());
    }

    #[test]
    fn immediate_rejects_failed_conversion() {
        let baselines = BaselineResistances::default();
        let result = immediate_concentrations(AdcPair { ox: -1, red: 300 }, &baselines);
        assert!(matches!(result, Err(CoreError::ReadMiss { .. })));

        let ok = immediate_concentrations(AdcPair { ox: 900, red: 955 }, &baselines).unwrap();
        // ratio 1.0 on both electrodes
        assert!((ok.co - CO_CURVE_A).abs() < 1e-3);
        assert_eq!(ok.nh3, NH3_CLEAN_AIR_PPM);
    }
}
