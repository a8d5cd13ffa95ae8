//! Environmental compensation for NO2 and VOC channels
//!
//! ```text
//! corrected = raw · ((RH + 50) / 100) · kH
//!           + (T − 25) · kT
//!           − (P − 1013.25) · kP
//! ```
//!
//! The reference point is shared with the ppm → µg/m³ conversion.

use crate::{
    calibration::CompensationCoefficients,
    constants::physics::{
        HUMIDITY_OFFSET_PCT, PERCENT_DIVISOR, REFERENCE_PRESSURE_HPA, REFERENCE_TEMP_C,
    },
    readings::ClimateReading,
};

/// Apply temperature, pressure and humidity correction to a gas value
pub fn compensate(
    raw: f32,
    climate: &ClimateReading,
    coefficients: &CompensationCoefficients,
) -> f32 {
    let humidity_term = (climate.humidity + HUMIDITY_OFFSET_PCT) / PERCENT_DIVISOR;
    raw * humidity_term * coefficients.humidity
        + (climate.temperature - REFERENCE_TEMP_C) * coefficients.temperature
        - (climate.pressure - REFERENCE_PRESSURE_HPA) * coefficients.pressure
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reference_climate(humidity: f32) -> ClimateReading {
        ClimateReading {
            temperature: REFERENCE_TEMP_C,
            humidity,
            pressure: REFERENCE_PRESSURE_HPA,
            voc: 0.0,
        }
    }

    #[test]
    fn reference_conditions_only_scale_by_humidity() {
        let coeffs = CompensationCoefficients::default();
        let out = compensate(100.0, &reference_climate(50.0), &coeffs);
        assert!((out - 100.0 * coeffs.humidity).abs() < 1e-3);
    }

    #[test]
    fn warmer_air_adds_temperature_term() {
        let coeffs = CompensationCoefficients { humidity: 1.0, temperature: 2.0, pressure: 0.0 };
        let mut climate = reference_climate(50.0);
        climate.temperature = 30.0;
        let out = compensate(10.0, &climate, &coeffs);
        assert!((out - 20.0).abs() < 1e-4, "got {}", out);
    }

    #[test]
    fn higher_pressure_subtracts() {
        let coeffs = CompensationCoefficients { humidity: 1.0, temperature: 0.0, pressure: 1.0 };
        let mut climate = reference_climate(50.0);
        climate.pressure = REFERENCE_PRESSURE_HPA + 10.0;
        let out = compensate(10.0, &climate, &coeffs);
        assert!((out - 0.0).abs() < 1e-3, "got {}", out);
    }
}
