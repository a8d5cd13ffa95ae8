//! Analog ozone front-end
//!
//! The module outputs a voltage proportional to O3 on top of a fixed zero
//! offset measured in clean air. Counts above the offset are scaled to ppb and
//! then to µg/m³ at the actual air temperature.

use crate::constants::{
    physics::CELSIUS_TO_KELVIN,
    sensors::{O3_ADC_TO_MV, O3_MOLAR_TERM, O3_SENSITIVITY},
};

/// Averaged ADC points → O3 (µg/m³), temperature compensated
///
/// Readings at or below the zero offset report clean air (0.0).
pub fn ozone_ug_m3(points: i32, zero_offset: i32, temperature_c: f32) -> f32 {
    let net = points.saturating_sub(zero_offset);
    if net <= 0 {
        return 0.0;
    }

    (net as f32 * O3_ADC_TO_MV) * O3_SENSITIVITY * O3_MOLAR_TERM / (CELSIUS_TO_KELVIN + temperature_c)
}
