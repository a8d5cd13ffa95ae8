//! Unit Conversion and Numeric Helpers
//!
//! Pure functions only. The ppm → µg/m³ conversion is evaluated at the fixed
//! reference conditions in [`crate::constants::physics`], so identical inputs
//! always produce bit-identical output.

use core::fmt::Write;

use heapless::String;

use crate::constants::{
    physics::{
        CELSIUS_TO_KELVIN, GAS_CONSTANT_L_HPA_PER_K_MOL, REFERENCE_PRESSURE_HPA,
        REFERENCE_TEMP_C, UG_PER_MG,
    },
    sensors::COMPARISON_EPSILON,
};

/// Molar volume of an ideal gas at the reference conditions (L/mol)
///
/// `Vm = R · (T + 273.15) / P`, about 24.46 L/mol at 25 °C and 1013.25 hPa.
pub fn reference_molar_volume() -> f32 {
    GAS_CONSTANT_L_HPA_PER_K_MOL * (REFERENCE_TEMP_C + CELSIUS_TO_KELVIN) / REFERENCE_PRESSURE_HPA
}

/// Convert a gas concentration from ppm to µg/m³
///
/// `molar_mass` is in g/mol.
pub fn ppm_to_ug_m3(ppm: f32, molar_mass: f32) -> f32 {
    (ppm * UG_PER_MG) * (molar_mass / reference_molar_volume())
}

/// `a == b` within `epsilon`
pub fn float_eq_eps(a: f32, b: f32, epsilon: f32) -> bool {
    libm::fabsf(a - b) < epsilon
}

/// `a > b` with `a` allowed to sit up to `epsilon` below `b`
pub fn float_gt_eps(a: f32, b: f32, epsilon: f32) -> bool {
    a > b - epsilon
}

/// `a < b` with `a` allowed to sit up to `epsilon` above `b`
pub fn float_lt_eps(a: f32, b: f32, epsilon: f32) -> bool {
    a < b + epsilon
}

/// [`float_eq_eps`] with the default tolerance
pub fn float_eq(a: f32, b: f32) -> bool {
    float_eq_eps(a, b, COMPARISON_EPSILON)
}

/// [`float_gt_eps`] with the default tolerance
pub fn float_gt(a: f32, b: f32) -> bool {
    float_gt_eps(a, b, COMPARISON_EPSILON)
}

/// [`float_lt_eps`] with the default tolerance
pub fn float_lt(a: f32, b: f32) -> bool {
    float_lt_eps(a, b, COMPARISON_EPSILON)
}

/// Capacity of a rendered decimal-comma number
pub const DECIMAL_TEXT_CAPACITY: usize = 24;

/// Render `value` with `decimals` fractional digits and a comma separator
///
/// `21.375` with three decimals becomes `"21,375"`. Values that do not fit the
/// buffer render as an empty string.
pub fn format_decimal_comma(value: f32, decimals: usize) -> String<DECIMAL_TEXT_CAPACITY> {
    let mut out: String<DECIMAL_TEXT_CAPACITY> = String::new();
    if write!(out, "{:.*}", decimals, value).is_err() {
        out.clear();
        return out;
    }

    let mut swapped: String<DECIMAL_TEXT_CAPACITY> = String::new();
    for ch in out.chars() {
        let ch = if ch == '.' { ',' } else { ch };
        // same length as the source, cannot overflow
        let _ = swapped.push(ch);
    }
    swapped
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::physics::{MOLAR_MASS_CO, MOLAR_MASS_NO2};

    #[test]
    fn molar_volume_at_reference() {
        let vm = reference_molar_volume();
        assert!((vm - 24.465).abs() < 0.01, "Vm = {}", vm);
    }

    #[test]
    fn zero_ppm_is_zero_mass() {
        assert_eq!(ppm_to_ug_m3(0.0, MOLAR_MASS_NO2), 0.0);
        assert_eq!(ppm_to_ug_m3(0.0, 1234.5), 0.0);
    }

    #[test]
    fn one_ppm_co() {
        // 1 ppm CO ≈ 1145 µg/m³ at 25 °C
        let ug = ppm_to_ug_m3(1.0, MOLAR_MASS_CO);
        assert!((ug - 1144.9).abs() < 1.0, "got {}", ug);
    }

    #[test]
    fn conversion_is_deterministic() {
        let a = ppm_to_ug_m3(0.137, MOLAR_MASS_NO2);
        let b = ppm_to_ug_m3(0.137, MOLAR_MASS_NO2);
        assert_eq!(a.to_bits(), b.to_bits());
    }

    #[test]
    fn epsilon_comparisons() {
        assert!(float_eq(1.0, 1.0005));
        assert!(!float_eq(1.0, 1.01));

        // 3.9995 counts as "greater than 4.0" within tolerance
        assert!(float_gt(3.9995, 4.0));
        assert!(!float_gt(3.99, 4.0));

        assert!(float_lt(0.0605, 0.06));
        assert!(!float_lt(0.07, 0.06));
    }

    #[test]
    fn decimal_comma_rendering() {
        assert_eq!(format_decimal_comma(21.375, 3).as_str(), "21,375");
        assert_eq!(format_decimal_comma(-4.5, 1).as_str(), "-4,5");
        assert_eq!(format_decimal_comma(7.0, 0).as_str(), "7");
    }
}
