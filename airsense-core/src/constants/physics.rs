//! Physical Constants for Gas Concentration Conversion
//!
//! Unit conversions between ppm and µg/m³ are carried out at fixed reference
//! conditions (OSHA standard: 25 °C, 1013.25 hPa). The same reference point is
//! used by the environmental compensation model, so both must share these
//! constants.

// ===== REFERENCE CONDITIONS =====

/// Reference temperature for unit conversion and compensation (°C).
///
/// Source: OSHA standard conditions
pub const REFERENCE_TEMP_C: f32 = 25.0;

/// Reference atmospheric pressure for unit conversion and compensation (hPa).
///
/// Source: International Standard Atmosphere (ISA), sea level
pub const REFERENCE_PRESSURE_HPA: f32 = 1013.25;

/// Offset between Celsius and Kelvin scales.
pub const CELSIUS_TO_KELVIN: f32 = 273.15;

/// Universal gas constant expressed in L·hPa·K⁻¹·mol⁻¹.
///
/// Source: CODATA 2018 (8.314462618 J·K⁻¹·mol⁻¹ scaled to litres and hPa)
pub const GAS_CONSTANT_L_HPA_PER_K_MOL: f32 = 83.144_626_181_532_4;

/// Micrograms per milligram, the scale factor in ppm → µg/m³.
pub const UG_PER_MG: f32 = 1000.0;

// ===== HUMIDITY COMPENSATION =====

/// Offset added to relative humidity before normalising (%).
///
/// The compensation model treats 50 %RH as a neutral contribution:
/// `(RH + 50) / 100` equals 1.0 at 50 %RH.
pub const HUMIDITY_OFFSET_PCT: f32 = 50.0;

/// Percent to fraction divisor.
pub const PERCENT_DIVISOR: f32 = 100.0;

// ===== MOLAR MASSES =====

/// Carbon monoxide (g/mol).
pub const MOLAR_MASS_CO: f32 = 28.01;

/// Nitrogen dioxide (g/mol).
pub const MOLAR_MASS_NO2: f32 = 46.0055;

/// Ammonia (g/mol).
pub const MOLAR_MASS_NH3: f32 = 17.031;

/// Ozone (g/mol).
pub const MOLAR_MASS_O3: f32 = 48.0;
