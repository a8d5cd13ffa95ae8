//! Sensor Characteristics
//!
//! Curve-fit coefficients and clamp limits for the metal-oxide gas sensor
//! models, plus the analog ozone front-end conversion factors.
//!
//! ## MiCS-4514 response curves
//!
//! The coefficients were fitted to the datasheet sensitivity graphs (25 °C,
//! 50 %RH) as power laws `ppm = a · (Rs/R0)^b`:
//!
//! ```text
//! Gas   electrode   a          b           valid ppm range
//! CO    RED         4.671234   -1.198476   1 .. 1000
//! NO2   OX          0.149312    0.988391   0.01 .. 7
//! NH3   RED         1.101083   -3.734670   1 .. 200
//! ```

// ===== CARBON MONOXIDE (reducing electrode) =====

/// Above this Rs/R0 ratio the sensor sees clean air for CO.
pub const CO_CLEAN_AIR_RATIO: f32 = 4.0;
/// Reported CO in clean air (ppm).
pub const CO_CLEAN_AIR_PPM: f32 = 0.9;
/// Power-law scale for CO.
pub const CO_CURVE_A: f32 = 4.671_234;
/// Power-law exponent for CO (applied as `ratio^CO_CURVE_B`).
pub const CO_CURVE_B: f32 = -1.198_476;
/// CO lower clamp (ppm).
pub const CO_MIN_PPM: f32 = 1.0;
/// CO upper clamp (ppm).
pub const CO_MAX_PPM: f32 = 1000.0;

// ===== NITROGEN DIOXIDE (oxidizing electrode) =====

/// Below this Rs/R0 ratio the sensor sees clean air for NO2.
pub const NO2_CLEAN_AIR_RATIO: f32 = 0.06;
/// Power-law scale for NO2.
pub const NO2_CURVE_A: f32 = 0.149_312;
/// Power-law exponent for NO2.
pub const NO2_CURVE_B: f32 = 0.988_391;
/// Results below this are reported as zero (ppm).
pub const NO2_MIN_PPM: f32 = 0.01;
/// NO2 upper clamp (ppm).
pub const NO2_MAX_PPM: f32 = 7.0;

// ===== AMMONIA (reducing electrode) =====

/// Above this Rs/R0 ratio the sensor sees clean air for NH3.
pub const NH3_CLEAN_AIR_RATIO: f32 = 1.0;
/// Reported NH3 in clean air (ppm).
pub const NH3_CLEAN_AIR_PPM: f32 = 1.0;
/// Power-law scale for NH3.
pub const NH3_CURVE_A: f32 = 1.101_083;
/// Power-law exponent for NH3.
pub const NH3_CURVE_B: f32 = -3.734_670;
/// NH3 lower clamp (ppm).
pub const NH3_MIN_PPM: f32 = 1.0;
/// NH3 upper clamp (ppm).
pub const NH3_MAX_PPM: f32 = 200.0;

// ===== FLOAT COMPARISONS =====

/// Tolerance used by the clamp-boundary comparisons.
pub const COMPARISON_EPSILON: f32 = 0.001;

// ===== ANALOG OZONE FRONT-END =====

/// ADC points to millivolts for the ozone module's output stage.
pub const O3_ADC_TO_MV: f32 = 2.035_529_24;
/// Sensor sensitivity scaling (ppb per mV at the module's gain).
pub const O3_SENSITIVITY: f32 = 12.187;
/// Molar mass term applied in the ppb → µg/m³ step.
pub const O3_MOLAR_TERM: f32 = 48.0;

/// Config value meaning "ozone sensor not fitted".
pub const O3_ZERO_OFFSET_DISABLED: i32 = -1;

// ===== PARTICULATE AVERAGING =====

/// Fractional part at or above which a particulate mean rounds up.
pub const ROUNDING_THRESHOLD: f32 = 0.5;

// ===== RAW ADC =====

/// Largest valid MiCS-4514 ADC count (10-bit converter).
pub const MICS_ADC_MAX_COUNTS: i16 = 1023;
