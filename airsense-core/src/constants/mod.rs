//! Constants for the airsense core
//!
//! Every numeric value used by the conversion models, the index evaluator and
//! the cycle controller lives here, grouped by domain:
//! - **Physics**: reference conditions, gas constant, molar masses
//! - **Sensors**: datasheet curve fits, clamp limits, ADC conversion factors
//! - **Thresholds**: air-quality index breakpoints per pollutant family
//! - **Time**: timeouts, back-off intervals and default cadences
//!
//! Names carry their unit as a suffix wherever one applies.

/// Reference conditions and physical constants.
pub mod physics;

/// Gas and particulate sensor characteristics.
pub mod sensors;

/// Air-quality index breakpoints.
pub mod thresholds;

/// Cycle timing defaults.
pub mod time;

pub use physics::{
    GAS_CONSTANT_L_HPA_PER_K_MOL, REFERENCE_PRESSURE_HPA, REFERENCE_TEMP_C,
    CELSIUS_TO_KELVIN,
};

pub use thresholds::{
    PM25_HIGH_UG_M3, PM25_MID_UG_M3, PM25_LOW_UG_M3,
    NOX_HIGH_UG_M3, NOX_MID_UG_M3, NOX_LOW_UG_M3,
    O3_HIGH_UG_M3, O3_MID_UG_M3, O3_LOW_UG_M3,
};

pub use time::{
    MS_PER_SECOND, MS_PER_DAY, DEFAULT_SAMPLE_INTERVAL_S, NTP_SYNC_TIMEOUT_S,
    ERROR_BACKOFF_S, MAX_ERROR_RETRIES,
};
