//! Gas Concentration Models
//!
//! ## Overview
//!
//! Converts raw gas-sensor signals into concentrations:
//!
//! - [`mics4514`]: datasheet-fitted power laws from Rs/R0 ratios to CO, NO2 and
//!   NH3 in ppm, for the two-electrode metal-oxide sensor read as raw ADC
//! - [`compensation`]: temperature / pressure / humidity correction for NO2 and
//!   VOC channels
//! - [`ozone`]: analog electrochemical ozone front-end to µg/m³
//!
//! ## Why Ratios?
//!
//! A metal-oxide sensor's absolute resistance varies by a factor of ten
//! between parts of the same batch. The curves in the datasheet are therefore
//! given against Rs/R0, the live resistance over the resistance measured in
//! clean air at calibration time. Both values are read with the same
//! acquisition function so that the ADC reference, divider resistor and bit
//! depth cancel out:
//!
//! ```text
//! Rs/R0 = avg_adc_counts / baseline_adc_counts
//! ```
//!
//! ## Usage Example
//!
//! ```rust
//! use airsense_core::gas::mics4514;
//!
//! let triplet = mics4514::concentrations_from_ratios(0.5, 1.2).unwrap();
//! assert!(triplet.co > 1.0);
//! assert!(triplet.no2 > 0.0);
//! ```

pub mod compensation;
pub mod mics4514;
pub mod ozone;

pub use compensation::compensate;
pub use mics4514::{concentrations_from_ratios, immediate_concentrations, ratios_from_adc, RsR0Ratios};
pub use ozone::ozone_ug_m3;
