//! Air-Quality Index Breakpoints
//!
//! Concentrations strictly above `HIGH` score 4, above `MID` score 3, above
//! `LOW` score 2, anything else scores 1. All values in µg/m³ and meant to be
//! compared against one-hour averages.

/// PM2.5 severe level.
pub const PM25_HIGH_UG_M3: f32 = 50.0;
/// PM2.5 bad level.
pub const PM25_MID_UG_M3: f32 = 25.0;
/// PM2.5 acceptable level.
pub const PM25_LOW_UG_M3: f32 = 10.0;

/// NOx severe level.
pub const NOX_HIGH_UG_M3: f32 = 400.0;
/// NOx bad level.
pub const NOX_MID_UG_M3: f32 = 200.0;
/// NOx acceptable level.
pub const NOX_LOW_UG_M3: f32 = 100.0;

/// O3 severe level.
pub const O3_HIGH_UG_M3: f32 = 240.0;
/// O3 bad level.
pub const O3_MID_UG_M3: f32 = 180.0;
/// O3 acceptable level.
pub const O3_LOW_UG_M3: f32 = 120.0;
