//! Per-Tick Sensor Readings
//!
//! Plain value types produced by the acquisition collaborators. One sample
//! tick yields at most one reading per family; a missing reading is a read
//! miss for that family.

/// Climate sensor output
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ClimateReading {
    /// Air temperature (°C)
    pub temperature: f32,
    /// Relative humidity (%)
    pub humidity: f32,
    /// Barometric pressure (hPa)
    pub pressure: f32,
    /// Gas resistance used as VOC proxy (kΩ)
    pub voc: f32,
}

/// Optical particle counter output (µg/m³)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ParticulateReading {
    /// PM1.0 mass concentration
    pub pm1: u16,
    /// PM2.5 mass concentration
    pub pm25: u16,
    /// PM10 mass concentration
    pub pm10: u16,
}

/// CO / NO2 / NH3 concentrations, unit given by context (ppm or µg/m³)
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GasTriplet {
    /// Carbon monoxide
    pub co: f32,
    /// Nitrogen dioxide
    pub no2: f32,
    /// Ammonia
    pub nh3: f32,
}

impl GasTriplet {
    /// True when any component is negative or not finite
    pub fn has_invalid(&self) -> bool {
        [self.co, self.no2, self.nh3]
            .iter()
            .any(|v| !v.is_finite() || *v < 0.0)
    }
}

/// Raw ADC counts from the two-electrode gas sensor
///
/// Negative counts are how the driver reports a failed conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AdcPair {
    /// Oxidizing electrode
    pub ox: i16,
    /// Reducing electrode
    pub red: i16,
}

impl AdcPair {
    /// Both conversions succeeded
    pub const fn is_valid(&self) -> bool {
        self.ox >= 0 && self.red >= 0
    }
}

/// Everything read during one sample tick
///
/// `None` marks a read miss for that family. Families that are disabled are
/// ignored regardless of what is stored here.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Sample {
    /// Climate sensor
    pub climate: Option<ClimateReading>,
    /// Particle counter
    pub particulate: Option<ParticulateReading>,
    /// Three-channel gas sensor, in ppm
    pub primary_gas: Option<GasTriplet>,
    /// Two-electrode gas sensor, raw ADC
    pub alternate_gas: Option<AdcPair>,
    /// Ozone front-end, averaged ADC points
    pub ozone_points: Option<i32>,
}
