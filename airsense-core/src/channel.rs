//! Sensor Channels and Their Enable State
//!
//! A channel is one sensor family's data path. Each channel is enabled at boot
//! when its health probe succeeds and can only ever be switched off afterwards:
//! once the averaging step finds that a channel's failures consumed a whole
//! cycle (or its gas model failed) the channel stays disabled until the next
//! power cycle. Disabled channels are skipped by accumulation, averaging and
//! index evaluation.

use core::fmt;

/// Sensor family identifier
///
/// Used as the key of the accumulator map and of the status/degradation sets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum SensorFamily {
    /// Temperature / humidity / pressure / VOC (chemical-fusion sensor)
    Climate = 0,
    /// PM1 / PM2.5 / PM10 optical counter
    Particulate = 1,
    /// Three-channel MOS gas sensor reporting ppm (MiCS-6814)
    PrimaryGas = 2,
    /// Two-electrode MOS gas sensor read as raw ADC (MiCS-4514)
    AlternateGas = 3,
    /// Analog electrochemical ozone sensor
    Ozone = 4,
}

impl SensorFamily {
    /// Every family, in reporting order
    pub const ALL: [SensorFamily; 5] = [
        SensorFamily::Climate,
        SensorFamily::Particulate,
        SensorFamily::PrimaryGas,
        SensorFamily::AlternateGas,
        SensorFamily::Ozone,
    ];

    /// Human-readable name
    pub const fn name(&self) -> &'static str {
        match self {
            SensorFamily::Climate => "climate",
            SensorFamily::Particulate => "particulate",
            SensorFamily::PrimaryGas => "primary gas",
            SensorFamily::AlternateGas => "alternate gas",
            SensorFamily::Ozone => "ozone",
        }
    }

    const fn bit(&self) -> u8 {
        1 << (*self as u8)
    }
}

impl fmt::Display for SensorFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Small bit set over [`SensorFamily`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FamilySet(u8);

impl FamilySet {
    /// No family set
    pub const fn empty() -> Self {
        Self(0)
    }

    /// Every family set
    pub const fn all() -> Self {
        Self(0b1_1111)
    }

    /// Add a family
    pub fn insert(&mut self, family: SensorFamily) {
        self.0 |= family.bit();
    }

    /// Remove a family
    pub fn remove(&mut self, family: SensorFamily) {
        self.0 &= !family.bit();
    }

    /// Membership test
    pub const fn contains(&self, family: SensorFamily) -> bool {
        self.0 & family.bit() != 0
    }

    /// True when no family is set
    pub const fn is_empty(&self) -> bool {
        self.0 == 0
    }

    /// Number of families set
    pub const fn len(&self) -> u32 {
        self.0.count_ones()
    }

    /// Iterate members in reporting order
    pub fn iter(&self) -> impl Iterator<Item = SensorFamily> + '_ {
        SensorFamily::ALL.into_iter().filter(move |f| self.contains(*f))
    }
}

/// Enable flags for every channel
///
/// The only mutation after boot is [`ChannelStatus::disable`]; there is no way
/// to re-enable a channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ChannelStatus {
    enabled: FamilySet,
}

impl ChannelStatus {
    /// All channels disabled; populate with [`ChannelStatus::enable`] during boot
    pub const fn new() -> Self {
        Self { enabled: FamilySet::empty() }
    }

    /// Start from an explicit set, mostly useful in tests
    pub const fn from_set(enabled: FamilySet) -> Self {
        Self { enabled }
    }

    /// Mark a channel healthy after its init probe
    pub fn enable(&mut self, family: SensorFamily) {
        self.enabled.insert(family);
    }

    /// Permanently switch a channel off
    pub fn disable(&mut self, family: SensorFamily) {
        self.enabled.remove(family);
    }

    /// Whether a channel is still active
    pub const fn is_enabled(&self, family: SensorFamily) -> bool {
        self.enabled.contains(family)
    }

    /// Active channels
    pub const fn enabled(&self) -> FamilySet {
        self.enabled
    }

    /// True when no channel is left
    pub const fn none_enabled(&self) -> bool {
        self.enabled.is_empty()
    }
}

/// Channels that dropped out, recorded for downstream reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DegradationFlags {
    flagged: FamilySet,
}

impl DegradationFlags {
    /// No degradation recorded
    pub const fn new() -> Self {
        Self { flagged: FamilySet::empty() }
    }

    /// Record that a channel was disabled
    pub fn raise(&mut self, family: SensorFamily) {
        self.flagged.insert(family);
    }

    /// Whether a channel has been flagged
    pub const fn is_raised(&self, family: SensorFamily) -> bool {
        self.flagged.contains(family)
    }

    /// Whether anything was flagged
    pub const fn any(&self) -> bool {
        !self.flagged.is_empty()
    }

    /// Flagged channels
    pub const fn flagged(&self) -> FamilySet {
        self.flagged
    }

    /// Forget reported flags, returning what was set
    pub fn take(&mut self) -> FamilySet {
        core::mem::take(&mut self.flagged)
    }
}
