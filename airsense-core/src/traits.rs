//! Collaborator seams
//!
//! The core never touches hardware, sockets or files. Everything outside the
//! measurement pipeline is reached through these traits, and the cycle
//! controller receives them bundled in [`Collaborators`] on every step.
//! Implementations may block for the length of one hardware call but must
//! bound it with their own guard timeout.

use crate::{
    calibration::BaselineResistances,
    calibration::BASELINE_COMMAND_LEN,
    channel::SensorFamily,
    cycle::CycleState,
    errors::{BusFault, CoreResult, NetworkFault, StorageFault},
    health::FusionStatus,
    readings::{AdcPair, ClimateReading, GasTriplet, ParticulateReading},
    record::MeasurementRecord,
    settings::ConfigUpdate,
    time::{Millis, TimeSource, Timestamp},
};

/// Per-family sensor acquisition
///
/// Every `read_*` returns `None` on a miss. Misses are absorbed by the
/// accumulator's failure counters and never surface as errors.
pub trait SensorHub {
    /// Wake the bus before a sample tick
    fn prepare(&mut self) -> Result<(), BusFault>;

    /// Temperature, humidity, pressure and VOC
    fn read_climate(&mut self) -> Option<ClimateReading>;

    /// PM1 / PM2.5 / PM10
    fn read_particulate(&mut self) -> Option<ParticulateReading>;

    /// CO / NO2 / NH3 in ppm from the three-channel module
    fn read_primary_gas(&mut self) -> Option<GasTriplet>;

    /// Raw OX / RED counts from the two-electrode sensor
    fn read_alternate_gas(&mut self) -> Option<AdcPair>;

    /// Averaged ADC points from the ozone front-end
    fn read_ozone_points(&mut self) -> Option<i32>;

    /// Status codes from the climate sensor's fusion library
    fn fusion_status(&mut self) -> FusionStatus;

    /// Whether a digital sensor answered its init handshake
    fn responds(&mut self, family: SensorFamily) -> bool;

    /// One raw reading from an analog sensor's pin
    fn analog_level(&mut self, family: SensorFamily) -> i32;
}

/// Gas sensor non-volatile calibration
pub trait CalibrationStore {
    /// Baselines currently stored in the sensor
    fn read_baselines(&mut self) -> Result<BaselineResistances, BusFault>;

    /// Send an encoded baseline-write command
    fn write_baselines(&mut self, command: &[u8; BASELINE_COMMAND_LEN]) -> Result<(), BusFault>;
}

/// Firmware release identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FirmwareVersion {
    /// Major
    pub major: u16,
    /// Minor
    pub minor: u16,
    /// Patch
    pub patch: u16,
}

impl FirmwareVersion {
    /// Build a version triple
    pub const fn new(major: u16, minor: u16, patch: u16) -> Self {
        Self { major, minor, patch }
    }
}

impl core::fmt::Display for FirmwareVersion {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

/// Upload server, time sync and firmware distribution
///
/// The server's configuration answer does not come back through this trait:
/// the network task posts it into the controller's
/// [`ConfigMailbox`](crate::mailbox::ConfigMailbox).
pub trait Network {
    /// Bring the link up
    fn connect(&mut self) -> Result<(), NetworkFault>;

    /// Ask the server for this device's configuration
    fn request_config(&mut self) -> Result<(), NetworkFault>;

    /// Poll time sync; `WouldBlock` while still waiting, UTC ms when done
    fn poll_time_sync(&mut self) -> nb::Result<Timestamp, NetworkFault>;

    /// Newest firmware the server offers
    fn latest_firmware(&mut self) -> Result<FirmwareVersion, NetworkFault>;

    /// Download and stage a firmware release
    fn apply_update(&mut self, version: FirmwareVersion) -> Result<(), NetworkFault>;

    /// Upload one measurement record
    fn send(&mut self, record: &MeasurementRecord) -> Result<(), NetworkFault>;
}

/// Persistent measurement log
pub trait Storage {
    /// Whether the medium is mounted
    fn is_present(&mut self) -> bool;

    /// Append one record
    fn append(&mut self, record: &MeasurementRecord) -> Result<(), StorageFault>;
}

/// On-device screen
pub trait Display {
    /// Entering a state
    fn show_state(&mut self, state: CycleState);

    /// Time left before the next sample tick
    fn show_countdown(&mut self, remaining: Millis);

    /// A finished record
    fn show_record(&mut self, record: &MeasurementRecord);

    /// Unaveraged gas concentrations (ppm) from the tick just read
    fn show_live_gas(&mut self, gas: &GasTriplet);
}

/// Turns a server configuration payload into overrides
pub trait ConfigDecoder {
    /// Decode one mailbox payload
    fn decode(&self, payload: &[u8]) -> CoreResult<ConfigUpdate>;
}

/// Everything the controller talks to during one step
pub struct Collaborators<'a> {
    /// Sensor acquisition
    pub sensors: &'a mut dyn SensorHub,
    /// Gas sensor EEPROM, rewritten when the server changes baselines
    pub calibration_store: &'a mut dyn CalibrationStore,
    /// Network link
    pub network: &'a mut dyn Network,
    /// Measurement log
    pub storage: &'a mut dyn Storage,
    /// Screen
    pub display: &'a mut dyn Display,
    /// Monotonic clock
    pub clock: &'a dyn TimeSource,
    /// Server payload decoder
    pub decoder: &'a dyn ConfigDecoder,
}
